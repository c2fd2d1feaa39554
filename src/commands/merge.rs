use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub const DEFAULT_OUTPUT: &str = "merged-document.pdf";

#[derive(Debug, Serialize)]
pub struct MergeReport {
    pub output_path: String,
    pub input_count: usize,
    pub page_count: u32,
}

/// Expand directories into the PDFs they contain, sorted by path. Files are
/// kept in the order given.
pub fn collect_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            files.push(input.to_path_buf());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(input) {
            let entry =
                entry.with_context(|| format!("Failed to read directory: {}", input.display()))?;
            if entry.file_type().is_file() && is_pdf(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        debug!(dir = %input.display(), count = found.len(), "collected PDFs");
        files.extend(found);
    }
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

pub fn execute<P: AsRef<Path>>(inputs: &[P], output: Option<&Path>) -> Result<MergeReport> {
    let files = collect_inputs(inputs)?;
    if files.len() < 2 {
        anyhow::bail!(
            "At least 2 PDF files are required to merge (got {})",
            files.len()
        );
    }

    let mut documents = Vec::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        info!(file = %file.display(), "loading file {} of {}", i + 1, files.len());
        documents.push(PdfDocument::open(file)?.doc);
    }

    let output = super::resolve_output(output, || PathBuf::from(DEFAULT_OUTPUT));
    let mut merged = PdfDocument::merge(documents)?;
    let page_count = merged.get_pages().len() as u32;
    PdfDocument::save(&mut merged, &output)?;

    Ok(MergeReport {
        output_path: output.display().to_string(),
        input_count: files.len(),
        page_count,
    })
}

pub fn run<P: AsRef<Path>>(inputs: &[P], output: Option<&Path>) -> Result<()> {
    let report = execute(inputs, output)?;
    println!(
        "Merged {} files ({} pages) into {}",
        report.input_count, report.page_count, report.output_path
    );
    Ok(())
}
