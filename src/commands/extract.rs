use crate::page_range::select_pages;
use crate::pdf::PdfDocument;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ExtractReport {
    pub output_path: String,
    pub page_count: u32,
    /// Extracted pages, re-encoded ("1-3,7")
    pub pages: String,
}

pub fn execute<P: AsRef<Path>>(
    input: P,
    pages: &str,
    output: Option<&Path>,
) -> Result<ExtractReport> {
    let input = input.as_ref();
    let doc = PdfDocument::open(input)?;
    let selection = select_pages(pages, doc.page_count())?;
    let output = super::resolve_output(output, || {
        super::prefixed_output(input, "extracted-pages-")
    });

    info!(input = %input.display(), pages = %selection, "extracting pages");
    let mut new_doc = doc.extract(&selection)?;
    PdfDocument::save(&mut new_doc, &output)?;

    Ok(ExtractReport {
        output_path: output.display().to_string(),
        page_count: selection.len() as u32,
        pages: selection.to_string(),
    })
}

pub fn run<P: AsRef<Path>>(input: P, pages: &str, output: Option<&Path>) -> Result<()> {
    let report = execute(input, pages, output)?;
    println!(
        "Extracted {} page(s) to {}",
        report.page_count, report.output_path
    );
    Ok(())
}
