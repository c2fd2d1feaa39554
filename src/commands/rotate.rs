use crate::page_range::{select_pages, PageSelection};
use crate::pdf::{PdfDocument, Rotation};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct RotateReport {
    pub output_path: String,
    pub rotation: i64,
    pub page_count: u32,
    pub pages: String,
}

/// Rotate the pages named by `pages`, or every page when it is `None`.
pub fn execute<P: AsRef<Path>>(
    input: P,
    rotation: Rotation,
    pages: Option<&str>,
    output: Option<&Path>,
) -> Result<RotateReport> {
    let input = input.as_ref();
    let mut doc = PdfDocument::open(input)?;
    let total = doc.page_count();

    let selection = match pages {
        Some(spec) => select_pages(spec, total)?,
        None => PageSelection::all(total),
    };
    if selection.is_empty() {
        anyhow::bail!("{} has no pages to rotate", input.display());
    }

    info!(
        input = %input.display(),
        degrees = rotation.degrees(),
        pages = %selection,
        "rotating pages"
    );
    doc.rotate(&selection, rotation)?;

    let output = super::resolve_output(output, || super::prefixed_output(input, "rotated-"));
    PdfDocument::save(&mut doc.doc, &output)?;

    Ok(RotateReport {
        output_path: output.display().to_string(),
        rotation: rotation.degrees(),
        page_count: selection.len() as u32,
        pages: selection.to_string(),
    })
}

pub fn run<P: AsRef<Path>>(
    input: P,
    rotation: Rotation,
    pages: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let report = execute(input, rotation, pages, output)?;
    println!(
        "Rotated {} page(s) by {}° into {}",
        report.page_count, report.rotation, report.output_path
    );
    Ok(())
}
