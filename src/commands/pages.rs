use crate::page_range::resolve;
use crate::pdf::PdfDocument;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct PagesReport {
    pub total_pages: u32,
    /// Selected 1-based page numbers
    pub selected: Vec<u32>,
    /// The selection re-encoded as a page specification
    pub normalized: String,
}

pub fn execute<P: AsRef<Path>>(path: P, pages: &str) -> Result<PagesReport> {
    let doc = PdfDocument::open(&path)?;
    let total_pages = doc.page_count();
    let selection = resolve(pages, total_pages);

    Ok(PagesReport {
        total_pages,
        selected: selection.page_numbers(),
        normalized: selection.to_string(),
    })
}

pub fn run<P: AsRef<Path>>(path: P, pages: &str) -> Result<()> {
    let report = execute(path, pages)?;

    println!("Pages: {}", report.total_pages);
    if report.selected.is_empty() {
        println!("No valid pages specified.");
        return Ok(());
    }
    println!(
        "Selected: {} ({} page(s))",
        report.normalized,
        report.selected.len()
    );

    Ok(())
}
