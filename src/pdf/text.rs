use anyhow::{anyhow, Context, Result};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::page_range::PageSelection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number
    pub page: u32,
    pub text: String,
}

/// Extract text from a PDF, one entry per page. With a selection, only the
/// selected pages are returned.
pub fn extract_text_pages<P: AsRef<Path>>(
    path: P,
    selection: Option<&PageSelection>,
) -> Result<Vec<PageText>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read PDF: {}", path.display()))?;

    let pages = extract_pages(&bytes)
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;

    Ok(keep_selected(pages, selection))
}

/// Concatenate page texts, each followed by a blank line.
pub fn join_pages(pages: &[PageText]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&page.text);
        out.push_str("\n\n");
    }
    out
}

// pdf-extract panics on some malformed input instead of returning an error.
fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(result) => result.map_err(|e| anyhow!("{}", e)),
        Err(_) => Err(anyhow!("text extraction panicked (malformed document)")),
    }
}

fn keep_selected(pages: Vec<String>, selection: Option<&PageSelection>) -> Vec<PageText> {
    pages
        .into_iter()
        .zip(0u32..)
        .filter(|(_, index)| selection.map_or(true, |s| s.contains(*index)))
        .map(|(text, index)| PageText {
            page: index + 1,
            text,
        })
        .collect()
}
