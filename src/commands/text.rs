use crate::page_range::select_pages;
use crate::pdf::text::{extract_text_pages, join_pages};
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct TextReport {
    pub output_path: String,
    pub page_count: u32,
    pub char_count: usize,
}

pub fn execute<P: AsRef<Path>>(
    input: P,
    pages: Option<&str>,
    output: Option<&Path>,
) -> Result<TextReport> {
    let input = input.as_ref();
    let selection = match pages {
        Some(spec) => {
            let doc = PdfDocument::open(input)?;
            Some(select_pages(spec, doc.page_count())?)
        }
        None => None,
    };

    let texts = extract_text_pages(input, selection.as_ref())?;
    let text = join_pages(&texts);

    let output = super::resolve_output(output, || input.with_extension("txt"));
    std::fs::write(&output, &text)
        .with_context(|| format!("Failed to write text: {}", output.display()))?;

    info!(input = %input.display(), pages = texts.len(), "converted to text");
    Ok(TextReport {
        output_path: output.display().to_string(),
        page_count: texts.len() as u32,
        char_count: text.chars().count(),
    })
}

pub fn run<P: AsRef<Path>>(input: P, pages: Option<&str>, output: Option<&Path>) -> Result<()> {
    let report = execute(input, pages, output)?;
    println!(
        "Wrote text of {} page(s) ({} characters) to {}",
        report.page_count, report.char_count, report.output_path
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::write_sample;
    use tempfile::TempDir;

    #[test]
    fn test_converts_pages_to_text_file() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(dir.path(), "notes.pdf", 2);

        let report = execute(&input, None, None).unwrap();
        assert_eq!(report.page_count, 2);
        assert_eq!(report.output_path, dir.path().join("notes.txt").display().to_string());

        let text = std::fs::read_to_string(dir.path().join("notes.txt")).unwrap();
        assert_eq!(report.char_count, text.chars().count());
        let first = text.find("Page 1").unwrap();
        let second = text.find("Page 2").unwrap();
        assert!(first < second);
        assert!(text[first..second].contains("\n\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_converts_selected_pages_only() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(dir.path(), "notes.pdf", 3);
        let output = dir.path().join("second.txt");

        let report = execute(&input, Some("2"), Some(output.as_path())).unwrap();
        assert_eq!(report.page_count, 1);

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("Page 2"));
        assert!(!text.contains("Page 1"));
        assert!(!text.contains("Page 3"));
    }

    #[test]
    fn test_invalid_pages_rejected_before_extraction() {
        let dir = TempDir::new().unwrap();
        let input = write_sample(dir.path(), "notes.pdf", 2);

        let err = execute(&input, Some("7"), None).unwrap_err();
        assert!(err.to_string().contains("No valid pages"));
        assert!(!dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        assert!(execute(dir.path().join("gone.pdf"), None, None).is_err());
    }
}
