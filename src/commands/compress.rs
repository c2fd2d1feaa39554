use crate::pdf::{CompressionLevel, PdfDocument};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::format_file_size;

#[derive(Debug, Serialize)]
pub struct CompressReport {
    pub output_path: String,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Negative when the output grew
    pub reduction_percent: f64,
}

impl CompressReport {
    fn new(output_path: String, original_size: u64, compressed_size: u64) -> Self {
        let reduction_percent = if original_size == 0 {
            0.0
        } else {
            let raw = (original_size as f64 - compressed_size as f64) / original_size as f64;
            (raw * 1000.0).round() / 10.0
        };
        CompressReport {
            output_path,
            original_size,
            compressed_size,
            reduction_percent,
        }
    }
}

pub fn execute<P: AsRef<Path>>(
    input: P,
    level: CompressionLevel,
    output: Option<&Path>,
) -> Result<CompressReport> {
    let input = input.as_ref();
    let original_size = std::fs::metadata(input)
        .with_context(|| format!("Failed to read PDF: {}", input.display()))?
        .len();

    let mut doc = PdfDocument::open(input)?;
    doc.compress(level);
    let bytes = PdfDocument::to_bytes(&mut doc.doc)?;

    let output = super::resolve_output(output, || super::prefixed_output(input, "compressed-"));
    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to save PDF: {}", output.display()))?;

    let report = CompressReport::new(
        output.display().to_string(),
        original_size,
        bytes.len() as u64,
    );
    info!(
        input = %input.display(),
        ?level,
        original = report.original_size,
        compressed = report.compressed_size,
        "compressed document"
    );
    Ok(report)
}

pub fn run<P: AsRef<Path>>(input: P, level: CompressionLevel, output: Option<&Path>) -> Result<()> {
    let report = execute(input, level, output)?;
    println!("Compressed into {}", report.output_path);
    println!(
        "Original: {} → Compressed: {}",
        format_file_size(report.original_size),
        format_file_size(report.compressed_size)
    );
    println!("Reduced by {:.1}%", report.reduction_percent);
    Ok(())
}
