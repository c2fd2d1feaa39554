use crate::page_range::{select_pages, PageSelection};
use crate::pdf::render::{encode_jpeg, render_pages, ImageScale, RenderedPage};
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Serialize)]
pub struct ImagesReport {
    pub output_path: String,
    pub page_count: u32,
    /// Converted pages, re-encoded ("1-3,7")
    pub pages: String,
    pub scale: f32,
}

/// `report.pdf` -> `report`. Names without a `.pdf` extension are kept whole.
fn image_stem(input: &Path) -> String {
    let is_pdf = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let name = if is_pdf {
        input.file_stem()
    } else {
        input.file_name()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// A single page becomes `<stem>.jpg`; several pages are packed into
/// `<stem>_images.zip`.
fn default_output(input: &Path, page_count: usize) -> PathBuf {
    let stem = image_stem(input);
    if page_count == 1 {
        input.with_file_name(format!("{}.jpg", stem))
    } else {
        input.with_file_name(format!("{}_images.zip", stem))
    }
}

/// Write one JPEG directly, or a zip of `<stem>_page_<N>.jpg` entries.
fn write_images(pages: &[RenderedPage], stem: &str, output: &Path) -> Result<()> {
    if let [page] = pages {
        let bytes = encode_jpeg(&page.image)?;
        return std::fs::write(output, bytes)
            .with_context(|| format!("Failed to write image: {}", output.display()));
    }

    let file = File::create(output)
        .with_context(|| format!("Failed to create archive: {}", output.display()))?;
    let mut zip = ZipWriter::new(file);
    // JPEG data doesn't deflate further
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for page in pages {
        let bytes = encode_jpeg(&page.image)?;
        zip.start_file(format!("{}_page_{}.jpg", stem, page.page), options)?;
        zip.write_all(&bytes)?;
    }
    zip.finish()
        .with_context(|| format!("Failed to finish archive: {}", output.display()))?;
    Ok(())
}

pub fn execute<P: AsRef<Path>>(
    input: P,
    pages: Option<&str>,
    scale: ImageScale,
    output: Option<&Path>,
) -> Result<ImagesReport> {
    let input = input.as_ref();
    let doc = PdfDocument::open(input)?;
    let selection = match pages {
        Some(spec) => select_pages(spec, doc.page_count())?,
        None => PageSelection::all(doc.page_count()),
    };
    if selection.is_empty() {
        anyhow::bail!("{} has no pages to convert", input.display());
    }

    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read PDF: {}", input.display()))?;
    info!(input = %input.display(), pages = %selection, scale = scale.factor(), "rendering pages");
    let rendered = render_pages(&bytes, &selection, scale)?;

    let output = super::resolve_output(output, || default_output(input, rendered.len()));
    write_images(&rendered, &image_stem(input), &output)?;

    Ok(ImagesReport {
        output_path: output.display().to_string(),
        page_count: rendered.len() as u32,
        pages: selection.to_string(),
        scale: scale.factor(),
    })
}

pub fn run<P: AsRef<Path>>(
    input: P,
    pages: Option<&str>,
    scale: ImageScale,
    output: Option<&Path>,
) -> Result<()> {
    let report = execute(input, pages, scale, output)?;
    println!(
        "Converted {} page(s) to JPG at {}x: {}",
        report.page_count, report.scale, report.output_path
    );
    Ok(())
}
