use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage, RgbaImage};
use pdfium_render::prelude::{PdfRenderConfig, Pdfium};
use std::path::PathBuf;
use tracing::debug;

use crate::page_range::PageSelection;

/// Directory to look in for the Pdfium shared library before the working
/// directory and the system search path.
pub const PDFIUM_DIR_ENV: &str = "PDFIUM_DYNAMIC_LIB_PATH";

const JPEG_QUALITY: u8 = 95;

/// Rendering scale relative to the page's size in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ImageScale {
    /// Page size (72 dpi)
    #[value(name = "1.0", alias = "1")]
    Normal,
    /// 1.5x page size (108 dpi)
    #[default]
    #[value(name = "1.5")]
    High,
    /// 2x page size (144 dpi)
    #[value(name = "2.0", alias = "2")]
    Highest,
}

impl ImageScale {
    pub fn from_factor(factor: f64) -> Result<Self> {
        let halves = factor * 2.0;
        if halves.fract() != 0.0 {
            anyhow::bail!("Unsupported scale: {} (use 1.0, 1.5 or 2.0)", factor);
        }
        match halves as i64 {
            2 => Ok(ImageScale::Normal),
            3 => Ok(ImageScale::High),
            4 => Ok(ImageScale::Highest),
            _ => anyhow::bail!("Unsupported scale: {} (use 1.0, 1.5 or 2.0)", factor),
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            ImageScale::Normal => 1.0,
            ImageScale::High => 1.5,
            ImageScale::Highest => 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 1-based page number
    pub page: u32,
    pub image: RgbImage,
}

fn bind_pdfium() -> Result<Pdfium> {
    let mut dirs = Vec::new();
    if let Some(dir) = std::env::var_os(PDFIUM_DIR_ENV) {
        dirs.push(PathBuf::from(dir));
    }
    dirs.push(PathBuf::from("./"));

    for dir in &dirs {
        let name = Pdfium::pdfium_platform_library_name_at_path(dir);
        if let Ok(bindings) = Pdfium::bind_to_library(&name) {
            debug!(library = %name.display(), "bound Pdfium");
            return Ok(Pdfium::new(bindings));
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| {
            anyhow!(
                "Failed to load the Pdfium library ({}); set {} to the directory that contains it",
                e,
                PDFIUM_DIR_ENV
            )
        })
}

/// Render the selected pages of a PDF to RGB images.
pub fn render_pages(
    bytes: &[u8],
    selection: &PageSelection,
    scale: ImageScale,
) -> Result<Vec<RenderedPage>> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .context("Failed to load PDF for rendering")?;
    let config = PdfRenderConfig::new().scale_page_by_factor(scale.factor());

    let mut rendered = Vec::with_capacity(selection.len());
    for (index, page) in (0u32..).zip(document.pages().iter()) {
        if !selection.contains(index) {
            continue;
        }

        let bitmap = page
            .render_with_config(&config)
            .with_context(|| format!("Failed to render page {}", index + 1))?;
        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
            .ok_or_else(|| anyhow!("Page {} rendered to a truncated bitmap", index + 1))?;

        debug!(page = index + 1, width, height, "rendered page");
        rendered.push(RenderedPage {
            page: index + 1,
            image: DynamicImage::ImageRgba8(rgba).into_rgb8(),
        });
    }
    Ok(rendered)
}

pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode_image(image)
        .context("Failed to encode JPEG")?;
    Ok(bytes)
}
