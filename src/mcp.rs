use anyhow::Result;
use clap::ValueEnum;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::commands;
use crate::pdf::render::ImageScale;
use crate::pdf::{CompressionLevel, Rotation};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfPagesRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Page specification (e.g., '1-5,8,10-12')")]
    pub pages: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfExtractRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Pages to keep (e.g., '1-5,8,10-12')")]
    pub pages: String,
    #[schemars(description = "Output file path (default: extracted-pages-<name> next to the input)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfRotateRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Clockwise rotation in degrees: 90, 180 or 270")]
    pub rotation: i64,
    #[schemars(description = "Pages to rotate (e.g., '1,3-4'); all pages when omitted")]
    pub pages: Option<String>,
    #[schemars(description = "Output file path (default: rotated-<name> next to the input)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfMergeRequest {
    #[schemars(description = "PDF files or directories to merge, in order")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path (default: merged-document.pdf in the current directory)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfCompressRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Compression level: low, medium or high (default: medium)")]
    pub level: Option<String>,
    #[schemars(description = "Output file path (default: compressed-<name> next to the input)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfToTextRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Pages to convert (e.g., '1-5'); all pages when omitted")]
    pub pages: Option<String>,
    #[schemars(description = "Output file path (default: <name>.txt next to the input)")]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfToImagesRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Pages to render (e.g., '1-5'); all pages when omitted")]
    pub pages: Option<String>,
    #[schemars(description = "Image scale relative to the page: 1.0, 1.5 or 2.0 (default: 1.5)")]
    pub scale: Option<f64>,
    #[schemars(description = "Output file path (default: <name>.jpg for one page, <name>_images.zip for several)")]
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(tool: &str, result: Result<T>) -> String {
    match result {
        Ok(report) => {
            serde_json::to_string_pretty(&report).unwrap_or_else(|e| format!("Error: {}", e))
        }
        Err(e) => {
            warn!(tool, error = %e, "tool failed");
            format!("Error: {:#}", e)
        }
    }
}

fn parse_level(level: Option<&str>) -> Result<CompressionLevel> {
    match level {
        Some(level) => CompressionLevel::from_str(level, true)
            .map_err(|_| anyhow::anyhow!("Unknown compression level: {}", level)),
        None => Ok(CompressionLevel::default()),
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Resolve a page specification against a PDF. Returns the total page count, the selected 1-based pages, and the normalized specification. Malformed or out-of-range parts are ignored.")]
    fn pdf_pages(&self, Parameters(req): Parameters<PdfPagesRequest>) -> String {
        to_json("pdf_pages", commands::pages::execute(&req.path, &req.pages))
    }

    #[tool(description = "Extract selected pages from a PDF and save them to a new file")]
    fn pdf_extract(&self, Parameters(req): Parameters<PdfExtractRequest>) -> String {
        let output = req.output.as_deref().map(Path::new);
        to_json(
            "pdf_extract",
            commands::extract::execute(&req.path, &req.pages, output),
        )
    }

    #[tool(description = "Set the rotation of all or selected pages of a PDF and save the result")]
    fn pdf_rotate(&self, Parameters(req): Parameters<PdfRotateRequest>) -> String {
        let output = req.output.as_deref().map(Path::new);
        let result = Rotation::from_degrees(req.rotation).and_then(|rotation| {
            commands::rotate::execute(&req.path, rotation, req.pages.as_deref(), output)
        });
        to_json("pdf_rotate", result)
    }

    #[tool(description = "Merge two or more PDFs (or directories of PDFs) into one file")]
    fn pdf_merge(&self, Parameters(req): Parameters<PdfMergeRequest>) -> String {
        let output = req.output.as_deref().map(Path::new);
        to_json("pdf_merge", commands::merge::execute(&req.inputs, output))
    }

    #[tool(description = "Rewrite a PDF with compressed streams and report the size reduction")]
    fn pdf_compress(&self, Parameters(req): Parameters<PdfCompressRequest>) -> String {
        let output = req.output.as_deref().map(Path::new);
        let result = parse_level(req.level.as_deref())
            .and_then(|level| commands::compress::execute(&req.path, level, output));
        to_json("pdf_compress", result)
    }

    #[tool(description = "Convert a PDF (or selected pages of it) to a plain text file")]
    fn pdf_to_text(&self, Parameters(req): Parameters<PdfToTextRequest>) -> String {
        let output = req.output.as_deref().map(Path::new);
        to_json(
            "pdf_to_text",
            commands::text::execute(&req.path, req.pages.as_deref(), output),
        )
    }

    #[tool(description = "Render a PDF (or selected pages of it) to JPG images. One page is written as a .jpg file, several pages as a .zip of JPGs")]
    fn pdf_to_images(&self, Parameters(req): Parameters<PdfToImagesRequest>) -> String {
        let output = req.output.as_deref().map(Path::new);
        let scale = match req.scale {
            Some(factor) => ImageScale::from_factor(factor),
            None => Ok(ImageScale::default()),
        };
        let result = scale.and_then(|scale| {
            commands::images::execute(&req.path, req.pages.as_deref(), scale, output)
        });
        to_json("pdf_to_images", result)
    }
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Local PDF tools. Use pdf_pages to check what a page specification selects, \
                 pdf_extract to copy pages into a new PDF, pdf_rotate to rotate pages, \
                 pdf_merge to combine files, pdf_compress to shrink a file, pdf_to_text \
                 to convert a PDF to plain text, and pdf_to_images to render pages as JPGs. \
                 Page specifications are comma-separated 1-based pages and ranges like '1-3,7'."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
