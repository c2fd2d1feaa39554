pub mod document;
pub mod render;
pub mod text;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::{CompressionLevel, PdfDocument, Rotation};
