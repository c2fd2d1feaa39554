//! One module per document action. Each exposes `execute`, which does the
//! work and returns a serializable report, and `run`, which prints that
//! report for the terminal.

pub mod compress;
pub mod extract;
pub mod images;
pub mod merge;
pub mod pages;
pub mod rotate;
pub mod text;

use std::path::{Path, PathBuf};

/// `dir/name.pdf` -> `dir/<prefix>name.pdf`
pub fn prefixed_output(input: &Path, prefix: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    input.with_file_name(format!("{}{}", prefix, name))
}

fn resolve_output(output: Option<&Path>, default: impl FnOnce() -> PathBuf) -> PathBuf {
    output.map(Path::to_path_buf).unwrap_or_else(default)
}

/// Format a byte count the way people read file sizes.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
