use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pdf::render::ImageScale;
use crate::pdf::{CompressionLevel, Rotation};

#[derive(Parser)]
#[command(name = "pdftools")]
#[command(about = "Merge, split, rotate, compress and convert PDFs locally, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Log filter (e.g. "info", "pdftools=debug"); logs go to stderr
    #[arg(long, global = true, env = "PDFTOOLS_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio
    Mcp,

    /// Combine PDFs into one; directories contribute every PDF inside them
    Merge {
        /// PDF files or directories to merge, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file [default: merged-document.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Copy selected pages into a new PDF
    #[command(alias = "split")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Pages to keep (e.g., "1-5,8,10-12")
        pages: String,

        /// Output file [default: extracted-pages-<name>]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Set the rotation of all or selected pages
    Rotate {
        /// PDF file to rotate
        path: PathBuf,

        /// Clockwise rotation in degrees
        #[arg(short, long, value_enum)]
        rotation: Rotation,

        /// Pages to rotate (e.g., "1,3-4"); all pages when omitted
        #[arg(short, long)]
        pages: Option<String>,

        /// Output file [default: rotated-<name>]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite a PDF with compressed streams
    Compress {
        /// PDF file to compress
        path: PathBuf,

        /// How aggressively to clean up the file
        #[arg(short, long, value_enum, default_value_t = CompressionLevel::Medium)]
        level: CompressionLevel,

        /// Output file [default: compressed-<name>]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a PDF to plain text
    #[command(alias = "to-text")]
    Text {
        /// PDF file to convert
        path: PathBuf,

        /// Pages to convert; all pages when omitted
        #[arg(short, long)]
        pages: Option<String>,

        /// Output file [default: <name>.txt]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render pages to JPG: one page gives a .jpg, several a .zip of them
    #[command(alias = "to-jpg")]
    Images {
        /// PDF file to render
        path: PathBuf,

        /// Pages to render; all pages when omitted
        #[arg(short, long)]
        pages: Option<String>,

        /// Image size relative to the page
        #[arg(short, long, value_enum, default_value_t = ImageScale::High)]
        scale: ImageScale,

        /// Output file [default: <name>.jpg or <name>_images.zip]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which pages a page specification selects in a PDF
    Pages {
        /// PDF file to resolve against
        path: PathBuf,

        /// Page specification (e.g., "1-5,8")
        pages: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rotate() {
        let cli = Cli::try_parse_from(["pdftools", "rotate", "in.pdf", "-r", "270", "-p", "1-3"])
            .unwrap();
        match cli.command {
            Commands::Rotate {
                rotation, pages, ..
            } => {
                assert_eq!(rotation, Rotation::Left);
                assert_eq!(pages.as_deref(), Some("1-3"));
            }
            _ => panic!("expected rotate"),
        }
    }

    #[test]
    fn test_parse_rejects_odd_rotation() {
        assert!(Cli::try_parse_from(["pdftools", "rotate", "in.pdf", "-r", "45"]).is_err());
    }

    #[test]
    fn test_split_alias() {
        let cli = Cli::try_parse_from(["pdftools", "split", "in.pdf", "2-4"]).unwrap();
        assert!(matches!(cli.command, Commands::Extract { ref pages, .. } if pages == "2-4"));
    }

    #[test]
    fn test_parse_images() {
        let cli = Cli::try_parse_from(["pdftools", "to-jpg", "in.pdf", "-s", "2.0"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Images {
                scale: ImageScale::Highest,
                pages: None,
                ..
            }
        ));

        let cli = Cli::try_parse_from(["pdftools", "images", "in.pdf", "-p", "1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Images {
                scale: ImageScale::High,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["pdftools", "images", "in.pdf", "-s", "3"]).is_err());
    }

    #[test]
    fn test_compress_default_level() {
        let cli = Cli::try_parse_from(["pdftools", "compress", "in.pdf"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Compress {
                level: CompressionLevel::Medium,
                ..
            }
        ));
    }
}
