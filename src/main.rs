mod cli;
mod commands;
mod mcp;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout belongs to command output and the MCP transport
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Mcp => {
            tracing::info!("starting MCP server v{}", env!("CARGO_PKG_VERSION"));
            mcp::run_server().await?;
        }
        Commands::Merge { inputs, output } => {
            commands::merge::run(&inputs, output.as_deref())?;
        }
        Commands::Extract {
            path,
            pages,
            output,
        } => {
            commands::extract::run(&path, &pages, output.as_deref())?;
        }
        Commands::Rotate {
            path,
            rotation,
            pages,
            output,
        } => {
            commands::rotate::run(&path, rotation, pages.as_deref(), output.as_deref())?;
        }
        Commands::Compress {
            path,
            level,
            output,
        } => {
            commands::compress::run(&path, level, output.as_deref())?;
        }
        Commands::Text {
            path,
            pages,
            output,
        } => {
            commands::text::run(&path, pages.as_deref(), output.as_deref())?;
        }
        Commands::Images {
            path,
            pages,
            scale,
            output,
        } => {
            commands::images::run(&path, pages.as_deref(), scale, output.as_deref())?;
        }
        Commands::Pages { path, pages } => {
            commands::pages::run(&path, &pages)?;
        }
    }

    Ok(())
}
