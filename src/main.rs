mod chapters;
mod cli;
mod commands;
mod mcp;
mod pdf;
mod selection;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path)?;
        }
        Commands::Toc { path } => {
            commands::toc::run(&path)?;
        }
        Commands::Split {
            path,
            output_dir,
            chapters,
            list_only,
        } => {
            let options = commands::split::SplitOptions {
                output_dir,
                chapters,
                list_only,
            };
            commands::split::run(&path, &options)?;
        }
    }

    Ok(())
}
