use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chapsplit")]
#[command(about = "Split PDFs into chapter files along their bookmarks, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server (primary mode)
    Mcp,

    /// Display PDF metadata
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Print the bookmark outline tree
    Toc {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Split a PDF into one file per top-level bookmark
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Output directory for chapter files
        #[arg(short, long, default_value = "chapters")]
        output_dir: PathBuf,

        /// Chapters to extract (e.g., "1,3,5-7"); all chapters if omitted
        #[arg(short, long)]
        chapters: Option<String>,

        /// List chapters without writing any files
        #[arg(short, long)]
        list_only: bool,
    },
}
