use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfpick")]
#[command(about = "PDF page picker: browse page previews and slice page subsets, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Storage directory holding the managed PDFs
    #[arg(long, env = "PDFPICK_STORE", default_value = "storage", global = true)]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server (interactive page-picking session)
    Mcp,

    /// List documents in the store
    Ls,

    /// Copy a PDF into the store
    Add {
        /// PDF file to add
        path: PathBuf,

        /// Display name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Stream page previews for a document, batch by batch
    Pages {
        /// Document id
        id: String,

        /// Pages fetched per batch
        #[arg(short, long, default_value = "8")]
        batch_size: u32,
    },

    /// Create a new document from selected pages
    Slice {
        /// Document id
        id: String,

        /// Page pattern (e.g., "1, 3-5, 10")
        pattern: Option<String>,

        /// Additional individual pages, on top of the pattern
        #[arg(short, long = "page")]
        pages: Vec<u32>,
    },

    /// Combine documents into a new one
    Merge {
        /// Document ids to merge, in order
        #[arg(required = true)]
        ids: Vec<String>,

        /// Display name for the merged document
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Rotate pages and store the result as a new document
    Rotate {
        /// Document id
        id: String,

        /// Page pattern (e.g., "1, 3-5")
        pages: String,

        /// Rotation angle in degrees, a multiple of 90
        #[arg(short, long, default_value = "90")]
        angle: i32,
    },

    /// Remove a document from the store
    Rm {
        /// Document id
        id: String,
    },
}
