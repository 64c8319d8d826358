//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::models::ContentKind;

#[derive(Parser)]
#[command(name = "verifact")]
#[command(about = "VeriFact - evidence retrieval for claim verification", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Config file to load instead of .verifact/config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split text into overlapping sentence chunks
    Chunk {
        /// Text to chunk (reads --file when omitted)
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Chunking preset
        #[arg(short, long, value_enum, default_value_t = ChunkKind::Generic)]
        kind: ChunkKind,

        /// Override the preset's maximum chunk size in characters
        #[arg(long)]
        max_chunk_size: Option<usize>,

        /// Override the preset's overlap in words
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Embed text with the configured strategy
    Embed {
        /// Text to embed
        text: String,
    },

    /// Index articles into the vector store
    Ingest {
        /// JSON file holding one article or an array of articles
        #[arg(short, long, conflicts_with = "title")]
        file: Option<PathBuf>,

        /// Article title
        #[arg(long, requires = "source", requires = "url")]
        title: Option<String>,

        /// Article description
        #[arg(long, requires = "title")]
        description: Option<String>,

        /// Article body
        #[arg(long, requires = "title")]
        content: Option<String>,

        /// Publisher name
        #[arg(long)]
        source: Option<String>,

        /// Article URL
        #[arg(long)]
        url: Option<String>,

        /// Record id (generated when omitted)
        #[arg(long, requires = "title")]
        id: Option<String>,
    },

    /// Retrieve similar articles and past fact-checks for a claim
    Check {
        /// Claim text
        claim: String,

        /// Index articles from a JSON file first (useful with the memory backend)
        #[arg(short, long)]
        articles: Option<PathBuf>,
    },

    /// Search all records by keywords
    Search {
        /// Keywords, joined with spaces
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Index articles from a JSON file first (useful with the memory backend)
        #[arg(short, long)]
        articles: Option<PathBuf>,
    },

    /// Show vector store statistics
    Stats,
}

/// Chunking preset selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChunkKind {
    /// News articles: 1000 characters, 100 words overlap
    Article,
    /// Anything else: 512 characters, 50 words overlap
    Generic,
}

impl From<ChunkKind> for ContentKind {
    fn from(kind: ChunkKind) -> Self {
        match kind {
            ChunkKind::Article => Self::Article,
            ChunkKind::Generic => Self::Generic,
        }
    }
}
