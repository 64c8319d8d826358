//! Chunk command: split text into overlapping sentence chunks.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{ChunkingConfig, ContentKind};
use crate::services::TextChunker;

#[derive(Debug, Serialize)]
pub struct ChunkOutput {
    pub kind: ContentKind,
    pub max_chunk_size: usize,
    pub overlap_words: usize,
    pub chunks: Vec<String>,
}

impl CommandOutput for ChunkOutput {
    fn to_human(&self) -> String {
        format!(
            "{} chunk(s), max {} chars, {} word overlap\n{}",
            self.chunks.len(),
            self.max_chunk_size,
            self.overlap_words,
            TableFormatter::new().format_chunks(&self.chunks)
        )
    }
}

/// Chunking settings: the preset for `kind` with any overrides applied
pub fn resolve_config(
    kind: ContentKind,
    max_chunk_size: Option<usize>,
    overlap: Option<usize>,
) -> ChunkingConfig {
    let preset = ChunkingConfig::for_content(kind);
    ChunkingConfig {
        max_chunk_size: max_chunk_size.unwrap_or(preset.max_chunk_size),
        overlap_words: overlap.unwrap_or(preset.overlap_words),
    }
}

pub fn execute(
    text: Option<String>,
    file: Option<PathBuf>,
    kind: ContentKind,
    max_chunk_size: Option<usize>,
    overlap: Option<usize>,
    json_mode: bool,
) -> Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide text to chunk or --file"),
    };

    let config = resolve_config(kind, max_chunk_size, overlap);
    let chunker = TextChunker::new(config).map_err(|e| anyhow::anyhow!(e))?;

    output(
        &ChunkOutput {
            kind,
            max_chunk_size: config.max_chunk_size,
            overlap_words: config.overlap_words,
            chunks: chunker.chunk(&text),
        },
        json_mode,
    );
    Ok(())
}
