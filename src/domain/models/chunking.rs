//! Text chunking domain models
//!
//! Chunk sizes are measured in characters; overlap is measured in words
//! carried over from the end of the previous chunk.

use serde::{Deserialize, Serialize};

/// What kind of content is being chunked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Long-form news articles
    Article,
    /// Claims and any other short text
    Generic,
}

/// Configuration for sentence-based chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters
    pub max_chunk_size: usize,

    /// Number of trailing words of a closed chunk that open the next one
    pub overlap_words: usize,
}

impl ChunkingConfig {
    /// Article preset: 1000 characters, 100 words of overlap
    pub const fn article() -> Self {
        Self {
            max_chunk_size: 1000,
            overlap_words: 100,
        }
    }

    /// Generic preset: 512 characters, 50 words of overlap
    pub const fn generic() -> Self {
        Self {
            max_chunk_size: 512,
            overlap_words: 50,
        }
    }

    /// Preset for a content kind
    pub const fn for_content(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Article => Self::article(),
            ContentKind::Generic => Self::generic(),
        }
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::generic()
    }
}
