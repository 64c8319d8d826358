//! Sentence-based text chunking
//!
//! Splits long text into chunks of whole sentences. When a chunk is closed,
//! the next one opens with the closed chunk's trailing words so neighbouring
//! chunks share context.

use crate::domain::models::{truncate_chars, ChunkingConfig, ContentKind};

/// Splits text into overlapping sentence chunks
#[derive(Debug, Clone, Copy, Default)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    /// Create a chunker with explicit settings
    pub fn new(config: ChunkingConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Chunker preset for a content kind
    pub const fn for_content(kind: ContentKind) -> Self {
        Self {
            config: ChunkingConfig::for_content(kind),
        }
    }

    pub const fn config(&self) -> ChunkingConfig {
        self.config
    }

    /// Chunk text with this chunker's settings
    pub fn chunk(&self, text: &str) -> Vec<String> {
        chunk_text(text, self.config.max_chunk_size, self.config.overlap_words)
    }
}

/// Split `text` into chunks of at most `max_chunk_size` characters.
///
/// Sentences are never split; a sentence longer than the limit becomes its
/// own chunk. Each chunk after the first starts with the last `overlap_words`
/// words of the chunk before it. Text without any sentence yields a single
/// chunk truncated to the limit.
pub fn chunk_text(text: &str, max_chunk_size: usize, overlap_words: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        if current.is_empty() {
            current = sentence.to_string();
            continue;
        }

        let sentence_len = sentence.chars().count();
        if current.chars().count() + 1 + sentence_len <= max_chunk_size {
            current.push(' ');
            current.push_str(sentence);
            continue;
        }

        let overlap = trailing_words(&current, overlap_words);
        chunks.push(std::mem::take(&mut current));

        current = if overlap.is_empty() || sentence_len > max_chunk_size {
            sentence.to_string()
        } else {
            format!("{overlap} {sentence}")
        };
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    if chunks.is_empty() {
        chunks.push(truncate_chars(text, max_chunk_size));
    }

    chunks
}

/// Sentences ending in `.`, `!` or `?`, punctuation kept, whitespace trimmed
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_terminal(c) {
            continue;
        }
        let mut end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if !is_terminal(next) {
                break;
            }
            end = next_idx + next.len_utf8();
            chars.next();
        }
        push_sentence(&mut sentences, &text[start..end]);
        start = end;
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

const fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, segment: &'a str) {
    let trimmed = segment.trim();
    if trimmed.chars().any(|c| !is_terminal(c) && !c.is_whitespace()) {
        sentences.push(trimmed);
    }
}

fn trailing_words(text: &str, count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    let skip = words.len().saturating_sub(count);
    words[skip..].join(" ")
}
