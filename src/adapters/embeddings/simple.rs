//! Local hashed bag-of-words embedding.
//!
//! Lower-cases and tokenizes the text, drops English stop words, weights each
//! remaining token longer than two characters by `1 / (position + 1)`, and
//! hashes every distinct word into one of `dimension` buckets. Collisions merge
//! unrelated words; this is a coarse lexical sketch, not a semantic model.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use crate::domain::errors::{EmbeddingError, EmbeddingResult};
use crate::domain::ports::EmbeddingProvider;
use crate::domain::similarity::l2_norm;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "cannot", "could", "couldn", "did", "didn",
        "do", "does", "doesn", "doing", "don", "down", "during", "each", "few", "for", "from",
        "further", "had", "hadn", "has", "hasn", "have", "haven", "having", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into",
        "is", "isn", "it", "its", "itself", "just", "let", "ll", "me", "more", "most", "mustn",
        "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
        "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "re", "same",
        "shan", "she", "should", "shouldn", "so", "some", "such", "than", "that", "the",
        "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
        "those", "through", "to", "too", "under", "until", "up", "ve", "very", "was", "wasn",
        "we", "were", "weren", "what", "when", "where", "which", "while", "who", "whom",
        "why", "will", "with", "won", "would", "wouldn", "you", "your", "yours", "yourself",
        "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Deterministic local embedding strategy.
#[derive(Debug, Clone)]
pub struct SimpleEmbedder {
    dimension: usize,
}

impl SimpleEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Compute the embedding synchronously.
    ///
    /// Degenerate input (nothing left after filtering) yields the zero vector.
    pub fn embed_text(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if self.dimension == 0 {
            return Err(EmbeddingError::Internal(
                "embedding dimension is zero".to_string(),
            ));
        }

        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = tokenize(&lowered)
            .filter(|token| !STOP_WORDS.contains(token))
            .collect();

        // Position counts every surviving token, short ones included
        let mut weights: BTreeMap<&str, f64> = BTreeMap::new();
        for (position, token) in tokens.iter().enumerate() {
            if token.chars().count() > 2 {
                *weights.entry(*token).or_insert(0.0) += 1.0 / (position as f64 + 1.0);
            }
        }

        let mut vector = vec![0.0_f64; self.dimension];
        for (word, weight) in weights {
            vector[bucket(word, self.dimension)] += weight;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        if !norm.is_finite() {
            return Err(EmbeddingError::Internal(format!(
                "non-finite vector norm for {} tokens",
                tokens.len()
            )));
        }

        #[allow(clippy::cast_possible_truncation)]
        let embedding = if norm > 0.0 {
            vector.iter().map(|x| (x / norm) as f32).collect()
        } else {
            vec![0.0_f32; self.dimension]
        };

        debug_assert!(norm == 0.0 || (l2_norm(&embedding) - 1.0).abs() < 1e-4);
        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for SimpleEmbedder {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.embed_text(text)
    }
}

/// Split on anything that is not a letter, digit or underscore
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

/// 32-bit `(h << 5) - h + unit` string hash over UTF-16 code units
fn string_hash(word: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in word.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

fn bucket(word: &str, dimension: usize) -> usize {
    string_hash(word) as usize % dimension
}
