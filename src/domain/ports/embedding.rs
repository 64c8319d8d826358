//! Embedding provider port for vector generation.
//!
//! Defines the trait for strategies that turn text into a fixed-dimension
//! vector. The generator service owns fallback policy; providers only report
//! what went wrong.

use async_trait::async_trait;

use crate::domain::errors::EmbeddingResult;

/// Trait for embedding strategies (local or remote).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "simple", "openai", "huggingface").
    fn name(&self) -> &'static str;

    /// Embedding dimension produced by this provider.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;
}
