//! Embedding generator with fallback policy.
//!
//! Wraps the configured strategy. Remote strategy failures fall back to the
//! local simple strategy for that one call; if the simple strategy itself
//! fails, a zero vector of the configured dimension is returned so retrieval
//! can continue in degraded mode.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::embeddings::{
    HuggingFaceEmbeddingProvider, OpenAiEmbeddingProvider, RemoteSettings, SimpleEmbedder,
};
use crate::domain::errors::{EmbeddingError, EmbeddingResult};
use crate::domain::models::{EmbeddingConfig, EmbeddingStrategy};
use crate::domain::ports::EmbeddingProvider;

/// Produces fixed-dimension embeddings for any text.
pub struct EmbeddingGenerator {
    /// Remote strategy, absent when `simple` is configured
    remote: Option<Arc<dyn EmbeddingProvider>>,
    simple: SimpleEmbedder,
    dimension: usize,
    timeout: Duration,
    fallbacks: AtomicU64,
}

impl EmbeddingGenerator {
    /// Generator using only the simple strategy
    pub fn simple(dimension: usize) -> Self {
        Self {
            remote: None,
            simple: SimpleEmbedder::new(dimension),
            dimension,
            timeout: Duration::from_secs(15),
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Generator with a remote primary strategy
    pub fn with_remote(
        remote: Arc<dyn EmbeddingProvider>,
        dimension: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            remote: Some(remote),
            simple: SimpleEmbedder::new(dimension),
            dimension,
            timeout,
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Select the strategy once from configuration.
    ///
    /// A remote strategy without credentials resolves to `simple`.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        let settings = RemoteSettings {
            dimension: config.dimension,
            timeout_secs: config.timeout_secs,
            requests_per_second: config.requests_per_second,
        };

        let remote: EmbeddingResult<Arc<dyn EmbeddingProvider>> = match config.strategy {
            EmbeddingStrategy::Simple => {
                tracing::info!(dimension = config.dimension, "using simple embedding strategy");
                return Self::simple(config.dimension);
            }
            EmbeddingStrategy::OpenAi => {
                OpenAiEmbeddingProvider::new(config.openai.clone(), settings)
                    .map(|p| Arc::new(p) as Arc<dyn EmbeddingProvider>)
            }
            EmbeddingStrategy::HuggingFace => {
                HuggingFaceEmbeddingProvider::new(config.huggingface.clone(), settings)
                    .map(|p| Arc::new(p) as Arc<dyn EmbeddingProvider>)
            }
        };

        match remote {
            Ok(provider) => {
                tracing::info!(
                    strategy = %config.strategy,
                    dimension = config.dimension,
                    "using remote embedding strategy"
                );
                Self::with_remote(
                    provider,
                    config.dimension,
                    Duration::from_secs(config.timeout_secs),
                )
            }
            Err(e) => {
                tracing::warn!(
                    strategy = %config.strategy,
                    error = %e,
                    "remote embedding strategy unavailable, using simple strategy"
                );
                Self::simple(config.dimension)
            }
        }
    }

    /// Active strategy name
    pub fn strategy_name(&self) -> &'static str {
        self.remote
            .as_ref()
            .map_or_else(|| self.simple.name(), |remote| remote.name())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of calls that did not use the configured strategy's own output
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Embed `text`.
    ///
    /// Only fails when no vector of the configured dimension could be produced
    /// at all.
    pub async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if let Some(remote) = &self.remote {
            match self.embed_remote(remote.as_ref(), text).await {
                Ok(embedding) => return Ok(embedding),
                Err(e) => {
                    self.fallbacks.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        provider = remote.name(),
                        error = %e,
                        "embedding provider failed, falling back to simple strategy"
                    );
                }
            }
        }

        let embedding = match self.simple.embed_text(text) {
            Ok(embedding) => embedding,
            Err(e) => {
                self.fallbacks.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    error = %e,
                    "simple embedding failed, returning zero vector"
                );
                vec![0.0; self.dimension]
            }
        };

        if embedding.is_empty() || embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }

    async fn embed_remote(
        &self,
        remote: &dyn EmbeddingProvider,
        text: &str,
    ) -> EmbeddingResult<Vec<f32>> {
        let embedding = tokio::time::timeout(self.timeout, remote.embed(text))
            .await
            .map_err(|_| EmbeddingError::Timeout(self.timeout.as_secs()))??;

        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        if embedding.iter().any(|x| !x.is_finite()) {
            return Err(EmbeddingError::MalformedResponse(
                "non-finite embedding component".to_string(),
            ));
        }

        Ok(embedding)
    }
}
