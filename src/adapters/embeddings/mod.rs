//! Embedding strategy adapters.
//!
//! `simple` runs in-process; `openai` and `huggingface` call remote APIs
//! through a shared timeout-bounded HTTP client and an outbound rate limiter.

pub mod huggingface;
pub mod openai;
pub mod simple;

pub use huggingface::HuggingFaceEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
pub use simple::SimpleEmbedder;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::domain::errors::{EmbeddingError, EmbeddingResult};
use crate::domain::models::truncate_chars;

/// Settings shared by the remote providers
#[derive(Debug, Clone, Copy)]
pub struct RemoteSettings {
    /// Expected output dimension
    pub dimension: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Outbound requests allowed per second
    pub requests_per_second: u32,
}

pub(crate) fn build_client(timeout_secs: u64) -> EmbeddingResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| EmbeddingError::Internal(format!("Failed to build HTTP client: {e}")))
}

pub(crate) fn build_rate_limiter(requests_per_second: u32) -> DefaultDirectRateLimiter {
    let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    RateLimiter::direct(Quota::per_second(rps))
}

/// Map a transport error, keeping timeouts distinguishable
pub(crate) fn map_request_error(err: reqwest::Error, timeout_secs: u64) -> EmbeddingError {
    if err.is_timeout() {
        EmbeddingError::Timeout(timeout_secs)
    } else {
        EmbeddingError::from(err)
    }
}

/// Read a non-success response into an API error
pub(crate) async fn api_error(response: reqwest::Response) -> EmbeddingError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());
    EmbeddingError::Api { status, body }
}

/// Cut input to a provider's character cap
pub(crate) fn cap_input(text: &str, max_chars: usize) -> String {
    truncate_chars(text, max_chars)
}

pub(crate) fn check_dimension(vector: Vec<f32>, expected: usize) -> EmbeddingResult<Vec<f32>> {
    if vector.len() == expected {
        Ok(vector)
    } else {
        Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: vector.len(),
        })
    }
}
