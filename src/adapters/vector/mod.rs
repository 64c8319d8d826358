//! Vector storage backends.
//!
//! `pinecone` is the managed index, `chroma` the self-hosted vector database,
//! and `memory` the in-process fallback. The factory picks one at startup.

pub mod chroma;
pub mod factory;
pub mod memory;
pub mod pinecone;

pub use chroma::ChromaBackend;
pub use factory::{create_backend, BackendInit};
pub use memory::{MemoryBackend, DEFAULT_MEMORY_CAPACITY};
pub use pinecone::PineconeBackend;

use std::time::Duration;

use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::Metadata;

pub(crate) fn build_client(timeout_secs: u64) -> StoreResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| StoreError::Initialization(format!("Failed to build HTTP client: {e}")))
}

pub(crate) fn map_request_error(err: reqwest::Error, timeout_secs: u64) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout(timeout_secs)
    } else {
        StoreError::from(err)
    }
}

/// Read a non-success response into an API error
pub(crate) async fn api_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());
    StoreError::Api { status, body }
}

/// Remote stores reject null metadata values
pub(crate) fn without_nulls(mut metadata: Metadata) -> Metadata {
    metadata.retain(|_, value| !value.is_null());
    metadata
}

pub(crate) const fn check_dimension(expected: usize, actual: usize) -> StoreResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(StoreError::DimensionMismatch { expected, actual })
    }
}
