//! Domain errors for the VeriFact retrieval core.
//!
//! Most of these never reach a caller: the embedding generator and the vector
//! store facade absorb them and degrade. Only [`RetrievalError`] and
//! [`FactCheckError`] cross the orchestrator boundary.

use thiserror::Error;

/// Errors raised while turning text into a vector.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Missing credentials for {provider}")]
    MissingCredentials { provider: &'static str },

    #[error("Embedding request failed: {0}")]
    Request(String),

    #[error("Embedding API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding request timed out after {0}s")]
    Timeout(u64),

    #[error("Internal embedding failure: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Errors raised by a vector storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Backend initialization failed: {0}")]
    Initialization(String),

    #[error("Backend request failed: {0}")]
    Request(String),

    #[error("Backend API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("Vector dimension mismatch: backend holds {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Backend call timed out after {0}s")]
    Timeout(u64),

    #[error("Index {index} not ready after {waited_secs}s")]
    NotReady { index: String, waited_secs: u64 },
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Hard failures of the retrieval orchestrator.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Claim embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Failures of the end-to-end claim check pipeline.
#[derive(Debug, Error)]
pub enum FactCheckError {
    #[error("Claim is required")]
    EmptyClaim,

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("Verdict generation failed: {0}")]
    Verdict(String),
}
