//! Domain layer for the VeriFact retrieval core
//!
//! This module contains the record and configuration models, error types,
//! and the port traits implemented by adapters.

pub mod errors;
pub mod models;
pub mod ports;
pub mod similarity;

pub use errors::{
    EmbeddingError, EmbeddingResult, FactCheckError, RetrievalError, StoreError, StoreResult,
};
