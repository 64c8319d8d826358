//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - EmbeddingProvider: text to vector strategies
//! - VectorBackend: vector storage and similarity search
//! - VerdictProvider: the language-model collaborator
//!
//! These traits keep the services independent of which backend or
//! embedding strategy is configured.

pub mod embedding;
pub mod vector_backend;
pub mod verdict;

pub use embedding::EmbeddingProvider;
pub use vector_backend::VectorBackend;
pub use verdict::VerdictProvider;
