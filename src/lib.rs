//! VeriFact - retrieval core for claim verification
//!
//! Turns articles and past verdicts into vectors and finds the evidence most
//! similar to a new claim.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): records, configuration, errors and port traits
//! - **Adapters** (`adapters`): embedding providers and vector backends
//! - **Service Layer** (`services`): chunking, embedding fallback, the
//!   failure-absorbing vector store and the retrieval orchestrator
//! - **Infrastructure Layer** (`infrastructure`): configuration loading and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use verifact::{Config, EmbeddingGenerator, RetrievalOrchestrator, VectorStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let embeddings = Arc::new(EmbeddingGenerator::from_config(&config.embedding));
//!     let store = Arc::new(VectorStore::initialize(&config.vector_store).await);
//!     let retrieval = RetrievalOrchestrator::new(embeddings, store, config.retrieval);
//!
//!     let evidence = retrieval.retrieve_for_claim("The sky is green").await?;
//!     println!("{} similar articles", evidence.similar_articles.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{EmbeddingError, FactCheckError, RetrievalError, StoreError};
pub use domain::models::{
    Article, BackendKind, ChunkingConfig, Config, ContentKind, RecordType, ScoredRecord,
    StoreStats, Verdict, VerdictLabel, VectorRecord,
};
pub use domain::ports::{EmbeddingProvider, VectorBackend, VerdictProvider};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::LoggerImpl;
pub use services::{
    EmbeddingGenerator, FactCheckService, RetrievalOrchestrator, TextChunker, VectorStore,
};
