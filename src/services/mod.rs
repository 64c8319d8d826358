//! Service layer
//!
//! Coordinates the adapters behind the domain ports:
//! - TextChunker: sentence chunking with word overlap
//! - EmbeddingGenerator: strategy selection and fallback
//! - VectorStore: failure-absorbing backend facade
//! - RetrievalOrchestrator: claim retrieval and indexing
//! - FactCheckService: the claim check pipeline

pub mod chunker;
pub mod context;
pub mod embedding_generator;
pub mod fact_check;
pub mod retrieval;
pub mod vector_store;

pub use chunker::{chunk_text, TextChunker};
pub use context::{assemble_context, EvidenceContext};
pub use embedding_generator::EmbeddingGenerator;
pub use fact_check::{FactCheckOutcome, FactCheckService};
pub use retrieval::{ClaimRetrieval, RetrievalOrchestrator};
pub use vector_store::VectorStore;
