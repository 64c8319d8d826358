//! Adapters for embedding strategies and vector storage backends.

pub mod embeddings;
pub mod vector;
