//! Backend selection.
//!
//! Builds the configured backend once at startup. A backend that cannot be
//! brought up is reported as degraded so the caller can fall back to memory.

use std::sync::Arc;

use super::{ChromaBackend, MemoryBackend, PineconeBackend};
use crate::domain::models::{BackendKind, VectorStoreConfig};
use crate::domain::ports::VectorBackend;

/// Outcome of bringing up the configured backend
pub enum BackendInit {
    /// The configured backend is usable
    Ready(Arc<dyn VectorBackend>),
    /// The configured backend failed to initialize
    Degraded {
        /// Backend that was requested
        requested: BackendKind,
        /// Why it could not be used
        reason: String,
    },
}

impl BackendInit {
    /// Resolve to a usable backend, substituting memory when degraded
    pub fn or_memory(self, config: &VectorStoreConfig) -> Arc<dyn VectorBackend> {
        match self {
            Self::Ready(backend) => backend,
            Self::Degraded { requested, reason } => {
                tracing::warn!(
                    requested = %requested,
                    reason = %reason,
                    capacity = config.memory_capacity,
                    "vector backend unavailable, falling back to in-memory store"
                );
                Arc::new(MemoryBackend::new(config.dimension, config.memory_capacity))
            }
        }
    }
}

/// Bring up the backend named in `config`.
pub async fn create_backend(config: &VectorStoreConfig) -> BackendInit {
    let requested = config.backend;
    let result = match requested {
        BackendKind::Memory => {
            tracing::info!(capacity = config.memory_capacity, "using in-memory vector store");
            return BackendInit::Ready(Arc::new(MemoryBackend::new(
                config.dimension,
                config.memory_capacity,
            )));
        }
        BackendKind::ManagedIndex => PineconeBackend::initialize(
            &config.pinecone,
            config.dimension,
            config.request_timeout_secs,
        )
        .await
        .map(|b| {
            tracing::info!(index = b.index_name(), "using managed index vector store");
            Arc::new(b) as Arc<dyn VectorBackend>
        }),
        BackendKind::LocalVectorDb => ChromaBackend::initialize(
            &config.chroma,
            config.dimension,
            config.request_timeout_secs,
        )
        .await
        .map(|b| {
            tracing::info!(
                collection = b.collection_name(),
                "using local vector database store"
            );
            Arc::new(b) as Arc<dyn VectorBackend>
        }),
    };

    match result {
        Ok(backend) => BackendInit::Ready(backend),
        Err(e) => BackendInit::Degraded {
            requested,
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_is_ready() {
        let config = VectorStoreConfig::default();
        match create_backend(&config).await {
            BackendInit::Ready(backend) => assert_eq!(backend.kind(), BackendKind::Memory),
            BackendInit::Degraded { .. } => panic!("memory backend should always be ready"),
        }
    }

    #[tokio::test]
    async fn test_pinecone_without_key_degrades() {
        let config = VectorStoreConfig {
            backend: BackendKind::ManagedIndex,
            ..Default::default()
        };

        let init = create_backend(&config).await;
        assert!(matches!(
            init,
            BackendInit::Degraded {
                requested: BackendKind::ManagedIndex,
                ..
            }
        ));

        let backend = init.or_memory(&config);
        assert_eq!(backend.kind(), BackendKind::Memory);
        assert_eq!(backend.dimension(), 384);
    }

    #[tokio::test]
    async fn test_unreachable_chroma_degrades() {
        let mut config = VectorStoreConfig {
            backend: BackendKind::LocalVectorDb,
            request_timeout_secs: 2,
            ..Default::default()
        };
        config.chroma.url = "http://127.0.0.1:1".to_string();

        let backend = create_backend(&config).await.or_memory(&config);
        assert_eq!(backend.kind(), BackendKind::Memory);
    }

    #[tokio::test]
    async fn test_reachable_chroma_is_ready() {
        let mut server = Server::new_async().await;
        let _collection = server
            .mock("POST", "/api/v1/collections")
            .with_status(200)
            .with_body(json!({"id": "col-1", "name": "news-factcheck-collection"}).to_string())
            .create_async()
            .await;
        let mut config = VectorStoreConfig {
            backend: BackendKind::LocalVectorDb,
            ..Default::default()
        };
        config.chroma.url = server.url();

        match create_backend(&config).await {
            BackendInit::Ready(backend) => assert_eq!(backend.kind(), BackendKind::LocalVectorDb),
            BackendInit::Degraded { reason, .. } => panic!("chroma should be ready: {reason}"),
        }
    }
}
