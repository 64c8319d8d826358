//! Failure-absorbing facade over the active vector backend.
//!
//! Query failures return an empty list, upsert failures are logged and
//! dropped, and stats failures return zeroed stats. Every backend call is
//! bounded by a timeout.

use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::adapters::vector::create_backend;
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::{
    Article, BackendKind, RecordType, ScoredRecord, StoreStats, VectorRecord, VectorStoreConfig,
    Verdict,
};
use crate::domain::ports::VectorBackend;

/// Vector store used by the retrieval services
pub struct VectorStore {
    backend: Arc<dyn VectorBackend>,
    timeout: Duration,
}

impl VectorStore {
    pub fn new(backend: Arc<dyn VectorBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Bring up the configured backend, degrading to memory on failure.
    ///
    /// Never fails: a backend that cannot be initialized is replaced by the
    /// in-memory store.
    pub async fn initialize(config: &VectorStoreConfig) -> Self {
        let backend = create_backend(config).await.or_memory(config);
        tracing::info!(
            configured = %config.backend,
            active = %backend.kind(),
            dimension = backend.dimension(),
            "vector store initialized"
        );
        Self::new(backend, Duration::from_secs(config.request_timeout_secs))
    }

    /// Backend actually in use
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn dimension(&self) -> usize {
        self.backend.dimension()
    }

    /// Insert or overwrite a record; returns whether the write was committed
    pub async fn upsert(&self, record: VectorRecord) -> bool {
        let id = record.id().to_string();
        match self.bounded(self.backend.upsert(record)).await {
            Ok(()) => {
                tracing::debug!(id = %id, "vector upserted");
                true
            }
            Err(e) => {
                tracing::warn!(
                    id = %id,
                    backend = %self.backend.kind(),
                    error = %e,
                    "vector upsert failed"
                );
                false
            }
        }
    }

    /// Ranked hits for `vector`, empty on any backend failure
    pub async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<RecordType>,
    ) -> Vec<ScoredRecord> {
        match self.bounded(self.backend.query(vector, top_k, filter)).await {
            Ok(hits) => {
                tracing::debug!(
                    top_k,
                    filter = filter.map(|t| t.as_str()),
                    hits = hits.len(),
                    "vector query"
                );
                hits
            }
            Err(e) => {
                tracing::warn!(
                    backend = %self.backend.kind(),
                    filter = filter.map(|t| t.as_str()),
                    error = %e,
                    "vector query failed, returning no results"
                );
                Vec::new()
            }
        }
    }

    pub async fn stats(&self) -> StoreStats {
        match self.bounded(self.backend.stats()).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "vector store stats unavailable");
                StoreStats::empty(self.backend.dimension())
            }
        }
    }

    /// Store an article vector; returns the record id used
    pub async fn index_article(&self, article: &Article, embedding: Vec<f32>) -> (String, bool) {
        let id = article
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("article_{}", Uuid::new_v4()));

        let record = VectorRecord::new(
            id.clone(),
            embedding,
            RecordType::Article,
            article.to_metadata(Utc::now()),
        );
        let stored = self.upsert(record).await;
        (id, stored)
    }

    /// Store a verdict vector for `claim`; returns the record id used
    pub async fn record_fact_check(
        &self,
        claim: &str,
        verdict: &Verdict,
        embedding: Vec<f32>,
    ) -> (String, bool) {
        let id = format!("factcheck_{}", Uuid::new_v4());
        let record = VectorRecord::new(
            id.clone(),
            embedding,
            RecordType::FactCheck,
            verdict.to_metadata(claim, Utc::now()),
        );
        let stored = self.upsert(record).await;
        (id, stored)
    }

    async fn bounded<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout.as_secs()))?
    }
}
