//! In-memory vector backend
//!
//! Holds records in insertion order with a fixed capacity. When full, the
//! oldest record is evicted. Queries are an exhaustive cosine scan.

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::RwLock;

use super::check_dimension;
use crate::domain::errors::StoreResult;
use crate::domain::models::{
    BackendKind, NamespaceStats, RecordType, ScoredRecord, StoreStats, VectorRecord,
};
use crate::domain::ports::VectorBackend;
use crate::domain::similarity::cosine_similarity;

/// Default number of records kept before eviction starts
pub const DEFAULT_MEMORY_CAPACITY: usize = 1000;

/// Process-local vector backend with FIFO eviction
pub struct MemoryBackend {
    records: RwLock<VecDeque<VectorRecord>>,
    capacity: usize,
    dimension: usize,
}

impl MemoryBackend {
    pub fn new(dimension: usize, capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_MEMORY_CAPACITY))),
            capacity: capacity.max(1),
            dimension,
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current record count
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Whether a record with `id` is currently held
    pub async fn contains(&self, id: &str) -> bool {
        self.records.read().await.iter().any(|r| r.id() == id)
    }
}

#[async_trait]
impl VectorBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, record: VectorRecord) -> StoreResult<()> {
        check_dimension(self.dimension, record.dimension())?;

        let mut records = self.records.write().await;
        if let Some(existing) = records.iter_mut().find(|r| r.id() == record.id()) {
            *existing = record;
            return Ok(());
        }

        while records.len() >= self.capacity {
            if let Some(evicted) = records.pop_front() {
                tracing::debug!(id = evicted.id(), "evicted oldest in-memory record");
            }
        }
        records.push_back(record);
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<RecordType>,
    ) -> StoreResult<Vec<ScoredRecord>> {
        check_dimension(self.dimension, vector.len())?;
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let records = self.records.read().await;
        let mut hits: Vec<ScoredRecord> = records
            .iter()
            .filter(|r| filter.is_none_or(|wanted| r.record_type() == Some(wanted)))
            .map(|r| ScoredRecord {
                id: r.id().to_string(),
                score: cosine_similarity(vector, r.embedding()),
                metadata: r.metadata().clone(),
            })
            .collect();
        drop(records);

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let count = self.records.read().await.len();

        let mut namespaces = BTreeMap::new();
        namespaces.insert(
            String::new(),
            NamespaceStats {
                vector_count: count as u64,
            },
        );

        Ok(StoreStats {
            total_vectors: count as u64,
            dimension: self.dimension,
            index_fullness: count as f32 / self.capacity as f32,
            namespaces,
        })
    }
}
