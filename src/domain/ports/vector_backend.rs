use async_trait::async_trait;

use crate::domain::errors::StoreResult;
use crate::domain::models::{BackendKind, RecordType, ScoredRecord, StoreStats, VectorRecord};

/// Storage interface over a concrete vector backend
///
/// Implementations are constructed by their own `initialize` function and
/// selected once by the backend factory. Errors are reported as-is; the
/// `VectorStore` service decides which ones to absorb.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> BackendKind;

    /// Dimension the backend was provisioned with
    fn dimension(&self) -> usize;

    /// Insert or overwrite a record by id
    ///
    /// # Returns
    /// * `Ok(())` once the record is visible to queries
    /// * `Err(StoreError::DimensionMismatch)` if the embedding has the wrong length
    /// * `Err(_)` on backend failure
    async fn upsert(&self, record: VectorRecord) -> StoreResult<()>;

    /// Rank stored records by cosine similarity to `vector`
    ///
    /// # Arguments
    /// * `vector` - Query embedding
    /// * `top_k` - Maximum number of results
    /// * `filter` - Optional `type` metadata restriction
    ///
    /// # Returns
    /// * `Ok(Vec<ScoredRecord>)` - At most `top_k` hits, scores non-increasing
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<RecordType>,
    ) -> StoreResult<Vec<ScoredRecord>>;

    /// Stored count and dimension
    async fn stats(&self) -> StoreResult<StoreStats>;
}
