//! Local vector database backend on the Chroma HTTP API.
//!
//! The collection is fetched or created once with cosine space. Chroma
//! reports cosine distance, which is converted to similarity as `1 - d`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use super::{api_error, build_client, check_dimension, map_request_error, without_nulls};
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::{
    BackendKind, ChromaConfig, Metadata, NamespaceStats, RecordType, ScoredRecord, StoreStats,
    VectorRecord, TYPE_KEY,
};
use crate::domain::ports::VectorBackend;

/// Chroma collection backend.
pub struct ChromaBackend {
    client: reqwest::Client,
    base_url: String,
    collection_id: String,
    collection_name: String,
    dimension: usize,
    timeout_secs: u64,
}

impl ChromaBackend {
    /// Get or create the configured collection.
    pub async fn initialize(
        config: &ChromaConfig,
        dimension: usize,
        timeout_secs: u64,
    ) -> StoreResult<Self> {
        let client = build_client(timeout_secs)?;
        let base_url = config.url.trim_end_matches('/').to_string();

        let response = client
            .post(format!("{base_url}/api/v1/collections"))
            .json(&json!({
                "name": config.collection_name,
                "metadata": {"hnsw:space": "cosine"},
                "get_or_create": true,
            }))
            .send()
            .await
            .map_err(|e| match map_request_error(e, timeout_secs) {
                StoreError::Request(msg) => {
                    StoreError::Initialization(format!("Chroma unreachable at {base_url}: {msg}"))
                }
                other => other,
            })?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let collection: Collection = response
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        tracing::info!(
            collection = %collection.name,
            id = %collection.id,
            "Chroma collection ready"
        );

        Ok(Self {
            client,
            base_url,
            collection_id: collection.id,
            collection_name: collection.name,
            dimension,
            timeout_secs,
        })
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn collection_url(&self, action: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{action}",
            self.base_url, self.collection_id
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> StoreResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout_secs))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }
}

#[async_trait]
impl VectorBackend for ChromaBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LocalVectorDb
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, record: VectorRecord) -> StoreResult<()> {
        check_dimension(self.dimension, record.dimension())?;

        let (id, embedding, metadata) = record.into_parts();
        let body = UpsertRequest {
            ids: vec![id],
            embeddings: vec![embedding],
            metadatas: vec![without_nulls(metadata)],
        };

        self.send(self.client.post(self.collection_url("upsert")).json(&body))
            .await?;
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

        let body = QueryRequest {
            query_embeddings: vec![vector],
            n_results: top_k,
            filter: filter.map(|t| json!({ TYPE_KEY: t.as_str() })),
            include: &["metadatas", "distances"],
        };

        let result: QueryResponse = self
            .send(self.client.post(self.collection_url("query")).json(&body))
            .await?
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        let ids = result.ids.into_iter().next().unwrap_or_default();
        let distances = result
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();
        let mut metadatas = result
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default()
            .into_iter();

        if distances.len() != ids.len() {
            return Err(StoreError::MalformedResponse(format!(
                "{} ids but {} distances",
                ids.len(),
                distances.len()
            )));
        }

        let mut hits: Vec<ScoredRecord> = ids
            .into_iter()
            .zip(distances)
            .map(|(id, distance)| ScoredRecord {
                id,
                score: 1.0 - distance,
                metadata: metadatas.next().flatten().unwrap_or_default(),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let count: u64 = self
            .send(self.client.get(self.collection_url("count")))
            .await?
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        let mut namespaces = BTreeMap::new();
        namespaces.insert(
            self.collection_name.clone(),
            NamespaceStats {
                vector_count: count,
            },
        );

        Ok(StoreStats {
            total_vectors: count,
            dimension: self.dimension,
            index_fullness: 0.0,
            namespaces,
        })
    }
}

// -- Chroma API request/response types --

#[derive(Debug, Deserialize)]
struct Collection {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct UpsertRequest {
    ids: Vec<String>,
    embeddings: Vec<Vec<f32>>,
    metadatas: Vec<Metadata>,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query_embeddings: Vec<&'a [f32]>,
    n_results: usize,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    filter: Option<serde_json::Value>,
    include: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<Metadata>>>>,
}
