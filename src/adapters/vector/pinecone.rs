//! Managed-index backend on the Pinecone REST API.
//!
//! Initialization talks to the control plane: it lists indexes, creates the
//! configured serverless index if absent, and polls until the index reports
//! ready. All record traffic then goes to the index's own data-plane host.

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;

use super::{api_error, build_client, check_dimension, map_request_error, without_nulls};
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::{
    BackendKind, Metadata, NamespaceStats, PineconeConfig, RecordType, ScoredRecord, StoreStats,
    VectorRecord, TYPE_KEY,
};
use crate::domain::ports::VectorBackend;

const API_KEY_HEADER: &str = "Api-Key";
const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";

/// Pinecone serverless index backend.
pub struct PineconeBackend {
    client: reqwest::Client,
    api_key: String,
    api_version: String,
    index_name: String,
    /// Data-plane base URL, scheme included
    host: String,
    dimension: usize,
    timeout_secs: u64,
}

impl PineconeBackend {
    /// Connect to the configured index, creating it if needed.
    ///
    /// Waits up to `readiness_timeout_secs` for a new index to become ready.
    ///
    /// # Returns
    /// * `Ok(Self)` - The index is ready for traffic
    /// * `Err(StoreError::Initialization)` - Missing key or incompatible index
    /// * `Err(StoreError::NotReady)` - The index never became ready
    pub async fn initialize(
        config: &PineconeConfig,
        dimension: usize,
        timeout_secs: u64,
    ) -> StoreResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| StoreError::Initialization("Pinecone API key not configured".to_string()))?;

        let control = ControlPlane {
            client: build_client(timeout_secs)?,
            base_url: config.control_plane_url.trim_end_matches('/').to_string(),
            api_key: api_key.clone(),
            api_version: config.api_version.clone(),
            timeout_secs,
        };

        let existing = control.list_indexes().await?;
        if existing.iter().any(|index| index.name == config.index_name) {
            tracing::debug!(index = %config.index_name, "Pinecone index exists");
        } else {
            tracing::info!(index = %config.index_name, dimension, "creating Pinecone index");
            control.create_index(config, dimension).await?;
        }

        let index = control.wait_until_ready(config).await?;
        if let Some(actual) = index.dimension {
            if actual != dimension {
                return Err(StoreError::Initialization(format!(
                    "Pinecone index {} has dimension {actual}, expected {dimension}",
                    config.index_name
                )));
            }
        }

        let host = index.host.ok_or_else(|| {
            StoreError::MalformedResponse(format!("index {} has no host", config.index_name))
        })?;

        tracing::info!(index = %config.index_name, host = %host, "Pinecone index ready");

        Ok(Self {
            client: control.client,
            api_key,
            api_version: config.api_version.clone(),
            index_name: config.index_name.clone(),
            host: data_plane_url(&host),
            dimension,
            timeout_secs,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> StoreResult<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}{path}", self.host))
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_VERSION_HEADER, &self.api_version)
            .json(body)
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
impl VectorBackend for PineconeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ManagedIndex
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn upsert(&self, record: VectorRecord) -> StoreResult<()> {
        check_dimension(self.dimension, record.dimension())?;

        let (id, values, metadata) = record.into_parts();
        let body = UpsertRequest {
            vectors: vec![UpsertVector {
                id,
                values,
                metadata: without_nulls(metadata),
            }],
        };

        self.post("/vectors/upsert", &body).await?;
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
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            filter: filter.map(|t| json!({ TYPE_KEY: { "$eq": t.as_str() } })),
        };

        let result: QueryResponse = self
            .post("/query", &body)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        let mut hits: Vec<ScoredRecord> = result
            .matches
            .into_iter()
            .map(|m| ScoredRecord {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let result: IndexStatsResponse = self
            .post("/describe_index_stats", &json!({}))
            .await?
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        Ok(StoreStats {
            total_vectors: result.total_vector_count,
            dimension: result.dimension.unwrap_or(self.dimension),
            index_fullness: result.index_fullness,
            namespaces: result
                .namespaces
                .into_iter()
                .map(|(name, ns)| {
                    (
                        name,
                        NamespaceStats {
                            vector_count: ns.vector_count,
                        },
                    )
                })
                .collect(),
        })
    }
}

/// Control-plane client used only during initialization
struct ControlPlane {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_version: String,
    timeout_secs: u64,
}

impl ControlPlane {
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_VERSION_HEADER, &self.api_version)
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

    async fn list_indexes(&self) -> StoreResult<Vec<IndexModel>> {
        let list: IndexList = self
            .send(self.request(reqwest::Method::GET, "/indexes"))
            .await?
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;
        Ok(list.indexes)
    }

    async fn create_index(&self, config: &PineconeConfig, dimension: usize) -> StoreResult<()> {
        let body = json!({
            "name": config.index_name,
            "dimension": dimension,
            "metric": "cosine",
            "spec": {
                "serverless": {
                    "cloud": config.cloud,
                    "region": config.region,
                }
            }
        });

        match self
            .send(self.request(reqwest::Method::POST, "/indexes").json(&body))
            .await
        {
            // Another process created it between list and create
            Err(StoreError::Api { status: 409, .. }) | Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn describe_index(&self, name: &str) -> StoreResult<IndexModel> {
        self.send(self.request(reqwest::Method::GET, &format!("/indexes/{name}")))
            .await?
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }

    /// Poll the index description at a fixed interval until it is ready
    async fn wait_until_ready(&self, config: &PineconeConfig) -> StoreResult<IndexModel> {
        let interval = Duration::from_secs(config.readiness_poll_interval_secs);
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(interval)
            .with_max_interval(interval)
            .with_multiplier(1.0)
            .with_randomization_factor(0.0)
            .with_max_elapsed_time(Some(Duration::from_secs(config.readiness_timeout_secs)))
            .build();

        let not_ready = || StoreError::NotReady {
            index: config.index_name.clone(),
            waited_secs: config.readiness_timeout_secs,
        };

        backoff::future::retry(policy, || async {
            let index = self
                .describe_index(&config.index_name)
                .await
                .map_err(|e| {
                    if is_permanent(&e) {
                        backoff::Error::permanent(e)
                    } else {
                        tracing::debug!(
                            index = %config.index_name,
                            error = %e,
                            "describe index failed, retrying"
                        );
                        backoff::Error::transient(e)
                    }
                })?;

            if index.is_ready() {
                Ok(index)
            } else {
                tracing::debug!(index = %config.index_name, "waiting for Pinecone index");
                Err(backoff::Error::transient(not_ready()))
            }
        })
        .await
        // A spent budget reports NotReady whatever the last transient error was
        .map_err(|e| if is_permanent(&e) { e } else { not_ready() })
    }
}

/// Client errors other than 404 will not resolve by polling again
fn is_permanent(err: &StoreError) -> bool {
    matches!(err, StoreError::Api { status, .. } if *status < 500 && *status != 404)
}

fn data_plane_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

// -- Pinecone API request/response types --

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexModel>,
}

#[derive(Debug, Deserialize)]
struct IndexModel {
    name: String,
    #[serde(default)]
    dimension: Option<usize>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    status: Option<IndexStatus>,
}

impl IndexModel {
    fn is_ready(&self) -> bool {
        self.host.is_some() && self.status.as_ref().is_some_and(|s| s.ready)
    }
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Debug, Serialize)]
struct UpsertRequest {
    vectors: Vec<UpsertVector>,
}

#[derive(Debug, Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
    metadata: Metadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    score: f32,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStatsResponse {
    #[serde(default)]
    namespaces: BTreeMap<String, NamespaceSummary>,
    #[serde(default)]
    dimension: Option<usize>,
    #[serde(default)]
    index_fullness: f32,
    #[serde(default)]
    total_vector_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceSummary {
    #[serde(default)]
    vector_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    fn config(control_plane_url: String) -> PineconeConfig {
        PineconeConfig {
            api_key: Some("pc-key".to_string()),
            control_plane_url,
            readiness_poll_interval_secs: 1,
            readiness_timeout_secs: 0,
            ..Default::default()
        }
    }

    fn index_json(server: &ServerGuard, ready: bool, dimension: usize) -> serde_json::Value {
        json!({
            "name": "verifact-factcheck-index",
            "dimension": dimension,
            "metric": "cosine",
            "host": server.url(),
            "status": {"ready": ready, "state": if ready { "Ready" } else { "Initializing" }}
        })
    }

    async fn ready_backend(server: &mut ServerGuard, dimension: usize) -> PineconeBackend {
        let index = index_json(server, true, dimension);
        let _list = server
            .mock("GET", "/indexes")
            .with_status(200)
            .with_body(json!({"indexes": [index.clone()]}).to_string())
            .create_async()
            .await;
        let _describe = server
            .mock("GET", "/indexes/verifact-factcheck-index")
            .with_status(200)
            .with_body(index.to_string())
            .create_async()
            .await;

        PineconeBackend::initialize(&config(server.url()), dimension, 5)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let result = PineconeBackend::initialize(&PineconeConfig::default(), 384, 5).await;
        assert!(matches!(result, Err(StoreError::Initialization(_))));
    }

    #[tokio::test]
    async fn test_initialize_creates_missing_index() {
        let mut server = Server::new_async().await;
        let _list = server
            .mock("GET", "/indexes")
            .match_header("api-key", "pc-key")
            .match_header("x-pinecone-api-version", "2024-07")
            .with_status(200)
            .with_body(r#"{"indexes": []}"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/indexes")
            .match_body(Matcher::PartialJson(json!({
                "name": "verifact-factcheck-index",
                "dimension": 384,
                "metric": "cosine",
                "spec": {"serverless": {"cloud": "aws", "region": "us-east-1"}}
            })))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;
        let _describe = server
            .mock("GET", "/indexes/verifact-factcheck-index")
            .with_status(200)
            .with_body(index_json(&server, true, 384).to_string())
            .create_async()
            .await;

        let backend = PineconeBackend::initialize(&config(server.url()), 384, 5)
            .await
            .unwrap();

        create.assert_async().await;
        assert_eq!(backend.kind(), BackendKind::ManagedIndex);
        assert_eq!(backend.index_name(), "verifact-factcheck-index");
    }

    #[tokio::test]
    async fn test_index_never_ready() {
        let mut server = Server::new_async().await;
        let _list = server
            .mock("GET", "/indexes")
            .with_status(200)
            .with_body(r#"{"indexes": [{"name": "verifact-factcheck-index"}]}"#)
            .create_async()
            .await;
        let _describe = server
            .mock("GET", "/indexes/verifact-factcheck-index")
            .with_status(200)
            .with_body(index_json(&server, false, 384).to_string())
            .create_async()
            .await;

        let result = PineconeBackend::initialize(&config(server.url()), 384, 5).await;
        assert!(matches!(result, Err(StoreError::NotReady { .. })));
    }

    #[tokio::test]
    async fn test_failing_describe_reports_not_ready() {
        let mut server = Server::new_async().await;
        let _list = server
            .mock("GET", "/indexes")
            .with_status(200)
            .with_body(r#"{"indexes": [{"name": "verifact-factcheck-index"}]}"#)
            .create_async()
            .await;
        let _describe = server
            .mock("GET", "/indexes/verifact-factcheck-index")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let result = PineconeBackend::initialize(&config(server.url()), 384, 5).await;
        assert!(matches!(
            result,
            Err(StoreError::NotReady { ref index, .. }) if index == "verifact-factcheck-index"
        ));
    }

    #[tokio::test]
    async fn test_describe_forbidden_is_not_retried() {
        let mut server = Server::new_async().await;
        let _list = server
            .mock("GET", "/indexes")
            .with_status(200)
            .with_body(r#"{"indexes": [{"name": "verifact-factcheck-index"}]}"#)
            .create_async()
            .await;
        let _describe = server
            .mock("GET", "/indexes/verifact-factcheck-index")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let result = PineconeBackend::initialize(&config(server.url()), 384, 5).await;
        assert!(matches!(result, Err(StoreError::Api { status: 403, .. })));
    }

    #[tokio::test]
    async fn test_existing_index_with_wrong_dimension() {
        let mut server = Server::new_async().await;
        let body = index_json(&server, true, 1536).to_string();
        let _list = server
            .mock("GET", "/indexes")
            .with_status(200)
            .with_body(r#"{"indexes": [{"name": "verifact-factcheck-index"}]}"#)
            .create_async()
            .await;
        let _describe = server
            .mock("GET", "/indexes/verifact-factcheck-index")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let result = PineconeBackend::initialize(&config(server.url()), 384, 5).await;
        assert!(matches!(result, Err(StoreError::Initialization(_))));
    }

    #[tokio::test]
    async fn test_upsert_strips_null_metadata() {
        let mut server = Server::new_async().await;
        let backend = ready_backend(&mut server, 2).await;
        let upsert = server
            .mock("POST", "/vectors/upsert")
            .match_body(Matcher::Json(json!({
                "vectors": [{
                    "id": "a1",
                    "values": [1.0, 0.0],
                    "metadata": {"title": "Sky", "type": "article"}
                }]
            })))
            .with_status(200)
            .with_body(r#"{"upsertedCount": 1}"#)
            .create_async()
            .await;

        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), json!("Sky"));
        metadata.insert("author".to_string(), serde_json::Value::Null);
        backend
            .upsert(VectorRecord::new("a1", vec![1.0, 0.0], RecordType::Article, metadata))
            .await
            .unwrap();

        upsert.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_with_filter() {
        let mut server = Server::new_async().await;
        let backend = ready_backend(&mut server, 2).await;
        let query = server
            .mock("POST", "/query")
            .match_body(Matcher::PartialJson(json!({
                "topK": 5,
                "includeMetadata": true,
                "filter": {"type": {"$eq": "factcheck"}}
            })))
            .with_status(200)
            .with_body(
                json!({"matches": [
                    {"id": "f2", "score": 0.4, "metadata": {"type": "factcheck"}},
                    {"id": "f1", "score": 0.9, "metadata": {"type": "factcheck"}}
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let hits = backend
            .query(&[1.0, 0.0], 5, Some(RecordType::FactCheck))
            .await
            .unwrap();

        query.assert_async().await;
        assert_eq!(hits[0].id, "f1");
        assert_eq!(hits[1].id, "f2");
    }

    #[tokio::test]
    async fn test_query_server_error() {
        let mut server = Server::new_async().await;
        let backend = ready_backend(&mut server, 2).await;
        let _query = server
            .mock("POST", "/query")
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let err = backend.query(&[1.0, 0.0], 5, None).await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_stats() {
        let mut server = Server::new_async().await;
        let backend = ready_backend(&mut server, 2).await;
        let _stats = server
            .mock("POST", "/describe_index_stats")
            .with_status(200)
            .with_body(
                json!({
                    "namespaces": {"": {"vectorCount": 42}},
                    "dimension": 2,
                    "indexFullness": 0.1,
                    "totalVectorCount": 42
                })
                .to_string(),
            )
            .create_async()
            .await;

        let stats = backend.stats().await.unwrap();
        assert_eq!(stats.total_vectors, 42);
        assert_eq!(stats.dimension, 2);
        assert_eq!(stats.namespaces[""].vector_count, 42);
    }

    #[test]
    fn test_data_plane_url() {
        assert_eq!(data_plane_url("idx-abc.svc.pinecone.io"), "https://idx-abc.svc.pinecone.io");
        assert_eq!(data_plane_url("http://127.0.0.1:1234/"), "http://127.0.0.1:1234");
    }
}
