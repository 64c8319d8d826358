use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::record::DEFAULT_DIMENSION;

/// Main configuration structure for VeriFact
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Vector storage backend configuration
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Embedding strategy configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval fan-out configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Which vector storage backend to initialize
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted index service (Pinecone)
    #[serde(rename = "managed-index", alias = "pinecone")]
    ManagedIndex,
    /// Self-hosted vector database (Chroma)
    #[serde(rename = "local-vector-db", alias = "chroma")]
    LocalVectorDb,
    /// Bounded in-process store
    #[default]
    #[serde(rename = "memory")]
    Memory,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManagedIndex => f.write_str("managed-index"),
            Self::LocalVectorDb => f.write_str("local-vector-db"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VectorStoreConfig {
    /// Backend selector
    #[serde(default)]
    pub backend: BackendKind,

    /// Embedding dimension the backend is provisioned with
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Maximum records held by the in-memory backend
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,

    /// Per-call timeout for backend requests, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Managed index service settings
    #[serde(default)]
    pub pinecone: PineconeConfig,

    /// Local vector database settings
    #[serde(default)]
    pub chroma: ChromaConfig,
}

const fn default_dimension() -> usize {
    DEFAULT_DIMENSION
}

const fn default_memory_capacity() -> usize {
    1000
}

const fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            dimension: default_dimension(),
            memory_capacity: default_memory_capacity(),
            request_timeout_secs: default_request_timeout_secs(),
            pinecone: PineconeConfig::default(),
            chroma: ChromaConfig::default(),
        }
    }
}

/// Pinecone settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PineconeConfig {
    /// API key; the backend degrades to memory without one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Index to use, created when absent
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Control plane base URL
    #[serde(default = "default_control_plane_url")]
    pub control_plane_url: String,

    /// Serverless cloud for index creation
    #[serde(default = "default_cloud")]
    pub cloud: String,

    /// Serverless region for index creation
    #[serde(default = "default_region")]
    pub region: String,

    /// Value sent in the `X-Pinecone-API-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Delay between readiness checks after index creation, in seconds
    #[serde(default = "default_readiness_poll_interval_secs")]
    pub readiness_poll_interval_secs: u64,

    /// Wall-clock budget for the readiness wait, in seconds
    #[serde(default = "default_readiness_timeout_secs")]
    pub readiness_timeout_secs: u64,
}

fn default_index_name() -> String {
    "verifact-factcheck-index".to_string()
}

fn default_control_plane_url() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_api_version() -> String {
    "2024-07".to_string()
}

const fn default_readiness_poll_interval_secs() -> u64 {
    5
}

const fn default_readiness_timeout_secs() -> u64 {
    300
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            index_name: default_index_name(),
            control_plane_url: default_control_plane_url(),
            cloud: default_cloud(),
            region: default_region(),
            api_version: default_api_version(),
            readiness_poll_interval_secs: default_readiness_poll_interval_secs(),
            readiness_timeout_secs: default_readiness_timeout_secs(),
        }
    }
}

/// Chroma settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChromaConfig {
    /// Server base URL
    #[serde(default = "default_chroma_url")]
    pub url: String,

    /// Collection to get or create
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
}

fn default_chroma_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_collection_name() -> String {
    "news-factcheck-collection".to_string()
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            url: default_chroma_url(),
            collection_name: default_collection_name(),
        }
    }
}

/// Embedding strategy selector, fixed at process start
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingStrategy {
    /// Local hashed bag-of-words sketch
    #[default]
    #[serde(alias = "custom")]
    Simple,
    /// OpenAI embeddings API
    #[serde(rename = "openai")]
    OpenAi,
    /// HuggingFace feature-extraction API
    #[serde(rename = "huggingface")]
    HuggingFace,
}

impl std::fmt::Display for EmbeddingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::OpenAi => f.write_str("openai"),
            Self::HuggingFace => f.write_str("huggingface"),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Strategy selector
    #[serde(default)]
    pub strategy: EmbeddingStrategy,

    /// Output dimension of every strategy
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Per-call timeout for remote providers, in seconds
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,

    /// Outbound request budget for remote providers
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// OpenAI settings
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// HuggingFace settings
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
}

const fn default_embedding_timeout_secs() -> u64 {
    15
}

const fn default_requests_per_second() -> u32 {
    20
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            strategy: EmbeddingStrategy::default(),
            dimension: default_dimension(),
            timeout_secs: default_embedding_timeout_secs(),
            requests_per_second: default_requests_per_second(),
            openai: OpenAiConfig::default(),
            huggingface: HuggingFaceConfig::default(),
        }
    }
}

/// OpenAI embedding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model name; must accept the `dimensions` request parameter
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Input is cut to this many characters before the call
    #[serde(default = "default_openai_max_input_chars")]
    pub max_input_chars: usize,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "text-embedding-3-small".to_string()
}

const fn default_openai_max_input_chars() -> usize {
    8000
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            max_input_chars: default_openai_max_input_chars(),
        }
    }
}

/// HuggingFace inference settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HuggingFaceConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_huggingface_base_url")]
    pub base_url: String,

    #[serde(default = "default_huggingface_model")]
    pub model: String,

    /// Input is cut to this many characters before the call
    #[serde(default = "default_huggingface_max_input_chars")]
    pub max_input_chars: usize,
}

fn default_huggingface_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_huggingface_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

const fn default_huggingface_max_input_chars() -> usize {
    512
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_huggingface_base_url(),
            model: default_huggingface_model(),
            max_input_chars: default_huggingface_max_input_chars(),
        }
    }
}

/// Retrieval fan-out configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Similar articles returned per claim
    #[serde(default = "default_article_top_k")]
    pub article_top_k: usize,

    /// Similar fact-checks returned per claim
    #[serde(default = "default_factcheck_top_k")]
    pub factcheck_top_k: usize,

    /// Results returned by keyword search
    #[serde(default = "default_keyword_top_k")]
    pub keyword_top_k: usize,
}

const fn default_article_top_k() -> usize {
    10
}

const fn default_factcheck_top_k() -> usize {
    5
}

const fn default_keyword_top_k() -> usize {
    20
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            article_top_k: default_article_top_k(),
            factcheck_top_k: default_factcheck_top_k(),
            keyword_top_k: default_keyword_top_k(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_aliases() {
        let kind: BackendKind = serde_json::from_str("\"pinecone\"").unwrap();
        assert_eq!(kind, BackendKind::ManagedIndex);
        let kind: BackendKind = serde_json::from_str("\"local-vector-db\"").unwrap();
        assert_eq!(kind, BackendKind::LocalVectorDb);
        let kind: BackendKind = serde_json::from_str("\"chroma\"").unwrap();
        assert_eq!(kind, BackendKind::LocalVectorDb);
        assert_eq!(serde_json::to_string(&BackendKind::Memory).unwrap(), "\"memory\"");
    }

    #[test]
    fn test_embedding_strategy_aliases() {
        let strategy: EmbeddingStrategy = serde_json::from_str("\"custom\"").unwrap();
        assert_eq!(strategy, EmbeddingStrategy::Simple);
        let strategy: EmbeddingStrategy = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(strategy, EmbeddingStrategy::OpenAi);
        assert_eq!(EmbeddingStrategy::HuggingFace.to_string(), "huggingface");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.vector_store.backend, BackendKind::Memory);
        assert_eq!(config.vector_store.dimension, 384);
        assert_eq!(config.vector_store.memory_capacity, 1000);
        assert_eq!(config.vector_store.pinecone.readiness_poll_interval_secs, 5);
        assert_eq!(config.embedding.strategy, EmbeddingStrategy::Simple);
        assert_eq!(config.embedding.openai.max_input_chars, 8000);
        assert_eq!(config.embedding.huggingface.max_input_chars, 512);
        assert_eq!(config.retrieval.article_top_k, 10);
        assert_eq!(config.retrieval.factcheck_top_k, 5);
    }
}
