use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::infrastructure::logging::logger::parse_log_level;

/// Flat environment variables kept for deployments that predate the
/// `VERIFACT_` prefix, mapped to their nested config keys
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("VECTOR_DATABASE", "vector_store.backend"),
    ("EMBEDDING_MODEL", "embedding.strategy"),
    ("PINECONE_API_KEY", "vector_store.pinecone.api_key"),
    ("PINECONE_INDEX_NAME", "vector_store.pinecone.index_name"),
    ("CHROMA_URL", "vector_store.chroma.url"),
    ("OPENAI_API_KEY", "embedding.openai.api_key"),
    ("HUGGINGFACE_API_KEY", "embedding.huggingface.api_key"),
];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    #[error(
        "Embedding dimension ({embedding}) must match vector store dimension ({vector_store})"
    )]
    DimensionMismatch {
        embedding: usize,
        vector_store: usize,
    },

    #[error("Invalid memory_capacity: {0}. Must be at least 1")]
    InvalidCapacity(usize),

    #[error("Invalid {0}: must be at least 1")]
    InvalidTopK(&'static str),

    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error(
        "Invalid readiness polling: interval {interval_secs}s, budget {timeout_secs}s. \
         Interval must be at least 1s and no longer than the budget"
    )]
    InvalidReadiness {
        interval_secs: u64,
        timeout_secs: u64,
    },

    #[error("Invalid {0}: must be at least 1")]
    InvalidTimeout(&'static str),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .verifact/config.yaml (project config)
    /// 3. .verifact/local.yaml (local overrides, optional)
    /// 4. `VERIFACT_*` environment variables (`__` separates nested keys)
    /// 5. Legacy flat variables such as `VECTOR_DATABASE` and `PINECONE_API_KEY`
    pub fn load() -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".verifact/config.yaml"))
            .merge(Yaml::file(".verifact/local.yaml"));

        Self::finish(figment).context("Failed to load configuration")
    }

    /// Load configuration from a specific file, still honouring the environment
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path));

        Self::finish(figment).with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn finish(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .merge(Env::prefixed("VERIFACT_").split("__"))
            .merge(legacy_env())
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// Missing credentials are not an error: backends and embedding
    /// strategies degrade to their local variants at startup.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let store = &config.vector_store;
        let embedding = &config.embedding;

        if store.dimension == 0 {
            return Err(ConfigError::InvalidDimension(store.dimension));
        }
        if embedding.dimension != store.dimension {
            return Err(ConfigError::DimensionMismatch {
                embedding: embedding.dimension,
                vector_store: store.dimension,
            });
        }
        if store.memory_capacity == 0 {
            return Err(ConfigError::InvalidCapacity(store.memory_capacity));
        }
        if store.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("vector_store.request_timeout_secs"));
        }
        if store.pinecone.index_name.trim().is_empty() {
            return Err(ConfigError::EmptyName("vector_store.pinecone.index_name"));
        }
        if store.chroma.collection_name.trim().is_empty() {
            return Err(ConfigError::EmptyName("vector_store.chroma.collection_name"));
        }
        if store.chroma.url.trim().is_empty() {
            return Err(ConfigError::EmptyName("vector_store.chroma.url"));
        }

        let interval_secs = store.pinecone.readiness_poll_interval_secs;
        let timeout_secs = store.pinecone.readiness_timeout_secs;
        if interval_secs == 0 || timeout_secs < interval_secs {
            return Err(ConfigError::InvalidReadiness {
                interval_secs,
                timeout_secs,
            });
        }

        if embedding.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("embedding.timeout_secs"));
        }
        if embedding.requests_per_second == 0 {
            return Err(ConfigError::InvalidTimeout("embedding.requests_per_second"));
        }

        let retrieval = &config.retrieval;
        for (name, value) in [
            ("retrieval.article_top_k", retrieval.article_top_k),
            ("retrieval.factcheck_top_k", retrieval.factcheck_top_k),
            ("retrieval.keyword_top_k", retrieval.keyword_top_k),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidTopK(name));
            }
        }

        if parse_log_level(&config.logging.level).is_err() {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}

/// Provider for the legacy flat environment variables
fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| (*path).into())
    })
}
