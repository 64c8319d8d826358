//! Vector record domain models
//!
//! A [`VectorRecord`] pairs an embedding with flat metadata. The `type`
//! metadata key is written once at construction and is the only field that
//! filtered queries look at.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Embedding dimension used by every configured backend
pub const DEFAULT_DIMENSION: usize = 384;

/// Metadata key holding the record discriminator
pub const TYPE_KEY: &str = "type";

/// Flat metadata map of scalar and string values
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Kind of content a record was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// An ingested news article
    Article,
    /// A previously issued verdict on a claim
    #[serde(rename = "factcheck")]
    FactCheck,
}

impl RecordType {
    /// Wire value stored under the `type` metadata key
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::FactCheck => "factcheck",
        }
    }

    /// Parse the wire value back into a record type
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "article" => Some(Self::Article),
            "factcheck" => Some(Self::FactCheck),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored embedding with its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    id: String,
    embedding: Vec<f32>,
    metadata: Metadata,
}

impl VectorRecord {
    /// Create a record, stamping `record_type` into the metadata.
    ///
    /// Any `type` key already present in `metadata` is replaced.
    pub fn new(
        id: impl Into<String>,
        embedding: Vec<f32>,
        record_type: RecordType,
        mut metadata: Metadata,
    ) -> Self {
        metadata.insert(
            TYPE_KEY.to_string(),
            serde_json::Value::String(record_type.as_str().to_string()),
        );
        Self {
            id: id.into(),
            embedding,
            metadata,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Discriminator read from the `type` metadata key
    pub fn record_type(&self) -> Option<RecordType> {
        self.metadata
            .get(TYPE_KEY)
            .and_then(serde_json::Value::as_str)
            .and_then(RecordType::parse)
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }

    pub fn into_parts(self) -> (String, Vec<f32>, Metadata) {
        (self.id, self.embedding, self.metadata)
    }
}

/// A ranked query hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    /// Record id
    pub id: String,

    /// Cosine similarity to the query vector (higher is closer)
    pub score: f32,

    /// Metadata stored with the record
    pub metadata: Metadata,
}

impl ScoredRecord {
    /// Look up a string metadata field
    pub fn field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(serde_json::Value::as_str)
    }

    /// Discriminator of the matched record
    pub fn record_type(&self) -> Option<RecordType> {
        self.field(TYPE_KEY).and_then(RecordType::parse)
    }
}

/// Per-namespace counters reported by a backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceStats {
    /// Number of vectors stored in the namespace
    pub vector_count: u64,
}

/// Storage statistics, used for observability only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Total stored vector count
    pub total_vectors: u64,

    /// Configured embedding dimension
    pub dimension: usize,

    /// Fraction of capacity in use (0.0 when the backend does not report it)
    pub index_fullness: f32,

    /// Counts keyed by namespace ("" is the default namespace)
    pub namespaces: BTreeMap<String, NamespaceStats>,
}

impl StoreStats {
    /// Zeroed stats for a backend that could not be reached
    pub fn empty(dimension: usize) -> Self {
        Self {
            total_vectors: 0,
            dimension,
            index_fullness: 0.0,
            namespaces: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_stamps_type() {
        let record = VectorRecord::new("a1", vec![0.0; 3], RecordType::Article, Metadata::new());
        assert_eq!(record.record_type(), Some(RecordType::Article));
        assert_eq!(record.metadata()["type"], json!("article"));
    }

    #[test]
    fn test_new_overrides_caller_type() {
        let mut metadata = Metadata::new();
        metadata.insert("type".to_string(), json!("article"));
        metadata.insert("claim".to_string(), json!("x"));

        let record = VectorRecord::new("f1", vec![1.0], RecordType::FactCheck, metadata);
        assert_eq!(record.record_type(), Some(RecordType::FactCheck));
        assert_eq!(record.metadata()["claim"], json!("x"));
    }

    #[test]
    fn test_record_type_wire_values() {
        assert_eq!(RecordType::Article.as_str(), "article");
        assert_eq!(RecordType::FactCheck.as_str(), "factcheck");
        assert_eq!(RecordType::parse("factcheck"), Some(RecordType::FactCheck));
        assert_eq!(RecordType::parse("FactCheck"), None);
        assert_eq!(
            serde_json::to_value(RecordType::FactCheck).unwrap(),
            json!("factcheck")
        );
    }

    #[test]
    fn test_scored_record_field_lookup() {
        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), json!("Sky color explained"));
        metadata.insert("type".to_string(), json!("article"));
        let hit = ScoredRecord {
            id: "a1".to_string(),
            score: 0.5,
            metadata,
        };

        assert_eq!(hit.field("title"), Some("Sky color explained"));
        assert_eq!(hit.field("missing"), None);
        assert_eq!(hit.record_type(), Some(RecordType::Article));
    }
}
