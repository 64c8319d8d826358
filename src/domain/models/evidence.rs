//! Evidence handed to the verdict collaborator

use serde::{Deserialize, Serialize};

/// A supporting source listed next to a verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub source: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    /// Relevance of the source to the claim
    pub score: f32,
    pub published_at: Option<String>,
}
