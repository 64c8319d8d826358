//! Article and verdict domain models
//!
//! Articles are the evidence corpus; verdicts are what the language-model
//! collaborator returns for a claim. Both are turned into [`VectorRecord`]s
//! for similarity search.
//!
//! [`VectorRecord`]: super::record::VectorRecord

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::Metadata;

/// Maximum characters of article content or verdict explanation kept in metadata
pub const METADATA_TEXT_LIMIT: usize = 1000;

/// A news article to index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Caller-supplied id; a fresh `article_<uuid>` id is used when absent
    #[serde(default)]
    pub id: Option<String>,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: Option<String>,

    pub source: String,

    pub url: String,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub author: Option<String>,
}

impl Article {
    /// Text embedded for this article: title, description and content
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description.as_deref().unwrap_or_default(),
            self.content.as_deref().unwrap_or_default()
        )
    }

    /// Metadata stored alongside the article's vector (without `type`)
    pub fn to_metadata(&self, indexed_at: DateTime<Utc>) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), Value::from(self.title.clone()));
        insert_opt(&mut metadata, "description", self.description.clone());
        insert_opt(
            &mut metadata,
            "content",
            self.content
                .as_deref()
                .map(|content| truncate_chars(content, METADATA_TEXT_LIMIT)),
        );
        metadata.insert("source".to_string(), Value::from(self.source.clone()));
        metadata.insert("url".to_string(), Value::from(self.url.clone()));
        insert_opt(
            &mut metadata,
            "publishedAt",
            self.published_at.map(|at| at.to_rfc3339()),
        );
        insert_opt(&mut metadata, "author", self.author.clone());
        metadata.insert("indexed_at".to_string(), Value::from(indexed_at.to_rfc3339()));
        metadata
    }
}

/// Verdict labels issued by the language-model collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictLabel {
    True,
    False,
    #[serde(rename = "Partially True")]
    PartiallyTrue,
    Unverified,
    Misleading,
}

impl VerdictLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::PartiallyTrue => "Partially True",
            Self::Unverified => "Unverified",
            Self::Misleading => "Misleading",
        }
    }
}

impl std::fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured verdict for a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub verdict: VerdictLabel,

    /// Confidence in percent (0-100)
    pub confidence: u8,

    pub evidence: String,

    pub explanation: String,

    #[serde(default)]
    pub sources_used: Vec<String>,

    #[serde(default)]
    pub key_points: Vec<String>,

    /// Credibility of the supporting sources in percent (0-100)
    #[serde(default = "default_credibility_score")]
    pub credibility_score: u8,
}

const fn default_credibility_score() -> u8 {
    50
}

impl Verdict {
    /// Metadata stored alongside the fact-check vector (without `type`)
    pub fn to_metadata(&self, claim: &str, checked_at: DateTime<Utc>) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("claim".to_string(), Value::from(claim));
        metadata.insert("verdict".to_string(), Value::from(self.verdict.as_str()));
        metadata.insert("confidence".to_string(), Value::from(self.confidence));
        metadata.insert("evidence".to_string(), Value::from(self.evidence.clone()));
        metadata.insert(
            "explanation".to_string(),
            Value::from(truncate_chars(&self.explanation, METADATA_TEXT_LIMIT)),
        );
        metadata.insert("checked_at".to_string(), Value::from(checked_at.to_rfc3339()));
        metadata
    }
}

fn insert_opt(metadata: &mut Metadata, key: &str, value: Option<String>) {
    if let Some(value) = value {
        metadata.insert(key.to_string(), Value::from(value));
    }
}

/// Take at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
