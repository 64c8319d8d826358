//! Composition root for CLI commands
//!
//! Builds the embedding generator, vector store and retrieval orchestrator
//! once from configuration. Backend and strategy selection happen here and
//! nowhere else.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::domain::models::{Article, Config};
use crate::services::{EmbeddingGenerator, RetrievalOrchestrator, VectorStore};

/// Services shared by the CLI commands
pub struct AppServices {
    pub config: Config,
    pub retrieval: Arc<RetrievalOrchestrator>,
}

impl AppServices {
    /// Wire up the retrieval core from `config`.
    ///
    /// Never fails on unavailable backends or missing credentials; those
    /// degrade to the in-memory store and the simple strategy.
    pub async fn from_config(config: Config) -> Self {
        let embeddings = Arc::new(EmbeddingGenerator::from_config(&config.embedding));
        let store = Arc::new(VectorStore::initialize(&config.vector_store).await);
        let retrieval = Arc::new(RetrievalOrchestrator::new(
            embeddings,
            store,
            config.retrieval.clone(),
        ));

        Self { config, retrieval }
    }

    /// Index every article in a JSON file
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport> {
        let articles = load_articles(path)?;
        let mut report = IngestReport::default();
        for article in &articles {
            let id = self
                .retrieval
                .index_article(article, None)
                .await
                .with_context(|| format!("Failed to index article '{}'", article.title))?;
            report.record(id);
        }
        Ok(report)
    }
}

/// Outcome of indexing a batch of articles
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Ids of the records the backend accepted
    pub stored: Vec<String>,
    /// Articles whose write the backend rejected
    pub rejected: usize,
}

impl IngestReport {
    /// Count one write, `None` meaning it was rejected
    pub fn record(&mut self, id: Option<String>) {
        match id {
            Some(id) => self.stored.push(id),
            None => self.rejected += 1,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArticleFile {
    Many(Vec<Article>),
    One(Box<Article>),
}

/// Read one article or an array of articles from a JSON file
pub fn load_articles(path: &Path) -> Result<Vec<Article>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed: ArticleFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse articles from {}", path.display()))?;

    Ok(match parsed {
        ArticleFile::Many(articles) => articles,
        ArticleFile::One(article) => vec![*article],
    })
}
