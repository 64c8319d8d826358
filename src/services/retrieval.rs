//! Retrieval orchestrator.
//!
//! Embeds a claim once and runs the article and fact-check queries
//! concurrently against the same vector. The embedding is returned so the
//! caller can store the resulting verdict without recomputing it.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::errors::RetrievalError;
use crate::domain::models::{Article, RecordType, RetrievalConfig, ScoredRecord, Verdict};
use crate::services::embedding_generator::EmbeddingGenerator;
use crate::services::vector_store::VectorStore;

/// Evidence retrieved for one claim
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRetrieval {
    /// Embedding of the claim text
    pub embedding: Vec<f32>,
    /// Similar articles, best first
    pub similar_articles: Vec<ScoredRecord>,
    /// Similar past fact-checks, best first
    pub similar_fact_checks: Vec<ScoredRecord>,
}

pub struct RetrievalOrchestrator {
    embeddings: Arc<EmbeddingGenerator>,
    store: Arc<VectorStore>,
    config: RetrievalConfig,
}

impl RetrievalOrchestrator {
    pub fn new(
        embeddings: Arc<EmbeddingGenerator>,
        store: Arc<VectorStore>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embeddings,
            store,
            config,
        }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn embeddings(&self) -> &EmbeddingGenerator {
        &self.embeddings
    }

    /// Retrieve similar articles and fact-checks for `claim`.
    ///
    /// # Returns
    /// * `Ok(ClaimRetrieval)` - Possibly empty result lists
    /// * `Err(RetrievalError::Embedding)` - No embedding could be produced
    pub async fn retrieve_for_claim(&self, claim: &str) -> Result<ClaimRetrieval, RetrievalError> {
        let embedding = self.embeddings.embed(claim).await?;

        let (similar_articles, similar_fact_checks) = tokio::join!(
            self.store.query(
                &embedding,
                self.config.article_top_k,
                Some(RecordType::Article)
            ),
            self.store.query(
                &embedding,
                self.config.factcheck_top_k,
                Some(RecordType::FactCheck)
            ),
        );

        tracing::info!(
            articles = similar_articles.len(),
            fact_checks = similar_fact_checks.len(),
            "retrieved evidence for claim"
        );

        Ok(ClaimRetrieval {
            embedding,
            similar_articles,
            similar_fact_checks,
        })
    }

    /// Index an article, embedding it unless a vector is supplied.
    ///
    /// Returns the record id, or `None` when the backend rejected the write.
    pub async fn index_article(
        &self,
        article: &Article,
        embedding: Option<Vec<f32>>,
    ) -> Result<Option<String>, RetrievalError> {
        let embedding = match embedding {
            Some(embedding) => embedding,
            None => self.embeddings.embed(&article.embedding_text()).await?,
        };

        let (id, stored) = self.store.index_article(article, embedding).await;
        if !stored {
            return Ok(None);
        }
        tracing::info!(id = %id, title = %article.title, "article indexed");
        Ok(Some(id))
    }

    /// Store a verdict for `claim`, reusing the claim embedding when given.
    ///
    /// Returns the record id, or `None` when the backend rejected the write.
    pub async fn record_fact_check(
        &self,
        claim: &str,
        verdict: &Verdict,
        embedding: Option<Vec<f32>>,
    ) -> Result<Option<String>, RetrievalError> {
        let embedding = match embedding {
            Some(embedding) => embedding,
            None => self.embeddings.embed(claim).await?,
        };

        let (id, stored) = self.store.record_fact_check(claim, verdict, embedding).await;
        Ok(stored.then_some(id))
    }

    /// Unfiltered search over all records for space-joined keywords
    pub async fn search_by_keywords(
        &self,
        keywords: &[String],
        top_k: Option<usize>,
    ) -> Result<Vec<ScoredRecord>, RetrievalError> {
        let embedding = self.embeddings.embed(&keywords.join(" ")).await?;
        Ok(self
            .store
            .query(&embedding, top_k.unwrap_or(self.config.keyword_top_k), None)
            .await)
    }
}
