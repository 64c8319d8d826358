//! End-to-end claim check: retrieve, assemble context, ask the verdict
//! collaborator, then remember the verdict for future retrievals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::errors::FactCheckError;
use crate::domain::models::{ScoredRecord, SourceRef, Verdict};
use crate::domain::ports::VerdictProvider;
use crate::services::context::assemble_context;
use crate::services::retrieval::RetrievalOrchestrator;

/// Result of checking one claim
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckOutcome {
    pub claim: String,
    pub verdict: Verdict,
    pub sources: Vec<SourceRef>,
    pub previous_fact_checks: Vec<ScoredRecord>,
    /// Claim embedding, for callers that persist the check elsewhere
    #[serde(skip_serializing)]
    pub embedding: Vec<f32>,
    /// Id of the stored fact-check vector, `None` when the write failed
    pub record_id: Option<String>,
    pub checked_at: DateTime<Utc>,
}

pub struct FactCheckService {
    retrieval: Arc<RetrievalOrchestrator>,
    verdicts: Arc<dyn VerdictProvider>,
}

impl FactCheckService {
    pub fn new(retrieval: Arc<RetrievalOrchestrator>, verdicts: Arc<dyn VerdictProvider>) -> Self {
        Self {
            retrieval,
            verdicts,
        }
    }

    /// Check a claim against the indexed evidence.
    ///
    /// Failing to store the verdict afterwards is logged and does not fail
    /// the check.
    pub async fn check_claim(&self, claim: &str) -> Result<FactCheckOutcome, FactCheckError> {
        let claim = claim.trim();
        if claim.is_empty() {
            return Err(FactCheckError::EmptyClaim);
        }

        let retrieval = self.retrieval.retrieve_for_claim(claim).await?;
        let context = assemble_context(&retrieval.similar_articles, &retrieval.similar_fact_checks);

        let verdict = self
            .verdicts
            .generate_verdict(claim, &context.text, &context.sources)
            .await
            .map_err(|e| FactCheckError::Verdict(format!("{e:#}")))?;

        tracing::info!(
            verdict = %verdict.verdict,
            confidence = verdict.confidence,
            sources = context.sources.len(),
            "claim checked"
        );

        let record_id = match self
            .retrieval
            .record_fact_check(claim, &verdict, Some(retrieval.embedding.clone()))
            .await
        {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                tracing::warn!("fact-check vector was not stored");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to store fact-check vector");
                None
            }
        };

        Ok(FactCheckOutcome {
            claim: claim.to_string(),
            verdict,
            sources: context.sources,
            previous_fact_checks: retrieval.similar_fact_checks,
            embedding: retrieval.embedding,
            record_id,
            checked_at: Utc::now(),
        })
    }
}
