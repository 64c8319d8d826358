//! Check command: retrieve the evidence a verdict would be built from.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::preload_articles;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::service::AppServices;
use crate::domain::models::ScoredRecord;
use crate::services::{assemble_context, EvidenceContext};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutput {
    pub claim: String,
    pub similar_articles: Vec<ScoredRecord>,
    pub similar_fact_checks: Vec<ScoredRecord>,
    pub context: EvidenceContext,
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut sections = vec![format!("Claim: {}", self.claim)];

        if self.similar_articles.is_empty() {
            sections.push("No similar articles found.".to_string());
        } else {
            sections.push(format!(
                "Similar articles:\n{}",
                formatter.format_hits(&self.similar_articles)
            ));
        }

        if !self.similar_fact_checks.is_empty() {
            sections.push(format!(
                "Previous fact-checks:\n{}",
                formatter.format_hits(&self.similar_fact_checks)
            ));
        }

        if !self.context.text.is_empty() {
            sections.push(format!("Evidence context:\n{}", self.context.text.trim_start()));
        }

        sections.join("\n\n")
    }
}

pub async fn execute(
    services: &AppServices,
    claim: &str,
    articles: Option<PathBuf>,
    json_mode: bool,
) -> Result<()> {
    let claim = claim.trim();
    if claim.is_empty() {
        anyhow::bail!("Claim must not be empty");
    }

    preload_articles(services, articles.as_deref()).await?;

    let retrieval = services
        .retrieval
        .retrieve_for_claim(claim)
        .await
        .context("Failed to retrieve evidence")?;
    let context = assemble_context(&retrieval.similar_articles, &retrieval.similar_fact_checks);

    output(
        &CheckOutput {
            claim: claim.to_string(),
            similar_articles: retrieval.similar_articles,
            similar_fact_checks: retrieval.similar_fact_checks,
            context,
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Config;

    #[tokio::test]
    async fn test_empty_claim_rejected() {
        let services = AppServices::from_config(Config::default()).await;
        assert!(execute(&services, "  ", None, true).await.is_err());
    }

    #[test]
    fn test_human_output_without_hits() {
        let out = CheckOutput {
            claim: "The sky is green".into(),
            similar_articles: Vec::new(),
            similar_fact_checks: Vec::new(),
            context: EvidenceContext::default(),
        };
        assert_eq!(
            out.to_human(),
            "Claim: The sky is green\n\nNo similar articles found."
        );
    }
}
