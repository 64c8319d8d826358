//! Search command

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::preload_articles;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::service::AppServices;
use crate::domain::models::ScoredRecord;

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub results: Vec<ScoredRecord>,
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        if self.results.is_empty() {
            return format!("No results for '{}'.", self.query);
        }
        format!(
            "{} result(s) for '{}':\n{}",
            self.results.len(),
            self.query,
            TableFormatter::new().format_hits(&self.results)
        )
    }
}

pub async fn execute(
    services: &AppServices,
    keywords: &[String],
    limit: Option<usize>,
    articles: Option<PathBuf>,
    json_mode: bool,
) -> Result<()> {
    preload_articles(services, articles.as_deref()).await?;

    let results = services
        .retrieval
        .search_by_keywords(keywords, limit)
        .await
        .context("Keyword search failed")?;

    output(
        &SearchOutput {
            query: keywords.join(" "),
            results,
        },
        json_mode,
    );
    Ok(())
}
