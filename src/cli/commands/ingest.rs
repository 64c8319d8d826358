//! Ingest command: index articles into the vector store.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::service::{AppServices, IngestReport};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Article, BackendKind};

/// Article fields given on the command line
#[derive(Debug, Default)]
pub struct ArticleArgs {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
}

impl ArticleArgs {
    fn into_article(self) -> Option<Article> {
        Some(Article {
            id: self.id,
            title: self.title?,
            description: self.description,
            content: self.content,
            source: self.source?,
            url: self.url?,
            ..Default::default()
        })
    }
}

#[derive(Debug, Serialize)]
pub struct IngestOutput {
    pub backend: BackendKind,
    pub ids: Vec<String>,
    pub rejected: usize,
    pub total_vectors: u64,
}

impl CommandOutput for IngestOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Indexed {} article(s) into {} ({} vectors total)",
            self.ids.len(),
            self.backend,
            self.total_vectors
        )];
        lines.extend(self.ids.iter().map(|id| format!("  {id}")));
        if self.rejected > 0 {
            lines.push(format!("{} article(s) were rejected by the backend", self.rejected));
        }
        lines.join("\n")
    }
}

pub async fn execute(
    services: &AppServices,
    file: Option<PathBuf>,
    article: ArticleArgs,
    json_mode: bool,
) -> Result<()> {
    let report = match file {
        Some(path) => services.ingest_file(&path).await?,
        None => {
            let article = article
                .into_article()
                .ok_or_else(|| anyhow::anyhow!("Provide --file or --title, --source and --url"))?;
            let id = services
                .retrieval
                .index_article(&article, None)
                .await
                .context("Failed to index article")?;
            let mut report = IngestReport::default();
            report.record(id);
            report
        }
    };

    let store = services.retrieval.store();
    output(
        &IngestOutput {
            backend: store.backend_kind(),
            ids: report.stored,
            rejected: report.rejected,
            total_vectors: store.stats().await.total_vectors,
        },
        json_mode,
    );
    Ok(())
}
