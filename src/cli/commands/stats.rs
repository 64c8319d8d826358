//! Stats command

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::service::AppServices;
use crate::domain::models::{BackendKind, StoreStats};

#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub backend: BackendKind,
    pub embedding_strategy: &'static str,
    pub stats: StoreStats,
}

impl CommandOutput for StatsOutput {
    fn to_human(&self) -> String {
        format!(
            "Embedding strategy: {}\n{}",
            self.embedding_strategy,
            TableFormatter::new().format_stats(&self.backend.to_string(), &self.stats)
        )
    }
}

pub async fn execute(services: &AppServices, json_mode: bool) -> Result<()> {
    let store = services.retrieval.store();
    output(
        &StatsOutput {
            backend: store.backend_kind(),
            embedding_strategy: services.retrieval.embeddings().strategy_name(),
            stats: store.stats().await,
        },
        json_mode,
    );
    Ok(())
}
