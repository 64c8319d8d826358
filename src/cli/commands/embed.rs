//! Embed command

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::service::AppServices;
use crate::cli::output::{output, CommandOutput};

#[derive(Debug, Serialize)]
pub struct EmbedOutput {
    pub strategy: &'static str,
    pub dimension: usize,
    pub norm: f32,
    pub embedding: Vec<f32>,
}

impl CommandOutput for EmbedOutput {
    fn to_human(&self) -> String {
        let preview = self
            .embedding
            .iter()
            .take(8)
            .map(|v| format!("{v:.4}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Strategy:  {}\nDimension: {}\nNorm:      {:.4}\nValues:    [{}{}]",
            self.strategy,
            self.dimension,
            self.norm,
            preview,
            if self.dimension > 8 { ", ..." } else { "" }
        )
    }
}

pub async fn execute(services: &AppServices, text: &str, json_mode: bool) -> Result<()> {
    let generator = services.retrieval.embeddings();
    let embedding = generator
        .embed(text)
        .await
        .context("Failed to embed text")?;

    let norm = embedding.iter().map(|v| v * v).sum::<f32>().sqrt();
    output(
        &EmbedOutput {
            strategy: generator.strategy_name(),
            dimension: embedding.len(),
            norm,
            embedding,
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_output_previews_values() {
        let out = EmbedOutput {
            strategy: "simple",
            dimension: 10,
            norm: 1.0,
            embedding: vec![0.1; 10],
        };
        let text = out.to_human();
        assert!(text.contains("simple"));
        assert!(text.contains("0.1000"));
        assert!(text.ends_with(", ...]"));
    }
}
