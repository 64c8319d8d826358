//! Command-line interface for the retrieval core

pub mod commands;
pub mod output;
pub mod service;
pub mod types;

pub use service::{AppServices, IngestReport};
pub use types::{Cli, Commands};

use anyhow::Result;

use crate::domain::models::Config;

/// Run a parsed command against services built from `config`
pub async fn dispatch(command: Commands, config: Config, json: bool) -> Result<()> {
    match command {
        // Chunking needs no backend, so it skips the store handshake
        Commands::Chunk {
            text,
            file,
            kind,
            max_chunk_size,
            overlap,
        } => commands::chunk::execute(text, file, kind.into(), max_chunk_size, overlap, json),
        Commands::Embed { text } => {
            let services = AppServices::from_config(config).await;
            commands::embed::execute(&services, &text, json).await
        }
        Commands::Ingest {
            file,
            title,
            description,
            content,
            source,
            url,
            id,
        } => {
            let services = AppServices::from_config(config).await;
            let article = commands::ingest::ArticleArgs {
                id,
                title,
                description,
                content,
                source,
                url,
            };
            commands::ingest::execute(&services, file, article, json).await
        }
        Commands::Check { claim, articles } => {
            let services = AppServices::from_config(config).await;
            commands::check::execute(&services, &claim, articles, json).await
        }
        Commands::Search {
            keywords,
            limit,
            articles,
        } => {
            let services = AppServices::from_config(config).await;
            commands::search::execute(&services, &keywords, limit, articles, json).await
        }
        Commands::Stats => {
            let services = AppServices::from_config(config).await;
            commands::stats::execute(&services, json).await
        }
    }
}

/// Print an error in the requested format and exit with status 1
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let payload = serde_json::json!({
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1)
}
