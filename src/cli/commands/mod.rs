//! CLI command implementations

pub mod check;
pub mod chunk;
pub mod embed;
pub mod ingest;
pub mod search;
pub mod stats;

use anyhow::Result;
use std::path::Path;

use crate::cli::service::AppServices;

/// Index an optional articles file before a query command runs
pub(crate) async fn preload_articles(services: &AppServices, path: Option<&Path>) -> Result<usize> {
    match path {
        Some(path) => Ok(services.ingest_file(path).await?.stored.len()),
        None => Ok(0),
    }
}
