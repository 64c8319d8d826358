//! Common test utilities for integration tests

use std::sync::Arc;
use std::time::Duration;

use verifact::adapters::vector::MemoryBackend;
use verifact::domain::models::{Article, RetrievalConfig, Verdict, VerdictLabel};
use verifact::{EmbeddingGenerator, RetrievalOrchestrator, VectorStore};

pub const DIMENSION: usize = 384;

/// Orchestrator over a fresh in-memory backend, returning the backend too
pub fn memory_orchestrator(capacity: usize) -> (Arc<MemoryBackend>, RetrievalOrchestrator) {
    let backend = Arc::new(MemoryBackend::new(DIMENSION, capacity));
    let store = VectorStore::new(backend.clone(), Duration::from_secs(1));
    let orchestrator = RetrievalOrchestrator::new(
        Arc::new(EmbeddingGenerator::simple(DIMENSION)),
        Arc::new(store),
        RetrievalConfig::default(),
    );
    (backend, orchestrator)
}

pub fn article(id: &str, title: &str, content: &str) -> Article {
    Article {
        id: Some(id.to_string()),
        title: title.to_string(),
        content: Some(content.to_string()),
        source: "Science Daily".to_string(),
        url: format!("https://example.com/{id}"),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn false_verdict() -> Verdict {
    Verdict {
        verdict: VerdictLabel::False,
        confidence: 95,
        evidence: "Rayleigh scattering".to_string(),
        explanation: "The sky appears blue.".to_string(),
        sources_used: vec!["Science Daily".to_string()],
        key_points: Vec::new(),
        credibility_score: 80,
    }
}

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
