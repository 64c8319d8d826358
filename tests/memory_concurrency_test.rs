//! Concurrent writers and readers on the shared in-memory backend

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinSet;

use verifact::adapters::vector::MemoryBackend;
use verifact::domain::models::{Metadata, RecordType, ScoredRecord, VectorRecord};
use verifact::domain::ports::VectorBackend;

const DIMENSION: usize = 8;
const CAPACITY: usize = 64;
const WRITERS: usize = 8;
const TOP_K: usize = 5;

fn vector_for(seed: usize) -> Vec<f32> {
    (0..DIMENSION)
        .map(|i| ((seed * 31 + i * 7) % 97) as f32 / 97.0 + 0.01)
        .collect()
}

fn record(phase: &str, writer: usize, seq: usize) -> VectorRecord {
    let id = format!("{phase}-{writer}-{seq}");
    let mut metadata = Metadata::new();
    metadata.insert("writer".to_string(), json!(writer));
    metadata.insert("seq".to_string(), json!(seq));
    metadata.insert("title".to_string(), json!(id.clone()));
    let record_type = if seq % 2 == 0 {
        RecordType::Article
    } else {
        RecordType::FactCheck
    };
    VectorRecord::new(id, vector_for(writer * 1000 + seq), record_type, metadata)
}

/// A hit is whole when its metadata belongs to the record its id names
fn assert_well_formed(hits: &[ScoredRecord]) {
    assert!(hits.len() <= TOP_K);
    assert!(hits.windows(2).all(|pair| pair[0].score >= pair[1].score));
    for hit in hits {
        assert_eq!(hit.field("title"), Some(hit.id.as_str()));
        assert!(hit.record_type().is_some());
    }
}

/// Run `per_writer` upserts from each writer while readers scan concurrently
async fn write_and_scan(backend: &Arc<MemoryBackend>, phase: &'static str, per_writer: usize) {
    let mut tasks = JoinSet::new();

    for writer in 0..WRITERS {
        let backend = Arc::clone(backend);
        tasks.spawn(async move {
            for seq in 0..per_writer {
                backend.upsert(record(phase, writer, seq)).await.unwrap();
                tokio::task::yield_now().await;
            }
        });
    }

    for reader in 0..WRITERS {
        let backend = Arc::clone(backend);
        tasks.spawn(async move {
            for round in 0..per_writer {
                let filter = match round % 3 {
                    0 => None,
                    1 => Some(RecordType::Article),
                    _ => Some(RecordType::FactCheck),
                };
                let hits = backend
                    .query(&vector_for(reader + round), TOP_K, filter)
                    .await
                    .unwrap();
                assert_well_formed(&hits);
                if let Some(wanted) = filter {
                    assert!(hits.iter().all(|hit| hit.record_type() == Some(wanted)));
                }

                let len = backend.len().await;
                assert!(len <= CAPACITY, "held {len} records");
                tokio::task::yield_now().await;
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        joined.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_and_queries_respect_capacity() {
    let backend = Arc::new(MemoryBackend::new(DIMENSION, CAPACITY));
    assert!(backend.is_empty().await);

    // Far more writes than the backend holds
    write_and_scan(&backend, "early", 50).await;
    assert_eq!(backend.len().await, CAPACITY);

    // Exactly one capacity's worth of new writes must evict every earlier record
    write_and_scan(&backend, "late", CAPACITY / WRITERS).await;
    assert_eq!(backend.len().await, CAPACITY);

    for writer in 0..WRITERS {
        for seq in 0..CAPACITY / WRITERS {
            let id = format!("late-{writer}-{seq}");
            assert!(backend.contains(&id).await, "missing {id}");
        }
    }
    assert!(!backend.contains("early-0-49").await);

    let hits = backend
        .query(&vector_for(3), CAPACITY, None)
        .await
        .unwrap();
    let ids: HashSet<&str> = hits.iter().map(|hit| hit.id.as_str()).collect();
    assert_eq!(ids.len(), CAPACITY);
    assert!(ids.iter().all(|id| id.starts_with("late-")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overwrites_keep_one_record_per_id() {
    let backend = Arc::new(MemoryBackend::new(DIMENSION, CAPACITY));
    let mut tasks = JoinSet::new();

    // Every writer upserts the same ten ids
    for writer in 0..WRITERS {
        let backend = Arc::clone(&backend);
        tasks.spawn(async move {
            for seq in 0..10 {
                let mut metadata = Metadata::new();
                metadata.insert("writer".to_string(), json!(writer));
                let record = VectorRecord::new(
                    format!("shared-{seq}"),
                    vector_for(writer + seq),
                    RecordType::Article,
                    metadata,
                );
                backend.upsert(record).await.unwrap();
            }
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap();
    }

    assert_eq!(backend.len().await, 10);
    let hits = backend.query(&vector_for(0), 20, None).await.unwrap();
    let ids: HashSet<&str> = hits.iter().map(|hit| hit.id.as_str()).collect();
    assert_eq!(ids.len(), 10);
}
