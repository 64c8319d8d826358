//! Property-based tests for embedding and similarity invariants
//!
//! 1. Determinism: same input, same vector
//! 2. Normalization: non-degenerate embeddings have unit norm
//! 3. Cosine bounds, symmetry, and self-similarity of non-zero vectors
//! 4. Ranking: query results are non-increasing by score and respect the filter
//! 5. Chunking without overlap: no chunk exceeds the limit unless it is a
//!    single sentence, and chunks rejoin to the original sentences

use proptest::prelude::*;

use verifact::adapters::embeddings::SimpleEmbedder;
use verifact::adapters::vector::MemoryBackend;
use verifact::domain::models::{Metadata, RecordType, VectorRecord};
use verifact::domain::similarity::{cosine_similarity, l2_norm};
use verifact::domain::ports::VectorBackend;
use verifact::services::chunker::{chunk_text, split_sentences};

const DIMENSION: usize = 384;

fn vector_strategy(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0f32..1.0f32, dim..=dim)
}

fn non_zero_vector_strategy(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    vector_strategy(dim).prop_filter("vector must be non-zero", |v| l2_norm(v) > 1e-3)
}

#[test_strategy::proptest]
fn proptest_embedding_determinism(#[strategy("[a-zA-Z0-9 .,!?]{0,300}")] text: String) {
    let embedder = SimpleEmbedder::new(DIMENSION);
    let first = embedder.embed_text(&text).unwrap();
    let second = embedder.embed_text(&text).unwrap();

    prop_assert_eq!(first.len(), DIMENSION);
    prop_assert_eq!(first, second);
}

#[test_strategy::proptest]
fn proptest_embedding_is_unit_or_zero(#[strategy("[a-zA-Z ]{0,300}")] text: String) {
    let embedding = SimpleEmbedder::new(DIMENSION).embed_text(&text).unwrap();
    let norm = l2_norm(&embedding);

    prop_assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-4, "norm was {}", norm);
}

#[test_strategy::proptest]
fn proptest_cosine_bounds_and_symmetry(
    #[strategy(non_zero_vector_strategy(16))] a: Vec<f32>,
    #[strategy(vector_strategy(16))] b: Vec<f32>,
) {
    let ab = cosine_similarity(&a, &b);
    let ba = cosine_similarity(&b, &a);

    prop_assert!((-1.0..=1.0).contains(&ab));
    prop_assert!((ab - ba).abs() < 1e-6);
    prop_assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);
}

#[test_strategy::proptest]
fn proptest_chunks_without_overlap_respect_limit(
    #[strategy("(([A-Za-z]{1,8} ){1,6}[A-Za-z]{1,8}[.!?] ){1,12}")] text: String,
    #[strategy(20usize..200)] max: usize,
) {
    let sentences = split_sentences(&text);
    let chunks = chunk_text(&text, max, 0);

    prop_assert!(!chunks.is_empty());
    for chunk in &chunks {
        let single_sentence = sentences.iter().any(|s| *s == chunk.as_str());
        prop_assert!(chunk.chars().count() <= max || single_sentence);
    }
    prop_assert_eq!(chunks.join(" "), sentences.join(" "));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Memory backend results are sorted by score and honor the type filter
    #[test]
    fn proptest_ranking_and_filter(
        vectors in prop::collection::vec(vector_strategy(8), 1..40),
        query in vector_strategy(8),
        top_k in 1usize..50,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let backend = MemoryBackend::new(8, 1000);
            for (i, vector) in vectors.iter().enumerate() {
                let record_type = if i % 2 == 0 { RecordType::Article } else { RecordType::FactCheck };
                backend
                    .upsert(VectorRecord::new(format!("r{i}"), vector.clone(), record_type, Metadata::new()))
                    .await
                    .unwrap();
            }

            let hits = backend.query(&query, top_k, Some(RecordType::FactCheck)).await.unwrap();

            prop_assert!(hits.len() <= top_k);
            prop_assert!(hits.windows(2).all(|pair| pair[0].score >= pair[1].score));
            prop_assert!(hits.iter().all(|hit| hit.record_type() == Some(RecordType::FactCheck)));
            Ok::<(), TestCaseError>(())
        })?;
    }
}
