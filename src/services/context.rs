//! Evidence context assembly for the verdict collaborator.

use serde::Serialize;

use crate::domain::models::{ScoredRecord, SourceRef};

const ARTICLE_SEPARATOR: &str = "\n\n---\n\n";
const FACT_CHECK_HEADER: &str = "\n\n=== PREVIOUS FACT-CHECKS ===\n\n";

/// Prompt context plus the sources it was built from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvidenceContext {
    pub text: String,
    pub sources: Vec<SourceRef>,
}

/// Render retrieved articles and fact-checks into a single context block.
///
/// Articles keep their retrieval order. The fact-check section is only
/// appended when at least one previous fact-check was found.
pub fn assemble_context(articles: &[ScoredRecord], fact_checks: &[ScoredRecord]) -> EvidenceContext {
    let mut text = articles
        .iter()
        .map(render_article)
        .collect::<Vec<_>>()
        .join(ARTICLE_SEPARATOR);

    if !fact_checks.is_empty() {
        text.push_str(FACT_CHECK_HEADER);
        text.push_str(
            &fact_checks
                .iter()
                .map(render_fact_check)
                .collect::<Vec<_>>()
                .join("\n\n"),
        );
    }

    EvidenceContext {
        text,
        sources: articles.iter().map(source_ref).collect(),
    }
}

fn render_article(hit: &ScoredRecord) -> String {
    let content = hit
        .field("content")
        .filter(|c| !c.is_empty())
        .or_else(|| hit.field("description"))
        .unwrap_or_default();

    format!(
        "Source: {}\nTitle: {}\nContent: {}\nPublished: {}\nRelevance Score: {:.3}",
        hit.field("source").unwrap_or("Unknown"),
        hit.field("title").unwrap_or("Untitled"),
        content,
        hit.field("publishedAt").unwrap_or("unknown"),
        hit.score
    )
}

fn render_fact_check(hit: &ScoredRecord) -> String {
    format!(
        "Previous Fact-Check:\nClaim: {}\nVerdict: {}\nEvidence: {}",
        hit.field("claim").unwrap_or_default(),
        hit.field("verdict").unwrap_or("Unverified"),
        hit.field("evidence").unwrap_or_default()
    )
}

fn source_ref(hit: &ScoredRecord) -> SourceRef {
    SourceRef {
        source: hit.field("source").map(str::to_string),
        title: hit.field("title").map(str::to_string),
        url: hit.field("url").map(str::to_string),
        score: hit.score,
        published_at: hit.field("publishedAt").map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Metadata;
    use serde_json::{json, Value};

    fn hit(id: &str, score: f32, fields: Value) -> ScoredRecord {
        let metadata: Metadata = serde_json::from_value(fields).unwrap();
        ScoredRecord {
            id: id.to_string(),
            score,
            metadata,
        }
    }

    #[test]
    fn test_articles_only() {
        let articles = vec![
            hit(
                "a1",
                0.91234,
                json!({
                    "source": "Science Daily",
                    "title": "Sky color explained",
                    "content": "Rayleigh scattering makes the sky blue.",
                    "publishedAt": "2024-01-02T00:00:00+00:00",
                    "url": "https://example.com/sky"
                }),
            ),
            hit(
                "a2",
                0.5,
                json!({"source": "Wire", "title": "Weather", "description": "Clouds today"}),
            ),
        ];

        let context = assemble_context(&articles, &[]);

        assert_eq!(
            context.text,
            "Source: Science Daily\nTitle: Sky color explained\n\
             Content: Rayleigh scattering makes the sky blue.\n\
             Published: 2024-01-02T00:00:00+00:00\nRelevance Score: 0.912\
             \n\n---\n\n\
             Source: Wire\nTitle: Weather\nContent: Clouds today\n\
             Published: unknown\nRelevance Score: 0.500"
        );
        assert_eq!(context.sources.len(), 2);
        assert_eq!(context.sources[0].url.as_deref(), Some("https://example.com/sky"));
        assert_eq!(context.sources[1].url, None);
    }

    #[test]
    fn test_fact_checks_appended_after_header() {
        let checks = vec![
            hit(
                "f1",
                0.8,
                json!({"claim": "The sky is green", "verdict": "False", "evidence": "Spectra"}),
            ),
            hit(
                "f2",
                0.7,
                json!({"claim": "Grass is green", "verdict": "True", "evidence": "Chlorophyll"}),
            ),
        ];

        let context = assemble_context(&[], &checks);

        assert_eq!(
            context.text,
            "\n\n=== PREVIOUS FACT-CHECKS ===\n\n\
             Previous Fact-Check:\nClaim: The sky is green\nVerdict: False\nEvidence: Spectra\n\n\
             Previous Fact-Check:\nClaim: Grass is green\nVerdict: True\nEvidence: Chlorophyll"
        );
        assert!(context.sources.is_empty());
    }

    #[test]
    fn test_nothing_retrieved() {
        assert_eq!(assemble_context(&[], &[]), EvidenceContext::default());
    }
}
