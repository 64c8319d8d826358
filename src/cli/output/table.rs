//! Table output formatting for CLI commands
//!
//! Formats retrieval hits, chunks and store statistics using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{ScoredRecord, StoreStats};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format ranked hits, best first
    pub fn format_hits(&self, hits: &[ScoredRecord]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["#", "Score", "Type", "Title / Claim", "Source", "ID"]));

        for (rank, hit) in hits.iter().enumerate() {
            let label = hit
                .field("title")
                .or_else(|| hit.field("claim"))
                .unwrap_or("-");
            let score = format!("{:.3}", hit.score);
            let score_cell = if self.use_colors {
                Cell::new(score).fg(score_color(hit.score))
            } else {
                Cell::new(score)
            };

            table.add_row(vec![
                Cell::new(rank + 1),
                score_cell,
                Cell::new(hit.record_type().map_or("-", |t| t.as_str())),
                Cell::new(truncate_text(label, 60)),
                Cell::new(
                    hit.field("source")
                        .or_else(|| hit.field("verdict"))
                        .unwrap_or("-"),
                ),
                Cell::new(truncate_text(&hit.id, 24)),
            ]);
        }

        table.to_string()
    }

    /// Format chunks with their sizes
    pub fn format_chunks(&self, chunks: &[String]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["#", "Chars", "Words", "Text"]));

        for (idx, chunk) in chunks.iter().enumerate() {
            table.add_row(vec![
                Cell::new(idx + 1),
                Cell::new(chunk.chars().count()),
                Cell::new(chunk.split_whitespace().count()),
                Cell::new(truncate_text(chunk, 80)),
            ]);
        }

        table.to_string()
    }

    pub fn format_stats(&self, backend: &str, stats: &StoreStats) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Property", "Value"]));

        table.add_row(vec![Cell::new("Backend"), Cell::new(backend)]);
        table.add_row(vec![Cell::new("Total vectors"), Cell::new(stats.total_vectors)]);
        table.add_row(vec![Cell::new("Dimension"), Cell::new(stats.dimension)]);
        table.add_row(vec![
            Cell::new("Index fullness"),
            Cell::new(format!("{:.1}%", stats.index_fullness * 100.0)),
        ]);
        for (name, ns) in &stats.namespaces {
            let label = if name.is_empty() {
                "Namespace (default)".to_string()
            } else {
                format!("Namespace {name}")
            };
            table.add_row(vec![Cell::new(label), Cell::new(ns.vector_count)]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
        .collect()
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn score_color(score: f32) -> Color {
    if score >= 0.8 {
        Color::Green
    } else if score >= 0.5 {
        Color::Yellow
    } else {
        Color::DarkGrey
    }
}

/// Truncate to `max_chars` characters, appending "..." when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
