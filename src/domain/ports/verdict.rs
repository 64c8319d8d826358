//! Verdict provider port.
//!
//! The language-model client lives outside this crate; it receives the claim,
//! the assembled evidence context and the source list, and returns a
//! structured [`Verdict`].

use async_trait::async_trait;

use crate::domain::models::{SourceRef, Verdict};

/// Collaborator that turns a claim plus evidence into a verdict.
#[async_trait]
pub trait VerdictProvider: Send + Sync {
    /// Produce a verdict for `claim` given the assembled `context` and `sources`.
    async fn generate_verdict(
        &self,
        claim: &str,
        context: &str,
        sources: &[SourceRef],
    ) -> anyhow::Result<Verdict>;
}
