//! Input fingerprints for evidence records.
//!
//! A record's fingerprint changes only when an input that shaped it changes:
//! id, phase, score, summary, tag set or quote.

use sha2::{Digest, Sha256};

use crate::narrative::text::normalize_lower;
use crate::shift::Phase;

/// SHA-256 over `id|phase|score(4dp)|summary|sorted,slugs|quote`, hex encoded.
pub fn fingerprint<'a>(
    article_id: &str,
    phase: Phase,
    score: f64,
    summary: &str,
    tag_slugs: impl IntoIterator<Item = &'a str>,
    quote: &str,
) -> String {
    let mut slugs: Vec<&str> = tag_slugs.into_iter().collect();
    slugs.sort_unstable();

    let payload = [
        article_id.to_string(),
        phase.as_str().to_string(),
        format!("{:.4}", score),
        normalize_lower(summary),
        slugs.join(","),
        normalize_lower(quote),
    ]
    .join("|");

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}
