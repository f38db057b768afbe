//! Story selection with a minimum-coverage guarantee.
//!
//! Primary selection keeps every article scoring at or above the threshold. When
//! that yields fewer than the minimum total, the remainder is backfilled by
//! closeness to the milestone year and tagged as such.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::CoverageConfig;
use crate::corpus::ArticleRecord;
use crate::evidence::phase::resolve_phase;
use crate::evidence::scorer::RelevanceScorer;
use crate::shift::{definition, Phase, ShiftId};

/// Fallback closeness score ceiling: `max(0, 4 - |year - milestone|)`.
pub const FALLBACK_CEILING: i32 = 4;

/// Article reference + score + derived phase. Transient, one per scoring pass.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub article: &'a ArticleRecord,
    pub score: f64,
    pub phase: Phase,
}

/// Canonical relevance order: score desc, year desc, ISO date desc, then id asc
/// so equal records still sort deterministically.
pub fn compare_relevance(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.article.year.cmp(&a.article.year))
        .then_with(|| b.article.date_iso.cmp(&a.article.date_iso))
        .then_with(|| a.article.id.cmp(&b.article.id))
}

/// Score and phase every article, input order preserved.
pub fn score_candidates(articles: &[ArticleRecord], shift: ShiftId) -> Vec<ScoredCandidate<'_>> {
    let scorer = RelevanceScorer::new(shift);
    articles
        .iter()
        .map(|article| ScoredCandidate {
            article,
            score: scorer.score(article),
            phase: resolve_phase(article, shift),
        })
        .collect()
}

/// Whether an entry was genuinely scored in or backfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryOrigin {
    Scored,
    Backfill,
}

#[derive(Debug, Clone, Copy)]
pub struct StoryEntry<'a> {
    pub candidate: ScoredCandidate<'a>,
    pub origin: StoryOrigin,
}

pub fn fallback_score(year: i32, milestone_year: i32) -> i32 {
    (FALLBACK_CEILING - (year - milestone_year).abs()).max(0)
}

/// Top up `primary` to `minimum_total` from `remaining` (articles not already
/// selected), ranked by milestone closeness; input order breaks ties. The merged
/// set is re-sorted by [`compare_relevance`].
pub fn ensure_minimum_coverage<'a>(
    primary: Vec<ScoredCandidate<'a>>,
    remaining: Vec<ScoredCandidate<'a>>,
    milestone_year: i32,
    minimum_total: usize,
) -> Vec<StoryEntry<'a>> {
    let mut entries: Vec<StoryEntry<'a>> = primary
        .into_iter()
        .map(|candidate| StoryEntry { candidate, origin: StoryOrigin::Scored })
        .collect();

    if entries.len() < minimum_total {
        let mut fallback = remaining;
        // Stable: equal closeness keeps input order
        fallback.sort_by_key(|c| std::cmp::Reverse(fallback_score(c.article.year, milestone_year)));
        let needed = minimum_total - entries.len();
        tracing::debug!(
            primary = entries.len(),
            needed,
            available = fallback.len(),
            "coverage backfill"
        );
        entries.extend(
            fallback
                .into_iter()
                .take(needed)
                .map(|candidate| StoryEntry { candidate, origin: StoryOrigin::Backfill }),
        );
    }

    entries.sort_by(|a, b| compare_relevance(&a.candidate, &b.candidate));
    entries
}

/// Story-card selection for one shift: threshold, then coverage backfill.
pub fn select_story_records<'a>(
    articles: &'a [ArticleRecord],
    shift: ShiftId,
    config: &CoverageConfig,
) -> Vec<StoryEntry<'a>> {
    let (primary, remaining): (Vec<_>, Vec<_>) = score_candidates(articles, shift)
        .into_iter()
        .partition(|c| c.score >= config.min_score);
    ensure_minimum_coverage(primary, remaining, definition(shift).milestone_year, config.minimum_total)
}
