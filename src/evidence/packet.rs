//! Evidence Packet Builder
//!
//! Produces the auditable selection behind a long-form shift narrative.
//!
//! # Algorithm
//! 1. Score and phase every article; apply the score/anchor/group gates
//! 2. In strict mode, only full-text articles are selectable
//! 3. Per phase: sort by relevance, cap at `max_per_phase`
//! 4. Optionally backfill each phase to its cap from below-threshold records
//! 5. Emit selected records plus every considered record with its reason
//!
//! The builder is pure: identical articles, parameters and [`PacketMeta`] give
//! byte-identical JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::SynthesisBudgets;
use crate::corpus::{ensure_unique_ids, ArticleRecord, TextState};
use crate::error::Result;
use crate::evidence::coverage::{compare_relevance, ScoredCandidate};
use crate::evidence::fingerprint::fingerprint;
use crate::evidence::params::SelectionParams;
use crate::evidence::phase::resolve_phase;
use crate::evidence::quote::{choose_quote, QuoteSource};
use crate::evidence::scorer::{Evaluation, RelevanceScorer, StrengthLabel};
use crate::narrative::text::{normalize_whitespace, truncate_text, usable_text};
use crate::shift::{definition, LeadGroup, Phase, ShiftDefinition, ShiftId};

pub const DEFAULT_METHOD: &str = "shift_evidence";

// =============================================================================
// Metadata
// =============================================================================

/// Caller-supplied run metadata. Kept out of the builder so output stays pure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketMeta {
    pub generated_at: String,
    pub method: String,
    pub version: String,
}

impl Default for PacketMeta {
    fn default() -> Self {
        Self {
            generated_at: String::new(),
            method: DEFAULT_METHOD.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl PacketMeta {
    pub fn new(generated_at: &str, method: &str, version: &str) -> Self {
        Self {
            generated_at: generated_at.to_string(),
            method: method.to_string(),
            version: version.to_string(),
        }
    }

    /// Stamp the current UTC wall-clock time.
    pub fn now(method: &str, version: &str) -> Self {
        let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        Self::new(&generated_at, method, version)
    }
}

// =============================================================================
// Records
// =============================================================================

/// Why a record is (or is not) in the story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    /// Passed every gate and made the phase cap
    PassedThreshold,
    /// Below the gates, pulled in to fill the phase cap
    BackfillToPhaseCap,
    BelowCutoff,
    /// Passed every gate but lost out to the phase cap
    BelowPhaseCap,
    /// Passed every gate but strict mode requires full text
    BlockedNonFullText,
}

impl SelectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionReason::PassedThreshold => "passed_threshold",
            SelectionReason::BackfillToPhaseCap => "backfill_to_phase_cap",
            SelectionReason::BelowCutoff => "below_cutoff",
            SelectionReason::BelowPhaseCap => "below_phase_cap",
            SelectionReason::BlockedNonFullText => "blocked_non_full_text",
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, SelectionReason::PassedThreshold | SelectionReason::BackfillToPhaseCap)
    }

    fn outcome(&self) -> &'static str {
        match self {
            SelectionReason::PassedThreshold => "Selected for narrative.",
            SelectionReason::BackfillToPhaseCap => "Backfilled to reach the per-phase cap.",
            SelectionReason::BelowCutoff => "Excluded from core narrative.",
            SelectionReason::BelowPhaseCap => "Excluded due to per-phase cap despite passing score threshold.",
            SelectionReason::BlockedNonFullText => {
                "Not selected for packet because strict mode requires full-text evidence."
            }
        }
    }
}

/// One audited article in a packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub article_id: String,
    pub phase: Phase,
    pub published_date: String,
    pub url: Option<String>,
    pub publication: String,
    pub title: String,
    pub summary_snippet: String,
    pub signal_tags: Vec<String>,
    pub connection_text: String,
    pub argument_text: String,
    pub quote_text: String,
    pub quote_source: QuoteSource,
    pub quote_confidence: f64,
    pub include_in_story: bool,
    /// Passed the score, anchor and group gates
    pub candidate_include: bool,
    pub relevance_score: f64,
    pub strength_label: StrengthLabel,
    pub selection_reason: SelectionReason,
    pub rationale: String,
    pub fingerprint: String,
    pub text_state: TextState,
    pub anchor_hits: u32,
    pub active_groups: u32,
    pub lead_group: LeadGroup,
    pub group_hits: BTreeMap<LeadGroup, u32>,
}

/// Per-phase counter, serialized as `{"before": n, "after": m}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCounts {
    pub before: usize,
    pub after: usize,
}

impl PhaseCounts {
    pub fn get(&self, phase: Phase) -> usize {
        match phase {
            Phase::Before => self.before,
            Phase::After => self.after,
        }
    }

    fn bump(&mut self, phase: Phase) {
        match phase {
            Phase::Before => self.before += 1,
            Phase::After => self.after += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.before + self.after
    }
}

/// Complete, auditable selection for one shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidencePacket {
    pub generated_at: String,
    pub shift_id: ShiftId,
    pub method: String,
    pub version: String,
    pub selection_params: SelectionParams,
    pub phase_totals: PhaseCounts,
    pub phase_full_text_totals: PhaseCounts,
    pub selected_counts: PhaseCounts,
    pub selected_records: Vec<EvidenceRecord>,
    /// Every considered record, selected or not
    pub candidate_records: Vec<EvidenceRecord>,
}

impl EvidencePacket {
    pub fn shift(&self) -> &'static ShiftDefinition {
        definition(self.shift_id)
    }

    pub fn selected_in(&self, phase: Phase) -> impl Iterator<Item = &EvidenceRecord> {
        self.selected_records.iter().filter(move |r| r.phase == phase)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// Builder
// =============================================================================

struct Draft<'a> {
    candidate: ScoredCandidate<'a>,
    eval: Evaluation,
    candidate_include: bool,
    selectable_text: bool,
}

/// Builds [`EvidencePacket`]s for one shift
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    shift: ShiftId,
    params: SelectionParams,
    meta: PacketMeta,
    budgets: SynthesisBudgets,
}

impl PacketBuilder {
    /// Builder with the shift's documented parameter preset.
    pub fn new(shift: ShiftId) -> Self {
        Self {
            shift,
            params: SelectionParams::for_shift(shift),
            meta: PacketMeta::default(),
            budgets: SynthesisBudgets::default(),
        }
    }

    pub fn params(mut self, params: SelectionParams) -> Self {
        self.params = params;
        self
    }

    pub fn meta(mut self, meta: PacketMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn budgets(mut self, budgets: SynthesisBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    /// Score, gate and select `articles`. Ids must be unique; the final id
    /// tie-break depends on it.
    pub fn build(&self, articles: &[ArticleRecord]) -> Result<EvidencePacket> {
        let params = &self.params;
        params.validate()?;
        ensure_unique_ids(articles)?;

        let scorer = RelevanceScorer::new(self.shift);
        let drafts: Vec<Draft<'_>> = articles
            .iter()
            .map(|article| {
                let phase = resolve_phase(article, self.shift);
                let eval = scorer.evaluate(article, phase, params.scoring);
                let candidate_include = eval.score >= params.min_score
                    && eval.anchor_hits >= params.min_anchor_hits
                    && eval.active_groups >= params.min_group_hits;
                Draft {
                    candidate: ScoredCandidate { article, score: eval.score, phase },
                    eval,
                    candidate_include,
                    selectable_text: !params.full_text_only || article.is_full_text(),
                }
            })
            .collect();

        let mut phase_totals = PhaseCounts::default();
        let mut phase_full_text_totals = PhaseCounts::default();
        for draft in &drafts {
            phase_totals.bump(draft.candidate.phase);
            if draft.candidate.article.is_full_text() {
                phase_full_text_totals.bump(draft.candidate.phase);
            }
        }

        let mut selected = vec![false; drafts.len()];
        for phase in Phase::ALL {
            let by_relevance = |mut idx: Vec<usize>| {
                idx.sort_by(|&a, &b| compare_relevance(&drafts[a].candidate, &drafts[b].candidate));
                idx
            };

            let eligible = by_relevance(
                (0..drafts.len())
                    .filter(|&i| {
                        let d = &drafts[i];
                        d.candidate.phase == phase && d.selectable_text && d.candidate_include
                    })
                    .collect(),
            );
            let mut picks: Vec<usize> = eligible.into_iter().take(params.max_per_phase).collect();

            if params.backfill_to_phase_cap && picks.len() < params.max_per_phase {
                let pool = by_relevance(
                    (0..drafts.len())
                        .filter(|&i| {
                            let d = &drafts[i];
                            d.candidate.phase == phase && d.selectable_text && !picks.contains(&i)
                        })
                        .collect(),
                );
                let room = params.max_per_phase - picks.len();
                picks.extend(pool.into_iter().take(room));
            }

            for i in picks {
                selected[i] = true;
            }
        }

        let mut order: Vec<usize> = (0..drafts.len()).collect();
        order.sort_by(|&a, &b| {
            let (da, db) = (&drafts[a].candidate, &drafts[b].candidate);
            da.phase.cmp(&db.phase).then_with(|| compare_relevance(da, db))
        });

        let shift = definition(self.shift);
        let candidate_records: Vec<EvidenceRecord> = order
            .into_iter()
            .map(|i| {
                let draft = &drafts[i];
                let reason = match (selected[i], draft.candidate_include) {
                    (true, true) => SelectionReason::PassedThreshold,
                    (true, false) => SelectionReason::BackfillToPhaseCap,
                    (false, true) if !draft.selectable_text => SelectionReason::BlockedNonFullText,
                    (false, true) => SelectionReason::BelowPhaseCap,
                    (false, false) => SelectionReason::BelowCutoff,
                };
                self.record(shift, &scorer, draft, reason)
            })
            .collect();

        let selected_records: Vec<EvidenceRecord> =
            candidate_records.iter().filter(|r| r.include_in_story).cloned().collect();
        let mut selected_counts = PhaseCounts::default();
        for record in &selected_records {
            selected_counts.bump(record.phase);
        }

        tracing::info!(
            shift = %self.shift,
            considered = candidate_records.len(),
            selected_before = selected_counts.before,
            selected_after = selected_counts.after,
            "evidence packet built"
        );

        Ok(EvidencePacket {
            generated_at: self.meta.generated_at.clone(),
            shift_id: self.shift,
            method: self.meta.method.clone(),
            version: self.meta.version.clone(),
            selection_params: params.clone(),
            phase_totals,
            phase_full_text_totals,
            selected_counts,
            selected_records,
            candidate_records,
        })
    }

    fn record(
        &self,
        shift: &'static ShiftDefinition,
        scorer: &RelevanceScorer,
        draft: &Draft<'_>,
        reason: SelectionReason,
    ) -> EvidenceRecord {
        let article = draft.candidate.article;
        let phase = draft.candidate.phase;
        let eval = &draft.eval;
        let curated = article.curated_for(self.shift);

        let summary = curated
            .and_then(|c| usable_text(c.summary.as_deref()))
            .or_else(|| article.usable_summary())
            .unwrap_or("");
        let quote = choose_quote(scorer, article, phase, curated.and_then(|c| c.quote_text.as_deref()));
        let connection_text = match curated.and_then(|c| usable_text(c.connection_text.as_deref())) {
            Some(text) => normalize_whitespace(text),
            None => shift
                .connection_for(eval.lead_group, &article.corpus_text(), phase)
                .to_string(),
        };

        EvidenceRecord {
            article_id: article.id.clone(),
            phase,
            published_date: article.published_date().to_string(),
            url: article.url.clone().filter(|u| !u.trim().is_empty()),
            publication: article.publication.clone(),
            title: article.title.trim().to_string(),
            summary_snippet: truncate_text(&normalize_whitespace(summary), self.budgets.snippet),
            signal_tags: eval.signal_tags.clone(),
            connection_text,
            argument_text: shift.argument_for(eval.lead_group).to_string(),
            fingerprint: fingerprint(&article.id, phase, eval.score, summary, article.tag_slugs(), &quote.text),
            quote_text: quote.text,
            quote_source: quote.source,
            quote_confidence: round_to(quote.confidence, 3),
            include_in_story: reason.is_selected(),
            candidate_include: draft.candidate_include,
            relevance_score: round_to(eval.score, 2),
            strength_label: self.params.scoring.strength(eval.score),
            selection_reason: reason,
            rationale: rationale(phase, eval, draft.candidate_include, reason),
            text_state: article.text_state,
            anchor_hits: eval.anchor_hits,
            active_groups: eval.active_groups,
            lead_group: eval.lead_group,
            group_hits: eval.group_hits.clone(),
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Human-readable audit line: outcome, gate verdict, then the numbers.
fn rationale(phase: Phase, eval: &Evaluation, passed_gates: bool, reason: SelectionReason) -> String {
    let verdict = if passed_gates {
        "Relevance is high and concept coverage is multi-dimensional."
    } else {
        "Relevance is insufficient under the selection criteria."
    };
    let mut groups: Vec<(&LeadGroup, &u32)> = eval.group_hits.iter().collect();
    groups.sort_by(|a, b| b.1.cmp(a.1));
    let group_summary = groups
        .iter()
        .map(|(group, hits)| format!("{}:{}", group, hits))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} {} Score={:.1}; phase={}; anchors={}; lead_group={}; group_hits=[{}].",
        reason.outcome(),
        verdict,
        eval.score,
        phase,
        eval.anchor_hits,
        eval.lead_group,
        group_summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(14.456, 2), 14.46);
        assert_eq!(round_to(0.4499, 3), 0.45);
    }

    #[test]
    fn test_reason_serde_names() {
        for reason in [
            SelectionReason::PassedThreshold,
            SelectionReason::BackfillToPhaseCap,
            SelectionReason::BelowCutoff,
            SelectionReason::BelowPhaseCap,
            SelectionReason::BlockedNonFullText,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }

    #[test]
    fn test_meta_now_format() {
        let meta = PacketMeta::now("m", "v1");
        assert!(meta.generated_at.ends_with(" UTC"));
        assert_eq!(meta.generated_at.len(), "2026-01-01 00:00:00 UTC".len());
    }
}
