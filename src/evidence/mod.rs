//! Shift Evidence Engine
//!
//! Scores articles against a shift, classifies them into phases, guarantees
//! story coverage and builds auditable evidence packets.

pub mod brief;
pub mod coverage;
pub mod fingerprint;
pub mod packet;
pub mod params;
pub mod phase;
pub mod quote;
pub mod scorer;

#[cfg(test)]
mod tests;

pub use brief::{render_brief, DEFAULT_TOP_N};
pub use coverage::{
    compare_relevance, ensure_minimum_coverage, fallback_score, score_candidates, select_story_records,
    ScoredCandidate, StoryEntry, StoryOrigin,
};
pub use fingerprint::fingerprint;
pub use packet::{
    EvidencePacket, EvidenceRecord, PacketBuilder, PacketMeta, PhaseCounts, SelectionReason,
};
pub use params::SelectionParams;
pub use phase::{classify, resolve_phase, resolve_phase_with_source, PhaseSource};
pub use quote::{choose_quote, Quote, QuoteSource};
pub use scorer::{score, Evaluation, KeywordMatcher, RelevanceScorer, ScoreBreakdown, ScoringModel, StrengthLabel};
