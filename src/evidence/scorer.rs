//! Relevance and Research Scoring
//!
//! Keyword hits are counted with Aho-Corasick over lower-cased text. A keyword
//! counts once no matter how often it occurs.
//!
//! # Models
//! - **Relevance**: keyword hits + 2 per preferred tag slug + 1 for temporal proximity
//!   (|year - milestone| <= 2). Unnormalized; comparable only within one shift.
//! - **Research**: per lead group `title*4 + summary*2 + min(body, cap)`, plus
//!   weighted anchor hits and phase signal tags.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::corpus::ArticleRecord;
use crate::narrative::text::normalize_lower;
use crate::shift::{definition, LeadGroup, Phase, ResearchWeights, ShiftDefinition, ShiftId};

/// Bonus per preferred tag slug present on the article
pub const TAG_BONUS: f64 = 2.0;
/// Temporal proximity window (years either side of the milestone)
pub const PROXIMITY_WINDOW: i32 = 2;

// =============================================================================
// Keyword Matcher
// =============================================================================

/// Distinct-keyword counter over lower-cased text.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let automaton = if patterns.is_empty() {
            None
        } else {
            // Standard match kind: overlapping search needs it ("second republic" vs "republic")
            match AhoCorasickBuilder::new()
                .match_kind(MatchKind::Standard)
                .ascii_case_insensitive(true)
                .build(&patterns)
            {
                Ok(automaton) => Some(automaton),
                Err(e) => {
                    tracing::warn!(error = %e, "keyword automaton build failed, using substring scan");
                    None
                }
            }
        };

        Self { patterns, automaton }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Per-pattern presence flags, in pattern order.
    pub fn hits(&self, text: &str) -> Vec<bool> {
        let mut seen = vec![false; self.patterns.len()];
        if text.is_empty() {
            return seen;
        }
        match &self.automaton {
            Some(automaton) => {
                for mat in automaton.find_overlapping_iter(text) {
                    seen[mat.pattern().as_usize()] = true;
                }
            }
            None => {
                for (flag, pattern) in seen.iter_mut().zip(&self.patterns) {
                    *flag = text.contains(pattern.as_str());
                }
            }
        }
        seen
    }

    /// Number of distinct keywords present.
    pub fn count(&self, text: &str) -> u32 {
        self.hits(text).into_iter().filter(|hit| *hit).count() as u32
    }
}

// =============================================================================
// Models and Strength
// =============================================================================

/// Which scoring formula a packet uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringModel {
    #[default]
    Relevance,
    Research,
}

/// Qualitative evidence strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLabel {
    Weak,
    Moderate,
    Strong,
}

impl StrengthLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::Strong => "strong",
            StrengthLabel::Moderate => "moderate",
            StrengthLabel::Weak => "weak",
        }
    }
}

impl ScoringModel {
    /// `(strong, moderate)` lower bounds
    pub fn strength_thresholds(&self) -> (f64, f64) {
        match self {
            ScoringModel::Relevance => (6.0, 3.0),
            ScoringModel::Research => (18.0, 11.0),
        }
    }

    pub fn strength(&self, score: f64) -> StrengthLabel {
        let (strong, moderate) = self.strength_thresholds();
        if score >= strong {
            StrengthLabel::Strong
        } else if score >= moderate {
            StrengthLabel::Moderate
        } else {
            StrengthLabel::Weak
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Relevance score split into its three terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub keyword_hits: u32,
    pub tag_bonus: f64,
    pub proximity_bonus: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.keyword_hits as f64 + self.tag_bonus + self.proximity_bonus
    }
}

/// Everything the packet builder needs to know about one article in one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub anchor_hits: u32,
    /// Weighted per-group hits (title*4 + summary*2 + capped body)
    pub group_hits: BTreeMap<LeadGroup, u32>,
    pub active_groups: u32,
    pub lead_group: LeadGroup,
    pub signal_tags: Vec<String>,
}

// =============================================================================
// Scorer
// =============================================================================

/// Scorer bound to one shift definition. Matchers are built once per pass.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    shift: &'static ShiftDefinition,
    research: ResearchWeights,
    keywords: KeywordMatcher,
    anchors: KeywordMatcher,
    before_groups: Vec<(LeadGroup, KeywordMatcher)>,
    after_groups: Vec<(LeadGroup, KeywordMatcher)>,
}

impl RelevanceScorer {
    pub fn new(shift: ShiftId) -> Self {
        let shift = definition(shift);
        Self {
            shift,
            research: shift.research,
            keywords: KeywordMatcher::new(shift.keywords),
            anchors: KeywordMatcher::new(shift.anchors),
            before_groups: Self::group_matchers(shift, Phase::Before),
            after_groups: Self::group_matchers(shift, Phase::After),
        }
    }

    /// Shifts without a group table score their keyword list as one catch-all group.
    fn group_matchers(shift: &ShiftDefinition, phase: Phase) -> Vec<(LeadGroup, KeywordMatcher)> {
        let groups = shift.groups_for(phase);
        if groups.is_empty() {
            return vec![(LeadGroup::CrossCurrents, KeywordMatcher::new(shift.keywords))];
        }
        groups
            .iter()
            .map(|g| (g.group, KeywordMatcher::new(g.keywords)))
            .collect()
    }

    /// Replace the shift's research weights for this scorer only.
    pub fn with_research(mut self, research: ResearchWeights) -> Self {
        self.research = research;
        self
    }

    pub fn shift(&self) -> &'static ShiftDefinition {
        self.shift
    }

    pub fn research(&self) -> &ResearchWeights {
        &self.research
    }

    fn groups(&self, phase: Phase) -> &[(LeadGroup, KeywordMatcher)] {
        match phase {
            Phase::Before => &self.before_groups,
            Phase::After => &self.after_groups,
        }
    }

    /// §Relevance model, term by term.
    pub fn breakdown(&self, article: &ArticleRecord) -> ScoreBreakdown {
        let text = article.corpus_text();
        let keyword_hits = self.keywords.count(&text);
        let preferred = self
            .shift
            .preferred_tag_slugs
            .iter()
            .filter(|slug| article.has_tag(slug))
            .count();
        let near_milestone = (article.year - self.shift.milestone_year).abs() <= PROXIMITY_WINDOW;

        ScoreBreakdown {
            keyword_hits,
            tag_bonus: preferred as f64 * TAG_BONUS,
            proximity_bonus: if near_milestone { 1.0 } else { 0.0 },
        }
    }

    /// Relevance score. Pure and deterministic.
    pub fn score(&self, article: &ArticleRecord) -> f64 {
        self.breakdown(article).total()
    }

    /// Raw (unweighted) group hits over already-normalized text.
    pub fn raw_group_hits(&self, text: &str, phase: Phase) -> Vec<(LeadGroup, u32)> {
        self.groups(phase)
            .iter()
            .map(|(group, matcher)| (*group, matcher.count(text)))
            .collect()
    }

    pub fn anchor_hits(&self, text: &str) -> u32 {
        self.anchors.count(text)
    }

    /// Full evaluation of `article` in `phase` under `model`.
    pub fn evaluate(&self, article: &ArticleRecord, phase: Phase, model: ScoringModel) -> Evaluation {
        let title = normalize_lower(&article.title);
        let summary = normalize_lower(article.usable_summary().unwrap_or(""));
        let body = normalize_lower(article.body());
        let research = self.research;
        let cap = research.body_hit_cap;

        let in_title = self.raw_group_hits(&title, phase);
        let in_summary = self.raw_group_hits(&summary, phase);
        let in_body = self.raw_group_hits(&body, phase);

        // Table order is kept here so the lead group is the first maximum.
        let weighted: Vec<(LeadGroup, u32)> = in_title
            .iter()
            .zip(&in_summary)
            .zip(&in_body)
            .map(|(((group, t), (_, s)), (_, b))| (*group, t * research.title + s * research.summary + (*b).min(cap)))
            .collect();

        let lead_group = weighted
            .iter()
            .fold(None::<(LeadGroup, u32)>, |best, &(group, hits)| match best {
                Some((_, top)) if top >= hits => best,
                _ if hits > 0 => Some((group, hits)),
                _ => best,
            })
            .map(|(group, _)| group)
            .unwrap_or(LeadGroup::CrossCurrents);

        let active_groups = weighted.iter().filter(|(_, hits)| *hits > 0).count() as u32;
        let group_sum: u32 = weighted.iter().map(|(_, hits)| hits).sum();

        let combined = [title.as_str(), summary.as_str(), body.as_str()].join(" ");
        let anchor_hits = self.anchor_hits(&combined);

        let phase_signals = self.shift.tag_signals_for(phase);
        let signal_tags: Vec<String> = article
            .tag_slugs()
            .filter(|slug| phase_signals.contains(slug))
            .map(str::to_string)
            .collect();

        let breakdown = self.breakdown(article);
        let score = match model {
            ScoringModel::Relevance => breakdown.total(),
            ScoringModel::Research => {
                group_sum as f64
                    + signal_tags.len() as f64 * research.tag_weight
                    + anchor_hits as f64 * research.anchor_weight
            }
        };

        Evaluation {
            score,
            breakdown,
            anchor_hits,
            group_hits: weighted.into_iter().collect(),
            active_groups,
            lead_group,
            signal_tags,
        }
    }
}

/// Relevance score of one article against one shift.
pub fn score(article: &ArticleRecord, shift: ShiftId) -> f64 {
    RelevanceScorer::new(shift).score(article)
}
