//! Narrative cards for the story view.
//!
//! Each text field resolves through an ordered fallback: curated evidence, then
//! the persisted shift annotation (only when its phase agrees), then freshly
//! generated text. Cards are derived; sources are never mutated.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, SynthesisBudgets};
use crate::corpus::{ArticleRecord, ShiftAnnotation};
use crate::evidence::coverage::{select_story_records, StoryEntry, StoryOrigin};
use crate::evidence::phase::{resolve_phase_with_source, PhaseSource};
use crate::evidence::quote::{choose_quote, QuoteSource};
use crate::evidence::scorer::{RelevanceScorer, ScoringModel, StrengthLabel};
use crate::narrative::synth::{NarrativeSynthesizer, SynthesisReport};
use crate::narrative::text::{truncate_text, usable_text};
use crate::shift::{LeadGroup, Phase, ShiftId};

pub const MAX_CARD_TAGS: usize = 3;
pub const UNTAGGED_LABEL: &str = "Untagged";
pub const UNTAGGED_SLUG: &str = "untagged";

// =============================================================================
// Fallback Resolution
// =============================================================================

/// Where a resolved text field came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    Curated,
    Annotation,
    Generated,
}

/// Curated > annotation > generated. Blank and placeholder values are skipped;
/// `generate` only runs when both are unusable.
pub fn resolve_text<F>(curated: Option<&str>, annotation: Option<&str>, generate: F) -> (String, TextSource)
where
    F: FnOnce() -> String,
{
    if let Some(text) = usable_text(curated) {
        return (text.to_string(), TextSource::Curated);
    }
    if let Some(text) = usable_text(annotation) {
        return (text.to_string(), TextSource::Annotation);
    }
    (generate(), TextSource::Generated)
}

// =============================================================================
// Cards
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTag {
    pub label: String,
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSources {
    pub summary: TextSource,
    pub takeaway: TextSource,
    pub connection: TextSource,
    pub quote: QuoteSource,
    /// Curated phase assignment or the publication year.
    pub phase: PhaseSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeCard {
    pub id: String,
    pub title: String,
    pub date: String,
    pub url: Option<String>,
    pub publication: String,
    pub tags: Vec<CardTag>,
    pub summary: String,
    pub takeaway: String,
    pub connection: String,
    pub quote: String,
    pub phase: Phase,
    pub strength: StrengthLabel,
    pub relevance: f64,
    pub lead_group: LeadGroup,
    pub sources: CardSources,
    pub origin: StoryOrigin,
}

/// First `MAX_CARD_TAGS` tags, or the single untagged placeholder.
pub fn card_tags(article: &ArticleRecord) -> Vec<CardTag> {
    if article.tags.is_empty() {
        return vec![CardTag {
            label: UNTAGGED_LABEL.to_string(),
            slug: UNTAGGED_SLUG.to_string(),
        }];
    }
    article
        .tags
        .iter()
        .take(MAX_CARD_TAGS)
        .map(|t| CardTag {
            label: t.label.clone(),
            slug: t.slug.clone(),
        })
        .collect()
}

/// Builds cards for one shift, sharing a synthesizer across the run.
pub struct CardBuilder {
    shift: ShiftId,
    scorer: RelevanceScorer,
    synth: NarrativeSynthesizer,
}

impl CardBuilder {
    pub fn new(shift: ShiftId) -> Self {
        Self::with_budgets(shift, SynthesisBudgets::default())
    }

    pub fn with_budgets(shift: ShiftId, budgets: SynthesisBudgets) -> Self {
        Self {
            shift,
            scorer: RelevanceScorer::new(shift),
            synth: NarrativeSynthesizer::with_budgets(shift.definition(), budgets),
        }
    }

    pub fn build(&mut self, entry: &StoryEntry<'_>) -> NarrativeCard {
        let article = entry.candidate.article;
        let phase = entry.candidate.phase;
        let definition = self.shift.definition();
        let curated = article.curated_for(self.shift);
        let annotation: Option<&ShiftAnnotation> = article
            .annotation_for(self.shift)
            .filter(|a| a.phase == phase);

        let lead_group = self.scorer.evaluate(article, phase, ScoringModel::Relevance).lead_group;
        let raw_summary = article.usable_summary();
        let budgets = self.synth.budgets().clone();

        let (connection, connection_source) = resolve_text(
            curated.and_then(|c| c.connection_text.as_deref()),
            annotation.map(|a| a.connection.as_str()),
            || definition.rule_connection(&article.corpus_text(), phase).to_string(),
        );

        let synth = &mut self.synth;
        let (summary, summary_source) = resolve_text(
            curated.and_then(|c| c.summary.as_deref()),
            None,
            || synth.summary(raw_summary, &connection),
        );
        let (takeaway, takeaway_source) = resolve_text(
            curated.and_then(|c| c.takeaway.as_deref()),
            annotation.map(|a| a.key_message.as_str()),
            || synth.takeaway(lead_group, raw_summary, &connection, phase),
        );

        let quote = choose_quote(&self.scorer, article, phase, curated.and_then(|c| c.quote_text.as_deref()));
        let (_, phase_source) = resolve_phase_with_source(article, self.shift);

        NarrativeCard {
            id: article.id.clone(),
            title: article.title.clone(),
            date: article.published_date().to_string(),
            url: article.url.clone().filter(|u| !u.trim().is_empty()),
            publication: article.publication.clone(),
            tags: card_tags(article),
            summary: truncate_text(&summary, budgets.summary),
            takeaway: truncate_text(&takeaway, budgets.takeaway),
            connection: truncate_text(&connection, budgets.takeaway),
            quote: truncate_text(&quote.text, budgets.quote),
            phase,
            strength: ScoringModel::Relevance.strength(entry.candidate.score),
            relevance: (entry.candidate.score * 100.0).round() / 100.0,
            lead_group,
            sources: CardSources {
                summary: summary_source,
                takeaway: takeaway_source,
                connection: connection_source,
                quote: quote.source,
                phase: phase_source,
            },
            origin: entry.origin,
        }
    }

    pub fn build_all(&mut self, entries: &[StoryEntry<'_>]) -> Vec<NarrativeCard> {
        entries.iter().map(|entry| self.build(entry)).collect()
    }

    pub fn report(&self) -> SynthesisReport {
        self.synth.report()
    }
}

/// Select story records for `shift` and turn them into cards.
pub fn story_cards(articles: &[ArticleRecord], shift: ShiftId, config: &EngineConfig) -> (Vec<NarrativeCard>, SynthesisReport) {
    let entries = select_story_records(articles, shift, &config.coverage);
    let mut builder = CardBuilder::with_budgets(shift, config.budgets.clone());
    let cards = builder.build_all(&entries);
    tracing::debug!(shift = %shift, cards = cards.len(), "built story cards");
    (cards, builder.report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CuratedEvidence;
    use crate::evidence::coverage::ScoredCandidate;
    use crate::narrative::synth::SUMMARY_PENDING;
    use crate::shift::definition;
    use crate::testing::ArticleBuilder;

    fn entry(article: &ArticleRecord, phase: Phase, score: f64) -> StoryEntry<'_> {
        StoryEntry {
            candidate: ScoredCandidate { article, score, phase },
            origin: StoryOrigin::Scored,
        }
    }

    #[test]
    fn test_resolve_text_precedence() {
        let generated = || "generated".to_string();
        assert_eq!(resolve_text(Some("curated"), Some("note"), generated), ("curated".to_string(), TextSource::Curated));
        assert_eq!(resolve_text(Some("  "), Some("note"), generated), ("note".to_string(), TextSource::Annotation));
        assert_eq!(resolve_text(Some("{{x}}"), Some("TBD"), generated), ("generated".to_string(), TextSource::Generated));
        assert_eq!(resolve_text(None, None, generated), ("generated".to_string(), TextSource::Generated));
    }

    #[test]
    fn test_resolve_text_skips_generator_when_resolved() {
        let (text, _) = resolve_text(Some("kept"), None, || panic!("generator should not run"));
        assert_eq!(text, "kept");
    }

    #[test]
    fn test_tags_capped_and_untagged_placeholder() {
        let article = ArticleBuilder::new("t1").tag("ecology").tag("democracy").tag("science").tag("protest").build();
        let tags = card_tags(&article);
        assert_eq!(tags.len(), MAX_CARD_TAGS);
        assert_eq!(tags[2].slug, "science");

        let bare = ArticleBuilder::new("t2").build();
        assert_eq!(card_tags(&bare), vec![CardTag { label: UNTAGGED_LABEL.into(), slug: UNTAGGED_SLUG.into() }]);
    }

    #[test]
    fn test_generated_card() {
        let article = ArticleBuilder::new("g1")
            .title("Constitution under strain")
            .year(2019)
            .summary("The constitution is tired. Institutions drift.")
            .tag("democracy")
            .build();
        let mut builder = CardBuilder::new(ShiftId::RepublicShift);
        let card = builder.build(&entry(&article, Phase::Before, 7.0));

        assert_eq!(card.summary, "The constitution is tired. Institutions drift.");
        assert_eq!(card.sources.summary, TextSource::Generated);
        assert_eq!(card.sources.takeaway, TextSource::Generated);
        assert!(card.takeaway.starts_with(definition(ShiftId::RepublicShift).argument_for(card.lead_group)));
        assert_eq!(card.strength, StrengthLabel::Strong);
        assert_eq!(card.date, "2019-06-15");
        assert!(card.url.is_none());
        assert_eq!(card.quote, "The constitution is tired.");
    }

    #[test]
    fn test_placeholder_summary_card_matches_missing_summary() {
        let with_placeholder = ArticleBuilder::new("p1").title("Quiet column").summary("${summary}").build();
        let without = ArticleBuilder::new("p1").title("Quiet column").build();

        let a = CardBuilder::new(ShiftId::EcologicalShift).build(&entry(&with_placeholder, Phase::Before, 0.0));
        let b = CardBuilder::new(ShiftId::EcologicalShift).build(&entry(&without, Phase::Before, 0.0));
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.takeaway, b.takeaway);
        assert_eq!(a.quote, b.quote);
        assert_ne!(a.summary, SUMMARY_PENDING);
        assert_eq!(a.strength, StrengthLabel::Weak);
    }

    #[test]
    fn test_curated_and_annotation_override_generated() {
        let article = ArticleBuilder::new("c1")
            .year(2025)
            .summary("Generated summary. Second.")
            .annotation(ShiftId::RepublicShift, Phase::After, "Annotated connection.", "Annotated key message.")
            .curated(
                ShiftId::RepublicShift,
                CuratedEvidence {
                    summary: Some("Curated summary.".into()),
                    ..CuratedEvidence::default()
                },
            )
            .build();
        let card = CardBuilder::new(ShiftId::RepublicShift).build(&entry(&article, Phase::After, 3.0));
        assert_eq!((card.summary.as_str(), card.sources.summary), ("Curated summary.", TextSource::Curated));
        assert_eq!((card.takeaway.as_str(), card.sources.takeaway), ("Annotated key message.", TextSource::Annotation));
        assert_eq!(card.connection, "Annotated connection.");
        assert_eq!(card.sources.phase, PhaseSource::Year);
    }

    #[test]
    fn test_curated_phase_is_reported() {
        let article = ArticleBuilder::new("c3")
            .year(2019)
            .curated(
                ShiftId::RepublicShift,
                CuratedEvidence {
                    phase: Some(Phase::After),
                    ..CuratedEvidence::default()
                },
            )
            .build();
        let (cards, _) = story_cards(std::slice::from_ref(&article), ShiftId::RepublicShift, &EngineConfig::default());
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].phase, Phase::After);
        assert_eq!(cards[0].sources.phase, PhaseSource::Curated);

        let json = serde_json::to_value(&cards[0].sources).unwrap();
        assert_eq!(json["phase"], "curated");
    }

    #[test]
    fn test_annotation_for_other_phase_is_ignored() {
        let article = ArticleBuilder::new("c2")
            .year(2025)
            .annotation(ShiftId::RepublicShift, Phase::Before, "Stale connection.", "Stale key message.")
            .build();
        let card = CardBuilder::new(ShiftId::RepublicShift).build(&entry(&article, Phase::After, 3.0));
        assert_eq!(card.sources.takeaway, TextSource::Generated);
        assert_eq!(card.sources.connection, TextSource::Generated);
        assert_ne!(card.takeaway, "Stale key message.");
    }

    #[test]
    fn test_story_cards_backfill_and_report() {
        let articles: Vec<ArticleRecord> = (0..15)
            .map(|i| ArticleBuilder::new(&format!("s{i:02}")).title("Monsoon diary").year(2010 + i).build())
            .collect();
        let (cards, report) = story_cards(&articles, ShiftId::PoliticalShift, &EngineConfig::default());
        assert_eq!(cards.len(), 12);
        assert!(cards.iter().all(|c| c.origin == StoryOrigin::Backfill));
        assert_eq!(report.takeaways, 12);
        assert!(report.template_uses.len() <= report.template_limit);
    }
}
