//! Tests for the Evidence Packet Builder
//!
//! Phase caps, backfill, strict full-text mode, audit reasons and idempotence.

use crate::corpus::{ArticleRecord, CuratedEvidence};
use crate::error::EngineError;
use crate::evidence::brief::render_brief;
use crate::evidence::packet::{PacketBuilder, PacketMeta, SelectionReason};
use crate::evidence::params::SelectionParams;
use crate::evidence::quote::QuoteSource;
use crate::evidence::scorer::{ScoringModel, StrengthLabel};
use crate::shift::{definition, LeadGroup, Phase, ShiftId};
use crate::testing::ArticleBuilder;

fn relaxed(max_per_phase: usize) -> SelectionParams {
    SelectionParams {
        max_per_phase,
        ..SelectionParams::default()
    }
    .allow_non_full_text()
}

/// `passing` before-phase political articles scoring 3, then `failing` scoring 0.
fn political_before(passing: usize, failing: usize) -> Vec<ArticleRecord> {
    let mut articles = Vec::new();
    for i in 0..passing {
        articles.push(
            ArticleBuilder::new(&format!("pass-{i:02}"))
                .title("Politics of dissent")
                .date(&format!("2020-{:02}-01", 1 + i % 12))
                .build(),
        );
    }
    for i in 0..failing {
        articles.push(ArticleBuilder::new(&format!("fail-{i:02}")).title("Monsoon diary").year(2010).build());
    }
    articles
}

fn reasons(packet: &crate::evidence::EvidencePacket, reason: SelectionReason) -> usize {
    packet.candidate_records.iter().filter(|r| r.selection_reason == reason).count()
}

// ============================================================================
// Phase Caps and Backfill
// ============================================================================

#[test]
fn test_backfill_fills_thin_phase_to_cap() {
    // 64 before-candidates, 9 above min_score
    let articles = political_before(9, 55);
    let packet = PacketBuilder::new(ShiftId::PoliticalShift)
        .params(relaxed(12))
        .build(&articles)
        .unwrap();

    assert_eq!(packet.phase_totals.before, 64);
    assert_eq!(packet.selected_counts.before, 12);
    assert_eq!(packet.selected_counts.after, 0);
    assert_eq!(reasons(&packet, SelectionReason::PassedThreshold), 9);
    assert_eq!(reasons(&packet, SelectionReason::BackfillToPhaseCap), 3);
    assert_eq!(reasons(&packet, SelectionReason::BelowCutoff), 52);
    assert_eq!(packet.candidate_records.len(), 64);

    // Genuinely scored records come first within the phase
    let first_nine = &packet.selected_records[..9];
    assert!(first_nine.iter().all(|r| r.selection_reason == SelectionReason::PassedThreshold));
}

#[test]
fn test_without_backfill_phase_stays_thin() {
    let articles = political_before(9, 55);
    let params = SelectionParams {
        backfill_to_phase_cap: false,
        ..relaxed(12)
    };
    let packet = PacketBuilder::new(ShiftId::PoliticalShift).params(params).build(&articles).unwrap();
    assert_eq!(packet.selected_counts.before, 9);
    assert_eq!(reasons(&packet, SelectionReason::BackfillToPhaseCap), 0);
}

#[test]
fn test_cap_is_exact_when_enough_qualify() {
    let articles = political_before(15, 3);
    let packet = PacketBuilder::new(ShiftId::PoliticalShift)
        .params(relaxed(12))
        .build(&articles)
        .unwrap();
    assert_eq!(packet.selected_counts.before, 12);
    assert_eq!(reasons(&packet, SelectionReason::BelowPhaseCap), 3);
    assert_eq!(reasons(&packet, SelectionReason::BelowCutoff), 3);

    let capped = packet
        .candidate_records
        .iter()
        .find(|r| r.selection_reason == SelectionReason::BelowPhaseCap)
        .unwrap();
    assert!(capped.rationale.starts_with("Excluded due to per-phase cap"));
    assert!(capped.candidate_include && !capped.include_in_story);
}

#[test]
fn test_backfill_is_bounded_by_phase_pool() {
    // Only 4 before-phase articles exist at all
    let articles = political_before(2, 2);
    let packet = PacketBuilder::new(ShiftId::PoliticalShift)
        .params(relaxed(12))
        .build(&articles)
        .unwrap();
    assert_eq!(packet.selected_counts.before, 4);
}

#[test]
fn test_selected_partition_by_phase() {
    let mut articles = political_before(14, 0);
    for i in 0..14 {
        articles.push(
            ArticleBuilder::new(&format!("after-{i:02}"))
                .title("Yatra and body politics")
                .year(2023)
                .build(),
        );
    }
    let max = 5;
    let packet = PacketBuilder::new(ShiftId::PoliticalShift)
        .params(relaxed(max))
        .build(&articles)
        .unwrap();

    assert!(packet.selected_records.len() <= 2 * max);
    assert_eq!(packet.selected_counts.before, max);
    assert_eq!(packet.selected_counts.after, max);
    let before = packet.selected_in(Phase::Before).count();
    let after = packet.selected_in(Phase::After).count();
    assert_eq!(before + after, packet.selected_records.len());
    // Records are grouped: every before record precedes every after record
    let first_after = packet.selected_records.iter().position(|r| r.phase == Phase::After).unwrap();
    assert!(packet.selected_records[first_after..].iter().all(|r| r.phase == Phase::After));
}

// ============================================================================
// Strict Full-Text Mode
// ============================================================================

#[test]
fn test_strict_mode_blocks_non_full_text() {
    let articles = vec![
        ArticleBuilder::new("full").title("Politics of dissent").year(2020).full_text("Body.").build(),
        ArticleBuilder::new("partial").title("Politics of dissent").year(2020).partial_text("Bo").build(),
        ArticleBuilder::new("missing").title("Politics of dissent").year(2020).build(),
        ArticleBuilder::new("weak-missing").title("Monsoon").year(2010).build(),
    ];
    let params = SelectionParams {
        max_per_phase: 12,
        ..SelectionParams::default()
    };
    let packet = PacketBuilder::new(ShiftId::PoliticalShift).params(params).build(&articles).unwrap();

    assert_eq!(packet.selected_counts.before, 1);
    assert_eq!(packet.selected_records[0].article_id, "full");
    assert_eq!(reasons(&packet, SelectionReason::BlockedNonFullText), 2);
    // Blocked records never come back through backfill
    assert_eq!(reasons(&packet, SelectionReason::BackfillToPhaseCap), 0);
    assert_eq!(reasons(&packet, SelectionReason::BelowCutoff), 1);
    assert_eq!(packet.phase_totals.before, 4);
    assert_eq!(packet.phase_full_text_totals.before, 1);

    let blocked = packet.candidate_records.iter().find(|r| r.article_id == "partial").unwrap();
    assert!(blocked.rationale.starts_with("Not selected for packet because strict mode"));
}

// ============================================================================
// Research Model and Audit Fields
// ============================================================================

fn republic_rich() -> ArticleRecord {
    ArticleBuilder::new("rich")
        .title("The constitution, the citizen and the state")
        .summary("Institutional decay and the crisis of democracy.")
        .date("2020-02-10")
        .url("https://example.org/rich")
        .publication("Deccan Herald")
        .full_text("A short body.")
        .build()
}

#[test]
fn test_research_packet_audit_fields() {
    let articles = vec![
        republic_rich(),
        ArticleBuilder::new("thin").title("A walk").year(2020).full_text("Nothing here.").build(),
    ];
    let params = SelectionParams {
        backfill_to_phase_cap: false,
        ..SelectionParams::for_shift(ShiftId::RepublicShift)
    };
    let packet = PacketBuilder::new(ShiftId::RepublicShift).params(params).build(&articles).unwrap();
    assert_eq!(packet.selection_params.scoring, ScoringModel::Research);
    assert_eq!(packet.selected_records.len(), 1);

    let record = &packet.selected_records[0];
    assert_eq!(record.article_id, "rich");
    assert_eq!(record.relevance_score, 24.0);
    assert_eq!(record.strength_label, StrengthLabel::Strong);
    assert_eq!(record.anchor_hits, 5);
    assert_eq!(record.active_groups, 3);
    assert_eq!(record.lead_group, LeadGroup::InstitutionalGrammar);
    assert_eq!(record.group_hits[&LeadGroup::InstitutionalGrammar], 14);
    assert_eq!(record.argument_text, LeadGroup::InstitutionalGrammar.argument().unwrap());
    assert_eq!(record.connection_text, LeadGroup::InstitutionalGrammar.connection().unwrap());
    assert_eq!(record.published_date, "2020-02-10");
    assert_eq!(record.summary_snippet, "Institutional decay and the crisis of democracy.");
    assert_eq!(record.quote_source, QuoteSource::SummarySentence);
    assert_eq!(record.fingerprint.len(), 64);
    assert!(record.rationale.contains("lead_group=institutional_grammar"));
    assert!(record.rationale.contains("Score=24.0"));

    let thin = packet.candidate_records.iter().find(|r| r.article_id == "thin").unwrap();
    assert_eq!(thin.selection_reason, SelectionReason::BelowCutoff);
    assert_eq!(thin.lead_group, LeadGroup::CrossCurrents);
    assert_eq!(thin.argument_text, crate::shift::definition(ShiftId::RepublicShift).catch_all_argument);
}

#[test]
fn test_curated_fields_override_generated() {
    let article = ArticleBuilder::new("cur")
        .title("Politics of dissent")
        .year(2019)
        .summary("Original summary.")
        .curated(
            ShiftId::PoliticalShift,
            CuratedEvidence {
                phase: Some(Phase::After),
                connection_text: Some("Curated connection.".to_string()),
                quote_text: Some("Curated quote.".to_string()),
                summary: Some("{{summary}}".to_string()),
                ..Default::default()
            },
        )
        .build();
    let packet = PacketBuilder::new(ShiftId::PoliticalShift)
        .params(relaxed(3))
        .build(std::slice::from_ref(&article))
        .unwrap();
    let record = &packet.selected_records[0];
    assert_eq!(record.phase, Phase::After);
    assert_eq!(record.connection_text, "Curated connection.");
    assert_eq!(record.quote_text, "Curated quote.");
    assert_eq!(record.quote_source, QuoteSource::Curated);
    assert_eq!(record.quote_confidence, 1.0);
    // A placeholder curated summary falls through to the article's own
    assert_eq!(record.summary_snippet, "Original summary.");
}

#[test]
fn test_invalid_params_fail_loud() {
    let params = SelectionParams {
        max_per_phase: 0,
        ..SelectionParams::default()
    };
    assert!(PacketBuilder::new(ShiftId::PoliticalShift).params(params).build(&[]).is_err());
}

// ============================================================================
// Idempotence and Rendering
// ============================================================================

#[test]
fn test_identical_inputs_give_identical_json() {
    let mut articles = political_before(9, 20);
    articles.push(republic_rich());
    let builder = PacketBuilder::new(ShiftId::PoliticalShift)
        .params(relaxed(12))
        .meta(PacketMeta::new("2026-01-01 00:00:00 UTC", "shift_evidence", "v1"));

    let first = builder.build(&articles).unwrap().to_json_pretty().unwrap();
    let second = builder.build(&articles).unwrap().to_json_pretty().unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("{\n  \"generated_at\": \"2026-01-01 00:00:00 UTC\""));
}

#[test]
fn test_brief_lists_both_phases() {
    let mut articles = political_before(3, 0);
    articles.push(
        ArticleBuilder::new("late")
            .title("Yatra as body politics")
            .summary("The yatra makes politics physical.")
            .date("2023-05-01")
            .build(),
    );
    let packet = PacketBuilder::new(ShiftId::PoliticalShift)
        .params(relaxed(12))
        .meta(PacketMeta::new("2026-01-01 00:00:00 UTC", "shift_evidence", "v1"))
        .build(&articles)
        .unwrap();
    let brief = render_brief(&packet, 2);

    assert!(brief.starts_with("# Political Shift Research Brief\n"));
    assert!(brief.contains("Method/version: shift_evidence/v1"));
    assert!(brief.contains("- before candidates: 3 (full text: 0)"));
    assert!(brief.contains("## Phase 1 Evidence (Before)"));
    assert!(brief.contains("## Phase 2 Evidence (After)"));
    let shift = definition(ShiftId::PoliticalShift);
    assert!(brief.contains(&format!("## Phase 1 Evidence (Before)\n\n_{}_\n", shift.before_narrative)));
    assert!(brief.contains(&format!("_{}_", shift.after_narrative)));
    assert!(brief.contains("2023-05-01 | Yatra as body politics (The Archive) | score"));
    assert!(brief.contains("Summary: The yatra makes politics physical."));
    // top_n limits each phase
    assert_eq!(brief.matches("\n3. ").count(), 0);
    assert!(brief.ends_with('\n'));
}

#[test]
fn test_repeated_ids_are_rejected() {
    let mut articles = political_before(2, 0);
    articles.push(articles[0].clone());
    let err = PacketBuilder::new(ShiftId::PoliticalShift)
        .params(relaxed(12))
        .build(&articles)
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateId(_)));
}
