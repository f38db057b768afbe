//! Markdown research brief rendered from a packet, for human review.

use crate::evidence::packet::{EvidencePacket, EvidenceRecord};
use crate::shift::Phase;

pub const DEFAULT_TOP_N: usize = 6;

/// Render `packet` as markdown, listing at most `top_n` records per phase.
pub fn render_brief(packet: &EvidencePacket, top_n: usize) -> String {
    let shift = packet.shift();
    let params = &packet.selection_params;
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {} Research Brief", shift.label));
    lines.push(String::new());
    lines.push(format!("Generated at: {}", packet.generated_at));
    lines.push(format!("Method/version: {}/{}", packet.method, packet.version));
    lines.push(String::new());

    lines.push("## Selection Parameters".to_string());
    lines.push(String::new());
    lines.push(format!("- max_per_phase: {}", params.max_per_phase));
    lines.push(format!("- min_score: {}", params.min_score));
    lines.push(format!("- min_anchor_hits: {}", params.min_anchor_hits));
    lines.push(format!("- min_group_hits: {}", params.min_group_hits));
    lines.push(format!("- full_text_only: {}", params.full_text_only));
    lines.push(format!("- backfill_to_phase_cap: {}", params.backfill_to_phase_cap));
    lines.push(String::new());

    lines.push("## Coverage Snapshot".to_string());
    lines.push(String::new());
    for phase in Phase::ALL {
        lines.push(format!(
            "- {} candidates: {} (full text: {})",
            phase,
            packet.phase_totals.get(phase),
            packet.phase_full_text_totals.get(phase)
        ));
    }
    for phase in Phase::ALL {
        lines.push(format!("- selected {}: {}", phase, packet.selected_counts.get(phase)));
    }
    lines.push(String::new());

    lines.push("## Working Thesis".to_string());
    lines.push(String::new());
    lines.push(format!("- {}", shift.working_thesis));
    lines.push(String::new());

    for phase in Phase::ALL {
        lines.push(format!("## {}", phase.heading()));
        lines.push(String::new());
        lines.push(format!("_{}_", shift.narrative_for(phase)));
        lines.push(String::new());
        for (index, record) in packet.selected_in(phase).take(top_n).enumerate() {
            push_record(&mut lines, index + 1, record);
        }
    }

    lines.push("## Notes".to_string());
    lines.push(String::new());
    lines.push("- Packet output is a research artifact for comparative narrative curation and auditability.".to_string());
    let backfilled = packet
        .selected_records
        .iter()
        .filter(|r| !r.candidate_include)
        .count();
    if backfilled > 0 {
        lines.push(format!(
            "- {} selected record(s) were backfilled below the cut-off to reach the per-phase cap.",
            backfilled
        ));
    }

    let mut out = lines.join("\n").trim_end().to_string();
    out.push('\n');
    out
}

fn push_record(lines: &mut Vec<String>, index: usize, record: &EvidenceRecord) {
    lines.push(format!(
        "{}. {} | {} ({}) | score {:.2}",
        index, record.published_date, record.title, record.publication, record.relevance_score
    ));
    if !record.summary_snippet.is_empty() {
        lines.push(format!("Summary: {}", record.summary_snippet));
    }
    lines.push(format!("Takeaway: {} {}", record.argument_text, record.connection_text).trim().to_string());
    lines.push(format!("Quote ({}): {}", quote_label(record), record.quote_text));
    lines.push(String::new());
}

fn quote_label(record: &EvidenceRecord) -> &'static str {
    use crate::evidence::quote::QuoteSource;
    match record.quote_source {
        QuoteSource::Curated => "curated",
        QuoteSource::BodyParagraph => "body",
        QuoteSource::SummarySentence => "summary",
        QuoteSource::Title => "title",
    }
}
