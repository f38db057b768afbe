//! Narrative Text Synthesizer
//!
//! Builds deduplicated two-sentence summaries and template-led takeaways. Every
//! takeaway opens with one of the shift's finite argument templates; template use
//! and repeated output are tracked per run so callers can flag over-templating.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::SynthesisBudgets;
use crate::narrative::text::{first_sentence, same_sentence, sentence_key, split_sentences, truncate_text, usable_text};
use crate::shift::{LeadGroup, Phase, ShiftDefinition};

/// Default summary when neither a summary nor a connection sentence exists.
pub const SUMMARY_PENDING: &str = "Summary pending for this article.";

/// Quality counters for one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub summaries: usize,
    pub takeaways: usize,
    /// Takeaways opened per lead-group template
    pub template_uses: BTreeMap<LeadGroup, usize>,
    /// Templates this shift can emit
    pub template_limit: usize,
    /// Generated summaries identical to an earlier one in the run
    pub duplicate_summaries: usize,
    /// Generated takeaways identical to an earlier one in the run
    pub duplicate_takeaways: usize,
    pub pending_summaries: usize,
    pub over_templated: bool,
}

/// Per-shift synthesizer. Holds run state; create one per generation pass.
#[derive(Debug)]
pub struct NarrativeSynthesizer {
    shift: &'static ShiftDefinition,
    budgets: SynthesisBudgets,
    seen_summaries: BTreeSet<String>,
    seen_takeaways: BTreeSet<String>,
    report: SynthesisReport,
}

impl NarrativeSynthesizer {
    pub fn new(shift: &'static ShiftDefinition) -> Self {
        Self::with_budgets(shift, SynthesisBudgets::default())
    }

    pub fn with_budgets(shift: &'static ShiftDefinition, budgets: SynthesisBudgets) -> Self {
        Self {
            shift,
            budgets,
            seen_summaries: BTreeSet::new(),
            seen_takeaways: BTreeSet::new(),
            report: SynthesisReport {
                template_limit: shift.template_count(),
                ..SynthesisReport::default()
            },
        }
    }

    pub fn shift(&self) -> &'static ShiftDefinition {
        self.shift
    }

    pub fn budgets(&self) -> &SynthesisBudgets {
        &self.budgets
    }

    /// Two distinct sentences from `raw`; one sentence plus `connection` unless it
    /// repeats; `connection` alone; or the pending default.
    pub fn summary(&mut self, raw: Option<&str>, connection: &str) -> String {
        let sentences = distinct_sentences(usable_text(raw).unwrap_or(""));
        let connection = connection.trim();

        let text = match sentences.as_slice() {
            [first, second, ..] => format!("{} {}", first, second),
            [only] if !connection.is_empty() && !same_sentence(only, connection) => {
                format!("{} {}", only, connection)
            }
            [only] => only.clone(),
            [] if !connection.is_empty() => connection.to_string(),
            [] => {
                self.report.pending_summaries += 1;
                SUMMARY_PENDING.to_string()
            }
        };

        let text = truncate_text(&text, self.budgets.summary);
        self.report.summaries += 1;
        if !self.seen_summaries.insert(sentence_key(&text)) {
            self.report.duplicate_summaries += 1;
        }
        text
    }

    /// Lead-group argument, then the first of: second summary sentence,
    /// connection, phase signal, skipping anything that repeats the argument.
    pub fn takeaway(&mut self, group: LeadGroup, raw_summary: Option<&str>, connection: &str, phase: Phase) -> String {
        let argument = self.shift.argument_for(group);
        let sentences = distinct_sentences(usable_text(raw_summary).unwrap_or(""));

        let follow_up = [sentences.get(1).map(String::as_str), Some(connection.trim()), Some(self.shift.signal_for(phase))]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.is_empty() && !same_sentence(candidate, argument));

        let text = match follow_up {
            Some(second) => format!("{} {}", argument, second),
            None => argument.to_string(),
        };
        let text = truncate_text(&text, self.budgets.takeaway);

        let template = if self.shift.argument_for(group) == self.shift.catch_all_argument {
            LeadGroup::CrossCurrents
        } else {
            group
        };
        *self.report.template_uses.entry(template).or_insert(0) += 1;
        self.report.takeaways += 1;
        if !self.seen_takeaways.insert(sentence_key(&text)) {
            self.report.duplicate_takeaways += 1;
        }
        text
    }

    /// First summary sentence followed by the shift's phase signal.
    pub fn key_message(&self, raw_summary: Option<&str>, phase: Phase) -> String {
        let signal = self.shift.signal_for(phase);
        match usable_text(raw_summary).and_then(first_sentence) {
            Some(first) if !same_sentence(&first, signal) => format!("{} {}", first, signal),
            _ => signal.to_string(),
        }
    }

    pub fn report(&self) -> SynthesisReport {
        let mut report = self.report.clone();
        report.over_templated =
            report.template_uses.len() > report.template_limit || report.duplicate_takeaways > 0;
        if report.over_templated {
            tracing::warn!(
                shift = %self.shift.id,
                duplicates = report.duplicate_takeaways,
                templates = report.template_uses.len(),
                "takeaways are over-templated"
            );
        }
        report
    }

    /// Start a new run, keeping shift and budgets.
    pub fn reset(&mut self) {
        *self = Self::with_budgets(self.shift, self.budgets.clone());
    }
}

/// Sentences of `text` with case-insensitive repeats removed, order kept.
fn distinct_sentences(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    split_sentences(text)
        .into_iter()
        .filter(|s| seen.insert(sentence_key(s)))
        .collect()
}
