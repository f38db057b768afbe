//! Lead groups: named thematic sub-categories within a phase.
//!
//! A record's lead group is the argmax over keyword-group hit counts and picks
//! the canonical argument template used for its takeaway. `CrossCurrents` is the
//! catch-all when no group scores above zero (and the only group of shifts that
//! carry no lead-group table).

use serde::{Deserialize, Serialize};

/// Every lead group across all shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadGroup {
    // Republic shift
    InstitutionalGrammar,
    DecayDiagnostics,
    DemocraticUrgency,
    NewGrammar,
    EmbodiedEthics,
    PluralFutures,
    // Science shift
    InstitutionalKnowledge,
    DiagnosingClosure,
    DemocraticLearning,
    DistributedPublics,
    PlayfulScience,
    EthicsOfKnowledge,
    // Catch-all
    CrossCurrents,
}

impl LeadGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadGroup::InstitutionalGrammar => "institutional_grammar",
            LeadGroup::DecayDiagnostics => "decay_diagnostics",
            LeadGroup::DemocraticUrgency => "democratic_urgency",
            LeadGroup::NewGrammar => "new_grammar",
            LeadGroup::EmbodiedEthics => "embodied_ethics",
            LeadGroup::PluralFutures => "plural_futures",
            LeadGroup::InstitutionalKnowledge => "institutional_knowledge",
            LeadGroup::DiagnosingClosure => "diagnosing_closure",
            LeadGroup::DemocraticLearning => "democratic_learning",
            LeadGroup::DistributedPublics => "distributed_publics",
            LeadGroup::PlayfulScience => "playful_science",
            LeadGroup::EthicsOfKnowledge => "ethics_of_knowledge",
            LeadGroup::CrossCurrents => "cross_currents",
        }
    }

    /// Display title for section headings.
    pub fn title(&self) -> &'static str {
        match self {
            LeadGroup::InstitutionalGrammar => "Institutional grammar",
            LeadGroup::DecayDiagnostics => "Decay diagnostics",
            LeadGroup::DemocraticUrgency => "Democratic urgency",
            LeadGroup::NewGrammar => "A new civic grammar",
            LeadGroup::EmbodiedEthics => "Embodied ethics",
            LeadGroup::PluralFutures => "Plural futures",
            LeadGroup::InstitutionalKnowledge => "Institutional knowledge",
            LeadGroup::DiagnosingClosure => "Diagnosing closure",
            LeadGroup::DemocraticLearning => "Democratic learning",
            LeadGroup::DistributedPublics => "Distributed publics",
            LeadGroup::PlayfulScience => "Playful science",
            LeadGroup::EthicsOfKnowledge => "Ethics of knowledge",
            LeadGroup::CrossCurrents => "Cross-currents",
        }
    }

    /// Canonical one-sentence argument. `None` for the catch-all, whose argument
    /// is owned by each shift definition.
    pub fn argument(&self) -> Option<&'static str> {
        let text = match self {
            LeadGroup::InstitutionalGrammar => "The article argues that constitutional language is surviving while institutional guarantees are weakening in practice.",
            LeadGroup::DecayDiagnostics => "The article argues that democratic erosion is systemic, not episodic, and is visible in ordinary institutional life.",
            LeadGroup::DemocraticUrgency => "The article argues that ethics, dissent, and civic imagination are now prerequisites for democratic repair.",
            LeadGroup::NewGrammar => "The article argues that a contested Second Republic is being built through new participatory vocabularies.",
            LeadGroup::EmbodiedEthics => "The article argues that democratic practice must move from abstraction to embodied ethics and public pedagogy.",
            LeadGroup::PluralFutures => "The article argues that democratic futures require ecological responsibility and plural knowledge systems.",
            LeadGroup::InstitutionalKnowledge => "The article argues that institutional science has narrowed public imagination and democratic learning.",
            LeadGroup::DiagnosingClosure => "The article argues that knowledge systems are closing in on themselves through exhaustion and bureaucratic drift.",
            LeadGroup::DemocraticLearning => "The article argues that science belongs to a civic commons with democratic stakes.",
            LeadGroup::DistributedPublics => "The article argues that knowledge must be distributed across publics beyond expert monopolies.",
            LeadGroup::PlayfulScience => "The article argues that science can be creative, experimental, and publicly co-authored.",
            LeadGroup::EthicsOfKnowledge => "The article argues that knowledge politics must be grounded in ethics, conscience, and social repair.",
            LeadGroup::CrossCurrents => return None,
        };
        Some(text)
    }

    /// Evidence connection sentence for packet records. `None` for the catch-all,
    /// which falls back to the shift's rule-based connection.
    pub fn connection(&self) -> Option<&'static str> {
        let text = match self {
            LeadGroup::InstitutionalGrammar => "Strongly linked to Phase 1 because it interrogates constitutional-institutional grammar central to the First Republic.",
            LeadGroup::DecayDiagnostics => "Strongly linked to Phase 1 because it diagnoses democratic erosion within First Republic structures.",
            LeadGroup::DemocraticUrgency => "Strongly linked to Phase 1 because it treats ethics, dissent, and civic urgency as responses to institutional decline.",
            LeadGroup::NewGrammar => "Strongly linked to Phase 2 because it articulates emerging vocabularies of a contested Second Republic.",
            LeadGroup::EmbodiedEthics => "Strongly linked to Phase 2 because it shifts politics toward embodied action, moral imagination, and public pedagogy.",
            LeadGroup::PluralFutures => "Strongly linked to Phase 2 because it reframes democratic futures through plural knowledge and ecological survival.",
            LeadGroup::InstitutionalKnowledge => "Phase 1 link: diagnoses how institutional science narrowed public imagination and democratic learning.",
            LeadGroup::DiagnosingClosure => "Phase 1 link: documents closure, exhaustion, and bureaucratic drift inside knowledge systems.",
            LeadGroup::DemocraticLearning => "Phase 1 link: treats science as a civic commons with democratic stakes.",
            LeadGroup::DistributedPublics => "Phase 2 link: advances distributed knowledge publics beyond expert monopolies.",
            LeadGroup::PlayfulScience => "Phase 2 link: recasts science as creative, experimental, and publicly co-authored.",
            LeadGroup::EthicsOfKnowledge => "Phase 2 link: grounds knowledge politics in ethics, conscience, and social repair.",
            LeadGroup::CrossCurrents => return None,
        };
        Some(text)
    }
}

impl std::fmt::Display for LeadGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named keyword subset within one phase of a shift.
#[derive(Debug, Clone, Copy)]
pub struct KeywordGroup {
    pub group: LeadGroup,
    pub keywords: &'static [&'static str],
}

/// Ordered probe list mapping corpus text to a connection sentence per phase.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionRule {
    /// Empty probes match everything (the default rule).
    pub probes: &'static [&'static str],
    pub before: &'static str,
    pub after: &'static str,
}

impl ConnectionRule {
    pub fn matches(&self, corpus_text: &str) -> bool {
        self.probes.is_empty() || self.probes.iter().any(|probe| corpus_text.contains(probe))
    }

    pub fn text_for(&self, phase: super::Phase) -> &'static str {
        match phase {
            super::Phase::Before => self.before,
            super::Phase::After => self.after,
        }
    }
}
