//! Static shift catalog.
//!
//! Four shifts, each with a milestone year, a keyword list for relevance scoring,
//! preferred tag slugs, narrative templates and (for the republic and science
//! shifts) a per-phase lead-group table.

use serde::{Deserialize, Serialize};

use super::groups::{ConnectionRule, KeywordGroup, LeadGroup};
use super::Phase;
use crate::error::EngineError;

// =============================================================================
// Shift Ids
// =============================================================================

/// Closed set of shift ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftId {
    RepublicShift,
    EcologicalShift,
    ScienceShift,
    PoliticalShift,
}

impl ShiftId {
    pub const ALL: [ShiftId; 4] = [
        ShiftId::RepublicShift,
        ShiftId::EcologicalShift,
        ShiftId::ScienceShift,
        ShiftId::PoliticalShift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftId::RepublicShift => "republic_shift",
            ShiftId::EcologicalShift => "ecological_shift",
            ShiftId::ScienceShift => "science_shift",
            ShiftId::PoliticalShift => "political_shift",
        }
    }

    /// Static definition for this shift.
    pub fn definition(&self) -> &'static ShiftDefinition {
        definition(*self)
    }
}

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShiftId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "republic_shift" => Ok(ShiftId::RepublicShift),
            "ecological_shift" => Ok(ShiftId::EcologicalShift),
            "science_shift" => Ok(ShiftId::ScienceShift),
            "political_shift" => Ok(ShiftId::PoliticalShift),
            other => Err(EngineError::UnknownShift(other.to_string())),
        }
    }
}

// =============================================================================
// Definition
// =============================================================================

/// Field weights for the research scoring model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResearchWeights {
    /// Multiplier for group hits in the title.
    pub title: u32,
    /// Multiplier for group hits in the summary.
    pub summary: u32,
    /// Body hits per group are clamped to this count.
    pub body_hit_cap: u32,
    pub anchor_weight: f64,
    pub tag_weight: f64,
}

/// Immutable thematic shift configuration.
#[derive(Debug)]
pub struct ShiftDefinition {
    pub id: ShiftId,
    pub label: &'static str,
    pub milestone_year: i32,
    pub keywords: &'static [&'static str],
    pub preferred_tag_slugs: &'static [&'static str],
    /// Anchor subset used by the `min_anchor_hits` gate.
    pub anchors: &'static [&'static str],
    pub before_narrative: &'static str,
    pub after_narrative: &'static str,
    /// Generic phase sentences, the last-resort takeaway fallback.
    pub before_signal: &'static str,
    pub after_signal: &'static str,
    pub working_thesis: &'static str,
    pub before_groups: &'static [KeywordGroup],
    pub after_groups: &'static [KeywordGroup],
    pub before_tag_signals: &'static [&'static str],
    pub after_tag_signals: &'static [&'static str],
    /// Checked in order; the last rule has no probes.
    pub connection_rules: &'static [ConnectionRule],
    pub catch_all_argument: &'static str,
    pub research: ResearchWeights,
}

impl ShiftDefinition {
    /// True when the shift carries a lead-group table.
    pub fn is_extended(&self) -> bool {
        !self.before_groups.is_empty() || !self.after_groups.is_empty()
    }

    pub fn groups_for(&self, phase: Phase) -> &'static [KeywordGroup] {
        match phase {
            Phase::Before => self.before_groups,
            Phase::After => self.after_groups,
        }
    }

    pub fn tag_signals_for(&self, phase: Phase) -> &'static [&'static str] {
        match phase {
            Phase::Before => self.before_tag_signals,
            Phase::After => self.after_tag_signals,
        }
    }

    pub fn narrative_for(&self, phase: Phase) -> &'static str {
        match phase {
            Phase::Before => self.before_narrative,
            Phase::After => self.after_narrative,
        }
    }

    pub fn signal_for(&self, phase: Phase) -> &'static str {
        match phase {
            Phase::Before => self.before_signal,
            Phase::After => self.after_signal,
        }
    }

    /// Argument template for a lead group, falling back to the shift's catch-all.
    pub fn argument_for(&self, group: LeadGroup) -> &'static str {
        if self.owns_group(group) {
            if let Some(text) = group.argument() {
                return text;
            }
        }
        self.catch_all_argument
    }

    /// Lead groups this shift can assign, in table order, catch-all last.
    pub fn lead_groups(&self) -> Vec<LeadGroup> {
        let mut groups: Vec<LeadGroup> = self
            .before_groups
            .iter()
            .chain(self.after_groups.iter())
            .map(|g| g.group)
            .collect();
        groups.push(LeadGroup::CrossCurrents);
        groups
    }

    /// Number of distinct argument templates this shift may emit.
    pub fn template_count(&self) -> usize {
        self.lead_groups().len()
    }

    fn owns_group(&self, group: LeadGroup) -> bool {
        self.before_groups
            .iter()
            .chain(self.after_groups.iter())
            .any(|g| g.group == group)
    }

    /// Rule-based connection sentence derived from lower-cased corpus text.
    pub fn rule_connection(&self, corpus_text: &str, phase: Phase) -> &'static str {
        self.connection_rules
            .iter()
            .find(|rule| rule.matches(corpus_text))
            .map(|rule| rule.text_for(phase))
            .unwrap_or_else(|| self.signal_for(phase))
    }

    /// Connection sentence for an evidence record: the lead group's own sentence
    /// when it has one, else the rule-based connection.
    pub fn connection_for(&self, group: LeadGroup, corpus_text: &str, phase: Phase) -> &'static str {
        if self.owns_group(group) {
            if let Some(text) = group.connection() {
                return text;
            }
        }
        self.rule_connection(corpus_text, phase)
    }
}

/// Static definition for a shift id.
pub fn definition(id: ShiftId) -> &'static ShiftDefinition {
    match id {
        ShiftId::RepublicShift => &REPUBLIC_SHIFT,
        ShiftId::EcologicalShift => &ECOLOGICAL_SHIFT,
        ShiftId::ScienceShift => &SCIENCE_SHIFT,
        ShiftId::PoliticalShift => &POLITICAL_SHIFT,
    }
}

/// Resolve a caller-supplied id string. Unknown ids are a programmer error.
pub fn lookup(id: &str) -> Result<&'static ShiftDefinition, EngineError> {
    Ok(definition(id.parse::<ShiftId>()?))
}

/// Every definition in registry order.
pub fn all_shifts() -> impl Iterator<Item = &'static ShiftDefinition> {
    ShiftId::ALL.into_iter().map(definition)
}

// =============================================================================
// Catalog
// =============================================================================

const DEFAULT_RESEARCH: ResearchWeights = ResearchWeights {
    title: 4,
    summary: 2,
    body_hit_cap: 6,
    anchor_weight: 0.8,
    tag_weight: 1.3,
};

static REPUBLIC_SHIFT: ShiftDefinition = ShiftDefinition {
    id: ShiftId::RepublicShift,
    label: "Republic Shift",
    milestone_year: 2024,
    keywords: &[
        "republic",
        "constitution",
        "democracy",
        "citizen",
        "citizenship",
        "institution",
        "state",
        "majoritarian",
        "public sphere",
        "second republic",
    ],
    preferred_tag_slugs: &["democracy", "public-institutions", "law-and-justice", "public-sphere", "nationalism"],
    anchors: &[
        "republic",
        "constitution",
        "constitutional",
        "democracy",
        "democratic",
        "citizenship",
        "citizen",
        "state",
        "institution",
        "majoritarian",
        "public sphere",
    ],
    before_narrative: "Before the milestone, the columns read the First Republic as a constitutional grammar that still speaks while its institutions hollow out.",
    after_narrative: "After the milestone, the columns sketch a contested Second Republic assembled from new civic vocabularies, embodied ethics, and plural futures.",
    before_signal: "First Republic signal: legacy institutions are under pressure.",
    after_signal: "Second Republic signal: democratic practice is being re-authored.",
    working_thesis: "The archive moves from diagnosing First Republic institutional erosion toward constructing a contested Second Republic through civic invention.",
    before_groups: &[
        KeywordGroup {
            group: LeadGroup::InstitutionalGrammar,
            keywords: &[
                "constitution",
                "constitutional",
                "institution",
                "nehru",
                "state",
                "citizenship",
                "citizen",
                "left and right",
                "secularism",
                "university",
            ],
        },
        KeywordGroup {
            group: LeadGroup::DecayDiagnostics,
            keywords: &[
                "drying up",
                "sadness",
                "banal",
                "mediocre",
                "decay",
                "hollow",
                "crisis",
                "erosion",
                "impoverishes",
                "violence",
            ],
        },
        KeywordGroup {
            group: LeadGroup::DemocraticUrgency,
            keywords: &["public sphere", "civil society", "dissent", "rights", "ethics", "morality", "democracy"],
        },
    ],
    after_groups: &[
        KeywordGroup {
            group: LeadGroup::NewGrammar,
            keywords: &[
                "second republic",
                "new republic",
                "reimagining democracy",
                "improvis",
                "digital",
                "populist",
                "knowledge panchayat",
                "citizen back",
            ],
        },
        KeywordGroup {
            group: LeadGroup::EmbodiedEthics,
            keywords: &["body politics", "yatra", "satyagraha", "playfulness", "moral", "ethics", "conscience", "peace"],
        },
        KeywordGroup {
            group: LeadGroup::PluralFutures,
            keywords: &["anthropocene", "ecocide", "cognitive justice", "plural", "commons", "survival", "knowledge systems"],
        },
    ],
    before_tag_signals: &[
        "democracy",
        "law-and-justice",
        "public-institutions",
        "public-sphere",
        "nationalism",
        "secularism",
        "education-policy",
    ],
    after_tag_signals: &[
        "democracy",
        "pluralism",
        "ethics",
        "knowledge-systems",
        "ecology",
        "technology-and-society",
        "public-sphere",
    ],
    connection_rules: &[
        ConnectionRule {
            probes: &["constitution", "citizen", "citizenship", "republic", "democracy", "institution", "state"],
            before: "Links to Phase 1 by showing strain in First Republic institutions and citizenship grammar.",
            after: "Links to Phase 2 by reframing citizenship for a contested, post-formalist Second Republic.",
        },
        ConnectionRule {
            probes: &["knowledge", "science", "university", "expert", "panchayat", "education", "innovation"],
            before: "Links to Phase 1 by exposing how First Republic knowledge institutions narrowed democratic imagination.",
            after: "Links to Phase 2 by proposing distributed knowledge as a design principle for the Second Republic.",
        },
        ConnectionRule {
            probes: &["violence", "peace", "ethics", "morality", "nationalism", "dissent", "satyagraha", "yatra"],
            before: "Links to Phase 1 by reading moral dissent as a response to First Republic fatigue.",
            after: "Links to Phase 2 by placing ethics, embodiment, and public repair at the core of new politics.",
        },
        ConnectionRule {
            probes: &["anthropocene", "ecology", "ecocide", "climate", "nature", "aravallis"],
            before: "Links to Phase 1 by widening First Republic debates toward ecological citizenship and survival.",
            after: "Links to Phase 2 by treating ecological survival as central to the Second Republic social contract.",
        },
        ConnectionRule {
            probes: &[],
            before: "Links to Phase 1 by documenting cracks between constitutional form and lived democratic experience.",
            after: "Links to Phase 2 by tracing emergent civic vocabularies beyond legacy institutional comfort.",
        },
    ],
    catch_all_argument: "The article argues that democracy now depends on connecting institutional critique with constructive civic invention.",
    research: DEFAULT_RESEARCH,
};

static ECOLOGICAL_SHIFT: ShiftDefinition = ShiftDefinition {
    id: ShiftId::EcologicalShift,
    label: "Ecological Shift",
    milestone_year: 2021,
    keywords: &[
        "ecology",
        "ecological",
        "environment",
        "anthropocene",
        "ecocide",
        "climate",
        "nature",
        "aravallis",
        "survival",
        "forest",
    ],
    preferred_tag_slugs: &["ecology", "environment", "climate-change", "anthropocene"],
    anchors: &["ecology", "environment", "anthropocene", "ecocide", "climate", "nature", "survival"],
    before_narrative: "Before the milestone, ecology appears as a policy question handled through managerial conservation and development-era compromise.",
    after_narrative: "After the milestone, ecology becomes a question of civilizational risk, Anthropocene rupture, and the right to survive.",
    before_signal: "Ecological shift signal: management-era assumptions are being stress-tested.",
    after_signal: "Ecological shift signal: Anthropocene survival logic becomes central.",
    working_thesis: "The archive moves from reading ecology as governance and conservation toward treating survival in the Anthropocene as the centre of politics.",
    before_groups: &[],
    after_groups: &[],
    before_tag_signals: &["ecology", "environment", "climate-change", "anthropocene"],
    after_tag_signals: &["ecology", "environment", "climate-change", "anthropocene"],
    connection_rules: &[
        ConnectionRule {
            probes: &["anthropocene", "ecocide", "survival", "climate", "aravallis", "shaman"],
            before: "Links to Phase 1 by testing environmental governance limits inside development-era policy language.",
            after: "Links to Phase 2 by centering Anthropocene rupture, ecocide, and the right to survive.",
        },
        ConnectionRule {
            probes: &[],
            before: "Links to Phase 1 by reading ecology through managerial conservation and policy compromise.",
            after: "Links to Phase 2 by moving ecology into civilizational risk and plural lifeworld thinking.",
        },
    ],
    catch_all_argument: "The article argues that ecological questions have become questions of survival, citizenship, and plural lifeworlds.",
    research: DEFAULT_RESEARCH,
};

static SCIENCE_SHIFT: ShiftDefinition = ShiftDefinition {
    id: ShiftId::ScienceShift,
    label: "Science Shift",
    milestone_year: 2023,
    keywords: &[
        "science",
        "scientific",
        "knowledge",
        "university",
        "expert",
        "innovation",
        "technology",
        "cognitive justice",
        "knowledge panchayat",
        "playfulness",
    ],
    preferred_tag_slugs: &["science-policy", "knowledge-systems", "technology-and-society", "education-policy"],
    anchors: &[
        "science",
        "scientific",
        "social science",
        "knowledge",
        "university",
        "expert",
        "innovation",
        "technology",
        "bureaucratic",
        "commons",
        "play",
        "playfulness",
        "panchayat",
        "cognitive justice",
        "public",
    ],
    before_narrative: "Before the milestone, science is read through its institutions: universities, expert bodies, and a bureaucratic big science that narrows public imagination.",
    after_narrative: "After the milestone, science opens toward distributed publics, playful experiment, and an ethics of knowledge grounded in cognitive justice.",
    before_signal: "Science shift signal: expert monopoly frames are being questioned.",
    after_signal: "Science shift signal: plural knowledge publics gain legitimacy.",
    working_thesis: "The archive moves from diagnosing institutional closure of knowledge systems to proposing distributed, playful, and ethically grounded knowledge publics.",
    before_groups: &[
        KeywordGroup {
            group: LeadGroup::InstitutionalKnowledge,
            keywords: &[
                "university",
                "institute",
                "institution",
                "csds",
                "social science",
                "expert",
                "discipline",
                "bureaucratic",
                "big science",
                "state policy",
            ],
        },
        KeywordGroup {
            group: LeadGroup::DiagnosingClosure,
            keywords: &["sadness", "gasping", "crisis", "hollow", "impoverished", "banal", "closure", "authoritarian", "violence"],
        },
        KeywordGroup {
            group: LeadGroup::DemocraticLearning,
            keywords: &["commons", "public sphere", "dissent", "dialogue", "secularism", "democracy", "citizen", "rights"],
        },
    ],
    after_groups: &[
        KeywordGroup {
            group: LeadGroup::DistributedPublics,
            keywords: &[
                "knowledge panchayat",
                "distributed",
                "plural",
                "cognitive justice",
                "orality",
                "commons",
                "publics",
                "citizen",
            ],
        },
        KeywordGroup {
            group: LeadGroup::PlayfulScience,
            keywords: &["play", "playfulness", "creative", "imagination", "experiment", "beyond big science", "creative society"],
        },
        KeywordGroup {
            group: LeadGroup::EthicsOfKnowledge,
            keywords: &["ethics", "conscience", "humanity", "morality", "peace", "survival", "care"],
        },
    ],
    before_tag_signals: &[
        "education-policy",
        "science-policy",
        "technology-and-society",
        "knowledge-systems",
        "public-institutions",
        "university",
        "secularism",
    ],
    after_tag_signals: &[
        "science-policy",
        "technology-and-society",
        "knowledge-systems",
        "public-institutions",
        "pluralism",
        "ethics",
        "public-sphere",
        "ecology",
    ],
    connection_rules: &[
        ConnectionRule {
            probes: &["science", "expert", "big science", "university", "innovation"],
            before: "Links to Phase 1 by critiquing institutional expertise and the closure of scientific authority.",
            after: "Links to Phase 2 by opening science to distributed publics and experimental citizenship.",
        },
        ConnectionRule {
            probes: &[],
            before: "Links to Phase 1 by exposing knowledge hierarchies in formal institutions.",
            after: "Links to Phase 2 by arguing for cognitive justice and knowledge panchayats.",
        },
    ],
    catch_all_argument: "The article argues that knowledge politics now depends on linking institutional critique with public experimentation.",
    research: ResearchWeights {
        title: 4,
        summary: 2,
        body_hit_cap: 7,
        anchor_weight: 0.85,
        tag_weight: 1.25,
    },
};

static POLITICAL_SHIFT: ShiftDefinition = ShiftDefinition {
    id: ShiftId::PoliticalShift,
    label: "Political Shift",
    milestone_year: 2022,
    keywords: &[
        "politics",
        "yatra",
        "satyagraha",
        "dissent",
        "civil society",
        "theatre",
        "protest",
        "opposition",
        "election",
        "body politics",
    ],
    preferred_tag_slugs: &["politics", "civil-society", "elections", "protest", "nationalism"],
    anchors: &["politics", "yatra", "satyagraha", "dissent", "civil society", "protest", "opposition"],
    before_narrative: "Before the milestone, politics is read through institutional opposition, petitions, and the strategic dissent of civil society.",
    after_narrative: "After the milestone, politics spills into the body: yatras, public theatre, and an affective choreography of democratic action.",
    before_signal: "Political shift signal: strategic dissent remains institution-facing.",
    after_signal: "Political shift signal: politics expands into embodied public action.",
    working_thesis: "The archive moves from institution-facing opposition toward embodied, affective forms of democratic action.",
    before_groups: &[],
    after_groups: &[],
    before_tag_signals: &["politics", "civil-society", "elections", "protest", "nationalism"],
    after_tag_signals: &["politics", "civil-society", "elections", "protest", "nationalism"],
    connection_rules: &[
        ConnectionRule {
            probes: &["yatra", "satyagraha", "body", "theatre", "civil society", "dissent"],
            before: "Links to Phase 1 by documenting strategic dissent and civil-society petitioning.",
            after: "Links to Phase 2 by foregrounding body politics, public theatre, and moral choreography.",
        },
        ConnectionRule {
            probes: &[],
            before: "Links to Phase 1 by reading politics through institutional opposition.",
            after: "Links to Phase 2 by emphasizing affective, embodied forms of democratic action.",
        },
    ],
    catch_all_argument: "The article argues that democratic politics is moving from institutional opposition toward embodied public action.",
    research: DEFAULT_RESEARCH,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_resolves_to_its_own_definition() {
        for id in ShiftId::ALL {
            assert_eq!(definition(id).id, id);
            assert_eq!(id.as_str().parse::<ShiftId>().unwrap(), id);
        }
    }

    #[test]
    fn test_unknown_shift_is_an_error() {
        let err = lookup("weather_shift").unwrap_err();
        assert!(matches!(err, EngineError::UnknownShift(ref id) if id == "weather_shift"));
    }

    #[test]
    fn test_milestones() {
        assert_eq!(definition(ShiftId::RepublicShift).milestone_year, 2024);
        assert_eq!(definition(ShiftId::EcologicalShift).milestone_year, 2021);
        assert_eq!(definition(ShiftId::ScienceShift).milestone_year, 2023);
        assert_eq!(definition(ShiftId::PoliticalShift).milestone_year, 2022);
    }

    #[test]
    fn test_extended_shifts_have_three_groups_per_phase() {
        for shift in all_shifts() {
            if shift.is_extended() {
                assert_eq!(shift.before_groups.len(), 3, "{}", shift.id);
                assert_eq!(shift.after_groups.len(), 3, "{}", shift.id);
                assert_eq!(shift.template_count(), 7);
            } else {
                assert_eq!(shift.lead_groups(), vec![LeadGroup::CrossCurrents]);
            }
        }
    }

    #[test]
    fn test_argument_falls_back_for_foreign_groups() {
        let science = definition(ShiftId::ScienceShift);
        // A republic group never leaks into science takeaways.
        assert_eq!(science.argument_for(LeadGroup::NewGrammar), science.catch_all_argument);
        assert_eq!(
            science.argument_for(LeadGroup::PlayfulScience),
            LeadGroup::PlayfulScience.argument().unwrap()
        );
    }

    #[test]
    fn test_rule_connection_is_ordered() {
        let republic = definition(ShiftId::RepublicShift);
        let text = "the citizen and the anthropocene";
        assert!(republic.rule_connection(text, Phase::Before).contains("citizenship grammar"));
        let fallback = republic.rule_connection("unrelated words", Phase::After);
        assert!(fallback.contains("emergent civic vocabularies"));
    }

    #[test]
    fn test_every_shift_ends_with_a_default_rule() {
        for shift in all_shifts() {
            let last = shift.connection_rules.last().expect("rules");
            assert!(last.probes.is_empty(), "{} lacks a default rule", shift.id);
        }
    }
}
