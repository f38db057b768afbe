//! Phase classification.
//!
//! The default phase comes from the publication year alone. A curated phase on
//! the record is a separate, explicit assignment and wins when present.

use serde::{Deserialize, Serialize};

use crate::corpus::ArticleRecord;
use crate::shift::{definition, Phase, ShiftId};

/// Strict less-than: the milestone year itself is `After`.
pub fn classify(year: i32, milestone_year: i32) -> Phase {
    if year < milestone_year {
        Phase::Before
    } else {
        Phase::After
    }
}

/// Where a resolved phase came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSource {
    Year,
    Curated,
}

/// Phase for `article` within `shift`, with its provenance.
pub fn resolve_phase_with_source(article: &ArticleRecord, shift: ShiftId) -> (Phase, PhaseSource) {
    match article.curated_for(shift).and_then(|c| c.phase) {
        Some(phase) => (phase, PhaseSource::Curated),
        None => (classify(article.year, definition(shift).milestone_year), PhaseSource::Year),
    }
}

pub fn resolve_phase(article: &ArticleRecord, shift: ShiftId) -> Phase {
    resolve_phase_with_source(article, shift).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CuratedEvidence;
    use crate::testing::ArticleBuilder;

    #[test]
    fn test_milestone_year_is_after() {
        assert_eq!(classify(2023, 2024), Phase::Before);
        assert_eq!(classify(2024, 2024), Phase::After);
        assert_eq!(classify(2025, 2024), Phase::After);
    }

    #[test]
    fn test_classify_is_pure() {
        for year in 1990..2030 {
            assert_eq!(classify(year, 2021), classify(year, 2021));
        }
    }

    #[test]
    fn test_curated_phase_overrides_year() {
        let article = ArticleBuilder::new("a1")
            .year(2019)
            .curated(
                ShiftId::RepublicShift,
                CuratedEvidence { phase: Some(Phase::After), ..Default::default() },
            )
            .build();
        assert_eq!(
            resolve_phase_with_source(&article, ShiftId::RepublicShift),
            (Phase::After, PhaseSource::Curated)
        );
        // Curation is per shift
        assert_eq!(
            resolve_phase_with_source(&article, ShiftId::ScienceShift),
            (Phase::Before, PhaseSource::Year)
        );
    }

    #[test]
    fn test_curation_without_phase_falls_back_to_year() {
        let article = ArticleBuilder::new("a2")
            .year(2024)
            .curated(
                ShiftId::RepublicShift,
                CuratedEvidence { quote_text: Some("q".to_string()), ..Default::default() },
            )
            .build();
        assert_eq!(resolve_phase(&article, ShiftId::RepublicShift), Phase::After);
    }
}
