//! Facet Filtering for Archive Browsing
//!
//! Hard constraints applied before search ("only 2020-2023 columns tagged
//! `ecology`"). Search composes with a filtered set: filter first, then rank the
//! survivors.

use serde::{Deserialize, Serialize};

use super::ArticleRecord;
use crate::evidence::resolve_phase;
use crate::shift::{Phase, ShiftId};

/// A single filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterCondition {
    /// Inclusive year range; either bound may be open.
    YearRange { min: Option<i32>, max: Option<i32> },

    /// Article carries a tag with this slug
    Tag { slug: String },

    /// Case-insensitive tone match
    Tone { value: String },

    /// Case-insensitive publication match
    Publication { value: String },

    /// Case-insensitive section match
    Section { value: String },

    /// Article falls in `phase` of `shift` (curated phase wins over year)
    Phase { shift: ShiftId, phase: Phase },

    /// Article has a non-empty url
    HasUrl,

    /// Article body is fully available
    FullText,

    /// Boolean AND of conditions
    And { conditions: Vec<FilterCondition> },

    /// Boolean OR of conditions
    Or { conditions: Vec<FilterCondition> },
}

impl FilterCondition {
    /// Evaluate this filter against an article
    pub fn matches(&self, article: &ArticleRecord) -> bool {
        match self {
            FilterCondition::YearRange { min, max } => {
                let above_min = min.map(|m| article.year >= m).unwrap_or(true);
                let below_max = max.map(|m| article.year <= m).unwrap_or(true);
                above_min && below_max
            }

            FilterCondition::Tag { slug } => article.has_tag(slug),

            FilterCondition::Tone { value } => article
                .tone
                .as_deref()
                .map(|tone| tone.eq_ignore_ascii_case(value.trim()))
                .unwrap_or(false),

            FilterCondition::Publication { value } => {
                article.publication.eq_ignore_ascii_case(value.trim())
            }

            FilterCondition::Section { value } => article.section.eq_ignore_ascii_case(value.trim()),

            FilterCondition::Phase { shift, phase } => resolve_phase(article, *shift) == *phase,

            FilterCondition::HasUrl => article
                .url
                .as_deref()
                .map(|u| !u.trim().is_empty())
                .unwrap_or(false),

            FilterCondition::FullText => article.is_full_text(),

            FilterCondition::And { conditions } => conditions.iter().all(|c| c.matches(article)),

            FilterCondition::Or { conditions } => conditions.iter().any(|c| c.matches(article)),
        }
    }

    /// Articles passing this filter, input order preserved.
    pub fn apply<'a>(&self, articles: &'a [ArticleRecord]) -> Vec<&'a ArticleRecord> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }
}

/// Builder for creating filters fluently
#[derive(Debug, Default)]
pub struct FilterBuilder {
    conditions: Vec<FilterCondition>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self { conditions: Vec::new() }
    }

    pub fn years(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.conditions.push(FilterCondition::YearRange { min, max });
        self
    }

    pub fn tag(mut self, slug: &str) -> Self {
        self.conditions.push(FilterCondition::Tag { slug: slug.to_string() });
        self
    }

    pub fn tone(mut self, value: &str) -> Self {
        self.conditions.push(FilterCondition::Tone { value: value.to_string() });
        self
    }

    pub fn publication(mut self, value: &str) -> Self {
        self.conditions.push(FilterCondition::Publication { value: value.to_string() });
        self
    }

    pub fn section(mut self, value: &str) -> Self {
        self.conditions.push(FilterCondition::Section { value: value.to_string() });
        self
    }

    pub fn phase(mut self, shift: ShiftId, phase: Phase) -> Self {
        self.conditions.push(FilterCondition::Phase { shift, phase });
        self
    }

    pub fn has_url(mut self) -> Self {
        self.conditions.push(FilterCondition::HasUrl);
        self
    }

    pub fn full_text(mut self) -> Self {
        self.conditions.push(FilterCondition::FullText);
        self
    }

    pub fn build(mut self) -> Option<FilterCondition> {
        match self.conditions.len() {
            0 => None,
            1 => self.conditions.pop(),
            _ => Some(FilterCondition::And { conditions: self.conditions }),
        }
    }
}
