//! Ranked search suggestions from corpus facets, a static theme table and the
//! shift keyword lists.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::corpus::{facet_counts, ArticleRecord, FacetCount};
use crate::shift::all_shifts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionGroup {
    Tag,
    Theme,
    Tone,
    Section,
    Source,
}

impl SuggestionGroup {
    /// Base priority before frequency is added.
    fn base_priority(&self) -> u32 {
        match self {
            SuggestionGroup::Theme => 80,
            SuggestionGroup::Tag => 60,
            SuggestionGroup::Source => 50,
            SuggestionGroup::Tone => 40,
            SuggestionGroup::Section => 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    pub label: String,
    pub query: String,
    pub group: SuggestionGroup,
    pub priority: u32,
}

/// Curated entry points: (label, query).
const THEMES: &[(&str, &str)] = &[
    ("Ecology and the Anthropocene", "environment"),
    ("Democracy and the Republic", "democracy"),
    ("Science as a civic commons", "science"),
    ("Dissent and protest", "dissent"),
    ("Ethics and conscience", "ethics"),
    ("Knowledge systems", "knowledge"),
];

/// Frequency counts past this add nothing more to a suggestion's priority.
const FREQUENCY_CAP: u32 = 19;
/// Shift keywords rank between tags and sources.
const KEYWORD_PRIORITY: u32 = 55;
/// Extra priority when the label starts with the typed input.
const PREFIX_BONUS: u32 = 20;

fn from_facets(facets: Vec<FacetCount>, group: SuggestionGroup) -> impl Iterator<Item = SearchSuggestion> {
    facets.into_iter().map(move |facet| SearchSuggestion {
        query: facet.value.to_lowercase(),
        priority: group.base_priority() + (facet.count as u32).min(FREQUENCY_CAP),
        label: facet.value,
        group,
    })
}

/// Every suggestion the corpus and tables can offer, unranked.
pub fn suggestion_pool(articles: &[ArticleRecord]) -> Vec<SearchSuggestion> {
    let mut pool: Vec<SearchSuggestion> = THEMES
        .iter()
        .map(|(label, query)| SearchSuggestion {
            label: label.to_string(),
            query: query.to_string(),
            group: SuggestionGroup::Theme,
            priority: SuggestionGroup::Theme.base_priority(),
        })
        .collect();

    pool.extend(all_shifts().flat_map(|shift| shift.keywords.iter()).map(|keyword| SearchSuggestion {
        label: keyword.to_string(),
        query: keyword.to_string(),
        group: SuggestionGroup::Theme,
        priority: KEYWORD_PRIORITY,
    }));

    let tags = facet_counts(articles.iter().flat_map(|a| a.tags.iter().map(|t| t.label.as_str())));
    pool.extend(from_facets(tags, SuggestionGroup::Tag));
    let tones = facet_counts(articles.iter().filter_map(|a| a.tone.as_deref()));
    pool.extend(from_facets(tones, SuggestionGroup::Tone));
    let sections = facet_counts(articles.iter().map(|a| a.section.as_str()));
    pool.extend(from_facets(sections, SuggestionGroup::Section));
    let sources = facet_counts(articles.iter().map(|a| a.publication.as_str()));
    pool.extend(from_facets(sources, SuggestionGroup::Source));

    pool
}

/// Suggestions for partially typed `input`, highest priority first, at most `limit`.
///
/// Blank input ranks the whole pool. Otherwise only entries whose label or query
/// contains the input survive, and label prefixes get a bonus. Repeated queries
/// keep their highest-priority entry.
pub fn suggest(articles: &[ArticleRecord], input: &str, limit: usize) -> Vec<SearchSuggestion> {
    let needle = input.trim().to_lowercase();

    let mut best: HashMap<String, SearchSuggestion> = HashMap::new();
    for mut suggestion in suggestion_pool(articles) {
        let label = suggestion.label.to_lowercase();
        if !needle.is_empty() {
            if !label.contains(&needle) && !suggestion.query.contains(&needle) {
                continue;
            }
            if label.starts_with(&needle) {
                suggestion.priority += PREFIX_BONUS;
            }
        }
        let key = suggestion.query.clone();
        match best.get(&key) {
            Some(existing) if !outranks(&suggestion, existing) => {}
            _ => {
                best.insert(key, suggestion);
            }
        }
    }

    let mut ranked: Vec<SearchSuggestion> = best.into_values().collect();
    ranked.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.query.cmp(&b.query))
    });
    ranked.truncate(limit);
    ranked
}

/// Higher priority wins; equal priority falls back to the smaller label.
fn outranks(a: &SearchSuggestion, b: &SearchSuggestion) -> bool {
    a.priority > b.priority || (a.priority == b.priority && a.label < b.label)
}
