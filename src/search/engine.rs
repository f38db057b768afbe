//! Archive Search
//!
//! Synonym-expanded, field-weighted fuzzy search over article records with a
//! literal substring fallback.
//!
//! # Algorithm
//!
//! 1. Expand the query (`synonyms::expand_terms`); drop terms shorter than
//!    `min_token_len` for the fuzzy pass.
//! 2. For every record and field (title, summary, tag labels, tag slugs) take the
//!    best `fuzzy::match_score` over all terms. A field matches when that score is
//!    within `threshold`; a record matches when any field does. Terms are OR-ed,
//!    so extra synonyms can only add records.
//! 3. Rank matches by `Π max(score, ε)^weight` over matched fields, ascending,
//!    input order breaking ties.
//! 4. No fuzzy match: case-insensitive containment of the trimmed query, or of
//!    any term kept in step 1, in `title summary labels slugs`.

use serde::{Deserialize, Serialize};

use crate::config::{FieldWeights, SearchConfig};
use crate::corpus::ArticleRecord;
use crate::search::fuzzy::best_score;
use crate::search::synonyms::{expand_terms, tokenize};

/// How a result list was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Empty query; input returned unchanged
    All,
    Fuzzy,
    Substring,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub article: &'a ArticleRecord,
    /// Lower is better; 0.0 for substring and unfiltered results
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome<'a> {
    pub hits: Vec<SearchHit<'a>>,
    pub mode: SearchMode,
    pub terms: Vec<String>,
    pub timing_us: u64,
}

impl<'a> SearchOutcome<'a> {
    pub fn records(&self) -> Vec<&'a ArticleRecord> {
        self.hits.iter().map(|hit| hit.article).collect()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.hits.iter().map(|hit| hit.article.id.as_str()).collect()
    }
}

/// Lower-cased searchable fields of one record.
struct SearchFields {
    title: String,
    summary: String,
    labels: Vec<String>,
    slugs: Vec<String>,
}

impl SearchFields {
    fn of(article: &ArticleRecord) -> Self {
        Self {
            title: article.title.to_lowercase(),
            summary: article.usable_summary().unwrap_or("").to_lowercase(),
            labels: article.tags.iter().map(|t| t.label.to_lowercase()).collect(),
            slugs: article.tags.iter().map(|t| t.slug.to_lowercase()).collect(),
        }
    }

    fn haystack(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.title, &self.summary];
        parts.extend(self.labels.iter().map(String::as_str));
        parts.extend(self.slugs.iter().map(String::as_str));
        parts.join(" ")
    }
}

/// Weighted fuzzy search engine
#[derive(Debug, Clone, Default)]
pub struct ArchiveSearch {
    config: SearchConfig,
}

impl ArchiveSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run `query` over `records`. Input order is preserved for the empty query
    /// and among equal scores; records are never modified. Ties break on input
    /// position, not id, so unvalidated slices with repeated ids still rank totally.
    pub fn search<'a, I>(&self, records: I, query: &str) -> SearchOutcome<'a>
    where
        I: IntoIterator<Item = &'a ArticleRecord>,
    {
        let start = instant::Instant::now();
        let records: Vec<&'a ArticleRecord> = records.into_iter().collect();
        let trimmed = query.trim();

        if trimmed.is_empty() {
            return SearchOutcome {
                hits: records.into_iter().map(|article| SearchHit { article, score: 0.0 }).collect(),
                mode: SearchMode::All,
                terms: Vec::new(),
                timing_us: start.elapsed().as_micros() as u64,
            };
        }

        let terms = if self.config.expand_synonyms {
            expand_terms(trimmed)
        } else {
            tokenize(trimmed)
        };
        let fields: Vec<SearchFields> = records.iter().map(|a| SearchFields::of(a)).collect();

        let fuzzy_terms: Vec<&str> = terms
            .iter()
            .map(String::as_str)
            .filter(|t| t.chars().count() >= self.config.min_token_len)
            .collect();

        let mut ranked: Vec<(usize, f64)> = fields
            .iter()
            .enumerate()
            .filter_map(|(index, f)| self.fuzzy_score(&fuzzy_terms, f).map(|score| (index, score)))
            .collect();

        let (hits, mode) = if ranked.is_empty() {
            let needle = trimmed.to_lowercase();
            let hits = fields
                .iter()
                .zip(&records)
                .filter(|(f, _)| {
                    let haystack = f.haystack();
                    haystack.contains(&needle) || fuzzy_terms.iter().any(|t| haystack.contains(t))
                })
                .map(|(_, article)| SearchHit { article: *article, score: 0.0 })
                .collect();
            (hits, SearchMode::Substring)
        } else {
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
            let hits = ranked
                .into_iter()
                .map(|(index, score)| SearchHit { article: records[index], score })
                .collect();
            (hits, SearchMode::Fuzzy)
        };

        let outcome = SearchOutcome {
            hits,
            mode,
            terms,
            timing_us: start.elapsed().as_micros() as u64,
        };
        tracing::trace!(
            query = trimmed,
            mode = ?outcome.mode,
            hits = outcome.hits.len(),
            timing_us = outcome.timing_us,
            "search"
        );
        outcome
    }

    /// Combined score of one record, or `None` when no field is within threshold.
    fn fuzzy_score(&self, terms: &[&str], fields: &SearchFields) -> Option<f64> {
        let FieldWeights { title, summary, tag_label, tag_slug } = self.config.weights;
        let threshold = self.config.threshold;

        let best = |texts: &[&str]| -> Option<f64> {
            terms
                .iter()
                .filter_map(|term| best_score(term, texts.iter().copied()))
                .min_by(|a, b| a.total_cmp(b))
                .filter(|score| *score <= threshold)
        };

        let labels: Vec<&str> = fields.labels.iter().map(String::as_str).collect();
        let slugs: Vec<&str> = fields.slugs.iter().map(String::as_str).collect();
        let per_field = [
            (best(&[fields.title.as_str()]), title),
            (best(&[fields.summary.as_str()]), summary),
            (best(labels.as_slice()), tag_label),
            (best(slugs.as_slice()), tag_slug),
        ];

        let mut matched = false;
        let mut combined = 1.0;
        for (score, weight) in per_field {
            if let Some(score) = score {
                matched = true;
                combined *= score.max(f64::EPSILON).powf(weight);
            }
        }
        matched.then_some(combined)
    }
}

/// Search with the default configuration, returning matching records.
pub fn search<'a, I>(records: I, query: &str) -> Vec<&'a ArticleRecord>
where
    I: IntoIterator<Item = &'a ArticleRecord>,
{
    ArchiveSearch::default().search(records, query).records()
}

/// Search with an explicit configuration, returning mode, terms and timing.
pub fn search_with_outcome<'a, I>(records: I, query: &str, config: &SearchConfig) -> SearchOutcome<'a>
where
    I: IntoIterator<Item = &'a ArticleRecord>,
{
    ArchiveSearch::new(config.clone()).search(records, query)
}
