//! Article Corpus
//!
//! The immutable list of article records supplied by the archive store, plus
//! load-time validation, tag hygiene, facet filters and corpus statistics.

pub mod article;
pub mod filter;

pub use article::*;
pub use filter::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{EngineError, Result};

/// Count of one facet value (publication, tag, tone, section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Frequency table sorted by count desc, then value asc. Blank values are skipped.
pub fn facet_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<FacetCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut out: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount { value: value.to_string(), count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    out
}

/// Corpus-level statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub article_count: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub publications: Vec<FacetCount>,
    /// Tag labels by frequency, at most [`TOP_TAG_LIMIT`].
    pub top_tags: Vec<FacetCount>,
    pub full_text_count: usize,
    pub with_url_count: usize,
}

pub const TOP_TAG_LIMIT: usize = 20;

/// Fails on the first id seen twice.
pub fn ensure_unique_ids(articles: &[ArticleRecord]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(articles.len());
    for article in articles {
        if !seen.insert(article.id.as_str()) {
            return Err(EngineError::DuplicateId(article.id.clone()));
        }
    }
    Ok(())
}

/// Validated, read-only article pool.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    articles: Vec<ArticleRecord>,
}

impl Corpus {
    /// Validate every record, reject repeated ids and collapse duplicate tag slugs.
    pub fn new(articles: Vec<ArticleRecord>) -> Result<Self> {
        let mut cleaned = Vec::with_capacity(articles.len());
        for mut article in articles {
            article.validate()?;
            article.tags = dedupe_tags(std::mem::take(&mut article.tags));
            cleaned.push(article);
        }
        ensure_unique_ids(&cleaned)?;
        tracing::debug!(articles = cleaned.len(), "corpus loaded");
        Ok(Self { articles: cleaned })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let articles: Vec<ArticleRecord> = serde_json::from_str(json)?;
        Self::new(articles)
    }

    pub fn articles(&self) -> &[ArticleRecord] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ArticleRecord> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn filter(&self, condition: &FilterCondition) -> Vec<&ArticleRecord> {
        condition.apply(&self.articles)
    }

    pub fn stats(&self) -> CorpusStats {
        let mut top_tags = facet_counts(self.articles.iter().flat_map(|a| a.tags.iter().map(|t| t.label.as_str())));
        top_tags.truncate(TOP_TAG_LIMIT);

        CorpusStats {
            article_count: self.articles.len(),
            first_year: self.articles.iter().map(|a| a.year).min(),
            last_year: self.articles.iter().map(|a| a.year).max(),
            publications: facet_counts(self.articles.iter().map(|a| a.publication.as_str())),
            top_tags,
            full_text_count: self.articles.iter().filter(|a| a.is_full_text()).count(),
            with_url_count: self
                .articles
                .iter()
                .filter(|a| a.url.as_deref().is_some_and(|u| !u.trim().is_empty()))
                .count(),
        }
    }
}
