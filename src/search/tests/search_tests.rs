//! Tests for the archive search engine

use crate::config::SearchConfig;
use crate::corpus::{ArticleRecord, FilterBuilder};
use crate::search::engine::{search, search_with_outcome, ArchiveSearch, SearchMode};
use crate::testing::ArticleBuilder;

fn archive() -> Vec<ArticleRecord> {
    vec![
        ArticleBuilder::new("aravalli").title("Saving the Aravalli hills").year(2021).tag("ecology").build(),
        ArticleBuilder::new("fear").title("An environment of fear").year(2016).build(),
        ArticleBuilder::new("songs").title("Protest songs").year(2019).build(),
        ArticleBuilder::new("diary")
            .title("Monsoon diary")
            .year(2023)
            .labeled_tag("Street action", "protest")
            .build(),
        ArticleBuilder::new("republic").title("The republic at seventy").year(2020).tag("democracy").build(),
        ArticleBuilder::new("cricket").title("Cricket").year(2012).build(),
        ArticleBuilder::new("dharma").title("Dharma").year(2014).build(),
    ]
}

fn ids<'a>(records: &[&'a ArticleRecord]) -> Vec<&'a str> {
    records.iter().map(|a| a.id.as_str()).collect()
}

// ============================================================================
// Query Expansion
// ============================================================================

#[test]
fn test_environment_finds_ecology_tagged_article() {
    let articles = archive();
    let outcome = search_with_outcome(&articles, "environment", &SearchConfig::default());

    assert_eq!(outcome.mode, SearchMode::Fuzzy);
    assert!(outcome.terms.contains(&"ecology".to_string()));
    let found = outcome.ids();
    assert!(found.contains(&"aravalli"), "{found:?}");
    assert!(found.contains(&"fear"));
    assert!(!found.contains(&"cricket"));
}

#[test]
fn test_expansion_only_adds_results() {
    let articles = archive();
    let raw = SearchConfig {
        expand_synonyms: false,
        ..SearchConfig::default()
    };

    for query in ["environment", "protest", "democracy", "republic", "science", "ecolgy", "a", "zzzz"] {
        let without = search_with_outcome(&articles, query, &raw).ids();
        let with = search_with_outcome(&articles, query, &SearchConfig::default()).ids();
        for id in &without {
            assert!(with.contains(id), "{query}: {id} lost after expansion");
        }
    }
}

#[test]
fn test_unexpanded_environment_misses_tag_only_article() {
    let articles = archive();
    let raw = SearchConfig {
        expand_synonyms: false,
        ..SearchConfig::default()
    };
    let found = search_with_outcome(&articles, "environment", &raw).ids();
    assert_eq!(found, vec!["fear"]);
}

// ============================================================================
// Matching and Ranking
// ============================================================================

#[test]
fn test_empty_query_returns_input_unchanged() {
    let articles = archive();
    let all = search(&articles, "   ");
    assert_eq!(all.len(), articles.len());
    assert_eq!(ids(&all), articles.iter().map(|a| a.id.as_str()).collect::<Vec<_>>());

    let outcome = ArchiveSearch::default().search(&articles, "");
    assert_eq!(outcome.mode, SearchMode::All);
    assert!(outcome.terms.is_empty());
}

#[test]
fn test_title_match_outranks_slug_match() {
    let articles = archive();
    let found = search(&articles, "protest");
    assert_eq!(ids(&found), vec!["songs", "diary"]);
}

#[test]
fn test_typo_tolerance() {
    let articles = vec![ArticleBuilder::new("d1").title("Democracy now").build()];
    assert_eq!(ids(&search(&articles, "democarcy")), vec!["d1"]);

    let strict = SearchConfig {
        threshold: 0.1,
        ..SearchConfig::default()
    };
    let outcome = search_with_outcome(&articles, "democarcy", &strict);
    assert!(outcome.hits.is_empty());
    assert_eq!(outcome.mode, SearchMode::Substring);
}

#[test]
fn test_short_query_uses_substring_fallback() {
    let articles = archive();
    let outcome = search_with_outcome(&articles, "A", &SearchConfig::default());
    assert_eq!(outcome.mode, SearchMode::Substring);
    let found = outcome.ids();
    assert!(found.contains(&"dharma"));
    assert!(found.contains(&"aravalli"));
    assert!(!found.contains(&"cricket"));
}

#[test]
fn test_placeholder_summary_is_not_searchable() {
    let articles = vec![
        ArticleBuilder::new("p1").title("Untitled").summary("{{summary}}").build(),
        ArticleBuilder::new("p2").title("Untitled").summary("Summary of the week").build(),
    ];
    assert_eq!(ids(&search(&articles, "summary")), vec!["p2"]);
}

#[test]
fn test_search_composes_with_filter() {
    let articles = archive();
    let condition = FilterBuilder::new().years(Some(2018), None).build().unwrap();
    let recent = condition.apply(&articles);
    let found = search(recent, "environment");
    assert_eq!(ids(&found), vec!["aravalli"]);
}

#[test]
fn test_repeated_ids_keep_input_order() {
    let articles = vec![
        ArticleBuilder::new("twin").title("Protest songs").summary("First copy").build(),
        ArticleBuilder::new("twin").title("Protest songs").summary("Second copy").build(),
    ];
    let found = search(&articles, "protest");
    let summaries: Vec<Option<&str>> = found.iter().map(|a| a.summary.as_deref()).collect();
    assert_eq!(summaries, vec![Some("First copy"), Some("Second copy")]);
}
