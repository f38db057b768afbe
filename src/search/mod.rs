//! Archive Search Layer
//!
//! Synonym expansion, weighted fuzzy matching with a substring fallback, and
//! search suggestions.

pub mod engine;
pub mod fuzzy;
pub mod suggest;
pub mod synonyms;

#[cfg(test)]
mod tests;

pub use engine::{search, search_with_outcome, ArchiveSearch, SearchHit, SearchMode, SearchOutcome};
pub use fuzzy::{best_score, match_score};
pub use suggest::{suggest, suggestion_pool, SearchSuggestion, SuggestionGroup};
pub use synonyms::{expand_query, expand_terms, synonyms_for, tokenize};
