//! Configuration types and defaults for the engine
//!
//! Story coverage, text budgets and search tuning. Packet selection parameters
//! live with the packet builder (`evidence::SelectionParams`).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// =============================================================================
// Coverage
// =============================================================================

/// Story-selection coverage guarantees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Primary threshold for story cards. Default: 2.0
    pub min_score: f64,
    /// Minimum total selected before backfill kicks in. Default: 12
    pub minimum_total: usize,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            min_score: 2.0,
            minimum_total: 12,
        }
    }
}

// =============================================================================
// Text Budgets
// =============================================================================

/// Character budgets for synthesized text fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisBudgets {
    pub summary: usize,
    pub takeaway: usize,
    pub quote: usize,
    /// Packet `summary_snippet`
    pub snippet: usize,
}

impl Default for SynthesisBudgets {
    fn default() -> Self {
        Self {
            summary: 300,
            takeaway: 320,
            quote: 240,
            snippet: 280,
        }
    }
}

// =============================================================================
// Search
// =============================================================================

/// Relative field weights for fuzzy matching (title > summary > tag label > slug)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub summary: f64,
    pub tag_label: f64,
    pub tag_slug: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 0.4,
            summary: 0.3,
            tag_label: 0.2,
            tag_slug: 0.1,
        }
    }
}

/// Search tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum normalized edit distance for a fuzzy hit (0 = exact). Default: 0.34
    pub threshold: f64,
    pub weights: FieldWeights,
    /// Query tokens shorter than this are ignored by the fuzzy pass. Default: 2
    pub min_token_len: usize,
    /// Cap on returned suggestions. Default: 8
    pub suggestion_limit: usize,
    /// Union synonym-table terms into the query. Default: true
    pub expand_synonyms: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.34,
            weights: FieldWeights::default(),
            min_token_len: 2,
            suggestion_limit: 8,
            expand_synonyms: true,
        }
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Engine-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub coverage: CoverageConfig,
    pub budgets: SynthesisBudgets,
    pub search: SearchConfig,
}

impl EngineConfig {
    /// Production configuration
    pub fn production() -> Self {
        Self::default()
    }

    /// Tighter matching and a higher story threshold
    pub fn strict() -> Self {
        Self {
            coverage: CoverageConfig {
                min_score: 3.0,
                ..CoverageConfig::default()
            },
            search: SearchConfig {
                threshold: 0.2,
                ..SearchConfig::default()
            },
            ..Self::default()
        }
    }

    /// Looser matching for thin corpora
    pub fn lenient() -> Self {
        Self {
            coverage: CoverageConfig {
                min_score: 1.0,
                ..CoverageConfig::default()
            },
            search: SearchConfig {
                threshold: 0.45,
                ..SearchConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.search;
        if !(0.0..=1.0).contains(&s.threshold) {
            return Err(EngineError::InvalidParams(format!(
                "search threshold must be within [0, 1], got {}",
                s.threshold
            )));
        }
        let w = &s.weights;
        if [w.title, w.summary, w.tag_label, w.tag_slug].iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(EngineError::InvalidParams("field weights must be positive".to_string()));
        }
        if !self.coverage.min_score.is_finite() {
            return Err(EngineError::InvalidParams("coverage min_score must be finite".to_string()));
        }
        let b = &self.budgets;
        if [b.summary, b.takeaway, b.quote, b.snippet].contains(&0) {
            return Err(EngineError::InvalidParams("text budgets must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.coverage.min_score, 2.0);
        assert_eq!(config.coverage.minimum_total, 12);
        assert_eq!(config.search.threshold, 0.34);
        assert_eq!(config.search.suggestion_limit, 8);
        assert_eq!(config, EngineConfig::production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_order_thresholds() {
        let strict = EngineConfig::strict();
        let lenient = EngineConfig::lenient();
        assert!(strict.search.threshold < lenient.search.threshold);
        assert!(strict.coverage.min_score > lenient.coverage.min_score);
        assert!(strict.validate().is_ok() && lenient.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"search": {"threshold": 0.2}}"#).unwrap();
        assert_eq!(config.search.threshold, 0.2);
        assert_eq!(config.search.weights, FieldWeights::default());
        assert_eq!(config.budgets.summary, 300);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.search.threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.search.weights.tag_slug = 0.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.budgets.quote = 0;
        assert!(config.validate().is_err());
    }
}
