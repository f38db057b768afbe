//! Packet selection parameters and per-shift presets.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::evidence::scorer::ScoringModel;
use crate::shift::ShiftId;

/// Selection parameters for one evidence packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionParams {
    /// Default: 12
    pub max_per_phase: usize,
    pub min_score: f64,
    /// Distinct anchor keywords required. Default: 0
    pub min_anchor_hits: u32,
    /// Lead groups with non-zero hits required. Default: 0
    pub min_group_hits: u32,
    /// Strict mode: only full-text articles are selectable. Default: true
    pub full_text_only: bool,
    /// Top each phase up to its cap from below-threshold records. Default: true
    pub backfill_to_phase_cap: bool,
    pub scoring: ScoringModel,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            max_per_phase: 12,
            min_score: 2.0,
            min_anchor_hits: 0,
            min_group_hits: 0,
            full_text_only: true,
            backfill_to_phase_cap: true,
            scoring: ScoringModel::Relevance,
        }
    }
}

impl SelectionParams {
    /// Documented defaults per shift.
    ///
    /// The archive has used three different score cut-offs: 2 for relevance
    /// story cards, 14 for research packets, and 11, which is the research
    /// model's `moderate` strength bound rather than a cut-off. They are named
    /// presets here instead of scattered constants.
    pub fn for_shift(shift: ShiftId) -> Self {
        match shift {
            ShiftId::RepublicShift => Self::research(14.0, 3, 2),
            ShiftId::ScienceShift => Self::research(14.0, 2, 2),
            ShiftId::EcologicalShift | ShiftId::PoliticalShift => Self::default(),
        }
    }

    fn research(min_score: f64, min_anchor_hits: u32, min_group_hits: u32) -> Self {
        Self {
            min_score,
            min_anchor_hits,
            min_group_hits,
            scoring: ScoringModel::Research,
            ..Self::default()
        }
    }

    /// Shift preset with the fields present in `overrides` replaced. `null`
    /// means "use the preset".
    pub fn with_overrides(shift: ShiftId, overrides: serde_json::Value) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::for_shift(shift))?;
        match overrides {
            serde_json::Value::Null => {}
            serde_json::Value::Object(fields) => {
                if let serde_json::Value::Object(base) = &mut merged {
                    base.extend(fields);
                }
            }
            other => {
                return Err(EngineError::InvalidParams(format!(
                    "selection params must be an object, got {}",
                    other
                )))
            }
        }
        let params: Self = serde_json::from_value(merged)?;
        params.validate()?;
        Ok(params)
    }

    /// Permit weaker (non full-text) evidence.
    pub fn allow_non_full_text(mut self) -> Self {
        self.full_text_only = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_per_phase == 0 {
            return Err(EngineError::InvalidParams("max_per_phase must be at least 1".to_string()));
        }
        if !self.min_score.is_finite() {
            return Err(EngineError::InvalidParams(format!(
                "min_score must be finite, got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}
