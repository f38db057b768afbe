//! Shift Definition Registry
//!
//! The set of thematic shifts is closed and known at compile time, so shifts are
//! an enum-keyed static table. Every lookup goes through an exhaustive `match`.

pub mod groups;
pub mod registry;

pub use groups::*;
pub use registry::*;

use serde::{Deserialize, Serialize};

/// Temporal phase of an article relative to a shift's milestone year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Before,
    After,
}

impl Phase {
    /// Both phases in packet order.
    pub const ALL: [Phase; 2] = [Phase::Before, Phase::After];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Before => "before",
            Phase::After => "after",
        }
    }

    /// Heading used by briefs ("Phase 1 Evidence (Before)").
    pub fn heading(&self) -> &'static str {
        match self {
            Phase::Before => "Phase 1 Evidence (Before)",
            Phase::After => "Phase 2 Evidence (After)",
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Phase::Before => 1,
            Phase::After => 2,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = crate::EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "before" => Ok(Phase::Before),
            "after" => Ok(Phase::After),
            other => Err(crate::EngineError::InvalidParams(format!("unknown phase {:?}", other))),
        }
    }
}
