//! ShiftCore: Shift Evidence Engine + Archive Search
//!
//! A Rust/WASM engine behind the opinion-archive front-end. It scores articles
//! against thematic "shift" definitions, splits them into before/after phases
//! around a milestone year, builds auditable evidence packets, synthesizes card
//! text, and runs the synonym-expanded archive search.
//!
//! # Architecture
//!
//! ## Evidence Components
//! - `shift/` - Closed registry of shift definitions, lead groups, templates
//! - `corpus/` - Article records, tags, annotations, facet filters
//! - `evidence/scorer.rs` - Relevance + research scoring (Aho-Corasick keyword hits)
//! - `evidence/phase.rs` - Before/after classification and curated overrides
//! - `evidence/coverage.rs` - Minimum-coverage backfill for story selections
//! - `evidence/packet.rs` - Auditable research packet builder
//! - `evidence/brief.rs` - Markdown brief rendering
//!
//! ## Narrative Components
//! - `narrative/text.rs` - Sentence splitting, placeholder detection, truncation
//! - `narrative/synth.rs` - Summary/takeaway synthesis with template tracking
//! - `narrative/card.rs` - Narrative cards with curated > annotation > generated precedence
//!
//! ## Search Components
//! - `search/synonyms.rs` - Query expansion table
//! - `search/fuzzy.rs` - Location-agnostic approximate matching
//! - `search/engine.rs` - Weighted fuzzy search with substring fallback
//! - `search/suggest.rs` - Ranked search suggestions
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { ShiftEngine } from 'shiftcore';
//!
//! await init();
//! const engine = new ShiftEngine(articles);
//! const hits = engine.search("environment");
//! const packet = engine.buildPacket("republic_shift", { max_per_phase: 12 }, "2026-01-01 00:00:00 UTC");
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod evidence;
pub mod narrative;
pub mod search;
pub mod shift;
pub mod wasm;

#[cfg(test)]
pub(crate) mod testing;

pub use config::*;
pub use corpus::*;
pub use error::{EngineError, Result};
pub use evidence::*;
pub use narrative::*;
pub use search::*;
pub use shift::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("shiftcore v{}", env!("CARGO_PKG_VERSION"))
}
