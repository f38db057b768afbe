//! WASM facade for the archive front-end.
//!
//! Thin `#[wasm_bindgen]` wrappers over the native API. Inputs arrive as plain
//! JS objects through `serde_wasm_bindgen`; outputs are serialized JSON-compatible
//! (maps become plain objects) so the front-end can consume them directly.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::corpus::{ArticleRecord, Corpus, FilterCondition};
use crate::error::EngineError;
use crate::evidence::brief::{render_brief, DEFAULT_TOP_N};
use crate::evidence::packet::{EvidencePacket, PacketBuilder, PacketMeta, DEFAULT_METHOD};
use crate::evidence::params::SelectionParams;
use crate::evidence::phase::{classify, resolve_phase};
use crate::narrative::card::story_cards;
use crate::narrative::synth::SynthesisReport;
use crate::narrative::NarrativeCard;
use crate::search::{expand_query, suggest, ArchiveSearch, SearchMode};
use crate::shift::{all_shifts, Phase, ShiftId};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(|e| {
        console_warn(&format!("[ShiftEngine] Serialization failed: {}", e));
        js_error(e)
    })
}

fn console_warn(message: &str) {
    tracing::warn!("{}", message);
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&message.into());
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchReply<'a> {
    ids: Vec<&'a str>,
    mode: SearchMode,
    terms: &'a [String],
    timing_us: u64,
}

#[derive(Serialize)]
struct StoryReply {
    cards: Vec<NarrativeCard>,
    report: SynthesisReport,
}

#[derive(Serialize)]
struct ShiftSummary {
    id: &'static str,
    label: &'static str,
    milestone_year: i32,
    keywords: &'static [&'static str],
    preferred_tag_slugs: &'static [&'static str],
    before_narrative: &'static str,
    after_narrative: &'static str,
    lead_groups: Vec<&'static str>,
}

/// Engine over one validated article corpus
#[wasm_bindgen]
pub struct ShiftEngine {
    corpus: Corpus,
    config: EngineConfig,
}

impl ShiftEngine {
    fn with_corpus(corpus: Corpus) -> Self {
        Self {
            corpus,
            config: EngineConfig::production(),
        }
    }

    /// Packet for `shift_id`; `overrides` is merged over the shift preset.
    fn packet(
        &self,
        shift_id: &str,
        overrides: Option<serde_json::Value>,
        generated_at: Option<&str>,
    ) -> crate::Result<EvidencePacket> {
        let (shift, params) = packet_params(shift_id, overrides)?;
        PacketBuilder::new(shift)
            .params(params)
            .meta(packet_meta(generated_at))
            .budgets(self.config.budgets.clone())
            .build(self.corpus.articles())
    }

    fn phase_of(&self, shift_id: &str, article_id: &str) -> crate::Result<Phase> {
        let shift: ShiftId = shift_id.parse()?;
        let article = self
            .corpus
            .get(article_id)
            .ok_or_else(|| EngineError::UnknownArticle(article_id.to_string()))?;
        Ok(resolve_phase(article, shift))
    }

    fn build_packet_native(&self, shift_id: &str, params: JsValue, generated_at: Option<String>) -> Result<EvidencePacket, JsValue> {
        let overrides: Option<serde_json::Value> = if params.is_undefined() || params.is_null() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value(params).map_err(js_error)?)
        };
        self.packet(shift_id, overrides, generated_at.as_deref()).map_err(|e| {
            console_warn(&format!("[ShiftEngine] Packet build failed: {}", e));
            js_error(e)
        })
    }

    fn filtered(&self, filter: JsValue) -> Result<Vec<&ArticleRecord>, JsValue> {
        if filter.is_undefined() || filter.is_null() {
            return Ok(self.corpus.articles().iter().collect());
        }
        let condition: FilterCondition = serde_wasm_bindgen::from_value(filter).map_err(js_error)?;
        Ok(self.corpus.filter(&condition))
    }
}

/// Shift id plus its preset with `overrides` merged field by field. `None`
/// keeps the preset.
fn packet_params(shift_id: &str, overrides: Option<serde_json::Value>) -> crate::Result<(ShiftId, SelectionParams)> {
    let shift: ShiftId = shift_id.parse()?;
    let params = SelectionParams::with_overrides(shift, overrides.unwrap_or(serde_json::Value::Null))?;
    Ok((shift, params))
}

/// Caller stamp when given, otherwise the current UTC time.
fn packet_meta(generated_at: Option<&str>) -> PacketMeta {
    let version = env!("CARGO_PKG_VERSION");
    match generated_at {
        Some(stamp) => PacketMeta::new(stamp, DEFAULT_METHOD, version),
        None => PacketMeta::now(DEFAULT_METHOD, version),
    }
}

#[wasm_bindgen]
impl ShiftEngine {
    /// Load and validate an array of article records.
    #[wasm_bindgen(constructor)]
    pub fn new(articles: JsValue) -> Result<ShiftEngine, JsValue> {
        let records: Vec<ArticleRecord> = serde_wasm_bindgen::from_value(articles).map_err(js_error)?;
        Ok(ShiftEngine::with_corpus(Corpus::new(records).map_err(js_error)?))
    }

    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<ShiftEngine, JsValue> {
        Ok(ShiftEngine::with_corpus(Corpus::from_json(json).map_err(js_error)?))
    }

    /// Replace the engine configuration (partial objects fill from defaults).
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: EngineConfig = serde_wasm_bindgen::from_value(config).map_err(js_error)?;
        config.validate().map_err(js_error)?;
        self.config = config;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    /// Matching records in rank order; the full corpus for a blank query.
    pub fn search(&self, query: &str) -> Result<JsValue, JsValue> {
        let outcome = ArchiveSearch::new(self.config.search.clone()).search(self.corpus.articles(), query);
        to_js(&outcome.records())
    }

    /// Filter first, then search the survivors. Returns ids, mode, terms and timing.
    #[wasm_bindgen(js_name = searchFiltered)]
    pub fn search_filtered(&self, query: &str, filter: JsValue) -> Result<JsValue, JsValue> {
        let pool = self.filtered(filter)?;
        let outcome = ArchiveSearch::new(self.config.search.clone()).search(pool, query);
        to_js(&SearchReply {
            ids: outcome.ids(),
            mode: outcome.mode,
            terms: &outcome.terms,
            timing_us: outcome.timing_us,
        })
    }

    pub fn suggest(&self, input: &str) -> Result<JsValue, JsValue> {
        to_js(&suggest(self.corpus.articles(), input, self.config.search.suggestion_limit))
    }

    pub fn filter(&self, condition: JsValue) -> Result<JsValue, JsValue> {
        to_js(&self.filtered(condition)?)
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_js(&self.corpus.stats())
    }

    /// Phase of one article for a shift, honouring curated overrides.
    pub fn classify(&self, shift_id: &str, article_id: &str) -> Result<String, JsValue> {
        Ok(self.phase_of(shift_id, article_id).map_err(js_error)?.as_str().to_string())
    }

    /// Evidence packet as a plain object. `params` overrides the shift preset
    /// field by field; omit `generated_at` to stamp the current time.
    #[wasm_bindgen(js_name = buildPacket)]
    pub fn build_packet(&self, shift_id: &str, params: JsValue, generated_at: Option<String>) -> Result<JsValue, JsValue> {
        to_js(&self.build_packet_native(shift_id, params, generated_at)?)
    }

    #[wasm_bindgen(js_name = buildPacketJson)]
    pub fn build_packet_json(&self, shift_id: &str, params: JsValue, generated_at: Option<String>) -> Result<String, JsValue> {
        self.build_packet_native(shift_id, params, generated_at)?
            .to_json_pretty()
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = renderBrief)]
    pub fn render_brief(
        &self,
        shift_id: &str,
        params: JsValue,
        generated_at: Option<String>,
        top_n: Option<usize>,
    ) -> Result<String, JsValue> {
        let packet = self.build_packet_native(shift_id, params, generated_at)?;
        Ok(render_brief(&packet, top_n.unwrap_or(DEFAULT_TOP_N)))
    }

    /// Story cards plus the synthesis quality report.
    #[wasm_bindgen(js_name = storyCards)]
    pub fn story_cards(&self, shift_id: &str) -> Result<JsValue, JsValue> {
        let shift: ShiftId = shift_id.parse().map_err(js_error)?;
        let (cards, report) = story_cards(self.corpus.articles(), shift, &self.config);
        if report.over_templated {
            console_warn(&format!(
                "[ShiftEngine] {} takeaways are over-templated ({} duplicates)",
                shift, report.duplicate_takeaways
            ));
        }
        to_js(&StoryReply { cards, report })
    }
}

/// The synonym-expanded form of a query.
#[wasm_bindgen(js_name = expandQuery)]
pub fn expand_query_js(query: &str) -> String {
    expand_query(query)
}

/// `"before"` or `"after"` for a year against a milestone.
#[wasm_bindgen(js_name = classifyYear)]
pub fn classify_year(year: i32, milestone_year: i32) -> String {
    classify(year, milestone_year).as_str().to_string()
}

/// Catalog of shift definitions for the front-end.
#[wasm_bindgen(js_name = listShifts)]
pub fn list_shifts() -> Result<JsValue, JsValue> {
    let shifts: Vec<ShiftSummary> = all_shifts()
        .map(|shift| ShiftSummary {
            id: shift.id.as_str(),
            label: shift.label,
            milestone_year: shift.milestone_year,
            keywords: shift.keywords,
            preferred_tag_slugs: shift.preferred_tag_slugs,
            before_narrative: shift.before_narrative,
            after_narrative: shift.after_narrative,
            lead_groups: shift.lead_groups().iter().map(|g| g.title()).collect(),
        })
        .collect();
    to_js(&shifts)
}
