//! Article records as handed over by the archive store.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineError, Result};
use crate::narrative::is_placeholder;
use crate::shift::{Phase, ShiftId};

// =============================================================================
// Tags
// =============================================================================

/// A topical tag. `slug` is the stable identity, `label` the display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub label: String,
    pub slug: String,
    #[serde(default)]
    pub domain: String,
    /// Provenance: `manual`, `llm_map`, `hybrid` or `keyword`.
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub confidence: f64,
}

impl Tag {
    pub fn new(label: &str, slug: &str) -> Self {
        Self {
            label: label.to_string(),
            slug: slug.to_string(),
            domain: String::new(),
            method: "manual".to_string(),
            confidence: 1.0,
        }
    }

    /// Provenance rank, higher wins when two tags share a slug.
    pub fn method_priority(&self) -> u8 {
        match self.method.as_str() {
            "manual" => 4,
            "llm_map" => 3,
            "hybrid" => 2,
            "keyword" => 1,
            _ => 0,
        }
    }

    fn outranks(&self, other: &Tag) -> bool {
        (self.method_priority(), self.confidence) > (other.method_priority(), other.confidence)
    }
}

/// Collapse duplicate slugs, keeping the best-provenance tag at the position of
/// the first occurrence.
pub fn dedupe_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut out: Vec<Tag> = Vec::with_capacity(tags.len());
    for tag in tags {
        if tag.slug.trim().is_empty() {
            continue;
        }
        match out.iter_mut().find(|existing| existing.slug == tag.slug) {
            Some(existing) => {
                if tag.outranks(existing) {
                    *existing = tag;
                }
            }
            None => out.push(tag),
        }
    }
    out
}

// =============================================================================
// Per-shift overrides
// =============================================================================

/// Narrative text persisted by an earlier annotation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftAnnotation {
    pub phase: Phase,
    #[serde(default)]
    pub connection: String,
    #[serde(default)]
    pub key_message: String,
    #[serde(default)]
    pub audit: Option<serde_json::Value>,
}

/// Output of an upstream curation step. Every field is optional and wins over
/// anything the engine would derive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratedEvidence {
    /// Explicit phase assignment, independent of the year-based default.
    pub phase: Option<Phase>,
    pub connection_text: Option<String>,
    pub quote_text: Option<String>,
    pub takeaway: Option<String>,
    pub summary: Option<String>,
}

/// How much of the article body the store holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextState {
    Full,
    Partial,
    #[default]
    Missing,
}

impl TextState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextState::Full => "full",
            TextState::Partial => "partial",
            TextState::Missing => "missing",
        }
    }
}

// =============================================================================
// ArticleRecord
// =============================================================================

/// Immutable input unit. The engine only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub date_iso: String,
    pub year: i32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub publication: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub reading_minutes: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub shift_annotations: BTreeMap<String, ShiftAnnotation>,
    #[serde(default)]
    pub curated: BTreeMap<String, CuratedEvidence>,
    #[serde(default)]
    pub text_state: TextState,
    #[serde(default)]
    pub body_text: Option<String>,
}

/// Store ids arrive as integers from SQL exports and as strings from JSON.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

impl ArticleRecord {
    /// Reject records missing identity fields or carrying an unparseable date.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::MalformedRecord { id: self.id.clone(), field: "id" });
        }
        if self.title.trim().is_empty() {
            return Err(EngineError::MalformedRecord { id: self.id.clone(), field: "title" });
        }
        if self.date_iso.trim().is_empty() {
            return Err(EngineError::MalformedRecord { id: self.id.clone(), field: "date_iso" });
        }
        let day = self.date_iso.get(..10).unwrap_or(&self.date_iso);
        if NaiveDate::parse_from_str(day, "%Y-%m-%d").is_err() {
            return Err(EngineError::InvalidDate {
                id: self.id.clone(),
                value: self.date_iso.clone(),
            });
        }
        Ok(())
    }

    /// Summary text, or `None` when absent, blank or an un-interpolated placeholder.
    pub fn usable_summary(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !is_placeholder(s))
    }

    pub fn body(&self) -> &str {
        self.body_text.as_deref().unwrap_or("")
    }

    pub fn is_full_text(&self) -> bool {
        self.text_state == TextState::Full
    }

    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == slug)
    }

    pub fn tag_slugs(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.slug.as_str())
    }

    /// Lower-cased title + summary + tag label/slug pairs, space separated.
    pub fn corpus_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(2 + self.tags.len() * 2);
        parts.push(&self.title);
        parts.push(self.usable_summary().unwrap_or(""));
        for tag in &self.tags {
            parts.push(&tag.label);
            parts.push(&tag.slug);
        }
        parts.join(" ").to_lowercase()
    }

    /// ISO calendar date (`YYYY-MM-DD`) without any time component.
    pub fn published_date(&self) -> &str {
        self.date_iso.get(..10).unwrap_or(&self.date_iso)
    }

    pub fn annotation_for(&self, shift: ShiftId) -> Option<&ShiftAnnotation> {
        self.shift_annotations.get(shift.as_str())
    }

    pub fn curated_for(&self, shift: ShiftId) -> Option<&CuratedEvidence> {
        self.curated.get(shift.as_str())
    }
}
