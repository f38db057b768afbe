//! Shared test fixtures.

use std::collections::BTreeMap;

use crate::corpus::{ArticleRecord, CuratedEvidence, ShiftAnnotation, Tag, TextState};
use crate::shift::{Phase, ShiftId};

/// Fluent builder for article records. Defaults to a valid mid-year 2020 record
/// with no summary, no tags and no body.
pub struct ArticleBuilder {
    record: ArticleRecord,
    date_set: bool,
}

impl ArticleBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            record: ArticleRecord {
                id: id.to_string(),
                title: format!("Column {}", id),
                date_iso: String::new(),
                year: 2020,
                url: None,
                publication: "The Archive".to_string(),
                section: "Opinion".to_string(),
                reading_minutes: Some(5),
                summary: None,
                tone: None,
                tags: Vec::new(),
                shift_annotations: BTreeMap::new(),
                curated: BTreeMap::new(),
                text_state: TextState::Missing,
                body_text: None,
            },
            date_set: false,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.record.title = title.to_string();
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.record.year = year;
        self
    }

    /// Sets `date_iso` and derives the year from it.
    pub fn date(mut self, date_iso: &str) -> Self {
        self.record.date_iso = date_iso.to_string();
        if let Some(year) = date_iso.get(..4).and_then(|y| y.parse().ok()) {
            self.record.year = year;
        }
        self.date_set = true;
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.record.summary = Some(summary.to_string());
        self
    }

    pub fn tag(mut self, slug: &str) -> Self {
        let label = slug.replace('-', " ");
        self.record.tags.push(Tag::new(&label, slug));
        self
    }

    pub fn labeled_tag(mut self, label: &str, slug: &str) -> Self {
        self.record.tags.push(Tag::new(label, slug));
        self
    }

    pub fn tone(mut self, tone: &str) -> Self {
        self.record.tone = Some(tone.to_string());
        self
    }

    pub fn publication(mut self, publication: &str) -> Self {
        self.record.publication = publication.to_string();
        self
    }

    pub fn section(mut self, section: &str) -> Self {
        self.record.section = section.to_string();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.record.url = Some(url.to_string());
        self
    }

    pub fn full_text(mut self, body: &str) -> Self {
        self.record.body_text = Some(body.to_string());
        self.record.text_state = TextState::Full;
        self
    }

    pub fn partial_text(mut self, body: &str) -> Self {
        self.record.body_text = Some(body.to_string());
        self.record.text_state = TextState::Partial;
        self
    }

    pub fn annotation(mut self, shift: ShiftId, phase: Phase, connection: &str, key_message: &str) -> Self {
        self.record.shift_annotations.insert(
            shift.as_str().to_string(),
            ShiftAnnotation {
                phase,
                connection: connection.to_string(),
                key_message: key_message.to_string(),
                audit: None,
            },
        );
        self
    }

    pub fn curated(mut self, shift: ShiftId, curated: CuratedEvidence) -> Self {
        self.record.curated.insert(shift.as_str().to_string(), curated);
        self
    }

    pub fn build(mut self) -> ArticleRecord {
        if !self.date_set {
            self.record.date_iso = format!("{:04}-06-15", self.record.year);
        }
        self.record
    }
}
