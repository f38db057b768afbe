//! Quote selection: curated > body paragraph > summary sentence > title.

use serde::{Deserialize, Serialize};

use crate::corpus::ArticleRecord;
use crate::evidence::scorer::RelevanceScorer;
use crate::narrative::text::{first_sentence, normalize_lower, normalize_whitespace, split_sentences, usable_text};
use crate::shift::Phase;

/// Paragraphs shorter than this are never quoted.
pub const MIN_PARAGRAPH_CHARS: usize = 70;
/// Body quotes are shortened at sentence boundaries to this many characters.
pub const MAX_QUOTE_CHARS: usize = 520;

const ANCHOR_PARAGRAPH_WEIGHT: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Curated,
    BodyParagraph,
    SummarySentence,
    Title,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub text: String,
    pub source: QuoteSource,
    pub confidence: f64,
}

/// Blank-line separated paragraphs, whitespace-normalized, long enough to quote.
/// CRLF and bare CR line endings are treated as `\n`.
pub fn split_paragraphs(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n").replace('\r', "\n");
    body.split("\n\n")
        .map(normalize_whitespace)
        .filter(|p| p.chars().count() >= MIN_PARAGRAPH_CHARS)
        .collect()
}

/// Keep whole sentences up to `max_chars`; hard-cut at a word when even the
/// first sentence is too long.
pub fn shorten_quote(paragraph: &str, max_chars: usize) -> String {
    let clean = normalize_whitespace(paragraph);
    if clean.chars().count() <= max_chars {
        return clean;
    }

    let mut kept: Vec<String> = Vec::new();
    let mut total = 0;
    for sentence in split_sentences(&clean) {
        let next = total + sentence.chars().count() + usize::from(!kept.is_empty());
        if next > max_chars {
            break;
        }
        kept.push(sentence);
        total = next;
    }
    if !kept.is_empty() {
        return kept.join(" ");
    }

    let head: String = clean.chars().take(max_chars).collect();
    match head.rsplit_once(' ') {
        Some((before, _)) => before.trim().to_string(),
        None => head,
    }
}

fn paragraph_score(scorer: &RelevanceScorer, phase: Phase, paragraph: &str) -> f64 {
    let text = normalize_lower(paragraph);
    let group_total: u32 = scorer.raw_group_hits(&text, phase).iter().map(|(_, hits)| hits).sum();
    group_total as f64 + scorer.anchor_hits(&text) as f64 * ANCHOR_PARAGRAPH_WEIGHT
}

/// Pick the quote for `article` in `phase`.
pub fn choose_quote(
    scorer: &RelevanceScorer,
    article: &ArticleRecord,
    phase: Phase,
    curated: Option<&str>,
) -> Quote {
    if let Some(text) = usable_text(curated) {
        return Quote {
            text: normalize_whitespace(text),
            source: QuoteSource::Curated,
            confidence: 1.0,
        };
    }

    // First paragraph wins ties
    let mut best: Option<(f64, String)> = None;
    for paragraph in split_paragraphs(article.body()) {
        let score = paragraph_score(scorer, phase, &paragraph);
        if best.as_ref().map_or(true, |(top, _)| score > *top) {
            best = Some((score, paragraph));
        }
    }
    if let Some((score, paragraph)) = best {
        if score > 0.0 {
            return Quote {
                text: shorten_quote(&paragraph, MAX_QUOTE_CHARS),
                source: QuoteSource::BodyParagraph,
                confidence: (0.45 + score / 20.0).min(1.0),
            };
        }
    }

    if let Some(sentence) = article.usable_summary().and_then(first_sentence) {
        return Quote {
            text: sentence,
            source: QuoteSource::SummarySentence,
            confidence: 0.42,
        };
    }

    Quote {
        text: article.title.trim().to_string(),
        source: QuoteSource::Title,
        confidence: 0.25,
    }
}
