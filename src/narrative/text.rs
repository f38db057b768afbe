//! Text utilities shared by the synthesizer, packet builder and search.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// Appended when a field is cut to its budget.
pub const ELLIPSIS: &str = "…";

/// Cut-back to the last space only when it lies past this share of the budget.
const WORD_BACKOFF_RATIO: f64 = 0.62;

/// Collapse runs of whitespace to single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized, lower-cased text (keyword matching form).
pub fn normalize_lower(text: &str) -> String {
    normalize_whitespace(text).to_lowercase()
}

// =============================================================================
// Sentences
// =============================================================================

/// Split normalized text into sentences. A boundary is `.`, `!` or `?` followed
/// by whitespace (or end of text); the terminator stays with its sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = normalized.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |next| next.is_whitespace()) {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// First sentence of `text`, or the whole normalized text when it has no terminator.
pub fn first_sentence(text: &str) -> Option<String> {
    split_sentences(text).into_iter().next()
}

/// Comparison key for duplicate detection: lower-cased, trailing punctuation stripped.
pub fn sentence_key(sentence: &str) -> String {
    normalize_lower(sentence)
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace() || c == '…')
        .to_string()
}

pub fn same_sentence(a: &str, b: &str) -> bool {
    sentence_key(a) == sentence_key(b)
}

// =============================================================================
// Placeholders
// =============================================================================

fn placeholder_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"(?ix)^(?:
                    \{\{\s*[\w.\-]+\s*\}\}      # {{summary}}
                  | \$\{\s*[\w.\-]+\s*\}        # ${summary}
                  | \$[A-Za-z_]\w*              # $SUMMARY
                  | <\s*[\w.\-]+\s*>            # <summary>
                  | \[\s*[A-Za-z_][\w.\-]*\s*\] # [SUMMARY]
                  | %[\w.\-]+%                  # %summary%
                  | null | undefined | none | nan | n/?a | tbd | todo
                )$",
            )
            .ok()
        })
        .as_ref()
}

/// True for un-interpolated template tokens and sentinel strings. These are
/// treated exactly like a missing value.
pub fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    // Bare UPPER_SNAKE identifiers such as SUMMARY_TEXT
    if trimmed.contains('_')
        && trimmed
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    {
        return true;
    }
    placeholder_regex().is_some_and(|re| re.is_match(trimmed))
}

/// `Some(trimmed)` for real text, `None` for blank or placeholder input.
pub fn usable_text(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !is_placeholder(t))
}

// =============================================================================
// Truncation
// =============================================================================

/// Fit `text` into `budget` user-perceived characters (grapheme clusters).
///
/// Trims to the budget, backs off to the last space when it falls past ~62% of
/// the budget, and appends an ellipsis only when trimming happened. The result,
/// ellipsis included, never exceeds the budget.
pub fn truncate_text(text: &str, budget: usize) -> String {
    let text = text.trim();
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }

    let keep = budget - 1;
    let mut cut = &graphemes[..keep];
    if let Some(space) = cut.iter().rposition(|g| *g == " ") {
        if space as f64 > budget as f64 * WORD_BACKOFF_RATIO {
            cut = &cut[..space];
        }
    }

    let mut out: String = cut.concat();
    let trimmed_len = out
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'))
        .len();
    out.truncate(trimmed_len);
    out.push_str(ELLIPSIS);
    out
}
