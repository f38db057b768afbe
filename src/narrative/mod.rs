//! Narrative Text
//!
//! Sentence utilities, the summary/takeaway synthesizer and story cards.

pub mod card;
pub mod synth;
pub mod text;

pub use card::{
    card_tags, resolve_text, story_cards, CardBuilder, CardSources, CardTag, NarrativeCard, TextSource,
    MAX_CARD_TAGS, UNTAGGED_LABEL, UNTAGGED_SLUG,
};
pub use synth::{NarrativeSynthesizer, SynthesisReport, SUMMARY_PENDING};
pub use text::{
    first_sentence, is_placeholder, normalize_lower, normalize_whitespace, same_sentence, sentence_key,
    split_sentences, truncate_text, usable_text, ELLIPSIS,
};
