//! Query expansion through a fixed domain synonym table.

use std::collections::HashSet;

/// Token -> synonyms unioned into the query. Immutable; keys are lower-case.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("environment", &["ecology", "anthropocene", "nature", "aravallis"]),
    ("climate", &["anthropocene", "ecology", "survival"]),
    ("ecology", &["environment", "nature", "commons"]),
    ("democracy", &["republic", "constitution", "citizen"]),
    ("republic", &["democracy", "constitution"]),
    ("protest", &["dissent", "satyagraha", "yatra"]),
    ("dissent", &["protest", "resistance"]),
    ("science", &["knowledge", "research", "university"]),
    ("knowledge", &["science", "epistemology"]),
    ("ethics", &["conscience", "morality"]),
    ("politics", &["democracy", "dissent", "public sphere"]),
];

/// Synonyms for one lower-case token; empty when the token is not in the table.
pub fn synonyms_for(token: &str) -> &'static [&'static str] {
    SYNONYMS
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

/// Lower-cased query tokens with surrounding punctuation stripped.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Raw tokens first, then their synonyms, each term once.
pub fn expand_terms(query: &str) -> Vec<String> {
    let tokens = tokenize(query);
    let mut seen: HashSet<String> = HashSet::new();
    let mut terms = Vec::new();

    for term in tokens
        .iter()
        .map(String::as_str)
        .chain(tokens.iter().flat_map(|t| synonyms_for(t).iter().copied()))
    {
        if seen.insert(term.to_string()) {
            terms.push(term.to_string());
        }
    }
    terms
}

/// Expanded query rejoined with single spaces.
pub fn expand_query(query: &str) -> String {
    expand_terms(query).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_expands_to_ecology_terms() {
        assert_eq!(
            expand_terms("Environment"),
            vec!["environment", "ecology", "anthropocene", "nature", "aravallis"]
        );
        assert_eq!(expand_query("  environment "), "environment ecology anthropocene nature aravallis");
    }

    #[test]
    fn test_unknown_tokens_pass_through_and_dedupe() {
        assert_eq!(expand_terms("Monsoon, monsoon!"), vec!["monsoon"]);
        assert_eq!(expand_terms(""), Vec::<String>::new());
    }

    #[test]
    fn test_raw_tokens_stay_ahead_of_synonyms() {
        let terms = expand_terms("ecology environment");
        assert_eq!(&terms[..2], &["ecology".to_string(), "environment".to_string()]);
        assert_eq!(terms.iter().filter(|t| *t == "nature").count(), 1);
    }

    #[test]
    fn test_table_keys_are_lowercase() {
        for (key, words) in SYNONYMS {
            assert_eq!(*key, key.to_lowercase());
            assert!(!words.is_empty());
        }
    }
}
