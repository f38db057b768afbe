//! Location-agnostic approximate matching.
//!
//! # Algorithm
//!
//! Sellers' approximate substring search: the edit distance between the pattern
//! and its best-matching substring anywhere in the text. The first DP row is all
//! zeros so a match may start at any offset, and the answer is the minimum of the
//! last row so it may end anywhere. The score is that distance divided by the
//! pattern length: 0.0 is an exact occurrence, 1.0 shares nothing.

/// Normalized approximate-substring distance of `pattern` within `text`.
/// Both inputs are compared as-is; callers lower-case first.
pub fn match_score(pattern: &str, text: &str) -> f64 {
    if text.contains(pattern) {
        return 0.0;
    }
    let pattern: Vec<char> = pattern.chars().collect();

    let m = pattern.len();
    // column[i] = distance of pattern[..i] ending at the current text position
    let mut column: Vec<usize> = (0..=m).collect();
    let mut best = m;

    for tc in text.chars() {
        let mut diagonal = column[0];
        column[0] = 0;
        for i in 1..=m {
            let above = column[i];
            let cost = usize::from(pattern[i - 1] != tc);
            column[i] = (diagonal + cost).min(above + 1).min(column[i - 1] + 1);
            diagonal = above;
        }
        best = best.min(column[m]);
    }

    best as f64 / m as f64
}

/// Best score of `pattern` across several candidate texts; `None` when empty.
pub fn best_score<'a>(pattern: &str, texts: impl IntoIterator<Item = &'a str>) -> Option<f64> {
    texts
        .into_iter()
        .map(|text| match_score(pattern, text))
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_occurrence_anywhere_scores_zero() {
        assert_eq!(match_score("ecology", "deep ecology of the hills"), 0.0);
        assert_eq!(match_score("hills", "deep ecology of the hills"), 0.0);
    }

    #[test]
    fn test_single_typo_is_one_edit() {
        let score = match_score("ecolgy", "the ecology question");
        assert!((score - 1.0 / 6.0).abs() < 1e-9);
        let score = match_score("democarcy", "democracy now");
        assert!((score - 2.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrelated_text_scores_high() {
        assert!(match_score("aravallis", "cricket") > 0.5);
        assert_eq!(match_score("abc", ""), 1.0);
        assert_eq!(match_score("", "anything"), 0.0);
    }

    #[test]
    fn test_best_score_over_texts() {
        assert_eq!(best_score("nature", ["politics", "human nature"]), Some(0.0));
        assert_eq!(best_score("nature", std::iter::empty::<&str>()), None);
    }
}
