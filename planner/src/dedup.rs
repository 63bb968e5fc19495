//! Content idea deduplication
//!
//! Cheap title similarity check used before an idea is added to a session.
//! Two titles are duplicates when their normalized forms are equal, or when
//! both are long enough and share most of their words.

use std::collections::HashSet;

use tracing::debug;

/// Titles must be longer than this (in characters) for the word-overlap check
pub const NEAR_DUPLICATE_MIN_CHARS: usize = 20;

/// Word sets must have more than this many words for the word-overlap check
pub const NEAR_DUPLICATE_MIN_WORDS: usize = 3;

/// Overlap ratio above which two titles are near-duplicates
pub const NEAR_DUPLICATE_THRESHOLD: f64 = 0.7;

/// Lowercase and trim a title for comparison
pub fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Word-overlap ratio between two normalized titles
///
/// Returns `None` when either title is too short or has too few words for
/// the near-duplicate check to apply.
pub fn word_overlap(a: &str, b: &str) -> Option<f64> {
    if a.chars().count() <= NEAR_DUPLICATE_MIN_CHARS || b.chars().count() <= NEAR_DUPLICATE_MIN_CHARS {
        return None;
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    if words_a.len() <= NEAR_DUPLICATE_MIN_WORDS || words_b.len() <= NEAR_DUPLICATE_MIN_WORDS {
        return None;
    }

    let common = words_a.intersection(&words_b).count();
    Some(common as f64 / words_a.len().min(words_b.len()) as f64)
}

/// Check whether `candidate` duplicates any of the `existing` titles
///
/// Existing titles are scanned in order and the first match wins.
pub fn is_duplicate<'a, I>(candidate: &str, existing: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let candidate = normalize(candidate);

    for title in existing {
        let title = normalize(title);

        if candidate == title {
            debug!(%candidate, "is_duplicate: exact match");
            return true;
        }

        if let Some(similarity) = word_overlap(&candidate, &title)
            && similarity > NEAR_DUPLICATE_THRESHOLD
        {
            debug!(%candidate, %title, similarity, "is_duplicate: near match");
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_match_ignores_case_and_whitespace() {
        assert!(is_duplicate("  How To Use X ", ["how to use x"]));
    }

    #[test]
    fn test_near_match_above_threshold() {
        let existing = ["How to Use Wireless Headphones for Running"];
        assert!(is_duplicate("How to use wireless headphones while running", existing));
    }

    #[test]
    fn test_low_overlap_is_not_duplicate() {
        let existing = ["How to Use Wireless Headphones for Running"];
        assert!(!is_duplicate("Best Wireless Headphones for Gaming", existing));
    }

    #[test]
    fn test_short_titles_skip_near_match() {
        assert!(!is_duplicate("Buy Soon", ["Buy Now"]));
        assert_eq!(word_overlap("buy now", "buy soon"), None);
    }

    #[test]
    fn test_few_words_skip_near_match() {
        // Long enough in characters, but only three words each
        let a = "extraordinarily long headline";
        let b = "extraordinarily long headlines";
        assert_eq!(word_overlap(a, b), None);
        assert!(!is_duplicate(a, [b]));
    }

    #[test]
    fn test_threshold_is_strict() {
        // 7 of 10 words shared: exactly 0.7, which is not above the threshold
        let a = "one two three four five six seven eight nine ten";
        let b = "one two three four five six seven alpha beta gamma";
        assert_eq!(word_overlap(a, b), Some(0.7));
        assert!(!is_duplicate(a, [b]));
    }

    #[test]
    fn test_ratio_uses_smaller_word_set() {
        let a = "the complete guide to wireless headphones";
        let b = "the complete guide to wireless headphones for runners who travel";
        assert_eq!(word_overlap(a, b), Some(1.0));
        assert!(is_duplicate(b, [a]));
    }

    #[test]
    fn test_empty_collection() {
        assert!(!is_duplicate("Anything at all", std::iter::empty()));
    }

    proptest! {
        #[test]
        fn prop_title_duplicates_itself(title in "[a-zA-Z ]{1,60}") {
            prop_assert!(is_duplicate(&title, [title.as_str()]));
        }

        #[test]
        fn prop_case_variants_are_duplicates(title in "[a-z ]{1,60}") {
            let upper = title.to_uppercase();
            prop_assert!(is_duplicate(&upper, [title.as_str()]));
        }

        #[test]
        fn prop_overlap_is_bounded(a in "[a-z]{2,6}( [a-z]{2,6}){4,10}", b in "[a-z]{2,6}( [a-z]{2,6}){4,10}") {
            if let Some(ratio) = word_overlap(&a, &b) {
                prop_assert!((0.0..=1.0).contains(&ratio));
            }
        }
    }
}
