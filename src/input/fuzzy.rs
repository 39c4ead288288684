//! Subsequence fuzzy matching for the script picker
//!
//! A query matches a text when every query character occurs in the text in
//! order, not necessarily adjacent. Comparison is case-insensitive and works
//! on characters, never bytes, so multi-byte text behaves like ASCII.
//!
//! Scores are "lower is better": gaps between matched characters add to the
//! score, while literal substring and prefix matches earn large bonuses.

/// Score returned when the query is not a subsequence of the text.
pub const NO_MATCH_SCORE: i32 = 999_999;

mod score {
    /// Bonus for the query occurring contiguously anywhere in the text
    pub const SUBSTRING: i32 = -100;
    /// Additional bonus for the text starting with the query
    pub const PREFIX: i32 = -200;
}

/// Case-fold a single character.
///
/// Uses the first char of the lowercase mapping so that folded text keeps a
/// one-to-one correspondence with the original characters.
#[inline]
pub fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

pub(crate) fn fold(s: &str) -> Vec<char> {
    s.chars().map(fold_char).collect()
}

/// Returns true when `query` is empty or is a case-insensitive subsequence of `text`.
pub fn fuzzy_match(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let query = fold(query);
    let mut qi = 0;
    for tc in text.chars().map(fold_char) {
        if qi < query.len() && tc == query[qi] {
            qi += 1;
        }
    }
    qi == query.len()
}

/// Score how well `query` matches `text` (lower is better).
///
/// - empty query scores 0
/// - each matched character after the first adds its distance to the previous match
/// - a non-subsequence scores [`NO_MATCH_SCORE`]
/// - a contiguous occurrence subtracts 100, a prefix occurrence another 200
pub fn fuzzy_score(text: &str, query: &str) -> i32 {
    if query.is_empty() {
        return 0;
    }

    let text = fold(text);
    let query = fold(query);

    let mut total = 0i32;
    let mut qi = 0;
    let mut last_match: Option<usize> = None;

    for (ti, &tc) in text.iter().enumerate() {
        if qi >= query.len() {
            break;
        }
        if tc == query[qi] {
            if let Some(prev) = last_match {
                total += (ti - prev) as i32;
            }
            last_match = Some(ti);
            qi += 1;
        }
    }

    if qi < query.len() {
        return NO_MATCH_SCORE;
    }

    if find_subsequence(&text, &query).is_some() {
        total += score::SUBSTRING;
    }
    if text.starts_with(&query) {
        total += score::PREFIX;
    }

    total
}

/// Position of the first contiguous occurrence of `needle` in `haystack`.
pub(crate) fn find_subsequence(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(fuzzy_match("test", "test"));
    }

    #[test]
    fn test_characters_in_order() {
        assert!(fuzzy_match("development", "dev"));
        assert!(fuzzy_match("package-manager", "pm"));
        assert!(fuzzy_match("build-production", "prod"));
        assert!(fuzzy_match("test", "t"));
    }

    #[test]
    fn test_out_of_order_does_not_match() {
        assert!(!fuzzy_match("test", "tset"));
        assert!(!fuzzy_match("test", "testing"));
        assert!(!fuzzy_match("abc", "xyz"));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(fuzzy_match("anything", ""));
        assert!(fuzzy_match("", ""));
        assert_eq!(fuzzy_score("anything", ""), 0);
    }

    #[test]
    fn test_case_insensitive() {
        for text in ["Development", "DEVELOPMENT", "development"] {
            for query in ["dev", "DEV"] {
                assert!(fuzzy_match(text, query));
                assert_eq!(fuzzy_score(text, query), fuzzy_score("development", "dev"));
            }
        }
    }

    #[test]
    fn test_multibyte_text() {
        assert!(fuzzy_match("ビルド", "ルド"));
        assert!(fuzzy_match("Über-build", "über"));
        assert!(fuzzy_match("ÜBER", "über"));
        assert!(!fuzzy_match("ビルド", "ドル"));
    }

    #[test]
    fn test_no_match_sentinel() {
        assert_eq!(fuzzy_score("test", "xyz"), NO_MATCH_SCORE);
        assert_eq!(fuzzy_score("test", "tset"), NO_MATCH_SCORE);
    }

    #[test]
    fn test_contiguous_beats_scattered() {
        assert!(fuzzy_score("my-dev-tool", "dev") < fuzzy_score("d-e-v-e-l-o-p", "dev"));
    }

    #[test]
    fn test_prefix_beats_substring() {
        assert!(fuzzy_score("development", "dev") < fuzzy_score("my-dev-tool", "dev"));
    }

    #[test]
    fn test_score_values() {
        // prefix: gaps 1+1, substring -100, prefix -200
        assert_eq!(fuzzy_score("development", "dev"), 2 - 300);
        // substring only
        assert_eq!(fuzzy_score("my-dev-tool", "dev"), 2 - 100);
        // scattered: d(0) e(2) v(4)
        assert_eq!(fuzzy_score("d-e-v-e-l-o-p", "dev"), 4);
    }

    #[test]
    fn test_find_subsequence() {
        let hay: Vec<char> = "my-dev-tool".chars().collect();
        let needle: Vec<char> = "dev".chars().collect();
        assert_eq!(find_subsequence(&hay, &needle), Some(3));
        assert_eq!(find_subsequence(&needle, &hay), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every query character appears in the text, in order, whenever the query matches.
        #[test]
        fn prop_match_implies_subsequence(text in "[a-zA-Zé_ -]{0,20}", query in "[a-zA-Zé]{0,5}") {
            if fuzzy_match(&text, &query) {
                let mut rest = fold(&text).into_iter();
                for qc in fold(&query) {
                    prop_assert!(rest.any(|tc| tc == qc));
                }
            }
        }

        /// Matching and scoring agree on what counts as a match.
        #[test]
        fn prop_score_sentinel_iff_no_match(text in "[a-z-]{0,16}", query in "[a-z]{1,4}") {
            let matched = fuzzy_match(&text, &query);
            let scored = fuzzy_score(&text, &query);
            prop_assert_eq!(matched, scored != NO_MATCH_SCORE);
        }

        /// Case never changes the outcome.
        #[test]
        fn prop_case_insensitive(text in "[a-zA-Z]{0,16}", query in "[a-zA-Z]{0,4}") {
            prop_assert_eq!(
                fuzzy_match(&text, &query),
                fuzzy_match(&text.to_uppercase(), &query.to_lowercase())
            );
            prop_assert_eq!(
                fuzzy_score(&text, &query),
                fuzzy_score(&text.to_lowercase(), &query.to_uppercase())
            );
        }

        /// The empty query matches everything with a zero score.
        #[test]
        fn prop_empty_query(text in ".{0,16}") {
            prop_assert!(fuzzy_match(&text, ""));
            prop_assert_eq!(fuzzy_score(&text, ""), 0);
        }
    }
}
