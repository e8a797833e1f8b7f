//! Text normalization and tokenization for keyword extraction.

use ahash::AHashSet;
use std::sync::LazyLock;

/// Tokens longer than this are treated as URL fragments or identifiers, not words.
const MAX_WORD_LENGTH: usize = 20;

/// Common English stop words plus generic verbs and nouns that only add noise.
/// These are never counted as keywords nor allowed at the edge of a phrase.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "you", "your", "this",
    "they", "but", "have", "had", "what", "when", "where", "who", "which", "why", "how", "all",
    "each", "every", "both", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "can", "just", "should", "now", "also",
    "into", "over", "after", "before", "between", "under", "again", "further", "then", "once",
    "here", "there", "about", "above", "below",
    // Generic verbs/nouns
    "use", "used", "using", "get", "got", "getting", "make", "made", "making", "way", "ways",
    "thing", "things", "take", "took", "taking", "look", "looks", "want", "wants", "need",
    "needs", "give", "gives", "find", "finds", "think", "know", "knows", "see", "sees", "feel",
    "seems", "call", "called", "work", "point", "fact", "good", "better", "best", "great", "new",
    "old", "big", "small", "well", "really", "even", "actually", "quite", "still", "many",
    "much", "any", "within",
];

static STOP_WORD_SET: LazyLock<AHashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// Returns true if `word` (already lowercase) is in the stop-word dictionary.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

/// Lowercases `text`, blanks out everything except word characters, whitespace
/// and hyphens, then splits on whitespace runs.
///
/// Word characters are ASCII letters, digits and `_`, so accented letters and
/// punctuation both act as separators:
/// - `"Keyword-Research, 2024!"` → `["keyword-research", "2024"]`
/// - `"e.g. www.example.com"` → `["e", "g", "www", "example", "com"]`
pub fn tokenize(text: &str) -> Vec<String> {
    let clean: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    clean.split_whitespace().map(str::to_owned).collect()
}

/// Detects tokens that look like URL or slug artifacts rather than words.
///
/// A token is URL-like if it contains `.`, `/` or `www`, is longer than 20
/// characters, or has more than one hyphen.
pub fn is_url_like(word: &str) -> bool {
    if word.contains('.') || word.contains('/') || word.contains("www") {
        return true;
    }
    if word.chars().count() > MAX_WORD_LENGTH {
        return true;
    }
    word.matches('-').count() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("SEO strategy requires keyword research.", &["seo", "strategy", "requires", "keyword", "research"])]
    #[case("Keyword-Research, 2024!", &["keyword-research", "2024"])]
    #[case("snake_case stays whole", &["snake_case", "stays", "whole"])]
    #[case("café au lait", &["caf", "au", "lait"])]
    #[case("tabs\tand\nnewlines", &["tabs", "and", "newlines"])]
    fn test_tokenize(#[case] input: &str, #[case] expected: &[&str]) {
        check!(tokenize(input) == expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("!!! ??? ...")]
    #[case("日本 🦀")]
    fn test_tokenize_empty_results(#[case] input: &str) {
        check!(tokenize(input).is_empty());
    }

    #[rstest]
    #[case("example.com", true)]
    #[case("blog/post", true)]
    #[case("wwwexample", true)]
    #[case("averyveryverylongtoken1", true)]
    #[case("keyword-research-guide", true)]
    #[case("keyword-research", false)]
    #[case("research", false)]
    #[case("exactlytwentyletters", false)]
    fn test_is_url_like(#[case] word: &str, #[case] expected: bool) {
        check!(is_url_like(word) == expected);
    }

    #[test]
    fn test_stop_words_are_lowercase() {
        for word in STOP_WORDS {
            check!(word.to_lowercase() == *word);
            check!(is_stop_word(word));
        }
        check!(!is_stop_word("keyword"));
    }
}
