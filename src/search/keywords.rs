//! Keyword and phrase extraction from article text and URL slugs.

use super::tokenize::{is_stop_word, is_url_like, tokenize};
use crate::types::ExcludedKeywords;
use ahash::AHashMap;

/// Unigrams must be longer than this to count as keywords.
const MIN_UNIGRAM_LENGTH: usize = 3;
/// Slug tokens must be longer than this to be considered.
const MIN_SLUG_TOKEN_LENGTH: usize = 2;
/// No token inside a phrase may be shorter than this.
const MIN_NGRAM_TOKEN_LENGTH: usize = 2;

/// Frequency map of normalized keywords and phrases found in an article.
///
/// Keys are lowercase unigrams, bigrams and trigrams (phrases joined by a single
/// space). Phrase counts are independent of the counts of their words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    counts: AHashMap<String, usize>,
}

impl KeywordIndex {
    fn add(&mut self, keyword: String) {
        *self.counts.entry(keyword).or_insert(0) += 1;
    }

    /// Occurrence count of `keyword`, if it was extracted at all.
    pub fn frequency(&self, keyword: &str) -> Option<usize> {
        self.counts.get(keyword).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns a copy of the index with every excluded keyword removed.
    pub fn without(&self, excluded: &ExcludedKeywords) -> Self {
        if excluded.is_empty() {
            return self.clone();
        }
        let counts = self
            .counts
            .iter()
            .filter(|(keyword, _)| !excluded.contains(keyword))
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        Self { counts }
    }

    /// The `limit` most frequent entries, ties broken alphabetically.
    pub fn top(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(ka, a), (kb, b)| b.cmp(a).then_with(|| ka.cmp(kb)));
        entries.truncate(limit);
        entries
    }
}

/// Checks whether a run of tokens forms a usable phrase.
///
/// The phrase may not start or end with a stop word, and none of its words may
/// be a single character or URL-like.
fn is_valid_ngram(words: &[String]) -> bool {
    let (Some(first), Some(last)) = (words.first(), words.last()) else {
        return false;
    };
    if is_stop_word(first) || is_stop_word(last) {
        return false;
    }
    if words.iter().any(|w| w.len() < MIN_NGRAM_TOKEN_LENGTH) {
        return false;
    }
    !words.iter().any(|w| is_url_like(w))
}

/// Builds the keyword index for an article: qualifying unigrams plus every
/// valid bigram and trigram.
pub fn extract_keywords(text: &str) -> KeywordIndex {
    let tokens = tokenize(text);
    let mut index = KeywordIndex::default();

    for word in &tokens {
        if word.len() > MIN_UNIGRAM_LENGTH && !is_stop_word(word) && !is_url_like(word) {
            index.add(word.clone());
        }
    }

    for n in 2..=3 {
        for window in tokens.windows(n) {
            if is_valid_ngram(window) {
                index.add(window.join(" "));
            }
        }
    }

    tracing::trace!(
        "Extracted {} distinct keywords from {} tokens",
        index.len(),
        tokens.len()
    );

    index
}

/// Removes a leading `http://host` or `https://host`.
fn strip_scheme_and_host(url: &str) -> &str {
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return url;
    };
    if rest.is_empty() || rest.starts_with('/') {
        return url;
    }
    rest.find('/').map_or("", |idx| &rest[idx..])
}

/// Strips a trailing `.ext` where `ext` is ASCII alphanumeric.
fn strip_extension(segment: &str) -> &str {
    match segment.rfind('.') {
        Some(dot) => {
            let ext = &segment[dot + 1..];
            if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                &segment[..dot]
            } else {
                segment
            }
        }
        None => segment,
    }
}

/// Extracts candidate keywords from the last path segment of a URL.
///
/// `https://example.com/blog/keyword-research_guide.html?ref=x` yields
/// `["keyword", "research", "guide"]`. Order is preserved; the result is empty
/// for root URLs or slugs made only of stop words and short tokens.
pub fn extract_slug_keywords(url: &str) -> Vec<String> {
    let path = strip_scheme_and_host(url);
    let path = path.split('?').next().unwrap_or_default();
    let path = path.split('#').next().unwrap_or_default();
    let path = path.strip_suffix('/').unwrap_or(path);

    if path.is_empty() {
        return Vec::new();
    }

    let segment = match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    };

    strip_extension(segment)
        .to_lowercase()
        .split(['-', '_'])
        .filter(|word| {
            word.chars().count() > MIN_SLUG_TOKEN_LENGTH && !is_stop_word(word) && !is_url_like(word)
        })
        .map(str::to_owned)
        .collect()
}
