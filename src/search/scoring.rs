//! Lexical relevance scoring.
//!
//! A URL is scored purely from exact overlap between its slug keywords and the
//! article's keyword index. There is no partial or substring matching.

use super::keywords::KeywordIndex;
use crate::types::ExcludedKeywords;

/// Points contributed per article occurrence of a matched keyword.
const POINTS_PER_OCCURRENCE: usize = 20;
/// Upper bound on what a single slug keyword can contribute.
const MAX_POINTS_PER_KEYWORD: usize = 50;
/// Upper bound on the final score.
pub const MAX_SCORE: u8 = 100;
/// Number of matched keywords named in an explanation.
const EXPLAINED_KEYWORDS: usize = 3;

pub(crate) const NO_SLUG_KEYWORDS: &str = "No identifiable keywords in URL";
pub(crate) const NO_OVERLAP: &str = "No significant keyword overlap detected.";

/// Outcome of scoring one URL's slug against an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relevance {
    pub score: u8,
    /// Matched keywords in slug order, without duplicates.
    pub matched_keywords: Vec<String>,
    pub explanation: String,
}

/// Scores slug keywords against the (already filtered) article index.
///
/// Each non-excluded slug keyword found in the index adds
/// `min(frequency * 20, 50)`; the total is capped at 100. A slug that repeats a
/// keyword earns its contribution once per repetition.
pub fn calculate_relevance(
    slug_keywords: &[String],
    article_keywords: &KeywordIndex,
    excluded: &ExcludedKeywords,
) -> Relevance {
    if slug_keywords.is_empty() {
        return Relevance {
            score: 0,
            matched_keywords: Vec::new(),
            explanation: NO_SLUG_KEYWORDS.to_string(),
        };
    }

    let mut matched_keywords: Vec<String> = Vec::new();
    let mut total = 0usize;

    for slug_word in slug_keywords {
        let word = slug_word.to_lowercase();
        if excluded.contains(&word) {
            continue;
        }
        if let Some(frequency) = article_keywords.frequency(&word) {
            total += (frequency * POINTS_PER_OCCURRENCE).min(MAX_POINTS_PER_KEYWORD);
            if !matched_keywords.contains(&word) {
                matched_keywords.push(word);
            }
        }
    }

    let score = total.min(usize::from(MAX_SCORE)) as u8;
    let explanation = if matched_keywords.is_empty() {
        NO_OVERLAP.to_string()
    } else {
        let named: Vec<&str> = matched_keywords
            .iter()
            .take(EXPLAINED_KEYWORDS)
            .map(String::as_str)
            .collect();
        format!("Matched keywords focus on: {}.", named.join(", "))
    };

    Relevance {
        score,
        matched_keywords,
        explanation,
    }
}
