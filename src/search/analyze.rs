//! Lexical analysis across a list of candidate URLs.

use super::keywords::{extract_keywords, extract_slug_keywords};
use super::scoring::calculate_relevance;
use crate::types::{AnalysisMode, AnalysisResult, ExcludedKeywords, LinkOpportunity};
use std::collections::BTreeSet;

/// Default number of opportunities kept in batch mode.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Scores every URL against the article and ranks the relevant ones.
///
/// Blank URL lines are ignored (and not counted). Only opportunities with at
/// least one matched keyword and a positive score are returned:
/// - `Batch`: sorted by score descending, ties kept in input order, truncated
///   to `max_results`
/// - `Individual`: input order, no truncation
///
/// `article_keywords` collects every keyword that matched some URL, before the
/// relevance filter is applied.
pub fn analyze_internal_links<S: AsRef<str>>(
    article: &str,
    urls: &[S],
    mode: AnalysisMode,
    max_results: usize,
    excluded: &ExcludedKeywords,
) -> AnalysisResult {
    let start = std::time::Instant::now();
    let article_keywords = extract_keywords(article).without(excluded);

    let mut matched_vocabulary: BTreeSet<String> = BTreeSet::new();
    let opportunities: Vec<LinkOpportunity> = urls
        .iter()
        .map(|url| url.as_ref().trim())
        .filter(|url| !url.is_empty())
        .map(|url| {
            let slug_keywords = extract_slug_keywords(url);
            let relevance = calculate_relevance(&slug_keywords, &article_keywords, excluded);
            matched_vocabulary.extend(relevance.matched_keywords.iter().cloned());

            LinkOpportunity {
                url: url.to_string(),
                score: relevance.score,
                matched_keywords: relevance.matched_keywords,
                slug_keywords,
                explanation: relevance.explanation,
                semantic_score: None,
                semantic_match: None,
            }
        })
        .collect();

    let total_urls = opportunities.len();

    let mut relevant: Vec<LinkOpportunity> = opportunities
        .into_iter()
        .filter(|o| !o.matched_keywords.is_empty() && o.score > 0)
        .collect();

    if mode == AnalysisMode::Batch {
        // sort_by is stable, so equal scores keep input order
        relevant.sort_by(|a, b| b.score.cmp(&a.score));
        relevant.truncate(max_results);
    }

    tracing::debug!(
        "Lexical analysis ({}): {} of {} URLs relevant, {} article keywords, {} matched terms in {:?}",
        mode,
        relevant.len(),
        total_urls,
        article_keywords.len(),
        matched_vocabulary.len(),
        start.elapsed()
    );

    AnalysisResult {
        opportunities: relevant,
        article_keywords: matched_vocabulary.into_iter().collect(),
        total_urls,
    }
}
