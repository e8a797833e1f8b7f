//! Plain-text rendering of analysis reports for tool responses.

use crate::types::{AnalysisReport, LinkOpportunity};
use regex::{Regex, RegexBuilder};
use std::fmt::Write as _;

/// Longest chunk excerpt shown under an opportunity, in characters.
const EXCERPT_CHARS: usize = 240;

/// Renders a report as Markdown, best opportunity first.
pub fn render_report(report: &AnalysisReport) -> String {
    let result = &report.result;
    let mut output = String::new();

    if let Some(notice) = &report.notice {
        let _ = writeln!(output, "> {}\n", notice);
    }

    if result.opportunities.is_empty() {
        let _ = writeln!(
            output,
            "No link opportunities found among {} URL{}.",
            result.total_urls,
            plural(result.total_urls)
        );
        return output;
    }

    let _ = writeln!(
        output,
        "# {} link opportunit{} from {} URL{}",
        result.opportunities.len(),
        if result.opportunities.len() == 1 { "y" } else { "ies" },
        result.total_urls,
        plural(result.total_urls)
    );
    let _ = writeln!(
        output,
        "Scoring: {}",
        if report.semantic {
            "keywords + semantic similarity"
        } else {
            "keywords only"
        }
    );
    if !result.article_keywords.is_empty() {
        let _ = writeln!(output, "Matched keywords: {}", result.article_keywords.join(", "));
    }

    for (rank, opportunity) in result.opportunities.iter().enumerate() {
        output.push('\n');
        render_opportunity(&mut output, rank + 1, opportunity);
    }

    output
}

fn render_opportunity(output: &mut String, rank: usize, opportunity: &LinkOpportunity) {
    let _ = writeln!(
        output,
        "## {}. {} ({}, {})",
        rank,
        opportunity.url,
        opportunity.score,
        opportunity.category().as_str()
    );
    let _ = writeln!(output, "{}", opportunity.explanation);
    if !opportunity.matched_keywords.is_empty() {
        let _ = writeln!(output, "- matched: {}", opportunity.matched_keywords.join(", "));
    }
    let _ = writeln!(output, "- slug: {}", opportunity.slug_keywords.join(", "));

    if let Some(semantic) = &opportunity.semantic_match {
        let _ = writeln!(
            output,
            "- semantic: {}% (paragraph {})",
            semantic.score,
            semantic.chunk_index + 1
        );
        let excerpt = excerpt(&semantic.chunk_text, EXCERPT_CHARS);
        let _ = writeln!(
            output,
            "  > {}",
            highlight(&excerpt, &opportunity.slug_keywords)
        );
    }
}

/// Shortens `text` to at most `max_chars` characters, marking the cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text,
    }
}

/// Wraps whole-word, case-insensitive occurrences of `keywords` in `**`.
pub fn highlight(text: &str, keywords: &[String]) -> String {
    match keyword_pattern(keywords) {
        Some(pattern) => pattern.replace_all(text, "**$0**").into_owned(),
        None => text.to_string(),
    }
}

fn keyword_pattern(keywords: &[String]) -> Option<Regex> {
    let mut alternatives: Vec<String> = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| regex::escape(k))
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    // longest first so phrases win over their own words
    alternatives.sort_by_key(|a| std::cmp::Reverse(a.len()));
    RegexBuilder::new(&format!(r"\b(?:{})\b", alternatives.join("|")))
        .case_insensitive(true)
        .build()
        .ok()
}

const fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
