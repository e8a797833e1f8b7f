//! Excluding and re-including keywords.

use crate::format::render_report;
use crate::semantic::Embedder;
use crate::state::LinkState;
use rapidfuzz::distance::jaro_winkler;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;
use tokio_util::sync::CancellationToken;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;
const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ToggleKeywordRequest {
    /// Keyword or phrase to exclude (or include again if already excluded)
    pub keyword: String,
}

/// Article keywords closest to `keyword`, best first.
pub fn suggest_keywords(keyword: &str, vocabulary: &[String]) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = vocabulary
        .iter()
        .map(|candidate| {
            (
                jaro_winkler::similarity(keyword.chars(), candidate.chars()),
                candidate,
            )
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|(a, ka), (b, kb)| b.total_cmp(a).then_with(|| ka.cmp(kb)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, keyword)| keyword.clone())
        .collect()
}

/// Toggles the keyword and re-runs the last analysis.
pub async fn handle_toggle_keyword<E: Embedder>(
    state: &LinkState<E>,
    request: ToggleKeywordRequest,
    cancel: &CancellationToken,
) -> Result<String, String> {
    let keyword = request.keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Err("Keyword must not be empty".to_string());
    }

    let vocabulary = state.vocabulary().await;
    let known = vocabulary.contains(&keyword) || state.excluded().await.contains(&keyword);

    let (excluded, report) = state
        .toggle_keyword(&keyword, cancel)
        .await
        .map_err(|e| e.to_string())?;

    let mut output = String::new();
    if excluded {
        let _ = writeln!(output, "Excluded '{}'.", keyword);
    } else {
        let _ = writeln!(output, "'{}' is no longer excluded.", keyword);
    }
    if !known {
        let _ = write!(output, "'{}' does not appear in the article.", keyword);
        let suggestions = suggest_keywords(&keyword, &vocabulary);
        if !suggestions.is_empty() {
            let _ = write!(output, " Did you mean: {}?", suggestions.join(", "));
        }
        output.push('\n');
    }

    let excluded_now = state.excluded().await;
    if !excluded_now.is_empty() {
        let _ = writeln!(
            output,
            "Excluded keywords: {}",
            excluded_now.iter().collect::<Vec<_>>().join(", ")
        );
    }
    output.push('\n');
    output.push_str(&render_report(&report));
    Ok(output)
}
