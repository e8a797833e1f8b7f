//! Full analysis of an article against a list of candidate URLs.

use crate::format::render_report;
use crate::semantic::Embedder;
use crate::state::{AnalysisRequest, LinkState};
use crate::types::{AnalysisMode, ExcludedKeywords};
use crate::urls::{extract_sitemap_urls, normalize_urls};
use rmcp::schemars;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown summary
    #[default]
    Text,
    /// The serialized report
    Json,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeLinksRequest {
    /// Article text. Separate paragraphs with a blank line.
    pub article: String,
    /// Candidate URLs: one per line, comma separated, or raw sitemap XML
    pub urls: String,
    /// "batch" ranks the best URLs first and limits them; "individual" keeps input order
    #[serde(default)]
    pub mode: Option<AnalysisMode>,
    /// Maximum opportunities in batch mode (default from config, normally 20)
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Keywords to ignore. Replaces the session's excluded keywords when given.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    /// Response format (default: text)
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Defaults applied when a request leaves a field out.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeDefaults {
    pub mode: AnalysisMode,
    pub max_results: usize,
}

/// Runs sitemap extraction, URL normalization and the analysis pipeline, then
/// renders the report.
pub async fn handle_analyze_links<E: Embedder>(
    state: &LinkState<E>,
    defaults: AnalyzeDefaults,
    request: AnalyzeLinksRequest,
    cancel: &CancellationToken,
) -> Result<String, String> {
    let urls = normalize_urls(&extract_sitemap_urls(&request.urls));
    let analysis = AnalysisRequest {
        article: request.article,
        urls,
        mode: request.mode.unwrap_or(defaults.mode),
        max_results: request.max_results.unwrap_or(defaults.max_results),
    };
    tracing::info!(
        "Analyzing {} URLs ({} mode)",
        analysis.urls.len(),
        analysis.mode
    );
    let report = match request.exclude {
        Some(exclude) => {
            let excluded = exclude.iter().collect::<ExcludedKeywords>();
            state.analyze_excluding(analysis, excluded, cancel).await
        }
        None => state.analyze(analysis, cancel).await,
    }
    .map_err(|e| e.to_string())?;

    match request.format.unwrap_or_default() {
        OutputFormat::Text => Ok(render_report(&report)),
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e)),
    }
}
