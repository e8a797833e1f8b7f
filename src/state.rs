//! Session state shared by all tool calls.
//!
//! Holds the user's excluded keywords, the last analysis request (so a keyword
//! toggle can re-run it), the last report, and the semantic engine with its
//! embedding cache.

use crate::config::Config;
use crate::error::{AnalysisError, SemanticError};
use crate::search::{analyze_internal_links, extract_keywords};
use crate::semantic::{Embedder, SemanticEngine};
use crate::types::{AnalysisMode, AnalysisReport, AnalysisResult, ExcludedKeywords};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Shown when the semantic stage fails and lexical scores are used instead.
pub const SEMANTIC_FALLBACK_NOTICE: &str =
    "Semantic analysis failed; falling back to keyword-based matching.";

/// Inputs of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub article: String,
    pub urls: Vec<String>,
    pub mode: AnalysisMode,
    pub max_results: usize,
}

impl AnalysisRequest {
    /// Rejects an empty article or a URL list without a single non-blank entry.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.article.trim().is_empty() {
            return Err(AnalysisError::EmptyArticle);
        }
        if self.urls.iter().all(|url| url.trim().is_empty()) {
            return Err(AnalysisError::EmptyUrls);
        }
        Ok(())
    }
}

pub struct LinkState<E: Embedder> {
    /// Semantic stage and its article cache
    engine: SemanticEngine<E>,

    /// Whether the semantic stage runs at all
    semantic_enabled: bool,

    /// Keywords the user asked to ignore
    excluded: RwLock<ExcludedKeywords>,

    /// Most recent accepted request
    last_request: RwLock<Option<AnalysisRequest>>,

    /// Report produced for `last_request`
    last_report: RwLock<Option<AnalysisReport>>,
}

impl<E: Embedder> std::fmt::Debug for LinkState<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkState")
            .field("semantic_enabled", &self.semantic_enabled)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl<E: Embedder> LinkState<E> {
    pub fn new(embedder: Arc<E>, semantic_enabled: bool, query_cache_size: usize) -> Self {
        Self {
            engine: SemanticEngine::new(embedder, query_cache_size),
            semantic_enabled,
            excluded: RwLock::new(ExcludedKeywords::new()),
            last_request: RwLock::new(None),
            last_report: RwLock::new(None),
        }
    }

    pub fn from_config(embedder: Arc<E>, config: &Config) -> Self {
        Self::new(embedder, config.semantic, config.query_cache_size)
    }

    pub const fn engine(&self) -> &SemanticEngine<E> {
        &self.engine
    }

    pub const fn semantic_enabled(&self) -> bool {
        self.semantic_enabled
    }

    pub async fn excluded(&self) -> ExcludedKeywords {
        self.excluded.read().await.clone()
    }

    pub async fn last_request(&self) -> Option<AnalysisRequest> {
        self.last_request.read().await.clone()
    }

    pub async fn last_report(&self) -> Option<AnalysisReport> {
        self.last_report.read().await.clone()
    }

    /// Every keyword extracted from the last analyzed article, most frequent
    /// first. Empty before the first analysis.
    pub async fn vocabulary(&self) -> Vec<String> {
        let Some(request) = self.last_request.read().await.clone() else {
            return Vec::new();
        };
        let index = extract_keywords(&request.article);
        index
            .top(index.len())
            .into_iter()
            .map(|(keyword, _)| keyword.to_string())
            .collect()
    }

    /// Validates and analyzes `request`, then remembers it for re-runs.
    ///
    /// An empty article or URL list is rejected before any state changes. A
    /// failed semantic stage degrades to the lexical result with
    /// [`SEMANTIC_FALLBACK_NOTICE`]; cancellation is reported as an error and
    /// leaves the previous request and report in place.
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        let excluded = self.excluded().await;
        self.analyze_excluding(request, excluded, cancel).await
    }

    /// Like [`Self::analyze`], but with `excluded` in place of the session's
    /// excluded keywords. The set is stored only if the analysis succeeds.
    pub async fn analyze_excluding(
        &self,
        request: AnalysisRequest,
        excluded: ExcludedKeywords,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        request.validate()?;

        let report = self.run(&request, &excluded, cancel).await?;

        *self.excluded.write().await = excluded;
        *self.last_request.write().await = Some(request);
        *self.last_report.write().await = Some(report.clone());
        Ok(report)
    }

    /// Flips `keyword` in the excluded set and re-runs the last request.
    ///
    /// Returns whether the keyword is now excluded, with the new report. The
    /// flip is kept only if the re-run succeeds.
    pub async fn toggle_keyword(
        &self,
        keyword: &str,
        cancel: &CancellationToken,
    ) -> Result<(bool, AnalysisReport), AnalysisError> {
        let request = self
            .last_request()
            .await
            .ok_or(AnalysisError::NothingToRepeat)?;

        let mut excluded = self.excluded().await;
        let now_excluded = excluded.toggle(keyword);
        tracing::debug!(
            "Keyword '{}' is now {}",
            keyword,
            if now_excluded { "excluded" } else { "included" }
        );

        let report = self.analyze_excluding(request, excluded, cancel).await?;
        Ok((now_excluded, report))
    }

    /// Forgets the request, report, exclusions and every cached embedding.
    pub async fn reset(&self) {
        *self.last_request.write().await = None;
        *self.last_report.write().await = None;
        self.excluded.write().await.clear();
        self.engine.clear().await;
        tracing::info!("Session state reset");
    }

    async fn run(
        &self,
        request: &AnalysisRequest,
        excluded: &ExcludedKeywords,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        let lexical = analyze_internal_links(
            &request.article,
            &request.urls,
            request.mode,
            request.max_results,
            excluded,
        );

        if !self.semantic_enabled {
            return Ok(AnalysisReport {
                result: lexical,
                semantic: false,
                notice: None,
            });
        }

        match self
            .engine
            .augment(&request.article, lexical.opportunities.clone(), cancel)
            .await
        {
            Ok(opportunities) => Ok(AnalysisReport {
                result: AnalysisResult {
                    opportunities,
                    ..lexical
                },
                semantic: true,
                notice: None,
            }),
            Err(SemanticError::Cancelled) => Err(AnalysisError::Cancelled),
            Err(e) => {
                tracing::warn!("Semantic analysis failed, using keyword scores only: {}", e);
                Ok(AnalysisReport {
                    result: lexical,
                    semantic: false,
                    notice: Some(SEMANTIC_FALLBACK_NOTICE.to_string()),
                })
            }
        }
    }
}
