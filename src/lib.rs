//! Internal-link suggestions for article text.
//!
//! Candidate URLs are ranked by exact overlap between their slug keywords and
//! the article's keywords, then optionally boosted by semantic similarity
//! between the slug and the article's paragraphs.

pub mod config;
pub mod error;
pub mod format;
pub mod search;
pub mod semantic;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;
pub mod types;
pub mod urls;

pub use config::Config;
pub use error::{AnalysisError, ConfigError, EmbedError, Result, SemanticError};
pub use search::{analyze_internal_links, extract_keywords, extract_slug_keywords};
pub use semantic::{Embedder, SemanticEngine, cosine_similarity};
pub use server::LinkServer;
pub use state::{AnalysisRequest, LinkState, SEMANTIC_FALLBACK_NOTICE};
pub use types::{
    AnalysisMode, AnalysisReport, AnalysisResult, ExcludedKeywords, LinkOpportunity,
    ScoreCategory, SemanticMatch, score_category,
};
pub use urls::{extract_sitemap_urls, normalize_urls};
