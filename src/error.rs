//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for binary and configuration plumbing.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` at the process boundary. Library operations return the
/// typed errors below.
pub type Result<T> = anyhow::Result<T>;

/// Reasons an analysis request is rejected or abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The article text is empty or whitespace.
    #[error("Please paste your article content first")]
    EmptyArticle,
    /// No non-blank URL was supplied.
    #[error("Please add sitemap URLs to analyze")]
    EmptyUrls,
    /// The caller cancelled the analysis before it finished.
    #[error("Analysis was cancelled")]
    Cancelled,
    /// A re-analysis was requested before any analysis ran.
    #[error("No previous analysis to repeat; run analyze_links first")]
    NothingToRepeat,
}

/// Failure reported by an embedding model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    /// The model could not be loaded.
    #[error("failed to initialize embedding model: {0}")]
    Init(String),
    /// The model failed to embed a piece of text.
    #[error("failed to embed text: {0}")]
    Embed(String),
}

/// Failure of the semantic augmentation stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error(transparent)]
    Embedding(#[from] EmbedError),
    /// Two vectors of different dimensionality were compared.
    #[error("embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("semantic analysis was cancelled")]
    Cancelled,
}

/// Error returned when loading the configuration file fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}
