//! Runtime configuration.
//!
//! Settings come from an optional TOML file, then environment overrides:
//! - `INTERLINK_CONFIG`: path of the config file (default:
//!   `<config dir>/interlink-mcp/config.toml`, ignored if missing)
//! - `INTERLINK_MAX_RESULTS`: batch-mode result limit
//! - `INTERLINK_SEMANTIC`: `true`/`false` to toggle the semantic stage

use crate::error::ConfigError;
use crate::search::DEFAULT_MAX_RESULTS;
use crate::semantic::{DEFAULT_DIMENSIONS, DEFAULT_QUERY_CACHE_SIZE};
use crate::types::AnalysisMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "INTERLINK_CONFIG";
const MAX_RESULTS_ENV: &str = "INTERLINK_MAX_RESULTS";
const SEMANTIC_ENV: &str = "INTERLINK_SEMANTIC";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Opportunities kept in batch mode when a request sets no limit.
    pub max_results: usize,
    /// Mode used when a request does not name one.
    pub default_mode: AnalysisMode,
    /// Whether to run the semantic stage after lexical scoring.
    pub semantic: bool,
    /// Vector length of the built-in hashing embedder.
    pub embedding_dimensions: usize,
    /// Number of slug-query embeddings remembered across analyses.
    pub query_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            default_mode: AnalysisMode::Batch,
            semantic: true,
            embedding_dimensions: DEFAULT_DIMENSIONS,
            query_cache_size: DEFAULT_QUERY_CACHE_SIZE,
        }
    }
}

impl Config {
    /// Parses a config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the config file (if any) and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies overrides looked up through `var`.
    pub fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = var(MAX_RESULTS_ENV) {
            self.max_results = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: MAX_RESULTS_ENV,
                value: value.clone(),
            })?;
        }
        if let Some(value) = var(SEMANTIC_ENV) {
            self.semantic = match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: SEMANTIC_ENV,
                        value,
                    });
                }
            };
        }
        Ok(())
    }
}

/// Resolves the config file location.
fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("interlink-mcp").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_results = 5\ndefault_mode = \"individual\"\n").unwrap();

        let_assert!(Ok(config) = Config::from_file(&path));
        check!(config.max_results == 5);
        check!(config.default_mode == AnalysisMode::Individual);
        check!(config.semantic);
        check!(config.embedding_dimensions == DEFAULT_DIMENSIONS);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_result = 5\n").unwrap();

        let_assert!(Err(ConfigError::Parse { .. }) = Config::from_file(&path));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let_assert!(
            Err(ConfigError::Read { .. }) = Config::from_file(&dir.path().join("absent.toml"))
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        let_assert!(
            Ok(()) = config.apply_overrides(env(&[
                ("INTERLINK_MAX_RESULTS", " 7 "),
                ("INTERLINK_SEMANTIC", "off"),
            ]))
        );
        check!(config.max_results == 7);
        check!(!config.semantic);
    }

    #[test]
    fn test_invalid_env_override() {
        let mut config = Config::default();
        let_assert!(
            Err(ConfigError::InvalidEnv { name, .. }) =
                config.apply_overrides(env(&[("INTERLINK_MAX_RESULTS", "many")]))
        );
        check!(name == "INTERLINK_MAX_RESULTS");
        check!(config.max_results == DEFAULT_MAX_RESULTS);
    }
}
