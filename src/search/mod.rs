//! Lexical relevance ranking for internal-link suggestions.
//!
//! This module turns article text into a keyword index, turns each candidate
//! URL into slug keywords, and scores the exact overlap between the two.

pub(crate) mod analyze;
pub(crate) mod keywords;
pub(crate) mod scoring;
pub(crate) mod tokenize;

pub use analyze::{DEFAULT_MAX_RESULTS, analyze_internal_links};
pub use keywords::{KeywordIndex, extract_keywords, extract_slug_keywords};
pub use scoring::{MAX_SCORE, Relevance, calculate_relevance};
pub use tokenize::{is_stop_word, is_url_like, tokenize};
