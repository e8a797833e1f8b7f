use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How analysis results are ordered and truncated.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Every relevant URL, in input order.
    Individual,
    /// The best-scoring URLs first, truncated to the result limit.
    #[default]
    Batch,
}

impl AnalysisMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "batch" => Ok(Self::Batch),
            other => Err(format!(
                "unknown analysis mode '{}' (expected 'individual' or 'batch')",
                other
            )),
        }
    }
}

/// Coarse bucket for displaying a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCategory {
    High,
    Medium,
    Low,
}

impl ScoreCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Categorizes a 0-100 score: `high` from 75, `medium` from 45, else `low`.
pub const fn score_category(score: u8) -> ScoreCategory {
    if score >= 75 {
        ScoreCategory::High
    } else if score >= 45 {
        ScoreCategory::Medium
    } else {
        ScoreCategory::Low
    }
}

/// User-controlled set of keywords that must never be matched.
///
/// Entries are stored lowercase; lookups are expected to use lowercase input,
/// which every extracted keyword already is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExcludedKeywords(BTreeSet<String>);

impl ExcludedKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains(keyword)
    }

    /// Adds `keyword`. Returns false if it was already excluded.
    pub fn insert(&mut self, keyword: &str) -> bool {
        self.0.insert(keyword.trim().to_lowercase())
    }

    pub fn remove(&mut self, keyword: &str) -> bool {
        self.0.remove(&keyword.trim().to_lowercase())
    }

    /// Flips the exclusion state of `keyword`. Returns true if it is now excluded.
    pub fn toggle(&mut self, keyword: &str) -> bool {
        if self.remove(keyword) {
            false
        } else {
            self.insert(keyword)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExcludedKeywords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for keyword in iter {
            let keyword = keyword.as_ref();
            if !keyword.trim().is_empty() {
                set.insert(keyword);
            }
        }
        set
    }
}

/// The article chunk that best matched a URL's slug semantically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticMatch {
    pub score: u8,
    pub chunk_text: String,
    pub chunk_index: usize,
}

/// One scored URL candidate for internal linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOpportunity {
    pub url: String,
    /// Relevance in `0..=100`.
    pub score: u8,
    pub matched_keywords: Vec<String>,
    pub slug_keywords: Vec<String>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_match: Option<SemanticMatch>,
}

impl LinkOpportunity {
    pub const fn category(&self) -> ScoreCategory {
        score_category(self.score)
    }
}

/// Ranked link opportunities for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub opportunities: Vec<LinkOpportunity>,
    /// Sorted, distinct keywords that matched at least one URL.
    pub article_keywords: Vec<String>,
    /// Non-blank input URLs, counted before relevance filtering.
    pub total_urls: usize,
}

/// An analysis result plus an optional non-fatal notice for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    /// True when the semantic stage ran and its scores are included.
    pub semantic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[rstest]
    #[case(100, ScoreCategory::High)]
    #[case(75, ScoreCategory::High)]
    #[case(74, ScoreCategory::Medium)]
    #[case(45, ScoreCategory::Medium)]
    #[case(44, ScoreCategory::Low)]
    #[case(0, ScoreCategory::Low)]
    fn test_score_category(#[case] score: u8, #[case] expected: ScoreCategory) {
        check!(score_category(score) == expected);
    }

    #[rstest]
    #[case("batch", AnalysisMode::Batch)]
    #[case(" Individual ", AnalysisMode::Individual)]
    fn test_mode_parsing(#[case] input: &str, #[case] expected: AnalysisMode) {
        let_assert!(Ok(mode) = input.parse::<AnalysisMode>());
        check!(mode == expected);
    }

    #[test]
    fn test_mode_parsing_rejects_unknown() {
        let_assert!(Err(message) = "streaming".parse::<AnalysisMode>());
        check!(message.contains("streaming"));
    }

    #[test]
    fn test_excluded_keywords_lowercase_and_toggle() {
        let mut excluded = ExcludedKeywords::from_iter(["SEO", " Research ", ""]);
        check!(excluded.len() == 2);
        check!(excluded.contains("seo"));
        check!(excluded.contains("research"));

        check!(!excluded.toggle("Research"));
        check!(!excluded.contains("research"));
        check!(excluded.toggle("guide"));
        check!(excluded.iter().collect::<Vec<_>>() == ["guide", "seo"]);
    }

    #[test]
    fn test_opportunity_serialization_skips_missing_semantics() {
        let opportunity = LinkOpportunity {
            url: "/seo/guide".to_string(),
            score: 40,
            matched_keywords: vec!["guide".to_string()],
            slug_keywords: vec!["guide".to_string()],
            explanation: "Matched keywords focus on: guide.".to_string(),
            semantic_score: None,
            semantic_match: None,
        };
        let json = serde_json::to_value(&opportunity).unwrap();
        check!(json.get("semantic_score").is_none());
        check!(json["score"] == 40);
    }
}
