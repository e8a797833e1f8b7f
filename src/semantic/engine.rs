//! Semantic augmentation of lexical link opportunities.
//!
//! Each opportunity's slug keywords are embedded as a query and compared with
//! every cached article chunk. The best similarity becomes the semantic score,
//! which can only raise the lexical score, never lower it.

use super::cache::EmbeddingCache;
use super::embedder::Embedder;
use super::similarity::cosine_similarity;
use crate::error::SemanticError;
use crate::search::MAX_SCORE;
use crate::types::{LinkOpportunity, SemanticMatch};
use ahash::AHashMap;
use futures::future::try_join_all;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Similarity above which the explanation reports a strong semantic match.
pub const STRONG_MATCH_THRESHOLD: f64 = 0.6;

/// Default number of query embeddings kept between analyses.
pub const DEFAULT_QUERY_CACHE_SIZE: usize = 256;

/// The most similar chunk for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkMatch {
    pub similarity: f64,
    pub index: usize,
}

/// Finds the chunk most similar to `query`. The first chunk wins ties.
///
/// Returns `None` when there are no chunks.
pub fn best_chunk(
    query: &[f32],
    chunk_embeddings: &[Vec<f32>],
) -> Result<Option<ChunkMatch>, SemanticError> {
    let mut best: Option<ChunkMatch> = None;
    for (index, embedding) in chunk_embeddings.iter().enumerate() {
        let similarity = cosine_similarity(query, embedding)?;
        if best.is_none_or(|b| similarity > b.similarity) {
            best = Some(ChunkMatch { similarity, index });
        }
    }
    Ok(best)
}

/// Converts a similarity into a 0-100 score.
pub fn semantic_score(similarity: f64) -> u8 {
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Fuses a semantic match into a lexical opportunity.
///
/// - `score` becomes `min(max(lexical, semantic), 100)`
/// - `semantic_match` records the best chunk, if any chunk exists
/// - the explanation is replaced only when similarity exceeds 0.6
pub fn apply_semantic_match(
    mut opportunity: LinkOpportunity,
    best: Option<ChunkMatch>,
    chunks: &[String],
) -> LinkOpportunity {
    let max_similarity = best.map_or(0.0, |b| b.similarity);
    let score = semantic_score(max_similarity);

    opportunity.semantic_score = Some(score);
    opportunity.semantic_match = best.and_then(|b| {
        chunks.get(b.index).map(|chunk| SemanticMatch {
            score,
            chunk_text: chunk.clone(),
            chunk_index: b.index,
        })
    });
    opportunity.score = opportunity.score.max(score).min(MAX_SCORE);
    if max_similarity > STRONG_MATCH_THRESHOLD {
        opportunity.explanation = format!("Strong semantic match ({}%) found in content.", score);
    }

    opportunity
}

/// Runs the semantic stage against a cached, chunked article.
///
/// The chunk cache is locked for the whole stage, so concurrent augmentations
/// run one after another.
pub struct SemanticEngine<E: Embedder> {
    embedder: Arc<E>,
    cache: Mutex<EmbeddingCache>,
    queries: Mutex<LruCache<String, Arc<Vec<f32>>>>,
}

impl<E: Embedder> std::fmt::Debug for SemanticEngine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticEngine").finish_non_exhaustive()
    }
}

impl<E: Embedder> SemanticEngine<E> {
    pub fn new(embedder: Arc<E>, query_cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(query_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            embedder,
            cache: Mutex::new(EmbeddingCache::new()),
            queries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Drops cached chunks, chunk embeddings and query embeddings.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
        self.queries.lock().await.clear();
    }

    /// True if the chunk cache currently holds `article`.
    pub async fn is_cached(&self, article: &str) -> bool {
        self.cache.lock().await.is_fresh(article)
    }

    /// Augments `opportunities` with semantic scores and re-sorts them by score,
    /// best first.
    ///
    /// Cancelling `cancel` abandons the stage with [`SemanticError::Cancelled`];
    /// the chunk cache is only updated once all chunk embeddings succeeded.
    pub async fn augment(
        &self,
        article: &str,
        opportunities: Vec<LinkOpportunity>,
        cancel: &CancellationToken,
    ) -> Result<Vec<LinkOpportunity>, SemanticError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SemanticError::Cancelled),
            result = self.augment_uncancelled(article, opportunities) => result,
        }
    }

    async fn augment_uncancelled(
        &self,
        article: &str,
        opportunities: Vec<LinkOpportunity>,
    ) -> Result<Vec<LinkOpportunity>, SemanticError> {
        let start = std::time::Instant::now();
        self.embedder.init().await?;

        let mut cache = self.cache.lock().await;
        let (chunks, chunk_embeddings) = cache.ensure_fresh(article, self.embedder.as_ref()).await?;

        let query_embeddings = self.embed_queries(&opportunities).await?;

        let mut augmented = Vec::with_capacity(opportunities.len());
        for opportunity in opportunities {
            let query = opportunity.slug_keywords.join(" ");
            let Some(query_embedding) = query_embeddings.get(&query) else {
                augmented.push(opportunity);
                continue;
            };
            let best = best_chunk(query_embedding, chunk_embeddings)?;
            augmented.push(apply_semantic_match(opportunity, best, chunks));
        }

        augmented.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            "Semantic stage: {} opportunities against {} chunks in {:?}",
            augmented.len(),
            chunks.len(),
            start.elapsed()
        );

        Ok(augmented)
    }

    /// Embeds the distinct non-empty slug queries, reusing remembered ones.
    async fn embed_queries(
        &self,
        opportunities: &[LinkOpportunity],
    ) -> Result<AHashMap<String, Arc<Vec<f32>>>, SemanticError> {
        let mut embeddings: AHashMap<String, Arc<Vec<f32>>> = AHashMap::new();
        let mut missing: Vec<String> = Vec::new();

        {
            let mut remembered = self.queries.lock().await;
            for opportunity in opportunities {
                let query = opportunity.slug_keywords.join(" ");
                if query.is_empty() || embeddings.contains_key(&query) || missing.contains(&query)
                {
                    continue;
                }
                match remembered.get(&query) {
                    Some(embedding) => {
                        embeddings.insert(query, embedding.clone());
                    }
                    None => missing.push(query),
                }
            }
        }

        if missing.is_empty() {
            return Ok(embeddings);
        }

        let fresh =
            try_join_all(missing.iter().map(|query| self.embedder.embed(query))).await?;

        let mut remembered = self.queries.lock().await;
        for (query, embedding) in missing.into_iter().zip(fresh) {
            let embedding = Arc::new(embedding);
            remembered.put(query.clone(), embedding.clone());
            embeddings.insert(query, embedding);
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    fn opportunity(score: u8, slug: &[&str]) -> LinkOpportunity {
        LinkOpportunity {
            url: format!("/{}", slug.join("-")),
            score,
            matched_keywords: Vec::new(),
            slug_keywords: slug.iter().map(|s| (*s).to_string()).collect(),
            explanation: "Matched keywords focus on: keyword.".to_string(),
            semantic_score: None,
            semantic_match: None,
        }
    }

    #[rstest]
    #[case(0.75, 75)]
    #[case(0.756, 76)]
    #[case(1.0, 100)]
    #[case(0.0, 0)]
    #[case(-0.4, 0)]
    fn test_semantic_score(#[case] similarity: f64, #[case] expected: u8) {
        check!(semantic_score(similarity) == expected);
    }

    #[test]
    fn test_strong_match_raises_score_and_explains() {
        let chunks = vec!["chunk zero".to_string(), "chunk one".to_string()];
        let best = Some(ChunkMatch {
            similarity: 0.75,
            index: 1,
        });
        let fused = apply_semantic_match(opportunity(40, &["keyword"]), best, &chunks);
        check!(fused.score == 75);
        check!(fused.semantic_score == Some(75));
        check!(fused.explanation == "Strong semantic match (75%) found in content.");
        let_assert!(Some(semantic) = fused.semantic_match);
        check!(semantic.chunk_index == 1);
        check!(semantic.chunk_text == "chunk one");
        check!(semantic.score == 75);
    }

    #[test]
    fn test_weak_match_never_lowers_score() {
        let chunks = vec!["only chunk".to_string()];
        let best = Some(ChunkMatch {
            similarity: 0.3,
            index: 0,
        });
        let fused = apply_semantic_match(opportunity(80, &["keyword"]), best, &chunks);
        check!(fused.score == 80);
        check!(fused.semantic_score == Some(30));
        check!(fused.explanation == "Matched keywords focus on: keyword.");
        check!(fused.semantic_match.is_some());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let chunks = vec!["only chunk".to_string()];
        let best = Some(ChunkMatch {
            similarity: 0.6,
            index: 0,
        });
        let fused = apply_semantic_match(opportunity(10, &["keyword"]), best, &chunks);
        check!(fused.score == 60);
        check!(fused.explanation == "Matched keywords focus on: keyword.");
    }

    #[test]
    fn test_no_chunks_means_no_match() {
        let fused = apply_semantic_match(opportunity(40, &["keyword"]), None, &[]);
        check!(fused.score == 40);
        check!(fused.semantic_score == Some(0));
        check!(fused.semantic_match.is_none());
    }

    #[test]
    fn test_best_chunk_prefers_first_on_ties() {
        let chunks = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]];
        let_assert!(Ok(Some(best)) = best_chunk(&[1.0, 0.0], &chunks));
        check!(best.index == 0);
        check!((best.similarity - 1.0).abs() < 1e-9);
        check!(best_chunk(&[1.0, 0.0], &[]) == Ok(None));
    }

    #[test]
    fn test_best_chunk_keeps_negative_similarity() {
        let chunks = vec![vec![-1.0, 0.0], vec![-1.0, -1.0]];
        let_assert!(Ok(Some(best)) = best_chunk(&[1.0, 0.0], &chunks));
        check!(best.index == 1);
        check!(best.similarity < 0.0);
    }
}
