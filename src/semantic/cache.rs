//! Article chunk and embedding cache.
//!
//! The cache holds exactly one article. Any change to the article text, even a
//! single character, discards every chunk and embedding; there is no
//! incremental update.

use super::embedder::Embedder;
use crate::error::EmbedError;
use futures::future::try_join_all;
use regex::Regex;
use std::sync::LazyLock;

/// Paragraphs this short (in characters) carry too little meaning to embed.
const MIN_CHUNK_CHARS: usize = 21;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid paragraph pattern"));

/// Splits an article into trimmed paragraphs of at least 21 characters.
///
/// Paragraphs are separated by two or more consecutive `\n`.
pub fn split_chunks(article: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(article)
        .map(str::trim)
        .filter(|chunk| chunk.chars().count() >= MIN_CHUNK_CHARS)
        .map(str::to_owned)
        .collect()
}

/// Chunked article text and one embedding per chunk.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    article_content: Option<String>,
    chunks: Vec<String>,
    chunk_embeddings: Vec<Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `article` is byte-identical to the cached article.
    pub fn is_fresh(&self, article: &str) -> bool {
        self.article_content.as_deref() == Some(article)
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn chunk_embeddings(&self) -> &[Vec<f32>] {
        &self.chunk_embeddings
    }

    /// Returns chunks and embeddings for `article`, recomputing them only when
    /// the article changed.
    ///
    /// All chunks are embedded concurrently. The cache is replaced only after
    /// every embedding succeeded, so a failure (or dropping this future) leaves
    /// the previous contents in place.
    pub async fn ensure_fresh<E: Embedder>(
        &mut self,
        article: &str,
        embedder: &E,
    ) -> Result<(&[String], &[Vec<f32>]), EmbedError> {
        if self.is_fresh(article) {
            tracing::debug!("Embedding cache hit ({} chunks)", self.chunks.len());
            return Ok((&self.chunks, &self.chunk_embeddings));
        }

        let start = std::time::Instant::now();
        let chunks = split_chunks(article);
        let embeddings = try_join_all(chunks.iter().map(|chunk| embedder.embed(chunk))).await?;

        self.article_content = Some(article.to_string());
        self.chunks = chunks;
        self.chunk_embeddings = embeddings;

        tracing::info!(
            "Embedded {} article chunks in {:?}",
            self.chunks.len(),
            start.elapsed()
        );

        Ok((&self.chunks, &self.chunk_embeddings))
    }

    pub fn clear(&mut self) {
        self.article_content = None;
        self.chunks.clear();
        self.chunk_embeddings.clear();
    }
}
