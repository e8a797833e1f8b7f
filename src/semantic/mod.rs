//! Semantic augmentation: embeddings, the article chunk cache, and score fusion.

pub(crate) mod cache;
pub(crate) mod embedder;
pub(crate) mod engine;
pub(crate) mod similarity;

pub use cache::{EmbeddingCache, split_chunks};
pub use embedder::{
    DEFAULT_DIMENSIONS, DefaultEmbedder, Embedder, HashingEmbedder, HashingLoader, LazyEmbedder,
    ModelLoader,
};
pub use engine::{
    ChunkMatch, DEFAULT_QUERY_CACHE_SIZE, STRONG_MATCH_THRESHOLD, SemanticEngine,
    apply_semantic_match, best_chunk, semantic_score,
};
pub use similarity::cosine_similarity;
