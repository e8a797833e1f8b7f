//! Embedding model abstraction and the built-in hashing model.

use crate::error::EmbedError;
use crate::search::tokenize;
use std::future::Future;
use tokio::sync::OnceCell;
use xxhash_rust::xxh3::xxh3_64;

/// Default dimensionality of the hashing embedder.
pub const DEFAULT_DIMENSIONS: usize = 384;

/// A text → vector embedding service.
///
/// `init` must be idempotent; `embed` may be called concurrently and is
/// expected to initialize lazily if `init` was never awaited.
pub trait Embedder: Send + Sync {
    /// Prepares the model. Calls after the first successful one are no-ops.
    fn init(&self) -> impl Future<Output = Result<(), EmbedError>> + Send;

    /// Embeds `text` into a vector. Vectors from one embedder share a length.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, EmbedError>> + Send;
}

/// Produces a ready-to-use model, possibly at great expense.
pub trait ModelLoader: Send + Sync {
    type Model: Embedder;

    fn load(&self) -> impl Future<Output = Result<Self::Model, EmbedError>> + Send;
}

/// Embedder that loads its model on first use and reuses it afterwards.
///
/// Concurrent first callers wait on the same load; a failed load is retried by
/// the next caller.
pub struct LazyEmbedder<L: ModelLoader> {
    loader: L,
    model: OnceCell<L::Model>,
}

impl<L: ModelLoader> std::fmt::Debug for LazyEmbedder<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyEmbedder")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl<L: ModelLoader> LazyEmbedder<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
        }
    }

    /// Returns true once the model has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.model.initialized()
    }

    async fn model(&self) -> Result<&L::Model, EmbedError> {
        self.model
            .get_or_try_init(|| async {
                let start = std::time::Instant::now();
                let model = self.loader.load().await?;
                model.init().await?;
                tracing::info!("Embedding model initialized in {:?}", start.elapsed());
                Ok::<_, EmbedError>(model)
            })
            .await
    }
}

impl<L: ModelLoader> Embedder for LazyEmbedder<L> {
    async fn init(&self) -> Result<(), EmbedError> {
        self.model().await.map(|_| ())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.model().await?.embed(text).await
    }
}

/// Deterministic bag-of-words embedder using signed feature hashing.
///
/// Each normalized token is hashed with xxh3 into one of `dimensions` buckets;
/// the top bit of the hash picks the sign. The vector is L2-normalized, so
/// texts sharing vocabulary have positive cosine similarity. Text without any
/// tokens embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokenize(text) {
            let hash = xxh3_64(token.as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl Embedder for HashingEmbedder {
    async fn init(&self) -> Result<(), EmbedError> {
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.embed_sync(text))
    }
}

/// Loader for [`HashingEmbedder`].
#[derive(Debug, Clone)]
pub struct HashingLoader {
    pub dimensions: usize,
}

impl ModelLoader for HashingLoader {
    type Model = HashingEmbedder;

    async fn load(&self) -> Result<HashingEmbedder, EmbedError> {
        if self.dimensions == 0 {
            return Err(EmbedError::Init(
                "embedding dimensions must be positive".to_string(),
            ));
        }
        Ok(HashingEmbedder::new(self.dimensions))
    }
}

/// The embedder used by the binary.
pub type DefaultEmbedder = LazyEmbedder<HashingLoader>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::cosine_similarity;
    use assert2::{check, let_assert};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    struct CountingLoader {
        loads: Arc<AtomicUsize>,
    }

    impl ModelLoader for CountingLoader {
        type Model = HashingEmbedder;

        async fn load(&self) -> Result<HashingEmbedder, EmbedError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(HashingEmbedder::new(16))
        }
    }

    #[tokio::test]
    async fn test_lazy_embedder_loads_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let embedder = LazyEmbedder::new(CountingLoader {
            loads: loads.clone(),
        });
        check!(!embedder.is_initialized());

        let (a, b) = tokio::join!(embedder.embed("first call"), embedder.embed("second call"));
        check!(a.is_ok());
        check!(b.is_ok());
        embedder.init().await.unwrap();
        embedder.init().await.unwrap();

        check!(embedder.is_initialized());
        check!(loads.load(Ordering::SeqCst) == 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_reported() {
        let embedder = LazyEmbedder::new(HashingLoader { dimensions: 0 });
        let_assert!(Err(EmbedError::Init(_)) = embedder.embed("text").await);
        check!(!embedder.is_initialized());
    }

    #[tokio::test]
    async fn test_hashing_embedder_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64);
        let a = embedder.embed("keyword research guide").await.unwrap();
        let b = embedder.embed("Keyword research, guide!").await.unwrap();
        check!(a == b);
        check!(a.len() == 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        check!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_hashing_embedder_similarity_tracks_overlap() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed("keyword research").await.unwrap();
        let related = embedder
            .embed("Good keyword research starts with a list of seed terms.")
            .await
            .unwrap();
        let unrelated = embedder
            .embed("Bake the bread at two hundred degrees for forty minutes.")
            .await
            .unwrap();

        let close = cosine_similarity(&query, &related).unwrap();
        let far = cosine_similarity(&query, &unrelated).unwrap();
        check!(close > far);
        check!(close > 0.0);
    }

    #[tokio::test]
    async fn test_hashing_embedder_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8);
        let vector = embedder.embed("!!!").await.unwrap();
        check!(vector.iter().all(|x| *x == 0.0));
    }
}
