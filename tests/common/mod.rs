//! Shared test fixtures for integration tests.
//!
//! # Available Fixtures
//!
//! - `fake_embedder`: scripted embedder with call counting
//! - `lexical_state`: session state with the semantic stage disabled
//! - `semantic_state`: session state over a fresh `fake_embedder`
//!
//! `FakeEmbedder` maps exact texts to vectors and everything else to a
//! default vector. It can be switched to fail or to hang (for cancellation).

use interlink_mcp::semantic::Embedder;
use interlink_mcp::{AnalysisMode, AnalysisRequest, EmbedError, LinkState};
use rstest::fixture;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Article from the keyword-research scenario.
#[allow(dead_code)] // Used across different integration test crates
pub const SEO_ARTICLE: &str =
    "SEO strategy requires keyword research. Good keyword research improves SEO results.";

/// Two paragraphs, both long enough to become chunks.
#[allow(dead_code)] // Used across different integration test crates
pub const TWO_PARAGRAPHS: &str = "SEO strategy requires keyword research.\n\n\
                                  Good keyword research improves SEO results.";

#[allow(dead_code)] // Methods used across different integration test crates
#[derive(Debug)]
pub struct FakeEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
    embed_calls: AtomicUsize,
    init_calls: AtomicUsize,
    failing: AtomicBool,
    hanging: AtomicBool,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl FakeEmbedder {
    /// Every text embeds to `default` unless scripted with [`Self::with`].
    pub fn new(default: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            default,
            embed_calls: AtomicUsize::new(0),
            init_calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            hanging: AtomicBool::new(false),
        }
    }

    /// Scripts the vector returned for `text`.
    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Makes every later `embed` call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every later `embed` call wait forever.
    pub fn set_hanging(&self, hanging: bool) {
        self.hanging.store(hanging, Ordering::SeqCst);
    }
}

impl Embedder for FakeEmbedder {
    async fn init(&self) -> Result<(), EmbedError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.hanging.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbedError::Embed("model unavailable".to_string()));
        }
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }
}

/// Builds a batch-mode request over `urls`.
#[allow(dead_code)] // Used across different integration test crates
pub fn request(article: &str, urls: &[&str]) -> AnalysisRequest {
    AnalysisRequest {
        article: article.to_string(),
        urls: urls.iter().map(|u| (*u).to_string()).collect(),
        mode: AnalysisMode::Batch,
        max_results: 20,
    }
}

#[allow(dead_code)] // Used across different integration test crates
#[fixture]
pub fn fake_embedder() -> Arc<FakeEmbedder> {
    Arc::new(FakeEmbedder::new(vec![1.0, 0.0]))
}

#[allow(dead_code)] // Used across different integration test crates
#[fixture]
pub fn lexical_state() -> LinkState<FakeEmbedder> {
    LinkState::new(Arc::new(FakeEmbedder::new(vec![1.0, 0.0])), false, 16)
}

#[allow(dead_code)] // Used across different integration test crates
#[fixture]
pub fn semantic_state(fake_embedder: Arc<FakeEmbedder>) -> (Arc<FakeEmbedder>, LinkState<FakeEmbedder>) {
    let state = LinkState::new(fake_embedder.clone(), true, 16);
    (fake_embedder, state)
}
