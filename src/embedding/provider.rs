use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::debug;

use super::error::EmbeddingError;

/// Default output dimension for [`HashEmbedder`].
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Maps text to a fixed-length vector for similarity comparison.
///
/// Implementations must be stateless per call: the same text always yields
/// the same vector, and `embed` may run concurrently from multiple tasks.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `text` into a vector of length [`dimension`](Self::dimension).
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Output vector length, fixed for the provider's lifetime.
    fn dimension(&self) -> usize;
}

/// Deterministic hash-seeded embedder.
///
/// Seeds an LCG from a hash of the input text and emits an L2-normalized
/// vector. No model files, no I/O, identical output across calls and across
/// process restarts. Exact repeats of a query embed to the same vector
/// (cosine similarity 1.0), which is what the semantic cache needs to behave
/// sensibly without a real model loaded.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Creates an embedder with the default dimension.
    pub fn new() -> Self {
        Self::with_dimension(DEFAULT_EMBEDDING_DIM)
    }

    /// Creates an embedder with a specific output dimension.
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        let mut state = seed;

        for _ in 0..self.dimension {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        normalize(&mut embedding);
        embedding
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(text_len = text.len(), "Generating hash embedding");
        Ok(self.embed_text(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn normalize(embedding: &mut [f32]) {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in embedding {
            *x /= norm;
        }
    }
}

static SHARED_EMBEDDER: OnceLock<Arc<HashEmbedder>> = OnceLock::new();

/// Returns the process-wide [`HashEmbedder`] instance.
///
/// Initialized exactly once on first call; concurrent first callers all
/// observe the same instance.
pub fn shared_embedder() -> Arc<HashEmbedder> {
    SHARED_EMBEDDER
        .get_or_init(|| Arc::new(HashEmbedder::new()))
        .clone()
}

/// Programmable embedder for tests.
///
/// Returns preset vectors for registered texts (so tests can construct exact
/// cosine similarities), falls back to [`HashEmbedder`] for everything else,
/// and can be switched into failing or slow modes to exercise degraded paths.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug)]
pub struct MockEmbedder {
    fixtures: parking_lot::Mutex<std::collections::HashMap<String, Vec<f32>>>,
    fallback: HashEmbedder,
    fail: std::sync::atomic::AtomicBool,
    delay_ms: std::sync::atomic::AtomicU64,
}

#[cfg(any(test, feature = "mock"))]
impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            fixtures: parking_lot::Mutex::new(std::collections::HashMap::new()),
            fallback: HashEmbedder::with_dimension(dimension),
            fail: std::sync::atomic::AtomicBool::new(false),
            delay_ms: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Registers a fixed vector for `text`.
    pub fn set_embedding(&self, text: &str, vector: Vec<f32>) {
        self.fixtures.lock().insert(text.to_string(), vector);
    }

    /// Makes every subsequent `embed` call fail.
    pub fn fail_on_embed(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Delays every subsequent `embed` call (for timeout tests).
    pub fn set_delay(&self, delay: std::time::Duration) {
        self.delay_ms
            .store(delay.as_millis() as u64, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let delay = self.delay_ms.load(std::sync::atomic::Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }

        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(EmbeddingError::ProviderUnavailable {
                reason: "mock embedder set to fail".to_string(),
            });
        }

        if let Some(vector) = self.fixtures.lock().get(text) {
            return Ok(vector.clone());
        }

        self.fallback.embed(text).await
    }

    fn dimension(&self) -> usize {
        self.fallback.dimension()
    }
}
