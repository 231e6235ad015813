//! Embedding providers.
//!
//! The cache compares queries in embedding space, so it needs a function from
//! text to a fixed-length vector. [`EmbeddingProvider`] is that seam;
//! [`HashEmbedder`] is the deterministic default, and [`shared_embedder`]
//! exposes the process-wide instance (real providers are expensive to load,
//! so they are initialized once and reused for the process lifetime).

mod error;
mod provider;


pub use error::EmbeddingError;
pub use provider::{DEFAULT_EMBEDDING_DIM, EmbeddingProvider, HashEmbedder, shared_embedder};

#[cfg(any(test, feature = "mock"))]
pub use provider::MockEmbedder;
