//! Retrieval backend boundary.
//!
//! The orchestrator treats retrieval as an opaque, possibly slow, possibly
//! failing dependency: given a query and the strategy's parameters it returns
//! ranked documents and an answer. Real deployments plug in a vector-database
//! adapter here; tests use [`MockRetrievalBackend`].

mod error;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use error::RetrievalError;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockRetrievalBackend;

use async_trait::async_trait;

/// A document returned by the retrieval backend, with its full content.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedDocument {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    /// Relevance score in [0, 1], descending within a result set.
    pub score: f32,
    pub content: String,
}

/// The backend's answer to a retrieval request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResponse {
    /// Ranked documents, most relevant first.
    pub documents: Vec<RetrievedDocument>,
    /// Generated or templated answer text.
    pub answer: String,
}

/// Executes a retrieval with the parameters of a selected strategy.
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Retrieves up to `top_k` documents for `query`, optionally reranked.
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        rerank: bool,
    ) -> Result<RetrievalResponse, RetrievalError>;
}

#[async_trait]
impl<R: RetrievalBackend + ?Sized> RetrievalBackend for std::sync::Arc<R> {
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        rerank: bool,
    ) -> Result<RetrievalResponse, RetrievalError> {
        (**self).retrieve(query, top_k, rerank).await
    }
}
