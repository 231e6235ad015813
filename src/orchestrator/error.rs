use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::retrieval::RetrievalError;
use crate::router::{RouterError, StrategyName};

#[derive(Debug, Error)]
/// Errors surfaced to the orchestrator's caller.
pub enum OrchestratorError {
    /// The caller supplied an invalid strategy override.
    #[error(transparent)]
    UnknownStrategy(#[from] RouterError),

    /// The retrieval backend failed; the query and attempted strategy are
    /// attached for diagnostics. No degraded answer is fabricated.
    #[error("retrieval failed for query '{query}' with strategy '{strategy}': {source}")]
    RetrievalFailed {
        query: String,
        strategy: StrategyName,
        #[source]
        source: RetrievalError,
    },

    /// An external call exceeded its configured bound. Distinct from plain
    /// failure so callers can choose to retry.
    #[error("{operation} timed out after {elapsed_ms}ms")]
    Timeout {
        operation: &'static str,
        elapsed_ms: u64,
    },

    /// Embedding failed outside the recoverable probe/insert paths.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
