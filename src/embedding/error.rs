use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by embedding providers.
pub enum EmbeddingError {
    /// The input text could not be encoded by the provider.
    #[error("invalid input for embedding: {reason}")]
    InvalidInput { reason: String },

    /// The provider (model, remote service) is not available.
    #[error("embedding provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    /// The provider produced a vector of the wrong length.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedding computation failed.
    #[error("embedding computation failed: {reason}")]
    Failed { reason: String },
}
