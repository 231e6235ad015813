use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by retrieval backends.
pub enum RetrievalError {
    /// The backend reported a failure executing the retrieval.
    #[error("retrieval backend failed: {message}")]
    Backend { message: String },

    /// The backend could not be reached.
    #[error("retrieval backend unavailable: {message}")]
    Unavailable { message: String },
}
