use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the query router.
pub enum RouterError {
    /// A strategy override named a strategy that does not exist.
    #[error("unknown strategy '{name}': expected one of fast, balanced, comprehensive")]
    UnknownStrategy { name: String },
}
