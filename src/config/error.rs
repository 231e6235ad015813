//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A float-valued variable could not be parsed.
    #[error("failed to parse {var}='{value}': {source}")]
    ParseFloat {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// An integer-valued variable could not be parsed.
    #[error("failed to parse {var}='{value}': {source}")]
    ParseInt {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Similarity threshold outside (0, 1].
    #[error("invalid cache threshold {value}: must be in (0, 1]")]
    InvalidThreshold { value: f32 },

    /// Cache capacity of zero.
    #[error("invalid cache capacity {value}: must be positive")]
    InvalidCapacity { value: usize },

    /// A timeout of zero.
    #[error("timeouts must be positive")]
    InvalidTimeout,

    /// Negative cost budget.
    #[error("invalid max cost per query {value}: must be non-negative")]
    InvalidMaxCost { value: f64 },

    /// Default strategy named a strategy that does not exist.
    #[error("invalid default strategy '{value}': expected fast, balanced or comprehensive")]
    InvalidStrategy { value: String },
}
