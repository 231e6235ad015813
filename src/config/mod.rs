//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `MAESTRO_*` environment
//! variables, then convert into an
//! [`OrchestratorConfig`](crate::orchestrator::OrchestratorConfig).

mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_SIMILARITY_THRESHOLD};
use crate::orchestrator::{
    DEFAULT_EMBEDDING_TIMEOUT, DEFAULT_RETRIEVAL_TIMEOUT, OrchestratorConfig,
};
use crate::router::{DEFAULT_CLASSIFICATION_CACHE_CAPACITY, StrategyName};

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `MAESTRO_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cosine similarity threshold for cache hits. Default: `0.88`.
    pub cache_threshold: f32,

    /// Max entries in the semantic cache. Default: `1000`.
    pub cache_capacity: usize,

    /// Responses below this confidence are not cached. Default: `0.0`.
    pub min_confidence_to_cache: f32,

    /// Strategy applied to every query unless overridden per call.
    pub default_strategy: Option<StrategyName>,

    /// Per-query cost budget. Default: none.
    pub max_cost_per_query: Option<f64>,

    /// Bound on a single retrieval call. Default: `10s`.
    pub retrieval_timeout: Duration,

    /// Bound on a single embedding call. Default: `5s`.
    pub embedding_timeout: Duration,

    /// Capacity of the exact-text classification cache. Default: `1024`.
    pub classification_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            min_confidence_to_cache: 0.0,
            default_strategy: None,
            max_cost_per_query: None,
            retrieval_timeout: DEFAULT_RETRIEVAL_TIMEOUT,
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
            classification_cache_capacity: DEFAULT_CLASSIFICATION_CACHE_CAPACITY,
        }
    }
}

impl Config {
    const ENV_CACHE_THRESHOLD: &'static str = "MAESTRO_CACHE_THRESHOLD";
    const ENV_CACHE_CAPACITY: &'static str = "MAESTRO_CACHE_CAPACITY";
    const ENV_MIN_CONFIDENCE: &'static str = "MAESTRO_MIN_CONFIDENCE_TO_CACHE";
    const ENV_DEFAULT_STRATEGY: &'static str = "MAESTRO_DEFAULT_STRATEGY";
    const ENV_MAX_COST: &'static str = "MAESTRO_MAX_COST_PER_QUERY";
    const ENV_RETRIEVAL_TIMEOUT_MS: &'static str = "MAESTRO_RETRIEVAL_TIMEOUT_MS";
    const ENV_EMBEDDING_TIMEOUT_MS: &'static str = "MAESTRO_EMBEDDING_TIMEOUT_MS";
    const ENV_CLASSIFICATION_CACHE_CAPACITY: &'static str =
        "MAESTRO_CLASSIFICATION_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cache_threshold =
            Self::parse_f32_from_env(Self::ENV_CACHE_THRESHOLD, defaults.cache_threshold)?;
        let cache_capacity =
            Self::parse_usize_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?;
        let min_confidence_to_cache =
            Self::parse_f32_from_env(Self::ENV_MIN_CONFIDENCE, defaults.min_confidence_to_cache)?;
        let default_strategy = Self::parse_strategy_from_env()?;
        let max_cost_per_query = Self::parse_optional_f64_from_env(Self::ENV_MAX_COST)?;
        let retrieval_timeout = Self::parse_timeout_from_env(
            Self::ENV_RETRIEVAL_TIMEOUT_MS,
            defaults.retrieval_timeout,
        )?;
        let embedding_timeout = Self::parse_timeout_from_env(
            Self::ENV_EMBEDDING_TIMEOUT_MS,
            defaults.embedding_timeout,
        )?;
        let classification_cache_capacity = Self::parse_u64_from_env(
            Self::ENV_CLASSIFICATION_CACHE_CAPACITY,
            defaults.classification_cache_capacity,
        )?;

        let config = Self {
            cache_threshold,
            cache_capacity,
            min_confidence_to_cache,
            default_strategy,
            max_cost_per_query,
            retrieval_timeout,
            embedding_timeout,
            classification_cache_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cache_threshold > 0.0 && self.cache_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold {
                value: self.cache_threshold,
            });
        }

        if self.cache_capacity == 0 {
            return Err(ConfigError::InvalidCapacity {
                value: self.cache_capacity,
            });
        }

        if self.retrieval_timeout.is_zero() || self.embedding_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        if let Some(max_cost) = self.max_cost_per_query {
            if max_cost < 0.0 {
                return Err(ConfigError::InvalidMaxCost { value: max_cost });
            }
        }

        Ok(())
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|source| ConfigError::ParseFloat {
                var: var_name,
                value,
                source,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_f64_from_env(var_name: &'static str) -> Result<Option<f64>, ConfigError> {
        match env::var(var_name) {
            Ok(value) if !value.trim().is_empty() => value
                .parse()
                .map(Some)
                .map_err(|source| ConfigError::ParseFloat {
                    var: var_name,
                    value,
                    source,
                }),
            _ => Ok(None),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|source| ConfigError::ParseInt {
                var: var_name,
                value,
                source,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|source| ConfigError::ParseInt {
                var: var_name,
                value,
                source,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_timeout_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let millis: u64 = value.parse().map_err(|source| ConfigError::ParseInt {
                    var: var_name,
                    value,
                    source,
                })?;
                Ok(Duration::from_millis(millis))
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_strategy_from_env() -> Result<Option<StrategyName>, ConfigError> {
        match env::var(Self::ENV_DEFAULT_STRATEGY) {
            Ok(value) if !value.trim().is_empty() => value
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidStrategy { value }),
            _ => Ok(None),
        }
    }
}

impl From<Config> for OrchestratorConfig {
    fn from(config: Config) -> Self {
        OrchestratorConfig {
            use_cache: true,
            cache_threshold: config.cache_threshold,
            cache_capacity: config.cache_capacity,
            min_confidence_to_cache: config.min_confidence_to_cache,
            default_strategy: config.default_strategy,
            max_cost_per_query: config.max_cost_per_query,
            retrieval_timeout: config.retrieval_timeout,
            embedding_timeout: config.embedding_timeout,
            classification_cache_capacity: config.classification_cache_capacity,
        }
    }
}
