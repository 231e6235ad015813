use std::time::Duration;

use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_SIMILARITY_THRESHOLD};
use crate::router::{DEFAULT_CLASSIFICATION_CACHE_CAPACITY, StrategyName};

/// Default bound on a single retrieval call.
pub const DEFAULT_RETRIEVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on a single embedding call (cache probe or insert).
pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of records returned by recent-query accessors.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Orchestration behavior, fixed per [`super::Orchestrator`] instance.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Whether queries consult the semantic cache by default.
    pub use_cache: bool,
    /// Cosine similarity threshold for cache hits.
    pub cache_threshold: f32,
    /// Maximum semantic cache entries.
    pub cache_capacity: usize,
    /// Responses below this confidence are not cached (`0.0` disables).
    pub min_confidence_to_cache: f32,
    /// Routing override applied to every query unless the caller overrides.
    pub default_strategy: Option<StrategyName>,
    /// Per-query cost budget; pricier strategies are downgraded to fit.
    pub max_cost_per_query: Option<f64>,
    /// Bound on a single retrieval call.
    pub retrieval_timeout: Duration,
    /// Bound on a single embedding call.
    pub embedding_timeout: Duration,
    /// Capacity of the router's exact-text classification cache.
    pub classification_cache_capacity: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
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

/// Per-query overrides supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Strategy name override; validated before any work begins.
    pub strategy: Option<String>,
    /// Overrides the orchestrator's `use_cache` default for this query.
    pub use_cache: Option<bool>,
}

impl QueryOptions {
    /// Options that leave every default in place.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets a strategy override.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Enables or disables cache use for this query.
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self
    }
}
