//! Deterministic query router.
//!
//! Classifies a query into a complexity class from lexical features alone
//! (no model call on the request path) and maps the class to one of three
//! predefined retrieval strategies. A generative classifier would add seconds
//! of round-trip latency per query; the rule-based one is sub-millisecond and
//! costs nothing.

mod error;
mod strategy;


pub use error::RouterError;
pub use strategy::{RetrievalStrategy, StrategyName, strategy_for};

pub(crate) use strategy::max_strategy_cost;

use moka::sync::Cache;
use tracing::debug;

/// Default capacity for the exact-text classification cache.
pub const DEFAULT_CLASSIFICATION_CACHE_CAPACITY: u64 = 1024;

/// Coarse estimate of how much retrieval effort a query needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryComplexity {
    Simple,
    Moderate,
    Complex,
}

impl QueryComplexity {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryComplexity::Simple => "simple",
            QueryComplexity::Moderate => "moderate",
            QueryComplexity::Complex => "complex",
        }
    }
}

impl std::fmt::Display for QueryComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Phrases that mark analysis or synthesis questions.
const COMPLEX_KEYWORDS: &[&str] = &[
    "compare",
    "analyze",
    "evaluate",
    "assess",
    "versus",
    "vs",
    "difference between",
    "better than",
    "pros and cons",
];

/// Phrases that mark explanation-style questions.
const MODERATE_KEYWORDS: &[&str] = &[
    "how do",
    "how can",
    "explain",
    "tell me about",
    "describe",
    "what features",
];

/// Interrogative prefixes for direct factual questions.
const SIMPLE_PREFIXES: &[&str] = &["what is", "what are", "who is", "when is"];

const SIMPLE_MAX_WORDS: usize = 5;

/// Rule-based classifier with an exact-text result cache.
///
/// `classify` is total and pure over the query text; the cache only avoids
/// recomputation on repeated exact queries and never changes the result.
pub struct QueryRouter {
    classifications: Cache<String, QueryComplexity>,
}

impl std::fmt::Debug for QueryRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRouter")
            .field("cached_classifications", &self.classifications.entry_count())
            .finish()
    }
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRouter {
    /// Creates a router with the default classification-cache capacity.
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CLASSIFICATION_CACHE_CAPACITY)
    }

    /// Creates a router with a specific classification-cache capacity.
    pub fn with_cache_capacity(capacity: u64) -> Self {
        Self {
            classifications: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Classifies a query's complexity from lexical rules.
    ///
    /// Total over all inputs, including the empty string (zero words is
    /// within the simple word budget).
    pub fn classify(&self, query: &str) -> QueryComplexity {
        let normalized = query.trim().to_lowercase();

        if let Some(cached) = self.classifications.get(&normalized) {
            return cached;
        }

        let complexity = classify_with_rules(&normalized);
        debug!(%complexity, query_len = query.len(), "Classified query");
        self.classifications.insert(normalized, complexity);
        complexity
    }

    /// Selects the retrieval strategy for a complexity class.
    ///
    /// An explicit override always wins over the complexity-derived default.
    pub fn select_strategy(
        &self,
        complexity: QueryComplexity,
        override_name: Option<StrategyName>,
    ) -> &'static RetrievalStrategy {
        if let Some(name) = override_name {
            return strategy_for(name);
        }

        let name = match complexity {
            QueryComplexity::Simple => StrategyName::Fast,
            QueryComplexity::Moderate => StrategyName::Balanced,
            QueryComplexity::Complex => StrategyName::Comprehensive,
        };
        strategy_for(name)
    }

    /// Downgrades `strategy` until its nominal cost fits `max_cost`.
    ///
    /// Walks comprehensive → balanced → fast and stops at the first strategy
    /// within budget. When even the cheapest strategy exceeds the budget it
    /// is returned anyway: a budget never fails a query outright.
    pub fn within_budget(
        &self,
        strategy: &'static RetrievalStrategy,
        max_cost: f64,
    ) -> &'static RetrievalStrategy {
        let mut current = strategy;
        while current.cost_per_query > max_cost {
            match current.name.cheaper() {
                Some(name) => current = strategy_for(name),
                None => break,
            }
        }
        current
    }
}

fn classify_with_rules(normalized: &str) -> QueryComplexity {
    if COMPLEX_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        return QueryComplexity::Complex;
    }

    // Moderate keywords outrank the word-count check: "explain the API" is
    // short but still an explanation request.
    if MODERATE_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        return QueryComplexity::Moderate;
    }

    if normalized.split_whitespace().count() <= SIMPLE_MAX_WORDS {
        return QueryComplexity::Simple;
    }

    if SIMPLE_PREFIXES.iter().any(|p| normalized.starts_with(p)) {
        return QueryComplexity::Simple;
    }

    QueryComplexity::Moderate
}
