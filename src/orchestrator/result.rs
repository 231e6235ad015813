use crate::cache::DocumentRef;
use crate::metrics::MetricsSnapshot;
use crate::router::{QueryComplexity, StrategyName};

/// Where a resolved query's answer came from, with the fields only that
/// source carries.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySource {
    /// Answer reused from the semantic cache.
    Cache {
        /// Cosine similarity between this query and the matched entry.
        similarity: f32,
        /// The query text that originally produced the cached answer.
        original_query: String,
        /// How many times the entry has been hit, including this hit.
        hit_count: u64,
    },
    /// Answer produced by a fresh retrieval.
    Retrieval { num_documents: usize },
}

impl QuerySource {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            QuerySource::Cache { .. } => "CACHE",
            QuerySource::Retrieval { .. } => "RETRIEVAL",
        }
    }

    #[inline]
    pub fn is_cache(&self) -> bool {
        matches!(self, QuerySource::Cache { .. })
    }
}

impl std::fmt::Display for QuerySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub answer: String,
    pub documents: Vec<DocumentRef>,
    /// Maximum document similarity score, clamped to [0, 1].
    pub confidence: f32,
    /// Nominal cost incurred; `0.0` for cache hits.
    pub cost: f64,
    pub latency_ms: f64,
    pub strategy: StrategyName,
    pub complexity: QueryComplexity,
    pub source: QuerySource,
}

/// Ledger aggregates plus the current cache size.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub total_queries: u64,
    pub cache_hit_rate: f64,
    pub avg_cost: f64,
    pub avg_latency_ms: f64,
    pub total_cost: f64,
    pub cost_saved: f64,
    pub breakdown_by_strategy: std::collections::HashMap<String, u64>,
    pub cache_size: usize,
}

impl MetricsReport {
    pub(crate) fn new(snapshot: MetricsSnapshot, cache_size: usize) -> Self {
        Self {
            total_queries: snapshot.total_queries,
            cache_hit_rate: snapshot.cache_hit_rate,
            avg_cost: snapshot.avg_cost,
            avg_latency_ms: snapshot.avg_latency_ms,
            total_cost: snapshot.total_cost,
            cost_saved: snapshot.cost_saved,
            breakdown_by_strategy: snapshot.breakdown_by_strategy,
            cache_size,
        }
    }
}
