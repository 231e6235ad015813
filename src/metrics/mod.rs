//! Per-query metrics ledger and derived aggregates.
//!
//! One engine per orchestrator. `record` appends under a mutex, so concurrent
//! writers are safe; readers take a snapshot of whatever prefix has been
//! appended. The ledger grows for the process lifetime.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::router::{StrategyName, max_strategy_cost};

/// Where a query's answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSource {
    Cache,
    Retrieval,
}

impl RecordSource {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::Cache => "CACHE",
            RecordSource::Retrieval => "RETRIEVAL",
        }
    }
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One completed query.
#[derive(Debug, Clone)]
pub struct QueryRecord {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub source: RecordSource,
    pub strategy: StrategyName,
    pub latency_ms: f64,
    pub cost: f64,
    pub confidence: f32,
}

/// Aggregates over the whole ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub total_queries: u64,
    pub cache_hit_rate: f64,
    pub avg_cost: f64,
    pub avg_latency_ms: f64,
    pub total_cost: f64,
    /// Savings against the naive baseline where every query would have paid
    /// the most expensive strategy's nominal cost.
    pub cost_saved: f64,
    pub breakdown_by_strategy: HashMap<String, u64>,
}

impl MetricsSnapshot {
    fn empty() -> Self {
        Self {
            total_queries: 0,
            cache_hit_rate: 0.0,
            avg_cost: 0.0,
            avg_latency_ms: 0.0,
            total_cost: 0.0,
            cost_saved: 0.0,
            breakdown_by_strategy: HashMap::new(),
        }
    }
}

/// One fixed-width window of a [`MetricsEngine::timeseries`] result.
///
/// `query_count`, `cost` and `avg_latency_ms` are bucket-local (zero for an
/// empty bucket). `cumulative_hit_rate` is cumulative to the bucket's end and
/// carries forward through empty buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    pub start: DateTime<Utc>,
    pub query_count: u64,
    pub cost: f64,
    pub avg_latency_ms: f64,
    pub cumulative_hit_rate: f64,
}

#[derive(Default)]
struct Ledger {
    records: Vec<QueryRecord>,
    cache_hits: u64,
    total_cost: f64,
    total_latency_ms: f64,
    by_strategy: HashMap<StrategyName, u64>,
}

/// Append-only metrics ledger with on-demand aggregation.
#[derive(Default)]
pub struct MetricsEngine {
    ledger: Mutex<Ledger>,
}

impl std::fmt::Debug for MetricsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsEngine")
            .field("records", &self.ledger.lock().records.len())
            .finish()
    }
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one query record and updates running aggregates.
    pub fn record(&self, record: QueryRecord) {
        let mut ledger = self.ledger.lock();

        if record.source == RecordSource::Cache {
            ledger.cache_hits += 1;
        }
        ledger.total_cost += record.cost;
        ledger.total_latency_ms += record.latency_ms;
        *ledger.by_strategy.entry(record.strategy).or_insert(0) += 1;

        ledger.records.push(record);
    }

    /// Aggregates over everything recorded so far.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let ledger = self.ledger.lock();
        let total = ledger.records.len() as u64;

        if total == 0 {
            return MetricsSnapshot::empty();
        }

        let naive_cost = total as f64 * max_strategy_cost();

        MetricsSnapshot {
            total_queries: total,
            cache_hit_rate: ledger.cache_hits as f64 / total as f64,
            avg_cost: ledger.total_cost / total as f64,
            avg_latency_ms: ledger.total_latency_ms / total as f64,
            total_cost: ledger.total_cost,
            cost_saved: naive_cost - ledger.total_cost,
            breakdown_by_strategy: ledger
                .by_strategy
                .iter()
                .map(|(name, count)| (name.as_str().to_string(), *count))
                .collect(),
        }
    }

    /// The last `limit` records in insertion order (oldest first).
    ///
    /// Callers that want most-recent-first display reverse the result.
    pub fn recent(&self, limit: usize) -> Vec<QueryRecord> {
        let ledger = self.ledger.lock();
        let skip = ledger.records.len().saturating_sub(limit);
        ledger.records[skip..].to_vec()
    }

    /// Number of records in the ledger.
    pub fn len(&self) -> usize {
        self.ledger.lock().records.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.ledger.lock().records.is_empty()
    }

    /// Fixed-width buckets right-aligned to now, oldest first.
    pub fn timeseries(&self, bucket_seconds: u64, num_buckets: usize) -> Vec<TimeBucket> {
        self.timeseries_at(Utc::now(), bucket_seconds, num_buckets)
    }

    fn timeseries_at(
        &self,
        now: DateTime<Utc>,
        bucket_seconds: u64,
        num_buckets: usize,
    ) -> Vec<TimeBucket> {
        let ledger = self.ledger.lock();
        let width = Duration::seconds(bucket_seconds as i64);

        let mut buckets = Vec::with_capacity(num_buckets);
        // Records are appended in time order; walk them once across buckets.
        // Everything before the window still feeds the cumulative counters.
        let mut idx = 0;
        let mut cumulative_total = 0u64;
        let mut cumulative_hits = 0u64;

        for i in 0..num_buckets {
            let end = now - width * (num_buckets - 1 - i) as i32;
            let start = end - width;

            let mut count = 0u64;
            let mut cost = 0.0;
            let mut latency_sum = 0.0;

            while idx < ledger.records.len() && ledger.records[idx].timestamp < end {
                let record = &ledger.records[idx];
                cumulative_total += 1;
                if record.source == RecordSource::Cache {
                    cumulative_hits += 1;
                }
                if record.timestamp >= start {
                    count += 1;
                    cost += record.cost;
                    latency_sum += record.latency_ms;
                }
                idx += 1;
            }

            buckets.push(TimeBucket {
                start,
                query_count: count,
                cost,
                avg_latency_ms: if count == 0 {
                    0.0
                } else {
                    latency_sum / count as f64
                },
                cumulative_hit_rate: if cumulative_total == 0 {
                    0.0
                } else {
                    cumulative_hits as f64 / cumulative_total as f64
                },
            });
        }

        buckets
    }
}
