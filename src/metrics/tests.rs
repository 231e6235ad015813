use super::*;
use chrono::TimeZone;

fn record_at(
    timestamp: DateTime<Utc>,
    source: RecordSource,
    strategy: StrategyName,
    cost: f64,
    latency_ms: f64,
) -> QueryRecord {
    QueryRecord {
        timestamp,
        query: "test query".to_string(),
        source,
        strategy,
        latency_ms,
        cost,
        confidence: 0.9,
    }
}

fn now_fixed() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_empty_snapshot() {
    let engine = MetricsEngine::new();
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.total_queries, 0);
    assert_eq!(snapshot.cache_hit_rate, 0.0);
    assert_eq!(snapshot.avg_cost, 0.0);
    assert_eq!(snapshot.total_cost, 0.0);
    assert_eq!(snapshot.cost_saved, 0.0);
    assert!(snapshot.breakdown_by_strategy.is_empty());
}

#[test]
fn test_snapshot_aggregates() {
    let engine = MetricsEngine::new();
    let now = now_fixed();

    engine.record(record_at(
        now,
        RecordSource::Retrieval,
        StrategyName::Fast,
        0.003,
        120.0,
    ));
    engine.record(record_at(
        now,
        RecordSource::Retrieval,
        StrategyName::Comprehensive,
        0.018,
        300.0,
    ));
    engine.record(record_at(
        now,
        RecordSource::Cache,
        StrategyName::Fast,
        0.0,
        3.0,
    ));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.total_queries, 3);
    assert!((snapshot.cache_hit_rate - 1.0 / 3.0).abs() < 1e-9);
    assert!((snapshot.total_cost - 0.021).abs() < 1e-9);
    assert!((snapshot.avg_cost - 0.007).abs() < 1e-9);
    assert!((snapshot.avg_latency_ms - 141.0).abs() < 1e-9);
    assert_eq!(snapshot.breakdown_by_strategy["fast"], 2);
    assert_eq!(snapshot.breakdown_by_strategy["comprehensive"], 1);
}

#[test]
fn test_cost_saved_against_naive_baseline() {
    let engine = MetricsEngine::new();
    let now = now_fixed();

    // 4 queries: 2 full-price retrievals, 2 free cache hits.
    for _ in 0..2 {
        engine.record(record_at(
            now,
            RecordSource::Retrieval,
            StrategyName::Comprehensive,
            0.018,
            200.0,
        ));
        engine.record(record_at(
            now,
            RecordSource::Cache,
            StrategyName::Comprehensive,
            0.0,
            2.0,
        ));
    }

    let snapshot = engine.snapshot();
    let expected = 4.0 * 0.018 - 2.0 * 0.018;
    assert!((snapshot.cost_saved - expected).abs() < 1e-9);
}

#[test]
fn test_recent_returns_insertion_order_tail() {
    let engine = MetricsEngine::new();
    let now = now_fixed();

    for i in 0..5 {
        let mut record = record_at(now, RecordSource::Retrieval, StrategyName::Fast, 0.003, 1.0);
        record.query = format!("query {i}");
        engine.record(record);
    }

    let recent = engine.recent(3);
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].query, "query 2");
    assert_eq!(recent[2].query, "query 4");

    // Limit larger than the ledger returns everything.
    assert_eq!(engine.recent(100).len(), 5);
}

#[test]
fn test_timeseries_buckets_are_right_aligned_oldest_first() {
    let engine = MetricsEngine::new();
    let now = now_fixed();

    // One record 90s ago (bucket 0 of 2x60s), one 30s ago (bucket 1).
    engine.record(record_at(
        now - Duration::seconds(90),
        RecordSource::Retrieval,
        StrategyName::Balanced,
        0.007,
        100.0,
    ));
    engine.record(record_at(
        now - Duration::seconds(30),
        RecordSource::Cache,
        StrategyName::Balanced,
        0.0,
        5.0,
    ));

    let buckets = engine.timeseries_at(now, 60, 2);
    assert_eq!(buckets.len(), 2);
    assert!(buckets[0].start < buckets[1].start);

    assert_eq!(buckets[0].query_count, 1);
    assert!((buckets[0].cost - 0.007).abs() < 1e-9);
    assert!((buckets[0].avg_latency_ms - 100.0).abs() < 1e-9);
    assert_eq!(buckets[0].cumulative_hit_rate, 0.0);

    assert_eq!(buckets[1].query_count, 1);
    assert_eq!(buckets[1].cost, 0.0);
    assert!((buckets[1].cumulative_hit_rate - 0.5).abs() < 1e-9);
}

#[test]
fn test_timeseries_empty_bucket_semantics() {
    let engine = MetricsEngine::new();
    let now = now_fixed();

    // Single cache hit 150s ago; the two newer buckets are empty.
    engine.record(record_at(
        now - Duration::seconds(150),
        RecordSource::Cache,
        StrategyName::Fast,
        0.0,
        2.0,
    ));

    let buckets = engine.timeseries_at(now, 60, 3);
    assert_eq!(buckets[0].query_count, 1);
    assert_eq!(buckets[1].query_count, 0);
    assert_eq!(buckets[2].query_count, 0);

    // Bucket-local metrics zero out; the cumulative rate carries forward.
    assert_eq!(buckets[1].cost, 0.0);
    assert_eq!(buckets[1].avg_latency_ms, 0.0);
    assert!((buckets[1].cumulative_hit_rate - 1.0).abs() < 1e-9);
    assert!((buckets[2].cumulative_hit_rate - 1.0).abs() < 1e-9);
}

#[test]
fn test_timeseries_counts_records_before_window_in_cumulative() {
    let engine = MetricsEngine::new();
    let now = now_fixed();

    // Far outside the 1x60s window, but still part of history.
    engine.record(record_at(
        now - Duration::seconds(3600),
        RecordSource::Cache,
        StrategyName::Fast,
        0.0,
        2.0,
    ));
    engine.record(record_at(
        now - Duration::seconds(30),
        RecordSource::Retrieval,
        StrategyName::Fast,
        0.003,
        50.0,
    ));

    let buckets = engine.timeseries_at(now, 60, 1);
    assert_eq!(buckets[0].query_count, 1);
    assert!((buckets[0].cumulative_hit_rate - 0.5).abs() < 1e-9);
}

#[test]
fn test_timeseries_with_no_records() {
    let engine = MetricsEngine::new();
    let buckets = engine.timeseries(60, 4);
    assert_eq!(buckets.len(), 4);
    for bucket in buckets {
        assert_eq!(bucket.query_count, 0);
        assert_eq!(bucket.cumulative_hit_rate, 0.0);
    }
}

#[test]
fn test_concurrent_recording() {
    use std::sync::Arc;
    use std::thread;

    let engine = Arc::new(MetricsEngine::new());
    let mut handles = Vec::new();

    for _ in 0..8 {
        let engine = engine.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                engine.record(record_at(
                    Utc::now(),
                    RecordSource::Retrieval,
                    StrategyName::Fast,
                    0.003,
                    10.0,
                ));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.snapshot().total_queries, 800);
}
