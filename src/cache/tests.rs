use std::sync::Arc;

use super::*;
use crate::embedding::{HashEmbedder, MockEmbedder};
use crate::router::{QueryComplexity, StrategyName};

fn response(answer: &str) -> CachedResponse {
    CachedResponse {
        answer: answer.to_string(),
        documents: vec![DocumentRef {
            id: "doc-1".to_string(),
            title: "Refund policy".to_string(),
            category: Some("billing".to_string()),
            similarity_score: 0.72,
            content_preview: "Refunds are issued within 30 days...".to_string(),
        }],
        confidence: 0.95,
        strategy: StrategyName::Fast,
        complexity: QueryComplexity::Simple,
    }
}

fn mock_cache(config: CacheConfig) -> (Arc<MockEmbedder>, SemanticCache<MockEmbedder>) {
    let embedder = Arc::new(MockEmbedder::new(3));
    let cache = SemanticCache::new(embedder.clone(), config);
    (embedder, cache)
}

#[test]
fn test_cosine_similarity_identical() {
    let v = vec![0.5, 0.5, 0.1];
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_orthogonal() {
    let a = vec![1.0, 0.0];
    let b = vec![0.0, 1.0];
    assert!(cosine_similarity(&a, &b).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_scale_invariant() {
    let a = vec![1.0, 2.0, 3.0];
    let b = vec![10.0, 20.0, 30.0];
    assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_degenerate_inputs() {
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
}

#[tokio::test]
async fn test_probe_empty_cache_misses() {
    let (_, cache) = mock_cache(CacheConfig::default());
    let hit = cache.probe("anything").await.unwrap();
    assert!(hit.is_none());

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);
}

#[tokio::test]
async fn test_similar_query_hits() {
    let (embedder, cache) = mock_cache(CacheConfig::default());
    // cos(q1, q2) ≈ 0.95
    embedder.set_embedding("q1", vec![1.0, 0.0, 0.0]);
    embedder.set_embedding("q2", vec![0.95, (1.0f32 - 0.95 * 0.95).sqrt(), 0.0]);

    cache.insert("q1", response("answer one")).await.unwrap();

    let hit = cache.probe("q2").await.unwrap().expect("should hit");
    assert_eq!(hit.response.answer, "answer one");
    assert_eq!(hit.original_query, "q1");
    assert_eq!(hit.hit_count, 1);
    assert!(hit.similarity >= 0.88);
}

#[tokio::test]
async fn test_dissimilar_query_misses() {
    let (embedder, cache) = mock_cache(CacheConfig::default());
    // cos(q1, q2) = 0.5
    embedder.set_embedding("q1", vec![1.0, 0.0, 0.0]);
    embedder.set_embedding("q2", vec![0.5, (1.0f32 - 0.25).sqrt(), 0.0]);

    cache.insert("q1", response("answer one")).await.unwrap();

    assert!(cache.probe("q2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_exact_repeat_hits_with_hash_embedder() {
    let embedder = Arc::new(HashEmbedder::with_dimension(64));
    let cache = SemanticCache::new(embedder, CacheConfig::default());

    cache
        .insert("What is your refund policy?", response("30 days"))
        .await
        .unwrap();

    let hit = cache
        .probe("What is your refund policy?")
        .await
        .unwrap()
        .expect("identical text should hit");
    assert!((hit.similarity - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_tie_breaks_toward_earliest_entry() {
    let (embedder, cache) = mock_cache(CacheConfig::default());
    let v = vec![1.0, 0.0, 0.0];
    embedder.set_embedding("first", v.clone());
    embedder.set_embedding("second", v.clone());
    embedder.set_embedding("probe", v);

    cache.insert("first", response("a")).await.unwrap();
    cache.insert("second", response("b")).await.unwrap();

    let hit = cache.probe("probe").await.unwrap().expect("should hit");
    assert_eq!(hit.original_query, "first");
}

#[tokio::test]
async fn test_hit_accounting() {
    let (embedder, cache) = mock_cache(CacheConfig::default());
    embedder.set_embedding("q", vec![0.0, 1.0, 0.0]);
    embedder.set_embedding("other", vec![1.0, 0.0, 0.0]);

    cache.insert("q", response("a")).await.unwrap();

    assert!(cache.probe("q").await.unwrap().is_some());
    assert!(cache.probe("q").await.unwrap().is_some());
    assert!(cache.probe("other").await.unwrap().is_none());

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);

    let hit = cache.probe("q").await.unwrap().unwrap();
    assert_eq!(hit.hit_count, 3);
}

#[tokio::test]
async fn test_hit_rate_zero_without_probes() {
    let (_, cache) = mock_cache(CacheConfig::default());
    assert_eq!(cache.stats().hit_rate, 0.0);
}

#[tokio::test]
async fn test_lru_eviction_at_capacity() {
    let config = CacheConfig {
        capacity: 2,
        ..CacheConfig::default()
    };
    let (embedder, cache) = mock_cache(config);
    embedder.set_embedding("a", vec![1.0, 0.0, 0.0]);
    embedder.set_embedding("b", vec![0.0, 1.0, 0.0]);
    embedder.set_embedding("c", vec![0.0, 0.0, 1.0]);

    cache.insert("a", response("a")).await.unwrap();
    cache.insert("b", response("b")).await.unwrap();

    // Refresh A's recency via a hit, then push past capacity.
    assert!(cache.probe("a").await.unwrap().is_some());
    cache.insert("c", response("c")).await.unwrap();

    assert_eq!(cache.len(), 2);
    assert!(cache.probe("a").await.unwrap().is_some(), "A must survive");
    assert!(cache.probe("b").await.unwrap().is_none(), "B was the LRU victim");
    assert!(cache.probe("c").await.unwrap().is_some());
}

#[tokio::test]
async fn test_capacity_never_exceeded() {
    let config = CacheConfig {
        capacity: 3,
        ..CacheConfig::default()
    };
    let (embedder, cache) = mock_cache(config);
    for i in 0..10 {
        let mut v = vec![0.0; 3];
        v[i % 3] = 1.0;
        // Distinct texts, reused axes; replacement-by-key does not apply.
        embedder.set_embedding(&format!("query {i}"), v);
        cache
            .insert(&format!("query {i}"), response(&format!("answer {i}")))
            .await
            .unwrap();
    }
    assert!(cache.len() <= 3);
}

#[tokio::test]
async fn test_same_key_replaces_entry() {
    let (embedder, cache) = mock_cache(CacheConfig::default());
    embedder.set_embedding("q", vec![1.0, 0.0, 0.0]);

    cache.insert("q", response("old")).await.unwrap();
    cache.insert("q", response("new")).await.unwrap();

    assert_eq!(cache.len(), 1);
    let hit = cache.probe("q").await.unwrap().unwrap();
    assert_eq!(hit.response.answer, "new");
}

#[tokio::test]
async fn test_min_confidence_gate() {
    let config = CacheConfig {
        min_confidence: 0.85,
        ..CacheConfig::default()
    };
    let (embedder, cache) = mock_cache(config);
    embedder.set_embedding("q", vec![1.0, 0.0, 0.0]);

    let mut low = response("shaky");
    low.confidence = 0.4;
    cache.insert("q", low).await.unwrap();
    assert!(cache.is_empty());

    cache.insert("q", response("solid")).await.unwrap();
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_embedding_failure_propagates() {
    let (embedder, cache) = mock_cache(CacheConfig::default());
    embedder.fail_on_embed(true);

    assert!(cache.probe("q").await.is_err());
    assert!(cache.insert("q", response("a")).await.is_err());
}

#[tokio::test]
async fn test_clear_resets_entries_and_counters() {
    let (embedder, cache) = mock_cache(CacheConfig::default());
    embedder.set_embedding("q", vec![1.0, 0.0, 0.0]);

    cache.insert("q", response("a")).await.unwrap();
    cache.probe("q").await.unwrap();
    cache.clear();

    assert!(cache.is_empty());
    let stats = cache.stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
}
