use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::embedding::{EmbeddingError, EmbeddingProvider};

use super::types::{CacheConfig, CacheEntry, CacheHit, CacheStats, CachedResponse};

/// Similarity cache over embedded queries, generic over the embedding
/// provider.
///
/// All read-modify-write sequences (probe match bookkeeping, insert with
/// eviction) happen under one mutex; embedding runs outside the lock.
pub struct SemanticCache<E: EmbeddingProvider> {
    embedder: Arc<E>,
    config: CacheConfig,
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    /// Entries in insertion order. Probe ties break toward the earliest
    /// entry; eviction ties break the same way.
    entries: Vec<CacheEntry>,
    hits: u64,
    misses: u64,
    /// Logical clock bumped on every insert and hit.
    tick: u64,
}

impl<E: EmbeddingProvider> std::fmt::Debug for SemanticCache<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SemanticCache")
            .field("size", &inner.entries.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: EmbeddingProvider> SemanticCache<E> {
    /// Creates a cache using the given provider and configuration.
    pub fn new(embedder: Arc<E>, config: CacheConfig) -> Self {
        Self {
            embedder,
            config,
            inner: Mutex::new(CacheInner {
                entries: Vec::new(),
                hits: 0,
                misses: 0,
                tick: 0,
            }),
        }
    }

    /// Returns the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Looks up a semantically similar entry for `query`.
    ///
    /// Embeds the query and scans every entry with cosine similarity. The
    /// highest-scoring entry wins if its score clears the threshold; equal
    /// scores resolve to the earliest-inserted entry. A match bumps the
    /// entry's hit count and refreshes its recency.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn probe(&self, query: &str) -> Result<Option<CacheHit>, EmbeddingError> {
        let embedding = self.embedder.embed(query).await?;

        let mut inner = self.inner.lock();

        let mut best: Option<(usize, f32)> = None;
        for (idx, entry) in inner.entries.iter().enumerate() {
            let score = cosine_similarity(&embedding, &entry.embedding);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        match best {
            Some((idx, score)) if score >= self.config.similarity_threshold => {
                inner.tick += 1;
                let tick = inner.tick;
                inner.hits += 1;

                let entry = &mut inner.entries[idx];
                entry.hit_count += 1;
                entry.last_accessed = tick;

                debug!(similarity = score, hit_count = entry.hit_count, "Cache hit");

                Ok(Some(CacheHit {
                    response: entry.response.clone(),
                    similarity: score,
                    original_query: entry.original_query.clone(),
                    hit_count: entry.hit_count,
                }))
            }
            _ => {
                inner.misses += 1;
                debug!(
                    best_similarity = best.map(|(_, s)| s),
                    threshold = self.config.similarity_threshold,
                    "Cache miss"
                );
                Ok(None)
            }
        }
    }

    /// Stores a query-response pair.
    ///
    /// An entry with the same normalized key is replaced in place. Otherwise,
    /// when at capacity, the entry with the oldest access is evicted first
    /// (LRU by access, not by insertion).
    #[instrument(skip_all, fields(query_len = query.len()))]
    pub async fn insert(
        &self,
        query: &str,
        response: CachedResponse,
    ) -> Result<(), EmbeddingError> {
        if response.confidence < self.config.min_confidence {
            debug!(
                confidence = response.confidence,
                min_confidence = self.config.min_confidence,
                "Skipping cache insert, confidence below gate"
            );
            return Ok(());
        }

        let embedding = self.embedder.embed(query).await?;
        let key = cache_key(query);

        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;

        if let Some(pos) = inner.entries.iter().position(|e| e.key == key) {
            inner.entries.remove(pos);
        } else if inner.entries.len() >= self.config.capacity {
            let victim = inner
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.last_accessed)
                .map(|(idx, _)| idx);
            if let Some(idx) = victim {
                let evicted = inner.entries.remove(idx);
                debug!(
                    evicted_query = %evicted.original_query,
                    last_accessed = evicted.last_accessed,
                    "Evicted least-recently-used entry"
                );
            }
        }

        inner.entries.push(CacheEntry {
            key,
            original_query: query.to_string(),
            embedding,
            response,
            hit_count: 0,
            last_accessed: tick,
            created_at: Utc::now(),
        });

        Ok(())
    }

    /// Returns a snapshot of size and hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let probes = inner.hits + inner.misses;
        CacheStats {
            size: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
            hit_rate: if probes == 0 {
                0.0
            } else {
                inner.hits as f64 / probes as f64
            },
        }
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Removes all entries and resets counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }
}

fn cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Cosine similarity of two vectors.
///
/// Returns `0.0` for empty or length-mismatched inputs and for zero-norm
/// vectors, so a malformed embedding scores as maximally dissimilar instead
/// of panicking.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
