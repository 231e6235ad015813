use chrono::{DateTime, Utc};

use crate::router::{QueryComplexity, StrategyName};

use super::{DEFAULT_CACHE_CAPACITY, DEFAULT_SIMILARITY_THRESHOLD};

/// A retrieved document as stored in responses: scored, with a short preview
/// instead of the full content.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRef {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    /// Cosine similarity of the document to the query, in [0, 1].
    pub similarity_score: f32,
    pub content_preview: String,
}

/// The answer payload stored with a cache entry. Immutable once created.
///
/// `strategy` and `complexity` describe the query that originally produced
/// the answer; hits report them instead of re-routing.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub answer: String,
    pub documents: Vec<DocumentRef>,
    pub confidence: f32,
    pub strategy: StrategyName,
    pub complexity: QueryComplexity,
}

/// A cached query-answer pair.
///
/// `hit_count` and `last_accessed` are the only mutable fields; both are
/// updated on every successful probe match.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Identifier derived from the normalized query text.
    pub key: String,
    /// The exact text that produced this entry, kept for audit display.
    pub original_query: String,
    pub embedding: Vec<f32>,
    pub response: CachedResponse,
    pub hit_count: u64,
    /// Logical access tick. Monotonic per cache; larger means more recent.
    pub last_accessed: u64,
    pub created_at: DateTime<Utc>,
}

/// What a successful probe returns.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub response: CachedResponse,
    /// Cosine similarity between the probe query and the matched entry.
    pub similarity: f32,
    /// The matched entry's original query text.
    pub original_query: String,
    /// The matched entry's hit count, including this hit.
    pub hit_count: u64,
}

/// Read-only snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, `0.0` when no probes have occurred.
    pub hit_rate: f64,
}

/// Semantic cache configuration.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Minimum cosine similarity for a probe to count as a hit.
    pub similarity_threshold: f32,
    /// Maximum number of entries before LRU eviction kicks in.
    pub capacity: usize,
    /// Responses below this confidence are not cached. `0.0` disables the
    /// gate.
    pub min_confidence: f32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            capacity: DEFAULT_CACHE_CAPACITY,
            min_confidence: 0.0,
        }
    }
}
