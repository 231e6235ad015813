//! Semantic cache: similarity-based lookup with LRU eviction.
//!
//! Queries are matched by meaning, not by exact string: a probe embeds the
//! query and compares it against every stored entry with cosine similarity.
//! The best match wins when it clears the configured threshold. At capacity,
//! the entry with the oldest access is evicted.

mod semantic;
mod types;

#[cfg(test)]
mod tests;

pub use semantic::{SemanticCache, cosine_similarity};
pub use types::{CacheConfig, CacheEntry, CacheHit, CacheStats, CachedResponse, DocumentRef};

/// Default cosine similarity threshold for a probe to count as a hit.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.88;

/// Default maximum number of cache entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
