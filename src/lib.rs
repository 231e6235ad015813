//! Maestro: request orchestration for RAG pipelines.
//!
//! Maestro sits in front of a retrieval-augmented-generation pipeline and
//! decides, per query, whether a previously computed answer can be reused,
//! which retrieval strategy to run when it cannot, and what each decision
//! cost. The two load-bearing pieces are the [`SemanticCache`] (similarity
//! lookup with LRU eviction) and the [`QueryRouter`] (deterministic,
//! rule-based strategy selection with no model call on the hot path).
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use maestro::{Orchestrator, OrchestratorConfig, QueryOptions};
//! # use maestro::retrieval::RetrievalBackend;
//! # async fn run(backend: impl RetrievalBackend) -> Result<(), maestro::OrchestratorError> {
//! let embedder = maestro::embedding::shared_embedder();
//! let orchestrator = Orchestrator::new(embedder, backend, OrchestratorConfig::default());
//!
//! let result = orchestrator
//!     .process_query("What is your refund policy?", QueryOptions::none())
//!     .await?;
//! println!("{} (source: {})", result.answer, result.source);
//! # Ok(())
//! # }
//! ```
//!
//! # Module map
//!
//! - [`cache`]: semantic cache with cosine lookup, LRU eviction, hit stats
//! - [`router`]: complexity classification and strategy selection
//! - [`orchestrator`]: per-query sequencing, budgets, timeouts
//! - [`metrics`]: append-only ledger, aggregates, timeseries
//! - [`embedding`]: embedding provider seam and default implementation
//! - [`retrieval`]: retrieval backend seam
//! - [`wire`]: camelCase DTOs for external interfaces
//! - [`config`]: `MAESTRO_*` environment configuration
//!
//! Mock implementations ([`embedding::MockEmbedder`],
//! [`retrieval::MockRetrievalBackend`]) are available behind the `mock`
//! feature.

pub mod cache;
pub mod config;
pub mod embedding;
pub mod metrics;
pub mod orchestrator;
pub mod retrieval;
pub mod router;
pub mod wire;

pub use cache::{
    CacheConfig, CacheEntry, CacheHit, CacheStats, CachedResponse, DEFAULT_CACHE_CAPACITY,
    DEFAULT_SIMILARITY_THRESHOLD, DocumentRef, SemanticCache, cosine_similarity,
};
pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingError, EmbeddingProvider, HashEmbedder, shared_embedder};
pub use metrics::{MetricsEngine, MetricsSnapshot, QueryRecord, RecordSource, TimeBucket};
pub use orchestrator::{
    MetricsReport, Orchestrator, OrchestratorConfig, OrchestratorError, QueryOptions, QueryResult,
    QuerySource,
};
pub use retrieval::{RetrievalBackend, RetrievalError, RetrievalResponse, RetrievedDocument};
pub use router::{
    QueryComplexity, QueryRouter, RetrievalStrategy, RouterError, StrategyName, strategy_for,
};

#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use retrieval::MockRetrievalBackend;
