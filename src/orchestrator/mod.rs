//! Query orchestration: cache probe → route → retrieve → insert → record.
//!
//! Each [`Orchestrator`] owns its semantic cache, router and metrics engine
//! outright; nothing here is process-global, so tests get fresh state per
//! instance. Only the embedding provider is shared (it is expensive to load
//! and stateless per call).

mod config;
mod error;
mod result;


pub use config::{
    DEFAULT_EMBEDDING_TIMEOUT, DEFAULT_RECENT_LIMIT, DEFAULT_RETRIEVAL_TIMEOUT,
    OrchestratorConfig, QueryOptions,
};
pub use error::OrchestratorError;
pub use result::{MetricsReport, QueryResult, QuerySource};

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheConfig, CacheHit, CacheStats, CachedResponse, DocumentRef, SemanticCache};
use crate::embedding::EmbeddingProvider;
use crate::metrics::{MetricsEngine, QueryRecord, RecordSource, TimeBucket};
use crate::retrieval::{RetrievalBackend, RetrievalResponse};
use crate::router::{QueryComplexity, QueryRouter, RetrievalStrategy, StrategyName};

/// Characters of document content kept in response previews.
const PREVIEW_LEN: usize = 150;

/// Sequences a query through the cache, router, retrieval backend and
/// metrics ledger.
pub struct Orchestrator<E: EmbeddingProvider, R: RetrievalBackend> {
    cache: SemanticCache<E>,
    router: QueryRouter,
    metrics: MetricsEngine,
    backend: R,
    config: OrchestratorConfig,
}

impl<E: EmbeddingProvider, R: RetrievalBackend> std::fmt::Debug for Orchestrator<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("cache", &self.cache)
            .field("router", &self.router)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: EmbeddingProvider, R: RetrievalBackend> Orchestrator<E, R> {
    /// Creates an orchestrator with fresh cache, router and metrics state.
    pub fn new(embedder: Arc<E>, backend: R, config: OrchestratorConfig) -> Self {
        let cache = SemanticCache::new(
            embedder,
            CacheConfig {
                similarity_threshold: config.cache_threshold,
                capacity: config.cache_capacity,
                min_confidence: config.min_confidence_to_cache,
            },
        );

        Self {
            cache,
            router: QueryRouter::with_cache_capacity(config.classification_cache_capacity),
            metrics: MetricsEngine::new(),
            backend,
            config,
        }
    }

    /// Returns the orchestrator configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Processes one query end to end.
    ///
    /// Flow: probe the cache (unless disabled), and on a miss classify the
    /// query, select a strategy (override wins, budget may downgrade),
    /// retrieve, assemble the result and insert it into the cache. Every
    /// completed query lands in the metrics ledger.
    #[instrument(skip(self, query, options), fields(query_len = query.len()))]
    pub async fn process_query(
        &self,
        query: &str,
        options: QueryOptions,
    ) -> Result<QueryResult, OrchestratorError> {
        let started = Instant::now();

        // Validate the override before any embedding or retrieval work.
        let override_name: Option<StrategyName> = match &options.strategy {
            Some(name) => Some(name.parse()?),
            None => self.config.default_strategy,
        };
        let use_cache = options.use_cache.unwrap_or(self.config.use_cache);

        if use_cache {
            if let Some(hit) = self.probe_cache(query).await {
                let latency_ms = elapsed_ms(started);
                info!(
                    similarity = hit.similarity,
                    hit_count = hit.hit_count,
                    latency_ms,
                    "Cache hit"
                );

                let result = QueryResult {
                    answer: hit.response.answer,
                    documents: hit.response.documents,
                    confidence: hit.response.confidence,
                    cost: 0.0,
                    latency_ms,
                    strategy: hit.response.strategy,
                    complexity: hit.response.complexity,
                    source: QuerySource::Cache {
                        similarity: hit.similarity,
                        original_query: hit.original_query,
                        hit_count: hit.hit_count,
                    },
                };
                self.record(query, &result);
                return Ok(result);
            }
        } else {
            debug!("Cache disabled for this query");
        }

        let complexity = self.router.classify(query);
        let mut strategy = self.router.select_strategy(complexity, override_name);
        if let Some(max_cost) = self.config.max_cost_per_query {
            let within = self.router.within_budget(strategy, max_cost);
            if within.name != strategy.name {
                info!(
                    from = %strategy.name,
                    to = %within.name,
                    max_cost,
                    "Budget constraint, downgrading strategy"
                );
                strategy = within;
            }
        }

        let response = self.retrieve(query, strategy).await?;
        let result = self.assemble(started, complexity, strategy, response);

        if use_cache {
            self.insert_into_cache(query, &result).await;
        }

        self.record(query, &result);
        info!(
            strategy = %result.strategy,
            complexity = %result.complexity,
            cost = result.cost,
            latency_ms = result.latency_ms,
            "Query resolved via retrieval"
        );
        Ok(result)
    }

    /// Probes the cache, degrading embedding failures and timeouts to a miss.
    ///
    /// A failed probe only costs a cache opportunity; the query still resolves
    /// through retrieval.
    async fn probe_cache(&self, query: &str) -> Option<CacheHit> {
        match timeout(self.config.embedding_timeout, self.cache.probe(query)).await {
            Ok(Ok(hit)) => hit,
            Ok(Err(e)) => {
                warn!(error = %e, "Cache probe failed, treating as miss");
                None
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.embedding_timeout.as_millis() as u64,
                    "Cache probe timed out, treating as miss"
                );
                None
            }
        }
    }

    async fn retrieve(
        &self,
        query: &str,
        strategy: &'static RetrievalStrategy,
    ) -> Result<RetrievalResponse, OrchestratorError> {
        match timeout(
            self.config.retrieval_timeout,
            self.backend.retrieve(query, strategy.top_k, strategy.rerank),
        )
        .await
        {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(source)) => Err(OrchestratorError::RetrievalFailed {
                query: query.to_string(),
                strategy: strategy.name,
                source,
            }),
            Err(_) => Err(OrchestratorError::Timeout {
                operation: "retrieval",
                elapsed_ms: self.config.retrieval_timeout.as_millis() as u64,
            }),
        }
    }

    fn assemble(
        &self,
        started: Instant,
        complexity: QueryComplexity,
        strategy: &'static RetrievalStrategy,
        response: RetrievalResponse,
    ) -> QueryResult {
        let documents: Vec<DocumentRef> = response
            .documents
            .iter()
            .map(|doc| DocumentRef {
                id: doc.id.clone(),
                title: doc.title.clone(),
                category: doc.category.clone(),
                similarity_score: doc.score.clamp(0.0, 1.0),
                content_preview: preview(&doc.content),
            })
            .collect();

        // Aggregate confidence is the maximum document score, clamped to
        // [0, 1]; no documents means no confidence.
        let confidence = documents
            .iter()
            .map(|d| d.similarity_score)
            .fold(0.0f32, f32::max)
            .clamp(0.0, 1.0);

        QueryResult {
            answer: response.answer,
            confidence,
            cost: strategy.cost_per_query,
            latency_ms: elapsed_ms(started),
            strategy: strategy.name,
            complexity,
            source: QuerySource::Retrieval {
                num_documents: documents.len(),
            },
            documents,
        }
    }

    /// Writes the assembled result into the cache. A failed insert is logged
    /// and swallowed: a missed cache write is not a user-visible failure.
    async fn insert_into_cache(&self, query: &str, result: &QueryResult) {
        let response = CachedResponse {
            answer: result.answer.clone(),
            documents: result.documents.clone(),
            confidence: result.confidence,
            strategy: result.strategy,
            complexity: result.complexity,
        };

        match timeout(
            self.config.embedding_timeout,
            self.cache.insert(query, response),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Cache insert failed, response not cached"),
            Err(_) => warn!("Cache insert timed out, response not cached"),
        }
    }

    fn record(&self, query: &str, result: &QueryResult) {
        self.metrics.record(QueryRecord {
            timestamp: Utc::now(),
            query: query.to_string(),
            source: match result.source {
                QuerySource::Cache { .. } => RecordSource::Cache,
                QuerySource::Retrieval { .. } => RecordSource::Retrieval,
            },
            strategy: result.strategy,
            latency_ms: result.latency_ms,
            cost: result.cost,
            confidence: result.confidence,
        });
    }

    /// Aggregate metrics plus the current cache size.
    pub fn metrics(&self) -> MetricsReport {
        MetricsReport::new(self.metrics.snapshot(), self.cache.len())
    }

    /// The last `limit` query records, insertion order (oldest first).
    pub fn recent_queries(&self, limit: usize) -> Vec<QueryRecord> {
        self.metrics.recent(limit)
    }

    /// Time-bucketed aggregates, right-aligned to now, oldest first.
    pub fn timeseries(&self, bucket_seconds: u64, num_buckets: usize) -> Vec<TimeBucket> {
        self.metrics.timeseries(bucket_seconds, num_buckets)
    }

    /// Cache hit/miss counters and size.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

fn preview(content: &str) -> String {
    if content.len() <= PREVIEW_LEN {
        content.to_string()
    } else {
        let mut cut = PREVIEW_LEN;
        while !content.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &content[..cut])
    }
}
