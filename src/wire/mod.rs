//! Serialization boundary.
//!
//! External interfaces speak camelCase JSON; everything inside the crate
//! stays snake_case. The mapping lives here and only here, as `serde` DTOs
//! with `From` conversions off the core types.


use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cache::DocumentRef;
use crate::metrics::{QueryRecord, TimeBucket};
use crate::orchestrator::{MetricsReport, QueryOptions, QueryResult, QuerySource};

/// Incoming query request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub use_cache: Option<bool>,
}

impl QueryRequest {
    /// Splits the request into the query text and per-query options.
    pub fn into_parts(self) -> (String, QueryOptions) {
        (
            self.query,
            QueryOptions {
                strategy: self.strategy,
                use_cache: self.use_cache,
            },
        )
    }
}

/// A document in a query response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub similarity_score: f32,
    pub content_preview: String,
}

impl From<DocumentRef> for DocumentPayload {
    fn from(doc: DocumentRef) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            category: doc.category,
            similarity_score: doc.similarity_score,
            content_preview: doc.content_preview,
        }
    }
}

/// Outgoing query response.
///
/// The last four fields are present only for `source == "CACHE"`;
/// `num_documents_retrieved` only for `source == "RETRIEVAL"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub answer: String,
    pub documents: Vec<DocumentPayload>,
    pub confidence: f32,
    pub cost: f64,
    pub latency_ms: f64,
    pub source: String,
    pub strategy: String,
    pub complexity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_documents_retrieved: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_similarity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_count: Option<u64>,
}

impl From<QueryResult> for QueryResponse {
    fn from(result: QueryResult) -> Self {
        let (num_documents_retrieved, cache_similarity, original_query, hit_count) =
            match &result.source {
                QuerySource::Retrieval { num_documents } => {
                    (Some(*num_documents), None, None, None)
                }
                QuerySource::Cache {
                    similarity,
                    original_query,
                    hit_count,
                } => (
                    None,
                    Some(*similarity),
                    Some(original_query.clone()),
                    Some(*hit_count),
                ),
            };

        Self {
            answer: result.answer,
            documents: result.documents.into_iter().map(Into::into).collect(),
            confidence: result.confidence,
            cost: result.cost,
            latency_ms: result.latency_ms,
            source: result.source.as_str().to_string(),
            strategy: result.strategy.as_str().to_string(),
            complexity: result.complexity.as_str().to_string(),
            num_documents_retrieved,
            cache_similarity,
            original_query,
            hit_count,
        }
    }
}

/// Aggregate metrics payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub total_queries: u64,
    pub cache_hit_rate: f64,
    pub avg_cost: f64,
    pub avg_latency_ms: f64,
    pub total_cost: f64,
    pub cost_saved: f64,
    pub breakdown_by_strategy: HashMap<String, u64>,
    pub cache_size: usize,
}

impl From<MetricsReport> for MetricsResponse {
    fn from(report: MetricsReport) -> Self {
        Self {
            total_queries: report.total_queries,
            cache_hit_rate: report.cache_hit_rate,
            avg_cost: report.avg_cost,
            avg_latency_ms: report.avg_latency_ms,
            total_cost: report.total_cost,
            cost_saved: report.cost_saved,
            breakdown_by_strategy: report.breakdown_by_strategy,
            cache_size: report.cache_size,
        }
    }
}

/// One entry in the recent-queries audit payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentQueryPayload {
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub query: String,
    pub source: String,
    pub strategy: String,
    pub latency_ms: f64,
    pub cost: f64,
    pub confidence: f32,
}

impl From<QueryRecord> for RecentQueryPayload {
    fn from(record: QueryRecord) -> Self {
        Self {
            timestamp: record.timestamp.to_rfc3339(),
            query: record.query,
            source: record.source.as_str().to_string(),
            strategy: record.strategy.as_str().to_string(),
            latency_ms: record.latency_ms,
            cost: record.cost,
            confidence: record.confidence,
        }
    }
}

/// One bucket in the timeseries payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucketPayload {
    /// RFC 3339 timestamp of the bucket's start.
    pub start: String,
    pub query_count: u64,
    pub cost: f64,
    pub avg_latency_ms: f64,
    pub cumulative_hit_rate: f64,
}

impl From<TimeBucket> for TimeBucketPayload {
    fn from(bucket: TimeBucket) -> Self {
        Self {
            start: bucket.start.to_rfc3339(),
            query_count: bucket.query_count,
            cost: bucket.cost,
            avg_latency_ms: bucket.avg_latency_ms,
            cumulative_hit_rate: bucket.cumulative_hit_rate,
        }
    }
}
