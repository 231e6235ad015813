use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{RetrievalBackend, RetrievalError, RetrievalResponse, RetrievedDocument};

/// In-memory retrieval backend for tests.
///
/// Serves a small fixed corpus with deterministic descending scores, counts
/// calls, and supports failure injection and an artificial delay for timeout
/// tests.
pub struct MockRetrievalBackend {
    corpus: Vec<(String, Option<String>, String)>,
    top_score: f32,
    fail: AtomicBool,
    delay_ms: AtomicU64,
    calls: AtomicU64,
}

impl Default for MockRetrievalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRetrievalBackend {
    pub fn new() -> Self {
        let corpus = [
            (
                "Refund policy",
                Some("billing"),
                "Refunds are issued to the original payment method within 30 days of purchase.",
            ),
            (
                "Shipping times",
                Some("logistics"),
                "Standard shipping takes 3-5 business days; expedited options are available.",
            ),
            (
                "Account security",
                Some("security"),
                "Two-factor authentication can be enabled from the account settings page.",
            ),
            (
                "Pricing tiers",
                Some("billing"),
                "Plans range from a free tier to enterprise contracts with custom SLAs.",
            ),
            (
                "Data retention",
                Some("compliance"),
                "Customer data is retained for 90 days after account closure unless exported.",
            ),
            (
                "API rate limits",
                Some("platform"),
                "The public API allows 600 requests per minute per key by default.",
            ),
            (
                "Support channels",
                None,
                "Support is available via chat and email; enterprise plans add phone support.",
            ),
            (
                "Service status",
                None,
                "Incidents and maintenance windows are published on the status page.",
            ),
            (
                "Integrations",
                Some("platform"),
                "Native integrations cover the major CRM and ticketing systems.",
            ),
            (
                "Onboarding",
                None,
                "Guided onboarding is included with all paid plans during the first month.",
            ),
        ]
        .into_iter()
        .map(|(title, category, content)| {
            (
                title.to_string(),
                category.map(str::to_string),
                content.to_string(),
            )
        })
        .collect();

        Self {
            corpus,
            top_score: 0.9,
            fail: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
            calls: AtomicU64::new(0),
        }
    }

    /// Sets the score of the top result; later results step down by 0.05.
    pub fn with_top_score(mut self, score: f32) -> Self {
        self.top_score = score;
        self
    }

    /// Makes every subsequent `retrieve` call fail.
    pub fn fail_on_retrieve(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Delays every subsequent `retrieve` call (for timeout tests).
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of `retrieve` calls made so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RetrievalBackend for MockRetrievalBackend {
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        _rerank: bool,
    ) -> Result<RetrievalResponse, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(RetrievalError::Backend {
                message: "mock backend set to fail".to_string(),
            });
        }

        let documents: Vec<RetrievedDocument> = self
            .corpus
            .iter()
            .take(top_k)
            .enumerate()
            .map(|(idx, (title, category, content))| RetrievedDocument {
                id: format!("doc-{}", idx + 1),
                title: title.clone(),
                category: category.clone(),
                score: (self.top_score - idx as f32 * 0.05).max(0.0),
                content: content.clone(),
            })
            .collect();

        let answer = match documents.first() {
            Some(top) => format!(
                "Based on {} relevant documents: {}",
                documents.len(),
                top.content
            ),
            None => format!("No relevant documents found for '{query}'."),
        };

        Ok(RetrievalResponse { documents, answer })
    }
}
