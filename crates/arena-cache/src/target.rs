use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arena_models::TradeTarget;
use moka::future::Cache;
use tracing::debug;

use crate::key::content_key;

/// In-memory memoization of target selection, keyed by a hash of the
/// document content. Entries are evicted after TTL.
pub struct TargetCache {
    inner: Cache<String, TradeTarget>,
}

impl TargetCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, text: &str) -> Option<TradeTarget> {
        self.inner.get(&content_key(text)).await
    }

    pub async fn insert(&self, text: &str, target: TradeTarget) {
        self.inner.insert(content_key(text), target).await;
    }

    /// Return the cached target for `text`, or run `select` and cache its
    /// result if it succeeds. Errors are returned to the caller and never cached.
    ///
    /// Concurrent callers for the same document share a single `select` run.
    pub async fn try_get_or_select<F, E>(
        &self,
        text: &str,
        select: F,
    ) -> Result<TradeTarget, Arc<E>>
    where
        F: Future<Output = Result<TradeTarget, E>>,
        E: Send + Sync + 'static,
    {
        let key = content_key(text);
        if let Some(hit) = self.inner.get(&key).await {
            debug!(ticker = %hit.primary_ticker, "Target cache hit");
            return Ok(hit);
        }
        self.inner.try_get_with(key, select).await
    }

    pub async fn invalidate(&self, text: &str) {
        self.inner.invalidate(&content_key(text)).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}
