use crate::{SearchProvider, SearchResult};
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Counters exposed on the stats endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
}

/// LRU cache in front of a [`SearchProvider`].
///
/// Keyed on `(query, max_results)` so the same query at different result
/// counts does not serve a truncated or oversized cached answer. Provider
/// failures are logged and degrade to an empty result list; failures are
/// never cached.
pub struct SearchCache {
    provider: Arc<dyn SearchProvider>,
    entries: Mutex<LruCache<(String, usize), Vec<SearchResult>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    capacity: usize,
}

impl SearchCache {
    pub fn new(provider: Arc<dyn SearchProvider>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        // capacity is >= 1 here
        let nz = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            provider,
            entries: Mutex::new(LruCache::new(nz)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            capacity,
        }
    }

    /// Search with caching. Never fails: a provider error yields an empty
    /// result list so the calling analysis can continue without sources.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let key = (query.to_string(), max_results);

        {
            let mut entries = self.entries.lock().await;
            if let Some(hit) = entries.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(target: "search.cache", query_len = query.len(), "search.cache.hit");
                return hit.clone();
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.provider.search(query, max_results).await {
            Ok(results) => {
                let mut entries = self.entries.lock().await;
                entries.put(key, results.clone());
                results
            }
            Err(err) => {
                tracing::warn!(
                    target: "search.cache",
                    query_len = query.len(),
                    error = %err,
                    "search.provider.failed"
                );
                Vec::new()
            }
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().await;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: entries.len(),
            capacity: self.capacity,
        }
    }

    /// Drop every cached entry. Hit/miss counters are preserved.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let dropped = entries.len();
        entries.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lumina_common::{LuminaError, Result};

    struct CountingProvider {
        calls: AtomicU64,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU64::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl SearchProvider for CountingProvider {
        async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                return Err(LuminaError::Provider("search down".to_string()));
            }
            Ok(vec![SearchResult {
                title: format!("result for {}", query),
                url: "https://example.com".to_string(),
                content: "snippet".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn repeat_query_hits_cache_with_one_provider_call() {
        let provider = CountingProvider::new(false);
        let cache = SearchCache::new(provider.clone(), 50);

        let first = cache.search("is example.com safe", 5).await;
        let second = cache.search("is example.com safe", 5).await;

        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::Relaxed), 1);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[tokio::test]
    async fn different_max_results_is_a_different_key() {
        let provider = CountingProvider::new(false);
        let cache = SearchCache::new(provider.clone(), 50);

        cache.search("same query", 3).await;
        cache.search("same query", 5).await;

        assert_eq!(provider.calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_empty_and_is_not_cached() {
        let provider = CountingProvider::new(true);
        let cache = SearchCache::new(provider.clone(), 50);

        assert!(cache.search("anything", 5).await.is_empty());
        assert!(cache.search("anything", 5).await.is_empty());

        // Failures retry the provider instead of pinning an empty answer.
        assert_eq!(provider.calls.load(Ordering::Relaxed), 2);
        assert_eq!(cache.stats().await.size, 0);
    }

    #[tokio::test]
    async fn clear_empties_entries_but_keeps_counters() {
        let provider = CountingProvider::new(false);
        let cache = SearchCache::new(provider.clone(), 50);

        cache.search("q1", 5).await;
        cache.search("q2", 5).await;
        assert_eq!(cache.clear().await, 2);

        let stats = cache.stats().await;
        assert_eq!(stats.size, 0);
        assert_eq!(stats.misses, 2);
    }

    #[tokio::test]
    async fn capacity_evicts_least_recently_used() {
        let provider = CountingProvider::new(false);
        let cache = SearchCache::new(provider.clone(), 2);

        cache.search("a", 5).await;
        cache.search("b", 5).await;
        cache.search("c", 5).await; // evicts "a"
        cache.search("a", 5).await;

        assert_eq!(provider.calls.load(Ordering::Relaxed), 4);
        assert_eq!(cache.stats().await.size, 2);
    }
}
