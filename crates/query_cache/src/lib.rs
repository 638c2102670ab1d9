//! Keyed result cache in front of the API client.
//!
//! Results stay fresh for a staleness window, failed fetches are retried a
//! fixed number of times, and concurrent fetches for the same key share one
//! call. Mutations invalidate by key prefix.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tokio::time::{sleep, Instant};

use models::CacheSettings;

/// Ordered list of segments naming a cached query, e.g. `["production-insights", "3"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Appends one more segment.
    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<&str> for QueryKey {
    fn from(segment: &str) -> Self {
        Self(vec![segment.to_string()])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    pub stale_time: Duration,
    /// Extra attempts after the first failure.
    pub retry: u32,
    pub retry_delay: Duration,
    pub max_retry_delay: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            retry: 1,
            retry_delay: Duration::from_secs(1),
            max_retry_delay: Duration::from_secs(30),
        }
    }
}

impl CacheOptions {
    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self {
            stale_time: Duration::from_secs(settings.stale_time_secs),
            retry: settings.retry,
            ..Self::default()
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
    generation: u64,
}

#[derive(Default)]
struct Slot {
    entry: AsyncMutex<Option<Entry>>,
    generation: AtomicU64,
}

pub struct QueryCache {
    options: CacheOptions,
    slots: Mutex<HashMap<QueryKey, Arc<Slot>>>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

impl QueryCache {
    pub fn new(options: CacheOptions) -> Self {
        Self {
            options,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    fn slot(&self, key: &QueryKey) -> Arc<Slot> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.entry(key.clone()).or_default().clone()
    }

    /// Returns the cached value for `key` while it is fresh, otherwise runs
    /// `fetcher` (with retries) and caches its result. Errors are not cached.
    pub async fn fetch<T, E, F, Fut>(&self, key: QueryKey, mut fetcher: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(&key);
        let mut entry = slot.entry.lock().await;
        let generation = slot.generation.load(Ordering::Acquire);

        if let Some(cached) = entry.as_ref() {
            let fresh = cached.generation == generation
                && cached.fetched_at.elapsed() < self.options.stale_time;
            if fresh {
                if let Some(value) = cached.value.downcast_ref::<T>() {
                    tracing::debug!(%key, "cache hit");
                    return Ok(value.clone());
                }
            }
        }

        tracing::debug!(%key, "cache miss");
        let value = self.run_with_retry(&key, &mut fetcher).await?;
        *entry = Some(Entry {
            value: Arc::new(value.clone()),
            fetched_at: Instant::now(),
            generation,
        });
        Ok(value)
    }

    async fn run_with_retry<T, E, F, Fut>(&self, key: &QueryKey, fetcher: &mut F) -> Result<T, E>
    where
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        let mut delay = self.options.retry_delay;

        loop {
            match fetcher().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= self.options.retry => {
                    tracing::warn!(%key, "query failed after {} attempts: {err}", attempt + 1);
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(%key, "query failed (attempt {}): {err}, retrying", attempt + 1);
                    sleep(delay).await;
                    delay = std::cmp::min(self.options.max_retry_delay, delay * 2);
                    attempt += 1;
                }
            }
        }
    }

    /// Last cached value for `key`, fresh or not.
    pub async fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.get(key).cloned()
        }?;
        let entry = slot.entry.lock().await;
        entry.as_ref()?.value.downcast_ref::<T>().cloned()
    }

    /// Marks every entry whose key starts with `prefix` stale. Returns how
    /// many keys matched.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let mut matched = 0;
        for (key, slot) in slots.iter().filter(|(key, _)| key.starts_with(prefix)) {
            slot.generation.fetch_add(1, Ordering::AcqRel);
            tracing::debug!(%key, "invalidated");
            matched += 1;
        }
        matched
    }

    pub fn clear(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn options() -> CacheOptions {
        CacheOptions {
            retry_delay: Duration::from_millis(10),
            ..CacheOptions::default()
        }
    }

    async fn counted(
        cache: &QueryCache,
        key: QueryKey,
        calls: &AtomicUsize,
        value: u32,
    ) -> Result<u32, String> {
        cache
            .fetch(key, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(value)
            })
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_is_served_from_cache() {
        let cache = QueryCache::new(options());
        let calls = &AtomicUsize::new(0);

        assert_eq!(counted(&cache, "products".into(), calls, 1).await, Ok(1));
        assert_eq!(counted(&cache, "products".into(), calls, 2).await, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_goes_stale_after_window() {
        let cache = QueryCache::new(options());
        let calls = &AtomicUsize::new(0);

        counted(&cache, "dashboard".into(), calls, 1).await.unwrap();
        tokio::time::advance(Duration::from_secs(5 * 60 + 1)).await;
        assert_eq!(counted(&cache, "dashboard".into(), calls, 2).await, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_by_prefix() {
        let cache = QueryCache::new(options());
        let calls = &AtomicUsize::new(0);
        let insights = QueryKey::from("production-insights");

        counted(&cache, insights.clone().with(1), calls, 1).await.unwrap();
        counted(&cache, insights.clone().with(2), calls, 1).await.unwrap();
        counted(&cache, "products".into(), calls, 1).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        assert_eq!(cache.invalidate(&insights), 2);

        counted(&cache, insights.clone().with(1), calls, 5).await.unwrap();
        counted(&cache, "products".into(), calls, 5).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(cache.peek::<u32>(&insights.with(1)).await, Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_retried_once_then_surfaced() {
        let cache = QueryCache::new(options());
        let calls = &AtomicUsize::new(0);

        let result: Result<u32, String> = cache
            .fetch("schemes".into(), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("HTTP error 500".to_string())
            })
            .await;

        assert_eq!(result, Err("HTTP error 500".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.peek::<u32>(&"schemes".into()).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers() {
        let cache = QueryCache::new(options());
        let calls = &AtomicUsize::new(0);

        let result: Result<u32, String> = cache
            .fetch("sales-summary".into(), move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("connection reset".to_string())
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_fetches_share_one_call() {
        let cache = QueryCache::new(options());
        let calls = &AtomicUsize::new(0);

        let fetch = || {
            cache.fetch(QueryKey::from("channel-wise"), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_millis(50)).await;
                Ok::<_, String>(vec!["Amazon".to_string()])
            })
        };

        let (a, b) = tokio::join!(fetch(), fetch());
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_drops_everything() {
        let cache = QueryCache::new(options());
        let calls = &AtomicUsize::new(0);

        counted(&cache, "products".into(), calls, 1).await.unwrap();
        cache.clear();
        counted(&cache, "products".into(), calls, 1).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_options_from_settings() {
        let options = CacheOptions::from_settings(&CacheSettings {
            stale_time_secs: 60,
            retry: 3,
        });
        assert_eq!(options.stale_time, Duration::from_secs(60));
        assert_eq!(options.retry, 3);
        assert_eq!(QueryKey::new(["a", "b"]).to_string(), "a/b");
    }
}
