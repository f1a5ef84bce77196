//! Caller-side daily fortune cache.
//!
//! The service never consults this. It is the Rust counterpart of the browser's
//! `localStorage` usage: look up by the day-scoped key before requesting, store
//! after a success. Values are always stored as serialized JSON.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::fortune::cache_key::request_key;
use crate::fortune::error::FortuneError;
use crate::fortune::models::{FortuneRequest, FortuneResult};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Request cannot be cached: {0}")]
    InvalidRequest(#[from] FortuneError),

    #[error("Failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key/value store owned by the caller.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// In-process store. Entries are never evicted; stale days simply stop matching.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

/// Typed view over a [`CacheStore`] keyed by request and day.
pub struct DailyFortuneCache<S> {
    store: S,
}

impl<S: CacheStore> DailyFortuneCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the stored fortune for today, if any. Invalid requests and
    /// undecodable entries are misses.
    pub fn get(&self, request: &FortuneRequest, today: NaiveDate) -> Option<FortuneResult> {
        let key = request_key(&request.validate(today).ok()?, today);
        let raw = self.store.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(result) => {
                debug!("Cache hit for {key}");
                Some(result)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry {key}: {e}");
                None
            }
        }
    }

    pub fn put(
        &self,
        request: &FortuneRequest,
        today: NaiveDate,
        result: &FortuneResult,
    ) -> Result<(), CacheError> {
        let key = request_key(&request.validate(today)?, today);
        let value = serde_json::to_string(result)?;
        self.store.set(&key, value);
        Ok(())
    }

    /// Cache-aside lookup: returns today's stored fortune or runs `generate`,
    /// storing its result only on success. A failed store is logged; the
    /// fortune is still returned.
    pub async fn fetch_or_generate<F, Fut>(
        &self,
        request: &FortuneRequest,
        today: NaiveDate,
        generate: F,
    ) -> Result<FortuneResult, FortuneError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FortuneResult, FortuneError>>,
    {
        if let Some(hit) = self.get(request, today) {
            return Ok(hit);
        }
        let result = generate().await?;
        if let Err(e) = self.put(request, today, &result) {
            warn!("Fortune not cached: {e}");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::fortune::cache_key::cache_key;
    use crate::fortune::models::{BloodType, Mode};
    use crate::fortune::service::tests::{StubGenerator, STUB_PAYLOAD};
    use crate::fortune::service::{FortuneService, RetryPolicy};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn sample() -> FortuneResult {
        serde_json::from_str(STUB_PAYLOAD).unwrap()
    }

    #[test]
    fn test_put_stores_serialized_json_under_day_key() {
        let cache = DailyFortuneCache::new(MemoryStore::new());
        let req = FortuneRequest::new("2000-01-01", "O", None);
        cache.put(&req, day(1), &sample()).unwrap();

        let key = cache_key("2000-01-01", BloodType::O, Mode::Normal, day(1));
        let raw = cache.store().get(&key).expect("entry under day key");
        let decoded: FortuneResult = serde_json::from_str(&raw).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_get_misses_on_next_day() {
        let cache = DailyFortuneCache::new(MemoryStore::new());
        let req = FortuneRequest::new("2000-01-01", "O", None);
        cache.put(&req, day(1), &sample()).unwrap();

        assert_eq!(cache.get(&req, day(1)), Some(sample()));
        assert_eq!(cache.get(&req, day(2)), None);
    }

    #[test]
    fn test_modes_have_separate_entries() {
        let cache = DailyFortuneCache::new(MemoryStore::new());
        let normal = FortuneRequest::new("2000-01-01", "O", Some("normal"));
        let yumekawa = FortuneRequest::new("2000-01-01", "O", Some("yumekawa"));
        cache.put(&normal, day(1), &sample()).unwrap();

        assert!(cache.get(&normal, day(1)).is_some());
        assert!(cache.get(&yumekawa, day(1)).is_none());
    }

    #[test]
    fn test_undecodable_entry_is_a_miss() {
        let cache = DailyFortuneCache::new(MemoryStore::new());
        let req = FortuneRequest::new("2000-01-01", "O", None);
        let key = cache_key("2000-01-01", BloodType::O, Mode::Normal, day(1));
        cache.store().set(&key, "[object Object]".to_string());

        assert_eq!(cache.get(&req, day(1)), None);
    }

    #[test]
    fn test_invalid_request_is_never_cached() {
        let cache = DailyFortuneCache::new(MemoryStore::new());
        let req = FortuneRequest::new("", "O", None);

        assert!(cache.get(&req, day(1)).is_none());
        assert!(matches!(
            cache.put(&req, day(1), &sample()),
            Err(CacheError::InvalidRequest(FortuneError::InvalidInput(_)))
        ));
        assert!(cache.store().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_or_generate_calls_service_once_per_day() {
        let stub = Arc::new(StubGenerator::always(STUB_PAYLOAD));
        let svc = FortuneService::new(stub.clone(), Duration::from_secs(5), RetryPolicy::default());
        let cache = DailyFortuneCache::new(MemoryStore::new());
        let req = FortuneRequest::new("2000-01-01", "O", None);

        for _ in 0..3 {
            let result = cache
                .fetch_or_generate(&req, day(1), || svc.request_fortune_on(&req, day(1)))
                .await
                .unwrap();
            assert_eq!(result, sample());
        }
        assert_eq!(stub.call_count(), 1);

        cache
            .fetch_or_generate(&req, day(2), || svc.request_fortune_on(&req, day(2)))
            .await
            .unwrap();
        assert_eq!(stub.call_count(), 2, "a new day triggers a fresh generation");
        assert_eq!(cache.store().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_generation_is_not_cached() {
        let stub = Arc::new(StubGenerator::always("no json today"));
        let svc = FortuneService::new(stub.clone(), Duration::from_secs(5), RetryPolicy::default());
        let cache = DailyFortuneCache::new(MemoryStore::new());
        let req = FortuneRequest::new("2000-01-01", "O", None);

        let err = cache
            .fetch_or_generate(&req, day(1), || svc.request_fortune_on(&req, day(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, FortuneError::MalformedResponse(_)));
        assert!(cache.store().is_empty());
    }
}
