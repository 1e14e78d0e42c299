use moka::future::Cache;
use moka::Expiry;
use serde_json::Value;
use std::time::{Duration, Instant};

/// A shaped response document together with the lifetime it was stored with.
#[derive(Clone, Debug)]
struct Entry {
    value: Value,
    ttl: Duration,
}

/// Expiration policy that reads the TTL carried by each entry, so endpoints
/// with different freshness requirements share one store.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    // An overwrite restarts the clock with the new entry's TTL; without this
    // override moka would keep the old deadline.
    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory response cache shared by all endpoint handlers.
///
/// Entries expire individually and the store is capacity-bounded, so an
/// unbounded stream of distinct queries cannot grow memory without limit.
/// Concurrent get/set from overlapping requests is safe; last writer wins.
pub struct CacheStore {
    inner: Cache<String, Entry>,
}

impl CacheStore {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { inner }
    }

    /// Return the stored document if present and not expired. Expired
    /// entries behave as absent.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key).await.map(|entry| entry.value)
    }

    /// Store a document under `key`, expiring `ttl` from now. Overwrites any
    /// existing entry for the key.
    pub async fn set(&self, key: String, value: Value, ttl: Duration) {
        self.inner.insert(key, Entry { value, ttl }).await;
    }
}

/// Build a cache key from an endpoint name and its query parameters.
///
/// Parameters are trimmed and lower-cased first, so case or whitespace
/// variants of the same query always resolve to one entry.
pub fn cache_key(endpoint: &str, params: &[&str]) -> String {
    let mut key = String::from(endpoint);
    for param in params {
        key.push('_');
        key.push_str(&param.trim().to_lowercase());
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get_returns_value() {
        let cache = CacheStore::new(100);
        let doc = json!({ "location": { "name": "Paris" } });

        cache
            .set("current_paris".to_string(), doc.clone(), Duration::from_secs(60))
            .await;

        assert_eq!(cache.get("current_paris").await, Some(doc));
    }

    #[tokio::test]
    async fn test_missing_key_is_absent() {
        let cache = CacheStore::new(100);
        assert_eq!(cache.get("current_nowhere").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_behaves_as_absent() {
        let cache = CacheStore::new(100);
        cache
            .set("current_oslo".to_string(), json!({"x": 1}), Duration::from_millis(50))
            .await;

        assert!(cache.get("current_oslo").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get("current_oslo").await, None);
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_entry() {
        let cache = CacheStore::new(100);
        cache
            .set("search_lon".to_string(), json!({"v": 1}), Duration::from_secs(60))
            .await;
        cache
            .set("search_lon".to_string(), json!({"v": 2}), Duration::from_secs(60))
            .await;

        assert_eq!(cache.get("search_lon").await, Some(json!({"v": 2})));
    }

    #[tokio::test]
    async fn test_overwrite_restarts_expiry_clock() {
        let cache = CacheStore::new(100);
        cache
            .set("current_rome".to_string(), json!({"v": 1}), Duration::from_millis(60))
            .await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        cache
            .set("current_rome".to_string(), json!({"v": 2}), Duration::from_millis(300))
            .await;

        // Past the first entry's deadline, inside the second's
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get("current_rome").await, Some(json!({"v": 2})));
    }

    #[test]
    fn test_cache_key_normalizes_case_and_whitespace() {
        assert_eq!(cache_key("current", &["Paris"]), "current_paris");
        assert_eq!(cache_key("current", &["  PARIS  "]), "current_paris");
        assert_eq!(
            cache_key("current", &["Paris"]),
            cache_key("current", &[" paris "])
        );
    }

    #[test]
    fn test_cache_key_joins_all_params() {
        assert_eq!(
            cache_key("history", &["London", "2026-08-01"]),
            "history_london_2026-08-01"
        );
        assert_eq!(cache_key("forecast", &["Rome", "7"]), "forecast_rome_7");
    }
}
