//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use market_core::config::cache::MemoryCacheConfig;
use market_core::result::AppResult;
use market_core::traits::cache::CacheProvider;

/// A cached value together with the lifetime it was written with.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    ttl: Option<Duration>,
}

/// Per-entry expiry policy: each entry carries its own TTL, `None`
/// meaning it never expires.
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// In-memory cache provider using moka.
///
/// Per-entry TTLs are enforced through an expiry policy, matching the
/// Redis provider's `EX` semantics: a binding written with a TTL lapses
/// on schedule and the key becomes writable again.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, CacheEntry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(EntryTtl)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        let entry = CacheEntry {
            value: value.to_string(),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<bool> {
        // moka's entry API resolves concurrent insertions for the same key
        // to a single winner, which is what set-if-absent requires.
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert(CacheEntry {
                value: value.to_string(),
                ttl,
            })
            .await;
        Ok(entry.is_fresh())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        let config = MemoryCacheConfig { max_capacity: 1000 };
        MemoryCacheProvider::new(&config)
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider.set("key1", "value1", None).await.unwrap();
        let val = provider.get("key1").await.unwrap();
        assert_eq!(val, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = make_provider();
        provider.set("key2", "value2", None).await.unwrap();
        provider.delete("key2").await.unwrap();
        let val = provider.get("key2").await.unwrap();
        assert_eq!(val, None);
    }

    #[tokio::test]
    async fn test_set_nx_first_write_wins() {
        let provider = make_provider();
        let first = provider.set_nx("nx_key", "val", None).await.unwrap();
        assert!(first);
        let second = provider.set_nx("nx_key", "val2", None).await.unwrap();
        assert!(!second);
        assert_eq!(
            provider.get("nx_key").await.unwrap(),
            Some("val".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_entry_expires_after_ttl() {
        let provider = make_provider();
        provider
            .set("ttl_key", "v", Some(Duration::from_millis(100)))
            .await
            .unwrap();
        assert_eq!(
            provider.get("ttl_key").await.unwrap(),
            Some("v".to_string())
        );

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(provider.get("ttl_key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_nx_entry_expires_after_ttl() {
        let provider = make_provider();
        let bound = provider
            .set_nx("nx_ttl", "token-1", Some(Duration::from_millis(100)))
            .await
            .unwrap();
        assert!(bound);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(provider.get("nx_ttl").await.unwrap(), None);

        // The key is writable again once the entry lapses.
        let rebound = provider.set_nx("nx_ttl", "token-2", None).await.unwrap();
        assert!(rebound);
        assert_eq!(
            provider.get("nx_ttl").await.unwrap(),
            Some("token-2".to_string())
        );
    }

    #[tokio::test]
    async fn test_entry_without_ttl_does_not_expire() {
        let provider = make_provider();
        provider.set("stay", "v", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(provider.get("stay").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_json_roundtrip() {
        let provider = make_provider();
        let data = serde_json::json!({"name": "test", "count": 42});
        provider.set_json("json_key", &data, None).await.unwrap();
        let result: Option<serde_json::Value> = provider.get_json("json_key").await.unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    async fn test_health_check() {
        let provider = make_provider();
        assert!(provider.health_check().await.unwrap());
    }
}
