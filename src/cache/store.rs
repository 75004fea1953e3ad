//! Key/value cache store backed by Redis.
//!
//! Every operation degrades on backend failure instead of erroring:
//! `get` returns `None`, the mutating calls return `false`. Callers can
//! treat the cache as a pure optimization — an unreachable Redis slows
//! requests down but never fails them.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

use crate::error::{CopilotError, Result};

/// Process-wide cache store handle, injected into the gateway and the
/// API state at bootstrap.
///
/// Implementations must be safe for concurrent use; no locking is done
/// around read-then-write, so two tasks racing on the same key may both
/// miss and both write (last writer wins).
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the stored value if present and unexpired. Backend
    /// unavailability reads as absent.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any prior value, expiring
    /// after `ttl`. Returns whether the write was accepted.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool;

    /// Remove `key`. Returns `false` when the backend is unavailable.
    async fn delete(&self, key: &str) -> bool;

    /// Whether a live value exists for `key`.
    async fn exists(&self, key: &str) -> bool;

    /// Whether the backend is currently reachable. Used by `/health`.
    async fn ping(&self) -> bool;
}

/// Redis-backed [`CacheStore`].
///
/// Holds a single [`redis::Client`] for the life of the process and
/// obtains a multiplexed async connection per operation. TTL expiry is
/// enforced by Redis itself (`SET ... EX`), so an expired key reads as
/// absent whether or not Redis has physically evicted it.
pub struct RedisCacheStore {
    client: redis::Client,
}

impl RedisCacheStore {
    /// Create a store from a Redis URL. Only URL parsing can fail here;
    /// connectivity problems surface later as degraded reads/writes.
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CopilotError::Cache(format!("invalid Redis URL: {e}")))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Option<redis::aio::MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(con) => Some(con),
            Err(e) => {
                warn!("Redis unavailable, treating cache as absent: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut con = self.connection().await?;
        match con.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Redis GET failed, treating as miss: {e}");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let Some(mut con) = self.connection().await else {
            return false;
        };
        let ttl_secs = ttl.as_secs().max(1);
        match con.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Redis SETEX failed, write not accepted: {e}");
                false
            }
        }
    }

    async fn delete(&self, key: &str) -> bool {
        let Some(mut con) = self.connection().await else {
            return false;
        };
        match con.del::<_, u64>(key).await {
            Ok(n) => n > 0,
            Err(e) => {
                warn!("Redis DEL failed: {e}");
                false
            }
        }
    }

    async fn exists(&self, key: &str) -> bool {
        let Some(mut con) = self.connection().await else {
            return false;
        };
        match con.exists::<_, bool>(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Redis EXISTS failed: {e}");
                false
            }
        }
    }

    async fn ping(&self) -> bool {
        let Some(mut con) = self.connection().await else {
            return false;
        };
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut con).await;
        match pong {
            Ok(_) => true,
            Err(e) => {
                debug!("Redis PING failed: {e}");
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryCacheStore;
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryCacheStore::new();
        assert!(store.get("k").await.is_none());
        assert!(store.set("k", "v", Duration::from_secs(60)).await);
        assert_eq!(store.get("k").await.as_deref(), Some("v"));
        assert!(store.exists("k").await);
    }

    #[tokio::test]
    async fn test_memory_store_overwrite_replaces_value() {
        let store = MemoryCacheStore::new();
        store.set("k", "old", Duration::from_secs(60)).await;
        store.set("k", "new", Duration::from_secs(60)).await;
        assert_eq!(store.get("k").await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_memory_store_ttl_expiry_reads_as_absent() {
        let store = MemoryCacheStore::new();
        store.set("k", "v", Duration::from_secs(0)).await;
        assert!(store.get("k").await.is_none());
        assert!(!store.exists("k").await);
    }

    #[tokio::test]
    async fn test_memory_store_delete() {
        let store = MemoryCacheStore::new();
        store.set("k", "v", Duration::from_secs(60)).await;
        assert!(store.delete("k").await);
        assert!(!store.delete("k").await);
        assert!(store.get("k").await.is_none());
    }

    #[test]
    fn test_redis_store_rejects_bad_url() {
        assert!(RedisCacheStore::new("not-a-redis-url").is_err());
    }

    #[test]
    fn test_redis_store_accepts_valid_url() {
        // Client construction does no I/O; connectivity failures surface
        // later as degraded reads.
        assert!(RedisCacheStore::new("redis://localhost:6379/0").is_ok());
    }
}
