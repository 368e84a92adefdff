//! Counter store backends for rate limiting
//!
//! Provides storage implementations for request counters:
//! - Redis for distributed, production use
//! - In-memory for development and single-instance deployments

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for rate limit counter stores.
///
/// `increment` must be atomic: the counter bump and the expiry reset happen
/// as one indivisible operation so concurrent requests never read a stale
/// count. The expiry is reset on every increment, not just on creation, so a
/// steady stream of requests keeps extending the window.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter for `key` and reset its expiry to
    /// `window_seconds`. Returns the count after the increment.
    async fn increment(&self, key: &str, window_seconds: u64) -> Result<u64, String>;
}

/// Redis-backed counter store
pub struct RedisCounterStore {
    connection_manager: Arc<ConnectionManager>,
}

impl RedisCounterStore {
    /// Create a counter store over an established connection manager
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self { connection_manager }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str, window_seconds: u64) -> Result<u64, String> {
        let mut conn = (*self.connection_manager).clone();

        // INCR + EXPIRE in one MULTI/EXEC transaction
        let (count,): (u64,) = redis::pipe()
            .atomic()
            .cmd("INCR")
            .arg(key)
            .cmd("EXPIRE")
            .arg(key)
            .arg(window_seconds)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| format!("Redis INCR/EXPIRE error: {}", e))?;

        Ok(count)
    }
}

/// In-memory counter entry with expiration
struct CounterEntry {
    count: u64,
    expires_at: u64,
}

/// In-memory counter store for development/single instance
pub struct InMemoryCounterStore {
    counters: Arc<RwLock<HashMap<String, CounterEntry>>>,
}

impl InMemoryCounterStore {
    /// Create a new in-memory counter store
    pub fn new() -> Self {
        Self {
            counters: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn current_time() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str, window_seconds: u64) -> Result<u64, String> {
        let now = Self::current_time();
        let mut counters = self.counters.write().await;

        let entry = counters.entry(key.to_string()).or_insert(CounterEntry {
            count: 0,
            expires_at: now + window_seconds,
        });

        if now >= entry.expires_at {
            entry.count = 0;
        }

        entry.count += 1;
        // expiry resets on every increment, matching the Redis backend
        entry.expires_at = now + window_seconds;

        Ok(entry.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_key_counts_from_one() {
        let store = InMemoryCounterStore::new();

        for expected in 1..=5u64 {
            let count = store.increment("test:key", 60).await.unwrap();
            assert_eq!(count, expected);
        }
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryCounterStore::new();

        store.increment("user:1", 60).await.unwrap();
        store.increment("user:1", 60).await.unwrap();
        let other = store.increment("user:2", 60).await.unwrap();

        assert_eq!(other, 1);
    }

    #[tokio::test]
    async fn test_expired_counter_resets() {
        let store = InMemoryCounterStore::new();

        // zero-second window expires immediately
        store.increment("test:expiry", 0).await.unwrap();
        let count = store.increment("test:expiry", 60).await.unwrap();

        assert_eq!(count, 1);
    }
}
