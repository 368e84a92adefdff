//! String cache for hot read aggregates
//!
//! Entries carry a TTL and are never invalidated early; readers tolerate
//! stale data until expiry. Cache failures degrade to a miss, never an error.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::warn;

/// Trait for cache backends
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Get a cached value; None on miss or backend failure
    async fn get(&self, key: &str) -> Option<String>;

    /// Cache a value with a TTL; false on backend failure
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool;
}

/// Redis-backed cache
pub struct RedisCache {
    connection_manager: Arc<ConnectionManager>,
}

impl RedisCache {
    /// Create a cache over an established connection manager
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self { connection_manager }
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = (*self.connection_manager).clone();

        match redis::cmd("GET")
            .arg(key)
            .query_async::<Option<String>>(&mut conn)
            .await
        {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache get error for key {}: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let mut conn = (*self.connection_manager).clone();

        match redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async::<String>(&mut conn)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Cache set error for key {}: {}", key, e);
                false
            }
        }
    }
}

/// In-memory cache entry with expiration
struct CacheEntry {
    value: String,
    expires_at: u64,
}

/// In-memory cache for development/single instance
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCache {
    /// Create a new in-memory cache
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn current_time() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if Self::current_time() >= entry.expires_at {
            return None;
        }
        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Self::current_time() + ttl.as_secs(),
            },
        );
        true
    }
}
