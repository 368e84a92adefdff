//! Rate limiter decision service

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::storage::CounterStore;
use crate::config::RateLimitConfig;

/// Result of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// Counter value after this request's increment
    pub current: u64,
    /// Configured per-window limit
    pub limit: u32,
    /// Seconds the caller should wait before retrying
    pub retry_after: u64,
}

/// Rate limiter over an injected counter store.
///
/// The store handle is constructed at service start and passed in here; there
/// is no lazy global connection. If the store is unreachable or slow the
/// limiter fails open: the request is admitted and a warning is logged.
pub struct RateLimiterService {
    store: Arc<dyn CounterStore>,
    enabled: bool,
    limit: u32,
    window_seconds: u64,
    store_timeout: Duration,
}

impl RateLimiterService {
    /// Create a rate limiter over the given counter store
    pub fn new(store: Arc<dyn CounterStore>, config: &RateLimitConfig) -> Self {
        Self {
            store,
            enabled: config.enabled,
            limit: config.requests_per_minute,
            window_seconds: config.window_seconds,
            store_timeout: Duration::from_secs(config.store_timeout_seconds),
        }
    }

    /// Whether rate limiting is enabled at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Increment the counter for `key` and decide admission.
    ///
    /// The increment that crosses the limit still counts: with a limit of N,
    /// requests 1..=N are admitted and request N+1 (returning N+1) is the
    /// first one rejected.
    pub async fn check(&self, key: &str) -> RateLimitDecision {
        let increment = self.store.increment(key, self.window_seconds);
        let current = match tokio::time::timeout(self.store_timeout, increment).await {
            Ok(Ok(count)) => count,
            Ok(Err(e)) => {
                warn!(key = %key, "Rate limit counter unavailable, failing open: {}", e);
                0
            }
            Err(_) => {
                warn!(key = %key, "Rate limit counter timed out, failing open");
                0
            }
        };

        RateLimitDecision {
            allowed: current <= self.limit as u64,
            current,
            limit: self.limit,
            retry_after: self.window_seconds,
        }
    }
}
