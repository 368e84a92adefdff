//! Per-identity request rate limiting over a shared counter store

pub mod service;
pub mod storage;

pub use service::{RateLimitDecision, RateLimiterService};
pub use storage::{CounterStore, InMemoryCounterStore, RedisCounterStore};
