//! Driver contract
//!
//! Every storage backend implements the same six operations. The
//! [`Cache`](crate::Cache) facade only ever talks to a driver through this
//! trait, so drivers are interchangeable at runtime.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Separator between key segments when a driver doesn't configure its own
pub const DEFAULT_KEY_SEPARATOR: &str = ":";

/// A storage backend for the cache
///
/// ## Semantics shared by all drivers
/// - `get` on a missing or expired key is `Ok(None)`, never an error
/// - `set` with `ttl_ms: None` stores the value indefinitely
/// - `increment`/`decrement` treat a missing key as `0`
/// - `delete` returns the number of entries removed (0 or 1)
///
/// Atomicity of `increment`/`decrement` and whether their result is persisted
/// is driver-specific; see each implementation.
#[async_trait]
pub trait CacheDriver: Send + Sync {
    /// Get a value from the cache
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Set a value in the cache, optionally expiring after `ttl_ms` milliseconds
    async fn set(&self, key: &str, value: &Value, ttl_ms: Option<u64>) -> Result<()>;

    /// Increase the value at `key` by `by` and return the result
    async fn increment(&self, key: &str, by: i64) -> Result<i64>;

    /// Decrease the value at `key` by `by` and return the result
    async fn decrement(&self, key: &str, by: i64) -> Result<i64>;

    /// Delete an entry and return the number of entries removed
    async fn delete(&self, key: &str) -> Result<u64>;

    /// Delete every entry
    async fn flush(&self) -> Result<()>;

    /// Separator between key segments
    fn key_separator(&self) -> &str {
        DEFAULT_KEY_SEPARATOR
    }
}
