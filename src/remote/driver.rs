//! Remote Driver
//!
//! Pass-through from the driver contract to a remote server's native commands.

use async_trait::async_trait;
use serde_json::Value;

use crate::driver::{CacheDriver, DEFAULT_KEY_SEPARATOR};
use crate::error::Result;

use super::RemoteClient;

/// Cache driver backed by a remote key-value server
///
/// Unlike the filesystem driver, `increment`/`decrement` are atomic on the
/// server and their result is persisted there.
pub struct RemoteDriver<C> {
    client: C,

    /// Separator reported to callers building hierarchical keys
    separator: String,
}

impl<C: RemoteClient> RemoteDriver<C> {
    /// Wrap an already-connected client
    pub fn new(client: C) -> Self {
        Self {
            client,
            separator: DEFAULT_KEY_SEPARATOR.to_string(),
        }
    }

    /// Use a different key separator
    ///
    /// Keys are opaque to the server; this only changes what
    /// `key_separator` reports.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Get the underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Text stored on the server for a value
    ///
    /// Strings are stored raw so that counters set as `"5"` and values read back
    /// from the server round-trip unchanged; everything else is stored as JSON.
    fn to_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
impl<C: RemoteClient> CacheDriver for RemoteDriver<C> {
    /// The server stores text, so hits come back as `Value::String`
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.client.get(key).await?.map(Value::String))
    }

    async fn set(&self, key: &str, value: &Value, ttl_ms: Option<u64>) -> Result<()> {
        let text = Self::to_text(value);

        match ttl_ms {
            Some(ms) if ms != 0 => {
                let seconds = ms / 1000;
                tracing::trace!("SETEX {:?} {}s", key, seconds);
                self.client.set_ex(key, seconds, &text).await
            }
            _ => self.client.set(key, &text).await,
        }
    }

    async fn increment(&self, key: &str, by: i64) -> Result<i64> {
        if by != 0 {
            return self.client.incr_by(key, by).await;
        }
        self.client.incr(key).await
    }

    async fn decrement(&self, key: &str, by: i64) -> Result<i64> {
        if by != 0 {
            return self.client.decr_by(key, by).await;
        }
        self.client.decr(key).await
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.client.del(key).await
    }

    async fn flush(&self) -> Result<()> {
        self.client.flush_all().await
    }

    fn key_separator(&self) -> &str {
        &self.separator
    }
}
