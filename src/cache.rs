//! Cache Facade
//!
//! The uniform front door over any driver.
//!
//! ## Responsibilities
//! - Hold one driver behind the `CacheDriver` trait
//! - Supply the default-argument forms (`increment` = by 1)
//! - Expose the key separator so callers can build hierarchical keys
//! - Open the configured driver (`Cache::open`)

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, DriverKind};
use crate::driver::CacheDriver;
use crate::error::{CacheError, Result};
use crate::fs::FileSystemDriver;
use crate::remote::{RemoteDriver, RespClient};

/// A cache over an interchangeable driver
///
/// Pure composition: the facade adds no state of its own, so cloning it
/// shares the same driver.
#[derive(Clone)]
pub struct Cache {
    driver: Arc<dyn CacheDriver>,
}

impl Cache {
    /// Wrap a driver
    pub fn new(driver: impl CacheDriver + 'static) -> Self {
        Self {
            driver: Arc::new(driver),
        }
    }

    /// Wrap a driver that is already shared
    pub fn from_arc(driver: Arc<dyn CacheDriver>) -> Self {
        Self { driver }
    }

    /// A filesystem cache rooted at `directory`
    pub fn filesystem(directory: impl Into<PathBuf>) -> Self {
        Self::new(FileSystemDriver::new(directory))
    }

    /// Open the driver selected by `config`
    ///
    /// For `DriverKind::Remote` this connects to `config.remote_addr`.
    pub async fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        match config.driver {
            DriverKind::FileSystem => {
                tracing::debug!("Opening filesystem cache at {:?}", config.directory);
                Ok(Self::new(FileSystemDriver::from_config(config)?))
            }
            DriverKind::Remote => {
                tracing::debug!("Opening remote cache at {}", config.remote_addr);
                let client = RespClient::connect(config.remote_addr.as_str()).await?;
                Ok(Self::new(
                    RemoteDriver::new(client).with_separator(&config.key_separator),
                ))
            }
        }
    }

    /// Get the underlying driver
    pub fn driver(&self) -> &Arc<dyn CacheDriver> {
        &self.driver
    }

    // =========================================================================
    // Driver Operations
    // =========================================================================

    /// Get a value; `None` on a miss or an expired entry
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.driver.get(key).await
    }

    /// Set a value; `ttl_ms: None` stores it indefinitely
    pub async fn set(&self, key: &str, value: &Value, ttl_ms: Option<u64>) -> Result<()> {
        self.driver.set(key, value, ttl_ms).await
    }

    /// Increase the value at `key` by one
    pub async fn increment(&self, key: &str) -> Result<i64> {
        self.driver.increment(key, 1).await
    }

    /// Increase the value at `key` by `by`
    pub async fn increment_by(&self, key: &str, by: i64) -> Result<i64> {
        self.driver.increment(key, by).await
    }

    /// Decrease the value at `key` by one
    pub async fn decrement(&self, key: &str) -> Result<i64> {
        self.driver.decrement(key, 1).await
    }

    /// Decrease the value at `key` by `by`
    pub async fn decrement_by(&self, key: &str, by: i64) -> Result<i64> {
        self.driver.decrement(key, by).await
    }

    /// Delete an entry, returning how many were removed (0 or 1)
    pub async fn delete(&self, key: &str) -> Result<u64> {
        self.driver.delete(key).await
    }

    /// Delete every entry
    pub async fn flush(&self) -> Result<()> {
        self.driver.flush().await
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Separator between key segments
    pub fn key_separator(&self) -> &str {
        self.driver.key_separator()
    }

    /// Join segments into a key with this cache's separator
    pub fn key<S: AsRef<str>>(&self, segments: &[S]) -> String {
        segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<&str>>()
            .join(self.key_separator())
    }

    // =========================================================================
    // Typed Helpers
    // =========================================================================

    /// Get a value and deserialize it into `T`
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| CacheError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Serialize `value` and store it
    pub async fn set_as<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_ms: Option<u64>,
    ) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.set(key, &value, ttl_ms).await
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("key_separator", &self.key_separator())
            .finish_non_exhaustive()
    }
}
