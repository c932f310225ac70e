//! Filesystem Driver
//!
//! Stores one flat record file per key under a root directory.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use crate::config::Config;
use crate::driver::{CacheDriver, DEFAULT_KEY_SEPARATOR};
use crate::error::{CacheError, Result};

use super::key::{self, ResolvedKey};
use super::record::{self, Decoded, RecordError};

/// Cache driver backed by plain files
///
/// The driver holds nothing but its configuration, so it is cheap to clone and
/// every operation is an independent unit of filesystem work.
///
/// ## Concurrency
/// - No locks are taken. Two `set`s on one key race; the last write wins.
/// - `increment`/`decrement` are a plain read followed by arithmetic. They are
///   **not atomic** and do **not persist** the result: call `set` with the
///   returned value to store it.
/// - `flush` removes the whole root directory and can interleave with a
///   concurrent `set` in either order.
#[derive(Debug, Clone)]
pub struct FileSystemDriver {
    /// Root directory owned by this driver
    root: PathBuf,

    /// Separator between key segments
    separator: String,
}

impl FileSystemDriver {
    /// Create a driver rooted at `root` using the default `:` separator
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            separator: DEFAULT_KEY_SEPARATOR.to_string(),
        }
    }

    /// Create a driver from the filesystem section of a config
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(&config.directory).with_separator(&config.key_separator))
    }

    /// Use a different key separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Root directory of the cache
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record file backing `key`
    pub fn record_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.resolve(key)?.path())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn resolve(&self, key: &str) -> Result<ResolvedKey> {
        key::resolve(&self.root, key, &self.separator)
    }

    /// Remove a record, treating an already-missing file as removed
    async fn purge(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if is_absent(&e) => Ok(()),
            Err(source) => Err(CacheError::DeleteFailed {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Interpret a stored value as an integer counter
    fn as_counter(key: &str, value: &Value) -> Result<i64> {
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        parsed.ok_or_else(|| CacheError::NotANumber {
            key: key.to_string(),
        })
    }
}

/// A path that cannot exist: missing, or a parent segment is a record file
fn is_absent(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

#[async_trait]
impl CacheDriver for FileSystemDriver {
    /// Read a record, purging it if it is expired or corrupt
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.resolve(key)?.path();

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if is_absent(&e) => {
                tracing::trace!("Cache miss for {:?}", key);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match record::decode(&bytes) {
            Ok(Decoded::Live { value, .. }) => Ok(Some(value)),
            Ok(Decoded::Expired { expired_at }) => {
                tracing::debug!("Record {:?} expired at {}, removing", path, expired_at);
                self.purge(&path).await?;
                Ok(None)
            }
            Err(err) => {
                tracing::warn!("Corrupt record {:?}: {}, removing", path, err);
                self.purge(&path).await?;
                Err(match err {
                    RecordError::InvalidExpiry(marker) => CacheError::InvalidExpiry { path, marker },
                    RecordError::ParseFailure(e) => CacheError::ParseFailure {
                        path,
                        message: e.to_string(),
                    },
                })
            }
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl_ms: Option<u64>) -> Result<()> {
        let resolved = self.resolve(key)?;
        let contents = record::encode(value, ttl_ms)?;

        // Recursive creation is idempotent and also restores a flushed root
        fs::create_dir_all(&resolved.directory).await?;

        let path = resolved.path();
        fs::write(&path, contents).await?;

        tracing::trace!("Stored {:?} (ttl_ms={:?})", path, ttl_ms);
        Ok(())
    }

    async fn increment(&self, key: &str, by: i64) -> Result<i64> {
        let current = match self.get(key).await? {
            Some(value) => Self::as_counter(key, &value)?,
            None => 0,
        };

        current.checked_add(by).ok_or_else(|| CacheError::Overflow {
            key: key.to_string(),
        })
    }

    async fn decrement(&self, key: &str, by: i64) -> Result<i64> {
        let negated = by.checked_neg().ok_or_else(|| CacheError::Overflow {
            key: key.to_string(),
        })?;
        self.increment(key, negated).await
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        let path = self.resolve(key)?.path();

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::trace!("Deleted {:?}", path);
                Ok(1)
            }
            Err(e) if is_absent(&e) => Ok(0),
            Err(source) => Err(CacheError::DeleteFailed { path, source }),
        }
    }

    /// Remove the entire root directory, not just its contents
    async fn flush(&self) -> Result<()> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                tracing::debug!("Flushed cache root {:?}", self.root);
                Ok(())
            }
            Err(e) if is_absent(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_separator(&self) -> &str {
        &self.separator
    }
}
