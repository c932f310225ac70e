//! In-process remote client
//!
//! Behaves like a remote key-value server without a network: values are text,
//! expiry is checked lazily on access and increments are atomic.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{CacheError, Result};

use super::RemoteClient;

/// A stored value and its optional deadline
#[derive(Debug, Clone)]
struct Slot {
    value: String,
    expires_at: Option<Instant>,
}

impl Slot {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// In-memory stand-in for a remote server
///
/// Useful for tests and local development. All commands run under one lock,
/// so increments never lose updates.
#[derive(Debug, Default)]
pub struct MemoryClient {
    data: Mutex<HashMap<String, Slot>>,
}

impl MemoryClient {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.data.lock().values().filter(|s| s.is_live(now)).count()
    }

    /// True when no live keys remain
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically add `by` to the integer at `key` (missing = 0), keeping its TTL
    fn add(&self, key: &str, by: i64) -> Result<i64> {
        let now = Instant::now();
        let mut data = self.data.lock();

        let (current, expires_at) = match data.get(key).filter(|s| s.is_live(now)) {
            Some(slot) => {
                let current = slot.value.parse::<i64>().map_err(|_| {
                    CacheError::Remote("ERR value is not an integer or out of range".to_string())
                })?;
                (current, slot.expires_at)
            }
            None => (0, None),
        };

        let next = current.checked_add(by).ok_or_else(|| {
            CacheError::Remote("ERR increment or decrement would overflow".to_string())
        })?;

        data.insert(
            key.to_string(),
            Slot {
                value: next.to_string(),
                expires_at,
            },
        );
        Ok(next)
    }
}

#[async_trait]
impl RemoteClient for MemoryClient {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let mut data = self.data.lock();

        if let Some(slot) = data.get(key) {
            if slot.is_live(now) {
                return Ok(Some(slot.value.clone()));
            }
            data.remove(key);
        }

        Ok(None)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.lock().insert(
            key.to_string(),
            Slot {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn set_ex(&self, key: &str, seconds: u64, value: &str) -> Result<()> {
        if seconds == 0 {
            return Err(CacheError::Remote(
                "ERR invalid expire time in 'setex' command".to_string(),
            ));
        }

        self.data.lock().insert(
            key.to_string(),
            Slot {
                value: value.to_string(),
                expires_at: Some(Instant::now() + Duration::from_secs(seconds)),
            },
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.add(key, 1)
    }

    async fn incr_by(&self, key: &str, by: i64) -> Result<i64> {
        self.add(key, by)
    }

    async fn decr(&self, key: &str) -> Result<i64> {
        self.add(key, -1)
    }

    async fn decr_by(&self, key: &str, by: i64) -> Result<i64> {
        let negated = by.checked_neg().ok_or_else(|| {
            CacheError::Remote("ERR decrement would overflow".to_string())
        })?;
        self.add(key, negated)
    }

    async fn del(&self, key: &str) -> Result<u64> {
        let now = Instant::now();
        match self.data.lock().remove(key) {
            Some(slot) if slot.is_live(now) => Ok(1),
            _ => Ok(0),
        }
    }

    async fn flush_all(&self) -> Result<()> {
        self.data.lock().clear();
        Ok(())
    }
}
