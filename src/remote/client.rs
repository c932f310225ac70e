//! Remote client contract
//!
//! The native commands the remote driver needs from an already-connected
//! key-value server client.

use async_trait::async_trait;

use crate::error::Result;

/// A connected client of a remote key-value server
///
/// Expiry, increments and deletion are executed by the server itself;
/// implementations pass the commands through unchanged.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// `GET key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// `SET key value`
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// `SETEX key seconds value`
    async fn set_ex(&self, key: &str, seconds: u64, value: &str) -> Result<()>;

    /// `INCR key`
    async fn incr(&self, key: &str) -> Result<i64>;

    /// `INCRBY key by`
    async fn incr_by(&self, key: &str, by: i64) -> Result<i64>;

    /// `DECR key`
    async fn decr(&self, key: &str) -> Result<i64>;

    /// `DECRBY key by`
    async fn decr_by(&self, key: &str, by: i64) -> Result<i64>;

    /// `DEL key`, returning the number of keys removed
    async fn del(&self, key: &str) -> Result<u64>;

    /// `FLUSHALL`
    async fn flush_all(&self) -> Result<()>;
}
