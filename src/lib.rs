//! # cachette
//!
//! A pluggable key-value cache with:
//! - One capability contract: get, set-with-TTL, increment, decrement,
//!   delete, flush
//! - A filesystem driver with hierarchical keys and lazy expiry
//! - A remote driver passing commands through to a RESP key-value server
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Cache                               │
//! │                 (facade, key separator)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  dyn CacheDriver
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌──────────────────┐      ┌──────────────┐
//!   │ FileSystemDriver │      │ RemoteDriver │
//!   └──────┬───────────┘      └──────┬───────┘
//!          │                         │
//!          ▼                         ▼
//!   ┌──────────────────┐      ┌──────────────┐
//!   │ key → path       │      │ RemoteClient │
//!   │ record codec     │      │ (RESP / TCP) │
//!   └──────────────────┘      └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! # async fn demo() -> cachette::Result<()> {
//! use cachette::Cache;
//! use serde_json::json;
//!
//! let cache = Cache::filesystem("/tmp/cachette");
//! cache.set("users:42:name", &json!("Ada"), Some(60_000)).await?;
//! assert_eq!(cache.get("users:42:name").await?, Some(json!("Ada")));
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod driver;
pub mod fs;
pub mod protocol;
pub mod remote;
pub mod cache;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CacheError, Result};
pub use config::{Config, DriverKind};
pub use driver::{CacheDriver, DEFAULT_KEY_SEPARATOR};
pub use fs::FileSystemDriver;
pub use remote::{MemoryClient, RemoteClient, RemoteDriver, RespClient};
pub use cache::Cache;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cachette
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
