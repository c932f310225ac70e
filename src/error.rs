//! Error types for cachette
//!
//! Provides a unified error type for all cache operations, regardless of
//! which driver serviced them.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using CacheError
pub type Result<T> = std::result::Result<T, CacheError>;

/// Unified error type for cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors (the offending file has already been removed)
    // -------------------------------------------------------------------------
    #[error("Invalid expiry timestamp {marker:?} in {path:?}. File has been removed.")]
    InvalidExpiry { path: PathBuf, marker: String },

    #[error("Unable to parse cache contents in {path:?}. File has been removed. {message}")]
    ParseFailure { path: PathBuf, message: String },

    #[error("Unable to remove {path:?}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Key / Value Errors
    // -------------------------------------------------------------------------
    #[error("Invalid cache key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Unable to increment a non-integer value at {key:?}")]
    NotANumber { key: String },

    #[error("Increment of {key:?} overflows a 64-bit integer")]
    Overflow { key: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Remote Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Remote error: {0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CacheError {
    /// True for errors that were raised after purging a corrupt record
    pub fn is_corrupt_record(&self) -> bool {
        matches!(
            self,
            CacheError::InvalidExpiry { .. } | CacheError::ParseFailure { .. }
        )
    }
}
