//! Record Codec
//!
//! Encodes and decodes the on-disk cache record.
//!
//! ## Record Format
//! ```text
//! ┌──────────────────────┬──────────────────────────────┐
//! │ Expiry marker (13)   │ JSON-encoded value           │
//! └──────────────────────┴──────────────────────────────┘
//! ```
//!
//! The marker is ASCII decimal: either `0000000000000` (never expires) or the
//! Unix-epoch millisecond at which the record expires.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use thiserror::Error;

use crate::error::{CacheError, Result};

/// Width of the expiry marker in bytes
pub const EXPIRY_WIDTH: usize = 13;

/// Marker for records that never expire
pub const INDEFINITE_MARKER: &str = "0000000000000";

/// Largest timestamp representable in the marker
pub const MAX_EXPIRY_MS: u64 = 9_999_999_999_999;

/// When a record expires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Never expires
    Never,

    /// Expires at this Unix-epoch millisecond
    At(u64),
}

impl Expiry {
    /// Expiry for a record written at `now_ms` with an optional TTL
    pub fn from_ttl(ttl_ms: Option<u64>, now_ms: u64) -> Self {
        match ttl_ms {
            Some(ttl) => Expiry::At(now_ms.saturating_add(ttl).min(MAX_EXPIRY_MS)),
            None => Expiry::Never,
        }
    }

    /// The fixed-width marker for this expiry
    pub fn marker(&self) -> String {
        match self {
            Expiry::Never => INDEFINITE_MARKER.to_string(),
            Expiry::At(ms) => format!("{:013}", (*ms).min(MAX_EXPIRY_MS)),
        }
    }

    /// Whether a record with this expiry is stale at `now_ms`
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self {
            Expiry::Never => false,
            Expiry::At(ms) => *ms < now_ms,
        }
    }
}

/// Outcome of decoding a record
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The record is live
    Live { value: Value, expiry: Expiry },

    /// The record's expiry has passed; the value was not parsed
    Expired { expired_at: u64 },
}

/// Reasons a record cannot be decoded
///
/// The driver maps these to [`CacheError`] once it knows the file path.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid expiry marker {0:?}")]
    InvalidExpiry(String),

    #[error("{0}")]
    ParseFailure(#[from] serde_json::Error),
}

/// Current time as Unix-epoch milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Encode a record for `value`, expiring `ttl_ms` from now
pub fn encode(value: &Value, ttl_ms: Option<u64>) -> Result<Vec<u8>> {
    encode_at(value, ttl_ms, now_millis())
}

/// Encode a record as if written at `now_ms`
pub fn encode_at(value: &Value, ttl_ms: Option<u64>, now_ms: u64) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
    let marker = Expiry::from_ttl(ttl_ms, now_ms).marker();

    let mut record = Vec::with_capacity(EXPIRY_WIDTH + body.len());
    record.extend_from_slice(marker.as_bytes());
    record.extend_from_slice(&body);

    Ok(record)
}

/// Decode a record read from disk
pub fn decode(bytes: &[u8]) -> std::result::Result<Decoded, RecordError> {
    decode_at(bytes, now_millis())
}

/// Decode a record, judging expiry against `now_ms`
pub fn decode_at(bytes: &[u8], now_ms: u64) -> std::result::Result<Decoded, RecordError> {
    let expiry = parse_marker(bytes)?;

    if let Expiry::At(expired_at) = expiry {
        if expiry.is_expired_at(now_ms) {
            return Ok(Decoded::Expired { expired_at });
        }
    }

    let value = serde_json::from_slice(&bytes[EXPIRY_WIDTH..])?;
    Ok(Decoded::Live { value, expiry })
}

/// Validate and parse the leading expiry marker
fn parse_marker(bytes: &[u8]) -> std::result::Result<Expiry, RecordError> {
    let head = &bytes[..bytes.len().min(EXPIRY_WIDTH)];
    let invalid = || RecordError::InvalidExpiry(String::from_utf8_lossy(head).into_owned());

    if head.len() < EXPIRY_WIDTH || !head.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    if head == INDEFINITE_MARKER.as_bytes() {
        return Ok(Expiry::Never);
    }

    // 13 ASCII digits always fit in a u64; all-zero was handled above
    let marker = std::str::from_utf8(head).map_err(|_| invalid())?;
    match marker.parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Expiry::At(ms)),
        _ => Err(invalid()),
    }
}
