//! Filesystem Module
//!
//! A cache driver that needs no external datastore: one flat file per key,
//! laid out in directories that mirror the key's segments.
//!
//! ## Responsibilities
//! - Map hierarchical keys to paths (`key`)
//! - Encode, validate and decode records (`record`)
//! - Implement the driver contract over raw file operations (`driver`)
//! - Expire records lazily, on read; there is no background sweep
//!
//! ## Layout
//! ```text
//! {root}/
//!   └── some/
//!       └── cache/
//!           └── key        "some:cache:key" → <13-digit expiry><JSON>
//! ```

pub mod key;
pub mod record;
mod driver;

pub use driver::FileSystemDriver;
pub use key::ResolvedKey;
pub use record::{Decoded, Expiry, RecordError, EXPIRY_WIDTH, INDEFINITE_MARKER};
