//! Key Resolver
//!
//! Maps a hierarchical cache key onto a directory and a leaf file name.
//!
//! `"some:cache:key"` with separator `":"` becomes the components
//! `["some", "cache", "key"]`: directory `some/cache`, file `key`. A key that
//! already uses the host path separator (`"some/cache:key"`) resolves to the
//! same components.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::error::{CacheError, Result};

/// Location of a record on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Directory holding the record (root + all non-leaf segments)
    pub directory: PathBuf,

    /// Leaf file name (last segment)
    pub file: String,
}

impl ResolvedKey {
    /// Full path of the record file
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file)
    }
}

/// Split a key into its ordered path components
///
/// Splits on `separator`, then splits every piece again on the host path
/// separator. Empty components and `.`/`..` are rejected so that every key
/// names exactly one file strictly inside the cache root.
pub fn segments<'a>(key: &'a str, separator: &str) -> Result<Vec<&'a str>> {
    if separator.is_empty() {
        return Err(CacheError::Config(
            "key separator must not be empty".to_string(),
        ));
    }

    let components: Vec<&str> = key
        .split(separator)
        .flat_map(|piece| piece.split(MAIN_SEPARATOR))
        .collect();

    for component in &components {
        let reason = match *component {
            "" => "empty segment",
            "." | ".." => "relative path segment",
            _ => continue,
        };
        return Err(CacheError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        });
    }

    Ok(components)
}

/// Directory part of a key, relative to the cache root
///
/// Empty for single-segment keys.
pub fn directory_of(key: &str, separator: &str) -> Result<PathBuf> {
    let components = segments(key, separator)?;
    let parents = &components[..components.len() - 1];
    Ok(parents.iter().collect())
}

/// Leaf file name of a key
pub fn file_of<'a>(key: &'a str, separator: &str) -> Result<&'a str> {
    let components = segments(key, separator)?;
    // split always yields at least one piece and empty pieces are rejected
    Ok(components[components.len() - 1])
}

/// Resolve a key to its record location under `root`
pub fn resolve(root: &Path, key: &str, separator: &str) -> Result<ResolvedKey> {
    let components = segments(key, separator)?;
    let (file, parents) = match components.split_last() {
        Some(split) => split,
        None => {
            return Err(CacheError::InvalidKey {
                key: key.to_string(),
                reason: "no segments".to_string(),
            })
        }
    };

    let directory = parents
        .iter()
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment));

    Ok(ResolvedKey {
        directory,
        file: (*file).to_string(),
    })
}
