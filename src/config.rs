//! Configuration for cachette
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::driver::DEFAULT_KEY_SEPARATOR;
use crate::error::{CacheError, Result};

/// Which storage driver a [`Cache`](crate::Cache) is opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverKind {
    /// Flat files under `Config::directory`
    #[default]
    FileSystem,

    /// A remote key-value server at `Config::remote_addr`
    Remote,
}

/// Main configuration for a cache instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Driver Selection
    // -------------------------------------------------------------------------
    /// Storage driver to open
    pub driver: DriverKind,

    // -------------------------------------------------------------------------
    // Filesystem Configuration
    // -------------------------------------------------------------------------
    /// Root directory owned by the filesystem driver.
    /// Internal structure mirrors key segments:
    ///   {directory}/
    ///     └── some/
    ///         └── cache/
    ///             └── key      (record for "some:cache:key")
    pub directory: PathBuf,

    /// Separator between key segments
    pub key_separator: String,

    // -------------------------------------------------------------------------
    // Remote Configuration
    // -------------------------------------------------------------------------
    /// TCP address of the remote key-value server
    pub remote_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: DriverKind::FileSystem,
            directory: PathBuf::from("./cachette_data"),
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            remote_addr: "127.0.0.1:6379".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the settings that would otherwise fail on first use
    pub fn validate(&self) -> Result<()> {
        if self.key_separator.is_empty() {
            return Err(CacheError::Config(
                "key separator must not be empty".to_string(),
            ));
        }

        match self.driver {
            DriverKind::FileSystem if self.directory.as_os_str().is_empty() => Err(
                CacheError::Config("cache directory must not be empty".to_string()),
            ),
            DriverKind::Remote if self.remote_addr.is_empty() => Err(CacheError::Config(
                "remote address must not be empty".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Select the storage driver
    pub fn driver(mut self, driver: DriverKind) -> Self {
        self.config.driver = driver;
        self
    }

    /// Set the cache root directory
    pub fn directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.directory = path.into();
        self
    }

    /// Set the key segment separator
    pub fn key_separator(mut self, separator: impl Into<String>) -> Self {
        self.config.key_separator = separator.into();
        self
    }

    /// Set the remote server address (host:port)
    pub fn remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.remote_addr = addr.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
