//! Configuration for routegrid
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, RouteError};

/// Main configuration for a routegrid datastore
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the database file
    /// Internal structure:
    ///   {data_dir}/
    ///     └── routes.redb      (routes + maps tables)
    pub data_dir: PathBuf,

    /// Page cache size handed to the embedded store (in bytes)
    pub cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./routegrid_data"),
            cache_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the page cache size (in bytes)
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.config.cache_size = bytes;
        self
    }

    /// Set the page cache size in megabytes
    ///
    /// Fails with `RouteError::Config` when the byte count overflows `usize`.
    pub fn cache_size_mb(self, megabytes: usize) -> Result<Self> {
        let bytes = megabytes.checked_mul(1024 * 1024).ok_or_else(|| {
            RouteError::Config(format!("cache size of {} MB is too large", megabytes))
        })?;
        Ok(self.cache_size(bytes))
    }

    pub fn build(self) -> Config {
        self.config
    }
}
