//! Configuration for SkipKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SkipKvError};

/// Highest level a skip list may be configured with.
pub const MAX_LEVEL_LIMIT: usize = 63;

/// Main configuration for a SkipKV engine
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Highest level a node may be assigned (levels are 0-based, so a node
    /// links into at most `max_level + 1` chains)
    pub max_level: usize,

    /// Seed for level assignment. `None` seeds from OS entropy.
    pub level_seed: Option<u64>,

    // -------------------------------------------------------------------------
    // Cache Configuration
    // -------------------------------------------------------------------------
    /// Maximum number of entries held by the read cache
    pub cache_capacity: usize,

    /// How often the background sweeper drops expired cache entries
    pub cache_sweep_interval: Duration,

    /// TTL given to values copied into the cache by a read-through search
    pub read_ttl: Duration,

    // -------------------------------------------------------------------------
    // Persistence Configuration
    // -------------------------------------------------------------------------
    /// File used by `Engine::dump` and `Engine::load`
    pub store_path: PathBuf,

    /// Separator between key and value on each dumped line
    pub delimiter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_level: 12,
            level_seed: None,
            cache_capacity: 100,
            cache_sweep_interval: Duration::from_secs(10),
            read_ttl: Duration::from_secs(5),
            store_path: PathBuf::from("store/dumpFile"),
            delimiter: ":".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the values that would otherwise break the engine at runtime
    pub fn validate(&self) -> Result<()> {
        if self.max_level > MAX_LEVEL_LIMIT {
            return Err(SkipKvError::Config(format!(
                "max_level {} exceeds limit {}",
                self.max_level, MAX_LEVEL_LIMIT
            )));
        }
        if self.cache_capacity == 0 {
            return Err(SkipKvError::Config(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.cache_sweep_interval.is_zero() {
            return Err(SkipKvError::Config(
                "cache_sweep_interval must be non-zero".to_string(),
            ));
        }
        if self.delimiter.is_empty() {
            return Err(SkipKvError::Config("delimiter must not be empty".to_string()));
        }
        if self.delimiter.contains('\n') || self.delimiter.contains('\r') {
            return Err(SkipKvError::Config(
                "delimiter must not contain a line break".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the highest level a node may reach
    pub fn max_level(mut self, level: usize) -> Self {
        self.config.max_level = level;
        self
    }

    /// Seed level assignment for reproducible layouts
    pub fn level_seed(mut self, seed: u64) -> Self {
        self.config.level_seed = Some(seed);
        self
    }

    /// Set the read cache capacity (entries)
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Set the background sweep period
    pub fn cache_sweep_interval(mut self, interval: Duration) -> Self {
        self.config.cache_sweep_interval = interval;
        self
    }

    /// Set the TTL used when a search populates the cache
    pub fn read_ttl(mut self, ttl: Duration) -> Self {
        self.config.read_ttl = ttl;
        self
    }

    /// Set the dump/load file path
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_path = path.into();
        self
    }

    /// Set the key/value delimiter for the dump format
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.delimiter = delimiter.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
