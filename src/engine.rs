//! Engine Module
//!
//! Binds the skip list index, the read cache and the dump format together.
//!
//! ## Responsibilities
//! - Serialize structural changes to the index
//! - Read through the cache, filling it on index hits
//! - Invalidate cached values on delete
//! - Dump and load the index

use std::fmt::Display;
use std::hash::Hash;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use parking_lot::RwLock;

use crate::cache::LruTtlCache;
use crate::config::Config;
use crate::error::Result;
use crate::persist::{self, LoadStats};
use crate::skiplist::{InsertStatus, SkipList};

/// The main engine
///
/// ## Concurrency Model
///
/// - **Index**: one `RwLock` per engine.
///   - insert/delete/load take the write side for the whole descent and
///     splice, update pointers included
///   - search and dump take the read side, so they never traverse a node
///     that a concurrent delete is releasing
///
/// - **Cache**: internal mutex, independent of the index lock. Cache calls
///   never take the index lock.
///
/// Lock order is always index → cache. search fills the cache while still
/// holding the read lock and delete erases while holding the write lock, so a
/// value deleted from the index cannot be re-cached by a search that read it
/// just before the delete.
pub struct Engine<K, V> {
    /// Engine configuration
    config: Config,

    /// Ordered index (owns every node)
    index: RwLock<SkipList<K, V>>,

    /// Read cache holding copies of index values
    cache: LruTtlCache<K, V>,
}

impl<K, V> Engine<K, V>
where
    K: Ord + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an engine with the given config
    ///
    /// The index starts empty; call `load` to restore a dump.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let index = match config.level_seed {
            Some(seed) => SkipList::with_seed(config.max_level, seed),
            None => SkipList::new(config.max_level),
        };
        let cache = LruTtlCache::new(config.cache_capacity, config.cache_sweep_interval)?;

        tracing::debug!(
            "Engine opened: max_level={}, cache_capacity={}, read_ttl={:?}",
            config.max_level,
            config.cache_capacity,
            config.read_ttl
        );

        Ok(Self {
            config,
            index: RwLock::new(index),
            cache,
        })
    }

    /// Insert a key/value pair; an existing key is left unchanged
    pub fn insert(&self, key: K, value: V) -> InsertStatus {
        let mut index = self.index.write();
        let status = index.insert(key, value);
        if status == InsertStatus::Inserted {
            tracing::trace!("Inserted key (len={}, level={})", index.len(), index.level());
        }
        status
    }

    /// Look up a key
    ///
    /// Search order:
    /// 1. Cache (a live hit returns without touching the index)
    /// 2. Index; a hit is copied into the cache with `read_ttl`
    pub fn search(&self, key: &K) -> Option<V> {
        if let Some(value) = self.cache.get(key) {
            tracing::trace!("Cache hit");
            return Some(value);
        }

        let index = self.index.read();
        let value = index.get(key)?.clone();
        self.cache.put(key.clone(), value.clone(), self.config.read_ttl);
        tracing::trace!("Index hit, cached for {:?}", self.config.read_ttl);
        Some(value)
    }

    /// Delete a key and drop any cached copy
    ///
    /// Returns whether the key was present. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &K) -> bool {
        let mut index = self.index.write();
        match index.remove(key) {
            Some(_) => {
                self.cache.erase(key);
                tracing::trace!("Deleted key (len={}, level={})", index.len(), index.level());
                true
            }
            None => false,
        }
    }

    /// Number of live entries
    pub fn size(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Current highest active level of the index
    pub fn level(&self) -> usize {
        self.index.read().level()
    }

    /// Snapshot of every entry in ascending key order
    pub fn entries(&self) -> Vec<(K, V)> {
        self.index
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Read-lock the index and write its entries to `writer`
    pub fn dump_to<W: Write>(&self, writer: &mut W) -> Result<usize>
    where
        K: Display,
        V: Display,
    {
        let index = self.index.read();
        persist::write_entries(writer, index.iter(), &self.config.delimiter)
    }

    /// Replay lines from `reader` through insert
    pub fn load_from<R: BufRead>(&self, reader: R) -> Result<LoadStats>
    where
        K: FromStr,
        K::Err: Display,
        V: FromStr,
        V::Err: Display,
    {
        let mut index = self.index.write();
        persist::read_entries(reader, &self.config.delimiter, |key: K, value: V| {
            index.insert(key, value) == InsertStatus::Inserted
        })
    }

    /// Dump to an explicit path, returning the number of lines written
    pub fn dump_to_path(&self, path: &Path) -> Result<usize>
    where
        K: Display,
        V: Display,
    {
        let mut writer = persist::create_dump_file(path)?;
        let written = self.dump_to(&mut writer)?;
        tracing::info!("Dumped {} entries to {}", written, path.display());
        Ok(written)
    }

    /// Load from an explicit path
    pub fn load_from_path(&self, path: &Path) -> Result<LoadStats>
    where
        K: FromStr,
        K::Err: Display,
        V: FromStr,
        V::Err: Display,
    {
        let reader = persist::open_dump_file(path)?;
        let stats = self.load_from(reader)?;
        tracing::info!(
            "Loaded {} lines from {}: {} inserted, {} duplicate, {} skipped",
            stats.lines_read,
            path.display(),
            stats.inserted,
            stats.duplicates,
            stats.skipped
        );
        Ok(stats)
    }

    /// Dump to `Config::store_path`
    pub fn dump(&self) -> Result<usize>
    where
        K: Display,
        V: Display,
    {
        self.dump_to_path(&self.config.store_path)
    }

    /// Load from `Config::store_path`
    pub fn load(&self) -> Result<LoadStats>
    where
        K: FromStr,
        K::Err: Display,
        V: FromStr,
        V::Err: Display,
    {
        self.load_from_path(&self.config.store_path)
    }

    /// Diagnostic rendering of every level's chain
    pub fn display(&self) -> String
    where
        K: Display,
        V: Display,
    {
        self.index.read().render(&self.config.delimiter)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// The read cache
    pub fn cache(&self) -> &LruTtlCache<K, V> {
        &self.cache
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
