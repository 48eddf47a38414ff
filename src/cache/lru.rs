//! LRU cache with per-entry TTL
//!
//! All state sits behind one mutex shared with the sweeper thread.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use generational_arena::Index;
use parking_lot::Mutex;

use crate::error::{Result, SkipKvError};

use super::recency::RecencyList;
use super::sweeper::Sweeper;

/// Counters describing cache activity since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// `get` calls that returned a live value
    pub hits: u64,

    /// `get` calls that found nothing or an expired entry
    pub misses: u64,

    /// Entries dropped because `get` found them expired
    pub expired_on_read: u64,

    /// Entries dropped by `sweep`
    pub expired_by_sweep: u64,

    /// Entries dropped to stay within capacity
    pub evicted: u64,
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    /// `None` when `now + ttl` is not representable; such entries never expire
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if now > at)
    }
}

#[derive(Debug)]
struct Tracked<V> {
    entry: CacheEntry<V>,
    position: Index,
}

/// Map plus recency ordering. Every key is in both or neither.
#[derive(Debug)]
struct CacheState<K, V> {
    capacity: usize,
    map: HashMap<K, Tracked<V>>,
    order: RecencyList<K>,
    stats: CacheStats,
}

impl<K, V> CacheState<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            order: RecencyList::new(),
            stats: CacheStats::default(),
        }
    }

    fn put(&mut self, key: K, value: V, ttl: Duration) {
        let expires_at = Instant::now().checked_add(ttl);

        if let Some(old) = self.map.remove(&key) {
            self.order.remove(old.position);
        }

        let position = self.order.push_front(key.clone());
        self.map.insert(
            key,
            Tracked {
                entry: CacheEntry { value, expires_at },
                position,
            },
        );

        // Capacity wins over TTL: the tail goes even if it is still live
        if self.map.len() > self.capacity {
            if let Some(victim) = self.order.pop_back() {
                self.map.remove(&victim);
                self.stats.evicted += 1;
            }
        }
    }

    fn get(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();

        let expired = match self.map.get(key) {
            None => {
                self.stats.misses += 1;
                return None;
            }
            Some(tracked) => tracked.entry.is_expired(now),
        };

        if expired {
            if let Some(tracked) = self.map.remove(key) {
                self.order.remove(tracked.position);
            }
            self.stats.expired_on_read += 1;
            self.stats.misses += 1;
            return None;
        }

        let tracked = self.map.get(key)?;
        self.order.move_to_front(tracked.position);
        self.stats.hits += 1;
        Some(tracked.entry.value.clone())
    }

    fn erase(&mut self, key: &K) -> bool {
        match self.map.remove(key) {
            Some(tracked) => {
                self.order.remove(tracked.position);
                true
            }
            None => false,
        }
    }

    fn sweep(&mut self, now: Instant) -> usize {
        let order = &mut self.order;
        let before = self.map.len();

        self.map.retain(|_, tracked| {
            if tracked.entry.is_expired(now) {
                order.remove(tracked.position);
                false
            } else {
                true
            }
        });

        let removed = before - self.map.len();
        self.stats.expired_by_sweep += removed as u64;
        removed
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

/// Bounded recency cache whose entries also carry an absolute expiry
///
/// ## Enforcement
/// - `put` enforces capacity eagerly (evicts the least recently used entry)
/// - `get` enforces TTL lazily (an expired hit is removed and reported absent)
/// - a background sweeper enforces TTL proactively every `sweep_interval`
///
/// The sweeper thread lives exactly as long as the cache; dropping the cache
/// stops and joins it.
pub struct LruTtlCache<K, V> {
    /// Declared first so it is joined before `state` is released
    sweeper: Sweeper,

    state: Arc<Mutex<CacheState<K, V>>>,

    capacity: usize,
}

impl<K, V> LruTtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    const SWEEPER_THREAD_NAME: &'static str = "skipkv-cache-sweeper";

    /// Create a cache and start its sweeper
    pub fn new(capacity: usize, sweep_interval: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(SkipKvError::Config(
                "cache capacity must be at least 1".to_string(),
            ));
        }
        if sweep_interval.is_zero() {
            return Err(SkipKvError::Config(
                "cache sweep interval must be non-zero".to_string(),
            ));
        }

        let state = Arc::new(Mutex::new(CacheState::new(capacity)));

        let shared = Arc::clone(&state);
        let sweeper = Sweeper::spawn(Self::SWEEPER_THREAD_NAME, sweep_interval, move || {
            let removed = shared.lock().sweep(Instant::now());
            if removed > 0 {
                tracing::debug!("Cache sweep removed {} expired entries", removed);
            }
        })?;

        Ok(Self {
            sweeper,
            state,
            capacity,
        })
    }

    /// Insert or replace a value that expires `ttl` from now
    pub fn put(&self, key: K, value: V, ttl: Duration) {
        self.state.lock().put(key, value, ttl);
    }

    /// Fetch a live value and mark it most recently used
    pub fn get(&self, key: &K) -> Option<V> {
        self.state.lock().get(key)
    }

    /// Remove a key. Returns whether it was present.
    pub fn erase(&self, key: &K) -> bool {
        self.state.lock().erase(key)
    }

    /// Remove every expired entry now; returns how many were dropped
    pub fn sweep(&self) -> usize {
        self.state.lock().sweep(Instant::now())
    }

    /// Drop every entry (statistics are kept)
    pub fn clear(&self) {
        self.state.lock().clear();
    }

    /// Number of entries, including expired ones not yet removed
    pub fn len(&self) -> usize {
        self.state.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tracked keys from most to least recently used
    pub fn keys(&self) -> Vec<K> {
        self.state.lock().order.keys().into_iter().cloned().collect()
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Stop the sweeper early. The cache keeps working; expiry then relies
    /// on `get` and explicit `sweep` calls.
    pub fn stop_sweeper(&mut self) {
        self.sweeper.stop();
    }
}
