//! Cache Store Module
//!
//! Main cache engine combining the two-generation store with lazy TTL
//! expiration and eviction notification.

use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, Generations};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Eviction Listener ==
/// Callback invoked with each involuntarily removed entry.
///
/// Fired for generation rollover, resize shrinkage, and lazy TTL expiry,
/// but never for explicit [`remove`](CacheStore::remove) or
/// [`clear`](CacheStore::clear). The listener runs synchronously inside the
/// operation that triggered the eviction; a panic in the listener propagates
/// to that operation's caller.
pub type EvictionListener<K, V> = Box<dyn FnMut(K, V)>;

// == Cache Store ==
/// Bounded key/value cache with approximate LRU eviction and TTL support.
///
/// Recency is tracked at the granularity of two generations rather than per
/// access, which keeps every operation O(1) amortized. `max_size` bounds
/// each generation, so the reported [`len`](Self::len) can transiently reach
/// `2 * max_size - 1`.
///
/// Expiry is checked lazily on `get`/`peek`/`contains_key`; there is no
/// background sweep, so an expired entry that is never touched again stays
/// counted until a rollover or resize discards it.
///
/// Not safe for unsynchronized concurrent mutation; wrap in a mutex if
/// shared across threads.
pub struct CacheStore<K, V> {
    /// Two-generation ordered storage
    generations: Generations<K, CacheEntry<V>>,
    /// Default TTL for entries stored without an explicit TTL
    max_age: Option<Duration>,
    /// Eviction notification callback, captured at construction
    on_eviction: Option<EvictionListener<K, V>>,
    /// Performance statistics
    stats: CacheStats,
}

impl<K: Eq + Hash, V> CacheStore<K, V> {
    // == Constructor ==
    /// Creates a new cache from the given configuration.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidArgument`] if the configuration fails
    /// [`CacheConfig::validate`].
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            generations: Generations::new(config.max_size),
            max_age: config.max_age,
            on_eviction: None,
            stats: CacheStats::new(),
        })
    }

    /// Creates a new cache that reports evicted entries to `listener`.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidArgument`] if the configuration fails
    /// [`CacheConfig::validate`].
    pub fn with_eviction_listener(
        config: CacheConfig,
        listener: impl FnMut(K, V) + 'static,
    ) -> Result<Self> {
        let mut store = Self::new(config)?;
        store.on_eviction = Some(Box::new(listener));
        Ok(store)
    }

    // == Set ==
    /// Stores a key-value pair with an optional per-entry TTL.
    ///
    /// Overwriting an existing key replaces its value, moves it to the
    /// most-recent position, and computes a fresh expiry from `ttl` or the
    /// cache-wide `max_age` (the old expiry is superseded). Inserting a new
    /// key may roll the generations over, evicting the entire `previous`
    /// generation through the eviction listener.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL overriding the cache-wide default
    pub fn set(&mut self, key: K, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, ttl.or(self.max_age));

        if let Some(retired) = self.generations.insert(key, entry) {
            debug!(count = retired.len(), "generation rollover");
            self.report_evicted(retired);
        }
    }

    // == Get ==
    /// Retrieves a value by key, refreshing its recency.
    ///
    /// A hit on the `previous` generation promotes the entry into `current`
    /// (possibly rolling the generations over). Reading never extends an
    /// entry's TTL; only `set` computes a fresh expiry. An expired entry is
    /// removed, reported to the eviction listener, and treated as absent.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.generations.contains_key(key) {
            self.stats.record_miss();
            return None;
        }

        if self.expire_if_needed(key) {
            self.stats.record_miss();
            return None;
        }

        if self.generations.in_previous(key) {
            trace!("promoting entry from previous generation");
            if let Some(retired) = self.generations.promote(key) {
                debug!(count = retired.len(), "generation rollover");
                self.report_evicted(retired);
            }
        }

        self.stats.record_hit();
        self.generations.get(key).map(|entry| &entry.value)
    }

    // == Peek ==
    /// Retrieves a value by key without touching its recency.
    ///
    /// Same expiry semantics as [`get`](Self::get), but generation
    /// membership is left unchanged and statistics are not updated.
    pub fn peek(&mut self, key: &K) -> Option<&V> {
        if !self.generations.contains_key(key) {
            return None;
        }

        if self.expire_if_needed(key) {
            return None;
        }

        self.generations.get(key).map(|entry| &entry.value)
    }

    // == Contains ==
    /// Checks whether an unexpired entry exists for `key`.
    ///
    /// Expiry is enforced as a side effect, exactly as in
    /// [`peek`](Self::peek).
    pub fn contains_key(&mut self, key: &K) -> bool {
        if !self.generations.contains_key(key) {
            return false;
        }

        !self.expire_if_needed(key)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if one was stored.
    ///
    /// Explicit removal is not an eviction: the listener is not invoked.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.generations.remove(key).map(|entry| entry.value)
    }

    // == Clear ==
    /// Empties the cache. Bulk discard, not eviction: no listener calls.
    pub fn clear(&mut self) {
        self.generations.clear();
    }

    // == Resize ==
    /// Changes the per-generation capacity to `max_size`.
    ///
    /// If the live entry count exceeds the new capacity, the oldest excess
    /// entries are evicted oldest-first through the listener. Growing the
    /// capacity evicts nothing and preserves entry order.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidArgument`] for a zero `max_size`; the
    /// cache is left unchanged.
    pub fn resize(&mut self, max_size: usize) -> Result<()> {
        if max_size < 1 {
            return Err(CacheError::InvalidArgument(
                "max_size must be at least 1".to_string(),
            ));
        }

        let evicted = self.generations.resize(max_size);
        if !evicted.is_empty() {
            debug!(
                count = evicted.len(),
                new_capacity = max_size,
                "resize evicted oldest entries"
            );
        }
        self.report_evicted(evicted);

        Ok(())
    }

    // == Length ==
    /// Returns the number of stored entries across both generations.
    ///
    /// Expired-but-unaccessed entries are still counted until they are
    /// removed by access, rollover, or resize.
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    // == Capacity ==
    /// Returns the current per-generation capacity.
    pub fn capacity(&self) -> usize {
        self.generations.capacity()
    }

    /// Returns the cache-wide default TTL, if any.
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Returns `(current, previous)` generation sizes, for diagnostics.
    pub fn generation_sizes(&self) -> (usize, usize) {
        self.generations.generation_sizes()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.generations.len());
        stats
    }

    // == Enumeration ==
    /// Iterates unexpired entries oldest-first.
    ///
    /// Entries from `previous` come first in insertion order, then entries
    /// from `current`. Each call starts a fresh traversal. Expired entries
    /// are skipped, not purged; they remain in place until an access or
    /// rollover removes them.
    pub fn entries_ascending(&self) -> impl Iterator<Item = (&K, &V)> {
        let now = Instant::now();
        self.generations
            .iter_ascending()
            .filter(move |(_, entry)| !entry.is_expired_at(now))
            .map(|(key, entry)| (key, &entry.value))
    }

    /// Iterates unexpired entries newest-first: the exact reverse of
    /// [`entries_ascending`](Self::entries_ascending).
    pub fn entries_descending(&self) -> impl Iterator<Item = (&K, &V)> {
        let now = Instant::now();
        self.generations
            .iter_descending()
            .filter(move |(_, entry)| !entry.is_expired_at(now))
            .map(|(key, entry)| (key, &entry.value))
    }

    /// Iterates unexpired key-value pairs oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries_ascending()
    }

    /// Iterates unexpired keys oldest-first.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries_ascending().map(|(key, _)| key)
    }

    /// Iterates unexpired values oldest-first.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries_ascending().map(|(_, value)| value)
    }

    // == Expiry Check ==
    /// Removes `key` if its entry has expired, reporting it to the eviction
    /// listener. Returns whether an expired entry was removed.
    fn expire_if_needed(&mut self, key: &K) -> bool {
        let expired = self
            .generations
            .get(key)
            .map(|entry| entry.is_expired())
            .unwrap_or(false);
        if !expired {
            return false;
        }

        if let Some((key, entry)) = self.generations.remove_entry(key) {
            trace!("entry expired on access");
            self.stats.record_expiration();
            if let Some(listener) = self.on_eviction.as_mut() {
                listener(key, entry.value);
            }
        }

        true
    }

    // == Eviction Reporting ==
    /// Counts and reports a batch of evicted entries, in iteration order.
    fn report_evicted(&mut self, entries: impl IntoIterator<Item = (K, CacheEntry<V>)>) {
        for (key, entry) in entries {
            self.stats.record_eviction();
            if let Some(listener) = self.on_eviction.as_mut() {
                listener(key, entry.value);
            }
        }
    }
}

impl<K: Eq + Hash, V> fmt::Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("generations", &self.generations)
            .field("max_age", &self.max_age)
            .field("has_eviction_listener", &self.on_eviction.is_some())
            .finish()
    }
}
