//! Generation Store Module
//!
//! Two insertion-ordered maps ("current" and "previous") that approximate
//! LRU order at generation granularity instead of per-access reordering.
//!
//! New and re-written keys always land at the back of `current`. When
//! `current` fills up to capacity it rolls over: `previous` is retired
//! wholesale and `current` takes its place. Recency is therefore tracked in
//! capacity-sized batches, which keeps every point operation O(1) amortized
//! without a linked-list-per-entry structure.

use std::fmt;
use std::hash::Hash;
use std::mem;

use hashlink::LinkedHashMap;

// == Generations ==
/// The two-generation ordered store underlying the cache.
///
/// Invariants (hold after every public method returns):
/// - `current.len() <= capacity` and `previous.len() <= capacity`
/// - a key is present in at most one generation
pub struct Generations<K, V> {
    /// Most recent generation; insertion order = recency order
    current: LinkedHashMap<K, V>,
    /// Older generation, retired wholesale on rollover
    previous: LinkedHashMap<K, V>,
    /// Maximum entries per generation
    capacity: usize,
}

impl<K: Eq + Hash, V> Generations<K, V> {
    // == Constructor ==
    /// Creates an empty store bounding each generation to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            current: LinkedHashMap::new(),
            previous: LinkedHashMap::new(),
            capacity,
        }
    }

    // == Capacity ==
    /// Returns the per-generation capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Insert ==
    /// Inserts a key at the most-recent position of `current`.
    ///
    /// An existing copy is physically removed first: an overwrite in
    /// `current` is re-inserted at the back, a copy in `previous` is pulled
    /// forward. If the insert brings `current` up to capacity, the store
    /// rolls over and the retired `previous` generation is returned so the
    /// caller can report its entries as evicted, in insertion order.
    ///
    /// Overwriting a key already in `current` never changes the entry count
    /// and therefore never triggers a rollover.
    pub fn insert(&mut self, key: K, value: V) -> Option<LinkedHashMap<K, V>> {
        if self.current.remove(&key).is_some() {
            self.current.insert(key, value);
            return None;
        }

        self.previous.remove(&key);
        self.current.insert(key, value);
        self.rollover_if_full()
    }

    // == Promote ==
    /// Moves a key from `previous` to the most-recent position of `current`.
    ///
    /// The value (and any metadata it carries) moves unchanged; promotion
    /// refreshes recency, nothing else. Returns the retired generation if
    /// the promotion filled `current` and forced a rollover, and `None` if
    /// no rollover happened or the key was not in `previous`.
    pub fn promote(&mut self, key: &K) -> Option<LinkedHashMap<K, V>> {
        if let Some((key, value)) = self.previous.remove_entry(key) {
            self.current.insert(key, value);
            return self.rollover_if_full();
        }

        None
    }

    // == Rollover ==
    /// Retires `previous` and replaces it with `current` once `current`
    /// reaches capacity. The retired generation is handed back for eviction
    /// reporting.
    fn rollover_if_full(&mut self) -> Option<LinkedHashMap<K, V>> {
        if self.current.len() < self.capacity {
            return None;
        }

        let filled = mem::replace(&mut self.current, LinkedHashMap::new());
        let retired = mem::replace(&mut self.previous, filled);
        Some(retired)
    }

    // == Lookup ==
    /// Returns a reference to the value for `key`, wherever it lives.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.current.get(key).or_else(|| self.previous.get(key))
    }

    /// Checks whether `key` is held by either generation.
    pub fn contains_key(&self, key: &K) -> bool {
        self.current.contains_key(key) || self.previous.contains_key(key)
    }

    /// Checks whether `key` is held by the `previous` generation.
    pub fn in_previous(&self, key: &K) -> bool {
        self.previous.contains_key(key)
    }

    // == Remove ==
    /// Removes `key` from whichever generation holds it.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.current
            .remove(key)
            .or_else(|| self.previous.remove(key))
    }

    /// Removes `key` and returns the owned pair, for eviction reporting.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.current
            .remove_entry(key)
            .or_else(|| self.previous.remove_entry(key))
    }

    // == Clear ==
    /// Empties both generations.
    pub fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
    }

    // == Length ==
    /// Returns the total number of stored entries across both generations.
    pub fn len(&self) -> usize {
        self.current.len() + self.previous.len()
    }

    /// Returns true if both generations are empty.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.previous.is_empty()
    }

    /// Returns `(current.len(), previous.len())`.
    pub fn generation_sizes(&self) -> (usize, usize) {
        (self.current.len(), self.previous.len())
    }

    // == Resize ==
    /// Rebuilds the store with a new per-generation capacity.
    ///
    /// All entries are collected oldest-first; the oldest entries in excess
    /// of `capacity` are returned (in that order) for eviction reporting.
    /// When everything fits strictly below the new capacity the retained
    /// entries seed `current`; otherwise they seed `previous` with `current`
    /// left empty, so the next insert cannot overfill a generation.
    pub fn resize(&mut self, capacity: usize) -> Vec<(K, V)> {
        let total = self.len();
        let previous = mem::replace(&mut self.previous, LinkedHashMap::new());
        let current = mem::replace(&mut self.current, LinkedHashMap::new());

        let mut evicted: Vec<(K, V)> = Vec::with_capacity(total);
        evicted.extend(previous);
        evicted.extend(current);

        let retained = evicted.split_off(total.saturating_sub(capacity));
        if total < capacity {
            for (key, value) in retained {
                self.current.insert(key, value);
            }
        } else {
            for (key, value) in retained {
                self.previous.insert(key, value);
            }
        }

        self.capacity = capacity;
        evicted
    }

    // == Enumeration ==
    /// Iterates all entries oldest-first: `previous` in insertion order,
    /// then `current`. A key shadowed by a copy in `current` is yielded
    /// only from `current`, at its promoted position.
    pub fn iter_ascending(&self) -> impl Iterator<Item = (&K, &V)> {
        self.previous
            .iter()
            .filter(|(key, _)| !self.current.contains_key(*key))
            .chain(self.current.iter())
    }

    /// Iterates all entries newest-first: the exact reverse of
    /// [`iter_ascending`](Self::iter_ascending).
    pub fn iter_descending(&self) -> impl Iterator<Item = (&K, &V)> {
        self.current.iter().rev().chain(
            self.previous
                .iter()
                .rev()
                .filter(|(key, _)| !self.current.contains_key(*key)),
        )
    }
}

impl<K: Eq + Hash, V> fmt::Debug for Generations<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generations")
            .field("current_len", &self.current.len())
            .field("previous_len", &self.previous.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
