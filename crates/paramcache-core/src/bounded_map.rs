//! Capacity-bounded concurrent map with approximate FIFO eviction.
//!
//! ## Design
//!
//! - **Storage**: `DashMap` sharded by the configured concurrency level
//! - **Tracking**: a FIFO of keys behind a `parking_lot::Mutex`, kept only
//!   when a capacity is set
//! - **Eviction**: before every write into a full map, the oldest tracked
//!   keys other than the one being written are dropped until the map is
//!   below capacity
//!
//! ## Consistency
//!
//! The map and its tracking queue are separate structures and are not
//! mutated atomically together. Under concurrent writers the entry count may
//! briefly exceed or fall below the capacity; the next insert corrects an
//! overshoot. The queue may hold keys that are no longer in the map
//! ("ghost keys"); eviction skips over them.

use std::borrow::Borrow;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::num::NonZeroUsize;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;

use crate::options::{DEFAULT_CONCURRENCY_LEVEL, shard_amount_for};
use crate::stats::{CacheStatistics, CacheStatsSnapshot};

/// Insertion-ordered key queue with O(1) membership checks.
struct Tracking<K> {
    order: VecDeque<K>,
    members: HashSet<K>,
}

impl<K: Eq + Hash + Clone> Tracking<K> {
    fn new() -> Self {
        Self {
            order: VecDeque::new(),
            members: HashSet::new(),
        }
    }

    /// Append `key` unless it is already queued.
    fn track(&mut self, key: K) {
        if self.members.insert(key.clone()) {
            self.order.push_back(key);
        }
    }

    fn pop_oldest(&mut self) -> Option<K> {
        let key = self.order.pop_front()?;
        self.members.remove(&key);
        Some(key)
    }

    /// Drop every occurrence of `key`.
    fn forget<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.members.remove(key) {
            self.order.retain(|k| Borrow::<Q>::borrow(k) != key);
        }
    }

    fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// Thread-safe key/value store with an optional maximum size.
///
/// Writes follow two policies: [`try_add`](Self::try_add) never overwrites an
/// existing key (first write wins) while [`add_or_update`](Self::add_or_update)
/// always does (last write wins).
///
/// ```
/// use paramcache_core::BoundedMap;
///
/// let map = BoundedMap::with_capacity(2);
/// map.try_add(1, "a");
/// map.try_add(2, "b");
/// map.try_add(3, "c");
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.get(&3), Some("c"));
/// ```
pub struct BoundedMap<K, V> {
    entries: DashMap<K, V>,
    tracking: Option<Mutex<Tracking<K>>>,
    capacity: Option<NonZeroUsize>,
    stats: CacheStatistics,
}

impl<K, V> std::fmt::Debug for BoundedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedMap")
            .field("capacity", &self.capacity)
            .field("size", &self.entries.len())
            .field(
                "tracked",
                &self.tracking.as_ref().map(|t| t.lock().len()),
            )
            .finish()
    }
}

impl<K, V> Default for BoundedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BoundedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an unbounded map.
    pub fn new() -> Self {
        Self::with_options(None, DEFAULT_CONCURRENCY_LEVEL)
    }

    /// Create a map holding at most `capacity` entries.
    ///
    /// A zero capacity yields an unbounded map.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(NonZeroUsize::new(capacity), DEFAULT_CONCURRENCY_LEVEL)
    }

    /// Create a map with an optional capacity and a shard hint.
    pub fn with_options(capacity: Option<NonZeroUsize>, concurrency_level: usize) -> Self {
        let shards = shard_amount_for(concurrency_level);
        let entries = match capacity {
            Some(cap) => DashMap::with_capacity_and_shard_amount(cap.get(), shards),
            None => DashMap::with_shard_amount(shards),
        };

        Self {
            entries,
            tracking: capacity.map(|_| Mutex::new(Tracking::new())),
            capacity,
            stats: CacheStatistics::default(),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity.map(NonZeroUsize::get)
    }

    /// Insert `value` under `key` unless the key is already present.
    ///
    /// Returns `true` when the value was inserted.
    pub fn try_add(&self, key: K, value: V) -> bool {
        self.make_room(&key);

        let tracked = self.tracking.is_some().then(|| key.clone());
        let inserted = match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        };

        if inserted {
            self.stats.record_insertion();
        }
        if let Some(key) = tracked {
            self.track(key);
        }
        inserted
    }

    /// Insert or overwrite the value under `key`.
    ///
    /// Returns the value previously stored under `key`, if any.
    pub fn add_or_update(&self, key: K, value: V) -> Option<V> {
        self.make_room(&key);

        let tracked = self.tracking.is_some().then(|| key.clone());
        let previous = self.entries.insert(key, value);

        if previous.is_some() {
            self.stats.record_update();
        } else {
            self.stats.record_insertion();
        }
        if let Some(key) = tracked {
            self.track(key);
        }
        previous
    }

    /// Get a copy of the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value().clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Remove `key` from the map and from the eviction queue.
    ///
    /// Removing an absent key is a no-op.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        // Forget before removing so a concurrent re-insert is never left untracked.
        if let Some(tracking) = &self.tracking {
            tracking.lock().forget(key);
        }

        let removed = self.entries.remove(key).map(|(_, value)| value);
        if removed.is_some() {
            self.stats.record_removal();
        }
        removed
    }

    /// Remove every entry.
    pub fn clear(&self) {
        if let Some(tracking) = &self.tracking {
            tracking.lock().clear();
        }
        self.entries.clear();
    }

    /// Current number of entries (approximate under concurrent writes).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the keys currently stored, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot(self.entries.len())
    }

    fn track(&self, key: K) {
        if let Some(tracking) = &self.tracking {
            tracking.lock().track(key);
        }
    }

    /// Evict the oldest tracked keys until there is room for `incoming`.
    ///
    /// Runs before every write, including writes to a key that is already
    /// present: a full map drops its oldest other key even on an update.
    ///
    /// The loop runs at most `size - capacity + 1` times and stops early once
    /// the queue is empty, so it terminates even when concurrent removals
    /// leave the queue shorter than the map.
    fn make_room(&self, incoming: &K) {
        let (Some(capacity), Some(tracking)) = (self.capacity, &self.tracking) else {
            return;
        };
        let capacity = capacity.get();

        let size = self.entries.len();
        if size < capacity {
            return;
        }

        let budget = size - capacity + 1;
        let mut evicted = 0usize;
        for _ in 0..budget {
            if self.entries.len() < capacity {
                break;
            }

            let Some(oldest) = tracking.lock().pop_oldest() else {
                break;
            };

            if &oldest == incoming {
                tracking.lock().track(oldest);
                continue;
            }

            if self.entries.remove(&oldest).is_some() {
                self.stats.record_eviction();
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::trace!(evicted, capacity, "evicted oldest cache entries");
        }
    }
}
