//! Counters for cache monitoring.

use std::sync::atomic::{AtomicU64, Ordering};

/// Cache statistics for monitoring.
///
/// Counters are updated with relaxed ordering; a snapshot taken while other
/// threads mutate the cache is approximate.
#[derive(Debug, Default)]
pub struct CacheStatistics {
    /// Number of lookups that found a value
    pub hits: AtomicU64,
    /// Number of lookups that found nothing
    pub misses: AtomicU64,
    /// Number of new keys written
    pub insertions: AtomicU64,
    /// Number of existing keys overwritten
    pub updates: AtomicU64,
    /// Number of entries dropped to make room
    pub evictions: AtomicU64,
    /// Number of entries removed explicitly
    pub removals: AtomicU64,
}

impl CacheStatistics {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insertion(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    /// Calculate hit ratio.
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let misses = self.misses.load(Ordering::Relaxed) as f64;
        let total = hits + misses;

        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self, size: usize) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            size,
            hit_ratio: self.hit_ratio(),
        }
    }
}

/// A point-in-time snapshot of cache statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub updates: u64,
    pub evictions: u64,
    pub removals: u64,
    pub size: usize,
    pub hit_ratio: f64,
}
