//! Construction options shared by every cache engine.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default shard hint, matching the historical default of the cache.
pub const DEFAULT_CONCURRENCY_LEVEL: usize = 50;

/// Options fixed when a cache engine is built.
///
/// ```
/// use paramcache_core::CacheOptions;
///
/// let options = CacheOptions::default()
///     .with_capacity(1000)
///     .ignore_field("request_id");
/// assert_eq!(options.capacity.map(|c| c.get()), Some(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Upper bound on the number of entries. Unbounded when `None`.
    #[serde(default)]
    pub capacity: Option<NonZeroUsize>,
    /// Field names excluded from composite key derivation
    #[serde(default)]
    pub ignored_fields: Vec<String>,
    /// Hint for the number of map shards
    #[serde(default = "default_concurrency_level")]
    pub concurrency_level: usize,
}

/// Shard count for a concurrency hint.
///
/// The map requires a power of two greater than one.
pub fn shard_amount_for(concurrency_level: usize) -> usize {
    concurrency_level.max(2).next_power_of_two()
}

fn default_concurrency_level() -> usize {
    DEFAULT_CONCURRENCY_LEVEL
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            capacity: None,
            ignored_fields: Vec::new(),
            concurrency_level: default_concurrency_level(),
        }
    }
}

impl CacheOptions {
    /// Bound the cache to `capacity` entries. A zero capacity leaves it unbounded.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = NonZeroUsize::new(capacity);
        self
    }

    /// Exclude a field from key derivation.
    pub fn ignore_field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.ignored_fields.contains(&name) {
            self.ignored_fields.push(name);
        }
        self
    }

    /// Exclude several fields from key derivation.
    pub fn ignore_fields<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |acc, name| acc.ignore_field(name))
    }

    pub fn with_concurrency_level(mut self, level: usize) -> Self {
        self.concurrency_level = level;
        self
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignored_fields.iter().any(|f| f == field)
    }

    /// Number of shards the backing map is created with.
    pub fn shard_amount(&self) -> usize {
        shard_amount_for(self.concurrency_level)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency_level == 0 {
            return Err(CacheError::invalid_option(
                "concurrency_level",
                "must be > 0",
            ));
        }
        if let Some(empty) = self.ignored_fields.iter().find(|f| f.trim().is_empty()) {
            return Err(CacheError::invalid_option(
                "ignored_fields",
                format!("field names must not be blank (got {empty:?})"),
            ));
        }
        Ok(())
    }
}
