//! Bounded concurrent parameter cache.
//!
//! Results of expensive calls are stored under a key derived from the call's
//! parameter value:
//!
//! - [`BoundedMap`]: thread-safe map with an optional soft capacity and
//!   insertion-order eviction
//! - [`key`]: parameter description ([`CacheParams`]) and the two key
//!   strategies, [`FastNumericKey`] and [`ContentDigestKey`]
//! - [`CacheEngine`]: parameter-keyed cache over a bounded map, usable as
//!   `dyn` [`ParamCache`]
//! - [`aside`]: cache-aside helpers calling a producer on a miss
//!
//! ```
//! use paramcache_core::{CacheOptions, SharedCache, aside};
//!
//! let cache = SharedCache::<String, usize>::with_options(CacheOptions::default().with_capacity(128));
//! let len = aside::get_or_compute(&cache, &"hello".to_string(), |s| Some(s.len()), true);
//!
//! assert_eq!(len, Some(5));
//! assert_eq!(cache.count(), 1);
//! ```

pub mod aside;
pub mod bounded_map;
pub mod engine;
pub mod error;
pub mod key;
pub mod options;
pub mod stats;

pub use bounded_map::BoundedMap;
pub use engine::{CacheEngine, FastCache, ParamCache, SharedCache};
pub use error::{CacheError, Result};
pub use key::{
    AsFieldValue, CacheParams, ContentDigestKey, DigestKey, FastNumericKey, FieldDescriptor,
    FieldValue, KeyStrategy, ParamKind,
};
pub use options::{CacheOptions, DEFAULT_CONCURRENCY_LEVEL};
pub use stats::{CacheStatistics, CacheStatsSnapshot};
