//! Value-level cache API over a bounded map.
//!
//! A [`CacheEngine`] pairs one [`KeyStrategy`] with a [`BoundedMap`]. Each
//! operation derives the key from the parameter value and forwards to the
//! map. The field descriptor list of the parameter type and the ignored
//! field set are fixed when the engine is built.
//!
//! ```
//! use paramcache_core::{CacheOptions, FastCache};
//!
//! let cache: FastCache<u32, String> = FastCache::with_options(
//!     CacheOptions::default().with_capacity(100),
//! );
//! cache.try_add(&7, "seven".to_string());
//!
//! assert_eq!(cache.get(&7).as_deref(), Some("seven"));
//! assert_eq!(cache.count(), 1);
//! ```

use std::any::type_name;

use crate::bounded_map::BoundedMap;
use crate::key::{
    CacheParams, ContentDigestKey, FastNumericKey, FieldDescriptor, KeyStrategy, ParamKind,
};
use crate::options::CacheOptions;
use crate::stats::CacheStatsSnapshot;

/// Cache operations keyed by parameter values.
///
/// Implemented by [`CacheEngine`]; cache-aside helpers in
/// [`aside`](crate::aside) accept any implementation, including trait
/// objects.
pub trait ParamCache<P, V>: Send + Sync {
    /// Stored value for `params`, or `None` when absent.
    fn get(&self, params: &P) -> Option<V>;

    /// Store `value` unless a value is already cached for `params`.
    fn try_add(&self, params: &P, value: V) -> bool;

    /// Store `value`, replacing any cached value for `params`.
    fn add_or_update(&self, params: &P, value: V);

    fn remove(&self, params: &P);

    fn clear_all(&self);

    fn count(&self) -> usize;

    /// [`try_add`](Self::try_add) for optional values; `None` is never stored.
    fn try_add_optional(&self, params: &P, value: Option<V>) -> bool {
        match value {
            Some(value) => self.try_add(params, value),
            None => false,
        }
    }

    /// [`add_or_update`](Self::add_or_update) for optional values; `None` is never stored.
    fn add_or_update_optional(&self, params: &P, value: Option<V>) {
        if let Some(value) = value {
            self.add_or_update(params, value);
        }
    }
}

/// Process-local cache keyed by [`FastNumericKey`].
pub type FastCache<P, V> = CacheEngine<P, V, FastNumericKey>;

/// Cache keyed by [`ContentDigestKey`], stable across processes.
pub type SharedCache<P, V> = CacheEngine<P, V, ContentDigestKey>;

/// Bounded concurrent cache from parameter values of type `P` to `V`.
pub struct CacheEngine<P, V, S: KeyStrategy = FastNumericKey> {
    map: BoundedMap<S::Key, V>,
    fields: Vec<FieldDescriptor<P>>,
    strategy: S,
    options: CacheOptions,
}

impl<P, V, S: KeyStrategy> std::fmt::Debug for CacheEngine<P, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEngine")
            .field("param_type", &type_name::<P>())
            .field("strategy", &type_name::<S>())
            .field("fields", &self.field_names())
            .field("map", &self.map)
            .finish()
    }
}

impl<P, V, S> Default for CacheEngine<P, V, S>
where
    P: CacheParams,
    S: KeyStrategy + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, V, S> CacheEngine<P, V, S>
where
    P: CacheParams,
    S: KeyStrategy + Default,
{
    /// Create an unbounded engine with default options.
    pub fn new() -> Self {
        Self::with_options(CacheOptions::default())
    }

    /// Create an engine holding at most `capacity` entries.
    pub fn bounded(capacity: usize) -> Self {
        Self::with_options(CacheOptions::default().with_capacity(capacity))
    }

    pub fn with_options(options: CacheOptions) -> Self {
        Self::with_strategy(S::default(), options)
    }
}

impl<P, V, S> CacheEngine<P, V, S>
where
    P: CacheParams,
    S: KeyStrategy,
{
    /// Create an engine with an explicit key strategy.
    ///
    /// Resolves the field descriptors of `P` once and drops the ignored ones.
    pub fn with_strategy(strategy: S, options: CacheOptions) -> Self {
        let declared = P::fields();

        for ignored in &options.ignored_fields {
            if !declared.iter().any(|field| field.name() == ignored.as_str()) {
                tracing::debug!(
                    param_type = type_name::<P>(),
                    field = %ignored,
                    "ignored field does not match any parameter field"
                );
            }
        }

        let fields: Vec<FieldDescriptor<P>> = declared
            .into_iter()
            .filter(|field| !options.is_ignored(field.name()))
            .collect();

        if P::KIND == ParamKind::Composite && fields.is_empty() {
            tracing::warn!(
                param_type = type_name::<P>(),
                "parameter type has no key fields; every value maps to the same cache entry"
            );
        }

        tracing::debug!(
            param_type = type_name::<P>(),
            strategy = type_name::<S>(),
            capacity = ?options.capacity,
            fields = fields.len(),
            "cache engine created"
        );

        Self {
            map: BoundedMap::with_options(options.capacity, options.concurrency_level),
            fields,
            strategy,
            options,
        }
    }

    /// Key derived for `params`.
    pub fn key_for(&self, params: &P) -> S::Key {
        self.strategy.derive(params, &self.fields)
    }

    /// Stored value for `params`, or `None` when absent.
    pub fn get(&self, params: &P) -> Option<V>
    where
        V: Clone,
    {
        self.map.get(&self.key_for(params))
    }

    /// Store `value` unless a value is already cached for `params`.
    ///
    /// Returns `true` when the value was stored.
    pub fn try_add(&self, params: &P, value: V) -> bool {
        self.map.try_add(self.key_for(params), value)
    }

    /// Store `value`, replacing any cached value for `params`.
    pub fn add_or_update(&self, params: &P, value: V) {
        self.map.add_or_update(self.key_for(params), value);
    }

    pub fn remove(&self, params: &P) {
        self.map.remove(&self.key_for(params));
    }

    pub fn clear_all(&self) {
        self.map.clear();
        tracing::debug!(param_type = type_name::<P>(), "cleared cache");
    }

    /// Number of cached entries (approximate under concurrent writes).
    pub fn count(&self) -> usize {
        self.map.len()
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.map.stats()
    }
}

impl<P, V, S: KeyStrategy> CacheEngine<P, V, S> {
    /// Names of the fields that take part in key derivation.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(FieldDescriptor::name).collect()
    }
}

impl<P, V, S> ParamCache<P, V> for CacheEngine<P, V, S>
where
    P: CacheParams,
    V: Clone + Send + Sync,
    S: KeyStrategy,
{
    fn get(&self, params: &P) -> Option<V> {
        CacheEngine::get(self, params)
    }

    fn try_add(&self, params: &P, value: V) -> bool {
        CacheEngine::try_add(self, params, value)
    }

    fn add_or_update(&self, params: &P, value: V) {
        CacheEngine::add_or_update(self, params, value)
    }

    fn remove(&self, params: &P) {
        CacheEngine::remove(self, params)
    }

    fn clear_all(&self) {
        CacheEngine::clear_all(self)
    }

    fn count(&self) -> usize {
        CacheEngine::count(self)
    }
}
