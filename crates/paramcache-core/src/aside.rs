//! Cache-aside helpers.
//!
//! Each helper reads the cache for a parameter, falls back to a caller
//! supplied producer on a miss, and stores a produced value with
//! [`ParamCache::try_add`]. Produced `None` values are returned but never
//! stored. With caching disabled the producer always runs and the cache is
//! neither read nor written.
//!
//! There is no single-flight de-duplication: concurrent misses on the same
//! parameter each run the producer, and the first value stored wins.
//!
//! ```
//! use paramcache_core::{FastCache, aside};
//!
//! let cache = FastCache::<u64, u64>::new();
//! let square = aside::get_or_compute(&cache, &12, |n| Some(n * n), true);
//!
//! assert_eq!(square, Some(144));
//! assert_eq!(cache.get(&12), Some(144));
//! ```

use std::any::type_name;
use std::convert::Infallible;
use std::future::Future;

use crate::engine::ParamCache;

/// Read `params` from `cache`, computing and storing it on a miss.
pub fn get_or_compute<P, V, C, F>(
    cache: &C,
    params: &P,
    producer: F,
    caching_enabled: bool,
) -> Option<V>
where
    C: ParamCache<P, V> + ?Sized,
    F: FnOnce(&P) -> Option<V>,
    V: Clone,
{
    let result = try_get_or_compute(
        cache,
        params,
        |p| Ok::<_, Infallible>(producer(p)),
        caching_enabled,
    );
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Like [`get_or_compute`] for fallible producers.
///
/// A producer error is returned unchanged and leaves the cache untouched.
pub fn try_get_or_compute<P, V, C, F, E>(
    cache: &C,
    params: &P,
    producer: F,
    caching_enabled: bool,
) -> Result<Option<V>, E>
where
    C: ParamCache<P, V> + ?Sized,
    F: FnOnce(&P) -> Result<Option<V>, E>,
    V: Clone,
{
    if !caching_enabled {
        tracing::trace!(param_type = type_name::<P>(), "caching disabled, calling producer");
        return producer(params);
    }

    if let Some(hit) = cache.get(params) {
        tracing::trace!(param_type = type_name::<P>(), "cache hit");
        return Ok(Some(hit));
    }

    tracing::trace!(param_type = type_name::<P>(), "cache miss, calling producer");
    let produced = producer(params)?;
    if let Some(value) = &produced {
        cache.try_add(params, value.clone());
    }
    Ok(produced)
}

/// Async form of [`get_or_compute`]; suspends only while awaiting the producer.
pub async fn get_or_compute_async<P, V, C, F, Fut>(
    cache: &C,
    params: &P,
    producer: F,
    caching_enabled: bool,
) -> Option<V>
where
    C: ParamCache<P, V> + ?Sized,
    F: FnOnce(&P) -> Fut,
    Fut: Future<Output = Option<V>>,
    V: Clone,
{
    let result = try_get_or_compute_async(
        cache,
        params,
        |p| {
            let pending = producer(p);
            async move { Ok::<_, Infallible>(pending.await) }
        },
        caching_enabled,
    )
    .await;
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Async form of [`try_get_or_compute`].
pub async fn try_get_or_compute_async<P, V, C, F, Fut, E>(
    cache: &C,
    params: &P,
    producer: F,
    caching_enabled: bool,
) -> Result<Option<V>, E>
where
    C: ParamCache<P, V> + ?Sized,
    F: FnOnce(&P) -> Fut,
    Fut: Future<Output = Result<Option<V>, E>>,
    V: Clone,
{
    if !caching_enabled {
        tracing::trace!(param_type = type_name::<P>(), "caching disabled, awaiting producer");
        return producer(params).await;
    }

    if let Some(hit) = cache.get(params) {
        tracing::trace!(param_type = type_name::<P>(), "cache hit");
        return Ok(Some(hit));
    }

    tracing::trace!(param_type = type_name::<P>(), "cache miss, awaiting producer");
    let produced = producer(params).await?;
    if let Some(value) = &produced {
        cache.try_add(params, value.clone());
    }
    Ok(produced)
}
