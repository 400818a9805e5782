//! Key derivation for cache parameters.
//!
//! A parameter value is turned into a compact key by one of two strategies:
//!
//! - [`FastNumericKey`]: 64-bit multiplicative rolling hash. Cheap, process
//!   local, and **not** collision resistant: two different parameters may
//!   share a key and therefore a cached value.
//! - [`ContentDigestKey`]: 128-bit MD5 digest of a canonical string form.
//!   Identical field values always produce the identical key, across engine
//!   instances and process runs.
//!
//! Parameter types describe themselves through [`CacheParams`]. Composite
//! types list their fields once with [`FieldDescriptor`]s:
//!
//! ```
//! use paramcache_core::key::{AsFieldValue, CacheParams, FieldDescriptor, ParamKind};
//!
//! struct Query {
//!     user_id: u64,
//!     region: String,
//! }
//!
//! impl CacheParams for Query {
//!     const KIND: ParamKind = ParamKind::Composite;
//!
//!     fn fields() -> Vec<FieldDescriptor<Self>> {
//!         vec![
//!             FieldDescriptor::new("user_id", |q: &Self| q.user_id.as_field_value()),
//!             FieldDescriptor::new("region", |q: &Self| q.region.as_field_value()),
//!         ]
//!     }
//! }
//! ```

mod digest;
mod fast;
mod field;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

pub use digest::{ContentDigestKey, DigestKey};
pub use fast::{FAST_KEY_MULTIPLIER, FAST_KEY_SEED, FastNumericKey};
pub use field::{AsFieldValue, FieldAccessor, FieldDescriptor, FieldValue};

/// How a parameter type takes part in key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Primitive number; the whole value is the key input.
    Numeric,
    /// Character string.
    Text,
    /// Homogeneous ordered sequence.
    Sequence,
    /// Record with named fields, described by [`CacheParams::fields`].
    Composite,
}

/// A type usable as cache parameter.
///
/// `KIND` is resolved per type at compile time. Numeric, text and sequence
/// types expose their whole value through [`as_value`](Self::as_value);
/// composite types list their fields through [`fields`](Self::fields).
///
/// A composite type without readable fields derives one constant key, so
/// every value of that type shares a single cache entry.
pub trait CacheParams: Sized {
    const KIND: ParamKind = ParamKind::Composite;

    /// Ordered field list, in declaration order.
    fn fields() -> Vec<FieldDescriptor<Self>> {
        Vec::new()
    }

    /// Whole-value view for non-composite kinds.
    fn as_value(&self) -> FieldValue<'_> {
        FieldValue::Null
    }
}

macro_rules! impl_cache_params {
    ($kind:ident => $($ty:ty),+) => {
        $(
            impl CacheParams for $ty {
                const KIND: ParamKind = ParamKind::$kind;

                fn as_value(&self) -> FieldValue<'_> {
                    self.as_field_value()
                }
            }
        )+
    };
}

impl_cache_params!(Numeric => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
impl_cache_params!(Text => String, Box<str>, Arc<str>);

impl<T: AsFieldValue> CacheParams for Vec<T> {
    const KIND: ParamKind = ParamKind::Sequence;

    fn as_value(&self) -> FieldValue<'_> {
        self.as_field_value()
    }
}

impl<T: AsFieldValue, const N: usize> CacheParams for [T; N] {
    const KIND: ParamKind = ParamKind::Sequence;

    fn as_value(&self) -> FieldValue<'_> {
        self.as_field_value()
    }
}

impl<T: AsFieldValue> CacheParams for Box<[T]> {
    const KIND: ParamKind = ParamKind::Sequence;

    fn as_value(&self) -> FieldValue<'_> {
        self.as_field_value()
    }
}

/// Strategy turning a parameter value into a map key.
pub trait KeyStrategy: Send + Sync {
    type Key: Eq + Hash + Clone + Debug + Send + Sync;

    /// Derive the key for `params`.
    ///
    /// `fields` is the descriptor list with ignored fields already removed.
    fn derive<P: CacheParams>(&self, params: &P, fields: &[FieldDescriptor<P>]) -> Self::Key;
}
