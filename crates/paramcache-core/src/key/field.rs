//! Field views used by key derivation.

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Borrowed view of a single parameter field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Int128(i128),
    UInt128(u128),
    Float32(f32),
    Float(f64),
    Char(char),
    Text(Cow<'a, str>),
    List(Vec<FieldValue<'a>>),
}

impl FieldValue<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Process-local 64-bit hash code of the value.
    ///
    /// Integers hash to themselves, 128-bit ones truncated to their low 64
    /// bits; floats, text and lists go through the standard hasher, which is
    /// stable within a process but not across builds.
    pub fn hash_code(&self) -> i64 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(b) => i64::from(*b),
            FieldValue::Int(i) => *i,
            FieldValue::UInt(u) => *u as i64,
            FieldValue::Int128(i) => *i as i64,
            FieldValue::UInt128(u) => *u as i64,
            FieldValue::Char(c) => i64::from(u32::from(*c)),
            FieldValue::Float32(_)
            | FieldValue::Float(_)
            | FieldValue::Text(_)
            | FieldValue::List(_) => {
                let mut hasher = DefaultHasher::new();
                self.hash(&mut hasher);
                hasher.finish() as i64
            }
        }
    }

    /// Integer used by numeric fast keys; floats round to the nearest integer.
    pub fn as_i64(&self) -> i64 {
        match self {
            FieldValue::Int(i) => *i,
            FieldValue::UInt(u) => *u as i64,
            FieldValue::Int128(i) => *i as i64,
            FieldValue::UInt128(u) => *u as i64,
            FieldValue::Float32(f) => f.round() as i64,
            FieldValue::Float(f) => f.round() as i64,
            other => other.hash_code(),
        }
    }
}

impl Hash for FieldValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Null => {}
            FieldValue::Bool(b) => b.hash(state),
            FieldValue::Int(i) => i.hash(state),
            FieldValue::UInt(u) => u.hash(state),
            FieldValue::Int128(i) => i.hash(state),
            FieldValue::UInt128(u) => u.hash(state),
            FieldValue::Float32(f) => f.to_bits().hash(state),
            FieldValue::Float(f) => f.to_bits().hash(state),
            FieldValue::Char(c) => c.hash(state),
            FieldValue::Text(s) => s.hash(state),
            FieldValue::List(items) => items.hash(state),
        }
    }
}

/// Canonical string form, used by content digest keys.
///
/// Lists render as their elements joined by `", "`; `Null` renders empty.
impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::UInt(u) => write!(f, "{u}"),
            FieldValue::Int128(i) => write!(f, "{i}"),
            FieldValue::UInt128(u) => write!(f, "{u}"),
            FieldValue::Float32(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Char(c) => write!(f, "{c}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Conversion of a Rust value into a [`FieldValue`].
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;
}

macro_rules! impl_as_field_value {
    ($variant:ident as $target:ty => $($ty:ty),+) => {
        $(
            impl AsFieldValue for $ty {
                fn as_field_value(&self) -> FieldValue<'_> {
                    FieldValue::$variant(*self as $target)
                }
            }
        )+
    };
}

impl_as_field_value!(Int as i64 => i8, i16, i32, i64, isize);
impl_as_field_value!(UInt as u64 => u8, u16, u32, u64, usize);
impl_as_field_value!(Int128 as i128 => i128);
impl_as_field_value!(UInt128 as u128 => u128);
impl_as_field_value!(Float32 as f32 => f32);
impl_as_field_value!(Float as f64 => f64);

impl AsFieldValue for bool {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

impl AsFieldValue for char {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Char(*self)
    }
}

impl AsFieldValue for str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(Cow::Borrowed(self))
    }
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(Cow::Borrowed(self.as_str()))
    }
}

impl AsFieldValue for Box<str> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(Cow::Borrowed(self))
    }
}

impl AsFieldValue for Arc<str> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(Cow::Borrowed(self))
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.as_field_value(),
            None => FieldValue::Null,
        }
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for [T] {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::List(self.iter().map(AsFieldValue::as_field_value).collect())
    }
}

impl<T: AsFieldValue> AsFieldValue for Vec<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        self.as_slice().as_field_value()
    }
}

impl<T: AsFieldValue, const N: usize> AsFieldValue for [T; N] {
    fn as_field_value(&self) -> FieldValue<'_> {
        self.as_slice().as_field_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for Box<[T]> {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

/// Reads one field of a parameter value.
pub type FieldAccessor<P> = for<'a> fn(&'a P) -> FieldValue<'a>;

/// A named, readable field of a parameter type.
///
/// Descriptors are listed once per type and resolved when an engine is
/// built; derivation never inspects the type at call time.
pub struct FieldDescriptor<P> {
    name: &'static str,
    accessor: FieldAccessor<P>,
}

impl<P> FieldDescriptor<P> {
    pub const fn new(name: &'static str, accessor: FieldAccessor<P>) -> Self {
        Self { name, accessor }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn read<'a>(&self, params: &'a P) -> FieldValue<'a> {
        (self.accessor)(params)
    }
}

impl<P> Clone for FieldDescriptor<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for FieldDescriptor<P> {}

impl<P> fmt::Debug for FieldDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish()
    }
}
