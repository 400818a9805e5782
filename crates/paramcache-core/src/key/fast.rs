use super::{CacheParams, FieldDescriptor, KeyStrategy, ParamKind};

/// Starting value of every fast key, and multiplier for numeric parameters.
pub const FAST_KEY_SEED: i64 = 9973;

/// Per-field multiplier of the rolling hash.
pub const FAST_KEY_MULTIPLIER: i64 = 9901;

/// 64-bit multiplicative rolling hash over a parameter's fields.
///
/// - numeric parameters: `SEED * value`
/// - text and sequence parameters: the value's own hash code
/// - composite parameters: `key = key * 9901 + hash(field)` over every
///   non-null, non-ignored field, starting from `SEED`
///
/// All arithmetic wraps. The key is not collision resistant; distinct
/// parameters can share a key and therefore a cached value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastNumericKey;

impl KeyStrategy for FastNumericKey {
    type Key = i64;

    fn derive<P: CacheParams>(&self, params: &P, fields: &[FieldDescriptor<P>]) -> i64 {
        match P::KIND {
            ParamKind::Numeric => FAST_KEY_SEED.wrapping_mul(params.as_value().as_i64()),
            ParamKind::Text | ParamKind::Sequence => params.as_value().hash_code(),
            ParamKind::Composite => fields
                .iter()
                .map(|field| field.read(params))
                .filter(|value| !value.is_null())
                .fold(FAST_KEY_SEED, |key, value| {
                    key.wrapping_mul(FAST_KEY_MULTIPLIER)
                        .wrapping_add(value.hash_code())
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::AsFieldValue;

    struct Pair {
        left: i32,
        right: Option<i32>,
    }

    impl CacheParams for Pair {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::new("left", |p: &Self| p.left.as_field_value()),
                FieldDescriptor::new("right", |p: &Self| p.right.as_field_value()),
            ]
        }
    }

    struct Empty;

    impl CacheParams for Empty {}

    #[test]
    fn test_numeric_key() {
        assert_eq!(FastNumericKey.derive(&1i32, &[]), 9973);
        assert_eq!(FastNumericKey.derive(&2u8, &[]), 2 * 9973);
        assert_eq!(FastNumericKey.derive(&0i64, &[]), 0);
    }

    #[test]
    fn test_numeric_key_wraps() {
        let expected = 9973i64.wrapping_mul(i64::MAX);
        assert_eq!(FastNumericKey.derive(&i64::MAX, &[]), expected);
    }

    #[test]
    fn test_composite_key() {
        let fields = Pair::fields();
        let key = FastNumericKey.derive(
            &Pair {
                left: 2,
                right: Some(5),
            },
            &fields,
        );
        assert_eq!(key, (9973 * 9901 + 2) * 9901 + 5);
    }

    #[test]
    fn test_composite_key_skips_null_fields() {
        let fields = Pair::fields();
        let key = FastNumericKey.derive(
            &Pair {
                left: 2,
                right: None,
            },
            &fields,
        );
        assert_eq!(key, 9973 * 9901 + 2);
    }

    #[test]
    fn test_fieldless_composite_is_constant() {
        assert_eq!(FastNumericKey.derive(&Empty, &Empty::fields()), FAST_KEY_SEED);
    }

    #[test]
    fn test_sequence_key_is_structural() {
        let a = vec![1, 2, 3];
        let b = vec![1, 2, 3];
        let c = vec![1, 2, 4];
        assert_eq!(FastNumericKey.derive(&a, &[]), FastNumericKey.derive(&b, &[]));
        assert_ne!(FastNumericKey.derive(&a, &[]), FastNumericKey.derive(&c, &[]));
    }

    #[test]
    fn test_text_key() {
        let a = String::from("key");
        assert_eq!(
            FastNumericKey.derive(&a, &[]),
            FastNumericKey.derive(&"key".to_string(), &[])
        );
    }
}
