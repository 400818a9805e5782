use std::fmt;

use super::{CacheParams, FieldDescriptor, KeyStrategy, ParamKind};

/// 128-bit content digest used as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DigestKey([u8; 16]);

impl DigestKey {
    /// Digest the UTF-8 bytes of `canonical`.
    pub fn of(canonical: &str) -> Self {
        Self(md5::compute(canonical.as_bytes()).0)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn as_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl From<[u8; 16]> for DigestKey {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for DigestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.as_u128())
    }
}

/// MD5 digest of a canonical string form of the parameter.
///
/// - text: the string itself
/// - numeric: the number's decimal form
/// - sequence: the elements joined by `", "`
/// - composite: `name=value` for every non-ignored field in declaration
///   order, sequence fields rendered as their joined elements
///
/// The canonical form depends only on field names and values, so the key is
/// stable across engine instances and processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDigestKey;

impl ContentDigestKey {
    /// Build the string that gets digested for `params`.
    pub fn canonical_form<P: CacheParams>(params: &P, fields: &[FieldDescriptor<P>]) -> String {
        match P::KIND {
            ParamKind::Text | ParamKind::Numeric | ParamKind::Sequence => {
                params.as_value().to_string()
            }
            ParamKind::Composite => {
                let mut canonical = String::new();
                for field in fields {
                    canonical.push_str(field.name());
                    canonical.push('=');
                    canonical.push_str(&field.read(params).to_string());
                }
                canonical
            }
        }
    }
}

impl KeyStrategy for ContentDigestKey {
    type Key = DigestKey;

    fn derive<P: CacheParams>(&self, params: &P, fields: &[FieldDescriptor<P>]) -> DigestKey {
        DigestKey::of(&Self::canonical_form(params, fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::AsFieldValue;

    struct Lookup {
        id: u32,
        tags: Vec<String>,
        note: Option<String>,
    }

    impl CacheParams for Lookup {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::new("id", |l: &Self| l.id.as_field_value()),
                FieldDescriptor::new("tags", |l: &Self| l.tags.as_field_value()),
                FieldDescriptor::new("note", |l: &Self| l.note.as_field_value()),
            ]
        }
    }

    fn lookup() -> Lookup {
        Lookup {
            id: 7,
            tags: vec!["a".to_string(), "b".to_string()],
            note: None,
        }
    }

    #[test]
    fn test_known_digest() {
        // md5("") and md5("abc") reference values
        assert_eq!(
            DigestKey::of("").to_string(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            ContentDigestKey.derive(&"abc".to_string(), &[]).to_string(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn test_numeric_digest_uses_decimal_form() {
        assert_eq!(
            ContentDigestKey.derive(&42i32, &[]),
            DigestKey::of("42")
        );
        assert_eq!(
            ContentDigestKey.derive(&42u64, &[]),
            ContentDigestKey.derive(&"42".to_string(), &[])
        );
    }

    #[test]
    fn test_wide_integers_digest_full_value() {
        let low = ContentDigestKey.derive(&(u64::MAX as u128), &[]);
        let high = ContentDigestKey.derive(&u128::MAX, &[]);

        assert_ne!(low, high);
        assert_eq!(high, DigestKey::of("340282366920938463463374607431768211455"));
        assert_eq!(
            ContentDigestKey.derive(&i128::MIN, &[]),
            DigestKey::of("-170141183460469231731687303715884105728")
        );
    }

    #[test]
    fn test_f32_digest_uses_own_precision() {
        assert_eq!(ContentDigestKey.derive(&0.1f32, &[]), DigestKey::of("0.1"));
    }

    #[test]
    fn test_composite_canonical_form() {
        let fields = Lookup::fields();
        assert_eq!(
            ContentDigestKey::canonical_form(&lookup(), &fields),
            "id=7tags=a, bnote="
        );
    }

    #[test]
    fn test_composite_digest_is_deterministic() {
        let fields = Lookup::fields();
        let first = ContentDigestKey.derive(&lookup(), &fields);
        let second = ContentDigestKey.derive(&lookup(), &Lookup::fields());
        assert_eq!(first, second);
        assert_eq!(first, DigestKey::of("id=7tags=a, bnote="));
    }

    #[test]
    fn test_sequence_digest() {
        assert_eq!(
            ContentDigestKey.derive(&vec![1, 2, 3], &[]),
            DigestKey::of("1, 2, 3")
        );
        assert_ne!(
            ContentDigestKey.derive(&vec![1, 2, 3], &[]),
            ContentDigestKey.derive(&vec![1, 2, 4], &[])
        );
    }

    #[test]
    fn test_key_accessors() {
        let key = DigestKey::of("abc");
        assert_eq!(key.as_bytes()[0], 0x90);
        assert_eq!(key.as_u128() >> 120, 0x90);
        assert_eq!(DigestKey::from(*key.as_bytes()), key);
    }
}
