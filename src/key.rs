//! Key hashing for `ElasticHashMap`

use std::hash::{BuildHasher, Hasher};

/// A key the table knows how to hash.
///
/// Implementations feed a canonical byte form of the key into the hasher. Byte sequences and
/// strings write their raw bytes; integers write their decimal text, so `42` and `"42"`
/// hash identically. Owned and borrowed forms of the same key (`String` and `str`, `Vec<u8>`
/// and `[u8]`) must write the same bytes, because lookups go through [`std::borrow::Borrow`].
///
/// Implement this trait to use other key types.
pub trait ElasticKey {
    /// Writes the key's canonical bytes into `state`
    fn write_key<H: Hasher>(&self, state: &mut H);
}

impl ElasticKey for str {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        state.write(self.as_bytes());
    }
}

impl ElasticKey for String {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.as_str().write_key(state);
    }
}

impl ElasticKey for [u8] {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        state.write(self);
    }
}

impl ElasticKey for Vec<u8> {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.as_slice().write_key(state);
    }
}

impl<const N: usize> ElasticKey for [u8; N] {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.as_slice().write_key(state);
    }
}

impl<T: ElasticKey + ?Sized> ElasticKey for &T {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        (**self).write_key(state);
    }
}

/// Integers go through the string path as decimal text
macro_rules! impl_elastic_key_for_int {
    ($($int:ty),* $(,)?) => {
        $(
            impl ElasticKey for $int {
                fn write_key<H: Hasher>(&self, state: &mut H) {
                    self.to_string().write_key(state);
                }
            }
        )*
    };
}

impl_elastic_key_for_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Hashes `key` with a fresh hasher from `hash_builder`
pub(crate) fn hash_key<Q, S>(hash_builder: &S, key: &Q) -> u64
where
    Q: ElasticKey + ?Sized,
    S: BuildHasher,
{
    let mut hasher = hash_builder.build_hasher();
    key.write_key(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::BuildHasherDefault;

    type Builder = BuildHasherDefault<DefaultHasher>;

    #[test]
    fn test_integers_hash_as_decimal_text() {
        let builder = Builder::default();
        assert_eq!(hash_key(&builder, &42_i32), hash_key(&builder, "42"));
        assert_eq!(hash_key(&builder, &-7_i64), hash_key(&builder, "-7"));
        assert_eq!(hash_key(&builder, &0_usize), hash_key(&builder, "0"));
    }

    #[test]
    fn test_borrowed_forms_agree() {
        let builder = Builder::default();
        let owned = String::from("apple");
        assert_eq!(hash_key(&builder, &owned), hash_key(&builder, "apple"));
        assert_eq!(hash_key(&builder, &&owned), hash_key(&builder, "apple"));

        let bytes = vec![1_u8, 2, 3];
        assert_eq!(hash_key(&builder, &bytes), hash_key(&builder, &[1_u8, 2, 3][..]));
        assert_eq!(hash_key(&builder, &[1_u8, 2, 3]), hash_key(&builder, bytes.as_slice()));
    }

    #[test]
    fn test_stable_within_process() {
        let builder = Builder::default();
        assert_eq!(hash_key(&builder, "key1"), hash_key(&Builder::default(), "key1"));
        assert_ne!(hash_key(&builder, "key1"), hash_key(&builder, "key2"));
    }
}
