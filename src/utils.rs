//! Utility functions and traits for `ElasticHashMap`

use crate::{ElasticConfig, ElasticHashMap, ElasticKey, Error};
use std::{borrow::Borrow, hash::BuildHasher};

/// Extension trait for map implementations that provides additional utility methods
pub trait HashMapExtensions<K, V> {
    /// Returns the keys of the hash map as a Vec
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the hash map as a Vec
    fn values(&self) -> Vec<V>;

    /// Returns true if the hash map contains the given key
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ElasticKey + Eq + ?Sized;
}

impl<K, V, S> HashMapExtensions<K, V> for ElasticHashMap<K, V, S>
where
    K: ElasticKey + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ElasticKey + Eq + ?Sized,
    {
        self.get(key).is_some()
    }
}

/// Creates an `ElasticHashMap` from `config` and fills it from an iterator of key-value pairs.
///
/// Later pairs overwrite earlier ones with the same key.
///
/// # Errors
///
/// Returns [`Error::Config`] for an invalid config and [`Error::Insert`] for the first pair
/// that could not be stored.
pub fn try_from_iter<K, V, I>(
    config: ElasticConfig,
    iter: I,
) -> Result<ElasticHashMap<K, V>, Error>
where
    K: ElasticKey + Eq,
    I: IntoIterator<Item = (K, V)>,
{
    let mut map = ElasticHashMap::with_config(config)?;
    for (key, value) in iter {
        map.insert(key, value)?;
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, InsertError};

    #[test]
    fn test_try_from_iter() {
        let data = vec![("a".to_string(), 1), ("b".to_string(), 2), ("c".to_string(), 3)];

        let map = try_from_iter(ElasticConfig::new(16, 0.1), data);

        assert_eq!(map.as_ref().map(|m| m.get("a")), Ok(Some(&1)));
        assert_eq!(map.as_ref().map(|m| m.get("b")), Ok(Some(&2)));
        assert_eq!(map.as_ref().map(|m| m.get("c")), Ok(Some(&3)));
        assert_eq!(map.as_ref().map(|m| m.len()), Ok(3));
    }

    #[test]
    fn test_try_from_iter_reports_errors() {
        let bad_config = try_from_iter(ElasticConfig::new(0, 0.1), vec![("a".to_string(), 1)]);
        assert_eq!(bad_config.map(|m| m.len()), Err(Error::Config(ConfigError::ZeroCapacity)));

        // Two slots with delta 0.5 accept a single entry
        let pairs = vec![("a".to_string(), 1), ("b".to_string(), 2)];
        let too_many = try_from_iter(ElasticConfig::new(2, 0.5), pairs);
        assert_eq!(too_many.map(|m| m.len()), Err(Error::Insert(InsertError::OutOfSpace)));
    }

    #[test]
    fn test_keys_and_values() -> Result<(), Error> {
        let map = try_from_iter(
            ElasticConfig::new(16, 0.1),
            vec![("a".to_string(), 1), ("b".to_string(), 2), ("a".to_string(), 3)],
        )?;

        let mut keys = map.keys();
        keys.sort(); // Sort for predictable comparison

        let mut values = map.values();
        values.sort_unstable();

        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(values, vec![2, 3]);
        Ok(())
    }

    #[test]
    fn test_contains_key() {
        let map = try_from_iter(ElasticConfig::new(16, 0.1), vec![("a".to_string(), 1)]);

        assert_eq!(map.as_ref().map(|m| m.contains_key("a")), Ok(true));
        assert_eq!(map.as_ref().map(|m| m.contains_key("b")), Ok(false));
    }
}
