use std::{
    borrow::Borrow,
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{BuildHasher, BuildHasherDefault},
    mem,
};

use tracing::{debug, trace};

use crate::{
    config::ElasticConfig,
    error::{ConfigError, InsertError},
    key::{ElasticKey, hash_key},
    layout::{Entry, Level, level_sizes},
    probe::{ProbeSequence, probe_limit},
};

/// Free fraction of the next level at or below which the current level is preferred
const NEXT_LEVEL_THRESHOLD: f64 = 0.25;

/// Hash builder used when none is supplied. Deterministic within a process.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// Location of an occupied slot, with the number of probes spent reaching it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotRef {
    /// Index of the level
    level: usize,
    /// Index of the slot within the level
    slot: usize,
    /// Probes spent across all visited levels, including the final one
    probes: usize,
}

/// What the insertion policy does with a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelDecision {
    /// Plenty of room here and in the next level
    Probe,
    /// Next level is nearly full, so try hard to place here
    ProbeNextTight,
    /// Last level, always probed
    ProbeLast,
    /// At or below `delta / 2` free, treated as saturated
    Skip,
}

/// A fixed-capacity hash table using elastic hashing.
///
/// Capacity is split into levels of geometrically shrinking size (see [`ElasticConfig`]).
/// Each level admits a number of probes that grows as it fills, bounded by `delta`. Lookups
/// replay the same per-level limits from the current occupancy, so every stored key stays
/// reachable. The table never grows and entries are never removed.
///
/// Note: This implementation is not thread-safe; mutation requires `&mut self`.
#[derive(Debug, Clone)]
pub struct ElasticHashMap<K, V, S = DefaultHashBuilder> {
    /// The levels, probed in order
    levels: Vec<Level<K, V>>,
    /// Current number of elements in the hash table
    len: usize,
    /// Parameters the table was built with
    config: ElasticConfig,
    /// Cached `config.max_len()`
    max_len: usize,
    /// Builds the hasher for each key
    hash_builder: S,
}

impl<K, V> ElasticHashMap<K, V, DefaultHashBuilder>
where
    K: ElasticKey + Eq,
{
    /// Creates a table of `capacity` slots keeping a `delta` fraction of them free.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `capacity` is zero or `delta` is outside (0, 1).
    pub fn new(capacity: usize, delta: f64) -> Result<Self, ConfigError> {
        Self::with_config(ElasticConfig::new(capacity, delta))
    }

    /// Creates a table from a full config.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the config does not validate.
    pub fn with_config(config: ElasticConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, S> ElasticHashMap<K, V, S>
where
    K: ElasticKey + Eq,
    S: BuildHasher,
{
    /// Creates a table from a config and a custom hash builder.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the config does not validate.
    pub fn with_config_and_hasher(
        config: ElasticConfig,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let sizes = level_sizes(config.capacity);
        let max_len = config.max_len();
        debug!(
            capacity = config.capacity,
            delta = config.delta,
            max_len,
            levels = ?sizes,
            "built elastic hash table"
        );
        Ok(Self {
            levels: sizes.into_iter().map(Level::with_size).collect(),
            len: 0,
            config,
            max_len,
            hash_builder,
        })
    }

    /// Inserts a key-value pair.
    ///
    /// Returns the previous value if the key was already present; its value is replaced in
    /// place.
    ///
    /// # Errors
    ///
    /// [`InsertError::OutOfSpace`] when the table already holds [`Self::max_len`] entries.
    /// This check runs first, for new and existing keys alike. [`InsertError::FailedToInsert`]
    /// when no eligible level had a free slot within its probe limit. A failed insert leaves
    /// the table unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, InsertError> {
        if self.len >= self.max_len {
            debug!(len = self.len, max_len = self.max_len, "insert refused, table is full");
            return Err(InsertError::OutOfSpace);
        }

        let hash = hash_key(&self.hash_builder, &key);
        if let Some(found) = self.locate(hash, &key) {
            let existing =
                self.levels.get_mut(found.level).and_then(|level| level.slot_mut(found.slot));
            if let Some(entry) = existing {
                return Ok(Some(mem::replace(&mut entry.value, value)));
            }
        }

        let Some(target) = self.choose_slot(hash) else {
            debug!(len = self.len, "insert failed, probe budget exhausted on every level");
            return Err(InsertError::FailedToInsert);
        };
        let placed = self
            .levels
            .get_mut(target.level)
            .map(|level| level.place(target.slot, Entry { key, value }).is_ok());
        if placed != Some(true) {
            return Err(InsertError::FailedToInsert);
        }
        self.len = self.len.saturating_add(1);
        trace!(level = target.level, slot = target.slot, probes = target.probes, "placed entry");
        Ok(None)
    }

    /// Retrieve a value for a given key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ElasticKey + Eq + ?Sized,
    {
        let found = self.locate(hash_key(&self.hash_builder, key), key)?;
        self.levels.get(found.level)?.slot(found.slot).map(|entry| &entry.value)
    }

    /// Returns the value for `key` and `true`, or the default value and `false` when the key
    /// is absent. Only the flag tells a stored default apart from a missing key.
    pub fn get_or_default<Q>(&self, key: &Q) -> (V, bool)
    where
        K: Borrow<Q>,
        Q: ElasticKey + Eq + ?Sized,
        V: Clone + Default,
    {
        self.get(key).map_or_else(|| (V::default(), false), |value| (value.clone(), true))
    }

    /// Returns the stored key and value for `key`
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ElasticKey + Eq + ?Sized,
    {
        let found = self.locate(hash_key(&self.hash_builder, key), key)?;
        self.levels.get(found.level)?.slot(found.slot).map(|entry| (&entry.key, &entry.value))
    }

    /// Number of probes a lookup of `key` spends before finding it, or `None` if absent
    pub fn probe_cost<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ElasticKey + Eq + ?Sized,
    {
        self.locate(hash_key(&self.hash_builder, key), key).map(|found| found.probes)
    }

    /// Probe limit of a level at its current occupancy, capped at the level size.
    ///
    /// `j^2 mod S` repeats with period `S`, so attempts past the level size only revisit slots.
    fn level_probe_limit(&self, level: &Level<K, V>) -> usize {
        probe_limit(level.free_fraction(), self.config.delta, self.config.probe_constant)
            .min(level.size())
    }

    /// Finds the slot holding `key`.
    ///
    /// Every level is scanned with its limit recomputed from current occupancy. Occupancy
    /// only grows, so the limit is never smaller than the one in force when the key was placed.
    fn locate<Q>(&self, hash: u64, key: &Q) -> Option<SlotRef>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut probes: usize = 0;
        for (level_index, level) in self.levels.iter().enumerate() {
            let limit = self.level_probe_limit(level);
            for slot in ProbeSequence::new(hash, level.size(), limit) {
                probes = probes.saturating_add(1);
                if level.slot(slot).is_some_and(|entry| entry.key.borrow() == key) {
                    return Some(SlotRef { level: level_index, slot, probes });
                }
            }
        }
        None
    }

    /// Applies the insertion policy to level `index`
    fn decide(&self, index: usize, level: &Level<K, V>) -> LevelDecision {
        let Some(next) = self.levels.get(index.saturating_add(1)) else {
            return LevelDecision::ProbeLast;
        };
        let free = level.free_fraction();
        let next_free = next.free_fraction();
        let saturated = self.config.delta / 2.0;
        if free > saturated && next_free > NEXT_LEVEL_THRESHOLD {
            LevelDecision::Probe
        } else if free <= saturated {
            LevelDecision::Skip
        } else {
            LevelDecision::ProbeNextTight
        }
    }

    /// Picks a vacant slot for a new key without mutating anything
    fn choose_slot(&self, hash: u64) -> Option<SlotRef> {
        let mut probes: usize = 0;
        for (level_index, level) in self.levels.iter().enumerate() {
            let decision = self.decide(level_index, level);
            if decision == LevelDecision::Skip {
                trace!(level = level_index, "skipping saturated level");
                continue;
            }
            let limit = self.level_probe_limit(level);
            trace!(level = level_index, ?decision, limit, "probing level");
            for slot in ProbeSequence::new(hash, level.size(), limit) {
                probes = probes.saturating_add(1);
                if level.is_vacant(slot) {
                    return Some(SlotRef { level: level_index, slot, probes });
                }
            }
        }
        None
    }
}

impl<K, V, S> ElasticHashMap<K, V, S> {
    /// Returns the number of elements in the hash table
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the hash table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of slots across all levels
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Maximum number of entries, `capacity - floor(delta * capacity)`
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Fraction of slots kept free
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.config.delta
    }

    /// Multiplier of the per-level probe limit
    #[must_use]
    pub fn probe_constant(&self) -> f64 {
        self.config.probe_constant
    }

    /// Returns the fraction of all slots that are occupied
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.config.capacity as f64
    }

    /// Number of levels
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Slot count of each level, in probe order
    #[must_use]
    pub fn level_sizes(&self) -> Vec<usize> {
        self.levels.iter().map(Level::size).collect()
    }

    /// Occupied slot count of each level, in probe order
    #[must_use]
    pub fn level_occupancies(&self) -> Vec<usize> {
        self.levels.iter().map(Level::occupied).collect()
    }

    /// Returns the hash builder
    #[must_use]
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns an iterator over the key-value pairs, level by level
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { levels: &self.levels, level: 0, slot: 0, remaining: self.len }
    }

    /// Renders the same `{"key": "value", ...}` layout as `Display`, using `Debug` for keys
    /// and values. Works for byte keys, which have no `Display`.
    #[must_use]
    pub fn debug_string(&self) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        let mut out = String::from("{");
        for entry in self.levels.iter().flat_map(|level| level.entries()) {
            out.push_str(&format!("\"{:?}\": \"{:?}\", ", entry.key, entry.value));
        }
        out.push('}');
        out
    }
}

/// Renders `{"key": "value", ...}` for every occupied slot, level by level. Nothing is
/// escaped.
impl<K, V, S> fmt::Display for ElasticHashMap<K, V, S>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for entry in self.levels.iter().flat_map(|level| level.entries()) {
            write!(f, "\"{}\": \"{}\", ", entry.key, entry.value)?;
        }
        f.write_str("}")
    }
}

impl<'a, K, V, S> IntoIterator for &'a ElasticHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the key-value pairs of the hash table
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// The levels being walked
    levels: &'a [Level<K, V>],
    /// Current level
    level: usize,
    /// Next slot within the current level
    slot: usize,
    /// Entries not yet yielded
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(level) = self.levels.get(self.level) {
            if self.slot >= level.size() {
                self.level = self.level.saturating_add(1);
                self.slot = 0;
                continue;
            }
            let current = self.slot;
            self.slot = self.slot.saturating_add(1);
            if let Some(entry) = level.slot(current) {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&entry.key, &entry.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
