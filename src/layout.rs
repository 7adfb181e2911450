//! Partitioning of capacity into levels and the per-level slot storage

/// A key-value pair stored in a slot
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    /// The key in the key-value pair
    pub(crate) key: K,
    /// The value associated with the key
    pub(crate) value: V,
}

/// One fixed-size array of slots.
///
/// The slot array is allocated once and never resized. `occupied` always equals the number
/// of `Some` slots.
#[derive(Debug, Clone)]
pub(crate) struct Level<K, V> {
    /// The slots of this level
    slots: Box<[Option<Entry<K, V>>]>,
    /// Number of occupied slots
    occupied: usize,
}

impl<K, V> Level<K, V> {
    /// Allocates a level of `size` empty slots
    pub(crate) fn with_size(size: usize) -> Self {
        Self { slots: (0..size).map(|_| None).collect(), occupied: 0 }
    }

    /// Number of slots
    pub(crate) fn size(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub(crate) fn occupied(&self) -> usize {
        self.occupied
    }

    /// Fraction of slots still empty. An empty-sized level counts as full.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn free_fraction(&self) -> f64 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.size().saturating_sub(self.occupied) as f64 / self.size() as f64
    }

    /// Entry stored at `index`, if any
    pub(crate) fn slot(&self, index: usize) -> Option<&Entry<K, V>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Mutable entry stored at `index`, if any
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// True when `index` is in range and empty
    pub(crate) fn is_vacant(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(None))
    }

    /// Stores an entry in a vacant slot. Returns the entry back if the slot is taken or out of
    /// range, leaving the level untouched.
    pub(crate) fn place(&mut self, index: usize, entry: Entry<K, V>) -> Result<(), Entry<K, V>> {
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(entry);
                self.occupied = self.occupied.saturating_add(1);
                Ok(())
            }
            _ => Err(entry),
        }
    }

    /// Occupied slots in physical order
    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

/// Splits `capacity` slots into levels of geometrically shrinking size.
///
/// There are `max(1, floor(log2(capacity)))` levels. Level `i` below the last takes
/// `max(1, floor(remaining / 2^(levels - i)))` slots and the last level takes whatever is
/// left, so the sizes always sum to `capacity`.
pub(crate) fn level_sizes(capacity: usize) -> Vec<usize> {
    let level_count = capacity.checked_ilog2().unwrap_or(0).max(1) as usize;
    let mut sizes = Vec::with_capacity(level_count);
    let mut remaining = capacity;
    for i in 0..level_count.saturating_sub(1) {
        let shift = level_count.saturating_sub(i);
        let size = remaining.checked_shr(u32::try_from(shift).unwrap_or(u32::MAX)).unwrap_or(0);
        let size = size.max(1).min(remaining);
        sizes.push(size);
        remaining = remaining.saturating_sub(size);
    }
    sizes.push(remaining);
    sizes
}
