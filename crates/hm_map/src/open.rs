use std::fmt;

use hm_hash::StringHasher;
use serde::{Serialize, Serializer};
use tracing::{debug, trace, warn};

use crate::{GrowthPolicy, MAX_LOAD_FACTOR, Map, error::Result, growth::next_prime, probe::Probe};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<V> {
    key: String,
    value: V,
}

/// A bucket of an [`OpenAddressingMap`].
///
/// A `Tombstone` marks a slot whose entry was removed. Lookups probe past it,
/// inserts may reuse it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied(Entry<V>),
}

impl<V> Slot<V> {
    fn entry(&self) -> Option<&Entry<V>> {
        match self {
            Self::Occupied(entry) => Some(entry),
            Self::Empty | Self::Tombstone => None,
        }
    }

    fn entry_mut(&mut self) -> Option<&mut Entry<V>> {
        match self {
            Self::Occupied(entry) => Some(entry),
            Self::Empty | Self::Tombstone => None,
        }
    }
}

/// Where a key lives, or where it would go.
enum Lookup {
    Found(usize),
    Vacant(usize),
    Exhausted,
}

/// An open-addressing hash map with quadratic probing and tombstones.
///
/// The table grows before an insert whenever its load factor has reached
/// [`MAX_LOAD_FACTOR`]. Removed entries leave tombstones behind, which are
/// only compacted by a resize.
pub struct OpenAddressingMap<V, H = hm_hash::HasherKind> {
    slots: Vec<Slot<V>>,
    len: usize,
    hasher: H,
    growth: GrowthPolicy,
}

impl<V, H: StringHasher> OpenAddressingMap<V, H> {
    /// Creates a map with `capacity` empty slots.
    pub fn new(capacity: usize, hasher: H) -> Result<Self> {
        if capacity == 0 {
            return Err(crate::Error::ZeroCapacity);
        }

        Ok(Self {
            slots: empty_slots(capacity),
            len: 0,
            hasher,
            growth: GrowthPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    pub fn growth(&self) -> GrowthPolicy {
        self.growth
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Iterate over all live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.slots
            .iter()
            .filter_map(Slot::entry)
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Number of tombstoned slots.
    pub fn tombstones(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Tombstone))
            .count()
    }

    fn lookup(&self, key: &str) -> Lookup {
        let mut tombstone = None;

        for index in Probe::new(self.hasher.hash(key), self.slots.len()) {
            match &self.slots[index] {
                Slot::Empty => return Lookup::Vacant(tombstone.unwrap_or(index)),
                Slot::Tombstone => {
                    tombstone.get_or_insert(index);
                }
                Slot::Occupied(entry) if entry.key == key => return Lookup::Found(index),
                Slot::Occupied(_) => {}
            }
        }

        tombstone.map_or(Lookup::Exhausted, Lookup::Vacant)
    }

    fn find(&self, key: &str) -> Option<usize> {
        match self.lookup(key) {
            Lookup::Found(index) => Some(index),
            Lookup::Vacant(_) | Lookup::Exhausted => None,
        }
    }

    fn insert_owned(&mut self, key: String, value: V) -> Option<V> {
        if self.table_load() >= MAX_LOAD_FACTOR || self.len + 1 >= self.capacity() {
            let capacity = self.growth.next_capacity(self.capacity());
            trace!(load = self.table_load(), capacity, "Growing table before insert.");
            self.resize_table(capacity);
        }

        loop {
            match self.lookup(&key) {
                Lookup::Found(index) => {
                    return self.slots[index]
                        .entry_mut()
                        .map(|entry| std::mem::replace(&mut entry.value, value));
                }
                Lookup::Vacant(index) => {
                    self.slots[index] = Slot::Occupied(Entry { key, value });
                    self.len += 1;
                    return None;
                }
                Lookup::Exhausted => {
                    // A prime capacity below the load threshold always has a
                    // free slot on every probe sequence.
                    let capacity = next_prime(self.growth.next_capacity(self.capacity()));
                    warn!(
                        key = %key,
                        capacity = self.capacity(),
                        new_capacity = capacity,
                        "Probe sequence exhausted, growing to a prime capacity."
                    );
                    self.resize_table(capacity);
                }
            }
        }
    }
}

impl<V, H: StringHasher> Map<V> for OpenAddressingMap<V, H> {
    fn put(&mut self, key: &str, value: V) -> Option<V> {
        self.insert_owned(key.to_owned(), value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        let index = self.find(key)?;
        self.slots[index].entry().map(|entry| &entry.value)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find(key)?;
        self.slots[index].entry_mut().map(|entry| &mut entry.value)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find(key)?;
        match std::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.len -= 1;
                Some(entry.value)
            }
            slot => {
                self.slots[index] = slot;
                None
            }
        }
    }

    fn clear(&mut self) {
        self.slots.fill_with(|| Slot::Empty);
        self.len = 0;
    }

    fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 || new_capacity < self.len {
            debug!(
                new_capacity,
                len = self.len,
                "Ignoring resize below the number of entries."
            );
            return;
        }

        debug!(
            from = self.capacity(),
            to = new_capacity,
            len = self.len,
            "Rehashing table."
        );

        let old = std::mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.len = 0;

        for slot in old {
            if let Slot::Occupied(Entry { key, value }) = slot {
                self.insert_owned(key, value);
            }
        }
    }

    /// `capacity - len`; tombstones count as empty.
    fn empty_buckets(&self) -> usize {
        self.capacity() - self.len
    }

    fn get_keys(&self) -> Vec<&str> {
        self.iter().map(|(key, _)| key).collect()
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn len(&self) -> usize {
        self.len
    }
}

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    std::iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

impl<V: fmt::Debug, H> fmt::Debug for OpenAddressingMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAddressingMap")
            .field("capacity", &self.slots.len())
            .field("len", &self.len)
            .field("growth", &self.growth)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

/// One line per slot: `None`, `TS`, or `K: {key} V: {value}`.
impl<V: fmt::Display, H> fmt::Display for OpenAddressingMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: None")?,
                Slot::Tombstone => writeln!(f, "{index}: TS")?,
                Slot::Occupied(Entry { key, value }) => {
                    writeln!(f, "{index}: K: {key} V: {value}")?;
                }
            }
        }

        Ok(())
    }
}

impl<V: Serialize, H: StringHasher> Serialize for OpenAddressingMap<V, H> {
    fn serialize<S>(&self, ser: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.collect_map(self.iter())
    }
}
