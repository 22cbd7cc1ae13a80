//! String-keyed hash maps built on a fixed-size bucket array.
//!
//! Two interchangeable variants implement the [`Map`] capability:
//!
//! - [`OpenAddressingMap`] stores entries directly in its slots, resolves
//!   collisions with quadratic probing, deletes lazily with tombstones and
//!   grows once half of its slots are in use.
//! - [`ChainedMap`] keeps a singly-linked [`Chain`] per bucket and only
//!   resizes when asked to.
//!
//! Both take their [`StringHasher`] at construction:
//!
//! ```
//! use hm_map::{ChainedMap, Map, OpenAddressingMap};
//!
//! let mut open = OpenAddressingMap::new(11, hm_hash::additive).unwrap();
//! let mut chained = ChainedMap::new(11, hm_hash::positional).unwrap();
//!
//! for map in [&mut open as &mut dyn Map<i32>, &mut chained] {
//!     map.put("key1", 10);
//!     map.put("key1", 20);
//!     assert_eq!(map.get("key1"), Some(&20));
//!     assert_eq!(map.len(), 1);
//! }
//! ```

pub mod chain;
mod chained;
pub mod error;
mod growth;
mod open;
mod probe;

pub use chain::Chain;
pub use chained::ChainedMap;
pub use error::Error;
pub use growth::{GrowthPolicy, is_prime, next_prime};
pub use hm_hash::{HasherKind, StringHasher};
pub use open::OpenAddressingMap;

/// Growth threshold for [`OpenAddressingMap`].
pub const MAX_LOAD_FACTOR: f64 = 0.5;

/// An associative container from string keys to values of type `V`.
///
/// Misses are never errors: lookups report absence with `None`, and
/// removing an absent key does nothing.
pub trait Map<V> {
    /// Insert `value` under `key`, returning the value it replaced.
    fn put(&mut self, key: &str, value: V) -> Option<V>;

    fn get(&self, key: &str) -> Option<&V>;

    fn get_mut(&mut self, key: &str) -> Option<&mut V>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, returning its value if it was present.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Remove every entry, keeping the current capacity.
    fn clear(&mut self);

    /// Rehash every entry into a table of `new_capacity` buckets.
    ///
    /// A capacity the map cannot accommodate leaves it untouched; check
    /// [`Map::capacity`] afterwards if that matters.
    fn resize_table(&mut self, new_capacity: usize);

    /// `len / capacity`.
    fn table_load(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    fn empty_buckets(&self) -> usize;

    /// All keys in bucket order.
    fn get_keys(&self) -> Vec<&str>;

    fn capacity(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
