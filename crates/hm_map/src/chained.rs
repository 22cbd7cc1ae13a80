use std::fmt;

use hm_hash::StringHasher;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::{Chain, Map, error::Result};

/// A separate-chaining hash map.
///
/// Every bucket holds a [`Chain`]; colliding keys share it. The bucket count
/// only changes through [`Map::resize_table`], so chains grow without bound
/// and `len` may exceed `capacity`.
pub struct ChainedMap<V, H = hm_hash::HasherKind> {
    buckets: Vec<Chain<V>>,
    len: usize,
    hasher: H,
}

impl<V, H: StringHasher> ChainedMap<V, H> {
    /// Creates a map with `capacity` empty chains.
    pub fn new(capacity: usize, hasher: H) -> Result<Self> {
        if capacity == 0 {
            return Err(crate::Error::ZeroCapacity);
        }

        Ok(Self {
            buckets: empty_buckets(capacity),
            len: 0,
            hasher,
        })
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Iterate over all entries, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets.iter().flat_map(Chain::iter)
    }

    /// Length of the longest chain.
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Chain::len).max().unwrap_or(0)
    }

    fn bucket_index(&self, key: &str) -> usize {
        (self.hasher.hash(key) % self.buckets.len() as u64) as usize
    }

    fn chain(&self, key: &str) -> &Chain<V> {
        &self.buckets[self.bucket_index(key)]
    }

    fn chain_mut(&mut self, key: &str) -> &mut Chain<V> {
        let index = self.bucket_index(key);
        &mut self.buckets[index]
    }

    fn insert_owned(&mut self, key: String, value: V) -> Option<V> {
        let chain = self.chain_mut(&key);

        // Replacing re-links the node at the head of its chain.
        let old = chain.remove(&key);
        chain.insert(key, value);

        if old.is_none() {
            self.len += 1;
        }

        old
    }
}

impl<V, H: StringHasher> Map<V> for ChainedMap<V, H> {
    fn put(&mut self, key: &str, value: V) -> Option<V> {
        self.insert_owned(key.to_owned(), value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        self.chain(key).get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.chain_mut(key).get_mut(key)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.chain(key).contains(key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.chain_mut(key).remove(key)?;
        self.len -= 1;

        Some(value)
    }

    fn clear(&mut self) {
        self.buckets = empty_buckets(self.buckets.len());
        self.len = 0;
    }

    /// Any capacity of at least one bucket is accepted, including one
    /// smaller than `len`.
    fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            return;
        }

        debug!(
            from = self.capacity(),
            to = new_capacity,
            len = self.len,
            "Rehashing chains."
        );

        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        self.len = 0;

        for (key, value) in old.into_iter().flatten() {
            self.insert_owned(key, value);
        }
    }

    /// Number of buckets whose chain is empty.
    fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    fn get_keys(&self) -> Vec<&str> {
        self.iter().map(|(key, _)| key).collect()
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn len(&self) -> usize {
        self.len
    }
}

fn empty_buckets<V>(capacity: usize) -> Vec<Chain<V>> {
    std::iter::repeat_with(Chain::new).take(capacity).collect()
}

impl<V: fmt::Debug, H> fmt::Debug for ChainedMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedMap")
            .field("capacity", &self.buckets.len())
            .field("len", &self.len)
            .field("buckets", &self.buckets)
            .finish_non_exhaustive()
    }
}

/// One line per bucket: `{index}: ` followed by the chain, head first.
impl<V: fmt::Display, H> fmt::Display for ChainedMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            writeln!(f, "{index}: {chain}")?;
        }

        Ok(())
    }
}

impl<V: Serialize, H: StringHasher> Serialize for ChainedMap<V, H> {
    fn serialize<S>(&self, ser: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.collect_map(self.iter())
    }
}
