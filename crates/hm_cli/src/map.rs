use std::fmt;

use hm_config::{MapConfig, Variant};
use hm_hash::HasherKind;
use hm_map::{ChainedMap, Map, OpenAddressingMap};
use tracing::debug;

use crate::error::Result;

/// Either map variant, chosen at runtime from the configuration.
#[derive(Debug)]
pub(crate) enum AnyMap<V> {
    Open(OpenAddressingMap<V>),
    Chained(ChainedMap<V>),
}

impl<V> AnyMap<V> {
    /// Build the configured variant with its own capacity and hasher.
    pub(crate) fn from_config(config: &MapConfig) -> Result<Self> {
        Self::new(config, config.capacity, config.hasher)
    }

    /// Build the configured variant, overriding its capacity and hasher.
    pub(crate) fn new(config: &MapConfig, capacity: usize, hasher: HasherKind) -> Result<Self> {
        debug!(
            variant = %config.variant,
            capacity,
            %hasher,
            "Creating map."
        );

        let map = match config.variant {
            Variant::OpenAddressing => {
                Self::Open(OpenAddressingMap::new(capacity, hasher)?.with_growth(config.growth))
            }
            Variant::Chained => Self::Chained(ChainedMap::new(capacity, hasher)?),
        };

        Ok(map)
    }

    fn as_dyn(&self) -> &dyn Map<V> {
        match self {
            Self::Open(map) => map,
            Self::Chained(map) => map,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn Map<V> {
        match self {
            Self::Open(map) => map,
            Self::Chained(map) => map,
        }
    }
}

impl<V> Map<V> for AnyMap<V> {
    fn put(&mut self, key: &str, value: V) -> Option<V> {
        self.as_dyn_mut().put(key, value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        self.as_dyn().get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.as_dyn_mut().get_mut(key)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.as_dyn().contains_key(key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        self.as_dyn_mut().remove(key)
    }

    fn clear(&mut self) {
        self.as_dyn_mut().clear();
    }

    fn resize_table(&mut self, new_capacity: usize) {
        self.as_dyn_mut().resize_table(new_capacity);
    }

    fn empty_buckets(&self) -> usize {
        self.as_dyn().empty_buckets()
    }

    fn get_keys(&self) -> Vec<&str> {
        self.as_dyn().get_keys()
    }

    fn capacity(&self) -> usize {
        self.as_dyn().capacity()
    }

    fn len(&self) -> usize {
        self.as_dyn().len()
    }
}

impl<V: fmt::Display> fmt::Display for AnyMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(map) => map.fmt(f),
            Self::Chained(map) => map.fmt(f),
        }
    }
}
