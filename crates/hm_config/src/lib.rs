mod error;
mod parse;

use std::fmt;

use hm_hash::HasherKind;
use hm_map::GrowthPolicy;
use serde::{Deserialize, Serialize, de::IntoDeserializer as _};

pub use error::Error;
pub use parse::{build, load_envs, load_from_file};

use crate::error::Result;

/// Bucket count of a map when none is configured.
pub const DEFAULT_CAPACITY: usize = 11;

/// Keys accepted by [`Config::set`].
pub const KEYS: [&str; 4] = ["map.variant", "map.capacity", "map.hasher", "map.growth"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    pub map: MapConfig,
}

/// How to build a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct MapConfig {
    /// Collision-resolution strategy.
    pub variant: Variant,

    /// Initial number of buckets.
    pub capacity: usize,

    /// Hash function bound to the map at construction.
    pub hasher: HasherKind,

    /// Growth policy of the open-addressing variant.
    ///
    /// Ignored by the chained variant, which only resizes on request.
    pub growth: GrowthPolicy,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            capacity: DEFAULT_CAPACITY,
            hasher: HasherKind::default(),
            growth: GrowthPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    OpenAddressing,
    Chained,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAddressing => f.write_str("open-addressing"),
            Self::Chained => f.write_str("chained"),
        }
    }
}

impl Config {
    /// Set a single value by its dotted key, e.g. `map.capacity`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "map.variant" => self.map.variant = parse_value(key, value)?,
            "map.capacity" => {
                self.map.capacity = value.parse().map_err(|err: std::num::ParseIntError| {
                    Error::InvalidConfigValue {
                        key: key.to_owned(),
                        value: value.to_owned(),
                        reason: err.to_string(),
                    }
                })?;
            }
            "map.hasher" => self.map.hasher = parse_value(key, value)?,
            "map.growth" => self.map.growth = parse_value(key, value)?,
            _ => {
                return Err(Error::UnknownConfigKey {
                    key: key.to_owned(),
                    available_keys: KEYS.to_vec(),
                });
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.map.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(Into::into)
    }
}

/// Parse a kebab-case enum value the same way a config file would.
fn parse_value<T: for<'de> Deserialize<'de>>(key: &str, value: &str) -> Result<T> {
    T::deserialize(value.into_deserializer()).map_err(|err: serde::de::value::Error| {
        Error::InvalidConfigValue {
            key: key.to_owned(),
            value: value.to_owned(),
            reason: err.to_string(),
        }
    })
}
