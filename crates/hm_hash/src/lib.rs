//! String hash functions used to pick a bucket for a key.
//!
//! A map is handed its hasher once, at construction, and uses
//! `hash(key) % capacity` as the home bucket of `key`. Any [`StringHasher`]
//! works, including plain functions and closures:
//!
//! ```
//! use hm_hash::{StringHasher as _, additive};
//!
//! assert_eq!(additive.hash("ab"), 97 + 98);
//! assert_eq!((|key: &str| key.len() as u64).hash("abc"), 3);
//! ```

use std::{fmt, hash::BuildHasher as _, str::FromStr};

use serde::{Deserialize, Serialize};

/// Fixed seeds for [`HasherKind::Ahash`].
///
/// These must never change, or keys hashed by an older build land in
/// different buckets.
const AHASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Maps a string key to an unsigned integer.
///
/// Implementations must be pure: the same key always produces the same hash
/// for the lifetime of the hasher.
pub trait StringHasher {
    fn hash(&self, key: &str) -> u64;
}

impl<F> StringHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Sum of the Unicode scalar values of `key`.
///
/// Anagrams collide, which makes this a useful worst case for collision
/// handling.
#[must_use]
pub fn additive(key: &str) -> u64 {
    key.chars()
        .fold(0_u64, |hash, c| hash.wrapping_add(u64::from(c)))
}

/// Sum of each Unicode scalar value weighted by its one-based position.
#[must_use]
pub fn positional(key: &str) -> u64 {
    key.chars().zip(1_u64..).fold(0_u64, |hash, (c, weight)| {
        hash.wrapping_add(weight.wrapping_mul(u64::from(c)))
    })
}

/// The built-in hash functions, selectable by name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HasherKind {
    /// See [`additive`].
    #[default]
    Additive,

    /// See [`positional`].
    Positional,

    /// `aHash` with fixed seeds.
    Ahash,
}

impl HasherKind {
    pub const ALL: [Self; 3] = [Self::Additive, Self::Positional, Self::Ahash];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Positional => "positional",
            Self::Ahash => "ahash",
        }
    }
}

impl StringHasher for HasherKind {
    fn hash(&self, key: &str) -> u64 {
        match self {
            Self::Additive => additive(key),
            Self::Positional => positional(key),
            Self::Ahash => {
                let [k0, k1, k2, k3] = AHASH_SEEDS;
                ahash::RandomState::with_seeds(k0, k1, k2, k3).hash_one(key)
            }
        }
    }
}

impl fmt::Display for HasherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown hasher `{0}`, must be one of: additive, positional, ahash")]
pub struct UnknownHasher(pub String);

impl FromStr for HasherKind {
    type Err = UnknownHasher;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownHasher(s.to_owned()))
    }
}
