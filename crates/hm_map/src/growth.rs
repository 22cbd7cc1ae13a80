use serde::{Deserialize, Serialize};

/// How an [`OpenAddressingMap`] picks its next capacity when it grows.
///
/// [`OpenAddressingMap`]: crate::OpenAddressingMap
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthPolicy {
    /// Double the capacity.
    ///
    /// Quadratic probing only visits every slot for prime capacities, so a
    /// doubled capacity may leave some slots unreachable from a given home
    /// bucket. The map recovers from an exhausted probe by growing to a prime
    /// capacity.
    #[default]
    Double,

    /// Double the capacity, then round up to the next prime.
    DoublePrime,
}

impl GrowthPolicy {
    /// The capacity to grow to from `capacity`.
    #[must_use]
    pub fn next_capacity(self, capacity: usize) -> usize {
        let doubled = capacity.saturating_mul(2).max(1);

        match self {
            Self::Double => doubled,
            Self::DoublePrime => next_prime(doubled),
        }
    }
}

/// The smallest prime `>= n`.
#[must_use]
pub fn next_prime(n: usize) -> usize {
    (n.max(2)..).find(|&c| is_prime(c)).unwrap_or(usize::MAX)
}

#[must_use]
pub fn is_prime(n: usize) -> bool {
    match n {
        0 | 1 => false,
        2 | 3 => true,
        _ if n % 2 == 0 || n % 3 == 0 => false,
        _ => {
            let mut i = 5;
            while i <= n / i {
                if n % i == 0 || n % (i + 2) == 0 {
                    return false;
                }
                i += 6;
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn primes() {
        let primes: Vec<_> = (0..40).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37]);

        assert!(is_prime(7919));
        assert!(!is_prime(7917));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
    }

    #[test]
    fn next_prime_rounds_up() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(2), 2);
        assert_eq!(next_prime(14), 17);
        assert_eq!(next_prime(100), 101);
        assert_eq!(next_prime(200), 211);
    }

    #[test]
    fn next_capacity() {
        let cases = [
            (GrowthPolicy::Double, 1, 2),
            (GrowthPolicy::Double, 50, 100),
            (GrowthPolicy::Double, 0, 1),
            (GrowthPolicy::DoublePrime, 1, 2),
            (GrowthPolicy::DoublePrime, 50, 101),
            (GrowthPolicy::DoublePrime, 7, 17),
        ];

        for (policy, capacity, expected) in cases {
            assert_eq!(
                policy.next_capacity(capacity),
                expected,
                "{policy:?} from {capacity}"
            );
        }
    }
}
