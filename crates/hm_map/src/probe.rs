/// Quadratic probe sequence over a table of `capacity` slots.
///
/// Yields `(home + i²) % capacity` for `i` in `0..capacity`, so a probe never
/// visits more than `capacity` slots. The sequence covers every slot only
/// when `capacity` is prime; for other capacities some slots repeat.
#[derive(Debug, Clone)]
pub(crate) struct Probe {
    home: usize,
    capacity: usize,
    step: usize,
}

impl Probe {
    pub(crate) fn new(hash: u64, capacity: usize) -> Self {
        debug_assert!(capacity > 0);

        Self {
            home: (hash % capacity as u64) as usize,
            capacity,
            step: 0,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.step >= self.capacity {
            return None;
        }

        // u128 keeps `i²` from overflowing for large tables.
        let i = self.step as u128;
        let offset = (i * i % self.capacity as u128) as usize;
        self.step += 1;

        Some(((self.home as u128 + offset as u128) % self.capacity as u128) as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Probe {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn starts_at_home_bucket() {
        let probe: Vec<_> = Probe::new(23, 10).take(5).collect();

        // 3, 3+1, 3+4, 3+9, 3+16
        assert_eq!(probe, vec![3, 4, 7, 2, 9]);
    }

    #[test]
    fn bounded_by_capacity() {
        assert_eq!(Probe::new(0, 1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(Probe::new(5, 8).count(), 8);
        assert_eq!(Probe::new(5, 8).len(), 8);
    }

    #[test]
    fn prime_capacity_reaches_half_the_table() {
        let capacity = 11;
        let visited: BTreeSet<_> = Probe::new(4, capacity).collect();

        assert_eq!(visited.len(), capacity.div_ceil(2));
    }

    #[test]
    fn power_of_two_capacity_misses_slots() {
        let visited: BTreeSet<_> = Probe::new(0, 16).collect();

        // Squares mod 16 are {0, 1, 4, 9}.
        assert_eq!(visited, BTreeSet::from([0, 1, 4, 9]));
    }

    #[test]
    fn huge_capacity_does_not_overflow() {
        let capacity = usize::MAX / 2;
        let mut probe = Probe {
            step: capacity - 1_000,
            ..Probe::new(u64::MAX, capacity)
        };

        assert!(probe.all(|index| index < capacity));
    }
}
