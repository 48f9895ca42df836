//! State identifiers and state sets.

use fixedbitset::FixedBitSet;
use std::fmt;

/// A state identifier. States of every automaton in the pipeline are numbered
/// densely from zero.
pub type StateId = u32;

/// A set of states backed by a bit set.
///
/// Grows on demand; out-of-range queries answer `false` rather than panic.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create an empty set sized for the given number of states.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    pub fn insert(&mut self, state: StateId) {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        self.bits.insert(idx);
    }

    pub fn contains(&self, state: StateId) -> bool {
        let idx = state as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Add every member of `other` to this set.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// True if the two sets share a member.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.bits.intersection(&other.bits).next().is_some()
    }

    pub fn intersection(&self, other: &StateSet) -> StateSet {
        let mut result = self.clone();
        let len = result.bits.len().max(other.bits.len());
        result.bits.grow(len);
        result.bits.intersect_with(&other.bits);
        result
    }

    /// Members of this set that are not in `other`.
    pub fn difference(&self, other: &StateSet) -> StateSet {
        let mut result = self.clone();
        result.bits.difference_with(&other.bits);
        result
    }

    /// The members as a sorted vector; the canonical key form.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = StateSet::default();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = StateSet::with_capacity(8);
        assert!(set.is_empty());
        set.insert(2);
        set.insert(5);
        assert_eq!(set.len(), 2);
        assert!(set.contains(2));
        assert!(set.contains(5));
        assert!(!set.contains(3));
        assert!(!set.contains(100));
    }

    #[test]
    fn test_grows_past_capacity() {
        let mut set = StateSet::with_capacity(2);
        set.insert(40);
        assert!(set.contains(40));
    }

    #[test]
    fn test_union_and_intersection() {
        let a: StateSet = [1, 3, 5].into_iter().collect();
        let b: StateSet = [3, 5, 7].into_iter().collect();

        let mut u = a.clone();
        u.union_with(&b);
        assert_eq!(u.to_vec(), vec![1, 3, 5, 7]);

        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b).to_vec(), vec![3, 5]);
        assert_eq!(a.difference(&b).to_vec(), vec![1]);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let set: StateSet = [9, 1, 4].into_iter().collect();
        assert_eq!(set.to_vec(), vec![1, 4, 9]);
    }
}
