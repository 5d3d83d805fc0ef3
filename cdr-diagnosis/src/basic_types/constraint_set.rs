use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::slice::Iter;

use itertools::Itertools;
use num::integer::div_ceil;

use super::ConstraintId;
use super::HashSet;

/// An ordered set of constraints.
///
/// The order of the elements is meaningful: constraints which come first are preferred to be
/// kept, constraints which come last are preferred to be discarded. Every operation on a
/// [`ConstraintSet`] preserves the relative order of the elements it keeps; duplicates are
/// dropped on insertion (the first occurrence wins).
///
/// Two sets are equal when they contain the same elements in the same order; use
/// [`ConstraintSet::same_elements`] for an order-insensitive comparison.
#[derive(Clone, Debug, Default)]
pub struct ConstraintSet {
    elements: Vec<ConstraintId>,
    members: HashSet<ConstraintId>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, constraint: ConstraintId) -> bool {
        self.members.contains(&constraint)
    }

    pub fn iter(&self) -> Iter<'_, ConstraintId> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[ConstraintId] {
        &self.elements
    }

    /// Appends `constraint` at the end of the set. Returns `false` if it was already present, in
    /// which case the set is unchanged.
    pub fn insert(&mut self, constraint: ConstraintId) -> bool {
        if self.members.insert(constraint) {
            self.elements.push(constraint);
            true
        } else {
            false
        }
    }

    /// Returns a copy of this set with `constraint` appended.
    pub fn with(&self, constraint: ConstraintId) -> ConstraintSet {
        let mut result = self.clone();
        let _ = result.insert(constraint);
        result
    }

    /// Returns a copy of this set without `constraint`.
    pub fn without(&self, constraint: ConstraintId) -> ConstraintSet {
        self.iter()
            .copied()
            .filter(|&element| element != constraint)
            .collect()
    }

    /// The elements of `self` followed by the elements of `other` which are not in `self`.
    pub fn union(&self, other: &ConstraintSet) -> ConstraintSet {
        let mut result = self.clone();
        result.extend(other.iter().copied());
        result
    }

    /// The elements of `self` which are not in `other`, in the order of `self`.
    pub fn difference(&self, other: &ConstraintSet) -> ConstraintSet {
        if other.is_empty() {
            return self.clone();
        }

        self.iter()
            .copied()
            .filter(|element| !other.contains(*element))
            .collect()
    }

    /// The elements of `self` which are also in `other`, in the order of `self`.
    pub fn intersection(&self, other: &ConstraintSet) -> ConstraintSet {
        self.iter()
            .copied()
            .filter(|element| other.contains(*element))
            .collect()
    }

    /// Splits the set into its first and its second half, without reordering.
    ///
    /// For a set of size `q` the first half holds the first `⌈q/2⌉` elements and the second half
    /// the remaining `⌊q/2⌋`; an odd element count gives the extra element to the first half.
    pub fn ordered_split(&self) -> (ConstraintSet, ConstraintSet) {
        let k = div_ceil(self.len(), 2);

        let first = self.elements[..k].iter().copied().collect();
        let second = self.elements[k..].iter().copied().collect();

        (first, second)
    }

    pub fn is_subset(&self, other: &ConstraintSet) -> bool {
        self.len() <= other.len() && self.iter().all(|element| other.contains(*element))
    }

    pub fn is_disjoint(&self, other: &ConstraintSet) -> bool {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        !smaller.iter().any(|element| larger.contains(*element))
    }

    pub fn intersects(&self, other: &ConstraintSet) -> bool {
        !self.is_disjoint(other)
    }

    /// Whether both sets contain the same elements, regardless of their order.
    pub fn same_elements(&self, other: &ConstraintSet) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }

    /// The elements in ascending identifier order.
    pub fn sorted(&self) -> Vec<ConstraintId> {
        self.iter().copied().sorted().collect()
    }

    /// Returns the set in reverse order.
    pub fn reversed(&self) -> ConstraintSet {
        self.iter().rev().copied().collect()
    }
}

impl PartialEq for ConstraintSet {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Eq for ConstraintSet {}

impl Hash for ConstraintSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.elements.hash(state)
    }
}

impl Extend<ConstraintId> for ConstraintSet {
    fn extend<T: IntoIterator<Item = ConstraintId>>(&mut self, iter: T) {
        for constraint in iter {
            let _ = self.insert(constraint);
        }
    }
}

impl FromIterator<ConstraintId> for ConstraintSet {
    fn from_iter<T: IntoIterator<Item = ConstraintId>>(iter: T) -> Self {
        let mut set = ConstraintSet::default();
        set.extend(iter);
        set
    }
}

impl From<Vec<ConstraintId>> for ConstraintSet {
    fn from(elements: Vec<ConstraintId>) -> Self {
        elements.into_iter().collect()
    }
}

impl<const N: usize> From<[ConstraintId; N]> for ConstraintSet {
    fn from(elements: [ConstraintId; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a ConstraintId;
    type IntoIter = Iter<'a, ConstraintId>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Display for ConstraintSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.elements.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> ConstraintSet {
        ids.iter().map(|&id| ConstraintId::new(id)).collect()
    }

    #[test]
    fn duplicates_are_dropped_and_first_occurrence_wins() {
        let constraints = set(&[3, 1, 3, 2, 1]);

        assert_eq!(constraints.as_slice(), set(&[3, 1, 2]).as_slice());
        assert_eq!(constraints.len(), 3);
    }

    #[test]
    fn split_of_even_set_gives_equal_halves() {
        let (first, second) = set(&[0, 1, 2, 3]).ordered_split();

        assert_eq!(first, set(&[0, 1]));
        assert_eq!(second, set(&[2, 3]));
    }

    #[test]
    fn split_of_odd_set_gives_extra_element_to_first_half() {
        let (first, second) = set(&[4, 2, 7, 1, 0]).ordered_split();

        assert_eq!(first, set(&[4, 2, 7]));
        assert_eq!(second, set(&[1, 0]));
    }

    #[test]
    fn split_partitions_without_reordering() {
        for size in 1..12 {
            let constraints: ConstraintSet = (0..size).rev().map(ConstraintId::new).collect();
            let (first, second) = constraints.ordered_split();

            assert_eq!(first.len(), size as usize - size as usize / 2);
            assert_eq!(second.len(), size as usize / 2);
            assert!(first.is_disjoint(&second));
            assert_eq!(first.union(&second), constraints);
        }
    }

    #[test]
    fn split_of_singleton_leaves_second_half_empty() {
        let (first, second) = set(&[5]).ordered_split();

        assert_eq!(first, set(&[5]));
        assert!(second.is_empty());
    }

    #[test]
    fn union_appends_missing_elements_in_order() {
        let union = set(&[2, 0]).union(&set(&[1, 0, 3]));

        assert_eq!(union, set(&[2, 0, 1, 3]));
    }

    #[test]
    fn difference_keeps_order_of_left_operand() {
        let difference = set(&[5, 1, 4, 2, 3]).difference(&set(&[4, 5]));

        assert_eq!(difference, set(&[1, 2, 3]));
    }

    #[test]
    fn equality_is_order_sensitive_but_same_elements_is_not() {
        let a = set(&[0, 1]);
        let b = set(&[1, 0]);

        assert_ne!(a, b);
        assert!(a.same_elements(&b));
        assert_eq!(a.sorted(), b.sorted());
    }

    #[test]
    fn subset_and_disjointness() {
        let small = set(&[1, 3]);
        let large = set(&[0, 1, 2, 3]);

        assert!(small.is_subset(&large));
        assert!(!large.is_subset(&small));
        assert!(small.intersects(&large));
        assert!(small.is_disjoint(&set(&[0, 2])));
    }

    #[test]
    fn with_and_without_derive_new_sets() {
        let base = set(&[0, 1]);

        assert_eq!(base.with(ConstraintId::new(2)), set(&[0, 1, 2]));
        assert_eq!(base.without(ConstraintId::new(0)), set(&[1]));
        assert_eq!(base, set(&[0, 1]));
    }
}
