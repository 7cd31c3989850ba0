//! Unique-key ordered set over the shared red-black engine.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;

use rb_tree::{DupPolicy, RbTree};

pub struct OrdSet<T> {
    tree: RbTree<T, ()>,
}

impl<T> OrdSet<T> {
    pub fn len(&self) -> usize { self.tree.len() }
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }
    pub fn clear(&mut self) { self.tree.clear() }

    pub fn iter(&self) -> Iter<'_, T> { Iter(self.tree.iter()) }
}

impl<T: Ord> OrdSet<T> {
    pub fn new() -> Self { Self { tree: RbTree::new(DupPolicy::Reject) } }

    /// An equal element keeps its place; returns whether `value` went in.
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert(value, ()).is_ok()
    }

    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(value).is_some()
    }

    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(value).map(|(value, ())| value)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(value)
    }

    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_key_value(value).map(|(value, ())| value)
    }

    pub fn first(&self) -> Option<&T> {
        self.tree.first_key_value().map(|(value, ())| value)
    }

    pub fn last(&self) -> Option<&T> {
        self.tree.last_key_value().map(|(value, ())| value)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first().map(|(value, ())| value)
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last().map(|(value, ())| value)
    }

    /// Exclusive walk over the elements in order; `remove_current`
    /// consumes the position it points at.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut(self.tree.cursor_front_mut())
    }

    /// Relocates every element of `other` whose value is not already
    /// present; collisions stay behind in `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree)
    }
}

impl<T: Ord> Default for OrdSet<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Clone> Clone for OrdSet<T> {
    fn clone(&self) -> Self { Self { tree: self.tree.clone() } }
}

impl<T: fmt::Debug> fmt::Debug for OrdSet<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for OrdSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for OrdSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: PartialEq> PartialEq for OrdSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OrdSet<T> {}

pub struct Iter<'a, T>(rb_tree::Iter<'a, T, ()>);

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.0.next().map(|(value, ())| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(value, ())| value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

pub struct IntoIter<T>(rb_tree::IntoIter<T, ()>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> { self.0.next().map(|(value, ())| value) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.0.next_back().map(|(value, ())| value)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for OrdSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> { IntoIter(self.tree.into_iter()) }
}

impl<'a, T> IntoIterator for &'a OrdSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> { Iter(self.tree.iter()) }
}

pub struct CursorMut<'a, T>(rb_tree::CursorMut<'a, T, ()>);

impl<T> CursorMut<'_, T> {
    pub fn value(&self) -> Option<&T> { self.0.key() }
    pub fn is_end(&self) -> bool { self.0.is_end() }
    pub fn move_next(&mut self) { self.0.move_next() }
    pub fn move_prev(&mut self) { self.0.move_prev() }

    pub fn remove_current(&mut self) -> Option<T> {
        self.0.remove_current().map(|(value, ())| value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::mem;

    use keygen::{Gen, WithDupes};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    use crate::OrdSet;

    #[test]
    fn new_set_is_empty() {
        let set: OrdSet<i32> = OrdSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.first().is_none());
        assert!(set.last().is_none());
    }

    #[test]
    fn from_iterator_sorts_and_dedups() {
        let set: OrdSet<_> = [5, 3, 4, 6].into_iter().collect();
        assert_eq!(set.len(), 4);
        assert_eq!(set.first(), Some(&3));
        assert_eq!(set.last(), Some(&6));

        let set: OrdSet<_> = [1, 1, 1].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut set: OrdSet<_> = [1, 2, 3, 4, 5].into_iter().collect();
        assert!(set.insert(10));
        assert!(!set.insert(10));
        assert_eq!(set.len(), 6);
        assert!(set.contains(&10));
    }

    #[test]
    fn find_and_contains() {
        let set: OrdSet<_> = [1, 3, 4, 5, 6].into_iter().collect();
        assert_eq!(set.get(&5), Some(&5));
        assert_eq!(set.get(&2), None);
        assert!(set.contains(&6));
        assert!(!set.contains(&7));
    }

    #[test]
    fn remove_and_take() {
        let mut set: OrdSet<_> = [1, 2, 3].into_iter().collect();
        assert!(set.remove(&2));
        assert!(!set.remove(&2));
        assert_eq!(set.take(&3), Some(3));
        assert_eq!(set.take(&3), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_on_empty_is_noop() {
        let mut set: OrdSet<i32> = OrdSet::new();
        assert!(!set.remove(&1));
        assert!(set.pop_first().is_none());
    }

    #[test]
    fn iter_is_sorted() {
        let set: OrdSet<_> = [8, 1, 2, 3, 7, 4, 5, 6].into_iter().collect();
        let values: Vec<_> = set.iter().copied().collect();
        assert_eq!(values, [1, 2, 3, 4, 5, 6, 7, 8]);
        let back: Vec<_> = set.iter().rev().copied().collect();
        assert_eq!(back, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn cursor_erase_keeps_odds() {
        let mut set: OrdSet<_> = [8, 1, 2, 3, 7, 4, 5, 6].into_iter().collect();
        let mut cur = set.cursor_front_mut();
        while let Some(&value) = cur.value() {
            if value % 2 == 0 {
                cur.remove_current();
            } else {
                cur.move_next();
            }
        }
        assert_eq!(set.first(), Some(&1));
        let values: Vec<_> = set.iter().copied().collect();
        assert_eq!(values, [1, 3, 5, 7]);
    }

    #[test]
    fn merge_keeps_collisions_in_source() {
        let mut dst: OrdSet<_> = [1, 2, 3, 4, 5].into_iter().collect();
        let mut src: OrdSet<_> = [5, 7, 8, 9, 10].into_iter().collect();
        dst.merge(&mut src);
        assert_eq!(dst.len(), 9);
        assert_eq!(dst.first(), Some(&1));
        assert_eq!(dst.last(), Some(&10));
        assert_eq!(src.len(), 1);
        assert!(src.contains(&5));
    }

    #[test]
    fn self_merge_is_unrepresentable() {
        // merge takes two exclusive borrows, so `s.merge(&mut s)` does not
        // compile; merging disjoint sets twice is the closest spelling
        let mut dst: OrdSet<_> = [1].into_iter().collect();
        let mut src = OrdSet::new();
        dst.merge(&mut src);
        dst.merge(&mut src);
        assert_eq!(dst.len(), 1);
    }

    #[test]
    fn swap_and_move() {
        let mut a: OrdSet<_> = [1, 2, 3, 4, 5].into_iter().collect();
        let mut b: OrdSet<_> = [6, 7, 8, 9, 10].into_iter().collect();
        mem::swap(&mut a, &mut b);
        assert_eq!(a.first(), Some(&6));
        assert_eq!(a.last(), Some(&10));
        assert_eq!(b.first(), Some(&1));
        assert_eq!(b.last(), Some(&5));

        let moved = mem::take(&mut a);
        assert!(a.is_empty());
        assert_eq!(moved.len(), 5);
    }

    #[test]
    fn clone_is_independent() {
        let origin: OrdSet<_> = [5, 3, 4, 6].into_iter().collect();
        let mut copy = origin.clone();
        copy.remove(&3);
        copy.insert(42);
        assert_eq!(origin.len(), 4);
        assert!(origin.contains(&3));
        assert!(!origin.contains(&42));
        assert_eq!(origin.first(), Some(&3));
    }

    #[test]
    fn extend_skips_existing() {
        let mut set: OrdSet<_> = [1, 3, 8, 5, -2].into_iter().collect();
        set.extend([9, -1, 1]);
        assert_eq!(set.len(), 7);
    }

    #[test]
    fn eq_compares_contents() {
        let a: OrdSet<_> = [3, 1, 2].into_iter().collect();
        let b: OrdSet<_> = [1, 2, 3].into_iter().collect();
        let c: OrdSet<_> = [1, 2].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn debug_format() {
        let set: OrdSet<_> = [2, 1].into_iter().collect();
        assert_eq!(format!("{set:?}"), "{1, 2}");
    }

    #[test]
    fn randomized_against_std() {
        let mut rng = ChaCha20Rng::from_seed([9; 32]);
        for _ in 0..10 {
            let mut set = OrdSet::new();
            let mut expected = BTreeSet::new();
            let keys = WithDupes { bound: 0..48, len: 300 }.generate(&mut rng);
            for key in keys {
                if rng.gen_bool(0.25) {
                    assert_eq!(set.remove(&key), expected.remove(&key));
                } else {
                    assert_eq!(set.insert(key), expected.insert(key));
                }
                assert_eq!(set.len(), expected.len());
            }
            assert!(set.iter().eq(expected.iter()));
        }
    }

    #[test]
    fn into_iter_yields_sorted_owned() {
        let set: OrdSet<String> =
            ["b", "a", "c"].into_iter().map(String::from).collect();
        let values: Vec<String> = set.into_iter().collect();
        assert_eq!(values, ["a", "b", "c"]);
    }
}
