//! Ordered multiset: the duplicate-permitting view of the red-black
//! engine. Equal elements sit contiguously in iteration order, which makes
//! `count`, `equal_range` and the bound queries the primary interface.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;

use rb_tree::{DupPolicy, RbTree};

pub struct OrdMultiset<T> {
    tree: RbTree<T, ()>,
}

impl<T> OrdMultiset<T> {
    pub fn len(&self) -> usize { self.tree.len() }
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }
    pub fn clear(&mut self) { self.tree.clear() }

    pub fn iter(&self) -> Iter<'_, T> { Iter(self.tree.iter()) }
}

impl<T: Ord> OrdMultiset<T> {
    pub fn new() -> Self { Self { tree: RbTree::new(DupPolicy::Allow) } }

    /// A duplicate lands at the upper bound of its equal run.
    pub fn insert(&mut self, value: T) {
        // the engine only rejects under DupPolicy::Reject
        let _ = self.tree.insert(value, ());
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

    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.count(value)
    }

    /// Iterator over the contiguous run of elements equal to `value`.
    pub fn equal_range<Q>(&self, value: &Q) -> EqualRange<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        EqualRange(self.tree.equal_range(value))
    }

    /// Position of the first element `>= value`.
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor(self.tree.lower_bound(value))
    }

    /// Position of the first element `> value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor(self.tree.upper_bound(value))
    }

    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor(self.tree.find(value))
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

    /// Removes one member of the equal run, if any.
    pub fn remove_one<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(value).is_some()
    }

    /// Removes the whole equal run, returning how many went away.
    pub fn remove_all<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove_all(value)
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut(self.tree.cursor_front_mut())
    }

    /// Relocates every element of `other` into `self`, duplicates and all;
    /// `other` is left empty.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree)
    }
}

impl<T: Ord> Default for OrdMultiset<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Clone> Clone for OrdMultiset<T> {
    fn clone(&self) -> Self { Self { tree: self.tree.clone() } }
}

impl<T: fmt::Debug> fmt::Debug for OrdMultiset<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for OrdMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut multiset = Self::new();
        multiset.extend(iter);
        multiset
    }
}

impl<T: Ord> Extend<T> for OrdMultiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: PartialEq> PartialEq for OrdMultiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OrdMultiset<T> {}

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

pub struct EqualRange<'a, T>(rb_tree::Range<'a, T, ()>);

impl<'a, T> Iterator for EqualRange<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.0.next().map(|(value, ())| value)
    }
}

impl<T> FusedIterator for EqualRange<'_, T> {}

impl<T> Clone for EqualRange<'_, T> {
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

impl<T> IntoIterator for OrdMultiset<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> { IntoIter(self.tree.into_iter()) }
}

impl<'a, T> IntoIterator for &'a OrdMultiset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> { Iter(self.tree.iter()) }
}

/// Shared position over the multiset, comparable by position identity.
pub struct Cursor<'a, T>(rb_tree::Cursor<'a, T, ()>);

impl<'a, T> Cursor<'a, T> {
    pub fn value(&self) -> Option<&'a T> { self.0.key() }
    pub fn is_end(&self) -> bool { self.0.is_end() }
    pub fn move_next(&mut self) { self.0.move_next() }
    pub fn move_prev(&mut self) { self.0.move_prev() }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(fmt)
    }
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
