//! Unique-key ordered map over the shared red-black engine.
//!
//! `insert` keeps an existing entry (engine semantics); overwriting is the
//! separate [`OrdMap::insert_or_assign`]. Checked access goes through
//! [`OrdMap::at`], which reports a missing key as [`OutOfRange`] instead of
//! panicking; the panicking form is the `Index` operator, as in std.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use out_of_range::OutOfRange;
use rb_tree::{DupPolicy, RbTree};

pub use rb_tree::{IntoIter, Iter, IterMut};

pub struct OrdMap<K, V> {
    tree: RbTree<K, V>,
}

impl<K, V> OrdMap<K, V> {
    pub fn len(&self) -> usize { self.tree.len() }
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }
    pub fn clear(&mut self) { self.tree.clear() }

    pub fn iter(&self) -> Iter<'_, K, V> { self.tree.iter() }
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> { self.tree.iter_mut() }

    pub fn keys(&self) -> Keys<'_, K, V> { Keys(self.tree.iter()) }
    pub fn values(&self) -> Values<'_, K, V> { Values(self.tree.iter()) }
}

impl<K: Ord, V> OrdMap<K, V> {
    pub fn new() -> Self { Self { tree: RbTree::new(DupPolicy::Reject) } }

    /// An existing entry keeps both its key and value; returns whether the
    /// pair went in.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.tree.insert(key, value).is_ok()
    }

    /// Overwrites the value of an existing key, or inserts a new entry;
    /// hands back the replaced value.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V> {
        match self.tree.insert(key, value) {
            Ok(()) => None,
            Err((key, value)) => {
                self.tree.get_mut(&key).map(|slot| std::mem::replace(slot, value))
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_mut(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_key_value(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(key)
    }

    /// Checked access: a missing key is an [`OutOfRange`], never a panic.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, OutOfRange>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(key).ok_or(OutOfRange)
    }

    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, OutOfRange>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_mut(key).ok_or(OutOfRange)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key).map(|(_, value)| value)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first_key_value()
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last_key_value()
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> { self.tree.pop_first() }
    pub fn pop_last(&mut self) -> Option<(K, V)> { self.tree.pop_last() }

    /// Relocates every entry of `other` whose key is not already present;
    /// colliding entries stay behind in `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree)
    }

    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        if self.contains_key(&key) {
            Entry::Occupied(OccupiedEntry { key, map: self })
        } else {
            Entry::Vacant(VacantEntry { key, map: self })
        }
    }
}

impl<K: Ord, V> Default for OrdMap<K, V> {
    fn default() -> Self { Self::new() }
}

impl<K: Clone, V: Clone> Clone for OrdMap<K, V> {
    fn clone(&self) -> Self { Self { tree: self.tree.clone() } }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrdMap<K, V> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrdMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrdMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrdMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrdMap<K, V> {}

impl<K, Q, V> Index<&Q> for OrdMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// Panics when the key is absent; [`OrdMap::at`] is the checked form.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V> IntoIterator for OrdMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> { self.tree.into_iter() }
}

impl<'a, K, V> IntoIterator for &'a OrdMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> { self.tree.iter() }
}

pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> { self.0.next().map(|(key, _)| key) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

pub enum Entry<'a, K, V> {
    Vacant(VacantEntry<'a, K, V>),
    Occupied(OccupiedEntry<'a, K, V>),
}

pub struct VacantEntry<'a, K, V> {
    key: K,
    map: &'a mut OrdMap<K, V>,
}

pub struct OccupiedEntry<'a, K, V> {
    key: K,
    map: &'a mut OrdMap<K, V>,
}

impl<'a, K: Ord, V> Entry<'a, K, V> {
    pub fn key(&self) -> &K {
        match self {
            Self::Vacant(entry) => entry.key(),
            Self::Occupied(entry) => entry.key(),
        }
    }

    pub fn and_modify<F: FnOnce(&mut V)>(self, f: F) -> Entry<'a, K, V> {
        match self {
            Self::Occupied(mut entry) => {
                f(entry.get_mut());
                Self::Occupied(entry)
            }
            Self::Vacant(entry) => Self::Vacant(entry),
        }
    }

    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(default),
        }
    }

    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(default()),
        }
    }

    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(
        self,
        default: F,
    ) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }

    /// The `map[key]`-style access of the original interface: a missing
    /// entry appears with the default value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(V::default()),
        }
    }
}

impl<'a, K: Ord, V> VacantEntry<'a, K, V> {
    pub fn key(&self) -> &K { &self.key }
    pub fn into_key(self) -> K { self.key }

    pub fn insert(self, value: V) -> &'a mut V {
        let Self { key, map } = self;
        map.tree.get_or_insert_with(key, || value)
    }
}

impl<'a, K: Ord, V> OccupiedEntry<'a, K, V> {
    pub fn key(&self) -> &K { &self.key }

    pub fn get(&self) -> &V { self.map.get(&self.key).unwrap() }
    pub fn get_mut(&mut self) -> &mut V {
        self.map.get_mut(&self.key).unwrap()
    }
    pub fn into_mut(self) -> &'a mut V {
        let Self { key, map } = self;
        map.get_mut(&key).unwrap()
    }

    pub fn insert(&mut self, value: V) -> V {
        std::mem::replace(self.get_mut(), value)
    }

    pub fn remove(self) -> V { self.remove_entry().1 }
    pub fn remove_entry(self) -> (K, V) {
        let Self { key, map } = self;
        map.remove_entry(&key).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use maplit::btreemap;
    use out_of_range::OutOfRange;

    use crate::{Entry, OrdMap};

    fn fixture() -> OrdMap<i32, String> {
        btreemap! { 42 => "foo", 3 => "bar" }
            .into_iter()
            .map(|(k, v)| (k, v.to_owned()))
            .collect()
    }

    #[test]
    fn new_map_is_empty() {
        let map: OrdMap<i32, char> = OrdMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn from_pairs() {
        let map = fixture();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&42], "foo");
    }

    #[test]
    fn at_checked_access() {
        let mut map = fixture();
        *map.at_mut(&3).unwrap() = "abba".to_owned();
        assert_eq!(map.at_mut(&2), Err(OutOfRange));
        assert_eq!(map.at(&42), Ok(&"foo".to_owned()));
        assert_eq!(map.at(&3), Ok(&"abba".to_owned()));
    }

    #[test]
    fn entry_or_default_inserts_and_overwrites() {
        let mut map = fixture();
        *map.entry(3).or_default() = "abba".to_owned();
        assert_eq!(map[&42], "foo");
        assert_eq!(map[&3], "abba");
        *map.entry(7).or_default() = "new".to_owned();
        assert_eq!(map.len(), 3);
        assert_eq!(map[&7], "new");
    }

    #[test]
    fn iteration_is_key_ordered() {
        let map = fixture();
        assert_eq!(map.iter().next(), Some((&3, &"bar".to_owned())));
        assert_eq!(map.iter().next_back(), Some((&42, &"foo".to_owned())));
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, [3, 42]);
        let values: Vec<_> = map.values().cloned().collect();
        assert_eq!(values, ["bar", "foo"]);
    }

    #[test]
    fn insert_keeps_existing_entry() {
        let mut map = OrdMap::new();
        assert!(map.insert(32, "hello"));
        assert!(!map.insert(32, "other"));
        assert_eq!(map[&32], "hello");
    }

    #[test]
    fn insert_or_assign_overwrites() {
        let mut map = OrdMap::new();
        assert_eq!(map.insert_or_assign(32, "hello"), None);
        assert_eq!(map.insert_or_assign(32, "world"), Some("hello"));
        assert_eq!(map[&32], "world");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn remove_both_entries() {
        let mut map = fixture();
        assert_eq!(map.pop_first().map(|(k, _)| k), Some(3));
        assert_eq!(map.remove(&42), Some("foo".to_owned()));
        assert!(map.is_empty());
        assert_eq!(map.remove(&42), None);
    }

    #[test]
    fn swap_and_move() {
        let mut a = fixture();
        let mut b: OrdMap<_, _> = [(33, "foofoo".to_owned()), (4, "barbar".to_owned())]
            .into_iter()
            .collect();
        mem::swap(&mut a, &mut b);
        assert_eq!(a[&33], "foofoo");
        assert_eq!(a[&4], "barbar");
        assert_eq!(b[&42], "foo");
        assert_eq!(b[&3], "bar");

        let moved = mem::take(&mut a);
        assert!(a.is_empty());
        assert_eq!(moved.len(), 2);
    }

    #[test]
    fn merge_moves_missing_keys() {
        let mut dst = fixture();
        let mut src: OrdMap<_, _> = [
            (33, "foofoo".to_owned()),
            (4, "barbar".to_owned()),
            (42, "clash".to_owned()),
        ]
        .into_iter()
        .collect();
        dst.merge(&mut src);
        assert_eq!(dst.len(), 4);
        assert_eq!(dst[&33], "foofoo");
        assert_eq!(dst[&4], "barbar");
        assert_eq!(dst[&42], "foo");
        assert_eq!(src.len(), 1);
        assert_eq!(src[&42], "clash");
    }

    #[test]
    fn contains_and_get() {
        let map = fixture();
        assert!(map.contains_key(&42));
        assert!(!map.contains_key(&4));
        assert_eq!(map.get_key_value(&3), Some((&3, &"bar".to_owned())));
    }

    #[test]
    fn extend_ignores_colliding_pairs() {
        let mut map: OrdMap<_, _> =
            [(1, 0.21), (3, 0.21), (8, 0.21), (5, 0.21), (-2, 0.21)]
                .into_iter()
                .collect();
        map.extend([(9, 0.21), (-1, 0.21), (1, 0.99)]);
        assert_eq!(map.len(), 7);
        assert_eq!(map[&1], 0.21);
    }

    #[test]
    fn entry_api() {
        let mut map = OrdMap::new();
        assert_eq!(map.entry(0).key(), &0);

        map.entry(0).or_insert("zero");
        assert_eq!(map[&0], "zero");
        map.entry(0).or_insert_with(|| "xxx");
        assert_eq!(map[&0], "zero");
        assert_eq!(map.len(), 1);

        map.entry(2).or_insert_with_key(|_| "two");
        assert_eq!(map[&2], "two");

        map.entry(2).and_modify(|v| *v = "second");
        assert_eq!(map[&2], "second");
        map.entry(5).and_modify(|v| *v = "nope");
        assert!(!map.contains_key(&5));

        if let Entry::Occupied(mut occupied) = map.entry(2) {
            assert_eq!(occupied.get(), &"second");
            occupied.insert("again");
            assert_eq!(occupied.remove(), "again");
        } else {
            panic!("entry 2 should be occupied");
        }
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn iter_mut_and_values() {
        let mut map: OrdMap<_, _> =
            [(1, 1), (2, 2), (3, 3)].into_iter().collect();
        for (_, value) in map.iter_mut() {
            *value *= 10;
        }
        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, [10, 20, 30]);
    }

    #[test]
    fn clone_and_eq() {
        let origin = fixture();
        let mut copy = origin.clone();
        assert_eq!(origin, copy);
        copy.insert_or_assign(3, "other".to_owned());
        assert_ne!(origin, copy);
        assert_eq!(origin[&3], "bar");
    }

    #[test]
    fn debug_format() {
        let map: OrdMap<_, _> = [(2, 'b'), (1, 'a')].into_iter().collect();
        assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
    }
}
