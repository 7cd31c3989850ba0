//! Sorted `Vec` reference model for the ordered containers; everything is
//! linear-time, which is the point.

pub struct FlatOrd<K, V>(Vec<(K, V)>);

impl<K: Ord, V> FlatOrd<K, V> {
    pub fn new() -> Self { Self(vec![]) }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn lower_bound(&self, key: &K) -> usize {
        self.0.partition_point(|(k, _)| k < key)
    }
    pub fn upper_bound(&self, key: &K) -> usize {
        self.0.partition_point(|(k, _)| k <= key)
    }
    pub fn count(&self, key: &K) -> usize {
        self.upper_bound(key) - self.lower_bound(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let i = self.lower_bound(key);
        match self.0.get(i) {
            Some((k, v)) if k == key => Some(v),
            _ => None,
        }
    }

    /// Keeps an existing equal key; returns whether the pair went in.
    pub fn insert_unique(&mut self, key: K, value: V) -> bool {
        if self.get(&key).is_some() {
            return false;
        }
        let i = self.lower_bound(&key);
        self.0.insert(i, (key, value));
        true
    }

    /// Inserts at the upper bound of the equal run.
    pub fn insert_dup(&mut self, key: K, value: V) {
        let i = self.upper_bound(&key);
        self.0.insert(i, (key, value));
    }

    pub fn remove_first(&mut self, key: &K) -> Option<(K, V)> {
        let i = self.lower_bound(key);
        if self.0.get(i).is_some_and(|(k, _)| k == key) {
            Some(self.0.remove(i))
        } else {
            None
        }
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.0.is_empty() { None } else { Some(self.0.remove(0)) }
    }
    pub fn pop_last(&mut self) -> Option<(K, V)> { self.0.pop() }

    pub fn iter(&self) -> std::slice::Iter<'_, (K, V)> { self.0.iter() }
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.iter().map(|(k, _)| k)
    }
}

impl<K: Ord, V> Default for FlatOrd<K, V> {
    fn default() -> Self { Self::new() }
}

#[test]
fn sanity_check() {
    let mut flat = FlatOrd::new();
    assert!(flat.insert_unique(4, "d"));
    assert!(flat.insert_unique(1, "a"));
    assert!(!flat.insert_unique(4, "dd"));
    assert_eq!(flat.len(), 2);
    assert_eq!(flat.get(&4), Some(&"d"));
    assert_eq!(flat.get(&2), None);

    flat.insert_dup(4, "dd");
    assert_eq!(flat.count(&4), 2);
    assert_eq!(flat.remove_first(&4), Some((4, "d")));
    assert_eq!(flat.get(&4), Some(&"dd"));
    assert_eq!(flat.remove_first(&7), None);

    let keys: Vec<_> = flat.keys().copied().collect();
    assert_eq!(keys, [1, 4]);
}

#[test]
fn bounds() {
    let mut flat = FlatOrd::new();
    for x in [1, 3, 3, 3, 6] {
        flat.insert_dup(x, ());
    }
    assert_eq!(flat.lower_bound(&3), 1);
    assert_eq!(flat.upper_bound(&3), 4);
    assert_eq!(flat.count(&3), 3);
    assert_eq!(flat.count(&2), 0);
    assert_eq!(flat.pop_first(), Some((1, ())));
    assert_eq!(flat.pop_last(), Some((6, ())));
}
