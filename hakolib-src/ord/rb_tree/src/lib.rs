//! Red-black tree engine behind the ordered containers.
//!
//! One engine serves `ord_set`, `ord_multiset` and `ord_map`: the duplicate
//! policy is fixed at construction and consulted by [`RbTree::insert`] and
//! [`RbTree::merge`]. `left`/`right` are the owning links; `parent` exists
//! for iterator stepping and rebalancing only and never owns.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

mod cursor;
mod iter;

pub use cursor::{Cursor, CursorMut};
pub use iter::{IntoIter, Iter, IterMut, Range};

/// What [`RbTree::insert`] and [`RbTree::merge`] do with a key that is
/// already present.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DupPolicy {
    Reject,
    Allow,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Color {
    Red,
    Black,
}

type Link<K, V> = Option<NonNull<Node<K, V>>>;

struct Node<K, V> {
    parent: Link<K, V>,
    left: Link<K, V>,
    right: Link<K, V>,
    color: Color,
    key: K,
    value: V,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Self {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
            key,
            value,
        })))
    }

    fn into_kv(self: Box<Self>) -> (K, V) {
        let Self { key, value, .. } = *self;
        (key, value)
    }
}

fn color<K, V>(link: Link<K, V>) -> Color {
    // absent children count as black
    link.map_or(Color::Black, |n| unsafe { (*n.as_ptr()).color })
}

pub(crate) unsafe fn min_node<K, V>(
    mut n: NonNull<Node<K, V>>,
) -> NonNull<Node<K, V>> {
    while let Some(left) = (*n.as_ptr()).left {
        n = left;
    }
    n
}

pub(crate) unsafe fn max_node<K, V>(
    mut n: NonNull<Node<K, V>>,
) -> NonNull<Node<K, V>> {
    while let Some(right) = (*n.as_ptr()).right {
        n = right;
    }
    n
}

pub(crate) unsafe fn successor<K, V>(n: NonNull<Node<K, V>>) -> Link<K, V> {
    if let Some(right) = (*n.as_ptr()).right {
        return Some(min_node(right));
    }
    let mut child = n;
    while let Some(parent) = (*child.as_ptr()).parent {
        if (*parent.as_ptr()).left == Some(child) {
            return Some(parent);
        }
        child = parent;
    }
    None
}

pub(crate) unsafe fn predecessor<K, V>(n: NonNull<Node<K, V>>) -> Link<K, V> {
    if let Some(left) = (*n.as_ptr()).left {
        return Some(max_node(left));
    }
    let mut child = n;
    while let Some(parent) = (*child.as_ptr()).parent {
        if (*parent.as_ptr()).right == Some(child) {
            return Some(parent);
        }
        child = parent;
    }
    None
}

pub struct RbTree<K, V> {
    root: Link<K, V>,
    len: usize,
    policy: DupPolicy,
    _marker: PhantomData<Box<Node<K, V>>>,
}

impl<K, V> RbTree<K, V> {
    pub fn new(policy: DupPolicy) -> Self {
        Self { root: None, len: 0, policy, _marker: PhantomData }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn clear(&mut self) {
        // rotate left subtrees out of the way so destruction needs
        // neither recursion nor an auxiliary stack
        let mut cur = self.root.take();
        self.len = 0;
        while let Some(n) = cur {
            unsafe {
                match (*n.as_ptr()).left.take() {
                    Some(left) => {
                        (*n.as_ptr()).left = (*left.as_ptr()).right.take();
                        (*left.as_ptr()).right = Some(n);
                        cur = Some(left);
                    }
                    None => {
                        cur = (*n.as_ptr()).right.take();
                        drop(Box::from_raw(n.as_ptr()));
                    }
                }
            }
        }
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root| unsafe {
            let n = min_node(root).as_ptr();
            (&(*n).key, &(*n).value)
        })
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|root| unsafe {
            let n = max_node(root).as_ptr();
            (&(*n).key, &(*n).value)
        })
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.root.map(|root| unsafe { min_node(root) })?;
        Some(unsafe { self.detach(first) }.into_kv())
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.root.map(|root| unsafe { max_node(root) })?;
        Some(unsafe { self.detach(last) }.into_kv())
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            front: self.root.map(|root| unsafe { min_node(root) }),
            back: self.root.map(|root| unsafe { max_node(root) }),
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            front: self.root.map(|root| unsafe { min_node(root) }),
            back: self.root.map(|root| unsafe { max_node(root) }),
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    pub fn cursor_front(&self) -> Cursor<'_, K, V> {
        Cursor { node: self.root.map(|root| unsafe { min_node(root) }), tree: self }
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V> {
        let node = self.root.map(|root| unsafe { min_node(root) });
        CursorMut { tree: self, node }
    }
}

impl<K, V> RbTree<K, V> {
    fn lower_bound_node<Q>(&self, key: &Q) -> Link<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut res = None;
        let mut cur = self.root;
        while let Some(n) = cur {
            unsafe {
                if (*n.as_ptr()).key.borrow() < key {
                    cur = (*n.as_ptr()).right;
                } else {
                    res = Some(n);
                    cur = (*n.as_ptr()).left;
                }
            }
        }
        res
    }

    fn upper_bound_node<Q>(&self, key: &Q) -> Link<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut res = None;
        let mut cur = self.root;
        while let Some(n) = cur {
            unsafe {
                if key < (*n.as_ptr()).key.borrow() {
                    res = Some(n);
                    cur = (*n.as_ptr()).left;
                } else {
                    cur = (*n.as_ptr()).right;
                }
            }
        }
        res
    }

    /// Leftmost node of the equal run, if any.
    fn find_node<Q>(&self, key: &Q) -> Link<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lower_bound_node(key)
            .filter(|n| unsafe { (*n.as_ptr()).key.borrow() == key })
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|n| unsafe { &(*n.as_ptr()).value })
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|n| unsafe { &mut (*n.as_ptr()).value })
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key)
            .map(|n| unsafe { (&(*n.as_ptr()).key, &(*n.as_ptr()).value) })
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor { node: self.find_node(key), tree: self }
    }

    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor { node: self.lower_bound_node(key), tree: self }
    }

    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor { node: self.upper_bound_node(key), tree: self }
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(key);
        CursorMut { tree: self, node }
    }

    pub fn lower_bound_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.lower_bound_node(key);
        CursorMut { tree: self, node }
    }

    /// Iterator over the contiguous run of nodes equal to `key`.
    pub fn equal_range<Q>(&self, key: &Q) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Range {
            next: self.lower_bound_node(key),
            stop: self.upper_bound_node(key),
            _marker: PhantomData,
        }
    }

    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.equal_range(key).count()
    }
}

impl<K: Ord, V> RbTree<K, V> {
    /// Under `DupPolicy::Reject` an equal key hands the pair back untouched
    /// and the tree is not mutated. Equal keys under `DupPolicy::Allow`
    /// descend right, so a duplicate lands at the upper bound of its run.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), (K, V)> {
        let mut parent = None;
        let mut go_left = false;
        let mut cur = self.root;
        while let Some(n) = cur {
            parent = Some(n);
            let ord = unsafe { key.cmp(&(*n.as_ptr()).key) };
            go_left = match (ord, self.policy) {
                (Ordering::Less, _) => true,
                (Ordering::Equal, DupPolicy::Reject) => {
                    return Err((key, value));
                }
                _ => false,
            };
            cur = unsafe {
                if go_left { (*n.as_ptr()).left } else { (*n.as_ptr()).right }
            };
        }
        // allocation happens before any link is touched
        let node = Node::new(key, value);
        unsafe { self.link_child(node, parent, go_left) };
        self.len += 1;
        Ok(())
    }

    /// Value of the first node equal to `key`, inserting `default()` under
    /// `key` when no such node exists. The duplicate policy never adds a
    /// second node here.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let mut parent = None;
        let mut go_left = false;
        let mut cur = self.root;
        while let Some(n) = cur {
            parent = Some(n);
            match unsafe { key.cmp(&(*n.as_ptr()).key) } {
                Ordering::Less => {
                    go_left = true;
                    cur = unsafe { (*n.as_ptr()).left };
                }
                Ordering::Greater => {
                    go_left = false;
                    cur = unsafe { (*n.as_ptr()).right };
                }
                Ordering::Equal => {
                    return unsafe { &mut (*n.as_ptr()).value };
                }
            }
        }
        let node = Node::new(key, default());
        unsafe { self.link_child(node, parent, go_left) };
        self.len += 1;
        unsafe { &mut (*node.as_ptr()).value }
    }

    /// Removes one node of the equal run (its leftmost member).
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(key)?;
        Some(unsafe { self.detach(node) }.into_kv())
    }

    pub fn remove_all<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut removed = 0;
        while self.remove(key).is_some() {
            removed += 1;
        }
        removed
    }

    /// Relocates nodes from `other` into `self`; no node is copied or
    /// reallocated. Under `DupPolicy::Reject`, a node whose key is already
    /// present stays behind in `other`; under `DupPolicy::Allow` the source
    /// is drained completely.
    pub fn merge(&mut self, other: &mut Self) {
        unsafe {
            let mut cur = other.root.map(|root| min_node(root));
            while let Some(n) = cur {
                let next = successor(n);
                let take = match self.policy {
                    DupPolicy::Allow => true,
                    DupPolicy::Reject => {
                        !self.contains_key(&(*n.as_ptr()).key)
                    }
                };
                if take {
                    let node = other.detach(n);
                    self.attach(node);
                }
                cur = next;
            }
        }
    }

    unsafe fn attach(&mut self, node: Box<Node<K, V>>) {
        let node = NonNull::from(Box::leak(node));
        let mut parent = None;
        let mut go_left = false;
        let mut cur = self.root;
        while let Some(n) = cur {
            parent = Some(n);
            go_left = (*node.as_ptr()).key < (*n.as_ptr()).key;
            cur = if go_left { (*n.as_ptr()).left } else { (*n.as_ptr()).right };
        }
        self.link_child(node, parent, go_left);
        self.len += 1;
    }
}

impl<K, V> RbTree<K, V> {
    unsafe fn link_child(
        &mut self,
        node: NonNull<Node<K, V>>,
        parent: Link<K, V>,
        go_left: bool,
    ) {
        (*node.as_ptr()).parent = parent;
        (*node.as_ptr()).left = None;
        (*node.as_ptr()).right = None;
        (*node.as_ptr()).color = Color::Red;
        match parent {
            None => self.root = Some(node),
            Some(p) => {
                if go_left {
                    (*p.as_ptr()).left = Some(node);
                } else {
                    (*p.as_ptr()).right = Some(node);
                }
            }
        }
        self.insert_fixup(node);
    }

    unsafe fn rotate_left(&mut self, n: NonNull<Node<K, V>>) {
        let Some(r) = (*n.as_ptr()).right else { return };
        (*n.as_ptr()).right = (*r.as_ptr()).left;
        if let Some(rl) = (*r.as_ptr()).left {
            (*rl.as_ptr()).parent = Some(n);
        }
        (*r.as_ptr()).parent = (*n.as_ptr()).parent;
        match (*n.as_ptr()).parent {
            Some(p) => {
                if (*p.as_ptr()).left == Some(n) {
                    (*p.as_ptr()).left = Some(r);
                } else {
                    (*p.as_ptr()).right = Some(r);
                }
            }
            None => self.root = Some(r),
        }
        (*r.as_ptr()).left = Some(n);
        (*n.as_ptr()).parent = Some(r);
    }

    unsafe fn rotate_right(&mut self, n: NonNull<Node<K, V>>) {
        let Some(l) = (*n.as_ptr()).left else { return };
        (*n.as_ptr()).left = (*l.as_ptr()).right;
        if let Some(lr) = (*l.as_ptr()).right {
            (*lr.as_ptr()).parent = Some(n);
        }
        (*l.as_ptr()).parent = (*n.as_ptr()).parent;
        match (*n.as_ptr()).parent {
            Some(p) => {
                if (*p.as_ptr()).left == Some(n) {
                    (*p.as_ptr()).left = Some(l);
                } else {
                    (*p.as_ptr()).right = Some(l);
                }
            }
            None => self.root = Some(l),
        }
        (*l.as_ptr()).right = Some(n);
        (*n.as_ptr()).parent = Some(l);
    }

    unsafe fn insert_fixup(&mut self, mut node: NonNull<Node<K, V>>) {
        while let Some(parent) = (*node.as_ptr()).parent {
            if (*parent.as_ptr()).color == Color::Black {
                break;
            }
            // parent is red, so it is not the root: a grandparent exists
            let Some(grand) = (*parent.as_ptr()).parent else {
                debug_assert!(false, "red root");
                break;
            };
            let parent_is_left = (*grand.as_ptr()).left == Some(parent);
            let uncle = if parent_is_left {
                (*grand.as_ptr()).right
            } else {
                (*grand.as_ptr()).left
            };
            if color(uncle) == Color::Red {
                (*parent.as_ptr()).color = Color::Black;
                if let Some(u) = uncle {
                    (*u.as_ptr()).color = Color::Black;
                }
                (*grand.as_ptr()).color = Color::Red;
                node = grand;
                continue;
            }
            let mut parent = parent;
            if parent_is_left {
                if (*parent.as_ptr()).right == Some(node) {
                    self.rotate_left(parent);
                    parent = node;
                }
                (*parent.as_ptr()).color = Color::Black;
                (*grand.as_ptr()).color = Color::Red;
                self.rotate_right(grand);
            } else {
                if (*parent.as_ptr()).left == Some(node) {
                    self.rotate_right(parent);
                    parent = node;
                }
                (*parent.as_ptr()).color = Color::Black;
                (*grand.as_ptr()).color = Color::Red;
                self.rotate_left(grand);
            }
            break;
        }
        if let Some(root) = self.root {
            (*root.as_ptr()).color = Color::Black;
        }
    }

    unsafe fn transplant(
        &mut self,
        old: NonNull<Node<K, V>>,
        new: Link<K, V>,
    ) {
        match (*old.as_ptr()).parent {
            Some(p) => {
                if (*p.as_ptr()).left == Some(old) {
                    (*p.as_ptr()).left = new;
                } else {
                    (*p.as_ptr()).right = new;
                }
            }
            None => self.root = new,
        }
        if let Some(n) = new {
            (*n.as_ptr()).parent = (*old.as_ptr()).parent;
        }
    }

    /// Unlinks `node` and hands its allocation back. With two children the
    /// in-order successor is relinked into the vacated position (keeping
    /// its own allocation), so every other node pointer stays valid.
    pub(crate) unsafe fn detach(
        &mut self,
        node: NonNull<Node<K, V>>,
    ) -> Box<Node<K, V>> {
        let z = node.as_ptr();
        let mut removed_color = (*z).color;
        let fix_child;
        let fix_parent;

        match ((*z).left, (*z).right) {
            (None, right) => {
                fix_child = right;
                fix_parent = (*z).parent;
                self.transplant(node, right);
            }
            (left @ Some(_), None) => {
                fix_child = left;
                fix_parent = (*z).parent;
                self.transplant(node, left);
            }
            (Some(left), Some(right)) => {
                let succ = min_node(right);
                let s = succ.as_ptr();
                removed_color = (*s).color;
                fix_child = (*s).right;
                if (*s).parent == Some(node) {
                    fix_parent = Some(succ);
                } else {
                    fix_parent = (*s).parent;
                    self.transplant(succ, (*s).right);
                    (*s).right = Some(right);
                    (*right.as_ptr()).parent = Some(succ);
                }
                self.transplant(node, Some(succ));
                (*s).left = Some(left);
                (*left.as_ptr()).parent = Some(succ);
                (*s).color = (*z).color;
            }
        }

        if removed_color == Color::Black {
            self.remove_fixup(fix_child, fix_parent);
        }
        self.len -= 1;

        let mut boxed = Box::from_raw(z);
        boxed.parent = None;
        boxed.left = None;
        boxed.right = None;
        boxed.color = Color::Red;
        boxed
    }

    unsafe fn remove_fixup(
        &mut self,
        mut node: Link<K, V>,
        mut parent: Link<K, V>,
    ) {
        while node != self.root && color(node) == Color::Black {
            let Some(p) = parent else { break };
            if (*p.as_ptr()).left == node {
                // the removed node was black, so a sibling exists
                let Some(mut sib) = (*p.as_ptr()).right else {
                    debug_assert!(false, "missing sibling");
                    break;
                };
                if (*sib.as_ptr()).color == Color::Red {
                    (*sib.as_ptr()).color = Color::Black;
                    (*p.as_ptr()).color = Color::Red;
                    self.rotate_left(p);
                    let Some(next) = (*p.as_ptr()).right else { break };
                    sib = next;
                }
                if color((*sib.as_ptr()).left) == Color::Black
                    && color((*sib.as_ptr()).right) == Color::Black
                {
                    (*sib.as_ptr()).color = Color::Red;
                    node = Some(p);
                    parent = (*p.as_ptr()).parent;
                } else {
                    if color((*sib.as_ptr()).right) == Color::Black {
                        if let Some(sl) = (*sib.as_ptr()).left {
                            (*sl.as_ptr()).color = Color::Black;
                        }
                        (*sib.as_ptr()).color = Color::Red;
                        self.rotate_right(sib);
                        let Some(next) = (*p.as_ptr()).right else { break };
                        sib = next;
                    }
                    (*sib.as_ptr()).color = (*p.as_ptr()).color;
                    (*p.as_ptr()).color = Color::Black;
                    if let Some(sr) = (*sib.as_ptr()).right {
                        (*sr.as_ptr()).color = Color::Black;
                    }
                    self.rotate_left(p);
                    node = self.root;
                    parent = None;
                }
            } else {
                let Some(mut sib) = (*p.as_ptr()).left else {
                    debug_assert!(false, "missing sibling");
                    break;
                };
                if (*sib.as_ptr()).color == Color::Red {
                    (*sib.as_ptr()).color = Color::Black;
                    (*p.as_ptr()).color = Color::Red;
                    self.rotate_right(p);
                    let Some(next) = (*p.as_ptr()).left else { break };
                    sib = next;
                }
                if color((*sib.as_ptr()).left) == Color::Black
                    && color((*sib.as_ptr()).right) == Color::Black
                {
                    (*sib.as_ptr()).color = Color::Red;
                    node = Some(p);
                    parent = (*p.as_ptr()).parent;
                } else {
                    if color((*sib.as_ptr()).left) == Color::Black {
                        if let Some(sr) = (*sib.as_ptr()).right {
                            (*sr.as_ptr()).color = Color::Black;
                        }
                        (*sib.as_ptr()).color = Color::Red;
                        self.rotate_left(sib);
                        let Some(next) = (*p.as_ptr()).left else { break };
                        sib = next;
                    }
                    (*sib.as_ptr()).color = (*p.as_ptr()).color;
                    (*p.as_ptr()).color = Color::Black;
                    if let Some(sl) = (*sib.as_ptr()).left {
                        (*sl.as_ptr()).color = Color::Black;
                    }
                    self.rotate_right(p);
                    node = self.root;
                    parent = None;
                }
            }
        }
        if let Some(n) = node {
            (*n.as_ptr()).color = Color::Black;
        }
    }
}

unsafe fn clone_subtree<K: Clone, V: Clone>(
    link: Link<K, V>,
    parent: Link<K, V>,
) -> Link<K, V> {
    // depth is bounded by the balance invariant, so recursion is fine here
    link.map(|n| {
        let src = n.as_ptr();
        let dst = NonNull::from(Box::leak(Box::new(Node {
            parent,
            left: None,
            right: None,
            color: (*src).color,
            key: (*src).key.clone(),
            value: (*src).value.clone(),
        })));
        (*dst.as_ptr()).left = clone_subtree((*src).left, Some(dst));
        (*dst.as_ptr()).right = clone_subtree((*src).right, Some(dst));
        dst
    })
}

impl<K: Clone, V: Clone> Clone for RbTree<K, V> {
    fn clone(&self) -> Self {
        let mut tree = Self::new(self.policy);
        tree.root = unsafe { clone_subtree(self.root, None) };
        tree.len = self.len;
        tree
    }
}

impl<K, V> Drop for RbTree<K, V> {
    fn drop(&mut self) { self.clear(); }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbTree<K, V> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_map().entries(self.iter()).finish()
    }
}
