use std::fmt;
use std::ptr;

use crate::{max_node, predecessor, successor, Link, RbTree};

/// A position in the tree: at a node, or at the end slot past the last
/// node. The end position dereferences to `None` instead of invoking
/// undefined behavior.
pub struct Cursor<'a, K, V> {
    pub(crate) tree: &'a RbTree<K, V>,
    pub(crate) node: Link<K, V>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub fn key(&self) -> Option<&'a K> {
        self.node.map(|n| unsafe { &(*n.as_ptr()).key })
    }

    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        self.node.map(|n| unsafe {
            let n = n.as_ptr();
            (&(*n).key, &(*n).value)
        })
    }

    pub fn is_end(&self) -> bool { self.node.is_none() }

    /// Steps to the in-order successor; past the last node this parks at
    /// the end position and stays there.
    pub fn move_next(&mut self) {
        if let Some(n) = self.node {
            self.node = unsafe { successor(n) };
        }
    }

    /// Steps to the in-order predecessor; from the end position this lands
    /// on the last node, and at the first node it stays put.
    pub fn move_prev(&mut self) {
        match self.node {
            Some(n) => {
                if let Some(prev) = unsafe { predecessor(n) } {
                    self.node = Some(prev);
                }
            }
            None => {
                self.node = self.tree.root.map(|root| unsafe { max_node(root) });
            }
        }
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self { Self { tree: self.tree, node: self.node } }
}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_tuple("Cursor").field(&self.key()).finish()
    }
}

/// Like [`Cursor`], but holds the tree exclusively and can detach the node
/// it points at. Removal consumes the position: the cursor steps to the
/// successor and the old position can no longer be named.
pub struct CursorMut<'a, K, V> {
    pub(crate) tree: &'a mut RbTree<K, V>,
    pub(crate) node: Link<K, V>,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub fn key(&self) -> Option<&K> {
        self.node.map(|n| unsafe { &(*n.as_ptr()).key })
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.node.map(|n| unsafe { &mut (*n.as_ptr()).value })
    }

    pub fn key_value(&self) -> Option<(&K, &V)> {
        self.node.map(|n| unsafe {
            let n = n.as_ptr();
            (&(*n).key, &(*n).value)
        })
    }

    pub fn is_end(&self) -> bool { self.node.is_none() }

    pub fn move_next(&mut self) {
        if let Some(n) = self.node {
            self.node = unsafe { successor(n) };
        }
    }

    pub fn move_prev(&mut self) {
        match self.node {
            Some(n) => {
                if let Some(prev) = unsafe { predecessor(n) } {
                    self.node = Some(prev);
                }
            }
            None => {
                self.node = self.tree.root.map(|root| unsafe { max_node(root) });
            }
        }
    }

    /// Detaches the referenced node, steps to its successor and returns
    /// the payload. At the end position this is a no-op returning `None`.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let n = self.node?;
        let next = unsafe { successor(n) };
        let boxed = unsafe { self.tree.detach(n) };
        self.node = next;
        Some(boxed.into_kv())
    }
}
