//! hakolib: ordered and sequential containers.
//!
//! The ordered side (`ord`) is one red-black tree engine serving three
//! views: [`ord::ord_set::OrdSet`], [`ord::ord_multiset::OrdMultiset`]
//! and [`ord::ord_map::OrdMap`]. The sequential side (`seq`) holds the
//! linear containers and their adapters. `naive` and `random` exist for
//! the test suites; `ops` holds the shared error type.

#[doc(inline)]
pub use {naive, ops, ord, random, seq};
