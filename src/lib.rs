//! An ordered, duplicate free set backed by a red-black tree.
//!
//! `rbset` positions elements using a caller supplied [`Comparator`] rather than `Ord`, so the
//! same type can be stored under different orders, and two elements are duplicates exactly when
//! the comparator says they are equal.
//!
//! # Examples
//!
//! Building a set ordered by a closure:
//! ```
//! use rbset::RbSet;
//!
//! let mut set = RbSet::new(|a: &i64, b: &i64| a.cmp(b));
//! for x in &[5, 3, 8, 1, 4] {
//!     set.add(*x).unwrap();
//! }
//! assert_eq!(set.size(), 5);
//! assert!(set.contains(&4));
//! ```
//!
//! Adding a duplicate hands the value back:
//! ```
//! # use rbset::{compare::Natural, error::ErrorKind, RbSet};
//! let mut set = RbSet::new(Natural);
//! set.add("winter").unwrap();
//! let err = set.add("winter").unwrap_err();
//! assert_eq!(err.error.kind(), ErrorKind::DuplicateKey);
//! assert_eq!(err.value, "winter");
//! ```
//!
//! Draining the minimum:
//! ```
//! # use rbset::{compare::Natural, RbSet};
//! let mut set = RbSet::new(Natural);
//! for x in &[20, 10, 30] {
//!     set.add(*x).unwrap();
//! }
//! assert_eq!(set.remove_first(), Ok(10));
//! assert_eq!(set.remove_first(), Ok(20));
//! assert_eq!(set.remove_first(), Ok(30));
//! assert!(set.remove_first().is_err());
//! ```
//!
//! # Features
//!
//! * `add`, `remove`, `remove_first` and `contains` are `O(log n)` worst case. Every mutation
//!   restores the red-black properties before returning.
//! * Nodes live in a single arena, addressed by index, with parent back-references for the fixup
//!   walks.
//! * `stats` records rotation and fixup counts per thread, see [`stats`].
//! * `verify-mutations` checks every red-black property after each mutation and panics on a
//!   violation.

#![warn(macro_use_extern_crate)]
#![warn(missing_debug_implementations)]
#![warn(unused_lifetimes)]
#![cfg_attr(not(test), warn(unused_results))]
#![deny(rust_2018_compatibility)]
#![deny(rust_2018_idioms)]
#![deny(unused_must_use)]

mod base;
pub mod compare;
pub mod error;
pub mod iter;
pub mod stats;
pub mod verify;

pub use compare::Comparator;
pub use error::{AddError, Error, ErrorKind};
pub use iter::Iter;
pub use verify::{Violation, VerifyReport};

use base::{Location, RBRoot};
use core::fmt::{self, Debug, Formatter};
use log::{debug, trace};

/// A set of elements kept in comparator order, with no two elements comparing equal.
pub struct RbSet<T, C> {
    raw: RBRoot<T>,
    len: usize,
    cmp: C,
}

impl<T, C> RbSet<T, C> {
    /// Creates an empty set ordered by `cmp`.
    #[inline]
    pub fn new(cmp: C) -> Self {
        RbSet {
            raw: RBRoot::new(),
            len: 0,
            cmp,
        }
    }

    /// Number of stored elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        if self.len != 0 {
            debug!("clearing {} elements", self.len);
        }
        self.raw.clear();
        self.len = 0;
    }

    /// The smallest element.
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|id| self.raw.key(id))
    }

    /// The largest element.
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|id| self.raw.key(id))
    }

    /// Iterates over the elements in increasing order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.raw, self.len)
    }
}

impl<T, C: Comparator<T>> RbSet<T, C> {
    /// Adds `item`, unless an element comparing equal to it is already stored.
    ///
    /// On failure the set is unchanged and `item` is returned inside the error.
    pub fn add(&mut self, item: T) -> Result<(), AddError<T>> {
        match self.raw.location(&self.cmp, &item) {
            Location::Occupied { .. } => {
                stats::duplicate_rejected();
                trace!("add rejected: duplicate");
                Err(AddError {
                    value: item,
                    error: Error::DUPLICATE_KEY,
                })
            }
            Location::Vacant(vacant) => {
                let _ = self.raw.insert(item, vacant);
                self.len += 1;
                self.verify_mutation();
                Ok(())
            }
        }
    }

    /// Removes the stored element comparing equal to `item` and returns it.
    ///
    /// The returned value is the one that was stored, which may differ from `item` in anything the
    /// comparator ignores.
    pub fn remove(&mut self, item: &T) -> Result<T, Error> {
        match self.raw.location(&self.cmp, item) {
            Location::Occupied { node } => {
                let key = self.raw.remove(node);
                self.len -= 1;
                self.verify_mutation();
                Ok(key)
            }
            Location::Vacant(_) => {
                stats::not_found();
                trace!("remove rejected: not found");
                Err(Error::NOT_FOUND)
            }
        }
    }

    /// Removes and returns the smallest element.
    pub fn remove_first(&mut self) -> Result<T, Error> {
        match self.raw.first() {
            Some(first) => {
                let key = self.raw.remove(first);
                self.len -= 1;
                self.verify_mutation();
                Ok(key)
            }
            None => {
                stats::empty_tree();
                trace!("remove_first rejected: empty");
                Err(Error::EMPTY_TREE)
            }
        }
    }

    /// Returns true if an element comparing equal to `item` is stored.
    pub fn contains(&self, item: &T) -> bool {
        self.get(item).is_some()
    }

    /// Returns the stored element comparing equal to `item`.
    pub fn get(&self, item: &T) -> Option<&T> {
        match self.raw.location(&self.cmp, item) {
            Location::Occupied { node } => Some(self.raw.key(node)),
            Location::Vacant(_) => None,
        }
    }

    // checks all the red-black properties (for debugging)
    pub fn verify(&self) -> Result<VerifyReport, Violation> {
        self.raw.verify(&self.cmp, self.len)
    }

    #[inline]
    fn verify_mutation(&self) {
        if cfg!(feature = "verify-mutations") {
            if let Err(violation) = self.verify() {
                panic!("red-black tree corrupted: {}", violation)
            }
        }
    }
}

impl<T: Debug, C> Debug for RbSet<T, C> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a RbSet<T, C> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    #[inline]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compare::{by_key, Natural};

    #[test]
    fn add_contains_remove() {
        let mut set = RbSet::new(Natural);
        for x in &[5, 3, 8, 1, 4] {
            set.add(*x).unwrap();
            set.verify().unwrap();
        }
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
        assert_eq!(set.remove(&3), Ok(3));
        assert!(!set.contains(&3));
        assert_eq!(set.remove(&3), Err(Error::NOT_FOUND));
        assert_eq!(set.size(), 4);
        assert_eq!(set.first(), Some(&1));
        assert_eq!(set.last(), Some(&8));
        set.verify().unwrap();
    }

    #[test]
    fn duplicate_returns_value() {
        let mut set = RbSet::new(by_key(|p: &(&str, u32)| p.1));
        set.add(("Wonhee", 17)).unwrap();
        let err = set.add(("Iroha", 17)).unwrap_err();
        assert_eq!(err.value, ("Iroha", 17));
        assert_eq!(err.error, Error::DUPLICATE_KEY);
        assert_eq!(set.get(&("anyone", 17)), Some(&("Wonhee", 17)));
        assert_eq!(set.remove(&("anyone", 17)), Ok(("Wonhee", 17)));
        assert!(set.is_empty());
    }

    #[test]
    fn clear_and_reuse() {
        let mut set = RbSet::new(Natural);
        for x in 0..100 {
            set.add(x).unwrap();
        }
        set.clear();
        assert_eq!(set.size(), 0);
        assert_eq!(set.remove_first(), Err(Error::EMPTY_TREE));
        set.add(7).unwrap();
        assert_eq!(set.verify().unwrap().len, 1);
        assert_eq!(format!("{:?}", set), "{7}");
    }

    #[test]
    fn debug_and_into_iter() {
        let mut set = RbSet::new(|a: &i32, b: &i32| b.cmp(a));
        for x in 1..=3 {
            set.add(x).unwrap();
        }
        assert_eq!(format!("{:?}", set), "{3, 2, 1}");
        let mut sum = 0;
        for x in &set {
            sum += x;
        }
        assert_eq!(sum, 6);
    }
}
