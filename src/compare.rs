//! Total orders used to position elements in a set.
//!
//! Any `Fn(&T, &T) -> Ordering` is a [`Comparator`], so a closure can be passed straight to
//! [`RbSet::new`](crate::RbSet::new). Two elements are duplicates when the comparator returns
//! `Ordering::Equal`, regardless of whether they are otherwise identical.

use core::{cmp::Ordering, fmt, marker::PhantomData};

/// A total order over `T`.
///
/// Implementations must be consistent for the lifetime of the set: antisymmetric, transitive and
/// stable. The set's behavior is unspecified (but memory safe) when that does not hold.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self(lhs, rhs)
    }
}

/// Orders elements by their `Ord` implementation.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Orders elements by a key extracted from each one.
///
/// Elements with equal keys are duplicates.
pub struct ByKey<F, K> {
    f:   F,
    key: PhantomData<fn() -> K>,
}

impl<F: Clone, K> Clone for ByKey<F, K> {
    fn clone(&self) -> Self {
        ByKey {
            f:   self.f.clone(),
            key: PhantomData,
        }
    }
}

impl<F, K> fmt::Debug for ByKey<F, K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.pad("ByKey { .. }")
    }
}

/// Builds a [`ByKey`] comparator.
///
/// ```
/// use rbset::{compare::by_key, RbSet};
///
/// let mut set: RbSet<&str, _> = RbSet::new(by_key(|s: &&str| s.len()));
/// set.add("moka").unwrap();
/// assert!(set.add("rei!").is_err());
/// ```
#[inline]
pub fn by_key<T: ?Sized, K: Ord, F: Fn(&T) -> K>(f: F) -> ByKey<F, K> {
    ByKey {
        f,
        key: PhantomData,
    }
}

impl<T: ?Sized, K, F> Comparator<T> for ByKey<F, K>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        (self.f)(lhs).cmp(&(self.f)(rhs))
    }
}
