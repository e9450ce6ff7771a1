//! In-order traversal.

use crate::base::{NodeId, RBRoot};
use core::{fmt, iter::FusedIterator};

/// An iterator over the elements of an [`RbSet`](crate::RbSet) in increasing order.
///
/// Created by [`RbSet::iter`](crate::RbSet::iter). Walks parent links, so it needs no stack.
pub struct Iter<'a, T> {
    tree:      &'a RBRoot<T>,
    front:     Option<NodeId>,
    back:      Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a RBRoot<T>, len: usize) -> Self {
        Iter {
            tree,
            front: tree.first(),
            back: tree.last(),
            remaining: len,
        }
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = self.tree.next(id);
        Some(self.tree.key(id))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = self.tree.prev(id);
        Some(self.tree.key(id))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::test::{b, build, leaf_b, leaf_r, r};

    #[test]
    fn both_ends() {
        let tree = build(&b(4, b(2, leaf_r(1), leaf_r(3)), b(6, leaf_r(5), leaf_r(7))));
        let mut iter = Iter::new(&tree, 7);
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&7));
        assert_eq!(iter.next_back(), Some(&6));
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.clone().collect::<Vec<_>>(), vec![&2, &3, &4, &5]);
        assert_eq!(iter.rev().collect::<Vec<_>>(), vec![&5, &4, &3, &2]);
    }

    #[test]
    fn meet_in_the_middle() {
        let tree = build(&b(2, leaf_b(1), r(4, leaf_b(3), leaf_b(5))));
        let mut iter = Iter::new(&tree, 5);
        let mut seen = Vec::new();
        while let Some(front) = iter.next() {
            seen.push(*front);
            if let Some(back) = iter.next_back() {
                seen.push(*back);
            }
        }
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn empty() {
        let tree = RBRoot::<i32>::new();
        let mut iter = Iter::new(&tree, 0);
        assert_eq!(iter.size_hint(), (0, Some(0)));
        assert_eq!(iter.next(), None);
        assert_eq!(format!("{:?}", iter), "[]");
    }
}
