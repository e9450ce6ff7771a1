// based off of https://en.wikipedia.org/wiki/Red%E2%80%93black_tree and linux kernel

use crate::{compare::Comparator, stats};
use core::cmp::Ordering;
use log::trace;
use slab::Slab;

pub(crate) type NodeId = usize;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Black,
    Red,
}

/// parent back-reference and color, always read and written together
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct ParentColor {
    pub(crate) parent: Option<NodeId>,
    pub(crate) color:  Color,
}

impl ParentColor {
    pub(crate) const fn red(parent: NodeId) -> Self {
        ParentColor {
            parent: Some(parent),
            color:  Color::Red,
        }
    }

    pub(crate) const fn black_root() -> Self {
        ParentColor {
            parent: None,
            color:  Color::Black,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RBNode<T> {
    pub(crate) left:         Option<NodeId>,
    pub(crate) right:        Option<NodeId>,
    pub(crate) parent_color: ParentColor,
    pub(crate) key:          T,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum VacantLocation {
    Empty,
    Left { parent: NodeId },
    Right { parent: NodeId },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Location {
    Vacant(VacantLocation),
    Occupied { node: NodeId },
}

/// The node arena plus the root slot.
///
/// Every live slab entry is reachable from `root` through exactly one child link.
#[derive(Debug)]
pub(crate) struct RBRoot<T> {
    pub(crate) nodes: Slab<RBNode<T>>,
    pub(crate) root:  Option<NodeId>,
}

impl<T> Default for RBRoot<T> {
    fn default() -> Self {
        RBRoot::new()
    }
}

impl<T> RBRoot<T> {
    pub(crate) fn new() -> Self {
        RBRoot {
            nodes: Slab::new(),
            root:  None,
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &RBNode<T> {
        &self.nodes[id]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut RBNode<T> {
        &mut self.nodes[id]
    }

    #[inline]
    pub(crate) fn key(&self, id: NodeId) -> &T {
        &self.node(id).key
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent_color.parent
    }

    /// absent children count as black
    #[inline]
    pub(crate) fn color(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.node(id).parent_color.color)
    }

    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        self.color(id) == Color::Red
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).parent_color.color = color
    }

    #[inline]
    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.node_mut(id).parent_color.parent = parent
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        let node = self.node(id);
        match side {
            Side::Left => node.left,
            Side::Right => node.right,
        }
    }

    #[inline]
    fn set_child(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        let node = self.node_mut(id);
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    /// which side of `parent` holds `child`
    #[inline]
    fn side_of(&self, child: NodeId, parent: NodeId) -> Side {
        if self.node(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points whatever slot held `old` (a child link of `parent`, or the root) at `new`.
    ///
    /// Does not touch `new`'s parent link.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old, parent);
                self.set_child(parent, side, new)
            }
        }
    }

    /// the red parent of `id`, if it has one
    #[inline]
    fn red_parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&parent| self.is_red(Some(parent)))
    }

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left
        }
        id
    }

    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.node(id).right {
            id = right
        }
        id
    }

    pub(crate) fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.leftmost(root))
    }

    pub(crate) fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.rightmost(root))
    }

    /// in-order successor, following parent links when there is no right subtree
    pub(crate) fn next(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.node(id).right {
            return Some(self.leftmost(right));
        }
        let mut node = id;
        while let Some(parent) = self.parent(node) {
            if self.node(parent).left == Some(node) {
                return Some(parent);
            }
            node = parent;
        }
        None
    }

    /// in-order predecessor
    pub(crate) fn prev(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.node(id).left {
            return Some(self.rightmost(left));
        }
        let mut node = id;
        while let Some(parent) = self.parent(node) {
            if self.node(parent).right == Some(node) {
                return Some(parent);
            }
            node = parent;
        }
        None
    }

    /// Rotates the subtree rooted at `x` towards `side`, promoting `x`'s child on the other side.
    ///
    /// `rotate(x, Side::Left)` is a left rotation and `rotate(x, Side::Right)` a right one. Colors
    /// are untouched and the in-order sequence is preserved.
    fn rotate(&mut self, x: NodeId, side: Side) {
        let far = side.flip();
        let y = match self.child(x, far) {
            Some(y) => y,
            None => unreachable!("rotation of node {} without a child to promote", x),
        };
        stats::rotation();

        let inner = self.child(y, side);
        self.set_child(x, far, inner);
        if let Some(inner) = inner {
            self.set_parent(inner, Some(x));
        }

        let parent = self.parent(x);
        self.set_parent(y, parent);
        self.replace_child(parent, x, Some(y));

        self.set_child(y, side, Some(x));
        self.set_parent(x, Some(y));
    }

    /// Descends from the root comparing `key` against each node.
    pub(crate) fn location<C: Comparator<T>>(&self, cmp: &C, key: &T) -> Location {
        let mut this = match self.root {
            Some(root) => root,
            None => return Location::Vacant(VacantLocation::Empty),
        };
        let mut depth = 1;
        let location = loop {
            let node = self.node(this);
            match cmp.compare(key, &node.key) {
                Ordering::Less => {
                    if let Some(left) = node.left {
                        this = left
                    } else {
                        break Location::Vacant(VacantLocation::Left { parent: this });
                    }
                }
                Ordering::Greater => {
                    if let Some(right) = node.right {
                        this = right
                    } else {
                        break Location::Vacant(VacantLocation::Right { parent: this });
                    }
                }
                Ordering::Equal => break Location::Occupied { node: this },
            }
            depth += 1;
        };
        stats::search_depth(depth);
        location
    }

    /// Links a new red node at `location` and restores the red-black properties.
    pub(crate) fn insert(&mut self, key: T, location: VacantLocation) -> NodeId {
        let (parent, side) = match location {
            VacantLocation::Empty => {
                debug_assert!(self.root.is_none());
                let id = self.nodes.insert(RBNode {
                    left: None,
                    right: None,
                    parent_color: ParentColor::black_root(),
                    key,
                });
                self.root = Some(id);
                stats::insert_fixup_iterations(0);
                return id;
            }
            VacantLocation::Left { parent } => (parent, Side::Left),
            VacantLocation::Right { parent } => (parent, Side::Right),
        };
        debug_assert!(self.child(parent, side).is_none());
        let id = self.nodes.insert(RBNode {
            left: None,
            right: None,
            parent_color: ParentColor::red(parent),
            key,
        });
        self.set_child(parent, side, Some(id));
        self.insert_fixup(id);
        id
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        let mut iterations = 0;
        /*
         * Loop invariants:
         * - node is red
         * - the only possible violation is node and its parent both being red
         */
        while let Some(mut parent) = self.red_parent(node) {
            iterations += 1;
            let grandparent = match self.parent(parent) {
                Some(grandparent) => grandparent,
                // the root is black, so a red parent always has one
                None => unreachable!("red node {} has no grandparent", parent),
            };
            let parent_side = self.side_of(parent, grandparent);
            let uncle = self.child(grandparent, parent_side.flip());

            if let Some(uncle) = uncle.filter(|&uncle| self.is_red(Some(uncle))) {
                /*
                 * red uncle: push the blackness down from the grandparent and continue from
                 * there, which may now violate with its own parent.
                 */
                stats::uncle_recolor();
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.side_of(node, parent) != parent_side {
                // inner grandchild: rotate it to the outside first
                trace!("insert fixup: inner grandchild rotation");
                self.rotate(parent, parent_side);
                core::mem::swap(&mut node, &mut parent);
            }
            debug_assert_eq!(self.parent(node), Some(parent));

            // outer grandchild
            trace!("insert fixup: terminated by grandparent rotation");
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, parent_side.flip());
            break;
        }
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
        stats::insert_fixup_iterations(iterations);
    }

    /// Unlinks `node` from the tree and returns its key.
    ///
    /// A node with two children trades keys with its in-order successor, and the successor's
    /// slot is the one physically removed, so the returned key is always the one `node` held.
    pub(crate) fn remove(&mut self, node: NodeId) -> T {
        let target = match (self.node(node).left, self.node(node).right) {
            (Some(_), Some(right)) => {
                let mut successor = right;
                let mut depth = 1;
                while let Some(left) = self.node(successor).left {
                    successor = left;
                    depth += 1;
                }
                stats::successor_depth(depth);
                // successor lies in node's right subtree, so the two slots are distinct
                match self.nodes.get2_mut(node, successor) {
                    Some((a, b)) => core::mem::swap(&mut a.key, &mut b.key),
                    None => unreachable!("successor {} of node {} is not a live slot", successor, node),
                }
                successor
            }
            _ => node,
        };

        // target has at most one child
        let ParentColor { parent, color } = self.node(target).parent_color;
        let child = self.node(target).left.or(self.node(target).right);
        self.replace_child(parent, target, child);
        if let Some(child) = child {
            self.set_parent(child, parent);
        }
        let removed = self.nodes.remove(target);

        if color == Color::Black {
            self.remove_fixup(child, parent);
        }
        removed.key
    }

    /// Restores the black height after a black node was unlinked above `node`.
    ///
    /// `node` may be absent, in which case `parent` locates the empty slot.
    fn remove_fixup(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        let mut iterations = 0;
        /*
         * Loop invariants:
         * - node is black (or absent)
         * - node is not the root (parent is not absent)
         * - All leaf paths going through parent and node have a black node count that is 1
         *   lower than other leaf paths.
         */
        while node != self.root && !self.is_red(node) {
            let p = match parent {
                Some(p) => p,
                None => unreachable!("non-root node without a parent"),
            };
            iterations += 1;
            // an absent node is on whichever side of p is empty
            let side = if self.node(p).left == node {
                Side::Left
            } else {
                Side::Right
            };
            let far = side.flip();

            let mut sibling = match self.child(p, far) {
                Some(sibling) => sibling,
                // the deficient side holds at least one black node, so the other side is nonempty
                None => unreachable!("black height deficit below {} without a sibling", p),
            };

            if self.is_red(Some(sibling)) {
                // red sibling: rotate it above parent so the new sibling is black
                self.set_color(sibling, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                sibling = match self.child(p, far) {
                    Some(sibling) => sibling,
                    None => unreachable!("red sibling rotated above {} left no black child", p),
                };
            }

            let near_nephew = self.child(sibling, side);
            let far_nephew = self.child(sibling, far);
            if !self.is_red(near_nephew) && !self.is_red(far_nephew) {
                // black sibling, black nephews: move the deficit up a level
                stats::sibling_recolor();
                self.set_color(sibling, Color::Red);
                node = Some(p);
                parent = self.parent(p);
                continue;
            }

            if !self.is_red(far_nephew) {
                // only the near nephew is red: rotate it into the sibling position
                trace!("remove fixup: near nephew rotation");
                if let Some(near_nephew) = near_nephew {
                    self.set_color(near_nephew, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, far);
                sibling = match self.child(p, far) {
                    Some(sibling) => sibling,
                    None => unreachable!("near nephew rotation below {} lost the sibling", p),
                };
            }

            // far nephew is red
            trace!("remove fixup: terminated by parent rotation");
            let parent_color = self.node(p).parent_color.color;
            self.set_color(sibling, parent_color);
            self.set_color(p, Color::Black);
            if let Some(far_nephew) = self.child(sibling, far) {
                self.set_color(far_nephew, Color::Black);
            }
            self.rotate(p, side);
            node = self.root;
            break;
        }
        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
        stats::remove_fixup_iterations(iterations);
    }

    pub(crate) fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }
}
