//! Red-black property checks (for debugging).

use crate::{
    base::{Color, NodeId, RBRoot},
    compare::Comparator,
};
use core::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};

/// Shape of a tree that passed [`RbSet::verify`](crate::RbSet::verify).
///
/// Depths count the absent leaves, so an empty tree reports `1` for each of them.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct VerifyReport {
    /// Number of reachable elements.
    pub len:          usize,
    /// Black nodes on every path from the root down to an absent child.
    pub black_height: usize,
    /// Length of the shortest root to leaf path.
    pub min_depth:    usize,
    /// Length of the longest root to leaf path. Never more than twice `min_depth`.
    pub max_depth:    usize,
}

/// Which property a tree failed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ViolationKind {
    /// The root is red.
    RedRoot,
    /// A red node has a red child.
    RedRed,
    /// Two paths from the same node have different black counts.
    BlackHeight,
    /// An in-order neighbor does not compare strictly greater than its predecessor.
    Order,
    /// A child's parent link does not point back at its parent.
    BrokenParent,
    /// The longest path is more than twice the shortest.
    Unbalanced,
    /// The recorded element count does not match the reachable nodes.
    SizeMismatch,
    /// The arena holds nodes that are not reachable from the root.
    Orphaned,
}

/// A broken red-black property. Always a bug in the tree, never a caller error.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Violation {
    kind:   ViolationKind,
    detail: String,
}

impl Violation {
    fn new(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Violation {
            kind,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl Display for Violation {
    #[cold]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:?}: {}", self.kind, self.detail)
    }
}

impl std::error::Error for Violation {}

struct Verify {
    black_depth: usize,
    min_depth:   usize,
    max_depth:   usize,
    min:         Option<NodeId>,
    max:         Option<NodeId>,
}

const NIL: Verify = Verify {
    black_depth: 1,
    min_depth:   1,
    max_depth:   1,
    min:         None,
    max:         None,
};

impl<T> RBRoot<T> {
    /// Checks every red-black property and that `len` matches the reachable node count.
    pub(crate) fn verify<C: Comparator<T>>(
        &self,
        cmp: &C,
        len: usize,
    ) -> Result<VerifyReport, Violation> {
        if self.color(self.root) == Color::Red {
            return Err(Violation::new(ViolationKind::RedRoot, "root is red"));
        }
        let mut reachable = 0;
        let verify = match self.root {
            Some(root) => self.verify_node(cmp, root, None, &mut reachable)?,
            None => NIL,
        };
        if reachable != self.nodes.len() {
            return Err(Violation::new(
                ViolationKind::Orphaned,
                format!(
                    "{} nodes reachable, {} in the arena",
                    reachable,
                    self.nodes.len()
                ),
            ));
        }
        if reachable != len {
            return Err(Violation::new(
                ViolationKind::SizeMismatch,
                format!("size is {}, {} nodes reachable", len, reachable),
            ));
        }
        Ok(VerifyReport {
            len,
            black_height: verify.black_depth,
            min_depth: verify.min_depth,
            max_depth: verify.max_depth,
        })
    }

    fn verify_child<C: Comparator<T>>(
        &self,
        cmp: &C,
        parent: NodeId,
        child: Option<NodeId>,
        reachable: &mut usize,
    ) -> Result<Verify, Violation> {
        match child {
            Some(child) => {
                if self.color(Some(parent)) == Color::Red && self.color(Some(child)) == Color::Red
                {
                    return Err(Violation::new(
                        ViolationKind::RedRed,
                        format!("red node {} has red child {}", parent, child),
                    ));
                }
                self.verify_node(cmp, child, Some(parent), reachable)
            }
            None => Ok(NIL),
        }
    }

    fn verify_node<C: Comparator<T>>(
        &self,
        cmp: &C,
        id: NodeId,
        expected_parent: Option<NodeId>,
        reachable: &mut usize,
    ) -> Result<Verify, Violation> {
        let node = match self.nodes.get(id) {
            Some(node) => node,
            None => {
                return Err(Violation::new(
                    ViolationKind::BrokenParent,
                    format!("link to vacant slot {}", id),
                ))
            }
        };
        if node.parent_color.parent != expected_parent {
            return Err(Violation::new(
                ViolationKind::BrokenParent,
                format!(
                    "node {} points at parent {:?}, linked from {:?}",
                    id, node.parent_color.parent, expected_parent
                ),
            ));
        }
        *reachable += 1;
        if *reachable > self.nodes.len() {
            return Err(Violation::new(ViolationKind::BrokenParent, "cycle in child links"));
        }

        let left_verify = self.verify_child(cmp, id, node.left, reachable)?;
        let right_verify = self.verify_child(cmp, id, node.right, reachable)?;

        if left_verify.black_depth != right_verify.black_depth {
            return Err(Violation::new(
                ViolationKind::BlackHeight,
                format!(
                    "node {} has black heights {} (left) and {} (right)",
                    id, left_verify.black_depth, right_verify.black_depth
                ),
            ));
        }
        if let Some(max) = left_verify.max {
            if cmp.compare(self.key(max), &node.key) != Ordering::Less {
                return Err(Violation::new(
                    ViolationKind::Order,
                    format!("left subtree of node {} holds node {} out of order", id, max),
                ));
            }
        }
        if let Some(min) = right_verify.min {
            if cmp.compare(&node.key, self.key(min)) != Ordering::Less {
                return Err(Violation::new(
                    ViolationKind::Order,
                    format!("right subtree of node {} holds node {} out of order", id, min),
                ));
            }
        }

        let black = if node.parent_color.color == Color::Black {
            1
        } else {
            0
        };
        let result = Verify {
            black_depth: left_verify.black_depth + black,
            min_depth:   left_verify.min_depth.min(right_verify.min_depth) + 1,
            max_depth:   left_verify.max_depth.max(right_verify.max_depth) + 1,
            min:         Some(left_verify.min.unwrap_or(id)),
            max:         Some(right_verify.max.unwrap_or(id)),
        };
        if result.min_depth * 2 < result.max_depth {
            return Err(Violation::new(
                ViolationKind::Unbalanced,
                format!(
                    "node {} has depths {}..{}",
                    id, result.min_depth, result.max_depth
                ),
            ));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        base::test::{b, build, leaf_b, leaf_r, r, Shape},
        compare::Natural,
    };

    fn kind(shape: Shape) -> ViolationKind {
        let tree = build(&shape);
        let len = tree.nodes.len();
        tree.verify(&Natural, len).unwrap_err().kind()
    }

    #[test]
    fn valid() {
        let tree = build(&b(4, b(2, leaf_r(1), leaf_r(3)), b(6, leaf_r(5), leaf_r(7))));
        let report = tree.verify(&Natural, 7).unwrap();
        assert_eq!(
            report,
            VerifyReport {
                len:          7,
                black_height: 3,
                min_depth:    4,
                max_depth:    4,
            }
        );

        let empty = RBRoot::<i32>::new();
        assert_eq!(empty.verify(&Natural, 0).unwrap().black_height, 1);
    }

    #[test]
    fn violations() {
        assert_eq!(kind(leaf_r(1)), ViolationKind::RedRoot);
        assert_eq!(kind(b(2, r(1, leaf_r(0), Shape::Nil), Shape::Nil)), ViolationKind::RedRed);
        assert_eq!(kind(b(2, leaf_b(1), Shape::Nil)), ViolationKind::BlackHeight);
        assert_eq!(kind(b(2, leaf_r(3), leaf_r(1))), ViolationKind::Order);
        assert_eq!(kind(b(2, leaf_r(2), Shape::Nil)), ViolationKind::Order);
    }

    #[test]
    fn bookkeeping() {
        let tree = build(&b(2, leaf_r(1), leaf_r(3)));
        assert_eq!(
            tree.verify(&Natural, 2).unwrap_err().kind(),
            ViolationKind::SizeMismatch
        );

        let mut tree = build(&b(2, leaf_r(1), leaf_r(3)));
        let root = tree.root.unwrap();
        let left = tree.nodes[root].left.unwrap();
        tree.nodes[left].parent_color.parent = None;
        assert_eq!(
            tree.verify(&Natural, 3).unwrap_err().kind(),
            ViolationKind::BrokenParent
        );

        let mut tree = build(&b(2, leaf_r(1), leaf_r(3)));
        let root = tree.root.unwrap();
        tree.nodes[root].left = None;
        assert_eq!(
            tree.verify(&Natural, 2).unwrap_err().kind(),
            ViolationKind::Orphaned
        );
    }
}
