//! Errors reported by tree operations and by [`Tree::validate`][crate::Tree::validate].

use thiserror::Error;

use crate::NodeId;

/// Shorthand for results of fallible tree operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Recoverable failures of tree operations. None of these leave the tree modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Two values could not be ordered against each other (e.g. a `NaN` float).
    #[error("values cannot be ordered against each other")]
    InvalidOperand,
    /// The node could not be found again by its value.
    #[error("node is not present in the tree")]
    NotFound,
    /// The operation needs at least one node.
    #[error("tree is empty")]
    EmptyTree,
    /// The subtree to attach is still linked somewhere in the tree.
    #[error("node {0} is still linked into the tree")]
    Linked(NodeId),
    /// The new value would not sort between the node's in-order neighbours.
    #[error("value does not fit the ordering at node {0}")]
    OutOfOrder(NodeId),
}

/// A broken structural invariant found by [`Tree::validate`][crate::Tree::validate].
///
/// Every variant is a defect in the tree code, never the caller's fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// The root has a parent link.
    #[error("root {0} has a parent")]
    RootHasParent(NodeId),
    /// A child does not point back at the node holding it.
    #[error("node {child} does not point back to its parent {parent}")]
    Parent {
        /// The node holding the child link.
        parent: NodeId,
        /// The child with the wrong back-reference.
        child: NodeId,
    },
    /// The in-order sequence is not strictly increasing at this node.
    #[error("in-order sequence is not strictly increasing at node {0}")]
    Order(NodeId),
    /// The number of nodes reachable from the root differs from the number stored.
    #[error("{reachable} nodes are reachable but {stored} are stored")]
    Count {
        /// Nodes found by walking from the root.
        reachable: usize,
        /// Nodes held by the arena.
        stored: usize,
    },
    /// A cached height disagrees with the recomputed one.
    #[error("node {node} caches height {cached} but its subtree is {actual} high")]
    Height {
        /// The offending node.
        node: NodeId,
        /// The height stored on the node.
        cached: i32,
        /// The recomputed height.
        actual: i32,
    },
    /// A balance factor is out of range or disagrees with the children's heights.
    #[error("node {node} has balance factor {cached}, expected {actual} within -1..=1")]
    Balance {
        /// The offending node.
        node: NodeId,
        /// The balance factor stored on the node.
        cached: i8,
        /// `height(right) - height(left)` as recomputed.
        actual: i32,
    },
}
