//! Marker types selecting what a [`Tree`] can do.

use crate::{NodeId, Tree};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Binary {}
    impl Sealed for super::Search {}
    impl Sealed for super::Avl {}
}

/// A capability set of a [`Tree`]. Implemented by [`Binary`], [`Search`] and [`Avl`] only.
pub trait Layer: sealed::Sealed + Sized {}

/// Layers that keep values in order and therefore support searching.
///
/// The hooks let a layer restore its own shape invariant after the shared BST code changed the
/// structure. They are called by the tree itself and are not meant to be called directly.
pub trait Ordered: Layer {
    /// Called after `node` was attached as a new leaf.
    #[doc(hidden)]
    fn inserted<V>(tree: &mut Tree<V, Self>, node: NodeId);

    /// Called after a node was spliced out from under `parent` (`None` when it was the root).
    #[doc(hidden)]
    fn unlinked<V>(tree: &mut Tree<V, Self>, parent: Option<NodeId>);
}

/// A plain binary tree without any ordering. Its shape is whatever the caller grafts together.
#[derive(Clone, Copy, Debug)]
pub enum Binary {}

/// An unbalanced Binary Search Tree.
#[derive(Clone, Copy, Debug)]
pub enum Search {}

/// A Binary Search Tree that rebalances itself (specifically, an AVL tree).
#[derive(Clone, Copy, Debug)]
pub enum Avl {}

impl Layer for Binary {}
impl Layer for Search {}
impl Layer for Avl {}

impl Ordered for Search {
    fn inserted<V>(_tree: &mut Tree<V, Self>, _node: NodeId) {}

    fn unlinked<V>(_tree: &mut Tree<V, Self>, _parent: Option<NodeId>) {}
}

impl Ordered for Avl {
    fn inserted<V>(tree: &mut Tree<V, Self>, node: NodeId) {
        tree.retrace_insert(node);
    }

    fn unlinked<V>(tree: &mut Tree<V, Self>, parent: Option<NodeId>) {
        tree.retrace_unlink(parent);
    }
}
