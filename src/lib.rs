//! This crate exposes an arena-backed binary tree in three flavours: a plain binary tree, a
//! Binary Search Tree (BST), and a self-balancing AVL tree.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! The benefits of these invariants are many. For instance, searching for
//! values in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). With clever construction the
//! height of a BST can be limited to `O(lg N)` where `N` is the number of nodes
//! in the tree. BSTs also naturally support sorted iteration by visiting the
//! left subtree, then the subtree root, then the right subtree.
//!
//! ## Layers
//!
//! All three flavours share one [`Tree`] type. The second type parameter picks the layer:
//!
//! - [`Binary`]: no ordering. Subtrees are attached by hand with
//!   [`graft_left`][Tree::graft_left] and [`graft_right`][Tree::graft_right].
//! - [`Search`]: an unbalanced BST with parent links, successor and predecessor.
//! - [`Avl`] (the default): a BST that keeps every node's balance factor in `-1..=1` by
//!   rotating after insertions and deletions.
//!
//! Nodes are addressed by [`NodeId`] handles. Operations that change the shape of the tree may
//! change which node is the root, so they hand back the current root.
//!
//! # Examples
//!
//! ```
//! use avl_tree::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for value in [1, 3, 4, 6, 7, 8, 10, 13, 14] {
//!     tree.insert(value).unwrap();
//! }
//!
//! assert_eq!(tree.height(), 3);
//! assert!(tree.values().copied().eq([1, 3, 4, 6, 7, 8, 10, 13, 14]));
//!
//! let six = tree.search(&6).unwrap().unwrap();
//! tree.delete(six).unwrap();
//! assert_eq!(tree.search(&6), Ok(None));
//! assert!(tree.validate().is_ok());
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod avl;
mod binary;
mod error;
mod layer;
mod node;
mod outline;
mod search;
mod traverse;


pub use binary::Tree;
pub use error::{Error, Result, Violation};
pub use layer::{Avl, Binary, Layer, Ordered, Search};
pub use node::NodeId;
pub use outline::Outline;
pub use traverse::{InOrder, LevelOrder, PostOrder, PreOrder, Restartable};

/// A plain binary tree, shaped by hand.
pub type BinaryTree<V> = Tree<V, Binary>;

/// An unbalanced Binary Search Tree.
pub type SearchTree<V> = Tree<V, Search>;

/// A self-balancing Binary Search Tree.
pub type AvlTree<V> = Tree<V, Avl>;
