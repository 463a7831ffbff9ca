//! The shape shared by every layer: nodes with two children and a parent link, height, and
//! depth-first walks. Also the hand-shaping operations of the [`Binary`] layer.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::node::Arena;
use crate::{Avl, Binary, Error, NodeId, Result};

/// A binary tree whose nodes live in one arena. `L` selects the layer, see the
/// [crate docs][crate#layers].
pub struct Tree<V, L = Avl> {
    pub(crate) arena: Arena<V>,
    pub(crate) root: Option<NodeId>,
    layer: PhantomData<L>,
}

impl<V, L> Default for Tree<V, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, L> Clone for Tree<V, L> {
    fn clone(&self) -> Self {
        // Indices are positions in the arena so the copy links up exactly like the original.
        Self {
            arena: self.arena.clone(),
            root: self.root,
            layer: PhantomData,
        }
    }
}

impl<V: fmt::Debug, L> fmt::Debug for Tree<V, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = DebugNodes { tree: self };
        f.debug_struct("Tree")
            .field("len", &self.len())
            .field("root", &DebugLink(self.root))
            .field("nodes", &nodes)
            .finish()
    }
}

/// Every reachable node in pre-order, each listing its children by handle.
struct DebugNodes<'a, V, L> {
    tree: &'a Tree<V, L>,
}

impl<V: fmt::Debug, L> fmt::Debug for DebugNodes<'_, V, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for id in self.tree.pre_order() {
            let node = &self.tree.arena[id];
            list.entry(&format_args!(
                "{id}: {:?} (balance {}, left {:?}, right {:?})",
                node.value,
                node.balance,
                DebugLink(node.left),
                DebugLink(node.right),
            ));
        }
        list.finish()
    }
}

struct DebugLink(Option<NodeId>);

impl fmt::Debug for DebugLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("-"),
        }
    }
}

impl<V, L> Tree<V, L> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Generate a new, empty `Tree` with room for `capacity` nodes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
            layer: PhantomData,
        }
    }

    /// Generate a `Tree` holding a single node with `value` at the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::SearchTree;
    ///
    /// let tree = SearchTree::with_root(1);
    /// let root = tree.root().unwrap();
    ///
    /// assert_eq!(tree.value(root), Some(&1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn with_root(value: V) -> Self {
        let mut tree = Self::new();
        tree.root = Some(tree.arena.alloc(value));
        tree
    }

    /// The current root, `None` when the tree is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The number of nodes stored. For [`Binary`] trees this includes detached nodes created by
    /// [`leaf`][Tree::leaf] that have not been grafted yet.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether no node is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every node. All handles become invalid.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// The value stored at `node`, `None` if the handle is stale.
    pub fn value(&self, node: NodeId) -> Option<&V> {
        self.arena.get(node).map(|n| &n.value)
    }

    /// The left child of `node`.
    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(|n| n.left)
    }

    /// The right child of `node`.
    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(|n| n.right)
    }

    /// The parent of `node`. `None` for the root and for detached nodes.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(|n| n.parent)
    }

    /// The height of the whole tree: `-1` when empty, `0` for a single node.
    pub fn height(&self) -> i32 {
        self.subtree_height(self.root)
    }

    /// The height of the subtree rooted at `node`. An absent subtree (or a stale handle) has a
    /// height of `-1`, a leaf has a height of `0`.
    ///
    /// The height is recomputed by walking the whole subtree every time. The walk uses an
    /// explicit stack so arbitrarily deep hand-built trees don't overflow the call stack.
    pub fn subtree_height(&self, node: Option<NodeId>) -> i32 {
        let Some(start) = node.filter(|&id| self.arena.get(id).is_some()) else {
            return -1;
        };

        let mut height = 0;
        let mut stack = vec![(start, 0)];
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[id];
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }
        height
    }

    /// Calls `visit` for every node below `from` in order: left subtree, node, right subtree.
    ///
    /// The walk keeps its pending nodes on the heap, so it handles trees of any depth.
    pub fn walk_in_order(&self, from: Option<NodeId>, mut visit: impl FnMut(NodeId, &V)) {
        for id in self.in_order_from(from) {
            visit(id, &self.arena[id].value);
        }
    }

    /// Calls `visit` for every node below `from` in pre-order: node, left subtree, right subtree.
    pub fn walk_pre_order(&self, from: Option<NodeId>, mut visit: impl FnMut(NodeId, &V)) {
        for id in self.pre_order_from(from) {
            visit(id, &self.arena[id].value);
        }
    }

    /// Calls `visit` for every node below `from` in post-order: left subtree, right subtree, node.
    pub fn walk_post_order(&self, from: Option<NodeId>, mut visit: impl FnMut(NodeId, &V)) {
        for id in self.post_order_from(from) {
            visit(id, &self.arena[id].value);
        }
    }

    /// The leftmost node below `node` (inclusive).
    pub(crate) fn leftmost(&self, mut node: NodeId) -> NodeId {
        while let Some(left) = self.arena[node].left {
            node = left;
        }
        node
    }

    /// The rightmost node below `node` (inclusive).
    pub(crate) fn rightmost(&self, mut node: NodeId) -> NodeId {
        while let Some(right) = self.arena[node].right {
            node = right;
        }
        node
    }

    /// Points whatever held `old` (its `parent`'s child slot, or the root) at `new` instead.
    /// Does not touch `new`'s own parent link.
    pub(crate) fn relink(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let parent = &mut self.arena[p];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    debug_assert_eq!(parent.right, Some(old), "{old} is not a child of {p}");
                    parent.right = new;
                }
            }
        }
    }
}

impl<V: fmt::Debug, L> Tree<V, L> {
    /// Walks the tree in order, emitting a `debug` event for every value.
    pub fn visit_in_order(&self) {
        self.walk_in_order(self.root, log_visit);
    }

    /// Walks the tree in pre-order, emitting a `debug` event for every value.
    pub fn visit_pre_order(&self) {
        self.walk_pre_order(self.root, log_visit);
    }

    /// Walks the tree in post-order, emitting a `debug` event for every value.
    pub fn visit_post_order(&self) {
        self.walk_post_order(self.root, log_visit);
    }
}

fn log_visit<V: fmt::Debug>(node: NodeId, value: &V) {
    debug!(%node, ?value, "visit");
}

impl<V> Tree<V, Binary> {
    /// Stores `value` in a new node that isn't linked anywhere yet. Attach it with
    /// [`graft_left`][Tree::graft_left], [`graft_right`][Tree::graft_right] or
    /// [`set_root`][Tree::set_root].
    pub fn leaf(&mut self, value: V) -> NodeId {
        self.arena.alloc(value)
    }

    /// Makes the detached subtree `subtree` the root of the tree. The previous root, if any, is
    /// detached and returned.
    pub fn set_root(&mut self, subtree: NodeId) -> Result<Option<NodeId>> {
        self.check_detached(subtree, None)?;
        Ok(self.root.replace(subtree))
    }

    /// Replaces the value stored at `node`, returning the previous one.
    pub fn set_value(&mut self, node: NodeId, value: V) -> Option<V> {
        self.arena
            .get_mut(node)
            .map(|n| std::mem::replace(&mut n.value, value))
    }

    /// Attaches the detached subtree `subtree` as the left child of `node`. The previous left child
    /// of `node` is kept by hanging it off the rightmost node of `subtree`.
    ///
    /// Returns `subtree`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::BinaryTree;
    ///
    /// let mut tree = BinaryTree::with_root('a');
    /// let root = tree.root().unwrap();
    ///
    /// let b = tree.leaf('b');
    /// tree.graft_left(root, b).unwrap();
    /// let c = tree.leaf('c');
    /// tree.graft_left(root, c).unwrap();
    ///
    /// // `b` now hangs to the right of `c`.
    /// assert_eq!(tree.left(root), Some(c));
    /// assert_eq!(tree.right(c), Some(b));
    /// assert_eq!(tree.parent(b), Some(c));
    /// ```
    pub fn graft_left(&mut self, node: NodeId, subtree: NodeId) -> Result<NodeId> {
        self.check_detached(subtree, Some(node))?;
        let previous = self.arena[node].left.replace(subtree);
        self.arena[subtree].parent = Some(node);

        let extreme = self.rightmost(subtree);
        self.arena[extreme].right = previous;
        if let Some(previous) = previous {
            self.arena[previous].parent = Some(extreme);
        }
        Ok(subtree)
    }

    /// Attaches the detached subtree `subtree` as the right child of `node`. The previous right
    /// child of `node` is kept by hanging it off the leftmost node of `subtree`.
    ///
    /// Returns `subtree`.
    pub fn graft_right(&mut self, node: NodeId, subtree: NodeId) -> Result<NodeId> {
        self.check_detached(subtree, Some(node))?;
        let previous = self.arena[node].right.replace(subtree);
        self.arena[subtree].parent = Some(node);

        let extreme = self.leftmost(subtree);
        self.arena[extreme].left = previous;
        if let Some(previous) = previous {
            self.arena[previous].parent = Some(extreme);
        }
        Ok(subtree)
    }

    /// Ensures `subtree` is live, has no parent, isn't the root and doesn't contain `target`.
    fn check_detached(&self, subtree: NodeId, target: Option<NodeId>) -> Result<()> {
        let node = self.arena.get(subtree).ok_or(Error::NotFound)?;
        if node.parent.is_some() || self.root == Some(subtree) {
            return Err(Error::Linked(subtree));
        }
        let Some(mut top) = target else {
            return Ok(());
        };
        if self.arena.get(top).is_none() {
            return Err(Error::NotFound);
        }
        while let Some(parent) = self.arena[top].parent {
            top = parent;
        }
        if top == subtree {
            return Err(Error::Linked(subtree));
        }
        Ok(())
    }
}
