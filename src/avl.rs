//! The self-balancing layer. Every node caches its height and balance factor, and rotations keep
//! the balance factor of every node within `-1..=1`.
//!
//! See [the Wikipedia page][wiki] for terminology.
//!
//! [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Rebalancing

use tracing::trace;

use crate::{Avl, NodeId, Tree, Violation};

impl<V> Tree<V, Avl> {
    /// The difference in height between the right and left subtrees of `node`, `None` for a
    /// stale handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// let one = tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    ///
    /// assert_eq!(tree.balance_factor(one), Some(1));
    /// ```
    pub fn balance_factor(&self, node: NodeId) -> Option<i8> {
        self.arena.get(node).map(|n| n.balance)
    }

    fn cached_height(&self, node: Option<NodeId>) -> i32 {
        node.map_or(-1, |n| self.arena[n].height)
    }

    /// Recomputes the height and balance factor of `node` from its children's cached heights.
    fn fix_height(&mut self, node: NodeId) {
        let left_height = self.cached_height(self.arena[node].left);
        let right_height = self.cached_height(self.arena[node].right);

        // Only ever off by one level while retracing an insertion or deletion.
        let balance = right_height - left_height;
        debug_assert!(balance.abs() <= 2, "node {node} has balance factor {balance}");

        let n = &mut self.arena[node];
        n.height = left_height.max(right_height) + 1;
        n.balance = balance as i8;
    }

    /// Rotate `pivot` to the left. This moves the right child up vertically and `pivot` down
    /// vertically. Used to rebalance the tree when the right child is too tall. As such, it must
    /// only be called when there _is_ a right child.
    ///
    /// Returns the new root of the subtree, which is also the new root of the tree when `pivot`
    /// was the root.
    ///
    /// ## Panics
    ///
    /// When called on a node without a right child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///   Option<parent>            Option<parent>
    ///      /                          /
    ///    pivot                    new_root
    ///    /   \                     /    \
    ///   x   new_root  rotate ->  pivot   z
    ///         / \                / \
    ///        y   z              x   y
    /// ```
    pub(crate) fn rotate_left(&mut self, pivot: NodeId) -> NodeId {
        let new_root = self.arena[pivot].right.expect("Rotate left => right child");
        let parent = self.arena[pivot].parent;
        let inner = self.arena[new_root].left;

        self.arena[pivot].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(pivot);
        }
        self.arena[pivot].parent = Some(new_root);
        self.fix_height(pivot);

        self.arena[new_root].left = Some(pivot);
        self.arena[new_root].parent = parent;
        self.relink(parent, pivot, Some(new_root));
        self.fix_height(new_root);

        trace!(%pivot, %new_root, "rotated left");
        new_root
    }

    /// Rotate `pivot` to the right. Mirror image of [`Tree::rotate_left`].
    ///
    /// ## Panics
    ///
    /// When called on a node without a left child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///      Option<parent>          Option<parent>
    ///         /                        /
    ///       pivot                  new_root
    ///       /   \                   /    \
    ///  new_root  z     rotate ->   x    pivot
    ///    / \                             / \
    ///   x   y                           y   z
    /// ```
    pub(crate) fn rotate_right(&mut self, pivot: NodeId) -> NodeId {
        let new_root = self.arena[pivot].left.expect("Rotate right => left child");
        let parent = self.arena[pivot].parent;
        let inner = self.arena[new_root].right;

        self.arena[pivot].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(pivot);
        }
        self.arena[pivot].parent = Some(new_root);
        self.fix_height(pivot);

        self.arena[new_root].right = Some(pivot);
        self.arena[new_root].parent = parent;
        self.relink(parent, pivot, Some(new_root));
        self.fix_height(new_root);

        trace!(%pivot, %new_root, "rotated right");
        new_root
    }

    /// Restores the balance of `ancestor`, whose balance factor is `-2` or `2`, with a single or
    /// double rotation. `descendant` is the node whose insertion unbalanced `ancestor`, if any; it
    /// must lie below the taller child.
    ///
    /// Returns the root of the tree.
    pub(crate) fn rebalance(
        &mut self,
        ancestor: NodeId,
        descendant: Option<NodeId>,
    ) -> Option<NodeId> {
        let n = &self.arena[ancestor];
        let leans_left = n.balance < 0;
        let child = if leans_left { n.left } else { n.right }
            .expect("An unbalanced node has a child on its taller side");
        debug_assert!(
            descendant.map_or(true, |d| self.is_below(d, child)),
            "{child} is not on the path from {ancestor} to the inserted node"
        );

        let child_balance = self.arena[child].balance;
        match (leans_left, child_balance) {
            (true, b) if b <= 0 => {
                trace!(%ancestor, "left-left case");
                self.rotate_right(ancestor);
            }
            (true, _) => {
                trace!(%ancestor, "left-right case");
                self.rotate_left(child);
                self.rotate_right(ancestor);
            }
            (false, b) if b >= 0 => {
                trace!(%ancestor, "right-right case");
                self.rotate_left(ancestor);
            }
            (false, _) => {
                trace!(%ancestor, "right-left case");
                self.rotate_right(child);
                self.rotate_left(ancestor);
            }
        }

        if cfg!(debug_assertions) {
            let top = self.arena[ancestor].parent.expect("Rotation moves the pivot down");
            let n = &self.arena[top];
            let left_height = self.cached_height(n.left);
            let right_height = self.cached_height(n.right);
            assert_eq!(n.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
        self.root
    }

    /// Whether `node` is `ancestor` or lies in its subtree.
    fn is_below(&self, mut node: NodeId, ancestor: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.arena[node].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Walks up from the freshly attached `leaf`, refreshing balance factors until the first
    /// unbalanced ancestor, which is fixed by a single call to [`Tree::rebalance`].
    ///
    /// One rebalance is always enough after an insertion: the rotated subtree gets back the height
    /// it had before the insertion, so nothing above it changes.
    pub(crate) fn retrace_insert(&mut self, leaf: NodeId) {
        let mut current = self.arena[leaf].parent;
        while let Some(node) = current {
            let before = self.arena[node].height;
            self.fix_height(node);
            if self.arena[node].balance.abs() > 1 {
                self.rebalance(node, Some(leaf));
                return;
            }
            if self.arena[node].height == before {
                return;
            }
            current = self.arena[node].parent;
        }
    }

    /// Walks up from the parent of a removed node to the root, refreshing balance factors and
    /// rotating at every unbalanced ancestor. Unlike insertion, a deletion may need a rotation on
    /// every level.
    pub(crate) fn retrace_unlink(&mut self, parent: Option<NodeId>) {
        let mut current = parent;
        while let Some(node) = current {
            self.fix_height(node);
            let mut top = node;
            if self.arena[node].balance.abs() > 1 {
                self.rebalance(node, None);
                top = self.arena[node].parent.expect("Rotation moves the pivot down");
            }
            current = self.arena[top].parent;
        }
    }
}

impl<V: PartialOrd> Tree<V, Avl> {
    /// Checks parent links, node count, ordering, and that every cached height and balance factor
    /// matches the actual shape with balance factors within `-1..=1`. Any violation is a bug in
    /// this crate.
    pub fn validate(&self) -> Result<(), Violation> {
        self.validate_links(|a, b| a < b)?;

        let mut heights = vec![-1; self.arena.bound()];
        let height =
            |heights: &[i32], node: Option<NodeId>| node.map_or(-1, |n| heights[n.index()]);
        for node in self.post_order() {
            let n = &self.arena[node];
            let left_height = height(&heights, n.left);
            let right_height = height(&heights, n.right);
            let actual = left_height.max(right_height) + 1;
            if n.height != actual {
                return Err(Violation::Height {
                    node,
                    cached: n.height,
                    actual,
                });
            }
            let balance = right_height - left_height;
            if i32::from(n.balance) != balance || balance.abs() > 1 {
                return Err(Violation::Balance {
                    node,
                    cached: n.balance,
                    actual: balance,
                });
            }
            heights[node.index()] = actual;
        }
        Ok(())
    }
}
