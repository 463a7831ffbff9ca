//! A plain-text drawing of a tree, one node per line in pre-order with its depth marked by `*`s.

use std::fmt;

use crate::{NodeId, Tree};

/// Displays a tree as an outline, see [`Tree::outline`].
pub struct Outline<'a, V, L> {
    tree: &'a Tree<V, L>,
}

impl<V, L> Tree<V, L> {
    /// Draws the tree in pre-order, one line per node. Each value is prefixed by as many `*` as
    /// its depth plus one.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// for value in [2, 1, 3] {
    ///     tree.insert(value).unwrap();
    /// }
    ///
    /// assert_eq!(tree.outline().to_string(), "*2\n**1\n**3\n");
    /// ```
    pub fn outline(&self) -> Outline<'_, V, L> {
        Outline { tree: self }
    }
}

impl<V: fmt::Display, L> fmt::Display for Outline<'_, V, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arena = &self.tree.arena;
        let mut stack: Vec<(NodeId, usize)> =
            self.tree.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            let n = &arena[node];
            writeln!(f, "{}{}", "*".repeat(depth), n.value)?;
            stack.extend(n.right.map(|r| (r, depth + 1)));
            stack.extend(n.left.map(|l| (l, depth + 1)));
        }
        Ok(())
    }
}
