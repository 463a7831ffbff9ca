//! Binary Search Tree operations shared by every [`Ordered`] layer.
//!
//! Values are compared with [`PartialOrd`]. Two values that cannot be ordered against each other
//! make the operation fail with [`Error::InvalidOperand`] before anything is modified.

use std::cmp::Ordering;
use std::mem;

use tracing::debug;

use crate::{Avl, Error, NodeId, Ordered, Result, Search, Tree, Violation};

fn compare<V: PartialOrd>(a: &V, b: &V) -> Result<Ordering> {
    a.partial_cmp(b).ok_or(Error::InvalidOperand)
}

impl<V, L: Ordered> Tree<V, L> {
    /// The node holding the smallest value.
    pub fn minimum(&self) -> Option<NodeId> {
        self.root.map(|root| self.leftmost(root))
    }

    /// The node holding the largest value.
    pub fn maximum(&self) -> Option<NodeId> {
        self.root.map(|root| self.rightmost(root))
    }

    /// The node holding the smallest value of the subtree rooted at `node`.
    pub fn minimum_of_subtree(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?;
        Some(self.leftmost(node))
    }

    /// The node holding the largest value of the subtree rooted at `node`.
    pub fn maximum_of_subtree(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?;
        Some(self.rightmost(node))
    }

    /// The next node in order, following parent links upwards when there is no right subtree.
    pub(crate) fn next_in_order(&self, node: NodeId) -> Option<NodeId> {
        if let Some(right) = self.arena[node].right {
            return Some(self.leftmost(right));
        }
        let mut child = node;
        let mut parent = self.arena[node].parent;
        while let Some(p) = parent {
            if self.arena[p].right != Some(child) {
                break;
            }
            child = p;
            parent = self.arena[p].parent;
        }
        parent
    }

    /// The previous node in order. Mirror image of [`Tree::next_in_order`].
    pub(crate) fn prev_in_order(&self, node: NodeId) -> Option<NodeId> {
        if let Some(left) = self.arena[node].left {
            return Some(self.rightmost(left));
        }
        let mut child = node;
        let mut parent = self.arena[node].parent;
        while let Some(p) = parent {
            if self.arena[p].left != Some(child) {
                break;
            }
            child = p;
            parent = self.arena[p].parent;
        }
        parent
    }

    /// Removes `node`, which must be live, and returns its value. Nodes with two children take
    /// the value of their in-order successor, which is the node actually unlinked.
    fn unlink(&mut self, node: NodeId) -> V {
        let (left, right, parent) = {
            let n = &self.arena[node];
            (n.left, n.right, n.parent)
        };

        if let (Some(_), Some(right)) = (left, right) {
            // The successor has no left child so this recursion splices it out directly.
            let successor = self.leftmost(right);
            debug!(%node, %successor, "copying successor up");
            let value = self.unlink(successor);
            return mem::replace(&mut self.arena[node].value, value);
        }

        let child = left.or(right);
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        self.relink(parent, node, child);
        debug!(%node, ?parent, ?child, "spliced out node");
        L::unlinked(self, parent);

        self.arena.release(node).value
    }

    /// Checks the parent links, the node count, and that `ordered` holds for every consecutive
    /// pair of in-order values.
    pub(crate) fn validate_links(
        &self,
        mut ordered: impl FnMut(&V, &V) -> bool,
    ) -> Result<(), Violation> {
        if let Some(root) = self.root {
            if self.arena[root].parent.is_some() {
                return Err(Violation::RootHasParent(root));
            }
        }

        let mut reachable = 0;
        let mut previous: Option<NodeId> = None;
        for node in self.in_order() {
            reachable += 1;
            let n = &self.arena[node];
            for child in [n.left, n.right].into_iter().flatten() {
                if self.arena[child].parent != Some(node) {
                    return Err(Violation::Parent {
                        parent: node,
                        child,
                    });
                }
            }
            if let Some(previous) = previous {
                if !ordered(&self.arena[previous].value, &n.value) {
                    return Err(Violation::Order(node));
                }
            }
            previous = Some(node);
        }

        if reachable != self.len() {
            return Err(Violation::Count {
                reachable,
                stored: self.len(),
            });
        }
        Ok(())
    }
}

impl<V: PartialOrd, L: Ordered> Tree<V, L> {
    /// Looks for `value` in the subtree rooted at `start`, which doesn't have to be the root.
    pub fn search_from(&self, start: NodeId, value: &V) -> Result<Option<NodeId>> {
        let mut current = self.arena.get(start).map(|_| start);
        while let Some(node) = current {
            let n = &self.arena[node];
            current = match compare(value, &n.value)? {
                Ordering::Less => n.left,
                Ordering::Equal => return Ok(Some(node)),
                Ordering::Greater => n.right,
            };
        }
        Ok(None)
    }

    /// Potentially finds the node holding `value`. If no node compares equal, `None` is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::{AvlTree, Error};
    ///
    /// let mut tree = AvlTree::new();
    /// let node = tree.insert(1.0).unwrap();
    ///
    /// assert_eq!(tree.search(&1.0), Ok(Some(node)));
    /// assert_eq!(tree.search(&42.0), Ok(None));
    /// assert_eq!(tree.search(&f64::NAN), Err(Error::InvalidOperand));
    /// ```
    pub fn search(&self, value: &V) -> Result<Option<NodeId>> {
        match self.root {
            Some(root) => self.search_from(root, value),
            None => Ok(None),
        }
    }

    /// Whether a node holds `value`.
    pub fn contains(&self, value: &V) -> Result<bool> {
        Ok(self.search(value)?.is_some())
    }

    /// Finds `node` again by its value, starting from the root.
    fn resolve(&self, node: NodeId) -> Result<Option<NodeId>> {
        match (self.root, self.arena.get(node)) {
            (Some(root), Some(n)) => self.search_from(root, &n.value),
            _ => Ok(None),
        }
    }

    /// Inserts `value` as a new leaf and returns its node.
    ///
    /// The tree holds each value at most once: inserting a value equal to a stored one replaces
    /// the stored value in place and returns the existing node.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// let one = tree.insert(1).unwrap();
    ///
    /// assert_eq!(tree.search(&1), Ok(Some(one)));
    /// assert_eq!(tree.insert(1), Ok(one));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: V) -> Result<NodeId> {
        let Some(mut current) = self.root else {
            let node = self.arena.alloc(value);
            self.root = Some(node);
            return Ok(node);
        };

        let goes_left = loop {
            let n = &self.arena[current];
            let next = match compare(&value, &n.value)? {
                Ordering::Less => n.left.ok_or(true),
                Ordering::Equal => {
                    self.arena[current].value = value;
                    return Ok(current);
                }
                Ordering::Greater => n.right.ok_or(false),
            };
            match next {
                Ok(child) => current = child,
                Err(goes_left) => break goes_left,
            }
        };

        let node = self.arena.alloc(value);
        self.arena[node].parent = Some(current);
        if goes_left {
            self.arena[current].left = Some(node);
        } else {
            self.arena[current].right = Some(node);
        }
        L::inserted(self, node);
        Ok(node)
    }

    /// The node holding the next larger value, `None` when `node` holds the largest value or is
    /// no longer in the tree.
    ///
    /// `node` is looked up again by its value first, so a handle whose value was changed from
    /// under it resolves to the node currently holding that value.
    pub fn successor(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.resolve(node)?.and_then(|node| self.next_in_order(node)))
    }

    /// The node holding the next smaller value, `None` when `node` holds the smallest value or is
    /// no longer in the tree.
    pub fn predecessor(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.resolve(node)?.and_then(|node| self.prev_in_order(node)))
    }

    /// Deletes the node holding the same value as `node` and returns the new root (`None` once
    /// the tree is empty).
    ///
    /// When that node has two children it keeps its place in the tree and takes the value of its
    /// in-order successor instead; the successor's node is the one removed. Handles to the
    /// successor are stale afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`] on an empty tree and [`Error::NotFound`] when `node` cannot be found
    /// again by its value. The tree is left untouched in both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// let one = tree.insert(1).unwrap();
    /// let two = tree.insert(2).unwrap();
    ///
    /// assert_eq!(tree.delete(one), Ok(Some(two)));
    /// assert_eq!(tree.search(&1), Ok(None));
    /// assert_eq!(tree.delete(two), Ok(None));
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete(&mut self, node: NodeId) -> Result<Option<NodeId>> {
        if self.root.is_none() {
            return Err(Error::EmptyTree);
        }
        let target = self.resolve(node)?.ok_or(Error::NotFound)?;
        self.unlink(target);
        Ok(self.root)
    }

    /// Deletes the node holding `value` and returns the stored value. If the tree does not
    /// contain `value`, nothing happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1).unwrap();
    ///
    /// assert_eq!(tree.remove(&1), Ok(Some(1)));
    /// assert_eq!(tree.remove(&1), Ok(None));
    /// ```
    pub fn remove(&mut self, value: &V) -> Result<Option<V>> {
        Ok(self.search(value)?.map(|node| self.unlink(node)))
    }

    /// Replaces the value at `node` as long as the new value still sorts strictly between the
    /// values of the node's in-order neighbours. Returns the previous value.
    fn checked_set_value(&mut self, node: NodeId, value: V) -> Result<V> {
        if self.arena.get(node).is_none() {
            return Err(Error::NotFound);
        }
        if let Some(prev) = self.prev_in_order(node) {
            if compare(&self.arena[prev].value, &value)? != Ordering::Less {
                return Err(Error::OutOfOrder(node));
            }
        }
        if let Some(next) = self.next_in_order(node) {
            if compare(&value, &self.arena[next].value)? != Ordering::Less {
                return Err(Error::OutOfOrder(node));
            }
        }
        Ok(mem::replace(&mut self.arena[node].value, value))
    }
}

impl<V: PartialOrd> Tree<V, Search> {
    /// Replaces the value at `node`, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfOrder`] when the new value doesn't sort strictly between the node's
    /// in-order neighbours, [`Error::NotFound`] for a stale handle.
    pub fn set_value(&mut self, node: NodeId, value: V) -> Result<V> {
        self.checked_set_value(node, value)
    }

    /// Checks parent links, node count and ordering. Any violation is a bug in this crate.
    pub fn validate(&self) -> Result<(), Violation> {
        self.validate_links(|a, b| a < b)
    }
}

impl<V: PartialOrd> Tree<V, Avl> {
    /// Replaces the value at `node`, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfOrder`] when the new value doesn't sort strictly between the node's
    /// in-order neighbours, [`Error::NotFound`] for a stale handle.
    pub fn set_value(&mut self, node: NodeId, value: V) -> Result<V> {
        self.checked_set_value(node, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchTree;

    /// Builds the unbalanced tree
    ///
    /// ```text
    ///       5
    ///      / \
    ///     3   8
    ///    /   / \
    ///   2   6   9
    ///        \
    ///         7
    /// ```
    fn sample() -> SearchTree<i32> {
        let mut tree = SearchTree::new();
        for value in [5, 3, 8, 2, 6, 9, 7] {
            tree.insert(value).unwrap();
        }
        tree
    }

    fn node(tree: &SearchTree<i32>, value: i32) -> NodeId {
        tree.search(&value).unwrap().unwrap()
    }

    fn value_of(tree: &SearchTree<i32>, node: Option<NodeId>) -> Option<i32> {
        node.and_then(|n| tree.value(n).copied())
    }

    fn in_order(tree: &SearchTree<i32>) -> Vec<i32> {
        tree.values().copied().collect()
    }

    #[test]
    fn insert_keeps_insertion_shape() {
        let tree = sample();
        let five = tree.root().unwrap();
        assert_eq!(tree.value(five), Some(&5));
        assert_eq!(value_of(&tree, tree.left(five)), Some(3));
        assert_eq!(value_of(&tree, tree.right(five)), Some(8));
        assert_eq!(tree.height(), 3);
        assert_eq!(in_order(&tree), vec![2, 3, 5, 6, 7, 8, 9]);
        tree.validate().unwrap();
    }

    #[test]
    fn always_adding_right_degenerates() {
        let mut tree = SearchTree::new();
        for value in 0..10 {
            tree.insert(value).unwrap();
        }
        assert_eq!(tree.height(), 9);
    }

    #[test]
    fn search_from_subtree() {
        let tree = sample();
        let eight = node(&tree, 8);
        assert_eq!(tree.search_from(eight, &7), Ok(Some(node(&tree, 7))));
        // 3 lives outside the subtree of 8.
        assert_eq!(tree.search_from(eight, &3), Ok(None));
    }

    #[test]
    fn search_incomparable_value() {
        let mut tree = SearchTree::new();
        tree.insert(1.0).unwrap();
        assert_eq!(tree.search(&f64::NAN), Err(Error::InvalidOperand));
        assert_eq!(tree.insert(f64::NAN), Err(Error::InvalidOperand));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn minimum_and_maximum() {
        let tree = sample();
        assert_eq!(value_of(&tree, tree.minimum()), Some(2));
        assert_eq!(value_of(&tree, tree.maximum()), Some(9));
        let eight = node(&tree, 8);
        assert_eq!(value_of(&tree, tree.minimum_of_subtree(eight)), Some(6));
        assert_eq!(value_of(&tree, tree.maximum_of_subtree(eight)), Some(9));

        let empty = SearchTree::<i32>::new();
        assert_eq!(empty.minimum(), None);
        assert_eq!(empty.maximum(), None);
    }

    #[test]
    fn successors() {
        let tree = sample();
        let expected = [
            (2, Some(3)),
            (3, Some(5)),
            (5, Some(6)),
            (6, Some(7)),
            (7, Some(8)),
            (8, Some(9)),
            (9, None),
        ];
        for (value, successor) in expected {
            let found = tree.successor(node(&tree, value)).unwrap();
            assert_eq!(value_of(&tree, found), successor, "successor of {value}");
        }
    }

    #[test]
    fn predecessors() {
        let tree = sample();
        let expected = [
            (2, None),
            (3, Some(2)),
            (5, Some(3)),
            (6, Some(5)),
            (7, Some(6)),
            (8, Some(7)),
            (9, Some(8)),
        ];
        for (value, predecessor) in expected {
            let found = tree.predecessor(node(&tree, value)).unwrap();
            assert_eq!(value_of(&tree, found), predecessor, "predecessor of {value}");
        }
    }

    #[test]
    fn successor_of_removed_node_is_none() {
        let mut tree = sample();
        let seven = node(&tree, 7);
        tree.delete(seven).unwrap();
        assert_eq!(tree.successor(seven), Ok(None));
        assert_eq!(tree.predecessor(seven), Ok(None));
    }

    #[test]
    fn delete_leaf() {
        let mut tree = sample();
        let root = tree.root();
        assert_eq!(tree.delete(node(&tree, 2)), Ok(root));
        assert_eq!(in_order(&tree), vec![3, 5, 6, 7, 8, 9]);
        assert_eq!(tree.left(node(&tree, 3)), None);
        tree.validate().unwrap();
    }

    #[test]
    fn delete_with_one_child() {
        let mut tree = sample();
        tree.delete(node(&tree, 6)).unwrap();
        assert_eq!(in_order(&tree), vec![2, 3, 5, 7, 8, 9]);
        let seven = node(&tree, 7);
        assert_eq!(value_of(&tree, tree.parent(seven)), Some(8));
        tree.validate().unwrap();
    }

    #[test]
    fn delete_with_two_children_copies_successor_up() {
        let mut tree = sample();
        let eight = node(&tree, 8);
        let nine = node(&tree, 9);
        tree.delete(eight).unwrap();

        // The node that held 8 now holds its successor 9; 9's own node is gone.
        assert_eq!(tree.value(eight), Some(&9));
        assert_eq!(tree.value(nine), None);
        assert_eq!(in_order(&tree), vec![2, 3, 5, 6, 7, 9]);
        tree.validate().unwrap();
    }

    #[test]
    fn delete_root_with_one_child_promotes_it() {
        let mut tree = SearchTree::new();
        let one = tree.insert(1).unwrap();
        let two = tree.insert(2).unwrap();

        assert_eq!(tree.delete(one), Ok(Some(two)));
        assert_eq!(tree.parent(two), None);
        assert_eq!(tree.delete(two), Ok(None));
        assert!(tree.is_empty());
        assert_eq!(tree.height(), -1);
    }

    #[test]
    fn delete_errors_leave_tree_untouched() {
        let mut tree = SearchTree::new();
        let one = tree.insert(1).unwrap();
        tree.delete(one).unwrap();
        assert_eq!(tree.delete(one), Err(Error::EmptyTree));

        let mut tree = sample();
        let two = node(&tree, 2);
        tree.delete(two).unwrap();
        assert_eq!(tree.delete(two), Err(Error::NotFound));
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn remove_returns_value() {
        let mut tree = sample();
        assert_eq!(tree.remove(&5), Ok(Some(5)));
        assert_eq!(tree.remove(&5), Ok(None));
        assert_eq!(tree.remove(&42), Ok(None));
        assert_eq!(in_order(&tree), vec![2, 3, 6, 7, 8, 9]);
        tree.validate().unwrap();
    }

    #[test]
    fn insert_equal_value_replaces_in_place() {
        #[derive(Debug)]
        struct Keyed(i32, &'static str);
        impl PartialEq for Keyed {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }
        impl PartialOrd for Keyed {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                self.0.partial_cmp(&other.0)
            }
        }

        let mut tree = SearchTree::new();
        let first = tree.insert(Keyed(1, "first")).unwrap();
        let second = tree.insert(Keyed(1, "second")).unwrap();
        assert_eq!(first, second);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.value(first).map(|k| k.1), Some("second"));
    }

    #[test]
    fn set_value_checks_neighbours() {
        let mut tree = sample();
        let six = node(&tree, 6);
        assert_eq!(tree.set_value(six, 5), Err(Error::OutOfOrder(six)));
        assert_eq!(tree.set_value(six, 7), Err(Error::OutOfOrder(six)));
        assert_eq!(tree.set_value(six, 6), Ok(6));

        let mut tree = SearchTree::new();
        let a = tree.insert(1.0).unwrap();
        tree.insert(2.0).unwrap();
        assert_eq!(tree.set_value(a, 1.5), Ok(1.0));
        assert_eq!(tree.set_value(a, f64::NAN), Err(Error::InvalidOperand));
    }

    #[test]
    fn validate_catches_broken_order() {
        let mut tree = sample();
        let three = node(&tree, 3);
        tree.arena[three].value = 42;
        assert_eq!(tree.validate(), Err(Violation::Order(node_of_value(&tree, 5))));
    }

    fn node_of_value(tree: &SearchTree<i32>, value: i32) -> NodeId {
        tree.in_order()
            .find(|&n| tree.value(n) == Some(&value))
            .unwrap()
    }
}
