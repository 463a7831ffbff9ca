//! Iterative traversal cursors.
//!
//! Each cursor is an independent [`Iterator`] over [`NodeId`]s holding its own stack or queue,
//! so any number of traversals over the same tree can be in flight at once. A cursor can be
//! restarted from its starting node at any point with [`Restartable::reset`].
//!
//! A cursor borrows the tree, so the tree cannot change shape while a cursor is alive. Code that
//! keeps the positions of a cursor (e.g. the handles it yielded) across a mutation must assume
//! that any insertion, deletion or rotation invalidates them.

use std::collections::VecDeque;

use crate::{NodeId, Tree};

/// A traversal that can start over from the beginning.
pub trait Restartable: Iterator {
    /// Rewinds the traversal. The next call to `next` yields the first node again.
    fn reset(&mut self);
}

impl<V, L> Tree<V, L> {
    /// Traverses the whole tree in order: left subtree, node, right subtree.
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
    /// let values: Vec<_> = tree.in_order().map(|n| tree.value(n).copied().unwrap()).collect();
    /// assert_eq!(values, vec![1, 2, 3]);
    /// ```
    pub fn in_order(&self) -> InOrder<'_, V, L> {
        self.in_order_from(self.root)
    }

    /// Traverses the subtree below `start` in order.
    pub fn in_order_from(&self, start: Option<NodeId>) -> InOrder<'_, V, L> {
        InOrder {
            tree: self,
            start,
            stack: Vec::new(),
            cursor: None,
            started: false,
        }
    }

    /// Traverses the whole tree in pre-order: node, left subtree, right subtree.
    pub fn pre_order(&self) -> PreOrder<'_, V, L> {
        self.pre_order_from(self.root)
    }

    /// Traverses the subtree below `start` in pre-order.
    pub fn pre_order_from(&self, start: Option<NodeId>) -> PreOrder<'_, V, L> {
        PreOrder {
            tree: self,
            start,
            stack: Vec::new(),
            started: false,
        }
    }

    /// Traverses the whole tree in post-order: left subtree, right subtree, node.
    pub fn post_order(&self) -> PostOrder<'_, V, L> {
        self.post_order_from(self.root)
    }

    /// Traverses the subtree below `start` in post-order.
    pub fn post_order_from(&self, start: Option<NodeId>) -> PostOrder<'_, V, L> {
        PostOrder {
            tree: self,
            start,
            stack: Vec::new(),
            last: None,
            started: false,
        }
    }

    /// Traverses the whole tree breadth first, one depth level after the other.
    pub fn level_order(&self) -> LevelOrder<'_, V, L> {
        self.level_order_from(self.root)
    }

    /// Traverses the subtree below `start` breadth first.
    pub fn level_order_from(&self, start: Option<NodeId>) -> LevelOrder<'_, V, L> {
        LevelOrder {
            tree: self,
            start,
            queue: VecDeque::new(),
            started: false,
        }
    }

    /// The stored values in order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.in_order().map(move |id| &self.arena[id].value)
    }

    /// `start` when it refers to a live node.
    fn live(&self, start: Option<NodeId>) -> Option<NodeId> {
        start.filter(|&id| self.arena.get(id).is_some())
    }
}

/// In-order cursor, see [`Tree::in_order`].
///
/// Descends the left spine pushing every node, pops and yields one, then continues with the right
/// child of the yielded node.
#[derive(Debug)]
pub struct InOrder<'a, V, L> {
    tree: &'a Tree<V, L>,
    start: Option<NodeId>,
    stack: Vec<NodeId>,
    /// Root of the subtree still to descend into.
    cursor: Option<NodeId>,
    started: bool,
}

impl<V, L> Iterator for InOrder<'_, V, L> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.started {
            self.stack.clear();
            self.cursor = self.tree.live(self.start);
            self.started = true;
        }

        while let Some(node) = self.cursor {
            self.stack.push(node);
            self.cursor = self.tree.arena[node].left;
        }
        let node = self.stack.pop()?;
        self.cursor = self.tree.arena[node].right;
        Some(node)
    }
}

impl<V, L> Restartable for InOrder<'_, V, L> {
    fn reset(&mut self) {
        self.started = false;
    }
}

/// Pre-order cursor, see [`Tree::pre_order`].
#[derive(Debug)]
pub struct PreOrder<'a, V, L> {
    tree: &'a Tree<V, L>,
    start: Option<NodeId>,
    stack: Vec<NodeId>,
    started: bool,
}

impl<V, L> Iterator for PreOrder<'_, V, L> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.started {
            self.stack.clear();
            self.stack.extend(self.tree.live(self.start));
            self.started = true;
        }

        let node = self.stack.pop()?;
        let n = &self.tree.arena[node];
        // Right first so the left subtree is popped first.
        self.stack.extend(n.right);
        self.stack.extend(n.left);
        Some(node)
    }
}

impl<V, L> Restartable for PreOrder<'_, V, L> {
    fn reset(&mut self) {
        self.started = false;
    }
}

/// Post-order cursor, see [`Tree::post_order`].
///
/// A node is yielded only once both of its subtrees have been. The last yielded node tells
/// whether we are coming back up from a child or seeing the node for the first time.
#[derive(Debug)]
pub struct PostOrder<'a, V, L> {
    tree: &'a Tree<V, L>,
    start: Option<NodeId>,
    stack: Vec<NodeId>,
    last: Option<NodeId>,
    started: bool,
}

impl<V, L> Iterator for PostOrder<'_, V, L> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.started {
            self.stack.clear();
            self.stack.extend(self.tree.live(self.start));
            self.last = None;
            self.started = true;
        }

        loop {
            let node = *self.stack.last()?;
            let n = &self.tree.arena[node];
            let returning = self.last.is_some() && (self.last == n.left || self.last == n.right);

            match (n.left, n.right) {
                (Some(left), _) if !returning => self.stack.push(left),
                (_, Some(right)) if self.last != Some(right) => self.stack.push(right),
                _ => {
                    self.stack.pop();
                    self.last = Some(node);
                    return Some(node);
                }
            }
        }
    }
}

impl<V, L> Restartable for PostOrder<'_, V, L> {
    fn reset(&mut self) {
        self.started = false;
    }
}

/// Level-order cursor, see [`Tree::level_order`].
#[derive(Debug)]
pub struct LevelOrder<'a, V, L> {
    tree: &'a Tree<V, L>,
    start: Option<NodeId>,
    queue: VecDeque<NodeId>,
    started: bool,
}

impl<V, L> Iterator for LevelOrder<'_, V, L> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.started {
            self.queue.clear();
            self.queue.extend(self.tree.live(self.start));
            self.started = true;
        }

        let node = self.queue.pop_front()?;
        let n = &self.tree.arena[node];
        self.queue.extend(n.left);
        self.queue.extend(n.right);
        Some(node)
    }
}

impl<V, L> Restartable for LevelOrder<'_, V, L> {
    fn reset(&mut self) {
        self.started = false;
    }
}
