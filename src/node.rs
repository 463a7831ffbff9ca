//! Node storage. Every node of a tree lives in one arena and is addressed by a [`NodeId`].
//!
//! Child links are owning indices into the arena, the parent link is a plain back-reference.
//! Rotations only rewrite these indices; nodes never move.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

/// A stable handle to a node of a [`Tree`][crate::Tree].
///
/// A handle stays valid until its node is removed. Its slot may be handed out again to a later
/// insertion, but every reuse bumps the slot's generation, so a stale handle never refers to the
/// new occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "v{}", self.generation)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    pub(crate) value: V,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    /// Edges on the longest path down to a leaf. Only kept up to date by the AVL layer.
    pub(crate) height: i32,
    /// `height(right) - height(left)`. Only kept up to date by the AVL layer.
    pub(crate) balance: i8,
}

impl<V> Node<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent: None,
            height: 0,
            balance: 0,
        }
    }
}

#[derive(Clone, Debug)]
enum Slot<V> {
    Occupied {
        generation: u32,
        node: Node<V>,
    },
    /// `next` is the following free slot, forming the free list.
    Vacant { generation: u32, next: Option<u32> },
}

#[derive(Clone, Debug)]
pub(crate) struct Arena<V> {
    slots: Vec<Slot<V>>,
    free: Option<u32>,
    len: usize,
}

impl<V> Arena<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// One past the largest index ever handed out.
    pub(crate) fn bound(&self) -> usize {
        self.slots.len()
    }

    /// Frees every slot. The slots are kept so handles from before the clear stay stale.
    pub(crate) fn clear(&mut self) {
        let mut next = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match *slot {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => generation,
            };
            *slot = Slot::Vacant { generation, next };
            next = Some(index as u32);
        }
        self.free = next;
        self.len = 0;
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<V>> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied { generation, node }) if *generation == id.generation => {
                Some(node)
            }
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<V>> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied { generation, node }) if *generation == id.generation => {
                Some(node)
            }
            _ => None,
        }
    }

    /// Stores `value` in a fresh, unlinked node.
    pub(crate) fn alloc(&mut self, value: V) -> NodeId {
        let node = Node::new(value);
        self.len += 1;
        match self.free {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                let Slot::Vacant { generation, next } = *slot else {
                    unreachable!("free list points at occupied slot #{index}");
                };
                *slot = Slot::Occupied { generation, node };
                self.free = next;
                NodeId { index, generation }
            }
            None => {
                let index = u32::try_from(self.slots.len()).expect("more than u32::MAX nodes");
                self.slots.push(Slot::Occupied {
                    generation: 0,
                    node,
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Frees the slot of `id` and hands back its node. The caller must have unlinked it first.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<V> {
        assert!(self.get(id).is_some(), "released node {id} is not live");
        let vacant = Slot::Vacant {
            generation: id.generation.wrapping_add(1),
            next: self.free,
        };
        match mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied { node, .. } => {
                self.free = Some(id.index);
                self.len -= 1;
                node
            }
            Slot::Vacant { .. } => unreachable!("released vacant slot {id}"),
        }
    }
}

impl<V> Index<NodeId> for Arena<V> {
    type Output = Node<V>;

    fn index(&self, id: NodeId) -> &Node<V> {
        self.get(id).unwrap_or_else(|| panic!("node {id} is not live"))
    }
}

impl<V> IndexMut<NodeId> for Arena<V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<V> {
        self.get_mut(id).unwrap_or_else(|| panic!("node {id} is not live"))
    }
}
