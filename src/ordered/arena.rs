//! Slot arena backing [`RedBlackTree`](super::RedBlackTree).
//!
//! Nodes live in a `Vec` of slots and refer to each other through
//! [`NodeId`] indices. Child links are the owning edges of the tree; the
//! parent link is a plain back-reference used for upward traversal and
//! rebalancing. Freed slots are threaded onto a free list and handed out
//! again by later allocations.

use std::ops::{Index, IndexMut};

// =============================================================================
// Identifiers
// =============================================================================

/// Index of a node slot inside an [`Arena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline]
    const fn slot(self) -> usize {
        self.0
    }
}

// =============================================================================
// Color and Direction
// =============================================================================

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

/// The side of a parent a child hangs from.
///
/// Every rebalancing case has a mirror image; indexing children by
/// `Direction` lets one routine handle both.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[inline]
    const fn position(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node of the red-black tree.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) color: Color,
    pub(crate) parent: Option<NodeId>,
    children: [Option<NodeId>; 2],
}

impl<K> Node<K> {
    /// Creates a new red leaf hanging from `parent`.
    const fn new_red(key: K, parent: Option<NodeId>) -> Self {
        Self {
            key,
            color: Color::Red,
            parent,
            children: [None, None],
        }
    }

    #[inline]
    pub(crate) const fn child(&self, direction: Direction) -> Option<NodeId> {
        self.children[direction.position()]
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, direction: Direction, child: Option<NodeId>) {
        self.children[direction.position()] = child;
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

// =============================================================================
// Arena
// =============================================================================

#[derive(Clone, Debug)]
enum Slot<K> {
    Occupied(Node<K>),
    Vacant { next_free: Option<NodeId> },
}

/// Growable node storage with slot reuse.
#[derive(Clone, Debug)]
pub(crate) struct Arena<K> {
    slots: Vec<Slot<K>>,
    free_head: Option<NodeId>,
}

impl<K> Arena<K> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
        }
    }

    /// Allocates a red leaf, reusing a freed slot when one is available.
    pub(crate) fn allocate(&mut self, key: K, parent: Option<NodeId>) -> NodeId {
        let node = Node::new_red(key, parent);
        match self.free_head {
            Some(id) => {
                let slot = &mut self.slots[id.slot()];
                let Slot::Vacant { next_free } = &*slot else {
                    unreachable!("free list points at an occupied slot");
                };
                self.free_head = *next_free;
                *slot = Slot::Occupied(node);
                id
            }
            None => {
                let id = NodeId(self.slots.len());
                self.slots.push(Slot::Occupied(node));
                id
            }
        }
    }

    /// Releases a slot and returns the key it held.
    pub(crate) fn release(&mut self, id: NodeId) -> K {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match std::mem::replace(&mut self.slots[id.slot()], vacant) {
            Slot::Occupied(node) => {
                self.free_head = Some(id);
                node.key
            }
            Slot::Vacant { .. } => unreachable!("double release of arena slot"),
        }
    }

    /// Swaps the keys stored in two distinct nodes.
    pub(crate) fn swap_keys(&mut self, first: NodeId, second: NodeId) {
        debug_assert_ne!(first, second);
        let (low, high) = if first.slot() < second.slot() {
            (first.slot(), second.slot())
        } else {
            (second.slot(), first.slot())
        };
        let (head, tail) = self.slots.split_at_mut(high);
        match (&mut head[low], &mut tail[0]) {
            (Slot::Occupied(a), Slot::Occupied(b)) => std::mem::swap(&mut a.key, &mut b.key),
            _ => unreachable!("swap_keys on a vacant slot"),
        }
    }

    /// Drops every node and forgets the free list.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
    }

    /// Number of slots ever handed out, live or free.
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<K> Index<NodeId> for Arena<K> {
    type Output = Node<K>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        match &self.slots[id.slot()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("dangling node id {id:?}"),
        }
    }
}

impl<K> IndexMut<NodeId> for Arena<K> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match &mut self.slots[id.slot()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("dangling node id {id:?}"),
        }
    }
}
