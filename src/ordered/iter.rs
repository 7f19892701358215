//! Iterators over a [`RedBlackTree`].
//!
//! All borrowing iterators walk the tree through parent back-references, so
//! they need no auxiliary stack and advance in amortized O(1).

use std::iter::FusedIterator;

use super::arena::{Direction, NodeId};
use super::tree::RedBlackTree;

// =============================================================================
// Order
// =============================================================================

/// Direction of a [`RedBlackTree::range`] walk.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Order {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Largest key first.
    Descending,
}

impl Order {
    /// The in-order step taken to move to the next key.
    #[inline]
    pub(crate) const fn forward(self) -> Direction {
        match self {
            Self::Ascending => Direction::Right,
            Self::Descending => Direction::Left,
        }
    }

    /// Returns the opposite order.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

// =============================================================================
// Iter
// =============================================================================

/// Ascending iterator over the keys of a tree.
///
/// Created by [`RedBlackTree::iter`].
pub struct Iter<'a, K> {
    tree: &'a RedBlackTree<K>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) const fn new(
        tree: &'a RedBlackTree<K>,
        front: Option<NodeId>,
        back: Option<NodeId>,
    ) -> Self {
        Self {
            tree,
            front,
            back,
            remaining: tree.len(),
        }
    }
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = self.tree.step(id, Direction::Right);
        Some(self.tree.key(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = self.tree.step(id, Direction::Left);
        Some(self.tree.key(id))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

// =============================================================================
// IntoIter
// =============================================================================

/// Owning ascending iterator, created by `RedBlackTree::into_iter`.
pub struct IntoIter<K> {
    keys: std::vec::IntoIter<K>,
}

impl<K> IntoIter<K> {
    pub(crate) fn new(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter(),
        }
    }
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K> DoubleEndedIterator for IntoIter<K> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.keys.next_back()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}

impl<K> FusedIterator for IntoIter<K> {}

// =============================================================================
// Range
// =============================================================================

/// Lazy iterator over a contiguous run of keys.
///
/// Both ends are located once, when the range is created; stepping between
/// them follows parent links. `next` moves in the range's [`Order`], while
/// `next_back` walks in from the far end.
///
/// Created by [`RedBlackTree::range`] and [`RedBlackTree::range_bounds`].
pub struct Range<'a, K> {
    tree: &'a RedBlackTree<K>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    order: Order,
}

impl<'a, K: Ord> Range<'a, K> {
    /// `front` and `back` are the first and last nodes to yield in `order`.
    /// A pair that has crossed yields nothing.
    pub(crate) fn new(
        tree: &'a RedBlackTree<K>,
        front: Option<NodeId>,
        back: Option<NodeId>,
        order: Order,
    ) -> Self {
        let crossed = match (front, back) {
            (Some(front), Some(back)) => {
                let (first, last) = (tree.key(front), tree.key(back));
                match order {
                    Order::Ascending => first > last,
                    Order::Descending => first < last,
                }
            }
            _ => true,
        };
        if crossed {
            Self {
                tree,
                front: None,
                back: None,
                order,
            }
        } else {
            Self {
                tree,
                front,
                back,
                order,
            }
        }
    }
}

impl<K> Range<'_, K> {
    /// Returns the direction this range yields keys in.
    #[inline]
    #[must_use]
    pub const fn order(&self) -> Order {
        self.order
    }
}

impl<K> Clone for Range<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            order: self.order,
        }
    }
}

impl<'a, K> Iterator for Range<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.front?;
        if self.back == Some(id) {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.tree.step(id, self.order.forward());
        }
        Some(self.tree.key(id))
    }
}

impl<K> DoubleEndedIterator for Range<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.back?;
        if self.front == Some(id) {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.tree.step(id, self.order.forward().opposite());
        }
        Some(self.tree.key(id))
    }
}

impl<K> FusedIterator for Range<'_, K> {}
