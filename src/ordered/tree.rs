//! Arena-backed red-black tree of unique keys.
//!
//! [`RedBlackTree`] keeps a dynamic set of distinct, totally ordered keys and
//! answers membership, predecessor/successor, min/max and ordered iteration
//! queries in O(log N).
//!
//! # Internal Structure
//!
//! Nodes are stored in an [`Arena`] and linked by index. Each node owns its
//! two child links; the parent link is a non-owning back-reference that lets
//! iteration and rebalancing walk upwards without an explicit stack.
//!
//! The tree maintains the classic invariants:
//! 1. Every node is either red or black
//! 2. The root is black
//! 3. Red nodes have only black children
//! 4. Every path from a node to a null leaf has the same number of black nodes
//! 5. Null children count as black
//!
//! Rebalancing after insert and removal is written as a loop over named
//! cases ([`InsertCase`], [`RemovalCase`]): each iteration classifies the
//! current shape, then applies exactly one recolor/rotate step.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Bound, RangeBounds};

use tracing::trace;

use super::arena::{Arena, Color, Direction, NodeId};
use super::error::{InvariantViolation, TreeError};
use super::iter::{IntoIter, Iter, Order, Range};

// =============================================================================
// Rebalancing Cases
// =============================================================================

/// Shape of the neighbourhood of a freshly inserted (or recolored) red node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum InsertCase {
    /// The node has no red parent to conflict with and is, or becomes, black.
    Root { node: NodeId },
    /// The parent is black; nothing to do.
    BlackParent,
    /// Parent and uncle are both red.
    RedUncle {
        parent: NodeId,
        uncle: NodeId,
        grandparent: NodeId,
    },
    /// Parent red, uncle black, node on the inner side of the grandparent.
    InnerChild { parent: NodeId, parent_side: Direction },
    /// Parent red, uncle black, node on the outer side of the grandparent.
    OuterChild {
        parent: NodeId,
        grandparent: NodeId,
        parent_side: Direction,
    },
}

/// Shape around a black node that is one black short ("double black").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum RemovalCase {
    /// The deficit reached the root; every path lost one black.
    Root,
    /// The sibling is red.
    RedSibling {
        parent: NodeId,
        sibling: NodeId,
        side: Direction,
    },
    /// Parent, sibling and both nephews are black.
    BlackFamily { parent: NodeId, sibling: NodeId },
    /// Parent is red, sibling and both nephews are black.
    RedParent { parent: NodeId, sibling: NodeId },
    /// Sibling black, near nephew red, far nephew black.
    NearNephewRed {
        sibling: NodeId,
        near: NodeId,
        side: Direction,
    },
    /// Sibling black, far nephew red.
    FarNephewRed {
        parent: NodeId,
        sibling: NodeId,
        far: NodeId,
        side: Direction,
    },
}

/// Result of descending the tree looking for a key.
enum Probe {
    Found(NodeId),
    Vacant {
        parent: Option<NodeId>,
        side: Direction,
    },
}

// =============================================================================
// RedBlackTree Definition
// =============================================================================

/// An ordered set of unique keys backed by a red-black tree.
///
/// Keys must implement `Ord`. Equal keys are rejected rather than merged, so
/// [`insert`](Self::insert) reports [`TreeError::DuplicateKey`] instead of
/// silently replacing.
///
/// # Time Complexity
///
/// | Operation                          | Complexity   |
/// |------------------------------------|--------------|
/// | `insert`                           | O(log N)     |
/// | `remove`                           | O(log N)     |
/// | `contains`                         | O(log N)     |
/// | `min`/`max`                        | O(log N)     |
/// | `find_predecessor_or_equal`        | O(log N)     |
/// | `find_successor_or_equal`          | O(log N)     |
/// | `range`                            | O(log N + k) |
/// | `len`                              | O(1)         |
///
/// # Examples
///
/// ```rust
/// use sylva::ordered::RedBlackTree;
///
/// let mut tree = RedBlackTree::try_from_iter([5, 3, 8, 1, 4, 7, 9]).unwrap();
/// assert_eq!(tree.find_predecessor_or_equal(&6), Ok(&5));
/// assert_eq!(tree.find_successor_or_equal(&6), Ok(&7));
///
/// tree.remove(&8).unwrap();
/// assert!(!tree.contains(&8));
///
/// let keys: Vec<i32> = tree.iter().copied().collect();
/// assert_eq!(keys, vec![1, 3, 4, 5, 7, 9]);
/// ```
#[derive(Clone)]
pub struct RedBlackTree<K> {
    arena: Arena<K>,
    root: Option<NodeId>,
    length: usize,
}

impl<K> RedBlackTree<K> {
    /// Creates a new empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = RedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            length: 0,
        }
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree holds no keys.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.length = 0;
    }

    /// Returns the smallest key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Empty`] if the tree holds no keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::{RedBlackTree, TreeError};
    ///
    /// let tree = RedBlackTree::try_from_iter([3, 1, 2]).unwrap();
    /// assert_eq!(RedBlackTree::min(&tree), Ok(&1));
    ///
    /// let empty: RedBlackTree<i32> = RedBlackTree::new();
    /// assert_eq!(RedBlackTree::min(&empty), Err(TreeError::Empty));
    /// ```
    pub fn min(&self) -> Result<&K, TreeError> {
        self.root
            .map(|root| &self.arena[self.extreme(root, Direction::Left)].key)
            .ok_or(TreeError::Empty)
    }

    /// Returns the largest key.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Empty`] if the tree holds no keys.
    pub fn max(&self) -> Result<&K, TreeError> {
        self.root
            .map(|root| &self.arena[self.extreme(root, Direction::Right)].key)
            .ok_or(TreeError::Empty)
    }

    /// Returns an iterator over the keys in ascending order.
    ///
    /// The iterator is double-ended: `tree.iter().rev()` walks the keys in
    /// descending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::RedBlackTree;
    ///
    /// let tree = RedBlackTree::try_from_iter([2, 3, 1]).unwrap();
    /// let ascending: Vec<&i32> = tree.iter().collect();
    /// let descending: Vec<&i32> = tree.iter().rev().collect();
    /// assert_eq!(ascending, vec![&1, &2, &3]);
    /// assert_eq!(descending, vec![&3, &2, &1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self, self.extreme_node(Direction::Left), self.extreme_node(Direction::Right))
    }

    // -------------------------------------------------------------------------
    // Navigation helpers shared with the iterators
    // -------------------------------------------------------------------------

    #[inline]
    pub(crate) fn key(&self, id: NodeId) -> &K {
        &self.arena[id].key
    }

    /// Follows `direction` links from `id` until they run out.
    pub(crate) fn extreme(&self, id: NodeId, direction: Direction) -> NodeId {
        let mut current = id;
        while let Some(next) = self.arena[current].child(direction) {
            current = next;
        }
        current
    }

    fn extreme_node(&self, direction: Direction) -> Option<NodeId> {
        self.root.map(|root| self.extreme(root, direction))
    }

    /// In-order neighbour of `id`; `Direction::Right` is the successor.
    pub(crate) fn step(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        if let Some(child) = self.arena[id].child(direction) {
            return Some(self.extreme(child, direction.opposite()));
        }
        let mut current = id;
        while let Some(parent) = self.arena[current].parent {
            if self.arena[parent].child(direction) == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.arena[id].is_red())
    }

    fn side_of(&self, child: NodeId, parent: NodeId) -> Direction {
        if self.arena[parent].child(Direction::Left) == Some(child) {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.arena[id].color = color;
    }

    /// Rotates `pivot` down toward `direction`; its child on the opposite
    /// side takes its place.
    fn rotate(&mut self, pivot: NodeId, direction: Direction) {
        let Some(rising) = self.arena[pivot].child(direction.opposite()) else {
            unreachable!("rotation toward {direction:?} without a child to lift");
        };
        trace!(?pivot, ?direction, "rotate");

        let inner = self.arena[rising].child(direction);
        self.arena[pivot].set_child(direction.opposite(), inner);
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(pivot);
        }

        let grandparent = self.arena[pivot].parent;
        self.arena[rising].parent = grandparent;
        match grandparent {
            None => self.root = Some(rising),
            Some(grandparent) => {
                let side = self.side_of(pivot, grandparent);
                self.arena[grandparent].set_child(side, Some(rising));
            }
        }

        self.arena[rising].set_child(direction, Some(pivot));
        self.arena[pivot].parent = Some(rising);
    }

    /// Puts `replacement` where `node` hangs from its parent (or the root).
    fn replace_in_parent(&mut self, node: NodeId, replacement: Option<NodeId>) {
        let parent = self.arena[node].parent;
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                let side = self.side_of(node, parent);
                self.arena[parent].set_child(side, replacement);
            }
        }
        if let Some(replacement) = replacement {
            self.arena[replacement].parent = parent;
        }
    }

    // -------------------------------------------------------------------------
    // Insert rebalancing
    // -------------------------------------------------------------------------

    fn classify_insert(&self, node: NodeId) -> InsertCase {
        let Some(parent) = self.arena[node].parent else {
            return InsertCase::Root { node };
        };
        if !self.arena[parent].is_red() {
            return InsertCase::BlackParent;
        }
        // A red parent without a grandparent is a red root.
        let Some(grandparent) = self.arena[parent].parent else {
            return InsertCase::Root { node: parent };
        };

        let node_side = self.side_of(node, parent);
        let parent_side = self.side_of(parent, grandparent);
        match self.arena[grandparent].child(parent_side.opposite()) {
            Some(uncle) if self.arena[uncle].is_red() => InsertCase::RedUncle {
                parent,
                uncle,
                grandparent,
            },
            _ if node_side != parent_side => InsertCase::InnerChild {
                parent,
                parent_side,
            },
            _ => InsertCase::OuterChild {
                parent,
                grandparent,
                parent_side,
            },
        }
    }

    fn rebalance_after_insert(&mut self, inserted: NodeId) {
        let mut node = inserted;
        loop {
            let case = self.classify_insert(node);
            trace!(?case, "insert rebalance");
            match case {
                InsertCase::Root { node } => {
                    self.set_color(node, Color::Black);
                    return;
                }
                InsertCase::BlackParent => return,
                InsertCase::RedUncle {
                    parent,
                    uncle,
                    grandparent,
                } => {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                }
                InsertCase::InnerChild {
                    parent,
                    parent_side,
                } => {
                    // Lift the node over its parent; the old parent becomes
                    // the outer child handled on the next pass.
                    self.rotate(parent, parent_side);
                    node = parent;
                }
                InsertCase::OuterChild {
                    parent,
                    grandparent,
                    parent_side,
                } => {
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate(grandparent, parent_side.opposite());
                    return;
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Removal rebalancing
    // -------------------------------------------------------------------------

    fn classify_removal(&self, node: NodeId) -> RemovalCase {
        let Some(parent) = self.arena[node].parent else {
            return RemovalCase::Root;
        };
        let side = self.side_of(node, parent);
        // A black non-root node always has a sibling, or black heights
        // would already differ.
        let Some(sibling) = self.arena[parent].child(side.opposite()) else {
            unreachable!("double-black node without a sibling");
        };

        if self.arena[sibling].is_red() {
            return RemovalCase::RedSibling {
                parent,
                sibling,
                side,
            };
        }

        let near = self.arena[sibling].child(side);
        let far = self.arena[sibling].child(side.opposite());
        match (near, far) {
            (_, Some(far)) if self.arena[far].is_red() => RemovalCase::FarNephewRed {
                parent,
                sibling,
                far,
                side,
            },
            (Some(near), _) if self.arena[near].is_red() => RemovalCase::NearNephewRed {
                sibling,
                near,
                side,
            },
            _ if self.arena[parent].is_red() => RemovalCase::RedParent { parent, sibling },
            _ => RemovalCase::BlackFamily { parent, sibling },
        }
    }

    /// Restores black heights around `doomed`, a black leaf about to be
    /// unlinked. The node stays in place while the cases run.
    fn rebalance_before_unlink(&mut self, doomed: NodeId) {
        let mut node = doomed;
        loop {
            let case = self.classify_removal(node);
            trace!(?case, "removal rebalance");
            match case {
                RemovalCase::Root => return,
                RemovalCase::RedSibling {
                    parent,
                    sibling,
                    side,
                } => {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate(parent, side);
                }
                RemovalCase::BlackFamily { parent, sibling } => {
                    self.set_color(sibling, Color::Red);
                    node = parent;
                }
                RemovalCase::RedParent { parent, sibling } => {
                    self.set_color(sibling, Color::Red);
                    self.set_color(parent, Color::Black);
                    return;
                }
                RemovalCase::NearNephewRed {
                    sibling,
                    near,
                    side,
                } => {
                    self.rotate(sibling, side.opposite());
                    self.set_color(sibling, Color::Red);
                    self.set_color(near, Color::Black);
                }
                RemovalCase::FarNephewRed {
                    parent,
                    sibling,
                    far,
                    side,
                } => {
                    let parent_color = self.arena[parent].color;
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    self.set_color(far, Color::Black);
                    self.rotate(parent, side);
                    return;
                }
            }
        }
    }
}

impl<K: Ord> RedBlackTree<K> {
    /// Builds a tree from a sequence of distinct keys.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if the sequence repeats a key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::{RedBlackTree, TreeError};
    ///
    /// let tree = RedBlackTree::try_from_iter(vec![3, 1, 2]).unwrap();
    /// assert_eq!(tree.len(), 3);
    ///
    /// let duplicated = RedBlackTree::try_from_iter(vec![1, 2, 1]);
    /// assert_eq!(duplicated.err(), Some(TreeError::DuplicateKey));
    /// ```
    pub fn try_from_iter<I: IntoIterator<Item = K>>(keys: I) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for key in keys {
            tree.insert(key)?;
        }
        Ok(tree)
    }

    fn locate<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut parent = None;
        let mut side = Direction::Left;
        let mut current = self.root;
        while let Some(id) = current {
            side = match key.cmp(self.arena[id].key.borrow()) {
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
                Ordering::Equal => return Probe::Found(id),
            };
            parent = Some(id);
            current = self.arena[id].child(side);
        }
        Probe::Vacant { parent, side }
    }

    /// Nearest node on the `toward` side of `key`: the floor or predecessor
    /// for `Direction::Left`, the ceiling or successor for `Direction::Right`.
    fn bound_search<Q>(&self, key: &Q, toward: Direction, inclusive: bool) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let wanted = match toward {
            Direction::Left => Ordering::Less,
            Direction::Right => Ordering::Greater,
        };
        let mut best = None;
        let mut current = self.root;
        while let Some(id) = current {
            let ordering = self.arena[id].key.borrow().cmp(key);
            if ordering == Ordering::Equal && inclusive {
                return Some(id);
            }
            if ordering == wanted {
                best = Some(id);
                current = self.arena[id].child(toward.opposite());
            } else {
                current = self.arena[id].child(toward);
            }
        }
        best
    }

    /// Inserts a key.
    ///
    /// The new key is linked as a red leaf and the tree is recolored and
    /// rotated back into balance.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if an equal key is already
    /// present. The tree is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::{RedBlackTree, TreeError};
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.insert("b"), Ok(()));
    /// assert_eq!(tree.insert("a"), Ok(()));
    /// assert_eq!(tree.insert("b"), Err(TreeError::DuplicateKey));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, key: K) -> Result<(), TreeError> {
        let (parent, side) = match self.locate(&key) {
            Probe::Found(_) => return Err(TreeError::DuplicateKey),
            Probe::Vacant { parent, side } => (parent, side),
        };

        let node = self.arena.allocate(key, parent);
        match parent {
            None => self.root = Some(node),
            Some(parent) => self.arena[parent].set_child(side, Some(node)),
        }
        self.length += 1;
        self.rebalance_after_insert(node);
        Ok(())
    }

    /// Inserts every key of `keys`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::DuplicateKey`] if `keys` repeats a key or holds a
    /// key already in the tree. Nothing is inserted in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::{RedBlackTree, TreeError};
    ///
    /// let mut tree = RedBlackTree::try_from_iter([1, 2]).unwrap();
    /// assert_eq!(tree.insert_all([5, 2, 7]), Err(TreeError::DuplicateKey));
    /// assert_eq!(tree.len(), 2);
    ///
    /// tree.insert_all([5, 7]).unwrap();
    /// assert_eq!(tree.len(), 4);
    /// ```
    pub fn insert_all<I: IntoIterator<Item = K>>(&mut self, keys: I) -> Result<(), TreeError> {
        let keys: Vec<K> = keys.into_iter().collect();
        {
            let mut probe: Vec<&K> = keys.iter().collect();
            probe.sort_unstable();
            let repeated = probe.windows(2).any(|pair| pair[0] == pair[1]);
            if repeated || probe.iter().any(|key| self.contains(*key)) {
                return Err(TreeError::DuplicateKey);
            }
        }
        for key in keys {
            self.insert(key)?;
        }
        Ok(())
    }

    /// Removes a key and returns it.
    ///
    /// A node with two children first trades keys with its in-order
    /// predecessor, so the node actually unlinked has at most one child.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if the key is absent. The tree is
    /// left unchanged.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::{RedBlackTree, TreeError};
    ///
    /// let mut tree = RedBlackTree::try_from_iter([1, 2, 3]).unwrap();
    /// assert_eq!(tree.remove(&2), Ok(2));
    /// assert_eq!(tree.remove(&2), Err(TreeError::KeyNotFound));
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[doc(alias = "delete")]
    pub fn remove<Q>(&mut self, key: &Q) -> Result<K, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Probe::Found(mut target) = self.locate(key) else {
            return Err(TreeError::KeyNotFound);
        };

        let left = self.arena[target].child(Direction::Left);
        let right = self.arena[target].child(Direction::Right);
        if let (Some(left), Some(_)) = (left, right) {
            let predecessor = self.extreme(left, Direction::Right);
            self.arena.swap_keys(target, predecessor);
            target = predecessor;
        }

        let child = self.arena[target]
            .child(Direction::Left)
            .or_else(|| self.arena[target].child(Direction::Right));
        if self.arena[target].is_red() || child.is_some() {
            self.replace_in_parent(target, child);
            if let Some(child) = child {
                self.set_color(child, Color::Black);
            }
        } else {
            self.rebalance_before_unlink(target);
            self.replace_in_parent(target, None);
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
        self.length -= 1;
        Ok(self.arena.release(target))
    }

    /// Returns `true` if the tree holds `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::RedBlackTree;
    ///
    /// let tree = RedBlackTree::try_from_iter(["x".to_string()]).unwrap();
    /// assert!(tree.contains("x"));
    /// assert!(!tree.contains("y"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        matches!(self.locate(key), Probe::Found(_))
    }

    /// Returns the largest key less than or equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoMatch`] if every key is greater than `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::{RedBlackTree, TreeError};
    ///
    /// let tree = RedBlackTree::try_from_iter([10, 20, 30]).unwrap();
    /// assert_eq!(tree.find_predecessor_or_equal(&25), Ok(&20));
    /// assert_eq!(tree.find_predecessor_or_equal(&20), Ok(&20));
    /// assert_eq!(tree.find_predecessor_or_equal(&5), Err(TreeError::NoMatch));
    /// ```
    #[doc(alias = "floor")]
    pub fn find_predecessor_or_equal<Q>(&self, key: &Q) -> Result<&K, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bound_search(key, Direction::Left, true)
            .map(|id| self.key(id))
            .ok_or(TreeError::NoMatch)
    }

    /// Returns the smallest key greater than or equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoMatch`] if every key is less than `key`.
    #[doc(alias = "ceiling")]
    pub fn find_successor_or_equal<Q>(&self, key: &Q) -> Result<&K, TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bound_search(key, Direction::Right, true)
            .map(|id| self.key(id))
            .ok_or(TreeError::NoMatch)
    }

    /// Returns a lazy iterator starting near `start` and running in `order`.
    ///
    /// Ascending iteration starts at the successor-or-equal of `start`;
    /// descending iteration starts at its predecessor-or-equal. Keys are
    /// yielded while they come strictly before `stop` in the iteration
    /// direction; `None` runs to the end of the tree.
    ///
    /// # Complexity
    ///
    /// O(log N) to position, then amortized O(1) per key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::{Order, RedBlackTree};
    ///
    /// let tree = RedBlackTree::try_from_iter([1, 3, 5, 7, 9]).unwrap();
    ///
    /// let up: Vec<i32> = tree.range(&2, Some(&7), Order::Ascending).copied().collect();
    /// assert_eq!(up, vec![3, 5]);
    ///
    /// let down: Vec<i32> = tree.range(&8, None, Order::Descending).copied().collect();
    /// assert_eq!(down, vec![7, 5, 3, 1]);
    /// ```
    pub fn range<Q>(&self, start: &Q, stop: Option<&Q>, order: Order) -> Range<'_, K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let forward = order.forward();
        let front = self.bound_search(start, forward, true);
        let back = match stop {
            Some(stop) => self.bound_search(stop, forward.opposite(), false),
            None => self.extreme_node(forward),
        };
        Range::new(self, front, back, order)
    }

    /// Returns an ascending iterator over the keys inside `bounds`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::RedBlackTree;
    ///
    /// let tree = RedBlackTree::try_from_iter(1..=9).unwrap();
    /// let inside: Vec<i32> = tree.range_bounds(3..=5).copied().collect();
    /// assert_eq!(inside, vec![3, 4, 5]);
    ///
    /// let tail: Vec<i32> = tree.range_bounds(7..).rev().copied().collect();
    /// assert_eq!(tail, vec![9, 8, 7]);
    /// ```
    pub fn range_bounds<Q, R>(&self, bounds: R) -> Range<'_, K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
    {
        let front = match bounds.start_bound() {
            Bound::Included(start) => self.bound_search(start, Direction::Right, true),
            Bound::Excluded(start) => self.bound_search(start, Direction::Right, false),
            Bound::Unbounded => self.extreme_node(Direction::Left),
        };
        let back = match bounds.end_bound() {
            Bound::Included(end) => self.bound_search(end, Direction::Left, true),
            Bound::Excluded(end) => self.bound_search(end, Direction::Left, false),
            Bound::Unbounded => self.extreme_node(Direction::Right),
        };
        Range::new(self, front, back, Order::Ascending)
    }

    /// Checks every red-black and search-tree invariant.
    ///
    /// Returns the black height of the tree: the number of black nodes on
    /// any path from the root down to a null leaf, counting the root. An
    /// empty tree has black height 0.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found. A correct tree never
    /// produces one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::ordered::RedBlackTree;
    ///
    /// let tree = RedBlackTree::try_from_iter(0..100).unwrap();
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        let (black_height, reachable) = match self.root {
            None => (0, 0),
            Some(root) => {
                if self.arena[root].is_red() {
                    return Err(InvariantViolation::RedRoot);
                }
                if self.arena[root].parent.is_some() {
                    return Err(InvariantViolation::BrokenParentLink);
                }
                self.validate_subtree(root)?
            }
        };

        if reachable != self.length {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.length,
                reachable,
            });
        }

        let ascending = self
            .iter()
            .zip(self.iter().skip(1))
            .all(|(previous, next)| previous < next);
        if !ascending {
            return Err(InvariantViolation::OutOfOrder);
        }

        Ok(black_height)
    }

    /// Returns `(black height, node count)` of the subtree rooted at `id`.
    fn validate_subtree(&self, id: NodeId) -> Result<(usize, usize), InvariantViolation> {
        let node = &self.arena[id];
        let mut heights = [0; 2];
        let mut count = 1;

        for (slot, direction) in [Direction::Left, Direction::Right].into_iter().enumerate() {
            let Some(child) = node.child(direction) else {
                continue;
            };
            if self.arena[child].parent != Some(id) {
                return Err(InvariantViolation::BrokenParentLink);
            }
            if node.is_red() && self.arena[child].is_red() {
                return Err(InvariantViolation::RedChildOfRed);
            }
            let (height, nodes) = self.validate_subtree(child)?;
            heights[slot] = height;
            count += nodes;
        }

        if heights[0] != heights[1] {
            return Err(InvariantViolation::BlackHeightMismatch {
                left: heights[0],
                right: heights[1],
            });
        }
        Ok((heights[0] + usize::from(!node.is_red()), count))
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K> Default for RedBlackTree<K> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> TryFrom<Vec<K>> for RedBlackTree<K> {
    type Error = TreeError;

    fn try_from(keys: Vec<K>) -> Result<Self, Self::Error> {
        Self::try_from_iter(keys)
    }
}

impl<'a, K> IntoIterator for &'a RedBlackTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> IntoIterator for RedBlackTree<K> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(mut self) -> Self::IntoIter {
        let order: Vec<NodeId> = {
            let mut order = Vec::with_capacity(self.length);
            let mut cursor = self.extreme_node(Direction::Left);
            while let Some(id) = cursor {
                order.push(id);
                cursor = self.step(id, Direction::Right);
            }
            order
        };
        let keys: Vec<K> = order.into_iter().map(|id| self.arena.release(id)).collect();
        IntoIter::new(keys)
    }
}

/// Trees are equal when they hold the same keys.
impl<K: PartialEq> PartialEq for RedBlackTree<K> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for RedBlackTree<K> {}

/// Trees compare lexicographically by their ascending key sequences.
impl<K: PartialOrd> PartialOrd for RedBlackTree<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord> Ord for RedBlackTree<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: Hash> Hash for RedBlackTree<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for key in self {
            key.hash(state);
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for RedBlackTree<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display> fmt::Display for RedBlackTree<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (position, key) in self.iter().enumerate() {
            if position > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(RedBlackTree<i32>: Send, Sync, Clone);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize> serde::Serialize for RedBlackTree<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct RedBlackTreeVisitor<K> {
    marker: std::marker::PhantomData<K>,
}

#[cfg(feature = "serde")]
impl<'de, K> serde::de::Visitor<'de> for RedBlackTreeVisitor<K>
where
    K: serde::Deserialize<'de> + Ord,
{
    type Value = RedBlackTree<K>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of distinct keys")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut tree = RedBlackTree::new();
        while let Some(key) = access.next_element()? {
            tree.insert(key).map_err(serde::de::Error::custom)?;
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, K> serde::Deserialize<'de> for RedBlackTree<K>
where
    K: serde::Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(RedBlackTreeVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tree_of(keys: &[i32]) -> RedBlackTree<i32> {
        RedBlackTree::try_from_iter(keys.iter().copied()).unwrap()
    }

    // =========================================================================
    // Insert Cases
    // =========================================================================

    #[rstest]
    fn test_first_insert_paints_root_black() {
        let tree = tree_of(&[1]);
        let root = tree.root.unwrap();
        assert_eq!(tree.arena[root].color, Color::Black);
        assert_eq!(tree.validate(), Ok(1));
    }

    #[rstest]
    fn test_red_uncle_recolors_without_rotation() {
        let mut tree = tree_of(&[2, 1, 3]);
        let root = tree.root.unwrap();
        tree.insert(4).unwrap();

        assert_eq!(tree.root, Some(root));
        let left = tree.arena[root].child(Direction::Left).unwrap();
        let right = tree.arena[root].child(Direction::Right).unwrap();
        assert_eq!(tree.arena[left].color, Color::Black);
        assert_eq!(tree.arena[right].color, Color::Black);
        assert_eq!(tree.validate(), Ok(2));
    }

    #[rstest]
    #[case(&[1, 2, 3], 2)]
    #[case(&[3, 2, 1], 2)]
    #[case(&[1, 3, 2], 2)]
    #[case(&[3, 1, 2], 2)]
    fn test_outer_and_inner_shapes_rotate_to_middle_key(
        #[case] keys: &[i32],
        #[case] expected_root: i32,
    ) {
        let tree = tree_of(keys);
        assert_eq!(*tree.key(tree.root.unwrap()), expected_root);
        assert_eq!(tree.validate(), Ok(1));
    }

    #[rstest]
    fn test_duplicate_insert_leaves_tree_untouched() {
        let mut tree = tree_of(&[5, 3, 8]);
        let before = tree.clone();
        assert_eq!(tree.insert(3), Err(TreeError::DuplicateKey));
        assert_eq!(tree, before);
        assert_eq!(tree.len(), 3);
    }

    // =========================================================================
    // Removal Cases
    // =========================================================================

    #[rstest]
    fn test_remove_red_leaf() {
        let mut tree = tree_of(&[2, 1, 3, 4]);
        assert_eq!(tree.remove(&4), Ok(4));
        assert!(tree.validate().is_ok());
    }

    #[rstest]
    fn test_remove_black_node_with_red_child() {
        let mut tree = tree_of(&[2, 1, 3, 4]);
        assert_eq!(tree.remove(&3), Ok(3));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert!(tree.validate().is_ok());
    }

    #[rstest]
    fn test_remove_node_with_two_children_uses_predecessor() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(tree.remove(&5), Ok(5));
        assert_eq!(*tree.key(tree.root.unwrap()), 4);
        assert!(tree.validate().is_ok());
    }

    #[rstest]
    fn test_remove_black_leaf_runs_fixup() {
        let mut tree = tree_of(&(1..=15).collect::<Vec<_>>());
        for key in [1, 3, 5, 7, 9, 11, 13, 15] {
            assert_eq!(tree.remove(&key), Ok(key));
            assert!(tree.validate().is_ok(), "broken after removing {key}");
        }
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![2, 4, 6, 8, 10, 12, 14]);
    }

    #[rstest]
    fn test_remove_last_key_empties_tree() {
        let mut tree = tree_of(&[1]);
        assert_eq!(tree.remove(&1), Ok(1));
        assert!(tree.is_empty());
        assert_eq!(tree.root, None);
        assert_eq!(tree.validate(), Ok(0));
    }

    #[rstest]
    fn test_remove_reuses_arena_slots() {
        let mut tree = tree_of(&[1, 2, 3]);
        tree.remove(&2).unwrap();
        tree.insert(10).unwrap();
        assert_eq!(tree.arena.capacity(), 3);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[rstest]
    fn test_validate_detects_red_root() {
        let mut tree = tree_of(&[1, 2, 3]);
        let root = tree.root.unwrap();
        tree.set_color(root, Color::Red);
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRoot));
    }

    #[rstest]
    fn test_validate_detects_black_height_mismatch() {
        let mut tree = tree_of(&[2, 1, 3]);
        let root = tree.root.unwrap();
        let left = tree.arena[root].child(Direction::Left).unwrap();
        tree.set_color(left, Color::Black);
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::BlackHeightMismatch { left: 1, right: 0 })
        );
    }

    #[rstest]
    fn test_validate_detects_red_child_of_red() {
        let mut tree = tree_of(&[2, 1, 3, 4]);
        let root = tree.root.unwrap();
        let right = tree.arena[root].child(Direction::Right).unwrap();
        let left = tree.arena[root].child(Direction::Left).unwrap();
        tree.set_color(right, Color::Red);
        tree.set_color(left, Color::Red);
        assert_eq!(tree.validate(), Err(InvariantViolation::RedChildOfRed));
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_tree() {
        let tree: RedBlackTree<i32> = RedBlackTree::new();
        assert_eq!(format!("{tree}"), "{}");
    }

    #[rstest]
    fn test_display_sorted_keys() {
        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(format!("{tree}"), "{1, 2, 3}");
        assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
    }
}
