//! Generic segment tree with lazy propagation.
//!
//! [`LazySegmentTree`] answers range aggregate queries and applies range
//! updates in O(log N) for any [`LazyAggregate`] strategy.
//!
//! # Internal Structure
//!
//! Aggregates live in an implicit heap array (see the layout module). Every
//! internal node has a pending slot holding an update that is already folded
//! into the node's own aggregate but not yet into its children.
//!
//! Queries never mutate: they read the relevant nodes and apply the pending
//! updates of the ancestors on the way up. Updates push pending entries down
//! along the paths they cut through before touching the children, so the
//! pending entries on any root-to-leaf path are always ordered oldest at the
//! bottom and newest at the top. Non-commutative updates such as assignment
//! rely on this ordering.

use std::fmt;

use tracing::trace;

use super::layout::{Layout, is_left_child, left_child, parent, right_child};
use super::strategy::{LazyAggregate, Sum};

/// A segment tree with lazy range updates over a pluggable strategy.
///
/// # Time Complexity
///
/// | Operation        | Complexity |
/// |------------------|------------|
/// | construction     | O(N)       |
/// | `query_point`    | O(log N)   |
/// | `query_range`    | O(log N)   |
/// | `update_point`   | O(log N)   |
/// | `update_range`   | O(log N)   |
/// | `replace`        | O(log N)   |
///
/// # Panics
///
/// Every method taking an index or an inclusive range panics if it falls
/// outside `0..len()`, like slice indexing.
///
/// # Examples
///
/// ```rust
/// use sylva::segment::{LazySegmentTree, Max};
///
/// let mut tree = LazySegmentTree::new(Max::new(), vec![2, 5, 1, 4, 3]);
/// assert_eq!(tree.query_range(0, 4), 5);
///
/// tree.update_range(0, 2, 10);
/// assert_eq!(tree.query_range(0, 4), 15);
/// assert_eq!(tree.query_point(4), 3);
/// ```
#[derive(Clone)]
pub struct LazySegmentTree<S: LazyAggregate = Sum<i64>> {
    strategy: S,
    layout: Layout,
    values: Vec<S::Value>,
    pending: Vec<Option<S::Update>>,
}

impl<S: LazyAggregate> LazySegmentTree<S> {
    /// Builds a tree over `values`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::segment::{LazySegmentTree, Sum};
    ///
    /// let tree = LazySegmentTree::new(Sum::new(), [1, 2, 3]);
    /// assert_eq!(tree.len(), 3);
    /// assert_eq!(tree.query_all(), 6);
    /// ```
    pub fn new<I>(strategy: S, values: I) -> Self
    where
        I: IntoIterator<Item = S::Value>,
    {
        let leaves: Vec<S::Value> = values.into_iter().collect();
        let layout = Layout::new(leaves.len());

        let mut nodes = Vec::with_capacity(layout.node_count());
        nodes.resize(layout.internal_count(), strategy.identity());
        nodes.extend(leaves);
        nodes.resize(layout.node_count(), strategy.identity());
        for node in (0..layout.internal_count()).rev() {
            nodes[node] = strategy.merge(&nodes[left_child(node)], &nodes[right_child(node)]);
        }

        Self {
            strategy,
            layout,
            values: nodes,
            pending: vec![None; layout.internal_count()],
        }
    }

    /// Builds a tree of `len` copies of `value`.
    pub fn filled(strategy: S, len: usize, value: S::Value) -> Self {
        Self::new(strategy, std::iter::repeat_n(value, len))
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.layout.len()
    }

    /// Returns `true` if the tree holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.layout.len() == 0
    }

    /// Returns the strategy this tree aggregates with.
    #[inline]
    #[must_use]
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Applies the pending update of `node`, if any, to a value standing for
    /// `count` elements of its segment.
    fn resolve(&self, node: usize, value: S::Value, count: usize) -> S::Value {
        match &self.pending[node] {
            Some(update) => self.strategy.apply_update(&value, update, count),
            None => value,
        }
    }

    /// Walks from `node` to the root applying every ancestor's pending update.
    fn resolve_ancestors(&self, mut node: usize, mut value: S::Value, count: usize) -> S::Value {
        while node > 0 {
            node = parent(node);
            value = self.resolve(node, value, count);
        }
        value
    }

    /// Returns the current value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[track_caller]
    pub fn query_point(&self, index: usize) -> S::Value {
        self.layout.check_index(index);
        let leaf = self.layout.leaf(index);
        self.resolve_ancestors(leaf, self.values[leaf].clone(), 1)
    }

    /// Returns the aggregate of the inclusive range `lo..=hi`.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi` or `hi >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::segment::{LazySegmentTree, Sum};
    ///
    /// let tree = LazySegmentTree::new(Sum::new(), vec![1, 2, 3, 4, 5]);
    /// assert_eq!(tree.query_range(1, 3), 9);
    /// assert_eq!(tree.query_range(2, 2), 3);
    /// ```
    #[track_caller]
    pub fn query_range(&self, lo: usize, hi: usize) -> S::Value {
        self.layout.check_range(lo, hi);
        if lo == hi {
            return self.query_point(lo);
        }

        let mut start = self.layout.leaf(lo);
        let mut end = self.layout.leaf(hi);
        let mut start_value = self.values[start].clone();
        let mut end_value = self.values[end].clone();
        let mut start_count = 1;
        let mut end_count = 1;
        let mut width = 1;

        while parent(start) != parent(end) {
            if is_left_child(start) {
                start_value = self.strategy.merge(&start_value, &self.values[start + 1]);
                start_count += width;
            }
            if !is_left_child(end) {
                end_value = self.strategy.merge(&self.values[end - 1], &end_value);
                end_count += width;
            }
            start = parent(start);
            end = parent(end);
            width *= 2;
            start_value = self.resolve(start, start_value, start_count);
            end_value = self.resolve(end, end_value, end_count);
        }

        let meeting = parent(start);
        let count = start_count + end_count;
        let value = self.resolve(meeting, self.strategy.merge(&start_value, &end_value), count);
        self.resolve_ancestors(meeting, value, count)
    }

    /// Returns the aggregate of `0..=index`.
    #[track_caller]
    pub fn query_prefix(&self, index: usize) -> S::Value {
        self.query_range(0, index)
    }

    /// Returns the aggregate of `index..len()`.
    #[track_caller]
    pub fn query_suffix(&self, index: usize) -> S::Value {
        self.layout.check_index(index);
        self.query_range(index, self.len() - 1)
    }

    /// Returns the aggregate of every element, or the identity when empty.
    pub fn query_all(&self) -> S::Value {
        if self.is_empty() {
            self.strategy.identity()
        } else {
            self.values[0].clone()
        }
    }

    /// Returns every current value in order.
    pub fn to_vec(&self) -> Vec<S::Value> {
        (0..self.len()).map(|index| self.query_point(index)).collect()
    }

    // -------------------------------------------------------------------------
    // Updates
    // -------------------------------------------------------------------------

    /// Applies `update` to a node whose whole segment is covered, recording
    /// it as pending if the node has children.
    fn apply_to_node(&mut self, node: usize, update: &S::Update) {
        let count = self.layout.width(node);
        self.values[node] = self.strategy.apply_update(&self.values[node], update, count);
        if self.layout.is_internal(node) {
            let folded = match self.pending[node].take() {
                Some(pending) => self.strategy.merge_updates(&pending, update),
                None => update.clone(),
            };
            self.pending[node] = Some(folded);
        }
    }

    /// Moves the pending update of `node` into its children.
    fn push_down(&mut self, node: usize) {
        if let Some(update) = self.pending[node].take() {
            trace!(node, "push pending update to children");
            self.apply_to_node(left_child(node), &update);
            self.apply_to_node(right_child(node), &update);
        }
    }

    /// Pushes pending updates down every ancestor of `leaf`, root first.
    fn push_path(&mut self, leaf: usize) {
        for generations in (1..=self.layout.levels()).rev() {
            self.push_down(Layout::ancestor(leaf, generations));
        }
    }

    /// Recombines every ancestor of `leaf` from its children.
    fn rebuild_path(&mut self, mut node: usize) {
        while node > 0 {
            node = parent(node);
            self.values[node] = self
                .strategy
                .merge(&self.values[left_child(node)], &self.values[right_child(node)]);
        }
    }

    /// Applies `update` to the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[track_caller]
    pub fn update_point(&mut self, index: usize, update: S::Update) {
        self.layout.check_index(index);
        let leaf = self.layout.leaf(index);
        self.push_path(leaf);
        self.values[leaf] = self.strategy.apply_update(&self.values[leaf], &update, 1);
        self.rebuild_path(leaf);
    }

    /// Overwrites the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::segment::{LazySegmentTree, Min};
    ///
    /// let mut tree = LazySegmentTree::new(Min::new(), vec![4, 2, 6]);
    /// tree.update_range(0, 2, 1);
    /// tree.replace(1, 10);
    /// assert_eq!(tree.to_vec(), vec![5, 10, 7]);
    /// assert_eq!(tree.query_all(), 5);
    /// ```
    #[track_caller]
    pub fn replace(&mut self, index: usize, value: S::Value) {
        self.layout.check_index(index);
        let leaf = self.layout.leaf(index);
        self.push_path(leaf);
        self.values[leaf] = value;
        self.rebuild_path(leaf);
    }

    /// Applies `update` to every element of the inclusive range `lo..=hi`.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi` or `hi >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::segment::{LazySegmentTree, Sum};
    ///
    /// let mut tree = LazySegmentTree::new(Sum::new(), vec![0; 6]);
    /// tree.update_range(1, 4, 2);
    /// tree.update_range(3, 5, 1);
    /// assert_eq!(tree.to_vec(), vec![0, 2, 2, 3, 3, 1]);
    /// ```
    #[track_caller]
    pub fn update_range(&mut self, lo: usize, hi: usize, update: S::Update) {
        self.layout.check_range(lo, hi);
        trace!(lo, hi, "lazy range update");
        self.update_segment(0, 0, self.layout.capacity() - 1, lo, hi, &update);
    }

    fn update_segment(
        &mut self,
        node: usize,
        segment_start: usize,
        segment_end: usize,
        lo: usize,
        hi: usize,
        update: &S::Update,
    ) {
        if hi < segment_start || segment_end < lo {
            return;
        }
        if lo <= segment_start && segment_end <= hi {
            self.apply_to_node(node, update);
            return;
        }

        self.push_down(node);
        let middle = segment_start + (segment_end - segment_start) / 2;
        self.update_segment(left_child(node), segment_start, middle, lo, hi, update);
        self.update_segment(right_child(node), middle + 1, segment_end, lo, hi, update);
        self.values[node] = self
            .strategy
            .merge(&self.values[left_child(node)], &self.values[right_child(node)]);
    }

    /// Applies `update` to `0..=index`.
    #[track_caller]
    pub fn update_prefix(&mut self, index: usize, update: S::Update) {
        self.update_range(0, index, update);
    }

    /// Applies `update` to `index..len()`.
    #[track_caller]
    pub fn update_suffix(&mut self, index: usize, update: S::Update) {
        self.layout.check_index(index);
        let last = self.len() - 1;
        self.update_range(index, last, update);
    }
}

impl<S> FromIterator<S::Value> for LazySegmentTree<S>
where
    S: LazyAggregate + Default,
{
    fn from_iter<I: IntoIterator<Item = S::Value>>(iter: I) -> Self {
        Self::new(S::default(), iter)
    }
}

impl<S> fmt::Debug for LazySegmentTree<S>
where
    S: LazyAggregate,
    S::Value: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.to_vec()).finish()
    }
}
