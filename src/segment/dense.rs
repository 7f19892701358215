//! Dense range-maximum tree with additive range updates.
//!
//! [`MaxAddTree`] fixes the aggregation to `max` and the update to `+`, which
//! lets every operation run as a bottom-up loop over two flat arrays with no
//! recursion and no optional pending slots.

use std::fmt;

use tracing::trace;

use super::layout::{Layout, is_left_child, left_child, parent, right_child};
use super::numeric::Numeric;

/// Range maximum with range add, specialized for primitive numbers.
///
/// Each internal node stores `max(children) + pending`, where `pending` is
/// the total added to its whole segment since its children were last
/// touched. Pending additions are never pushed down; reads add up the
/// pending values of the ancestors instead.
///
/// # Panics
///
/// Methods taking an index or inclusive range panic if it falls outside
/// `0..len()`.
///
/// # Examples
///
/// ```rust
/// use sylva::segment::MaxAddTree;
///
/// let mut tree = MaxAddTree::new(vec![2, 5, 1, 4, 3]);
/// assert_eq!(tree.query_range(0, 4), 5);
///
/// tree.update_range(0, 2, 10);
/// assert_eq!(tree.query_range(0, 4), 15);
/// assert_eq!(tree.query_point(4), 3);
/// ```
#[derive(Clone)]
pub struct MaxAddTree<T> {
    layout: Layout,
    values: Vec<T>,
    pending: Vec<T>,
}

impl<T: Numeric> MaxAddTree<T> {
    /// Builds a tree over `values`. Padding leaves hold `T::LOWEST`.
    pub fn new<I: IntoIterator<Item = T>>(values: I) -> Self {
        let leaves: Vec<T> = values.into_iter().collect();
        let layout = Layout::new(leaves.len());

        let mut nodes = Vec::with_capacity(layout.node_count());
        nodes.resize(layout.internal_count(), T::LOWEST);
        nodes.extend(leaves);
        nodes.resize(layout.node_count(), T::LOWEST);
        for node in (0..layout.internal_count()).rev() {
            nodes[node] = nodes[left_child(node)].max_of(nodes[right_child(node)]);
        }

        Self {
            layout,
            values: nodes,
            pending: vec![T::ZERO; layout.internal_count()],
        }
    }

    /// Builds a tree of `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self::new(std::iter::repeat_n(value, len))
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

    #[inline]
    fn pending_at(&self, node: usize) -> T {
        self.pending[node]
    }

    /// Adds `delta` to the aggregate of `node` and to everything beneath it.
    #[inline]
    fn add_to_node(&mut self, node: usize, delta: T) {
        self.values[node] = self.values[node] + delta;
        if self.layout.is_internal(node) {
            self.pending[node] = self.pending[node] + delta;
        }
    }

    #[inline]
    fn recompute(&mut self, node: usize) {
        let children = self.values[left_child(node)].max_of(self.values[right_child(node)]);
        self.values[node] = children + self.pending_at(node);
    }

    /// Returns the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[track_caller]
    pub fn query_point(&self, index: usize) -> T {
        self.layout.check_index(index);
        let mut node = self.layout.leaf(index);
        let mut value = self.values[node];
        while node > 0 {
            node = parent(node);
            value = value + self.pending_at(node);
        }
        value
    }

    /// Returns the maximum of the inclusive range `lo..=hi`.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi` or `hi >= len()`.
    #[track_caller]
    pub fn query_range(&self, lo: usize, hi: usize) -> T {
        self.layout.check_range(lo, hi);
        if lo == hi {
            return self.query_point(lo);
        }

        let mut start = self.layout.leaf(lo);
        let mut end = self.layout.leaf(hi);
        let mut start_value = self.values[start];
        let mut end_value = self.values[end];

        while parent(start) != parent(end) {
            if is_left_child(start) {
                start_value = start_value.max_of(self.values[start + 1]);
            }
            if !is_left_child(end) {
                end_value = end_value.max_of(self.values[end - 1]);
            }
            start = parent(start);
            end = parent(end);
            start_value = start_value + self.pending_at(start);
            end_value = end_value + self.pending_at(end);
        }

        let mut node = parent(start);
        let mut value = start_value.max_of(end_value) + self.pending_at(node);
        while node > 0 {
            node = parent(node);
            value = value + self.pending_at(node);
        }
        value
    }

    /// Returns the maximum of `0..=index`.
    #[doc(alias = "query_left")]
    #[track_caller]
    pub fn query_prefix(&self, index: usize) -> T {
        self.query_range(0, index)
    }

    /// Returns the maximum of `index..len()`.
    #[doc(alias = "query_right")]
    #[track_caller]
    pub fn query_suffix(&self, index: usize) -> T {
        self.layout.check_index(index);
        self.query_range(index, self.len() - 1)
    }

    /// Returns the maximum of every element, or `T::LOWEST` when empty.
    pub fn query_all(&self) -> T {
        self.values[0]
    }

    /// Returns every current value in order.
    pub fn to_vec(&self) -> Vec<T> {
        (0..self.len()).map(|index| self.query_point(index)).collect()
    }

    /// Adds `delta` to the element at `index`.
    ///
    /// Recombination stops at the first ancestor whose aggregate does not
    /// change.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[track_caller]
    pub fn update_point(&mut self, index: usize, delta: T) {
        self.layout.check_index(index);
        let mut node = self.layout.leaf(index);
        self.values[node] = self.values[node] + delta;
        while node > 0 {
            node = parent(node);
            let previous = self.values[node];
            self.recompute(node);
            if self.values[node] == previous {
                break;
            }
        }
    }

    /// Adds `delta` to every element of the inclusive range `lo..=hi`.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi` or `hi >= len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sylva::segment::MaxAddTree;
    ///
    /// let mut tree = MaxAddTree::filled(6, 0);
    /// tree.update_range(1, 4, 3);
    /// tree.update_range(4, 5, -1);
    /// assert_eq!(tree.to_vec(), vec![0, 3, 3, 3, 2, -1]);
    /// assert_eq!(tree.query_range(4, 5), 2);
    /// ```
    #[track_caller]
    pub fn update_range(&mut self, lo: usize, hi: usize, delta: T) {
        self.layout.check_range(lo, hi);
        trace!(lo, hi, ?delta, "max-add range update");

        let mut start = self.layout.leaf(lo);
        let mut end = self.layout.leaf(hi);
        self.add_to_node(start, delta);
        if start != end {
            self.add_to_node(end, delta);
            while parent(start) != parent(end) {
                if is_left_child(start) {
                    self.add_to_node(start + 1, delta);
                }
                if !is_left_child(end) {
                    self.add_to_node(end - 1, delta);
                }
                start = parent(start);
                end = parent(end);
                self.recompute(start);
                self.recompute(end);
            }
        }

        let mut node = start;
        while node > 0 {
            node = parent(node);
            self.recompute(node);
        }
    }

    /// Adds `delta` to `0..=index`.
    #[doc(alias = "update_left")]
    #[track_caller]
    pub fn update_prefix(&mut self, index: usize, delta: T) {
        self.update_range(0, index, delta);
    }

    /// Adds `delta` to `index..len()`.
    #[doc(alias = "update_right")]
    #[track_caller]
    pub fn update_suffix(&mut self, index: usize, delta: T) {
        self.layout.check_index(index);
        let last = self.len() - 1;
        self.update_range(index, last, delta);
    }
}

impl<T: Numeric> FromIterator<T> for MaxAddTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T: Numeric> fmt::Debug for MaxAddTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.to_vec()).finish()
    }
}
