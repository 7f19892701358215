//! Implicit heap layout shared by both segment trees.
//!
//! The tree is stored as a complete binary tree in one array: node `0` is the
//! root, node `i` has children `2i + 1` and `2i + 2`. The leaf level has
//! `capacity` slots (the element count rounded up to a power of two) starting
//! at index `capacity - 1`. Slots past the logical length are padding.

/// Shape of a segment tree holding `len` elements.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Layout {
    len: usize,
    capacity: usize,
}

impl Layout {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            len,
            capacity: len.max(1).next_power_of_two(),
        }
    }

    #[inline]
    pub(crate) const fn len(self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) const fn capacity(self) -> usize {
        self.capacity
    }

    /// Total number of nodes, leaves included.
    #[inline]
    pub(crate) const fn node_count(self) -> usize {
        2 * self.capacity - 1
    }

    /// Number of internal nodes; only these carry pending updates.
    #[inline]
    pub(crate) const fn internal_count(self) -> usize {
        self.capacity - 1
    }

    #[inline]
    pub(crate) const fn leaf(self, index: usize) -> usize {
        self.capacity - 1 + index
    }

    #[inline]
    pub(crate) const fn is_internal(self, node: usize) -> bool {
        node < self.capacity - 1
    }

    /// Number of leaf slots under `node`.
    #[inline]
    pub(crate) const fn width(self, node: usize) -> usize {
        self.capacity >> (node + 1).ilog2()
    }

    /// Depth of the leaf level.
    #[inline]
    pub(crate) const fn levels(self) -> u32 {
        self.capacity.trailing_zeros()
    }

    /// Ancestor of `node` that is `generations` levels above it.
    #[inline]
    pub(crate) const fn ancestor(node: usize, generations: u32) -> usize {
        ((node + 1) >> generations) - 1
    }

    #[track_caller]
    pub(crate) fn check_index(self, index: usize) {
        assert!(
            index < self.len,
            "index out of bounds: the len is {} but the index is {index}",
            self.len
        );
    }

    #[track_caller]
    pub(crate) fn check_range(self, lo: usize, hi: usize) {
        assert!(lo <= hi, "range start {lo} is greater than range end {hi}");
        self.check_index(hi);
    }
}

#[inline]
pub(crate) const fn parent(node: usize) -> usize {
    (node - 1) / 2
}

#[inline]
pub(crate) const fn left_child(node: usize) -> usize {
    2 * node + 1
}

#[inline]
pub(crate) const fn right_child(node: usize) -> usize {
    2 * node + 2
}

#[inline]
pub(crate) const fn is_left_child(node: usize) -> bool {
    node % 2 == 1
}
