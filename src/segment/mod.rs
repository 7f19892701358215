//! Range aggregation over a fixed-length sequence.
//!
//! This module provides two segment trees:
//!
//! - [`LazySegmentTree`]: the general tree, parameterized by a
//!   [`LazyAggregate`] strategy. [`Sum`], [`Max`], [`Min`] and [`AssignSum`]
//!   cover the common cases; implement the trait for anything else.
//! - [`MaxAddTree`]: a dense tree hard-wired to range maximum with range add.
//!
//! Both trees have a fixed topology: the element count is set at
//! construction and never changes.
//!
//! # Examples
//!
//! ```rust
//! use sylva::segment::{LazySegmentTree, Sum};
//!
//! let mut tree: LazySegmentTree<Sum<i64>> = (1..=10).collect();
//! assert_eq!(tree.query_range(0, 9), 55);
//!
//! tree.update_range(0, 4, -1);
//! assert_eq!(tree.query_prefix(4), 10);
//! assert_eq!(tree.query_suffix(5), 40);
//! ```

mod dense;
mod layout;
mod lazy;
mod numeric;
mod strategy;

pub use dense::MaxAddTree;
pub use lazy::LazySegmentTree;
pub use numeric::Numeric;
pub use strategy::{AssignSum, LazyAggregate, Max, Min, Sum};
