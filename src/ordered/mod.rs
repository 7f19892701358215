//! Ordered key storage.
//!
//! This module provides [`RedBlackTree`], a self-balancing binary search
//! tree over unique keys, along with its iterators and error types.
//!
//! # Examples
//!
//! ```rust
//! use sylva::ordered::{Order, RedBlackTree};
//!
//! let mut tree = RedBlackTree::new();
//! for key in [50, 20, 80, 10, 30] {
//!     tree.insert(key).unwrap();
//! }
//!
//! assert_eq!(RedBlackTree::min(&tree), Ok(&10));
//! assert_eq!(RedBlackTree::max(&tree), Ok(&80));
//!
//! let below_fifty: Vec<i32> = tree.range(&49, None, Order::Descending).copied().collect();
//! assert_eq!(below_fifty, vec![30, 20, 10]);
//! ```

mod arena;
mod error;
mod iter;
mod tree;

pub use error::{InvariantViolation, TreeError};
pub use iter::{IntoIter, Iter, Order, Range};
pub use tree::RedBlackTree;
