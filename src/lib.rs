//! # sylva
//!
//! In-memory trees for ordered keys and range aggregation.
//!
//! ## Overview
//!
//! - **Ordered Tree**: [`ordered::RedBlackTree`], a balanced search tree
//!   over unique keys with predecessor/successor search and resumable,
//!   bidirectional range iteration.
//! - **Range Aggregation Tree**: [`segment::LazySegmentTree`], a segment
//!   tree with lazy range updates over a pluggable aggregation strategy, and
//!   [`segment::MaxAddTree`], a dense max-with-add specialization.
//!
//! Both structures are single-threaded and synchronous. Rebalancing and
//! propagation steps emit `tracing` events at the `TRACE` level; install a
//! subscriber to see them.
//!
//! ## Feature Flags
//!
//! - `ordered`: Ordered Tree (enabled by default)
//! - `segment`: Range Aggregation Trees (enabled by default)
//! - `serde`: `Serialize`/`Deserialize` for the Ordered Tree
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use sylva::prelude::*;
//!
//! let tree = RedBlackTree::try_from_iter([5, 3, 8, 1, 4, 7, 9]).unwrap();
//! assert_eq!(tree.find_predecessor_or_equal(&6), Ok(&5));
//!
//! let mut maxima = MaxAddTree::new(vec![2, 5, 1, 4, 3]);
//! maxima.update_range(0, 2, 10);
//! assert_eq!(maxima.query_range(0, 4), 15);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the public types of every enabled module.
///
/// # Usage
///
/// ```rust
/// use sylva::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "ordered")]
    pub use crate::ordered::*;

    #[cfg(feature = "segment")]
    pub use crate::segment::*;
}

#[cfg(feature = "ordered")]
pub mod ordered;

#[cfg(feature = "segment")]
pub mod segment;
