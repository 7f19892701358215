//! Error types for the ordered tree.
//!
//! [`TreeError`] covers caller mistakes that the tree reports and recovers
//! from without mutating anything. [`InvariantViolation`] is only produced by
//! [`RedBlackTree::validate`](super::RedBlackTree::validate); seeing one means
//! the tree itself is broken.

use thiserror::Error;

/// Represents a recoverable failure of an ordered tree operation.
///
/// # Examples
///
/// ```rust
/// use sylva::ordered::{RedBlackTree, TreeError};
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(1).unwrap();
/// assert_eq!(tree.insert(1), Err(TreeError::DuplicateKey));
/// assert_eq!(format!("{}", TreeError::DuplicateKey), "key is already present in the tree");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum TreeError {
    /// An insert found an equal key already stored.
    #[error("key is already present in the tree")]
    DuplicateKey,
    /// A removal targeted a key that is not stored.
    #[error("key is not present in the tree")]
    KeyNotFound,
    /// A predecessor or successor search found no key on the requested side.
    #[error("no key satisfies the search bound")]
    NoMatch,
    /// `min` or `max` was asked of an empty tree.
    #[error("tree is empty")]
    Empty,
}

/// A broken red-black or search-tree property found by
/// [`RedBlackTree::validate`](super::RedBlackTree::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvariantViolation {
    /// The root node is red.
    #[error("root node is red")]
    RedRoot,
    /// A red node has a red child.
    #[error("red node has a red child")]
    RedChildOfRed,
    /// Two paths from the same node reach null leaves through different
    /// numbers of black nodes.
    #[error("black height differs between subtrees: {left} on the left, {right} on the right")]
    BlackHeightMismatch {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A child's parent link does not point back at its parent.
    #[error("child does not link back to its parent")]
    BrokenParentLink,
    /// In-order traversal is not strictly ascending.
    #[error("keys are not in strictly ascending order")]
    OutOfOrder,
    /// The stored length disagrees with the number of reachable nodes.
    #[error("tree records {recorded} keys but {reachable} are reachable")]
    LengthMismatch {
        /// Length recorded by the tree.
        recorded: usize,
        /// Number of nodes reachable from the root.
        reachable: usize,
    },
}
