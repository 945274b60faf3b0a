//! Error types for graph edits.

use thiserror::Error;

/// Result type for graph edit operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors produced by structural edits on a vessel tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TreeError {
    /// A node index is out of range.
    #[error("node index {index} out of range, tree has {count} nodes")]
    NodeIndex {
        /// The offending index.
        index: u32,
        /// Current node count.
        count: usize,
    },

    /// A branch index is out of range.
    #[error("branch index {index} out of range, tree has {count} branches")]
    BranchIndex {
        /// The offending index.
        index: usize,
        /// Current branch count.
        count: usize,
    },

    /// A branch split position is an endpoint or out of range.
    #[error("cannot split branch of length {len} at position {position}")]
    SplitPosition {
        /// The requested split position.
        position: usize,
        /// Length of the branch.
        len: usize,
    },

    /// An empty node path was supplied where a branch is required.
    #[error("a branch requires at least one node")]
    EmptyBranch,
}
