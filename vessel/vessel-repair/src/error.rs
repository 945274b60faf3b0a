//! Error types for vessel-graph repair operations.

use thiserror::Error;

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors that can occur during vessel-graph repair.
#[derive(Debug, Error)]
pub enum RepairError {
    /// The graph has no nodes or no branches to operate on.
    ///
    /// Repair passes need at least one branch referencing at least one
    /// node. A graph can also end up here when every branch turns out
    /// to be empty, leaving nothing to correct.
    #[error("graph is empty ({nodes} nodes, {branches} branches)")]
    EmptyGraph {
        /// Number of nodes at the time of failure.
        nodes: usize,
        /// Number of branches at the time of failure.
        branches: usize,
    },
}
