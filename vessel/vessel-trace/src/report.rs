//! Result statistics for a tracing run.

/// Statistics from one skeleton tracing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceReport {
    /// Number of nodes created, one per claimed skeleton voxel.
    pub nodes_created: usize,

    /// Number of branches committed to the graph.
    pub branches_created: usize,

    /// Number of skeleton voxels claimed and zeroed during traversal.
    pub voxels_visited: usize,

    /// Number of seed candidates that actually started a traversal.
    /// Candidates consumed by an earlier root are skipped and not
    /// counted.
    pub roots_started: usize,
}

impl TraceReport {
    /// Check whether the run produced any graph at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes_created == 0
    }
}

impl std::fmt::Display for TraceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trace: {} nodes, {} branches from {} roots ({} voxels)",
            self.nodes_created, self.branches_created, self.roots_started, self.voxels_visited
        )
    }
}
