//! Per-run estimation tallies.

use std::fmt;

/// Node tallies from one estimator run.
///
/// A node is *estimated* when a positive radius was derived,
/// *degenerate* when its position falls outside the occupied region
/// (no rays could be cast), and *failed* when the boundary cloud was
/// collected but defeated the principal-component analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiameterReport {
    /// Nodes that received a positive radius.
    pub nodes_estimated: usize,
    /// Nodes off the occupied region, left at radius 0.
    pub nodes_degenerate: usize,
    /// Nodes whose sample cloud yielded no usable radius.
    pub nodes_failed: usize,
}

impl DiameterReport {
    /// Total number of nodes visited.
    #[must_use]
    pub fn nodes_total(&self) -> usize {
        self.nodes_estimated + self.nodes_degenerate + self.nodes_failed
    }
}

impl fmt::Display for DiameterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "diameters: {} estimated, {} degenerate, {} failed",
            self.nodes_estimated, self.nodes_degenerate, self.nodes_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals_and_display() {
        let report = DiameterReport {
            nodes_estimated: 10,
            nodes_degenerate: 2,
            nodes_failed: 1,
        };
        assert_eq!(report.nodes_total(), 13);
        assert_eq!(
            report.to_string(),
            "diameters: 10 estimated, 2 degenerate, 1 failed"
        );
    }
}
