//! Per-run relaxation tallies.

use std::fmt;

/// Convergence summary from one relaxation run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothReport {
    /// Steps executed (full-strength plus annealed).
    pub steps: u32,
    /// Largest single-node change applied during the final step.
    /// Position smoothing reports displacement length, radius
    /// smoothing the absolute radius change.
    pub max_delta: f64,
    /// Sum of all per-node change magnitudes across the whole run.
    pub total_delta: f64,
}

impl fmt::Display for SmoothReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "relaxation: {} steps, final max delta {:.6}, total delta {:.6}",
            self.steps, self.max_delta, self.total_delta
        )
    }
}
