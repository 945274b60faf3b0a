//! Scalar relaxation of node radii.

#![allow(clippy::cast_precision_loss)]

use tracing::{debug, info};
use vessel_types::VesselTree;

use crate::adjacency::build_adjacency;
use crate::params::SmoothParams;
use crate::report::SmoothReport;
use crate::schedule::coefficient_schedule;

/// Relax node radii along the graph.
///
/// The scalar counterpart of [`smooth_positions`]: per step every node
/// accumulates the anchor force `fa·Δ + faaa·Δ³` toward its original
/// radius and, with more than one neighbor, `d1` times the offset to
/// the neighbor-mean radius. The chord-projection term has no scalar
/// analogue; `d2` is unused. All deltas of a step are computed against
/// the same snapshot and applied at once, with the same annealing
/// schedule as the position solver.
///
/// Evens out the noise of per-node diameter estimation without
/// flattening genuine taper. Returns a relaxed copy and a convergence
/// report; the input tree is untouched.
///
/// [`smooth_positions`]: crate::smooth_positions
#[must_use]
pub fn smooth_radii(tree: &VesselTree, params: &SmoothParams) -> (VesselTree, SmoothReport) {
    info!(
        nodes = tree.node_count(),
        iterations = params.iterations,
        chillout = params.chillout,
        "Relaxing node radii"
    );

    let anchors: Vec<f64> = tree.nodes.iter().map(|n| n.radius).collect();
    let neighbors = build_adjacency(tree);
    let mut radii = anchors.clone();
    let mut deltas = vec![0.0f64; radii.len()];

    let mut report = SmoothReport::default();
    for coefficients in coefficient_schedule(params) {
        for (ni, delta) in deltas.iter_mut().enumerate() {
            let offset = anchors[ni] - radii[ni];
            *delta = coefficients.fa * offset + coefficients.faaa * offset * offset * offset;

            let own = &neighbors[ni];
            if own.len() > 1 {
                let mean = own.iter().map(|&n| radii[n as usize]).sum::<f64>() / own.len() as f64;
                *delta += coefficients.d1 * (mean - radii[ni]);
            }
        }

        report.steps += 1;
        report.max_delta = 0.0;
        for (radius, delta) in radii.iter_mut().zip(&deltas) {
            *radius += delta;
            let magnitude = delta.abs();
            report.total_delta += magnitude;
            if magnitude > report.max_delta {
                report.max_delta = magnitude;
            }
        }
    }

    let mut result = tree.clone();
    for (node, radius) in result.nodes.iter_mut().zip(&radii) {
        node.radius = *radius;
    }
    debug!("{report}");
    (result, report)
}
