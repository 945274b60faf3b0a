//! Geometric relaxation of node positions.

#![allow(clippy::cast_precision_loss)]

use nalgebra::Vector3;
use tracing::{debug, info};
use vessel_types::VesselTree;

use crate::adjacency::build_adjacency;
use crate::params::SmoothParams;
use crate::report::SmoothReport;
use crate::schedule::{Coefficients, coefficient_schedule};

/// Relax node positions against three spring forces.
///
/// Per step, every node accumulates:
/// - an anchor force `fa·Δ + faaa·Δ³` (componentwise) toward its
///   original position, which keeps the result from drifting off the
///   traced centerline;
/// - with more than one neighbor, `d1` times the offset to the mean of
///   the neighbor positions;
/// - for each neighbor that itself has exactly two neighbors, the node
///   is projected onto the line spanned by that neighbor and the
///   neighbor's far neighbor; `d2` times the offset to the average of
///   these projections straightens the chain through branch interiors.
///   A zero-length chord degenerates to the far endpoint itself.
///
/// All deltas of a step are computed against the same snapshot and
/// applied at once. `iterations` full steps are followed by `chillout`
/// annealed steps with linearly decaying coefficients.
///
/// Returns a relaxed copy and a convergence report; the input tree is
/// untouched.
///
/// # Example
///
/// ```
/// use vessel_types::{VesselNode, VesselTree};
/// use vessel_smooth::{smooth_positions, SmoothParams};
///
/// let mut tree = VesselTree::new();
/// tree.add_branch(vec![
///     VesselNode::from_coords(0.0, 0.0, 0.0),
///     VesselNode::from_coords(1.0, 1.0, 0.0), // kink
///     VesselNode::from_coords(2.0, 0.0, 0.0),
/// ]).unwrap();
///
/// let (smoothed, report) = smooth_positions(&tree, &SmoothParams::default());
/// assert_eq!(report.steps, 15);
/// assert!(smoothed.nodes[1].position.y < 1.0);
/// ```
#[must_use]
pub fn smooth_positions(tree: &VesselTree, params: &SmoothParams) -> (VesselTree, SmoothReport) {
    info!(
        nodes = tree.node_count(),
        iterations = params.iterations,
        chillout = params.chillout,
        "Relaxing node positions"
    );

    let anchors: Vec<Vector3<f64>> = tree.nodes.iter().map(|n| n.position.coords).collect();
    let neighbors = build_adjacency(tree);
    let mut positions = anchors.clone();
    let mut deltas = vec![Vector3::zeros(); positions.len()];

    let mut report = SmoothReport::default();
    for coefficients in coefficient_schedule(params) {
        step(&mut positions, &mut deltas, &anchors, &neighbors, coefficients, &mut report);
    }

    let mut result = tree.clone();
    for (node, position) in result.nodes.iter_mut().zip(&positions) {
        node.position.coords = *position;
    }
    debug!("{report}");
    (result, report)
}

fn step(
    positions: &mut [Vector3<f64>],
    deltas: &mut [Vector3<f64>],
    anchors: &[Vector3<f64>],
    neighbors: &[Vec<u32>],
    coefficients: Coefficients,
    report: &mut SmoothReport,
) {
    for (ni, delta) in deltas.iter_mut().enumerate() {
        *delta = anchor_force(positions[ni], anchors[ni], &coefficients);
        *delta += neighbor_force(ni, positions, neighbors, &coefficients);
    }

    report.steps += 1;
    report.max_delta = 0.0;
    for (position, delta) in positions.iter_mut().zip(deltas.iter()) {
        *position += *delta;
        let magnitude = delta.norm();
        report.total_delta += magnitude;
        if magnitude > report.max_delta {
            report.max_delta = magnitude;
        }
    }
}

/// Componentwise pull toward the original position.
fn anchor_force(
    current: Vector3<f64>,
    anchor: Vector3<f64>,
    coefficients: &Coefficients,
) -> Vector3<f64> {
    let offset = anchor - current;
    coefficients.fa * offset
        + coefficients.faaa * offset.component_mul(&offset).component_mul(&offset)
}

/// Neighbor-mean and chord-projection pulls.
fn neighbor_force(
    ni: usize,
    positions: &[Vector3<f64>],
    neighbors: &[Vec<u32>],
    coefficients: &Coefficients,
) -> Vector3<f64> {
    let mut force = Vector3::zeros();
    let own = &neighbors[ni];

    if own.len() > 1 {
        let mut mean = Vector3::zeros();
        for &n in own {
            mean += positions[n as usize];
        }
        mean /= own.len() as f64;
        force += coefficients.d1 * (mean - positions[ni]);
    }

    let mut projected = Vector3::zeros();
    let mut count = 0usize;
    for &n in own {
        let ring = &neighbors[n as usize];
        if ring.len() != 2 {
            continue;
        }
        let nn = if ring[0] as usize == ni { ring[1] } else { ring[0] };
        let chord = positions[n as usize] - positions[nn as usize];
        let toward = positions[ni] - positions[nn as usize];
        let chord_sq = chord.norm_squared();
        if chord_sq == 0.0 {
            projected += positions[nn as usize];
        } else {
            let u = chord.dot(&toward) / chord_sq;
            projected += chord * u + positions[nn as usize];
        }
        count += 1;
    }
    if count > 0 {
        projected /= count as f64;
        force += coefficients.d2 * (projected - positions[ni]);
    }
    force
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vessel_types::VesselNode;

    fn zigzag() -> VesselTree {
        let mut tree = VesselTree::new();
        tree.add_branch(vec![
            VesselNode::from_coords(0.0, 0.0, 0.0),
            VesselNode::from_coords(1.0, 1.0, 0.0),
            VesselNode::from_coords(2.0, 0.0, 0.0),
            VesselNode::from_coords(3.0, 1.0, 0.0),
            VesselNode::from_coords(4.0, 0.0, 0.0),
        ])
        .unwrap();
        tree
    }

    #[test]
    fn test_two_node_chain_is_a_fixpoint() {
        // neither node has > 1 neighbor nor a degree-2 neighbor
        let mut tree = VesselTree::new();
        tree.add_branch(vec![
            VesselNode::from_coords(0.0, 0.0, 0.0),
            VesselNode::from_coords(5.0, 0.0, 0.0),
        ])
        .unwrap();

        let (smoothed, report) = smooth_positions(&tree, &SmoothParams::default());
        for (before, after) in tree.nodes.iter().zip(&smoothed.nodes) {
            assert_relative_eq!(before.position, after.position, epsilon = 1e-12);
        }
        assert_eq!(report.steps, 15);
        assert_relative_eq!(report.total_delta, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zigzag_flattens() {
        let tree = zigzag();
        let (smoothed, _) = smooth_positions(&tree, &SmoothParams::default());

        // interior kinks move toward the x axis, endpoints stay anchored
        assert!(smoothed.nodes[1].position.y < tree.nodes[1].position.y);
        assert!(smoothed.nodes[3].position.y < tree.nodes[3].position.y);
        assert!(smoothed.nodes[2].position.y > tree.nodes[2].position.y);
        assert_relative_eq!(smoothed.nodes[0].position.x, 0.0, epsilon = 0.5);
        assert_relative_eq!(smoothed.nodes[4].position.x, 4.0, epsilon = 0.5);
    }

    #[test]
    fn test_input_tree_untouched() {
        let tree = zigzag();
        let snapshot = tree.clone();
        let _ = smooth_positions(&tree, &SmoothParams::default());
        for (a, b) in tree.nodes.iter().zip(&snapshot.nodes) {
            assert_relative_eq!(a.position, b.position, epsilon = 0.0);
        }
    }

    #[test]
    fn test_straight_line_is_stable() {
        let mut tree = VesselTree::new();
        tree.add_branch(vec![
            VesselNode::from_coords(0.0, 0.0, 0.0),
            VesselNode::from_coords(1.0, 0.0, 0.0),
            VesselNode::from_coords(2.0, 0.0, 0.0),
            VesselNode::from_coords(3.0, 0.0, 0.0),
        ])
        .unwrap();

        let (smoothed, report) = smooth_positions(&tree, &SmoothParams::default());
        for (before, after) in tree.nodes.iter().zip(&smoothed.nodes) {
            assert_relative_eq!(before.position, after.position, epsilon = 1e-9);
        }
        assert_relative_eq!(report.max_delta, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_tree() {
        let (smoothed, report) = smooth_positions(&VesselTree::new(), &SmoothParams::default());
        assert!(smoothed.is_empty());
        assert_eq!(report.steps, 15);
    }

    #[test]
    fn test_deterministic() {
        let tree = zigzag();
        let (a, _) = smooth_positions(&tree, &SmoothParams::default());
        let (b, _) = smooth_positions(&tree, &SmoothParams::default());
        for (na, nb) in a.nodes.iter().zip(&b.nodes) {
            assert_relative_eq!(na.position, nb.position, epsilon = 0.0);
        }
    }
}
