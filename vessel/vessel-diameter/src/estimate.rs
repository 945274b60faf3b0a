//! Ray-cast boundary sampling and PCA radius estimation.
//!
//! For every node, rays are cast along the sampled directions through
//! the occupancy volume until they leave the occupied region; the exit
//! points form a boundary cloud whose two smaller principal components
//! describe the local cross-section.

// Voxel walking mixes f64 plane coordinates with integer voxel indices;
// the truncating casts reproduce the walk exactly.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use rayon::prelude::*;
use tracing::{debug, info};
use vessel_types::{VesselNode, VesselTree};
use vf_volume::{ScalarVolume, VoxelCoord};

use crate::icosphere::SphereSampling;
use crate::params::{DiameterParams, DirectionMode};
use crate::report::DiameterReport;

/// Direction components below this magnitude never cross a voxel plane.
const ALMOST_ZERO: f64 = 1e-6;

/// The sampled ray directions for one estimator run, in voxel-normalized
/// space (each component divided by the per-axis voxel spacing).
///
/// Built once per run and shared read-only across all node estimations.
///
/// # Example
///
/// ```
/// use nalgebra::Vector3;
/// use vessel_diameter::{DiameterParams, RayDirections};
///
/// let rays = RayDirections::new(&DiameterParams::default(), Vector3::new(1.0, 1.0, 1.0));
/// assert_eq!(rays.len(), 92);
/// ```
#[derive(Debug, Clone)]
pub struct RayDirections {
    directions: Vec<Vector3<f64>>,
}

impl RayDirections {
    /// Build the direction set for `params` against a volume with the
    /// given per-axis spacing.
    #[must_use]
    pub fn new(params: &DiameterParams, spacing: Vector3<f64>) -> Self {
        let directions = match params.directions {
            DirectionMode::Vertices(divisions) => {
                let sphere = SphereSampling::new(divisions);
                sphere
                    .vertex_directions()
                    .map(|v| v.component_div(&spacing))
                    .collect()
            }
            DirectionMode::Faces(divisions) => {
                let sphere = SphereSampling::new(divisions);
                sphere
                    .triangles()
                    .iter()
                    .map(|t| {
                        let sum: Vector3<f64> = t
                            .iter()
                            .map(|&v| sphere.vertex(v as usize).unwrap_or_default())
                            .sum();
                        sum.component_div(&spacing)
                    })
                    .collect()
            }
        };
        Self { directions }
    }

    /// Number of directions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Whether the set is empty (never the case for valid params).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Iterate over the directions.
    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.directions.iter()
    }
}

/// Estimate a cross-section radius at every node of a metric-space tree.
///
/// Returns a derived copy with radii filled in; the input tree is
/// untouched. Per node the position is converted back to voxel-index
/// space, one boundary sample is collected per ray direction, and the
/// radius is derived from the two smaller principal components of the
/// sample cloud (the largest is taken to be the vessel's long axis):
///
/// radius = ρ · ((λ₂^(−γ/2) + λ₃^(−γ/2)) / 2)^(−1/γ)
///
/// Nodes whose own voxel is unoccupied or outside the volume get radius
/// 0, as do nodes whose sample cloud defeats the eigendecomposition;
/// a tree with some unknown diameters is still usable. Per-node work is
/// read-only on the volume and runs in parallel.
///
/// # Example
///
/// ```
/// use vf_volume::{ScalarVolume, VolumeDims};
/// use vessel_types::{VesselNode, VesselTree};
/// use vessel_diameter::{estimate_diameters, DiameterParams};
///
/// // a solid 9x9x9 block with a node at its center
/// let dims = VolumeDims::new(9, 9, 9);
/// let mut volume = ScalarVolume::new(dims);
/// for index in 0..dims.voxel_count() {
///     let coord = dims.coord_at(index).unwrap();
///     volume.set(coord, 1);
/// }
/// let mut tree = VesselTree::new();
/// tree.add_branch(vec![VesselNode::from_coords(4.0, 4.0, 4.0)]).unwrap();
///
/// let (result, report) = estimate_diameters(&tree, &volume, &DiameterParams::default());
/// assert_eq!(report.nodes_estimated, 1);
/// assert!(result.nodes[0].radius > 0.0);
/// ```
#[must_use]
pub fn estimate_diameters(
    tree: &VesselTree,
    volume: &ScalarVolume,
    params: &DiameterParams,
) -> (VesselTree, DiameterReport) {
    let rays = RayDirections::new(params, volume.spacing());
    info!(
        nodes = tree.node_count(),
        directions = rays.len(),
        gamma = params.gamma,
        "Estimating diameters"
    );

    let radii: Vec<(f64, bool)> = tree
        .nodes
        .par_iter()
        .map(|node| {
            let on_occupancy = node_voxel(node, volume)
                .is_some_and(|coord| volume.is_positive(coord));
            (estimate_node(node, volume, &rays, params), on_occupancy)
        })
        .collect();

    let mut result = tree.clone();
    let mut report = DiameterReport::default();
    for (node, &(radius, on_occupancy)) in result.nodes.iter_mut().zip(&radii) {
        node.radius = radius;
        if radius > 0.0 {
            report.nodes_estimated += 1;
        } else if on_occupancy {
            report.nodes_failed += 1;
        } else {
            report.nodes_degenerate += 1;
        }
    }

    debug!("{report}");
    (result, report)
}

/// Estimate the radius at a single metric-space node.
///
/// The building block of [`estimate_diameters`]; useful for probing one
/// node with a prebuilt [`RayDirections`] set. Returns 0.0 for
/// degenerate geometry (node off the occupied region, or an unusable
/// sample cloud).
#[must_use]
pub fn estimate_node(
    node: &VesselNode,
    volume: &ScalarVolume,
    rays: &RayDirections,
    params: &DiameterParams,
) -> f64 {
    let spacing = volume.spacing();
    // +0.5 puts the center in the middle of its voxel
    let center = [
        node.position.x / spacing.x + 0.5,
        node.position.y / spacing.y + 0.5,
        node.position.z / spacing.z + 0.5,
    ];
    match node_voxel(node, volume) {
        Some(coord) if volume.is_positive(coord) => {}
        _ => return 0.0,
    }

    let samples: Vec<Vector3<f64>> = rays
        .iter()
        .map(|direction| border_sample(volume, &center, direction))
        .collect();
    radius_from_cloud(&samples, params.gamma, params.rho)
}

/// Voxel containing a metric-space node, if inside the volume.
fn node_voxel(node: &VesselNode, volume: &ScalarVolume) -> Option<VoxelCoord> {
    let spacing = volume.spacing();
    let coord = VoxelCoord::new(
        (node.position.x / spacing.x + 0.5) as i32,
        (node.position.y / spacing.y + 0.5) as i32,
        (node.position.z / spacing.z + 0.5) as i32,
    );
    volume.contains(coord).then_some(coord)
}

/// Walk one ray from `center` until it exits the occupied region and
/// return the exit offset in physical units.
///
/// The walk is a digital differential analyzer over voxel planes: for
/// each axis with a non-negligible direction component, the squared
/// distance to the next integer plane crossing is tracked, and each
/// step advances the axis whose crossing is nearest. The voxel entered
/// across that plane is probed; a zero voxel or an exit from the bounds
/// ends the walk at the current crossing. A direction too small on all
/// axes yields the zero sample.
fn border_sample(volume: &ScalarVolume, center: &[f64; 3], direction: &Vector3<f64>) -> Vector3<f64> {
    let spacing = volume.spacing();
    let dir = [direction.x, direction.y, direction.z];
    let mut shift = [0.0f64; 3];
    let mut offset = [0.0f64; 3];
    let mut dist = [-1.0f64; 3];

    for d in 0..3 {
        shift[d] = if dir[d] > 0.0 {
            center[d].ceil()
        } else {
            center[d].floor()
        };
        if dir[d].abs() > ALMOST_ZERO {
            offset[d] = shift[d] - center[d];
            dist[d] = 0.0;
            for dd in 0..3 {
                if dd != d {
                    offset[dd] = offset[d] * dir[dd] / dir[d];
                }
                dist[d] += offset[dd] * offset[dd];
            }
        }
    }

    loop {
        let mut stepped = false;
        for d in 0..3 {
            if dist[d] >= 0.0
                && (dist[d] <= dist[0] || dist[0] < 0.0)
                && (dist[d] <= dist[1] || dist[1] < 0.0)
                && (dist[d] <= dist[2] || dist[2] < 0.0)
            {
                offset[d] = shift[d] - center[d];
                let mut probe = [0i32; 3];
                probe[d] = if dir[d] > 0.0 {
                    (shift[d] + 1.0) as i32
                } else {
                    shift[d] as i32
                };
                for dd in 0..3 {
                    if dd != d {
                        offset[dd] = offset[d] * dir[dd] / dir[d];
                        probe[dd] = (offset[dd] + center[dd] + 0.5) as i32;
                    }
                }

                let coord = VoxelCoord::new(probe[0], probe[1], probe[2]);
                if !volume.is_positive(coord) {
                    // boundary or volume edge reached
                    return Vector3::new(
                        offset[0] * spacing.x,
                        offset[1] * spacing.y,
                        offset[2] * spacing.z,
                    );
                }

                // still inside; advance this axis to its next plane
                shift[d] += if dir[d] > 0.0 { 1.0 } else { -1.0 };
                offset[d] = shift[d] - center[d];
                dist[d] = 0.0;
                for dd in 0..3 {
                    if dd != d {
                        offset[dd] = offset[d] * dir[dd] / dir[d];
                    }
                    dist[d] += offset[dd] * offset[dd];
                }
                stepped = true;
                break;
            }
        }
        if !stepped {
            return Vector3::zeros();
        }
    }
}

/// Derive a radius from the two smaller principal components of a
/// boundary sample cloud.
fn radius_from_cloud(samples: &[Vector3<f64>], gamma: f64, rho: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }

    let n = samples.len() as f64;
    let mean: Vector3<f64> = samples.iter().sum::<Vector3<f64>>() / n;
    let mut covariance = Matrix3::zeros();
    for sample in samples {
        let centered = sample - mean;
        covariance += centered * centered.transpose();
    }
    covariance /= n - 1.0;

    let eigen = SymmetricEigen::new(covariance);
    let mut magnitudes: Vec<f64> = eigen.eigenvalues.iter().map(|v| v.abs()).collect();
    magnitudes.sort_by(|a, b| b.total_cmp(a));
    let (lambda2, lambda3) = (magnitudes[1], magnitudes[2]);

    let exponent = -gamma / 2.0;
    let combined = (lambda2.powf(exponent) + lambda3.powf(exponent)) / 2.0;
    let radius = rho * combined.powf(-1.0 / gamma);
    if radius.is_finite() {
        radius
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vf_volume::VolumeDims;

    /// Solid cylinder of radius `r` along `axis`, with a centerline node
    /// in the middle. Returns the volume.
    fn cylinder_volume(axis: usize, r: f64) -> ScalarVolume {
        let mut extents = [16u32, 16, 16];
        extents[axis] = 48;
        let dims = VolumeDims::new(extents[0], extents[1], extents[2]);
        let mut volume = ScalarVolume::new(dims);
        let center = [
            f64::from(extents[0]) / 2.0,
            f64::from(extents[1]) / 2.0,
            f64::from(extents[2]) / 2.0,
        ];
        for index in 0..dims.voxel_count() {
            let coord = dims.coord_at(index).unwrap();
            let p = [
                f64::from(coord.x) + 0.5,
                f64::from(coord.y) + 0.5,
                f64::from(coord.z) + 0.5,
            ];
            let mut cross = 0.0;
            for d in 0..3 {
                if d != axis {
                    cross += (p[d] - center[d]) * (p[d] - center[d]);
                }
            }
            if cross <= r * r {
                volume.set(coord, 1);
            }
        }
        volume
    }

    #[test]
    fn test_ray_direction_counts() {
        let unit = Vector3::new(1.0, 1.0, 1.0);
        let vertices = RayDirections::new(&DiameterParams::default(), unit);
        assert_eq!(vertices.len(), 92);

        let faces = RayDirections::new(
            &DiameterParams::default().with_directions(DirectionMode::Faces(1)),
            unit,
        );
        assert_eq!(faces.len(), 2 * 42 - 4);
    }

    #[test]
    fn test_directions_divided_by_spacing() {
        let rays = RayDirections::new(
            &DiameterParams::default(),
            Vector3::new(0.5, 1.0, 2.0),
        );
        let unit = RayDirections::new(&DiameterParams::default(), Vector3::new(1.0, 1.0, 1.0));
        for (scaled, plain) in rays.iter().zip(unit.iter()) {
            assert_relative_eq!(scaled.x, plain.x * 2.0, epsilon = 1e-12);
            assert_relative_eq!(scaled.y, plain.y, epsilon = 1e-12);
            assert_relative_eq!(scaled.z, plain.z / 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_border_sample_straight_ray() {
        // occupancy: x in [0, 10)
        let mut volume = ScalarVolume::new(VolumeDims::new(10, 5, 5));
        for index in 0..volume.dims().voxel_count() {
            let coord = volume.dims().coord_at(index).unwrap();
            volume.set(coord, 1);
        }

        let center = [2.5, 2.5, 2.5];
        let sample = border_sample(&volume, &center, &Vector3::new(1.0, 0.0, 0.0));
        // the ray exits through the x bound of the volume
        assert!(sample.x > 6.0);
        assert_relative_eq!(sample.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(sample.z, 0.0, epsilon = 1e-12);

        let sample = border_sample(&volume, &center, &Vector3::new(-1.0, 0.0, 0.0));
        assert!(sample.x < 0.0);
    }

    #[test]
    fn test_radius_from_circle_cloud() {
        // boundary points on a circle of radius 3 around a long axis
        let r = 3.0;
        let mut samples = Vec::new();
        for i in 0..64 {
            let angle = f64::from(i) * std::f64::consts::TAU / 64.0;
            samples.push(Vector3::new(
                f64::from(i % 7) - 3.0,
                r * angle.cos(),
                r * angle.sin(),
            ));
        }
        let radius = radius_from_cloud(&samples, 4.0, std::f64::consts::SQRT_2);
        assert_relative_eq!(radius, r, max_relative = 0.05);
    }

    #[test]
    fn test_radius_from_degenerate_cloud() {
        let samples = vec![Vector3::zeros(); 92];
        assert_eq!(radius_from_cloud(&samples, 4.0, std::f64::consts::SQRT_2), 0.0);
        assert_eq!(radius_from_cloud(&[], 4.0, std::f64::consts::SQRT_2), 0.0);
    }

    #[test]
    fn test_cylinder_radius_axis_independent() {
        let r = 4.0;
        let mut estimates = Vec::new();
        for axis in 0..3 {
            let volume = cylinder_volume(axis, r);
            let mut position = [8.0, 8.0, 8.0];
            position[axis] = 24.0;
            let node = VesselNode::from_coords(position[0], position[1], position[2]);

            let params = DiameterParams::default();
            let rays = RayDirections::new(&params, volume.spacing());
            let radius = estimate_node(&node, &volume, &rays, &params);

            assert_relative_eq!(radius, r, max_relative = 0.25);
            estimates.push(radius);
        }
        // the estimate does not depend on which axis the tube follows
        for pair in estimates.windows(2) {
            assert_relative_eq!(pair[0], pair[1], max_relative = 0.1);
        }
    }

    #[test]
    fn test_node_off_occupancy_is_degenerate() {
        let volume = cylinder_volume(0, 3.0);
        let node = VesselNode::from_coords(1.0, 1.0, 1.0);
        let params = DiameterParams::default();
        let rays = RayDirections::new(&params, volume.spacing());
        assert_eq!(estimate_node(&node, &volume, &rays, &params), 0.0);
    }

    #[test]
    fn test_estimate_diameters_reports() {
        let volume = cylinder_volume(2, 4.0);
        let mut tree = VesselTree::new();
        tree.add_branch(vec![
            VesselNode::from_coords(8.0, 8.0, 20.0),
            VesselNode::from_coords(8.0, 8.0, 24.0),
            // off the vessel entirely
            VesselNode::from_coords(1.0, 1.0, 1.0),
        ])
        .unwrap();

        let (result, report) = estimate_diameters(&tree, &volume, &DiameterParams::default());

        assert_eq!(report.nodes_estimated, 2);
        assert_eq!(report.nodes_degenerate, 1);
        assert!(result.nodes[0].radius > 0.0);
        assert_eq!(result.nodes[2].radius, 0.0);
        // input untouched
        assert!(tree.nodes[0].radius < 0.0);
    }
}
