//! Fallback estimator based on clearance to the nearest background voxel.
//!
//! Cheap and robust where the ray-cast estimator needs a well-formed
//! occupancy boundary: every background voxel is visited once and the
//! squared distance to each node tracked, so the cost is
//! O(background voxels × nodes).

#![allow(clippy::cast_precision_loss)]

use nalgebra::Vector3;
use tracing::info;
use vessel_types::{VesselTree, RADIUS_UNKNOWN};
use vf_volume::ScalarVolume;

/// Estimate radii from the clearance between each node and the nearest
/// background voxel.
///
/// The tree is expected in voxel-index space (node positions are voxel
/// indices, as produced by tracing before the metric conversion);
/// distances are scaled per axis by the voxel spacing. Each node gets
/// radius 2 × the minimum distance to any zero voxel, or
/// [`RADIUS_UNKNOWN`] when the volume has no background at all.
/// Returns a derived copy; the input tree is untouched.
#[must_use]
pub fn estimate_by_clearance(tree: &VesselTree, volume: &ScalarVolume) -> VesselTree {
    let mut result = tree.clone();
    if result.is_empty() {
        return result;
    }

    let spacing = volume.spacing();
    let dims = volume.dims();
    let mut best = vec![f64::MAX; result.node_count()];

    for index in 0..dims.voxel_count() {
        if volume.data()[index] > 0 {
            continue;
        }
        let Some(coord) = dims.coord_at(index) else {
            continue;
        };
        let background = Vector3::new(
            f64::from(coord.x),
            f64::from(coord.y),
            f64::from(coord.z),
        );
        for (node, slot) in result.nodes.iter().zip(&mut best) {
            let delta = (node.position.coords - background).component_mul(&spacing);
            let d = delta.norm_squared();
            if d < *slot {
                *slot = d;
            }
        }
    }

    let mut estimated = 0usize;
    for (node, &d) in result.nodes.iter_mut().zip(&best) {
        if d < f64::MAX {
            node.radius = 2.0 * d.sqrt();
            estimated += 1;
        } else {
            node.radius = RADIUS_UNKNOWN;
        }
    }
    info!(
        nodes = result.node_count(),
        estimated, "Estimated diameters by clearance"
    );
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vessel_types::VesselNode;
    use vf_volume::{VolumeDims, VoxelCoord};

    #[test]
    fn test_clearance_radius_is_twice_distance() {
        // one background voxel at (0,0,0), everything else occupied
        let dims = VolumeDims::new(8, 8, 8);
        let mut volume = ScalarVolume::new(dims);
        for index in 0..dims.voxel_count() {
            let coord = dims.coord_at(index).unwrap();
            volume.set(coord, 1);
        }
        volume.set(VoxelCoord::origin(), 0);

        let mut tree = VesselTree::new();
        tree.add_branch(vec![VesselNode::from_coords(3.0, 0.0, 0.0)])
            .unwrap();

        let result = estimate_by_clearance(&tree, &volume);
        assert_relative_eq!(result.nodes[0].radius, 6.0, epsilon = 1e-12);
        // input untouched
        assert!(tree.nodes[0].radius < 0.0);
    }

    #[test]
    fn test_clearance_uses_per_axis_spacing() {
        let dims = VolumeDims::new(8, 8, 8);
        let mut volume = ScalarVolume::with_spacing(dims, Vector3::new(1.0, 2.0, 1.0)).unwrap();
        for index in 0..dims.voxel_count() {
            let coord = dims.coord_at(index).unwrap();
            volume.set(coord, 1);
        }
        // background 2 voxels away along y, so 4 length units away
        volume.set(VoxelCoord::new(4, 6, 4), 0);

        let mut tree = VesselTree::new();
        tree.add_branch(vec![VesselNode::from_coords(4.0, 4.0, 4.0)])
            .unwrap();

        let result = estimate_by_clearance(&tree, &volume);
        assert_relative_eq!(result.nodes[0].radius, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_no_background_yields_unknown() {
        let dims = VolumeDims::new(4, 4, 4);
        let mut volume = ScalarVolume::new(dims);
        for index in 0..dims.voxel_count() {
            let coord = dims.coord_at(index).unwrap();
            volume.set(coord, 1);
        }

        let mut tree = VesselTree::new();
        tree.add_branch(vec![VesselNode::from_coords(1.0, 1.0, 1.0)])
            .unwrap();

        let result = estimate_by_clearance(&tree, &volume);
        assert_eq!(result.nodes[0].radius, RADIUS_UNKNOWN);
    }

    #[test]
    fn test_empty_tree_passthrough() {
        let volume = ScalarVolume::new(VolumeDims::new(2, 2, 2));
        let result = estimate_by_clearance(&VesselTree::new(), &volume);
        assert!(result.is_empty());
    }
}
