//! Flood-fill traversal over a skeleton mask.

use tracing::{debug, info};
use vessel_types::{Branch, VesselNode, VesselTree, RADIUS_UNKNOWN};
use vf_volume::{ScalarVolume, VoxelCoord, NEIGHBOR_SCAN_ORDER};

use crate::params::TraceParams;
use crate::report::TraceReport;

/// One suspended traversal position: a node and the neighborhood offset
/// to resume scanning from.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: u32,
    /// Next entry of [`NEIGHBOR_SCAN_ORDER`] to examine. Starts at 1;
    /// entry 0 is the already-claimed center voxel.
    next: usize,
}

/// Trace a skeleton mask into a centerline graph.
///
/// Every positive voxel becomes a node; 26-connected runs of voxels
/// become branches. The traversal is a depth-first walk with an
/// explicit stack, claiming the first positive neighbor in the fixed
/// [`NEIGHBOR_SCAN_ORDER`] priority (faces before edges before
/// corners), so the output node and branch sequence is fully
/// deterministic for a given mask and params.
///
/// The caller's volume is not modified; voxels are claimed and zeroed
/// in an internal copy. Positions in the returned graph are voxel
/// indices; convert with [`to_metric_space`] once topology work in
/// index space is done.
///
/// Without a seed every positive voxel is a root candidate (in linear
/// scan order) and disconnected skeleton parts come out as separate
/// trees. With a seed only the nearest candidate starts a traversal.
/// Candidates consumed by an earlier root are skipped.
///
/// The output does not yet satisfy the branch-segmentation invariants;
/// run connectivity correction before relying on them.
///
/// # Example
///
/// ```
/// use vf_volume::{ScalarVolume, VolumeDims, VoxelCoord};
/// use vessel_trace::{trace_skeleton, TraceParams};
///
/// let mut mask = ScalarVolume::new(VolumeDims::new(5, 5, 5));
/// for x in 0..5 {
///     mask.set(VoxelCoord::new(x, 2, 2), 1);
/// }
///
/// let (tree, report) = trace_skeleton(&mask, &TraceParams::default());
/// assert_eq!(tree.node_count(), 5);
/// assert_eq!(tree.branch_count(), 1);
/// assert_eq!(report.roots_started, 1);
/// ```
#[must_use]
pub fn trace_skeleton(volume: &ScalarVolume, params: &TraceParams) -> (VesselTree, TraceReport) {
    let mut seeds: Vec<VoxelCoord> = volume.positive_voxels().collect();

    info!(
        skeleton_voxels = seeds.len(),
        seeded = params.seed.is_some(),
        "Tracing skeleton"
    );

    if let Some(seed) = params.seed {
        // Keep only the candidate nearest to the requested location;
        // unconnected skeleton parts are disregarded.
        let nearest = seeds
            .iter()
            .copied()
            .min_by_key(|candidate| candidate.distance_squared(seed));
        seeds.clear();
        seeds.extend(nearest);
    }

    let mut mask = volume.clone();
    let mut tree = VesselTree::new();
    let mut report = TraceReport::default();

    for seed in seeds {
        // A seed claimed by an earlier root must not start a second,
        // overlapping tree.
        if !mask.is_positive(seed) {
            continue;
        }
        report.roots_started += 1;
        trace_from_seed(&mut mask, &mut tree, seed);
    }

    report.nodes_created = tree.node_count();
    report.branches_created = tree.branch_count();
    report.voxels_visited = tree.node_count();

    debug!("{report}");
    (tree, report)
}

/// Grow one tree from `seed`, consuming mask voxels as it goes.
fn trace_from_seed(mask: &mut ScalarVolume, tree: &mut VesselTree, seed: VoxelCoord) {
    #[allow(clippy::cast_possible_truncation)]
    // Node indices are u32 throughout the graph model
    let seed_index = tree.nodes.len() as u32;
    tree.nodes.push(voxel_node(seed, 0));
    mask.set(seed, 0);

    let mut stack: Vec<Frame> = vec![Frame {
        node: seed_index,
        next: 1,
    }];
    let mut branch: Vec<u32> = vec![seed_index];

    while let Some(&frame) = stack.last() {
        if frame.next >= NEIGHBOR_SCAN_ORDER.len() {
            // Every neighbor of this node is claimed; the branch under
            // construction ends here.
            stack.pop();
            if !branch.is_empty() {
                let last = branch[branch.len() - 1];
                if branch.len() > 1 || tree.nodes[last as usize].degree < 1 {
                    tree.branches.push(Branch::from_indices(branch.clone()));
                }
                branch.clear();
            }
            continue;
        }

        // Backtracked onto a bifurcation: the node reopens the branch.
        if branch.is_empty() {
            branch.push(frame.node);
        }

        let center = node_voxel(&tree.nodes[frame.node as usize]);
        let mut advanced = false;
        for n in frame.next..NEIGHBOR_SCAN_ORDER.len() {
            let candidate = center.offset(NEIGHBOR_SCAN_ORDER[n]);
            if mask.is_positive(candidate) {
                mask.set(candidate, 0);
                // The claimed offset is rescanned on resume; the voxel
                // is zero by then, so the scan moves past it.
                if let Some(top) = stack.last_mut() {
                    top.next = n;
                }

                let parent = branch[branch.len() - 1];
                tree.nodes[parent as usize].degree += 1;
                #[allow(clippy::cast_possible_truncation)]
                let index = tree.nodes.len() as u32;
                tree.nodes.push(voxel_node(candidate, 1));
                branch.push(index);
                stack.push(Frame {
                    node: index,
                    next: 1,
                });
                advanced = true;
                break;
            }
        }
        if !advanced {
            if let Some(top) = stack.last_mut() {
                top.next = NEIGHBOR_SCAN_ORDER.len();
            }
        }
    }
}

fn voxel_node(coord: VoxelCoord, degree: u32) -> VesselNode {
    let mut node = VesselNode::new(coord.to_point());
    node.degree = degree;
    node
}

/// Voxel coordinate a node was created at. Valid only while the graph
/// is in index space, where positions are whole numbers.
fn node_voxel(node: &VesselNode) -> VoxelCoord {
    #[allow(clippy::cast_possible_truncation)]
    VoxelCoord::new(
        node.position.x as i32,
        node.position.y as i32,
        node.position.z as i32,
    )
}

/// Rescale node positions from voxel indices to physical units.
///
/// Every coordinate is multiplied by the per-axis spacing of `volume`.
/// Radii are reset to the unknown sentinel, since any value estimated
/// in index space is meaningless after the rescale.
///
/// # Example
///
/// ```
/// use nalgebra::Vector3;
/// use vf_volume::{ScalarVolume, VolumeDims, VoxelCoord};
/// use vessel_trace::{to_metric_space, trace_skeleton, TraceParams};
///
/// let dims = VolumeDims::new(4, 4, 4);
/// let mut mask = ScalarVolume::with_spacing(dims, Vector3::new(0.5, 0.5, 2.0)).unwrap();
/// mask.set(VoxelCoord::new(2, 0, 1), 1);
///
/// let (mut tree, _) = trace_skeleton(&mask, &TraceParams::default());
/// to_metric_space(&mut tree, &mask);
/// assert_eq!(tree.nodes[0].position.x, 1.0);
/// assert_eq!(tree.nodes[0].position.z, 2.0);
/// ```
pub fn to_metric_space(tree: &mut VesselTree, volume: &ScalarVolume) {
    let spacing = volume.spacing();
    for node in &mut tree.nodes {
        node.position.x *= spacing.x;
        node.position.y *= spacing.y;
        node.position.z *= spacing.z;
        node.radius = RADIUS_UNKNOWN;
    }
}
