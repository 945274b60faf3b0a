//! End-to-end extraction pipeline: synthetic volume through tracing,
//! repair, diameter estimation, smoothing, and persistence.

use approx::assert_relative_eq;
use vessel::prelude::*;
use vessel::repair::component_count;
use vessel::trace::TraceReport;

/// Solid cylinder of radius `r` along z with its voxel-wide centerline
/// as a separate skeleton mask.
fn cylinder_fixture(r: f64) -> (ScalarVolume, ScalarVolume) {
    let dims = VolumeDims::new(16, 16, 40);
    let mut filled = ScalarVolume::new(dims);
    let mut skeleton = ScalarVolume::new(dims);

    for z in 0..40 {
        skeleton.set(VoxelCoord::new(8, 8, z), 1);
        for y in 0..16 {
            for x in 0..16 {
                let dx = f64::from(x) - 8.0;
                let dy = f64::from(y) - 8.0;
                if dx * dx + dy * dy <= r * r {
                    filled.set(VoxelCoord::new(x, y, z), 1);
                }
            }
        }
    }
    (filled, skeleton)
}

#[test]
fn test_straight_vessel_full_pipeline() {
    let r = 4.0;
    let (filled, skeleton) = cylinder_fixture(r);

    // trace the skeleton in voxel-index space
    let (mut tree, report) = trace_skeleton(&skeleton, &TraceParams::default());
    assert_eq!(report.nodes_created, 40);
    assert_eq!(report.branches_created, 1);
    assert_eq!(component_count(&tree), 1);

    // convert to metric space and clean up
    to_metric_space(&mut tree, &skeleton);
    correct_connectivity(&mut tree, &RepairParams::default()).unwrap();
    assert_eq!(tree.node_count(), 40);

    // estimate diameters against the filled volume
    let (tree, diameters) = estimate_diameters(&tree, &filled, &DiameterParams::default());
    assert_eq!(diameters.nodes_estimated, 40);
    // away from the caps the estimate tracks the cylinder radius
    for node in &tree.nodes {
        if (10.0..30.0).contains(&node.position.z) {
            assert_relative_eq!(node.radius, r, max_relative = 0.25);
        }
    }

    // relax geometry and radii with the default schedule
    let (tree, position_report) = smooth_positions(&tree, &SmoothParams::default());
    let (tree, radius_report) = smooth_radii(&tree, &SmoothParams::default());
    assert_eq!(position_report.steps, 15);
    assert_eq!(radius_report.steps, 15);

    // a straight centerline stays straight
    for node in &tree.nodes {
        assert_relative_eq!(node.position.x, 8.0, epsilon = 1e-6);
        assert_relative_eq!(node.position.y, 8.0, epsilon = 1e-6);
    }

    // persist and reload
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vessel.txt");
    save_tree(&path, &tree, TreeFormat::Internal).unwrap();
    let loaded = load_tree(&path).unwrap();
    assert_eq!(loaded.node_count(), tree.node_count());
    assert_eq!(loaded.branch_count(), tree.branch_count());
    for (a, b) in tree.nodes.iter().zip(&loaded.nodes) {
        assert_relative_eq!(a.radius, b.radius, epsilon = 1e-9);
    }
}

#[test]
fn test_bifurcation_stays_connected() {
    // Y-shaped skeleton: stem along x, two arms diverging in y
    let dims = VolumeDims::new(24, 24, 3);
    let mut skeleton = ScalarVolume::new(dims);
    for x in 0..10 {
        skeleton.set(VoxelCoord::new(x, 12, 1), 1);
    }
    for i in 0..10 {
        skeleton.set(VoxelCoord::new(10 + i, 12 + i, 1), 1);
        skeleton.set(VoxelCoord::new(10 + i, 12 - i, 1), 1);
    }

    let (mut tree, report) = trace_skeleton(&skeleton, &TraceParams::default());
    assert_eq!(report.roots_started, 1);
    assert!(report.branches_created >= 2);
    assert_eq!(component_count(&tree), 1);

    correct_connectivity(&mut tree, &RepairParams::default()).unwrap();
    assert_eq!(component_count(&tree), 1);

    // exactly one node carries a degree above 2
    let junctions = tree.nodes.iter().filter(|n| n.degree > 2).count();
    assert_eq!(junctions, 1);
}

#[test]
fn test_seeded_trace_selects_one_component() {
    let dims = VolumeDims::new(20, 5, 5);
    let mut skeleton = ScalarVolume::new(dims);
    // two separate segments
    for x in 0..5 {
        skeleton.set(VoxelCoord::new(x, 2, 2), 1);
    }
    for x in 12..20 {
        skeleton.set(VoxelCoord::new(x, 2, 2), 1);
    }

    let all: (VesselTree, TraceReport) = trace_skeleton(&skeleton, &TraceParams::default());
    assert_eq!(all.0.node_count(), 13);
    assert_eq!(component_count(&all.0), 2);

    let seeded = trace_skeleton(&skeleton, &TraceParams::with_seed(VoxelCoord::new(19, 2, 2)));
    assert_eq!(seeded.0.node_count(), 8);
    assert_eq!(component_count(&seeded.0), 1);
}
