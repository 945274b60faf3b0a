//! Vessel centerline extraction toolkit.
//!
//! This umbrella crate re-exports the vessel-* family, providing a
//! unified API for turning a binary occupancy volume (a segmented
//! angiogram, a thinned skeleton mask) into a measured, cleaned-up
//! centerline graph.
//!
//! # Quick Start
//!
//! ```
//! use vessel::prelude::*;
//!
//! // A thinned segmentation mask (here: a straight 5-voxel vessel)
//! let mut volume = ScalarVolume::new(VolumeDims::new(5, 3, 3));
//! for x in 0..5 {
//!     volume.set(VoxelCoord::new(x, 1, 1), 1);
//! }
//!
//! // Trace the skeleton into a graph
//! let (mut tree, _) = trace_skeleton(&volume, &TraceParams::default());
//! to_metric_space(&mut tree, &volume);
//!
//! // Clean up the topology
//! let _ = correct_connectivity(&mut tree, &RepairParams::default());
//!
//! // Smooth the geometry
//! let (tree, _) = smooth_positions(&tree, &SmoothParams::default());
//! assert_eq!(tree.node_count(), 5);
//! ```
//!
//! # Module Organization
//!
//! - [`volume`] - Binary occupancy volumes: `ScalarVolume`, `VoxelCoord`
//! - [`types`] - Core graph structures: `VesselTree`, `VesselNode`, `Branch`
//! - [`trace`] - Skeleton flood-fill tracing into branch graphs
//! - [`repair`] - Connectivity correction and branch restructuring
//! - [`diameter`] - Ray-cast cross-section diameter estimation
//! - [`smooth`] - Spring relaxation of positions and radii
//! - [`io`] - TreeSkeleton2014 text persistence

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

/// Binary occupancy volumes: `ScalarVolume`, `VoxelCoord`, `VolumeDims`.
pub use vf_volume as volume;

/// Core graph structures: `VesselTree`, `VesselNode`, `Branch`.
pub use vessel_types as types;

/// Skeleton flood-fill tracing into branch graphs.
pub use vessel_trace as trace;

/// Connectivity correction and branch restructuring.
pub use vessel_repair as repair;

/// Ray-cast cross-section diameter estimation.
pub use vessel_diameter as diameter;

/// Spring relaxation of positions and radii.
pub use vessel_smooth as smooth;

/// TreeSkeleton2014 text persistence.
pub use vessel_io as io;

/// Common imports for centerline extraction.
///
/// # Usage
///
/// ```
/// use vessel::prelude::*;
/// ```
pub mod prelude {
    // Volumes
    pub use vf_volume::{ScalarVolume, VolumeDims, VoxelCoord};

    // Core types
    pub use vessel_types::{Branch, VesselNode, VesselTree, RADIUS_UNKNOWN};

    // Tracing
    pub use vessel_trace::{TraceParams, to_metric_space, trace_skeleton};

    // Repair
    pub use vessel_repair::{RepairParams, correct_connectivity};

    // Diameters
    pub use vessel_diameter::{DiameterParams, estimate_diameters};

    // Smoothing
    pub use vessel_smooth::{SmoothParams, smooth_positions, smooth_radii};

    // Persistence
    pub use vessel_io::{TreeFormat, load_tree, save_tree};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let tree = VesselTree::new();
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.branch_count(), 0);
    }

    #[test]
    fn test_module_reexports() {
        let _ = types::VesselTree::new();
        let _ = repair::RepairParams::default();
        let _ = diameter::DiameterParams::default();
        let _ = smooth::SmoothParams::default();
    }
}
