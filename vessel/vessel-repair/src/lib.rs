//! Repair operations for vessel centerline graphs.
//!
//! This crate provides tools for:
//! - Degree recomputation and empty-branch cleanup
//! - Isolated node removal
//! - Node welding (merge coincident nodes)
//! - Duplicate branch reference stripping
//! - Pass-through branch fusion
//! - Branch restructuring (short-branch and long-branch rebuilds)
//! - Connected component analysis
//!
//! # Example
//!
//! ```
//! use vessel_types::{Branch, VesselNode, VesselTree};
//! use vessel_repair::{correct_connectivity, RepairParams};
//!
//! // Two chains that meet at the same position with distinct nodes
//! let mut tree = VesselTree::new();
//! tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
//! tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
//! tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
//! tree.nodes.push(VesselNode::from_coords(2.0, 0.0, 0.0));
//! tree.branches.push(Branch::from_indices(vec![0, 1]));
//! tree.branches.push(Branch::from_indices(vec![2, 3]));
//!
//! let summary = correct_connectivity(&mut tree, &RepairParams::default()).unwrap();
//! assert_eq!(summary.nodes_welded, 1);
//! assert_eq!(tree.branches.len(), 1);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod compact;
pub mod components;
mod connectivity;
mod error;
mod rebuild;

pub use compact::compact_nodes;
pub use components::{ComponentAnalysis, component_count, find_connected_components};
pub use connectivity::{
    RepairParams, RepairSummary, correct_connectivity, fuse_pass_through_branches,
    recompute_degrees, remove_isolated_nodes, strip_duplicate_links, weld_nodes,
};
pub use error::{RepairError, RepairResult};
pub use rebuild::{RebuildSummary, rebuild_long_branches, rebuild_short_branches};
