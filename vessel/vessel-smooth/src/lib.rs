//! Spring relaxation smoothing for vessel centerline graphs.
//!
//! This crate provides tools for:
//! - Geometric relaxation of node positions ([`smooth_positions`])
//! - Scalar relaxation of node radii ([`smooth_radii`])
//!
//! Both solvers balance an anchor force toward the original values
//! against neighbor-coupling forces along the graph, run a fixed number
//! of synchronous steps, and finish with a short annealing phase of
//! linearly decaying coefficients. Traced centerlines carry voxel
//! staircase noise and per-node diameter estimates jitter; relaxation
//! removes both without moving the graph far from the data.
//!
//! # Example
//!
//! ```
//! use vessel_types::{VesselNode, VesselTree};
//! use vessel_smooth::{smooth_positions, smooth_radii, SmoothParams};
//!
//! let mut tree = VesselTree::new();
//! tree.add_branch(vec![
//!     VesselNode::from_coords(0.0, 0.0, 0.0).with_radius(2.0),
//!     VesselNode::from_coords(1.0, 1.0, 0.0).with_radius(6.0),
//!     VesselNode::from_coords(2.0, 0.0, 0.0).with_radius(2.0),
//! ]).unwrap();
//!
//! let params = SmoothParams::default();
//! let (tree, _) = smooth_positions(&tree, &params);
//! let (tree, _) = smooth_radii(&tree, &params);
//! assert!(tree.nodes[1].position.y < 1.0);
//! assert!(tree.nodes[1].radius < 6.0);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod adjacency;
mod params;
mod position;
mod radius;
mod report;
mod schedule;

pub use params::SmoothParams;
pub use position::smooth_positions;
pub use radius::smooth_radii;
pub use report::SmoothReport;
