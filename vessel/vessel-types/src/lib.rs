//! Core vessel-graph types for VesselForge.
//!
//! This crate provides the foundational types for centerline-graph
//! processing:
//!
//! - [`VesselNode`] - A centerline point with degree and radius
//! - [`Branch`] - An ordered path of node indices
//! - [`VesselTree`] - The indexed node/branch graph
//!
//! # Data Model
//!
//! Nodes live in a single growable vector; a node's identity is its
//! index. Branches reference nodes by `u32` index and never own them, so
//! bifurcations and shared endpoints are simply the same index appearing
//! in several branches. The graph owns everything; cloning a
//! [`VesselTree`] snapshots the whole state.
//!
//! A node's `radius` is its estimated cross-section radius in physical
//! units; [`RADIUS_UNKNOWN`] (-1.0) marks a radius that has not been
//! estimated or could not be.
//!
//! Structural edit operations ([`VesselTree::remove_node`],
//! [`VesselTree::split_node`], [`VesselTree::split_branch`], ...) keep
//! every branch reference consistent, but they do not re-normalize the
//! graph; topology invariants (deduplicated nodes, fused degree-2
//! junctions) are restored by the repair crate.
//!
//! # Example
//!
//! ```
//! use vessel_types::{Branch, VesselNode, VesselTree};
//! use nalgebra::Point3;
//!
//! let mut tree = VesselTree::new();
//! tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
//! tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
//! tree.branches.push(Branch::from_indices(vec![0, 1]));
//!
//! assert_eq!(tree.node_count(), 2);
//! assert_eq!(tree.node_index(0, 1), Some(1));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod branch;
mod error;
mod node;
mod tree;

pub use branch::Branch;
pub use error::{TreeError, TreeResult};
pub use node::{VesselNode, RADIUS_UNKNOWN};
pub use tree::VesselTree;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
