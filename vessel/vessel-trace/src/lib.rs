//! Skeleton tracing for VesselForge.
//!
//! This crate turns a thinned binary skeleton volume into an explicit
//! centerline graph:
//!
//! - [`trace_skeleton`] - Flood-fill traversal emitting nodes and branches
//! - [`to_metric_space`] - Voxel-index to physical-space conversion
//! - [`TraceParams`] - Seed selection
//! - [`TraceReport`] - Run statistics
//!
//! # Algorithm
//!
//! The tracer walks the 26-connected skeleton depth-first with an
//! explicit stack of (node, resume-offset) frames. Neighbors are probed
//! in a fixed priority order (faces, then edges, then corners), each
//! claimed voxel is zeroed immediately and becomes a node, and a branch
//! is committed whenever a walk dead-ends. The fixed order makes the
//! output deterministic: the same mask always yields the same node and
//! branch sequence.
//!
//! The produced graph is raw: branches may still stop at plain
//! pass-through nodes. Downstream consumers run connectivity correction
//! (the `vessel-repair` crate) before relying on segmentation
//! invariants.
//!
//! # Example
//!
//! ```
//! use vf_volume::{ScalarVolume, VolumeDims, VoxelCoord};
//! use vessel_trace::{trace_skeleton, TraceParams};
//!
//! let mut mask = ScalarVolume::new(VolumeDims::new(5, 5, 5));
//! for x in 0..5 {
//!     mask.set(VoxelCoord::new(x, 2, 2), 1);
//! }
//!
//! let (tree, report) = trace_skeleton(&mask, &TraceParams::default());
//! assert_eq!(tree.node_count(), 5);
//! assert_eq!(report.branches_created, 1);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod params;
mod report;
mod trace;

pub use params::TraceParams;
pub use report::TraceReport;
pub use trace::{to_metric_space, trace_skeleton};
