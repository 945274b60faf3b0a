//! Cross-section diameter estimation for vessel centerline graphs.
//!
//! This crate provides tools for:
//! - Icosahedral sphere subdivision ([`SphereSampling`]) giving
//!   deterministic, evenly spread ray directions
//! - Ray-cast boundary sampling with principal-component radius
//!   estimation ([`estimate_diameters`], [`estimate_node`])
//! - A clearance-based fallback estimator ([`estimate_by_clearance`])
//!
//! The main estimator casts rays from every node of a metric-space
//! tree through the binary occupancy volume, collects the boundary
//! exit points, and derives the radius from the two smaller principal
//! components of that cloud. The largest component follows the
//! vessel's long axis and is discarded.
//!
//! # Example
//!
//! ```
//! use vessel_diameter::{DiameterParams, SphereSampling};
//!
//! // 92 directions at the default subdivision level
//! let sphere = SphereSampling::new(2);
//! assert_eq!(sphere.vertex_count(), 92);
//!
//! let params = DiameterParams::default();
//! assert_eq!(params.gamma, 4.0);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod clearance;
mod estimate;
pub mod icosphere;
mod params;
mod report;

pub use clearance::estimate_by_clearance;
pub use estimate::{RayDirections, estimate_diameters, estimate_node};
pub use icosphere::SphereSampling;
pub use params::{DiameterParams, DirectionMode};
pub use report::DiameterReport;
