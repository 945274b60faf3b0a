//! Dense voxel volume types for VesselForge.
//!
//! This crate provides the volume collaborator shared by the skeleton
//! tracer and the diameter estimator:
//!
//! - [`VoxelCoord`] - A discrete 3D voxel index
//! - [`VolumeDims`] - Integer volume extents with linear indexing
//! - [`ScalarVolume`] - A dense `u8` occupancy/intensity volume with
//!   per-axis physical spacing
//! - [`NEIGHBOR_SCAN_ORDER`] - The fixed 26-neighborhood priority table
//!
//! The volume is deliberately dense: skeleton masks are read and cleared
//! exhaustively, so a flat buffer with x-fastest linear indexing is the
//! right storage. Voxel values are `u8` with zero meaning background and
//! any positive value meaning occupied.
//!
//! # Coordinate System
//!
//! Voxel indices are `i32` so that neighborhood offsets can go negative
//! at the volume border; all out-of-range reads simply return `None`.
//! World positions are voxel indices scaled by the per-axis spacing.
//!
//! # Example
//!
//! ```
//! use vf_volume::{ScalarVolume, VolumeDims, VoxelCoord};
//!
//! let mut volume = ScalarVolume::new(VolumeDims::new(8, 8, 8));
//! volume.set(VoxelCoord::new(3, 4, 5), 1);
//!
//! assert_eq!(volume.get(VoxelCoord::new(3, 4, 5)), Some(1));
//! assert_eq!(volume.get(VoxelCoord::new(-1, 0, 0)), None);
//! assert!(volume.is_positive(VoxelCoord::new(3, 4, 5)));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod neighborhood;
mod volume;
mod voxel;

pub use error::{VolumeError, VolumeResult};
pub use neighborhood::NEIGHBOR_SCAN_ORDER;
pub use volume::{ScalarVolume, VolumeDims};
pub use voxel::VoxelCoord;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
