//! Error types for volume construction.

use thiserror::Error;

/// Result type for volume operations.
pub type VolumeResult<T> = Result<T, VolumeError>;

/// Errors that can occur when constructing a volume.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VolumeError {
    /// One or more volume dimensions is zero.
    #[error("volume dimensions must be positive, got {nx}x{ny}x{nz}")]
    InvalidDimensions {
        /// Extent along x.
        nx: u32,
        /// Extent along y.
        ny: u32,
        /// Extent along z.
        nz: u32,
    },

    /// Voxel spacing is not positive and finite on every axis.
    #[error("voxel spacing must be positive and finite, got [{x}, {y}, {z}]")]
    InvalidSpacing {
        /// Spacing along x.
        x: f64,
        /// Spacing along y.
        y: f64,
        /// Spacing along z.
        z: f64,
    },

    /// Raw data length does not match the volume dimensions.
    #[error("data length {got} does not match dimensions, expected {expected}")]
    DataLength {
        /// Voxel count implied by the dimensions.
        expected: usize,
        /// Length of the supplied buffer.
        got: usize,
    },
}
