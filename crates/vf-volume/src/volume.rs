//! Dense scalar volume storage.

use nalgebra::Vector3;

use crate::error::{VolumeError, VolumeResult};
use crate::voxel::VoxelCoord;

/// Integer extents of a volume with linear indexing.
///
/// Linear storage is x-fastest: index = x + y * nx + z * nx * ny.
///
/// # Example
///
/// ```
/// use vf_volume::{VolumeDims, VoxelCoord};
///
/// let dims = VolumeDims::new(4, 3, 2);
/// assert_eq!(dims.voxel_count(), 24);
/// assert_eq!(dims.index_of(VoxelCoord::new(1, 2, 0)), Some(9));
/// assert_eq!(dims.index_of(VoxelCoord::new(4, 0, 0)), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeDims {
    /// Extent along x.
    pub nx: u32,
    /// Extent along y.
    pub ny: u32,
    /// Extent along z.
    pub nz: u32,
}

impl VolumeDims {
    /// Creates new volume dimensions.
    #[must_use]
    pub const fn new(nx: u32, ny: u32, nz: u32) -> Self {
        Self { nx, ny, nz }
    }

    /// Total number of voxels.
    #[must_use]
    pub const fn voxel_count(&self) -> usize {
        self.nx as usize * self.ny as usize * self.nz as usize
    }

    /// Whether the coordinate lies inside the volume.
    #[must_use]
    pub const fn contains(&self, coord: VoxelCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.nx
            && (coord.y as u32) < self.ny
            && (coord.z as u32) < self.nz
    }

    /// Linear index of a coordinate, or `None` when out of bounds.
    #[must_use]
    pub fn index_of(&self, coord: VoxelCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        #[allow(clippy::cast_sign_loss)]
        // Sign checked by contains above
        let (x, y, z) = (coord.x as usize, coord.y as usize, coord.z as usize);
        Some(x + y * self.nx as usize + z * self.nx as usize * self.ny as usize)
    }

    /// Coordinate of a linear index, or `None` when out of range.
    #[must_use]
    pub fn coord_at(&self, index: usize) -> Option<VoxelCoord> {
        if index >= self.voxel_count() {
            return None;
        }
        let nx = self.nx as usize;
        let ny = self.ny as usize;
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        // Extents fit in i32 by construction
        Some(VoxelCoord::new(
            (index % nx) as i32,
            ((index / nx) % ny) as i32,
            (index / (nx * ny)) as i32,
        ))
    }
}

/// A dense 3D `u8` volume with per-axis physical spacing.
///
/// Zero voxels are background; positive voxels are occupied. The tracer
/// consumes skeleton masks by writing zeros; the diameter estimator reads
/// an occupancy volume without modifying it.
///
/// # Example
///
/// ```
/// use vf_volume::{ScalarVolume, VolumeDims, VoxelCoord};
/// use nalgebra::Vector3;
///
/// let dims = VolumeDims::new(10, 10, 10);
/// let mut volume = ScalarVolume::with_spacing(dims, Vector3::new(0.5, 0.5, 1.0)).unwrap();
/// volume.set(VoxelCoord::new(2, 2, 2), 255);
///
/// assert_eq!(volume.spacing().z, 1.0);
/// assert!(volume.is_positive(VoxelCoord::new(2, 2, 2)));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarVolume {
    dims: VolumeDims,
    spacing: Vector3<f64>,
    data: Vec<u8>,
}

impl ScalarVolume {
    /// Creates a zero-filled volume with unit spacing.
    #[must_use]
    pub fn new(dims: VolumeDims) -> Self {
        Self {
            dims,
            spacing: Vector3::new(1.0, 1.0, 1.0),
            data: vec![0; dims.voxel_count()],
        }
    }

    /// Creates a zero-filled volume with the given spacing.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidDimensions`] if any extent is zero,
    /// or [`VolumeError::InvalidSpacing`] if any spacing component is not
    /// positive and finite.
    pub fn with_spacing(dims: VolumeDims, spacing: Vector3<f64>) -> VolumeResult<Self> {
        Self::validate(dims, spacing)?;
        Ok(Self {
            dims,
            spacing,
            data: vec![0; dims.voxel_count()],
        })
    }

    /// Creates a volume from raw voxel data in x-fastest linear order.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::DataLength`] if the buffer length does not
    /// match the dimensions, plus the validation errors of
    /// [`ScalarVolume::with_spacing`].
    pub fn from_raw(dims: VolumeDims, spacing: Vector3<f64>, data: Vec<u8>) -> VolumeResult<Self> {
        Self::validate(dims, spacing)?;
        if data.len() != dims.voxel_count() {
            return Err(VolumeError::DataLength {
                expected: dims.voxel_count(),
                got: data.len(),
            });
        }
        Ok(Self {
            dims,
            spacing,
            data,
        })
    }

    fn validate(dims: VolumeDims, spacing: Vector3<f64>) -> VolumeResult<()> {
        if dims.nx == 0 || dims.ny == 0 || dims.nz == 0 {
            return Err(VolumeError::InvalidDimensions {
                nx: dims.nx,
                ny: dims.ny,
                nz: dims.nz,
            });
        }
        if !spacing.iter().all(|&s| s.is_finite() && s > 0.0) {
            return Err(VolumeError::InvalidSpacing {
                x: spacing.x,
                y: spacing.y,
                z: spacing.z,
            });
        }
        Ok(())
    }

    /// Volume dimensions.
    #[must_use]
    pub const fn dims(&self) -> VolumeDims {
        self.dims
    }

    /// Per-axis voxel spacing in physical units.
    #[must_use]
    pub const fn spacing(&self) -> Vector3<f64> {
        self.spacing
    }

    /// Whether the coordinate lies inside the volume.
    #[must_use]
    pub const fn contains(&self, coord: VoxelCoord) -> bool {
        self.dims.contains(coord)
    }

    /// Voxel value, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, coord: VoxelCoord) -> Option<u8> {
        self.dims.index_of(coord).map(|i| self.data[i])
    }

    /// Whether the voxel is inside the volume and positive.
    #[must_use]
    pub fn is_positive(&self, coord: VoxelCoord) -> bool {
        self.get(coord).is_some_and(|v| v > 0)
    }

    /// Writes a voxel value. Returns `false` when out of bounds.
    pub fn set(&mut self, coord: VoxelCoord, value: u8) -> bool {
        match self.dims.index_of(coord) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Number of positive voxels.
    #[must_use]
    pub fn positive_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0).count()
    }

    /// Coordinates of all positive voxels, in linear storage order
    /// (x fastest, then y, then z).
    pub fn positive_voxels(&self) -> impl Iterator<Item = VoxelCoord> + '_ {
        self.data.iter().enumerate().filter_map(|(i, &v)| {
            if v > 0 {
                self.dims.coord_at(i)
            } else {
                None
            }
        })
    }

    /// Raw voxel data in x-fastest linear order.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
