//! Voxel coordinate type.

use nalgebra::{Point3, Vector3};

/// A discrete 3D coordinate in voxel space.
///
/// Uses `i32` components so that neighborhood offsets can step outside
/// the volume at its border; volume accessors treat such coordinates as
/// out of bounds rather than wrapping.
///
/// # Example
///
/// ```
/// use vf_volume::VoxelCoord;
///
/// let coord = VoxelCoord::new(1, 2, 3);
/// assert_eq!(coord.offset([0, 0, -1]), VoxelCoord::new(1, 2, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelCoord {
    /// X index (fastest-varying axis in linear storage).
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index (slowest-varying axis in linear storage).
    pub z: i32,
}

impl VoxelCoord {
    /// Creates a new voxel coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Creates a coordinate at the origin (0, 0, 0).
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns this coordinate displaced by a `[dx, dy, dz]` offset.
    ///
    /// # Example
    ///
    /// ```
    /// use vf_volume::VoxelCoord;
    ///
    /// let coord = VoxelCoord::new(5, 5, 5);
    /// assert_eq!(coord.offset([1, -1, 0]), VoxelCoord::new(6, 4, 5));
    /// ```
    #[must_use]
    pub const fn offset(self, delta: [i32; 3]) -> Self {
        Self::new(
            self.x.wrapping_add(delta[0]),
            self.y.wrapping_add(delta[1]),
            self.z.wrapping_add(delta[2]),
        )
    }

    /// Squared Euclidean distance to another coordinate, in index units.
    ///
    /// Exact integer arithmetic, used for nearest-seed selection.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dy * dy + dz * dz
    }

    /// Converts to a floating-point point.
    #[must_use]
    pub fn to_point(self) -> Point3<f64> {
        Point3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Converts to a floating-point vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Returns the coordinate as an array.
    #[must_use]
    pub const fn as_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[i32; 3]> for VoxelCoord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}
