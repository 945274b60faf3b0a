//! Centerline node type.

use nalgebra::Point3;

/// Sentinel radius for a node whose cross-section has not been estimated.
pub const RADIUS_UNKNOWN: f64 = -1.0;

/// A point on the vessel centerline.
///
/// `degree` counts the branch links touching the node (1 for a leaf, 2
/// for a pass-through node, 3 or more for a bifurcation). It is
/// maintained by the topology operations, not by construction.
///
/// # Example
///
/// ```
/// use vessel_types::VesselNode;
///
/// let node = VesselNode::from_coords(1.0, 2.0, 3.0);
/// assert_eq!(node.degree, 0);
/// assert!(!node.has_radius());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VesselNode {
    /// Position, in voxel-index or physical space depending on the
    /// pipeline stage.
    pub position: Point3<f64>,
    /// Number of branch links touching this node.
    pub degree: u32,
    /// Estimated cross-section radius, [`RADIUS_UNKNOWN`] if not known.
    pub radius: f64,
}

impl VesselNode {
    /// Creates a node at a position with zero degree and unknown radius.
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            degree: 0,
            radius: RADIUS_UNKNOWN,
        }
    }

    /// Creates a node from coordinates.
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Sets the radius, builder style.
    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Whether the radius has been estimated.
    ///
    /// Any non-negative radius counts as known; estimation failures store
    /// 0.0, which is "known to be degenerate" rather than unknown.
    #[must_use]
    pub fn has_radius(&self) -> bool {
        self.radius >= 0.0
    }
}

impl Default for VesselNode {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}
