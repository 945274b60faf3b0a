//! Parameters for skeleton tracing.

use vf_volume::VoxelCoord;

/// Parameters for skeleton tracing.
#[derive(Debug, Clone, Default)]
pub struct TraceParams {
    /// Optional seed location in voxel-index space. When set, tracing
    /// starts only from the positive voxel nearest to it and skeleton
    /// parts not reachable from there are left out. When unset, every
    /// positive voxel is a root candidate and disconnected skeleton
    /// parts become separate trees of a forest.
    pub seed: Option<VoxelCoord>,
}

impl TraceParams {
    /// Create default parameters: no seed, trace the whole skeleton.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: None }
    }

    /// Create params tracing the single tree nearest to `seed`.
    #[must_use]
    pub const fn with_seed(seed: VoxelCoord) -> Self {
        Self { seed: Some(seed) }
    }
}
