//! Fixed 26-neighborhood scan order.

/// Scan order over a voxel's 3x3x3 neighborhood.
///
/// Entry 0 is the center voxel; entries 1-6 are the face neighbors,
/// 7-18 the edge neighbors and 19-26 the corner neighbors. Each entry is
/// a `[dx, dy, dz]` offset.
///
/// The order is load-bearing: the skeleton tracer claims the first
/// positive neighbor in this sequence, so on multiply-connected voxels
/// the table decides which branch is followed first. Traversals that
/// suspend and resume store an index into this table and continue from
/// it, which is why the table (including the center entry) is exposed
/// rather than a neighbor iterator.
pub const NEIGHBOR_SCAN_ORDER: [[i32; 3]; 27] = [
    [0, 0, 0],
    // face neighbors
    [0, 0, 1],
    [0, 0, -1],
    [0, 1, 0],
    [0, -1, 0],
    [1, 0, 0],
    [-1, 0, 0],
    // edge neighbors
    [0, 1, 1],
    [0, 1, -1],
    [0, -1, 1],
    [0, -1, -1],
    [1, 1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [1, 0, -1],
    [-1, 0, 1],
    [-1, 0, -1],
    // corner neighbors
    [1, 1, 1],
    [1, 1, -1],
    [1, -1, 1],
    [1, -1, -1],
    [-1, 1, 1],
    [-1, 1, -1],
    [-1, -1, 1],
    [-1, -1, -1],
];
