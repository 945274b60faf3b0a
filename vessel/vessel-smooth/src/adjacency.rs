//! Neighbor lists derived from branch membership.

use vessel_types::VesselTree;

/// Per-node neighbor lists built from consecutive branch pairs.
///
/// Every adjacent pair within a branch contributes both directions.
/// Duplicates are kept on purpose: a node referenced twice by
/// overlapping branches weighs twice in the neighbor mean, exactly as
/// the solvers expect.
pub(crate) fn build_adjacency(tree: &VesselTree) -> Vec<Vec<u32>> {
    let mut neighbors = vec![Vec::new(); tree.node_count()];
    for branch in &tree.branches {
        for pair in branch.nodes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            neighbors[a as usize].push(b);
            neighbors[b as usize].push(a);
        }
    }
    neighbors
}
