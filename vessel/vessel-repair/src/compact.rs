//! Node-array compaction.
//!
//! Removal passes mark nodes for deletion first and renumber in a single
//! pass here, so branch references are rewritten exactly once per pass.

use vessel_types::VesselTree;

/// Drop every node whose `keep` entry is `false` and renumber all branch
/// references to the compacted node array.
///
/// Branch references must already point at kept nodes; callers that merge
/// nodes redirect references before compacting. Entries beyond the end of
/// `keep` are treated as kept.
///
/// Returns the number of nodes removed.
///
/// # Example
///
/// ```
/// use vessel_types::{VesselNode, VesselTree};
/// use vessel_repair::compact_nodes;
///
/// let mut tree = VesselTree::new();
/// tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
/// tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0)); // unused
/// tree.nodes.push(VesselNode::from_coords(2.0, 0.0, 0.0));
/// tree.branches.push(vessel_types::Branch::from_indices(vec![0, 2]));
///
/// let removed = compact_nodes(&mut tree, &[true, false, true]);
/// assert_eq!(removed, 1);
/// assert_eq!(tree.branches[0].nodes, vec![0, 1]);
/// ```
pub fn compact_nodes(tree: &mut VesselTree, keep: &[bool]) -> usize {
    let node_count = tree.nodes.len();
    let mut new_index: Vec<u32> = Vec::with_capacity(node_count);
    let mut kept = 0u32;
    for i in 0..node_count {
        new_index.push(kept);
        if keep.get(i).copied().unwrap_or(true) {
            kept += 1;
        }
    }

    let removed = node_count - kept as usize;
    if removed == 0 {
        return 0;
    }

    let mut i = 0;
    tree.nodes.retain(|_| {
        let k = keep.get(i).copied().unwrap_or(true);
        i += 1;
        k
    });

    for branch in &mut tree.branches {
        for index in &mut branch.nodes {
            *index = new_index[*index as usize];
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_types::{Branch, VesselNode, VesselTree};

    fn tree_with_nodes(count: usize) -> VesselTree {
        let mut tree = VesselTree::new();
        for i in 0..count {
            tree.nodes.push(VesselNode::from_coords(i as f64, 0.0, 0.0));
        }
        tree
    }

    #[test]
    fn keep_all_is_noop() {
        let mut tree = tree_with_nodes(3);
        tree.branches.push(Branch::from_indices(vec![0, 1, 2]));

        let removed = compact_nodes(&mut tree, &[true, true, true]);

        assert_eq!(removed, 0);
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.branches[0].nodes, vec![0, 1, 2]);
    }

    #[test]
    fn drops_and_renumbers() {
        let mut tree = tree_with_nodes(5);
        tree.branches.push(Branch::from_indices(vec![0, 2, 4]));

        let removed = compact_nodes(&mut tree, &[true, false, true, false, true]);

        assert_eq!(removed, 2);
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.branches[0].nodes, vec![0, 1, 2]);
        assert_eq!(tree.nodes[1].position.x, 2.0);
        assert_eq!(tree.nodes[2].position.x, 4.0);
    }

    #[test]
    fn short_keep_slice_keeps_tail() {
        let mut tree = tree_with_nodes(4);
        tree.branches.push(Branch::from_indices(vec![1, 2, 3]));

        let removed = compact_nodes(&mut tree, &[false]);

        assert_eq!(removed, 1);
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.branches[0].nodes, vec![0, 1, 2]);
    }

    #[test]
    fn drop_everything() {
        let mut tree = tree_with_nodes(2);

        let removed = compact_nodes(&mut tree, &[false, false]);

        assert_eq!(removed, 2);
        assert!(tree.nodes.is_empty());
    }
}
