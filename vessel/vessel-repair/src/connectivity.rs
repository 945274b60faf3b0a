//! Connectivity correction for vessel graphs.
//!
//! A freshly traced or freshly loaded graph usually violates the
//! invariants downstream passes rely on: stale degree counts, nodes no
//! branch references, distinct node records sitting on the same
//! position, branches stuttering on a repeated index, and chains split
//! in two at a plain pass-through node. [`correct_connectivity`] fixes
//! all of these in a fixed pass order; the individual passes are also
//! exposed for callers that need finer control.

use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::debug;
use vessel_types::{Branch, VesselTree};

use crate::compact::compact_nodes;
use crate::error::{RepairError, RepairResult};

/// Configuration parameters for connectivity correction.
///
/// # Example
///
/// ```
/// use vessel_repair::RepairParams;
///
/// // Defaults suit voxel-index and millimeter-scale graphs alike
/// let params = RepairParams::default();
///
/// // Or widen the weld box for noisy positions
/// let params = RepairParams::default().with_weld_epsilon(0.01);
/// ```
#[derive(Debug, Clone)]
pub struct RepairParams {
    /// Per-axis distance threshold for welding coincident nodes.
    ///
    /// Two nodes weld when their coordinates differ by at most this
    /// amount on every axis independently (a box test, not Euclidean).
    /// Default: `1e-6`
    pub weld_epsilon: f64,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self { weld_epsilon: 1e-6 }
    }
}

impl RepairParams {
    /// Set the per-axis node welding threshold.
    #[must_use]
    pub fn with_weld_epsilon(mut self, epsilon: f64) -> Self {
        self.weld_epsilon = epsilon;
        self
    }
}

/// Recompute every node degree from the current branch lists.
///
/// Empty branches are dropped first. A branch then contributes one link
/// to its first node, one to its last (when it has more than one node)
/// and two to every interior node. Nodes no branch references end up
/// with degree zero.
///
/// Returns the number of empty branches dropped.
pub fn recompute_degrees(tree: &mut VesselTree) -> usize {
    for node in &mut tree.nodes {
        node.degree = 0;
    }

    let before = tree.branches.len();
    tree.branches.retain(|branch| !branch.is_empty());

    for branch in &tree.branches {
        let len = branch.len();
        tree.nodes[branch.nodes[0] as usize].degree += 1;
        if len > 1 {
            tree.nodes[branch.nodes[len - 1] as usize].degree += 1;
        }
        if len > 2 {
            for &node in &branch.nodes[1..len - 1] {
                tree.nodes[node as usize].degree += 2;
            }
        }
    }

    before - tree.branches.len()
}

/// Remove nodes with degree zero and renumber branch references.
///
/// Degrees must be current (see [`recompute_degrees`]); a zero-degree
/// node is then exactly a node no branch references, so removal never
/// invalidates a reference.
///
/// Returns the number of nodes removed.
pub fn remove_isolated_nodes(tree: &mut VesselTree) -> usize {
    let keep: Vec<bool> = tree.nodes.iter().map(|node| node.degree > 0).collect();
    compact_nodes(tree, &keep)
}

/// Weld nodes that coincide within `epsilon` on all three axes.
///
/// Uses spatial hashing so only nearby candidates are compared. When two
/// nodes weld, the lower-indexed one survives and absorbs the other's
/// degree, every branch reference to the welded node is redirected, and
/// the node array is compacted.
///
/// Returns the number of nodes welded away.
///
/// # Example
///
/// ```
/// use vessel_types::{Branch, VesselNode, VesselTree};
/// use vessel_repair::weld_nodes;
///
/// let mut tree = VesselTree::new();
/// tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
/// tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
/// tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0)); // coincides with node 1
/// tree.branches.push(Branch::from_indices(vec![0, 1]));
/// tree.branches.push(Branch::from_indices(vec![2, 0]));
///
/// let welded = weld_nodes(&mut tree, 1e-6);
/// assert_eq!(welded, 1);
/// assert_eq!(tree.branches[1].nodes, vec![1, 0]);
/// ```
pub fn weld_nodes(tree: &mut VesselTree, epsilon: f64) -> usize {
    let node_count = tree.nodes.len();
    if node_count == 0 {
        return 0;
    }

    // Exact duplicates always share a cell, so any positive size works
    // when epsilon is zero.
    let cell_size = if epsilon > 0.0 { epsilon * 2.0 } else { 1.0 };

    let mut spatial_hash: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (index, node) in tree.nodes.iter().enumerate() {
        let cell = position_cell(&node.position, cell_size);
        spatial_hash.entry(cell).or_default().push(index as u32);
    }

    let mut remap: Vec<u32> = (0..node_count as u32).collect();
    let mut welded = 0usize;

    for index in 0..node_count as u32 {
        if remap[index as usize] != index {
            continue;
        }

        let position = tree.nodes[index as usize].position;
        let cell = position_cell(&position, cell_size);

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor_cell = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                    let Some(candidates) = spatial_hash.get(&neighbor_cell) else {
                        continue;
                    };

                    for &other in candidates {
                        if other <= index || remap[other as usize] != other {
                            continue;
                        }

                        let other_position = tree.nodes[other as usize].position;
                        if (position.x - other_position.x).abs() <= epsilon
                            && (position.y - other_position.y).abs() <= epsilon
                            && (position.z - other_position.z).abs() <= epsilon
                        {
                            let absorbed = tree.nodes[other as usize].degree;
                            tree.nodes[index as usize].degree += absorbed;
                            remap[other as usize] = index;
                            welded += 1;
                        }
                    }
                }
            }
        }
    }

    if welded == 0 {
        return 0;
    }

    for branch in &mut tree.branches {
        for node in &mut branch.nodes {
            *node = remap[*node as usize];
        }
    }

    let keep: Vec<bool> = remap
        .iter()
        .enumerate()
        .map(|(i, &target)| target == i as u32)
        .collect();
    compact_nodes(tree, &keep);

    welded
}

/// Convert a node position to its spatial hash cell.
#[inline]
fn position_cell(position: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (position.x / cell_size).floor() as i64,
        (position.y / cell_size).floor() as i64,
        (position.z / cell_size).floor() as i64,
    )
}

/// Collapse immediately repeated node indices within each branch.
///
/// Welding can leave a branch stuttering on the node that absorbed a
/// neighbor; each run collapses to a single reference. A branch made
/// entirely of one repeated index collapses to a single entry.
///
/// Returns the number of references removed.
pub fn strip_duplicate_links(tree: &mut VesselTree) -> usize {
    let mut removed = 0;
    for branch in &mut tree.branches {
        let before = branch.len();
        branch.nodes.dedup();
        removed += before - branch.len();
    }
    removed
}

/// Fuse branch pairs that meet at an endpoint of degree exactly 2.
///
/// Such a node is a plain pass-through point, so the two branches are
/// really one: the partner is reoriented so the shared node becomes
/// interior and the pair is replaced by the concatenation. The head
/// endpoint is tried first; the tail only when the head is not degree
/// 2. A fused branch is re-examined immediately, so chains collapse in
/// a single call.
///
/// Degrees must be current (see [`recompute_degrees`]).
///
/// Returns the number of fusions performed.
pub fn fuse_pass_through_branches(tree: &mut VesselTree) -> usize {
    let mut fused = 0;
    let mut b = 0;
    while b < tree.branches.len() {
        let (Some(head), Some(tail)) = (tree.branches[b].first(), tree.branches[b].last()) else {
            b += 1;
            continue;
        };

        let (shared, reverse_base) = if tree.nodes[head as usize].degree == 2 {
            (head, true)
        } else if tree.nodes[tail as usize].degree == 2 {
            (tail, false)
        } else {
            b += 1;
            continue;
        };

        let mut partner: Option<(usize, bool)> = None;
        for bb in (b + 1)..tree.branches.len() {
            if tree.branches[bb].first() == Some(shared) {
                partner = Some((bb, false));
                break;
            }
            if tree.branches[bb].last() == Some(shared) {
                partner = Some((bb, true));
                break;
            }
        }
        let Some((bb, partner_reversed)) = partner else {
            b += 1;
            continue;
        };

        let partner_branch = tree.branches.remove(bb);
        let base = &tree.branches[b].nodes;
        let mut merged: Vec<u32> = Vec::with_capacity(base.len() + partner_branch.len());
        if reverse_base {
            merged.extend(base.iter().rev());
        } else {
            merged.extend(base.iter());
        }
        if partner_reversed {
            merged.extend(partner_branch.nodes[..partner_branch.len() - 1].iter().rev());
        } else {
            merged.extend(&partner_branch.nodes[1..]);
        }
        tree.branches[b] = Branch::from_indices(merged);
        fused += 1;
        // leave b in place so the fused branch is re-examined
    }
    fused
}

/// Run the full connectivity correction pipeline.
///
/// Performs, in order:
/// 1. degree recomputation (dropping empty branches),
/// 2. isolated node removal,
/// 3. node welding within `params.weld_epsilon`,
/// 4. duplicate reference stripping,
/// 5. pass-through branch fusion.
///
/// On failure the graph may already be partially corrected; callers
/// must not assume atomicity.
///
/// # Errors
///
/// Returns [`RepairError::EmptyGraph`] when the graph has no nodes or
/// branches at entry, or when nothing survives the first two passes.
///
/// # Example
///
/// ```
/// use vessel_types::{Branch, VesselNode, VesselTree};
/// use vessel_repair::{correct_connectivity, RepairParams};
///
/// let mut tree = VesselTree::new();
/// tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
/// tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
/// tree.branches.push(Branch::from_indices(vec![0, 1]));
///
/// let summary = correct_connectivity(&mut tree, &RepairParams::default()).unwrap();
/// assert!(!summary.had_changes());
/// ```
pub fn correct_connectivity(
    tree: &mut VesselTree,
    params: &RepairParams,
) -> RepairResult<RepairSummary> {
    let initial_nodes = tree.nodes.len();
    let initial_branches = tree.branches.len();
    if initial_branches == 0 || initial_nodes == 0 {
        return Err(RepairError::EmptyGraph {
            nodes: initial_nodes,
            branches: initial_branches,
        });
    }

    let empty_branches_removed = recompute_degrees(tree);
    let isolated_nodes_removed = remove_isolated_nodes(tree);
    if tree.branches.is_empty() || tree.nodes.is_empty() {
        return Err(RepairError::EmptyGraph {
            nodes: tree.nodes.len(),
            branches: tree.branches.len(),
        });
    }

    let nodes_welded = weld_nodes(tree, params.weld_epsilon);
    let duplicate_links_removed = strip_duplicate_links(tree);
    let branches_fused = fuse_pass_through_branches(tree);

    let summary = RepairSummary {
        initial_nodes,
        initial_branches,
        final_nodes: tree.nodes.len(),
        final_branches: tree.branches.len(),
        empty_branches_removed,
        isolated_nodes_removed,
        nodes_welded,
        duplicate_links_removed,
        branches_fused,
    };
    if summary.had_changes() {
        debug!(
            "Corrected connectivity: {} nodes welded, {} isolated removed, {} branches fused",
            nodes_welded, isolated_nodes_removed, branches_fused
        );
    }
    Ok(summary)
}

/// Summary of a connectivity correction run.
#[derive(Debug, Clone, Default)]
pub struct RepairSummary {
    /// Number of nodes before correction.
    pub initial_nodes: usize,
    /// Number of branches before correction.
    pub initial_branches: usize,
    /// Number of nodes after correction.
    pub final_nodes: usize,
    /// Number of branches after correction.
    pub final_branches: usize,
    /// Number of empty branches dropped.
    pub empty_branches_removed: usize,
    /// Number of zero-degree nodes removed.
    pub isolated_nodes_removed: usize,
    /// Number of nodes welded into a coincident neighbor.
    pub nodes_welded: usize,
    /// Number of repeated branch references stripped.
    pub duplicate_links_removed: usize,
    /// Number of branch pairs fused at pass-through endpoints.
    pub branches_fused: usize,
}

impl RepairSummary {
    /// Check if any corrections were performed.
    #[must_use]
    pub fn had_changes(&self) -> bool {
        self.empty_branches_removed > 0
            || self.isolated_nodes_removed > 0
            || self.nodes_welded > 0
            || self.duplicate_links_removed > 0
            || self.branches_fused > 0
    }
}

impl std::fmt::Display for RepairSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repair: {} nodes ({} welded, {} isolated), {} branches ({} fused, {} duplicate refs)",
            self.final_nodes,
            self.nodes_welded,
            self.isolated_nodes_removed,
            self.final_branches,
            self.branches_fused,
            self.duplicate_links_removed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_types::{VesselNode, VesselTree};

    fn chain(positions: &[[f64; 3]]) -> VesselTree {
        let mut tree = VesselTree::new();
        for p in positions {
            tree.nodes.push(VesselNode::from_coords(p[0], p[1], p[2]));
        }
        let indices = (0..positions.len() as u32).collect();
        tree.branches.push(Branch::from_indices(indices));
        tree
    }

    #[test]
    fn clean_chain_is_untouched() {
        let mut tree = chain(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);

        let summary = correct_connectivity(&mut tree, &RepairParams::default()).unwrap();

        assert!(!summary.had_changes());
        assert_eq!(tree.nodes[0].degree, 1);
        assert_eq!(tree.nodes[1].degree, 2);
        assert_eq!(tree.nodes[2].degree, 1);
    }

    #[test]
    fn empty_graph_fails() {
        let mut tree = VesselTree::new();
        let err = correct_connectivity(&mut tree, &RepairParams::default()).unwrap_err();
        assert!(matches!(err, RepairError::EmptyGraph { .. }));
    }

    #[test]
    fn all_empty_branches_fail_after_cleanup() {
        let mut tree = VesselTree::new();
        tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
        tree.branches.push(Branch::new());

        let err = correct_connectivity(&mut tree, &RepairParams::default()).unwrap_err();

        assert!(matches!(
            err,
            RepairError::EmptyGraph {
                nodes: 0,
                branches: 0
            }
        ));
    }

    #[test]
    fn degrees_count_interior_twice() {
        let mut tree = chain(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
        ]);
        // stale values to overwrite
        for node in &mut tree.nodes {
            node.degree = 9;
        }

        recompute_degrees(&mut tree);

        assert_eq!(
            tree.nodes.iter().map(|n| n.degree).collect::<Vec<_>>(),
            vec![1, 2, 2, 1]
        );
    }

    #[test]
    fn isolated_node_is_removed_and_references_renumbered() {
        let mut tree = VesselTree::new();
        tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(5.0, 5.0, 5.0)); // never referenced
        tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
        tree.branches.push(Branch::from_indices(vec![0, 2]));

        let summary = correct_connectivity(&mut tree, &RepairParams::default()).unwrap();

        assert_eq!(summary.isolated_nodes_removed, 1);
        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.branches[0].nodes, vec![0, 1]);
    }

    #[test]
    fn weld_uses_per_axis_box_not_euclidean() {
        let epsilon = 0.1;
        let mut tree = VesselTree::new();
        tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
        // inside the box on every axis, Euclidean distance ~0.156 > epsilon
        tree.nodes
            .push(VesselNode::from_coords(0.09, 0.09, 0.09));
        // outside the box on x alone
        tree.nodes.push(VesselNode::from_coords(0.25, 0.0, 0.0));

        let welded = weld_nodes(&mut tree, epsilon);

        assert_eq!(welded, 1);
        assert_eq!(tree.nodes.len(), 2);
    }

    #[test]
    fn weld_sums_degrees_and_redirects_references() {
        let mut tree = VesselTree::new();
        tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(2.0, 0.0, 0.0));
        tree.branches.push(Branch::from_indices(vec![0, 1]));
        tree.branches.push(Branch::from_indices(vec![2, 3]));
        recompute_degrees(&mut tree);

        let welded = weld_nodes(&mut tree, 1e-6);

        assert_eq!(welded, 1);
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.nodes[1].degree, 2);
        assert_eq!(tree.branches[0].nodes, vec![0, 1]);
        assert_eq!(tree.branches[1].nodes, vec![1, 2]);
    }

    #[test]
    fn strip_collapses_runs_everywhere() {
        let mut tree = chain(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        tree.branches[0].nodes = vec![0, 1, 1, 2, 2];

        let removed = strip_duplicate_links(&mut tree);

        assert_eq!(removed, 2);
        assert_eq!(tree.branches[0].nodes, vec![0, 1, 2]);
    }

    #[test]
    fn fusion_orients_all_four_endpoint_pairings() {
        let cases: [(Vec<u32>, Vec<u32>); 4] = [
            (vec![0, 1, 2], vec![2, 3, 4]), // tail meets head
            (vec![0, 1, 2], vec![4, 3, 2]), // tail meets tail
            (vec![2, 1, 0], vec![2, 3, 4]), // head meets head
            (vec![2, 1, 0], vec![4, 3, 2]), // head meets tail
        ];
        for (first, second) in cases {
            let mut tree = VesselTree::new();
            for x in 0..5 {
                tree.nodes
                    .push(VesselNode::from_coords(f64::from(x), 0.0, 0.0));
            }
            tree.branches.push(Branch::from_indices(first.clone()));
            tree.branches.push(Branch::from_indices(second.clone()));
            recompute_degrees(&mut tree);

            let fused = fuse_pass_through_branches(&mut tree);

            assert_eq!(fused, 1, "cases {first:?} and {second:?}");
            assert_eq!(tree.branches.len(), 1);
            assert_eq!(tree.branches[0].nodes, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn fusion_skips_bifurcations() {
        // three branches meeting at node 0: degree 3, never fused
        let mut tree = VesselTree::new();
        tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(0.0, 1.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 1.0));
        tree.branches.push(Branch::from_indices(vec![0, 1]));
        tree.branches.push(Branch::from_indices(vec![0, 2]));
        tree.branches.push(Branch::from_indices(vec![0, 3]));
        recompute_degrees(&mut tree);

        assert_eq!(fuse_pass_through_branches(&mut tree), 0);
        assert_eq!(tree.branches.len(), 3);
    }

    #[test]
    fn fusion_chain_collapses_in_one_call() {
        let mut tree = VesselTree::new();
        for x in 0..4 {
            tree.nodes
                .push(VesselNode::from_coords(f64::from(x), 0.0, 0.0));
        }
        tree.branches.push(Branch::from_indices(vec![0, 1]));
        tree.branches.push(Branch::from_indices(vec![1, 2]));
        tree.branches.push(Branch::from_indices(vec![2, 3]));
        recompute_degrees(&mut tree);

        let fused = fuse_pass_through_branches(&mut tree);

        assert_eq!(fused, 2);
        assert_eq!(tree.branches.len(), 1);
        assert_eq!(tree.branches[0].nodes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn coincident_junction_is_welded_then_fused() {
        // two separately built chains meeting at the same position
        let mut tree = VesselTree::new();
        tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
        tree.nodes.push(VesselNode::from_coords(2.0, 0.0, 0.0));
        tree.branches.push(Branch::from_indices(vec![0, 1]));
        tree.branches.push(Branch::from_indices(vec![2, 3]));

        let summary = correct_connectivity(&mut tree, &RepairParams::default()).unwrap();

        assert_eq!(summary.nodes_welded, 1);
        assert_eq!(summary.branches_fused, 1);
        assert_eq!(tree.branches.len(), 1);
        assert_eq!(tree.branches[0].nodes, vec![0, 1, 2]);
        assert_eq!(tree.nodes[1].degree, 2);
    }

    #[test]
    fn summary_display_lists_counts() {
        let summary = RepairSummary {
            final_nodes: 10,
            nodes_welded: 2,
            ..Default::default()
        };
        let text = summary.to_string();
        assert!(text.contains("10 nodes"));
        assert!(text.contains("2 welded"));
    }
}
