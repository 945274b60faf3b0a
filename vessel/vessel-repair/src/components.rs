//! Connected component analysis over branch endpoints.
//!
//! Two branches belong to the same component when a chain of shared
//! branch endpoints links them. Interior nodes do not join components,
//! so this is meant for graphs in short-branch form, where every
//! junction sits at a branch end.

use hashbrown::HashMap;
use vessel_types::VesselTree;

/// Result of connected component analysis.
#[derive(Debug, Clone, Default)]
pub struct ComponentAnalysis {
    /// Number of disconnected components.
    pub component_count: usize,
    /// Component label per branch, 0-based and compacted in order of
    /// first appearance.
    pub branch_membership: Vec<u32>,
}

impl ComponentAnalysis {
    /// Check if every branch belongs to one component.
    #[must_use]
    pub fn is_single_component(&self) -> bool {
        self.component_count <= 1
    }
}

/// Label every branch with its connected component.
///
/// Endpoint labels spread by relabeling: each branch links its two
/// endpoints, and when both ends already carry different labels one
/// label is rewritten into the other across all nodes. Nodes referenced
/// only as branch interiors stay unlabeled and never join components.
///
/// # Example
///
/// ```
/// use vessel_types::{Branch, VesselNode, VesselTree};
/// use vessel_repair::find_connected_components;
///
/// let mut tree = VesselTree::new();
/// for x in 0..4 {
///     tree.nodes.push(VesselNode::from_coords(f64::from(x), 0.0, 0.0));
/// }
/// tree.branches.push(Branch::from_indices(vec![0, 1]));
/// tree.branches.push(Branch::from_indices(vec![2, 3]));
/// tree.branches.push(Branch::from_indices(vec![1, 2]));
///
/// let analysis = find_connected_components(&tree);
/// assert_eq!(analysis.component_count, 1);
/// assert_eq!(analysis.branch_membership, vec![0, 0, 0]);
/// ```
#[must_use]
pub fn find_connected_components(tree: &VesselTree) -> ComponentAnalysis {
    let mut node_label: Vec<u32> = vec![0; tree.nodes.len()];

    for (i, branch) in tree.branches.iter().enumerate() {
        let (Some(a1), Some(a2)) = (branch.first(), branch.last()) else {
            continue;
        };
        let a1 = a1 as usize;
        let a2 = a2 as usize;
        let fresh = i as u32 + 1;
        match (node_label[a1], node_label[a2]) {
            (0, 0) => {
                node_label[a1] = fresh;
                node_label[a2] = fresh;
            }
            (0, l2) => node_label[a1] = l2,
            (l1, 0) => node_label[a2] = l1,
            (l1, l2) if l1 != l2 => {
                for label in &mut node_label {
                    if *label == l1 {
                        *label = l2;
                    }
                }
            }
            _ => {}
        }
    }

    let mut label_seen = vec![false; tree.branches.len()];
    for &label in &node_label {
        if label > 0 {
            label_seen[(label - 1) as usize] = true;
        }
    }
    let component_count = label_seen.iter().filter(|&&seen| seen).count();

    let mut branch_membership = Vec::with_capacity(tree.branches.len());
    let mut compacted: HashMap<u32, u32> = HashMap::new();
    for branch in &tree.branches {
        let raw = branch
            .first()
            .map_or(0, |first| node_label[first as usize]);
        let next = compacted.len() as u32;
        branch_membership.push(*compacted.entry(raw).or_insert(next));
    }

    ComponentAnalysis {
        component_count,
        branch_membership,
    }
}

/// Number of disconnected components in the graph.
#[must_use]
pub fn component_count(tree: &VesselTree) -> usize {
    find_connected_components(tree).component_count
}
