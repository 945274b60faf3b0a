//! The indexed node/branch graph.

use crate::branch::Branch;
use crate::error::{TreeError, TreeResult};
use crate::node::VesselNode;

/// A vessel centerline graph: nodes plus branches referencing them.
///
/// Fields are public; algorithm crates operate on the vectors directly.
/// The edit methods below exist for operations that must keep branch
/// references consistent while the node vector shifts.
///
/// Cloning snapshots the whole graph, so callers can derive a modified
/// copy without touching the original.
///
/// # Example
///
/// ```
/// use vessel_types::{VesselNode, VesselTree};
///
/// let mut tree = VesselTree::new();
/// tree.add_branch(vec![
///     VesselNode::from_coords(0.0, 0.0, 0.0),
///     VesselNode::from_coords(1.0, 0.0, 0.0),
///     VesselNode::from_coords(2.0, 0.0, 0.0),
/// ])?;
///
/// assert_eq!(tree.node_count(), 3);
/// assert_eq!(tree.branch_count(), 1);
///
/// tree.split_branch(0, 1)?;
/// assert_eq!(tree.branch_count(), 2);
/// # Ok::<(), vessel_types::TreeError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VesselTree {
    /// All nodes; a node's identity is its index here.
    pub nodes: Vec<VesselNode>,
    /// All branches, referencing nodes by index.
    pub branches: Vec<Branch>,
}

impl VesselTree {
    /// Creates an empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            branches: Vec::new(),
        }
    }

    /// Creates an empty graph with reserved capacity.
    #[must_use]
    pub fn with_capacity(nodes: usize, branches: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            branches: Vec::with_capacity(branches),
        }
    }

    /// Creates a graph from existing parts.
    #[must_use]
    pub const fn from_parts(nodes: Vec<VesselNode>, branches: Vec<Branch>) -> Self {
        Self { nodes, branches }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of branches.
    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Whether the graph has no nodes and no branches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.branches.is_empty()
    }

    /// The node at `index`, or `None` when out of range.
    #[must_use]
    pub fn node(&self, index: u32) -> Option<&VesselNode> {
        self.nodes.get(index as usize)
    }

    /// Mutable access to the node at `index`.
    #[must_use]
    pub fn node_mut(&mut self, index: u32) -> Option<&mut VesselNode> {
        self.nodes.get_mut(index as usize)
    }

    /// The branch at `index`, or `None` when out of range.
    #[must_use]
    pub fn branch(&self, index: usize) -> Option<&Branch> {
        self.branches.get(index)
    }

    /// Length of the branch at `index`.
    #[must_use]
    pub fn branch_len(&self, index: usize) -> Option<usize> {
        self.branches.get(index).map(Branch::len)
    }

    /// Node index at `position` within branch `branch`.
    #[must_use]
    pub fn node_index(&self, branch: usize, position: usize) -> Option<u32> {
        self.branches.get(branch)?.nodes.get(position).copied()
    }

    /// The node at `position` within branch `branch`.
    ///
    /// `None` when the branch or position is out of range, or when the
    /// stored index is dangling.
    #[must_use]
    pub fn branch_node(&self, branch: usize, position: usize) -> Option<&VesselNode> {
        self.node(self.node_index(branch, position)?)
    }

    /// Appends the given nodes and a branch running through them.
    ///
    /// The nodes are added to the node vector and the new branch
    /// references them in order. Degrees are not recomputed here.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyBranch`] if `path` is empty.
    pub fn add_branch(&mut self, path: Vec<VesselNode>) -> TreeResult<()> {
        if path.is_empty() {
            return Err(TreeError::EmptyBranch);
        }
        #[allow(clippy::cast_possible_truncation)]
        // Node indices are u32; graphs with more than 4B nodes are unsupported
        let base = self.nodes.len() as u32;
        let count = path.len() as u32;
        self.nodes.extend(path);
        self.branches
            .push(Branch::from_indices((base..base + count).collect()));
        Ok(())
    }

    /// Appends a branch over existing nodes.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyBranch`] if `indices` is empty,
    /// [`TreeError::NodeIndex`] if any index is out of range.
    pub fn add_branch_indices(&mut self, indices: Vec<u32>) -> TreeResult<()> {
        if indices.is_empty() {
            return Err(TreeError::EmptyBranch);
        }
        let count = self.nodes.len();
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= count) {
            return Err(TreeError::NodeIndex { index: bad, count });
        }
        self.branches.push(Branch::from_indices(indices));
        Ok(())
    }

    /// Removes the branch at `index`. Nodes are untouched.
    ///
    /// # Errors
    ///
    /// [`TreeError::BranchIndex`] when out of range.
    pub fn remove_branch(&mut self, index: usize) -> TreeResult<Branch> {
        if index >= self.branches.len() {
            return Err(TreeError::BranchIndex {
                index,
                count: self.branches.len(),
            });
        }
        Ok(self.branches.remove(index))
    }

    /// Removes the node at `index` and renumbers all branch references.
    ///
    /// References to the removed node disappear from every branch;
    /// references above it are decremented. Branches may become empty.
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeIndex`] when out of range.
    pub fn remove_node(&mut self, index: u32) -> TreeResult<VesselNode> {
        if index as usize >= self.nodes.len() {
            return Err(TreeError::NodeIndex {
                index,
                count: self.nodes.len(),
            });
        }
        let removed = self.nodes.remove(index as usize);
        for branch in &mut self.branches {
            branch.nodes.retain(|&i| i != index);
            for i in &mut branch.nodes {
                if *i > index {
                    *i -= 1;
                }
            }
        }
        Ok(removed)
    }

    /// Splits branches at every interior occurrence of a node index.
    ///
    /// Each affected branch is cut in two at the occurrence; both halves
    /// keep the shared node, introducing a junction there. Only branches
    /// present at entry are scanned, and each is split at most once per
    /// call (a later interior occurrence ends up in the appended suffix
    /// branch, which a repeated call would split).
    ///
    /// Returns the number of splits performed.
    ///
    /// # Errors
    ///
    /// [`TreeError::NodeIndex`] when out of range.
    pub fn split_node(&mut self, index: u32) -> TreeResult<usize> {
        if index as usize >= self.nodes.len() {
            return Err(TreeError::NodeIndex {
                index,
                count: self.nodes.len(),
            });
        }
        let branch_count = self.branches.len();
        let mut splits = 0;
        for b in 0..branch_count {
            let len = self.branches[b].len();
            for position in 1..len.saturating_sub(1) {
                if self.branches[b].nodes[position] == index {
                    let suffix = self.branches[b].nodes[position..].to_vec();
                    self.branches[b].nodes.truncate(position + 1);
                    self.branches.push(Branch::from_indices(suffix));
                    splits += 1;
                    break;
                }
            }
        }
        Ok(splits)
    }

    /// Splits branch `branch` at interior position `position`.
    ///
    /// The branch keeps positions `0..=position`; a new branch over
    /// positions `position..` is appended. The node at the split position
    /// is shared by both.
    ///
    /// # Errors
    ///
    /// [`TreeError::BranchIndex`] when the branch is out of range,
    /// [`TreeError::SplitPosition`] when `position` is an endpoint or
    /// beyond the branch.
    pub fn split_branch(&mut self, branch: usize, position: usize) -> TreeResult<()> {
        let len = self
            .branch_len(branch)
            .ok_or(TreeError::BranchIndex {
                index: branch,
                count: self.branches.len(),
            })?;
        if position == 0 || position + 1 >= len {
            return Err(TreeError::SplitPosition { position, len });
        }
        let suffix = self.branches[branch].nodes[position..].to_vec();
        self.branches[branch].nodes.truncate(position + 1);
        self.branches.push(Branch::from_indices(suffix));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn line_tree(n: usize) -> VesselTree {
        let mut tree = VesselTree::new();
        #[allow(clippy::cast_precision_loss)]
        let path = (0..n)
            .map(|i| VesselNode::from_coords(i as f64, 0.0, 0.0))
            .collect();
        tree.add_branch(path).unwrap();
        tree
    }

    #[test]
    fn test_new_is_empty() {
        let tree = VesselTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.branch_count(), 0);
    }

    #[test]
    fn test_add_branch_assigns_fresh_indices() {
        let mut tree = line_tree(3);
        tree.add_branch(vec![
            VesselNode::from_coords(5.0, 0.0, 0.0),
            VesselNode::from_coords(6.0, 0.0, 0.0),
        ])
        .unwrap();

        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.branches[1].nodes, vec![3, 4]);
    }

    #[test]
    fn test_add_branch_empty_fails() {
        let mut tree = VesselTree::new();
        assert!(matches!(
            tree.add_branch(Vec::new()),
            Err(TreeError::EmptyBranch)
        ));
    }

    #[test]
    fn test_add_branch_indices_validates() {
        let mut tree = line_tree(3);
        assert!(tree.add_branch_indices(vec![0, 2]).is_ok());
        assert!(matches!(
            tree.add_branch_indices(vec![0, 3]),
            Err(TreeError::NodeIndex { index: 3, count: 3 })
        ));
    }

    #[test]
    fn test_accessors_out_of_range() {
        let tree = line_tree(3);
        assert!(tree.node(3).is_none());
        assert!(tree.branch(1).is_none());
        assert_eq!(tree.node_index(0, 5), None);
        assert_eq!(tree.node_index(9, 0), None);
        assert!(tree.branch_node(0, 3).is_none());
    }

    #[test]
    fn test_branch_node() {
        let tree = line_tree(3);
        assert_eq!(tree.branch_node(0, 2).unwrap().position.x, 2.0);
    }

    #[test]
    fn test_remove_branch() {
        let mut tree = line_tree(3);
        tree.add_branch_indices(vec![0, 2]).unwrap();
        let removed = tree.remove_branch(0).unwrap();
        assert_eq!(removed.nodes, vec![0, 1, 2]);
        assert_eq!(tree.branch_count(), 1);
        assert!(tree.remove_branch(5).is_err());
    }

    #[test]
    fn test_remove_node_renumbers() {
        let mut tree = line_tree(4);
        tree.add_branch_indices(vec![3, 1]).unwrap();

        tree.remove_node(1).unwrap();

        assert_eq!(tree.node_count(), 3);
        // Branch 0 was 0,1,2,3: reference to 1 removed, higher shifted.
        assert_eq!(tree.branches[0].nodes, vec![0, 1, 2]);
        // Branch 1 was 3,1: only the shifted 3 remains.
        assert_eq!(tree.branches[1].nodes, vec![2]);
        // Positions survived the shift.
        assert_eq!(tree.node(1).unwrap().position.x, 2.0);
    }

    #[test]
    fn test_remove_node_out_of_range() {
        let mut tree = line_tree(2);
        assert!(tree.remove_node(2).is_err());
    }

    #[test]
    fn test_split_branch() {
        let mut tree = line_tree(5);
        tree.split_branch(0, 2).unwrap();

        assert_eq!(tree.branch_count(), 2);
        assert_eq!(tree.branches[0].nodes, vec![0, 1, 2]);
        assert_eq!(tree.branches[1].nodes, vec![2, 3, 4]);
    }

    #[test]
    fn test_split_branch_rejects_endpoints() {
        let mut tree = line_tree(3);
        assert!(matches!(
            tree.split_branch(0, 0),
            Err(TreeError::SplitPosition { .. })
        ));
        assert!(matches!(
            tree.split_branch(0, 2),
            Err(TreeError::SplitPosition { .. })
        ));
        assert!(matches!(
            tree.split_branch(1, 1),
            Err(TreeError::BranchIndex { .. })
        ));
    }

    #[test]
    fn test_split_node_interior_occurrences() {
        // Two branches through node 1; one has it interior.
        let mut tree = line_tree(4);
        tree.add_branch_indices(vec![1, 3]).unwrap();

        let splits = tree.split_node(1).unwrap();

        assert_eq!(splits, 1);
        assert_eq!(tree.branch_count(), 3);
        assert_eq!(tree.branches[0].nodes, vec![0, 1]);
        assert_eq!(tree.branches[2].nodes, vec![1, 2, 3]);
        // Endpoint occurrence in branch 1 untouched.
        assert_eq!(tree.branches[1].nodes, vec![1, 3]);
    }

    #[test]
    fn test_split_node_no_interior_occurrence() {
        let mut tree = line_tree(3);
        let splits = tree.split_node(0).unwrap();
        assert_eq!(splits, 0);
        assert_eq!(tree.branch_count(), 1);
    }

    #[test]
    fn test_clone_snapshots() {
        let tree = line_tree(3);
        let mut copy = tree.clone();
        copy.nodes[0].radius = 9.0;
        assert_eq!(tree.nodes[0].radius, crate::RADIUS_UNKNOWN);
    }
}
