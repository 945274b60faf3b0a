//! Branch restructuring.
//!
//! Two opposite re-segmentations of a corrected graph. Short-branch
//! rebuilding splits every branch at interior bifurcations, so a
//! junction only ever sits at a branch end. Long-branch rebuilding
//! reassembles branches into root-to-leaf paths that run straight
//! through junctions, which suits centerline-following display and
//! measurement along a vessel.

use tracing::debug;
use vessel_types::{Branch, Vector3, VesselTree};

use crate::connectivity::{RepairParams, RepairSummary, correct_connectivity};
use crate::error::RepairResult;

/// Summary of a branch rebuild run.
#[derive(Debug, Clone)]
pub struct RebuildSummary {
    /// Result of the mandatory connectivity correction that ran first.
    pub repair: RepairSummary,
    /// Number of branches after correction, before restructuring.
    pub branches_before: usize,
    /// Number of branches after restructuring.
    pub branches_after: usize,
}

impl std::fmt::Display for RebuildSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rebuild: {} -> {} branches",
            self.branches_before, self.branches_after
        )
    }
}

/// Split every branch at each interior node of degree greater than 2.
///
/// Connectivity is corrected first. Afterwards no branch has an
/// internal bifurcation: a degree-3 or higher node can only appear at a
/// branch end, shared by all branches meeting there. Split-off tails
/// are themselves examined, so a branch crossing several junctions
/// splits at every one of them.
///
/// # Errors
///
/// Returns [`RepairError`](crate::RepairError) when the mandatory
/// connectivity correction fails.
///
/// # Example
///
/// ```
/// use vessel_types::{Branch, VesselNode, VesselTree};
/// use vessel_repair::{rebuild_short_branches, RepairParams};
///
/// // two chains crossing at node 1
/// let mut tree = VesselTree::new();
/// tree.nodes.push(VesselNode::from_coords(0.0, 0.0, 0.0));
/// tree.nodes.push(VesselNode::from_coords(1.0, 0.0, 0.0));
/// tree.nodes.push(VesselNode::from_coords(2.0, 0.0, 0.0));
/// tree.nodes.push(VesselNode::from_coords(1.0, 1.0, 0.0));
/// tree.nodes.push(VesselNode::from_coords(1.0, -1.0, 0.0));
/// tree.branches.push(Branch::from_indices(vec![0, 1, 2]));
/// tree.branches.push(Branch::from_indices(vec![3, 1, 4]));
///
/// let summary = rebuild_short_branches(&mut tree, &RepairParams::default()).unwrap();
/// assert_eq!(summary.branches_after, 4);
/// ```
pub fn rebuild_short_branches(
    tree: &mut VesselTree,
    params: &RepairParams,
) -> RepairResult<RebuildSummary> {
    let repair = correct_connectivity(tree, params)?;
    let branches_before = tree.branches.len();

    let mut b = 0;
    while b < tree.branches.len() {
        let len = tree.branches[b].len();
        let mut split_at = None;
        for q in 1..len.saturating_sub(1) {
            let node = tree.branches[b].nodes[q];
            if tree.nodes[node as usize].degree > 2 {
                split_at = Some(q);
                break;
            }
        }
        if let Some(q) = split_at {
            // both halves keep the junction node
            let suffix = tree.branches[b].nodes[q..].to_vec();
            tree.branches[b].nodes.truncate(q + 1);
            tree.branches.push(Branch::from_indices(suffix));
        }
        b += 1;
    }

    let summary = RebuildSummary {
        repair,
        branches_before,
        branches_after: tree.branches.len(),
    };
    debug!(
        "Split branches at bifurcations: {} -> {}",
        summary.branches_before, summary.branches_after
    );
    Ok(summary)
}

/// Reassemble branches into long paths that run through junctions.
///
/// Connectivity is corrected first. Paths start at the degree-1
/// endpoint with the highest radius estimate (falling back to the first
/// branch's first node when no degree-1 endpoint exists, as in a pure
/// cycle) and extend greedily: at each junction the continuation with
/// the straightest heading relative to the incoming travel direction is
/// taken, ties preferring the lower branch index. Side paths then grow
/// from every bifurcation the assembled paths passed through, until all
/// branches are consumed. Disconnected parts each get their own start.
///
/// The output branches may contain bifurcations in their interior;
/// node degrees are left as corrected and still describe the graph,
/// which is unchanged apart from its segmentation into branches.
///
/// # Errors
///
/// Returns [`RepairError`](crate::RepairError) when the mandatory
/// connectivity correction fails.
pub fn rebuild_long_branches(
    tree: &mut VesselTree,
    params: &RepairParams,
) -> RepairResult<RebuildSummary> {
    let repair = correct_connectivity(tree, params)?;
    let branches_before = tree.branches.len();

    let mut rebuilt: Vec<Branch> = Vec::new();
    while !tree.branches.is_empty() {
        let mut follow_branch = 0;
        let mut follow_node = 0;
        let mut next_start = Some(select_path_start(tree));

        while let Some(start) = next_start {
            let path = assemble_path(tree, start);
            if !path.is_empty() {
                rebuilt.push(Branch::from_indices(path));
            }

            // resume the junction scan where it left off
            next_start = None;
            while follow_branch < rebuilt.len() {
                let branch_nodes = &rebuilt[follow_branch].nodes;
                while follow_node < branch_nodes.len() {
                    let node = branch_nodes[follow_node];
                    if tree.nodes[node as usize].degree > 2 {
                        next_start = Some(node);
                        break;
                    }
                    follow_node += 1;
                }
                if next_start.is_some() {
                    follow_node += 1;
                    break;
                }
                follow_node = 0;
                follow_branch += 1;
            }
        }
    }
    tree.branches = rebuilt;

    let summary = RebuildSummary {
        repair,
        branches_before,
        branches_after: tree.branches.len(),
    };
    debug!(
        "Assembled long branches: {} -> {}",
        summary.branches_before, summary.branches_after
    );
    Ok(summary)
}

/// Pick the next path start: the degree-1 branch endpoint with the
/// highest radius, or the first branch's first node when none exists.
fn select_path_start(tree: &VesselTree) -> u32 {
    let mut start = None;
    let mut max_radius = 0.0;
    for branch in &tree.branches {
        for endpoint in [branch.first(), branch.last()].into_iter().flatten() {
            let node = &tree.nodes[endpoint as usize];
            if node.degree == 1 && (start.is_none() || max_radius < node.radius) {
                max_radius = node.radius;
                start = Some(endpoint);
            }
        }
    }
    start.unwrap_or_else(|| tree.branches[0].nodes[0])
}

/// Assemble one path from `start`, consuming the branches it covers.
///
/// At each step every remaining branch with an endpoint at the path
/// tail is a candidate; the one whose heading into the junction scores
/// lowest against the incoming travel direction wins. A single-node
/// branch at the tail is absorbed immediately. Returns an empty path
/// when no branch touches `start` at all.
fn assemble_path(tree: &mut VesselTree, start: u32) -> Vec<u32> {
    let mut path: Vec<u32> = Vec::new();
    let mut direction = Vector3::zeros();
    let mut tail = start;

    loop {
        let mut best: Option<(usize, bool)> = None;
        let mut best_score = 2.0;
        for (index, branch) in tree.branches.iter().enumerate() {
            if branch.first() == Some(tail) {
                if branch.len() == 1 {
                    best = Some((index, false));
                    break;
                }
                let score =
                    continuation_score(tree, branch.nodes[0], branch.nodes[1], &direction);
                if best_score > score {
                    best_score = score;
                    best = Some((index, false));
                }
            } else if branch.last() == Some(tail) {
                let len = branch.len();
                let score = continuation_score(
                    tree,
                    branch.nodes[len - 1],
                    branch.nodes[len - 2],
                    &direction,
                );
                if best_score > score {
                    best_score = score;
                    best = Some((index, true));
                }
            }
        }

        let Some((index, reversed)) = best else {
            break;
        };
        let segment = tree.branches.remove(index);
        if path.is_empty() {
            path.push(tail);
        }
        if reversed {
            path.extend(segment.nodes[..segment.len() - 1].iter().rev());
        } else {
            path.extend(&segment.nodes[1..]);
        }
        tail = path[path.len() - 1];

        if path.len() >= 2 {
            let from = tree.nodes[path[path.len() - 2] as usize].position;
            let to = tree.nodes[tail as usize].position;
            let step = to - from;
            let norm = step.norm();
            direction = if norm > 0.0 {
                step / norm
            } else {
                Vector3::zeros()
            };
        }
    }

    path
}

/// Dot product of the candidate's unit heading into the junction with
/// the incoming travel direction. Lower means straighter continuation.
fn continuation_score(
    tree: &VesselTree,
    endpoint: u32,
    neighbor: u32,
    incoming: &Vector3<f64>,
) -> f64 {
    let mut heading =
        tree.nodes[endpoint as usize].position - tree.nodes[neighbor as usize].position;
    let norm = heading.norm();
    if norm > 0.0 {
        heading /= norm;
    }
    heading.dot(incoming)
}
