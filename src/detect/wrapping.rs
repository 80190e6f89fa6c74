//! Wrapping: an element drops out of a row onto a new line.
//!
//! Two heuristics look at the same boundary from opposite ends. For a node
//! `n`, group the intervals over which other elements sit above it by their
//! upper bound `M`; at `M + 1` the element has not wrapped yet.
//!
//! - **Top-down** ([`detect_wrapping`]) starts from a row member above `n`
//!   and verifies that at `M + 1` the row is a closed, symmetric set
//!   containing `n`, and that the rest of the row stays together below `M`.
//! - **Bottom-up** ([`detect_unwrapping`]) starts from `n` and infers the
//!   row from the elements above it: those side by side with each other at
//!   `M + 1` and not stacked.
//!
//! The heuristics are independent; a wrap both can see is reported twice.

use std::collections::{BTreeMap, BTreeSet};
use std::iter;

use crate::graph::{Adjacency, GraphError, Rlg};
use crate::policy::DetectionPolicy;
use crate::types::{ElementPath, NodeId, Range, RangeLabels, WrapHeuristic, Wrapping};

/// Intervals over which each element is above `node`, grouped by upper bound.
fn above_by_max(graph: &Rlg, node: NodeId) -> BTreeMap<u32, Vec<(NodeId, Range)>> {
    let mut groups: BTreeMap<u32, Vec<(NodeId, Range)>> = BTreeMap::new();
    for edge in graph.edges_of(node, Adjacency::AboveBelow) {
        if edge.below() != node {
            continue;
        }
        for range in edge.ranges().iter() {
            groups.entry(range.end()).or_default().push((edge.above(), *range));
        }
    }
    groups
}

/// `node` together with its row at `width`.
fn row_with(graph: &Rlg, node: NodeId, width: u32) -> BTreeSet<NodeId> {
    iter::once(node).chain(graph.row_nodes_at(node, width)).collect()
}

/// Widest interval ending at `max` shared by every member of `members`.
fn shared_range(
    related: &[(NodeId, Range)],
    members: &BTreeSet<NodeId>,
    max: u32,
) -> Result<Option<Range>, GraphError> {
    let shared_min = related
        .iter()
        .filter(|(above, _)| members.contains(above))
        .map(|(_, range)| range.start())
        .max();
    match shared_min {
        Some(min) => Ok(Some(Range::new(min, max)?)),
        None => Ok(None),
    }
}

fn sorted_paths(graph: &Rlg, nodes: &BTreeSet<NodeId>) -> Vec<ElementPath> {
    let mut paths: Vec<ElementPath> = nodes.iter().map(|n| graph.path_of(*n).clone()).collect();
    paths.sort();
    paths
}

/// Top-down wrapping reports for `node`, at most one per upper bound.
pub fn detect_wrapping(graph: &Rlg, node: NodeId, policy: &DetectionPolicy) -> Result<Vec<Wrapping>, GraphError> {
    let path = graph.node(node)?.path();
    let mut found = Vec::new();

    for (&max, related) in above_by_max(graph, node).iter().rev() {
        let Some(wider) = max.checked_add(1) else { continue };

        for &(member, _) in related {
            let row = row_with(graph, member, wider);
            if !row.contains(&node) || row.len() < policy.row_threshold {
                continue;
            }
            if !row.iter().all(|&m| row_with(graph, m, wider) == row) {
                continue;
            }

            let rest: BTreeSet<NodeId> = row.iter().copied().filter(|&m| m != node).collect();
            let Some(range) = shared_range(related, &rest, max)? else { continue };
            let intact = rest.iter().all(|&m| {
                let beside = graph.row_nodes_at(m, range.start());
                rest.iter().all(|o| *o == m || beside.contains(o))
            });
            if !intact {
                continue;
            }

            tracing::debug!(node = %path, range = %range, row = rest.len(), "wrapping (top-down)");
            found.push(Wrapping {
                node: path.clone(),
                row: sorted_paths(graph, &rest),
                range,
                heuristic: WrapHeuristic::TopDown,
                labels: RangeLabels::default(),
            });
            break;
        }
    }
    Ok(found)
}

/// Bottom-up wrapping reports for `node`, at most one per upper bound.
pub fn detect_unwrapping(graph: &Rlg, node: NodeId, policy: &DetectionPolicy) -> Result<Vec<Wrapping>, GraphError> {
    let path = graph.node(node)?.path();
    let mut found = Vec::new();

    for (&max, related) in above_by_max(graph, node).iter().rev() {
        let Some(wider) = max.checked_add(1) else { continue };

        let candidates: BTreeSet<NodeId> = related.iter().map(|(above, _)| *above).collect();
        let row: BTreeSet<NodeId> = candidates
            .iter()
            .copied()
            .filter(|&c| {
                candidates
                    .iter()
                    .any(|&o| o != c && graph.is_horizontally_adjacent_at(c, o, wider))
            })
            .filter(|&c| {
                !candidates
                    .iter()
                    .any(|&o| o != c && graph.is_vertically_adjacent_at(c, o, wider))
            })
            .collect();
        if row.len() < policy.row_threshold {
            continue;
        }
        let Some(range) = shared_range(related, &row, max)? else { continue };

        tracing::debug!(node = %path, range = %range, row = row.len(), "wrapping (bottom-up)");
        found.push(Wrapping {
            node: path.clone(),
            row: sorted_paths(graph, &row),
            range,
            heuristic: WrapHeuristic::BottomUp,
            labels: RangeLabels::default(),
        });
    }
    Ok(found)
}
