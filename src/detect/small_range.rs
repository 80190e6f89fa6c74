//! Small-range flicker.
//!
//! A relation holding over only a handful of widths is suspicious when the
//! two elements' other relations also jump at its boundaries: the layout
//! flips into a short-lived state and back. A short interval is reported
//! when the pair's relation set inside it differs from the set on *each*
//! side by at least two relations.

use std::collections::BTreeSet;

use crate::graph::{Adjacency, GraphError, Rlg};
use crate::policy::DetectionPolicy;
use crate::types::{EdgeKind, NodeId, Range, RangeLabels, Smallrange};

/// Minimum symmetric difference between neighbouring relation sets.
const MIN_RELATION_CHANGE: usize = 2;

/// A relation as seen from one endpoint of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RelationLabel {
    kind: EdgeKind,
    /// Whether the first node of the pair plays the `node1` role.
    forward: bool,
}

/// Small-range failures across the graph, keyed by the owning node.
///
/// Every edge is visited from its `node1` side, so each interval is looked
/// at once per edge; the same `(pair, interval)` found through a second
/// edge kind is reported only once.
pub fn detect(graph: &Rlg, policy: &DetectionPolicy) -> Result<Vec<(NodeId, Smallrange)>, GraphError> {
    let mut seen: BTreeSet<(NodeId, NodeId, Range)> = BTreeSet::new();
    let mut found = Vec::new();

    for node in graph.nodes() {
        let a = node.id();
        for kind in EdgeKind::ALL {
            for edge in graph.edges_of(a, Adjacency::for_node1(kind)) {
                if edge.kind() != kind || edge.node1() != a {
                    continue;
                }
                let b = edge.other_node(a)?;
                for range in edge.ranges().iter() {
                    if range.span() > u64::from(policy.smallrange_threshold) {
                        continue;
                    }
                    let Some(narrower) = range.narrower() else { continue };

                    let inside = relations_at(graph, a, b, range.middle(), kind);
                    let below = relations_at(graph, a, b, narrower, kind);
                    let above = relations_at(graph, a, b, range.wider(), kind);
                    if below.is_empty() || above.is_empty() {
                        continue;
                    }
                    if inside.symmetric_difference(&below).count() < MIN_RELATION_CHANGE
                        || inside.symmetric_difference(&above).count() < MIN_RELATION_CHANGE
                    {
                        continue;
                    }

                    let key = (a.min(b), a.max(b), *range);
                    if !seen.insert(key) {
                        continue;
                    }
                    tracing::debug!(
                        node1 = %node.path(),
                        node2 = %graph.path_of(b),
                        kind = %kind,
                        range = %range,
                        "small range"
                    );
                    found.push((
                        a,
                        Smallrange {
                            node1: node.path().clone(),
                            node2: graph.path_of(b).clone(),
                            kind,
                            range: *range,
                            labels: RangeLabels::default(),
                        },
                    ));
                }
            }
        }
    }
    Ok(found)
}

/// Relations between `a` and `b` holding at `width`, other than `exclude`.
fn relations_at(graph: &Rlg, a: NodeId, b: NodeId, width: u32, exclude: EdgeKind) -> BTreeSet<RelationLabel> {
    let mut labels = BTreeSet::new();
    for adjacency in Adjacency::ALL {
        if adjacency.kind() == exclude {
            continue;
        }
        for edge in graph.edges_of(a, adjacency) {
            if edge.joins(a, b) && edge.holds_at(width) {
                labels.insert(RelationLabel {
                    kind: edge.kind(),
                    forward: edge.kind().is_symmetric() || edge.node1() == a,
                });
            }
        }
    }
    labels
}
