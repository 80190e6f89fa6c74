//! Comparison of two graphs captured for the same page.
//!
//! Nodes and edges are matched across graphs by element path, never by
//! arena index: two sweeps of the same page can create nodes in a different
//! order. An edge's identity is `(kind, node1 path, node2 path)`.
//!
//! ## Deltas
//!
//! - `Missing`: the edge exists only in the receiver (the "before" graph)
//! - `New`: the edge exists only in the other graph
//! - `Changed`: matched, but its ranges differ, or for parent-child edges one
//!   of the six justification sub-ranges differs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::graph::{Adjacency, GraphError, Rlg};
use crate::types::{Edge, EdgeKind, ElementPath, NodeId, Ranges};

/// Name used for the ranges of the edge itself in `Changed` deltas.
pub const RANGES_FIELD: &str = "ranges";

/// One difference in a node's adjacency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "delta", rename_all = "snake_case")]
pub enum EdgeDelta {
    /// Edge only present before.
    Missing {
        /// Edge kind.
        kind: EdgeKind,
        /// First endpoint.
        node1: ElementPath,
        /// Second endpoint.
        node2: ElementPath,
    },
    /// Edge only present after.
    New {
        /// Edge kind.
        kind: EdgeKind,
        /// First endpoint.
        node1: ElementPath,
        /// Second endpoint.
        node2: ElementPath,
    },
    /// Edge present in both with different ranges.
    Changed {
        /// Edge kind.
        kind: EdgeKind,
        /// First endpoint.
        node1: ElementPath,
        /// Second endpoint.
        node2: ElementPath,
        /// Which ranges differ: [`RANGES_FIELD`] or a justification name.
        field: String,
        /// Ranges before.
        before: Ranges,
        /// Ranges after.
        after: Ranges,
    },
}

impl EdgeDelta {
    /// Kind of the edge concerned.
    pub fn kind(&self) -> EdgeKind {
        match self {
            Self::Missing { kind, .. } | Self::New { kind, .. } | Self::Changed { kind, .. } => *kind,
        }
    }
}

impl fmt::Display for EdgeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { kind, node1, node2 } => {
                let (r1, r2) = kind.roles();
                write!(f, "{kind} edge ({r1} {node1}, {r2} {node2}) missing")
            }
            Self::New { kind, node1, node2 } => {
                let (r1, r2) = kind.roles();
                write!(f, "{kind} edge ({r1} {node1}, {r2} {node2}) new")
            }
            Self::Changed { kind, node1, node2, field, before, after } => {
                let (r1, r2) = kind.roles();
                write!(
                    f,
                    "{kind} edge ({r1} {node1}, {r2} {node2}) {field} changed, from {before} to {after}"
                )
            }
        }
    }
}

/// Differences of one node between two graphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDiff {
    /// Element compared.
    pub path: ElementPath,
    /// Differences, grouped by adjacency list.
    pub deltas: Vec<EdgeDelta>,
}

impl NodeDiff {
    /// Check if the node's adjacency is identical in both graphs.
    pub fn is_unchanged(&self) -> bool {
        self.deltas.is_empty()
    }
}

impl fmt::Display for NodeDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unchanged() {
            return write!(f, "{}: unchanged", self.path);
        }
        write!(f, "{}:", self.path)?;
        for delta in &self.deltas {
            write!(f, "\n  {delta}")?;
        }
        Ok(())
    }
}

/// Differences between two whole graphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDiff {
    /// Elements only present before.
    pub missing_nodes: Vec<ElementPath>,
    /// Elements only present after.
    pub new_nodes: Vec<ElementPath>,
    /// Nodes present in both with at least one delta, by path.
    pub node_diffs: Vec<NodeDiff>,
}

impl GraphDiff {
    /// Check if the graphs are structurally identical.
    pub fn is_empty(&self) -> bool {
        self.missing_nodes.is_empty() && self.new_nodes.is_empty() && self.node_diffs.is_empty()
    }
}

/// Edges of two adjacency lists partitioned by identity.
#[derive(Debug, Default)]
pub struct EdgeMatching<'a> {
    /// Edges found in both, as `(before, after)`.
    pub matched: Vec<(&'a Edge, &'a Edge)>,
    /// Edges only before.
    pub missing: Vec<&'a Edge>,
    /// Edges only after.
    pub new: Vec<&'a Edge>,
}

type EdgeKey = (EdgeKind, ElementPath, ElementPath);

/// Identity of an edge across graphs. Endpoints of a two-way edge are
/// ordered by path, since either sibling may have been recorded as `node1`.
fn edge_key(graph: &Rlg, edge: &Edge) -> EdgeKey {
    let node1 = graph.path_of(edge.node1()).clone();
    let node2 = graph.path_of(edge.node2()).clone();
    if edge.kind().is_symmetric() && node2 < node1 {
        (edge.kind(), node2, node1)
    } else {
        (edge.kind(), node1, node2)
    }
}

/// Pair up edges of `before` (from `graph`) with edges of `after` (from `other`).
pub fn match_edges<'a>(
    graph: &'a Rlg,
    before: impl IntoIterator<Item = &'a Edge>,
    other: &'a Rlg,
    after: impl IntoIterator<Item = &'a Edge>,
) -> EdgeMatching<'a> {
    let mut remaining: BTreeMap<EdgeKey, &'a Edge> =
        after.into_iter().map(|e| (edge_key(other, e), e)).collect();
    let mut matching = EdgeMatching::default();

    for edge in before {
        match remaining.remove(&edge_key(graph, edge)) {
            Some(theirs) => matching.matched.push((edge, theirs)),
            None => matching.missing.push(edge),
        }
    }
    matching.new = remaining.into_values().collect();
    matching
}

fn changes(kind: EdgeKind, node1: &ElementPath, node2: &ElementPath, before: &Edge, after: &Edge) -> Vec<EdgeDelta> {
    let mut fields: Vec<(&str, &Ranges, &Ranges)> = vec![(RANGES_FIELD, before.ranges(), after.ranges())];
    if let (Some(j1), Some(j2)) = (before.justification(), after.justification()) {
        for ((name, r1), (_, r2)) in j1.fields().into_iter().zip(j2.fields()) {
            fields.push((name, r1, r2));
        }
    }

    fields
        .into_iter()
        .filter(|(_, r1, r2)| r1 != r2)
        .map(|(field, r1, r2)| EdgeDelta::Changed {
            kind,
            node1: node1.clone(),
            node2: node2.clone(),
            field: field.to_string(),
            before: r1.clone(),
            after: r2.clone(),
        })
        .collect()
}

impl Rlg {
    /// Compare node `id` of this graph with node `other_id` of `other`.
    pub fn node_difference(&self, id: NodeId, other: &Rlg, other_id: NodeId) -> Result<NodeDiff, GraphError> {
        let path = self.node(id)?.path().clone();
        other.node(other_id)?;

        let mut deltas = Vec::new();
        for adjacency in Adjacency::ALL {
            let matching = match_edges(
                self,
                self.edges_of(id, adjacency),
                other,
                other.edges_of(other_id, adjacency),
            );
            for edge in matching.missing {
                let (kind, node1, node2) = edge_key(self, edge);
                deltas.push(EdgeDelta::Missing { kind, node1, node2 });
            }
            for edge in matching.new {
                let (kind, node1, node2) = edge_key(other, edge);
                deltas.push(EdgeDelta::New { kind, node1, node2 });
            }
            for (before, after) in matching.matched {
                let (kind, node1, node2) = edge_key(self, before);
                deltas.extend(changes(kind, &node1, &node2, before, after));
            }
        }
        Ok(NodeDiff { path, deltas })
    }

    /// Compare every node of this graph with `other`.
    ///
    /// An edge that changed is listed once under each of its endpoints.
    pub fn difference(&self, other: &Rlg) -> Result<GraphDiff, GraphError> {
        let mine: BTreeMap<&ElementPath, NodeId> = self.nodes().map(|n| (n.path(), n.id())).collect();
        let theirs: BTreeMap<&ElementPath, NodeId> = other.nodes().map(|n| (n.path(), n.id())).collect();

        let mut diff = GraphDiff::default();
        for (path, &id) in &mine {
            match theirs.get(path) {
                Some(&other_id) => {
                    let node_diff = self.node_difference(id, other, other_id)?;
                    if !node_diff.is_unchanged() {
                        diff.node_diffs.push(node_diff);
                    }
                }
                None => diff.missing_nodes.push((*path).clone()),
            }
        }
        diff.new_nodes = theirs
            .keys()
            .filter(|p| !mine.contains_key(**p))
            .map(|p| (*p).clone())
            .collect();

        tracing::debug!(
            missing = diff.missing_nodes.len(),
            new = diff.new_nodes.len(),
            changed = diff.node_diffs.len(),
            "graph difference"
        );
        Ok(diff)
    }
}
