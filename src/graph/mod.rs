//! The responsive layout graph.
//!
//! Nodes and edges live in two arenas owned by [`Rlg`]. Each edge is stored
//! once and referenced by [`EdgeId`] from the role-correct adjacency list of
//! both endpoints, so the graph is logically undirected-with-roles while each
//! node sees its own directed view.
//!
//! ## Construction
//!
//! ```text
//! add_child(p, c, w)        → ParentChild(parent = p, child = c)
//! add_container(n, o, w)    → Container(contained = n, container = o)
//! add_overlap(n, o, w)      → Overlap(n, o), matched in either order
//! add_above_me(n, o, w)     → AboveBelow(above = o, below = n)
//! add_below_me(n, o, w)     → AboveBelow(above = n, below = o)
//! add_to_my_right(n, o, w)  → RightLeft(right = o, left = n)
//! add_to_my_left(n, o, w)   → RightLeft(right = n, left = o)
//! ```
//!
//! Repeating an observation extends the existing edge's ranges.

pub mod node;
pub mod query;

use std::collections::BTreeMap;

use crate::sweep::Relation;
use crate::types::{
    Alignment, Edge, EdgeError, EdgeId, EdgeKind, ElementPath, NodeId, PathError, RangeError,
};

pub use node::{Adjacency, RlgNode};

/// Error type for graph construction and analysis.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Element key could not be resolved to a path.
    #[error("Invalid element path: {0}")]
    InvalidPath(#[from] PathError),
    /// Node id does not belong to this graph.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    /// Relation between a node and itself.
    #[error("Element {0} cannot be related to itself")]
    SelfRelation(ElementPath),
    /// Child already has a different parent at this width.
    #[error("{child} already has parent {existing} at width {width}; refusing {candidate}")]
    SecondParent {
        /// Child element.
        child: ElementPath,
        /// Parent already covering the width.
        existing: ElementPath,
        /// Rejected parent.
        candidate: ElementPath,
        /// Width of the observation.
        width: u32,
    },
    /// Parent-child observation would close a cycle.
    #[error("{child} is an ancestor of {parent} at width {width}")]
    ParentCycle {
        /// Proposed parent.
        parent: ElementPath,
        /// Proposed child.
        child: ElementPath,
        /// Width of the observation.
        width: u32,
    },
    /// Observation of a binary relation without the second element.
    #[error("Observation '{relation}' for {element} needs a second element")]
    MissingOther {
        /// Element the observation was made on.
        element: String,
        /// Relation observed.
        relation: Relation,
    },
    /// Invalid width or interval.
    #[error("Range error: {0}")]
    Range(#[from] RangeError),
    /// Endpoint lookup failed.
    #[error("Edge error: {0}")]
    Edge(#[from] EdgeError),
    /// Sweep could not be parsed.
    #[error("Sweep parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Responsive layout graph for one width sweep.
#[derive(Debug, Clone, Default)]
pub struct Rlg {
    nodes: Vec<RlgNode>,
    edges: Vec<Edge>,
    index: BTreeMap<ElementPath, NodeId>,
}

impl Rlg {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an element key to a node, creating the node on first use.
    pub fn add_node(&mut self, path: &str) -> Result<NodeId, GraphError> {
        let path = ElementPath::parse(path)?;
        if let Some(id) = self.index.get(&path) {
            return Ok(*id);
        }
        let id = NodeId::new(self.nodes.len());
        self.index.insert(path.clone(), id);
        self.nodes.push(RlgNode::new(id, path));
        Ok(id)
    }

    /// Look up a node by element path.
    pub fn node_id(&self, path: &str) -> Option<NodeId> {
        let path = ElementPath::parse(path).ok()?;
        self.index.get(&path).copied()
    }

    /// Get a node.
    pub fn node(&self, id: NodeId) -> Result<&RlgNode, GraphError> {
        self.nodes.get(id.index()).ok_or(GraphError::UnknownNode(id))
    }

    /// Get a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut RlgNode, GraphError> {
        self.nodes.get_mut(id.index()).ok_or(GraphError::UnknownNode(id))
    }

    /// Get a node by element path.
    pub fn node_by_path(&self, path: &str) -> Option<&RlgNode> {
        self.node_id(path).and_then(|id| self.nodes.get(id.index()))
    }

    /// Get an edge.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// All nodes, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &RlgNode> {
        self.nodes.iter()
    }

    /// All edges, in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Record that the element was rendered at a width.
    pub fn add_existence(&mut self, node: NodeId, width: u32) -> Result<(), GraphError> {
        self.node_mut(node)?.existence_mut().add_value(width);
        Ok(())
    }

    /// Record `child` as a child of `parent` at a width.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId, width: u32) -> Result<EdgeId, GraphError> {
        self.check_parent(parent, child, width)?;
        self.link(EdgeKind::ParentChild, parent, child, width)
    }

    /// Record a parent-child observation along with the child's alignment.
    pub fn add_child_aligned(
        &mut self,
        parent: NodeId,
        child: NodeId,
        width: u32,
        alignment: Alignment,
    ) -> Result<EdgeId, GraphError> {
        let id = self.add_child(parent, child, width)?;
        if let Some(justification) = self.edges[id.index()].justification_mut() {
            justification.record(alignment, width);
        }
        Ok(id)
    }

    /// Record that `container` visually contains `node` at a width.
    pub fn add_container(&mut self, node: NodeId, container: NodeId, width: u32) -> Result<EdgeId, GraphError> {
        self.link(EdgeKind::Container, node, container, width)
    }

    /// Record that `node` and `other` overlap at a width.
    pub fn add_overlap(&mut self, node: NodeId, other: NodeId, width: u32) -> Result<EdgeId, GraphError> {
        self.link(EdgeKind::Overlap, node, other, width)
    }

    /// Record that `other` is above `node` at a width.
    pub fn add_above_me(&mut self, node: NodeId, other: NodeId, width: u32) -> Result<EdgeId, GraphError> {
        self.link(EdgeKind::AboveBelow, other, node, width)
    }

    /// Record that `other` is below `node` at a width.
    pub fn add_below_me(&mut self, node: NodeId, other: NodeId, width: u32) -> Result<EdgeId, GraphError> {
        self.link(EdgeKind::AboveBelow, node, other, width)
    }

    /// Record that `other` is to the right of `node` at a width.
    pub fn add_to_my_right(&mut self, node: NodeId, other: NodeId, width: u32) -> Result<EdgeId, GraphError> {
        self.link(EdgeKind::RightLeft, other, node, width)
    }

    /// Record that `other` is to the left of `node` at a width.
    pub fn add_to_my_left(&mut self, node: NodeId, other: NodeId, width: u32) -> Result<EdgeId, GraphError> {
        self.link(EdgeKind::RightLeft, node, other, width)
    }

    /// Find or create the edge `(node1, node2)` of `kind` and extend it by `width`.
    ///
    /// Overlap edges match in either order; all other kinds must match roles.
    fn link(&mut self, kind: EdgeKind, node1: NodeId, node2: NodeId, width: u32) -> Result<EdgeId, GraphError> {
        self.node(node2)?;
        let source = self.node(node1)?;
        if node1 == node2 {
            return Err(GraphError::SelfRelation(source.path().clone()));
        }

        let existing = source
            .edges(Adjacency::for_node1(kind))
            .iter()
            .copied()
            .find(|id| {
                let edge = &self.edges[id.index()];
                edge.kind() == kind
                    && if kind.is_symmetric() {
                        edge.joins(node1, node2)
                    } else {
                        edge.connects(node1, node2)
                    }
            });

        let id = match existing {
            Some(id) => id,
            None => {
                let id = EdgeId::new(self.edges.len());
                self.edges.push(Edge::new(kind, node1, node2));
                self.nodes[node1.index()].push_edge(Adjacency::for_node1(kind), id);
                self.nodes[node2.index()].push_edge(Adjacency::for_node2(kind), id);
                tracing::debug!(
                    kind = %kind,
                    node1 = %self.nodes[node1.index()].path(),
                    node2 = %self.nodes[node2.index()].path(),
                    width,
                    "edge created"
                );
                id
            }
        };

        self.edges[id.index()].add_viewport(width);
        Ok(id)
    }

    /// Reject a parent observation that breaks single-parent or acyclicity.
    fn check_parent(&self, parent: NodeId, child: NodeId, width: u32) -> Result<(), GraphError> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;

        if let Some(existing) = self.parent_at(child, width) {
            if existing != parent {
                return Err(GraphError::SecondParent {
                    child: child_node.path().clone(),
                    existing: self.nodes[existing.index()].path().clone(),
                    candidate: parent_node.path().clone(),
                    width,
                });
            }
        }

        if self.ancestors_at(parent, width).contains(&child) {
            return Err(GraphError::ParentCycle {
                parent: parent_node.path().clone(),
                child: child_node.path().clone(),
                width,
            });
        }
        Ok(())
    }

    /// Edges of one adjacency list of a node; empty for foreign ids.
    pub(crate) fn edges_of(&self, node: NodeId, adjacency: Adjacency) -> impl Iterator<Item = &Edge> {
        let ids: &[EdgeId] = match self.nodes.get(node.index()) {
            Some(n) => n.edges(adjacency),
            None => &[],
        };
        ids.iter().map(move |id| &self.edges[id.index()])
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.index())
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut RlgNode> {
        self.nodes.iter_mut()
    }

    /// Path of a node known to belong to this graph.
    pub(crate) fn path_of(&self, node: NodeId) -> &ElementPath {
        self.nodes[node.index()].path()
    }
}
