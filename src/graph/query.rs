//! Per-width structural queries.
//!
//! All queries take a single viewport width and only follow edges whose
//! ranges cover it. Parent and child chains are walked recursively; pages
//! nest a few dozen levels at most and construction rejects cycles.
//!
//! Ids that do not belong to the graph behave like isolated nodes.

use std::collections::BTreeSet;

use super::{Adjacency, Rlg};
use crate::types::{Edge, NodeId};

impl Rlg {
    /// Parent edge of `node` covering `width`.
    pub fn parent_edge_at(&self, node: NodeId, width: u32) -> Option<&Edge> {
        self.edges_of(node, Adjacency::Parent).find(|e| e.holds_at(width))
    }

    /// Parent of `node` at `width`.
    pub fn parent_at(&self, node: NodeId, width: u32) -> Option<NodeId> {
        self.parent_edge_at(node, width).map(|e| e.parent())
    }

    /// Outermost ancestor of `node` at `width`, or `node` itself when it has
    /// no parent there.
    pub fn top_parent_at(&self, node: NodeId, width: u32) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent_at(current, width) {
            current = parent;
        }
        current
    }

    /// Proper ancestors of `node` at `width`, root first.
    pub fn ancestors_at(&self, node: NodeId, width: u32) -> Vec<NodeId> {
        match self.parent_at(node, width) {
            None => Vec::new(),
            Some(parent) => {
                let mut ancestors = self.ancestors_at(parent, width);
                ancestors.push(parent);
                ancestors
            }
        }
    }

    /// `node` and every node below it at `width`, in pre-order.
    pub fn descendants_at(&self, node: NodeId, width: u32) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(node, width, &mut out);
        out
    }

    fn collect_descendants(&self, node: NodeId, width: u32, out: &mut Vec<NodeId>) {
        out.push(node);
        for edge in self.edges_of(node, Adjacency::Child) {
            if edge.holds_at(width) {
                self.collect_descendants(edge.child(), width, out);
            }
        }
    }

    /// Nodes beside `node` at `width` that are not also stacked with it.
    ///
    /// Sorted by id, without duplicates and without `node` itself.
    pub fn row_nodes_at(&self, node: NodeId, width: u32) -> Vec<NodeId> {
        let neighbours: BTreeSet<NodeId> = self
            .edges_of(node, Adjacency::RightLeft)
            .filter(|e| e.holds_at(width))
            .filter_map(|e| e.other_node(node).ok())
            .filter(|other| !self.is_vertically_adjacent_at(node, *other, width))
            .collect();
        neighbours.into_iter().collect()
    }

    /// Check if `a` and `b` are side by side at `width`.
    pub fn is_horizontally_adjacent_at(&self, a: NodeId, b: NodeId, width: u32) -> bool {
        self.edges_of(a, Adjacency::RightLeft)
            .any(|e| e.joins(a, b) && e.holds_at(width))
    }

    /// Check if `a` and `b` are stacked at `width`.
    pub fn is_vertically_adjacent_at(&self, a: NodeId, b: NodeId, width: u32) -> bool {
        self.edges_of(a, Adjacency::AboveBelow)
            .any(|e| e.joins(a, b) && e.holds_at(width))
    }

    /// Check if `container` is recorded as visually containing `node` at `width`.
    pub fn is_container_at(&self, node: NodeId, container: NodeId, width: u32) -> bool {
        self.edges_of(node, Adjacency::Container)
            .any(|e| e.connects(node, container) && e.holds_at(width))
    }
}
