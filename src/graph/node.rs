//! Graph vertices.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{EdgeId, EdgeKind, ElementPath, FailureSet, NodeId, Ranges, RepairTally};

/// One of the six adjacency lists a node keeps.
///
/// Parent-child edges are split by role; every other kind keeps a single
/// list holding the edge in whichever role this node plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjacency {
    /// Edges where this node is the child.
    Parent,
    /// Edges where this node is the parent.
    Child,
    /// Container edges, either role.
    Container,
    /// Overlap edges, either role.
    Overlap,
    /// Above-below edges, either role.
    AboveBelow,
    /// Right-left edges, either role.
    RightLeft,
}

impl Adjacency {
    /// All lists, in a fixed order.
    pub const ALL: [Adjacency; 6] = [
        Adjacency::Parent,
        Adjacency::Child,
        Adjacency::Container,
        Adjacency::Overlap,
        Adjacency::AboveBelow,
        Adjacency::RightLeft,
    ];

    /// Edge kind stored in this list.
    pub fn kind(&self) -> EdgeKind {
        match self {
            Self::Parent | Self::Child => EdgeKind::ParentChild,
            Self::Container => EdgeKind::Container,
            Self::Overlap => EdgeKind::Overlap,
            Self::AboveBelow => EdgeKind::AboveBelow,
            Self::RightLeft => EdgeKind::RightLeft,
        }
    }

    /// List holding edges of `kind` on the `node1` side.
    pub(crate) fn for_node1(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::ParentChild => Self::Child,
            EdgeKind::Container => Self::Container,
            EdgeKind::Overlap => Self::Overlap,
            EdgeKind::AboveBelow => Self::AboveBelow,
            EdgeKind::RightLeft => Self::RightLeft,
        }
    }

    /// List holding edges of `kind` on the `node2` side.
    pub(crate) fn for_node2(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::ParentChild => Self::Parent,
            other => Self::for_node1(other),
        }
    }
}

impl fmt::Display for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => write!(f, "parent"),
            Self::Child => write!(f, "child"),
            Self::Container => write!(f, "container"),
            Self::Overlap => write!(f, "overlap"),
            Self::AboveBelow => write!(f, "above-below"),
            Self::RightLeft => write!(f, "right-left"),
        }
    }
}

/// A DOM element tracked across the width sweep.
#[derive(Debug, Clone)]
pub struct RlgNode {
    id: NodeId,
    path: ElementPath,
    existence: Ranges,
    parents: Vec<EdgeId>,
    children: Vec<EdgeId>,
    containers: Vec<EdgeId>,
    overlaps: Vec<EdgeId>,
    above_below: Vec<EdgeId>,
    right_left: Vec<EdgeId>,
    pub(crate) failures: FailureSet,
    repairs: RepairTally,
}

impl RlgNode {
    pub(crate) fn new(id: NodeId, path: ElementPath) -> Self {
        Self {
            id,
            path,
            existence: Ranges::new(),
            parents: Vec::new(),
            children: Vec::new(),
            containers: Vec::new(),
            overlaps: Vec::new(),
            above_below: Vec::new(),
            right_left: Vec::new(),
            failures: FailureSet::default(),
            repairs: RepairTally::default(),
        }
    }

    /// Arena index.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Element path (identity key).
    pub fn path(&self) -> &ElementPath {
        &self.path
    }

    /// Widths at which the element was rendered.
    pub fn existence(&self) -> &Ranges {
        &self.existence
    }

    pub(crate) fn existence_mut(&mut self) -> &mut Ranges {
        &mut self.existence
    }

    /// Edge ids in one adjacency list.
    pub fn edges(&self, adjacency: Adjacency) -> &[EdgeId] {
        match adjacency {
            Adjacency::Parent => &self.parents,
            Adjacency::Child => &self.children,
            Adjacency::Container => &self.containers,
            Adjacency::Overlap => &self.overlaps,
            Adjacency::AboveBelow => &self.above_below,
            Adjacency::RightLeft => &self.right_left,
        }
    }

    pub(crate) fn push_edge(&mut self, adjacency: Adjacency, edge: EdgeId) {
        let list = match adjacency {
            Adjacency::Parent => &mut self.parents,
            Adjacency::Child => &mut self.children,
            Adjacency::Container => &mut self.containers,
            Adjacency::Overlap => &mut self.overlaps,
            Adjacency::AboveBelow => &mut self.above_below,
            Adjacency::RightLeft => &mut self.right_left,
        };
        list.push(edge);
    }

    /// Failures attributed to this node by the last detection run.
    pub fn failures(&self) -> &FailureSet {
        &self.failures
    }

    /// Mutable failures, for downstream classifiers writing range labels.
    pub fn failures_mut(&mut self) -> &mut FailureSet {
        &mut self.failures
    }

    /// Repair outcomes recorded by downstream fixers.
    pub fn repairs(&self) -> &RepairTally {
        &self.repairs
    }

    /// Mutable repair outcomes.
    pub fn repairs_mut(&mut self) -> &mut RepairTally {
        &mut self.repairs
    }
}
