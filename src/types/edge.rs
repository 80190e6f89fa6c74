//! Edge types for the responsive layout graph.
//!
//! Every relation is stored as one tagged [`Edge`]: a kind, an ordered
//! endpoint pair and the [`Ranges`] of widths over which the relation was
//! observed. The kind fixes what `node1` and `node2` mean:
//!
//! | Kind | node1 | node2 |
//! |------|-------|-------|
//! | ParentChild | parent | child |
//! | Container | contained | container |
//! | Overlap | sibling1 | sibling2 |
//! | AboveBelow | above | below |
//! | RightLeft | right | left |

use serde::{Deserialize, Serialize};

use super::id::NodeId;
use super::range::Range;
use super::ranges::Ranges;

/// Error type for edge endpoint lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EdgeError {
    /// The node is neither endpoint of the edge.
    #[error("Node {node} is not an endpoint of {kind} edge ({node1}, {node2})")]
    EndpointNotFound {
        /// Node that was looked up.
        node: NodeId,
        /// Kind of the edge.
        kind: EdgeKind,
        /// First endpoint.
        node1: NodeId,
        /// Second endpoint.
        node2: NodeId,
    },
}

/// Kind of spatial relation an edge records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// DOM-visual parent contains child.
    ParentChild,
    /// Non-parent element visually contains another.
    Container,
    /// Sibling bounding boxes intersect.
    Overlap,
    /// One element sits above another.
    AboveBelow,
    /// One element sits to the right of another.
    RightLeft,
}

impl EdgeKind {
    /// All kinds, in a fixed order.
    pub const ALL: [EdgeKind; 5] = [
        EdgeKind::ParentChild,
        EdgeKind::Container,
        EdgeKind::Overlap,
        EdgeKind::AboveBelow,
        EdgeKind::RightLeft,
    ];

    /// Role names of `(node1, node2)`.
    pub fn roles(&self) -> (&'static str, &'static str) {
        match self {
            Self::ParentChild => ("parent", "child"),
            Self::Container => ("contained", "container"),
            Self::Overlap => ("sibling1", "sibling2"),
            Self::AboveBelow => ("above", "below"),
            Self::RightLeft => ("right", "left"),
        }
    }

    /// Check if endpoint order carries no meaning for this kind.
    pub fn is_symmetric(&self) -> bool {
        matches!(self, Self::Overlap)
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParentChild => write!(f, "parent-child"),
            Self::Container => write!(f, "container"),
            Self::Overlap => write!(f, "overlap"),
            Self::AboveBelow => write!(f, "above-below"),
            Self::RightLeft => write!(f, "right-left"),
        }
    }
}

/// Which sides of a child line up with its parent at one width.
///
/// Reported by the sampler alongside a parent-child observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Alignment {
    /// Left edges coincide.
    pub left: bool,
    /// Right edges coincide.
    pub right: bool,
    /// Top edges coincide.
    pub top: bool,
    /// Bottom edges coincide.
    pub bottom: bool,
    /// Child is horizontally centred in the parent.
    pub center_horizontal: bool,
    /// Child is vertically centred in the parent.
    pub center_vertical: bool,
}

/// Widths over which a child was justified against its parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justification {
    /// Left-justified widths.
    pub left: Ranges,
    /// Right-justified widths.
    pub right: Ranges,
    /// Top-justified widths.
    pub top: Ranges,
    /// Bottom-justified widths.
    pub bottom: Ranges,
    /// Horizontally centred widths.
    pub center_horizontal: Ranges,
    /// Vertically centred widths.
    pub center_vertical: Ranges,
}

impl Justification {
    /// Fold one width's alignment into the sub-ranges.
    pub fn record(&mut self, alignment: Alignment, width: u32) {
        let flags = [
            (alignment.left, &mut self.left),
            (alignment.right, &mut self.right),
            (alignment.top, &mut self.top),
            (alignment.bottom, &mut self.bottom),
            (alignment.center_horizontal, &mut self.center_horizontal),
            (alignment.center_vertical, &mut self.center_vertical),
        ];
        for (set, ranges) in flags {
            if set {
                ranges.add_value(width);
            }
        }
    }

    /// Named sub-ranges, in a fixed order.
    pub fn fields(&self) -> [(&'static str, &Ranges); 6] {
        [
            ("left-justified", &self.left),
            ("right-justified", &self.right),
            ("top-justified", &self.top),
            ("bottom-justified", &self.bottom),
            ("centre-justified", &self.center_horizontal),
            ("middle-justified", &self.center_vertical),
        ]
    }
}

/// Scratch state the overlap pass leaves on an edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapScratch {
    /// Intervals of this overlap explained as a protrusion.
    pub protrusions: Ranges,
}

/// Kind-specific state carried by an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payload", rename_all = "snake_case")]
pub enum EdgePayload {
    /// Parent-child justification sub-ranges.
    ParentChild(Justification),
    /// Overlap detector scratch.
    Overlap(OverlapScratch),
    /// No extra state.
    Plain,
}

/// A relation between two nodes over a set of widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    kind: EdgeKind,
    node1: NodeId,
    node2: NodeId,
    ranges: Ranges,
    payload: EdgePayload,
}

impl Edge {
    /// Create an edge with no observed widths yet.
    pub fn new(kind: EdgeKind, node1: NodeId, node2: NodeId) -> Self {
        let payload = match kind {
            EdgeKind::ParentChild => EdgePayload::ParentChild(Justification::default()),
            EdgeKind::Overlap => EdgePayload::Overlap(OverlapScratch::default()),
            _ => EdgePayload::Plain,
        };
        Self {
            kind,
            node1,
            node2,
            ranges: Ranges::new(),
            payload,
        }
    }

    /// Kind of relation.
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// First endpoint.
    pub fn node1(&self) -> NodeId {
        self.node1
    }

    /// Second endpoint.
    pub fn node2(&self) -> NodeId {
        self.node2
    }

    /// Widths over which the relation holds.
    pub fn ranges(&self) -> &Ranges {
        &self.ranges
    }

    /// Record the relation at one more width.
    pub fn add_viewport(&mut self, width: u32) {
        self.ranges.add_value(width);
    }

    /// Record the relation over an interval.
    pub fn add_range(&mut self, range: Range) {
        self.ranges.add_range(range);
    }

    /// Check if the relation holds at a width.
    pub fn holds_at(&self, width: u32) -> bool {
        self.ranges.contains(width)
    }

    /// Directional identity: same kind, same endpoints in the same roles.
    pub fn same_as(&self, other: &Edge) -> bool {
        self.kind == other.kind && self.node1 == other.node1 && self.node2 == other.node2
    }

    /// Direction-insensitive identity: same kind, same endpoint pair.
    pub fn has_the_same_nodes(&self, other: &Edge) -> bool {
        self.kind == other.kind && self.joins(other.node1, other.node2)
    }

    /// Check if `node1 == first` and `node2 == second`.
    pub fn connects(&self, first: NodeId, second: NodeId) -> bool {
        self.node1 == first && self.node2 == second
    }

    /// Check if the edge joins `a` and `b` in either order.
    pub fn joins(&self, a: NodeId, b: NodeId) -> bool {
        self.connects(a, b) || self.connects(b, a)
    }

    /// Check if a node is one of the endpoints.
    pub fn touches(&self, node: NodeId) -> bool {
        self.node1 == node || self.node2 == node
    }

    /// Endpoint opposite `node`.
    pub fn other_node(&self, node: NodeId) -> Result<NodeId, EdgeError> {
        if node == self.node1 {
            Ok(self.node2)
        } else if node == self.node2 {
            Ok(self.node1)
        } else {
            Err(EdgeError::EndpointNotFound {
                node,
                kind: self.kind,
                node1: self.node1,
                node2: self.node2,
            })
        }
    }

    // Role aliases. These only rename node1/node2; they do not check the kind.

    /// Parent of a parent-child edge.
    pub fn parent(&self) -> NodeId {
        self.node1
    }

    /// Child of a parent-child edge.
    pub fn child(&self) -> NodeId {
        self.node2
    }

    /// Contained element of a container edge.
    pub fn contained(&self) -> NodeId {
        self.node1
    }

    /// Containing element of a container edge.
    pub fn container(&self) -> NodeId {
        self.node2
    }

    /// First sibling of an overlap edge.
    pub fn sibling1(&self) -> NodeId {
        self.node1
    }

    /// Second sibling of an overlap edge.
    pub fn sibling2(&self) -> NodeId {
        self.node2
    }

    /// Upper element of an above-below edge.
    pub fn above(&self) -> NodeId {
        self.node1
    }

    /// Lower element of an above-below edge.
    pub fn below(&self) -> NodeId {
        self.node2
    }

    /// Right element of a right-left edge.
    pub fn right(&self) -> NodeId {
        self.node1
    }

    /// Left element of a right-left edge.
    pub fn left(&self) -> NodeId {
        self.node2
    }

    /// Kind-specific state.
    pub fn payload(&self) -> &EdgePayload {
        &self.payload
    }

    /// Justification sub-ranges, for parent-child edges.
    pub fn justification(&self) -> Option<&Justification> {
        match &self.payload {
            EdgePayload::ParentChild(justification) => Some(justification),
            _ => None,
        }
    }

    /// Mutable justification sub-ranges, for parent-child edges.
    pub fn justification_mut(&mut self) -> Option<&mut Justification> {
        match &mut self.payload {
            EdgePayload::ParentChild(justification) => Some(justification),
            _ => None,
        }
    }

    /// Detector scratch, for overlap edges.
    pub fn overlap_scratch(&self) -> Option<&OverlapScratch> {
        match &self.payload {
            EdgePayload::Overlap(scratch) => Some(scratch),
            _ => None,
        }
    }

    /// Mutable detector scratch, for overlap edges.
    pub fn overlap_scratch_mut(&mut self) -> Option<&mut OverlapScratch> {
        match &mut self.payload {
            EdgePayload::Overlap(scratch) => Some(scratch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (NodeId, NodeId, NodeId) {
        (NodeId::new(0), NodeId::new(1), NodeId::new(2))
    }

    #[test]
    fn test_payload_follows_kind() {
        let (a, b, _) = ids();
        assert!(Edge::new(EdgeKind::ParentChild, a, b).justification().is_some());
        assert!(Edge::new(EdgeKind::Overlap, a, b).overlap_scratch().is_some());
        let plain = Edge::new(EdgeKind::AboveBelow, a, b);
        assert!(plain.justification().is_none());
        assert_eq!(plain.payload(), &EdgePayload::Plain);
    }

    #[test]
    fn test_identity() {
        let (a, b, c) = ids();
        let ab = Edge::new(EdgeKind::AboveBelow, a, b);
        let ba = Edge::new(EdgeKind::AboveBelow, b, a);
        let ab_right = Edge::new(EdgeKind::RightLeft, a, b);

        assert!(ab.same_as(&ab.clone()));
        assert!(!ab.same_as(&ba));
        assert!(ab.has_the_same_nodes(&ba));
        assert!(!ab.has_the_same_nodes(&ab_right));
        assert!(!ab.has_the_same_nodes(&Edge::new(EdgeKind::AboveBelow, a, c)));
    }

    #[test]
    fn test_other_node() {
        let (a, b, c) = ids();
        let edge = Edge::new(EdgeKind::Overlap, a, b);
        assert_eq!(edge.other_node(a), Ok(b));
        assert_eq!(edge.other_node(b), Ok(a));
        assert_eq!(
            edge.other_node(c),
            Err(EdgeError::EndpointNotFound {
                node: c,
                kind: EdgeKind::Overlap,
                node1: a,
                node2: b,
            })
        );
    }

    #[test]
    fn test_add_viewport_merges() {
        let (a, b, _) = ids();
        let mut edge = Edge::new(EdgeKind::ParentChild, a, b);
        edge.add_viewport(400);
        edge.add_viewport(400);
        edge.add_viewport(401);
        assert_eq!(edge.ranges().len(), 1);
        assert_eq!(edge.ranges().total_span(), 2);
        assert!(edge.holds_at(401));
        assert!(!edge.holds_at(402));
    }

    #[test]
    fn test_justification_record() {
        let mut justification = Justification::default();
        let alignment = Alignment { left: true, top: true, ..Alignment::default() };
        justification.record(alignment, 500);
        justification.record(alignment, 501);
        assert!(justification.left.contains(500));
        assert!(justification.top.contains(501));
        assert!(justification.right.is_empty());
        assert_eq!(justification.fields()[0].0, "left-justified");
    }

    #[test]
    fn test_roles() {
        assert_eq!(EdgeKind::ParentChild.roles(), ("parent", "child"));
        assert_eq!(EdgeKind::RightLeft.roles(), ("right", "left"));
        assert!(EdgeKind::Overlap.is_symmetric());
        assert!(!EdgeKind::Container.is_symmetric());
    }
}
