//! Element protrusion and element collision.
//!
//! Both failures start from an overlap interval `I = [m, M]` between two
//! siblings and look at what changes between `M` and `M + 1`:
//!
//! - **Protrusion**: at `M + 1` one sibling is nested inside the other's
//!   subtree; at `M` it has a new parent and the old parent no longer
//!   visually contains it. The element has pushed out of its container.
//! - **Collision**: neither sibling changes parent across the boundary,
//!   so the overlap is two stable siblings running into each other.
//!
//! Protrusions are computed for the whole graph before collisions, so a
//! collision explained by a protrusion on either sibling is suppressed no
//! matter which node the protrusion was attributed to. With protrusion
//! detection off nothing is reported that could explain a collision, so
//! every collision between stable siblings is kept.

use crate::graph::{Adjacency, GraphError, Rlg};
use crate::policy::DetectionPolicy;
use crate::types::{EdgeId, ElementCollision, ElementProtrusion, NodeId, Range, RangeLabels};

/// Output of the overlap pass.
#[derive(Debug, Default)]
pub struct OverlapFindings {
    /// Protrusions, keyed by the protruding node.
    pub protrusions: Vec<(NodeId, ElementProtrusion)>,
    /// Collisions, keyed by the edge's first sibling.
    pub collisions: Vec<(NodeId, ElementCollision)>,
    /// Protruding intervals per overlap edge.
    pub scratch: Vec<(EdgeId, Range)>,
}

/// One overlap interval with the parents on both sides of its upper bound.
struct Boundary {
    edge: EdgeId,
    sibling1: NodeId,
    sibling2: NodeId,
    range: Range,
}

impl Boundary {
    fn at(&self) -> u32 {
        self.range.end()
    }

    fn wider(&self) -> u32 {
        self.range.wider()
    }
}

/// Run the overlap pass over every overlap edge in the graph.
pub fn detect(graph: &Rlg, policy: &DetectionPolicy) -> Result<OverlapFindings, GraphError> {
    let boundaries = collect_boundaries(graph);
    let mut findings = OverlapFindings::default();

    if policy.detect_element_protrusion {
        for boundary in &boundaries {
            let pairs = [
                (boundary.sibling1, boundary.sibling2),
                (boundary.sibling2, boundary.sibling1),
            ];
            for (node, sibling) in pairs {
                if let Some(failure) = protrusion(graph, boundary, node, sibling)? {
                    findings.scratch.push((boundary.edge, boundary.range));
                    findings.protrusions.push((node, failure));
                }
            }
        }
    }

    if !policy.detect_element_collision {
        return Ok(findings);
    }
    for boundary in &boundaries {
        if !is_stable(graph, boundary, boundary.sibling1) || !is_stable(graph, boundary, boundary.sibling2) {
            continue;
        }
        let explained = findings.protrusions.iter().any(|(node, p)| {
            (*node == boundary.sibling1 || *node == boundary.sibling2) && p.range.contains(boundary.at())
        });
        if explained {
            tracing::debug!(
                node1 = %graph.path_of(boundary.sibling1),
                node2 = %graph.path_of(boundary.sibling2),
                range = %boundary.range,
                "collision explained by protrusion"
            );
            continue;
        }
        findings.collisions.push((
            boundary.sibling1,
            ElementCollision {
                node1: graph.path_of(boundary.sibling1).clone(),
                node2: graph.path_of(boundary.sibling2).clone(),
                range: boundary.range,
                labels: RangeLabels::default(),
            },
        ));
    }

    Ok(findings)
}

/// Every interval of every overlap edge, visiting each edge once.
///
/// Intervals where either sibling has no parent just above the upper bound
/// carry no structural evidence and are dropped.
fn collect_boundaries(graph: &Rlg) -> Vec<Boundary> {
    let mut boundaries = Vec::new();
    for node in graph.nodes() {
        for &edge_id in node.edges(Adjacency::Overlap) {
            let Some(edge) = graph.edge(edge_id) else { continue };
            if edge.sibling1() != node.id() {
                continue;
            }
            for range in edge.ranges().iter_by_decreasing_max() {
                let wider = range.wider();
                if graph.parent_at(edge.sibling1(), wider).is_none()
                    || graph.parent_at(edge.sibling2(), wider).is_none()
                {
                    continue;
                }
                boundaries.push(Boundary {
                    edge: edge_id,
                    sibling1: edge.sibling1(),
                    sibling2: edge.sibling2(),
                    range: *range,
                });
            }
        }
    }
    boundaries
}

fn is_stable(graph: &Rlg, boundary: &Boundary, node: NodeId) -> bool {
    graph.parent_at(node, boundary.at()) == graph.parent_at(node, boundary.wider())
}

fn protrusion(
    graph: &Rlg,
    boundary: &Boundary,
    node: NodeId,
    sibling: NodeId,
) -> Result<Option<ElementProtrusion>, GraphError> {
    let (Some(offending), Some(former)) = (
        graph.parent_at(node, boundary.at()),
        graph.parent_at(node, boundary.wider()),
    ) else {
        return Ok(None);
    };
    if offending == former
        || !graph.ancestors_at(node, boundary.wider()).contains(&sibling)
        || graph.is_container_at(node, former, boundary.at())
    {
        return Ok(None);
    }

    let path = graph.node(node)?.path();
    tracing::debug!(node = %path, sibling = %graph.path_of(sibling), range = %boundary.range, "element protrusion");
    Ok(Some(ElementProtrusion {
        node: path.clone(),
        sibling: graph.path_of(sibling).clone(),
        offending_parent: graph.path_of(offending).clone(),
        former_parent: graph.path_of(former).clone(),
        range: boundary.range,
        labels: RangeLabels::default(),
    }))
}
