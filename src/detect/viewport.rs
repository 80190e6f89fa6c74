//! Viewport protrusion.
//!
//! An element protrudes from the viewport over the widths where it is
//! rendered but has no parent, provided that just above those widths it
//! still sat somewhere inside the page body.

use crate::graph::{Adjacency, GraphError, Rlg};
use crate::policy::DetectionPolicy;
use crate::types::{NodeId, RangeLabels, Ranges, ViewportProtrusion};

/// Viewport protrusions of one node, widest interval first.
pub fn detect(
    graph: &Rlg,
    node: NodeId,
    policy: &DetectionPolicy,
) -> Result<Vec<ViewportProtrusion>, GraphError> {
    let rlg_node = graph.node(node)?;

    let mut contained = Ranges::new();
    for edge in graph.edges_of(node, Adjacency::Parent) {
        contained.extend(edge.ranges());
    }
    let uncontained = rlg_node.existence().but_not_in(&contained);

    let mut found = Vec::new();
    for range in uncontained.iter_by_decreasing_max() {
        let wider = range.wider();
        if !contained.contains(wider) {
            continue;
        }
        let top = graph.top_parent_at(node, wider);
        if graph.path_of(top).is_body_of(&policy.body_path) {
            tracing::debug!(node = %rlg_node.path(), range = %range, "viewport protrusion");
            found.push(ViewportProtrusion {
                node: rlg_node.path().clone(),
                range: *range,
                labels: RangeLabels::default(),
            });
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Range;

    fn sweep(graph: &mut Rlg, node: NodeId, parent: NodeId, widths: std::ops::RangeInclusive<u32>, nested: bool) {
        for w in widths {
            graph.add_existence(node, w).unwrap();
            if nested {
                graph.add_child(parent, node, w).unwrap();
            }
        }
    }

    #[test]
    fn test_protrusion_below_body() {
        let mut graph = Rlg::new();
        let body = graph.add_node("/HTML/BODY").unwrap();
        let div = graph.add_node("/HTML/BODY/DIV").unwrap();
        sweep(&mut graph, div, body, 320..=599, false);
        sweep(&mut graph, div, body, 600..=1400, true);

        let found = detect(&graph, div, &DetectionPolicy::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range, Range::new(320, 599).unwrap());
        assert!(found[0].labels.is_unclassified());
    }

    #[test]
    fn test_no_protrusion_when_top_parent_is_not_body() {
        let mut graph = Rlg::new();
        let root = graph.add_node("/HTML/MAIN").unwrap();
        let div = graph.add_node("/HTML/MAIN/DIV").unwrap();
        sweep(&mut graph, div, root, 320..=599, false);
        sweep(&mut graph, div, root, 600..=1400, true);

        assert!(detect(&graph, div, &DetectionPolicy::default()).unwrap().is_empty());
        let policy = DetectionPolicy::default().with_body_path("/HTML/MAIN");
        assert_eq!(detect(&graph, div, &policy).unwrap().len(), 1);
    }

    #[test]
    fn test_uncontained_above_range_is_not_protrusion() {
        let mut graph = Rlg::new();
        let body = graph.add_node("/HTML/BODY").unwrap();
        let div = graph.add_node("/HTML/BODY/DIV").unwrap();
        // Nested only at narrow widths; free at the widest ones.
        sweep(&mut graph, div, body, 320..=999, true);
        sweep(&mut graph, div, body, 1000..=1400, false);

        assert!(detect(&graph, div, &DetectionPolicy::default()).unwrap().is_empty());
    }

    #[test]
    fn test_intervals_reported_widest_first() {
        let mut graph = Rlg::new();
        let body = graph.add_node("/HTML/BODY").unwrap();
        let div = graph.add_node("/HTML/BODY/DIV").unwrap();
        sweep(&mut graph, div, body, 320..=399, false);
        sweep(&mut graph, div, body, 400..=699, true);
        sweep(&mut graph, div, body, 700..=799, false);
        sweep(&mut graph, div, body, 800..=1400, true);

        let found = detect(&graph, div, &DetectionPolicy::default()).unwrap();
        let ranges: Vec<_> = found.iter().map(|f| f.range).collect();
        assert_eq!(ranges, vec![Range::new(700, 799).unwrap(), Range::new(320, 399).unwrap()]);
    }
}
