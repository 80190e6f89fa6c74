//! Detection scenarios for the responsive layout graph.
//!
//! Each test builds a small page by hand (or from a sweep) and checks the
//! failures reported for it.

use rlg_kernel::{
    DetectionPolicy, FailureKind, NodeId, Observation, Range, Relation, Rlg, Sweep,
    WrapHeuristic,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

const NARROWEST: u32 = 320;
const WIDEST: u32 = 1920;

fn node(graph: &mut Rlg, path: &str) -> NodeId {
    graph.add_node(path).unwrap()
}

fn exists(graph: &mut Rlg, id: NodeId, from: u32, to: u32) {
    for w in from..=to {
        graph.add_existence(id, w).unwrap();
    }
}

fn nest(graph: &mut Rlg, parent: NodeId, child: NodeId, from: u32, to: u32) {
    for w in from..=to {
        graph.add_child(parent, child, w).unwrap();
    }
}

fn overlap(graph: &mut Rlg, a: NodeId, b: NodeId, from: u32, to: u32) {
    for w in from..=to {
        graph.add_overlap(a, b, w).unwrap();
    }
}

/// body > DIV > {A, B}, all present across the sweep.
fn siblings() -> (Rlg, NodeId, NodeId, NodeId) {
    let mut graph = Rlg::new();
    let body = node(&mut graph, "/HTML/BODY");
    let div = node(&mut graph, "/HTML/BODY/DIV");
    let a = node(&mut graph, "/HTML/BODY/DIV/A");
    let b = node(&mut graph, "/HTML/BODY/DIV/B");
    nest(&mut graph, body, div, NARROWEST, WIDEST);
    nest(&mut graph, div, a, NARROWEST, WIDEST);
    (graph, div, a, b)
}

// ─────────────────────────────────────────────────────────────────────────────
// VIEWPORT PROTRUSION
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_viewport_protrusion_below_breakpoint() {
    let mut graph = Rlg::new();
    let body = node(&mut graph, "/HTML/BODY");
    let div = node(&mut graph, "/HTML/BODY/DIV");
    exists(&mut graph, div, NARROWEST, WIDEST);
    nest(&mut graph, body, div, 600, WIDEST);

    let summary = graph.detect(&DetectionPolicy::default()).unwrap();
    assert_eq!(summary.total(), 1);

    let failures = &graph.node(div).unwrap().failures().viewport_protrusions;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].range, Range::new(320, 599).unwrap());
    assert_eq!(failures[0].node.as_str(), "/HTML/BODY/DIV");
}

// ─────────────────────────────────────────────────────────────────────────────
// COLLISION AND PROTRUSION
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_collision_with_stable_parent() {
    let (mut graph, div, a, b) = siblings();
    nest(&mut graph, div, b, NARROWEST, WIDEST);
    overlap(&mut graph, a, b, NARROWEST, 500);

    let summary = graph.detect(&DetectionPolicy::default()).unwrap();
    assert_eq!(summary.count(FailureKind::ElementCollision), 1);
    assert_eq!(summary.count(FailureKind::ElementProtrusion), 0);

    let collisions = &graph.node(a).unwrap().failures().element_collisions;
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].range.end(), 500);
    assert_eq!(collisions[0].node2.as_str(), "/HTML/BODY/DIV/B");
    assert!(graph.node(b).unwrap().failures().element_collisions.is_empty());
}

#[test]
fn test_protrusion_out_of_sibling() {
    let (mut graph, div, a, b) = siblings();
    // Above 500, B sits inside Q, a child of A; below, B is reparented to DIV.
    let q = node(&mut graph, "/HTML/BODY/DIV/A/Q");
    nest(&mut graph, a, q, NARROWEST, WIDEST);
    nest(&mut graph, div, b, NARROWEST, 500);
    nest(&mut graph, q, b, 501, WIDEST);
    overlap(&mut graph, a, b, NARROWEST, 500);

    let summary = graph.detect(&DetectionPolicy::default()).unwrap();
    assert_eq!(summary.count(FailureKind::ElementProtrusion), 1);
    assert_eq!(summary.count(FailureKind::ElementCollision), 0);

    let protrusions = &graph.node(b).unwrap().failures().element_protrusions;
    assert_eq!(protrusions.len(), 1);
    let protrusion = &protrusions[0];
    assert_eq!(protrusion.offending_parent.as_str(), "/HTML/BODY/DIV");
    assert_eq!(protrusion.former_parent.as_str(), "/HTML/BODY/DIV/A/Q");
    assert_eq!(protrusion.sibling.as_str(), "/HTML/BODY/DIV/A");
    assert_eq!(protrusion.range.end(), 500);

    // The protruding interval is left on the overlap edge.
    let edge = graph
        .edges()
        .find(|e| e.overlap_scratch().is_some())
        .unwrap();
    assert!(edge.overlap_scratch().unwrap().protrusions.contains(500));
}

#[test]
fn test_protrusion_without_collision_flag() {
    let (mut graph, div, a, b) = siblings();
    let q = node(&mut graph, "/HTML/BODY/DIV/A/Q");
    nest(&mut graph, a, q, NARROWEST, WIDEST);
    nest(&mut graph, div, b, NARROWEST, 500);
    nest(&mut graph, q, b, 501, WIDEST);
    overlap(&mut graph, a, b, NARROWEST, 500);

    let policy = DetectionPolicy::none().with_element_collision();
    let summary = graph.detect(&policy).unwrap();
    // B is reparented across the boundary: not a collision, and protrusions are off.
    assert_eq!(summary.total(), 0);
    assert!(graph.node(b).unwrap().failures().element_protrusions.is_empty());
}

#[test]
fn test_collision_explained_by_protrusion_elsewhere() {
    // A leaves Q (inside C) at 600 and protrudes out of C over [320, 600];
    // its overlap with B over [320, 500] has no reparenting of either side.
    let mut graph = Rlg::new();
    let body = node(&mut graph, "/HTML/BODY");
    let a = node(&mut graph, "/HTML/BODY/A");
    let b = node(&mut graph, "/HTML/BODY/B");
    let c = node(&mut graph, "/HTML/BODY/C");
    let q = node(&mut graph, "/HTML/BODY/C/Q");
    nest(&mut graph, body, b, NARROWEST, WIDEST);
    nest(&mut graph, body, c, NARROWEST, WIDEST);
    nest(&mut graph, c, q, NARROWEST, WIDEST);
    nest(&mut graph, body, a, NARROWEST, 600);
    nest(&mut graph, q, a, 601, WIDEST);
    overlap(&mut graph, a, c, NARROWEST, 600);
    overlap(&mut graph, a, b, NARROWEST, 500);

    let summary = graph.detect(&DetectionPolicy::default()).unwrap();
    assert_eq!(summary.count(FailureKind::ElementProtrusion), 1);
    assert_eq!(summary.count(FailureKind::ElementCollision), 0);

    // Without protrusion reporting there is nothing to explain the overlap.
    let summary = graph.detect(&DetectionPolicy::none().with_element_collision()).unwrap();
    assert_eq!(summary.count(FailureKind::ElementCollision), 1);
    let collisions = &graph.node(a).unwrap().failures().element_collisions;
    assert_eq!(collisions[0].node2.as_str(), "/HTML/BODY/B");
    assert_eq!(collisions[0].range, Range::new(NARROWEST, 500).unwrap());
    assert!(graph.edges().all(|e| e
        .overlap_scratch()
        .map_or(true, |s| s.protrusions.is_empty())));
}

// ─────────────────────────────────────────────────────────────────────────────
// WRAPPING
// ─────────────────────────────────────────────────────────────────────────────

/// Five row members side by side everywhere; N below all of them up to `max`.
fn wrapped_row(max: u32, n_in_row_above: bool) -> (Rlg, NodeId) {
    let mut graph = Rlg::new();
    let members: Vec<NodeId> = (1..=5)
        .map(|i| node(&mut graph, &format!("/HTML/BODY/UL/LI[{i}]")))
        .collect();
    let n = node(&mut graph, "/HTML/BODY/UL/LI[6]");

    for (i, &left) in members.iter().enumerate() {
        for &right in &members[i + 1..] {
            for w in NARROWEST..=WIDEST {
                graph.add_to_my_right(left, right, w).unwrap();
            }
        }
        for w in NARROWEST..=max {
            graph.add_above_me(n, left, w).unwrap();
        }
        if n_in_row_above {
            for w in max + 1..=WIDEST {
                graph.add_to_my_right(left, n, w).unwrap();
            }
        }
    }
    (graph, n)
}

#[test]
fn test_wrapping_bottom_up_single_report() {
    let (mut graph, n) = wrapped_row(767, false);

    let summary = graph.detect(&DetectionPolicy::new(4, 5)).unwrap();
    assert_eq!(summary.count(FailureKind::Wrapping), 1);

    let wrappings = &graph.node(n).unwrap().failures().wrappings;
    assert_eq!(wrappings.len(), 1);
    assert_eq!(wrappings[0].heuristic, WrapHeuristic::BottomUp);
    assert_eq!(wrappings[0].range, Range::new(NARROWEST, 767).unwrap());
    assert_eq!(wrappings[0].row.len(), 5);
}

#[test]
fn test_wrapping_full_row_reported_by_both_heuristics() {
    let (mut graph, n) = wrapped_row(767, true);

    graph.detect(&DetectionPolicy::new(4, 5)).unwrap();
    let wrappings = &graph.node(n).unwrap().failures().wrappings;
    assert_eq!(wrappings.len(), 2);
    assert_eq!(wrappings[0].heuristic, WrapHeuristic::TopDown);
    assert_eq!(wrappings[1].heuristic, WrapHeuristic::BottomUp);
    assert_eq!(wrappings[0].range, wrappings[1].range);
}

#[test]
fn test_wrapping_below_row_threshold() {
    let (mut graph, _) = wrapped_row(767, false);
    let summary = graph.detect(&DetectionPolicy::new(6, 5)).unwrap();
    assert_eq!(summary.count(FailureKind::Wrapping), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// SMALL RANGE
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_small_range_flicker() {
    let mut graph = Rlg::new();
    let a = node(&mut graph, "/HTML/BODY/A");
    let b = node(&mut graph, "/HTML/BODY/B");
    for w in NARROWEST..=WIDEST {
        if (700..=703).contains(&w) {
            graph.add_overlap(a, b, w).unwrap();
        } else {
            graph.add_to_my_right(b, a, w).unwrap();
            graph.add_above_me(b, a, w).unwrap();
        }
    }

    let summary = graph.detect(&DetectionPolicy::default()).unwrap();
    assert_eq!(summary.count(FailureKind::Smallrange), 1);
    let flicker = &graph.node(a).unwrap().failures().smallranges[0];
    assert_eq!(flicker.range, Range::new(700, 703).unwrap());
    assert_eq!(flicker.node2.as_str(), "/HTML/BODY/B");
}

// ─────────────────────────────────────────────────────────────────────────────
// SWEEP INGESTION AND DETERMINISM
// ─────────────────────────────────────────────────────────────────────────────

fn viewport_sweep() -> Sweep {
    let mut observations = Vec::new();
    for w in NARROWEST..=WIDEST {
        observations.push(Observation {
            element: "/HTML/BODY/DIV".to_string(),
            other: None,
            relation: Relation::Exists,
            width: f64::from(w),
            alignment: None,
        });
    }
    for w in 600..=WIDEST {
        observations.push(Observation {
            element: "/HTML/BODY".to_string(),
            other: Some("/HTML/BODY/DIV".to_string()),
            relation: Relation::Child,
            width: f64::from(w),
            alignment: None,
        });
    }
    Sweep { observations }
}

#[test]
fn test_sweep_round_trip_through_json() {
    let json = serde_json::to_string(&viewport_sweep()).unwrap();
    let sweep = Sweep::from_json_str(&json).unwrap();
    let (mut graph, stats) = Rlg::from_sweep(&sweep);
    assert_eq!(stats.rejected, 0);

    let summary = graph.detect(&DetectionPolicy::default()).unwrap();
    assert_eq!(summary.count(FailureKind::ViewportProtrusion), 1);
}

#[test]
fn test_same_sweep_same_fingerprint() {
    let policy = DetectionPolicy::default();
    let mut hashes = Vec::new();
    for _ in 0..10 {
        let (mut graph, _) = Rlg::from_sweep(&viewport_sweep());
        hashes.push(graph.detect(&policy).unwrap().failures_hash);
    }
    for (i, hash) in hashes.iter().enumerate() {
        assert_eq!(&hashes[0], hash, "Fingerprint must be deterministic (run {} differs from run 0)", i);
    }
}
