//! # rlg-kernel
//!
//! Responsive layout graphs and layout failure detection.
//!
//! The kernel answers one question:
//!
//! > Given how a page's elements relate to each other at every viewport
//! > width, **where does the layout break**?
//!
//! ## Core Contract
//!
//! 1. Fold a width sweep of (element, relation, width) observations into a
//!    graph whose edges carry the widths over which each relation held
//! 2. Detect responsive layout failures over that graph, per node
//! 3. Produce a **failure fingerprint** for regression comparison
//! 4. Diff two graphs of the same page edge by edge
//!
//! ## Architecture
//!
//! ```text
//! Sweep → Rlg (nodes + typed edges over Ranges) → DetectionPolicy → detect → FailureSet per node
//!                                                                          ↓
//!                                                                  DetectionSummary
//! Rlg(before) × Rlg(after) → GraphDiff
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same sweep + same policy → identical `failures_hash`
//! - Ranges are kept canonical (sorted, maximally merged) after every update
//! - Cross-graph identity is the element path, never the arena index

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod graph;
pub mod sweep;
pub mod detect;
pub mod diff;
pub mod canonical;

// Re-exports
pub use types::{
    Range, RangeError, RangeLabels, Ranges, width_from_f64,
    ElementPath, PathError, NodeId, EdgeId,
    Edge, EdgeKind, EdgeError, EdgePayload, Alignment, Justification, OverlapScratch,
    ViewportProtrusion, ElementProtrusion, ElementCollision, Smallrange, Wrapping,
    WrapHeuristic, FailureKind, FailureSet, RepairOutcome, RepairTally,
};
pub use policy::{DetectionPolicy, DEFAULT_BODY_PATH, DEFAULT_ROW_THRESHOLD, DEFAULT_SMALLRANGE_THRESHOLD};
pub use graph::{Adjacency, GraphError, Rlg, RlgNode};
pub use sweep::{IngestStats, Observation, Relation, Sweep};
pub use detect::DetectionSummary;
pub use diff::{EdgeDelta, EdgeMatching, GraphDiff, NodeDiff, match_edges};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Schema version for serialized graph, failure and diff types.
/// Increment on breaking changes to any schema type.
pub const RLG_SCHEMA_VERSION: &str = "1.0.0";

/// Default policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "detection_policy_v1";
