//! Core types for the responsive layout graph.

pub mod id;
pub mod range;
pub mod ranges;
pub mod path;
pub mod edge;
pub mod failure;

pub use id::{NodeId, EdgeId};
pub use range::{Range, RangeError, RangeLabels, width_from_f64};
pub use ranges::Ranges;
pub use path::{ElementPath, PathError};
pub use edge::{
    Edge, EdgeKind, EdgeError, EdgePayload, Alignment, Justification, OverlapScratch,
};
pub use failure::{
    ViewportProtrusion, ElementProtrusion, ElementCollision, Smallrange, Wrapping,
    WrapHeuristic, FailureKind, FailureSet, RepairOutcome, RepairTally,
};
