//! Responsive layout failure records.
//!
//! Detection only fills these in. Repair, screenshots and classification
//! belong to downstream consumers, which read the records off each node and
//! write boundary verdicts back through [`RangeLabels`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::edge::EdgeKind;
use super::path::ElementPath;
use super::range::{Range, RangeLabels};

/// Element escapes the page body as the viewport narrows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportProtrusion {
    /// Protruding element.
    pub node: ElementPath,
    /// Widths with no containing parent.
    pub range: Range,
    /// Boundary classification.
    pub labels: RangeLabels,
}

/// Element leaves its container and lands inside a sibling's subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementProtrusion {
    /// Protruding element.
    pub node: ElementPath,
    /// Overlapping sibling it was nested inside before narrowing.
    pub sibling: ElementPath,
    /// Parent at the narrower width (the element it now overflows into).
    pub offending_parent: ElementPath,
    /// Parent just past the range's upper bound.
    pub former_parent: ElementPath,
    /// Overlap interval.
    pub range: Range,
    /// Boundary classification.
    pub labels: RangeLabels,
}

/// Two siblings overlap without either being reparented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCollision {
    /// First sibling.
    pub node1: ElementPath,
    /// Second sibling.
    pub node2: ElementPath,
    /// Overlap interval.
    pub range: Range,
    /// Boundary classification.
    pub labels: RangeLabels,
}

/// Relationship state between two elements flickers over a narrow band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smallrange {
    /// First element.
    pub node1: ElementPath,
    /// Second element.
    pub node2: ElementPath,
    /// Relation whose short interval triggered the report.
    pub kind: EdgeKind,
    /// Flickering interval.
    pub range: Range,
    /// Boundary classification.
    pub labels: RangeLabels,
}

/// Heuristic that produced a wrapping report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapHeuristic {
    /// Row verified from a row member downwards.
    TopDown,
    /// Row inferred from the wrapped element upwards.
    BottomUp,
}

/// Element drops out of a row onto a new line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wrapping {
    /// Wrapped element.
    pub node: ElementPath,
    /// Row members it sat beside before wrapping, sorted.
    pub row: Vec<ElementPath>,
    /// Widths over which the element sits below the row.
    pub range: Range,
    /// Heuristic that reported it.
    pub heuristic: WrapHeuristic,
    /// Boundary classification.
    pub labels: RangeLabels,
}

/// Failure category, used for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// See [`ViewportProtrusion`].
    ViewportProtrusion,
    /// See [`ElementProtrusion`].
    ElementProtrusion,
    /// See [`ElementCollision`].
    ElementCollision,
    /// See [`Smallrange`].
    Smallrange,
    /// See [`Wrapping`].
    Wrapping,
}

impl FailureKind {
    /// All kinds, in reporting order.
    pub const ALL: [FailureKind; 5] = [
        FailureKind::ViewportProtrusion,
        FailureKind::ElementProtrusion,
        FailureKind::ElementCollision,
        FailureKind::Smallrange,
        FailureKind::Wrapping,
    ];
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewportProtrusion => write!(f, "viewport-protrusion"),
            Self::ElementProtrusion => write!(f, "element-protrusion"),
            Self::ElementCollision => write!(f, "collision"),
            Self::Smallrange => write!(f, "small-range"),
            Self::Wrapping => write!(f, "wrapping"),
        }
    }
}

/// Failures attributed to one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSet {
    /// Viewport protrusions of this node.
    pub viewport_protrusions: Vec<ViewportProtrusion>,
    /// Protrusions of this node out of its container.
    pub element_protrusions: Vec<ElementProtrusion>,
    /// Collisions where this node is the first sibling.
    pub element_collisions: Vec<ElementCollision>,
    /// Flickers where this node is the first endpoint.
    pub smallranges: Vec<Smallrange>,
    /// Wrapping reports for this node.
    pub wrappings: Vec<Wrapping>,
}

impl FailureSet {
    /// Total number of failures.
    pub fn len(&self) -> usize {
        self.viewport_protrusions.len()
            + self.element_protrusions.len()
            + self.element_collisions.len()
            + self.smallranges.len()
            + self.wrappings.len()
    }

    /// Check if no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of failures of one kind.
    pub fn count(&self, kind: FailureKind) -> usize {
        match kind {
            FailureKind::ViewportProtrusion => self.viewport_protrusions.len(),
            FailureKind::ElementProtrusion => self.element_protrusions.len(),
            FailureKind::ElementCollision => self.element_collisions.len(),
            FailureKind::Smallrange => self.smallranges.len(),
            FailureKind::Wrapping => self.wrappings.len(),
        }
    }

    /// Drop every recorded failure.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Outcome of one repair attempt made by a downstream fixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairOutcome {
    /// The failure no longer reproduces.
    Fixed,
    /// The failure range shrank but did not vanish.
    PartiallyFixed,
    /// The repair had no effect.
    Unfixed,
}

/// Repair outcomes accumulated on a node.
///
/// Opaque to detection; downstream fixers tally their attempts here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairTally {
    /// Attempts that fixed the failure.
    pub fixed: u32,
    /// Attempts that partially fixed it.
    pub partially_fixed: u32,
    /// Attempts with no effect.
    pub unfixed: u32,
    /// Free-form notes from the fixer.
    pub notes: Vec<String>,
}

impl RepairTally {
    /// Count one outcome.
    pub fn record(&mut self, outcome: RepairOutcome) {
        match outcome {
            RepairOutcome::Fixed => self.fixed += 1,
            RepairOutcome::PartiallyFixed => self.partially_fixed += 1,
            RepairOutcome::Unfixed => self.unfixed += 1,
        }
    }

    /// Attach a note.
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Total attempts recorded.
    pub fn attempts(&self) -> u32 {
        self.fixed + self.partially_fixed + self.unfixed
    }
}
