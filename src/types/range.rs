//! Closed intervals of viewport widths.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for interval construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RangeError {
    /// Lower bound exceeds upper bound.
    #[error("Invalid range: min {min} exceeds max {max}")]
    Inverted {
        /// Requested lower bound.
        min: u32,
        /// Requested upper bound.
        max: u32,
    },
    /// Width is NaN or infinite.
    #[error("Invalid width: {0} is not finite")]
    NonFinite(f64),
    /// Width is below zero.
    #[error("Invalid width: {0} is negative")]
    Negative(f64),
}

/// Convert a sampled width to an integer viewport width.
///
/// Samplers report widths as floats; they are rounded to the nearest pixel.
pub fn width_from_f64(value: f64) -> Result<u32, RangeError> {
    if !value.is_finite() {
        return Err(RangeError::NonFinite(value));
    }
    if value < 0.0 {
        return Err(RangeError::Negative(value));
    }
    Ok(value.round().min(u32::MAX as f64) as u32)
}

/// Closed interval `[min, max]` of viewport widths.
///
/// Ordered by `(min, max)` so collections of ranges sort deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct Range {
    min: u32,
    max: u32,
}

/// Unchecked wire form; deserialization goes through [`Range::new`].
#[derive(Deserialize)]
struct RawRange {
    min: u32,
    max: u32,
}

impl TryFrom<RawRange> for Range {
    type Error = RangeError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Range::new(raw.min, raw.max)
    }
}

impl Range {
    /// Create a new range, rejecting `min > max`.
    pub fn new(min: u32, max: u32) -> Result<Self, RangeError> {
        if min > max {
            return Err(RangeError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    /// Range covering a single width.
    pub fn point(width: u32) -> Self {
        Self { min: width, max: width }
    }

    /// Lower bound (inclusive).
    pub fn start(&self) -> u32 {
        self.min
    }

    /// Upper bound (inclusive).
    pub fn end(&self) -> u32 {
        self.max
    }

    /// Width immediately narrower than this range, if any.
    pub fn narrower(&self) -> Option<u32> {
        self.min.checked_sub(1)
    }

    /// Width immediately wider than this range.
    pub fn wider(&self) -> u32 {
        self.max.saturating_add(1)
    }

    /// Midpoint, rounded down.
    pub fn middle(&self) -> u32 {
        self.min + (self.max - self.min) / 2
    }

    /// Number of widths covered.
    pub fn span(&self) -> u64 {
        u64::from(self.max - self.min) + 1
    }

    /// Check if a width lies inside this range.
    pub fn contains(&self, width: u32) -> bool {
        self.min <= width && width <= self.max
    }

    /// Check if another range lies entirely inside this one.
    pub fn contains_range(&self, other: &Range) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Check if the two ranges share at least one width.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Check if the two ranges overlap or touch end to end.
    pub fn can_merge(&self, other: &Range) -> bool {
        self.min <= other.max.saturating_add(1) && other.min <= self.max.saturating_add(1)
    }

    /// Smallest range covering both.
    ///
    /// Only meaningful when [`Range::can_merge`] holds; otherwise the gap is
    /// covered as well.
    pub fn merge(&self, other: &Range) -> Range {
        Range {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Shared widths of two ranges, if any.
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Range {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        })
    }

    /// Remove the overlap with `other`, leaving zero, one or two pieces.
    pub fn subtract(&self, other: &Range) -> Vec<Range> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        let mut pieces = Vec::with_capacity(2);
        if self.min < other.min {
            pieces.push(Range { min: self.min, max: other.min - 1 });
        }
        if other.max < self.max {
            pieces.push(Range { min: other.max + 1, max: self.max });
        }
        pieces
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Classification labels attached to the two boundaries of a reported range.
///
/// The graph never interprets these; the external classifier writes them
/// after inspecting the page at `narrower` / `wider`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeLabels {
    /// Label for the lower boundary.
    pub min: Option<String>,
    /// Label for the upper boundary.
    pub max: Option<String>,
}

impl RangeLabels {
    /// Set the lower boundary label.
    pub fn with_min(mut self, label: impl Into<String>) -> Self {
        self.min = Some(label.into());
        self
    }

    /// Set the upper boundary label.
    pub fn with_max(mut self, label: impl Into<String>) -> Self {
        self.max = Some(label.into());
        self
    }

    /// Check if neither boundary has been classified.
    pub fn is_unclassified(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}
