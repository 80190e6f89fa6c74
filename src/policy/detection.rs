//! Detection policy: which passes run and with what thresholds.
//!
//! The policy is an explicit value handed to [`Rlg::detect`](crate::Rlg::detect),
//! so graphs analysed side by side can use different thresholds.

use serde::{Deserialize, Serialize};
use crate::canonical::canonical_hash_hex;
use crate::DEFAULT_POLICY_VERSION;

/// Default minimum number of elements that make a row.
pub const DEFAULT_ROW_THRESHOLD: usize = 3;

/// Default maximum span of an interval still treated as a flicker.
pub const DEFAULT_SMALLRANGE_THRESHOLD: u32 = 5;

/// Default path of the page body.
pub const DEFAULT_BODY_PATH: &str = "/HTML/BODY";

/// Detection policy.
///
/// ## Parameters
///
/// - `detect_*`: toggles for each pass
/// - `row_threshold`: minimum elements in a row for wrapping reports
/// - `smallrange_threshold`: maximum span (in widths) of a flicker interval
/// - `body_path`: element treated as the page body by viewport protrusion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Run the viewport protrusion pass.
    pub detect_viewport_protrusion: bool,
    /// Report collisions from the overlap pass.
    pub detect_element_collision: bool,
    /// Report protrusions from the overlap pass.
    pub detect_element_protrusion: bool,
    /// Run the small-range pass.
    pub detect_smallrange: bool,
    /// Run both wrapping heuristics.
    pub detect_wrapping: bool,
    /// Minimum elements in a row.
    pub row_threshold: usize,
    /// Maximum span of a flicker interval.
    pub smallrange_threshold: u32,
    /// Path of the page body.
    pub body_path: String,
}

impl DetectionPolicy {
    /// Create a policy with every pass enabled and custom thresholds.
    pub fn new(row_threshold: usize, smallrange_threshold: u32) -> Self {
        Self {
            row_threshold,
            smallrange_threshold,
            ..Self::default()
        }
    }

    /// Create a policy with every pass disabled.
    ///
    /// Combine with the `with_*` setters to run selected passes.
    pub fn none() -> Self {
        Self {
            detect_viewport_protrusion: false,
            detect_element_collision: false,
            detect_element_protrusion: false,
            detect_smallrange: false,
            detect_wrapping: false,
            ..Self::default()
        }
    }

    /// Enable viewport protrusion.
    pub fn with_viewport_protrusion(mut self) -> Self {
        self.detect_viewport_protrusion = true;
        self
    }

    /// Enable collision reports.
    pub fn with_element_collision(mut self) -> Self {
        self.detect_element_collision = true;
        self
    }

    /// Enable protrusion reports.
    pub fn with_element_protrusion(mut self) -> Self {
        self.detect_element_protrusion = true;
        self
    }

    /// Enable small-range detection.
    pub fn with_smallrange(mut self) -> Self {
        self.detect_smallrange = true;
        self
    }

    /// Enable wrapping detection.
    pub fn with_wrapping(mut self) -> Self {
        self.detect_wrapping = true;
        self
    }

    /// Override the body path.
    pub fn with_body_path(mut self, body_path: impl Into<String>) -> Self {
        self.body_path = body_path.into();
        self
    }

    /// Parse a (possibly partial) policy from JSON; missing fields keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if the overlap pass has any work to do.
    pub fn runs_overlap_pass(&self) -> bool {
        self.detect_element_collision || self.detect_element_protrusion
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Compute a hash of the policy parameters.
    ///
    /// Two detection runs over equal graphs with equal `params_hash` produce
    /// equal failure fingerprints.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }

    /// Create a minimal policy for testing: all passes on, small thresholds.
    #[cfg(test)]
    pub fn minimal() -> Self {
        Self::new(2, 3)
    }
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            detect_viewport_protrusion: true,
            detect_element_collision: true,
            detect_element_protrusion: true,
            detect_smallrange: true,
            detect_wrapping: true,
            row_threshold: DEFAULT_ROW_THRESHOLD,
            smallrange_threshold: DEFAULT_SMALLRANGE_THRESHOLD,
            body_path: DEFAULT_BODY_PATH.to_string(),
        }
    }
}
