//! Element identity keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex_lite::Regex;

/// Error type for element path parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path string was empty.
    #[error("Element path is empty")]
    Empty,
    /// Path string is not an absolute element path.
    #[error("Malformed element path: {0}")]
    Malformed(String),
}

fn path_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(/[A-Za-z][A-Za-z0-9_-]*(\[[0-9]+\])?)+$")
            .expect("Element path pattern is valid")
    })
}

/// Absolute path of an element in the document, e.g. `/HTML/BODY/DIV[2]/P`.
///
/// Cheap to clone; failure records and diff deltas carry their own copies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementPath(Arc<str>);

impl ElementPath {
    /// Parse and validate an element path.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        if !path_regex().is_match(trimmed) {
            return Err(PathError::Malformed(trimmed.to_string()));
        }
        Ok(Self(Arc::from(trimmed)))
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this path names the same element as `body`.
    ///
    /// Comparison ignores case and explicit `[1]` indices, which samplers
    /// emit inconsistently.
    pub fn is_body_of(&self, body: &str) -> bool {
        normalize(&self.0) == normalize(body)
    }
}

fn normalize(path: &str) -> String {
    path.trim().to_ascii_uppercase().replace("[1]", "")
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ElementPath {
    type Error = PathError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<ElementPath> for String {
    fn from(path: ElementPath) -> Self {
        path.0.to_string()
    }
}

impl std::str::FromStr for ElementPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
