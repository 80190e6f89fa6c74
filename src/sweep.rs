//! Width sweep ingestion.
//!
//! A sampler renders the page at every viewport width of interest and
//! reports what it saw as a flat list of observations. Folding them into an
//! [`Rlg`] goes through the same construction methods a caller would use
//! directly.
//!
//! ## Format
//!
//! ```json
//! {
//!   "observations": [
//!     { "element": "/HTML/BODY/DIV", "relation": "exists", "width": 768 },
//!     { "element": "/HTML/BODY", "other": "/HTML/BODY/DIV", "relation": "child",
//!       "width": 768, "alignment": { "left": true } }
//!   ]
//! }
//! ```
//!
//! Widths arrive as JSON numbers and are validated with
//! [`width_from_f64`](crate::types::width_from_f64).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graph::{GraphError, Rlg};
use crate::types::{width_from_f64, Alignment, EdgeId};

/// What was observed about `element` at one width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// `element` was rendered.
    Exists,
    /// `other` is a DOM child of `element`.
    Child,
    /// `other` visually contains `element`.
    Container,
    /// `element` and `other` overlap.
    Overlap,
    /// `other` is above `element`.
    AboveMe,
    /// `other` is below `element`.
    BelowMe,
    /// `other` is to the right of `element`.
    ToMyRight,
    /// `other` is to the left of `element`.
    ToMyLeft,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exists => "exists",
            Self::Child => "child",
            Self::Container => "container",
            Self::Overlap => "overlap",
            Self::AboveMe => "above_me",
            Self::BelowMe => "below_me",
            Self::ToMyRight => "to_my_right",
            Self::ToMyLeft => "to_my_left",
        };
        write!(f, "{name}")
    }
}

/// One sampled fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Element the observation was made on.
    pub element: String,
    /// Second element, for binary relations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    /// Relation observed.
    pub relation: Relation,
    /// Viewport width.
    pub width: f64,
    /// Child alignment, for `child` observations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

/// A full width sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    /// Observations, in sampling order.
    pub observations: Vec<Observation>,
}

impl Sweep {
    /// Parse a sweep from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Counts from folding a sweep into a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Observations applied.
    pub accepted: usize,
    /// Observations rejected and skipped.
    pub rejected: usize,
}

impl Rlg {
    /// Apply one observation.
    ///
    /// Returns the edge touched, or `None` for existence observations.
    pub fn ingest(&mut self, observation: &Observation) -> Result<Option<EdgeId>, GraphError> {
        let width = width_from_f64(observation.width)?;
        let node = self.add_node(&observation.element)?;

        if observation.relation == Relation::Exists {
            self.add_existence(node, width)?;
            return Ok(None);
        }

        let other = match &observation.other {
            Some(other) => self.add_node(other)?,
            None => {
                return Err(GraphError::MissingOther {
                    element: observation.element.clone(),
                    relation: observation.relation,
                })
            }
        };

        let edge = match observation.relation {
            Relation::Child => match observation.alignment {
                Some(alignment) => self.add_child_aligned(node, other, width, alignment)?,
                None => self.add_child(node, other, width)?,
            },
            Relation::Container => self.add_container(node, other, width)?,
            Relation::Overlap => self.add_overlap(node, other, width)?,
            Relation::AboveMe => self.add_above_me(node, other, width)?,
            Relation::BelowMe => self.add_below_me(node, other, width)?,
            Relation::ToMyRight => self.add_to_my_right(node, other, width)?,
            Relation::ToMyLeft => self.add_to_my_left(node, other, width)?,
            Relation::Exists => return Ok(None),
        };
        Ok(Some(edge))
    }

    /// Apply every observation, skipping (and logging) the ones rejected.
    pub fn ingest_all<'a>(&mut self, observations: impl IntoIterator<Item = &'a Observation>) -> IngestStats {
        let mut stats = IngestStats::default();
        for observation in observations {
            match self.ingest(observation) {
                Ok(_) => stats.accepted += 1,
                Err(e) => {
                    stats.rejected += 1;
                    tracing::warn!(
                        element = %observation.element,
                        relation = %observation.relation,
                        width = observation.width,
                        error = %e,
                        "observation rejected"
                    );
                }
            }
        }
        stats
    }

    /// Build a graph from a sweep.
    pub fn from_sweep(sweep: &Sweep) -> (Self, IngestStats) {
        let mut graph = Self::new();
        let stats = graph.ingest_all(&sweep.observations);
        tracing::info!(
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            accepted = stats.accepted,
            rejected = stats.rejected,
            "sweep ingested"
        );
        (graph, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Adjacency;

    fn obs(element: &str, other: Option<&str>, relation: Relation, width: f64) -> Observation {
        Observation {
            element: element.to_string(),
            other: other.map(str::to_string),
            relation,
            width,
            alignment: None,
        }
    }

    #[test]
    fn test_parse_sweep() {
        let json = r#"{
            "observations": [
                { "element": "/HTML/BODY/DIV", "relation": "exists", "width": 768 },
                { "element": "/HTML/BODY", "other": "/HTML/BODY/DIV", "relation": "child",
                  "width": 768, "alignment": { "left": true } }
            ]
        }"#;
        let sweep = Sweep::from_json_str(json).unwrap();
        assert_eq!(sweep.observations.len(), 2);
        assert_eq!(sweep.observations[1].relation, Relation::Child);
        assert!(sweep.observations[1].alignment.unwrap().left);
    }

    #[test]
    fn test_from_sweep_builds_edges() {
        let sweep = Sweep {
            observations: vec![
                obs("/HTML/BODY/DIV", None, Relation::Exists, 768.0),
                obs("/HTML/BODY", Some("/HTML/BODY/DIV"), Relation::Child, 768.0),
                obs("/HTML/BODY/DIV", Some("/HTML/BODY/P"), Relation::AboveMe, 768.4),
            ],
        };
        let (graph, stats) = Rlg::from_sweep(&sweep);
        assert_eq!(stats, IngestStats { accepted: 3, rejected: 0 });
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 2);

        let div = graph.node_id("/HTML/BODY/DIV").unwrap();
        let p = graph.node_id("/HTML/BODY/P").unwrap();
        assert!(graph.node(div).unwrap().existence().contains(768));
        assert_eq!(graph.parent_at(div, 768), graph.node_id("/HTML/BODY"));
        assert!(graph.is_vertically_adjacent_at(p, div, 768));
        assert_eq!(graph.node(p).unwrap().edges(Adjacency::AboveBelow).len(), 1);
    }

    #[test]
    fn test_rejected_observations_are_skipped() {
        let sweep = Sweep {
            observations: vec![
                obs("/HTML/BODY/DIV", None, Relation::Overlap, 500.0),
                obs("/HTML/BODY/DIV", Some("/HTML/BODY/P"), Relation::Overlap, -3.0),
                obs("not a path", None, Relation::Exists, 500.0),
                obs("/HTML/BODY/DIV", Some("/HTML/BODY/P"), Relation::Overlap, 500.0),
            ],
        };
        let (graph, stats) = Rlg::from_sweep(&sweep);
        assert_eq!(stats, IngestStats { accepted: 1, rejected: 3 });
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_missing_other() {
        let mut graph = Rlg::new();
        let err = graph
            .ingest(&obs("/HTML/BODY/DIV", None, Relation::ToMyLeft, 500.0))
            .unwrap_err();
        assert!(matches!(err, GraphError::MissingOther { relation: Relation::ToMyLeft, .. }));
    }
}
