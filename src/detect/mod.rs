//! Responsive layout failure detection.
//!
//! Detection runs once, after the whole sweep has been ingested:
//!
//! ```text
//! Rlg (ingested) → viewport → overlap (protrusion, then collision) → small range → wrapping
//!                      ↓             ↓                                  ↓              ↓
//!                           per-node FailureSet  →  DetectionSummary (counts + fingerprint)
//! ```
//!
//! Every pass reads the graph immutably and returns its findings; results
//! are written onto the nodes in one step at the end. Interval iteration
//! goes through [`Ranges::iter_by_decreasing_max`](crate::Ranges::iter_by_decreasing_max),
//! so the widest-first ordering the passes rely on holds by construction.

pub mod viewport;
pub mod overlap;
pub mod small_range;
pub mod wrapping;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canonical::canonical_hash_hex;
use crate::graph::{GraphError, Rlg};
use crate::policy::DetectionPolicy;
use crate::types::{ElementPath, FailureKind, FailureSet};

/// Result of one detection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSummary {
    /// Policy version used.
    pub policy_id: String,
    /// Hash of the policy parameters.
    pub params_hash: String,
    /// Nodes analysed.
    pub node_count: usize,
    /// Failures found, per kind.
    pub counts: BTreeMap<FailureKind, usize>,
    /// Fingerprint of every failure, ordered by element path.
    pub failures_hash: String,
}

impl DetectionSummary {
    /// Total failures across kinds.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Failures of one kind.
    pub fn count(&self, kind: FailureKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

impl Rlg {
    /// Run every pass enabled by `policy` and store the results on the nodes.
    ///
    /// Results of a previous run (and overlap scratch) are discarded first,
    /// so running twice with the same policy is idempotent.
    pub fn detect(&mut self, policy: &DetectionPolicy) -> Result<DetectionSummary, GraphError> {
        let span = tracing::info_span!("detect", policy = %policy.policy_id(), nodes = self.num_nodes());
        let _guard = span.enter();

        let mut found: Vec<FailureSet> = vec![FailureSet::default(); self.num_nodes()];
        let ids: Vec<_> = self.nodes().map(|n| n.id()).collect();

        if policy.detect_viewport_protrusion {
            for &id in &ids {
                found[id.index()].viewport_protrusions = viewport::detect(self, id, policy)?;
            }
        }

        let mut scratch = Vec::new();
        if policy.runs_overlap_pass() {
            let findings = overlap::detect(self, policy)?;
            for (id, failure) in findings.protrusions {
                found[id.index()].element_protrusions.push(failure);
            }
            for (id, failure) in findings.collisions {
                found[id.index()].element_collisions.push(failure);
            }
            scratch = findings.scratch;
        }

        if policy.detect_smallrange {
            for (id, failure) in small_range::detect(self, policy)? {
                found[id.index()].smallranges.push(failure);
            }
        }

        if policy.detect_wrapping {
            for &id in &ids {
                // Both heuristics report independently; a wrap visible to
                // both appears twice, once per heuristic.
                let mut wrappings = wrapping::detect_wrapping(self, id, policy)?;
                wrappings.extend(wrapping::detect_unwrapping(self, id, policy)?);
                found[id.index()].wrappings = wrappings;
            }
        }

        for s in self.edges_mut().filter_map(|e| e.overlap_scratch_mut()) {
            s.protrusions = Default::default();
        }
        for (edge, range) in scratch {
            if let Some(s) = self.edge_mut(edge).and_then(|e| e.overlap_scratch_mut()) {
                s.protrusions.add_range(range);
            }
        }

        for (node, failures) in self.nodes_mut().zip(found) {
            for kind in FailureKind::ALL {
                if failures.count(kind) > 0 {
                    tracing::debug!(node = %node.path(), kind = %kind, count = failures.count(kind), "failures found");
                }
            }
            node.failures = failures;
        }

        let summary = self.summarize(policy);
        tracing::info!(
            total = summary.total(),
            viewport_protrusion = summary.count(FailureKind::ViewportProtrusion),
            element_protrusion = summary.count(FailureKind::ElementProtrusion),
            collision = summary.count(FailureKind::ElementCollision),
            small_range = summary.count(FailureKind::Smallrange),
            wrapping = summary.count(FailureKind::Wrapping),
            failures_hash = %summary.failures_hash,
            "detection complete"
        );
        Ok(summary)
    }

    /// Nodes with at least one failure, ordered by element path.
    pub fn failures(&self) -> Vec<(&ElementPath, &FailureSet)> {
        let mut out: Vec<_> = self
            .nodes()
            .filter(|n| !n.failures().is_empty())
            .map(|n| (n.path(), n.failures()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    fn summarize(&self, policy: &DetectionPolicy) -> DetectionSummary {
        let failures = self.failures();
        let mut counts = BTreeMap::new();
        for kind in FailureKind::ALL {
            let count = failures.iter().map(|(_, set)| set.count(kind)).sum::<usize>();
            counts.insert(kind, count);
        }
        DetectionSummary {
            policy_id: policy.policy_id().to_string(),
            params_hash: policy.params_hash(),
            node_count: self.num_nodes(),
            counts,
            failures_hash: canonical_hash_hex(&failures),
        }
    }
}
