//! Edge resolution: turns candidate edges into graph edges.
//!
//! Each candidate is checked, in order, against the inclusion filter and then
//! against the node set. Candidates that fail either check are dropped with a
//! warning and returned in the report; they never abort the run.

use regex::Regex;
use std::fmt;
use tracing::{debug, warn};

use crate::core::HeatVizError;
use crate::graph::{Graph, NodeId};
use crate::template::extract::CandidateEdge;

/// Pattern both endpoint keys of an edge must match.
#[derive(Debug, Clone)]
pub struct InclusionFilter {
    pattern: Regex,
}

impl InclusionFilter {
    /// The pattern used when none is given.
    pub const MATCH_ALL: &'static str = ".*";

    /// Compile a filter. The pattern is an unanchored regular expression.
    pub fn new(pattern: &str) -> Result<Self, HeatVizError> {
        let pattern = Regex::new(pattern).map_err(|e| HeatVizError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern,
        })
    }

    /// A filter that keeps every edge.
    #[must_use]
    pub fn match_all() -> Self {
        Self {
            pattern: Regex::new(Self::MATCH_ALL).expect("match-all pattern is valid"),
        }
    }

    #[must_use]
    pub fn is_match(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for InclusionFilter {
    fn default() -> Self {
        Self::match_all()
    }
}

/// Why a candidate edge was not committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// An endpoint failed the inclusion filter
    Filtered,
    /// The source key has no node
    UnknownSource,
    /// The destination key has no node
    UnknownDestination,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Filtered => f.write_str("filtered"),
            DropReason::UnknownSource => f.write_str("edge from unknown node"),
            DropReason::UnknownDestination => f.write_str("edge to unknown node"),
        }
    }
}

/// A candidate edge that was left out of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEdge {
    pub from: String,
    pub to: String,
    pub reason: DropReason,
}

impl fmt::Display for DroppedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.reason)
    }
}

/// Commits candidate edges whose endpoints pass the filter and exist.
#[derive(Debug, Clone, Copy)]
pub struct EdgeResolver<'a> {
    filter: &'a InclusionFilter,
}

impl<'a> EdgeResolver<'a> {
    #[must_use]
    pub const fn new(filter: &'a InclusionFilter) -> Self {
        Self {
            filter,
        }
    }

    /// Resolve `candidates` in order against `graph`.
    ///
    /// Returns the dropped candidates; everything else is now an edge of
    /// `graph`. Duplicate candidates become duplicate edges.
    pub fn resolve(&self, graph: &mut Graph, candidates: &[CandidateEdge]) -> Vec<DroppedEdge> {
        let mut dropped = Vec::new();

        for candidate in candidates {
            match self.check(graph, candidate) {
                Ok((from, to)) => {
                    debug!("Edge {} -> {}", candidate.from, candidate.to);
                    graph.add_edge(from, to);
                }
                Err(reason) => {
                    match reason {
                        DropReason::Filtered => warn!(
                            "Skipping edge {} -> {}: filtered by '{}'",
                            candidate.from,
                            candidate.to,
                            self.filter.as_str()
                        ),
                        DropReason::UnknownSource => {
                            warn!("Skipping edge from unknown node {}", candidate.from);
                        }
                        DropReason::UnknownDestination => {
                            warn!("Skipping edge to unknown node {}", candidate.to);
                        }
                    }
                    dropped.push(DroppedEdge {
                        from: candidate.from.clone(),
                        to: candidate.to.clone(),
                        reason,
                    });
                }
            }
        }

        dropped
    }

    fn check(
        &self,
        graph: &Graph,
        candidate: &CandidateEdge,
    ) -> Result<(NodeId, NodeId), DropReason> {
        if !self.filter.is_match(&candidate.from) || !self.filter.is_match(&candidate.to) {
            return Err(DropReason::Filtered);
        }
        let from = graph.node_id(&candidate.from).ok_or(DropReason::UnknownSource)?;
        let to = graph.node_id(&candidate.to).ok_or(DropReason::UnknownDestination)?;
        Ok((from, to))
    }
}
