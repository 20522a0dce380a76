//! Dependency extraction.
//!
//! Every selected resource becomes a node. Edges are not added here; they are
//! emitted as [`CandidateEdge`]s for the edge resolver, because a dependency
//! may name a resource that was filtered out or never declared.
//!
//! Edge direction:
//!
//! - explicit: `A.depends_on: [B]` gives `A -> B`
//! - implicit: `C.properties.config: {get_resource: D}` gives `D -> C`, the
//!   referenced resource feeds the one that references it

use serde_yaml::Value;
use tracing::debug;

use super::resources::{ResourceEntry, ResourceKind};
use crate::dialect::Dialect;
use crate::graph::Graph;

/// Property holding the transport a deployment signals completion over.
const SIGNAL_TRANSPORT: &str = "signal_transport";
/// The transport value that disables signalling.
const NO_SIGNAL: &str = "NO_SIGNAL";
/// Property holding a config body or a reference to one.
const CONFIG: &str = "config";
/// Key inside a config body that makes the config signal completion.
const COMPLETION_SIGNAL: &str = "completion-signal";

/// Where a candidate edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// Dependency list field
    Explicit,
    /// Resource reference inside `properties.config`
    Implicit,
}

/// An edge that has not been checked against the node set yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEdge {
    pub from: String,
    pub to: String,
    pub origin: EdgeOrigin,
}

impl CandidateEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, origin: EdgeOrigin) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            origin,
        }
    }
}

/// Nodes created from the selected resources, and the edges between them
/// still to be resolved.
#[derive(Debug, Default)]
pub struct Extraction {
    pub graph: Graph,
    pub candidates: Vec<CandidateEdge>,
}

/// Build nodes and candidate edges for `entries`.
///
/// Nodes get their shape from the resource kind and a double outline when
/// they signal completion. Candidates are ordered by resource, explicit
/// before implicit.
#[must_use]
pub fn extract(entries: &[ResourceEntry], dialect: Dialect) -> Extraction {
    let get_resource = dialect.fields().get_resource;
    let mut extraction = Extraction::default();

    for entry in entries {
        let id = extraction.graph.get_or_create(&entry.key);
        let attrs = &mut extraction.graph.node_mut(id).attrs;
        attrs.shape = Some(entry.kind.shape());
        if signals_completion(entry) {
            attrs.peripheries = 2;
        }

        for dependency in &entry.depends_on {
            extraction.candidates.push(CandidateEdge::new(
                &entry.key,
                dependency,
                EdgeOrigin::Explicit,
            ));
        }

        if let Some(reference) = config_reference(&entry.properties, get_resource) {
            debug!("{} consumes {reference} through its config", entry.key);
            extraction.candidates.push(CandidateEdge::new(
                reference,
                &entry.key,
                EdgeOrigin::Implicit,
            ));
        }
    }

    debug!(
        "Extracted {} nodes and {} candidate edges",
        extraction.graph.node_count(),
        extraction.candidates.len()
    );
    extraction
}

/// Deployments signal unless their transport is `NO_SIGNAL`; an absent
/// transport means the orchestrator default, which signals. Configs signal
/// when their body carries a completion-signal key.
fn signals_completion(entry: &ResourceEntry) -> bool {
    match entry.kind {
        ResourceKind::Deployment => {
            entry.properties.get(SIGNAL_TRANSPORT).and_then(Value::as_str) != Some(NO_SIGNAL)
        }
        ResourceKind::Config => entry
            .properties
            .get(CONFIG)
            .and_then(Value::as_mapping)
            .is_some_and(|config| config.contains_key(COMPLETION_SIGNAL)),
        ResourceKind::Server => false,
    }
}

fn config_reference<'a>(properties: &'a Value, get_resource: &str) -> Option<&'a str> {
    properties.get(CONFIG)?.get(get_resource)?.as_str()
}
