//! The template pipeline: one forward pass from a parsed template to a
//! decorated graph.
//!
//! ```text
//! Dialect::resolve -> select_resources -> extract -> EdgeResolver -> Decorator
//!                                                   -> weight_box_edges
//! ```
//!
//! Every stage either returns its output or a fatal [`HeatVizError`]; dropped
//! edges are not errors and come back in [`PipelineOutput::dropped`].

use tracing::{debug, info};

use crate::core::HeatVizError;
use crate::decorate::{Decorator, weight_box_edges};
use crate::dialect::Dialect;
use crate::edges::{DroppedEdge, EdgeResolver, InclusionFilter};
use crate::graph::Graph;
use crate::template::TemplateDocument;
use crate::template::extract::extract;
use crate::template::resources::select_resources;

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineOutput {
    pub dialect: Dialect,
    pub graph: Graph,
    pub dropped: Vec<DroppedEdge>,
}

/// A configured pipeline. Reusable across documents.
#[derive(Debug, Clone)]
pub struct Pipeline {
    filter: InclusionFilter,
    decorator: Decorator,
}

impl Pipeline {
    /// Build a pipeline from an inclusion filter pattern and decoration tags.
    ///
    /// # Errors
    ///
    /// [`HeatVizError::InvalidPattern`] if the filter or a tag is not a valid
    /// regular expression.
    pub fn new<S: AsRef<str>>(filter: &str, tags: &[S]) -> Result<Self, HeatVizError> {
        Ok(Self {
            filter: InclusionFilter::new(filter)?,
            decorator: Decorator::from_tags(tags)?,
        })
    }

    /// Run every stage over `document`.
    pub fn run(&self, document: &TemplateDocument) -> Result<PipelineOutput, HeatVizError> {
        let dialect = Dialect::resolve(document.root())?;
        debug!("{} is a {dialect} template", document.name());

        let entries = select_resources(document, dialect)?;
        let mut extraction = extract(&entries, dialect);
        let dropped =
            EdgeResolver::new(&self.filter).resolve(&mut extraction.graph, &extraction.candidates);

        let mut graph = extraction.graph;
        self.decorator.apply(&mut graph);
        weight_box_edges(&mut graph);
        graph.attrs.tooltip = Some(format!("{} ({dialect})", document.name()));

        info!(
            "{}: {} nodes, {} edges, {} dropped",
            document.name(),
            graph.node_count(),
            graph.edge_count(),
            dropped.len()
        );

        Ok(PipelineOutput {
            dialect,
            graph,
            dropped,
        })
    }
}
