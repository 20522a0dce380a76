//! `heat-viz template`: graph one template.
//!
//! ```bash
//! heat-viz template overcloud.yaml                       # writes heat-deps.html
//! heat-viz template overcloud.yaml -o deps.html -f '^Controller'
//! heat-viz template stack.json -t web,db,cache
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::edges::DroppedEdge;
use crate::pipeline::Pipeline;
use crate::render::{PageRenderer, PageView, copy_viz_js, warn_if_viz_js_missing};
use crate::template::TemplateDocument;

/// Render the dependency graph of a template into one HTML page.
#[derive(Args, Debug)]
pub struct TemplateCommand {
    /// Template file (YAML or JSON)
    file: PathBuf,

    /// Output HTML file [default: heat-deps.html]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only keep edges whose endpoints both match this regex [default: .*]
    #[arg(short, long)]
    filter: Option<String>,

    /// Comma-separated coloring patterns, highest priority first
    /// [default: controller,compute,storage]
    #[arg(short, long, value_delimiter = ',')]
    tags: Option<Vec<String>>,
}

impl TemplateCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let output = self.output.unwrap_or_else(|| config.template.output.clone());
        let filter = self.filter.as_deref().unwrap_or(&config.template.filter);
        let tags = self.tags.as_deref().unwrap_or(&config.template.tags);

        let pipeline = Pipeline::new(filter, tags)?;
        let document = TemplateDocument::load(&self.file)?;
        let result = pipeline.run(&document)?;

        let renderer = PageRenderer::new(&config.render)?;
        let title = format!("Heat dependencies - {}", document.name());
        let notes = dropped_notes(&result.dropped);
        renderer.write(
            &output,
            &PageView {
                title: &title,
                graph: &result.graph,
                notes: notes.as_deref(),
                nav: &[],
                nav2: &[],
            },
        )?;

        let dir = output.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        match &config.render.viz_js_file {
            Some(viz_js) => copy_viz_js(viz_js, dir)?,
            None => {
                warn_if_viz_js_missing(&config.render.viz_js, dir);
            }
        }

        println!(
            "{} {} ({} template): {} nodes, {} edges -> {}",
            "✓".green(),
            document.name(),
            result.dialect,
            result.graph.node_count(),
            result.graph.edge_count(),
            output.display()
        );
        if !result.dropped.is_empty() {
            let count = result.dropped.len();
            println!("{} {count} {} dropped", "⚠".yellow(), edge_noun(count));
        }
        Ok(())
    }
}

/// Page note listing dropped edges, if any.
fn dropped_notes(dropped: &[DroppedEdge]) -> Option<String> {
    if dropped.is_empty() {
        return None;
    }
    let list: Vec<String> = dropped.iter().map(ToString::to_string).collect();
    let count = dropped.len();
    Some(format!("Dropped {count} {}: {}.", edge_noun(count), list.join(", ")))
}

const fn edge_noun(count: usize) -> &'static str {
    if count == 1 { "edge" } else { "edges" }
}
