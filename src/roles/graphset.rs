//! The pages of one tag.
//!
//! Each tag gets a directory with:
//!
//! - `simple.html`: the graph with excluded nodes lowercut away
//! - `main.html`: the full graph
//! - `focus-<slug>.html`: per node, its ancestors and descendants
//!
//! `nav` links the first two; `nav2` links the `simple` page of every other tag.

use anyhow::Result;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::RunLists;
use crate::core::HeatVizError;
use crate::decorate::Decorator;
use crate::decorate::roles::{color_edges, focus_page, mark_nodes, role_fill_rules};
use crate::edges::InclusionFilter;
use crate::graph::{Graph, NodeId};
use crate::render::{NavLink, PageRenderer, PageView};

pub const SIMPLE_PAGE: &str = "simple";
pub const MAIN_PAGE: &str = "main";

/// One page before rendering.
#[derive(Debug, Clone)]
pub struct GraphPage {
    pub name: String,
    pub graph: Graph,
    pub notes: Option<String>,
}

/// Every page of one tag plus its navigation.
#[derive(Debug, Clone)]
pub struct GraphSet {
    tag: String,
    pages: Vec<GraphPage>,
    nav: Vec<NavLink>,
    nav2: Vec<NavLink>,
}

impl GraphSet {
    /// Build the pages of `tag`.
    ///
    /// # Errors
    ///
    /// [`HeatVizError::InvalidPattern`] if an exclude pattern is invalid.
    pub fn build<S: AsRef<str>>(
        tag: &str,
        run_lists: &RunLists,
        other_tags: &[&str],
        exclude: &[S],
    ) -> Result<Self, HeatVizError> {
        let (full, focus_pages) = decorated_graph(run_lists)?;

        let mut simple = full.clone();
        let excluded = simple.find(&exclude_patterns(exclude)?);
        debug!("{tag}: excluding {} nodes", excluded.len());
        simple.lowercut(&excluded);

        let mut set = Self {
            tag: tag.to_string(),
            pages: Vec::new(),
            nav: Vec::new(),
            nav2: other_tags
                .iter()
                .map(|other| NavLink::new(format!("../{other}/{SIMPLE_PAGE}.html"), capitalize(other)))
                .collect(),
        };

        let names: Vec<&str> = exclude.iter().map(|pattern| pattern.as_ref()).collect();
        set.add_to_nav(
            simple,
            SIMPLE_PAGE,
            "Simplified",
            Some(format!("Excludes {}.", en_join(&names))),
        );
        set.add_to_nav(full.clone(), MAIN_PAGE, &format!("Full {tag}"), None);

        for (id, node) in full.nodes() {
            let name = focus_pages.get(&id).cloned().unwrap_or_else(|| focus_page(node.key()));
            set.pages.push(GraphPage {
                name,
                graph: full.focus(id),
                notes: None,
            });
        }

        Ok(set)
    }

    fn add_to_nav(&mut self, graph: Graph, name: &str, label: &str, notes: Option<String>) {
        self.nav.push(NavLink::new(format!("{name}.html"), label));
        self.pages.push(GraphPage {
            name: name.to_string(),
            graph,
            notes,
        });
    }

    #[must_use]
    pub fn pages(&self) -> &[GraphPage] {
        &self.pages
    }

    #[must_use]
    pub fn nav(&self) -> &[NavLink] {
        &self.nav
    }

    #[must_use]
    pub fn nav2(&self) -> &[NavLink] {
        &self.nav2
    }

    /// Render every page into `out_dir/<tag>/`.
    pub fn write(&self, renderer: &PageRenderer, out_dir: &Path) -> Result<()> {
        let tag_dir = out_dir.join(&self.tag);
        for page in &self.pages {
            let title = format!("Chef roles - {} - {}", self.tag, page.name);
            renderer.write(
                &tag_dir.join(format!("{}.html", page.name)),
                &PageView {
                    title: &title,
                    graph: &page.graph,
                    notes: page.notes.as_deref(),
                    nav: &self.nav,
                    nav2: &self.nav2,
                },
            )?;
        }
        info!("Wrote {} pages for {}", self.pages.len(), self.tag);
        Ok(())
    }
}

/// The full role graph with role decoration applied, and the focus page name
/// of each node.
fn decorated_graph(
    run_lists: &RunLists,
) -> Result<(Graph, HashMap<NodeId, String>), HeatVizError> {
    let (mut graph, _) = super::build_graph(run_lists, &InclusionFilter::match_all());
    let focus_pages = mark_nodes(&mut graph);
    Decorator::with_rules(role_fill_rules()?).apply(&mut graph);
    color_edges(&mut graph);
    Ok((graph, focus_pages))
}

fn exclude_patterns<S: AsRef<str>>(exclude: &[S]) -> Result<Vec<Regex>, HeatVizError> {
    exclude
        .iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            RegexBuilder::new(pattern).case_insensitive(true).build().map_err(|e| {
                HeatVizError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

/// `none`, `a`, `a and b`, `a, b and c`.
#[must_use]
pub fn en_join(items: &[&str]) -> String {
    match items {
        [] => "none".to_string(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
