//! Role-manifest decoration.
//!
//! Role graphs are drawn with roles as boxes and recipes in the default
//! shape. Every node links to its focus page. Edges are colored by the words
//! of their endpoint names, and an edge from `<name>` to `<name>-core` is
//! drawn thick and black.

use std::collections::{HashMap, HashSet};

use crate::core::HeatVizError;
use crate::graph::{Color, Graph, NodeId, Shape};

use super::DecorationRule;

/// Saturation of edge colors, in percent.
pub const EDGE_SATURATION: f64 = 80.9;
/// Value of edge colors, in percent.
pub const EDGE_VALUE: f64 = 69.8;
/// Pen width of colored edges.
pub const COLORED_EDGE_PENWIDTH: f64 = 2.0;
/// Pen width of `<name>` -> `<name>-core` edges.
pub const CORE_EDGE_PENWIDTH: f64 = 4.0;

/// Fill rules for role graphs, highest priority first.
pub fn role_fill_rules() -> Result<Vec<DecorationRule>, HeatVizError> {
    Ok(vec![
        DecorationRule::new("-core", Color::hsv(0.0, 0.0, 95.0))?,
        DecorationRule::new("nova::", Color::hsv(36.0, 13.7, 100.0))?,
        DecorationRule::new("nova", Color::hsv(58.0, 13.7, 100.0))?,
    ])
}

/// File-name-safe form of a node key: `role[web]` becomes `role-web`.
#[must_use]
pub fn page_slug(key: &str) -> String {
    let slug: String =
        key.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' }).collect();
    slug.trim_matches('-').to_string()
}

/// Name of the focus page of a node, without extension.
#[must_use]
pub fn focus_page(key: &str) -> String {
    format!("focus-{}", page_slug(key))
}

/// Box shape for roles and a focus-page link on every node.
///
/// Returns the focus page name of each node. Keys whose slugs collide get a
/// numeric suffix in node order: `focus-recipe-x--y`, `focus-recipe-x--y-2`.
pub fn mark_nodes(graph: &mut Graph) -> HashMap<NodeId, String> {
    let mut used = HashSet::new();
    let mut pages = HashMap::new();

    for id in graph.node_ids() {
        let node = graph.node_mut(id);
        let key = node.key().to_string();
        if key.contains("role") {
            node.attrs.shape = Some(Shape::Box);
        }

        let base = focus_page(&key);
        let mut name = base.clone();
        let mut n = 2;
        while !used.insert(name.clone()) {
            name = format!("{base}-{n}");
            n += 1;
        }
        node.attrs.url = Some(format!("{name}.html"));
        pages.insert(id, name);
    }

    pages
}

/// Color edges by endpoint words.
///
/// Checks run in this order, later ones overriding earlier ones: source
/// word `scheduler`, `api`, `management`, then destination word `config`,
/// `common`. Colored edges get [`COLORED_EDGE_PENWIDTH`].
pub fn color_edges(graph: &mut Graph) {
    let hues = super::palette(5, EDGE_SATURATION, EDGE_VALUE);

    for id in graph.edge_ids() {
        let Some((from, to)) = graph.edge_endpoints(id) else {
            continue;
        };
        let source = words(graph.node(from).key());
        let destination = words(graph.node(to).key());

        let mut color = None;
        if source.iter().any(|w| w == "scheduler") {
            color = Some(hues[1]);
        }
        if source.iter().any(|w| w == "api") {
            color = Some(hues[2]);
        }
        if source.iter().any(|w| w == "management") {
            color = Some(hues[4]);
        }
        if destination.iter().any(|w| w == "config") {
            color = Some(hues[3]);
        }
        if destination.iter().any(|w| w == "common") {
            color = Some(hues[0]);
        }

        let core_relation = {
            let mut expected = source.clone();
            expected.push("core".to_string());
            expected == destination
        };

        let Some(attrs) = graph.edge_attrs_mut(id) else {
            continue;
        };
        if let Some(color) = color {
            attrs.color = Some(color);
            attrs.penwidth = Some(COLORED_EDGE_PENWIDTH);
        }
        if core_relation {
            attrs.color = Some(Color::Named("black"));
            attrs.penwidth = Some(CORE_EDGE_PENWIDTH);
        }
    }
}

/// Lowercased words of a key, split on `-` and `::`, with any `kind[...]`
/// wrapper removed.
fn words(key: &str) -> Vec<String> {
    let inner = match (key.find('['), key.strip_suffix(']')) {
        (Some(open), Some(body)) => &body[open + 1..],
        _ => key,
    };
    inner.replace("::", "-").split('-').map(str::to_lowercase).collect()
}
