//! Decoration: fill colors, groups and edge weights.
//!
//! Decoration only touches attributes, never topology. A [`Decorator`] holds
//! an ordered rule list; for each node the first rule whose pattern matches
//! the label sets the fill color, and later matches leave it alone.
//!
//! Tag-based rules get their colors from [`palette`], which spreads the hues
//! evenly over the color wheel, so the same tag list always yields the same
//! colors.

pub mod roles;

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::debug;

use crate::core::HeatVizError;
use crate::graph::{Color, Graph, Shape};

/// Saturation of tag fill colors, in percent.
pub const FILL_SATURATION: f64 = 40.0;
/// Value of tag fill colors, in percent.
pub const FILL_VALUE: f64 = 100.0;
/// Pen width of edges between two box nodes.
pub const BOX_EDGE_PENWIDTH: f64 = 2.0;
/// Graph rank separation.
pub const RANKSEP: f64 = 2.0;

/// Tags used when none are configured.
pub const DEFAULT_TAGS: &[&str] = &["controller", "compute", "storage"];

static CORE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*)-core").expect("core group pattern is valid"));

/// `n` evenly spaced hues with fixed saturation and value.
///
/// Hue `i` is `i * (360 / n)` degrees, using integer division.
#[must_use]
pub fn palette(n: usize, saturation: f64, value: f64) -> Vec<Color> {
    if n == 0 {
        return Vec::new();
    }
    let step = 360 / n;
    (0..n).map(|i| Color::hsv((i * step) as f64, saturation, value)).collect()
}

/// Group of a node label: `<name>` for `<name>-core`, otherwise the label.
#[must_use]
pub fn group_for(label: &str) -> String {
    CORE_GROUP
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| label.to_string(), |m| m.as_str().to_string())
}

/// A pattern and the fill color it assigns.
#[derive(Debug, Clone)]
pub struct DecorationRule {
    pattern: Regex,
    color: Color,
}

impl DecorationRule {
    /// Case-insensitive rule for `pattern`.
    pub fn new(pattern: &str, color: Color) -> Result<Self, HeatVizError> {
        let compiled = RegexBuilder::new(pattern).case_insensitive(true).build().map_err(|e| {
            HeatVizError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            pattern: compiled,
            color,
        })
    }

    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        self.pattern.is_match(label)
    }
}

/// Applies fill rules, groups and box-edge weights to a graph.
#[derive(Debug, Clone, Default)]
pub struct Decorator {
    rules: Vec<DecorationRule>,
}

impl Decorator {
    /// Decorator with explicit rules, highest priority first.
    #[must_use]
    pub const fn with_rules(rules: Vec<DecorationRule>) -> Self {
        Self {
            rules,
        }
    }

    /// One rule per tag, colored from a palette sized to the tag list.
    ///
    /// # Errors
    ///
    /// [`HeatVizError::InvalidPattern`] if a tag is not a valid regex.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Result<Self, HeatVizError> {
        let colors = palette(tags.len(), FILL_SATURATION, FILL_VALUE);
        let rules = tags
            .iter()
            .zip(colors)
            .map(|(tag, color)| DecorationRule::new(tag.as_ref(), color))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_rules(rules))
    }

    /// Decorate `graph` in place.
    ///
    /// Sets the rank separation, each node's group and first-matching fill
    /// color (an already set fill color is kept).
    pub fn apply(&self, graph: &mut Graph) {
        graph.attrs.ranksep = Some(RANKSEP);

        for id in graph.node_ids() {
            let node = graph.node_mut(id);
            let label = node.label().to_string();
            node.attrs.group = Some(group_for(&label));

            if node.attrs.fill_color.is_some() {
                continue;
            }
            if let Some(rule) = self.rules.iter().find(|rule| rule.matches(&label)) {
                debug!("Filling {label} with {}", rule.color);
                node.attrs.fill_color = Some(rule.color);
                node.attrs.filled = true;
            }
        }
    }
}

/// Give edges joining two box nodes [`BOX_EDGE_PENWIDTH`].
///
/// Template graphs only; role graphs weight edges by color instead.
pub fn weight_box_edges(graph: &mut Graph) {
    for id in graph.edge_ids() {
        let Some((from, to)) = graph.edge_endpoints(id) else {
            continue;
        };
        let is_box = |node| graph.node(node).attrs.shape == Some(Shape::Box);
        let between_boxes = is_box(from) && is_box(to);
        if between_boxes && let Some(attrs) = graph.edge_attrs_mut(id) {
            attrs.penwidth = Some(BOX_EDGE_PENWIDTH);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_spacing() {
        let colors = palette(3, FILL_SATURATION, FILL_VALUE);
        assert_eq!(
            colors,
            vec![
                Color::hsv(0.0, 40.0, 100.0),
                Color::hsv(120.0, 40.0, 100.0),
                Color::hsv(240.0, 40.0, 100.0),
            ]
        );
        // 360 / 7 truncates to 51 degrees
        assert_eq!(palette(7, 1.0, 1.0)[2], Color::hsv(102.0, 1.0, 1.0));
        assert!(palette(0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let decorator = Decorator::from_tags(&["controller", "compute"]).unwrap();
        let hues = palette(2, FILL_SATURATION, FILL_VALUE);
        let mut graph = Graph::new();
        let id = graph.get_or_create("compute-controller-01");

        decorator.apply(&mut graph);

        let attrs = &graph.node(id).attrs;
        assert_eq!(attrs.fill_color, Some(hues[0]));
        assert!(attrs.filled);
    }

    #[test]
    fn test_existing_fill_is_kept() {
        let decorator = Decorator::from_tags(&["compute"]).unwrap();
        let mut graph = Graph::new();
        let id = graph.get_or_create("compute-0");
        graph.node_mut(id).attrs.fill_color = Some(Color::Named("gray"));

        decorator.apply(&mut graph);
        assert_eq!(graph.node(id).attrs.fill_color, Some(Color::Named("gray")));
    }

    #[test]
    fn test_rules_are_case_insensitive() {
        let decorator = Decorator::from_tags(&["controller"]).unwrap();
        let mut graph = Graph::new();
        let id = graph.get_or_create("ControllerDeployment");
        let other = graph.get_or_create("ComputeDeployment");

        decorator.apply(&mut graph);
        assert!(graph.node(id).attrs.filled);
        assert!(!graph.node(other).attrs.filled);
        assert_eq!(graph.node(other).attrs.fill_color, None);
    }

    #[test]
    fn test_groups() {
        assert_eq!(group_for("nova-core"), "nova");
        assert_eq!(group_for("role[glance-core]"), "role[glance");
        assert_eq!(group_for("ControllerConfig"), "ControllerConfig");
    }

    #[test]
    fn test_box_edges_are_heavier() {
        let mut graph = Graph::new();
        let a = graph.get_or_create("a");
        let b = graph.get_or_create("b");
        let c = graph.get_or_create("c");
        graph.node_mut(a).attrs.shape = Some(Shape::Box);
        graph.node_mut(b).attrs.shape = Some(Shape::Box);
        graph.node_mut(c).attrs.shape = Some(Shape::Oval);
        let box_edge = graph.add_edge(a, b);
        let mixed_edge = graph.add_edge(c, a);

        weight_box_edges(&mut graph);

        let penwidth = |id| graph.edges().find(|e| e.id == id).unwrap().attrs.penwidth;
        assert_eq!(penwidth(box_edge), Some(BOX_EDGE_PENWIDTH));
        assert_eq!(penwidth(mixed_edge), None);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_apply_leaves_edges_alone() {
        let mut graph = Graph::new();
        let a = graph.get_or_create("a");
        let b = graph.get_or_create("b");
        graph.node_mut(a).attrs.shape = Some(Shape::Box);
        graph.node_mut(b).attrs.shape = Some(Shape::Box);
        graph.add_edge(a, b);

        Decorator::default().apply(&mut graph);

        assert_eq!(graph.edges().next().unwrap().attrs.penwidth, None);
        assert_eq!(graph.attrs.ranksep, Some(RANKSEP));
    }

    #[test]
    fn test_invalid_tag() {
        let err = Decorator::from_tags(&["[unclosed"]).unwrap_err();
        assert!(matches!(err, HeatVizError::InvalidPattern { .. }));
    }
}
