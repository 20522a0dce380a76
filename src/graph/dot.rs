//! Graphviz DOT serialization of a [`Graph`].

use super::{EdgeAttrs, Graph, GraphAttrs, NodeAttrs};

/// Render `graph` as a `digraph` in DOT syntax.
///
/// Nodes and edges are written in insertion order; attributes that are unset
/// are omitted so Graphviz defaults apply.
#[must_use]
pub fn to_dot(graph: &Graph) -> String {
    let mut out = String::from("digraph {\n");

    let graph_attrs = graph_attr_list(&graph.attrs);
    if !graph_attrs.is_empty() {
        out.push_str(&format!("  graph [{}];\n", graph_attrs.join(", ")));
    }

    for (_, node) in graph.nodes() {
        let mut attrs = vec![format!("label={}", quote(node.label()))];
        attrs.extend(node_attr_list(&node.attrs));
        out.push_str(&format!("  {} [{}];\n", quote(node.key()), attrs.join(", ")));
    }

    for edge in graph.edges() {
        let from = quote(graph.node(edge.from).key());
        let to = quote(graph.node(edge.to).key());
        let attrs = edge_attr_list(edge.attrs);
        if attrs.is_empty() {
            out.push_str(&format!("  {from} -> {to};\n"));
        } else {
            out.push_str(&format!("  {from} -> {to} [{}];\n", attrs.join(", ")));
        }
    }

    out.push_str("}\n");
    out
}

fn graph_attr_list(attrs: &GraphAttrs) -> Vec<String> {
    let mut list = Vec::new();
    if let Some(ranksep) = attrs.ranksep {
        list.push(format!("ranksep={ranksep:.1}"));
    }
    if let Some(tooltip) = &attrs.tooltip {
        list.push(format!("tooltip={}", quote(tooltip)));
    }
    list
}

fn node_attr_list(attrs: &NodeAttrs) -> Vec<String> {
    let mut list = Vec::new();
    if let Some(shape) = attrs.shape {
        list.push(format!("shape={shape}"));
    }
    if attrs.filled {
        list.push("style=filled".to_string());
    }
    if let Some(color) = attrs.fill_color {
        list.push(format!("fillcolor={}", quote(&color.to_string())));
    }
    if attrs.peripheries != 1 {
        list.push(format!("peripheries={}", attrs.peripheries));
    }
    if let Some(group) = &attrs.group {
        list.push(format!("group={}", quote(group)));
    }
    if let Some(url) = &attrs.url {
        list.push(format!("URL={}", quote(url)));
    }
    list
}

fn edge_attr_list(attrs: &EdgeAttrs) -> Vec<String> {
    let mut list = Vec::new();
    if let Some(color) = attrs.color {
        list.push(format!("color={}", quote(&color.to_string())));
    }
    if let Some(penwidth) = attrs.penwidth {
        list.push(format!("penwidth={penwidth:.1}"));
    }
    list
}

/// Double-quoted DOT ID with `\` and `"` escaped.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
