//! Keyed dependency graph with typed drawing attributes.
//!
//! Nodes are identified by their key (a resource name or a role/recipe
//! reference). [`Graph::get_or_create`] is the only way to add a node, so a
//! key always maps to exactly one node. Edges are stored in insertion order
//! and duplicates are allowed.
//!
//! Node and edge attributes form a closed vocabulary ([`NodeAttrs`],
//! [`EdgeAttrs`], [`GraphAttrs`]) that the DOT serializer in [`dot`] turns
//! into Graphviz attributes.
//!
//! The editing operations used by the role pages have these contracts:
//!
//! - [`Graph::remove_node`] removes the node and every incident edge.
//! - [`Graph::lowercut`] removes the given nodes and then, repeatedly, every
//!   node that had predecessors before the cut and has none left.
//! - [`Graph::focus`] copies the node plus all of its transitive ancestors
//!   and descendants, and the edges among them.

pub mod dot;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use regex::Regex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Handle to a node of a [`Graph`].
pub type NodeId = NodeIndex;

/// Handle to an edge of a [`Graph`].
pub type EdgeId = EdgeIndex;

/// Node outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Deployments and roles
    Box,
    /// Software configs
    Oval,
    /// Servers
    Box3d,
}

impl Shape {
    /// Graphviz shape name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Oval => "oval",
            Shape::Box3d => "box3d",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Graphviz color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Hue in degrees, saturation and value in percent
    Hsv {
        /// 0..360
        hue: f64,
        /// 0..100
        saturation: f64,
        /// 0..100
        value: f64,
    },
    /// X11 color name
    Named(&'static str),
}

impl Color {
    /// HSV color from degrees and percentages.
    #[must_use]
    pub const fn hsv(hue: f64, saturation: f64, value: f64) -> Self {
        Color::Hsv {
            hue,
            saturation,
            value,
        }
    }
}

impl fmt::Display for Color {
    /// HSV colors print as the normalized `"h,s,v"` triple Graphviz accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hsv {
                hue,
                saturation,
                value,
            } => write!(f, "{:.3},{:.3},{:.3}", hue / 360.0, saturation / 100.0, value / 100.0),
            Color::Named(name) => f.write_str(name),
        }
    }
}

/// Drawing attributes of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAttrs {
    pub shape: Option<Shape>,
    pub fill_color: Option<Color>,
    /// `style=filled`
    pub filled: bool,
    pub group: Option<String>,
    #[doc(alias = "URL")]
    pub url: Option<String>,
    /// Number of outlines; 2 marks resources that signal completion
    pub peripheries: u8,
}

impl Default for NodeAttrs {
    fn default() -> Self {
        Self {
            shape: None,
            fill_color: None,
            filled: false,
            group: None,
            url: None,
            peripheries: 1,
        }
    }
}

/// Drawing attributes of an edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeAttrs {
    pub color: Option<Color>,
    pub penwidth: Option<f64>,
}

/// Graph-wide attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphAttrs {
    pub ranksep: Option<f64>,
    pub tooltip: Option<String>,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    key: String,
    pub attrs: NodeAttrs,
}

impl Node {
    /// Unique key of the node.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Displayed label; always the key.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.key
    }
}

/// A borrowed view of one edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub attrs: &'a EdgeAttrs,
}

/// Directed graph of keyed nodes.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    graph: StableDiGraph<Node, EdgeAttrs>,
    index: HashMap<String, NodeId>,
    pub attrs: GraphAttrs,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node for `key`, creating it if it does not exist yet.
    pub fn get_or_create(&mut self, key: &str) -> NodeId {
        if let Some(&id) = self.index.get(key) {
            id
        } else {
            let id = self.graph.add_node(Node {
                key: key.to_string(),
                attrs: NodeAttrs::default(),
            });
            self.index.insert(key.to_string(), id);
            id
        }
    }

    /// Look up a node by key without creating it.
    #[must_use]
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was removed or belongs to another graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.graph[id]
    }

    /// Mutable access to the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was removed or belongs to another graph.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.graph[id]
    }

    /// Look up a node by key.
    #[must_use]
    pub fn node_by_key(&self, key: &str) -> Option<&Node> {
        self.node_id(key).map(|id| &self.graph[id])
    }

    /// Add an edge. Duplicates of an existing edge are kept.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> EdgeId {
        self.graph.add_edge(from, to, EdgeAttrs::default())
    }

    /// Node ids in insertion order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.graph.node_indices().collect()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.graph.node_indices().map(|id| (id, &self.graph[id]))
    }

    /// Edge ids in insertion order.
    #[must_use]
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.graph.edge_indices().collect()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_indices().filter_map(|id| {
            let (from, to) = self.graph.edge_endpoints(id)?;
            Some(EdgeView {
                id,
                from,
                to,
                attrs: &self.graph[id],
            })
        })
    }

    /// Endpoints of an edge as keys, for logging and tests.
    #[must_use]
    pub fn edge_keys(&self) -> Vec<(String, String)> {
        self.edges()
            .map(|e| (self.graph[e.from].key.clone(), self.graph[e.to].key.clone()))
            .collect()
    }

    /// Endpoints of `id`.
    #[must_use]
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<(NodeId, NodeId)> {
        self.graph.edge_endpoints(id)
    }

    /// Mutable attributes of an edge.
    pub fn edge_attrs_mut(&mut self, id: EdgeId) -> Option<&mut EdgeAttrs> {
        self.graph.edge_weight_mut(id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Nodes whose label matches any of `patterns`, in insertion order.
    #[must_use]
    pub fn find(&self, patterns: &[Regex]) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, node)| patterns.iter().any(|p| p.is_match(node.label())))
            .map(|(id, _)| id)
            .collect()
    }

    /// Remove a node together with every incident edge.
    ///
    /// Returns `false` if the node was already gone.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        match self.graph.remove_node(id) {
            Some(node) => {
                self.index.remove(&node.key);
                true
            }
            None => false,
        }
    }

    /// Remove `ids` and everything that only hangs below them.
    ///
    /// After the given nodes are removed, any node that had at least one
    /// predecessor before the cut and has none left is removed as well,
    /// until no such node remains. Roots of the original graph are never
    /// removed unless listed in `ids`.
    pub fn lowercut(&mut self, ids: &[NodeId]) {
        let had_predecessors: HashSet<NodeId> = self
            .graph
            .node_indices()
            .filter(|&id| self.graph.neighbors_directed(id, Direction::Incoming).next().is_some())
            .collect();

        let mut queue: Vec<NodeId> = ids.to_vec();
        while let Some(id) = queue.pop() {
            if !self.graph.contains_node(id) {
                continue;
            }
            let children: Vec<NodeId> =
                self.graph.neighbors_directed(id, Direction::Outgoing).collect();
            self.remove_node(id);

            for child in children {
                if self.graph.contains_node(child)
                    && had_predecessors.contains(&child)
                    && self.graph.neighbors_directed(child, Direction::Incoming).next().is_none()
                {
                    queue.push(child);
                }
            }
        }
    }

    /// Subgraph of `id` with all its transitive ancestors and descendants.
    ///
    /// Node attributes, edge attributes and graph attributes are copied;
    /// node and edge order follow this graph.
    #[must_use]
    pub fn focus(&self, id: NodeId) -> Graph {
        let mut keep = self.reachable(id, Direction::Outgoing);
        keep.extend(self.reachable(id, Direction::Incoming));

        let mut focused = Graph {
            attrs: self.attrs.clone(),
            ..Graph::default()
        };
        for (node_id, node) in self.nodes() {
            if keep.contains(&node_id) {
                let new_id = focused.get_or_create(node.key());
                focused.node_mut(new_id).attrs = node.attrs.clone();
            }
        }
        for edge in self.edges() {
            if keep.contains(&edge.from) && keep.contains(&edge.to) {
                let from = focused.get_or_create(self.node(edge.from).key());
                let to = focused.get_or_create(self.node(edge.to).key());
                let new_edge = focused.add_edge(from, to);
                focused.graph[new_edge] = edge.attrs.clone();
            }
        }
        focused
    }

    fn reachable(&self, start: NodeId, direction: Direction) -> HashSet<NodeId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        if self.graph.contains_node(start) {
            seen.insert(start);
            queue.push_back(start);
        }
        while let Some(current) = queue.pop_front() {
            for other in self.graph.neighbors_directed(current, direction) {
                if seen.insert(other) {
                    queue.push_back(other);
                }
            }
        }
        seen
    }
}
