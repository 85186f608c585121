//! Site graph module: data model, loading, traversal and relevance matching.
//!
//! A [`Graph`] is built once by [`store::load`] and is immutable afterwards.
//! Cross references (edges, next steps, `appearsOn`) are plain node ids
//! resolved through the graph's id index, never embedded references.

mod raw;
pub mod relevance;
pub mod store;
pub mod traversal;

#[cfg(test)]
pub(crate) mod fixtures;

pub use relevance::{match_task, RelevanceSet};
pub use store::{load, load_str, SourceFormat};
pub use traversal::{build_tree, resolve_root, NavigationTree, PrunedEdge, TreeEntry};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Descriptive header of the site graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    pub base_url: String,
    pub version: String,
}

/// An interactive element on a page or component (button, input, link, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Catalogue entry shown on a page. Opaque to every algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub name: String,
    pub price: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFlow {
    pub entry_point: bool,
    pub next_steps: Vec<String>,
    pub actions: Vec<String>,
}

/// Page-only fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub route: String,
    pub requires_auth: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_flow: Option<UserFlow>,
}

impl Page {
    pub fn is_entry_point(&self) -> bool {
        self.user_flow.as_ref().is_some_and(|flow| flow.entry_point)
    }
}

/// Component-only fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub appears_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Variant payload of a node, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeDetail {
    Page(Page),
    Component(Component),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Page,
    Component,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Page => write!(f, "page"),
            NodeKind::Component => write!(f, "component"),
        }
    }
}

/// A page or component of the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub description: String,
    pub elements: Vec<Element>,
    #[serde(flatten)]
    pub detail: NodeDetail,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self.detail {
            NodeDetail::Page(_) => NodeKind::Page,
            NodeDetail::Component(_) => NodeKind::Component,
        }
    }

    pub fn as_page(&self) -> Option<&Page> {
        match &self.detail {
            NodeDetail::Page(page) => Some(page),
            NodeDetail::Component(_) => None,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match &self.detail {
            NodeDetail::Component(component) => Some(component),
            NodeDetail::Page(_) => None,
        }
    }

    /// Route for pages; components have none.
    pub fn route(&self) -> Option<&str> {
        self.as_page().map(|page| page.route.as_str())
    }

    /// Components never require authentication on their own.
    pub fn requires_auth(&self) -> bool {
        self.as_page().is_some_and(|page| page.requires_auth)
    }

    /// Elements that carry a selector, in declaration order.
    pub fn selector_elements(&self) -> impl Iterator<Item = (&Element, &str)> {
        self.elements
            .iter()
            .filter_map(|el| el.selector.as_deref().map(|sel| (el, sel)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// User moves from one page to another
    Navigation,
    /// A component affects a page without navigating
    Interaction,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Navigation => write!(f, "navigation"),
            EdgeKind::Interaction => write!(f, "interaction"),
        }
    }
}

/// Directed relation between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    pub trigger: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authentication {
    pub required: bool,
    pub public_pages: Vec<String>,
    pub protected_pages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_credentials: Option<Credentials>,
}

/// Named list of human-readable steps. Informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPattern {
    pub name: String,
    pub steps: Vec<String>,
}

/// The validated site graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    metadata: Metadata,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authentication: Option<Authentication>,
    #[serde(serialize_with = "serialize_patterns")]
    common_patterns: Vec<CommonPattern>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    outgoing: HashMap<String, Vec<usize>>,
}

impl Graph {
    /// Assemble a graph from already-validated parts and index it.
    pub(crate) fn from_parts(
        metadata: Metadata,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        authentication: Option<Authentication>,
        common_patterns: Vec<CommonPattern>,
    ) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id.clone(), pos))
            .collect();

        let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.from.clone()).or_default().push(pos);
        }

        Self {
            metadata,
            nodes,
            edges,
            authentication,
            common_patterns,
            index,
            outgoing,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    pub fn common_patterns(&self) -> &[CommonPattern] {
        &self.common_patterns
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.kind() == kind)
    }

    /// Pages paired with their page payload, in declaration order.
    pub fn pages(&self) -> impl Iterator<Item = (&Node, &Page)> {
        self.nodes
            .iter()
            .filter_map(|node| node.as_page().map(|page| (node, page)))
    }

    /// Components paired with their component payload, in declaration order.
    pub fn components(&self) -> impl Iterator<Item = (&Node, &Component)> {
        self.nodes
            .iter()
            .filter_map(|node| node.as_component().map(|comp| (node, comp)))
    }

    /// Every edge leaving `id`, in edge-declaration order.
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &Edge> {
        self.outgoing
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&pos| &self.edges[pos])
    }

    /// Edges of one kind leaving `id`, in edge-declaration order.
    pub fn edges_from(&self, id: &str, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.outgoing(id).filter(move |edge| edge.kind == kind)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn protected_page_count(&self) -> usize {
        self.pages().filter(|(_, page)| page.requires_auth).count()
    }

    /// Display label for an id: the node name, or the raw id if unknown.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.find_node(id).map(|node| node.name.as_str()).unwrap_or(id)
    }

    /// Route of a page, or the name of any other node.
    pub fn route_or_name<'a>(&'a self, id: &'a str) -> &'a str {
        match self.find_node(id) {
            Some(node) => node.route().unwrap_or(node.name.as_str()),
            None => id,
        }
    }
}

fn serialize_patterns<S: Serializer>(
    patterns: &[CommonPattern],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(patterns.len()))?;
    for pattern in patterns {
        map.serialize_entry(&pattern.name, &pattern.steps)?;
    }
    map.end()
}
