//! Graph loading and structural validation.
//!
//! Validation is all-or-nothing: the first violation aborts the load and no
//! partially built graph is ever returned.

use std::collections::HashSet;
use std::path::Path;

use super::raw::{RawAuthentication, RawEdge, RawGraph, RawNode};
use super::{
    Authentication, CommonPattern, Component, Credentials, Edge, EdgeKind, Element, Graph,
    Metadata, Node, NodeDetail, Page, Product, UserFlow,
};
use crate::error::{Result, SitebriefError, ValidationError};

/// Structured-data syntax of a graph document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Check if this format handles the given file extension
    pub fn can_parse(&self, extension: &str) -> bool {
        match self {
            SourceFormat::Json => extension == "json",
            SourceFormat::Yaml => matches!(extension, "yaml" | "yml"),
        }
    }

    /// Pick the format from a path's extension; anything unknown is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        [SourceFormat::Yaml, SourceFormat::Json]
            .into_iter()
            .find(|format| format.can_parse(&extension))
            .unwrap_or(SourceFormat::Json)
    }

    fn label(&self) -> &'static str {
        match self {
            SourceFormat::Json => "JSON",
            SourceFormat::Yaml => "YAML",
        }
    }
}

/// Load and validate a graph document from disk.
pub fn load(path: impl AsRef<Path>) -> Result<Graph> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SitebriefError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SitebriefError::NotFound(path.to_path_buf())
        } else {
            SitebriefError::Io(e)
        }
    })?;

    let graph = load_str(&content, SourceFormat::from_path(path))?;
    log::info!(
        "Loaded site graph '{}' from {}: {} nodes, {} edges",
        graph.metadata().name,
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Parse and validate a graph document held in memory.
pub fn load_str(content: &str, format: SourceFormat) -> Result<Graph> {
    let raw: RawGraph = match format {
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        SourceFormat::Yaml => serde_yaml_ng::from_str(content).map_err(|e| e.to_string()),
    }
    .map_err(|message| ValidationError::Syntax {
        format: format.label(),
        message,
    })?;

    Ok(validate(raw)?)
}

fn validate(raw: RawGraph) -> std::result::Result<Graph, ValidationError> {
    let metadata = raw
        .metadata
        .map(|m| Metadata {
            name: m.name.unwrap_or_default(),
            base_url: m.base_url.unwrap_or_default(),
            version: m.version.unwrap_or_default(),
        })
        .unwrap_or_default();

    let nodes = raw
        .nodes
        .into_iter()
        .enumerate()
        .map(|(pos, node)| convert_node(pos, node))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut ids = HashSet::with_capacity(nodes.len());
    for node in &nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.id.clone(),
            });
        }
    }

    let edges = raw
        .edges
        .into_iter()
        .enumerate()
        .map(|(pos, edge)| convert_edge(pos, edge))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for (pos, edge) in edges.iter().enumerate() {
        for endpoint in [&edge.from, &edge.to] {
            require_node(&ids, endpoint, || {
                format!("edge #{} ({} -> {})", pos, edge.from, edge.to)
            })?;
        }
    }

    for node in &nodes {
        match &node.detail {
            NodeDetail::Page(page) => {
                if let Some(flow) = &page.user_flow {
                    for step in &flow.next_steps {
                        require_node(&ids, step, || {
                            format!("userFlow.nextSteps of node '{}'", node.id)
                        })?;
                    }
                }
            }
            NodeDetail::Component(component) => {
                for page_id in &component.appears_on {
                    require_node(&ids, page_id, || {
                        format!("appearsOn of node '{}'", node.id)
                    })?;
                }
            }
        }
    }

    let authentication = raw.authentication.map(convert_auth);
    if let Some(auth) = &authentication {
        for id in &auth.public_pages {
            require_node(&ids, id, || "authentication.publicPages".to_string())?;
        }
        for id in &auth.protected_pages {
            require_node(&ids, id, || "authentication.protectedPages".to_string())?;
        }
        let public: HashSet<&str> = auth.public_pages.iter().map(String::as_str).collect();
        if let Some(id) = auth.protected_pages.iter().find(|id| public.contains(id.as_str())) {
            return Err(ValidationError::CrossListedAuth { id: id.clone() });
        }
    }

    warn_unbacked_next_steps(&nodes, &edges);

    let common_patterns = raw
        .common_patterns
        .into_iter()
        .map(|(name, steps)| CommonPattern { name, steps })
        .collect();

    Ok(Graph::from_parts(
        metadata,
        nodes,
        edges,
        authentication,
        common_patterns,
    ))
}

fn require_node(
    ids: &HashSet<&str>,
    id: &str,
    context: impl FnOnce() -> String,
) -> std::result::Result<(), ValidationError> {
    if ids.contains(id) {
        Ok(())
    } else {
        Err(ValidationError::DanglingReference {
            id: id.to_string(),
            context: context(),
        })
    }
}

fn convert_node(pos: usize, raw: RawNode) -> std::result::Result<Node, ValidationError> {
    let owner = match &raw.id {
        Some(id) => format!("node '{}'", id),
        None => format!("node #{}", pos),
    };
    let missing = |field: &'static str| ValidationError::MissingField {
        owner: owner.clone(),
        field,
    };

    let id = raw.id.clone().ok_or_else(|| missing("id"))?;
    let kind = raw.kind.clone().ok_or_else(|| missing("kind"))?;
    let name = raw.name.clone().ok_or_else(|| missing("name"))?;

    let detail = match kind.to_lowercase().as_str() {
        "page" => NodeDetail::Page(Page {
            route: raw.route.ok_or_else(|| missing("route"))?,
            requires_auth: raw.requires_auth.unwrap_or(false),
            products: raw
                .products
                .unwrap_or_default()
                .into_iter()
                .map(|p| Product {
                    name: p.name,
                    price: p.price.map(|price| price.to_string()).unwrap_or_default(),
                    category: p.category,
                })
                .collect(),
            user_flow: raw.user_flow.map(|flow| UserFlow {
                entry_point: flow.entry_point,
                next_steps: flow.next_steps,
                actions: flow.actions,
            }),
        }),
        "component" => NodeDetail::Component(Component {
            appears_on: raw.appears_on.unwrap_or_default(),
            position: raw.position,
        }),
        _ => return Err(ValidationError::UnknownKind { owner, kind }),
    };

    let elements = raw
        .elements
        .unwrap_or_default()
        .into_iter()
        .map(|el| Element {
            element_type: el.element_type,
            description: el.description,
            selector: el.selector,
            placeholder: el.placeholder,
            text: el.text,
        })
        .collect();

    Ok(Node {
        id,
        name,
        description: raw.description.unwrap_or_default(),
        elements,
        detail,
    })
}

fn convert_edge(pos: usize, raw: RawEdge) -> std::result::Result<Edge, ValidationError> {
    let owner = format!("edge #{}", pos);
    let missing = |field: &'static str| ValidationError::MissingField {
        owner: owner.clone(),
        field,
    };

    let from = raw.from.ok_or_else(|| missing("from"))?;
    let to = raw.to.ok_or_else(|| missing("to"))?;
    let kind = raw.kind.ok_or_else(|| missing("kind"))?;
    let kind = match kind.to_lowercase().as_str() {
        "navigation" => EdgeKind::Navigation,
        "interaction" => EdgeKind::Interaction,
        _ => return Err(ValidationError::UnknownKind { owner, kind }),
    };

    Ok(Edge {
        from,
        to,
        kind,
        trigger: raw.trigger,
        description: raw.description,
    })
}

fn convert_auth(raw: RawAuthentication) -> Authentication {
    Authentication {
        required: raw.required,
        public_pages: raw.public_pages,
        protected_pages: raw.protected_pages,
        default_credentials: raw.default_credentials.map(|c| Credentials {
            username: c.username,
            password: c.password,
        }),
    }
}

/// `nextSteps` is documentation; a step without a matching navigation edge
/// is accepted but worth flagging.
fn warn_unbacked_next_steps(nodes: &[Node], edges: &[Edge]) {
    let navigation: HashSet<(&str, &str)> = edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Navigation)
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();

    for node in nodes {
        let Some(flow) = node.as_page().and_then(|page| page.user_flow.as_ref()) else {
            continue;
        };
        for step in &flow.next_steps {
            if !navigation.contains(&(node.id.as_str(), step.as_str())) {
                log::warn!(
                    "node '{}' lists next step '{}' without a navigation edge to it",
                    node.id,
                    step
                );
            }
        }
    }
}
