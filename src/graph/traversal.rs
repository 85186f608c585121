//! Rooted depth-first traversal over navigation edges.

use std::collections::{HashMap, HashSet};

use crate::graph::{EdgeKind, Graph};
use crate::{Result, SitebriefError};

/// Position of one page in a navigation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub id: String,
    pub depth: usize,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

/// A navigation edge left out of the tree because its destination had
/// already been reached by an earlier path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunedEdge {
    pub from: String,
    pub to: String,
    pub trigger: String,
}

/// Spanning tree of the pages reachable from a root via navigation edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTree {
    entries: Vec<TreeEntry>,
    positions: HashMap<String, usize>,
    pruned: Vec<PrunedEdge>,
}

impl NavigationTree {
    pub fn root(&self) -> &TreeEntry {
        &self.entries[0]
    }

    pub fn get(&self, id: &str) -> Option<&TreeEntry> {
        self.positions.get(id).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Child ids of `id` in edge-declaration order; empty for unknown ids.
    pub fn children(&self, id: &str) -> &[String] {
        self.get(id).map(|entry| entry.children.as_slice()).unwrap_or_default()
    }

    /// Entries in depth-first pre-order, root first.
    pub fn preorder(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pruned_edges(&self) -> &[PrunedEdge] {
        &self.pruned
    }
}

/// Pick the traversal root.
///
/// An explicit root must name a page. Otherwise the first page flagged as an
/// entry point wins, then the first public page, then the first page.
pub fn resolve_root<'a>(graph: &'a Graph, requested: Option<&str>) -> Result<&'a str> {
    if let Some(id) = requested {
        return match graph.find_node(id) {
            Some(node) if node.as_page().is_some() => Ok(node.id.as_str()),
            Some(_) => Err(SitebriefError::NoRootFound(format!(
                "requested root '{}' is not a page",
                id
            ))),
            None => Err(SitebriefError::NoRootFound(format!(
                "requested root '{}' does not exist",
                id
            ))),
        };
    }

    graph
        .pages()
        .find(|(_, page)| page.is_entry_point())
        .or_else(|| graph.pages().find(|(_, page)| !page.requires_auth))
        .or_else(|| graph.pages().next())
        .map(|(node, _)| node.id.as_str())
        .ok_or_else(|| SitebriefError::NoRootFound("graph contains no page nodes".to_string()))
}

/// Build the navigation tree rooted at `root` (or the resolved entry point).
///
/// The first path reaching a page claims it; later edges into visited pages
/// are recorded as pruned and otherwise ignored, so cycles and diamonds
/// collapse into a spanning tree.
pub fn build_tree(graph: &Graph, root: Option<&str>) -> Result<NavigationTree> {
    let root = resolve_root(graph, root)?;

    let mut tree = NavigationTree {
        entries: Vec::new(),
        positions: HashMap::new(),
        pruned: Vec::new(),
    };
    let mut visited: HashSet<&str> = HashSet::new();

    visited.insert(root);
    push_entry(&mut tree, root, 0, None);

    // Each frame holds a page and the navigation edges it has left to walk.
    let mut stack = vec![(root, graph.edges_from(root, EdgeKind::Navigation))];

    while let Some((current, edges)) = stack.last_mut() {
        let current: &str = *current;
        let Some(edge) = edges.next() else {
            stack.pop();
            continue;
        };

        let target = edge.to.as_str();
        let is_page = graph
            .find_node(target)
            .is_some_and(|node| node.as_page().is_some());
        if !is_page {
            continue;
        }

        if !visited.insert(target) {
            log::debug!(
                "pruned navigation edge {} -> {} ({}): destination already in tree",
                edge.from,
                edge.to,
                edge.trigger
            );
            tree.pruned.push(PrunedEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
                trigger: edge.trigger.clone(),
            });
            continue;
        }

        let depth = tree.get(current).map(|entry| entry.depth + 1).unwrap_or(1);
        push_entry(&mut tree, target, depth, Some(current));
        stack.push((target, graph.edges_from(target, EdgeKind::Navigation)));
    }

    Ok(tree)
}

fn push_entry(tree: &mut NavigationTree, id: &str, depth: usize, parent: Option<&str>) {
    if let Some(parent) = parent {
        if let Some(&pos) = tree.positions.get(parent) {
            tree.entries[pos].children.push(id.to_string());
        }
    }
    tree.positions.insert(id.to_string(), tree.entries.len());
    tree.entries.push(TreeEntry {
        id: id.to_string(),
        depth,
        parent: parent.map(str::to_string),
        children: Vec::new(),
    });
}
