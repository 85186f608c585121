//! Task-text relevance matching over pages.
//!
//! Matching is crude: any whitespace token of the task that
//! occurs as a substring of a page's name, description or route selects the
//! page. Short tokens such as "a" or "in" will over-match.

use crate::graph::{Graph, Node, Page};

/// Pages relevant to one task, in node-declaration order.
#[derive(Debug, Clone, Default)]
pub struct RelevanceSet<'g> {
    pages: Vec<(&'g Node, &'g Page)>,
}

impl<'g> RelevanceSet<'g> {
    pub fn pages(&self) -> &[(&'g Node, &'g Page)] {
        &self.pages
    }

    pub fn ids(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.pages.iter().map(|(node, _)| node.id.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pages.iter().any(|(node, _)| node.id == id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Matched pages that require authentication.
    pub fn protected(&self) -> impl Iterator<Item = &'g Node> + '_ {
        self.pages
            .iter()
            .filter(|(_, page)| page.requires_auth)
            .map(|(node, _)| *node)
    }
}

/// Lower-cased whitespace tokens of a task string.
pub fn tokenize(task: &str) -> Vec<String> {
    task.split_whitespace().map(str::to_lowercase).collect()
}

/// Select the pages whose text mentions any token of `task`.
pub fn match_task<'g>(graph: &'g Graph, task: &str) -> RelevanceSet<'g> {
    let tokens = tokenize(task);
    if tokens.is_empty() {
        return RelevanceSet::default();
    }

    let pages = graph
        .pages()
        .filter(|(node, page)| {
            let haystack =
                format!("{} {} {}", node.name, node.description, page.route).to_lowercase();
            tokens.iter().any(|token| haystack.contains(token.as_str()))
        })
        .collect::<Vec<_>>();

    log::debug!(
        "task matched {} of {} pages ({} tokens)",
        pages.len(),
        graph.pages().count(),
        tokens.len()
    );
    RelevanceSet { pages }
}
