//! ASCII navigation tree followed by a flat page/component listing.

use super::{plural, sanitize_text, RenderContext, View};
use crate::graph::{Graph, NavigationTree};

pub struct TreeTextView;

impl View for TreeTextView {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn file_name(&self) -> &'static str {
        "navigation-tree.txt"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        render_tree_text(ctx.graph, ctx.tree)
    }
}

pub fn render_tree_text(graph: &Graph, tree: &NavigationTree) -> String {
    let mut out = format!(
        "Navigation Tree: {}\n\n",
        sanitize_text(&graph.metadata().name)
    );

    let root = &tree.root().id;
    out.push_str(&node_label(graph, root));
    out.push('\n');

    // (id, prefix for its children, is last child)
    let mut stack: Vec<(&str, String, bool)> = Vec::new();
    push_children(&mut stack, tree, root, "");
    while let Some((id, prefix, last)) = stack.pop() {
        let connector = if last { "└── " } else { "├── " };
        out.push_str(&format!("{}{}{}\n", prefix, connector, node_label(graph, id)));

        let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        push_children(&mut stack, tree, id, &child_prefix);
    }

    let unreachable: Vec<_> = graph
        .pages()
        .filter(|(node, _)| !tree.contains(&node.id))
        .map(|(node, _)| sanitize_text(&node.id))
        .collect();
    if !unreachable.is_empty() {
        out.push_str(&format!(
            "\nNot reachable from {}: {}\n",
            sanitize_text(graph.name_of(root)),
            unreachable.join(", ")
        ));
    }

    out.push_str("\nPages:\n");
    for (node, page) in graph.pages() {
        out.push_str(&format!(
            "- {} {} [{}] - {}, {}\n",
            sanitize_text(&page.route),
            sanitize_text(&node.name),
            if page.requires_auth { "auth required" } else { "public" },
            plural(node.elements.len(), "element"),
            plural(page.products.len(), "product"),
        ));
    }

    let mut components = graph.components().peekable();
    if components.peek().is_some() {
        out.push_str("\nComponents:\n");
        for (node, component) in components {
            let mut line = format!("- {}", sanitize_text(&node.name));
            if !node.description.is_empty() {
                line.push_str(&format!(": {}", sanitize_text(&node.description)));
            }
            if !component.appears_on.is_empty() {
                let pages: Vec<_> = component.appears_on.iter().map(|id| sanitize_text(id)).collect();
                line.push_str(&format!(" (appears on: {})", pages.join(", ")));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Push children in reverse so the stack pops them in declaration order.
fn push_children<'t>(
    stack: &mut Vec<(&'t str, String, bool)>,
    tree: &'t NavigationTree,
    id: &str,
    prefix: &str,
) {
    let children = tree.children(id);
    for (pos, child) in children.iter().enumerate().rev() {
        let last = pos + 1 == children.len();
        stack.push((child.as_str(), prefix.to_string(), last));
    }
}

fn node_label(graph: &Graph, id: &str) -> String {
    match graph.find_node(id) {
        Some(node) => match node.route() {
            Some(route) => format!("{} ({})", sanitize_text(&node.name), sanitize_text(route)),
            None => sanitize_text(&node.name).into_owned(),
        },
        None => sanitize_text(id).into_owned(),
    }
}
