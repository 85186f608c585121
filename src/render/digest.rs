//! Condensed quick-reference: routes and selectors only.

use super::{sanitize_text, RenderContext, View};
use crate::graph::{Graph, Node};

pub struct DigestView;

impl View for DigestView {
    fn name(&self) -> &'static str {
        "digest"
    }

    fn file_name(&self) -> &'static str {
        "digest.md"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        render_digest(ctx.graph)
    }
}

pub fn render_digest(graph: &Graph) -> String {
    let meta = graph.metadata();
    let mut out = format!("# {} - Quick Reference\n", sanitize_text(&meta.name));
    if !meta.base_url.is_empty() {
        out.push_str(&format!("Base URL: {}\n", sanitize_text(&meta.base_url)));
    }

    out.push_str("\n## Routes\n");
    for (node, page) in graph.pages() {
        out.push_str(&format!(
            "- {} — {}{}\n",
            sanitize_text(&page.route),
            sanitize_text(&node.name),
            if page.requires_auth { " (Auth Required)" } else { "" }
        ));
    }

    let pages = graph.pages().map(|(node, page)| {
        let heading = format!("{} ({})", sanitize_text(&node.name), sanitize_text(&page.route));
        (node, heading)
    });
    let components = graph.components().map(|(node, _)| {
        let heading = format!("{} (component)", sanitize_text(&node.name));
        (node, heading)
    });
    let blocks: Vec<String> = pages
        .chain(components)
        .filter_map(|(node, heading)| selector_block(node, &heading))
        .collect();

    if !blocks.is_empty() {
        out.push_str("\n## Selectors\n");
        for block in blocks {
            out.push('\n');
            out.push_str(&block);
        }
    }
    out
}

/// Selector bullets for one node, or `None` when it has no selectors.
fn selector_block(node: &Node, heading: &str) -> Option<String> {
    let mut lines = node
        .selector_elements()
        .map(|(element, selector)| {
            format!(
                "- {}: {}\n",
                sanitize_text(&element.description),
                sanitize_text(selector)
            )
        })
        .peekable();
    lines.peek()?;

    let mut block = format!("### {}\n", heading);
    block.extend(lines);
    Some(block)
}
