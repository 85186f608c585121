//! Self-contained HTML site map with client-side expand/collapse.

use super::{escape_html, RenderContext, View};
use crate::graph::{Graph, NavigationTree, Node, NodeDetail};

pub struct InteractiveMapView;

impl View for InteractiveMapView {
    fn name(&self) -> &'static str {
        "map"
    }

    fn file_name(&self) -> &'static str {
        "site-map.html"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        render_interactive_map(ctx.graph, ctx.tree)
    }
}

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; padding: 24px; background: #f5f6f8; color: #222; }
header h1 { margin: 0 0 4px 0; }
.base-url { color: #666; margin: 0 0 16px 0; }
.stats { display: flex; gap: 12px; margin-bottom: 16px; }
.stat { background: #fff; border-radius: 8px; padding: 12px 16px; box-shadow: 0 1px 2px rgba(0,0,0,.1); }
.stat-value { display: block; font-size: 24px; font-weight: 600; }
.stat-label { color: #666; font-size: 12px; text-transform: uppercase; }
.controls { margin-bottom: 16px; }
.controls button { margin-right: 8px; }
.node { background: #fff; border-radius: 8px; margin-bottom: 8px; box-shadow: 0 1px 2px rgba(0,0,0,.1); }
.node-header { cursor: pointer; padding: 10px 14px; display: flex; align-items: center; gap: 8px; }
.node-body { display: none; padding: 0 14px 12px 14px; border-top: 1px solid #eee; }
.node.open .node-body { display: block; }
.route { color: #555; }
.badge { font-size: 11px; border-radius: 10px; padding: 2px 8px; }
.badge-page { background: #c8e6c9; }
.badge-component { background: #bbdefb; }
.badge-auth { background: #ffcdd2; }
"#;

const SCRIPT: &str = r#"
function toggleNode(header) {
  header.parentElement.classList.toggle('open');
}
function setAll(open) {
  document.querySelectorAll('.node').forEach(function (node) {
    node.classList.toggle('open', open);
  });
}
"#;

/// Render the interactive map.
///
/// Pages reachable from the root come first in tree pre-order, followed by
/// the remaining pages in declaration order. The tree only orders pages; it
/// never hides one.
pub fn render_interactive_map(graph: &Graph, tree: &NavigationTree) -> String {
    let name = escape_html(&graph.metadata().name);
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{} - Site Map</title>\n", name));
    out.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    out.push_str(&format!("<header>\n<h1>{}</h1>\n", name));
    if !graph.metadata().base_url.is_empty() {
        out.push_str(&format!(
            "<p class=\"base-url\">{}</p>\n",
            escape_html(&graph.metadata().base_url)
        ));
    }
    out.push_str("</header>\n");

    out.push_str("<section class=\"stats\">\n");
    for (id, value, label) in [
        ("page-count", graph.pages().count(), "Pages"),
        ("component-count", graph.components().count(), "Components"),
        ("edge-count", graph.edge_count(), "Connections"),
        ("protected-count", graph.protected_page_count(), "Protected Pages"),
    ] {
        out.push_str(&format!(
            "<div class=\"stat\"><span class=\"stat-value\" id=\"{}\">{}</span><span class=\"stat-label\">{}</span></div>\n",
            id, value, label
        ));
    }
    out.push_str("</section>\n");

    out.push_str(
        "<div class=\"controls\">\
         <button type=\"button\" onclick=\"setAll(true)\">Expand all</button>\
         <button type=\"button\" onclick=\"setAll(false)\">Collapse all</button>\
         </div>\n",
    );

    out.push_str("<h2>Pages</h2>\n<div class=\"node-list\" id=\"pages\">\n");
    for node in ordered_pages(graph, tree) {
        out.push_str(&node_record(graph, node));
    }
    out.push_str("</div>\n");

    out.push_str("<h2>Components</h2>\n<div class=\"node-list\" id=\"components\">\n");
    for (node, _) in graph.components() {
        out.push_str(&node_record(graph, node));
    }
    out.push_str("</div>\n");

    out.push_str(&format!("<script>{}</script>\n</body>\n</html>\n", SCRIPT));
    out
}

fn ordered_pages<'g>(graph: &'g Graph, tree: &NavigationTree) -> Vec<&'g Node> {
    let reachable = tree
        .preorder()
        .iter()
        .filter_map(|entry| graph.find_node(&entry.id));
    let rest = graph
        .pages()
        .filter(|(node, _)| !tree.contains(&node.id))
        .map(|(node, _)| node);
    reachable.chain(rest).collect()
}

fn node_record(graph: &Graph, node: &Node) -> String {
    let mut out = format!("<div class=\"node\" data-id=\"{}\">\n", escape_html(&node.id));

    out.push_str("<div class=\"node-header\" onclick=\"toggleNode(this)\">");
    out.push_str(&format!("<span class=\"node-name\">{}</span>", escape_html(&node.name)));
    match &node.detail {
        NodeDetail::Page(page) => {
            out.push_str(&format!("<code class=\"route\">{}</code>", escape_html(&page.route)));
            out.push_str("<span class=\"badge badge-page\">page</span>");
            if page.requires_auth {
                out.push_str("<span class=\"badge badge-auth\">auth required</span>");
            }
        }
        NodeDetail::Component(_) => {
            out.push_str("<span class=\"badge badge-component\">component</span>");
        }
    }
    out.push_str("</div>\n");

    out.push_str("<div class=\"node-body\">\n");
    if !node.description.is_empty() {
        out.push_str(&format!(
            "<p class=\"description\">{}</p>\n",
            escape_html(&node.description)
        ));
    }
    if let NodeDetail::Component(component) = &node.detail {
        if !component.appears_on.is_empty() {
            let pages: Vec<_> = component
                .appears_on
                .iter()
                .map(|id| escape_html(graph.name_of(id)))
                .collect();
            out.push_str(&format!("<p class=\"appears-on\">Appears on: {}</p>\n", pages.join(", ")));
        }
    }

    if !node.elements.is_empty() {
        out.push_str("<h4>Elements</h4>\n<ul class=\"elements\">\n");
        for element in &node.elements {
            out.push_str(&format!(
                "<li><strong>{}</strong> {}",
                escape_html(&element.element_type),
                escape_html(&element.description)
            ));
            if let Some(selector) = &element.selector {
                out.push_str(&format!(" <code>{}</code>", escape_html(selector)));
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ul>\n");
    }

    let mut edges = graph.outgoing(&node.id).peekable();
    if edges.peek().is_some() {
        out.push_str("<h4>Connections</h4>\n<ul class=\"edges\">\n");
        for edge in edges {
            out.push_str(&format!(
                "<li class=\"edge-{}\">&rarr; {}",
                edge.kind,
                escape_html(graph.name_of(&edge.to))
            ));
            if !edge.trigger.is_empty() {
                out.push_str(&format!(" <em>({})</em>", escape_html(&edge.trigger)));
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</div>\n</div>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_tree, fixtures, load_str, NodeKind, SourceFormat};

    fn counter(html: &str, id: &str) -> usize {
        let marker = format!("id=\"{}\">", id);
        let start = html.find(&marker).unwrap() + marker.len();
        let end = start + html[start..].find('<').unwrap();
        html[start..end].parse().unwrap()
    }

    #[test]
    fn test_counters_match_graph() {
        let graph = fixtures::storefront();
        let tree = build_tree(&graph, None).unwrap();
        let html = render_interactive_map(&graph, &tree);

        assert_eq!(counter(&html, "page-count"), graph.nodes_of_kind(NodeKind::Page).count());
        assert_eq!(
            counter(&html, "component-count"),
            graph.nodes_of_kind(NodeKind::Component).count()
        );
        assert_eq!(counter(&html, "edge-count"), graph.edges().len());
        assert_eq!(counter(&html, "protected-count"), 2);
    }

    #[test]
    fn test_pages_follow_tree_order_then_rest() {
        let json = r#"{
          "nodes": [
            { "id": "orphan", "kind": "page", "name": "Orphan", "route": "/orphan", "requiresAuth": true },
            { "id": "home", "kind": "page", "name": "Home", "route": "/", "userFlow": { "entryPoint": true } },
            { "id": "about", "kind": "page", "name": "About", "route": "/about" }
          ],
          "edges": [ { "from": "home", "to": "about", "kind": "navigation", "trigger": "click_about" } ]
        }"#;
        let graph = load_str(json, SourceFormat::Json).unwrap();
        let tree = build_tree(&graph, None).unwrap();
        let html = render_interactive_map(&graph, &tree);

        let home = html.find("data-id=\"home\"").unwrap();
        let about = html.find("data-id=\"about\"").unwrap();
        let orphan = html.find("data-id=\"orphan\"").unwrap();
        assert!(home < about && about < orphan);
        assert_eq!(counter(&html, "protected-count"), 1);
    }

    #[test]
    fn test_records_show_badges_and_edges() {
        let graph = fixtures::storefront();
        let tree = build_tree(&graph, None).unwrap();
        let html = render_interactive_map(&graph, &tree);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(
            "<span class=\"node-name\">Checkout</span><code class=\"route\">/checkout</code>\
             <span class=\"badge badge-page\">page</span><span class=\"badge badge-auth\">auth required</span>"
        ));
        assert!(html.contains("<li class=\"edge-navigation\">&rarr; Products <em>(click_shop_now)</em></li>"));
        assert!(html.contains("<li class=\"edge-interaction\">&rarr; Cart <em>(click_cart_icon)</em></li>"));
        assert!(html.contains("<code>button[type=submit]</code>"));
        assert!(html.contains("function setAll(open)"));
    }

    #[test]
    fn test_values_are_escaped() {
        let json = r#"{
          "metadata": { "name": "<script>alert(1)</script>" },
          "nodes": [ { "id": "p", "kind": "page", "name": "Tom & Jerry", "route": "/" } ]
        }"#;
        let graph = load_str(json, SourceFormat::Json).unwrap();
        let tree = build_tree(&graph, None).unwrap();
        let html = render_interactive_map(&graph, &tree);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("Tom &amp; Jerry"));
    }
}
