//! Full prose briefing of the site, the primary agent context document.

use super::{describe_element, sanitize_text, RenderContext, View};
use crate::graph::{EdgeKind, Graph, Node, Page};

/// Optional sections of the narrative briefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrativeOptions {
    pub include_auth: bool,
    pub include_components: bool,
    pub include_flows: bool,
}

impl Default for NarrativeOptions {
    fn default() -> Self {
        Self {
            include_auth: true,
            include_components: true,
            include_flows: true,
        }
    }
}

pub struct NarrativeView {
    options: NarrativeOptions,
}

impl NarrativeView {
    pub fn new(options: NarrativeOptions) -> Self {
        Self { options }
    }
}

impl View for NarrativeView {
    fn name(&self) -> &'static str {
        "narrative"
    }

    fn file_name(&self) -> &'static str {
        "context.md"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        render_narrative(ctx.graph, self.options)
    }
}

/// Render the narrative briefing.
///
/// Section order is fixed: header, pages, components, navigation flow,
/// authentication, common patterns. Disabled or empty sections are skipped.
pub fn render_narrative(graph: &Graph, options: NarrativeOptions) -> String {
    let mut sections = vec![header_section(graph), pages_section(graph)];

    if options.include_components && graph.components().next().is_some() {
        sections.push(components_section(graph));
    }
    if let Some(flow) = navigation_section(graph) {
        sections.push(flow);
    }
    if options.include_auth {
        if let Some(auth) = auth_section(graph) {
            sections.push(auth);
        }
    }
    if options.include_flows && !graph.common_patterns().is_empty() {
        sections.push(patterns_section(graph));
    }

    let mut out = sections.join("\n");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn header_section(graph: &Graph) -> String {
    let meta = graph.metadata();
    let mut out = format!("# Site Context: {}\n", sanitize_text(&meta.name));
    if !meta.base_url.is_empty() {
        out.push_str(&format!("Base URL: {}\n", sanitize_text(&meta.base_url)));
    }
    if !meta.version.is_empty() {
        out.push_str(&format!("Version: {}\n", sanitize_text(&meta.version)));
    }
    out.push_str(&format!(
        "\nThis site has {} and {} connected by {}.\n",
        super::plural(graph.pages().count(), "page"),
        super::plural(graph.components().count(), "component"),
        super::plural(graph.edge_count(), "edge"),
    ));
    out
}

fn pages_section(graph: &Graph) -> String {
    let mut out = String::from("## Pages\n");
    for (node, page) in graph.pages() {
        out.push('\n');
        out.push_str(&page_block(node, page));
    }
    out
}

fn page_block(node: &Node, page: &Page) -> String {
    let mut out = format!(
        "### {} ({})\n",
        sanitize_text(&node.name),
        sanitize_text(&page.route)
    );
    out.push_str(&format!("Page ID: {}\n", sanitize_text(&node.id)));
    if !node.description.is_empty() {
        out.push_str(&format!("Description: {}\n", sanitize_text(&node.description)));
    }
    out.push_str(&format!(
        "Requires authentication: {}\n",
        if page.requires_auth { "Yes" } else { "No" }
    ));
    if page.is_entry_point() {
        out.push_str("Entry point: Yes\n");
    }

    push_elements(&mut out, node);

    if !page.products.is_empty() {
        out.push_str(&format!(
            "Products: {} ({})\n",
            page.products.len(),
            category_summary(page)
        ));
    }

    if let Some(flow) = &page.user_flow {
        if !flow.actions.is_empty() {
            out.push_str("Available actions:\n");
            for action in &flow.actions {
                out.push_str(&format!("- {}\n", sanitize_text(action)));
            }
        }
        if !flow.next_steps.is_empty() {
            let steps: Vec<_> = flow.next_steps.iter().map(|s| sanitize_text(s)).collect();
            out.push_str(&format!("Next steps: {}\n", steps.join(", ")));
        }
    }
    out
}

/// `electronics: 2, apparel: 1`, categories in first-appearance order.
fn category_summary(page: &Page) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for product in &page.products {
        match counts.iter_mut().find(|(name, _)| *name == product.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((product.category.as_str(), 1)),
        }
    }
    counts
        .iter()
        .map(|(name, count)| {
            let name = if name.is_empty() { "uncategorized" } else { *name };
            format!("{}: {}", sanitize_text(name), count)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_elements(out: &mut String, node: &Node) {
    if node.elements.is_empty() {
        return;
    }
    out.push_str("Interactive elements:\n");
    for element in &node.elements {
        out.push_str(&format!("- {}\n", describe_element(element)));
    }
}

fn components_section(graph: &Graph) -> String {
    let mut out = String::from("## Components\n");
    for (node, component) in graph.components() {
        out.push_str(&format!("\n### {}\n", sanitize_text(&node.name)));
        out.push_str(&format!("Component ID: {}\n", sanitize_text(&node.id)));
        if !node.description.is_empty() {
            out.push_str(&format!("Description: {}\n", sanitize_text(&node.description)));
        }
        if let Some(position) = &component.position {
            out.push_str(&format!("Position: {}\n", sanitize_text(position)));
        }
        if !component.appears_on.is_empty() {
            let routes: Vec<_> = component
                .appears_on
                .iter()
                .map(|id| sanitize_text(graph.route_or_name(id)))
                .collect();
            out.push_str(&format!("Appears on: {}\n", routes.join(", ")));
        }
        push_elements(&mut out, node);
    }
    out
}

/// Outgoing navigation edges grouped by source, sources in node order.
fn navigation_section(graph: &Graph) -> Option<String> {
    let mut groups = Vec::new();
    for node in graph.nodes() {
        let mut edges = graph.edges_from(&node.id, EdgeKind::Navigation).peekable();
        if edges.peek().is_none() {
            continue;
        }

        let mut group = match node.route() {
            Some(route) => format!(
                "From {} ({}):\n",
                sanitize_text(&node.name),
                sanitize_text(route)
            ),
            None => format!("From {}:\n", sanitize_text(&node.name)),
        };
        for edge in edges {
            let mut line = format!("- {}", sanitize_text(graph.route_or_name(&edge.to)));
            if !edge.description.is_empty() {
                line.push_str(&format!(": {}", sanitize_text(&edge.description)));
            }
            if !edge.trigger.is_empty() {
                line.push_str(&format!(" [{}]", sanitize_text(&edge.trigger)));
            }
            group.push_str(&line);
            group.push('\n');
        }
        groups.push(group);
    }

    if groups.is_empty() {
        return None;
    }
    Some(format!("## Navigation Flow\n\n{}", groups.join("\n")))
}

fn auth_section(graph: &Graph) -> Option<String> {
    let auth = graph.authentication()?;
    let mut out = String::from("## Authentication\n");
    out.push_str(&format!(
        "Authentication required: {}\n",
        if auth.required { "Yes" } else { "No" }
    ));

    let describe = |ids: &[String]| {
        ids.iter()
            .map(|id| {
                format!(
                    "{} ({})",
                    sanitize_text(id),
                    sanitize_text(graph.route_or_name(id))
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    if !auth.public_pages.is_empty() {
        out.push_str(&format!("Public pages: {}\n", describe(&auth.public_pages)));
    }
    if !auth.protected_pages.is_empty() {
        out.push_str(&format!("Protected pages: {}\n", describe(&auth.protected_pages)));
    }
    if let Some(creds) = &auth.default_credentials {
        out.push_str("Default credentials:\n");
        out.push_str(&format!("- Username: {}\n", sanitize_text(&creds.username)));
        out.push_str(&format!("- Password: {}\n", sanitize_text(&creds.password)));
    }
    Some(out)
}

fn patterns_section(graph: &Graph) -> String {
    let mut out = String::from("## Common Patterns\n");
    for pattern in graph.common_patterns() {
        out.push_str(&format!("\n### {}\n", sanitize_text(&pattern.name)));
        for (pos, step) in pattern.steps.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", pos + 1, sanitize_text(step)));
        }
    }
    out
}
