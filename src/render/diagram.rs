//! Diagram encodings of the graph: a Mermaid flowchart and a Graphviz digraph.
//!
//! Both iterate nodes and edges in declaration order and share no state.

use super::{sanitize_text, RenderContext, View};
use crate::graph::{EdgeKind, Graph, NodeDetail};

pub struct FlowchartView;

impl View for FlowchartView {
    fn name(&self) -> &'static str {
        "flowchart"
    }

    fn file_name(&self) -> &'static str {
        "site-graph.mmd"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        render_flowchart(ctx.graph)
    }
}

pub struct DotView;

impl View for DotView {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn file_name(&self) -> &'static str {
        "site-graph.dot"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        render_dot(ctx.graph)
    }
}

const PUBLIC_FILL: &str = "#c8e6c9";
const PROTECTED_FILL: &str = "#ffcdd2";
const COMPONENT_FILL: &str = "#bbdefb";

/// Mermaid node ids. ASCII alphanumerics pass through, `_` becomes `__` and
/// every other byte becomes `_XX` (hex), so distinct ids never share an
/// encoding. The `n_` prefix keeps ids such as `end` clear of keywords.
fn mermaid_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 2);
    out.push_str("n_");
    for byte in id.bytes() {
        match byte {
            b'_' => out.push_str("__"),
            b if b.is_ascii_alphanumeric() => out.push(b as char),
            b => out.push_str(&format!("_{:02X}", b)),
        }
    }
    out
}

fn mermaid_label(value: &str) -> String {
    sanitize_text(value).replace('"', "#quot;")
}

pub fn render_flowchart(graph: &Graph) -> String {
    let mut out = String::from("flowchart TD\n");

    for node in graph.nodes() {
        let id = mermaid_id(&node.id);
        let line = match &node.detail {
            NodeDetail::Page(page) => {
                let label = format!("{}<br/>{}", mermaid_label(&node.name), mermaid_label(&page.route));
                if page.requires_auth {
                    format!("{}([\"{}\"])", id, label)
                } else {
                    format!("{}[\"{}\"]", id, label)
                }
            }
            NodeDetail::Component(_) => format!("{}{{{{\"{}\"}}}}", id, mermaid_label(&node.name)),
        };
        out.push_str(&format!("    {}\n", line));
    }

    if !graph.edges().is_empty() {
        out.push('\n');
    }
    for edge in graph.edges() {
        let arrow = match edge.kind {
            EdgeKind::Navigation => "-->",
            EdgeKind::Interaction => "-.->",
        };
        let label = if edge.trigger.is_empty() {
            String::new()
        } else {
            format!("|\"{}\"|", mermaid_label(&edge.trigger))
        };
        out.push_str(&format!(
            "    {} {}{} {}\n",
            mermaid_id(&edge.from),
            arrow,
            label,
            mermaid_id(&edge.to)
        ));
    }

    out.push('\n');
    out.push_str(&format!("    classDef publicPage fill:{},stroke:#2e7d32\n", PUBLIC_FILL));
    out.push_str(&format!("    classDef protectedPage fill:{},stroke:#c62828\n", PROTECTED_FILL));
    out.push_str(&format!("    classDef component fill:{},stroke:#1565c0\n", COMPONENT_FILL));

    for node in graph.nodes() {
        let class = match &node.detail {
            NodeDetail::Page(page) if page.requires_auth => "protectedPage",
            NodeDetail::Page(_) => "publicPage",
            NodeDetail::Component(_) => "component",
        };
        out.push_str(&format!("    class {} {}\n", mermaid_id(&node.id), class));
    }
    out
}

fn dot_escape(value: &str) -> String {
    sanitize_text(value).replace('\\', "\\\\").replace('"', "\\\"")
}

fn dot_quote(value: &str) -> String {
    format!("\"{}\"", dot_escape(value))
}

pub fn render_dot(graph: &Graph) -> String {
    let mut out = format!("digraph {} {{\n", dot_quote(&graph.metadata().name));
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box, style=\"rounded,filled\", fontname=\"Helvetica\"];\n");
    out.push_str("    edge [fontname=\"Helvetica\", fontsize=10];\n");

    if !graph.nodes().is_empty() {
        out.push('\n');
    }
    for node in graph.nodes() {
        let attrs = match &node.detail {
            NodeDetail::Page(page) => {
                let fill = if page.requires_auth { PROTECTED_FILL } else { PUBLIC_FILL };
                // `\n` is a line break inside a DOT label
                let label = format!(
                    "\"{}\\n{}\"",
                    dot_escape(&node.name),
                    dot_escape(&page.route)
                );
                format!("label={}, fillcolor=\"{}\"", label, fill)
            }
            NodeDetail::Component(_) => format!(
                "label={}, shape=component, fillcolor=\"{}\"",
                dot_quote(&node.name),
                COMPONENT_FILL
            ),
        };
        out.push_str(&format!("    {} [{}];\n", dot_quote(&node.id), attrs));
    }

    if !graph.edges().is_empty() {
        out.push('\n');
    }
    for edge in graph.edges() {
        let style = match edge.kind {
            EdgeKind::Navigation => "solid",
            EdgeKind::Interaction => "dashed",
        };
        out.push_str(&format!(
            "    {} -> {} [label={}, style={}];\n",
            dot_quote(&edge.from),
            dot_quote(&edge.to),
            dot_quote(&edge.trigger),
            style
        ));
    }

    out.push_str("}\n");
    out
}
