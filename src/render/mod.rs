//! View renderers: every artifact derived from a validated graph.
//!
//! Renderers are pure functions of their inputs. Given the same graph and
//! navigation tree they produce byte-identical text, and none of them can
//! fail on a graph that passed validation.

pub mod briefing;
pub mod diagram;
pub mod digest;
pub mod interactive;
pub mod narrative;
pub mod tree_text;

pub use briefing::render_task_briefing;
pub use diagram::{render_dot, render_flowchart, DotView, FlowchartView};
pub use digest::{render_digest, DigestView};
pub use interactive::{render_interactive_map, InteractiveMapView};
pub use narrative::{render_narrative, NarrativeOptions, NarrativeView};
pub use tree_text::{render_tree_text, TreeTextView};

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::graph::{Element, Graph, NavigationTree};

/// Inputs shared by every registered view.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub graph: &'a Graph,
    pub tree: &'a NavigationTree,
}

/// A renderer that can be written out as a standalone artifact.
pub trait View: Send + Sync {
    /// Short name used on the command line and in the manifest
    fn name(&self) -> &'static str;

    /// File name of the artifact inside the output directory
    fn file_name(&self) -> &'static str;

    /// Render the artifact text
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

/// Ordered set of views written by `generate`
pub struct ViewRegistry {
    views: Vec<Box<dyn View>>,
}

impl ViewRegistry {
    /// Create a registry with every built-in view and default options
    pub fn new() -> Self {
        Self::with_options(NarrativeOptions::default())
    }

    /// Create a registry with every built-in view
    pub fn with_options(narrative: NarrativeOptions) -> Self {
        let mut registry = Self { views: Vec::new() };

        registry.register(Box::new(NarrativeView::new(narrative)));
        registry.register(Box::new(DigestView));
        registry.register(Box::new(TreeTextView));
        registry.register(Box::new(FlowchartView));
        registry.register(Box::new(DotView));
        registry.register(Box::new(InteractiveMapView));

        registry
    }

    /// Register a view
    pub fn register(&mut self, view: Box<dyn View>) {
        self.views.push(view);
    }

    /// Find a view by name
    pub fn find(&self, name: &str) -> Option<&dyn View> {
        self.views
            .iter()
            .find(|v| v.name() == name)
            .map(|v| v.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn View> {
        self.views.iter().map(|v| v.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.views.iter().map(|v| v.name()).collect()
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn control_chars() -> &'static Regex {
    static CONTROL: OnceLock<Regex> = OnceLock::new();
    CONTROL.get_or_init(|| {
        Regex::new(r"[\x00-\x1F\x7F-\x9F]+").expect("control character pattern is valid")
    })
}

/// Replace control characters (newlines included) inside a single value
/// with a space, so interpolated text can never break the line structure of
/// a briefing.
pub fn sanitize_text(value: &str) -> Cow<'_, str> {
    control_chars().replace_all(value, " ")
}

/// Escape a value for HTML text and attribute positions.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in sanitize_text(value).chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One-line description of an element: `type: description (selector: ..., ...)`.
pub(crate) fn describe_element(element: &Element) -> String {
    let mut line = String::new();
    if !element.element_type.is_empty() {
        line.push_str(&format!("{}: ", sanitize_text(&element.element_type)));
    }
    line.push_str(&sanitize_text(&element.description));

    let mut details = Vec::new();
    if let Some(selector) = &element.selector {
        details.push(format!("selector: {}", sanitize_text(selector)));
    }
    if let Some(placeholder) = &element.placeholder {
        details.push(format!("placeholder: \"{}\"", sanitize_text(placeholder)));
    }
    if let Some(text) = &element.text {
        details.push(format!("text: \"{}\"", sanitize_text(text)));
    }
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }
    line
}

/// `1 element`, `3 elements`.
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
