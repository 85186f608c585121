pub mod artifacts;
pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod render;

pub use artifacts::{write_artifacts, ArtifactEntry, Manifest};
pub use cache::TreeCache;
pub use config::Config;
pub use error::{Result, SitebriefError, ValidationError};
pub use graph::{build_tree, load, load_str, match_task, Graph, NavigationTree, SourceFormat};
pub use render::{render_task_briefing, NarrativeOptions, RenderContext, View, ViewRegistry};
