use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sitebrief::graph::{self, Graph, NodeKind};
use sitebrief::render::{render_tree_text, RenderContext};
use sitebrief::{write_artifacts, Config, NarrativeOptions, TreeCache, ViewRegistry};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sitebrief")]
#[command(version)]
#[command(about = "Turn a site graph into agent-ready context documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write every view, the graph passthrough and a manifest to the output directory
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory (defaults to output_dir from sitebrief.toml)
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        sections: SectionArgs,
    },
    /// Load and validate the graph, then report its shape
    Validate {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the navigation tree
    Tree {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print a single view to stdout
    Render {
        /// View name (narrative, digest, tree, flowchart, dot, map)
        view: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        sections: SectionArgs,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Site graph file, JSON or YAML (defaults to graph_path from sitebrief.toml)
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Page id to root the navigation tree at
    #[arg(short, long)]
    root: Option<String>,
}

#[derive(Args, Debug)]
struct SectionArgs {
    /// Omit the authentication section from the narrative
    #[arg(long)]
    no_auth: bool,

    /// Omit the components section from the narrative
    #[arg(long)]
    no_components: bool,

    /// Omit the common patterns section from the narrative
    #[arg(long)]
    no_flows: bool,
}

impl SectionArgs {
    /// Flags can only switch sections off; config decides the rest.
    fn apply(&self, mut options: NarrativeOptions) -> NarrativeOptions {
        options.include_auth &= !self.no_auth;
        options.include_components &= !self.no_components;
        options.include_flows &= !self.no_flows;
        options
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.log_level()),
    )
    .init();

    let cache = TreeCache::new(config.cache.tree_capacity);

    match cli.command {
        Command::Generate { source, out, sections } => {
            let graph = load_graph(&config, &source)?;
            let tree = cache.get_or_build(&graph, source.root.as_deref())?;
            let registry = ViewRegistry::with_options(sections.apply(config.narrative_options()));
            let out_dir = out.unwrap_or_else(|| config.output_dir().to_path_buf());

            let manifest = write_artifacts(&graph, &tree, &registry, &out_dir)
                .with_context(|| format!("Failed to write artifacts to {}", out_dir.display()))?;

            println!("Generated context for {} in {}", manifest.site, out_dir.display());
            for entry in &manifest.artifacts {
                println!("  {:<22} {:>8} bytes  {}", entry.file, entry.bytes, &entry.sha256[..12]);
            }
        }
        Command::Validate { source } => {
            let graph = load_graph(&config, &source)?;
            let tree = cache.get_or_build(&graph, source.root.as_deref())?;

            println!("Graph is valid: {}", graph.metadata().name);
            println!("  Pages:       {}", graph.nodes_of_kind(NodeKind::Page).count());
            println!("  Components:  {}", graph.nodes_of_kind(NodeKind::Component).count());
            println!("  Edges:       {}", graph.edge_count());
            println!("  Protected:   {}", graph.protected_page_count());
            println!("  Root:        {}", tree.root().id);
            println!("  Reachable:   {}", tree.len());
            for pruned in tree.pruned_edges() {
                println!("  Pruned edge: {} -> {} ({})", pruned.from, pruned.to, pruned.trigger);
            }
        }
        Command::Tree { source } => {
            let graph = load_graph(&config, &source)?;
            let tree = cache.get_or_build(&graph, source.root.as_deref())?;
            print!("{}", render_tree_text(&graph, &tree));
        }
        Command::Render { view, source, sections } => {
            let registry = ViewRegistry::with_options(sections.apply(config.narrative_options()));
            let Some(renderer) = registry.find(&view) else {
                anyhow::bail!(
                    "Unknown view '{}'. Available views: {}",
                    view,
                    registry.names().join(", ")
                );
            };

            let graph = load_graph(&config, &source)?;
            let tree = cache.get_or_build(&graph, source.root.as_deref())?;
            print!("{}", renderer.render(&RenderContext { graph: &graph, tree: &tree }));
        }
    }

    Ok(())
}

fn load_graph(config: &Config, source: &SourceArgs) -> Result<Graph> {
    let path = source
        .graph
        .clone()
        .unwrap_or_else(|| config.graph_path().to_path_buf());
    graph::load(&path).with_context(|| format!("Failed to load site graph from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_section_flags_switch_sections_off() {
        let cli = Cli::try_parse_from(["sitebrief", "render", "narrative", "--no-flows"]).unwrap();
        let Command::Render { sections, .. } = cli.command else {
            panic!("expected render command");
        };
        let options = sections.apply(NarrativeOptions::default());
        assert!(options.include_auth);
        assert!(options.include_components);
        assert!(!options.include_flows);
    }

    #[test]
    fn test_no_flows_help_names_common_patterns() {
        let mut cmd = Cli::command();
        let render = cmd.find_subcommand_mut("render").unwrap();
        let arg = render
            .get_arguments()
            .find(|arg| arg.get_id() == "no_flows")
            .unwrap();
        let help = arg.get_help().unwrap().to_string();
        assert!(help.contains("common patterns"), "unexpected help: {}", help);
    }
}
