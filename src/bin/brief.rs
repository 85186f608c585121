use anyhow::{Context, Result};
use clap::Parser;
use sitebrief::{graph, render_task_briefing, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "brief")]
#[command(about = "Print a task-scoped briefing for a single agent task")]
struct Args {
    /// Task description, e.g. "add a product to the cart"
    #[arg(short, long)]
    task: String,

    /// Site graph file, JSON or YAML (defaults to graph_path from sitebrief.toml)
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Write the briefing to a file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load_or_default()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.log_level()),
    )
    .init();

    let path = args.graph.unwrap_or_else(|| config.graph_path().to_path_buf());
    let graph = graph::load(&path)
        .with_context(|| format!("Failed to load site graph from {}", path.display()))?;

    let briefing = render_task_briefing(&graph, &args.task)?;

    match args.out {
        Some(out) => {
            std::fs::write(&out, &briefing)
                .with_context(|| format!("Failed to write briefing to {}", out.display()))?;
            log::info!("Briefing written to {}", out.display());
        }
        None => print!("{}", briefing),
    }
    Ok(())
}
