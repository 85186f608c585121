//! Write every rendered view, the graph passthrough and a manifest to disk.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::Result;
use crate::graph::{Graph, NavigationTree};
use crate::render::{RenderContext, ViewRegistry};

/// File name of the structural passthrough of the validated graph.
pub const GRAPH_FILE: &str = "site-graph.json";
/// File name of the manifest written last.
pub const MANIFEST_FILE: &str = "manifest.json";

/// One written artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactEntry {
    pub view: String,
    pub file: String,
    pub bytes: usize,
    pub sha256: String,
}

/// Summary of a generation run, written as `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub site: String,
    pub base_url: String,
    pub version: String,
    pub root: String,
    pub artifacts: Vec<ArtifactEntry>,
}

/// Hex SHA-256 of a byte slice
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Render every registered view into `out_dir`.
///
/// The directory is created if missing; existing artifact files are
/// overwritten. Output is deterministic for a given graph and tree.
pub fn write_artifacts(
    graph: &Graph,
    tree: &NavigationTree,
    registry: &ViewRegistry,
    out_dir: &Path,
) -> Result<Manifest> {
    std::fs::create_dir_all(out_dir)?;

    let ctx = RenderContext { graph, tree };
    let mut artifacts = Vec::new();

    for view in registry.iter() {
        let text = view.render(&ctx);
        artifacts.push(write_file(out_dir, view.name(), view.file_name(), text.as_bytes())?);
    }

    let mut passthrough = serde_json::to_string_pretty(graph)?;
    passthrough.push('\n');
    artifacts.push(write_file(out_dir, "graph", GRAPH_FILE, passthrough.as_bytes())?);

    let meta = graph.metadata();
    let manifest = Manifest {
        site: meta.name.clone(),
        base_url: meta.base_url.clone(),
        version: meta.version.clone(),
        root: tree.root().id.clone(),
        artifacts,
    };

    let mut manifest_json = serde_json::to_string_pretty(&manifest)?;
    manifest_json.push('\n');
    std::fs::write(out_dir.join(MANIFEST_FILE), manifest_json)?;

    log::info!(
        "Wrote {} artifacts for '{}' to {}",
        manifest.artifacts.len(),
        manifest.site,
        out_dir.display()
    );
    Ok(manifest)
}

fn write_file(out_dir: &Path, view: &str, file: &str, bytes: &[u8]) -> Result<ArtifactEntry> {
    std::fs::write(out_dir.join(file), bytes)?;
    log::debug!("wrote {} ({} bytes)", file, bytes.len());
    Ok(ArtifactEntry {
        view: view.to_string(),
        file: file.to_string(),
        bytes: bytes.len(),
        sha256: content_hash(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_tree, fixtures, load};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writes_every_artifact() {
        let graph = fixtures::storefront();
        let tree = build_tree(&graph, None).unwrap();
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("context");

        let manifest = write_artifacts(&graph, &tree, &ViewRegistry::new(), &out_dir).unwrap();

        let files: Vec<_> = manifest.artifacts.iter().map(|a| a.file.as_str()).collect();
        assert_eq!(
            files,
            vec![
                "context.md",
                "digest.md",
                "navigation-tree.txt",
                "site-graph.mmd",
                "site-graph.dot",
                "site-map.html",
                "site-graph.json"
            ]
        );
        for entry in &manifest.artifacts {
            let bytes = fs::read(out_dir.join(&entry.file)).unwrap();
            assert_eq!(bytes.len(), entry.bytes);
            assert_eq!(content_hash(&bytes), entry.sha256);
        }
        assert_eq!(manifest.root, "home");
        assert!(out_dir.join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_passthrough_loads_back() {
        let graph = fixtures::storefront();
        let tree = build_tree(&graph, None).unwrap();
        let temp_dir = TempDir::new().unwrap();

        write_artifacts(&graph, &tree, &ViewRegistry::new(), temp_dir.path()).unwrap();
        let reloaded = load(temp_dir.path().join(GRAPH_FILE)).unwrap();
        assert_eq!(reloaded, graph);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let graph = fixtures::storefront();
        let tree = build_tree(&graph, None).unwrap();
        let first_dir = TempDir::new().unwrap();
        let second_dir = TempDir::new().unwrap();

        let first = write_artifacts(&graph, &tree, &ViewRegistry::new(), first_dir.path()).unwrap();
        let second = write_artifacts(&graph, &tree, &ViewRegistry::new(), second_dir.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            fs::read(first_dir.path().join(MANIFEST_FILE)).unwrap(),
            fs::read(second_dir.path().join(MANIFEST_FILE)).unwrap()
        );
    }

    #[test]
    fn test_content_hash_known_value() {
        assert_eq!(
            content_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
