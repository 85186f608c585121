use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::render::NarrativeOptions;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SITEBRIEF_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "sitebrief.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sitebrief: SitebriefConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Input/output locations
#[derive(Debug, Clone, Deserialize)]
pub struct SitebriefConfig {
    #[serde(default = "default_graph_path")]
    pub graph_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SitebriefConfig {
    fn default() -> Self {
        Self {
            graph_path: default_graph_path(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Optional sections of the narrative briefing
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_true")]
    pub include_auth: bool,
    #[serde(default = "default_true")]
    pub include_components: bool,
    #[serde(default = "default_true")]
    pub include_flows: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            include_auth: true,
            include_components: true,
            include_flows: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_tree_capacity")]
    pub tree_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            tree_capacity: default_tree_capacity(),
        }
    }
}

fn default_graph_path() -> PathBuf {
    PathBuf::from("site-graph.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("context")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tree_capacity() -> usize {
    16
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in SITEBRIEF_CONFIG environment variable
    /// 2. ./sitebrief.toml in current directory
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();
        Self::load_from(&config_path())
    }

    /// Like [`Config::load`], but falls back to defaults when no config file
    /// exists and SITEBRIEF_CONFIG is unset. An explicitly named file must exist.
    pub fn load_or_default() -> Result<Self> {
        let _ = dotenv::dotenv();
        let explicit = std::env::var(CONFIG_ENV).is_ok();
        let path = config_path();
        if !explicit && !path.exists() {
            log::debug!("No {} found, using default configuration", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate a specific config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sitebrief.graph_path.as_os_str().is_empty() {
            anyhow::bail!("sitebrief.graph_path must not be empty");
        }
        if self.cache.tree_capacity == 0 {
            anyhow::bail!("cache.tree_capacity must be greater than 0");
        }
        Ok(())
    }

    pub fn graph_path(&self) -> &Path {
        &self.sitebrief.graph_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.sitebrief.output_dir
    }

    pub fn log_level(&self) -> &str {
        &self.sitebrief.log_level
    }

    pub fn narrative_options(&self) -> NarrativeOptions {
        NarrativeOptions {
            include_auth: self.render.include_auth,
            include_components: self.render.include_components,
            include_flows: self.render.include_flows,
        }
    }
}

fn config_path() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide cwd and env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const FULL_CONFIG: &str = r#"
[sitebrief]
graph_path = "graphs/shop.yaml"
output_dir = "out"
log_level = "debug"

[render]
include_auth = false
include_components = true
include_flows = false

[cache]
tree_capacity = 4
"#;

    /// Restores cwd when dropped (e.g. on panic).
    struct CwdGuard(PathBuf);
    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    fn with_config_env(config_path: Option<&Path>, f: impl FnOnce()) {
        let original = std::env::var(CONFIG_ENV).ok();
        match config_path {
            Some(path) => std::env::set_var(CONFIG_ENV, path),
            None => std::env::remove_var(CONFIG_ENV),
        }
        f();
        std::env::remove_var(CONFIG_ENV);
        if let Some(val) = original {
            std::env::set_var(CONFIG_ENV, val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, FULL_CONFIG).unwrap();

        with_config_env(Some(&config_path), || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.graph_path(), Path::new("graphs/shop.yaml"));
            assert_eq!(config.output_dir(), Path::new("out"));
            assert_eq!(config.log_level(), "debug");
            assert_eq!(config.cache.tree_capacity, 4);

            let options = config.narrative_options();
            assert!(!options.include_auth);
            assert!(options.include_components);
            assert!(!options.include_flows);
        });
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sitebrief.toml");
        fs::write(&config_path, "[sitebrief]\noutput_dir = \"briefs\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.graph_path(), Path::new("site-graph.json"));
        assert_eq!(config.output_dir(), Path::new("briefs"));
        assert_eq!(config.cache.tree_capacity, 16);
        assert_eq!(config.narrative_options(), NarrativeOptions::default());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sitebrief.toml");
        fs::write(&config_path, "[cache]\ntree_capacity = 0\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("tree_capacity"));
    }

    #[test]
    fn test_empty_graph_path_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sitebrief.toml");
        fs::write(&config_path, "[sitebrief]\ngraph_path = \"\"\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("graph_path"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let _cwd = CwdGuard(original_dir);
        std::env::set_current_dir(temp_dir.path()).unwrap();

        with_config_env(None, || {
            let config = Config::load_or_default().unwrap();
            assert_eq!(config.graph_path(), Path::new("site-graph.json"));
            assert_eq!(config.log_level(), "info");
        });
    }

    #[test]
    fn test_load_or_default_reads_cwd_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("sitebrief.toml"), FULL_CONFIG).unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let _cwd = CwdGuard(original_dir);
        std::env::set_current_dir(temp_dir.path()).unwrap();

        with_config_env(None, || {
            let config = Config::load_or_default().unwrap();
            assert_eq!(config.cache.tree_capacity, 4);
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nonexistent.toml");
        with_config_env(Some(&missing), || {
            assert!(Config::load().is_err());
            // an explicitly named file must exist
            assert!(Config::load_or_default().is_err());
        });
    }
}
