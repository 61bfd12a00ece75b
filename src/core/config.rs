use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builders::rules::RuleSet;

pub const CONFIG_FILE_NAME: &str = "lvgl-compat.toml";
pub const PROJECT_MARKER: &str = "platformio.ini";
pub const DEFAULT_ROOT: &str = "src/ui";

/// Everything one rewriter run needs.
///
/// `root` and `extensions` come from `lvgl-compat.toml` (or defaults); the
/// rule set is built in and never read from disk.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FixConfig {
    pub version: String,
    /// Directory scanned for sources, relative to the project root unless absolute.
    pub root: PathBuf,
    /// Recognized file extensions, without the leading dot.
    pub extensions: Vec<String>,
    #[serde(skip)]
    pub rules: RuleSet,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            root: PathBuf::from(DEFAULT_ROOT),
            extensions: vec!["c".to_string(), "h".to_string()],
            rules: RuleSet::default(),
        }
    }
}

impl FixConfig {
    /// A default config scanning `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if `file_name` ends in one of the recognized extensions.
    pub fn is_candidate(&self, file_name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| file_name.ends_with(&format!(".{ext}")))
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
    project_root: PathBuf,
}

impl ConfigManager {
    /// Locates the project root from the current directory.
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to read current directory")?;
        Ok(Self::new_at(find_project_root(&current_dir)))
    }

    pub fn new_at(project_root: PathBuf) -> Self {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        Self {
            config_path,
            project_root,
        }
    }

    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }

        self.save_config(&FixConfig::default())?;
        Ok(true)
    }

    /// Loads the config and resolves `root` against the project root.
    pub fn resolved_config(&self) -> Result<FixConfig> {
        let mut config = self.load_config()?;
        if config.root.is_relative() {
            config.root = self.project_root.join(&config.root);
        }
        Ok(config)
    }

    pub fn get_project_root(&self) -> &Path {
        &self.project_root
    }
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<FixConfig>;
    fn save_config(&self, config: &FixConfig) -> Result<()>;
    fn get_config_path(&self) -> &Path;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<FixConfig> {
        if !self.config_path.exists() {
            return Ok(FixConfig::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    fn save_config(&self, config: &FixConfig) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Walks up from `start` looking for `platformio.ini`; falls back to `start`.
fn find_project_root(start: &Path) -> PathBuf {
    let mut dir = start;

    loop {
        if dir.join(PROJECT_MARKER).exists() {
            return dir.to_path_buf();
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => {
                tracing::debug!(
                    "no {PROJECT_MARKER} above {}, using it as project root",
                    start.display()
                );
                return start.to_path_buf();
            }
        }
    }
}
