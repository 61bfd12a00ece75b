use crate::builders::reporter::FixReporter;
use crate::builders::rules::{CompiledRule, apply_rules};
use crate::core::config::FixConfig;
use crate::core::error::FileError;
use anyhow::Result;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads and writes the candidate files found under the source root.
pub trait SourceStore {
    /// Reads the whole file as raw bytes.
    fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>>;

    /// Replaces the file's content.
    fn write_file(&self, path: &Path, content: &str) -> std::io::Result<()>;
}

/// `SourceStore` backed by the local filesystem.
pub struct DiskStore;

impl SourceStore for DiskStore {
    fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> std::io::Result<()> {
        fs::write(path, content)
    }
}

/// Applies the compatibility rule set to every candidate file under a root.
///
/// Rules are compiled once in [`CompatEngine::new`]; every later operation is
/// infallible. Per-file failures are logged and skipped.
pub struct CompatEngine {
    config: FixConfig,
    rules: Vec<CompiledRule>,
    store: Box<dyn SourceStore>,
}

impl CompatEngine {
    pub fn new(config: FixConfig) -> Result<Self> {
        Self::with_store(config, Box::new(DiskStore))
    }

    pub fn with_store(config: FixConfig, store: Box<dyn SourceStore>) -> Result<Self> {
        let rules = config.rules.compile()?;
        Ok(Self {
            config,
            rules,
            store,
        })
    }

    /// Rewrites every candidate file whose content changes under the rule set
    /// and returns their paths in traversal order.
    pub fn apply_fixes(&self, reporter: &dyn FixReporter) -> Vec<PathBuf> {
        let modified = self.scan(true);
        reporter.report_summary(&modified);
        modified
    }

    /// Same scan as [`apply_fixes`](Self::apply_fixes) without writing anything.
    pub fn pending_fixes(&self) -> Vec<PathBuf> {
        self.scan(false)
    }

    /// Runs `content` through the rule set.
    pub fn fix_content<'a>(&self, content: &'a str) -> Cow<'a, str> {
        apply_rules(&self.rules, content)
    }

    fn scan(&self, write: bool) -> Vec<PathBuf> {
        let mut changed = Vec::new();

        for path in self.candidate_files() {
            match self.process_file(&path, write) {
                Ok(true) => changed.push(path),
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(path = %e.path().display(), "Error processing file: {e}");
                }
            }
        }

        changed
    }

    /// Lists candidate files under the root, sorted per directory by name.
    ///
    /// A missing root yields an empty list.
    fn candidate_files(&self) -> Vec<PathBuf> {
        let root = &self.config.root;
        if !root.is_dir() {
            tracing::debug!("source root {} is not a directory, nothing to scan", root.display());
            return Vec::new();
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {e}", root.display());
                    continue;
                }
            };

            if !entry.path().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if self.config.is_candidate(&name) {
                files.push(entry.into_path());
            }
        }

        files
    }

    /// Applies the rules to one file. Returns whether its content changed.
    fn process_file(&self, path: &Path, write: bool) -> Result<bool, FileError> {
        let bytes = self.store.read_file(path).map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let original = String::from_utf8(bytes).map_err(|source| FileError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let fixed = self.fix_content(&original);
        if fixed == original.as_str() {
            tracing::debug!(path = %path.display(), "already compatible");
            return Ok(false);
        }

        if write {
            self.store.write_file(path, &fixed).map_err(|source| FileError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "rewrote file");
        }

        Ok(true)
    }
}
