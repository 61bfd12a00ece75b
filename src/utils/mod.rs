use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::builders::hooks::{self, BUILD_PROGRAM_TARGET, BuildHooks, HookPoint};
use crate::builders::reporter::{ConsoleReporter, FixReporter};
use crate::builders::rules::RuleSet;
use crate::builders::validator::{RuleValidator, Severity, StandardValidator};
use crate::core::config::{ConfigManager, ConfigProvider, FixConfig};
use crate::core::engine::CompatEngine;

/// Which build lifecycle point a `run` invocation stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Stage {
    /// Build configuration has just been loaded.
    Load,
    /// Right before the program is built.
    PreBuild,
}

impl Stage {
    pub fn hook_point(self) -> HookPoint {
        match self {
            Stage::Load => HookPoint::ScriptLoad,
            Stage::PreBuild => HookPoint::PreAction(BUILD_PROGRAM_TARGET.to_string()),
        }
    }
}

/// Options shared by every command.
#[derive(Debug, Default, Clone)]
pub struct Options {
    pub project: Option<PathBuf>,
    pub root: Option<PathBuf>,
}

impl Options {
    fn config_manager(&self) -> Result<ConfigManager> {
        match &self.project {
            Some(project) => Ok(ConfigManager::new_at(project.clone())),
            None => ConfigManager::new(),
        }
    }

    /// Loads the config; a `--root` override wins and, like the config file's
    /// `root`, is resolved against the project root when relative.
    fn fix_config(&self) -> Result<FixConfig> {
        let config_manager = self.config_manager()?;
        let mut config = config_manager.resolved_config()?;
        if let Some(root) = &self.root {
            config.root = config_manager.get_project_root().join(root);
        }
        Ok(config)
    }
}

pub fn initialize_project(opts: &Options) -> Result<()> {
    let config_manager = opts.config_manager()?;
    if config_manager.initialize()? {
        println!("✓ Wrote {}", config_manager.get_config_path().display());
    } else {
        println!("ℹ️  {} already exists", config_manager.get_config_path().display());
    }
    println!("Run 'lvgl-compat-fix install-hook' to run the fixes on every build");
    Ok(())
}

pub fn install_hook(opts: &Options) -> Result<()> {
    let config_manager = opts.config_manager()?;
    if hooks::install_build_hook(config_manager.get_project_root())? {
        println!("✓ Installed {}", hooks::EXTRA_SCRIPT_NAME);
        println!(
            "Add 'extra_scripts = pre:{}' to platformio.ini to enable it",
            hooks::EXTRA_SCRIPT_NAME
        );
    }
    Ok(())
}

/// Fires the rewriter the way the build system would at `stage`.
pub fn run_stage(opts: &Options, stage: Stage) -> Result<Vec<PathBuf>> {
    let engine = CompatEngine::new(opts.fix_config()?)?;
    let reporter = ConsoleReporter::new();

    let mut build_hooks = BuildHooks::new();
    hooks::register_compat_fixes(&mut build_hooks, &engine, &reporter);

    Ok(build_hooks.fire(&stage.hook_point()))
}

/// Lists files that still need fixes; fails if there are any.
pub fn check(opts: &Options) -> Result<()> {
    let engine = CompatEngine::new(opts.fix_config()?)?;
    let pending = engine.pending_fixes();
    ConsoleReporter::new().report_pending(&pending);

    if !pending.is_empty() {
        anyhow::bail!("{} files need LVGL compatibility fixes", pending.len());
    }
    Ok(())
}

pub fn validate(opts: &Options) -> Result<()> {
    let config = opts.fix_config()?;
    let issues = StandardValidator::new().validate(&config);

    if issues.is_empty() {
        println!("✓ Configuration and rule set are valid.");
        return Ok(());
    }

    println!("⚠️  Found issues in configuration:");
    for issue in &issues {
        println!("  - {issue}");
    }

    if issues.iter().any(|i| i.severity == Severity::Error) {
        anyhow::bail!("Configuration validation failed.");
    }
    Ok(())
}

/// Renders the built-in rule set as `toml`, `json` or `yaml`.
pub fn export_rules(format: &str) -> Result<String> {
    let rules = RuleSet::lvgl_v9_to_v8();

    let content = match format {
        "json" => serde_json::to_string_pretty(&rules).context("Failed to serialize to JSON")?,
        "yaml" => serde_yaml::to_string(&rules).context("Failed to serialize to YAML")?,
        "toml" => toml::to_string_pretty(&rules).context("Failed to serialize to TOML")?,
        other => anyhow::bail!("Unsupported format: {other}"),
    };
    Ok(content)
}
