use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builders::reporter::FixReporter;
use crate::core::engine::CompatEngine;

/// PlatformIO target whose pre-action re-runs the fixes.
pub const BUILD_PROGRAM_TARGET: &str = "buildprog";

pub const EXTRA_SCRIPT_NAME: &str = "lvgl_compat_hook.py";

const HOOK_MARKER: &str = "LVGL Compat Fix";

const EXTRA_SCRIPT: &str = r#"# LVGL Compat Fix - PlatformIO extra script
#
# Add to platformio.ini:
#   extra_scripts = pre:lvgl_compat_hook.py
Import("env")
import shutil
import subprocess

TOOL = "lvgl-compat-fix"


def _run(stage):
    if shutil.which(TOOL) is None:
        print("Warning: %s not found in PATH" % TOOL)
        return
    subprocess.call([TOOL, "--project", env.subst("$PROJECT_DIR"), "run", "--stage", stage])


def _pre_build(source, target, env):
    _run("pre-build")


_run("load")
env.AddPreAction("buildprog", _pre_build)
"#;

/// Where in the build lifecycle a callback runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookPoint {
    /// When the build configuration is loaded, before any compiler runs.
    ScriptLoad,
    /// Immediately before the named build target.
    PreAction(String),
}

type HookFn<'a> = Box<dyn FnMut() -> Vec<PathBuf> + 'a>;

/// Callbacks registered against build lifecycle points.
///
/// Each callback returns the files it modified; [`BuildHooks::fire`]
/// concatenates them.
#[derive(Default)]
pub struct BuildHooks<'a> {
    hooks: Vec<(HookPoint, HookFn<'a>)>,
}

impl<'a> BuildHooks<'a> {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn on_script_load(&mut self, callback: impl FnMut() -> Vec<PathBuf> + 'a) {
        self.hooks.push((HookPoint::ScriptLoad, Box::new(callback)));
    }

    pub fn add_pre_action(
        &mut self,
        target: &str,
        callback: impl FnMut() -> Vec<PathBuf> + 'a,
    ) {
        self.hooks
            .push((HookPoint::PreAction(target.to_string()), Box::new(callback)));
    }

    /// Runs every callback registered for `point`, in registration order.
    pub fn fire(&mut self, point: &HookPoint) -> Vec<PathBuf> {
        let mut modified = Vec::new();
        for (registered, callback) in self.hooks.iter_mut() {
            if *registered == *point {
                modified.extend(callback());
            }
        }
        modified
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// Registers the rewriter at both call sites with the same engine.
///
/// The load hook prints the banner and rewrites immediately; the `buildprog`
/// pre-action rewrites again to cover files touched after configuration.
pub fn register_compat_fixes<'a>(
    hooks: &mut BuildHooks<'a>,
    engine: &'a CompatEngine,
    reporter: &'a dyn FixReporter,
) {
    hooks.on_script_load(move || {
        reporter.banner();
        engine.apply_fixes(reporter)
    });
    hooks.add_pre_action(BUILD_PROGRAM_TARGET, move || engine.apply_fixes(reporter));
}

/// Writes the PlatformIO extra script into `project_root`.
///
/// Returns `false` if our script was already there.
pub fn install_build_hook(project_root: &Path) -> Result<bool> {
    let script_path = project_root.join(EXTRA_SCRIPT_NAME);

    if script_path.exists() {
        let existing_content =
            fs::read_to_string(&script_path).context("Failed to read existing extra script")?;
        if existing_content.contains(HOOK_MARKER) {
            println!("ℹ️  {EXTRA_SCRIPT_NAME} already installed");
            return Ok(false);
        }

        let backup_path = free_backup_path(project_root);
        fs::rename(&script_path, &backup_path).context("Failed to back up existing script")?;
        println!(
            "ℹ️  Backed up existing {EXTRA_SCRIPT_NAME} to {}",
            backup_path.display()
        );
    }

    fs::write(&script_path, EXTRA_SCRIPT).context("Failed to write extra script")?;
    Ok(true)
}

/// `<script>.backup`, or `<script>.backup.N` if earlier backups are present.
fn free_backup_path(project_root: &Path) -> PathBuf {
    let first = project_root.join(format!("{EXTRA_SCRIPT_NAME}.backup"));
    if !first.exists() {
        return first;
    }

    (1..)
        .map(|n| project_root.join(format!("{EXTRA_SCRIPT_NAME}.backup.{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}
