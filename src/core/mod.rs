// This file is the module declaration file for the `core` module.
// It declares the submodules that hold the rewriter itself and the
// configuration it runs with.

// `config` module:
// Defines `FixConfig` (the scanned root, the recognized extensions and the
// built-in rule set) and the `ConfigManager` that loads it from
// `lvgl-compat.toml` through the `ConfigProvider` trait.
pub mod config;

// `engine` module:
// The `CompatEngine` walks the source root, applies the rule set to every
// candidate file, rewrites changed files in place and returns the
// modification report.
pub mod engine;

// `error` module:
// Typed per-file failures. The engine logs them and keeps going.
pub mod error;
