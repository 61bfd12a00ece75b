// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules hold the pieces the engine is assembled from.

// `hooks` module:
// The build lifecycle registry (`BuildHooks`) with its two call sites, script
// load and the `buildprog` pre-action, plus the installer that drops the
// PlatformIO extra script into a project.
pub mod hooks;

// `reporter` module:
// The `FixReporter` output sink and its `ConsoleReporter` implementation,
// which prints the banner and the per-run summary.
pub mod reporter;

// `rules` module:
// The core data structures for find/replace rules (`Rule`, `MatchKind`,
// `RuleSet`), the built-in LVGL 9 to 8 table and the compiled matchers that
// apply them to file content.
pub mod rules;

// `validator` module:
// The `RuleValidator` trait and `StandardValidator`, which flag rules that
// cannot match, never change anything or repeat an earlier rule.
pub mod validator;
