use std::path::PathBuf;

const BANNER_WIDTH: usize = 60;

/// Output sink for a rewriter run.
///
/// The text is advisory only; nothing parses it. Keeping it behind a trait lets
/// the engine and hooks be driven with a silent or recording sink in tests.
pub trait FixReporter {
    /// Announces that the fixes are about to run at build-script load.
    fn banner(&self);

    /// Summarizes a run that rewrote `modified`.
    fn report_summary(&self, modified: &[PathBuf]);

    /// Summarizes a dry run that found `pending` files needing fixes.
    fn report_pending(&self, pending: &[PathBuf]);
}

/// A concrete implementation of `FixReporter` that prints to the console.
///
/// This is the reporter used by every CLI command.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    /// Formats the summary block for a non-empty list of files.
    ///
    /// # Arguments
    /// * `header`: The text placed between the `===` markers.
    /// * `paths`: The files listed below the header, one per line.
    fn format_file_list(&self, header: &str, paths: &[PathBuf]) -> String {
        let mut out = format!("\n=== {header} ===\n");
        for path in paths {
            out.push_str(&format!("  - {}\n", path.display()));
        }
        out
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FixReporter for ConsoleReporter {
    fn banner(&self) {
        let rule = "=".repeat(BANNER_WIDTH);
        println!("{rule}");
        println!("Running LVGL compatibility fixes...");
        println!("{rule}");
    }

    fn report_summary(&self, modified: &[PathBuf]) {
        if modified.is_empty() {
            println!("No LVGL compatibility fixes needed");
            return;
        }

        let header = format!("Fixed LVGL compatibility in {} files", modified.len());
        println!("{}", self.format_file_list(&header, modified));
    }

    fn report_pending(&self, pending: &[PathBuf]) {
        if pending.is_empty() {
            println!("✓ No LVGL compatibility fixes needed");
            return;
        }

        let header = format!("{} files need LVGL compatibility fixes", pending.len());
        println!("{}", self.format_file_list(&header, pending));
        println!("Run 'lvgl-compat-fix run' to apply them");
    }
}

/// A reporter that prints nothing.
pub struct SilentReporter;

impl FixReporter for SilentReporter {
    fn banner(&self) {}
    fn report_summary(&self, _modified: &[PathBuf]) {}
    fn report_pending(&self, _pending: &[PathBuf]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_list_format() {
        let reporter = ConsoleReporter::new();
        let out = reporter.format_file_list(
            "Fixed LVGL compatibility in 2 files",
            &[PathBuf::from("src/ui/ui.h"), PathBuf::from("src/ui/ui.c")],
        );
        assert_eq!(
            out,
            "\n=== Fixed LVGL compatibility in 2 files ===\n  - src/ui/ui.h\n  - src/ui/ui.c\n"
        );
    }
}
