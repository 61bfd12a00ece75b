use std::collections::HashSet;
use std::fmt;

use crate::builders::rules::{MatchKind, Rule};
use crate::core::config::FixConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "warning: {}", self.message),
            Severity::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// The `RuleValidator` trait defines the public interface for checking a
/// rewriter configuration before it runs.
pub trait RuleValidator {
    /// Performs a full validation of the `FixConfig` and its rule set.
    ///
    /// # Returns
    /// Every issue found. Only `Severity::Error` issues make the config unusable.
    fn validate(&self, config: &FixConfig) -> Vec<ValidationIssue>;

    /// Validates a single `Rule`.
    fn validate_rule(&self, rule: &Rule) -> Vec<ValidationIssue>;
}

/// The `StandardValidator` is a concrete implementation of `RuleValidator`.
///
/// It checks that every rule compiles and can match something, flags no-op and
/// duplicated rules, and reports a missing source root.
pub struct StandardValidator;

impl StandardValidator {
    pub fn new() -> Self {
        Self
    }

    /// Flags rules whose pattern already appeared earlier in the set.
    ///
    /// A later duplicate only ever sees text the first one has rewritten, so it
    /// is usually a copy-paste slip.
    fn check_duplicates(&self, rules: &[Rule]) -> Vec<ValidationIssue> {
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();

        for rule in rules {
            if !seen.insert((rule.kind, rule.pattern.as_str())) {
                warnings.push(ValidationIssue::warning(format!(
                    "Duplicate {} rule for '{}'",
                    rule.kind, rule.pattern
                )));
            }
        }
        warnings
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl RuleValidator for StandardValidator {
    fn validate(&self, config: &FixConfig) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if config.version != "1.0" {
            issues.push(ValidationIssue::error(format!(
                "Unsupported config version: {}",
                config.version
            )));
        }

        if config.extensions.is_empty() {
            issues.push(ValidationIssue::error(
                "No file extensions configured, nothing would be scanned".to_string(),
            ));
        }

        if !config.root.is_dir() {
            issues.push(ValidationIssue::warning(format!(
                "Source root not found: {}",
                config.root.display()
            )));
        }

        issues.extend(self.check_duplicates(&config.rules.rules));

        for rule in config.rules.iter() {
            issues.extend(self.validate_rule(rule));
        }

        issues
    }

    fn validate_rule(&self, rule: &Rule) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if rule.pattern.is_empty() {
            issues.push(ValidationIssue::error(format!(
                "Empty {} pattern (replacement '{}')",
                rule.kind, rule.replacement
            )));
            return issues;
        }

        if let Err(e) = rule.compile() {
            issues.push(ValidationIssue::error(format!("{e:#}")));
        }

        if rule.kind == MatchKind::Word {
            let first = rule.pattern.chars().next();
            let last = rule.pattern.chars().last();
            if !first.is_some_and(is_word_char) || !last.is_some_and(is_word_char) {
                issues.push(ValidationIssue::warning(format!(
                    "Word pattern '{}' does not start and end with an identifier character, \
                     its boundary anchors may never match",
                    rule.pattern
                )));
            }
        }

        if rule.is_identity() {
            issues.push(ValidationIssue::warning(format!(
                "Rule '{}' replaces the pattern with itself and never changes a file",
                rule.pattern
            )));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::rules::RuleSet;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_rules_only_warn() {
        let dir = tempdir().unwrap();
        let config = FixConfig::for_root(dir.path());
        let issues = StandardValidator::new().validate(&config);

        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        // the six LV_PART_* identity rules
        assert_eq!(issues.len(), 6);
    }

    #[test]
    fn test_empty_pattern_is_error() {
        let issues = StandardValidator::new().validate_rule(&Rule::literal("", "x"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_non_word_edges_warn() {
        let issues = StandardValidator::new().validate_rule(&Rule::word("->next", "->nxt"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_duplicates_and_missing_root() {
        let dir = tempdir().unwrap();
        let mut config = FixConfig::for_root(dir.path().join("missing"));
        config.rules = RuleSet::new(vec![Rule::word("a_b", "c_d"), Rule::word("a_b", "e_f")]);
        config.extensions.clear();

        let issues = StandardValidator::new().validate(&config);
        let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();

        assert!(messages.iter().any(|m| m.starts_with("error: No file extensions")));
        assert!(messages.iter().any(|m| m.starts_with("warning: Source root not found")));
        assert!(messages.iter().any(|m| m.contains("Duplicate word rule for 'a_b'")));
    }
}
