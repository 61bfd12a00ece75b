use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Defines how the `pattern` of a [`Rule`] is located in file content.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// Plain substring match. Every occurrence is replaced, wherever it sits.
    Literal,
    /// Whole-identifier match. The pattern is escaped and wrapped in `\b`
    /// anchors, so `lv_image_create` never matches inside
    /// `lv_image_create_extended`.
    Word,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Literal => write!(f, "literal"),
            MatchKind::Word => write!(f, "word"),
        }
    }
}

/// A single find/replace pair applied globally to a file's content.
///
/// The replacement is always literal text: `$` sequences are not expanded
/// into capture groups.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: MatchKind,
    pub pattern: String,
    pub replacement: String,
}

impl Rule {
    pub fn literal(pattern: &str, replacement: &str) -> Self {
        Self {
            kind: MatchKind::Literal,
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }

    pub fn word(pattern: &str, replacement: &str) -> Self {
        Self {
            kind: MatchKind::Word,
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }

    /// Returns `true` when applying this rule can never change content.
    pub fn is_identity(&self) -> bool {
        self.pattern == self.replacement
    }

    /// The regular expression this rule is matched with, if it is regex based.
    pub fn regex_source(&self) -> Option<String> {
        match self.kind {
            MatchKind::Literal => None,
            MatchKind::Word => Some(format!(r"\b{}\b", regex::escape(&self.pattern))),
        }
    }

    /// Compiles the rule into a matcher ready to run against file content.
    pub fn compile(&self) -> Result<CompiledRule> {
        let matcher = match self.regex_source() {
            None => Matcher::Literal,
            Some(source) => Matcher::Regex(
                Regex::new(&source)
                    .with_context(|| format!("Invalid word pattern: {}", self.pattern))?,
            ),
        };

        Ok(CompiledRule {
            rule: self.clone(),
            matcher,
        })
    }
}

/// The ordered rule table. Later rules see the output of earlier ones.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The LVGL 9 to LVGL 8 downgrade table used for generated UI code.
    ///
    /// The `LV_PART_*` identity rules exist in the upstream table and are
    /// kept as-is. They match but never change content.
    pub fn lvgl_v9_to_v8() -> Self {
        Self::new(vec![
            // include path
            Rule::literal(r#"#include "lvgl/lvgl.h""#, r#"#include "lvgl.h""#),
            // type and function names
            Rule::word("lv_screen_load_anim_t", "lv_scr_load_anim_t"),
            Rule::word("lv_image_dsc_t", "lv_img_dsc_t"),
            Rule::word("lv_image_header_t", "lv_img_header_t"),
            Rule::word("lv_image_set_src", "lv_img_set_src"),
            Rule::word("lv_image_create", "lv_img_create"),
            Rule::word("lv_image_get_src", "lv_img_get_src"),
            // part names
            Rule::word("LV_PART_LIST_MAIN", "LV_PART_MAIN"),
            Rule::word("LV_PART_CURSOR", "LV_PART_CURSOR"),
            Rule::word("LV_PART_INDICATOR", "LV_PART_INDICATOR"),
            Rule::word("LV_PART_KNOB", "LV_PART_KNOB"),
            Rule::word("LV_PART_SELECTED", "LV_PART_SELECTED"),
            Rule::word("LV_PART_ITEMS", "LV_PART_ITEMS"),
            Rule::word("LV_PART_TICKS", "LV_PART_TICKS"),
        ])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn compile(&self) -> Result<Vec<CompiledRule>> {
        self.rules.iter().map(Rule::compile).collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::lvgl_v9_to_v8()
    }
}

#[derive(Debug)]
enum Matcher {
    Literal,
    Regex(Regex),
}

/// A [`Rule`] paired with its compiled matcher.
#[derive(Debug)]
pub struct CompiledRule {
    rule: Rule,
    matcher: Matcher,
}

impl CompiledRule {
    /// Replaces every non-overlapping match in `content`.
    ///
    /// Returns `Cow::Borrowed` when nothing matched. A match of an identity
    /// rule still yields `Cow::Owned` with unchanged text, so callers decide
    /// "modified" by comparing content, not by the variant.
    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        match &self.matcher {
            Matcher::Literal => {
                if self.rule.pattern.is_empty() || !content.contains(&self.rule.pattern) {
                    Cow::Borrowed(content)
                } else {
                    Cow::Owned(content.replace(&self.rule.pattern, &self.rule.replacement))
                }
            }
            Matcher::Regex(regex) => {
                regex.replace_all(content, NoExpand(self.rule.replacement.as_str()))
            }
        }
    }
}

/// Runs `content` through every rule in order.
pub fn apply_rules<'a>(rules: &[CompiledRule], content: &'a str) -> Cow<'a, str> {
    let mut current = Cow::Borrowed(content);

    for rule in rules {
        let next = match rule.apply(&current) {
            Cow::Owned(rewritten) => Some(rewritten),
            Cow::Borrowed(_) => None,
        };
        if let Some(rewritten) = next {
            current = Cow::Owned(rewritten);
        }
    }

    current
}
