//! Regex removal of vendor markup noise.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::TextFilter;

/// A named find-and-replace rule applied to raw markup.
#[derive(Clone, Debug)]
pub struct FilterRule {
    name: String,
    pattern: Regex,
    replacement: String,
}

impl FilterRule {
    /// Compile a rule. Replacement text may refer to capture groups with `$n`.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Name used in trace output; built-in rules use snake_case names.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the rule, returning `None` when nothing matched.
    fn apply(&self, markup: &str) -> Option<String> {
        match self.pattern.replace_all(markup, self.replacement.as_str()) {
            Cow::Owned(replaced) => Some(replaced),
            Cow::Borrowed(_) => None,
        }
    }
}

/// `(name, pattern, replacement)` for every built-in rule.
const BUILTIN_PATTERNS: &[(&str, &str, &str)] = &[
    (
        "meta_and_prefixed_tags",
        r#"(?i)<meta\b[^>]*>|<\s*link\s+href="file:[^>]*>|</?\s*\w+:[^>]*>"#,
        "",
    ),
    (
        "office_classes_and_comments",
        r#"(?is)class="Mso[^"]*"|<!--.*?-->"#,
        "",
    ),
    (
        "apple_classes",
        r#"(?i)class="Apple-(?:style|converted)-[a-z]+\s?[^"]+""#,
        "",
    ),
    (
        "google_doc_markers",
        r#"(?i)id="internal-source-marker_[^"]+"|dir="[rtl]{3}""#,
        "",
    ),
    (
        "blank_paragraphs",
        r#"(?i)<p\b[^>]*>\s*(?:&nbsp;|\x{A0})*\s*</p\s*>|<p\b[^>]*>\s*<font[^>]*>\s*(?:&nbsp;|\x{A0})*\s*</\s*font\s*>\s*</p\s*>"#,
        "",
    ),
    (
        "vendor_styles",
        r#"(?i)style="[^"]*mso-[^;][^"]*"|style="margin:\s*[^;"]*;""#,
        "",
    ),
    (
        "stylesheets",
        r#"(?is)<style[^>]*>.*?</style\s*>|<link\b[^>]*\brel\s*=\s*["']?stylesheet[^>]*>"#,
        "",
    ),
    (
        "scripts",
        // The third alternative keeps the tag head before a `javascript:`
        // attribute in group 1, so it only ever matches inside a start tag.
        concat!(
            r#"(?is)<\s*script[^>]*>.*?<\\?/\s*script\s*>|<\s*script\b[^<>]*>?"#,
            r#"|(<[\w:-]+(?:\s+[^<>\s=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'<>]+))?)*?)"#,
            r#"\s+[\w:.-]+\s*=\s*(?:"\s*javascript:[^"]*"|'\s*javascript:[^']*'|javascript:[^\s>]*)"#,
        ),
        "${1}",
    ),
];

static BUILTIN_RULES: LazyLock<Vec<FilterRule>> = LazyLock::new(|| {
    BUILTIN_PATTERNS
        .iter()
        .map(|(name, pattern, replacement)| {
            FilterRule::new(*name, pattern, *replacement).expect("invalid built-in cruft pattern")
        })
        .collect()
});

/// Filter that strips vendor cruft from raw markup with regex rules.
///
/// Rules are applied in order; each rule operates on the output of the
/// previous one. The built-in rule set (see [`Default`]) deletes:
///
/// - `<meta>` tags, `file:` links and namespace-prefixed tags like `<o:p>`
/// - Office `class="Mso..."` markers and HTML comments
/// - Apple `class="Apple-style-..."` / `Apple-converted-...` markers
/// - Google Docs source markers and `dir="ltr"`/`dir="rtl"` attributes
/// - paragraphs holding only whitespace or non-breaking spaces
/// - `style` attributes carrying `mso-` declarations or a bare margin
/// - `<style>` blocks and stylesheet `<link>`s
/// - `<script>` blocks and attributes with `javascript:` values
///
/// # Example
///
/// ```
/// use paste_sanitizer::{CruftFilter, TextFilter};
///
/// let filter = CruftFilter::default();
/// let result = filter.filter(r#"<p class="MsoNormal">Hi<o:p></o:p></p>"#);
/// assert_eq!(result, "<p >Hi</p>");
/// ```
#[derive(Clone, Debug)]
pub struct CruftFilter {
    rules: Vec<FilterRule>,
}

impl CruftFilter {
    /// Build a filter from `(pattern, replacement)` pairs only, without the
    /// built-in rules.
    pub fn try_with_rules(rules: Vec<(&str, &str)>) -> Result<Self, regex::Error> {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(i, (pattern, replacement))| {
                FilterRule::new(format!("custom_{i}"), pattern, replacement)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(mut self, rule: FilterRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }
}

impl Default for CruftFilter {
    fn default() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
        }
    }
}

impl TextFilter for CruftFilter {
    fn filter(&self, markup: &str) -> String {
        self.rules
            .iter()
            .fold(markup.to_string(), |acc, rule| match rule.apply(&acc) {
                Some(replaced) => {
                    tracing::trace!("Cruft rule {} matched", rule.name);
                    replaced
                }
                None => acc,
            })
    }
}
