//! Whitelist configuration consumed by every tree-level stage.

use std::collections::HashSet;

use crate::error::{PasteError, Result};

const DEFAULT_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "blockquote", "p", "a", "span", "hr",
    "br", "strong", "em",
];

const DEFAULT_ATTRIBUTES: &[&str] = &["href", "title"];

const DEFAULT_EMPTY_TAGS: &[&str] = &["hr", "br"];

/// Allowed tag, attribute and "may stay empty" tag names.
///
/// All names are compared case-insensitively; they are stored lowercased.
/// The three sets are independent: listing a tag in
/// [`allowed_empty_tags`](Self::allowed_empty_tags) protects it from the
/// empty-element pruner but does not keep it past the tag whitelist.
///
/// # Example
///
/// ```
/// use paste_sanitizer::WhitelistConfig;
///
/// let config = WhitelistConfig::default()
///     .allow_tag("TABLE")
///     .allow_attribute("lang");
///
/// assert!(config.allows_tag("table"));
/// assert!(config.allows_attribute("LANG"));
/// assert!(!config.allows_tag("div"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhitelistConfig {
    tags: HashSet<String>,
    attributes: HashSet<String>,
    empty_tags: HashSet<String>,
}

impl WhitelistConfig {
    /// Build a configuration from three name lists without validating them.
    pub fn new<T, A, E>(tags: T, attributes: A, empty_tags: E) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            tags: lowercase_set(tags),
            attributes: lowercase_set(attributes),
            empty_tags: lowercase_set(empty_tags),
        }
    }

    /// Fallible constructor that rejects names which could never match a
    /// parsed tag or attribute (empty, or containing whitespace or markup
    /// delimiters).
    pub fn try_new<T, A, E>(tags: T, attributes: A, empty_tags: E) -> Result<Self>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let config = Self::new(tags, attributes, empty_tags);
        for name in config
            .tags
            .iter()
            .chain(&config.attributes)
            .chain(&config.empty_tags)
        {
            validate_name(name)?;
        }
        Ok(config)
    }

    /// Add a tag to the allowed tag set.
    pub fn allow_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.tags.insert(tag.as_ref().to_ascii_lowercase());
        self
    }

    /// Add an attribute to the allowed attribute set.
    pub fn allow_attribute(mut self, attribute: impl AsRef<str>) -> Self {
        self.attributes
            .insert(attribute.as_ref().to_ascii_lowercase());
        self
    }

    /// Add a tag to the set of tags that may remain without text content.
    pub fn allow_empty_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.empty_tags.insert(tag.as_ref().to_ascii_lowercase());
        self
    }

    /// Replace the allowed tag set.
    pub fn allowed_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.tags = lowercase_set(tags);
        self
    }

    /// Replace the allowed attribute set.
    pub fn allowed_attributes<I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.attributes = lowercase_set(attributes);
        self
    }

    /// Replace the set of tags that may remain empty.
    pub fn allowed_empty_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.empty_tags = lowercase_set(tags);
        self
    }

    /// Whether `tag` survives [`restrict_tags`](crate::restrict_tags).
    /// Names compare case-insensitively, like every query below.
    pub fn allows_tag(&self, tag: &str) -> bool {
        contains_ignore_case(&self.tags, tag)
    }

    /// Whether `attribute` survives [`strip_attributes`](crate::strip_attributes).
    pub fn allows_attribute(&self, attribute: &str) -> bool {
        contains_ignore_case(&self.attributes, attribute)
    }

    /// Whether an empty `tag` is kept by [`prune_empty`](crate::prune_empty).
    pub fn allows_empty(&self, tag: &str) -> bool {
        contains_ignore_case(&self.empty_tags, tag)
    }

}

impl Default for WhitelistConfig {
    /// The whitelist a rich-text editor typically wants: headings, lists,
    /// paragraphs, links, emphasis and line/rule breaks, with only `href` and
    /// `title` attributes.
    fn default() -> Self {
        Self::new(DEFAULT_TAGS, DEFAULT_ATTRIBUTES, DEFAULT_EMPTY_TAGS)
    }
}

fn lowercase_set<I>(names: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_ascii_lowercase())
        .collect()
}

fn contains_ignore_case(set: &HashSet<String>, name: &str) -> bool {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        set.contains(&name.to_ascii_lowercase())
    } else {
        set.contains(name)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PasteError::Config("empty name in whitelist".into()));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '=' | '"' | '\''))
    {
        return Err(PasteError::Config(format!(
            "invalid name in whitelist: {name:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_editor_whitelist() {
        let config = WhitelistConfig::default();
        for tag in ["h1", "p", "a", "span", "strong", "em", "br", "hr", "li"] {
            assert!(config.allows_tag(tag), "{tag} should be allowed");
        }
        assert!(!config.allows_tag("div"));
        assert!(!config.allows_tag("script"));
        assert!(config.allows_attribute("href"));
        assert!(config.allows_attribute("title"));
        assert!(!config.allows_attribute("class"));
        assert!(config.allows_empty("br"));
        assert!(!config.allows_empty("p"));
    }

    #[test]
    fn names_are_case_insensitive() {
        let config = WhitelistConfig::new(["DIV"], ["Data-Id"], ["IMG"]);
        assert!(config.allows_tag("div"));
        assert!(config.allows_tag("Div"));
        assert!(config.allows_attribute("data-id"));
        assert!(config.allows_empty("img"));
    }

    #[test]
    fn builder_methods_add_and_replace() {
        let config = WhitelistConfig::default()
            .allow_tag("table")
            .allowed_attributes(["lang"])
            .allow_empty_tag("img");
        assert!(config.allows_tag("table"));
        assert!(config.allows_tag("p"));
        assert!(config.allows_attribute("lang"));
        assert!(!config.allows_attribute("href"));
        assert!(config.allows_empty("img"));
        assert!(config.allows_empty("br"));
    }

    #[test]
    fn try_new_rejects_bad_names() {
        let err = WhitelistConfig::try_new(["p", "b r"], ["href"], ["br"]).unwrap_err();
        assert!(matches!(err, PasteError::Config(_)));

        let err = WhitelistConfig::try_new(["p"], [""], ["br"]).unwrap_err();
        assert!(matches!(err, PasteError::Config(_)));

        let err = WhitelistConfig::try_new(["p"], ["href"], ["<br>"]).unwrap_err();
        assert!(matches!(err, PasteError::Config(_)));
    }

    #[test]
    fn try_new_accepts_valid_names() {
        let config = WhitelistConfig::try_new(["p", " em "], ["href"], ["br"]).unwrap();
        assert!(config.allows_tag("em"));
    }
}
