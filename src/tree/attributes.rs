//! Attribute whitelisting.

use super::MarkupTree;
use crate::config::WhitelistConfig;

/// Remove every attribute not listed in
/// [`WhitelistConfig::allowed_attributes`], keeping the survivors' values
/// and order. Returns the number of attributes removed.
///
/// Allowed attributes are dropped too when their value uses the
/// `javascript:` scheme. Values here are entity-decoded, so this catches
/// encodings like `&#106;avascript:` that the text-level rule cannot see.
///
/// Must run before [`unwrap_spans`](super::unwrap_spans): a `span` whose
/// only attributes are disallowed becomes eligible for unwrapping here.
pub fn strip_attributes(tree: &mut MarkupTree, config: &WhitelistConfig) -> usize {
    let mut removed = 0;
    tree.for_each_element_mut(|el| {
        removed += el.retain_attrs(|name, value| {
            config.allows_attribute(name) && !is_javascript_url(value)
        });
    });
    tracing::debug!("Stripped {removed} attributes");
    removed
}

/// URL parsers ignore ASCII whitespace and control characters inside the
/// scheme, so `java\tscript:` is still `javascript:`.
fn is_javascript_url(value: &str) -> bool {
    const SCHEME: &str = "javascript:";
    let mut scheme = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(SCHEME.len());
    SCHEME
        .chars()
        .all(|expected| scheme.next().is_some_and(|c| c.eq_ignore_ascii_case(&expected)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_attributes_removed_everywhere() {
        let mut tree = MarkupTree::parse(
            r#"<p class="x" style="color:red"><a href="/a" onclick="go()" title="t">a</a><span lang="en">b</span></p>"#,
        );
        let removed = strip_attributes(&mut tree, &WhitelistConfig::default());
        assert_eq!(removed, 4);
        assert_eq!(
            tree.serialize(),
            r#"<p><a href="/a" title="t">a</a><span>b</span></p>"#
        );
    }

    #[test]
    fn allowed_attributes_keep_value_and_order() {
        let mut tree = MarkupTree::parse(r#"<a title="T" id="i" href="H">x</a>"#);
        strip_attributes(&mut tree, &WhitelistConfig::default());
        assert_eq!(tree.serialize(), r#"<a title="T" href="H">x</a>"#);
    }

    #[test]
    fn empty_attribute_whitelist_strips_all() {
        let config = WhitelistConfig::default().allowed_attributes(Vec::<&str>::new());
        let mut tree = MarkupTree::parse(r#"<a href="/a" title="t">x</a>"#);
        assert_eq!(strip_attributes(&mut tree, &config), 2);
        assert!(tree.elements().all(|(_, el)| !el.has_attributes()));
    }

    #[test]
    fn javascript_urls_removed_even_when_allowed() {
        let mut tree = MarkupTree::parse(concat!(
            r#"<a href="&#106;avascript:alert(1)" title="t">x</a>"#,
            r#"<a href=" JAVA&#9;SCRIPT:go()">y</a>"#,
            r#"<a title="javascript: the good parts" href="/js">z</a>"#,
        ));
        let removed = strip_attributes(&mut tree, &WhitelistConfig::default());
        assert_eq!(removed, 3);
        assert_eq!(
            tree.serialize(),
            r#"<a title="t">x</a><a>y</a><a href="/js">z</a>"#
        );
    }

    #[test]
    fn javascript_scheme_detection() {
        assert!(is_javascript_url("javascript:void(0)"));
        assert!(is_javascript_url("  JavaScript:x"));
        assert!(is_javascript_url("java\nscript:x"));
        assert!(!is_javascript_url("javascript"));
        assert!(!is_javascript_url("https://example.com/javascript:x"));
        assert!(!is_javascript_url(""));
    }

    #[test]
    fn no_attributes_is_noop() {
        let mut tree = MarkupTree::parse("<p>plain</p>");
        assert_eq!(strip_attributes(&mut tree, &WhitelistConfig::default()), 0);
        assert_eq!(tree.serialize(), "<p>plain</p>");
    }
}
