//! Parsed markup tree and the tree-level sanitization stages.
//!
//! [`MarkupTree`] owns an [`ego_tree::Tree`] of [`MarkupNode`]s built from
//! scraper's html5ever-based fragment parser, which never rejects input. The
//! stages below mutate it in place:
//!
//! - [`prune_empty`] -- drop elements without meaningful text.
//! - [`strip_attributes`] -- drop attributes outside the whitelist.
//! - [`unwrap_spans`] -- replace attribute-less `span`s with their children.
//! - [`restrict_tags`] -- unwrap elements outside the tag whitelist.

mod attributes;
mod prune;
mod spans;
mod tags;

pub use attributes::strip_attributes;
pub use prune::prune_empty;
pub use spans::unwrap_spans;
pub use tags::restrict_tags;

use std::borrow::Cow;
use std::fmt;

use ego_tree::{NodeId, NodeRef, Tree, iter::Edge};
use scraper::{Html, Node};

use crate::filter::CharNormalizer;

/// HTML void elements that must not have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A node of a [`MarkupTree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupNode {
    /// The root of the tree; never appears anywhere else.
    Fragment,
    Element(ElementData),
    Text(String),
}

/// Tag name and attributes of an element, attributes in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementData {
    name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Lowercases the tag name and attribute names.
    pub fn new<'a>(name: &str, attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
        }
    }

    /// Lowercase tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(name, value)` pairs in source order; names are lowercase.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether any attribute is left on the element.
    pub fn has_attributes(&self) -> bool {
        !self.attrs.is_empty()
    }

    /// Keep only the attributes for which `keep(name, value)` returns `true`,
    /// returning how many were removed.
    pub fn retain_attrs(&mut self, mut keep: impl FnMut(&str, &str) -> bool) -> usize {
        let before = self.attrs.len();
        self.attrs.retain(|(k, v)| keep(k, v));
        before - self.attrs.len()
    }
}

/// An in-memory markup tree, created fresh for every paste.
///
/// Removed nodes are detached rather than freed; every traversal starts at
/// the root, so they are never observed again.
///
/// # Example
///
/// ```
/// use paste_sanitizer::MarkupTree;
///
/// let tree = MarkupTree::parse("<p>Hello <b>world</b></p>");
/// assert_eq!(tree.text_content(), "Hello world");
/// assert_eq!(tree.serialize(), "<p>Hello <b>world</b></p>");
/// ```
#[derive(Clone, Debug)]
pub struct MarkupTree {
    tree: Tree<MarkupNode>,
}

impl MarkupTree {
    /// Parse a markup fragment. Never fails: html5ever recovers from any
    /// input, and fragments it cannot make sense of end up as text.
    ///
    /// Comments, doctypes and processing instructions are dropped.
    pub fn parse(markup: &str) -> Self {
        let mut tree = Tree::new(MarkupNode::Fragment);
        if markup.is_empty() {
            return Self { tree };
        }

        let document = Html::parse_fragment(markup);
        let root_id = tree.root().id();

        // Explicit stack so pathological nesting cannot exhaust the call stack.
        let mut stack: Vec<(NodeRef<'_, Node>, NodeId)> = document
            .root_element()
            .children()
            .rev()
            .map(|child| (child, root_id))
            .collect();

        while let Some((source, parent)) = stack.pop() {
            let value = match source.value() {
                Node::Element(el) => MarkupNode::Element(ElementData::new(el.name(), el.attrs())),
                Node::Text(text) => MarkupNode::Text(text.to_string()),
                _ => continue,
            };
            let Some(mut parent) = tree.get_mut(parent) else {
                continue;
            };
            let id = parent.append(value).id();
            stack.extend(source.children().rev().map(|child| (child, id)));
        }

        Self { tree }
    }

    /// The [`MarkupNode::Fragment`] holding the top-level nodes.
    pub fn root(&self) -> NodeRef<'_, MarkupNode> {
        self.tree.root()
    }

    /// Ids of every reachable element, in document order.
    pub fn element_ids(&self) -> Vec<NodeId> {
        self.tree
            .root()
            .descendants()
            .filter(|node| matches!(node.value(), MarkupNode::Element(_)))
            .map(|node| node.id())
            .collect()
    }

    /// Every reachable element, in document order.
    pub fn elements(&self) -> impl Iterator<Item = (NodeRef<'_, MarkupNode>, &ElementData)> {
        self.tree
            .root()
            .descendants()
            .filter_map(|node| match node.value() {
                MarkupNode::Element(el) => Some((node, el)),
                _ => None,
            })
    }

    /// Concatenated text of the whole tree.
    pub fn text_content(&self) -> String {
        text_of(self.tree.root())
    }

    /// Call `f` on the data of every reachable element.
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut ElementData)) {
        for id in self.element_ids() {
            if let Some(mut node) = self.tree.get_mut(id) {
                if let MarkupNode::Element(el) = node.value() {
                    f(el);
                }
            }
        }
    }

    /// Apply [`CharNormalizer`] to every text node.
    ///
    /// Entity-encoded characters (`&nbsp;`, `&rsquo;`, ...) only become
    /// characters during parsing, so the text-level pass cannot see them.
    pub fn normalize_text(&mut self) -> usize {
        let ids: Vec<NodeId> = self
            .tree
            .root()
            .descendants()
            .filter(|node| matches!(node.value(), MarkupNode::Text(_)))
            .map(|node| node.id())
            .collect();

        let mut changed = 0;
        for id in ids {
            let Some(mut node) = self.tree.get_mut(id) else {
                continue;
            };
            if let MarkupNode::Text(text) = node.value() {
                let normalized = match CharNormalizer::normalize(text) {
                    Cow::Owned(normalized) => Some(normalized),
                    Cow::Borrowed(_) => None,
                };
                if let Some(normalized) = normalized {
                    *text = normalized;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Detach a node and its subtree. Returns `false` for the root or an
    /// unknown id.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.tree.root().id() {
            return false;
        }
        match self.tree.get_mut(id) {
            Some(mut node) => {
                node.detach();
                true
            }
            None => false,
        }
    }

    /// Replace a node with its children, in order. Returns `false` if the
    /// node has no parent (the root, or an already detached node).
    pub fn unwrap(&mut self, id: NodeId) -> bool {
        let children: Vec<NodeId> = match self.tree.get(id) {
            Some(node) if node.parent().is_some() => node.children().map(|c| c.id()).collect(),
            _ => return false,
        };
        for child in children {
            if let Some(mut moved) = self.tree.get_mut(child) {
                moved.detach();
            }
            if let Some(mut node) = self.tree.get_mut(id) {
                node.insert_id_before(child);
            }
        }
        self.remove(id)
    }

    /// Serialize back to markup.
    ///
    /// Text is escaped for `&`, `<` and `>`; attribute values for `&` and
    /// `"`. Void elements get no closing tag.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for edge in self.tree.root().traverse() {
            match edge {
                Edge::Open(node) => match node.value() {
                    MarkupNode::Element(el) => {
                        out.push('<');
                        out.push_str(el.name());
                        for (k, v) in el.attrs() {
                            out.push(' ');
                            out.push_str(k);
                            out.push_str("=\"");
                            escape_into(&mut out, v, true);
                            out.push('"');
                        }
                        out.push('>');
                    }
                    MarkupNode::Text(text) => escape_into(&mut out, text, false),
                    MarkupNode::Fragment => {}
                },
                Edge::Close(node) => {
                    if let MarkupNode::Element(el) = node.value() {
                        if !VOID_ELEMENTS.contains(&el.name()) {
                            out.push_str("</");
                            out.push_str(el.name());
                            out.push('>');
                        }
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for MarkupTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Concatenated descendant text of `node`, in document order.
pub fn text_of(node: NodeRef<'_, MarkupNode>) -> String {
    node.descendants()
        .filter_map(|n| match n.value() {
            MarkupNode::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Text content of a raw markup string, entities decoded, nothing filtered.
pub fn extract_text(markup: &str) -> String {
    if markup.is_empty() {
        return String::new();
    }
    let document = Html::parse_fragment(markup);
    document.root_element().text().collect()
}

/// Escape `s` for use as element text.
pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s, false);
    out
}

fn escape_into(out: &mut String, s: &str, attribute: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_serialize_simple_fragment() {
        let tree = MarkupTree::parse(r#"<p title="t">Hello <a href="/x">link</a><br></p>"#);
        assert_eq!(
            tree.serialize(),
            r#"<p title="t">Hello <a href="/x">link</a><br></p>"#
        );
    }

    #[test]
    fn parse_empty_is_bare_root() {
        let tree = MarkupTree::parse("");
        assert_eq!(tree.root().children().count(), 0);
        assert_eq!(tree.serialize(), "");
    }

    #[test]
    fn attributes_keep_source_order() {
        let tree = MarkupTree::parse(r#"<a title="t" href="h" class="c">x</a>"#);
        let (_, el) = tree.elements().next().unwrap();
        let names: Vec<_> = el.attrs().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["title", "href", "class"]);
    }

    #[test]
    fn comments_are_dropped() {
        let tree = MarkupTree::parse("<p>a<!-- hidden -->b</p>");
        assert_eq!(tree.serialize(), "<p>ab</p>");
    }

    #[test]
    fn malformed_markup_recovers() {
        let tree = MarkupTree::parse("<p><b>bold <i>both</b> italic</p></div>");
        assert_eq!(tree.text_content(), "bold both italic");
        assert!(tree.elements().all(|(_, el)| ["p", "b", "i"].contains(&el.name())));
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let tree = MarkupTree::parse(r#"<a title="&quot;q&quot; &amp; more">1 &lt; 2 &amp;&amp; 3 &gt; 2</a>"#);
        assert_eq!(
            tree.serialize(),
            r#"<a title="&quot;q&quot; &amp; more">1 &lt; 2 &amp;&amp; 3 &gt; 2</a>"#
        );
    }

    #[test]
    fn uppercase_names_are_lowercased() {
        let tree = MarkupTree::parse(r#"<P ID="x">a</P>"#);
        assert_eq!(tree.serialize(), r#"<p id="x">a</p>"#);
    }

    #[test]
    fn unwrap_promotes_children_in_place() {
        let mut tree = MarkupTree::parse("<p>a<span>b<em>c</em>d</span>e</p>");
        let span = tree
            .elements()
            .find(|(_, el)| el.name() == "span")
            .map(|(node, _)| node.id())
            .unwrap();
        assert!(tree.unwrap(span));
        assert_eq!(tree.serialize(), "<p>ab<em>c</em>de</p>");
        assert!(!tree.unwrap(span));
    }

    #[test]
    fn unwrap_and_remove_refuse_root() {
        let mut tree = MarkupTree::parse("<p>a</p>");
        let root = tree.root().id();
        assert!(!tree.unwrap(root));
        assert!(!tree.remove(root));
        assert_eq!(tree.serialize(), "<p>a</p>");
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut tree = MarkupTree::parse("<div><p>a</p><p>b</p></div>");
        let first_p = tree.element_ids()[1];
        assert!(tree.remove(first_p));
        assert_eq!(tree.serialize(), "<div><p>b</p></div>");
        assert_eq!(tree.element_ids().len(), 2);
    }

    #[test]
    fn normalize_text_maps_decoded_entities() {
        let mut tree = MarkupTree::parse("<p>Hello&nbsp;&ldquo;you&rdquo; &lsaquo;x&rsaquo;</p>");
        assert_eq!(tree.normalize_text(), 1);
        assert_eq!(tree.serialize(), "<p>Hello \"you\" &lt;x&gt;</p>");
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let markup = format!("{}x{}", "<span>".repeat(5000), "</span>".repeat(5000));
        let tree = MarkupTree::parse(&markup);
        assert_eq!(tree.text_content(), "x");
        assert!(tree.serialize().contains('x'));
    }

    #[test]
    fn extract_text_decodes_entities() {
        assert_eq!(
            extract_text("<p>Tom &amp; <b>Jerry</b></p><script>x</script>"),
            "Tom & Jerryx"
        );
        assert_eq!(extract_text(""), "");
    }

    #[test]
    fn display_matches_serialize() {
        let tree = MarkupTree::parse("<em>x</em>");
        assert_eq!(tree.to_string(), tree.serialize());
    }
}
