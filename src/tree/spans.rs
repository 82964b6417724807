//! Unwrapping of attribute-less grouping elements.

use ego_tree::NodeId;

use super::MarkupTree;

/// The plain inline grouping element; without attributes it carries nothing.
const GROUPING_TAG: &str = "span";

/// Replace every `span` without attributes with its children, in order.
/// Returns the number of spans unwrapped.
///
/// Candidates are collected once; node ids survive the moves, so spans
/// nested inside an unwrapped span are unwrapped as well.
pub fn unwrap_spans(tree: &mut MarkupTree) -> usize {
    let spans: Vec<NodeId> = tree
        .elements()
        .filter(|(_, el)| el.name() == GROUPING_TAG && !el.has_attributes())
        .map(|(node, _)| node.id())
        .collect();

    let unwrapped = spans.into_iter().filter(|&id| tree.unwrap(id)).count();
    tracing::debug!("Unwrapped {unwrapped} spans");
    unwrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_span_is_unwrapped() {
        let mut tree = MarkupTree::parse("<p>Hello <span>World</span>!</p>");
        assert_eq!(unwrap_spans(&mut tree), 1);
        assert_eq!(tree.serialize(), "<p>Hello World!</p>");
    }

    #[test]
    fn span_with_attributes_is_kept() {
        let mut tree = MarkupTree::parse(r#"<span title="t">a</span><span>b</span>"#);
        assert_eq!(unwrap_spans(&mut tree), 1);
        assert_eq!(tree.serialize(), r#"<span title="t">a</span>b"#);
    }

    #[test]
    fn nested_spans_all_unwrapped() {
        let mut tree = MarkupTree::parse("<span>a<span>b<span>c</span></span><em>d</em></span>");
        assert_eq!(unwrap_spans(&mut tree), 3);
        assert_eq!(tree.serialize(), "abc<em>d</em>");
    }

    #[test]
    fn other_elements_untouched() {
        let mut tree = MarkupTree::parse("<p><strong>x</strong></p>");
        assert_eq!(unwrap_spans(&mut tree), 0);
        assert_eq!(tree.serialize(), "<p><strong>x</strong></p>");
    }
}
