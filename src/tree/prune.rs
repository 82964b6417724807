//! Removal of elements without meaningful text.

use ego_tree::{NodeId, NodeRef};

use super::{ElementData, MarkupNode, MarkupTree, text_of};
use crate::config::WhitelistConfig;

/// Remove every element whose trimmed text content is empty, unless it (or
/// one of its descendants) is listed in
/// [`WhitelistConfig::allowed_empty_tags`]. Returns the number of elements
/// removed.
///
/// All elements are judged against the tree as it was before this call;
/// matches are collected first and detached afterwards. Removing an element
/// never changes the trimmed text of its ancestors, since it only held
/// whitespace, so one pass reaches the same result a repeated pass would.
pub fn prune_empty(tree: &mut MarkupTree, config: &WhitelistConfig) -> usize {
    let doomed: Vec<NodeId> = tree
        .elements()
        .filter(|(node, el)| is_prunable(*node, el, config))
        .map(|(node, _)| node.id())
        .collect();

    for id in &doomed {
        tree.remove(*id);
    }

    tracing::debug!("Pruned {} empty elements", doomed.len());
    doomed.len()
}

fn is_prunable(
    node: NodeRef<'_, MarkupNode>,
    el: &ElementData,
    config: &WhitelistConfig,
) -> bool {
    if config.allows_empty(el.name()) {
        return false;
    }
    let keeps_empty_descendant = node.descendants().skip(1).any(|d| match d.value() {
        MarkupNode::Element(child) => config.allows_empty(child.name()),
        _ => false,
    });
    if keeps_empty_descendant {
        return false;
    }
    text_of(node).trim().is_empty()
}
