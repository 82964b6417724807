//! Tag whitelisting.

use ego_tree::NodeId;

use super::MarkupTree;
use crate::config::WhitelistConfig;

/// Unwrap every element whose tag is not in
/// [`WhitelistConfig::allowed_tags`]: the wrapper goes, its content stays in
/// place. Returns the number of elements unwrapped.
///
/// Being listed in `allowed_empty_tags` does not protect a tag here.
pub fn restrict_tags(tree: &mut MarkupTree, config: &WhitelistConfig) -> usize {
    let disallowed: Vec<NodeId> = tree
        .elements()
        .filter(|(_, el)| !config.allows_tag(el.name()))
        .map(|(node, _)| node.id())
        .collect();

    let unwrapped = disallowed
        .into_iter()
        .filter(|&id| tree.unwrap(id))
        .count();
    tracing::debug!("Unwrapped {unwrapped} disallowed elements");
    unwrapped
}
