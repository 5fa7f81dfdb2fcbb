//! Minimum parent size.

use nestbox_core::geometry::{Rect, Size};

use crate::engine::LayoutContext;
use crate::fixed::effective_size;
use crate::hierarchy::get_children;
use crate::node::{Node, NodeId, NodeSet};

/// Smallest size at which `parent_id` can legally contain its current
/// children, or `None` if the parent does not exist.
///
/// - No children: the interior insets, clamped to the global minimums.
/// - Automatic parent: the strategy's minimum interior plus insets. Packing
///   into the result never demands a larger size.
/// - Manual parent: the extent of the children's current coordinates plus
///   `margin` on the right and bottom.
#[must_use]
pub fn calculate_minimum_parent_size(
    nodes: &NodeSet,
    parent_id: NodeId,
    cx: LayoutContext<'_>,
) -> Option<Size> {
    let parent = nodes.get(parent_id)?;
    let children = get_children(nodes, parent_id);
    Some(minimum_size_for(parent, &children, cx))
}

pub(crate) fn minimum_size_for(parent: &Node, children: &[&Node], cx: LayoutContext<'_>) -> Size {
    let config = cx.config;
    let insets = config.margins.insets();
    let empty = Size::new(insets.horizontal_sum(), insets.vertical_sum());
    if children.is_empty() {
        return config.limits.clamp(empty);
    }

    let size = if parent.is_automatic() {
        let sizes: Vec<Size> = children
            .iter()
            .map(|child| effective_size(child, true, config))
            .collect();
        let interior = cx.algorithm.minimum_interior(
            &sizes,
            &parent.layout_preferences,
            config.margins.margin,
        );
        Size::new(
            interior.width.saturating_add(insets.horizontal_sum()),
            interior.height.saturating_add(insets.vertical_sum()),
        )
    } else {
        let bounds: Vec<Rect> = children.iter().map(|child| child.bounds()).collect();
        extent_size(parent.bounds(), &bounds, config.margins.margin).max(empty)
    };
    config.limits.clamp(size)
}

/// Size `parent` needs so that every rectangle in `contents` ends at least
/// `margin` inside its right and bottom edges.
pub(crate) fn extent_size(parent: Rect, contents: &[Rect], margin: i32) -> Size {
    contents.iter().fold(Size::ZERO, |acc, rect| {
        Size::new(
            acc.width
                .max(rect.right().saturating_add(margin).saturating_sub(parent.x)),
            acc.height
                .max(rect.bottom().saturating_add(margin).saturating_sub(parent.y)),
        )
    })
}
