//! Fixed-dimension policy for leaves.

use nestbox_core::geometry::Size;

use crate::config::{FixedDimensions, LayoutConfig, SizeLimits};
use crate::node::{Node, NodeType};

/// Pin a leaf's width and/or height to the configured fixed values.
///
/// Only nodes typed [`NodeType::Leaf`] that are not locked are pinned; every
/// other node passes through. The result is always clamped to the global
/// minimums. Whether the leaf's parent is automatic is the caller's concern.
#[must_use]
pub fn apply_fixed_dimensions(node: &Node, fixed: &FixedDimensions, limits: &SizeLimits) -> Node {
    let mut out = node.clone();
    out.set_size(pinned_size(node, fixed, limits));
    out
}

fn pinned_size(node: &Node, fixed: &FixedDimensions, limits: &SizeLimits) -> Size {
    let mut size = node.size();
    if node.node_type == NodeType::Leaf && !node.is_locked_as_is {
        if fixed.leaf_fixed_width {
            size.width = fixed.leaf_width;
        }
        if fixed.leaf_fixed_height {
            size.height = fixed.leaf_height;
        }
    }
    limits.clamp(size)
}

/// Size a packing strategy should use for `child`.
///
/// Children of automatic parents are pinned; children of manual parents keep
/// their own size.
#[must_use]
pub fn effective_size(child: &Node, parent_is_automatic: bool, config: &LayoutConfig) -> Size {
    if parent_is_automatic {
        pinned_size(child, &config.fixed_dimensions, &config.limits)
    } else {
        config.limits.clamp(child.size())
    }
}
