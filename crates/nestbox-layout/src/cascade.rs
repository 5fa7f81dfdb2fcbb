//! Cascading re-layout.
//!
//! One call settles the whole collection in two passes over a precomputed
//! roots-to-leaves order:
//!
//! 1. **Sizing, leaves first.** Leaves under automatic parents are pinned to
//!    the fixed dimensions. Every automatic, unlocked parent grows to its
//!    minimum size (it never shrinks here). Because child sizes are final
//!    before their parent is visited, one pass suffices.
//! 2. **Placement, roots first.** Each sibling group under an automatic,
//!    unlocked parent is packed into the parent's interior. A child that
//!    moves drags its whole subtree along by the same delta, so manual
//!    descendants keep their relative arrangement.
//!
//! Nodes on a parent cycle are unreachable from any root and are left
//! untouched. The result is a fixed point: running the cascade on its own
//! output changes nothing.

use nestbox_core::geometry::{Rect, Size};
use rustc_hash::FxHashMap;

use crate::algorithm::calculate_child_layout;
use crate::engine::LayoutContext;
use crate::fixed::apply_fixed_dimensions;
use crate::hierarchy::{
    ancestors, children_index, derive_node_types, descendants_with_index, topological_order,
};
use crate::min_size::{calculate_minimum_parent_size, extent_size, minimum_size_for};
use crate::node::{Node, NodeId, NodeSet};

/// What one cascade changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeStats {
    /// Parents grown during sizing.
    pub resized: usize,
    /// Children whose bounds changed during placement.
    pub moved: usize,
    /// Sibling groups left alone because their parent is manual or locked.
    pub skipped_groups: usize,
    /// Nodes skipped because they sit on or under a parent cycle.
    pub unreachable: usize,
}

impl CascadeStats {
    /// True if the cascade changed no geometry.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.resized == 0 && self.moved == 0
    }
}

/// Re-derive node types, size every automatic parent and re-pack its children.
#[must_use]
pub fn update_children_layout(nodes: &NodeSet, cx: LayoutContext<'_>) -> NodeSet {
    update_children_layout_with_stats(nodes, cx).0
}

/// [`update_children_layout`], also reporting what changed.
#[must_use]
pub fn update_children_layout_with_stats(
    nodes: &NodeSet,
    cx: LayoutContext<'_>,
) -> (NodeSet, CascadeStats) {
    let _span = tracing::debug_span!("cascade", nodes = nodes.len()).entered();

    let mut out = nodes.clone();
    derive_node_types(&mut out);
    let topo = topological_order(&out);
    let index = children_index(&out);
    let mut stats = CascadeStats {
        unreachable: topo.unreachable.len(),
        ..CascadeStats::default()
    };

    for &id in topo.order.iter().rev() {
        if size_parent(&mut out, &index, id, cx) {
            stats.resized += 1;
        }
    }

    for &id in &topo.order {
        let Some(children) = index.get(&id) else {
            continue;
        };
        let Some(parent) = out.get(id).cloned() else {
            continue;
        };
        if !parent.is_automatic() || parent.is_locked_as_is {
            stats.skipped_groups += 1;
            continue;
        }
        stats.moved += place_children(&mut out, &index, parent, children, cx);
    }

    tracing::debug!(
        resized = stats.resized,
        moved = stats.moved,
        skipped_groups = stats.skipped_groups,
        unreachable = stats.unreachable,
        "cascade complete"
    );
    (out, stats)
}

/// Pin the leaves under `id` and grow `id` to fit them. Returns true if `id`
/// was resized.
fn size_parent(
    out: &mut NodeSet,
    index: &FxHashMap<NodeId, Vec<NodeId>>,
    id: NodeId,
    cx: LayoutContext<'_>,
) -> bool {
    let Some(children) = index.get(&id) else {
        return false;
    };
    let Some(parent) = out.get(id).cloned() else {
        return false;
    };
    if !parent.is_automatic() || parent.is_locked_as_is {
        return false;
    }

    let config = cx.config;
    for &child_id in children {
        if let Some(child) = out.get_mut(child_id) {
            let pinned = apply_fixed_dimensions(child, &config.fixed_dimensions, &config.limits);
            child.set_size(pinned.size());
        }
    }

    let child_refs: Vec<&Node> = children.iter().filter_map(|&c| out.get(c)).collect();
    let min = minimum_size_for(&parent, &child_refs, cx);
    let mut grown = parent.clone();
    grown.set_size(parent.size().max(min));

    // Packing can still spill past the strategy's estimate; cover the extent.
    let packed: Vec<Rect> = calculate_child_layout(&grown, &child_refs, cx)
        .into_iter()
        .map(|placement| placement.bounds)
        .collect();
    let extent = extent_size(grown.bounds(), &packed, config.margins.margin);
    let size: Size = grown.size().max(extent);

    if size == parent.size() {
        return false;
    }
    tracing::trace!(
        node = %id,
        from_w = parent.w,
        from_h = parent.h,
        to_w = size.width,
        to_h = size.height,
        "grew parent"
    );
    if let Some(node) = out.get_mut(id) {
        node.set_size(size);
    }
    true
}

/// Pack `children` into `parent` and move each child's subtree with it.
/// Returns how many children changed bounds.
fn place_children(
    out: &mut NodeSet,
    index: &FxHashMap<NodeId, Vec<NodeId>>,
    parent: Node,
    children: &[NodeId],
    cx: LayoutContext<'_>,
) -> usize {
    let placements = {
        let child_refs: Vec<&Node> = children.iter().filter_map(|&c| out.get(c)).collect();
        calculate_child_layout(&parent, &child_refs, cx)
    };

    let mut moved = 0;
    for placement in placements {
        let Some(child) = out.get_mut(placement.id) else {
            continue;
        };
        let old = child.bounds();
        if old == placement.bounds {
            continue;
        }
        child.set_bounds(placement.bounds);
        moved += 1;

        let dx = placement.bounds.x.saturating_sub(old.x);
        let dy = placement.bounds.y.saturating_sub(old.y);
        tracing::trace!(node = %placement.id, dx, dy, "placed child");
        if dx != 0 || dy != 0 {
            translate_subtree(out, index, placement.id, dx, dy);
        }
    }
    moved
}

/// Shift every descendant of `id` (not `id` itself) by `(dx, dy)`.
pub(crate) fn translate_subtree(
    out: &mut NodeSet,
    index: &FxHashMap<NodeId, Vec<NodeId>>,
    id: NodeId,
    dx: i32,
    dy: i32,
) {
    for descendant in descendants_with_index(index, id) {
        if let Some(node) = out.get_mut(descendant) {
            node.translate(dx, dy);
        }
    }
}

/// Resize `parent_id` to exactly its minimum size, then re-run the cascade.
///
/// Unlike the cascade itself this may shrink the parent. Locked parents keep
/// their size. A missing parent yields an unchanged copy.
#[must_use]
pub fn fit_parent_to_children(
    nodes: &NodeSet,
    parent_id: NodeId,
    cx: LayoutContext<'_>,
) -> NodeSet {
    let _span = tracing::debug_span!("fit_parent_to_children", parent = %parent_id).entered();

    let Some(parent) = nodes.get(parent_id) else {
        tracing::debug!("parent not found; nothing to fit");
        return nodes.clone();
    };
    if parent.is_locked_as_is {
        return update_children_layout(nodes, cx);
    }

    // Settle the subtree first so nested parents report their real sizes.
    let mut out = update_children_layout(nodes, cx);
    if let Some(min) = calculate_minimum_parent_size(&out, parent_id, cx)
        && let Some(node) = out.get_mut(parent_id)
    {
        tracing::trace!(to_w = min.width, to_h = min.height, "fit parent");
        node.set_size(min);
    }
    update_children_layout(&out, cx)
}

/// Fit `parent_id`, then its parent, and so on up to the root.
#[must_use]
pub fn fit_parent_to_children_recursive(
    nodes: &NodeSet,
    parent_id: NodeId,
    cx: LayoutContext<'_>,
) -> NodeSet {
    if !nodes.contains(parent_id) {
        return nodes.clone();
    }
    let mut chain = vec![parent_id];
    chain.extend(ancestors(nodes, parent_id));

    let mut out = nodes.clone();
    for id in chain {
        out = fit_parent_to_children(&out, id, cx);
    }
    out
}
