//! Edits over a selection of sibling nodes.

use std::collections::BTreeSet;

use nestbox_core::geometry::Rect;

use crate::cascade::update_children_layout;
use crate::edit::{EditError, remove_node, shift_node};
use crate::engine::LayoutContext;
use crate::hierarchy::effective_parent;
use crate::node::{NodeId, NodeSet};

/// Edge or center line to align a selection on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    const fn start(self, rect: &Rect) -> i32 {
        match self {
            Self::Horizontal => rect.x,
            Self::Vertical => rect.y,
        }
    }

    const fn extent(self, rect: &Rect) -> i32 {
        match self {
            Self::Horizontal => rect.width,
            Self::Vertical => rect.height,
        }
    }
}

/// Check that `ids` is a non-empty set of existing, non-label siblings and
/// return their shared parent (`None` for roots).
pub fn validate_selection(nodes: &NodeSet, ids: &[NodeId]) -> Result<Option<NodeId>, EditError> {
    let mut shared: Option<Option<NodeId>> = None;
    for &id in ids {
        let node = nodes.get(id).ok_or(EditError::MissingNode { node_id: id })?;
        if node.is_text_label {
            return Err(EditError::TextLabelInSelection { node_id: id });
        }
        let parent = effective_parent(nodes, node);
        match shared {
            None => shared = Some(parent),
            Some(first) if first != parent => {
                return Err(EditError::MixedParents {
                    first,
                    second: parent,
                });
            }
            Some(_) => {}
        }
    }
    shared.ok_or(EditError::EmptySelection)
}

fn clamp_to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Delta that centers `[start, start + extent)` on `[outer, outer + span)`.
fn centered(outer: i32, span: i32, start: i32, extent: i32) -> i32 {
    let target = i64::from(outer) + (i64::from(span) - i64::from(extent)) / 2;
    clamp_to_i32(target - i64::from(start))
}

fn unique(ids: &[NodeId]) -> Vec<NodeId> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Shift every selected node by the same grid delta.
pub fn move_nodes(
    nodes: &NodeSet,
    ids: &[NodeId],
    dx: i32,
    dy: i32,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let _span = tracing::debug_span!("move_nodes", count = ids.len(), dx, dy).entered();
    validate_selection(nodes, ids)?;
    let mut out = nodes.clone();
    for id in unique(ids) {
        shift_node(&mut out, id, dx, dy, cx)?;
    }
    Ok(update_children_layout(&out, cx))
}

/// Delete every selected node with its subtree.
pub fn remove_nodes(
    nodes: &NodeSet,
    ids: &[NodeId],
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let _span = tracing::debug_span!("remove_nodes", count = ids.len()).entered();
    validate_selection(nodes, ids)?;
    let mut out = nodes.clone();
    for id in unique(ids) {
        out = remove_node(&out, id, cx)?;
    }
    Ok(out)
}

/// Line the selection up on one edge or center line of its bounding box.
///
/// Under an automatic parent the cascade re-packs the siblings afterwards, so
/// alignment is only visible for roots and children of manual parents.
pub fn align_nodes(
    nodes: &NodeSet,
    ids: &[NodeId],
    alignment: Alignment,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let _span = tracing::debug_span!("align_nodes", count = ids.len(), ?alignment).entered();
    validate_selection(nodes, ids)?;
    let ids = unique(ids);
    let rects: Vec<Rect> = ids
        .iter()
        .filter_map(|&id| nodes.get(id).map(|node| node.bounds()))
        .collect();
    let Some(bounds) = Rect::bounding(&rects) else {
        return Ok(nodes.clone());
    };

    let mut out = nodes.clone();
    for (id, rect) in ids.into_iter().zip(rects) {
        let (dx, dy) = match alignment {
            Alignment::Left => (bounds.x.saturating_sub(rect.x), 0),
            Alignment::Center => (centered(bounds.x, bounds.width, rect.x, rect.width), 0),
            Alignment::Right => (bounds.right().saturating_sub(rect.right()), 0),
            Alignment::Top => (0, bounds.y.saturating_sub(rect.y)),
            Alignment::Middle => (0, centered(bounds.y, bounds.height, rect.y, rect.height)),
            Alignment::Bottom => (0, bounds.bottom().saturating_sub(rect.bottom())),
        };
        shift_node(&mut out, id, dx, dy, cx)?;
    }
    Ok(update_children_layout(&out, cx))
}

/// Spread the selection so the gaps between neighbours along `axis` are
/// equal. The outermost two nodes stay put; fewer than three nodes is a no-op.
pub fn distribute_nodes(
    nodes: &NodeSet,
    ids: &[NodeId],
    axis: Axis,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let _span = tracing::debug_span!("distribute_nodes", count = ids.len(), ?axis).entered();
    validate_selection(nodes, ids)?;
    let mut items: Vec<(NodeId, Rect)> = unique(ids)
        .into_iter()
        .filter_map(|id| nodes.get(id).map(|node| (id, node.bounds())))
        .collect();
    if items.len() < 3 {
        return Ok(update_children_layout(nodes, cx));
    }

    // Coordinates are unbounded, so the span math runs in i64.
    let start = |rect: &Rect| i64::from(axis.start(rect));
    let extent = |rect: &Rect| i64::from(axis.extent(rect));
    items.sort_by_key(|(id, rect)| (start(rect), *id));

    let (first, last) = (items[0].1, items[items.len() - 1].1);
    let span = start(&last) + extent(&last) - start(&first);
    let occupied: i64 = items.iter().map(|(_, rect)| extent(rect)).sum();
    let gaps = (items.len() - 1) as i64;
    let gap = (span - occupied) / gaps;

    let mut out = nodes.clone();
    let mut cursor = start(&first) + extent(&first) + gap;
    for (id, rect) in &items[1..items.len() - 1] {
        let delta = clamp_to_i32(cursor - start(rect));
        match axis {
            Axis::Horizontal => shift_node(&mut out, *id, delta, 0, cx)?,
            Axis::Vertical => shift_node(&mut out, *id, 0, delta, cx)?,
        }
        cursor += extent(rect) + gap;
    }
    Ok(update_children_layout(&out, cx))
}
