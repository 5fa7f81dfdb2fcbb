//! Hierarchy edits.
//!
//! Every operation takes the current collection by reference and returns an
//! edited copy that has already been through the cascade, so callers always
//! hold a settled layout. A rejected edit returns an [`EditError`] and leaves
//! nothing half-applied.

use std::collections::BTreeSet;
use std::fmt;

use nestbox_core::geometry::{Point, Rect, Size};

use crate::cascade::{fit_parent_to_children, translate_subtree, update_children_layout};
use crate::engine::LayoutContext;
use crate::free_space::{FreeSpaceOptions, calculate_free_space_position};
use crate::hierarchy::{
    children_index, derive_node_types, effective_parent, get_all_descendants, get_children,
    is_descendant_of, is_leaf,
};
use crate::min_size::{calculate_minimum_parent_size, minimum_size_for};
use crate::node::{LayoutPreferences, Node, NodeId, NodeSet, NodeSetError};

/// Why an edit was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    MissingNode { node_id: NodeId },
    SelfParent { node_id: NodeId },
    WouldCreateCycle { ancestor: NodeId, descendant: NodeId },
    TextLabelParent { node_id: NodeId },
    EmptySelection,
    MixedParents {
        first: Option<NodeId>,
        second: Option<NodeId>,
    },
    TextLabelInSelection { node_id: NodeId },
    NodeSet(NodeSetError),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNode { node_id } => write!(f, "node {node_id} does not exist"),
            Self::SelfParent { node_id } => write!(f, "node {node_id} cannot be its own parent"),
            Self::WouldCreateCycle {
                ancestor,
                descendant,
            } => write!(
                f,
                "cannot move {ancestor} under its own descendant {descendant}"
            ),
            Self::TextLabelParent { node_id } => {
                write!(f, "text label {node_id} cannot have children")
            }
            Self::EmptySelection => write!(f, "selection is empty"),
            Self::MixedParents { first, second } => write!(
                f,
                "selection spans different parents ({} and {})",
                describe_parent(*first),
                describe_parent(*second)
            ),
            Self::TextLabelInSelection { node_id } => {
                write!(f, "text label {node_id} cannot be part of a bulk edit")
            }
            Self::NodeSet(err) => write!(f, "{err}"),
        }
    }
}

fn describe_parent(parent: Option<NodeId>) -> String {
    parent.map_or_else(|| "root level".to_owned(), |id| id.to_string())
}

impl std::error::Error for EditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NodeSet(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NodeSetError> for EditError {
    fn from(err: NodeSetError) -> Self {
        Self::NodeSet(err)
    }
}

/// True if `child` may be moved under `new_parent` (`None` makes it a root).
///
/// Refused when the target is the node itself, one of its descendants, a
/// text label, or when either id is missing.
#[must_use]
pub fn can_reparent(nodes: &NodeSet, child: NodeId, new_parent: Option<NodeId>) -> bool {
    check_reparent(nodes, child, new_parent).is_ok()
}

/// [`can_reparent`] with the reason for a refusal.
pub fn check_reparent(
    nodes: &NodeSet,
    child: NodeId,
    new_parent: Option<NodeId>,
) -> Result<(), EditError> {
    require(nodes, child)?;
    let Some(parent_id) = new_parent else {
        return Ok(());
    };
    if parent_id == child {
        return Err(EditError::SelfParent { node_id: child });
    }
    let parent = require(nodes, parent_id)?;
    if is_descendant_of(nodes, parent_id, child) {
        return Err(EditError::WouldCreateCycle {
            ancestor: child,
            descendant: parent_id,
        });
    }
    if parent.is_text_label {
        return Err(EditError::TextLabelParent { node_id: parent_id });
    }
    Ok(())
}

fn require(nodes: &NodeSet, id: NodeId) -> Result<&Node, EditError> {
    nodes.get(id).ok_or(EditError::MissingNode { node_id: id })
}

/// Move `child` (with its subtree) under `new_parent`.
///
/// Under an automatic parent the cascade packs the node (pinning it if it is
/// a leaf) and grows the parent as needed. Under a manual parent the node is
/// dropped into free space. The old parent is re-fitted if it packs its
/// children automatically. Descendants follow the node's own displacement.
pub fn reparent(
    nodes: &NodeSet,
    child: NodeId,
    new_parent: Option<NodeId>,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let _span =
        tracing::debug_span!("reparent", child = %child, new_parent = ?new_parent).entered();
    check_reparent(nodes, child, new_parent)?;

    let old_parent = nodes.get(child).and_then(|node| effective_parent(nodes, node));
    if old_parent == new_parent {
        return Ok(update_children_layout(nodes, cx));
    }

    let mut out = nodes.clone();
    if let Some(node) = out.get_mut(child) {
        node.parent_id = new_parent;
    }
    derive_node_types(&mut out);

    if let Some(parent_id) = new_parent
        && out.get(parent_id).is_some_and(|parent| !parent.is_automatic())
    {
        out = insert_into_manual_parent(&out, parent_id, child, cx);
    }

    let out = match old_parent {
        Some(old) if out.get(old).is_some_and(Node::is_automatic) => {
            fit_parent_to_children(&out, old, cx)
        }
        _ => update_children_layout(&out, cx),
    };
    tracing::debug!(from = ?old_parent, "reparented");
    Ok(out)
}

/// Two-pass free-space insertion of `child` (already parented) into the
/// manual parent `parent_id`.
///
/// The first pass may pick a slot outside the interior; the parent grows to
/// contain it and the cascade settles the ancestors. The second pass searches
/// again inside the grown parent, which may find a tidier in-bounds slot.
fn insert_into_manual_parent(
    nodes: &NodeSet,
    parent_id: NodeId,
    child: NodeId,
    cx: LayoutContext<'_>,
) -> NodeSet {
    let seed = cx.config.free_space_seed;
    let mut out = nodes.clone();
    for allow_growth in [true, false] {
        let options = FreeSpaceOptions { allow_growth, seed };
        if let Some(position) = free_space_for(&out, parent_id, child, options, cx) {
            move_subtree_to(&mut out, child, position);
        }
        grow_manual_parent(&mut out, parent_id, cx);
        out = update_children_layout(&out, cx);
    }
    out
}

fn free_space_for(
    nodes: &NodeSet,
    parent_id: NodeId,
    child: NodeId,
    options: FreeSpaceOptions,
    cx: LayoutContext<'_>,
) -> Option<Point> {
    let parent = nodes.get(parent_id)?;
    let size = nodes.get(child)?.size();
    let siblings: Vec<&Node> = get_children(nodes, parent_id)
        .into_iter()
        .filter(|sibling| sibling.id != child)
        .collect();
    let placement =
        calculate_free_space_position(parent, &siblings, size, &cx.config.margins, options);
    Some(placement.position)
}

/// Put `id` at `position`, dragging its descendants along.
fn move_subtree_to(out: &mut NodeSet, id: NodeId, position: Point) {
    let Some(node) = out.get(id) else {
        return;
    };
    let dx = position.x.saturating_sub(node.x);
    let dy = position.y.saturating_sub(node.y);
    translate_with_subtree(out, id, dx, dy);
}

fn translate_with_subtree(out: &mut NodeSet, id: NodeId, dx: i32, dy: i32) {
    if dx == 0 && dy == 0 {
        return;
    }
    if let Some(node) = out.get_mut(id) {
        node.translate(dx, dy);
    }
    let index = children_index(out);
    translate_subtree(out, &index, id, dx, dy);
}

/// Grow an unlocked manual parent so every child sits inside its interior.
/// The cascade never resizes manual parents, so edits that place children
/// under one call this.
fn grow_manual_parent(out: &mut NodeSet, parent_id: NodeId, cx: LayoutContext<'_>) {
    let Some(parent) = out.get(parent_id) else {
        return;
    };
    if parent.is_automatic() || parent.is_locked_as_is {
        return;
    }
    let current = parent.size();
    let children = get_children(out, parent_id);
    let size = current.max(minimum_size_for(parent, &children, cx));
    if size != current
        && let Some(node) = out.get_mut(parent_id)
    {
        tracing::trace!(
            node = %parent_id,
            to_w = size.width,
            to_h = size.height,
            "grew manual parent"
        );
        node.set_size(size);
    }
}

/// A node to be created by [`add_node`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNode {
    pub parent: Option<NodeId>,
    /// Only honored for roots; children are placed by their parent.
    pub position: Option<Point>,
    /// Defaults to the configured new-leaf size.
    pub size: Option<Size>,
    pub label: String,
    pub is_text_label: bool,
}

impl NewNode {
    /// A root at `position`.
    #[must_use]
    pub fn root(position: Point, size: Size) -> Self {
        Self {
            position: Some(position),
            size: Some(size),
            ..Self::default()
        }
    }

    /// A default-sized child of `parent`.
    #[must_use]
    pub fn child(parent: NodeId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn text_label(mut self) -> Self {
        self.is_text_label = true;
        self
    }
}

/// Create a node and settle the layout around it. Returns the new id.
///
/// A root without an explicit position goes right of the rightmost root. A
/// child of an automatic parent is packed and its ancestors grow (they never
/// shrink here). A child of a manual parent is dropped into free space.
pub fn add_node(
    nodes: &NodeSet,
    new_node: NewNode,
    cx: LayoutContext<'_>,
) -> Result<(NodeSet, NodeId), EditError> {
    let _span = tracing::debug_span!("add_node", parent = ?new_node.parent).entered();
    let config = cx.config;

    let parent = match new_node.parent {
        Some(parent_id) => {
            let parent = require(nodes, parent_id)?;
            if parent.is_text_label {
                return Err(EditError::TextLabelParent { node_id: parent_id });
            }
            Some(parent)
        }
        None => None,
    };

    let size = config
        .limits
        .clamp(new_node.size.unwrap_or_else(|| config.new_leaf_size()));
    let origin = match parent {
        Some(parent) => {
            let interior = parent.bounds().inner(config.margins.insets());
            Point::new(interior.x, interior.y)
        }
        None => new_node
            .position
            .unwrap_or_else(|| next_root_position(nodes, config.margins.margin)),
    };
    let manual_parent = parent.filter(|p| !p.is_automatic()).map(|p| p.id);

    let mut out = nodes.clone();
    let id = out.allocate_id()?;
    let mut node = Node::new(id, new_node.parent, Rect::from_origin_size(origin, size))
        .with_label(new_node.label);
    node.is_text_label = new_node.is_text_label;
    out.insert(node)?;
    derive_node_types(&mut out);

    let out = match manual_parent {
        Some(parent_id) => insert_into_manual_parent(&out, parent_id, id, cx),
        None => update_children_layout(&out, cx),
    };
    tracing::debug!(node = %id, "added node");
    Ok((out, id))
}

fn next_root_position(nodes: &NodeSet, margin: i32) -> Point {
    nodes
        .iter()
        .filter(|node| effective_parent(nodes, node).is_none())
        .max_by_key(|node| node.bounds().right())
        .map_or(Point::ZERO, |rightmost| {
            Point::new(rightmost.bounds().right().saturating_add(margin), rightmost.y)
        })
}

/// Delete `id` and its whole subtree. Remaining parents keep their size.
pub fn remove_node(
    nodes: &NodeSet,
    id: NodeId,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let _span = tracing::debug_span!("remove_node", node = %id).entered();
    require(nodes, id)?;

    let mut doomed: BTreeSet<NodeId> = get_all_descendants(nodes, id).into_iter().collect();
    let _ = doomed.insert(id);
    let mut out = nodes.clone();
    let removed = out.remove_all(&doomed);
    tracing::debug!(count = removed.len(), "removed subtree");
    derive_node_types(&mut out);
    Ok(update_children_layout(&out, cx))
}

/// Shift `id` and its subtree by a grid delta, without re-running the cascade.
///
/// A child of a manual parent is kept inside the parent's interior.
pub(crate) fn shift_node(
    out: &mut NodeSet,
    id: NodeId,
    dx: i32,
    dy: i32,
    cx: LayoutContext<'_>,
) -> Result<(), EditError> {
    let node = require(out, id)?;
    let target = node.bounds().translate(dx, dy);
    let clamped = match effective_parent(out, node).and_then(|parent_id| out.get(parent_id)) {
        Some(parent) if !parent.is_automatic() => {
            clamp_into(target, parent.bounds().inner(cx.config.margins.insets()))
        }
        _ => target,
    };
    let (dx, dy) = (clamped.x.saturating_sub(node.x), clamped.y.saturating_sub(node.y));
    translate_with_subtree(out, id, dx, dy);
    Ok(())
}

/// Slide `rect` (keeping its size) so it lies inside `interior` where possible.
fn clamp_into(rect: Rect, interior: Rect) -> Rect {
    let max_x = interior.right().saturating_sub(rect.width).max(interior.x);
    let max_y = interior.bottom().saturating_sub(rect.height).max(interior.y);
    Rect::new(
        rect.x.clamp(interior.x, max_x),
        rect.y.clamp(interior.y, max_y),
        rect.width,
        rect.height,
    )
}

/// Move `id` by `(dx, dy)` grid units.
///
/// Children of manual parents are clamped to the interior. Children of
/// automatic parents snap back to their packed slot when the cascade runs;
/// only roots and children of manual parents move freely.
pub fn move_node(
    nodes: &NodeSet,
    id: NodeId,
    dx: i32,
    dy: i32,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let _span = tracing::debug_span!("move_node", node = %id, dx, dy).entered();
    let mut out = nodes.clone();
    shift_node(&mut out, id, dx, dy, cx)?;
    Ok(update_children_layout(&out, cx))
}

/// [`move_node`] with a pointer delta in pixels.
pub fn move_node_by_pixels(
    nodes: &NodeSet,
    id: NodeId,
    dx: f64,
    dy: f64,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let config = cx.config;
    move_node(nodes, id, config.pixels_to_grid(dx), config.pixels_to_grid(dy), cx)
}

/// Set the size of `id`.
///
/// A parent cannot be made smaller than its minimum size. A child of a
/// manual parent is capped at the room left in that parent's interior; the
/// parent itself keeps its bounds.
pub fn resize_node(
    nodes: &NodeSet,
    id: NodeId,
    size: Size,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let _span =
        tracing::debug_span!("resize_node", node = %id, w = size.width, h = size.height)
            .entered();
    let node = require(nodes, id)?;

    let limits = &cx.config.limits;
    let mut requested = limits.clamp(size);
    if let Some(room) = effective_parent(nodes, node)
        .and_then(|parent_id| nodes.get(parent_id))
        .filter(|parent| !parent.is_automatic())
        .map(|parent| {
            let interior = parent.bounds().inner(cx.config.margins.insets());
            Size::new(
                interior.right().saturating_sub(node.x),
                interior.bottom().saturating_sub(node.y),
            )
        })
    {
        requested = limits.clamp(requested.min(room));
    }
    let size = if is_leaf(nodes, id) {
        requested
    } else {
        requested.max(calculate_minimum_parent_size(nodes, id, cx).unwrap_or(Size::ZERO))
    };

    let mut out = nodes.clone();
    if let Some(node) = out.get_mut(id) {
        node.set_size(size);
    }
    Ok(update_children_layout(&out, cx))
}

fn update_flag(
    nodes: &NodeSet,
    id: NodeId,
    cx: LayoutContext<'_>,
    apply: impl FnOnce(&mut Node),
) -> Result<NodeSet, EditError> {
    let mut out = nodes.clone();
    let node = out.get_mut(id).ok_or(EditError::MissingNode { node_id: id })?;
    apply(node);
    derive_node_types(&mut out);
    Ok(update_children_layout(&out, cx))
}

/// Toggle manual positioning of `id`'s children.
///
/// Enabling keeps the children where they are. Disabling hands them back to
/// the packing strategy.
pub fn set_manual_positioning(
    nodes: &NodeSet,
    id: NodeId,
    enabled: bool,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    let _span = tracing::debug_span!("set_manual_positioning", node = %id, enabled).entered();
    update_flag(nodes, id, cx, |node| node.is_manual_positioning_enabled = enabled)
}

/// Freeze or unfreeze `id`'s size against auto-fit.
pub fn set_locked_as_is(
    nodes: &NodeSet,
    id: NodeId,
    locked: bool,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    update_flag(nodes, id, cx, |node| node.is_locked_as_is = locked)
}

pub fn set_layout_preferences(
    nodes: &NodeSet,
    id: NodeId,
    preferences: LayoutPreferences,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    update_flag(nodes, id, cx, |node| node.layout_preferences = preferences)
}

/// Mark `id` as a text label. A node with children cannot become one.
pub fn set_text_label(
    nodes: &NodeSet,
    id: NodeId,
    is_text_label: bool,
    cx: LayoutContext<'_>,
) -> Result<NodeSet, EditError> {
    require(nodes, id)?;
    if is_text_label && !is_leaf(nodes, id) {
        return Err(EditError::TextLabelParent { node_id: id });
    }
    update_flag(nodes, id, cx, |node| node.is_text_label = is_text_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::GridLayout;
    use crate::config::{FixedDimensions, LayoutConfig};
    use crate::node::NodeType;

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw).expect("test ID must be non-zero")
    }

    fn config() -> LayoutConfig {
        let mut config = LayoutConfig::default();
        config.margins.margin = 2;
        config.margins.label_margin = 2;
        config.fixed_dimensions = FixedDimensions::both(20, 10);
        config
    }

    fn node(raw: u64, parent: Option<u64>, bounds: Rect) -> Node {
        Node::new(id(raw), parent.map(id), bounds)
    }

    /// 1 ─┬─ 2 ─ 4
    ///    └─ 3
    fn tree() -> NodeSet {
        NodeSet::from_nodes(vec![
            node(1, None, Rect::new(0, 0, 100, 60)),
            node(2, Some(1), Rect::new(2, 2, 40, 30)),
            node(3, Some(1), Rect::new(50, 2, 20, 10)),
            node(4, Some(2), Rect::new(4, 4, 20, 10)),
        ])
        .expect("valid nodes")
    }

    fn bounds(nodes: &NodeSet, raw: u64) -> Rect {
        nodes.get(id(raw)).expect("node exists").bounds()
    }

    #[test]
    fn guard_rejects_self_and_descendants() {
        let nodes = tree();
        assert!(!can_reparent(&nodes, id(2), Some(id(2))));
        assert!(!can_reparent(&nodes, id(1), Some(id(4))));
        assert!(!can_reparent(&nodes, id(9), Some(id(1))));
        assert!(!can_reparent(&nodes, id(3), Some(id(9))));
        assert!(can_reparent(&nodes, id(3), Some(id(2))));
        assert!(can_reparent(&nodes, id(4), None));
        assert_eq!(
            check_reparent(&nodes, id(2), Some(id(4))),
            Err(EditError::WouldCreateCycle {
                ancestor: id(2),
                descendant: id(4)
            })
        );
    }

    #[test]
    fn guard_rejects_text_label_target() {
        let mut nodes = tree();
        if let Some(label) = nodes.get_mut(id(3)) {
            label.is_text_label = true;
        }
        assert_eq!(
            check_reparent(&nodes, id(4), Some(id(3))),
            Err(EditError::TextLabelParent { node_id: id(3) })
        );
    }

    #[test]
    fn reparent_refusal_leaves_input_alone() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let nodes = tree();
        let before = nodes.clone();
        assert!(reparent(&nodes, id(1), Some(id(2)), cx).is_err());
        assert_eq!(nodes, before);
    }

    #[test]
    fn reparent_into_automatic_parent() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let out = reparent(&tree(), id(3), Some(id(2)), cx).expect("legal reparent");

        assert_eq!(out.get(id(3)).and_then(|n| n.parent_id), Some(id(2)));
        let parent = bounds(&out, 2);
        let interior = parent.inner(config.margins.insets());
        for child in [3, 4] {
            assert!(interior.contains_rect(&bounds(&out, child)), "child {child} escapes");
        }
        assert!(!bounds(&out, 3).expand(2).intersects(&bounds(&out, 4)));
    }

    #[test]
    fn reparent_into_manual_parent_uses_free_space() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let mut nodes = tree();
        if let Some(parent) = nodes.get_mut(id(2)) {
            parent.is_manual_positioning_enabled = true;
        }
        let nodes = update_children_layout(&nodes, cx);
        let out = reparent(&nodes, id(3), Some(id(2)), cx).expect("legal reparent");

        let interior = bounds(&out, 2).inner(config.margins.insets());
        assert!(interior.contains_rect(&bounds(&out, 3)));
        assert!(!bounds(&out, 3).expand(2).intersects(&bounds(&out, 4)));
    }

    #[test]
    fn add_root_goes_right_of_existing_roots() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let (out, first) = add_node(&NodeSet::new(), NewNode::default(), cx).expect("add");
        assert_eq!(bounds(&out, first.get()).origin(), Point::ZERO);
        let (out, second) = add_node(&out, NewNode::default(), cx).expect("add");
        let first_right = bounds(&out, first.get()).right();
        assert_eq!(bounds(&out, second.get()).x, first_right + 2);
        assert_eq!(out.get(second).map(|n| n.node_type), Some(NodeType::Root));
    }

    #[test]
    fn add_child_to_text_label_fails() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let (out, label) =
            add_node(&NodeSet::new(), NewNode::default().text_label(), cx).expect("add");
        assert_eq!(
            add_node(&out, NewNode::child(label), cx).map(|(_, id)| id),
            Err(EditError::TextLabelParent { node_id: label })
        );
        assert_eq!(
            add_node(&out, NewNode::child(id(99)), cx).map(|(_, id)| id),
            Err(EditError::MissingNode { node_id: id(99) })
        );
    }

    #[test]
    fn add_child_to_manual_parent_avoids_siblings() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let mut nodes = tree();
        if let Some(parent) = nodes.get_mut(id(1)) {
            parent.is_manual_positioning_enabled = true;
        }
        let (out, new_id) = add_node(&nodes, NewNode::child(id(1)), cx).expect("add");
        let new_bounds = bounds(&out, new_id.get());
        for sibling in [2, 3] {
            assert!(!new_bounds.expand(2).intersects(&bounds(&out, sibling)));
        }
        let interior = bounds(&out, 1).inner(config.margins.insets());
        assert!(interior.contains_rect(&new_bounds));
    }

    #[test]
    fn remove_deletes_subtree() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let out = remove_node(&tree(), id(2), cx).expect("remove");
        assert!(!out.contains(id(2)));
        assert!(!out.contains(id(4)));
        assert_eq!(out.len(), 2);
        assert_eq!(
            remove_node(&out, id(2), cx),
            Err(EditError::MissingNode { node_id: id(2) })
        );
    }

    #[test]
    fn move_in_manual_parent_is_clamped() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let mut nodes = tree();
        if let Some(parent) = nodes.get_mut(id(1)) {
            parent.is_manual_positioning_enabled = true;
        }
        let out = move_node(&nodes, id(3), 500, -500, cx).expect("move");
        // Interior is x in [2, 98), y in [2, 58); node 3 is 20x10.
        assert_eq!(bounds(&out, 3), Rect::new(78, 2, 20, 10));
    }

    #[test]
    fn move_by_pixels_converts_to_grid() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let out = move_node_by_pixels(&tree(), id(1), 41.0, -19.0, cx).expect("move");
        let before = update_children_layout(&tree(), cx);
        assert_eq!(bounds(&out, 1).origin(), Point::new(2, -1));
        assert_eq!(bounds(&out, 4).x, bounds(&before, 4).x + 2);
    }

    #[test]
    fn resize_respects_parent_minimum() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let out = resize_node(&tree(), id(2), Size::new(1, 1), cx).expect("resize");
        assert_eq!(bounds(&out, 2).size(), Size::new(24, 14));
    }

    #[test]
    fn resize_in_manual_parent_keeps_parent_bounds() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        let mut nodes = tree();
        if let Some(parent) = nodes.get_mut(id(1)) {
            parent.is_manual_positioning_enabled = true;
        }

        let out = resize_node(&nodes, id(3), Size::new(200, 200), cx).expect("resize");
        assert_eq!(bounds(&out, 1), Rect::new(0, 0, 100, 60));
        // Capped at the interior's right and bottom edges: x < 98, y < 58.
        assert_eq!(bounds(&out, 3), Rect::new(50, 2, 48, 56));

        let out = resize_node(&nodes, id(3), Size::new(10, 5), cx).expect("resize");
        assert_eq!(bounds(&out, 1), Rect::new(0, 0, 100, 60));
        assert_eq!(bounds(&out, 3).size(), Size::new(10, 5));
    }

    #[test]
    fn text_label_with_children_is_rejected() {
        let config = config();
        let cx = LayoutContext::new(&config, &GridLayout);
        assert_eq!(
            set_text_label(&tree(), id(2), true, cx),
            Err(EditError::TextLabelParent { node_id: id(2) })
        );
        let out = set_text_label(&tree(), id(3), true, cx).expect("leaf can be a label");
        assert_eq!(out.get(id(3)).map(|n| n.node_type), Some(NodeType::TextLabel));
    }

    #[test]
    fn error_display() {
        let err = EditError::MixedParents {
            first: Some(id(1)),
            second: None,
        };
        assert_eq!(
            err.to_string(),
            "selection spans different parents (n1 and root level)"
        );
    }
}
