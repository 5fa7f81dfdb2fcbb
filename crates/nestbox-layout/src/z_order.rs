//! Stacking order for rendering.
//!
//! Z-indices are presentation only. Nothing in the layout engine reads them.

use rustc_hash::FxHashSet;

use crate::hierarchy::{ancestors, depth, is_leaf};
use crate::node::{NodeId, NodeSet};

const BASE_Z: i32 = 10;
const DEPTH_STEP: i32 = 10;
const DRAG_Z: i32 = 1000;
const RESIZE_Z: i32 = 900;
const SELECTED_PARENT_BUMP: i32 = 5;
const SELECTED_LEAF_BUMP: i32 = 100;

/// A node being dragged on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub node_id: NodeId,
}

/// A node being resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeState {
    pub node_id: NodeId,
}

/// A node being dragged onto a new parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyDragState {
    pub node_id: NodeId,
}

/// Pointer interaction in progress, as seen by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub selected: FxHashSet<NodeId>,
    pub drag: Option<DragState>,
    pub resize: Option<ResizeState>,
    pub hierarchy_drag: Option<HierarchyDragState>,
}

impl InteractionState {
    /// Nothing selected, nothing in flight.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Only `ids` selected.
    #[must_use]
    pub fn with_selection(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            selected: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    fn dragged(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.drag
            .map(|drag| drag.node_id)
            .into_iter()
            .chain(self.hierarchy_drag.map(|drag| drag.node_id))
    }

    fn is_busy(&self) -> bool {
        self.drag.is_some() || self.resize.is_some() || self.hierarchy_drag.is_some()
    }
}

/// Stacking value of `node_id`. Larger draws on top.
///
/// - dragged node and its descendants: `1000 + depth`;
/// - node being resized: `900 + depth`;
/// - selected while idle: base plus 5 for a parent, plus 100 for a leaf;
/// - otherwise the base, `10 + 10 * depth` (depth capped at 10).
#[must_use]
pub fn z_index(node_id: NodeId, nodes: &NodeSet, interaction: &InteractionState) -> i32 {
    let depth = depth(nodes, node_id) as i32;
    let base = BASE_Z + DEPTH_STEP * depth;

    let lineage = || std::iter::once(node_id).chain(ancestors(nodes, node_id));
    if interaction
        .dragged()
        .any(|dragged| lineage().any(|id| id == dragged))
    {
        return DRAG_Z + depth;
    }
    if interaction.resize.is_some_and(|resize| resize.node_id == node_id) {
        return RESIZE_Z + depth;
    }
    if !interaction.is_busy() && interaction.selected.contains(&node_id) {
        return if is_leaf(nodes, node_id) {
            base + SELECTED_LEAF_BUMP
        } else {
            base + SELECTED_PARENT_BUMP
        };
    }
    base
}

/// Node ids in drawing order: ascending z, ties in collection order.
#[must_use]
pub fn render_order(nodes: &NodeSet, interaction: &InteractionState) -> Vec<NodeId> {
    let mut keyed: Vec<(i32, usize, NodeId)> = nodes
        .iter()
        .enumerate()
        .map(|(slot, node)| (z_index(node.id, nodes, interaction), slot, node.id))
        .collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, _, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use nestbox_core::geometry::Rect;

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw).expect("test ID must be non-zero")
    }

    /// 1 ─ 2 ─ 3, plus a second root 4.
    fn chain() -> NodeSet {
        NodeSet::from_nodes(vec![
            Node::new(id(1), None, Rect::new(0, 0, 50, 50)),
            Node::new(id(2), Some(id(1)), Rect::new(1, 2, 20, 20)),
            Node::new(id(3), Some(id(2)), Rect::new(2, 4, 5, 5)),
            Node::new(id(4), None, Rect::new(60, 0, 10, 10)),
        ])
        .expect("valid nodes")
    }

    #[test]
    fn base_grows_with_depth() {
        let nodes = chain();
        let idle = InteractionState::idle();
        assert_eq!(z_index(id(1), &nodes, &idle), 10);
        assert_eq!(z_index(id(2), &nodes, &idle), 20);
        assert_eq!(z_index(id(3), &nodes, &idle), 30);
    }

    #[test]
    fn depth_is_capped() {
        let mut nodes = vec![Node::new(id(1), None, Rect::new(0, 0, 1, 1))];
        for raw in 2..=15 {
            nodes.push(Node::new(id(raw), Some(id(raw - 1)), Rect::new(0, 0, 1, 1)));
        }
        let nodes = NodeSet::from_nodes(nodes).expect("valid nodes");
        assert_eq!(z_index(id(15), &nodes, &InteractionState::idle()), 110);
    }

    #[test]
    fn drag_lifts_subtree() {
        let nodes = chain();
        let state = InteractionState {
            drag: Some(DragState { node_id: id(2) }),
            ..InteractionState::default()
        };
        assert_eq!(z_index(id(2), &nodes, &state), 1001);
        assert_eq!(z_index(id(3), &nodes, &state), 1002);
        assert_eq!(z_index(id(1), &nodes, &state), 10);

        let hierarchy = InteractionState {
            hierarchy_drag: Some(HierarchyDragState { node_id: id(3) }),
            ..InteractionState::default()
        };
        assert_eq!(z_index(id(3), &nodes, &hierarchy), 1002);
    }

    #[test]
    fn resize_lifts_node_only() {
        let nodes = chain();
        let state = InteractionState {
            resize: Some(ResizeState { node_id: id(2) }),
            ..InteractionState::default()
        };
        assert_eq!(z_index(id(2), &nodes, &state), 901);
        assert_eq!(z_index(id(3), &nodes, &state), 30);
    }

    #[test]
    fn selection_bump_depends_on_children() {
        let nodes = chain();
        let state = InteractionState::with_selection([id(2), id(3)]);
        assert_eq!(z_index(id(2), &nodes, &state), 25);
        assert_eq!(z_index(id(3), &nodes, &state), 130);

        let busy = InteractionState {
            resize: Some(ResizeState { node_id: id(4) }),
            ..state
        };
        assert_eq!(z_index(id(3), &nodes, &busy), 30);
    }

    #[test]
    fn render_order_sorts_by_z_then_collection_order() {
        let nodes = chain();
        let state = InteractionState::with_selection([id(1)]);
        assert_eq!(render_order(&nodes, &state), vec![id(4), id(1), id(2), id(3)]);
    }
}
