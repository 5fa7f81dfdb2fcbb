//! Engine facade.
//!
//! [`LayoutEngine`] owns a validated [`LayoutConfig`] and the active packing
//! strategy. Every operation borrows both through a [`LayoutContext`], so the
//! free functions in the other modules can be driven with any configuration
//! without touching process-wide state.

use nestbox_core::geometry::Size;

use crate::algorithm::{ChildLayoutAlgorithm, algorithm_for};
use crate::bulk::{self, Alignment, Axis};
use crate::cascade::{self, CascadeStats};
use crate::config::{ConfigError, LayoutAlgorithmType, LayoutConfig};
use crate::edit::{self, EditError, NewNode};
use crate::min_size;
use crate::node::{LayoutPreferences, NodeId, NodeSet};
use crate::z_order::{self, InteractionState};

/// Borrowed configuration and strategy handed to every layout operation.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    pub config: &'a LayoutConfig,
    pub algorithm: &'a dyn ChildLayoutAlgorithm,
}

impl<'a> LayoutContext<'a> {
    #[must_use]
    pub const fn new(config: &'a LayoutConfig, algorithm: &'a dyn ChildLayoutAlgorithm) -> Self {
        Self { config, algorithm }
    }
}

/// Configuration plus strategy, with one method per layout operation.
#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    algorithm: Box<dyn ChildLayoutAlgorithm>,
}

impl LayoutEngine {
    /// Validate `config` and pick the strategy it names.
    pub fn new(config: LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let algorithm = algorithm_for(config.algorithm);
        Ok(Self { config, algorithm })
    }

    /// Use a custom strategy instead of the configured one.
    pub fn with_algorithm(
        config: LayoutConfig,
        algorithm: Box<dyn ChildLayoutAlgorithm>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, algorithm })
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn algorithm(&self) -> &dyn ChildLayoutAlgorithm {
        self.algorithm.as_ref()
    }

    /// Swap the packing strategy. Callers re-run the cascade to apply it.
    pub fn set_algorithm(&mut self, kind: LayoutAlgorithmType) {
        self.config.algorithm = kind;
        self.algorithm = algorithm_for(kind);
    }

    #[must_use]
    pub fn context(&self) -> LayoutContext<'_> {
        LayoutContext::new(&self.config, self.algorithm.as_ref())
    }

    #[must_use]
    pub fn update_children_layout(&self, nodes: &NodeSet) -> NodeSet {
        cascade::update_children_layout(nodes, self.context())
    }

    #[must_use]
    pub fn update_children_layout_with_stats(&self, nodes: &NodeSet) -> (NodeSet, CascadeStats) {
        cascade::update_children_layout_with_stats(nodes, self.context())
    }

    #[must_use]
    pub fn fit_parent_to_children(&self, nodes: &NodeSet, parent_id: NodeId) -> NodeSet {
        cascade::fit_parent_to_children(nodes, parent_id, self.context())
    }

    #[must_use]
    pub fn fit_parent_to_children_recursive(&self, nodes: &NodeSet, parent_id: NodeId) -> NodeSet {
        cascade::fit_parent_to_children_recursive(nodes, parent_id, self.context())
    }

    #[must_use]
    pub fn minimum_parent_size(&self, nodes: &NodeSet, parent_id: NodeId) -> Option<Size> {
        min_size::calculate_minimum_parent_size(nodes, parent_id, self.context())
    }

    #[must_use]
    pub fn can_reparent(&self, nodes: &NodeSet, child: NodeId, new_parent: Option<NodeId>) -> bool {
        edit::can_reparent(nodes, child, new_parent)
    }

    pub fn reparent(
        &self,
        nodes: &NodeSet,
        child: NodeId,
        new_parent: Option<NodeId>,
    ) -> Result<NodeSet, EditError> {
        edit::reparent(nodes, child, new_parent, self.context())
    }

    pub fn add_node(
        &self,
        nodes: &NodeSet,
        new_node: NewNode,
    ) -> Result<(NodeSet, NodeId), EditError> {
        edit::add_node(nodes, new_node, self.context())
    }

    pub fn remove_node(&self, nodes: &NodeSet, id: NodeId) -> Result<NodeSet, EditError> {
        edit::remove_node(nodes, id, self.context())
    }

    pub fn move_node(
        &self,
        nodes: &NodeSet,
        id: NodeId,
        dx: i32,
        dy: i32,
    ) -> Result<NodeSet, EditError> {
        edit::move_node(nodes, id, dx, dy, self.context())
    }

    pub fn move_node_by_pixels(
        &self,
        nodes: &NodeSet,
        id: NodeId,
        dx: f64,
        dy: f64,
    ) -> Result<NodeSet, EditError> {
        edit::move_node_by_pixels(nodes, id, dx, dy, self.context())
    }

    pub fn resize_node(
        &self,
        nodes: &NodeSet,
        id: NodeId,
        size: Size,
    ) -> Result<NodeSet, EditError> {
        edit::resize_node(nodes, id, size, self.context())
    }

    pub fn set_manual_positioning(
        &self,
        nodes: &NodeSet,
        id: NodeId,
        enabled: bool,
    ) -> Result<NodeSet, EditError> {
        edit::set_manual_positioning(nodes, id, enabled, self.context())
    }

    pub fn set_locked_as_is(
        &self,
        nodes: &NodeSet,
        id: NodeId,
        locked: bool,
    ) -> Result<NodeSet, EditError> {
        edit::set_locked_as_is(nodes, id, locked, self.context())
    }

    pub fn set_layout_preferences(
        &self,
        nodes: &NodeSet,
        id: NodeId,
        preferences: LayoutPreferences,
    ) -> Result<NodeSet, EditError> {
        edit::set_layout_preferences(nodes, id, preferences, self.context())
    }

    pub fn set_text_label(
        &self,
        nodes: &NodeSet,
        id: NodeId,
        is_text_label: bool,
    ) -> Result<NodeSet, EditError> {
        edit::set_text_label(nodes, id, is_text_label, self.context())
    }

    pub fn move_nodes(
        &self,
        nodes: &NodeSet,
        ids: &[NodeId],
        dx: i32,
        dy: i32,
    ) -> Result<NodeSet, EditError> {
        bulk::move_nodes(nodes, ids, dx, dy, self.context())
    }

    pub fn remove_nodes(&self, nodes: &NodeSet, ids: &[NodeId]) -> Result<NodeSet, EditError> {
        bulk::remove_nodes(nodes, ids, self.context())
    }

    pub fn align_nodes(
        &self,
        nodes: &NodeSet,
        ids: &[NodeId],
        alignment: Alignment,
    ) -> Result<NodeSet, EditError> {
        bulk::align_nodes(nodes, ids, alignment, self.context())
    }

    pub fn distribute_nodes(
        &self,
        nodes: &NodeSet,
        ids: &[NodeId],
        axis: Axis,
    ) -> Result<NodeSet, EditError> {
        bulk::distribute_nodes(nodes, ids, axis, self.context())
    }

    #[must_use]
    pub fn z_index(&self, nodes: &NodeSet, id: NodeId, interaction: &InteractionState) -> i32 {
        z_order::z_index(id, nodes, interaction)
    }

    #[must_use]
    pub fn render_order(&self, nodes: &NodeSet, interaction: &InteractionState) -> Vec<NodeId> {
        z_order::render_order(nodes, interaction)
    }
}
