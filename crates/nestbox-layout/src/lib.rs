#![forbid(unsafe_code)]

//! Layout and constraint engine for nested box diagrams.
//!
//! A diagram is a flat [`NodeSet`] of boxes whose `parent_id` links form a
//! forest. This crate keeps the boxes' geometry consistent with that
//! hierarchy: children sit inside their parent's interior without crowding
//! each other, parents grow to hold their children, and edits to the
//! hierarchy ripple up and down the tree.
//!
//! # Role in nestbox
//! `nestbox-layout` is the engine. It depends only on the geometry
//! primitives in `nestbox-core` and is driven by an editor front end, which
//! owns the node collection and calls one operation per user gesture.
//!
//! # How it fits in the system
//! Every operation is a pure function of `(&NodeSet, LayoutContext)` and
//! returns a new, settled `NodeSet`. [`LayoutEngine`] bundles a validated
//! [`LayoutConfig`] with the active [`ChildLayoutAlgorithm`] and exposes the
//! same operations as methods.
//!
//! # Example
//! ```
//! use nestbox_layout::{LayoutConfig, LayoutEngine, NewNode, NodeSet, Point, Size};
//!
//! let engine = LayoutEngine::new(LayoutConfig::default()).expect("default config is valid");
//! let (nodes, root) = engine
//!     .add_node(&NodeSet::new(), NewNode::root(Point::ZERO, Size::new(40, 20)))
//!     .expect("add root");
//! let (nodes, child) = engine.add_node(&nodes, NewNode::child(root)).expect("add child");
//!
//! let parent = nodes.get(root).expect("root exists").bounds();
//! let child = nodes.get(child).expect("child exists").bounds();
//! assert!(parent.contains_rect(&child));
//! ```

pub mod algorithm;
pub mod bulk;
pub mod cascade;
pub mod config;
pub mod edit;
pub mod engine;
pub mod fixed;
pub mod free_space;
pub mod hierarchy;
pub mod min_size;
pub mod node;
pub mod z_order;

pub use algorithm::{
    ChildLayoutAlgorithm, ChildPlacement, FlowLayout, GridLayout, algorithm_for,
    calculate_child_layout,
};
pub use bulk::{
    Alignment, Axis, align_nodes, distribute_nodes, move_nodes, remove_nodes, validate_selection,
};
pub use cascade::{
    CascadeStats, fit_parent_to_children, fit_parent_to_children_recursive, update_children_layout,
    update_children_layout_with_stats,
};
pub use config::{
    ConfigError, FixedDimensions, LayoutAlgorithmType, LayoutConfig, Margins, SizeLimits,
};
pub use edit::{
    EditError, NewNode, add_node, can_reparent, check_reparent, move_node, move_node_by_pixels,
    remove_node, reparent, resize_node, set_layout_preferences, set_locked_as_is,
    set_manual_positioning, set_text_label,
};
pub use engine::{LayoutContext, LayoutEngine};
pub use fixed::{apply_fixed_dimensions, effective_size};
pub use free_space::{
    FreeSpaceOptions, FreeSpacePlacement, PlacementStrategy, calculate_free_space_position,
};
pub use hierarchy::{
    TopologicalOrder, get_all_descendants, get_children, is_leaf, topological_order,
};
pub use min_size::calculate_minimum_parent_size;
pub use nestbox_core::geometry::{Point, Rect, Sides, Size};
pub use node::{
    FillStrategy, LayoutPreferences, Node, NodeId, NodeSet, NodeSetError, NodeSetSnapshot,
    NodeType,
};
pub use z_order::{InteractionState, render_order, z_index};
