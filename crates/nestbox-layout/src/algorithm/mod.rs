//! Child layout algorithms (packing strategies).
//!
//! A strategy turns an ordered list of child sizes into child rectangles
//! inside a parent's interior. Strategies are handed to the engine explicitly
//! through [`LayoutContext`]; there is no process-wide active strategy.
//!
//! # Contract
//!
//! For any strategy, provided the interior is at least
//! [`ChildLayoutAlgorithm::minimum_interior`] for the same inputs:
//!
//! - no child's rectangle, expanded by `gap`, intersects another child's
//!   rectangle, and
//! - every child lies inside the interior.
//!
//! Packing into an undersized interior is the caller's error to avoid.

mod flow;
mod grid;

use std::fmt;

use nestbox_core::geometry::{Rect, Size};

pub use flow::FlowLayout;
pub use grid::GridLayout;

use crate::config::LayoutAlgorithmType;
use crate::engine::LayoutContext;
use crate::fixed::effective_size;
use crate::node::{LayoutPreferences, Node, NodeId};

/// A packing strategy.
pub trait ChildLayoutAlgorithm: fmt::Debug + Send + Sync {
    /// Identifier of this strategy.
    fn kind(&self) -> LayoutAlgorithmType;

    /// Place children of the given sizes, in order, inside `interior`.
    ///
    /// Returns one rectangle per size. Children keep their sizes; only the
    /// origins are chosen.
    fn pack(
        &self,
        interior: Rect,
        sizes: &[Size],
        preferences: &LayoutPreferences,
        gap: i32,
    ) -> Vec<Rect>;

    /// Smallest interior that [`pack`](Self::pack) can fill without
    /// violating the contract. Packing into exactly this size must not
    /// demand a larger one.
    fn minimum_interior(&self, sizes: &[Size], preferences: &LayoutPreferences, gap: i32) -> Size;
}

/// Build the strategy for `kind`.
#[must_use]
pub fn algorithm_for(kind: LayoutAlgorithmType) -> Box<dyn ChildLayoutAlgorithm> {
    match kind {
        LayoutAlgorithmType::Grid => Box::new(GridLayout),
        LayoutAlgorithmType::Flow => Box::new(FlowLayout),
    }
}

/// New geometry for one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildPlacement {
    pub id: NodeId,
    pub bounds: Rect,
}

/// Pack `children` into `parent`'s interior with the context's strategy.
///
/// The interior is the parent's bounds inset by `margin` on the left, right
/// and bottom and by `label_margin` on top. Leaves under an automatic parent
/// are packed at their pinned size.
#[must_use]
pub fn calculate_child_layout(
    parent: &Node,
    children: &[&Node],
    cx: LayoutContext<'_>,
) -> Vec<ChildPlacement> {
    let config = cx.config;
    let interior = parent.bounds().inner(config.margins.insets());
    let sizes: Vec<Size> = children
        .iter()
        .map(|child| effective_size(child, parent.is_automatic(), config))
        .collect();
    let rects = cx.algorithm.pack(
        interior,
        &sizes,
        &parent.layout_preferences,
        config.margins.margin,
    );
    children
        .iter()
        .zip(rects)
        .map(|(child, bounds)| ChildPlacement {
            id: child.id,
            bounds,
        })
        .collect()
}

/// ⌈√n⌉, at least 1.
pub(crate) fn ceil_sqrt(n: usize) -> usize {
    let mut k = 1;
    while k * k < n {
        k += 1;
    }
    k
}
