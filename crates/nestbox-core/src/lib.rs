#![forbid(unsafe_code)]

//! Core: grid-unit geometry shared by the nestbox crates.
//!
//! # Role in nestbox
//! `nestbox-core` owns the rectangle math every other crate builds on. It has
//! no notion of nodes, hierarchy, or policy; `nestbox-layout` layers the
//! containment model and the layout solvers on top of these primitives.

pub mod geometry;

pub use geometry::{Point, Rect, Sides, Size};
