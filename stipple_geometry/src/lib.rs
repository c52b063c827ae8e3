// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple Geometry: the pure math underneath a pannable, zoomable dot canvas.
//!
//! This crate provides:
//! - [`compute_bounds`] / [`compute_circle_bounds`]: axis-aligned bounds of a dot set.
//! - [`expand_with_margin`]: grow a box by a fraction of its size, keeping it centered.
//! - [`fit_aspect`]: widen or heighten a [`ViewBox`] to a target aspect ratio.
//! - [`occlusion_aware_view_box`]: frame data so that it fills the part of the canvas
//!   that is *not* covered by other UI.
//! - [`Transform`]: the uniform scale + translation camera used by every other crate.
//!
//! Everything here is a value type or a free function; nothing allocates.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use stipple_geometry::{Occlusion, compute_bounds, occlusion_aware_view_box};
//!
//! let bounds = compute_bounds([Point::new(0.0, 0.0), Point::new(100.0, 50.0)]).unwrap();
//! let canvas = Size::new(1000.0, 500.0);
//! let occlusion = Occlusion { left: 250.0, ..Occlusion::NONE };
//!
//! let view_box = occlusion_aware_view_box(bounds, canvas, occlusion, 0.1).unwrap();
//! // The logical window keeps the canvas aspect ratio.
//! assert!((view_box.aspect_ratio() - 2.0).abs() < 1e-9);
//! ```
//!
//! ## Degenerate input
//!
//! Zero-width or zero-height bounds (a single dot, a vertical line of dots) are
//! widened to [`DEGENERATE_EXTENT`] before any division so fitting never produces
//! infinities or NaNs.

mod bounds;
mod dot;
mod fit;
mod occlusion;
mod transform;
mod view_box;

pub use bounds::{
    DEGENERATE_EXTENT, compute_bounds, compute_circle_bounds, expand_with_margin, non_degenerate,
};
pub use dot::Dot;
pub use fit::{Anchor, AxisAlign, fit_aspect};
pub use occlusion::{Occlusion, occlusion_aware_view_box};
pub use transform::Transform;
pub use view_box::ViewBox;

/// Errors produced by the geometry helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A reduction over points was asked for with no points at all.
    #[error("cannot compute bounds of an empty point set")]
    EmptyInput,
}
