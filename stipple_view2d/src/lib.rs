// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple View 2D: the camera over a dot canvas.
//!
//! This crate owns the single mutable piece of view state, the camera
//! [`Transform`](stipple_geometry::Transform), and everything that changes it:
//! - [`Viewport`]: the logical view box mapped onto the physical canvas, plus
//!   coordinate conversion between data, view box and canvas pixels.
//! - [`Camera`]: an `Idle` / `Interacting` / `Animating` state machine that
//!   coalesces raw [`GestureEvent`]s, runs eased transitions, and broadcasts
//!   each applied transform to every attached [`Renderer`] in the same frame.
//! - [`AutoFitPolicy`]: when newly arrived content should be framed.
//! - [`ZoomExtent`]: the interactive zoom range, relative to the baseline fit.
//!
//! [`Easing`] curves come from `stipple_timing` and are re-exported here.
//!
//! It does **not** draw anything, own a clock, or own the dots. Callers:
//! - Attach one or more renderers (closures work).
//! - Feed wheel and drag events into [`Camera::apply_gesture`].
//! - Call [`Camera::frame`] once per display refresh with a timestamp.
//! - Read [`Camera::revision`] to know when screen-space caches are stale.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use stipple_geometry::{Transform, ViewBox};
//! use stipple_view2d::{Camera, CameraConfig, DeltaMode, GestureEvent, Modifiers};
//!
//! let mut camera = Camera::new(ViewBox::new(0.0, 0.0, 100.0, 50.0), CameraConfig::default());
//! camera.set_canvas_size(Size::new(1000.0, 500.0));
//! camera.attach_renderer(|t: Transform| {
//!     // Reposition the vector layer, redraw the raster layer, ...
//!     let _ = t;
//! });
//!
//! // Two wheel events arrive within one refresh...
//! for time_ms in [0, 4] {
//!     camera.apply_gesture(GestureEvent::Wheel {
//!         position: Point::new(500.0, 250.0),
//!         delta: Vec2::new(0.0, -100.0),
//!         mode: DeltaMode::Pixel,
//!         modifiers: Modifiers::CTRL,
//!         time_ms,
//!     });
//! }
//! // ...and are applied once.
//! let applied = camera.frame(16).unwrap();
//! assert!(applied.k > 1.0);
//! ```

mod animation;
mod auto_fit;
mod camera;
mod extent;
mod gesture;
mod renderer;
mod viewport;

pub use animation::{AnimationOutcome, AnimationStatus, AnimationTicket};
pub use auto_fit::{AutoFitDecision, AutoFitPolicy};
pub use camera::{
    Camera, CameraConfig, CameraDebugInfo, CameraEvent, CameraState, PreconditionError,
};
pub use extent::ZoomExtent;
pub use gesture::{
    DeltaMode, GestureEvent, LINE_HEIGHT_PX, Modifiers, wheel_delta_px, wheel_zoom_factor,
};
pub use renderer::{Renderer, RendererId};
pub use stipple_timing::Easing;
pub use viewport::{Viewport, ViewportDebugInfo};
