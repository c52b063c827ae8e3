// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple: pannable, zoomable canvases of dots.
//!
//! Stipple renders nothing itself. It owns the state that sits between a
//! point collection and a drawing surface:
//!
//! - validated point records ([`PointInput`] → [`ScenePoint`]);
//! - a camera with gesture coalescing and occlusion-aware fits
//!   ([`stipple_view2d`]);
//! - a collision relaxation that spreads overlapping dots apart, frame by
//!   frame ([`stipple_decollide`]);
//! - a screen-space hit grid ([`stipple_index`]) feeding hover, click and drag
//!   recognition ([`stipple_event_state`]);
//! - a frame budget that throttles layout work ([`stipple_timing`]).
//!
//! [`Scene`] ties them together behind one owner-facing API.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::Size;
//! use stipple::{PointId, PointInput, Scene, SceneCallbacks, SceneConfig, Transform};
//!
//! let clicked = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&clicked);
//! let mut scene = Scene::new(SceneConfig::default()).with_callbacks(
//!     SceneCallbacks::default().on_click(move |p| log.borrow_mut().push(p.id.clone())),
//! );
//! scene.attach_renderer(|_transform: Transform| { /* redraw with the new transform */ });
//!
//! let dropped = scene.set_points(
//!     [
//!         PointInput::new(1_i64, 0.0, 0.0).with_radius(5.0),
//!         PointInput::new(2_i64, 100.0, 50.0).with_radius(5.0),
//!     ],
//!     0,
//! );
//! assert!(dropped.is_empty());
//! scene.resize(Size::new(800.0, 600.0), 0);
//!
//! let mut now = 0;
//! while !scene.is_settled() {
//!     now += 16;
//!     scene.frame(now);
//! }
//!
//! // Click the first point where it is drawn.
//! let at = scene.screen_transform().apply(scene.layout().get(&PointId::Int(1)).unwrap());
//! scene.pointer_down(at, now);
//! scene.pointer_up(at, now + 50);
//! assert_eq!(*clicked.borrow(), vec![PointId::Int(1)]);
//! assert_eq!(scene.visible_count(), 2);
//! ```

mod callbacks;
mod config;
mod point;
mod scene;

pub use callbacks::SceneCallbacks;
pub use config::SceneConfig;
pub use point::{Axis, PointId, PointInput, ScenePoint, ValidationError, validate_points};
pub use scene::{FrameReport, Scene};

pub use stipple_decollide::LayoutSnapshot;
pub use stipple_event_state::drag::DragSession;
pub use stipple_geometry::{Occlusion, Transform};
pub use stipple_view2d::{
    AnimationOutcome, AnimationTicket, DeltaMode, Modifiers, PreconditionError, Renderer,
    RendererId,
};
