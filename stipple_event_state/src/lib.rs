// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple Event State: pointer interaction state machines for dot canvases.
//!
//! Small, focused state machines for interactions that need state across
//! several pointer events:
//!
//! - [`hover`]: one hovered dot, with leave/enter transitions on identity change.
//! - [`click`]: click recognition with spatial and temporal tolerance, plus
//!   background clicks.
//! - [`drag`]: movement deltas and the [`drag::DragSession`] value handed to
//!   drag handlers.
//! - [`dispatcher`]: all of the above behind one pointer pipeline, aware of
//!   camera gestures.
//!
//! Nothing here hit-tests. Callers pass the dot under the pointer, as found by
//! a spatial index, and interpret the events that come back.
//!
//! ## Usage
//!
//! ```rust
//! use kurbo::Point;
//! use stipple_event_state::dispatcher::{Dispatcher, InteractionEvent};
//!
//! let mut pointer = Dispatcher::default();
//!
//! // The index reports dot 7 under the pointer.
//! let events = pointer.pointer_move(Point::new(10.0, 10.0), Some(7), false);
//! assert_eq!(events.as_slice(), &[InteractionEvent::Enter(7)]);
//!
//! // Press and release in place: a click.
//! pointer.pointer_down(Point::new(10.0, 10.0), Some(7), 1_000);
//! let events = pointer.pointer_up(Point::new(11.0, 10.0), Some(&7), 1_120);
//! assert_eq!(events.as_slice(), &[InteractionEvent::Click(7)]);
//!
//! // While the camera pans, hover changes are not reported.
//! assert!(pointer.pointer_move(Point::new(90.0, 10.0), None, true).is_empty());
//! ```

pub mod click;
pub mod dispatcher;
pub mod drag;
pub mod hover;
