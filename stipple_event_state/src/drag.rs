// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag tracking: movement deltas, total offsets, and the session value
//! handed to drag callbacks.
//!
//! ## Usage
//!
//! 1) Begin with [`DragState::start`] at the press position.
//! 2) On each move, [`DragState::update`] returns the delta since the last move.
//! 3) [`DragState::total_offset`] gives the offset from the press.
//! 4) [`DragState::end`] resets.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use stipple_event_state::drag::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0));
//! assert!(drag.is_dragging());
//!
//! assert_eq!(drag.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! assert_eq!(drag.update(Point::new(16.0, 25.0)), Some(Vec2::new(1.0, 0.0)));
//! assert_eq!(drag.total_offset(Point::new(16.0, 25.0)), Some(Vec2::new(6.0, 5.0)));
//! ```

use kurbo::{Point, Vec2};

/// Tracks pointer positions across one drag.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragState {
    /// Position where the drag started.
    pub start_pos: Option<Point>,
    /// Last position seen during the drag.
    pub last_pos: Option<Point>,
}

impl DragState {
    /// Starts tracking from `pos`, replacing any drag in progress.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Records `pos` and returns the movement since the previous position.
    ///
    /// Returns `None` when no drag is active, or when this is the first
    /// position recorded after a start without one.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Returns the offset of `current_pos` from the drag start.
    #[must_use]
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Ends the drag.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` while a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}

/// An explicit drag in progress, passed to every drag callback.
///
/// Carries everything a handler needs, so no state about the drag lives
/// anywhere else.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession<K> {
    /// The dot being dragged.
    pub target: K,
    /// Canvas position of the press that started the drag.
    pub origin: Point,
    /// Current pointer position.
    pub position: Point,
    /// Movement since the previous drag event.
    pub delta: Vec2,
}

impl<K> DragSession<K> {
    /// Offset of the pointer from the press position.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.position - self.origin
    }
}
