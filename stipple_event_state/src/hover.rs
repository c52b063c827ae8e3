// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state: one hovered dot at a time, with leave/enter transitions.
//!
//! ## Minimal example
//!
//! ```
//! use stipple_event_state::hover::{HoverEvent, HoverState};
//!
//! let mut hover = HoverState::new();
//! assert_eq!(hover.update(Some(3)).as_slice(), &[HoverEvent::Enter(3)]);
//! assert!(hover.update(Some(3)).is_empty());
//! assert_eq!(
//!     hover.update(Some(4)).as_slice(),
//!     &[HoverEvent::Leave(3), HoverEvent::Enter(4)]
//! );
//! assert_eq!(hover.update(None).as_slice(), &[HoverEvent::Leave(4)]);
//! ```

use smallvec::SmallVec;

/// A hover transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer entered this dot.
    Enter(K),
    /// The pointer left this dot.
    Leave(K),
}

/// Transitions produced by a single update: at most a leave and an enter.
pub type HoverEvents<K> = SmallVec<[HoverEvent<K>; 2]>;

/// Tracks the currently hovered dot.
#[derive(Clone, Debug)]
pub struct HoverState<K> {
    current: Option<K>,
}

impl<K> Default for HoverState<K> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<K: Clone + PartialEq> HoverState<K> {
    /// Creates a state with nothing hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the hovered dot, if any.
    #[must_use]
    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }

    /// Moves hover to `target`.
    ///
    /// Emits `Leave(old)` then `Enter(new)`, each only when the identity
    /// actually changes.
    pub fn update(&mut self, target: Option<K>) -> HoverEvents<K> {
        let mut out = HoverEvents::new();
        if self.current == target {
            return out;
        }
        if let Some(old) = self.current.take() {
            out.push(HoverEvent::Leave(old));
        }
        if let Some(new) = target {
            out.push(HoverEvent::Enter(new.clone()));
            self.current = Some(new);
        }
        out
    }

    /// Clears hover, emitting `Leave` for the hovered dot if there is one.
    pub fn clear(&mut self) -> HoverEvents<K> {
        self.update(None)
    }

    /// Forgets the hovered dot without emitting anything.
    ///
    /// Use when the dot no longer exists, e.g. after a data replacement.
    pub fn forget(&mut self) {
        self.current = None;
    }
}
