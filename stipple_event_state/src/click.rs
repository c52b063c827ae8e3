// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click recognition with spatial and temporal tolerance.
//!
//! A press becomes a click when the release lands on the same target, no
//! farther than [`ClickConfig::slop_px`] from the press, and no later than
//! [`ClickConfig::max_duration_ms`] after it. Presses and releases that hit
//! nothing produce a distinct background click.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use stipple_event_state::click::{ClickResult, ClickState};
//!
//! let mut clicks = ClickState::default();
//! clicks.on_down(Some(42), Point::new(10.0, 20.0), 1_000);
//! let result = clicks.on_up(Some(&42), Point::new(13.0, 23.0), 1_050);
//! assert_eq!(result, ClickResult::Click(42));
//! ```

use kurbo::Point;

/// Thresholds separating a click from a drag or a long press.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClickConfig {
    /// Largest pointer travel, in canvas pixels, that still counts as a click.
    pub slop_px: f64,
    /// Longest press, in milliseconds, that still counts as a click.
    pub max_duration_ms: u64,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            slop_px: 5.0,
            max_duration_ms: 300,
        }
    }
}

/// Outcome of a release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// A click on this target.
    Click(K),
    /// A click that hit no target.
    Background,
    /// Not a click: moved too far, held too long, changed target, or no press.
    None,
}

/// The recorded press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// Target under the pointer at press time.
    pub target: Option<K>,
    /// Canvas position of the press.
    pub position: Point,
    /// Press timestamp.
    pub time_ms: u64,
}

/// Tracks one press at a time.
#[derive(Clone, Debug)]
pub struct ClickState<K> {
    config: ClickConfig,
    press: Option<Press<K>>,
}

impl<K> Default for ClickState<K> {
    fn default() -> Self {
        Self::new(ClickConfig::default())
    }
}

impl<K> ClickState<K> {
    /// Creates an idle state with the given thresholds.
    #[must_use]
    pub fn new(config: ClickConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// Returns the thresholds.
    #[must_use]
    pub fn config(&self) -> &ClickConfig {
        &self.config
    }

    /// Returns the pending press, if any.
    #[must_use]
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }

    /// Records a press, replacing any earlier one.
    pub fn on_down(&mut self, target: Option<K>, position: Point, time_ms: u64) {
        self.press = Some(Press {
            target,
            position,
            time_ms,
        });
    }

    /// Returns `true` if `position` is beyond the click slop of the pending
    /// press.
    #[must_use]
    pub fn exceeds_slop(&self, position: Point) -> bool {
        self.press
            .as_ref()
            .is_some_and(|p| p.position.distance(position) > self.config.slop_px)
    }

    /// Drops the pending press so the coming release cannot click.
    pub fn cancel(&mut self) {
        self.press = None;
    }
}

impl<K: PartialEq> ClickState<K> {
    /// Consumes the pending press and classifies the release.
    pub fn on_up(&mut self, target: Option<&K>, position: Point, time_ms: u64) -> ClickResult<K> {
        let Some(press) = self.press.take() else {
            return ClickResult::None;
        };
        let in_time = time_ms.saturating_sub(press.time_ms) <= self.config.max_duration_ms;
        let in_place = press.position.distance(position) <= self.config.slop_px;
        if !in_time || !in_place || press.target.as_ref() != target {
            return ClickResult::None;
        }
        match press.target {
            Some(target) => ClickResult::Click(target),
            None => ClickResult::Background,
        }
    }
}
