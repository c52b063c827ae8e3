// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Combines hover, click, and drag tracking into one pointer pipeline.
//!
//! The dispatcher never hit-tests on its own. Each pointer call takes the dot
//! under the pointer as already resolved by a spatial index, which keeps this
//! crate independent of how dots are stored or transformed.

use kurbo::Point;
use smallvec::SmallVec;

use crate::click::{ClickConfig, ClickResult, ClickState};
use crate::drag::{DragSession, DragState};
use crate::hover::{HoverEvent, HoverState};

/// Dispatcher settings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatcherConfig {
    /// Click thresholds; the slop doubles as the drag threshold.
    pub click: ClickConfig,
    /// Whether pressing a dot and moving past the slop starts a drag.
    ///
    /// Hosts enable this when they registered a drag-start handler.
    pub drag_enabled: bool,
}

/// What the owner is told about pointer activity.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent<K> {
    /// The pointer started hovering this dot.
    Enter(K),
    /// The pointer stopped hovering this dot.
    Leave(K),
    /// This dot was clicked.
    Click(K),
    /// A click hit no dot.
    BackgroundClick,
    /// A drag began on a dot.
    DragStart(DragSession<K>),
    /// The dragged pointer moved.
    DragMove(DragSession<K>),
    /// The drag ended with a release.
    DragEnd(DragSession<K>),
}

impl<K> From<HoverEvent<K>> for InteractionEvent<K> {
    fn from(event: HoverEvent<K>) -> Self {
        match event {
            HoverEvent::Enter(k) => Self::Enter(k),
            HoverEvent::Leave(k) => Self::Leave(k),
        }
    }
}

/// Events produced by one pointer call.
pub type InteractionEvents<K> = SmallVec<[InteractionEvent<K>; 2]>;

/// Turns pointer input plus hit results into [`InteractionEvent`]s.
///
/// - Hover transitions fire only on identity change, and never while the
///   camera is interacting or a drag is in progress.
/// - A press and release on the same dot within the click thresholds is one
///   click. Moving past the slop with dragging enabled starts a drag instead,
///   and that press never clicks.
/// - Clicks that hit nothing are reported as [`InteractionEvent::BackgroundClick`].
#[derive(Clone, Debug)]
pub struct Dispatcher<K> {
    config: DispatcherConfig,
    hover: HoverState<K>,
    click: ClickState<K>,
    drag: DragState,
    drag_target: Option<K>,
}

impl<K: Clone + PartialEq> Default for Dispatcher<K> {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl<K: Clone + PartialEq> Dispatcher<K> {
    /// Creates an idle dispatcher.
    #[must_use]
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            hover: HoverState::new(),
            click: ClickState::new(config.click),
            drag: DragState::default(),
            drag_target: None,
        }
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Enables or disables dragging. Takes effect at the next press.
    pub fn set_drag_enabled(&mut self, enabled: bool) {
        self.config.drag_enabled = enabled;
    }

    /// Returns the hovered dot, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<&K> {
        self.hover.current()
    }

    /// Returns the dragged dot while a drag is in progress.
    #[must_use]
    pub fn dragging(&self) -> Option<&K> {
        self.drag_target.as_ref()
    }

    /// Returns `true` while a press is waiting for its release.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.click.press().is_some() || self.drag.is_dragging()
    }

    /// Handles a pointer move to `position` over `hit`.
    pub fn pointer_move(
        &mut self,
        position: Point,
        hit: Option<K>,
        camera_interacting: bool,
    ) -> InteractionEvents<K> {
        let mut out = InteractionEvents::new();
        if let Some(target) = self.drag_target.clone() {
            let delta = self.drag.update(position).unwrap_or_default();
            if let Some(origin) = self.drag.start_pos {
                out.push(InteractionEvent::DragMove(DragSession {
                    target,
                    origin,
                    position,
                    delta,
                }));
            }
            return out;
        }

        if self.config.drag_enabled
            && self.click.exceeds_slop(position)
            && let Some(press) = self.click.press().cloned()
            && let Some(target) = press.target
        {
            self.click.cancel();
            self.drag.start(press.position);
            let delta = self.drag.update(position).unwrap_or_default();
            tracing::debug!(x = position.x, y = position.y, "drag started");
            self.drag_target = Some(target.clone());
            out.push(InteractionEvent::DragStart(DragSession {
                target,
                origin: press.position,
                position,
                delta,
            }));
            return out;
        }

        if !camera_interacting {
            out.extend(self.hover.update(hit).into_iter().map(Into::into));
        }
        out
    }

    /// Handles a press at `position` over `hit`.
    pub fn pointer_down(&mut self, position: Point, hit: Option<K>, time_ms: u64) {
        if self.drag_target.is_some() {
            return;
        }
        self.click.on_down(hit, position, time_ms);
    }

    /// Handles a release at `position` over `hit`.
    pub fn pointer_up(
        &mut self,
        position: Point,
        hit: Option<&K>,
        time_ms: u64,
    ) -> InteractionEvents<K> {
        let mut out = InteractionEvents::new();
        if let Some(target) = self.drag_target.take() {
            let delta = self.drag.update(position).unwrap_or_default();
            let origin = self.drag.start_pos.unwrap_or(position);
            self.drag.end();
            tracing::debug!(x = position.x, y = position.y, "drag ended");
            out.push(InteractionEvent::DragEnd(DragSession {
                target,
                origin,
                position,
                delta,
            }));
            return out;
        }
        match self.click.on_up(hit, position, time_ms) {
            ClickResult::Click(target) => out.push(InteractionEvent::Click(target)),
            ClickResult::Background => out.push(InteractionEvent::BackgroundClick),
            ClickResult::None => {}
        }
        out
    }

    /// Handles the pointer leaving the canvas: hover ends, a pending press
    /// can no longer click. A drag in progress continues.
    pub fn pointer_leave(&mut self) -> InteractionEvents<K> {
        self.click.cancel();
        self.hover.clear().into_iter().map(Into::into).collect()
    }

    /// Drops hover, press, and drag state without emitting anything.
    ///
    /// Use when the dots were replaced and old ids may be gone.
    pub fn reset(&mut self) {
        self.hover.forget();
        self.click.cancel();
        self.drag.end();
        self.drag_target = None;
    }
}
