// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The camera: sole owner and writer of the view transform.

use kurbo::{Point, Rect, Size};
use stipple_geometry::{Occlusion, Transform, ViewBox, compute_circle_bounds};
use stipple_timing::{Debouncer, Easing};

use crate::animation::{AnimationOutcome, AnimationTicket, TransformTween};
use crate::extent::ZoomExtent;
use crate::gesture::{GestureEvent, wheel_delta_px, wheel_zoom_factor};
use crate::renderer::{Renderer, RendererId, RendererSet};
use crate::viewport::{Viewport, ViewportDebugInfo};

/// An operation was requested before the camera could carry it out.
///
/// These are expected transient states (for example during startup, before
/// the canvas has been laid out); the operation is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    /// The canvas has no physical size yet.
    #[error("canvas has not been sized")]
    CanvasNotSized,
    /// No renderer is attached, so an animation could never be observed.
    #[error("no render surface is attached to the camera")]
    NoRenderSurface,
    /// There is nothing to fit.
    #[error("no content to fit")]
    EmptyContent,
}

/// What the camera is doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraState {
    /// At rest.
    #[default]
    Idle,
    /// A pointer drag or wheel burst is in progress.
    Interacting,
    /// A programmatic transition is in flight.
    Animating,
}

impl CameraState {
    /// Stable name for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Interacting => "interacting",
            Self::Animating => "animating",
        }
    }
}

/// Notifications emitted by the camera, drained with [`Camera::drain_events`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraEvent {
    /// A user gesture took control of the camera.
    InteractionStarted,
    /// The gesture ended (pointer released, or the wheel went quiet).
    InteractionEnded,
    /// A programmatic transition started.
    AnimationStarted,
    /// A programmatic transition finished.
    AnimationFinished(AnimationOutcome),
}

/// Camera configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraConfig {
    /// Interactive zoom range, relative to the baseline fit.
    pub zoom_extent: ZoomExtent,
    /// Quiet period after the last wheel event before the interaction ends.
    pub wheel_end_delay_ms: u64,
    /// Widen `zoom_extent` so that fitted scales stay reachable by gestures.
    pub widen_extent_on_fit: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_extent: ZoomExtent::default(),
            wheel_end_delay_ms: 150,
            widen_extent_on_fit: true,
        }
    }
}

/// Pan/zoom camera over a [`Viewport`].
///
/// The camera is a frame-driven state machine:
/// - [`Camera::apply_gesture`] folds raw wheel and drag events into a single
///   pending transform. Nothing is drawn yet.
/// - [`Camera::frame`], called once per display refresh, applies either the
///   latest pending transform or the current animation sample and broadcasts
///   that one value to every attached [`Renderer`] before returning.
///
/// Intermediate gesture transforms between two frames are dropped, so all
/// renderers always show the same transform.
#[derive(Debug)]
pub struct Camera {
    viewport: Viewport,
    config: CameraConfig,
    zoom_extent: ZoomExtent,
    state: CameraState,
    pending: Option<Transform>,
    pan_last: Option<Point>,
    wheel_end: Debouncer,
    tween: Option<TransformTween>,
    renderers: RendererSet,
    revision: u64,
    events: Vec<CameraEvent>,
}

impl Camera {
    /// Creates an idle camera over `view_box` with the identity transform.
    #[must_use]
    pub fn new(view_box: ViewBox, config: CameraConfig) -> Self {
        Self {
            viewport: Viewport::new(view_box),
            zoom_extent: config.zoom_extent,
            wheel_end: Debouncer::new(config.wheel_end_delay_ms),
            config,
            state: CameraState::Idle,
            pending: None,
            pan_last: None,
            tween: None,
            renderers: RendererSet::default(),
            revision: 0,
            events: Vec::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Returns the viewport (view box, canvas, occlusion, coordinate math).
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Returns `true` while a user gesture is in progress.
    #[must_use]
    pub fn is_interacting(&self) -> bool {
        self.state == CameraState::Interacting
    }

    /// Returns the applied camera transform (data → view box).
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.viewport.transform()
    }

    /// Returns the applied data → canvas transform.
    #[must_use]
    pub fn screen_transform(&self) -> Transform {
        self.viewport.screen_transform()
    }

    /// Returns a counter bumped whenever the data → canvas mapping changes.
    ///
    /// Screen-space caches (such as a hit grid) compare this against the
    /// revision they were built at.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the current interactive zoom range.
    #[must_use]
    pub fn zoom_extent(&self) -> ZoomExtent {
        self.zoom_extent
    }

    /// Replaces the interactive zoom range.
    pub fn set_zoom_extent(&mut self, extent: ZoomExtent) {
        self.zoom_extent = extent;
    }

    /// Attaches a renderer. It receives every applied transform from now on.
    pub fn attach_renderer(&mut self, renderer: impl Renderer + 'static) -> RendererId {
        self.renderers.attach(Box::new(renderer))
    }

    /// Detaches a renderer. Returns `false` if it was not attached.
    pub fn detach_renderer(&mut self, id: RendererId) -> bool {
        self.renderers.detach(id)
    }

    /// Returns the number of attached renderers.
    #[must_use]
    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    /// Sets the physical canvas size. The camera transform is kept.
    pub fn set_canvas_size(&mut self, size: Size) {
        if self.viewport.canvas_size() == size {
            return;
        }
        self.viewport.set_canvas_size(size);
        self.bump_revision();
    }

    /// Replaces the logical view box. The camera transform is kept.
    pub fn set_view_box(&mut self, view_box: ViewBox) {
        if self.viewport.view_box() == view_box {
            return;
        }
        self.viewport.set_view_box(view_box);
        self.bump_revision();
    }

    /// Sets the occluded canvas margins used for fitting and visibility.
    pub fn set_occlusion(&mut self, occlusion: Occlusion) {
        self.viewport.set_occlusion(occlusion);
    }

    /// Re-broadcasts the applied transform, for example after a resize.
    pub fn redraw(&mut self) {
        let screen = self.viewport.screen_transform();
        self.renderers.broadcast(screen);
    }

    /// Folds a raw gesture into the pending transform and returns it.
    ///
    /// Zoom gestures (wheel with control or meta) zoom about the pointer,
    /// clamped to the zoom extent; plain wheel and drag gestures pan by canvas
    /// pixels. Any running animation is interrupted. The result is applied on
    /// the next [`Camera::frame`].
    pub fn apply_gesture(&mut self, event: GestureEvent) -> Transform {
        let base = self.latest_transform();
        if !self.viewport.is_sized() {
            tracing::debug!("gesture ignored: canvas not sized");
            return base;
        }
        let next = match event {
            GestureEvent::Wheel {
                position,
                delta,
                mode,
                modifiers,
                time_ms,
            } => {
                self.begin_interaction();
                self.wheel_end.poke(time_ms);
                if modifiers.zooms() {
                    let factor = wheel_zoom_factor(delta.y, mode, modifiers);
                    self.viewport.zoomed_about(
                        base,
                        position,
                        factor,
                        self.zoom_extent.min(),
                        self.zoom_extent.max(),
                    )
                } else {
                    let px = wheel_delta_px(delta, mode, self.viewport.canvas_size());
                    self.viewport.panned_by(base, -px)
                }
            }
            GestureEvent::PanStart { position, .. } => {
                self.begin_interaction();
                self.pan_last = Some(position);
                base
            }
            GestureEvent::PanMove { position, .. } => {
                let Some(last) = self.pan_last else {
                    return base;
                };
                self.pan_last = Some(position);
                self.viewport.panned_by(base, position - last)
            }
            GestureEvent::PanEnd { .. } => {
                self.pan_last = None;
                if !self.wheel_end.is_pending() {
                    self.end_interaction();
                }
                base
            }
        };
        if next != base {
            self.pending = Some(next);
        }
        next
    }

    /// Advances the camera by one display refresh.
    ///
    /// Applies the latest pending gesture transform, or else samples the
    /// running animation, and broadcasts the result to every renderer.
    /// Returns the applied transform, or `None` if nothing changed.
    pub fn frame(&mut self, now_ms: u64) -> Option<Transform> {
        let mut applied = None;
        if let Some(next) = self.pending.take() {
            self.apply(next);
            applied = Some(next);
        } else if let Some(tween) = &self.tween {
            let (next, done) = tween.sample(now_ms);
            self.apply(next);
            applied = Some(next);
            if done {
                self.finish_animation(AnimationOutcome::Completed);
            }
        }
        if self.wheel_end.poll(now_ms) && self.pan_last.is_none() {
            self.end_interaction();
        }
        applied
    }

    /// Returns the transform that frames `circles` (center, radius in data
    /// units) inside the part of the canvas not covered by `occlusion`.
    ///
    /// The transform is returned, not applied; pass it to
    /// [`Camera::animate_to`]. With `widen_extent_on_fit`, the zoom extent is
    /// widened so the fitted scale stays reachable by gestures.
    pub fn fit_to_visible<I>(
        &mut self,
        circles: I,
        occlusion: Occlusion,
        margin_fraction: f64,
    ) -> Result<Transform, PreconditionError>
    where
        I: IntoIterator<Item = (Point, f64)>,
    {
        self.viewport.set_occlusion(occlusion);
        if !self.viewport.is_sized() {
            tracing::debug!("fit skipped: canvas not sized");
            return Err(PreconditionError::CanvasNotSized);
        }
        let bounds =
            compute_circle_bounds(circles).map_err(|_| PreconditionError::EmptyContent)?;
        self.fit_bounds(bounds, margin_fraction)
    }

    /// Like [`Camera::fit_to_visible`] for precomputed data bounds, using the
    /// current occlusion.
    pub fn fit_bounds(
        &mut self,
        bounds: Rect,
        margin_fraction: f64,
    ) -> Result<Transform, PreconditionError> {
        let target = self
            .viewport
            .fit_transform(bounds, margin_fraction)
            .ok_or(PreconditionError::CanvasNotSized)?;
        if self.config.widen_extent_on_fit && self.zoom_extent.widen_to_include(target.k) {
            tracing::debug!(
                k = target.k,
                min = self.zoom_extent.min(),
                max = self.zoom_extent.max(),
                "zoom extent widened to include fit"
            );
        }
        tracing::debug!(k = target.k, x = target.x, y = target.y, "fit computed");
        Ok(target)
    }

    /// Starts a transition to `target`.
    ///
    /// `k`, `x` and `y` are interpolated independently with `easing`; each
    /// [`Camera::frame`] applies one sample to all renderers. A zero duration
    /// applies `target` immediately. A previous animation is interrupted and
    /// its ticket resolves with [`AnimationOutcome::Interrupted`].
    ///
    /// Fails only when no renderer is attached.
    pub fn animate_to(
        &mut self,
        target: Transform,
        duration_ms: u64,
        easing: Easing,
        now_ms: u64,
    ) -> Result<AnimationTicket, PreconditionError> {
        if self.renderers.is_empty() {
            tracing::debug!("animation refused: no render surface");
            return Err(PreconditionError::NoRenderSurface);
        }
        self.finish_animation(AnimationOutcome::Interrupted);
        self.pending = None;
        self.end_interaction();
        self.events.push(CameraEvent::AnimationStarted);
        if duration_ms == 0 {
            self.apply(target);
            self.events
                .push(CameraEvent::AnimationFinished(AnimationOutcome::Completed));
            return Ok(AnimationTicket::settled(AnimationOutcome::Completed));
        }
        let tween = TransformTween::new(
            self.viewport.transform(),
            target,
            now_ms,
            duration_ms,
            easing,
        );
        let ticket = tween.ticket.clone();
        self.tween = Some(tween);
        self.set_state(CameraState::Animating);
        Ok(ticket)
    }

    /// Animates a zoom by `factor` about the center of the visible region,
    /// clamped to the zoom extent.
    pub fn zoom_by(
        &mut self,
        factor: f64,
        duration_ms: u64,
        easing: Easing,
        now_ms: u64,
    ) -> Result<AnimationTicket, PreconditionError> {
        if !self.viewport.is_sized() {
            return Err(PreconditionError::CanvasNotSized);
        }
        let base = self
            .tween
            .as_ref()
            .map_or_else(|| self.latest_transform(), TransformTween::target);
        let anchor = self.viewport.visible_canvas_rect().center();
        let target = self.viewport.zoomed_about(
            base,
            anchor,
            factor,
            self.zoom_extent.min(),
            self.zoom_extent.max(),
        );
        self.animate_to(target, duration_ms, easing, now_ms)
    }

    /// Interrupts the running animation, leaving the camera where it is.
    /// Returns `false` if nothing was running.
    pub fn interrupt(&mut self) -> bool {
        self.finish_animation(AnimationOutcome::Interrupted)
    }

    /// Takes the events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<CameraEvent> {
        core::mem::take(&mut self.events)
    }

    /// Snapshot of the current camera state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> CameraDebugInfo {
        CameraDebugInfo {
            state: self.state,
            viewport: self.viewport.debug_info(),
            zoom_extent: self.zoom_extent,
            pending: self.pending,
            animating: self.tween.is_some(),
            renderers: self.renderers.len(),
            revision: self.revision,
        }
    }

    fn latest_transform(&self) -> Transform {
        self.pending.unwrap_or_else(|| self.viewport.transform())
    }

    fn apply(&mut self, transform: Transform) {
        self.viewport.set_transform(transform);
        self.bump_revision();
        let screen = self.viewport.screen_transform();
        self.renderers.broadcast(screen);
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn begin_interaction(&mut self) {
        self.finish_animation(AnimationOutcome::Interrupted);
        self.set_state(CameraState::Interacting);
    }

    fn end_interaction(&mut self) {
        self.wheel_end.cancel();
        self.pan_last = None;
        if self.state == CameraState::Interacting {
            self.set_state(CameraState::Idle);
        }
    }

    fn finish_animation(&mut self, outcome: AnimationOutcome) -> bool {
        let Some(tween) = self.tween.take() else {
            return false;
        };
        tween.ticket.resolve(outcome);
        self.events.push(CameraEvent::AnimationFinished(outcome));
        tracing::debug!(?outcome, "camera animation finished");
        if self.state == CameraState::Animating {
            self.set_state(CameraState::Idle);
        }
        true
    }

    fn set_state(&mut self, next: CameraState) {
        let previous = core::mem::replace(&mut self.state, next);
        if previous == next {
            return;
        }
        tracing::debug!(
            from = previous.as_str(),
            to = next.as_str(),
            "camera state changed"
        );
        if next == CameraState::Interacting {
            self.events.push(CameraEvent::InteractionStarted);
        }
        if previous == CameraState::Interacting {
            self.events.push(CameraEvent::InteractionEnded);
        }
    }
}

/// Debug snapshot of a [`Camera`].
#[derive(Clone, Copy, Debug)]
pub struct CameraDebugInfo {
    /// Current state.
    pub state: CameraState,
    /// Viewport snapshot.
    pub viewport: ViewportDebugInfo,
    /// Current interactive zoom range.
    pub zoom_extent: ZoomExtent,
    /// Gesture transform waiting for the next frame.
    pub pending: Option<Transform>,
    /// Whether an animation is running.
    pub animating: bool,
    /// Number of attached renderers.
    pub renderers: usize,
    /// Mapping revision.
    pub revision: u64,
}
