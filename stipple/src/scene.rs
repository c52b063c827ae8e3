// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owner-facing scene.

use core::fmt;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};
use stipple_decollide::{FramePolicy, LayoutResolver, LayoutSnapshot, LayoutUpdate};
use stipple_event_state::dispatcher::{
    Dispatcher, DispatcherConfig, InteractionEvent, InteractionEvents,
};
use stipple_geometry::{
    Dot, Occlusion, Transform, ViewBox, compute_circle_bounds, occlusion_aware_view_box,
};
use stipple_index::HitGrid;
use stipple_timing::{BudgetDecision, Debouncer, FrameBudget};
use stipple_view2d::{
    AnimationTicket, AutoFitDecision, AutoFitPolicy, Camera, CameraEvent, DeltaMode, GestureEvent,
    Modifiers, PreconditionError, Renderer, RendererId,
};

use crate::callbacks::SceneCallbacks;
use crate::config::SceneConfig;
use crate::point::{PointId, PointInput, ScenePoint, ValidationError, validate_points};

/// A point at its displayed position, as handed to the hit grid.
struct Placed<'a> {
    point: &'a ScenePoint,
    position: Point,
}

impl Dot for Placed<'_> {
    type Id = PointId;

    fn id(&self) -> &PointId {
        &self.point.id
    }

    fn center(&self) -> Point {
        self.position
    }
}

/// What changed during a [`Scene::frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Camera transform applied this frame, if it moved. Renderers have
    /// already received the matching screen transform.
    pub transform: Option<Transform>,
    /// Displayed positions changed; redraw the dots.
    pub layout_changed: bool,
}

/// A pannable, zoomable canvas of dots.
///
/// The scene wires the pieces together and owns all of their state:
/// validated points, the [`Camera`], the collision [`LayoutResolver`], the
/// pointer [`Dispatcher`] and a [`HitGrid`] over the displayed positions.
///
/// ## Driving a scene
///
/// - Feed data with [`Scene::set_points`] and the canvas size with
///   [`Scene::resize`].
/// - Forward pointer and wheel input ([`Scene::pointer_move`],
///   [`Scene::pointer_down`], [`Scene::pointer_up`], [`Scene::wheel`]).
/// - Call [`Scene::frame`] once per display refresh. Camera movement reaches
///   attached renderers from inside this call; when
///   [`FrameReport::layout_changed`] is set, redraw from [`Scene::layout`].
///
/// The hit grid is rebuilt lazily before the first query after any change to
/// the camera mapping or to the displayed positions, and is never patched.
pub struct Scene {
    config: SceneConfig,
    camera: Camera,
    view_box_ready: bool,
    points: Vec<ScenePoint>,
    index: HashMap<PointId, usize>,
    layout: LayoutSnapshot<PointId>,
    layout_revision: u64,
    resolver: LayoutResolver<PointId>,
    dispatcher: Dispatcher<PointId>,
    grid: Option<(HitGrid<PointId>, (u64, u64))>,
    auto_fit: AutoFitPolicy,
    fit_pending: bool,
    resize: Debouncer,
    pending_canvas: Option<Size>,
    budget: FrameBudget,
    callbacks: SceneCallbacks,
    panning: bool,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("points", &self.points.len())
            .field("camera", &self.camera)
            .field("resolver", &self.resolver)
            .field("layout_revision", &self.layout_revision)
            .field("grid", &self.grid.as_ref().map(|(grid, _)| grid.stats()))
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    /// Creates an empty scene. Nothing is shown until points arrive and the
    /// canvas is sized.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        let mut camera = Camera::new(ViewBox::new(0.0, 0.0, 1.0, 1.0), config.camera);
        camera.set_occlusion(config.occlusion);
        Self {
            camera,
            view_box_ready: false,
            points: Vec::new(),
            index: HashMap::new(),
            layout: LayoutSnapshot::from_pairs(core::iter::empty()),
            layout_revision: 0,
            resolver: LayoutResolver::new(config.relaxation),
            dispatcher: Dispatcher::new(DispatcherConfig {
                click: config.click,
                drag_enabled: false,
            }),
            grid: None,
            auto_fit: AutoFitPolicy::new(config.auto_fit, config.auto_fit_duration_ms),
            fit_pending: false,
            resize: Debouncer::new(config.resize_debounce_ms),
            pending_canvas: None,
            budget: FrameBudget::new(config.frame_budget),
            callbacks: SceneCallbacks::default(),
            panning: false,
            config,
        }
    }

    /// Replaces the owner callbacks.
    pub fn set_callbacks(&mut self, callbacks: SceneCallbacks) {
        self.dispatcher.set_drag_enabled(callbacks.drag_enabled());
        self.callbacks = callbacks;
    }

    /// Builder form of [`Scene::set_callbacks`].
    #[must_use]
    pub fn with_callbacks(mut self, callbacks: SceneCallbacks) -> Self {
        self.set_callbacks(callbacks);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Returns the camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Attaches a renderer; it receives the screen transform on every camera
    /// change.
    pub fn attach_renderer(&mut self, renderer: impl Renderer + 'static) -> RendererId {
        let id = self.camera.attach_renderer(renderer);
        self.camera.redraw();
        id
    }

    /// Detaches a renderer.
    pub fn detach_renderer(&mut self, id: RendererId) -> bool {
        self.camera.detach_renderer(id)
    }

    /// Replaces the point set.
    ///
    /// Invalid records are dropped, logged, and returned; the rest are shown.
    /// Starts a collision run when enabled (live for the first layout, with
    /// only the eased result for later ones) and auto-fits if the new content
    /// is not fully visible.
    pub fn set_points<I>(&mut self, inputs: I, now_ms: u64) -> Vec<ValidationError>
    where
        I: IntoIterator<Item = PointInput>,
    {
        let (points, errors) = validate_points(inputs, self.config.default_radius);
        tracing::info!(points = points.len(), dropped = errors.len(), "points replaced");
        self.index = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        self.points = points;

        let hovered_gone = self
            .dispatcher
            .hovered()
            .is_some_and(|id| !self.index.contains_key(id));
        let dragged_gone = self
            .dispatcher
            .dragging()
            .is_some_and(|id| !self.index.contains_key(id));
        if hovered_gone || dragged_gone {
            self.dispatcher.reset();
            if hovered_gone && let Some(hover) = self.callbacks.hover.as_mut() {
                hover(None);
            }
        }

        if self.config.decollide && !self.points.is_empty() {
            // Known points stay where they were until the new layout arrives.
            let stable = self.resolver.stable();
            self.layout = LayoutSnapshot::from_pairs(self.points.iter().map(|p| {
                let at = stable.and_then(|s| s.get(&p.id)).unwrap_or(p.data);
                (p.id.clone(), at)
            }));
            let policy = if stable.is_some() {
                FramePolicy::FinalOnly
            } else {
                FramePolicy::EveryFrame
            };
            self.resolver.start(&self.points, |p| p.radius, policy);
        } else {
            self.resolver.reset();
            self.layout =
                LayoutSnapshot::from_pairs(self.points.iter().map(|p| (p.id.clone(), p.data)));
        }
        self.layout_revision += 1;

        self.auto_fit_content(now_ms);
        errors
    }

    /// Records a new physical canvas size.
    ///
    /// The first size applies at once; later ones are debounced and applied
    /// by [`Scene::frame`] once resizing goes quiet. Applying a size recomputes
    /// the occlusion-aware view box, keeping the camera transform.
    pub fn resize(&mut self, size: Size, now_ms: u64) {
        if !self.camera.viewport().is_sized() && self.pending_canvas.is_none() {
            self.commit_canvas(size, now_ms);
            return;
        }
        self.pending_canvas = Some(size);
        self.resize.poke(now_ms);
    }

    /// Sets the canvas margins covered by other UI.
    pub fn set_occlusion(&mut self, occlusion: Occlusion) {
        self.config.occlusion = occlusion;
        self.camera.set_occlusion(occlusion);
    }

    /// Animates the camera to frame all displayed points inside the visible
    /// part of the canvas.
    pub fn fit_to_visible(&mut self, now_ms: u64) -> Result<AnimationTicket, PreconditionError> {
        let circles: Vec<(Point, f64)> = self
            .points
            .iter()
            .map(|p| (self.layout.get(&p.id).unwrap_or(p.data), p.radius))
            .collect();
        let target = self.camera.fit_to_visible(
            circles,
            self.config.occlusion,
            self.config.margin_fraction,
        )?;
        self.camera.animate_to(
            target,
            self.config.animation_duration_ms,
            self.config.easing,
            now_ms,
        )
    }

    /// Animates a zoom by `factor` about the center of the visible region.
    pub fn zoom_by(
        &mut self,
        factor: f64,
        now_ms: u64,
    ) -> Result<AnimationTicket, PreconditionError> {
        self.camera.zoom_by(
            factor,
            self.config.animation_duration_ms,
            self.config.easing,
            now_ms,
        )
    }

    /// Cancels the collision run in flight; the displayed layout reverts to
    /// the last stable one at the next frame.
    pub fn cancel_layout(&mut self) -> bool {
        self.resolver.cancel()
    }

    /// Handles a pointer move in canvas pixels.
    pub fn pointer_move(&mut self, position: Point, now_ms: u64) {
        if self.panning {
            self.camera.apply_gesture(GestureEvent::PanMove {
                position,
                time_ms: now_ms,
            });
        }
        let hit = self.hit_test(position);
        let events = self
            .dispatcher
            .pointer_move(position, hit, self.camera.is_interacting());
        self.deliver(events);
    }

    /// Handles a pointer press. A press on empty canvas starts a pan.
    pub fn pointer_down(&mut self, position: Point, now_ms: u64) {
        let hit = self.hit_test(position);
        if hit.is_none() {
            self.camera.apply_gesture(GestureEvent::PanStart {
                position,
                time_ms: now_ms,
            });
            self.panning = true;
        }
        self.dispatcher.pointer_down(position, hit, now_ms);
    }

    /// Handles a pointer release.
    pub fn pointer_up(&mut self, position: Point, now_ms: u64) {
        let hit = self.hit_test(position);
        if core::mem::take(&mut self.panning) {
            self.camera.apply_gesture(GestureEvent::PanEnd { time_ms: now_ms });
        }
        let events = self.dispatcher.pointer_up(position, hit.as_ref(), now_ms);
        self.deliver(events);
    }

    /// Handles the pointer leaving the canvas.
    pub fn pointer_leave(&mut self) {
        let events = self.dispatcher.pointer_leave();
        self.deliver(events);
    }

    /// Handles a wheel event: zoom about the pointer with control or meta
    /// held, pan otherwise. Returns the pending camera transform.
    pub fn wheel(
        &mut self,
        position: Point,
        delta: Vec2,
        mode: DeltaMode,
        modifiers: Modifiers,
        now_ms: u64,
    ) -> Transform {
        self.camera.apply_gesture(GestureEvent::Wheel {
            position,
            delta,
            mode,
            modifiers,
            time_ms: now_ms,
        })
    }

    /// Advances by one display refresh.
    ///
    /// Applies a settled resize, moves the camera (broadcasting to
    /// renderers), reports camera start/end to the owner, and runs as much
    /// layout work as the frame budget allows.
    pub fn frame(&mut self, now_ms: u64) -> FrameReport {
        if self.resize.poll(now_ms)
            && let Some(size) = self.pending_canvas.take()
        {
            self.commit_canvas(size, now_ms);
        }
        let transform = self.camera.frame(now_ms);
        for event in self.camera.drain_events() {
            let handler = match event {
                CameraEvent::InteractionStarted | CameraEvent::AnimationStarted => {
                    self.callbacks.zoom_start.as_mut()
                }
                CameraEvent::InteractionEnded | CameraEvent::AnimationFinished(_) => {
                    self.callbacks.zoom_end.as_mut()
                }
            };
            if let Some(handler) = handler {
                handler();
            }
        }
        let layout_changed = self.step_layout(now_ms);
        FrameReport {
            transform,
            layout_changed,
        }
    }

    /// Feeds back how long the host spent on this frame's work; returns the
    /// budget's decision.
    pub fn record_frame_cost(&mut self, cost_ms: f64) -> BudgetDecision {
        self.budget.record(cost_ms)
    }

    /// Returns the validated points in paint order.
    #[must_use]
    pub fn points(&self) -> &[ScenePoint] {
        &self.points
    }

    /// Returns a point by id.
    #[must_use]
    pub fn point(&self, id: &PointId) -> Option<&ScenePoint> {
        lookup(&self.points, &self.index, id)
    }

    /// Returns the displayed positions, in data units.
    #[must_use]
    pub fn layout(&self) -> &LayoutSnapshot<PointId> {
        &self.layout
    }

    /// Returns the last fully converged layout, if any.
    #[must_use]
    pub fn stable_layout(&self) -> Option<&LayoutSnapshot<PointId>> {
        self.resolver.stable()
    }

    /// Returns `true` when no collision run or layout transition is in flight.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.resolver.is_idle()
    }

    /// Returns the hovered point.
    #[must_use]
    pub fn hovered(&self) -> Option<&ScenePoint> {
        let id = self.dispatcher.hovered()?;
        lookup(&self.points, &self.index, id)
    }

    /// Returns the camera transform (data → view box).
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.camera.transform()
    }

    /// Returns the full data → canvas transform.
    #[must_use]
    pub fn screen_transform(&self) -> Transform {
        self.camera.screen_transform()
    }

    /// Returns the topmost point under a canvas position.
    pub fn point_at(&mut self, position: Point) -> Option<&ScenePoint> {
        let id = self.hit_test(position)?;
        lookup(&self.points, &self.index, &id)
    }

    /// Counts points whose displayed center lies in the non-occluded part of
    /// the canvas.
    pub fn visible_count(&mut self) -> usize {
        self.ensure_grid();
        let visible = self.camera.viewport().visible_canvas_rect();
        self.grid
            .as_ref()
            .map_or(0, |(grid, _)| grid.count_centers_in(visible))
    }

    fn commit_canvas(&mut self, size: Size, now_ms: u64) {
        tracing::debug!(width = size.width, height = size.height, "canvas resized");
        self.camera.set_canvas_size(size);
        if !self.view_box_ready || self.fit_pending {
            self.fit_pending = false;
            self.auto_fit_content(now_ms);
        } else if let Some(bounds) = self.data_bounds() {
            self.freeze_view_box(bounds);
        }
        self.camera.redraw();
    }

    fn auto_fit_content(&mut self, now_ms: u64) {
        let Some(bounds) = self.data_bounds() else {
            return;
        };
        if !self.camera.viewport().is_sized() {
            self.fit_pending = true;
            return;
        }
        if !self.view_box_ready {
            self.freeze_view_box(bounds);
        }
        let visible = self.camera.viewport().visible_data_rect();
        let AutoFitDecision::Fit { duration_ms } = self.auto_fit.on_new_content(bounds, visible)
        else {
            return;
        };
        let fitted = self
            .camera
            .fit_bounds(bounds, self.config.margin_fraction)
            .and_then(|target| {
                self.camera
                    .animate_to(target, duration_ms, self.config.easing, now_ms)
            });
        match fitted {
            Ok(_) => self.auto_fit.mark_fitted(),
            Err(error) => tracing::debug!(%error, "auto-fit skipped"),
        }
    }

    /// Recomputes the logical window for `bounds` on the current canvas.
    fn freeze_view_box(&mut self, bounds: Rect) {
        let viewport = self.camera.viewport();
        let Some(view_box) = occlusion_aware_view_box(
            bounds,
            viewport.canvas_size(),
            self.config.occlusion,
            self.config.margin_fraction,
        ) else {
            return;
        };
        self.camera.set_view_box(view_box);
        self.view_box_ready = true;
    }

    fn data_bounds(&self) -> Option<Rect> {
        compute_circle_bounds(self.points.iter().map(|p| (p.data, p.radius))).ok()
    }

    fn step_layout(&mut self, now_ms: u64) -> bool {
        if self.resolver.is_idle() || !self.budget.begin_frame(now_ms) {
            return false;
        }
        let Some(update) = self
            .resolver
            .step(now_ms, self.budget.iterations_per_frame())
        else {
            return false;
        };
        self.layout = match update {
            LayoutUpdate::Settled { snapshot, changed } => {
                if changed && let Some(done) = self.callbacks.decollision_complete.as_mut() {
                    done(&snapshot);
                }
                snapshot
            }
            LayoutUpdate::Progress(snapshot)
            | LayoutUpdate::Transition(snapshot)
            | LayoutUpdate::Reverted(snapshot)
            | LayoutUpdate::Unconverged(snapshot) => snapshot,
        };
        self.layout_revision += 1;
        true
    }

    fn ensure_grid(&mut self) {
        let key = (self.camera.revision(), self.layout_revision);
        if self.grid.as_ref().is_some_and(|(_, built)| *built == key) {
            return;
        }
        let viewport = self.camera.viewport();
        if !viewport.is_sized() {
            self.grid = None;
            return;
        }
        let clip = Rect::from_origin_size(Point::ORIGIN, viewport.canvas_size());
        let placed: Vec<Placed<'_>> = self
            .points
            .iter()
            .map(|point| Placed {
                point,
                position: self.layout.get(&point.id).unwrap_or(point.data),
            })
            .collect();
        let grid = HitGrid::build_within(
            &placed,
            |d| d.point.radius,
            self.camera.screen_transform(),
            self.config.cell_size,
            clip,
        );
        tracing::trace!(
            dots = grid.len(),
            camera_revision = key.0,
            layout_revision = key.1,
            "hit grid rebuilt"
        );
        self.grid = Some((grid, key));
    }

    fn hit_test(&mut self, position: Point) -> Option<PointId> {
        self.ensure_grid();
        let (grid, _) = self.grid.as_ref()?;
        grid.query(position).map(|entry| entry.id.clone())
    }

    fn deliver(&mut self, events: InteractionEvents<PointId>) {
        let points = &self.points;
        let index = &self.index;
        let callbacks = &mut self.callbacks;
        for event in events {
            match event {
                InteractionEvent::Enter(id) => {
                    if let Some(hover) = callbacks.hover.as_mut() {
                        hover(lookup(points, index, &id));
                    }
                }
                InteractionEvent::Leave(_) => {
                    if let Some(hover) = callbacks.hover.as_mut() {
                        hover(None);
                    }
                }
                InteractionEvent::Click(id) => {
                    if let (Some(click), Some(point)) =
                        (callbacks.click.as_mut(), lookup(points, index, &id))
                    {
                        click(point);
                    }
                }
                InteractionEvent::BackgroundClick => {
                    if let Some(background) = callbacks.background_click.as_mut() {
                        background();
                    }
                }
                InteractionEvent::DragStart(session) => {
                    if let (Some(handler), Some(point)) =
                        (callbacks.drag_start.as_mut(), lookup(points, index, &session.target))
                    {
                        handler(point, &session);
                    }
                }
                InteractionEvent::DragMove(session) => {
                    if let (Some(handler), Some(point)) =
                        (callbacks.drag_move.as_mut(), lookup(points, index, &session.target))
                    {
                        handler(point, &session);
                    }
                }
                InteractionEvent::DragEnd(session) => {
                    if let (Some(handler), Some(point)) =
                        (callbacks.drag_end.as_mut(), lookup(points, index, &session.target))
                    {
                        handler(point, &session);
                    }
                }
            }
        }
    }
}

fn lookup<'a>(
    points: &'a [ScenePoint],
    index: &HashMap<PointId, usize>,
    id: &PointId,
) -> Option<&'a ScenePoint> {
    index.get(id).and_then(|&i| points.get(i))
}
