// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};
use stipple_geometry::{Occlusion, Transform, ViewBox, occlusion_aware_view_box};

/// Logical view box mapped onto a physical canvas, plus the camera transform.
///
/// Three coordinate spaces are involved:
/// - **data**: the units dots are positioned in.
/// - **view box**: data after the camera [`Transform`] (`p * k + (x, y)`).
/// - **canvas**: physical pixels. The view box is scaled uniformly to fit the
///   canvas and centered along the slack axis.
///
/// `Viewport` holds state and does the coordinate math; it never decides
/// *when* a transform changes. That is the [`Camera`](crate::Camera)'s job.
#[derive(Clone, Debug)]
pub struct Viewport {
    canvas: Size,
    view_box: ViewBox,
    occlusion: Occlusion,
    transform: Transform,
    // View box → canvas, rebuilt whenever the canvas or view box changes.
    px_per_unit: f64,
    canvas_offset: Vec2,
}

impl Viewport {
    /// Creates an unsized viewport over `view_box` with the identity transform.
    #[must_use]
    pub fn new(view_box: ViewBox) -> Self {
        let mut vp = Self {
            canvas: Size::ZERO,
            view_box,
            occlusion: Occlusion::NONE,
            transform: Transform::IDENTITY,
            px_per_unit: 1.0,
            canvas_offset: Vec2::ZERO,
        };
        vp.rebuild_mapping();
        vp
    }

    /// Returns the physical canvas size in pixels.
    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// Returns `true` once the canvas has a non-zero area.
    #[must_use]
    pub fn is_sized(&self) -> bool {
        self.canvas.width > 0.0 && self.canvas.height > 0.0
    }

    /// Sets the physical canvas size.
    ///
    /// The view box and transform are untouched; callers that want content to
    /// stay framed recompute the view box afterwards.
    pub fn set_canvas_size(&mut self, size: Size) {
        if self.canvas == size {
            return;
        }
        self.canvas = size;
        self.rebuild_mapping();
    }

    /// Returns the logical view box.
    #[must_use]
    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Replaces the logical view box.
    pub fn set_view_box(&mut self, view_box: ViewBox) {
        if self.view_box == view_box {
            return;
        }
        self.view_box = view_box;
        self.rebuild_mapping();
    }

    /// Returns the occluded canvas margins.
    #[must_use]
    pub fn occlusion(&self) -> Occlusion {
        self.occlusion
    }

    /// Sets the occluded canvas margins.
    pub fn set_occlusion(&mut self, occlusion: Occlusion) {
        self.occlusion = occlusion.sanitized();
    }

    /// Returns the camera transform (data → view box).
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Replaces the camera transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Canvas pixels per view-box unit.
    #[must_use]
    pub fn px_per_unit(&self) -> f64 {
        self.px_per_unit
    }

    /// Returns the view box → canvas mapping as a transform.
    #[must_use]
    pub fn view_box_to_canvas(&self) -> Transform {
        let s = self.px_per_unit;
        Transform::new(
            s,
            self.canvas_offset.x - self.view_box.x * s,
            self.canvas_offset.y - self.view_box.y * s,
        )
    }

    /// Returns the full data → canvas mapping for the current transform.
    ///
    /// This is the transform hit testing and raster drawing work in.
    #[must_use]
    pub fn screen_transform(&self) -> Transform {
        self.screen_transform_for(self.transform)
    }

    /// Returns the data → canvas mapping for an arbitrary camera transform.
    #[must_use]
    pub fn screen_transform_for(&self, camera: Transform) -> Transform {
        camera.then(self.view_box_to_canvas())
    }

    /// Converts a data-space point into canvas pixels.
    #[must_use]
    pub fn data_to_canvas(&self, pt: Point) -> Point {
        self.screen_transform().apply(pt)
    }

    /// Converts canvas pixels into a data-space point.
    #[must_use]
    pub fn canvas_to_data(&self, pt: Point) -> Point {
        self.screen_transform().invert(pt)
    }

    /// Converts canvas pixels into view-box coordinates.
    #[must_use]
    pub fn canvas_to_view_box(&self, pt: Point) -> Point {
        self.view_box_to_canvas().invert(pt)
    }

    /// Returns the part of the canvas not covered by other UI, in canvas pixels.
    #[must_use]
    pub fn visible_canvas_rect(&self) -> Rect {
        self.occlusion.visible_rect(self.canvas)
    }

    /// Returns the data-space rectangle currently visible through the
    /// non-occluded part of the canvas.
    #[must_use]
    pub fn visible_data_rect(&self) -> Rect {
        self.screen_transform()
            .invert_rect(self.visible_canvas_rect())
    }

    /// Returns `base` zoomed by `factor` about a canvas-space anchor.
    ///
    /// The data point under `anchor` stays under `anchor`. The resulting scale
    /// is clamped into `[min_k, max_k]`.
    #[must_use]
    pub fn zoomed_about(
        &self,
        base: Transform,
        anchor: Point,
        factor: f64,
        min_k: f64,
        max_k: f64,
    ) -> Transform {
        if !(factor.is_finite() && factor > 0.0) {
            return base;
        }
        let k = (base.k * factor).clamp(min_k, max_k);
        if (k - base.k).abs() < f64::EPSILON {
            return base;
        }
        let v = self.canvas_to_view_box(anchor);
        let data = base.invert(v);
        Transform::new(k, v.x - data.x * k, v.y - data.y * k)
    }

    /// Returns `base` panned by a delta in canvas pixels.
    ///
    /// The delta is converted to view-box units, so a pixel of pointer travel
    /// moves content by a pixel regardless of zoom level or data units.
    #[must_use]
    pub fn panned_by(&self, base: Transform, delta: Vec2) -> Transform {
        let d = delta / self.px_per_unit;
        Transform::new(base.k, base.x + d.x, base.y + d.y)
    }

    /// Returns the camera transform under which the current view box shows
    /// exactly what `target` would show.
    #[must_use]
    pub fn transform_for_view_box(&self, target: ViewBox) -> Transform {
        let s = self.px_per_unit;
        let target_scale =
            (self.canvas.width / target.width).min(self.canvas.height / target.height);
        let k = target_scale / s;
        // Canvas position of the target origin, centered along the slack axis.
        let offset = Vec2::new(
            (self.canvas.width - target.width * target_scale) * 0.5,
            (self.canvas.height - target.height * target_scale) * 0.5,
        );
        Transform::new(
            k,
            self.view_box.x + (offset.x - self.canvas_offset.x - target.x * target_scale) / s,
            self.view_box.y + (offset.y - self.canvas_offset.y - target.y * target_scale) / s,
        )
    }

    /// Returns the camera transform that frames `bounds` (grown by
    /// `margin_fraction`) inside the non-occluded part of the canvas.
    ///
    /// Returns `None` while the canvas is unsized.
    #[must_use]
    pub fn fit_transform(&self, bounds: Rect, margin_fraction: f64) -> Option<Transform> {
        let target =
            occlusion_aware_view_box(bounds, self.canvas, self.occlusion, margin_fraction)?;
        Some(self.transform_for_view_box(target))
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            canvas: self.canvas,
            view_box: self.view_box,
            occlusion: self.occlusion,
            transform: self.transform,
            screen_transform: self.screen_transform(),
            visible_data_rect: self.visible_data_rect(),
        }
    }

    fn rebuild_mapping(&mut self) {
        if !self.is_sized() {
            self.px_per_unit = 1.0;
            self.canvas_offset = Vec2::ZERO;
            return;
        }
        let vb = self.view_box;
        let s = (self.canvas.width / vb.width).min(self.canvas.height / vb.height);
        self.px_per_unit = s;
        self.canvas_offset = Vec2::new(
            (self.canvas.width - vb.width * s) * 0.5,
            (self.canvas.height - vb.height * s) * 0.5,
        );
    }
}

/// Debug snapshot of a [`Viewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// Physical canvas size.
    pub canvas: Size,
    /// Logical view box.
    pub view_box: ViewBox,
    /// Occluded canvas margins.
    pub occlusion: Occlusion,
    /// Camera transform (data → view box).
    pub transform: Transform,
    /// Data → canvas transform.
    pub screen_transform: Transform,
    /// Data-space rectangle visible through the non-occluded canvas.
    pub visible_data_rect: Rect,
}
