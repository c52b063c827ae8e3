// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};

use crate::bounds::expand_with_margin;
use crate::view_box::ViewBox;

/// Pixel margins of the canvas that are covered by other UI.
///
/// Occluded strips are excluded when framing content, so that panels laid over
/// the canvas never hide fitted dots.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Occlusion {
    /// Covered pixels along the left edge.
    pub left: f64,
    /// Covered pixels along the right edge.
    pub right: f64,
    /// Covered pixels along the top edge.
    pub top: f64,
    /// Covered pixels along the bottom edge.
    pub bottom: f64,
}

impl Occlusion {
    /// Nothing is covered.
    pub const NONE: Self = Self {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };

    /// Returns a copy with negative or non-finite margins replaced by zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            left: clean(self.left),
            right: clean(self.right),
            top: clean(self.top),
            bottom: clean(self.bottom),
        }
    }

    /// Returns the uncovered part of a canvas of `canvas` size, in canvas pixels.
    ///
    /// When the margins leave less than one pixel in either dimension the full
    /// canvas is returned instead, so that fitting always has an area to fill.
    #[must_use]
    pub fn visible_rect(&self, canvas: Size) -> Rect {
        let o = self.sanitized();
        let visible = Rect::new(o.left, o.top, canvas.width - o.right, canvas.height - o.bottom);
        if visible.width() < 1.0 || visible.height() < 1.0 {
            Rect::from_origin_size((0.0, 0.0), canvas)
        } else {
            visible
        }
    }
}

/// Computes the logical window that frames `bounds` inside the visible part of the canvas.
///
/// `bounds` is first grown by `margin_fraction` (see [`expand_with_margin`]).
/// The scale is the smaller of the width-driven and height-driven fits, so the
/// expanded bounds are never clipped; the window is positioned so that the
/// center of `bounds` lands on the center of the *visible* sub-rectangle. The
/// returned box has the canvas aspect ratio.
///
/// Returns `None` when the canvas has no area.
#[must_use]
pub fn occlusion_aware_view_box(
    bounds: Rect,
    canvas: Size,
    occlusion: Occlusion,
    margin_fraction: f64,
) -> Option<ViewBox> {
    if !(canvas.width > 0.0 && canvas.height > 0.0) {
        return None;
    }
    let target = expand_with_margin(bounds, margin_fraction);
    let visible = occlusion.visible_rect(canvas);

    // Canvas pixels per logical unit.
    let scale = (visible.width() / target.width()).min(visible.height() / target.height());
    let center = target.center();
    let visible_center = visible.center();

    Some(ViewBox::new(
        center.x - visible_center.x / scale,
        center.y - visible_center.y / scale,
        canvas.width / scale,
        canvas.height / scale,
    ))
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size};

    use super::*;

    fn to_canvas(vb: ViewBox, canvas: Size, p: Point) -> Point {
        let s = canvas.width / vb.width;
        Point::new((p.x - vb.x) * s, (p.y - vb.y) * s)
    }

    #[test]
    fn left_panel_shifts_centroid_into_visible_area() {
        let canvas = Size::new(1000.0, 500.0);
        let occlusion = Occlusion {
            left: 250.0,
            ..Occlusion::NONE
        };
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let vb = occlusion_aware_view_box(bounds, canvas, occlusion, 0.1).unwrap();

        let visible = occlusion.visible_rect(canvas);
        assert!((visible.width() / visible.height() - 750.0 / 500.0).abs() < 1e-12);

        let centroid = to_canvas(vb, canvas, Point::new(50.0, 25.0));
        assert!((centroid - visible.center()).hypot() < 1e-9);
        assert!((vb.x + 50.0).abs() < 1e-9);
        assert!((vb.y + 15.0).abs() < 1e-9);
        assert!((vb.width - 160.0).abs() < 1e-9);
    }

    #[test]
    fn full_occlusion_falls_back_to_whole_canvas() {
        let canvas = Size::new(200.0, 100.0);
        let occlusion = Occlusion {
            left: 150.0,
            right: 150.0,
            ..Occlusion::NONE
        };
        assert_eq!(
            occlusion.visible_rect(canvas),
            Rect::new(0.0, 0.0, 200.0, 100.0)
        );
    }

    #[test]
    fn negative_margins_are_ignored() {
        let o = Occlusion {
            left: -5.0,
            top: f64::NAN,
            ..Occlusion::NONE
        }
        .sanitized();
        assert_eq!(o, Occlusion::NONE);
    }

    #[test]
    fn zero_canvas_has_no_view_box() {
        let bounds = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!(occlusion_aware_view_box(bounds, Size::ZERO, Occlusion::NONE, 0.0).is_none());
    }
}
