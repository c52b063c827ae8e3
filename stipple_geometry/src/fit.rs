// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::bounds::DEGENERATE_EXTENT;
use crate::view_box::ViewBox;

/// Alignment along one axis when a box grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisAlign {
    /// Keep the minimum edge fixed; growth goes towards the maximum edge.
    Min,
    /// Keep the center fixed; growth is split evenly.
    #[default]
    Center,
    /// Keep the maximum edge fixed; growth goes towards the minimum edge.
    Max,
}

impl AxisAlign {
    fn offset(self, growth: f64) -> f64 {
        match self {
            Self::Min => 0.0,
            Self::Center => growth * 0.5,
            Self::Max => growth,
        }
    }
}

/// The corner (or edge, or center) that stays put when [`fit_aspect`] grows a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    /// Horizontal alignment.
    pub x: AxisAlign,
    /// Vertical alignment.
    pub y: AxisAlign,
}

impl Anchor {
    /// Grow evenly around the center.
    pub const CENTER: Self = Self {
        x: AxisAlign::Center,
        y: AxisAlign::Center,
    };
    /// Keep the top-left corner fixed.
    pub const TOP_LEFT: Self = Self {
        x: AxisAlign::Min,
        y: AxisAlign::Min,
    };
    /// Keep the bottom-right corner fixed.
    pub const BOTTOM_RIGHT: Self = Self {
        x: AxisAlign::Max,
        y: AxisAlign::Max,
    };
}

/// Grows `view_box` in one dimension so that `width / height == target_aspect`.
///
/// The box never shrinks, so everything that was visible stays visible. The
/// `anchor` decides which side absorbs the growth. Non-positive or non-finite
/// targets return the box unchanged.
#[must_use]
pub fn fit_aspect(view_box: ViewBox, target_aspect: f64, anchor: Anchor) -> ViewBox {
    if !(target_aspect.is_finite() && target_aspect > DEGENERATE_EXTENT) {
        return view_box;
    }
    let current = view_box.aspect_ratio();
    if current < target_aspect {
        let width = view_box.height * target_aspect;
        let growth = width - view_box.width;
        ViewBox::new(
            view_box.x - anchor.x.offset(growth),
            view_box.y,
            width,
            view_box.height,
        )
    } else if current > target_aspect {
        let height = view_box.width / target_aspect;
        let growth = height - view_box.height;
        ViewBox::new(
            view_box.x,
            view_box.y - anchor.y.offset(growth),
            view_box.width,
            height,
        )
    } else {
        view_box
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widens_narrow_box_around_center() {
        let vb = ViewBox::new(0.0, 0.0, 100.0, 100.0);
        let out = fit_aspect(vb, 2.0, Anchor::CENTER);
        assert!((out.width - 200.0).abs() < 1e-9);
        assert!((out.height - 100.0).abs() < 1e-9);
        assert!((out.x + 50.0).abs() < 1e-9);
        assert_eq!(out.center(), vb.center());
    }

    #[test]
    fn heightens_wide_box_from_top_left() {
        let vb = ViewBox::new(10.0, 20.0, 200.0, 50.0);
        let out = fit_aspect(vb, 1.0, Anchor::TOP_LEFT);
        assert_eq!(out.origin(), vb.origin());
        assert!((out.height - 200.0).abs() < 1e-9);
        assert!((out.width - 200.0).abs() < 1e-9);
    }

    #[test]
    fn max_anchor_keeps_far_edge() {
        let vb = ViewBox::new(0.0, 0.0, 100.0, 100.0);
        let out = fit_aspect(vb, 0.5, Anchor::BOTTOM_RIGHT);
        assert!((out.y + 100.0).abs() < 1e-9);
        assert!((out.to_rect().y1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn never_shrinks() {
        let vb = ViewBox::new(0.0, 0.0, 30.0, 70.0);
        for target in [0.1, 0.5, 1.0, 3.0, 10.0] {
            let out = fit_aspect(vb, target, Anchor::CENTER);
            assert!(out.width >= vb.width - 1e-9);
            assert!(out.height >= vb.height - 1e-9);
            assert!((out.aspect_ratio() - target).abs() < 1e-9);
        }
    }

    #[test]
    fn invalid_target_is_ignored() {
        let vb = ViewBox::new(0.0, 0.0, 30.0, 70.0);
        assert_eq!(fit_aspect(vb, 0.0, Anchor::CENTER), vb);
        assert_eq!(fit_aspect(vb, f64::NAN, Anchor::CENTER), vb);
    }
}
