// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::GeometryError;

/// Smallest width/height a box is given before it takes part in fitting math.
pub const DEGENERATE_EXTENT: f64 = 1e-6;

/// Computes the axis-aligned bounds of a set of points.
///
/// Fails with [`GeometryError::EmptyInput`] when `points` yields nothing.
pub fn compute_bounds<I>(points: I) -> Result<Rect, GeometryError>
where
    I: IntoIterator<Item = Point>,
{
    let mut iter = points.into_iter();
    let first = iter.next().ok_or(GeometryError::EmptyInput)?;
    Ok(iter.fold(Rect::from_points(first, first), |acc, pt| acc.union_pt(pt)))
}

/// Computes the bounds of a set of circles given as `(center, radius)` pairs.
///
/// Negative radii are treated as zero.
pub fn compute_circle_bounds<I>(circles: I) -> Result<Rect, GeometryError>
where
    I: IntoIterator<Item = (Point, f64)>,
{
    let mut iter = circles.into_iter().map(|(center, radius)| {
        let r = radius.max(0.0);
        Rect::new(center.x - r, center.y - r, center.x + r, center.y + r)
    });
    let first = iter.next().ok_or(GeometryError::EmptyInput)?;
    Ok(iter.fold(first, |acc, rect| acc.union(rect)))
}

/// Returns `rect` with any zero (or negative) dimension widened to
/// [`DEGENERATE_EXTENT`] around its center.
#[must_use]
pub fn non_degenerate(rect: Rect) -> Rect {
    let rect = rect.abs();
    let center = rect.center();
    let half_w = rect.width().max(DEGENERATE_EXTENT) * 0.5;
    let half_h = rect.height().max(DEGENERATE_EXTENT) * 0.5;
    Rect::new(
        center.x - half_w,
        center.y - half_h,
        center.x + half_w,
        center.y + half_h,
    )
}

/// Grows `rect` by `margin_fraction` of its size on every side.
///
/// The resulting width is `width * (1 + 2 * margin_fraction)` (likewise for the
/// height) and the center is unchanged. Negative fractions are treated as zero.
#[must_use]
pub fn expand_with_margin(rect: Rect, margin_fraction: f64) -> Rect {
    let rect = non_degenerate(rect);
    let m = margin_fraction.max(0.0);
    rect.inflate(rect.width() * m, rect.height() * m)
}
