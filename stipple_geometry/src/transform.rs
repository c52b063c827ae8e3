// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect};

/// Uniform scale + translation camera.
///
/// Maps a point `p` to `p * k + (x, y)`. The scale `k` is always positive in
/// transforms produced by this workspace.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// Scale factor.
    pub k: f64,
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Creates a transform from scale and translation.
    #[must_use]
    pub const fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    /// Applies the transform to a point.
    #[must_use]
    pub fn apply(&self, pt: Point) -> Point {
        Point::new(pt.x * self.k + self.x, pt.y * self.k + self.y)
    }

    /// Applies the inverse transform to a point.
    #[must_use]
    pub fn invert(&self, pt: Point) -> Point {
        Point::new((pt.x - self.x) / self.k, (pt.y - self.y) / self.k)
    }

    /// Applies the transform to a rectangle.
    #[must_use]
    pub fn apply_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(self.apply(rect.origin()), self.apply(Point::new(rect.x1, rect.y1)))
    }

    /// Applies the inverse transform to a rectangle.
    #[must_use]
    pub fn invert_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.invert(rect.origin()),
            self.invert(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Returns `outer ∘ self`: first apply `self`, then `outer`.
    #[must_use]
    pub fn then(&self, outer: Self) -> Self {
        Self {
            k: self.k * outer.k,
            x: self.x * outer.k + outer.x,
            y: self.y * outer.k + outer.y,
        }
    }

    /// Interpolates each component linearly: `a + (b - a) * t`.
    #[must_use]
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            k: a.k + (b.k - a.k) * t,
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }

    /// Returns `true` when every component differs by at most `epsilon`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.k - other.k).abs() <= epsilon
            && (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
    }

    /// Returns `true` when all components are finite and the scale is positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.k.is_finite() && self.k > 0.0 && self.x.is_finite() && self.y.is_finite()
    }

    /// Converts to a Kurbo affine, for handing to a drawing backend.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::new([self.k, 0.0, 0.0, self.k, self.x, self.y])
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::Transform;

    #[test]
    fn apply_and_invert_roundtrip() {
        let t = Transform::new(2.5, -10.0, 4.0);
        let p = Point::new(3.0, -7.0);
        let back = t.invert(t.apply(p));
        assert!((back.x - p.x).abs() < 1e-12);
        assert!((back.y - p.y).abs() < 1e-12);
    }

    #[test]
    fn then_composes_inner_first() {
        let inner = Transform::new(2.0, 1.0, 1.0);
        let outer = Transform::new(3.0, 5.0, -5.0);
        let p = Point::new(4.0, 2.0);
        let composed = inner.then(outer).apply(p);
        let stepwise = outer.apply(inner.apply(p));
        assert!((composed - stepwise).hypot() < 1e-12);
    }

    #[test]
    fn affine_matches_apply() {
        let t = Transform::new(0.5, 3.0, 9.0);
        let p = Point::new(-8.0, 12.0);
        let a = t.to_affine() * p;
        assert!((a - t.apply(p)).hypot() < 1e-12);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Transform::new(1.0, 0.0, 0.0);
        let b = Transform::new(4.0, 10.0, -2.0);
        assert_eq!(Transform::lerp(a, b, 0.0), a);
        assert_eq!(Transform::lerp(a, b, 1.0), b);
        assert!(Transform::lerp(a, b, 0.5).approx_eq(&Transform::new(2.5, 5.0, -1.0), 1e-12));
    }
}
