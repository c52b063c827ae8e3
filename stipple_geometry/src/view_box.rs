// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};

use crate::bounds::DEGENERATE_EXTENT;

/// The logical coordinate window mapped onto the physical canvas.
///
/// Width and height are always strictly positive; constructors widen smaller
/// values to [`DEGENERATE_EXTENT`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewBox {
    /// Logical x of the top-left corner.
    pub x: f64,
    /// Logical y of the top-left corner.
    pub y: f64,
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
}

impl ViewBox {
    /// Creates a view box, widening non-positive extents to [`DEGENERATE_EXTENT`].
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(DEGENERATE_EXTENT),
            height: height.max(DEGENERATE_EXTENT),
        }
    }

    /// Creates a view box covering `rect`.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// Creates a view box with its origin at zero matching `size`.
    #[must_use]
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Returns the view box as a rectangle.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Returns the top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the logical size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns `width / height`.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}
