// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Allowed interactive zoom range, relative to the baseline fit scale.
///
/// A scale of `1.0` is the comfortable fit the view box was computed for;
/// `min` and `max` bound how far interactive gestures may zoom out and in from
/// there. Programmatic fits may land outside the range, in which case the
/// range is widened (see [`ZoomExtent::widen_to_include`]) so that the fitted
/// scale stays reachable by later gestures.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoomExtent {
    min: f64,
    max: f64,
}

impl Default for ZoomExtent {
    fn default() -> Self {
        Self::new(0.5, 40.0)
    }
}

impl ZoomExtent {
    /// Creates an extent, normalizing so that `min <= max`.
    ///
    /// Non-finite or non-positive bounds fall back to the default range.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        let (min, max) = if valid(min) && valid(max) {
            if min <= max { (min, max) } else { (max, min) }
        } else {
            (0.5, 40.0)
        };
        Self { min, max }
    }

    /// Returns the lower bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamps a relative scale into the extent.
    #[must_use]
    pub fn clamp(&self, relative: f64) -> f64 {
        relative.clamp(self.min, self.max)
    }

    /// Returns `true` if the relative scale is inside the extent.
    #[must_use]
    pub fn contains(&self, relative: f64) -> bool {
        (self.min..=self.max).contains(&relative)
    }

    /// Grows the extent so that it contains `relative`. Returns `true` if it changed.
    pub fn widen_to_include(&mut self, relative: f64) -> bool {
        if !(relative.is_finite() && relative > 0.0) || self.contains(relative) {
            return false;
        }
        self.min = self.min.min(relative);
        self.max = self.max.max(relative);
        true
    }
}
