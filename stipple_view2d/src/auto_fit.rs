// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deciding when newly arrived content should trigger a fit.

use kurbo::Rect;

/// What to do after new content arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoFitDecision {
    /// Leave the camera alone.
    Skip,
    /// Fit the content, animating over `duration_ms` (zero means instantly).
    Fit {
        /// Animation duration in milliseconds.
        duration_ms: u64,
    },
}

/// Auto-fit-on-new-content policy.
///
/// The very first fit is instant so the initial load does not zoom in from
/// nowhere; later fits animate with the configured duration, and only happen
/// when the new content would not be fully visible.
#[derive(Clone, Debug)]
pub struct AutoFitPolicy {
    enabled: bool,
    duration_ms: u64,
    last_bounds: Option<Rect>,
    fitted: bool,
}

impl AutoFitPolicy {
    /// Creates a policy.
    #[must_use]
    pub fn new(enabled: bool, duration_ms: u64) -> Self {
        Self {
            enabled,
            duration_ms,
            last_bounds: None,
            fitted: false,
        }
    }

    /// Returns `true` if automatic fitting is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turns automatic fitting on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns the animation duration for fits after the first.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Returns the bounds of the last content seen.
    #[must_use]
    pub fn last_bounds(&self) -> Option<Rect> {
        self.last_bounds
    }

    /// Returns `true` once a fit has been applied.
    #[must_use]
    pub fn has_fitted(&self) -> bool {
        self.fitted
    }

    /// Considers content with `bounds` (data units) against the data-space
    /// rectangle currently visible.
    pub fn on_new_content(&mut self, bounds: Rect, visible: Rect) -> AutoFitDecision {
        let previous = self.last_bounds.replace(bounds);
        if !self.enabled {
            return AutoFitDecision::Skip;
        }
        if !self.fitted {
            return AutoFitDecision::Fit { duration_ms: 0 };
        }
        if previous == Some(bounds) || contains_rect(visible, bounds) {
            return AutoFitDecision::Skip;
        }
        AutoFitDecision::Fit {
            duration_ms: self.duration_ms,
        }
    }

    /// Records that a fit was applied. Call only when the fit succeeded, so a
    /// fit attempted before the canvas was sized is retried instantly.
    pub fn mark_fitted(&mut self) {
        self.fitted = true;
    }

    /// Forgets all history; the next content gets an instant fit again.
    pub fn reset(&mut self) {
        self.last_bounds = None;
        self.fitted = false;
    }
}

impl Default for AutoFitPolicy {
    fn default() -> Self {
        Self::new(true, 500)
    }
}

fn contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}
