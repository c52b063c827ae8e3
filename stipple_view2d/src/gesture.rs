// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw camera gestures and wheel normalization.

use kurbo::{Point, Size, Vec2};

bitflags::bitflags! {
    /// Keyboard modifiers held during a gesture.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 1 << 0;
        /// Control key. Trackpad pinches also arrive as control + wheel.
        const CTRL = 1 << 1;
        /// Alt / Option key.
        const ALT = 1 << 2;
        /// Meta / Command key.
        const META = 1 << 3;
    }
}

impl Modifiers {
    /// Returns `true` if these modifiers turn a wheel event into a zoom.
    #[must_use]
    pub fn zooms(self) -> bool {
        self.intersects(Self::CTRL | Self::META)
    }
}

/// Unit of a wheel delta, as reported by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeltaMode {
    /// Pixels.
    #[default]
    Pixel,
    /// Lines of text.
    Line,
    /// Whole pages.
    Page,
}

/// Pixels per line for [`DeltaMode::Line`] wheel deltas.
pub const LINE_HEIGHT_PX: f64 = 16.0;

/// A pointer or wheel gesture aimed at the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A wheel (or trackpad scroll/pinch) event.
    Wheel {
        /// Pointer position in canvas pixels.
        position: Point,
        /// Scroll delta in `mode` units; positive `y` scrolls down.
        delta: Vec2,
        /// Unit of `delta`.
        mode: DeltaMode,
        /// Modifiers held.
        modifiers: Modifiers,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// A background drag begins.
    PanStart {
        /// Pointer position in canvas pixels.
        position: Point,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// The background drag moves.
    PanMove {
        /// Pointer position in canvas pixels.
        position: Point,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// The background drag ends.
    PanEnd {
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
}

impl GestureEvent {
    /// Returns the timestamp of the event.
    #[must_use]
    pub fn time_ms(&self) -> u64 {
        match *self {
            Self::Wheel { time_ms, .. }
            | Self::PanStart { time_ms, .. }
            | Self::PanMove { time_ms, .. }
            | Self::PanEnd { time_ms } => time_ms,
        }
    }
}

/// Converts a wheel delta to canvas pixels.
#[must_use]
pub fn wheel_delta_px(delta: Vec2, mode: DeltaMode, canvas: Size) -> Vec2 {
    match mode {
        DeltaMode::Pixel => delta,
        DeltaMode::Line => delta * LINE_HEIGHT_PX,
        DeltaMode::Page => Vec2::new(delta.x * canvas.width, delta.y * canvas.height),
    }
}

/// Returns the multiplicative zoom factor for a zooming wheel event.
///
/// Scrolling up (negative `delta_y`) zooms in. Pinch gestures report small
/// deltas with control held, so control-wheel is ten times as sensitive.
#[must_use]
pub fn wheel_zoom_factor(delta_y: f64, mode: DeltaMode, modifiers: Modifiers) -> f64 {
    let unit = match mode {
        DeltaMode::Pixel => 0.002,
        DeltaMode::Line => 0.05,
        DeltaMode::Page => 1.0,
    };
    let boost = if modifiers.contains(Modifiers::CTRL) {
        10.0
    } else {
        1.0
    };
    2.0_f64.powf(-delta_y * unit * boost)
}
