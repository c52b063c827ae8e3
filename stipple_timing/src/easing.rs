// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::PI;

/// Easing curve applied to animation progress.
///
/// Every curve maps `0.0 → 0.0` and `1.0 → 1.0`; inputs are clamped to `[0, 1]`.
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Quadratic ease in and out.
    QuadInOut,
    /// Cubic ease in and out.
    #[default]
    CubicInOut,
    /// Cubic ease out: fast start, gentle landing.
    CubicOut,
    /// Sinusoidal ease in and out.
    SinInOut,
    /// Exponential ease out.
    ExpOut,
    /// Caller-supplied curve. It should map `0 → 0` and `1 → 1`.
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Maps linear progress `t` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::QuadInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t / 2.0
                } else {
                    let t = t - 1.0;
                    (t * (2.0 - t) + 1.0) / 2.0
                }
            }
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
            Self::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Self::SinInOut => (1.0 - (PI * t).cos()) / 2.0,
            Self::ExpOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * t)
                }
            }
            Self::Custom(f) => f(t),
        }
    }
}
