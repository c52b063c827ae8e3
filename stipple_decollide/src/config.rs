// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Parameters of the collision relaxation.
///
/// The defaults reproduce the usual force-layout schedule: energy (`alpha`)
/// starts at `1.0` and decays geometrically to `alpha_min` in about 300
/// iterations, with 40% of velocity lost per iteration. Overlaps left at the
/// end of the schedule are worked off by collision-only iterations, up to
/// `max_iterations` in total.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RelaxationConfig {
    /// Starting energy.
    pub alpha: f64,
    /// Energy floor. Below it anchors no longer pull and only collisions
    /// move dots.
    pub alpha_min: f64,
    /// Fraction of the remaining energy lost per iteration.
    pub alpha_decay: f64,
    /// Fraction of velocity lost per iteration.
    pub velocity_decay: f64,
    /// How much of an overlap is corrected per iteration, in `[0, 1]`.
    pub collide_strength: f64,
    /// Pull toward each dot's data position, scaled by `alpha`.
    pub anchor_strength: f64,
    /// Hard cap on iterations per run. A run stopped by the cap has not
    /// converged.
    pub max_iterations: u32,
    /// Overlap and movement below this many data units count as converged.
    pub tolerance: f64,
    /// Duration of the eased move between two stable layouts.
    pub transition_ms: u64,
}

const ALPHA_MIN: f64 = 0.001;
const SCHEDULE_ITERATIONS: f64 = 300.0;

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_min: ALPHA_MIN,
            alpha_decay: default_alpha_decay(),
            velocity_decay: 0.4,
            collide_strength: 1.0,
            anchor_strength: 0.1,
            max_iterations: 1_000,
            tolerance: 0.01,
            transition_ms: 350,
        }
    }
}

fn default_alpha_decay() -> f64 {
    1.0 - ALPHA_MIN.powf(1.0 / SCHEDULE_ITERATIONS)
}

impl RelaxationConfig {
    /// Replaces out-of-range values with their defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let pick = |v: f64, ok: bool, fallback: f64| if v.is_finite() && ok { v } else { fallback };
        Self {
            alpha: pick(self.alpha, self.alpha > 0.0, d.alpha),
            alpha_min: pick(self.alpha_min, self.alpha_min >= 0.0, d.alpha_min),
            alpha_decay: pick(
                self.alpha_decay,
                self.alpha_decay > 0.0 && self.alpha_decay < 1.0,
                d.alpha_decay,
            ),
            velocity_decay: pick(
                self.velocity_decay,
                (0.0..1.0).contains(&self.velocity_decay),
                d.velocity_decay,
            ),
            collide_strength: pick(self.collide_strength, true, d.collide_strength)
                .clamp(0.0, 1.0),
            anchor_strength: pick(
                self.anchor_strength,
                self.anchor_strength >= 0.0,
                d.anchor_strength,
            ),
            max_iterations: self.max_iterations.max(1),
            tolerance: pick(self.tolerance, self.tolerance > 0.0, d.tolerance),
            transition_ms: self.transition_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RelaxationConfig;

    #[test]
    fn default_schedule_reaches_floor_in_about_300_iterations() {
        let c = RelaxationConfig::default();
        let after = c.alpha * (1.0 - c.alpha_decay).powi(300);
        assert!((after - c.alpha_min).abs() < 1e-9);
    }

    #[test]
    fn sanitize_repairs_nonsense() {
        let c = RelaxationConfig {
            alpha: -1.0,
            alpha_decay: 1.5,
            velocity_decay: f64::NAN,
            collide_strength: 7.0,
            max_iterations: 0,
            tolerance: 0.0,
            ..RelaxationConfig::default()
        }
        .sanitized();
        let d = RelaxationConfig::default();
        assert_eq!(c.alpha, d.alpha);
        assert_eq!(c.alpha_decay, d.alpha_decay);
        assert_eq!(c.velocity_decay, d.velocity_decay);
        assert_eq!(c.collide_strength, 1.0);
        assert_eq!(c.max_iterations, 1);
        assert_eq!(c.tolerance, d.tolerance);
    }
}
