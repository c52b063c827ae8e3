// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame budget: throttle expensive per-frame work and degrade under load.
//!
//! # Flow
//!
//! ```text
//! begin_frame(now) ── stride not elapsed ──▶ skip this refresh
//!        │
//!        ▼ run the work, measure it
//! record(cost) ── EWMA over budget ──▶ Degrade (stride + 1, iterations / 2)
//!        │
//!        └── sustained headroom ──▶ Recover (stride - 1, iterations * 2)
//! ```
//!
//! Recovery requires `recovery_frames` consecutive cheap frames so that a
//! single quiet frame does not make the level oscillate.

/// Configuration for [`FrameBudget`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrameBudgetConfig {
    /// Refresh rate the work is throttled to. Default: 60.
    pub target_fps: f64,
    /// Share of the frame interval the work may take. Default: 0.5.
    pub budget_fraction: f64,
    /// Smoothing factor for the cost average, in `(0, 1]`. Default: 0.25.
    pub smoothing: f64,
    /// Consecutive cheap frames required before recovering one level. Default: 10.
    pub recovery_frames: u32,
    /// Largest number of refreshes between two runs. Default: 4.
    pub max_stride: u32,
    /// Relaxation iterations per frame at full quality. Default: 8.
    pub max_iterations_per_frame: u32,
}

impl Default for FrameBudgetConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            budget_fraction: 0.5,
            smoothing: 0.25,
            recovery_frames: 10,
            max_stride: 4,
            max_iterations_per_frame: 8,
        }
    }
}

/// Outcome of [`FrameBudget::record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetDecision {
    /// Keep the current level.
    Hold,
    /// Work is overrunning; run less often and do less per run.
    Degrade,
    /// Sustained headroom; restore one level.
    Recover,
}

impl BudgetDecision {
    /// Stable string for structured logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hold => "hold",
            Self::Degrade => "degrade",
            Self::Recover => "recover",
        }
    }
}

/// Throttles and adapts per-frame work to a target rate.
#[derive(Clone, Debug)]
pub struct FrameBudget {
    config: FrameBudgetConfig,
    last_run: Option<u64>,
    stride: u32,
    iterations: u32,
    average_cost_ms: Option<f64>,
    good_streak: u32,
}

impl FrameBudget {
    /// Creates a budget at full quality.
    #[must_use]
    pub fn new(config: FrameBudgetConfig) -> Self {
        let config = FrameBudgetConfig {
            target_fps: if config.target_fps.is_finite() && config.target_fps > 0.0 {
                config.target_fps
            } else {
                FrameBudgetConfig::default().target_fps
            },
            smoothing: config.smoothing.clamp(0.01, 1.0),
            max_stride: config.max_stride.max(1),
            max_iterations_per_frame: config.max_iterations_per_frame.max(1),
            ..config
        };
        Self {
            config,
            last_run: None,
            stride: 1,
            iterations: config.max_iterations_per_frame,
            average_cost_ms: None,
            good_streak: 0,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &FrameBudgetConfig {
        &self.config
    }

    /// Returns the nominal frame interval in milliseconds.
    #[must_use]
    pub fn interval_ms(&self) -> f64 {
        1000.0 / self.config.target_fps
    }

    /// Decides whether throttled work runs on the refresh at `now_ms`.
    ///
    /// Returns `true` (and starts a new period) when at least `stride`
    /// intervals have elapsed since the previous run. One millisecond of slack
    /// absorbs refresh-timestamp jitter.
    pub fn begin_frame(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_run {
            let elapsed = now_ms.saturating_sub(last) as f64;
            if elapsed + 1.0 < self.interval_ms() * f64::from(self.stride) {
                return false;
            }
        }
        self.last_run = Some(now_ms);
        true
    }

    /// Feeds back the measured cost of the work done this frame.
    pub fn record(&mut self, cost_ms: f64) -> BudgetDecision {
        if !cost_ms.is_finite() || cost_ms < 0.0 {
            return BudgetDecision::Hold;
        }
        let average = match self.average_cost_ms {
            Some(prev) => prev + (cost_ms - prev) * self.config.smoothing,
            None => cost_ms,
        };
        self.average_cost_ms = Some(average);

        let budget = self.interval_ms() * self.config.budget_fraction;
        let max_iterations = self.config.max_iterations_per_frame;
        if average > budget {
            self.good_streak = 0;
            if self.stride >= self.config.max_stride && self.iterations <= 1 {
                return BudgetDecision::Hold;
            }
            self.stride = (self.stride + 1).min(self.config.max_stride);
            self.iterations = (self.iterations / 2).max(1);
            tracing::debug!(
                average_cost_ms = average,
                budget_ms = budget,
                stride = self.stride,
                iterations = self.iterations,
                "frame budget degraded"
            );
            return BudgetDecision::Degrade;
        }

        if average < budget * 0.5 && (self.stride > 1 || self.iterations < max_iterations) {
            self.good_streak += 1;
            if self.good_streak >= self.config.recovery_frames {
                self.good_streak = 0;
                self.stride = (self.stride - 1).max(1);
                self.iterations = (self.iterations * 2).min(max_iterations);
                tracing::debug!(
                    average_cost_ms = average,
                    stride = self.stride,
                    iterations = self.iterations,
                    "frame budget recovered"
                );
                return BudgetDecision::Recover;
            }
        } else {
            self.good_streak = 0;
        }
        BudgetDecision::Hold
    }

    /// Number of refreshes between two runs of throttled work (1 = every refresh).
    #[must_use]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Relaxation iterations to run per frame at the current level.
    #[must_use]
    pub fn iterations_per_frame(&self) -> u32 {
        self.iterations
    }

    /// Smoothed cost of recent frames, if any were recorded.
    #[must_use]
    pub fn average_cost_ms(&self) -> Option<f64> {
        self.average_cost_ms
    }

    /// Returns `true` when running below full quality.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.stride > 1 || self.iterations < self.config.max_iterations_per_frame
    }

    /// Forgets timing history and returns to full quality.
    pub fn reset(&mut self) {
        self.last_run = None;
        self.stride = 1;
        self.iterations = self.config.max_iterations_per_frame;
        self.average_cost_ms = None;
        self.good_streak = 0;
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::{BudgetDecision, FrameBudget, FrameBudgetConfig};

    #[test]
    fn throttles_to_target_rate() {
        let mut b = FrameBudget::new(FrameBudgetConfig {
            target_fps: 30.0,
            ..FrameBudgetConfig::default()
        });
        assert!(b.begin_frame(0));
        assert!(!b.begin_frame(16));
        assert!(b.begin_frame(33));
        assert!(!b.begin_frame(50));
        assert!(b.begin_frame(67));
    }

    #[test]
    #[traced_test]
    fn sustained_overrun_degrades() {
        let mut b = FrameBudget::new(FrameBudgetConfig::default());
        assert_eq!(b.record(30.0), BudgetDecision::Degrade);
        assert_eq!(b.stride(), 2);
        assert_eq!(b.iterations_per_frame(), 4);
        assert!(b.is_degraded());
        assert!(logs_contain("frame budget degraded"));

        // Stride now doubles the throttle period.
        assert!(b.begin_frame(0));
        assert!(!b.begin_frame(17));
        assert!(b.begin_frame(33));
    }

    #[test]
    fn degradation_is_bounded() {
        let mut b = FrameBudget::new(FrameBudgetConfig::default());
        for _ in 0..20 {
            b.record(100.0);
        }
        assert_eq!(b.stride(), 4);
        assert_eq!(b.iterations_per_frame(), 1);
        assert_eq!(b.record(100.0), BudgetDecision::Hold);
    }

    #[test]
    fn recovers_after_streak() {
        let mut b = FrameBudget::new(FrameBudgetConfig {
            smoothing: 1.0,
            recovery_frames: 3,
            ..FrameBudgetConfig::default()
        });
        b.record(50.0);
        assert!(b.is_degraded());
        assert_eq!(b.record(0.5), BudgetDecision::Hold);
        assert_eq!(b.record(0.5), BudgetDecision::Hold);
        assert_eq!(b.record(0.5), BudgetDecision::Recover);
        assert!(!b.is_degraded());
        assert_eq!(b.record(0.5), BudgetDecision::Hold);
    }

    #[test]
    fn bad_samples_are_ignored() {
        let mut b = FrameBudget::new(FrameBudgetConfig::default());
        assert_eq!(b.record(f64::NAN), BudgetDecision::Hold);
        assert_eq!(b.record(-1.0), BudgetDecision::Hold);
        assert!(b.average_cost_ms().is_none());
    }

    #[test]
    fn reset_restores_full_quality() {
        let mut b = FrameBudget::new(FrameBudgetConfig::default());
        b.record(100.0);
        b.reset();
        assert!(!b.is_degraded());
        assert!(b.begin_frame(5));
    }
}
