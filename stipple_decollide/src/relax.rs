// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The relaxation itself: a lazy iterator of improving layouts.

use core::f64::consts::TAU;
use core::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hashbrown::HashMap;
use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use stipple_geometry::Dot;

use crate::config::RelaxationConfig;
use crate::snapshot::LayoutSnapshot;

/// Below this distance two centers count as coincident.
const COINCIDENT: f64 = 1e-6;

/// Cooperative cancellation flag for a [`LayoutRun`].
///
/// Cloneable and shareable; the run observes it at the next iteration
/// boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Creates an uncancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns `true` once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// One iteration's worth of output from a [`LayoutRun`].
#[derive(Clone, Debug)]
pub struct LayoutStep<K> {
    /// 1-based iteration number.
    pub iteration: u32,
    /// Energy after this iteration.
    pub alpha: f64,
    /// Deepest overlap seen this iteration, in data units.
    pub max_overlap: f64,
    /// Whether the run has ended with this step.
    pub finished: bool,
    /// Whether the run ended with no overlap deeper than the tolerance
    /// (rather than at the iteration cap).
    pub converged: bool,
    /// Positions after this iteration.
    pub snapshot: LayoutSnapshot<K>,
}

/// A lazy, finite relaxation of overlapping circles.
///
/// Each call to [`Iterator::next`] runs one iteration and yields the improved
/// layout as an immutable [`LayoutSnapshot`]. An iteration:
/// 1. decays the energy `alpha`;
/// 2. pulls every dot toward its data position, scaled by `alpha`;
/// 3. pushes apart every overlapping pair in proportion to overlap depth,
///    splitting the correction by radius so small dots yield to large ones;
/// 4. applies damped velocities.
///
/// The run converges when no overlap exceeds the tolerance and movement has
/// died down. Once `alpha` drops below `alpha_min` anchors stop pulling, so
/// overlaps left at the end of the schedule are pushed apart by collision
/// alone. A run that reaches `max_iterations` first ends unconverged. It
/// yields nothing once its [`CancelHandle`] is cancelled.
///
/// Overlap candidates are found with a hashed grid of cell size equal to the
/// largest diameter, so an iteration costs `O(n)` for evenly spread dots.
pub struct LayoutRun<K> {
    config: RelaxationConfig,
    start: LayoutSnapshot<K>,
    anchors: Vec<Point>,
    positions: Vec<Point>,
    velocities: Vec<Vec2>,
    radii: Vec<f64>,
    max_radius: f64,
    alpha: f64,
    iteration: u32,
    done: bool,
    cancel: CancelHandle,
    cells: HashMap<(i64, i64), SmallVec<[u32; 8]>>,
}

impl<K: core::fmt::Debug> core::fmt::Debug for LayoutRun<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutRun")
            .field("dots", &self.positions.len())
            .field("alpha", &self.alpha)
            .field("iteration", &self.iteration)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<K: Clone + Eq + Hash> LayoutRun<K> {
    /// Starts a cold run from the dots' data positions.
    ///
    /// `radius_of` returns each dot's radius in data units.
    pub fn new<D, F>(dots: &[D], radius_of: F, config: RelaxationConfig) -> Self
    where
        D: Dot<Id = K>,
        F: Fn(&D) -> f64,
    {
        Self::warm(dots, radius_of, config, None)
    }

    /// Starts a run whose dots begin at their position in `start` when
    /// present there, and at their data position otherwise.
    ///
    /// Data positions stay the anchors either way.
    pub fn warm<D, F>(
        dots: &[D],
        radius_of: F,
        config: RelaxationConfig,
        start: Option<&LayoutSnapshot<K>>,
    ) -> Self
    where
        D: Dot<Id = K>,
        F: Fn(&D) -> f64,
    {
        let config = config.sanitized();
        let ids: Arc<[K]> = dots.iter().map(|d| d.id().clone()).collect();
        let anchors: Vec<Point> = dots.iter().map(Dot::center).collect();
        let positions: Vec<Point> = dots
            .iter()
            .map(|d| start.and_then(|s| s.get(d.id())).unwrap_or_else(|| d.center()))
            .collect();
        let radii: Vec<f64> = dots
            .iter()
            .map(|d| {
                let r = radius_of(d);
                if r.is_finite() { r.max(0.0) } else { 0.0 }
            })
            .collect();
        let max_radius = radii.iter().copied().fold(0.0, f64::max);
        let start = LayoutSnapshot::from_parts(ids, positions.clone());
        Self {
            config,
            start,
            velocities: vec![Vec2::ZERO; anchors.len()],
            anchors,
            positions,
            radii,
            max_radius,
            alpha: config.alpha,
            iteration: 0,
            done: false,
            cancel: CancelHandle::new(),
            cells: HashMap::new(),
        }
    }
}

impl<K> LayoutRun<K> {
    /// Returns a handle that cancels this run.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Cancels this run.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns `true` once the run has ended, by finishing or by cancellation.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done || self.is_cancelled()
    }

    /// Returns the layout the run started from.
    #[must_use]
    pub fn start(&self) -> &LayoutSnapshot<K> {
        &self.start
    }

    /// Returns the data positions the run pulls dots toward.
    #[must_use]
    pub fn anchors(&self) -> LayoutSnapshot<K> {
        self.start.with_positions(self.anchors.clone())
    }

    /// Returns the current working layout.
    #[must_use]
    pub fn current(&self) -> LayoutSnapshot<K> {
        self.start.with_positions(self.positions.clone())
    }

    /// Returns the number of iterations run so far.
    #[must_use]
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Returns the current energy.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Runs to the end and returns the final layout, or `None` if cancelled.
    pub fn settle(self) -> Option<LayoutSnapshot<K>> {
        self.last().filter(|s| s.finished).map(|s| s.snapshot)
    }

    fn apply_anchors(&mut self) {
        if self.alpha < self.config.alpha_min {
            return;
        }
        let pull = self.config.anchor_strength * self.alpha;
        if pull == 0.0 {
            return;
        }
        for ((v, p), a) in self
            .velocities
            .iter_mut()
            .zip(&self.positions)
            .zip(&self.anchors)
        {
            *v += (*a - *p) * pull;
        }
    }

    /// Pushes overlapping pairs apart; returns the deepest overlap seen.
    fn collide(&mut self) -> f64 {
        if self.max_radius <= 0.0 {
            return 0.0;
        }
        let cell = self.max_radius * 2.0;
        self.cells.clear();
        for (i, (p, v)) in self.positions.iter().zip(&self.velocities).enumerate() {
            let q = *p + *v;
            let Ok(slot) = u32::try_from(i) else { break };
            if q.is_finite() {
                self.cells.entry(cell_of(q, cell)).or_default().push(slot);
            }
        }

        let strength = self.config.collide_strength;
        let mut max_overlap = 0.0_f64;
        for i in 0..self.positions.len() {
            let ri = self.radii[i];
            let qi = self.positions[i] + self.velocities[i];
            if ri <= 0.0 || !qi.is_finite() {
                continue;
            }
            let (cx, cy) = cell_of(qi, cell);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) else {
                        continue;
                    };
                    for &slot in bucket {
                        let j = slot as usize;
                        if j <= i {
                            continue;
                        }
                        let rj = self.radii[j];
                        let r = ri + rj;
                        let qi = self.positions[i] + self.velocities[i];
                        let qj = self.positions[j] + self.velocities[j];
                        let mut delta = qi - qj;
                        let mut l2 = delta.hypot2();
                        if l2 >= r * r {
                            continue;
                        }
                        if l2 < COINCIDENT * COINCIDENT {
                            delta = separation_direction(i, j) * COINCIDENT;
                            l2 = COINCIDENT * COINCIDENT;
                        }
                        let l = l2.sqrt();
                        max_overlap = max_overlap.max(r - l);
                        let push = delta * ((r - l) / l * strength);
                        let share = rj * rj / (ri * ri + rj * rj);
                        self.velocities[i] += push * share;
                        self.velocities[j] -= push * (1.0 - share);
                    }
                }
            }
        }
        max_overlap
    }

    /// Applies damped velocities; returns the largest displacement.
    fn integrate(&mut self) -> f64 {
        let keep = 1.0 - self.config.velocity_decay;
        let mut max_step = 0.0_f64;
        for (p, v) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *v *= keep;
            if !v.is_finite() {
                *v = Vec2::ZERO;
            }
            *p += *v;
            max_step = max_step.max(v.hypot());
        }
        max_step
    }
}

impl<K> Iterator for LayoutRun<K> {
    type Item = LayoutStep<K>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.done = true;
            tracing::debug!(iteration = self.iteration, "relaxation cancelled");
            return None;
        }
        self.iteration += 1;
        self.alpha -= self.alpha * self.config.alpha_decay;
        self.apply_anchors();
        let max_overlap = self.collide();
        let max_step = self.integrate();

        let tolerance = self.config.tolerance;
        let converged = max_overlap <= tolerance && max_step <= tolerance * 0.1;
        let finished = converged || self.iteration >= self.config.max_iterations;
        if finished {
            self.done = true;
            tracing::debug!(
                iteration = self.iteration,
                alpha = self.alpha,
                max_overlap,
                converged,
                "relaxation finished"
            );
        }
        Some(LayoutStep {
            iteration: self.iteration,
            alpha: self.alpha,
            max_overlap,
            finished,
            converged,
            snapshot: self.start.with_positions(self.positions.clone()),
        })
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "cell coordinates of finite points are far inside the i64 range"
)]
fn cell_of(p: Point, cell: f64) -> (i64, i64) {
    ((p.x / cell).floor() as i64, (p.y / cell).floor() as i64)
}

/// Deterministic, well-spread direction for separating coincident dots.
fn separation_direction(i: usize, j: usize) -> Vec2 {
    let angle = (i as f64 * 0.618_034 + j as f64 * 0.414_214) * TAU;
    Vec2::new(angle.cos(), angle.sin())
}
