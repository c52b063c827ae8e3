// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-driven owner of the stable layout.

use core::hash::Hash;

use stipple_geometry::Dot;
use stipple_timing::Easing;

use crate::config::RelaxationConfig;
use crate::relax::{CancelHandle, LayoutRun};
use crate::snapshot::{LayoutSnapshot, round_position};
use crate::transition::StableTransition;

/// Which intermediate layouts of a run are shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FramePolicy {
    /// Show every iteration, for live feedback on a first layout.
    #[default]
    EveryFrame,
    /// Show only the result. With a previous stable layout, the result is
    /// reached through a [`StableTransition`] instead of a jump.
    FinalOnly,
}

/// What the resolver wants displayed after a [`LayoutResolver::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutUpdate<K> {
    /// An intermediate relaxation layout ([`FramePolicy::EveryFrame`] only).
    Progress(LayoutSnapshot<K>),
    /// A frame of the eased move between two stable layouts.
    Transition(LayoutSnapshot<K>),
    /// The final layout is on screen and is now the stable layout.
    Settled {
        /// The new stable layout.
        snapshot: LayoutSnapshot<K>,
        /// Whether it differs from the previous stable layout at
        /// two-decimal rounding, by more than the tolerance.
        changed: bool,
    },
    /// The run was cancelled; its partial layout is discarded in favor of
    /// the last stable layout (or the data positions, if there is none).
    Reverted(LayoutSnapshot<K>),
    /// The run hit its iteration cap with overlaps left. Its result is shown,
    /// but the stable layout is kept.
    Unconverged(LayoutSnapshot<K>),
}

impl<K> LayoutUpdate<K> {
    /// Returns the layout to display.
    #[must_use]
    pub fn snapshot(&self) -> &LayoutSnapshot<K> {
        match self {
            Self::Progress(s) | Self::Transition(s) | Self::Reverted(s) | Self::Unconverged(s) => {
                s
            }
            Self::Settled { snapshot, .. } => snapshot,
        }
    }
}

struct ActiveRun<K> {
    run: LayoutRun<K>,
    policy: FramePolicy,
}

/// Owns the stable layout and drives runs and transitions frame by frame.
///
/// ## Lifecycle
///
/// - [`LayoutResolver::start`] begins a run, warm-started from the stable
///   layout for dots whose data did not move. A run already in flight is
///   abandoned.
/// - [`LayoutResolver::step`] advances by up to `max_iterations` and reports
///   what to display.
/// - On convergence the final layout atomically replaces the stable layout.
///   Nothing else ever writes it; a run that stops at its iteration cap
///   reports [`LayoutUpdate::Unconverged`] and leaves it alone.
/// - [`LayoutResolver::cancel`] takes effect at the next step, which reports
///   [`LayoutUpdate::Reverted`].
pub struct LayoutResolver<K> {
    config: RelaxationConfig,
    easing: Easing,
    stable: Option<LayoutSnapshot<K>>,
    stable_anchors: Option<LayoutSnapshot<K>>,
    active: Option<ActiveRun<K>>,
    transition: Option<(StableTransition<K>, bool)>,
}

impl<K: core::fmt::Debug> core::fmt::Debug for LayoutResolver<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutResolver")
            .field("config", &self.config)
            .field("stable", &self.stable.as_ref().map(LayoutSnapshot::len))
            .field("running", &self.active.is_some())
            .field("transitioning", &self.transition.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: Clone + Eq + Hash> LayoutResolver<K> {
    /// Creates an idle resolver with no stable layout.
    #[must_use]
    pub fn new(config: RelaxationConfig) -> Self {
        Self {
            config: config.sanitized(),
            easing: Easing::CubicInOut,
            stable: None,
            stable_anchors: None,
            active: None,
            transition: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RelaxationConfig {
        &self.config
    }

    /// Sets the easing of stable-layout transitions.
    pub fn set_transition_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Returns the last fully converged layout.
    #[must_use]
    pub fn stable(&self) -> Option<&LayoutSnapshot<K>> {
        self.stable.as_ref()
    }

    /// Returns `true` while a run is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Returns `true` while a stable-layout transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Returns `true` when neither a run nor a transition is in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.transition.is_none()
    }

    /// Returns a standalone cold run over `dots` with this resolver's
    /// configuration. The resolver's own state is not touched.
    pub fn run<D, F>(&self, dots: &[D], radius_of: F) -> LayoutRun<K>
    where
        D: Dot<Id = K>,
        F: Fn(&D) -> f64,
    {
        LayoutRun::new(dots, radius_of, self.config)
    }

    /// Begins a managed run over `dots`, abandoning any run or transition in
    /// flight. Returns a handle that cancels the new run.
    pub fn start<D, F>(&mut self, dots: &[D], radius_of: F, policy: FramePolicy) -> CancelHandle
    where
        D: Dot<Id = K>,
        F: Fn(&D) -> f64,
    {
        if self.active.take().is_some() {
            tracing::debug!("relaxation superseded by a new run");
        }
        self.transition = None;
        let warm = self.warm_start(dots);
        let run = LayoutRun::warm(dots, radius_of, self.config, warm.as_ref());
        let handle = run.cancel_handle();
        tracing::debug!(dots = dots.len(), ?policy, "relaxation started");
        self.active = Some(ActiveRun { run, policy });
        handle
    }

    /// Stable positions of the dots whose data position is unchanged since
    /// the stable layout was computed. Moved and new dots start from data.
    fn warm_start<D>(&self, dots: &[D]) -> Option<LayoutSnapshot<K>>
    where
        D: Dot<Id = K>,
    {
        let (stable, anchors) = (self.stable.as_ref()?, self.stable_anchors.as_ref()?);
        Some(LayoutSnapshot::from_pairs(dots.iter().filter_map(|d| {
            let unmoved = anchors
                .get(d.id())
                .is_some_and(|a| round_position(a) == round_position(d.center()));
            unmoved
                .then(|| stable.get(d.id()))
                .flatten()
                .map(|p| (d.id().clone(), p))
        })))
    }

    /// Requests cancellation of the run in flight. Returns `false` if there
    /// is none.
    pub fn cancel(&mut self) -> bool {
        match &self.active {
            Some(active) => {
                active.run.cancel();
                true
            }
            None => false,
        }
    }

    /// Forgets the stable layout and stops all work.
    pub fn reset(&mut self) {
        self.active = None;
        self.transition = None;
        self.stable = None;
        self.stable_anchors = None;
    }

    /// Advances by one display refresh, running at most `max_iterations`
    /// relaxation iterations. Returns what to display, or `None` if the
    /// display need not change.
    pub fn step(&mut self, now_ms: u64, max_iterations: u32) -> Option<LayoutUpdate<K>> {
        if self.active.is_some() {
            return self.step_run(now_ms, max_iterations);
        }
        let (transition, changed) = self.transition.as_ref()?;
        let (snapshot, done) = transition.sample(now_ms);
        if !done {
            return Some(LayoutUpdate::Transition(snapshot));
        }
        let changed = *changed;
        self.transition = None;
        Some(LayoutUpdate::Settled { snapshot, changed })
    }

    fn step_run(&mut self, now_ms: u64, max_iterations: u32) -> Option<LayoutUpdate<K>> {
        let active = self.active.as_mut()?;
        let mut last = None;
        for _ in 0..max_iterations.max(1) {
            let Some(step) = active.run.next() else {
                break;
            };
            let finished = step.finished;
            last = Some(step);
            if finished {
                break;
            }
        }
        let policy = active.policy;
        let anchors = last
            .as_ref()
            .is_some_and(|s| s.converged)
            .then(|| active.run.anchors());

        let Some(step) = last.filter(|s| s.finished) else {
            if active.run.is_cancelled() {
                let fallback = active.run.start().clone();
                self.active = None;
                let snapshot = self.stable.clone().unwrap_or(fallback);
                tracing::debug!("reverted to stable layout after cancellation");
                return Some(LayoutUpdate::Reverted(snapshot));
            }
            return match policy {
                FramePolicy::EveryFrame => Some(LayoutUpdate::Progress(active.run.current())),
                FramePolicy::FinalOnly => None,
            };
        };

        self.active = None;
        if !step.converged {
            tracing::warn!(
                iterations = step.iteration,
                max_overlap = step.max_overlap,
                "layout did not converge; stable layout kept"
            );
            return Some(LayoutUpdate::Unconverged(step.snapshot));
        }
        self.stable_anchors = anchors;
        let settled = step.snapshot;
        let previous = self.stable.replace(settled.clone());
        let tolerance = self.config.tolerance;
        let changed = previous
            .as_ref()
            .is_none_or(|p| p.moved_beyond(&settled, tolerance));
        tracing::info!(iterations = step.iteration, changed, "layout settled");
        match previous {
            Some(previous)
                if policy == FramePolicy::FinalOnly && changed && self.config.transition_ms > 0 =>
            {
                let transition = StableTransition::new(
                    previous,
                    settled,
                    now_ms,
                    self.config.transition_ms,
                    self.easing,
                );
                let (snapshot, _) = transition.sample(now_ms);
                self.transition = Some((transition, changed));
                Some(LayoutUpdate::Transition(snapshot))
            }
            _ => Some(LayoutUpdate::Settled {
                snapshot: settled,
                changed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{FramePolicy, LayoutResolver, LayoutUpdate};
    use crate::config::RelaxationConfig;

    fn overlapping() -> Vec<(&'static str, Point)> {
        vec![("a", Point::new(0.0, 0.0)), ("b", Point::new(2.0, 0.0))]
    }

    fn settle(
        resolver: &mut LayoutResolver<&'static str>,
        start_ms: u64,
    ) -> Vec<LayoutUpdate<&'static str>> {
        let mut updates = Vec::new();
        for frame in 0..1_000 {
            if let Some(update) = resolver.step(start_ms + frame * 16, 50) {
                updates.push(update);
            }
            if resolver.is_idle() {
                break;
            }
        }
        updates
    }

    #[test]
    fn every_frame_reports_progress_then_settles() {
        let mut resolver = LayoutResolver::new(RelaxationConfig::default());
        resolver.start(&overlapping(), |_| 5.0, FramePolicy::EveryFrame);
        let updates = settle(&mut resolver, 0);
        assert!(matches!(updates.first(), Some(LayoutUpdate::Progress(_))));
        assert!(matches!(
            updates.last(),
            Some(LayoutUpdate::Settled { changed: true, .. })
        ));
        assert!(resolver.stable().is_some());
    }

    #[test]
    fn final_only_without_stable_jumps_to_result() {
        let mut resolver = LayoutResolver::new(RelaxationConfig::default());
        resolver.start(&overlapping(), |_| 5.0, FramePolicy::FinalOnly);
        let updates = settle(&mut resolver, 0);
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0], LayoutUpdate::Settled { .. }));
    }

    #[test]
    fn final_only_with_stable_transitions_from_old_layout() {
        let mut resolver = LayoutResolver::new(RelaxationConfig::default());
        resolver.start(&overlapping(), |_| 5.0, FramePolicy::EveryFrame);
        settle(&mut resolver, 0);
        let old = resolver.stable().unwrap().clone();

        let mut next = overlapping();
        next.push(("c", Point::new(1.0, 30.0)));
        next[1].1 = Point::new(40.0, 0.0);
        resolver.start(&next, |_| 5.0, FramePolicy::FinalOnly);

        let updates = settle(&mut resolver, 1_000);
        let LayoutUpdate::Transition(first) = &updates[0] else {
            panic!("expected a transition, got {:?}", updates[0]);
        };
        // Known dots start where they were; new dots start at their target.
        assert_eq!(first.get(&"a"), old.get(&"a"));
        assert_eq!(first.get(&"b"), old.get(&"b"));
        let LayoutUpdate::Settled { snapshot, changed } = updates.last().unwrap() else {
            panic!("expected settled");
        };
        assert!(*changed);
        assert_eq!(first.get(&"c"), snapshot.get(&"c"));
        assert_eq!(resolver.stable(), Some(snapshot));
    }

    #[test]
    fn cancel_reverts_to_stable() {
        let mut resolver = LayoutResolver::new(RelaxationConfig::default());
        resolver.start(&overlapping(), |_| 5.0, FramePolicy::EveryFrame);
        settle(&mut resolver, 0);
        let stable = resolver.stable().unwrap().clone();

        let crowded = vec![("a", Point::new(0.0, 0.0)), ("b", Point::new(0.5, 0.0))];
        resolver.start(&crowded, |_| 20.0, FramePolicy::EveryFrame);
        assert!(matches!(resolver.step(0, 1), Some(LayoutUpdate::Progress(_))));
        assert!(resolver.cancel());
        assert_eq!(resolver.step(16, 1), Some(LayoutUpdate::Reverted(stable.clone())));
        assert!(resolver.is_idle());
        assert_eq!(resolver.stable(), Some(&stable));
    }

    #[test]
    fn cancel_without_stable_reverts_to_data_positions() {
        let mut resolver = LayoutResolver::new(RelaxationConfig::default());
        let handle = resolver.start(&overlapping(), |_| 5.0, FramePolicy::EveryFrame);
        handle.cancel();
        let Some(LayoutUpdate::Reverted(snapshot)) = resolver.step(0, 10) else {
            panic!("expected a revert");
        };
        assert_eq!(snapshot.get(&"b"), Some(Point::new(2.0, 0.0)));
    }

    #[test]
    fn rerun_of_settled_layout_is_unchanged() {
        let apart = vec![("a", Point::new(0.0, 0.0)), ("b", Point::new(20.0, 0.0))];
        let mut resolver = LayoutResolver::new(RelaxationConfig::default());
        resolver.start(&apart, |_| 5.0, FramePolicy::EveryFrame);
        settle(&mut resolver, 0);
        resolver.start(&apart, |_| 5.0, FramePolicy::FinalOnly);
        let updates = settle(&mut resolver, 0);
        assert_eq!(updates.len(), 1);
        assert!(matches!(
            updates[0],
            LayoutUpdate::Settled { changed: false, .. }
        ));
    }

    #[test]
    fn moved_dot_starts_from_its_new_data_position() {
        let mut dots = vec![("a", Point::new(0.0, 0.0)), ("b", Point::new(20.0, 0.0))];
        let mut resolver = LayoutResolver::new(RelaxationConfig::default());
        resolver.start(&dots, |_| 5.0, FramePolicy::EveryFrame);
        settle(&mut resolver, 0);

        dots[1].1 = Point::new(60.0, 0.0);
        resolver.start(&dots, |_| 5.0, FramePolicy::FinalOnly);
        settle(&mut resolver, 1_000);
        let stable = resolver.stable().unwrap();
        assert_eq!(stable.get(&"a"), Some(Point::new(0.0, 0.0)));
        assert_eq!(stable.get(&"b"), Some(Point::new(60.0, 0.0)));
    }

    #[test]
    fn capped_run_is_shown_but_not_made_stable() {
        let config = RelaxationConfig {
            max_iterations: 3,
            ..RelaxationConfig::default()
        };
        let crowded = vec![("a", Point::new(0.0, 0.0)), ("b", Point::new(0.5, 0.0))];
        let mut resolver = LayoutResolver::new(config);
        resolver.start(&crowded, |_| 20.0, FramePolicy::FinalOnly);
        let updates = settle(&mut resolver, 0);
        assert!(matches!(updates.as_slice(), [LayoutUpdate::Unconverged(_)]));
        assert!(resolver.is_idle());
        assert!(resolver.stable().is_none());
    }

    #[test]
    fn capped_run_keeps_the_previous_stable_layout() {
        let mut resolver = LayoutResolver::new(RelaxationConfig {
            max_iterations: 3,
            ..RelaxationConfig::default()
        });
        let apart = vec![("a", Point::new(0.0, 0.0)), ("b", Point::new(50.0, 0.0))];
        resolver.start(&apart, |_| 5.0, FramePolicy::EveryFrame);
        settle(&mut resolver, 0);
        let stable = resolver.stable().unwrap().clone();

        let crowded = vec![("a", Point::new(0.0, 0.0)), ("b", Point::new(0.5, 0.0))];
        resolver.start(&crowded, |_| 20.0, FramePolicy::FinalOnly);
        let updates = settle(&mut resolver, 1_000);
        assert!(matches!(updates.last(), Some(LayoutUpdate::Unconverged(_))));
        assert_eq!(resolver.stable(), Some(&stable));
    }
}
