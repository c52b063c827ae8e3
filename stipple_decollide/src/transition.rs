// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::hash::Hash;

use stipple_timing::Easing;

use crate::snapshot::LayoutSnapshot;

/// Fixed-duration eased move from one stable layout to the next.
///
/// Interpolation is keyed by id: a dot present in both layouts glides from its
/// old to its new position, a dot only in the new layout sits at its new
/// position from the first frame, and a dot only in the old layout is gone.
#[derive(Clone, Debug)]
pub struct StableTransition<K> {
    from: LayoutSnapshot<K>,
    to: LayoutSnapshot<K>,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl<K: Clone + Eq + Hash> StableTransition<K> {
    /// Creates a transition starting at `start_ms`.
    #[must_use]
    pub fn new(
        from: LayoutSnapshot<K>,
        to: LayoutSnapshot<K>,
        start_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// Returns the layout being moved to.
    #[must_use]
    pub fn target(&self) -> &LayoutSnapshot<K> {
        &self.to
    }

    /// Returns the layout at `now_ms` and whether the transition is over.
    ///
    /// The final sample is exactly the target layout.
    #[must_use]
    pub fn sample(&self, now_ms: u64) -> (LayoutSnapshot<K>, bool) {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed >= self.duration_ms {
            return (self.to.clone(), true);
        }
        let t = self.easing.apply(elapsed as f64 / self.duration_ms as f64);
        let positions = self
            .to
            .iter()
            .map(|(id, end)| match self.from.get(id) {
                Some(begin) => begin.lerp(end, t),
                None => end,
            })
            .collect();
        (self.to.with_positions(positions), false)
    }
}
