// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::hash::Hash;
use std::sync::Arc;

use hashbrown::HashMap;
use kurbo::Point;

/// Positions are compared after rounding to this many decimal places.
pub const POSITION_DECIMALS: i32 = 2;

/// Rounds a position to [`POSITION_DECIMALS`] decimal places.
#[must_use]
pub fn round_position(p: Point) -> Point {
    let scale = 10.0_f64.powi(POSITION_DECIMALS);
    Point::new((p.x * scale).round() / scale, (p.y * scale).round() / scale)
}

/// An immutable, identity-keyed set of dot positions.
///
/// Snapshots produced by one run share their identity table, so cloning one
/// copies only the positions.
#[derive(Clone)]
pub struct LayoutSnapshot<K> {
    ids: Arc<[K]>,
    index: Arc<HashMap<K, usize>>,
    positions: Vec<Point>,
}

impl<K: core::fmt::Debug> core::fmt::Debug for LayoutSnapshot<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.ids.iter().zip(self.positions.iter()))
            .finish()
    }
}

impl<K: PartialEq> PartialEq for LayoutSnapshot<K> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids && self.positions == other.positions
    }
}

impl<K: Clone + Eq + Hash> LayoutSnapshot<K> {
    /// Builds a snapshot from `(id, position)` pairs.
    ///
    /// If an id repeats, lookups by id find its first occurrence.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Point)>,
    {
        let (ids, positions): (Vec<K>, Vec<Point>) = pairs.into_iter().unzip();
        Self::from_parts(Arc::from(ids), positions)
    }

    pub(crate) fn from_parts(ids: Arc<[K]>, positions: Vec<Point>) -> Self {
        let mut index = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            index.entry(id.clone()).or_insert(i);
        }
        Self {
            ids,
            index: Arc::new(index),
            positions,
        }
    }

    /// Returns the position of `id`, if present.
    #[must_use]
    pub fn get(&self, id: &K) -> Option<Point> {
        self.index.get(id).map(|&i| self.positions[i])
    }

    /// Returns `true` if `id` is present.
    #[must_use]
    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    /// Returns `true` if any position differs from `other` after rounding to
    /// [`POSITION_DECIMALS`] places, or if the two hold different ids.
    ///
    /// Sub-rounding jitter is not a change, so feeding a settled layout back
    /// in cannot trigger an endless update loop.
    #[must_use]
    pub fn positions_changed(&self, other: &Self) -> bool {
        self.moved_beyond(other, 0.0)
    }

    /// Like [`LayoutSnapshot::positions_changed`], but a position also counts
    /// as unchanged when it moved by at most `tolerance`.
    ///
    /// Two values a hair apart can round to different hundredths; the
    /// tolerance keeps such pairs equal.
    #[must_use]
    pub fn moved_beyond(&self, other: &Self, tolerance: f64) -> bool {
        if self.len() != other.len() {
            return true;
        }
        self.iter().any(|(id, p)| match other.get(id) {
            Some(q) => round_position(p) != round_position(q) && (p - q).hypot() > tolerance,
            None => true,
        })
    }
}

impl<K> LayoutSnapshot<K> {
    pub(crate) fn with_positions(&self, positions: Vec<Point>) -> Self {
        debug_assert_eq!(positions.len(), self.ids.len(), "position count mismatch");
        Self {
            ids: Arc::clone(&self.ids),
            index: Arc::clone(&self.index),
            positions,
        }
    }

    /// Number of dots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the snapshot holds no dots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in input order.
    #[must_use]
    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    /// Positions in input order.
    #[must_use]
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Iterates `(id, position)` in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Point)> + '_ {
        self.ids.iter().zip(self.positions.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{LayoutSnapshot, round_position};

    #[test]
    fn lookup_by_id() {
        let snap =
            LayoutSnapshot::from_pairs([("a", Point::new(1.0, 2.0)), ("b", Point::new(3.0, 4.0))]);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get(&"b"), Some(Point::new(3.0, 4.0)));
        assert_eq!(snap.get(&"c"), None);
        assert_eq!(snap.ids(), &["a", "b"]);
    }

    #[test]
    fn rounding_hides_jitter() {
        assert_eq!(round_position(Point::new(1.234_9, -0.004)), Point::new(1.23, -0.0));
        let a = LayoutSnapshot::from_pairs([(1, Point::new(10.001, 5.0))]);
        let b = LayoutSnapshot::from_pairs([(1, Point::new(10.004, 4.999))]);
        assert!(!a.positions_changed(&b));
        let c = LayoutSnapshot::from_pairs([(1, Point::new(10.02, 5.0))]);
        assert!(a.positions_changed(&c));
    }

    #[test]
    fn moves_within_tolerance_across_a_rounding_boundary_are_not_a_change() {
        let a = LayoutSnapshot::from_pairs([(1, Point::new(10.004_9, 5.0))]);
        let b = LayoutSnapshot::from_pairs([(1, Point::new(10.013, 5.0))]);
        assert!(a.positions_changed(&b));
        assert!(!a.moved_beyond(&b, 0.01));
        let c = LayoutSnapshot::from_pairs([(1, Point::new(10.03, 5.0))]);
        assert!(a.moved_beyond(&c, 0.01));
    }

    #[test]
    fn different_ids_are_a_change() {
        let a = LayoutSnapshot::from_pairs([(1, Point::ZERO)]);
        let b = LayoutSnapshot::from_pairs([(2, Point::ZERO)]);
        let c = LayoutSnapshot::from_pairs([(1, Point::ZERO), (2, Point::ZERO)]);
        assert!(a.positions_changed(&b));
        assert!(a.positions_changed(&c));
        assert!(!a.positions_changed(&a.clone()));
    }

    #[test]
    fn repeated_id_resolves_to_first() {
        let snap =
            LayoutSnapshot::from_pairs([(7, Point::new(1.0, 1.0)), (7, Point::new(2.0, 2.0))]);
        assert_eq!(snap.get(&7), Some(Point::new(1.0, 1.0)));
    }
}
