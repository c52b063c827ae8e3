// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend with hashed cells.

use core::fmt::Debug;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;
use stipple_geometry::{Dot, Transform};

/// Default edge length of a grid cell, in canvas pixels.
pub const DEFAULT_CELL_SIZE: f64 = 20.0;

/// Upper bound on the number of cells a single dot may be registered in.
///
/// Dots covering more cells than this are kept in a separate list that every
/// query scans instead.
const MAX_CELLS_PER_DOT: i64 = 64 * 64;

type CellKey = (i64, i64);

/// A dot as seen by the grid: identity plus its projected circle.
#[derive(Clone, Debug, PartialEq)]
pub struct HitEntry<K> {
    /// Identity of the dot.
    pub id: K,
    /// Projected center, x in canvas pixels.
    pub screen_x: f64,
    /// Projected center, y in canvas pixels.
    pub screen_y: f64,
    /// Projected radius in canvas pixels.
    pub screen_radius: f64,
}

impl<K> HitEntry<K> {
    /// Returns the projected center.
    #[must_use]
    pub fn screen_center(&self) -> Point {
        Point::new(self.screen_x, self.screen_y)
    }

    /// Returns `true` if `pt` lies inside or on the projected circle.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let dx = pt.x - self.screen_x;
        let dy = pt.y - self.screen_y;
        dx * dx + dy * dy <= self.screen_radius * self.screen_radius
    }
}

/// Counters describing a built grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitGridStats {
    /// Dots stored in the grid.
    pub entries: usize,
    /// Dots rejected because their projection was not finite.
    pub skipped: usize,
    /// Non-empty cells.
    pub cells: usize,
    /// Total cell memberships (a dot spanning four cells counts four times).
    pub references: usize,
    /// Dots too large for cell registration, checked on every query.
    pub oversized: usize,
}

/// Screen-space uniform grid for point-in-circle queries.
///
/// Built wholesale from a dot slice, a radius function and a transform; never
/// patched in place.
pub struct HitGrid<K> {
    cell_size: f64,
    transform: Transform,
    entries: Vec<HitEntry<K>>,
    cells: HashMap<CellKey, SmallVec<[u32; 4]>>,
    oversized: Vec<u32>,
    skipped: usize,
}

impl<K: Debug> Debug for HitGrid<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HitGrid")
            .field("cell_size", &self.cell_size)
            .field("transform", &self.transform)
            .field("entries", &self.entries.len())
            .field("cells", &self.cells.len())
            .field("oversized", &self.oversized.len())
            .finish_non_exhaustive()
    }
}

impl<K: Clone> HitGrid<K> {
    /// Builds a grid for `dots` as projected by `transform`.
    ///
    /// `radius_of` returns each dot's radius in data units; it is scaled by
    /// `transform.k`. Dots are inserted in slice order, which must match paint
    /// order. `cell_size` is in canvas pixels; non-positive values fall back to
    /// [`DEFAULT_CELL_SIZE`].
    ///
    /// Cost is `O(dots × cells-per-dot)`.
    pub fn build<D, F>(dots: &[D], radius_of: F, transform: Transform, cell_size: f64) -> Self
    where
        D: Dot<Id = K>,
        F: Fn(&D) -> f64,
    {
        Self::build_impl(dots, radius_of, transform, cell_size, None)
    }

    /// Like [`HitGrid::build`], but only registers cells that intersect `clip`.
    ///
    /// Pointer queries outside `clip` will miss. Use the canvas rectangle to
    /// bound memory when zoomed far in.
    pub fn build_within<D, F>(
        dots: &[D],
        radius_of: F,
        transform: Transform,
        cell_size: f64,
        clip: Rect,
    ) -> Self
    where
        D: Dot<Id = K>,
        F: Fn(&D) -> f64,
    {
        Self::build_impl(dots, radius_of, transform, cell_size, Some(clip))
    }

    fn build_impl<D, F>(
        dots: &[D],
        radius_of: F,
        transform: Transform,
        cell_size: f64,
        clip: Option<Rect>,
    ) -> Self
    where
        D: Dot<Id = K>,
        F: Fn(&D) -> f64,
    {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        let mut grid = Self {
            cell_size,
            transform,
            entries: Vec::with_capacity(dots.len()),
            cells: HashMap::new(),
            oversized: Vec::new(),
            skipped: 0,
        };

        for dot in dots {
            let center = transform.apply(dot.center());
            let radius = radius_of(dot).max(0.0) * transform.k;
            if !(center.is_finite() && radius.is_finite()) {
                grid.skipped += 1;
                continue;
            }
            let Ok(slot) = u32::try_from(grid.entries.len()) else {
                grid.skipped += 1;
                continue;
            };

            let bbox = Rect::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            );
            grid.entries.push(HitEntry {
                id: dot.id().clone(),
                screen_x: center.x,
                screen_y: center.y,
                screen_radius: radius,
            });

            let bbox = match clip {
                Some(clip) if disjoint(bbox, clip) => continue,
                Some(clip) => bbox.intersect(clip),
                None => bbox,
            };
            let (min_cx, min_cy) = grid.cell_of(Point::new(bbox.x0, bbox.y0));
            let (max_cx, max_cy) = grid.cell_of(Point::new(bbox.x1, bbox.y1));
            let span = (max_cx.saturating_sub(min_cx).saturating_add(1))
                .saturating_mul(max_cy.saturating_sub(min_cy).saturating_add(1));
            if span > MAX_CELLS_PER_DOT {
                grid.oversized.push(slot);
            } else {
                grid.insert_span(slot, min_cx, min_cy, max_cx, max_cy);
            }
        }
        grid
    }

    fn insert_span(&mut self, slot: u32, min_cx: i64, min_cy: i64, max_cx: i64, max_cy: i64) {
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                self.cells.entry((cx, cy)).or_default().push(slot);
            }
        }
    }
}

impl<K> HitGrid<K> {
    /// Returns the topmost dot whose projected circle contains `pt`.
    ///
    /// Only the single cell containing `pt` is inspected. Every dot was
    /// registered in all cells its bounding box overlaps, so circles reaching
    /// across a cell boundary are still found; neighboring cells are never
    /// consulted. Dots too large to register cell by cell are scanned
    /// directly. Among overlapping candidates the one inserted last (painted
    /// last) is returned.
    #[must_use]
    pub fn query(&self, pt: Point) -> Option<&HitEntry<K>> {
        if !pt.is_finite() {
            return None;
        }
        let topmost = |slots: &[u32]| {
            slots
                .iter()
                .rev()
                .copied()
                .find(|&slot| self.entries[slot as usize].contains(pt))
        };
        let in_cell = self
            .cells
            .get(&self.cell_of(pt))
            .and_then(|bucket| topmost(bucket.as_slice()));
        let in_oversized = topmost(&self.oversized);
        let slot = in_cell.max(in_oversized)?;
        Some(&self.entries[slot as usize])
    }

    /// Visits every dot whose projected center lies inside `rect`, in paint order.
    pub fn visit_centers_in<F: FnMut(&HitEntry<K>)>(&self, rect: Rect, mut f: F) {
        for entry in &self.entries {
            if rect.contains(entry.screen_center()) {
                f(entry);
            }
        }
    }

    /// Counts dots whose projected center lies inside `rect`.
    #[must_use]
    pub fn count_centers_in(&self, rect: Rect) -> usize {
        let mut n = 0;
        self.visit_centers_in(rect, |_| n += 1);
        n
    }

    /// Returns the transform this grid was built with.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Returns the cell edge length in canvas pixels.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Returns the stored dots in paint order.
    #[must_use]
    pub fn entries(&self) -> &[HitEntry<K>] {
        &self.entries
    }

    /// Returns the number of stored dots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no dots are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns build counters.
    #[must_use]
    pub fn stats(&self) -> HitGridStats {
        HitGridStats {
            entries: self.entries.len(),
            skipped: self.skipped,
            cells: self.cells.len(),
            references: self.cells.values().map(SmallVec::len).sum(),
            oversized: self.oversized.len(),
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "cell coordinates of finite canvas positions fit comfortably in i64"
    )]
    fn cell_of(&self, pt: Point) -> CellKey {
        (
            (pt.x / self.cell_size).floor() as i64,
            (pt.y / self.cell_size).floor() as i64,
        )
    }
}

fn disjoint(a: Rect, b: Rect) -> bool {
    a.x1 < b.x0 || b.x1 < a.x0 || a.y1 < b.y0 || b.y1 < a.y0
}
