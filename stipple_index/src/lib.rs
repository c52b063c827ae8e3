// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple Index: a uniform grid over screen-space dot positions.
//!
//! [`HitGrid`] answers "which dot is under the pointer?" without scanning the
//! whole data set. Dots are projected into canvas pixels with a
//! [`Transform`](stipple_geometry::Transform) and a reference is stored in every
//! grid cell their circle's bounding box touches. A query then inspects a single
//! cell.
//!
//! The grid is immutable once built. Any change to the transform, to dot
//! positions or to radii requires building a new grid; [`HitGrid::transform`]
//! reports which transform a grid was built for so callers can detect
//! staleness.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use stipple_geometry::Transform;
//! use stipple_index::{DEFAULT_CELL_SIZE, HitGrid};
//!
//! let dots = vec![("a", Point::new(0.0, 0.0)), ("b", Point::new(40.0, 0.0))];
//! let camera = Transform::new(2.0, 10.0, 10.0);
//! let grid = HitGrid::build(&dots, |_| 5.0, camera, DEFAULT_CELL_SIZE);
//!
//! // "b" sits at (40 * 2 + 10, 10) in canvas pixels.
//! let hit = grid.query(Point::new(92.0, 12.0)).map(|e| e.id);
//! assert_eq!(hit, Some("b"));
//! assert!(grid.query(Point::new(50.0, 50.0)).is_none());
//! ```
//!
//! ## Paint order
//!
//! Dots are inserted in the order they are given, which must be the order they
//! are drawn in. Where circles overlap, the *last* one wins, matching what is
//! visibly on top.

mod grid;

pub use grid::{DEFAULT_CELL_SIZE, HitEntry, HitGrid, HitGridStats};
