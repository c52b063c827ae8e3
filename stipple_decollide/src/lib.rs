// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple Decollide: push overlapping circular markers apart, incrementally.
//!
//! Scatter data routinely places markers on top of each other. This crate
//! turns raw data positions into a layout where circles no longer overlap,
//! while keeping every marker as close to its true position as it can.
//!
//! - [`LayoutRun`]: a lazy, finite iterator of improving layouts. Each
//!   iteration relaxes overlaps a little and yields an immutable
//!   [`LayoutSnapshot`], so hosts can show live progress or only the result.
//! - [`LayoutResolver`]: owns the last fully converged ("stable") layout and
//!   drives runs frame by frame, with cooperative cancellation and eased
//!   [`StableTransition`]s between stable layouts.
//! - [`LayoutSnapshot::positions_changed`]: change detection at two-decimal
//!   rounding, so float noise never counts as movement.
//!
//! All distances are in data units; the radius function passed to a run must
//! return data units too.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use stipple_decollide::{LayoutRun, RelaxationConfig};
//!
//! let dots = [(1_u32, Point::new(0.0, 0.0)), (2, Point::new(7.0, 0.0))];
//! let settled = LayoutRun::new(&dots, |_| 5.0, RelaxationConfig::default())
//!     .settle()
//!     .unwrap();
//! let gap = (settled.get(&1).unwrap() - settled.get(&2).unwrap()).hypot();
//! assert!(gap > 9.9);
//! ```
//!
//! ## Frame-driven use
//!
//! ```rust
//! use kurbo::Point;
//! use stipple_decollide::{FramePolicy, LayoutResolver, LayoutUpdate, RelaxationConfig};
//!
//! let dots = [("a", Point::new(0.0, 0.0)), ("b", Point::new(1.0, 0.0))];
//! let mut resolver = LayoutResolver::new(RelaxationConfig::default());
//! resolver.start(&dots, |_| 2.0, FramePolicy::EveryFrame);
//!
//! let mut now = 0;
//! while !resolver.is_idle() {
//!     if let Some(update) = resolver.step(now, 8) {
//!         let _draw_these = update.snapshot();
//!     }
//!     now += 16;
//! }
//! assert!(resolver.stable().is_some());
//! ```

mod config;
mod relax;
mod resolver;
mod snapshot;
mod transition;

pub use config::RelaxationConfig;
pub use relax::{CancelHandle, LayoutRun, LayoutStep};
pub use resolver::{FramePolicy, LayoutResolver, LayoutUpdate};
pub use snapshot::{LayoutSnapshot, POSITION_DECIMALS, round_position};
pub use transition::StableTransition;
