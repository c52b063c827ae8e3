// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stipple Timing: frame budgeting and debouncing without owning a clock.
//!
//! Every type here is driven by timestamps the host passes in (milliseconds
//! from any monotonic origin, typically the display-refresh callback). Nothing
//! sleeps, spawns, or reads the system time, so the same code runs under a
//! browser animation loop, a native event loop, or a test.
//!
//! - [`FrameBudget`]: decide whether expensive per-frame work (raster redraw,
//!   layout iterations) runs on this refresh, and degrade gracefully when that
//!   work keeps overrunning its budget.
//! - [`Debouncer`]: trailing-edge coalescing of bursts of input, such as wheel
//!   events or canvas resizes.
//! - [`Easing`]: curves mapping linear animation progress to eased progress.
//!
//! ## Minimal example
//!
//! ```rust
//! use stipple_timing::{FrameBudget, FrameBudgetConfig};
//!
//! let mut budget = FrameBudget::new(FrameBudgetConfig::default());
//! let mut now = 0;
//! for _ in 0..5 {
//!     if budget.begin_frame(now) {
//!         // ... redraw, then report how long it took.
//!         budget.record(2.0);
//!     }
//!     now += 16;
//! }
//! assert_eq!(budget.stride(), 1);
//! ```

mod budget;
mod debounce;
mod easing;

pub use budget::{BudgetDecision, FrameBudget, FrameBudgetConfig};
pub use debounce::Debouncer;
pub use easing::Easing;
