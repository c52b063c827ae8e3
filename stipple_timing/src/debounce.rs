// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing-edge debouncer.
//!
//! ## Usage
//!
//! 1) Call [`Debouncer::poke`] for every event in a burst.
//! 2) Call [`Debouncer::poll`] once per frame; it returns `true` exactly once,
//!    after the burst has been quiet for the configured delay.
//!
//! ```
//! use stipple_timing::Debouncer;
//!
//! let mut resize = Debouncer::new(100);
//! resize.poke(0);
//! resize.poke(40);
//! assert!(!resize.poll(120));
//! assert!(resize.poll(140));
//! assert!(!resize.poll(200));
//! ```

/// Fires once after a burst of pokes has gone quiet for `delay_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debouncer {
    /// Creates an idle debouncer.
    #[must_use]
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Returns the quiet period in milliseconds.
    #[must_use]
    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Records an event at `now_ms`, pushing the deadline out.
    pub fn poke(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// Returns `true` once when the deadline has passed, then goes idle.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` while a burst is waiting to settle.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns the time at which the pending burst settles, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Drops any pending burst without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
