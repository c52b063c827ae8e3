// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform tweens and the tickets that report their completion.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use std::cell::RefCell;
use std::rc::Rc;

use stipple_geometry::Transform;
use stipple_timing::Easing;

/// How an animation ended.
///
/// Being superseded is an expected outcome (for example rapid repeated fit
/// requests), not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// The animation reached its target.
    Completed,
    /// A gesture, a newer animation, or an explicit interrupt took over.
    Interrupted,
}

/// Polled view of an [`AnimationTicket`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationStatus {
    /// Still running.
    Pending,
    /// Settled with the given outcome.
    Finished(AnimationOutcome),
}

#[derive(Debug, Default)]
struct TicketState {
    outcome: Option<AnimationOutcome>,
    waker: Option<Waker>,
}

/// Completion handle returned by [`Camera::animate_to`](crate::Camera::animate_to).
///
/// The ticket can be polled with [`AnimationTicket::status`] from a frame
/// loop, or `.await`ed from a single-threaded executor; it resolves when the
/// camera completes or interrupts the animation. Clones share state.
#[derive(Clone, Debug)]
pub struct AnimationTicket {
    state: Rc<RefCell<TicketState>>,
}

impl AnimationTicket {
    pub(crate) fn pending() -> Self {
        Self {
            state: Rc::new(RefCell::new(TicketState::default())),
        }
    }

    pub(crate) fn settled(outcome: AnimationOutcome) -> Self {
        let ticket = Self::pending();
        ticket.resolve(outcome);
        ticket
    }

    /// Settles the ticket. Only the first resolution counts.
    pub(crate) fn resolve(&self, outcome: AnimationOutcome) {
        let waker = {
            let mut state = self.state.borrow_mut();
            if state.outcome.is_some() {
                return;
            }
            state.outcome = Some(outcome);
            state.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> AnimationStatus {
        match self.state.borrow().outcome {
            Some(outcome) => AnimationStatus::Finished(outcome),
            None => AnimationStatus::Pending,
        }
    }

    /// Returns the outcome once settled.
    #[must_use]
    pub fn outcome(&self) -> Option<AnimationOutcome> {
        self.state.borrow().outcome
    }

    /// Returns `true` once settled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }
}

impl Future for AnimationTicket {
    type Output = AnimationOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match state.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

/// An in-flight interpolation between two transforms.
#[derive(Debug)]
pub(crate) struct TransformTween {
    from: Transform,
    to: Transform,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
    pub(crate) ticket: AnimationTicket,
}

impl TransformTween {
    pub(crate) fn new(
        from: Transform,
        to: Transform,
        start_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
            ticket: AnimationTicket::pending(),
        }
    }

    pub(crate) fn target(&self) -> Transform {
        self.to
    }

    /// Samples the tween at `now_ms`. Returns the transform and whether the
    /// end has been reached; the final sample is exactly the target.
    pub(crate) fn sample(&self, now_ms: u64) -> (Transform, bool) {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed >= self.duration_ms {
            return (self.to, true);
        }
        let t = self.easing.apply(elapsed as f64 / self.duration_ms as f64);
        (Transform::lerp(self.from, self.to, t), false)
    }
}
