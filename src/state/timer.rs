//! Single-slot auto-revert timer
//!
//! Holds at most one pending revert. Scheduling replaces whatever was
//! pending, so re-entering a gesture can never leave two live timers.
//! The owner drives it with wall-clock instants, not the animation clock.

use tokio::time::Instant;

use super::AnimationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRevert {
    gesture: AnimationState,
    deadline: Instant,
}

/// Cancellable deadline for reverting a gesture to idle
#[derive(Debug, Default)]
pub struct RevertTimer {
    pending: Option<PendingRevert>,
}

impl RevertTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer, returning the gesture whose revert was replaced
    pub fn schedule(&mut self, gesture: AnimationState, deadline: Instant) -> Option<AnimationState> {
        self.pending
            .replace(PendingRevert { gesture, deadline })
            .map(|replaced| replaced.gesture)
    }

    /// Disarm the timer. No-op when nothing is pending.
    pub fn cancel(&mut self) -> Option<AnimationState> {
        self.pending.take().map(|pending| pending.gesture)
    }

    /// When the pending revert is due, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Disarm and return the gesture if its deadline has passed.
    ///
    /// Returns `Some` at most once per schedule.
    pub fn take_expired(&mut self, now: Instant) -> Option<AnimationState> {
        match self.pending {
            Some(pending) if now >= pending.deadline => {
                self.pending = None;
                Some(pending.gesture)
            }
            _ => None,
        }
    }
}
