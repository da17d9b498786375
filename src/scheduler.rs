//! Deadline slots for the cooperative tick loop.
//!
//! Nothing runs on another thread. A slot stores at most one future
//! deadline; the main loop polls it with the current time and the slot fires
//! once when the deadline has passed. Scheduling again replaces the pending
//! deadline, so there is never more than one outstanding callback per slot.

use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct TickSlot {
    due: Option<Duration>,
}

impl TickSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot `delay` after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Duration, delay: Duration) {
        self.due = Some(now + delay);
    }

    /// Drop the pending deadline. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.due.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<Duration> {
        self.due
    }

    /// Fire at most once: if the deadline has passed, disarm and return true.
    /// The owner re-arms the slot from the tick handler if it wants another.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            },
            _ => false,
        }
    }
}

/// The two callback slots of the preview: held-key movement and one-shot
/// animation steps.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pub movement: TickSlot,
    pub animation: TickSlot,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel everything. Returns how many deadlines were dropped.
    pub fn cancel_all(&mut self) -> usize {
        self.movement.cancel() as usize + self.animation.cancel() as usize
    }

    pub fn pending(&self) -> usize {
        self.movement.is_pending() as usize + self.animation.is_pending() as usize
    }
}
