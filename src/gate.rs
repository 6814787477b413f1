//! Non-blocking periodic task gate.
//!
//! A [`TaskGate`] answers "may this recurring task run now?" in constant time, which lets
//! independently timed tasks share one cooperative loop.

use crate::time::{Clock, Millis};

/// Gate for one periodic task.
///
/// The stored timestamp only moves when the gate fires, never on a plain poll, so a task
/// polled more often than its interval still fires once per interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskGate {
    last_fired: Millis,
    interval_ms: u32,
}

impl TaskGate {
    /// Creates a gate anchored at counter value zero.
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            last_fired: Millis::ZERO,
            interval_ms,
        }
    }

    /// Creates a gate firing `hz` times per second.
    ///
    /// A zero frequency yields a gate that never fires.
    pub const fn from_frequency(hz: u32) -> Self {
        let interval_ms = if hz == 0 { u32::MAX } else { 1000 / hz };
        Self::new(interval_ms)
    }

    /// Re-anchors the gate so the first interval starts at `now`.
    pub const fn starting_at(mut self, now: Millis) -> Self {
        self.last_fired = now;
        self
    }

    /// Returns true and records `now` if at least one interval has elapsed since the last firing.
    #[inline]
    pub fn should_fire(&mut self, now: Millis) -> bool {
        let elapsed = Clock::elapsed(&mut self.last_fired, now);
        if elapsed >= self.interval_ms {
            self.last_fired = now;
            true
        } else {
            false
        }
    }

    /// Returns the configured interval in milliseconds.
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Returns when the gate last fired.
    pub const fn last_fired(&self) -> Millis {
        self.last_fired
    }
}
