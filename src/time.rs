//! Millisecond time abstraction and wraparound-safe elapsed-time queries.

/// A reading of the monotonic millisecond counter.
///
/// The counter is 32 bits wide and wraps after roughly 49.7 days of uptime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// The counter value at reset.
    pub const ZERO: Self = Millis(0);

    /// Returns the raw counter value.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Adds `millis`, wrapping at the counter width like the hardware counter does.
    #[inline]
    pub const fn wrapping_add(self, millis: u32) -> Self {
        Millis(self.0.wrapping_add(millis))
    }
}

/// Trait for abstracting the platform millisecond counter.
///
/// Implement this on top of a SysTick handler, an embassy `Instant`, or a mock in tests.
pub trait TimeSource {
    /// Returns the current counter value.
    fn now(&self) -> Millis;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Millis {
        (**self).now()
    }
}

/// Elapsed-time arithmetic that survives counter wraparound.
///
/// When the counter is observed below a stored reference, the reference is treated as
/// stale and re-anchored at `now`. The interval in flight at the moment of the wrap is
/// lost: it restarts from zero, so one period per wrap (about every 49.7 days) comes out
/// long. No modular subtraction is attempted.
pub struct Clock;

impl Clock {
    /// Returns the milliseconds elapsed since `reference`, re-anchoring it on wraparound.
    #[inline]
    pub fn elapsed(reference: &mut Millis, now: Millis) -> u32 {
        if now < *reference {
            *reference = now;
            return 0;
        }
        now.0 - reference.0
    }

    /// Like [`Clock::elapsed`] but leaves `reference` untouched.
    ///
    /// Returns 0 when the counter has wrapped past `reference`.
    #[inline]
    pub fn peek_elapsed(reference: Millis, now: Millis) -> u32 {
        now.0.saturating_sub(reference.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_counts_forward() {
        let mut reference = Millis(1_000);
        assert_eq!(Clock::elapsed(&mut reference, Millis(1_250)), 250);
        assert_eq!(reference, Millis(1_000));
    }

    #[test]
    fn wraparound_reanchors_reference() {
        let mut reference = Millis(u32::MAX - 5);
        assert_eq!(Clock::elapsed(&mut reference, Millis(10)), 0);
        assert_eq!(reference, Millis(10));
        assert_eq!(Clock::elapsed(&mut reference, Millis(30)), 20);
    }

    #[test]
    fn peek_never_underflows() {
        assert_eq!(Clock::peek_elapsed(Millis(100), Millis(50)), 0);
        assert_eq!(Clock::peek_elapsed(Millis(50), Millis(100)), 50);
    }
}
