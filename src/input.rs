//! Rotary encoder and push-button decoding.
//!
//! [`QuadratureDecoder`] turns phase samples into signed steps. [`SharedEncoder`] wraps it
//! together with the accumulated step count behind a critical section so that an interrupt
//! handler can produce steps while the main loop consumes them. [`ButtonEdge`] detects
//! presses.

use core::cell::Cell;
use critical_section::Mutex;

/// How encoder phases reach the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderMode {
    /// A pin-change interrupt on phase A calls [`SharedEncoder::on_phase_change`].
    ///
    /// Decoding keeps up regardless of main-loop latency.
    Interrupt,
    /// The control loop samples both phases once per pass.
    ///
    /// Steps are lost when the loop runs slower than the encoder's detent rate.
    Polled,
}

/// Two-channel gray-code direction decoder.
///
/// Counts one step per phase-A transition: forward when phase B differs from the new
/// phase A, backward otherwise. With a detent on every half cycle, one detent is one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    last_a: bool,
}

impl QuadratureDecoder {
    /// Creates a decoder that assumes phase A starts at `initial_a`.
    pub const fn new(initial_a: bool) -> Self {
        Self { last_a: initial_a }
    }

    /// Feeds one sample and returns the resulting step (-1, 0 or 1).
    #[inline]
    pub fn sample(&mut self, a: bool, b: bool) -> i32 {
        if a == self.last_a {
            return 0;
        }
        self.last_a = a;
        if b != a { 1 } else { -1 }
    }

    /// Returns the last phase-A level seen.
    pub const fn last_a(&self) -> bool {
        self.last_a
    }
}

#[derive(Clone, Copy)]
struct EncoderShared {
    decoder: QuadratureDecoder,
    delta: i32,
}

/// Encoder state shared between an interrupt handler and the main loop.
///
/// Every access runs inside `critical_section::with`, so the multi-byte delta is never torn
/// on targets without atomic 32-bit stores. Place it in a `static`:
///
/// ```
/// use heater_control::SharedEncoder;
///
/// static ENCODER: SharedEncoder = SharedEncoder::new();
/// ```
pub struct SharedEncoder {
    inner: Mutex<Cell<EncoderShared>>,
}

impl SharedEncoder {
    /// Creates an encoder with no pending steps and phase A assumed low.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(EncoderShared {
                decoder: QuadratureDecoder::new(false),
                delta: 0,
            })),
        }
    }

    /// Re-synchronises the decoder with the current phase-A level, e.g. after pin setup.
    pub fn reset(&self, a: bool) {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            cell.set(EncoderShared {
                decoder: QuadratureDecoder::new(a),
                delta: 0,
            });
        });
    }

    /// Decodes one phase sample. Safe to call from an interrupt handler.
    pub fn on_phase_change(&self, a: bool, b: bool) {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut shared = cell.get();
            let step = shared.decoder.sample(a, b);
            shared.delta = shared.delta.saturating_add(step);
            cell.set(shared);
        });
    }

    /// Returns the steps accumulated since the last call and resets the count to zero.
    pub fn take_delta(&self) -> i32 {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut shared = cell.get();
            let delta = shared.delta;
            shared.delta = 0;
            cell.set(shared);
            delta
        })
    }

    /// Returns the pending steps without consuming them.
    pub fn pending(&self) -> i32 {
        critical_section::with(|cs| self.inner.borrow(cs).get().delta)
    }
}

impl Default for SharedEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Press detector for one button.
///
/// Reports a press only on the transition from released to pressed, so a held button fires
/// once. The previous sample is the only debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEdge {
    was_pressed: bool,
}

impl ButtonEdge {
    /// Creates a detector in the released state.
    pub const fn new() -> Self {
        Self { was_pressed: false }
    }

    /// Feeds the current level and returns true on a new press.
    #[inline]
    pub fn update(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        edge
    }

    /// Returns the last sampled level.
    pub const fn is_pressed(&self) -> bool {
        self.was_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_phase_a_is_ignored() {
        let mut decoder = QuadratureDecoder::new(false);
        assert_eq!(decoder.sample(false, true), 0);
        assert_eq!(decoder.sample(false, false), 0);
    }

    #[test]
    fn button_fires_once_per_press() {
        let mut button = ButtonEdge::new();
        assert!(button.update(true));
        assert!(!button.update(true));
        assert!(!button.update(false));
        assert!(button.update(true));
    }
}
