//! Stepper speed ramping and step pulse generation.

use crate::io::{Pin, PinIo};
use crate::time::{Clock, Millis};

/// Ramps an actual speed toward a target at a bounded acceleration.
///
/// Speeds are in steps per second, signed for direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedRamp {
    current: f32,
    max_acceleration: f32,
    update_period_s: f32,
}

impl SpeedRamp {
    /// Creates a stopped ramp.
    ///
    /// `max_acceleration` is in steps/s², `update_period_s` is the time between calls to
    /// [`SpeedRamp::update`].
    pub const fn new(max_acceleration: f32, update_period_s: f32) -> Self {
        Self {
            current: 0.0,
            max_acceleration,
            update_period_s,
        }
    }

    /// Largest speed change allowed in one update.
    #[inline]
    pub fn accel_step(&self) -> f32 {
        self.max_acceleration * self.update_period_s
    }

    /// Moves the current speed one step toward `set_speed` and returns it.
    ///
    /// Once the remaining error fits within one step the speed snaps onto the target, so
    /// it never oscillates around it.
    pub fn update(&mut self, set_speed: f32) -> f32 {
        let speed_error = self.current - set_speed;
        let accel_step = self.accel_step();

        if libm::fabsf(speed_error) > accel_step {
            if speed_error > 0.0 {
                self.current -= accel_step;
            } else {
                self.current += accel_step;
            }
        } else {
            self.current = set_speed;
        }
        self.current
    }

    /// Returns the ramped speed.
    pub fn current(&self) -> f32 {
        self.current
    }
}

/// Emits step and direction signals for a given speed.
///
/// The step line is a square wave with a period of `1000 / |speed|` ms, so every rising
/// edge is one step. Resolution is one clock tick per half period; speeds needing a
/// shorter half period run at one toggle per call.
#[derive(Debug, Clone)]
pub struct StepGenerator {
    step_pin: Pin,
    dir_pin: Pin,
    invert_direction: bool,
    last_toggle: Millis,
    step_level: bool,
    forward: Option<bool>,
    steps: u32,
}

impl StepGenerator {
    /// Creates an idle generator.
    pub fn new(step_pin: Pin, dir_pin: Pin, invert_direction: bool) -> Self {
        Self {
            step_pin,
            dir_pin,
            invert_direction,
            last_toggle: Millis::ZERO,
            step_level: false,
            forward: None,
            steps: 0,
        }
    }

    /// Toggles the step line if half a step period has passed.
    ///
    /// Zero or non-finite speed, or `enabled == false`, suspends stepping. Returns true when
    /// the step line was toggled.
    pub fn service<IO: PinIo>(
        &mut self,
        now: Millis,
        speed: f32,
        enabled: bool,
        io: &mut IO,
    ) -> bool {
        let magnitude = libm::fabsf(speed);
        if !enabled || magnitude == 0.0 || !magnitude.is_finite() {
            self.last_toggle = now;
            return false;
        }

        let forward = speed > 0.0;
        if self.forward != Some(forward) {
            self.forward = Some(forward);
            io.write_digital(self.dir_pin, forward != self.invert_direction);
        }

        let half_period_ms = 500.0 / magnitude;
        let elapsed = Clock::elapsed(&mut self.last_toggle, now);
        if (elapsed as f32) < half_period_ms {
            return false;
        }

        self.last_toggle = now;
        self.step_level = !self.step_level;
        if self.step_level {
            self.steps = self.steps.wrapping_add(1);
        }
        io.write_digital(self.step_pin, self.step_level);
        true
    }

    /// Number of rising edges emitted so far, wrapping.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Current level of the step line.
    pub fn step_level(&self) -> bool {
        self.step_level
    }
}
