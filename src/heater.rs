//! Heater power control.
//!
//! [`proportional_heat_power`] turns a temperature error into a power request and
//! [`HeaterDriver`] turns that request into pin activity, either as a PWM duty byte or,
//! when the heater sits on a plain digital pin, as a software-timed on/off cycle.

use crate::io::{Pin, PinIo};
use crate::time::{Clock, Millis};

/// How the heater pin is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaterMode {
    /// Hardware PWM; the power request is scaled onto `0..=full_scale`.
    Direct {
        /// Duty value for 100 % power.
        full_scale: u8,
    },
    /// Digital pin switched on and off within a fixed period of `1000 / switch_frequency_hz` ms.
    SoftwareDuty {
        /// Switching periods per second.
        switch_frequency_hz: u32,
    },
}

/// Proportional control law.
///
/// Full power while the temperature is `temp_error_max` or more below the setpoint, falling
/// linearly to zero at the setpoint. The result is not clamped; [`HeaterDriver`] does that.
#[inline]
pub fn proportional_heat_power(current: f32, set: f32, temp_error_max: f32) -> f32 {
    -(current - set) * (100.0 / temp_error_max)
}

fn clamp_percentage(percentage: f32) -> f32 {
    if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    }
}

/// Drives the heater output from a 0–100 % power request.
#[derive(Debug, Clone)]
pub struct HeaterDriver {
    pin: Pin,
    mode: HeaterMode,
    inverted: bool,
    output_on: bool,
    duty: u8,
    last_on: Millis,
    last_off: Millis,
}

impl HeaterDriver {
    /// Creates a driver with the output assumed off.
    ///
    /// `inverted` is for switches that conduct while the pin is low.
    pub fn new(pin: Pin, mode: HeaterMode, inverted: bool) -> Self {
        Self {
            pin,
            mode,
            inverted,
            output_on: false,
            duty: 0,
            last_on: Millis::ZERO,
            last_off: Millis::ZERO,
        }
    }

    /// Applies a power request, clamped into `0..=100`.
    ///
    /// In software duty mode this must be called far more often than the switching period;
    /// each call makes at most one on/off transition.
    pub fn apply_heat_power<IO: PinIo>(&mut self, percentage: f32, now: Millis, io: &mut IO) {
        let percentage = clamp_percentage(percentage);

        match self.mode {
            HeaterMode::Direct { full_scale } => {
                let duty = libm::roundf(percentage * full_scale as f32 / 100.0) as u8;
                self.duty = duty;
                self.output_on = duty > 0;
                let level = if self.inverted { full_scale - duty } else { duty };
                io.write_pwm(self.pin, level);
            }
            HeaterMode::SoftwareDuty { switch_frequency_hz } => {
                let period_ms = switching_period_ms(switch_frequency_hz);
                let on_ms = libm::roundf(percentage * period_ms as f32 / 100.0) as u32;
                let off_ms = period_ms - on_ms.min(period_ms);

                if self.output_on {
                    let elapsed = Clock::elapsed(&mut self.last_on, now);
                    if off_ms > 0 && elapsed >= on_ms {
                        self.switch(false, now, io);
                    }
                } else {
                    let elapsed = Clock::elapsed(&mut self.last_off, now);
                    if on_ms > 0 && elapsed >= off_ms {
                        self.switch(true, now, io);
                    }
                }
            }
        }
    }

    /// Turns the output off immediately, regardless of where the duty cycle stands.
    pub fn force_off<IO: PinIo>(&mut self, now: Millis, io: &mut IO) {
        match self.mode {
            HeaterMode::Direct { full_scale } => {
                self.duty = 0;
                self.output_on = false;
                io.write_pwm(self.pin, if self.inverted { full_scale } else { 0 });
            }
            HeaterMode::SoftwareDuty { .. } => self.switch(false, now, io),
        }
    }

    fn switch<IO: PinIo>(&mut self, on: bool, now: Millis, io: &mut IO) {
        self.output_on = on;
        if on {
            self.last_on = now;
        } else {
            self.last_off = now;
        }
        io.write_digital(self.pin, on != self.inverted);
    }

    /// Returns true while the heater is energised.
    pub fn is_on(&self) -> bool {
        self.output_on
    }

    /// Returns the last duty byte written in direct mode, before polarity inversion.
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Returns the configured drive mode.
    pub fn mode(&self) -> HeaterMode {
        self.mode
    }
}

/// Length of one software duty period. Frequencies above 1 kHz collapse to 1 ms.
#[inline]
pub fn switching_period_ms(switch_frequency_hz: u32) -> u32 {
    (1000 / switch_frequency_hz.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_law_spans_error_window() {
        assert_eq!(proportional_heat_power(40.0, 50.0, 10.0), 100.0);
        assert_eq!(proportional_heat_power(50.0, 50.0, 10.0), 0.0);
        assert_eq!(proportional_heat_power(45.0, 50.0, 10.0), 50.0);
        assert!(proportional_heat_power(60.0, 50.0, 10.0) < 0.0);
    }

    #[test]
    fn nan_request_is_treated_as_zero() {
        assert_eq!(clamp_percentage(f32::NAN), 0.0);
        assert_eq!(clamp_percentage(150.0), 100.0);
        assert_eq!(clamp_percentage(-3.0), 0.0);
    }

    #[test]
    fn period_follows_frequency() {
        assert_eq!(switching_period_ms(1), 1000);
        assert_eq!(switching_period_ms(4), 250);
        assert_eq!(switching_period_ms(0), 1000);
        assert_eq!(switching_period_ms(5000), 1);
    }
}
