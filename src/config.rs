//! Controller configuration.
//!
//! Everything here is meant to be a `const`. The heater and thermistor pins are plain
//! fields of [`PinMap`], so a board definition without them does not compile, and
//! [`ControllerConfig::validate`] is a `const fn` so numeric mistakes can be rejected at
//! build time:
//!
//! ```
//! use heater_control::ControllerConfig;
//!
//! const CONFIG: ControllerConfig = ControllerConfig {
//!     update_frequency_hz: 20,
//!     ..ControllerConfig::DEFAULT
//! };
//! const _: () = assert!(CONFIG.validate().is_ok());
//! ```

use crate::heater::HeaterMode;
use crate::input::EncoderMode;
use crate::io::Pin;
use crate::menu::MAX_SCREEN_LINES;
use crate::sensor::Thermistor;

/// Highest accepted update or switching frequency: one period per clock tick.
pub const MAX_FREQUENCY_HZ: u32 = 1000;

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The control update frequency is zero.
    ZeroUpdateFrequency,

    /// The control update period would be shorter than one millisecond.
    UpdateFrequencyTooHigh,

    /// The software duty switching frequency is zero.
    ZeroSwitchFrequency,

    /// The software duty period would be shorter than one millisecond.
    SwitchFrequencyTooHigh,

    /// The display refresh interval is zero.
    ZeroRefreshInterval,

    /// The screen has no lines.
    ZeroScreenHeight,

    /// The screen has more lines than a frame can hold.
    ScreenTooTall,

    /// The proportional error span is not a positive number.
    InvalidErrorSpan,

    /// The acceleration limit is not a positive number.
    InvalidAcceleration,

    /// A thermistor constant is not positive, or the ADC range is too small.
    InvalidThermistor,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroUpdateFrequency => write!(f, "update frequency must be non-zero"),
            ConfigError::UpdateFrequencyTooHigh => {
                write!(f, "update frequency must not exceed {} Hz", MAX_FREQUENCY_HZ)
            }
            ConfigError::ZeroSwitchFrequency => {
                write!(f, "heater switch frequency must be non-zero")
            }
            ConfigError::SwitchFrequencyTooHigh => {
                write!(f, "heater switch frequency must not exceed {} Hz", MAX_FREQUENCY_HZ)
            }
            ConfigError::ZeroRefreshInterval => {
                write!(f, "screen refresh interval must be non-zero")
            }
            ConfigError::ZeroScreenHeight => write!(f, "screen height must be non-zero"),
            ConfigError::ScreenTooTall => {
                write!(f, "screen height must not exceed {} lines", MAX_SCREEN_LINES)
            }
            ConfigError::InvalidErrorSpan => {
                write!(f, "temperature error span must be a positive number")
            }
            ConfigError::InvalidAcceleration => {
                write!(f, "motor acceleration must be a positive number")
            }
            ConfigError::InvalidThermistor => write!(f, "invalid thermistor calibration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

const fn positive(value: f32) -> bool {
    !value.is_nan() && value > 0.0
}

/// Stepper driver pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorPins {
    pub step: Pin,
    pub dir: Pin,
}

/// Rotary encoder pins. The push button is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderPins {
    pub a: Pin,
    pub b: Pin,
    pub button: Option<Pin>,
}

/// Board wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    /// Heater switch output.
    pub heater: Pin,
    /// Thermistor divider, analog input.
    pub thermistor: Pin,
    pub fan: Option<Pin>,
    pub motor: Option<MotorPins>,
    pub encoder: Option<EncoderPins>,
    /// Dedicated heater enable button.
    pub heater_button: Option<Pin>,
    /// Dedicated motor enable button.
    pub motor_button: Option<Pin>,
    /// Dedicated fan button.
    pub fan_button: Option<Pin>,
}

impl PinMap {
    /// Heater and thermistor only.
    pub const fn new(heater: Pin, thermistor: Pin) -> Self {
        Self {
            heater,
            thermistor,
            fan: None,
            motor: None,
            encoder: None,
            heater_button: None,
            motor_button: None,
            fan_button: None,
        }
    }

    /// Arduino Uno wiring: heater on D12, fan on D13, stepper on D9/D10, buttons on D2–D4,
    /// encoder on D5/D6 with its button on D7, thermistor on A0.
    pub const ARDUINO_UNO: Self = Self {
        heater: Pin(12),
        thermistor: Pin(14),
        fan: Some(Pin(13)),
        motor: Some(MotorPins {
            step: Pin(9),
            dir: Pin(10),
        }),
        encoder: Some(EncoderPins {
            a: Pin(5),
            b: Pin(6),
            button: Some(Pin(7)),
        }),
        heater_button: Some(Pin(2)),
        motor_button: Some(Pin(3)),
        fan_button: Some(Pin(4)),
    };
}

/// Tuning and behaviour of the control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Thermistor calibration and divider wiring.
    pub thermistor: Thermistor,
    /// PWM or software duty cycle.
    pub heater_mode: HeaterMode,
    /// The heater switch conducts while its pin is low.
    pub heater_inverted: bool,
    /// Error in °C below the setpoint at which the heater reaches full power.
    pub temp_error_max: f32,
    /// Control updates per second: sensor read, control law, ramp.
    pub update_frequency_hz: u32,
    /// Motor acceleration limit in steps/s².
    pub max_acceleration: f32,
    /// Swap the direction line polarity.
    pub invert_motor_direction: bool,
    /// Whether the loop samples the encoder itself.
    pub encoder_mode: EncoderMode,
    /// Buttons read low when pressed (pull-up wiring).
    pub buttons_active_low: bool,
    /// Menu lines per frame.
    pub screen_height: usize,
    /// Display refresh interval in milliseconds.
    pub screen_refresh_ms: u32,
}

impl ControllerConfig {
    /// 10 Hz control, 1 Hz software duty cycle, 10 °C error span, 250 steps/s², 16x2 display
    /// refreshed every 100 ms.
    pub const DEFAULT: Self = Self {
        thermistor: Thermistor::NTC_100K_3950,
        heater_mode: HeaterMode::SoftwareDuty {
            switch_frequency_hz: 1,
        },
        heater_inverted: false,
        temp_error_max: 10.0,
        update_frequency_hz: 10,
        max_acceleration: 250.0,
        invert_motor_direction: false,
        encoder_mode: EncoderMode::Interrupt,
        buttons_active_low: true,
        screen_height: 2,
        screen_refresh_ms: 100,
    };

    /// Checks every numeric setting.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.update_frequency_hz == 0 {
            return Err(ConfigError::ZeroUpdateFrequency);
        }
        if self.update_frequency_hz > MAX_FREQUENCY_HZ {
            return Err(ConfigError::UpdateFrequencyTooHigh);
        }
        if let HeaterMode::SoftwareDuty {
            switch_frequency_hz,
        } = self.heater_mode
        {
            if switch_frequency_hz == 0 {
                return Err(ConfigError::ZeroSwitchFrequency);
            }
            if switch_frequency_hz > MAX_FREQUENCY_HZ {
                return Err(ConfigError::SwitchFrequencyTooHigh);
            }
        }
        if self.screen_refresh_ms == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if self.screen_height == 0 {
            return Err(ConfigError::ZeroScreenHeight);
        }
        if self.screen_height > MAX_SCREEN_LINES {
            return Err(ConfigError::ScreenTooTall);
        }
        if !positive(self.temp_error_max) {
            return Err(ConfigError::InvalidErrorSpan);
        }
        if !positive(self.max_acceleration) {
            return Err(ConfigError::InvalidAcceleration);
        }
        let ntc = &self.thermistor;
        if !positive(ntc.beta)
            || !positive(ntc.reference_resistance)
            || !positive(ntc.series_resistance)
            || !positive(ntc.reference_celsius + crate::sensor::KELVIN_OFFSET)
            || ntc.adc_max < 2
        {
            return Err(ConfigError::InvalidThermistor);
        }
        Ok(())
    }

    /// Milliseconds between control updates.
    pub const fn update_period_ms(&self) -> u32 {
        1000 / self.update_frequency_hz
    }

    /// Seconds between control updates, as used by the speed ramp.
    pub fn update_period_s(&self) -> f32 {
        self.update_period_ms() as f32 / 1000.0
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const _: () = assert!(ControllerConfig::DEFAULT.validate().is_ok());
