//! NTC thermistor model.
//!
//! Converts a raw ADC code into degrees Celsius by inverting the voltage divider and
//! applying the single-point Beta equation:
//!
//! ```text
//! 1/T = 1/T0 + (1/β)·ln(R/R0)
//! ```

/// Absolute zero offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f32 = 273.15;

/// How the thermistor sits in the voltage divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Divider {
    /// Series resistor to the supply, thermistor to ground. Higher codes read colder.
    NtcToGround,
    /// Thermistor to the supply, series resistor to ground. Higher codes read hotter.
    NtcToSupply,
}

/// Reasons a reading cannot be turned into a temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorFault {
    /// The divider reads as zero thermistor resistance (code at the shorted rail).
    ShortCircuit,
    /// The divider reads as infinite thermistor resistance (code at the open rail).
    OpenCircuit,
    /// The conversion produced a non-finite temperature.
    OutOfRange,
}

impl core::fmt::Display for SensorFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorFault::ShortCircuit => write!(f, "thermistor shorted"),
            SensorFault::OpenCircuit => write!(f, "thermistor open"),
            SensorFault::OutOfRange => write!(f, "thermistor reading out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SensorFault {}

/// Calibration constants of an NTC thermistor and its divider.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thermistor {
    /// Beta constant in Kelvin.
    pub beta: f32,
    /// Thermistor resistance at the reference temperature, in ohms.
    pub reference_resistance: f32,
    /// Reference temperature in degrees Celsius.
    pub reference_celsius: f32,
    /// Fixed divider resistor, in ohms.
    pub series_resistance: f32,
    /// Full-scale ADC code (1023 for a 10-bit converter).
    pub adc_max: u16,
    /// Divider wiring.
    pub divider: Divider,
}

impl Thermistor {
    /// 100 kΩ / β 3950 thermistor against a 100 kΩ pull-up on a 10-bit ADC.
    pub const NTC_100K_3950: Self = Self {
        beta: 3950.0,
        reference_resistance: 100_000.0,
        reference_celsius: 25.0,
        series_resistance: 100_000.0,
        adc_max: 1023,
        divider: Divider::NtcToGround,
    };

    /// Converts a raw ADC code into degrees Celsius.
    ///
    /// Codes at or beyond either rail are reported as a fault instead of producing
    /// `NaN` or infinity.
    pub fn temperature_from_reading(&self, adc_value: u16) -> Result<f32, SensorFault> {
        let resistance = self.resistance_from_reading(adc_value)?;
        self.temperature_from_resistance(resistance)
    }

    /// Inverts the voltage divider to get the thermistor resistance in ohms.
    pub fn resistance_from_reading(&self, adc_value: u16) -> Result<f32, SensorFault> {
        if adc_value == 0 {
            return Err(match self.divider {
                Divider::NtcToGround => SensorFault::ShortCircuit,
                Divider::NtcToSupply => SensorFault::OpenCircuit,
            });
        }
        if adc_value >= self.adc_max {
            return Err(match self.divider {
                Divider::NtcToGround => SensorFault::OpenCircuit,
                Divider::NtcToSupply => SensorFault::ShortCircuit,
            });
        }

        let code = adc_value as f32;
        let rest = (self.adc_max - adc_value) as f32;
        let resistance = match self.divider {
            Divider::NtcToGround => self.series_resistance * code / rest,
            Divider::NtcToSupply => self.series_resistance * rest / code,
        };
        Ok(resistance)
    }

    /// Applies the Beta equation to a resistance in ohms.
    pub fn temperature_from_resistance(&self, resistance: f32) -> Result<f32, SensorFault> {
        if !resistance.is_finite() || resistance <= 0.0 {
            return Err(SensorFault::OutOfRange);
        }

        let reference_kelvin = self.reference_celsius + KELVIN_OFFSET;
        let inverse = 1.0 / reference_kelvin
            + libm::logf(resistance / self.reference_resistance) / self.beta;
        let celsius = 1.0 / inverse - KELVIN_OFFSET;

        if celsius.is_finite() {
            Ok(celsius)
        } else {
            Err(SensorFault::OutOfRange)
        }
    }

    /// Returns the ADC code at which the thermistor sits at its reference resistance.
    pub fn reference_code(&self) -> u16 {
        let ratio = match self.divider {
            Divider::NtcToGround => {
                self.reference_resistance / (self.reference_resistance + self.series_resistance)
            }
            Divider::NtcToSupply => {
                self.series_resistance / (self.reference_resistance + self.series_resistance)
            }
        };
        libm::roundf(ratio * self.adc_max as f32) as u16
    }
}

impl Default for Thermistor {
    fn default() -> Self {
        Self::NTC_100K_3950
    }
}
