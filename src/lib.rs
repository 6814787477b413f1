#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Clock`** / **`TimeSource`**: Millisecond counter access with wraparound-safe elapsed time
//! - **`TaskGate`**: Non-blocking "may this periodic task run now?" check
//! - **`Thermistor`**: ADC code to °C via the Beta equation, with explicit `SensorFault`s
//! - **`HeaterDriver`**: Power request to PWM duty or software-timed on/off cycle
//! - **`SpeedRamp`** / **`StepGenerator`**: Bounded-acceleration speed and step/direction pulses
//! - **`QuadratureDecoder`** / **`SharedEncoder`** / **`ButtonEdge`**: Encoder and button decoding
//! - **`Menu`**: Declarative menu with navigate and edit modes
//! - **`Controller`**: The cooperative loop tying everything together
//! - **`PinIo`**, **`Display`**, **`Diagnostics`**: Traits to implement for your hardware

// Must stay first so the logging macros are visible to every module below.
mod fmt;

pub mod config;
pub mod controller;
pub mod gate;
pub mod heater;
pub mod input;
pub mod io;
pub mod menu;
pub mod motion;
pub mod sensor;
pub mod state;
pub mod time;

pub use config::{ConfigError, ControllerConfig, EncoderPins, MotorPins, PinMap};
pub use controller::{Controller, PassReport, telemetry_line};
pub use gate::TaskGate;
pub use heater::{HeaterDriver, HeaterMode, proportional_heat_power};
pub use input::{ButtonEdge, EncoderMode, QuadratureDecoder, SharedEncoder};
pub use io::{Diagnostics, Display, NoDiagnostics, NoDisplay, Pin, PinIo, PinMode};
pub use menu::{Frame, Menu, MenuBuilder, MenuError, MenuItem};
pub use motion::{SpeedRamp, StepGenerator};
pub use sensor::{Divider, SensorFault, Thermistor};
pub use state::{Action, ControlState, Field};
pub use time::{Clock, Millis, TimeSource};
