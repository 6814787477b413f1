//! Hardware and presentation collaborators.
//!
//! The control core never touches registers or display drivers directly. Implement these
//! traits for your board, LCD and serial port.

/// A board pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(pub u8);

/// Pin direction and bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input.
    Input,
    /// Input with the internal pull-up enabled.
    InputPullup,
    /// Push-pull output.
    Output,
}

/// Trait for abstracting digital and analog pin access.
///
/// Implementations handle any hardware errors internally; these methods cannot fail.
pub trait PinIo {
    /// Sets the direction and bias of `pin`.
    fn configure_pin(&mut self, pin: Pin, mode: PinMode);

    /// Returns true when `pin` reads high.
    fn read_digital(&mut self, pin: Pin) -> bool;

    /// Returns the raw ADC code on `pin`.
    fn read_analog(&mut self, pin: Pin) -> u16;

    /// Drives `pin` high (`true`) or low (`false`).
    fn write_digital(&mut self, pin: Pin, high: bool);

    /// Writes a PWM duty byte (0 = always low, 255 = always high).
    fn write_pwm(&mut self, pin: Pin, duty: u8);
}

/// Receives one rendered menu frame per refresh.
pub trait Display {
    /// Clears the screen and draws `frame`.
    fn show(&mut self, frame: &crate::menu::Frame);
}

/// Receives machine-parsable telemetry lines, e.g. for a serial plotter.
pub trait Diagnostics {
    /// Emits one line without a trailing newline.
    fn telemetry(&mut self, line: &str);
}

/// Display that discards every frame, for headless builds.
pub struct NoDisplay;

impl Display for NoDisplay {
    fn show(&mut self, _frame: &crate::menu::Frame) {}
}

/// Diagnostics sink that discards every line.
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {
    fn telemetry(&mut self, _line: &str) {}
}
