//! Shared test infrastructure for heater-control integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;

use heater_control::{Diagnostics, Display, Frame, Millis, Pin, PinIo, PinMode, TimeSource};

pub const PIN_COUNT: usize = 32;

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock millisecond counter with controllable advancement
pub struct MockTimeSource {
    current: Cell<u32>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current: Cell::new(0),
        }
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current: Cell::new(millis),
        }
    }

    /// Advance time, wrapping like a hardware counter
    pub fn advance(&self, millis: u32) {
        self.current.set(self.current.get().wrapping_add(millis));
    }

    pub fn set(&self, millis: u32) {
        self.current.set(millis);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Millis {
        Millis(self.current.get())
    }
}

// ============================================================================
// Mock Pin I/O
// ============================================================================

/// Mock pin bank. Digital inputs idle high (pull-ups, buttons released).
pub struct MockIo {
    pub modes: [Option<PinMode>; PIN_COUNT],
    pub digital_in: [bool; PIN_COUNT],
    pub analog_in: [u16; PIN_COUNT],
    pub digital_out: [bool; PIN_COUNT],
    pub pwm_out: [u8; PIN_COUNT],
    pub digital_writes: [u32; PIN_COUNT],
    pub pwm_writes: [u32; PIN_COUNT],
}

impl MockIo {
    pub fn new() -> Self {
        Self {
            modes: [None; PIN_COUNT],
            digital_in: [true; PIN_COUNT],
            analog_in: [512; PIN_COUNT],
            digital_out: [false; PIN_COUNT],
            pwm_out: [0; PIN_COUNT],
            digital_writes: [0; PIN_COUNT],
            pwm_writes: [0; PIN_COUNT],
        }
    }

    pub fn set_input(&mut self, pin: Pin, high: bool) {
        self.digital_in[pin.0 as usize] = high;
    }

    pub fn set_analog(&mut self, pin: Pin, code: u16) {
        self.analog_in[pin.0 as usize] = code;
    }

    pub fn output(&self, pin: Pin) -> bool {
        self.digital_out[pin.0 as usize]
    }

    pub fn pwm(&self, pin: Pin) -> u8 {
        self.pwm_out[pin.0 as usize]
    }

    pub fn writes(&self, pin: Pin) -> u32 {
        self.digital_writes[pin.0 as usize]
    }

    pub fn mode(&self, pin: Pin) -> Option<PinMode> {
        self.modes[pin.0 as usize]
    }
}

impl PinIo for MockIo {
    fn configure_pin(&mut self, pin: Pin, mode: PinMode) {
        self.modes[pin.0 as usize] = Some(mode);
    }

    fn read_digital(&mut self, pin: Pin) -> bool {
        self.digital_in[pin.0 as usize]
    }

    fn read_analog(&mut self, pin: Pin) -> u16 {
        self.analog_in[pin.0 as usize]
    }

    fn write_digital(&mut self, pin: Pin, high: bool) {
        self.digital_out[pin.0 as usize] = high;
        self.digital_writes[pin.0 as usize] += 1;
    }

    fn write_pwm(&mut self, pin: Pin, duty: u8) {
        self.pwm_out[pin.0 as usize] = duty;
        self.pwm_writes[pin.0 as usize] += 1;
    }
}

// ============================================================================
// Mock Display and Diagnostics
// ============================================================================

/// Mock display that keeps the last frame
pub struct MockDisplay {
    pub last_frame: Option<Frame>,
    pub frames: u32,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            frames: 0,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.last_frame
            .as_ref()
            .map(|frame| frame.lines().iter().map(|l| l.as_str().to_string()).collect())
            .unwrap_or_default()
    }
}

impl Display for MockDisplay {
    fn show(&mut self, frame: &Frame) {
        self.last_frame = Some(frame.clone());
        self.frames += 1;
    }
}

/// Mock diagnostics sink that records every line
pub struct MockDiagnostics {
    pub lines: Vec<String>,
}

impl MockDiagnostics {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }
}

impl Diagnostics for MockDiagnostics {
    fn telemetry(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Compare two floats with tolerance
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}
