//! The cooperative control loop.
//!
//! [`Controller::service`] is called from the firmware's main loop as often as possible. Each
//! pass samples inputs and then gives every periodic task a chance to run; none of them
//! blocks.

use core::fmt::Write;

use heapless::String;

use crate::config::{ConfigError, ControllerConfig, PinMap};
use crate::gate::TaskGate;
use crate::heater::{HeaterDriver, proportional_heat_power};
use crate::input::{ButtonEdge, EncoderMode, SharedEncoder};
use crate::io::{Diagnostics, Display, Pin, PinIo, PinMode};
use crate::menu::Menu;
use crate::motion::{SpeedRamp, StepGenerator};
use crate::state::{Action, ControlState};
use crate::time::TimeSource;

/// Byte capacity of one telemetry line.
pub const TELEMETRY_CAPACITY: usize = 48;

/// Formats the temperature telemetry line: `>TEMP [<current>] / [<set>]`.
pub fn telemetry_line(state: &ControlState) -> String<TELEMETRY_CAPACITY> {
    let mut line = String::new();
    let _ = write!(
        line,
        ">TEMP [{:.2}] / [{:.2}]",
        state.current_temperature, state.set_temperature
    );
    line
}

/// Which periodic tasks ran during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassReport {
    /// A frame and a telemetry line were emitted.
    pub display_refreshed: bool,
    /// The sensor was read and the control law, ramp and fan were updated.
    pub control_updated: bool,
    /// The step line toggled.
    pub stepped: bool,
}

/// Owns the control state and drives every component in a fixed order.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source and encoder references
/// * `T` - Time source implementation type
/// * `IO` - Pin access implementation type
/// * `D` - Display implementation type
/// * `G` - Diagnostics implementation type
pub struct Controller<'t, T: TimeSource, IO: PinIo, D: Display, G: Diagnostics> {
    config: ControllerConfig,
    pins: PinMap,
    menu: Menu,
    state: ControlState,
    io: IO,
    display: D,
    diagnostics: G,
    time_source: &'t T,
    encoder: &'t SharedEncoder,
    display_gate: TaskGate,
    control_gate: TaskGate,
    heater: HeaterDriver,
    ramp: SpeedRamp,
    stepper: Option<StepGenerator>,
    encoder_button: ButtonEdge,
    heater_button: ButtonEdge,
    motor_button: ButtonEdge,
    fan_button: ButtonEdge,
}

impl<'t, T, IO, D, G> Controller<'t, T, IO, D, G>
where
    T: TimeSource,
    IO: PinIo,
    D: Display,
    G: Diagnostics,
{
    /// Validates the configuration, sets up every pin and switches the heater off.
    ///
    /// With [`EncoderMode::Interrupt`] the caller routes the phase-A pin-change interrupt to
    /// `encoder.on_phase_change(a, b)`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: ControllerConfig,
        pins: PinMap,
        menu: Menu,
        mut io: IO,
        display: D,
        diagnostics: G,
        time_source: &'t T,
        encoder: &'t SharedEncoder,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let input_mode = if config.buttons_active_low {
            PinMode::InputPullup
        } else {
            PinMode::Input
        };

        io.configure_pin(pins.heater, PinMode::Output);
        io.configure_pin(pins.thermistor, PinMode::Input);
        if let Some(fan) = pins.fan {
            io.configure_pin(fan, PinMode::Output);
            io.write_digital(fan, false);
        }
        if let Some(motor) = pins.motor {
            io.configure_pin(motor.step, PinMode::Output);
            io.configure_pin(motor.dir, PinMode::Output);
            io.write_digital(motor.step, false);
        }
        if let Some(enc) = pins.encoder {
            io.configure_pin(enc.a, PinMode::InputPullup);
            io.configure_pin(enc.b, PinMode::InputPullup);
            if let Some(button) = enc.button {
                io.configure_pin(button, input_mode);
            }
            encoder.reset(io.read_digital(enc.a));
        }
        for button in [pins.heater_button, pins.motor_button, pins.fan_button]
            .into_iter()
            .flatten()
        {
            io.configure_pin(button, input_mode);
        }

        let now = time_source.now();
        let mut heater = HeaterDriver::new(pins.heater, config.heater_mode, config.heater_inverted);
        heater.force_off(now, &mut io);

        let stepper = pins
            .motor
            .map(|motor| StepGenerator::new(motor.step, motor.dir, config.invert_motor_direction));

        info!(
            "controller started: {} Hz control, {} ms refresh",
            config.update_frequency_hz,
            config.screen_refresh_ms
        );

        Ok(Self {
            config,
            pins,
            menu,
            state: ControlState::new(),
            io,
            display,
            diagnostics,
            time_source,
            encoder,
            display_gate: TaskGate::new(config.screen_refresh_ms).starting_at(now),
            control_gate: TaskGate::from_frequency(config.update_frequency_hz).starting_at(now),
            heater,
            ramp: SpeedRamp::new(config.max_acceleration, config.update_period_s()),
            stepper,
            encoder_button: ButtonEdge::new(),
            heater_button: ButtonEdge::new(),
            motor_button: ButtonEdge::new(),
            fan_button: ButtonEdge::new(),
        })
    }

    /// Runs one loop pass.
    ///
    /// Order: inputs, display refresh, control update, heater duty cycle, motor stepping.
    /// The three periodic tasks each fire at most once per pass, at their own cadence.
    pub fn service(&mut self) -> PassReport {
        let now = self.time_source.now();
        let mut report = PassReport::default();

        self.poll_inputs();

        if self.display_gate.should_fire(now) {
            self.refresh_display();
            report.display_refreshed = true;
        }

        if self.control_gate.should_fire(now) {
            self.update_control();
            report.control_updated = true;
        }

        let power = if self.state.heater_allowed() {
            self.state.heat_power
        } else {
            0.0
        };
        self.heater.apply_heat_power(power, now, &mut self.io);

        if let Some(stepper) = self.stepper.as_mut() {
            report.stepped = stepper.service(
                now,
                self.state.current_speed,
                self.state.motor_on,
                &mut self.io,
            );
        }

        report
    }

    fn poll_inputs(&mut self) {
        let active_low = self.config.buttons_active_low;

        if let Some(enc) = self.pins.encoder {
            if self.config.encoder_mode == EncoderMode::Polled {
                let a = self.io.read_digital(enc.a);
                let b = self.io.read_digital(enc.b);
                self.encoder.on_phase_change(a, b);
            }

            if let Some(button) = enc.button {
                let pressed = read_button(&mut self.io, button, active_low);
                if self.encoder_button.update(pressed) {
                    let ran = self.menu.click(&mut self.state);
                    debug!("menu click ran {} actions", ran.len());
                    for &action in ran {
                        log_action(&self.state, action);
                    }
                }
            }
        }

        let buttons = [
            (self.pins.heater_button, &mut self.heater_button, Action::ToggleHeater),
            (self.pins.motor_button, &mut self.motor_button, Action::ToggleMotor),
            (self.pins.fan_button, &mut self.fan_button, Action::ToggleFan),
        ];
        for (pin, edge, action) in buttons {
            let Some(pin) = pin else { continue };
            let pressed = read_button(&mut self.io, pin, active_low);
            if edge.update(pressed) {
                self.state.apply(action);
                log_action(&self.state, action);
            }
        }
    }

    fn refresh_display(&mut self) {
        let frame = self.menu.render(&self.state, self.config.screen_height);
        self.display.show(&frame);

        let line = telemetry_line(&self.state);
        self.diagnostics.telemetry(&line);
    }

    fn update_control(&mut self) {
        let delta = self.encoder.take_delta();
        self.menu.apply_delta(&mut self.state, delta);

        let reading = self.io.read_analog(self.pins.thermistor);
        match self.config.thermistor.temperature_from_reading(reading) {
            Ok(celsius) => {
                if let Some(fault) = self.state.sensor_fault.take() {
                    info!("thermistor recovered from {}", fault);
                }
                self.state.current_temperature = celsius;
            }
            Err(fault) => {
                if self.state.sensor_fault != Some(fault) {
                    warn!("thermistor fault {} at code {}, heater off", fault, reading);
                }
                self.state.sensor_fault = Some(fault);
            }
        }

        self.state.heat_power = if self.state.sensor_fault.is_some() {
            0.0
        } else {
            proportional_heat_power(
                self.state.current_temperature,
                self.state.set_temperature,
                self.config.temp_error_max,
            )
        };

        let target = if self.state.motor_on {
            self.state.set_speed
        } else {
            0.0
        };
        self.state.current_speed = self.ramp.update(target);

        if let Some(fan) = self.pins.fan {
            self.io.write_digital(fan, self.state.fan_on);
        }
    }

    /// Returns the control state.
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Returns the control state for direct changes, e.g. restoring setpoints at startup.
    pub fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    /// Returns the active menu.
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Replaces the active menu and moves the cursor back to its first item.
    pub fn set_menu(&mut self, menu: Menu) {
        self.menu = menu;
        self.state.active_menu_cursor = 0;
        self.state.edit_mode = false;
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Returns the heater driver.
    pub fn heater(&self) -> &HeaterDriver {
        &self.heater
    }

    /// Returns the step generator, if a motor is wired.
    pub fn stepper(&self) -> Option<&StepGenerator> {
        self.stepper.as_ref()
    }

    /// Returns the pin I/O implementation.
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Returns the pin I/O implementation mutably.
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Returns the display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Returns the diagnostics sink.
    pub fn diagnostics(&self) -> &G {
        &self.diagnostics
    }
}

fn log_action(state: &ControlState, action: Action) {
    match action {
        Action::ToggleEditMode => info!("edit mode: {}", state.edit_mode),
        Action::ToggleHeater => info!("heater enabled: {}", state.heater_on),
        Action::ToggleMotor => info!("motor enabled: {}", state.motor_on),
        Action::ToggleFan => info!("fan on: {}", state.fan_on),
    }
}

fn read_button<IO: PinIo>(io: &mut IO, pin: Pin, active_low: bool) -> bool {
    io.read_digital(pin) != active_low
}
