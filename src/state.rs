//! The owned control state shared by every loop component.

use crate::sensor::SensorFault;

/// A numeric value of [`ControlState`] that menus can show or edit.
///
/// Menus refer to values through these coordinates instead of holding references, and
/// [`ControlState::field`] resolves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Measured temperature, °C.
    CurrentTemperature,
    /// Target temperature, °C.
    SetTemperature,
    /// Ramped motor speed, steps/s.
    CurrentSpeed,
    /// Target motor speed, steps/s.
    SetSpeed,
    /// Last heater power request, %.
    HeatPower,
}

/// What a menu click does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Switch between moving the cursor and editing the selected value.
    ToggleEditMode,
    /// Enable or disable the heater.
    ToggleHeater,
    /// Enable or disable the motor.
    ToggleMotor,
    /// Switch the fan on or off.
    ToggleFan,
}

/// Everything the control loop reads and writes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlState {
    pub current_temperature: f32,
    pub set_temperature: f32,
    pub current_speed: f32,
    pub set_speed: f32,
    /// Unclamped output of the control law from the last update.
    pub heat_power: f32,
    pub heater_on: bool,
    pub motor_on: bool,
    pub fan_on: bool,
    /// Encoder rotation edits the selected value instead of moving the cursor.
    pub edit_mode: bool,
    /// Index of the selected menu item.
    pub active_menu_cursor: usize,
    /// Latched while the thermistor reading is unusable. The heater stays off.
    pub sensor_fault: Option<SensorFault>,
}

impl ControlState {
    /// Everything off, all values zero, cursor on the first item.
    pub const fn new() -> Self {
        Self {
            current_temperature: 0.0,
            set_temperature: 0.0,
            current_speed: 0.0,
            set_speed: 0.0,
            heat_power: 0.0,
            heater_on: false,
            motor_on: false,
            fan_on: false,
            edit_mode: false,
            active_menu_cursor: 0,
            sensor_fault: None,
        }
    }

    /// Reads a field.
    pub fn field(&self, field: Field) -> f32 {
        match field {
            Field::CurrentTemperature => self.current_temperature,
            Field::SetTemperature => self.set_temperature,
            Field::CurrentSpeed => self.current_speed,
            Field::SetSpeed => self.set_speed,
            Field::HeatPower => self.heat_power,
        }
    }

    /// Borrows a field for writing.
    pub fn field_mut(&mut self, field: Field) -> &mut f32 {
        match field {
            Field::CurrentTemperature => &mut self.current_temperature,
            Field::SetTemperature => &mut self.set_temperature,
            Field::CurrentSpeed => &mut self.current_speed,
            Field::SetSpeed => &mut self.set_speed,
            Field::HeatPower => &mut self.heat_power,
        }
    }

    /// Carries out a menu action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::ToggleEditMode => self.edit_mode = !self.edit_mode,
            Action::ToggleHeater => self.heater_on = !self.heater_on,
            Action::ToggleMotor => self.motor_on = !self.motor_on,
            Action::ToggleFan => self.fan_on = !self.fan_on,
        }
    }

    /// True when the heater may be driven: enabled and no sensor fault latched.
    pub fn heater_allowed(&self) -> bool {
        self.heater_on && self.sensor_fault.is_none()
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}
