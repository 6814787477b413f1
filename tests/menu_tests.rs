//! Integration tests for Menu navigation, editing and rendering

use heater_control::menu::{EDIT_MARKER, MAX_MENU_ITEMS, NAVIGATE_MARKER};
use heater_control::{Action, ControlState, Field, Menu, MenuError, MenuItem};

fn two_item_menu() -> Menu {
    Menu::builder("Test")
        .item(
            MenuItem::new("Temp")
                .value(Field::CurrentTemperature)
                .unwrap()
                .value(Field::SetTemperature)
                .unwrap()
                .action(Action::ToggleEditMode)
                .unwrap(),
        )
        .unwrap()
        .item(
            MenuItem::new("Speed")
                .value(Field::CurrentSpeed)
                .unwrap()
                .value(Field::SetSpeed)
                .unwrap()
                .action(Action::ToggleEditMode)
                .unwrap(),
        )
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn negative_delta_wraps_cursor_backwards() {
    let menu = two_item_menu();
    let mut state = ControlState::new();
    menu.apply_delta(&mut state, -1);
    assert_eq!(state.active_menu_cursor, 1);
}

#[test]
fn cursor_wraps_in_both_directions_for_large_deltas() {
    let menu = Menu::main_menu().unwrap();
    let mut state = ControlState::new();
    menu.apply_delta(&mut state, 4);
    assert_eq!(state.active_menu_cursor, 1);
    menu.apply_delta(&mut state, -7);
    assert_eq!(state.active_menu_cursor, 0);
    menu.apply_delta(&mut state, -3_000_001);
    assert_eq!(state.active_menu_cursor, 2);
}

#[test]
fn navigate_mode_leaves_values_alone() {
    let menu = two_item_menu();
    let mut state = ControlState::new();
    state.set_temperature = 40.0;
    menu.apply_delta(&mut state, 3);
    assert_eq!(state.set_temperature, 40.0);
}

#[test]
fn edit_mode_changes_last_value_of_selected_item() {
    let menu = two_item_menu();
    let mut state = ControlState::new();
    state.current_temperature = 20.0;
    state.set_temperature = 40.0;

    menu.click(&mut state);
    assert!(state.edit_mode);

    menu.apply_delta(&mut state, 5);
    assert_eq!(state.set_temperature, 45.0);
    assert_eq!(state.current_temperature, 20.0);
    assert_eq!(state.active_menu_cursor, 0);

    menu.apply_delta(&mut state, -12);
    assert_eq!(state.set_temperature, 33.0);
}

#[test]
fn edit_mode_is_unclamped() {
    let menu = two_item_menu();
    let mut state = ControlState::new();
    state.active_menu_cursor = 1;
    state.edit_mode = true;
    for _ in 0..1_000 {
        menu.apply_delta(&mut state, 10);
    }
    assert_eq!(state.set_speed, 10_000.0);
    for _ in 0..2_000 {
        menu.apply_delta(&mut state, -10);
    }
    assert_eq!(state.set_speed, -10_000.0);
}

#[test]
fn click_toggles_back_to_navigation() {
    let menu = two_item_menu();
    let mut state = ControlState::new();
    assert_eq!(menu.click(&mut state), &[Action::ToggleEditMode]);
    assert_eq!(menu.click(&mut state), &[Action::ToggleEditMode]);
    assert!(!state.edit_mode);
    menu.apply_delta(&mut state, 1);
    assert_eq!(state.active_menu_cursor, 1);
}

#[test]
fn click_runs_every_action_of_the_item() {
    let menu = Menu::builder("Toggles")
        .item(
            MenuItem::new("All")
                .value(Field::HeatPower)
                .unwrap()
                .action(Action::ToggleHeater)
                .unwrap()
                .action(Action::ToggleFan)
                .unwrap()
                .action(Action::ToggleMotor)
                .unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();
    let mut state = ControlState::new();
    assert_eq!(menu.click(&mut state).len(), 3);
    assert!(state.heater_on && state.fan_on && state.motor_on);
    assert!(!state.edit_mode);
}

#[test]
fn click_reports_only_the_selected_items_actions() {
    let menu = Menu::main_menu().unwrap();
    let mut state = ControlState::new();
    state.active_menu_cursor = 2;

    let ran = menu.click(&mut state);
    assert_eq!(ran, &[Action::ToggleHeater]);
    assert!(state.heater_on);
    assert!(!state.edit_mode);
}

#[test]
fn render_starts_at_cursor_and_wraps() {
    let menu = Menu::main_menu().unwrap();
    let mut state = ControlState::new();
    state.current_temperature = 21.5;
    state.set_temperature = 50.0;
    state.heat_power = 100.0;
    state.active_menu_cursor = 2;

    let frame = menu.render(&state, 2);
    assert_eq!(frame.edit_marker(), NAVIGATE_MARKER);
    let lines: Vec<&str> = frame.lines().iter().map(|l| l.as_str()).collect();
    assert_eq!(lines, vec!["Heat 100.00", "Temp 21.50/50.00"]);
}

#[test]
fn render_shows_edit_marker() {
    let menu = Menu::main_menu().unwrap();
    let mut state = ControlState::new();
    state.edit_mode = true;
    let frame = menu.render(&state, 2);
    assert_eq!(frame.edit_marker(), EDIT_MARKER);
    assert_eq!(frame.lines()[0].as_str(), "Temp 0.00/0.00");
}

#[test]
fn render_never_repeats_items_on_tall_screens() {
    let menu = two_item_menu();
    let state = ControlState::new();
    let frame = menu.render(&state, 4);
    assert_eq!(frame.lines().len(), 2);
}

#[test]
fn builder_rejects_empty_menu() {
    assert_eq!(Menu::builder("Empty").build(), Err(MenuError::EmptyMenu));
}

#[test]
fn builder_rejects_item_without_values() {
    let result = Menu::builder("Bad")
        .item(MenuItem::new("Nothing").action(Action::ToggleFan).unwrap())
        .unwrap()
        .build();
    assert_eq!(result, Err(MenuError::ItemWithoutValues));
}

#[test]
fn builder_rejects_too_many_items() {
    let mut builder = Menu::builder("Full");
    for _ in 0..MAX_MENU_ITEMS {
        builder = builder
            .item(MenuItem::new("x").value(Field::HeatPower).unwrap())
            .unwrap();
    }
    let result = builder.item(MenuItem::new("y").value(Field::HeatPower).unwrap());
    assert!(matches!(result, Err(MenuError::CapacityExceeded)));
}
