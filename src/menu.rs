//! Data-driven menu and the navigate/edit state machine.
//!
//! A [`Menu`] is a declarative list of [`MenuItem`]s. Each item names one or more
//! [`Field`]s of the [`ControlState`] and the [`Action`]s a click triggers. The encoder
//! either moves the cursor (navigate mode) or changes the last field of the selected item
//! (edit mode), depending on [`ControlState::edit_mode`].

use core::fmt::Write;

use heapless::{String, Vec};

use crate::state::{Action, ControlState, Field};

/// Maximum number of items in one menu.
pub const MAX_MENU_ITEMS: usize = 8;
/// Maximum number of values shown by one item.
pub const MAX_ITEM_VALUES: usize = 4;
/// Maximum number of actions attached to one item.
pub const MAX_ITEM_ACTIONS: usize = 4;
/// Maximum number of rendered lines per frame.
pub const MAX_SCREEN_LINES: usize = 4;
/// Byte capacity of one rendered line. Longer lines are truncated.
pub const LINE_CAPACITY: usize = 32;

/// Marker shown while the encoder edits a value.
pub const EDIT_MARKER: char = '*';
/// Marker shown while the encoder moves the cursor.
pub const NAVIGATE_MARKER: char = '>';

/// One rendered display line.
pub type Line = String<LINE_CAPACITY>;

/// Menu construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuError {
    /// No items provided.
    EmptyMenu,

    /// An item has no value to show or edit.
    ItemWithoutValues,

    /// A fixed capacity was exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for MenuError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MenuError::EmptyMenu => write!(f, "menu must have at least one item"),
            MenuError::ItemWithoutValues => write!(f, "menu item must have at least one value"),
            MenuError::CapacityExceeded => write!(f, "menu capacity exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MenuError {}

/// A named row of the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    name: &'static str,
    values: Vec<Field, MAX_ITEM_VALUES>,
    actions: Vec<Action, MAX_ITEM_ACTIONS>,
}

impl MenuItem {
    /// Creates an item with no values and no actions.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            values: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Appends a displayed value. The last one added is the one edit mode changes.
    pub fn value(mut self, field: Field) -> Result<Self, MenuError> {
        self.values
            .push(field)
            .map_err(|_| MenuError::CapacityExceeded)?;
        Ok(self)
    }

    /// Appends an action run on click.
    pub fn action(mut self, action: Action) -> Result<Self, MenuError> {
        self.actions
            .push(action)
            .map_err(|_| MenuError::CapacityExceeded)?;
        Ok(self)
    }

    /// Returns the item name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the displayed values in order.
    pub fn values(&self) -> &[Field] {
        &self.values
    }

    /// Returns the click actions in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The value edit mode writes to: the "set" half of a current/set pair.
    pub fn edit_target(&self) -> Option<Field> {
        self.values.last().copied()
    }

    fn render(&self, state: &ControlState) -> Line {
        let mut line = Line::new();
        for c in self.name.chars() {
            if line.push(c).is_err() {
                return line;
            }
        }
        for (index, field) in self.values.iter().enumerate() {
            let separator = if index == 0 { ' ' } else { '/' };
            let _ = write!(line, "{}{:.2}", separator, state.field(*field));
        }
        line
    }
}

/// A validated, non-empty list of menu items.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    title: &'static str,
    items: Vec<MenuItem, MAX_MENU_ITEMS>,
}

impl Menu {
    /// Creates a new menu builder.
    pub fn builder(title: &'static str) -> MenuBuilder {
        MenuBuilder::new(title)
    }

    /// The stock menu: temperature pair, speed pair and heater power.
    ///
    /// Clicking a pair toggles edit mode; clicking the power row toggles the heater.
    pub fn main_menu() -> Result<Self, MenuError> {
        Menu::builder("Main Menu")
            .item(
                MenuItem::new("Temp")
                    .value(Field::CurrentTemperature)?
                    .value(Field::SetTemperature)?
                    .action(Action::ToggleEditMode)?,
            )?
            .item(
                MenuItem::new("Speed")
                    .value(Field::CurrentSpeed)?
                    .value(Field::SetSpeed)?
                    .action(Action::ToggleEditMode)?,
            )?
            .item(
                MenuItem::new("Heat")
                    .value(Field::HeatPower)?
                    .action(Action::ToggleHeater)?,
            )?
            .build()
    }

    /// Returns the menu title.
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Returns the number of items; always at least one.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the items in order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Returns the item under the cursor.
    pub fn selected(&self, state: &ControlState) -> &MenuItem {
        &self.items[state.active_menu_cursor % self.items.len()]
    }

    /// Routes an encoder delta to the cursor or to the selected value.
    ///
    /// In navigate mode the cursor wraps in both directions. In edit mode the delta is
    /// added to the item's last value without limits.
    pub fn apply_delta(&self, state: &mut ControlState, delta: i32) {
        if delta == 0 {
            return;
        }

        if state.edit_mode {
            if let Some(target) = self.selected(state).edit_target() {
                *state.field_mut(target) += delta as f32;
            }
        } else {
            let count = self.items.len() as i64;
            let cursor = state.active_menu_cursor as i64 + delta as i64;
            state.active_menu_cursor = cursor.rem_euclid(count) as usize;
        }
    }

    /// Runs every action of the selected item and returns the actions that ran.
    pub fn click(&self, state: &mut ControlState) -> &[Action] {
        let item = self.selected(state);
        for action in item.actions() {
            state.apply(*action);
        }
        item.actions()
    }

    /// Renders up to `height` lines starting at the cursor, wrapping around the item list.
    ///
    /// Never shows an item twice, so short menus produce fewer lines than `height`.
    pub fn render(&self, state: &ControlState, height: usize) -> Frame {
        let mut frame = Frame {
            edit_marker: if state.edit_mode {
                EDIT_MARKER
            } else {
                NAVIGATE_MARKER
            },
            lines: Vec::new(),
        };

        let count = self.items.len();
        let shown = height.min(count).min(MAX_SCREEN_LINES);
        let first = state.active_menu_cursor % count;
        for offset in 0..shown {
            let item = &self.items[(first + offset) % count];
            let _ = frame.lines.push(item.render(state));
        }
        frame
    }
}

/// Builder for constructing validated menus.
#[derive(Debug)]
pub struct MenuBuilder {
    title: &'static str,
    items: Vec<MenuItem, MAX_MENU_ITEMS>,
}

impl MenuBuilder {
    /// Creates an empty builder.
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            items: Vec::new(),
        }
    }

    /// Appends an item.
    pub fn item(mut self, item: MenuItem) -> Result<Self, MenuError> {
        self.items
            .push(item)
            .map_err(|_| MenuError::CapacityExceeded)?;
        Ok(self)
    }

    /// Builds and validates the menu.
    ///
    /// # Errors
    /// * `EmptyMenu` - No items were added
    /// * `ItemWithoutValues` - An item has no value
    pub fn build(self) -> Result<Menu, MenuError> {
        if self.items.is_empty() {
            return Err(MenuError::EmptyMenu);
        }

        if self.items.iter().any(|item| item.values.is_empty()) {
            return Err(MenuError::ItemWithoutValues);
        }

        Ok(Menu {
            title: self.title,
            items: self.items,
        })
    }
}

/// One screenful of menu output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    edit_marker: char,
    lines: Vec<Line, MAX_SCREEN_LINES>,
}

impl Frame {
    /// [`EDIT_MARKER`] or [`NAVIGATE_MARKER`].
    pub fn edit_marker(&self) -> char {
        self.edit_marker
    }

    /// The rendered item lines, selected item first.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}
