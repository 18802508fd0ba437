use crate::layout::{GridError, GridLocation};

/// Mouse button (or modifier combination) that produced a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClickButton {
    #[default]
    Left,
    Right,
    Middle,
    ShiftLeft,
    ShiftRight,
}

/// A single interaction event delivered by the host surface.
///
/// The event carries the absolute slot that was clicked and a cancel flag
/// the host inspects after dispatch. Handlers may set the flag; routing
/// itself never touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    slot: usize,
    location: GridLocation,
    button: ClickButton,
    cancelled: bool,
}

impl ClickEvent {
    pub fn new(slot: usize) -> Result<Self, GridError> {
        Self::with_button(slot, ClickButton::Left)
    }

    pub fn with_button(slot: usize, button: ClickButton) -> Result<Self, GridError> {
        let location = GridLocation::from_slot(slot)?;
        Ok(Self {
            slot,
            location,
            button,
            cancelled: false,
        })
    }

    /// Event for the cell at `(column, row)`.
    pub fn at(column: i32, row: i32) -> Result<Self, GridError> {
        let location = GridLocation::new(column, row)?;
        let slot = location.slot().ok_or(GridError::CellOutOfRange {
            x: column,
            y: row,
        })?;
        Self::new(slot)
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn column(&self) -> i32 {
        self.location.x()
    }

    pub fn row(&self) -> i32 {
        self.location.y()
    }

    pub fn location(&self) -> GridLocation {
        self.location
    }

    pub fn button(&self) -> ClickButton {
        self.button
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}
