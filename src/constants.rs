//! Shared crate-wide constants.

/// Number of columns on the host display grid.
pub const GRID_COLUMNS: i32 = 9;

/// Number of rows on the host display grid.
pub const GRID_ROWS: i32 = 6;

/// Total number of addressable slots (`GRID_COLUMNS * GRID_ROWS`).
pub const GRID_SLOTS: usize = (GRID_COLUMNS * GRID_ROWS) as usize;

/// Width of one slot when the grid is previewed in a terminal.
///
/// Units: terminal columns, borders included.
pub const SLOT_CELL_WIDTH: u16 = 8;

/// Height of one slot when the grid is previewed in a terminal.
///
/// Units: terminal rows, borders included.
pub const SLOT_CELL_HEIGHT: u16 = 3;

/// Separator used by the `lores` markup attribute between lore lines.
pub const LORE_SEPARATOR: char = ';';
