//! Grid coordinates and bounds checks for the fixed 9x6 slot grid.

use std::fmt;

use thiserror::Error;

use crate::constants::{GRID_COLUMNS, GRID_ROWS, GRID_SLOTS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("invalid coordinate ({x}, {y}): coordinates must not be negative")]
    InvalidCoordinate { x: i32, y: i32 },
    #[error("pane at ({x}, {y}) with size {length}x{height} does not fit the 9x6 grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        length: i32,
        height: i32,
    },
    #[error("slot {0} is outside the grid")]
    SlotOutOfRange(usize),
    #[error("cell ({x}, {y}) is outside the grid")]
    CellOutOfRange { x: i32, y: i32 },
    #[error("location ({x}, {y}) lies outside the pane")]
    ItemOutsidePane { x: i32, y: i32 },
}

/// An immutable, non-negative cell coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridLocation {
    x: i32,
    y: i32,
}

impl GridLocation {
    pub const ORIGIN: GridLocation = GridLocation { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Result<Self, GridError> {
        if x < 0 || y < 0 {
            return Err(GridError::InvalidCoordinate { x, y });
        }
        Ok(Self { x, y })
    }

    /// Location of an absolute slot index (`column = slot % 9`, `row = slot / 9`).
    pub fn from_slot(slot: usize) -> Result<Self, GridError> {
        if slot >= GRID_SLOTS {
            return Err(GridError::SlotOutOfRange(slot));
        }
        let columns = GRID_COLUMNS as usize;
        Ok(Self {
            x: (slot % columns) as i32,
            y: (slot / columns) as i32,
        })
    }

    pub const fn x(&self) -> i32 {
        self.x
    }

    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Absolute slot index, or `None` when the location is off the grid.
    pub fn slot(&self) -> Option<usize> {
        if self.x >= GRID_COLUMNS || self.y >= GRID_ROWS {
            return None;
        }
        Some((self.y * GRID_COLUMNS + self.x) as usize)
    }

    /// Translate by a pane-relative offset.
    pub fn offset(&self, other: GridLocation) -> GridLocation {
        GridLocation {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl fmt::Display for GridLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Check that a `length` x `height` rectangle anchored at `origin` fits the grid.
pub fn ensure_fits(origin: GridLocation, length: i32, height: i32) -> Result<(), GridError> {
    let fits = length >= 0
        && height >= 0
        && origin.x.checked_add(length).is_some_and(|end| end <= GRID_COLUMNS)
        && origin.y.checked_add(height).is_some_and(|end| end <= GRID_ROWS);
    if fits {
        Ok(())
    } else {
        Err(GridError::OutOfBounds {
            x: origin.x,
            y: origin.y,
            length,
            height,
        })
    }
}

/// How a composite pane decides whether a click belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Containment {
    /// Clicks inside the inclusive rectangle `[0, length] x [0, height]` are
    /// rejected and everything else is routed. This is the historical
    /// behaviour of paginated panes and is kept for markup written against it.
    #[default]
    Legacy,
    /// Clicks inside the half-open rectangle `[0, length) x [0, height)` are
    /// routed and everything else is rejected.
    Strict,
}

impl Containment {
    /// Whether a click at pane-relative `(x, y)` should be routed into a pane
    /// of the given size.
    pub fn routes(self, x: i32, y: i32, length: i32, height: i32) -> bool {
        match self {
            Containment::Legacy => !(x >= 0 && x <= length && y >= 0 && y <= height),
            Containment::Strict => cell_within(x, y, length, height),
        }
    }
}

/// Half-open containment test for pane-relative cells.
pub fn cell_within(x: i32, y: i32, length: i32, height: i32) -> bool {
    x >= 0 && x < length && y >= 0 && y < height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_are_rejected() {
        assert_eq!(
            GridLocation::new(-1, 0),
            Err(GridError::InvalidCoordinate { x: -1, y: 0 })
        );
        assert!(GridLocation::new(0, -3).is_err());
        let loc = GridLocation::new(4, 2).unwrap();
        assert_eq!((loc.x(), loc.y()), (4, 2));
    }

    #[test]
    fn slot_conversion_matches_row_major_layout() {
        let loc = GridLocation::from_slot(20).unwrap();
        assert_eq!((loc.x(), loc.y()), (2, 2));
        assert_eq!(loc.slot(), Some(20));
        assert_eq!(GridLocation::from_slot(54), Err(GridError::SlotOutOfRange(54)));
        assert_eq!(GridLocation::new(9, 0).unwrap().slot(), None);
    }

    #[test]
    fn ensure_fits_accepts_exactly_the_grid() {
        for x in 0..=GRID_COLUMNS {
            for y in 0..=GRID_ROWS {
                let origin = GridLocation::new(x, y).unwrap();
                for length in 0..=GRID_COLUMNS {
                    for height in 0..=GRID_ROWS {
                        let expected = x + length <= GRID_COLUMNS && y + height <= GRID_ROWS;
                        assert_eq!(
                            ensure_fits(origin, length, height).is_ok(),
                            expected,
                            "origin {origin} size {length}x{height}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn ensure_fits_rejects_sizes_that_overflow() {
        let origin = GridLocation::new(1, 1).unwrap();
        for (length, height) in [(i32::MAX, 1), (1, i32::MAX), (i32::MAX, i32::MAX)] {
            assert_eq!(
                ensure_fits(origin, length, height),
                Err(GridError::OutOfBounds {
                    x: 1,
                    y: 1,
                    length,
                    height,
                })
            );
        }
        let far = GridLocation::new(i32::MAX, 0).unwrap();
        assert!(ensure_fits(far, 1, 1).is_err());
    }

    #[test]
    fn legacy_containment_rejects_inclusive_interior() {
        // pane of size 3x2: border column 3 and border row 2 are still "inside"
        assert!(!Containment::Legacy.routes(0, 0, 3, 2));
        assert!(!Containment::Legacy.routes(3, 2, 3, 2));
        assert!(Containment::Legacy.routes(4, 0, 3, 2));
        assert!(Containment::Legacy.routes(-1, 1, 3, 2));
    }

    #[test]
    fn strict_containment_is_half_open() {
        assert!(Containment::Strict.routes(0, 0, 3, 2));
        assert!(Containment::Strict.routes(2, 1, 3, 2));
        assert!(!Containment::Strict.routes(3, 1, 3, 2));
        assert!(!Containment::Strict.routes(0, -1, 3, 2));
    }
}
