//! Display surfaces panes draw into.

use std::fmt;

use crate::constants::{GRID_COLUMNS, GRID_SLOTS};
use crate::item::ItemStack;
use crate::layout::GridLocation;

/// Target of `Pane::display`.
pub trait Surface {
    /// Put `item` at absolute grid location `at`. Locations off the grid are
    /// ignored.
    fn set_item(&mut self, at: GridLocation, item: &ItemStack);
}

/// In-memory 9x6 slot grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryGrid {
    slots: Vec<Option<ItemStack>>,
}

impl Default for InventoryGrid {
    fn default() -> Self {
        Self {
            slots: vec![None; GRID_SLOTS],
        }
    }
}

impl InventoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn item_at(&self, column: i32, row: i32) -> Option<&ItemStack> {
        GridLocation::new(column, row)
            .ok()
            .and_then(|loc| loc.slot())
            .and_then(|slot| self.item(slot))
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Indices of every slot holding an item, ascending.
    pub fn occupied_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, item)| item.is_some().then_some(slot))
            .collect()
    }
}

impl Surface for InventoryGrid {
    fn set_item(&mut self, at: GridLocation, item: &ItemStack) {
        if let Some(slot) = at.slot() {
            self.slots[slot] = Some(item.clone());
        }
    }
}

impl fmt::Display for InventoryGrid {
    /// One line per row, `.` for empty slots and the first letter of the
    /// material otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.slots.chunks(GRID_COLUMNS as usize) {
            let line: String = row
                .iter()
                .map(|slot| {
                    slot.as_ref()
                        .and_then(|item| item.material().as_str().chars().next())
                        .unwrap_or('.')
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
