//! Terminal rendering of an [`InventoryGrid`].
//!
//! Each slot is drawn as a bordered cell of `SLOT_CELL_WIDTH` x
//! `SLOT_CELL_HEIGHT` terminal cells, anchored at the top-left of the area
//! given. All drawing goes through [`UiFrame`], which clips to the visible
//! area so a terminal smaller than the grid never writes out of bounds.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::constants::{GRID_COLUMNS, SLOT_CELL_HEIGHT, SLOT_CELL_WIDTH};
use crate::layout::GridLocation;
use crate::surface::InventoryGrid;

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct directly from an area and buffer, for offscreen rendering.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Write `text` at (`x`, `y`), truncated to the frame's right edge.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        safe_set_string(self.buffer, self.area, x, y, text, style);
    }
}

/// Terminal rectangle covering a grid of `rows` rows at the top-left of `area`.
pub fn grid_area(area: Rect, rows: i32) -> Rect {
    let rows = rows.clamp(0, u16::MAX as i32) as u16;
    Rect {
        x: area.x,
        y: area.y,
        width: SLOT_CELL_WIDTH * GRID_COLUMNS as u16,
        height: SLOT_CELL_HEIGHT.saturating_mul(rows),
    }
    .intersection(area)
}

/// Rectangle of the slot at `location` inside a grid drawn at `grid`.
pub fn slot_rect(grid: Rect, location: GridLocation) -> Rect {
    Rect {
        x: grid.x + location.x() as u16 * SLOT_CELL_WIDTH,
        y: grid.y + location.y() as u16 * SLOT_CELL_HEIGHT,
        width: SLOT_CELL_WIDTH,
        height: SLOT_CELL_HEIGHT,
    }
}

/// Slot under terminal cell (`column`, `row`), if it lies inside `grid`.
pub fn slot_at(grid: Rect, column: u16, row: u16) -> Option<usize> {
    if !rect_contains(grid, column, row) {
        return None;
    }
    let x = (column - grid.x) / SLOT_CELL_WIDTH;
    let y = (row - grid.y) / SLOT_CELL_HEIGHT;
    GridLocation::new(x as i32, y as i32).ok()?.slot()
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Draw the first `rows` rows of `grid` into `area`.
pub fn render_grid(frame: &mut UiFrame<'_>, area: Rect, grid: &InventoryGrid, rows: i32) {
    let bounds = grid_area(area, rows);
    for slot in 0..(GRID_COLUMNS * rows.max(0)) as usize {
        let Ok(location) = GridLocation::from_slot(slot) else {
            break;
        };
        let cell = slot_rect(bounds, location);
        frame.render_widget(Block::bordered(), cell);
        if let Some(item) = grid.item(slot) {
            let style = if item.display_name().is_some() {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let label = truncate_to_width(item.label(), cell.width.saturating_sub(2) as usize);
            frame.set_string(cell.x + 1, cell.y + 1, &label, style);
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if !rect_contains(bounds, x, y) {
        return;
    }
    let available = bounds.x.saturating_add(bounds.width).saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemStack, MaterialRegistry};
    use crate::surface::Surface;

    fn cell_text(buffer: &Buffer, x: u16, y: u16, width: u16) -> String {
        (x..x + width)
            .filter_map(|col| buffer.cell((col, y)).map(|cell| cell.symbol().to_string()))
            .collect()
    }

    #[test]
    fn slot_at_maps_terminal_cells_to_slots() {
        let grid = grid_area(Rect::new(2, 1, 200, 50), 6);
        assert_eq!(grid, Rect::new(2, 1, 72, 18));
        assert_eq!(slot_at(grid, 2, 1), Some(0));
        assert_eq!(slot_at(grid, 9, 3), Some(0));
        assert_eq!(slot_at(grid, 10, 4), Some(10));
        assert_eq!(slot_at(grid, 73, 18), Some(53));
        assert_eq!(slot_at(grid, 74, 18), None);
        assert_eq!(slot_at(grid, 1, 1), None);
    }

    #[test]
    fn grid_area_is_clipped_to_small_terminals() {
        let grid = grid_area(Rect::new(0, 0, 20, 5), 3);
        assert_eq!(grid, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn render_grid_labels_occupied_slots() {
        let area = Rect::new(0, 0, 72, 6);
        let mut buffer = Buffer::empty(area);
        let mut inventory = InventoryGrid::new();
        let materials = MaterialRegistry::default();
        inventory.set_item(
            GridLocation::new(1, 1).unwrap(),
            &ItemStack::new(materials.resolve("diamond_sword").unwrap()),
        );
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        render_grid(&mut frame, area, &inventory, 2);
        assert_eq!(cell_text(&buffer, 9, 4, 6), "DIAMON");
        assert_eq!(cell_text(&buffer, 0, 0, 1), "┌");
    }

    #[test]
    fn safe_set_string_clips() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buffer = Buffer::empty(area);
        safe_set_string(&mut buffer, area, 2, 0, "hello", Style::default());
        assert_eq!(cell_text(&buffer, 0, 0, 4), "  he");
        safe_set_string(&mut buffer, area, 9, 0, "x", Style::default());
    }
}
