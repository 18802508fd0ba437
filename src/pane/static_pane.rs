use crate::event::ClickEvent;
use crate::item::BoundItem;
use crate::layout::{GridError, GridLocation, cell_within};
use crate::loader::{LoadError, MarkupLoader, required_number};
use crate::markup::Element;
use crate::pane::{Pane, PaneBase};
use crate::surface::Surface;

/// A pane holding items at fixed pane-relative locations.
#[derive(Debug, Clone)]
pub struct StaticPane {
    base: PaneBase,
    items: Vec<(GridLocation, BoundItem)>,
}

impl StaticPane {
    pub fn new(origin: GridLocation, length: i32, height: i32) -> Result<Self, GridError> {
        Ok(Self {
            base: PaneBase::new(origin, length, height)?,
            items: Vec::new(),
        })
    }

    /// Place `item` at pane-relative `at`, replacing whatever was there.
    pub fn add_item(&mut self, item: BoundItem, at: GridLocation) -> Result<(), GridError> {
        if !cell_within(at.x(), at.y(), self.base.length(), self.base.height()) {
            return Err(GridError::ItemOutsidePane {
                x: at.x(),
                y: at.y(),
            });
        }
        self.items.retain(|(location, _)| *location != at);
        self.items.push((at, item));
        Ok(())
    }

    pub fn remove_item(&mut self, at: GridLocation) -> Option<BoundItem> {
        let index = self.items.iter().position(|(location, _)| *location == at)?;
        Some(self.items.remove(index).1)
    }

    pub fn item_at(&self, at: GridLocation) -> Option<&BoundItem> {
        self.items
            .iter()
            .find(|(location, _)| *location == at)
            .map(|(_, item)| item)
    }

    pub fn items(&self) -> impl Iterator<Item = (GridLocation, &BoundItem)> {
        self.items.iter().map(|(location, item)| (*location, item))
    }

    /// Build from a `<staticpane>` element whose `<item>` children carry
    /// pane-relative `x`/`y` attributes.
    pub fn load(loader: &MarkupLoader<'_>, element: &Element) -> Result<Self, LoadError> {
        let (origin, length, height) = loader.pane_geometry(element)?;
        let mut pane = StaticPane::new(origin, length, height)?;
        loader.apply_pane_attributes(&mut pane, element)?;

        for child in element.children_named("item") {
            let at = GridLocation::new(required_number(child, "x")?, required_number(child, "y")?)?;
            let item = loader.load_item(child)?;
            pane.add_item(item, at)?;
        }
        Ok(pane)
    }
}

impl Pane for StaticPane {
    fn base(&self) -> &PaneBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PaneBase {
        &mut self.base
    }

    fn display(&self, surface: &mut dyn Surface) {
        if !self.base.visible() {
            return;
        }
        let origin = self.base.origin();
        for (location, item) in &self.items {
            surface.set_item(origin.offset(*location), item.stack());
        }
    }

    fn click(&mut self, event: &mut ClickEvent) -> bool {
        let (x, y) = self.base.relative(event);
        if !cell_within(x, y, self.base.length(), self.base.height()) {
            return false;
        }
        self.base.fire_on_click(event);

        let Ok(cell) = GridLocation::new(x, y) else {
            return false;
        };
        match self.item_at(cell) {
            Some(item) => {
                item.click(event);
                true
            }
            None => false,
        }
    }

    fn find_item(&self, tag: &str) -> Option<&BoundItem> {
        self.items
            .iter()
            .map(|(_, item)| item)
            .find(|item| item.tag() == Some(tag))
    }

    fn find_item_mut(&mut self, tag: &str) -> Option<&mut BoundItem> {
        self.items
            .iter_mut()
            .map(|(_, item)| item)
            .find(|item| item.tag() == Some(tag))
    }
}
