//! The root container: a titled grid of up to six rows holding root panes.

use std::fs;
use std::path::Path;

use crate::binding::Binding;
use crate::config::{ErrorPolicy, LoadOptions};
use crate::constants::{GRID_COLUMNS, GRID_ROWS};
use crate::event::ClickEvent;
use crate::item::BoundItem;
use crate::layout::{GridError, GridLocation, ensure_fits};
use crate::loader::{LoadError, MarkupLoader, parse_number};
use crate::markup::Element;
use crate::pane::{Pane, PaneNode};
use crate::surface::{InventoryGrid, Surface};

#[derive(Debug, Clone)]
pub struct Gui {
    title: String,
    rows: i32,
    panes: Vec<PaneNode>,
}

impl Gui {
    /// An empty GUI. `rows` must be between 1 and 6.
    pub fn new(title: impl Into<String>, rows: i32) -> Result<Self, GridError> {
        if rows < 1 {
            return Err(GridError::OutOfBounds {
                x: 0,
                y: 0,
                length: GRID_COLUMNS,
                height: rows,
            });
        }
        ensure_fits(GridLocation::ORIGIN, GRID_COLUMNS, rows)?;
        Ok(Self {
            title: title.into(),
            rows,
            panes: Vec::new(),
        })
    }

    /// Parse a `<gui title=".." rows="..">` document and load its root panes.
    pub fn load(source: &str, binding: &Binding, options: LoadOptions) -> Result<Self, LoadError> {
        let loader = MarkupLoader::new(binding).with_options(options);
        Self::load_with(&loader, source)
    }

    pub fn load_file(
        path: impl AsRef<Path>,
        binding: &Binding,
        options: LoadOptions,
    ) -> Result<Self, LoadError> {
        let source = fs::read_to_string(path)?;
        Self::load(&source, binding, options)
    }

    /// Load with a preconfigured loader, for custom materials or pane kinds.
    pub fn load_with(loader: &MarkupLoader<'_>, source: &str) -> Result<Self, LoadError> {
        let root = Element::parse(source)?;
        if root.name() != "gui" {
            return Err(LoadError::UnexpectedRoot {
                expected: "gui",
                found: root.name().to_string(),
            });
        }
        let rows = match root.attr("rows") {
            Some(rows) => parse_number(&root, "rows", rows)?,
            None => GRID_ROWS,
        };
        let mut gui = Gui::new(root.attr("title").unwrap_or_default(), rows)?;

        for element in root.children() {
            match loader.load_pane(element) {
                Ok(pane) => gui.add_pane(pane),
                Err(err) if loader.options().error_policy == ErrorPolicy::Degrade => {
                    tracing::error!(
                        element = element.name(),
                        tag = element.attr("tag").unwrap_or(""),
                        error = %err,
                        "dropping pane that failed to load"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        tracing::debug!(title = %gui.title, panes = gui.panes.len(), "loaded gui");
        Ok(gui)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn add_pane(&mut self, pane: PaneNode) {
        self.panes.push(pane);
    }

    pub fn panes(&self) -> &[PaneNode] {
        &self.panes
    }

    pub fn panes_mut(&mut self) -> &mut [PaneNode] {
        &mut self.panes
    }

    /// Draw every root pane in insertion order. Later panes overwrite
    /// earlier ones where they overlap.
    pub fn display(&self, surface: &mut dyn Surface) {
        for pane in &self.panes {
            pane.display(surface);
        }
    }

    /// A fresh grid with the current contents drawn into it.
    pub fn render(&self) -> InventoryGrid {
        let mut grid = InventoryGrid::new();
        self.display(&mut grid);
        grid
    }

    /// Route a click to every visible root pane. Returns whether any of them
    /// consumed it.
    pub fn click(&mut self, event: &mut ClickEvent) -> bool {
        self.panes
            .iter_mut()
            .filter(|pane| pane.visible())
            .fold(false, |consumed, pane| pane.click(event) | consumed)
    }

    pub fn find_item(&self, tag: &str) -> Option<&BoundItem> {
        self.panes.iter().find_map(|pane| pane.find_item(tag))
    }

    pub fn find_item_mut(&mut self, tag: &str) -> Option<&mut BoundItem> {
        self.panes.iter_mut().find_map(|pane| pane.find_item_mut(tag))
    }

    pub fn find_pane(&self, tag: &str) -> Option<&PaneNode> {
        self.panes.iter().find_map(|pane| pane.find_pane(tag))
    }

    pub fn find_pane_mut(&mut self, tag: &str) -> Option<&mut PaneNode> {
        self.panes.iter_mut().find_map(|pane| pane.find_pane_mut(tag))
    }
}
