//! Panes: rectangular regions of the grid that own items or child panes.
//!
//! Every pane implements [`Pane`]. The set of concrete panes is closed and
//! collected in [`PaneNode`], which is what composite panes store as
//! children and what the markup loader produces.
//!
//! Visibility is honoured inside each pane's `display`: a hidden pane draws
//! nothing, so containers call `display` unconditionally.

pub mod paginated;
pub mod static_pane;

pub use paginated::PaginatedPane;
pub use static_pane::StaticPane;

use thiserror::Error;

use crate::binding::ClickAction;
use crate::event::ClickEvent;
use crate::item::BoundItem;
use crate::layout::{GridError, GridLocation, ensure_fits};
use crate::surface::Surface;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaneError {
    #[error("page {page} is out of range (pane has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// State shared by every pane.
#[derive(Debug, Clone)]
pub struct PaneBase {
    origin: GridLocation,
    length: i32,
    height: i32,
    visible: bool,
    tag: Option<String>,
    on_click: Option<ClickAction>,
}

impl PaneBase {
    /// Fails when the rectangle does not fit the 9x6 grid.
    pub fn new(origin: GridLocation, length: i32, height: i32) -> Result<Self, GridError> {
        ensure_fits(origin, length, height)?;
        Ok(Self {
            origin,
            length,
            height,
            visible: true,
            tag: None,
            on_click: None,
        })
    }

    pub fn origin(&self) -> GridLocation {
        self.origin
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    pub fn on_click(&self) -> Option<&ClickAction> {
        self.on_click.as_ref()
    }

    pub fn set_on_click(&mut self, action: Option<ClickAction>) {
        self.on_click = action;
    }

    /// Event position relative to this pane's origin.
    pub fn relative(&self, event: &ClickEvent) -> (i32, i32) {
        (
            event.column() - self.origin.x(),
            event.row() - self.origin.y(),
        )
    }

    pub(crate) fn fire_on_click(&self, event: &mut ClickEvent) {
        if let Some(action) = &self.on_click {
            action.invoke(event);
        }
    }
}

/// The contract every pane fulfils.
pub trait Pane {
    fn base(&self) -> &PaneBase;

    fn base_mut(&mut self) -> &mut PaneBase;

    /// Draw the pane's visible content into `surface`.
    fn display(&self, surface: &mut dyn Surface);

    /// Handle a click. Returns whether this pane or a descendant consumed it.
    fn click(&mut self, event: &mut ClickEvent) -> bool;

    /// First item tagged `tag`, depth first.
    fn find_item(&self, tag: &str) -> Option<&BoundItem>;

    fn find_item_mut(&mut self, tag: &str) -> Option<&mut BoundItem>;

    fn tag(&self) -> Option<&str> {
        self.base().tag()
    }

    fn set_tag(&mut self, tag: Option<String>) {
        self.base_mut().set_tag(tag);
    }

    fn visible(&self) -> bool {
        self.base().visible()
    }

    fn set_visible(&mut self, visible: bool) {
        self.base_mut().set_visible(visible);
    }

    fn set_on_click(&mut self, action: Option<ClickAction>) {
        self.base_mut().set_on_click(action);
    }
}

/// Any pane the crate knows how to build.
#[derive(Debug, Clone)]
pub enum PaneNode {
    Static(StaticPane),
    Paginated(PaginatedPane),
}

impl PaneNode {
    pub fn kind(&self) -> &'static str {
        match self {
            PaneNode::Static(_) => "staticpane",
            PaneNode::Paginated(_) => "paginatedpane",
        }
    }

    fn as_pane(&self) -> &dyn Pane {
        match self {
            PaneNode::Static(pane) => pane,
            PaneNode::Paginated(pane) => pane,
        }
    }

    fn as_pane_mut(&mut self) -> &mut dyn Pane {
        match self {
            PaneNode::Static(pane) => pane,
            PaneNode::Paginated(pane) => pane,
        }
    }

    pub fn as_paginated(&self) -> Option<&PaginatedPane> {
        match self {
            PaneNode::Paginated(pane) => Some(pane),
            _ => None,
        }
    }

    pub fn as_paginated_mut(&mut self) -> Option<&mut PaginatedPane> {
        match self {
            PaneNode::Paginated(pane) => Some(pane),
            _ => None,
        }
    }

    pub fn as_static(&self) -> Option<&StaticPane> {
        match self {
            PaneNode::Static(pane) => Some(pane),
            _ => None,
        }
    }

    /// This pane or the first descendant tagged `tag`, depth first across
    /// all pages.
    pub fn find_pane_mut(&mut self, tag: &str) -> Option<&mut PaneNode> {
        if self.tag() == Some(tag) {
            return Some(self);
        }
        match self {
            PaneNode::Static(_) => None,
            PaneNode::Paginated(pane) => pane.find_pane_mut(tag),
        }
    }

    pub fn find_pane(&self, tag: &str) -> Option<&PaneNode> {
        if self.tag() == Some(tag) {
            return Some(self);
        }
        match self {
            PaneNode::Static(_) => None,
            PaneNode::Paginated(pane) => pane.find_pane(tag),
        }
    }
}

impl Pane for PaneNode {
    fn base(&self) -> &PaneBase {
        self.as_pane().base()
    }

    fn base_mut(&mut self) -> &mut PaneBase {
        self.as_pane_mut().base_mut()
    }

    fn display(&self, surface: &mut dyn Surface) {
        self.as_pane().display(surface);
    }

    fn click(&mut self, event: &mut ClickEvent) -> bool {
        self.as_pane_mut().click(event)
    }

    fn find_item(&self, tag: &str) -> Option<&BoundItem> {
        self.as_pane().find_item(tag)
    }

    fn find_item_mut(&mut self, tag: &str) -> Option<&mut BoundItem> {
        self.as_pane_mut().find_item_mut(tag)
    }
}

impl From<StaticPane> for PaneNode {
    fn from(pane: StaticPane) -> Self {
        PaneNode::Static(pane)
    }
}

impl From<PaginatedPane> for PaneNode {
    fn from(pane: PaginatedPane) -> Self {
        PaneNode::Paginated(pane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_respects_grid_bounds() {
        for x in 0..9 {
            for y in 0..6 {
                let origin = GridLocation::new(x, y).unwrap();
                for length in 0..=9 {
                    for height in 0..=6 {
                        let ok = x + length <= 9 && y + height <= 6;
                        let result = PaneBase::new(origin, length, height);
                        assert_eq!(result.is_ok(), ok);
                        if !ok {
                            assert!(matches!(result, Err(GridError::OutOfBounds { .. })));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn accessors_are_plain_storage() {
        let mut base = PaneBase::new(GridLocation::new(1, 1).unwrap(), 3, 2).unwrap();
        assert!(base.visible());
        assert_eq!(base.tag(), None);
        base.set_visible(false);
        base.set_tag(Some("menu".into()));
        assert!(!base.visible());
        assert_eq!(base.tag(), Some("menu"));
        base.set_tag(None);
        assert_eq!(base.tag(), None);
    }

    #[test]
    fn find_pane_walks_nested_pages() {
        let origin = GridLocation::ORIGIN;
        let mut outer = PaginatedPane::new(origin, 9, 6, 2).unwrap();
        let mut inner = StaticPane::new(origin, 2, 2).unwrap();
        inner.set_tag(Some("inner".into()));
        outer.add_pane(1, inner.into()).unwrap();
        let mut node = PaneNode::from(outer);
        node.set_tag(Some("outer".into()));

        assert_eq!(node.find_pane("inner").map(PaneNode::kind), Some("staticpane"));
        assert!(node.find_pane_mut("outer").unwrap().as_paginated_mut().is_some());
        assert!(node.find_pane("nope").is_none());
    }
}
