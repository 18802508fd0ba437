use crate::event::ClickEvent;
use crate::item::BoundItem;
use crate::layout::{Containment, GridError, GridLocation};
use crate::loader::{LoadError, MarkupLoader};
use crate::markup::Element;
use crate::pane::{Pane, PaneBase, PaneError, PaneNode};
use crate::surface::Surface;

/// A pane whose children are spread over a fixed number of pages, only one
/// of which is displayed and receives clicks at a time.
#[derive(Debug, Clone)]
pub struct PaginatedPane {
    base: PaneBase,
    pages: Vec<Vec<PaneNode>>,
    page: usize,
    containment: Containment,
}

impl PaginatedPane {
    /// Create a pane with `pages` empty pages, showing page 0.
    pub fn new(
        origin: GridLocation,
        length: i32,
        height: i32,
        pages: usize,
    ) -> Result<Self, GridError> {
        Ok(Self {
            base: PaneBase::new(origin, length, height)?,
            pages: (0..pages).map(|_| Vec::new()).collect(),
            page: 0,
            containment: Containment::default(),
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Switch the displayed page. The current page is unchanged on error.
    pub fn set_page(&mut self, page: usize) -> Result<(), PaneError> {
        self.check_page(page)?;
        self.page = page;
        Ok(())
    }

    /// Append `pane` to `page`.
    pub fn add_pane(&mut self, page: usize, pane: PaneNode) -> Result<(), PaneError> {
        self.check_page(page)?;
        self.pages[page].push(pane);
        Ok(())
    }

    /// Children of `page` in insertion order.
    pub fn panes(&self, page: usize) -> Option<&[PaneNode]> {
        self.pages.get(page).map(Vec::as_slice)
    }

    pub fn containment(&self) -> Containment {
        self.containment
    }

    pub fn set_containment(&mut self, containment: Containment) {
        self.containment = containment;
    }

    /// Build from a `<paginatedpane>` element. Each child element is one
    /// page and the panes inside it are loaded onto that page.
    ///
    /// A `populate` attribute hands the freshly built pane to the named hook
    /// instead; declared page contents are then ignored, though they still
    /// determine the page count.
    pub fn load(loader: &MarkupLoader<'_>, element: &Element) -> Result<Self, LoadError> {
        let (origin, length, height) = loader.pane_geometry(element)?;
        let mut pane = PaginatedPane::new(origin, length, height, element.children().len())?;
        pane.set_containment(loader.options().containment);
        loader.apply_pane_attributes(&mut pane, element)?;

        if let Some(name) = element.attr("populate") {
            match loader.resolver().resolve_populate(name) {
                Some(hook) => {
                    hook.invoke(&mut pane).map_err(|source| LoadError::Populate {
                        name: name.to_string(),
                        source,
                    })?;
                    tracing::debug!(hook = name, pages = pane.page_count(), "populated pane");
                }
                None => loader.unresolved(element, "populate", name)?,
            }
            return Ok(pane);
        }

        for (page, contents) in element.children().iter().enumerate() {
            for child in contents.children() {
                pane.add_pane(page, loader.load_pane(child)?)?;
            }
        }
        Ok(pane)
    }

    pub(crate) fn find_pane_mut(&mut self, tag: &str) -> Option<&mut PaneNode> {
        self.pages
            .iter_mut()
            .flatten()
            .find_map(|pane| pane.find_pane_mut(tag))
    }

    pub(crate) fn find_pane(&self, tag: &str) -> Option<&PaneNode> {
        self.pages
            .iter()
            .flatten()
            .find_map(|pane| pane.find_pane(tag))
    }

    fn check_page(&self, page: usize) -> Result<(), PaneError> {
        if page < self.pages.len() {
            Ok(())
        } else {
            Err(PaneError::PageOutOfRange {
                page,
                page_count: self.pages.len(),
            })
        }
    }
}

impl Pane for PaginatedPane {
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
        if let Some(current) = self.pages.get(self.page) {
            for pane in current {
                pane.display(surface);
            }
        }
    }

    fn click(&mut self, event: &mut ClickEvent) -> bool {
        let (x, y) = self.base.relative(event);
        if !self
            .containment
            .routes(x, y, self.base.length(), self.base.height())
        {
            return false;
        }

        self.base.fire_on_click(event);

        let Some(current) = self.pages.get_mut(self.page) else {
            return false;
        };
        // every child sees the event, even after one has consumed it
        current
            .iter_mut()
            .fold(false, |consumed, pane| pane.click(event) | consumed)
    }

    fn find_item(&self, tag: &str) -> Option<&BoundItem> {
        self.pages
            .iter()
            .flatten()
            .find_map(|pane| pane.find_item(tag))
    }

    fn find_item_mut(&mut self, tag: &str) -> Option<&mut BoundItem> {
        self.pages
            .iter_mut()
            .flatten()
            .find_map(|pane| pane.find_item_mut(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Binding, CallbackError, ClickAction};
    use crate::config::LoadOptions;
    use crate::item::{ItemStack, MaterialRegistry};
    use crate::pane::StaticPane;
    use crate::surface::InventoryGrid;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn loc(x: i32, y: i32) -> GridLocation {
        GridLocation::new(x, y).unwrap()
    }

    fn item(id: &str) -> BoundItem {
        BoundItem::new(ItemStack::new(MaterialRegistry::default().resolve(id).unwrap()))
    }

    fn single(id: &str, at: GridLocation) -> PaneNode {
        let mut pane = StaticPane::new(at, 1, 1).unwrap();
        pane.add_item(item(id), loc(0, 0)).unwrap();
        pane.into()
    }

    #[test]
    fn set_page_validates_range_and_keeps_state_on_error() {
        let mut pane = PaginatedPane::new(loc(0, 0), 9, 6, 3).unwrap();
        for page in 0..3 {
            assert!(pane.set_page(page).is_ok());
            assert_eq!(pane.page(), page);
        }
        assert_eq!(
            pane.set_page(3),
            Err(PaneError::PageOutOfRange {
                page: 3,
                page_count: 3
            })
        );
        assert_eq!(pane.page(), 2);
        assert!(pane.add_pane(5, single("stone", loc(0, 0))).is_err());
    }

    #[test]
    fn display_renders_only_the_current_page() {
        let mut pane = PaginatedPane::new(loc(0, 0), 9, 6, 2).unwrap();
        pane.add_pane(0, single("stone", loc(0, 0))).unwrap();
        pane.add_pane(1, single("dirt", loc(4, 3))).unwrap();

        let mut grid = InventoryGrid::new();
        pane.display(&mut grid);
        assert_eq!(grid.occupied_slots(), vec![0]);

        pane.set_page(1).unwrap();
        let mut grid = InventoryGrid::new();
        pane.display(&mut grid);
        assert_eq!(grid.occupied_slots(), vec![31]);
        assert!(grid.item(0).is_none());
    }

    #[test]
    fn click_inside_inclusive_bounds_is_rejected_without_callbacks() {
        let hits = Rc::new(Cell::new(0));
        let mut pane = PaginatedPane::new(loc(1, 1), 3, 2, 1).unwrap();
        let h = hits.clone();
        pane.set_on_click(Some(ClickAction::new("pane", move |_| {
            h.set(h.get() + 1);
            Ok(())
        })));
        let mut event = ClickEvent::at(2, 2).unwrap();
        assert!(!pane.click(&mut event));
        // the border column/row also counts as inside
        let mut border = ClickEvent::at(4, 3).unwrap();
        assert!(!pane.click(&mut border));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn click_outside_bounds_fires_on_click_and_queries_children() {
        let hits = Rc::new(Cell::new(0));
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut pane = PaginatedPane::new(loc(1, 1), 3, 2, 1).unwrap();
        let h = hits.clone();
        pane.set_on_click(Some(ClickAction::new("pane", move |_| {
            h.set(h.get() + 1);
            Ok(())
        })));
        for name in ["a", "b"] {
            let mut child = StaticPane::new(loc(0, 0), 9, 6).unwrap();
            let o = order.clone();
            child.set_on_click(Some(ClickAction::new(name, move |_| {
                o.borrow_mut().push(name);
                Ok(())
            })));
            pane.add_pane(0, child.into()).unwrap();
        }
        let mut event = ClickEvent::at(5, 5).unwrap();
        assert!(!pane.click(&mut event));
        assert_eq!(hits.get(), 1);
        assert_eq!(*order.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn click_result_is_or_of_all_children_without_short_circuit() {
        let queried = Rc::new(Cell::new(0));
        let mut pane = PaginatedPane::new(loc(0, 0), 1, 1, 1).unwrap();
        // children cover the whole grid; only the last has an item under the cursor
        for consume in [true, false, true] {
            let mut child = StaticPane::new(loc(0, 0), 9, 6).unwrap();
            let q = queried.clone();
            child.set_on_click(Some(ClickAction::new("count", move |_| {
                q.set(q.get() + 1);
                Ok(())
            })));
            if consume {
                child.add_item(item("stone"), loc(8, 5)).unwrap();
            }
            pane.add_pane(0, child.into()).unwrap();
        }
        let mut event = ClickEvent::at(8, 5).unwrap();
        assert!(pane.click(&mut event));
        assert_eq!(queried.get(), 3);

        // only the last child consumes
        let mut last_only = PaginatedPane::new(loc(0, 0), 1, 1, 1).unwrap();
        let queried = Rc::new(Cell::new(0));
        for consume in [false, false, true] {
            let mut child = StaticPane::new(loc(0, 0), 9, 6).unwrap();
            let q = queried.clone();
            child.set_on_click(Some(ClickAction::new("count", move |_| {
                q.set(q.get() + 1);
                Ok(())
            })));
            if consume {
                child.add_item(item("stone"), loc(8, 5)).unwrap();
            }
            last_only.add_pane(0, child.into()).unwrap();
        }
        assert!(last_only.click(&mut ClickEvent::at(8, 5).unwrap()));
        assert_eq!(queried.get(), 3);
    }

    #[test]
    fn strict_containment_routes_interior_clicks() {
        let mut pane = PaginatedPane::new(loc(0, 0), 2, 2, 1).unwrap();
        pane.set_containment(Containment::Strict);
        pane.add_pane(0, single("stone", loc(1, 1))).unwrap();
        assert!(pane.click(&mut ClickEvent::at(1, 1).unwrap()));
        assert!(!pane.click(&mut ClickEvent::at(5, 5).unwrap()));
    }

    #[test]
    fn find_item_searches_pages_in_order() {
        let mut pane = PaginatedPane::new(loc(0, 0), 9, 6, 2).unwrap();
        let mut second = StaticPane::new(loc(0, 0), 1, 1).unwrap();
        second.add_item(item("dirt").with_tag("shared"), loc(0, 0)).unwrap();
        let mut first = StaticPane::new(loc(0, 0), 1, 1).unwrap();
        first.add_item(item("stone").with_tag("shared"), loc(0, 0)).unwrap();
        pane.add_pane(1, second.into()).unwrap();
        pane.add_pane(0, first.into()).unwrap();
        pane.set_page(1).unwrap();
        assert_eq!(
            pane.find_item("shared").unwrap().stack().material().as_str(),
            "STONE"
        );
        assert!(pane.find_item_mut("shared").is_some());
        assert!(pane.find_item("missing").is_none());
    }

    #[test]
    fn zero_pages_is_inert() {
        let mut pane = PaginatedPane::new(loc(0, 0), 1, 1, 0).unwrap();
        assert!(pane.set_page(0).is_err());
        let mut grid = InventoryGrid::new();
        pane.display(&mut grid);
        assert!(grid.occupied_slots().is_empty());
        assert!(!pane.click(&mut ClickEvent::at(5, 5).unwrap()));
    }

    const BOOK: &str = r#"
        <paginatedpane x="0" y="0" length="9" height="5" tag="book" onClick="pageClick">
          <page>
            <staticpane x="0" y="0" length="1" height="1">
              <item x="0" y="0" id="paper" tag="first"/>
            </staticpane>
          </page>
          <page>
            <staticpane x="0" y="0" length="1" height="1" tag="second-page"/>
            <staticpane x="4" y="2" length="1" height="1">
              <item x="0" y="0" id="book" tag="second"/>
            </staticpane>
          </page>
        </paginatedpane>"#;

    #[test]
    fn load_builds_declared_pages_in_document_order() {
        let mut binding = Binding::new();
        binding.on_event("pageClick", |_| Ok(()));
        let pane = PaginatedPane::load(
            &MarkupLoader::new(&binding),
            &Element::parse(BOOK).unwrap(),
        )
        .unwrap();
        assert_eq!(pane.page_count(), 2);
        assert_eq!(pane.page(), 0);
        assert_eq!(pane.panes(0).unwrap().len(), 1);
        assert_eq!(pane.panes(1).unwrap().len(), 2);
        assert_eq!(pane.find_pane("second-page").map(PaneNode::kind), Some("staticpane"));
        assert_eq!(pane.base().on_click().map(ClickAction::name), Some("pageClick"));
        assert!(pane.find_item("second").is_some());
        assert_eq!(pane.containment(), Containment::Legacy);
    }

    #[test]
    fn load_applies_configured_containment() {
        let binding = Binding::new();
        let loader = MarkupLoader::new(&binding)
            .with_options(LoadOptions::default().with_containment(Containment::Strict));
        let pane = PaginatedPane::load(&loader, &Element::parse(BOOK).unwrap()).unwrap();
        assert_eq!(pane.containment(), Containment::Strict);
    }

    #[test]
    fn populate_hook_replaces_declared_contents() {
        let mut binding = Binding::new();
        binding.on_populate("fill", |pane| {
            let mut generated = StaticPane::new(GridLocation::ORIGIN, 1, 1)?;
            generated.set_tag(Some("generated".into()));
            pane.add_pane(1, generated.into())?;
            Ok(())
        });
        let markup = BOOK.replace("onClick=\"pageClick\"", "populate=\"fill\"");
        let pane = PaginatedPane::load(
            &MarkupLoader::new(&binding),
            &Element::parse(&markup).unwrap(),
        )
        .unwrap();
        assert_eq!(pane.page_count(), 2);
        assert!(pane.panes(0).unwrap().is_empty());
        assert!(pane.find_pane("generated").is_some());
        assert!(pane.find_item("first").is_none());
    }

    #[test]
    fn failing_populate_hook_fails_the_load() {
        let mut binding = Binding::new();
        binding.on_populate("fill", |_| Err(CallbackError::msg("database offline")));
        let markup = BOOK.replace("onClick=\"pageClick\"", "populate=\"fill\"");
        let result = PaginatedPane::load(
            &MarkupLoader::new(&binding),
            &Element::parse(&markup).unwrap(),
        );
        assert!(matches!(result, Err(LoadError::Populate { name, .. }) if name == "fill"));
    }

    #[test]
    fn unresolved_populate_still_skips_declared_pages() {
        let binding = Binding::new();
        let markup = BOOK.replace("onClick=\"pageClick\"", "populate=\"missing\"");
        let element = Element::parse(&markup).unwrap();
        let pane = PaginatedPane::load(&MarkupLoader::new(&binding), &element).unwrap();
        assert!(pane.find_item("first").is_none());

        let strict = MarkupLoader::new(&binding)
            .with_options(LoadOptions::default().with_strict_callbacks(true));
        assert!(matches!(
            PaginatedPane::load(&strict, &element),
            Err(LoadError::UnresolvedCallback { attribute: "populate", .. })
        ));
    }

    #[test]
    fn a_failing_child_fails_the_whole_pane() {
        let binding = Binding::new();
        let markup = BOOK.replace("id=\"book\"", "id=\"not-a-thing\"");
        assert!(matches!(
            PaginatedPane::load(&MarkupLoader::new(&binding), &Element::parse(&markup).unwrap()),
            Err(LoadError::UnknownItemType(_))
        ));
    }
}
