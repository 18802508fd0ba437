//! Declarative composition of click-driven 9x6 slot grids.
//!
//! Panes are rectangular regions of the grid. They are built in code or
//! loaded from markup, where `onClick` and `populate` attributes name
//! operations registered on a host [`Binding`].
//!
//! ```no_run
//! use gridpane::{Binding, Gui, LoadOptions};
//!
//! let mut binding = Binding::new();
//! binding.on_event("close", |event| {
//!     event.set_cancelled(true);
//!     Ok(())
//! });
//! let gui = Gui::load(
//!     r#"<gui title="Menu" rows="1">
//!          <staticpane x="0" y="0" length="9" height="1">
//!            <item x="8" y="0" id="barrier" onClick="close"/>
//!          </staticpane>
//!        </gui>"#,
//!     &binding,
//!     LoadOptions::default(),
//! )?;
//! print!("{}", gui.render());
//! # Ok::<(), gridpane::LoadError>(())
//! ```

pub mod binding;
pub mod config;
pub mod constants;
pub mod event;
pub mod gui;
pub mod item;
pub mod keybindings;
pub mod layout;
pub mod loader;
pub mod markup;
pub mod pane;
pub mod property;
pub mod resolver;
pub mod surface;
pub mod tracing_sub;
pub mod ui;

pub use binding::{Binding, CallbackError, ClickAction, HandlerResult};
pub use config::{ErrorPolicy, LoadOptions};
pub use event::{ClickButton, ClickEvent};
pub use gui::Gui;
pub use item::{BoundItem, ItemStack, Material, MaterialRegistry};
pub use layout::{Containment, GridError, GridLocation};
pub use loader::{LoadError, MarkupLoader, PaneRegistry};
pub use pane::{PaginatedPane, Pane, PaneError, PaneNode, StaticPane};
pub use property::{PropertyKind, PropertyValue};
pub use surface::{InventoryGrid, Surface};
