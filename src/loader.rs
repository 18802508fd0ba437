//! Builds panes and bound items from markup elements.
//!
//! Every loader returns a `Result`; a failure anywhere inside a pane's
//! subtree fails that whole pane. Whether a failed root pane aborts the load
//! or is skipped is decided by [`ErrorPolicy`] at the top level (see
//! [`crate::gui::Gui::load`]).
//!
//! [`ErrorPolicy`]: crate::config::ErrorPolicy

use std::collections::BTreeMap;
use std::io;
use std::str::FromStr;

use thiserror::Error;

use crate::binding::{Binding, CallbackError, ClickAction};
use crate::config::LoadOptions;
use crate::constants::LORE_SEPARATOR;
use crate::item::{BoundItem, ItemStack, MaterialRegistry};
use crate::layout::{GridError, GridLocation};
use crate::markup::{Element, MarkupError};
use crate::pane::{PaginatedPane, Pane, PaneError, PaneNode, StaticPane};
use crate::property::{PropertyError, PropertyValue};
use crate::resolver::{CallbackResolver, Signatures};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error("failed to read markup: {0}")]
    Io(#[from] io::Error),
    #[error("expected root element <{expected}>, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },
    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    #[error("<{element}> attribute `{attribute}`: `{value}` is not a valid number")]
    InvalidNumber {
        element: String,
        attribute: &'static str,
        value: String,
    },
    #[error("unknown item type `{0}`")]
    UnknownItemType(String),
    #[error("unknown pane element <{element}>, expected one of: {known}")]
    UnknownPane { element: String, known: String },
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Pane(#[from] PaneError),
    #[error("<{element}> {attribute}=\"{name}\" does not match any registered operation")]
    UnresolvedCallback {
        element: String,
        attribute: &'static str,
        name: String,
    },
    #[error("populate hook `{name}` failed: {source}")]
    Populate {
        name: String,
        #[source]
        source: CallbackError,
    },
}

/// Builds one kind of pane from its element.
pub type PaneLoaderFn = fn(&MarkupLoader<'_>, &Element) -> Result<PaneNode, LoadError>;

/// Maps pane element names to the function that loads them.
#[derive(Clone)]
pub struct PaneRegistry {
    loaders: BTreeMap<String, PaneLoaderFn>,
}

impl PaneRegistry {
    pub fn empty() -> Self {
        Self {
            loaders: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, element: &str, loader: PaneLoaderFn) -> &mut Self {
        self.loaders.insert(element.to_string(), loader);
        self
    }

    pub fn get(&self, element: &str) -> Option<PaneLoaderFn> {
        self.loaders.get(element).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }
}

impl Default for PaneRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("staticpane", |loader, element| {
                StaticPane::load(loader, element).map(PaneNode::from)
            })
            .register("paginatedpane", |loader, element| {
                PaginatedPane::load(loader, element).map(PaneNode::from)
            });
        registry
    }
}

pub struct MarkupLoader<'a> {
    binding: &'a Binding,
    materials: MaterialRegistry,
    panes: PaneRegistry,
    options: LoadOptions,
}

impl<'a> MarkupLoader<'a> {
    pub fn new(binding: &'a Binding) -> Self {
        Self {
            binding,
            materials: MaterialRegistry::default(),
            panes: PaneRegistry::default(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_materials(mut self, materials: MaterialRegistry) -> Self {
        self.materials = materials;
        self
    }

    pub fn with_pane_registry(mut self, panes: PaneRegistry) -> Self {
        self.panes = panes;
        self
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn binding(&self) -> &Binding {
        self.binding
    }

    pub fn resolver(&self) -> CallbackResolver<'a> {
        CallbackResolver::new(self.binding)
    }

    /// Load any registered pane, dispatching on the element name.
    pub fn load_pane(&self, element: &Element) -> Result<PaneNode, LoadError> {
        let loader = self
            .panes
            .get(element.name())
            .ok_or_else(|| LoadError::UnknownPane {
                element: element.name().to_string(),
                known: self.panes.names().collect::<Vec<_>>().join(", "),
            })?;
        let pane = loader(self, element)?;
        tracing::debug!(
            element = element.name(),
            tag = pane.tag().unwrap_or(""),
            "loaded pane"
        );
        Ok(pane)
    }

    /// Load one bound item from an `<item>` element.
    pub fn load_item(&self, element: &Element) -> Result<BoundItem, LoadError> {
        let id = required(element, "id")?;
        let material = self
            .materials
            .resolve(id)
            .ok_or_else(|| LoadError::UnknownItemType(id.to_string()))?;

        let mut stack = ItemStack::new(material);
        if let Some(amount) = element.attr("amount") {
            stack = stack.with_amount(parse_number(element, "amount", amount)?);
        }
        if let Some(damage) = element.attr("damage") {
            stack = stack.with_damage(parse_number(element, "damage", damage)?);
        }
        if let Some(name) = element.attr("displayName") {
            stack = stack.with_display_name(name);
        }
        if let Some(lores) = element.attr("lores") {
            let lore = lores
                .split(LORE_SEPARATOR)
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();
            stack = stack.with_lore(lore);
        }

        let mut item = BoundItem::new(stack);
        if let Some(tag) = element.attr("tag") {
            item.set_tag(Some(tag.to_string()));
        }

        let properties = self.load_properties(element)?;
        let action = self.click_action(element, &properties, Signatures::WithProperties)?;
        item.set_action(action);
        Ok(item)
    }

    /// Values of every `<properties><property>` child, in document order.
    pub fn load_properties(&self, element: &Element) -> Result<Vec<PropertyValue>, LoadError> {
        let mut values = Vec::new();
        for block in element.children_named("properties") {
            for property in block.children_named("property") {
                let type_name = property.attr("type").unwrap_or("string");
                values.push(PropertyValue::parse(type_name, property.raw_text())?);
            }
        }
        Ok(values)
    }

    /// Origin and size attributes shared by every pane element.
    pub fn pane_geometry(&self, element: &Element) -> Result<(GridLocation, i32, i32), LoadError> {
        let x = required_number(element, "x")?;
        let y = required_number(element, "y")?;
        let length = required_number(element, "length")?;
        let height = required_number(element, "height")?;
        Ok((GridLocation::new(x, y)?, length, height))
    }

    /// Apply `tag`, `visible` and a pane level `onClick`.
    pub fn apply_pane_attributes(
        &self,
        pane: &mut dyn Pane,
        element: &Element,
    ) -> Result<(), LoadError> {
        if let Some(tag) = element.attr("tag") {
            pane.set_tag(Some(tag.to_string()));
        }
        if let Some(visible) = element.attr("visible") {
            pane.set_visible(parse_bool(visible));
        }
        let action = self.click_action(element, &[], Signatures::EventOnly)?;
        pane.set_on_click(action);
        Ok(())
    }

    fn click_action(
        &self,
        element: &Element,
        properties: &[PropertyValue],
        accepted: Signatures,
    ) -> Result<Option<ClickAction>, LoadError> {
        let Some(name) = element.attr("onClick") else {
            return Ok(None);
        };
        let action = self.resolver().resolve_click(name, properties, accepted);
        if action.is_none() {
            self.unresolved(element, "onClick", name)?;
        }
        Ok(action)
    }

    /// Report a callback name that matched nothing: an error in strict mode,
    /// otherwise a warning.
    pub(crate) fn unresolved(
        &self,
        element: &Element,
        attribute: &'static str,
        name: &str,
    ) -> Result<(), LoadError> {
        if self.options.strict_callbacks {
            return Err(LoadError::UnresolvedCallback {
                element: element.name().to_string(),
                attribute,
                name: name.to_string(),
            });
        }
        tracing::warn!(
            element = element.name(),
            attribute,
            callback = name,
            "callback not found, loading without it"
        );
        Ok(())
    }
}

pub(crate) fn required<'e>(
    element: &'e Element,
    attribute: &'static str,
) -> Result<&'e str, LoadError> {
    element
        .attr(attribute)
        .ok_or_else(|| LoadError::MissingAttribute {
            element: element.name().to_string(),
            attribute,
        })
}

pub(crate) fn required_number<T: FromStr>(
    element: &Element,
    attribute: &'static str,
) -> Result<T, LoadError> {
    parse_number(element, attribute, required(element, attribute)?)
}

pub(crate) fn parse_number<T: FromStr>(
    element: &Element,
    attribute: &'static str,
    value: &str,
) -> Result<T, LoadError> {
    value.trim().parse().map_err(|_| LoadError::InvalidNumber {
        element: element.name().to_string(),
        attribute,
        value: value.to_string(),
    })
}

/// `true` in any letter case is true, anything else is false.
pub(crate) fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
