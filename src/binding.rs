//! Host bindings: named operations the markup can refer to.
//!
//! A `Binding` is built once by the host application before loading markup.
//! Every operation is registered under a symbolic name together with the
//! shape of arguments it accepts, so resolving an `onClick="name"` attribute
//! is a lookup over this table rather than runtime introspection. Several
//! operations may share a name; they are kept in registration order and the
//! resolver uses that order to break ties between equally good matches.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::event::ClickEvent;
use crate::layout::GridError;
use crate::pane::{PaginatedPane, PaneError};
use crate::property::{PropertyKind, PropertyValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Pane(#[from] PaneError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl CallbackError {
    pub fn msg(message: impl Into<String>) -> Self {
        CallbackError::Failed(message.into())
    }
}

pub type HandlerResult = Result<(), CallbackError>;

type ActionFn = dyn Fn() -> HandlerResult;
type EventFn = dyn Fn(&mut ClickEvent) -> HandlerResult;
type EventArgsFn = dyn Fn(&mut ClickEvent, &[PropertyValue]) -> HandlerResult;
type PopulateFn = dyn Fn(&mut PaginatedPane) -> HandlerResult;

#[derive(Clone)]
pub(crate) enum Handler {
    Action(Rc<ActionFn>),
    Event(Rc<EventFn>),
    EventWithArgs(Vec<PropertyKind>, Rc<EventArgsFn>),
    Populate(Rc<PopulateFn>),
}

/// Argument shape of a registered operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationShape {
    /// No arguments.
    Action,
    /// The click event only.
    Event,
    /// The click event followed by typed extra arguments.
    EventWith(Vec<PropertyKind>),
    /// The paginated pane being loaded.
    Populate,
}

#[derive(Clone)]
pub struct Operation {
    name: String,
    handler: Handler,
}

impl Operation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> OperationShape {
        match &self.handler {
            Handler::Action(_) => OperationShape::Action,
            Handler::Event(_) => OperationShape::Event,
            Handler::EventWithArgs(params, _) => OperationShape::EventWith(params.clone()),
            Handler::Populate(_) => OperationShape::Populate,
        }
    }

    pub(crate) fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("shape", &self.shape())
            .finish()
    }
}

#[derive(Clone, Default, Debug)]
pub struct Binding {
    operations: Vec<Operation>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: &str, handler: Handler) -> &mut Self {
        self.operations.push(Operation {
            name: name.to_string(),
            handler,
        });
        self
    }

    /// Register an operation that takes no arguments.
    pub fn on_action<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn() -> HandlerResult + 'static,
    {
        self.push(name, Handler::Action(Rc::new(f)))
    }

    /// Register an operation that receives the click event.
    pub fn on_event<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&mut ClickEvent) -> HandlerResult + 'static,
    {
        self.push(name, Handler::Event(Rc::new(f)))
    }

    /// Register an operation that receives the click event followed by one
    /// argument per declared parameter kind, in order.
    pub fn on_event_with<F>(&mut self, name: &str, params: &[PropertyKind], f: F) -> &mut Self
    where
        F: Fn(&mut ClickEvent, &[PropertyValue]) -> HandlerResult + 'static,
    {
        self.push(name, Handler::EventWithArgs(params.to_vec(), Rc::new(f)))
    }

    /// Register a populate hook for paginated panes.
    pub fn on_populate<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&mut PaginatedPane) -> HandlerResult + 'static,
    {
        self.push(name, Handler::Populate(Rc::new(f)))
    }

    /// Operations registered under exactly `name`, in registration order.
    pub fn operations_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Operation> {
        self.operations.iter().filter(move |op| op.name == name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// A resolved click callback.
///
/// Invoking it never fails from the caller's point of view: a handler error
/// is logged and the click counts as handled.
#[derive(Clone)]
pub struct ClickAction {
    name: Rc<str>,
    call: Rc<EventFn>,
}

impl ClickAction {
    pub fn new<F>(name: &str, f: F) -> Self
    where
        F: Fn(&mut ClickEvent) -> HandlerResult + 'static,
    {
        Self {
            name: Rc::from(name),
            call: Rc::new(f),
        }
    }

    pub(crate) fn from_rc(name: &str, call: Rc<EventFn>) -> Self {
        Self {
            name: Rc::from(name),
            call,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, event: &mut ClickEvent) {
        if let Err(err) = (self.call)(event) {
            tracing::warn!(
                callback = %self.name,
                slot = event.slot(),
                error = %err,
                "click handler failed"
            );
        }
    }
}

impl fmt::Debug for ClickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClickAction").field(&self.name).finish()
    }
}

/// A resolved populate hook.
#[derive(Clone)]
pub struct PopulateHook {
    name: Rc<str>,
    call: Rc<PopulateFn>,
}

impl PopulateHook {
    pub(crate) fn from_rc(name: &str, call: Rc<PopulateFn>) -> Self {
        Self {
            name: Rc::from(name),
            call,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, pane: &mut PaginatedPane) -> HandlerResult {
        (self.call)(pane)
    }
}

impl fmt::Debug for PopulateHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PopulateHook").field(&self.name).finish()
    }
}
