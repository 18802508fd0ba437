//! Resolution of symbolic callback names against a [`Binding`].

use std::rc::Rc;

use crate::binding::{Binding, ClickAction, Handler, Operation, PopulateHook};
use crate::property::PropertyValue;

/// Which argument shapes a call site accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signatures {
    /// Zero arguments, the event, or the event followed by the item's
    /// properties. Used for item `onClick`.
    WithProperties,
    /// Zero arguments or the event. Used for pane level `onClick`.
    EventOnly,
}

pub struct CallbackResolver<'a> {
    binding: &'a Binding,
}

impl<'a> CallbackResolver<'a> {
    pub fn new(binding: &'a Binding) -> Self {
        Self { binding }
    }

    /// Resolve `name` into a click action.
    ///
    /// Among the operations registered under `name`, the one taking the most
    /// of the available arguments wins (event plus properties, then event,
    /// then nothing). Equal candidates are decided by registration order.
    /// Returns `None` when nothing matches.
    pub fn resolve_click(
        &self,
        name: &str,
        properties: &[PropertyValue],
        accepted: Signatures,
    ) -> Option<ClickAction> {
        let mut best: Option<(u8, &Operation)> = None;
        for op in self.binding.operations_named(name) {
            let Some(rank) = rank(op.handler(), properties, accepted) else {
                continue;
            };
            if best.is_none_or(|(current, _)| rank > current) {
                best = Some((rank, op));
            }
        }
        let (_, op) = best?;
        tracing::debug!(callback = name, shape = ?op.shape(), "resolved click handler");
        let action = match op.handler() {
            Handler::Action(f) => {
                let f = Rc::clone(f);
                ClickAction::new(name, move |_| f())
            }
            Handler::Event(f) => ClickAction::from_rc(name, Rc::clone(f)),
            Handler::EventWithArgs(_, f) => {
                let f = Rc::clone(f);
                let args: Rc<[PropertyValue]> = properties.into();
                ClickAction::new(name, move |event| f(event, &args[..]))
            }
            Handler::Populate(_) => return None,
        };
        Some(action)
    }

    /// Resolve `name` into a populate hook; the first registered hook wins.
    pub fn resolve_populate(&self, name: &str) -> Option<PopulateHook> {
        self.binding
            .operations_named(name)
            .find_map(|op| match op.handler() {
                Handler::Populate(f) => Some(PopulateHook::from_rc(name, Rc::clone(f))),
                _ => None,
            })
    }
}

fn rank(handler: &Handler, properties: &[PropertyValue], accepted: Signatures) -> Option<u8> {
    match handler {
        Handler::Action(_) => Some(1),
        Handler::Event(_) => Some(2),
        Handler::EventWithArgs(params, _) if params.is_empty() => Some(2),
        Handler::EventWithArgs(params, _) => {
            if accepted != Signatures::WithProperties || params.len() != properties.len() {
                return None;
            }
            params
                .iter()
                .zip(properties)
                .all(|(kind, value)| value.kind() == *kind)
                .then_some(3)
        }
        Handler::Populate(_) => None,
    }
}
