//! Component state envelope and hardware binding state.
//!
//! Every physical or logical component (fixture, LED, reed switch,
//! button, bone) describes itself with a [`ComponentState`]: identity,
//! a typed payload, and the catalog of operations a caller may invoke.
//! Callers can introspect any component without knowing its concrete
//! type.
//!
//! Hardware attachment is two-phase: components are constructed
//! [`Binding::Unbound`] and become [`Binding::Bound`] in `bind(board)`.

use log::error;
use serde::{Deserialize, Serialize};

use crate::app::ports::Board;
use crate::error::{BoardError, ChannelError, Error, Result};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// One invokable operation in a component's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Display label, e.g. "Activate".
    pub name: String,
    /// Invocation key routed by [`Command::parse`](crate::app::commands::Command::parse).
    pub invoke: String,
}

impl Operation {
    pub fn new(name: &str, invoke: impl Into<String>) -> Self {
        Self {
            name: name.to_owned(),
            invoke: invoke.into(),
        }
    }
}

/// Identity + typed payload + operation catalog.
///
/// Serialized with the field names the installation's web UI expects
/// (`type`, `state`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentState<T> {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "state")]
    pub payload: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,
}

impl<T> ComponentState<T> {
    pub fn new(id: &str, name: &str, kind: &str, payload: T) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            kind: kind.to_owned(),
            payload,
            operations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_operations(mut self, operations: Vec<Operation>) -> Self {
        self.operations = operations;
        self
    }

    /// Same envelope, different payload. Used when a snapshot enriches
    /// the stored payload with child component states.
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> ComponentState<U> {
        ComponentState {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            payload: f(&self.payload),
            operations: self.operations.clone(),
        }
    }
}

/// Uniform view over every component.
pub trait Component {
    type Payload;

    /// Stable, globally unique id.
    fn id(&self) -> &str;

    /// Fresh snapshot of the envelope.
    fn state(&self) -> ComponentState<Self::Payload>;

    /// Second construction phase: attach board channels.
    fn bind(&mut self, board: &mut dyn Board) -> core::result::Result<(), BoardError>;

    /// Drop every bound channel. State stays in memory.
    fn unbind(&mut self);

    fn is_bound(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Binding state
// ---------------------------------------------------------------------------

/// Explicit bound / unbound state of a hardware channel.
pub enum Binding<C> {
    Unbound,
    Bound(C),
}

impl<C> Default for Binding<C> {
    fn default() -> Self {
        Self::Unbound
    }
}

impl<C> Binding<C> {
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }

    /// Run `f` against the bound channel, or fail with
    /// [`Error::BindingUnavailable`] naming `component`.
    pub fn with<R>(
        &mut self,
        component: &str,
        f: impl FnOnce(&mut C) -> core::result::Result<R, ChannelError>,
    ) -> Result<R> {
        match self {
            Self::Unbound => Err(Error::BindingUnavailable(component.to_owned())),
            Self::Bound(channel) => f(channel).map_err(Error::from),
        }
    }
}

/// Log a hardware-side failure without propagating it.
///
/// Component-level failures never reach the caller: the in-memory
/// state has already been updated and the installation keeps running
/// without hardware attached.
pub(crate) fn report(result: Result<()>, action: &str) {
    if let Err(e) = result {
        error!("Could not {action}: {e}");
    }
}
