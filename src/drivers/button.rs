//! Momentary push button with hold detection.
//!
//! ## Gestures
//!
//! | Input                        | Events published   |
//! |------------------------------|--------------------|
//! | Contact closes               | `Down`, `Press`    |
//! | Contact opens                | `Up`, `Release`    |
//! | Held for [`HOLD_MS`]         | `Hold` (once)      |
//!
//! The state payload always holds the most recent event. `reset()`
//! returns it to the neutral `n/a` without publishing.

use core::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::{Board, InputChannel};
use crate::component::{report, Binding, Component, ComponentState, Operation};
use crate::error::BoardError;
use crate::pins::PinId;
use crate::registry::EventRegistry;

/// Time the contact must stay closed before `Hold` fires.
pub const HOLD_MS: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonState {
    Hold,
    Down,
    Press,
    Up,
    Release,
    #[serde(rename = "n/a")]
    NotAvailable,
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Hold => "hold",
            Self::Down => "down",
            Self::Press => "press",
            Self::Up => "up",
            Self::Release => "release",
            Self::NotAvailable => "n/a",
        };
        f.write_str(s)
    }
}

/// Contact tracking between polls.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Contact {
    Open,
    Closed { held_ms: f32, hold_reported: bool },
}

pub struct Button {
    state: ComponentState<ButtonState>,
    pin: PinId,
    input: Binding<Box<dyn InputChannel>>,
    contact: Contact,
    events: EventRegistry<ButtonState, ComponentState<ButtonState>>,
}

impl Button {
    pub fn new(id: &str, name: &str, pin: PinId) -> Self {
        let state = ComponentState::new(id, name, "button", ButtonState::Hold).with_operations(vec![
            Operation::new("Press", format!("/buttons/{id}/press")),
            Operation::new("Reset", format!("/buttons/{id}/reset")),
        ]);
        Self {
            state,
            pin,
            input: Binding::Unbound,
            contact: Contact::Open,
            events: EventRegistry::new(),
        }
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn current(&self) -> ButtonState {
        self.state.payload
    }

    /// Subscribe to a gesture. Subscribers accumulate.
    pub fn on(
        &mut self,
        event: ButtonState,
        callback: impl FnMut(&ComponentState<ButtonState>) + 'static,
    ) {
        self.events.subscribe(event, callback);
    }

    /// Software press, as if a visitor pushed the button.
    pub fn press(&mut self) {
        self.emit(ButtonState::Press);
    }

    /// Back to the neutral state.
    pub fn reset(&mut self) {
        self.state.payload = ButtonState::NotAvailable;
    }

    /// Feed a contact level (interrupt-style drivers).
    pub fn apply(&mut self, closed: bool) {
        match (self.contact, closed) {
            (Contact::Open, true) => {
                self.contact = Contact::Closed {
                    held_ms: 0.0,
                    hold_reported: false,
                };
                self.emit(ButtonState::Down);
                self.emit(ButtonState::Press);
            }
            (Contact::Closed { .. }, false) => {
                self.contact = Contact::Open;
                self.emit(ButtonState::Up);
                self.emit(ButtonState::Release);
            }
            _ => {}
        }
    }

    /// Poll the bound input and run hold detection.
    pub fn advance(&mut self, elapsed_ms: f32) {
        if self.input.is_bound() {
            match self.input.with(&self.state.id, |input| input.is_closed()) {
                Ok(closed) => self.apply(closed),
                Err(e) => report(Err(e), "read button"),
            }
        }

        if let Contact::Closed { held_ms, hold_reported: false } = self.contact {
            let held_ms = held_ms + elapsed_ms;
            let reached = held_ms >= HOLD_MS;
            self.contact = Contact::Closed {
                held_ms,
                hold_reported: reached,
            };
            if reached {
                self.emit(ButtonState::Hold);
            }
        }
    }

    fn emit(&mut self, event: ButtonState) {
        info!("Button event : {event}");
        self.state.payload = event;
        let snapshot = self.state.clone();
        self.events.publish(event, &snapshot);
    }
}

impl Component for Button {
    type Payload = ButtonState;

    fn id(&self) -> &str {
        &self.state.id
    }

    fn state(&self) -> ComponentState<ButtonState> {
        self.state.clone()
    }

    fn bind(&mut self, board: &mut dyn Board) -> Result<(), BoardError> {
        self.input = Binding::Bound(board.bind_digital_input(self.pin)?);
        info!("Initialized button.");
        Ok(())
    }

    fn unbind(&mut self) {
        self.input = Binding::Unbound;
    }

    fn is_bound(&self) -> bool {
        self.input.is_bound()
    }
}
