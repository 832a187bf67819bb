//! Single-colour indicator LED on a digital output.
//!
//! ## Dual-target design
//!
//! Bound: drives the board's GPIO.
//! Unbound: tracks state in-memory only; the failed write is logged.

use core::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::{Board, DigitalChannel};
use crate::component::{report, Binding, Component, ComponentState};
use crate::error::BoardError;
use crate::pins::PinId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedState {
    On,
    Off,
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

pub struct Led {
    state: ComponentState<LedState>,
    pin: PinId,
    channel: Binding<Box<dyn DigitalChannel>>,
}

impl Led {
    pub fn new(id: &str, name: &str, pin: PinId) -> Self {
        Self {
            state: ComponentState::new(id, name, "led", LedState::Off),
            pin,
            channel: Binding::Unbound,
        }
    }

    pub fn turn_on(&mut self) {
        self.set(LedState::On);
    }

    pub fn turn_off(&mut self) {
        self.set(LedState::Off);
    }

    pub fn is_on(&self) -> bool {
        self.state.payload == LedState::On
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    fn set(&mut self, level: LedState) {
        self.state.payload = level;
        let result = self
            .channel
            .with(&self.state.id, |ch| ch.set(level == LedState::On));
        report(result, "switch LED");
    }
}

impl Component for Led {
    type Payload = LedState;

    fn id(&self) -> &str {
        &self.state.id
    }

    fn state(&self) -> ComponentState<LedState> {
        self.state.clone()
    }

    fn bind(&mut self, board: &mut dyn Board) -> Result<(), BoardError> {
        self.channel = Binding::Bound(board.bind_digital_output(self.pin)?);
        info!("Initialized LED {} on {}.", self.state.id, self.pin);
        Ok(())
    }

    fn unbind(&mut self) {
        self.channel = Binding::Unbound;
    }

    fn is_bound(&self) -> bool {
        self.channel.is_bound()
    }
}
