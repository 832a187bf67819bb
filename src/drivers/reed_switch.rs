//! Magnetic reed switch on a digital input.
//!
//! The switch reports edges, not levels: [`ReedSwitch::poll`] reads the
//! bound input and returns `Some(state)` only when the level changed
//! since the last observation. Interrupt-driven boards feed levels in
//! through [`ReedSwitch::apply`] instead.

use core::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::{Board, InputChannel};
use crate::component::{report, Binding, Component, ComponentState};
use crate::error::BoardError;
use crate::pins::PinId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchState {
    #[serde(rename = "open")]
    Open,
    /// Magnet present.
    #[serde(rename = "close")]
    Closed,
}

impl SwitchState {
    pub fn from_closed(closed: bool) -> Self {
        if closed { Self::Closed } else { Self::Open }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "close"),
        }
    }
}

pub struct ReedSwitch {
    state: ComponentState<SwitchState>,
    pin: PinId,
    input: Binding<Box<dyn InputChannel>>,
}

impl ReedSwitch {
    pub fn new(id: &str, name: &str, pin: PinId) -> Self {
        Self {
            state: ComponentState::new(id, name, "reed-switch", SwitchState::Open),
            pin,
            input: Binding::Unbound,
        }
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn current(&self) -> SwitchState {
        self.state.payload
    }

    /// Record a new level. Returns the edge, if the level changed.
    pub fn apply(&mut self, level: SwitchState) -> Option<SwitchState> {
        if self.state.payload == level {
            return None;
        }
        self.state.payload = level;
        Some(level)
    }

    /// Sample the bound input. Unbound switches never report edges.
    pub fn poll(&mut self) -> Option<SwitchState> {
        if !self.input.is_bound() {
            return None;
        }
        match self.input.with(&self.state.id, |input| input.is_closed()) {
            Ok(closed) => self.apply(SwitchState::from_closed(closed)),
            Err(e) => {
                report(Err(e), "read reed switch");
                None
            }
        }
    }
}

impl Component for ReedSwitch {
    type Payload = SwitchState;

    fn id(&self) -> &str {
        &self.state.id
    }

    fn state(&self) -> ComponentState<SwitchState> {
        self.state.clone()
    }

    fn bind(&mut self, board: &mut dyn Board) -> Result<(), BoardError> {
        self.input = Binding::Bound(board.bind_digital_input(self.pin)?);
        info!("Initialized reed switch {} on {}.", self.state.id, self.pin);
        Ok(())
    }

    fn unbind(&mut self) {
        self.input = Binding::Unbound;
    }

    fn is_bound(&self) -> bool {
        self.input.is_bound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_changes_are_edges() {
        let mut sw = ReedSwitch::new("bone-1-reed-switch", "Reed Switch for Bone #1", PinId(30));
        assert_eq!(sw.current(), SwitchState::Open);
        assert_eq!(sw.apply(SwitchState::Open), None);
        assert_eq!(sw.apply(SwitchState::Closed), Some(SwitchState::Closed));
        assert_eq!(sw.apply(SwitchState::Closed), None);
        assert_eq!(sw.apply(SwitchState::Open), Some(SwitchState::Open));
    }

    #[test]
    fn unbound_switch_polls_nothing() {
        let mut sw = ReedSwitch::new("s", "S", PinId(30));
        assert_eq!(sw.poll(), None);
    }

    #[test]
    fn close_serializes_as_close() {
        assert_eq!(serde_json::to_value(SwitchState::Closed).unwrap(), "close");
        assert_eq!(SwitchState::Closed.to_string(), "close");
    }
}
