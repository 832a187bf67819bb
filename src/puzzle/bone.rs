//! Bone puzzle unit: one red/green indicator pair and a reed switch.
//!
//! ## Lifecycle
//!
//! ```text
//!            activate()                 switch closes
//!  inactive ───────────▶ active/incomplete ─────────────▶ active/complete
//!     ▲                        │ red on                     │ green on
//!     └──── deactivate() ──────┴────────────────────────────┘ publish Complete
//! ```
//!
//! `deactivate()` turns both LEDs off but leaves the lifecycle alone,
//! so a completed bone reports `complete` until it is activated again.
//!
//! The bone listens to its switch only after the first `activate()`.
//! Earlier edges update the switch state and are otherwise ignored.

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::Board;
use crate::component::{Component, ComponentState, Operation};
use crate::drivers::led::{Led, LedState};
use crate::drivers::reed_switch::{ReedSwitch, SwitchState};
use crate::error::BoardError;
use crate::pins::PinId;
use crate::registry::EventRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Incomplete,
    Complete,
}

/// Events a bone publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneEvent {
    /// The visitor placed the peg while the bone was active.
    Complete,
}

/// Stored part of the bone's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneStatus {
    pub is_active: bool,
    #[serde(rename = "state")]
    pub lifecycle: Lifecycle,
}

/// Snapshot payload: the stored status plus the child components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneState {
    pub is_active: bool,
    #[serde(rename = "state")]
    pub lifecycle: Lifecycle,
    pub reed_switch: ComponentState<SwitchState>,
    pub green_led: ComponentState<LedState>,
    pub red_led: ComponentState<LedState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonePins {
    pub green: PinId,
    pub red: PinId,
    pub reed_switch: PinId,
}

pub struct Bone {
    status: ComponentState<BoneStatus>,
    green: Led,
    red: Led,
    reed_switch: ReedSwitch,
    /// Set on first activation; never cleared.
    listening: bool,
    events: EventRegistry<BoneEvent, ComponentState<BoneState>>,
}

impl Bone {
    pub fn new(id: &str, name: &str, pins: BonePins) -> Self {
        let status = ComponentState::new(
            id,
            name,
            "bone",
            BoneStatus {
                is_active: false,
                lifecycle: Lifecycle::Incomplete,
            },
        )
        .with_operations(vec![
            Operation::new("Activate", format!("/bones/{id}/activate")),
            Operation::new("Deactivate", format!("/bones/{id}/deactivate")),
            Operation::new("Red", format!("/bones/{id}/set-to-red")),
            Operation::new("Green", format!("/bones/{id}/set-to-green")),
        ]);

        info!("Initialized {name}");
        Self {
            status,
            green: Led::new(&format!("{id}-green-led"), &format!("Green LED for {name}"), pins.green),
            red: Led::new(&format!("{id}-red-led"), &format!("Red LED for {name}"), pins.red),
            reed_switch: ReedSwitch::new(
                &format!("{id}-reed-switch"),
                &format!("Reed Switch for {name}"),
                pins.reed_switch,
            ),
            listening: false,
            events: EventRegistry::new(),
        }
    }

    // ── Commands ──────────────────────────────────────────────

    /// Arm the bone: red on, lifecycle back to `incomplete`.
    pub fn activate(&mut self) {
        info!("Starting {}.", self.status.name);
        self.status.payload = BoneStatus {
            is_active: true,
            lifecycle: Lifecycle::Incomplete,
        };
        self.turn_red();
        if !self.listening {
            info!("Subscribing reed switch");
            self.listening = true;
        }
    }

    /// Disarm the bone and switch both LEDs off. Lifecycle is kept.
    pub fn deactivate(&mut self) {
        info!("Turning {} inactive.", self.status.name);
        self.status.payload.is_active = false;
        self.red.turn_off();
        self.green.turn_off();
    }

    pub fn make_inactive(&mut self) {
        self.deactivate();
    }

    pub fn turn_red(&mut self) {
        info!("Turning {} red.", self.status.name);
        self.green.turn_off();
        self.red.turn_on();
    }

    pub fn turn_green(&mut self) {
        info!("Turning {} green.", self.status.name);
        self.red.turn_off();
        self.green.turn_on();
    }

    /// Subscribe to a bone event. Subscribers accumulate and run in
    /// registration order.
    pub fn on(&mut self, event: BoneEvent, callback: impl FnMut(&ComponentState<BoneState>) + 'static) {
        self.events.subscribe(event, callback);
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Feed a switch level. Runs the close handler on a close edge.
    pub fn handle_switch(&mut self, level: SwitchState) {
        if let Some(edge) = self.reed_switch.apply(level) {
            self.on_switch_edge(edge);
        }
    }

    /// Sample the bound reed switch.
    pub fn poll(&mut self) {
        if let Some(edge) = self.reed_switch.poll() {
            self.on_switch_edge(edge);
        }
    }

    fn on_switch_edge(&mut self, edge: SwitchState) {
        if !self.listening || edge != SwitchState::Closed {
            return;
        }
        info!("Reed Switch Closed");
        let BoneStatus { is_active, lifecycle } = self.status.payload;
        if is_active && lifecycle == Lifecycle::Incomplete {
            self.turn_green();
            self.status.payload.lifecycle = Lifecycle::Complete;
            let snapshot = self.state();
            self.events.publish(BoneEvent::Complete, &snapshot);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.status.payload.is_active
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.status.payload.lifecycle
    }

    pub fn reed_switch_pin(&self) -> PinId {
        self.reed_switch.pin()
    }

    pub fn subscriber_count(&self, event: BoneEvent) -> usize {
        self.events.subscriber_count(event)
    }
}

impl Component for Bone {
    type Payload = BoneState;

    fn id(&self) -> &str {
        &self.status.id
    }

    fn state(&self) -> ComponentState<BoneState> {
        self.status.map(|status| BoneState {
            is_active: status.is_active,
            lifecycle: status.lifecycle,
            reed_switch: self.reed_switch.state(),
            green_led: self.green.state(),
            red_led: self.red.state(),
        })
    }

    fn bind(&mut self, board: &mut dyn Board) -> Result<(), BoardError> {
        self.green.bind(board)?;
        self.red.bind(board)?;
        self.reed_switch.bind(board)
    }

    fn unbind(&mut self) {
        self.green.unbind();
        self.red.unbind();
        self.reed_switch.unbind();
    }

    fn is_bound(&self) -> bool {
        self.green.is_bound() && self.red.is_bound() && self.reed_switch.is_bound()
    }
}
