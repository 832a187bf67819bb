//! Installation orchestrator: the hexagonal core.
//!
//! [`Installation`] owns the board, the RGB fixture, the bones and the
//! heart button. It exposes lifecycle operations, round-robin bone
//! selection, a typed command surface and a recomputed state snapshot.
//! All hardware access flows through the [`Board`] port, so the whole
//! orchestrator runs against a simulated or mock board in tests.
//!
//! ```text
//!  Board ──▶ ┌─────────────────────────────┐ ◀── Command / invocation key
//!            │        Installation         │
//!  inputs ──▶│ fixture · bones · button    │ ──▶ InstallationState
//!            └─────────────────────────────┘
//! ```
//!
//! Control flow is run-to-completion: `advance` polls inputs and every
//! resulting event is handled before it returns.

use core::cell::Cell;
use std::rc::Rc;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentState};
use crate::config::InstallationConfig;
use crate::drivers::button::{Button, ButtonState};
use crate::drivers::fixture::{AnalogRgbFixture, FixtureState};
use crate::drivers::reed_switch::SwitchState;
use crate::error::{BoardError, CommandError, Result};
use crate::pins::PinId;
use crate::puzzle::bone::{Bone, BoneEvent, BoneState};

use super::commands::{BoneAction, ButtonAction, Command};
use super::ports::Board;
use super::setup::{setup, InstallationSetup};

// ───────────────────────────────────────────────────────────────
// State
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Stopped,
    Starting,
    Started,
    Stopping,
    Restarting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Inactive,
    Incomplete,
    Complete,
}

/// One entry of the flattened component list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComponentSnapshot {
    Fixture(ComponentState<FixtureState>),
    Bone(ComponentState<BoneState>),
    Button(ComponentState<ButtonState>),
}

impl ComponentSnapshot {
    pub fn id(&self) -> &str {
        match self {
            Self::Fixture(s) => &s.id,
            Self::Bone(s) => &s.id,
            Self::Button(s) => &s.id,
        }
    }
}

/// Installation snapshot, recomputed on every call.
///
/// `components` is ordered: fixture, bones by index, heart button.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationState {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub status: Status,
    pub is_connected: bool,
    pub game_state: GameState,
    pub selected_unit_index: Option<usize>,
    pub components: Vec<ComponentSnapshot>,
}

// ───────────────────────────────────────────────────────────────
// Installation
// ───────────────────────────────────────────────────────────────

pub struct Installation<B: Board> {
    id: u32,
    name: String,
    description: String,
    board: B,
    status: Status,
    is_connected: bool,
    /// Shared with the bones' completion callbacks.
    game_state: Rc<Cell<GameState>>,
    selected: Option<usize>,
    /// Whether the completion handler is registered, per bone.
    subscribed: Vec<bool>,
    fixture: AnalogRgbFixture,
    bones: Vec<Bone>,
    heart_button: Button,
}

impl<B: Board> Installation<B> {
    /// Build every component unbound. Call [`connect`](Self::connect) next.
    pub fn new(config: &InstallationConfig, board: B) -> Self {
        let fixture = AnalogRgbFixture::new(
            &config.fixture.id,
            &config.fixture.name,
            config.fixture.pins,
            config.refresh_rate_ms,
        );
        let heart_button = Button::new(
            &config.heart_button.id,
            &config.heart_button.name,
            config.heart_button.pins,
        );
        let bones: Vec<Bone> = config
            .bones
            .iter()
            .map(|b| Bone::new(&b.id, &b.name, b.pins))
            .collect();
        info!("Initialized all bones");

        Self {
            id: config.id,
            name: config.name.clone(),
            description: config.description.clone(),
            board,
            status: Status::Stopped,
            is_connected: false,
            game_state: Rc::new(Cell::new(GameState::Inactive)),
            selected: None,
            subscribed: vec![false; bones.len()],
            fixture,
            bones,
            heart_button,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Handshake with the board, bind every component, then put the
    /// hardware in its idle state (fixture off, bones inactive).
    ///
    /// On failure `is_connected` stays `false` and every component is
    /// unbound again, including those bound before the failing pin. The
    /// board keeps the pins it already handed out, so a retry needs a
    /// fresh board. No retry here.
    pub fn connect(&mut self) -> Result<()> {
        info!("Connecting to board");
        if let Err(e) = self.board.connect().and_then(|()| self.bind_all()) {
            error!("Board connection failed: {e}");
            self.unbind_all();
            self.is_connected = false;
            return Err(e.into());
        }
        info!("Connected to board successfully");
        self.is_connected = true;

        self.fixture.turn_off();
        for bone in &mut self.bones {
            bone.make_inactive();
        }
        Ok(())
    }

    pub fn start(&mut self) {
        self.status = Status::Started;
        info!("{} started", self.name);
    }

    /// Fixture off, every bone inactive, heart button back to `n/a`.
    pub fn stop(&mut self) {
        self.status = Status::Stopping;
        self.halt();
        self.status = Status::Stopped;
        info!("{} stopped", self.name);
    }

    pub fn restart(&mut self) {
        self.status = Status::Restarting;
        self.halt();
        self.status = Status::Started;
        info!("{} restarted", self.name);
    }

    /// Deactivate every bone and arm the next one in round-robin order.
    ///
    /// The first call arms the bone at index 0.
    pub fn activate_next_unit(&mut self) {
        if self.bones.is_empty() {
            warn!("No bones configured; nothing to activate");
            return;
        }
        self.game_state.set(GameState::Incomplete);
        for bone in &mut self.bones {
            bone.make_inactive();
        }

        let next = self.selected.map_or(0, |i| (i + 1) % self.bones.len());
        self.selected = Some(next);

        let bone = &mut self.bones[next];
        bone.activate();
        if !self.subscribed[next] {
            let game_state = Rc::clone(&self.game_state);
            bone.on(BoneEvent::Complete, move |_| game_state.set(GameState::Complete));
            self.subscribed[next] = true;
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run the fixture timer and poll every bound input.
    pub fn advance(&mut self, elapsed_ms: f32) {
        self.fixture.advance(elapsed_ms);
        for bone in &mut self.bones {
            bone.poll();
        }
        self.heart_button.advance(elapsed_ms);
    }

    /// Route an input level reported by an interrupt-driven board.
    /// Returns `false` when no input is wired to `pin`.
    pub fn handle_input(&mut self, pin: PinId, closed: bool) -> bool {
        if let Some(bone) = self.bones.iter_mut().find(|b| b.reed_switch_pin() == pin) {
            bone.handle_switch(SwitchState::from_closed(closed));
            return true;
        }
        if self.heart_button.pin() == pin {
            self.heart_button.apply(closed);
            return true;
        }
        debug!("Ignoring input on unwired pin {pin}");
        false
    }

    // ── Command handling ──────────────────────────────────────

    /// Parse and execute an invocation key.
    pub fn invoke(&mut self, key: &str) -> Result<()> {
        let cmd = Command::parse(key)?;
        self.handle_command(cmd)
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<()> {
        debug!("Command: {cmd:?}");
        match cmd {
            Command::Start => self.start(),
            Command::Stop => self.stop(),
            Command::Restart => self.restart(),
            Command::ActivateNextBone => self.activate_next_unit(),
            Command::FixtureOn => self.fixture.turn_on(),
            Command::FixtureOff => self.fixture.turn_off(),
            Command::Bone { id, action } => {
                let bone = self
                    .bones
                    .iter_mut()
                    .find(|b| b.id() == id)
                    .ok_or(CommandError::UnknownComponent(id))?;
                match action {
                    BoneAction::Activate => bone.activate(),
                    BoneAction::Deactivate => bone.deactivate(),
                    BoneAction::SetToRed => bone.turn_red(),
                    BoneAction::SetToGreen => bone.turn_green(),
                }
            }
            Command::Button { id, action } => {
                if id != self.heart_button.id() {
                    return Err(CommandError::UnknownComponent(id).into());
                }
                match action {
                    ButtonAction::Press => self.heart_button.press(),
                    ButtonAction::Reset => self.heart_button.reset(),
                }
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> InstallationState {
        let mut components = Vec::with_capacity(self.bones.len() + 2);
        components.push(ComponentSnapshot::Fixture(self.fixture.state()));
        components.extend(self.bones.iter().map(|b| ComponentSnapshot::Bone(b.state())));
        components.push(ComponentSnapshot::Button(self.heart_button.state()));

        InstallationState {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            is_connected: self.is_connected,
            game_state: self.game_state.get(),
            selected_unit_index: self.selected,
            components,
        }
    }

    pub fn setup(&self) -> InstallationSetup {
        setup()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn game_state(&self) -> GameState {
        self.game_state.get()
    }

    pub fn selected_unit_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn fixture(&self) -> &AnalogRgbFixture {
        &self.fixture
    }

    pub fn fixture_mut(&mut self) -> &mut AnalogRgbFixture {
        &mut self.fixture
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone_mut(&mut self, id: &str) -> Option<&mut Bone> {
        self.bones.iter_mut().find(|b| b.id() == id)
    }

    pub fn heart_button_mut(&mut self) -> &mut Button {
        &mut self.heart_button
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    // ── Internal ──────────────────────────────────────────────

    fn bind_all(&mut self) -> core::result::Result<(), BoardError> {
        let board: &mut dyn Board = &mut self.board;
        self.fixture.bind(board)?;
        self.heart_button.bind(board)?;
        for bone in &mut self.bones {
            bone.bind(board)?;
        }
        Ok(())
    }

    fn unbind_all(&mut self) {
        self.fixture.unbind();
        self.heart_button.unbind();
        for bone in &mut self.bones {
            bone.unbind();
        }
    }

    fn halt(&mut self) {
        self.fixture.turn_off();
        for bone in &mut self.bones {
            bone.make_inactive();
        }
        self.heart_button.reset();
    }
}
