//! Analog RGB LED strip driver with a cancellable colour-transition timer.
//!
//! Three PWM channels drive the strip's R/G/B MOSFETs. `current_color`
//! is the single source of truth for both the hardware write path and
//! the transition scheduler.
//!
//! ## Timer model
//!
//! The fixture owns at most one in-flight [`Transition`]. The control
//! loop calls [`AnalogRgbFixture::advance`] with the elapsed time; each
//! full refresh interval runs one tick. Every colour command
//! (`set_color`, `turn_on`, `turn_off`, `transition_to`, `loop_colors`)
//! first cancels whatever is in flight, so no stale tick can ever
//! overwrite an explicit colour.
//!
//! ```text
//!  transition_to ──▶ cancel ──▶ plan ──▶ [tick … tick] ──▶ Completed
//!  set_color     ──▶ cancel ──▶ write
//! ```
//!
//! ## Dual-target design
//!
//! Bound: writes go to the board's PWM channels.
//! Unbound: state updates in memory only and the failed write is logged.

use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use heapless::HistoryBuffer;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app::ports::{AnalogChannel, Board};
use crate::color::Color;
use crate::component::{report, Binding, Component, ComponentState, Operation};
use crate::drivers::transition::{Step, Transition};
use crate::error::BoardError;
use crate::pins::PinId;

/// Default refresh interval: 30 frames per second.
pub const DEFAULT_REFRESH_RATE_MS: f32 = 1000.0 / 30.0;

/// Colours kept in the informational history ring.
pub const HISTORY_LEN: usize = 32;

// ── Completion signal ─────────────────────────────────────────

/// How a transition ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The fixture reached the target colour.
    Completed,
    /// A later colour command superseded the transition.
    Cancelled,
}

type OutcomeSignal = Signal<NoopRawMutex, TransitionOutcome>;

/// Completion signal returned by [`AnalogRgbFixture::transition_to`].
///
/// Resolves exactly once. Await it from a single-threaded executor, or
/// poll [`is_settled`](Self::is_settled) from a tick loop.
#[derive(Clone)]
pub struct TransitionHandle {
    signal: Rc<OutcomeSignal>,
}

impl TransitionHandle {
    fn pending() -> Self {
        Self {
            signal: Rc::new(Signal::new()),
        }
    }

    fn resolved(outcome: TransitionOutcome) -> Self {
        let handle = Self::pending();
        handle.signal.signal(outcome);
        handle
    }

    /// `true` once the transition completed or was cancelled.
    pub fn is_settled(&self) -> bool {
        self.signal.signaled()
    }

    /// Take the outcome if settled. Consumes the stored value.
    pub fn take_outcome(&self) -> Option<TransitionOutcome> {
        self.signal.try_take()
    }

    /// Wait for the outcome.
    pub async fn wait(&self) -> TransitionOutcome {
        self.signal.wait().await
    }
}

// ── Fixture state ─────────────────────────────────────────────

/// Payload of the fixture's [`ComponentState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureState {
    pub is_powered: bool,
    pub current_color: Color,
    /// Oldest first.
    pub color_history: Vec<Color>,
    pub refresh_rate: f32,
}

/// PWM pins for the three channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbPins {
    pub r: PinId,
    pub g: PinId,
    pub b: PinId,
}

struct InFlight {
    plan: Transition,
    signal: Option<Rc<OutcomeSignal>>,
}

/// Circular animation started by [`AnalogRgbFixture::loop_colors`].
struct ColorLoop {
    colors: Vec<Color>,
    next: usize,
    hop_ms: f32,
}

type Channels = [Box<dyn AnalogChannel>; 3];

// ── Driver ────────────────────────────────────────────────────

pub struct AnalogRgbFixture {
    envelope: ComponentState<()>,
    pins: RgbPins,
    channels: Binding<Channels>,
    current: Color,
    history: HistoryBuffer<Color, HISTORY_LEN>,
    refresh_rate_ms: f32,
    in_flight: Option<InFlight>,
    animation: Option<ColorLoop>,
    /// Time accumulated towards the next tick.
    elapsed_ms: f32,
}

impl AnalogRgbFixture {
    pub fn new(id: &str, name: &str, pins: RgbPins, refresh_rate_ms: f32) -> Self {
        let envelope = ComponentState::new(id, name, "analog-led-strip", ()).with_operations(vec![
            Operation::new("Turn On", "/led-strip/turn-on"),
            Operation::new("Turn Off", "/led-strip/turn-off"),
        ]);
        Self {
            envelope,
            pins,
            channels: Binding::Unbound,
            current: Color::WHITE.dim(),
            history: HistoryBuffer::new(),
            refresh_rate_ms,
            in_flight: None,
            animation: None,
            elapsed_ms: 0.0,
        }
    }

    // ── Immediate colour commands ─────────────────────────────

    /// Set the colour immediately, cancelling any transition or loop.
    pub fn set_color(&mut self, color: Color) {
        self.cancel();
        self.write(color);
        self.history.write(color);
    }

    /// Full white.
    pub fn turn_on(&mut self) {
        self.set_color(Color::WHITE);
    }

    /// Black.
    pub fn turn_off(&mut self) {
        self.set_color(Color::OFF);
    }

    // ── Timed colour commands ─────────────────────────────────

    /// Interpolate from the current colour to `target` over `duration_ms`.
    ///
    /// Durations not longer than one refresh interval set `target`
    /// directly and return an already-completed handle.
    pub fn transition_to(&mut self, target: Color, duration_ms: f32) -> TransitionHandle {
        self.cancel();
        match self.begin(target, duration_ms) {
            Some(signal) => TransitionHandle { signal },
            None => TransitionHandle::resolved(TransitionOutcome::Completed),
        }
    }

    /// Show `colors[0]`, then cycle through the sequence forever,
    /// each hop taking `duration_ms / (colors.len() - 1)`.
    ///
    /// Runs until the next colour command.
    pub fn loop_colors(&mut self, duration_ms: f32, colors: &[Color]) {
        self.cancel();
        let Some(first) = colors.first() else {
            return;
        };
        self.write(*first);
        self.history.write(*first);
        if colors.len() < 2 {
            return;
        }

        // A hop must span at least two ticks, otherwise every hop would
        // complete inside the same tick and the loop would never yield.
        let hop_ms = (duration_ms / (colors.len() - 1) as f32).max(2.0 * self.refresh_rate_ms);
        self.animation = Some(ColorLoop {
            colors: colors.to_vec(),
            next: 1,
            hop_ms,
        });
        self.next_hop();
    }

    /// Feed elapsed time into the timer; runs one tick per full refresh
    /// interval while a transition is in flight.
    pub fn advance(&mut self, elapsed_ms: f32) {
        if self.in_flight.is_none() {
            self.elapsed_ms = 0.0;
            return;
        }
        self.elapsed_ms += elapsed_ms;
        while self.in_flight.is_some() && self.elapsed_ms >= self.refresh_rate_ms {
            self.elapsed_ms -= self.refresh_rate_ms;
            self.tick();
        }
    }

    /// Run exactly one interpolation tick, if a transition is in flight.
    pub fn tick(&mut self) {
        let Some(mut flight) = self.in_flight.take() else {
            return;
        };
        match flight.plan.step(self.current) {
            Step::Moving(next) => {
                self.write(next);
                self.in_flight = Some(flight);
            }
            Step::Arrived(target) => {
                self.write(target);
                self.history.write(target);
                if let Some(signal) = flight.signal {
                    signal.signal(TransitionOutcome::Completed);
                }
                if self.animation.is_some() {
                    self.next_hop();
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn current_color(&self) -> Color {
        self.current
    }

    pub fn is_powered(&self) -> bool {
        self.current != Color::OFF
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_looping(&self) -> bool {
        self.animation.is_some()
    }

    pub fn refresh_rate_ms(&self) -> f32 {
        self.refresh_rate_ms
    }

    // ── Internal ──────────────────────────────────────────────

    /// Clear the in-flight timer and any loop. Synchronous.
    fn cancel(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            debug!("{}: cancelling in-flight transition", self.envelope.id);
            if let Some(signal) = flight.signal {
                signal.signal(TransitionOutcome::Cancelled);
            }
        }
        self.animation = None;
        self.elapsed_ms = 0.0;
    }

    /// Plan and schedule a transition. Returns its signal, or `None`
    /// when the duration degenerated to an immediate set.
    fn begin(&mut self, target: Color, duration_ms: f32) -> Option<Rc<OutcomeSignal>> {
        match Transition::plan(self.current, target, duration_ms, self.refresh_rate_ms) {
            Ok(plan) => {
                let signal = Rc::new(Signal::new());
                self.in_flight = Some(InFlight {
                    plan,
                    signal: Some(Rc::clone(&signal)),
                });
                Some(signal)
            }
            Err(e) => {
                debug!("{}: {e} ({duration_ms}ms), setting directly", self.envelope.id);
                self.write(target);
                self.history.write(target);
                None
            }
        }
    }

    fn next_hop(&mut self) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        let target = animation.colors[animation.next];
        let hop_ms = animation.hop_ms;
        animation.next = (animation.next + 1) % animation.colors.len();

        if let Ok(plan) = Transition::plan(self.current, target, hop_ms, self.refresh_rate_ms) {
            self.in_flight = Some(InFlight { plan, signal: None });
        }
    }

    fn write(&mut self, color: Color) {
        self.current = color;
        let (r, g, b) = color.to_duty();
        let result = self.channels.with(&self.envelope.id, |[ch_r, ch_g, ch_b]| {
            ch_r.write(r)?;
            ch_g.write(g)?;
            ch_b.write(b)
        });
        report(result, "set LED strip colour");
    }
}

impl Component for AnalogRgbFixture {
    type Payload = FixtureState;

    fn id(&self) -> &str {
        &self.envelope.id
    }

    fn state(&self) -> ComponentState<FixtureState> {
        self.envelope.map(|_| FixtureState {
            is_powered: self.is_powered(),
            current_color: self.current,
            color_history: self.history.oldest_ordered().copied().collect(),
            refresh_rate: self.refresh_rate_ms,
        })
    }

    fn bind(&mut self, board: &mut dyn Board) -> Result<(), BoardError> {
        let channels = [
            board.bind_output(self.pins.r)?,
            board.bind_output(self.pins.g)?,
            board.bind_output(self.pins.b)?,
        ];
        self.channels = Binding::Bound(channels);
        info!("Initialized LED strip.");
        Ok(())
    }

    fn unbind(&mut self) {
        self.channels = Binding::Unbound;
    }

    fn is_bound(&self) -> bool {
        self.channels.is_bound()
    }
}
