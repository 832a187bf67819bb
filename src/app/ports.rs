//! Port traits: the boundary between the installation core and the board.
//!
//! ```text
//!   Board adapter ──▶ Port traits ──▶ components (fixture, bones, button)
//! ```
//!
//! Driven adapters (the `embedded-hal` wrappers, the simulated board,
//! the test mock) implement these traits. Components hold the channels
//! they were bound to and never touch a driver directly, so the whole
//! core runs on the host without hardware attached.
//!
//! Channel traits are object-safe: a component stores
//! `Box<dyn AnalogChannel>` etc. regardless of which adapter produced it.

use crate::error::{BoardError, ChannelError};
use crate::pins::PinId;

// ───────────────────────────────────────────────────────────────
// Channels (domain → hardware, hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One PWM output channel (a single colour of the LED strip).
pub trait AnalogChannel {
    /// Write an 8-bit duty value (0 = off, 255 = full).
    fn write(&mut self, duty: u8) -> Result<(), ChannelError>;
}

/// One on/off output (an indicator LED).
pub trait DigitalChannel {
    fn set(&mut self, on: bool) -> Result<(), ChannelError>;
}

/// One digital input (reed switch, push button).
pub trait InputChannel {
    /// `true` when the contact is closed.
    fn is_closed(&mut self) -> Result<bool, ChannelError>;
}

// ───────────────────────────────────────────────────────────────
// Board port
// ───────────────────────────────────────────────────────────────

/// The board abstraction: connection handshake plus pin binding.
///
/// Components call the `bind_*` methods only during their `bind` phase;
/// before that every component operation is a logged no-op on the
/// hardware side.
pub trait Board {
    /// Perform the handshake. Resolves once the board acknowledges
    /// readiness or fails with the board-reported error.
    fn connect(&mut self) -> Result<(), BoardError>;

    /// Bind a PWM-capable pin as an analog output.
    fn bind_output(&mut self, pin: PinId) -> Result<Box<dyn AnalogChannel>, BoardError>;

    /// Bind a pin as an on/off output.
    fn bind_digital_output(&mut self, pin: PinId) -> Result<Box<dyn DigitalChannel>, BoardError>;

    /// Bind a pin as an input event source.
    fn bind_digital_input(&mut self, pin: PinId) -> Result<Box<dyn InputChannel>, BoardError>;
}
