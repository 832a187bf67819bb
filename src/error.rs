//! Unified error types for the installation controller.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! orchestrator and the simulator binary handle failures uniformly.
//! The leaf enums are `Copy` so drivers can return them without
//! allocation.

use core::fmt;

use crate::pins::PinId;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operation touched a component that has no bound hardware.
    /// Carries the component id.
    BindingUnavailable(String),
    /// The board handshake or a pin binding failed.
    BoardConnection(BoardError),
    /// A transition duration was not longer than one refresh interval.
    InvalidTransitionDuration,
    /// A bound channel rejected a write or read.
    Hardware(ChannelError),
    /// An invocation key could not be resolved.
    Command(CommandError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindingUnavailable(id) => write!(f, "{id}: no hardware bound"),
            Self::BoardConnection(e) => write!(f, "board: {e}"),
            Self::InvalidTransitionDuration => {
                write!(f, "transition duration not longer than one refresh interval")
            }
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Board errors
// ---------------------------------------------------------------------------

/// Failures reported by the board handshake or pin binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// The board never acknowledged readiness.
    NotResponding,
    /// The board reported a failure during the handshake.
    Failed(&'static str),
    /// The requested pin cannot be bound in the requested mode.
    PinUnavailable(PinId),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotResponding => write!(f, "board not responding"),
            Self::Failed(msg) => write!(f, "board reported failure: {msg}"),
            Self::PinUnavailable(pin) => write!(f, "pin {pin} unavailable"),
        }
    }
}

impl std::error::Error for BoardError {}

impl From<BoardError> for Error {
    fn from(e: BoardError) -> Self {
        Self::BoardConnection(e)
    }
}

// ---------------------------------------------------------------------------
// Channel errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
    /// GPIO read failed.
    GpioReadFailed,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl std::error::Error for ChannelError {}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The invocation key does not match any known route.
    UnknownRoute(String),
    /// The route names a component id that does not exist.
    UnknownComponent(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRoute(key) => write!(f, "unknown invocation key '{key}'"),
            Self::UnknownComponent(id) => write!(f, "unknown component '{id}'"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse(String),
    /// A config field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
