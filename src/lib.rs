//! X-ray puzzle installation controller.
//!
//! Drives an RGB light fixture through cancellable colour transitions
//! and coordinates the bone puzzle units around the Danny the Dinosaur
//! exhibit. Everything hardware-specific sits behind the port traits in
//! [`app::ports`], so the library runs unchanged on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod color;
pub mod component;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod puzzle;
pub mod registry;

pub use app::installation::{GameState, Installation, InstallationState, Status};
pub use color::{color, Color};
pub use error::{Error, Result};
