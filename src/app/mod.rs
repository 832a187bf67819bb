//! Application core: installation orchestration, zero direct I/O.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without a board.

pub mod commands;
pub mod installation;
pub mod ports;
pub mod setup;
