//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                      | Connects to                |
//! |------------|---------------------------------|----------------------------|
//! | `hal`      | Board, channel ports            | any `embedded-hal` 1.0 HAL |
//! | `sim`      | Board, channel ports            | in-memory pin table        |
//! | `log_sink` | `log::Log`                      | stderr + in-memory ring    |

pub mod hal;
pub mod log_sink;
pub mod sim;
