//! Component drivers: the RGB fixture and its transition timer, the
//! indicator LEDs, reed switches and the push button.

pub mod button;
pub mod fixture;
pub mod led;
pub mod reed_switch;
pub mod transition;
