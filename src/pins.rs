//! Pin assignments for the installation's Arduino Mega controller.
//!
//! Single source of truth for the default wiring: the default
//! configuration references this module rather than hard-coding pin
//! numbers. Change a pin here and it propagates everywhere.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A digital pin number on the board header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub u8);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RGB LED strip (MOSFET low-side drivers on PWM pins)
// ---------------------------------------------------------------------------

pub const STRIP_R_PWM: PinId = PinId(3);
pub const STRIP_G_PWM: PinId = PinId(5);
pub const STRIP_B_PWM: PinId = PinId(6);

// ---------------------------------------------------------------------------
// Heart button (momentary, active when closed)
// ---------------------------------------------------------------------------

pub const HEART_BUTTON: PinId = PinId(32);

// ---------------------------------------------------------------------------
// Bones: green LED, red LED, reed switch
// ---------------------------------------------------------------------------

pub const BONE_1_GREEN: PinId = PinId(26);
pub const BONE_1_RED: PinId = PinId(28);
pub const BONE_1_REED: PinId = PinId(30);

pub const BONE_2_GREEN: PinId = PinId(40);
pub const BONE_2_RED: PinId = PinId(42);
pub const BONE_2_REED: PinId = PinId(44);

pub const BONE_3_GREEN: PinId = PinId(48);
pub const BONE_3_RED: PinId = PinId(50);
pub const BONE_3_REED: PinId = PinId(46);

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// `analogWrite` resolution on the Mega (8-bit, 0 – 255).
pub const PWM_MAX_DUTY: u8 = u8::MAX;
