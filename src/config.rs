//! Installation configuration.
//!
//! Identity, fixture wiring and the bone layout. The default is the
//! shipped Danny the Dinosaur installation on the Mega pin map; a JSON
//! document with the same shape overrides it.

use serde::{Deserialize, Serialize};

use crate::drivers::fixture::{RgbPins, DEFAULT_REFRESH_RATE_MS};
use crate::error::ConfigError;
use crate::pins::{self, PinId};
use crate::puzzle::bone::BonePins;

/// One component's identity and wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentConfig<P> {
    pub id: String,
    pub name: String,
    pub pins: P,
}

impl<P> ComponentConfig<P> {
    pub fn new(id: &str, name: &str, pins: P) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            pins,
        }
    }
}

/// Complete installation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstallationConfig {
    // --- Identity ---
    pub id: u32,
    pub name: String,
    pub description: String,

    // --- Fixture ---
    pub fixture: ComponentConfig<RgbPins>,
    /// Transition tick interval (milliseconds)
    pub refresh_rate_ms: f32,

    // --- Inputs ---
    pub heart_button: ComponentConfig<PinId>,

    // --- Puzzle units, in selection order ---
    pub bones: Vec<ComponentConfig<BonePins>>,
}

impl Default for InstallationConfig {
    fn default() -> Self {
        let bone = |n: u8, green, red, reed_switch| {
            ComponentConfig::new(
                &format!("bone-{n}"),
                &format!("Bone #{n}"),
                BonePins {
                    green,
                    red,
                    reed_switch,
                },
            )
        };

        Self {
            id: 1,
            name: "Danny the Dinosaur".into(),
            description: "Danny the Dinosaur is sick.".into(),

            fixture: ComponentConfig::new(
                "analog-led-strip",
                "RGB LED Strip",
                RgbPins {
                    r: pins::STRIP_R_PWM,
                    g: pins::STRIP_G_PWM,
                    b: pins::STRIP_B_PWM,
                },
            ),
            refresh_rate_ms: DEFAULT_REFRESH_RATE_MS, // 30 fps

            heart_button: ComponentConfig::new("heart-button", "Heart Button", pins::HEART_BUTTON),

            bones: vec![
                bone(1, pins::BONE_1_GREEN, pins::BONE_1_RED, pins::BONE_1_REED),
                bone(2, pins::BONE_2_GREEN, pins::BONE_2_RED, pins::BONE_2_REED),
                bone(3, pins::BONE_3_GREEN, pins::BONE_3_RED, pins::BONE_3_REED),
            ],
        }
    }
}

impl InstallationConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.refresh_rate_ms.is_finite() && self.refresh_rate_ms > 0.0) {
            return Err(ConfigError::ValidationFailed("refreshRateMs must be > 0"));
        }
        if self.bones.is_empty() {
            return Err(ConfigError::ValidationFailed("at least one bone is required"));
        }

        let mut ids: Vec<&str> = vec![self.fixture.id.as_str(), self.heart_button.id.as_str()];
        ids.extend(self.bones.iter().map(|b| b.id.as_str()));
        if ids.iter().any(|id| id.is_empty()) {
            return Err(ConfigError::ValidationFailed("component ids must not be empty"));
        }
        if has_duplicates(&mut ids) {
            return Err(ConfigError::ValidationFailed("component ids must be unique"));
        }

        let mut used = self.pins();
        if has_duplicates(&mut used) {
            return Err(ConfigError::ValidationFailed("a pin is assigned twice"));
        }
        Ok(())
    }

    /// Every pin the configuration claims.
    pub fn pins(&self) -> Vec<PinId> {
        let RgbPins { r, g, b } = self.fixture.pins;
        let mut pins = vec![r, g, b, self.heart_button.pins];
        for bone in &self.bones {
            pins.extend([bone.pins.green, bone.pins.red, bone.pins.reed_switch]);
        }
        pins
    }
}

fn has_duplicates<T: Ord>(items: &mut [T]) -> bool {
    items.sort_unstable();
    items.windows(2).any(|w| w[0] == w[1])
}
