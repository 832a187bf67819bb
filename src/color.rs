//! RGB colour model for the light fixture.
//!
//! Channels are `f32` so the transition scheduler can accumulate
//! fractional per-tick deltas without drift; they are expected to stay
//! in 0 – 255 and are clamped only when converted to PWM duty.

use serde::{Deserialize, Serialize};

use crate::pins::PWM_MAX_DUTY;

/// Colour as three channel intensities, each nominally 0 – 255.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(255.0, 255.0, 255.0);
    pub const RED: Self = Self::new(255.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 255.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 255.0);
    pub const OFF: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `factor`.
    #[must_use]
    pub fn brightness(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Brighten by 25 %.
    #[must_use]
    pub fn brighten(self) -> Self {
        self.brightness(1.25)
    }

    /// Halve the brightness.
    #[must_use]
    pub fn dim(self) -> Self {
        self.brightness(0.5)
    }

    /// Channel values as 8-bit PWM duty, clamped and rounded.
    pub fn to_duty(self) -> (u8, u8, u8) {
        (
            Self::channel_duty(self.r),
            Self::channel_duty(self.g),
            Self::channel_duty(self.b),
        )
    }

    fn channel_duty(value: f32) -> u8 {
        if value.is_nan() {
            return 0;
        }
        value.round().clamp(0.0, f32::from(PWM_MAX_DUTY)) as u8
    }
}

/// Shorthand constructor.
pub const fn color(r: f32, g: f32, b: f32) -> Color {
    Color::new(r, g, b)
}
