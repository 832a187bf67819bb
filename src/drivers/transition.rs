//! Linear colour interpolation, one fixed-interval tick at a time.
//!
//! A [`Transition`] is planned once from the fixture's current colour
//! and then stepped by the fixture's timer. It holds no clock of its
//! own; the fixture decides when a tick is due.
//!
//! ```text
//!   stops  = duration / refresh                (fractional)
//!   delta  = (target - start) / stops          per channel
//!   ticks  = ceil(stops)
//!   arrive = delta >= 0 ? value >= target : value <= target
//! ```
//!
//! The plan also arrives after its last tick regardless of the
//! comparison, so float drift can never stall a transition one ulp
//! short of the target.

use crate::color::Color;
use crate::error::{Error, Result};

/// Result of advancing a transition by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Still moving; write this colour and wait for the next tick.
    Moving(Color),
    /// Every channel reached the target; the colour is exactly `target`.
    Arrived(Color),
}

/// A planned linear interpolation towards `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    target: Color,
    delta: Color,
    ticks: u32,
    remaining: u32,
}

impl Transition {
    /// Plan a transition from `from` to `target`.
    ///
    /// Fails with [`Error::InvalidTransitionDuration`] when the duration
    /// is not longer than one refresh interval (including zero,
    /// negative and non-finite values); the caller then sets the
    /// target directly.
    pub fn plan(from: Color, target: Color, duration_ms: f32, refresh_rate_ms: f32) -> Result<Self> {
        let n = stops(duration_ms, refresh_rate_ms).ok_or(Error::InvalidTransitionDuration)?;
        let ticks = n.ceil().min(u32::MAX as f32) as u32;
        Ok(Self {
            target,
            delta: Color::new(
                (target.r - from.r) / n,
                (target.g - from.g) / n,
                (target.b - from.b) / n,
            ),
            ticks,
            remaining: ticks,
        })
    }

    pub fn target(&self) -> Color {
        self.target
    }

    /// Per-tick increment for each channel.
    pub fn delta(&self) -> Color {
        self.delta
    }

    /// Number of ticks the plan was computed for.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Ticks left before the plan is exhausted.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance `current` by one tick.
    pub fn step(&mut self, current: Color) -> Step {
        self.remaining = self.remaining.saturating_sub(1);
        let next = Color::new(
            current.r + self.delta.r,
            current.g + self.delta.g,
            current.b + self.delta.b,
        );

        let arrived = self.remaining == 0
            || (arrived(self.delta.r, next.r, self.target.r)
                && arrived(self.delta.g, next.g, self.target.g)
                && arrived(self.delta.b, next.b, self.target.b));

        if arrived {
            Step::Arrived(self.target)
        } else {
            Step::Moving(next)
        }
    }
}

/// Directional arrival check for one channel.
fn arrived(delta: f32, value: f32, target: f32) -> bool {
    if delta >= 0.0 {
        value >= target
    } else {
        value <= target
    }
}

/// Refresh intervals in `duration_ms`, kept fractional so the step
/// size covers the exact duration. `None` when at most one.
fn stops(duration_ms: f32, refresh_rate_ms: f32) -> Option<f32> {
    if !duration_ms.is_finite() || !refresh_rate_ms.is_finite() || refresh_rate_ms <= 0.0 {
        return None;
    }
    let stops = duration_ms / refresh_rate_ms;
    (stops.is_finite() && stops > 1.0).then_some(stops)
}
