//! `embedded-hal` adapter: wraps HAL pins into the channel ports.
//!
//! Any board crate that implements the `embedded-hal` 1.0 traits plugs
//! in here: PWM channels become [`AnalogChannel`]s, push-pull outputs
//! become [`DigitalChannel`]s and inputs become [`InputChannel`]s.
//! [`HalBoard`] collects the claimed pins under their header numbers
//! and hands each one out exactly once during `bind`.

use std::collections::BTreeMap;

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::app::ports::{AnalogChannel, Board, DigitalChannel, InputChannel};
use crate::error::{BoardError, ChannelError};
use crate::pins::{PinId, PWM_MAX_DUTY};

// ── Channels ──────────────────────────────────────────────────

/// PWM channel scaled from 8-bit duty to the timer's resolution.
pub struct PwmChannel<P: SetDutyCycle> {
    pwm: P,
    /// Common-anode wiring: full duty means dark.
    common_anode: bool,
}

impl<P: SetDutyCycle> PwmChannel<P> {
    pub fn new(pwm: P, common_anode: bool) -> Self {
        Self { pwm, common_anode }
    }
}

impl<P: SetDutyCycle> AnalogChannel for PwmChannel<P> {
    fn write(&mut self, duty: u8) -> Result<(), ChannelError> {
        let duty = if self.common_anode { PWM_MAX_DUTY - duty } else { duty };
        self.pwm
            .set_duty_cycle_fraction(u16::from(duty), u16::from(PWM_MAX_DUTY))
            .map_err(|_| ChannelError::PwmWriteFailed)
    }
}

pub struct OutputChannel<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> OutputChannel<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> DigitalChannel for OutputChannel<P> {
    fn set(&mut self, on: bool) -> Result<(), ChannelError> {
        let result = if on { self.pin.set_high() } else { self.pin.set_low() };
        result.map_err(|_| ChannelError::GpioWriteFailed)
    }
}

/// Contact input. Pulled-up switches read low when closed.
pub struct ContactChannel<P: InputPin> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> ContactChannel<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }
}

impl<P: InputPin> InputChannel for ContactChannel<P> {
    fn is_closed(&mut self) -> Result<bool, ChannelError> {
        let high = self.pin.is_high().map_err(|_| ChannelError::GpioReadFailed)?;
        Ok(high != self.active_low)
    }
}

// ── Board ─────────────────────────────────────────────────────

/// Board backed by pins claimed from a HAL at startup.
///
/// Direct GPIO has no handshake, so `connect` always succeeds. Binding
/// a pin that was never registered, or binding it twice, fails with
/// [`BoardError::PinUnavailable`].
#[derive(Default)]
pub struct HalBoard {
    pwm: BTreeMap<PinId, Box<dyn AnalogChannel>>,
    outputs: BTreeMap<PinId, Box<dyn DigitalChannel>>,
    inputs: BTreeMap<PinId, Box<dyn InputChannel>>,
}

impl HalBoard {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pwm<P: SetDutyCycle + 'static>(mut self, pin: PinId, pwm: P) -> Self {
        self.pwm.insert(pin, Box::new(PwmChannel::new(pwm, false)));
        self
    }

    #[must_use]
    pub fn with_output<P: OutputPin + 'static>(mut self, pin: PinId, out: P) -> Self {
        self.outputs.insert(pin, Box::new(OutputChannel::new(out)));
        self
    }

    #[must_use]
    pub fn with_input<P: InputPin + 'static>(mut self, pin: PinId, input: P, active_low: bool) -> Self {
        self.inputs.insert(pin, Box::new(ContactChannel::new(input, active_low)));
        self
    }
}

impl Board for HalBoard {
    fn connect(&mut self) -> Result<(), BoardError> {
        debug!(
            "HAL board ready: {} PWM, {} outputs, {} inputs",
            self.pwm.len(),
            self.outputs.len(),
            self.inputs.len()
        );
        Ok(())
    }

    fn bind_output(&mut self, pin: PinId) -> Result<Box<dyn AnalogChannel>, BoardError> {
        self.pwm.remove(&pin).ok_or(BoardError::PinUnavailable(pin))
    }

    fn bind_digital_output(&mut self, pin: PinId) -> Result<Box<dyn DigitalChannel>, BoardError> {
        self.outputs.remove(&pin).ok_or(BoardError::PinUnavailable(pin))
    }

    fn bind_digital_input(&mut self, pin: PinId) -> Result<Box<dyn InputChannel>, BoardError> {
        self.inputs.remove(&pin).ok_or(BoardError::PinUnavailable(pin))
    }
}
