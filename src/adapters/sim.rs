//! Simulated board for running the installation without hardware.
//!
//! Every bound channel writes into a shared pin table. A cloned
//! [`SimProbe`] reads outputs back and drives input levels, the way a
//! test bench would with a logic analyser and a magnet.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use log::info;

use crate::app::ports::{AnalogChannel, Board, DigitalChannel, InputChannel};
use crate::error::{BoardError, ChannelError};
use crate::pins::PinId;

#[derive(Default)]
struct PinTable {
    analog: BTreeMap<PinId, u8>,
    digital: BTreeMap<PinId, bool>,
    inputs: BTreeMap<PinId, bool>,
}

type Shared = Rc<RefCell<PinTable>>;

pub struct SimBoard {
    pins: Shared,
    bound: BTreeSet<PinId>,
    connect_error: Option<BoardError>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            pins: Rc::default(),
            bound: BTreeSet::new(),
            connect_error: None,
        }
    }

    /// A board whose handshake fails with `error`.
    pub fn failing(error: BoardError) -> Self {
        Self {
            connect_error: Some(error),
            ..Self::new()
        }
    }

    pub fn probe(&self) -> SimProbe {
        SimProbe {
            pins: Rc::clone(&self.pins),
        }
    }

    fn claim(&mut self, pin: PinId) -> Result<(), BoardError> {
        if self.bound.insert(pin) {
            Ok(())
        } else {
            Err(BoardError::PinUnavailable(pin))
        }
    }
}

impl Board for SimBoard {
    fn connect(&mut self) -> Result<(), BoardError> {
        match self.connect_error {
            Some(e) => Err(e),
            None => {
                info!("Simulated board ready");
                Ok(())
            }
        }
    }

    fn bind_output(&mut self, pin: PinId) -> Result<Box<dyn AnalogChannel>, BoardError> {
        self.claim(pin)?;
        self.pins.borrow_mut().analog.insert(pin, 0);
        Ok(Box::new(SimPin {
            pin,
            pins: Rc::clone(&self.pins),
        }))
    }

    fn bind_digital_output(&mut self, pin: PinId) -> Result<Box<dyn DigitalChannel>, BoardError> {
        self.claim(pin)?;
        self.pins.borrow_mut().digital.insert(pin, false);
        Ok(Box::new(SimPin {
            pin,
            pins: Rc::clone(&self.pins),
        }))
    }

    fn bind_digital_input(&mut self, pin: PinId) -> Result<Box<dyn InputChannel>, BoardError> {
        self.claim(pin)?;
        self.pins.borrow_mut().inputs.entry(pin).or_insert(false);
        Ok(Box::new(SimPin {
            pin,
            pins: Rc::clone(&self.pins),
        }))
    }
}

struct SimPin {
    pin: PinId,
    pins: Shared,
}

impl AnalogChannel for SimPin {
    fn write(&mut self, duty: u8) -> Result<(), ChannelError> {
        self.pins.borrow_mut().analog.insert(self.pin, duty);
        Ok(())
    }
}

impl DigitalChannel for SimPin {
    fn set(&mut self, on: bool) -> Result<(), ChannelError> {
        self.pins.borrow_mut().digital.insert(self.pin, on);
        Ok(())
    }
}

impl InputChannel for SimPin {
    fn is_closed(&mut self) -> Result<bool, ChannelError> {
        Ok(self.pins.borrow().inputs.get(&self.pin).copied().unwrap_or(false))
    }
}

/// Bench access to a [`SimBoard`]'s pins.
#[derive(Clone)]
pub struct SimProbe {
    pins: Shared,
}

impl SimProbe {
    /// Drive an input contact.
    pub fn set_input(&self, pin: PinId, closed: bool) {
        self.pins.borrow_mut().inputs.insert(pin, closed);
    }

    /// Last duty written to a PWM pin, if bound.
    pub fn duty(&self, pin: PinId) -> Option<u8> {
        self.pins.borrow().analog.get(&pin).copied()
    }

    /// Last level written to a digital output, if bound.
    pub fn level(&self, pin: PinId) -> Option<bool> {
        self.pins.borrow().digital.get(&pin).copied()
    }
}
