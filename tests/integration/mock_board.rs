//! Mock board for integration tests.
//!
//! Records every channel write in order so tests can assert on the full
//! hardware history, and exposes input levels through shared cells.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use xray::app::ports::{AnalogChannel, Board, DigitalChannel, InputChannel};
use xray::error::{BoardError, ChannelError};
use xray::pins::PinId;

// ── Write record ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinWrite {
    Analog { pin: PinId, duty: u8 },
    Digital { pin: PinId, on: bool },
}

#[derive(Default)]
pub struct Bench {
    pub writes: Vec<PinWrite>,
    pub inputs: HashMap<PinId, bool>,
    pub bound: Vec<PinId>,
    /// Channel writes on these pins fail.
    pub broken: Vec<PinId>,
}

pub type SharedBench = Rc<RefCell<Bench>>;

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub bench: SharedBench,
    pub connect_result: Result<(), BoardError>,
    pub connects: u32,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            bench: Rc::default(),
            connect_result: Ok(()),
            connects: 0,
        }
    }

    pub fn failing(error: BoardError) -> Self {
        Self {
            connect_result: Err(error),
            ..Self::new()
        }
    }

    pub fn bench(&self) -> SharedBench {
        Rc::clone(&self.bench)
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for MockBoard {
    fn connect(&mut self) -> Result<(), BoardError> {
        self.connects += 1;
        self.connect_result
    }

    fn bind_output(&mut self, pin: PinId) -> Result<Box<dyn AnalogChannel>, BoardError> {
        self.bench.borrow_mut().bound.push(pin);
        Ok(Box::new(MockPin::new(pin, &self.bench)))
    }

    fn bind_digital_output(&mut self, pin: PinId) -> Result<Box<dyn DigitalChannel>, BoardError> {
        self.bench.borrow_mut().bound.push(pin);
        Ok(Box::new(MockPin::new(pin, &self.bench)))
    }

    fn bind_digital_input(&mut self, pin: PinId) -> Result<Box<dyn InputChannel>, BoardError> {
        self.bench.borrow_mut().bound.push(pin);
        Ok(Box::new(MockPin::new(pin, &self.bench)))
    }
}

struct MockPin {
    pin: PinId,
    bench: SharedBench,
}

impl MockPin {
    fn new(pin: PinId, bench: &SharedBench) -> Self {
        Self {
            pin,
            bench: Rc::clone(bench),
        }
    }

    fn record(&self, write: PinWrite, error: ChannelError) -> Result<(), ChannelError> {
        let mut bench = self.bench.borrow_mut();
        if bench.broken.contains(&self.pin) {
            return Err(error);
        }
        bench.writes.push(write);
        Ok(())
    }
}

impl AnalogChannel for MockPin {
    fn write(&mut self, duty: u8) -> Result<(), ChannelError> {
        self.record(PinWrite::Analog { pin: self.pin, duty }, ChannelError::PwmWriteFailed)
    }
}

impl DigitalChannel for MockPin {
    fn set(&mut self, on: bool) -> Result<(), ChannelError> {
        self.record(PinWrite::Digital { pin: self.pin, on }, ChannelError::GpioWriteFailed)
    }
}

impl InputChannel for MockPin {
    fn is_closed(&mut self) -> Result<bool, ChannelError> {
        Ok(self.bench.borrow().inputs.get(&self.pin).copied().unwrap_or(false))
    }
}

// ── Bench queries ─────────────────────────────────────────────

#[allow(dead_code)]
pub fn set_input(bench: &SharedBench, pin: PinId, closed: bool) {
    bench.borrow_mut().inputs.insert(pin, closed);
}

/// Last level written to a digital pin.
#[allow(dead_code)]
pub fn level(bench: &SharedBench, pin: PinId) -> Option<bool> {
    bench.borrow().writes.iter().rev().find_map(|w| match *w {
        PinWrite::Digital { pin: p, on } if p == pin => Some(on),
        _ => None,
    })
}

/// Every duty written to a PWM pin, in order.
#[allow(dead_code)]
pub fn duties(bench: &SharedBench, pin: PinId) -> Vec<u8> {
    bench
        .borrow()
        .writes
        .iter()
        .filter_map(|w| match *w {
            PinWrite::Analog { pin: p, duty } if p == pin => Some(duty),
            _ => None,
        })
        .collect()
}
