//! Recording transport and clock for unit tests.
//!
//! Both halves log onto one shared timeline. The transport additionally
//! models the controller's page/column addressing so tests can inspect the
//! RAM contents a real panel would end up with.
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::interface::{ControlLine, Direction, DisplayError, Signal, SignalTransport, Signals};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Open,
    Close,
    Bind { signal: Signal, line: ControlLine },
    Direction(Direction),
    Data(u8),
    Control { mask: Signals, value: Signals },
    Pulse { signals: Signals, width_ns: u32 },
    Delay { ns: u64 },
}

impl Event {
    pub fn control_value(&self) -> Option<Signals> {
        match *self {
            Event::Control { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// A byte latched by the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Write {
    Ctrl(u8),
    Data(u8),
}

/// Page/column RAM of the controller as seen through the latched bytes
#[derive(Clone)]
pub struct Controller {
    ram: [[u8; 256]; 16],
    page: usize,
    column: usize,
    writes: Vec<Write>,
}

impl Controller {
    fn new() -> Self {
        Controller {
            ram: [[0xAA; 256]; 16],
            page: 0,
            column: 0,
            writes: Vec::new(),
        }
    }

    fn latch(&mut self, byte: u8, data: bool) {
        if data {
            self.writes.push(Write::Data(byte));
            self.ram[self.page][self.column & 0xFF] = byte;
            self.column += 1;
            return;
        }
        self.writes.push(Write::Ctrl(byte));
        match byte {
            0x00..=0x0F => self.column = (self.column & 0xF0) | usize::from(byte & 0x0F),
            0x10..=0x1F => self.column = (self.column & 0x0F) | (usize::from(byte & 0x0F) << 4),
            0xB0..=0xBF => self.page = usize::from(byte & 0x0F),
            _ => {}
        }
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn data_writes(&self) -> Vec<u8> {
        self.writes
            .iter()
            .filter_map(|w| match *w {
                Write::Data(b) => Some(b),
                Write::Ctrl(_) => None,
            })
            .collect()
    }

    pub fn ctrl_writes(&self) -> Vec<u8> {
        self.writes
            .iter()
            .filter_map(|w| match *w {
                Write::Ctrl(b) => Some(b),
                Write::Data(_) => None,
            })
            .collect()
    }

    pub fn page_selects(&self) -> usize {
        self.ctrl_writes()
            .iter()
            .filter(|&&b| (0xB0..=0xBF).contains(&b))
            .count()
    }

    /// RAM byte at a controller (not logical) column
    pub fn ram(&self, page: usize, column: usize) -> u8 {
        self.ram[page][column]
    }
}

struct State {
    events: Vec<Event>,
    controller: Controller,
    bindings: Vec<(Signal, Signals)>,
    levels: Signals,
    data: u8,
    fail_open: bool,
    fail_bind: Option<Signal>,
    fail_writes: bool,
}

impl State {
    fn bound(&self, signal: Signal) -> Signals {
        self.bindings
            .iter()
            .find(|(s, _)| *s == signal)
            .map_or(Signals::NONE, |(_, mask)| *mask)
    }
}

#[derive(Clone)]
pub struct Recorder {
    state: Rc<RefCell<State>>,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder {
            state: Rc::new(RefCell::new(State {
                events: Vec::new(),
                controller: Controller::new(),
                bindings: Vec::new(),
                levels: Signals::NONE,
                data: 0,
                fail_open: false,
                fail_bind: None,
                fail_writes: false,
            })),
        }
    }

    pub fn transport(&self) -> RecordingTransport {
        RecordingTransport {
            state: Rc::clone(&self.state),
        }
    }

    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay {
            state: Rc::clone(&self.state),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn controller(&self) -> Controller {
        self.state.borrow().controller.clone()
    }

    /// Forget everything logged so far, keeping RAM contents
    pub fn reset_log(&self) {
        let mut state = self.state.borrow_mut();
        state.events.clear();
        state.controller.writes.clear();
    }

    pub fn fail_open(&self) {
        self.state.borrow_mut().fail_open = true;
    }

    pub fn fail_bind(&self, signal: Signal) {
        self.state.borrow_mut().fail_bind = Some(signal);
    }

    pub fn fail_writes(&self) {
        self.state.borrow_mut().fail_writes = true;
    }
}

pub struct RecordingTransport {
    state: Rc<RefCell<State>>,
}

impl SignalTransport for RecordingTransport {
    fn open(&mut self, _driver: &str) -> Result<(), DisplayError> {
        let mut state = self.state.borrow_mut();
        if state.fail_open {
            return Err(DisplayError::BusWriteError);
        }
        state.events.push(Event::Open);
        Ok(())
    }

    fn close(&mut self) -> Result<(), DisplayError> {
        self.state.borrow_mut().events.push(Event::Close);
        Ok(())
    }

    fn bind(&mut self, signal: Signal, line: ControlLine) -> Result<Signals, DisplayError> {
        let mut state = self.state.borrow_mut();
        if state.fail_bind == Some(signal) {
            return Err(DisplayError::RSError);
        }
        let mask = Signals::line(line);
        state.bindings.push((signal, mask));
        state.events.push(Event::Bind { signal, line });
        Ok(mask)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), DisplayError> {
        self.state.borrow_mut().events.push(Event::Direction(direction));
        Ok(())
    }

    fn set_data(&mut self, byte: u8) -> Result<(), DisplayError> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(DisplayError::BusWriteError);
        }
        state.data = byte;
        state.events.push(Event::Data(byte));
        Ok(())
    }

    fn set_control(&mut self, mask: Signals, value: Signals) -> Result<(), DisplayError> {
        let mut state = self.state.borrow_mut();
        let kept = state.levels.bits() & !mask.bits();
        state.levels = Signals::from_bits(kept | (value.bits() & mask.bits()));
        state.events.push(Event::Control { mask, value });
        Ok(())
    }

    fn pulse_low(&mut self, signals: Signals, width_ns: u32) -> Result<(), DisplayError> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Pulse { signals, width_ns });
        let cs1 = state.bound(Signal::ChipSelect);
        if cs1 != Signals::NONE && signals.contains(cs1) {
            let a0 = state.bound(Signal::AddressSelect);
            let data = a0 != Signals::NONE && state.levels.contains(a0);
            let byte = state.data;
            state.controller.latch(byte, data);
        }
        Ok(())
    }
}

pub struct RecordingDelay {
    state: Rc<RefCell<State>>,
}

impl RecordingDelay {
    fn record(&mut self, ns: u64) {
        self.state.borrow_mut().events.push(Event::Delay { ns });
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms) * 1_000_000);
    }
}
