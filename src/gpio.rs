//! [`SignalTransport`] over plain GPIO pins
//!
//! Eight output pins carry the data byte, four more stand in for the
//! parallel port's control lines. Only write-only operation is possible.
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use crate::interface::{ControlLine, Direction, DisplayError, Signal, SignalTransport, Signals};

/// Parallel port emulation on GPIO pins
pub struct GpioTransport<D, C, DELAY> {
    /// D0..D7
    data: [D; 8],
    /// Control pins in [`ControlLine::index`] order
    control: [C; 4],
    delay: DELAY,
    open: bool,
}

impl<D, C, DELAY> GpioTransport<D, C, DELAY>
where
    D: OutputPin,
    C: OutputPin,
    DELAY: DelayNs,
{
    /// Build a transport from data pins D0..D7 and the pins standing in for
    /// STROBE, AUTOFD, INIT and SLCTIN (in this order)
    pub fn new(data: [D; 8], control: [C; 4], delay: DELAY) -> Self {
        GpioTransport {
            data,
            control,
            delay,
            open: false,
        }
    }

    /// Give the pins back
    pub fn release(self) -> ([D; 8], [C; 4], DELAY) {
        (self.data, self.control, self.delay)
    }

    fn drive(&mut self, mask: Signals, value: Signals) -> Result<(), DisplayError> {
        for (i, pin) in self.control.iter_mut().enumerate() {
            let bit = 1 << i;
            if mask.bits() & bit == 0 {
                continue;
            }
            let level = if value.bits() & bit != 0 {
                pin.set_high()
            } else {
                pin.set_low()
            };
            level.map_err(|_| DisplayError::CSError)?;
        }
        Ok(())
    }
}

impl<D, C, DELAY> SignalTransport for GpioTransport<D, C, DELAY>
where
    D: OutputPin,
    C: OutputPin,
    DELAY: DelayNs,
{
    fn open(&mut self, driver: &str) -> Result<(), DisplayError> {
        debug!("opening GPIO transport for {}", driver);
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), DisplayError> {
        debug!("closing GPIO transport");
        self.open = false;
        Ok(())
    }

    fn bind(&mut self, signal: Signal, line: ControlLine) -> Result<Signals, DisplayError> {
        if !self.open {
            return Err(DisplayError::CSError);
        }
        debug!("binding {} to {}", signal, line);
        Ok(Signals::line(line))
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), DisplayError> {
        match direction {
            Direction::WriteOnly => Ok(()),
            Direction::Bidirectional => Err(DisplayError::DataFormatNotImplemented),
        }
    }

    fn set_data(&mut self, byte: u8) -> Result<(), DisplayError> {
        for (i, pin) in self.data.iter_mut().enumerate() {
            let level = if byte & (1 << i) != 0 {
                pin.set_high()
            } else {
                pin.set_low()
            };
            level.map_err(|_| DisplayError::BusWriteError)?;
        }
        Ok(())
    }

    fn set_control(&mut self, mask: Signals, value: Signals) -> Result<(), DisplayError> {
        self.drive(mask, value)
    }

    fn pulse_low(&mut self, signals: Signals, width_ns: u32) -> Result<(), DisplayError> {
        self.drive(signals, Signals::NONE)?;
        self.delay.delay_ns(width_ns);
        self.drive(signals, signals)
    }
}
