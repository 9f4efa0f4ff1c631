//! Parallel port signal transport and the two byte-level write primitives
use core::fmt;
use core::ops::BitOr;

pub use display_interface::DisplayError;

use embedded_hal::delay::DelayNs;

use crate::timing;

/// Logical signals of the LPH7508 connector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Controller reset, active low
    Reset,
    /// Chip select, strobed low to latch a byte
    ChipSelect,
    /// Read/write select, low for writes
    ReadWrite,
    /// Address select: low for commands, high for display data
    AddressSelect,
}

impl Signal {
    /// All signals in binding order
    pub const ALL: [Signal; 4] = [
        Signal::Reset,
        Signal::ChipSelect,
        Signal::ReadWrite,
        Signal::AddressSelect,
    ];

    /// Name of the signal as it appears on the connector and in configuration
    pub const fn name(self) -> &'static str {
        match self {
            Signal::Reset => "RES",
            Signal::ChipSelect => "CS1",
            Signal::ReadWrite => "RW",
            Signal::AddressSelect => "A0",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Control lines of a PC-style parallel port
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlLine {
    /// nSTROBE, pin 1
    Strobe,
    /// nAUTOFD, pin 14
    AutoFd,
    /// nINIT, pin 16
    Init,
    /// nSLCTIN, pin 17
    SlctIn,
}

impl ControlLine {
    /// Look up a control line by its configuration name, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        [
            ControlLine::Strobe,
            ControlLine::AutoFd,
            ControlLine::Init,
            ControlLine::SlctIn,
        ]
        .into_iter()
        .find(|line| line.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Configuration name of the line
    pub const fn name(self) -> &'static str {
        match self {
            ControlLine::Strobe => "STROBE",
            ControlLine::AutoFd => "AUTOFD",
            ControlLine::Init => "INIT",
            ControlLine::SlctIn => "SLCTIN",
        }
    }

    /// Position of the line in the port's control register
    pub const fn index(self) -> usize {
        match self {
            ControlLine::Strobe => 0,
            ControlLine::AutoFd => 1,
            ControlLine::Init => 2,
            ControlLine::SlctIn => 3,
        }
    }
}

impl fmt::Display for ControlLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque handle for one or more bound control signals.
///
/// Transports hand these out from [`SignalTransport::bind`]; the driver only
/// combines and passes them back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Signals(u8);

impl Signals {
    /// No signal at all
    pub const NONE: Signals = Signals(0);

    /// Handle for a single control line
    pub const fn line(line: ControlLine) -> Self {
        Signals(1 << line.index())
    }

    #[cfg(test)]
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Signals(bits)
    }

    /// Raw bit mask, one bit per [`ControlLine::index`]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every signal in `other` is part of `self`
    pub const fn contains(self, other: Signals) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Signals {
    type Output = Signals;

    fn bitor(self, rhs: Signals) -> Signals {
        Signals(self.0 | rhs.0)
    }
}

/// Data line direction of the transport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Data lines are driven by the host only
    WriteOnly,
    /// Data lines may be read back
    Bidirectional,
}

/// The physical transport the controller hangs off.
///
/// Implementations drive real lines (a parallel port, GPIO pins). Every
/// method is fatal on error: a byte that may or may not have been latched
/// cannot be retried without desynchronizing the controller.
pub trait SignalTransport {
    /// Claim the transport on behalf of `driver`
    fn open(&mut self, driver: &str) -> Result<(), DisplayError>;

    /// Release the transport
    fn close(&mut self) -> Result<(), DisplayError>;

    /// Bind a logical signal to a physical control line
    fn bind(&mut self, signal: Signal, line: ControlLine) -> Result<Signals, DisplayError>;

    /// Set the data line direction
    fn set_direction(&mut self, direction: Direction) -> Result<(), DisplayError>;

    /// Put `byte` on the eight data lines
    fn set_data(&mut self, byte: u8) -> Result<(), DisplayError>;

    /// Drive the signals in `mask` high where set in `value`, low elsewhere
    fn set_control(&mut self, mask: Signals, value: Signals) -> Result<(), DisplayError>;

    /// Pull `signals` low for `width_ns` nanoseconds, then release them high
    fn pulse_low(&mut self, signals: Signals, width_ns: u32) -> Result<(), DisplayError>;
}

/// Handles of the four bound signals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bindings {
    /// `RES`
    pub res: Signals,
    /// `CS1`
    pub cs1: Signals,
    /// `RW`
    pub rw: Signals,
    /// `A0`
    pub a0: Signals,
}

impl Bindings {
    /// Every bound signal
    pub fn all(&self) -> Signals {
        self.res | self.cs1 | self.rw | self.a0
    }
}

/// Byte-level framing on top of a [`SignalTransport`]
pub struct ParallelInterface<T, DELAY> {
    transport: T,
    delay: DELAY,
    signals: Bindings,
}

impl<T, DELAY> ParallelInterface<T, DELAY>
where
    T: SignalTransport,
    DELAY: DelayNs,
{
    /// Wrap an opened transport with its bound signals
    pub fn new(transport: T, delay: DELAY, signals: Bindings) -> Self {
        ParallelInterface {
            transport,
            delay,
            signals,
        }
    }

    /// Raise every control signal and switch the data lines to output
    pub fn idle(&mut self) -> Result<(), DisplayError> {
        let all = self.signals.all();
        self.transport.set_control(all, all)?;
        self.transport.set_direction(Direction::WriteOnly)
    }

    /// Pulse `RES` low and wait for the controller to come out of reset
    pub fn hard_reset(&mut self) -> Result<(), DisplayError> {
        let res = self.signals.res;
        self.transport.set_control(res, Signals::NONE)?;
        self.delay.delay_us(timing::RESET_PULSE_US);
        self.transport.set_control(res, res)?;
        self.delay.delay_us(timing::RESET_SETTLE_US);
        Ok(())
    }

    /// Latch `byte` into the command interpreter
    pub fn write_ctrl(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write(byte, Signals::NONE)
    }

    /// Latch `byte` into display RAM at the current page and column
    pub fn write_data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write(byte, self.signals.a0)
    }

    // CS1 high, RW low, A0 as requested, then strobe CS1
    fn write(&mut self, byte: u8, a0: Signals) -> Result<(), DisplayError> {
        let Bindings { cs1, rw, a0: a0_mask, .. } = self.signals;
        self.transport.set_data(byte)?;
        self.transport.set_control(cs1 | rw | a0_mask, cs1 | a0)?;
        self.delay.delay_ns(timing::DATA_SETUP_NS);
        self.transport.pulse_low(cs1, timing::STROBE_PULSE_NS)?;
        self.delay.delay_ns(timing::HOLD_NS);
        Ok(())
    }

    /// Wait for `ms` milliseconds of controller settling time
    pub fn settle_ms(&mut self, ms: u8) {
        self.delay.delay_ms(u32::from(ms));
    }

    /// Close the transport and hand back its parts
    pub fn release(mut self) -> Result<(T, DELAY), DisplayError> {
        self.transport.close()?;
        Ok((self.transport, self.delay))
    }
}
