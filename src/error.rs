//! Errors reported by the driver
use display_interface::DisplayError;
use thiserror::Error;

use crate::interface::Signal;

/// Problems with the driver configuration, found before the port is touched
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No font given
    #[error("no Font entry")]
    MissingFont,
    /// Font is not of the form `WxH` with positive dimensions
    #[error("bad Font")]
    MalformedFont,
    /// Font is well formed but the driver cannot render it
    #[error("bad Font {width}x{height} (only 6x8 at the moment)")]
    UnsupportedFont {
        /// Glyph width in pixels
        width: u16,
        /// Glyph height in pixels
        height: u16,
    },
    /// Wiring names a line the parallel port does not have
    #[error("unknown control line for signal {signal}")]
    UnknownLine {
        /// Signal whose wiring could not be resolved
        signal: Signal,
    },
    /// Two signals are wired to the same control line
    #[error("signals {signal} and {other} share a control line")]
    ConflictingWiring {
        /// Signal bound second
        signal: Signal,
        /// Signal already holding the line
        other: Signal,
    },
}

/// Fatal driver errors
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// Invalid configuration
    #[error("LPH7508: {0}")]
    Config(#[from] ConfigError),
    /// The transport could not be opened
    #[error("LPH7508: could not initialize parallel port ({0:?})")]
    Open(DisplayError),
    /// The transport refused to bind a signal
    #[error("LPH7508: could not bind signal {signal} ({cause:?})")]
    Bind {
        /// Signal being bound
        signal: Signal,
        /// Transport fault
        cause: DisplayError,
    },
    /// A write to the controller failed
    #[error("LPH7508: transport fault ({0:?})")]
    Transport(DisplayError),
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Transport(e)
    }
}
