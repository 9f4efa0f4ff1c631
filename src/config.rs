//! Driver configuration
//!
//! Everything here is checked before the parallel port is opened, so a bad
//! configuration never leaves the controller half initialized.
use log::{error, warn};

use crate::error::ConfigError;
use crate::flag::Flag;
use crate::interface::{ControlLine, Signal};
use crate::NAME;

/// Glyph size of the text font
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font {
    /// Glyph width in pixels
    pub width: u16,
    /// Glyph height in pixels
    pub height: u16,
}

impl Font {
    /// The only font the driver renders
    pub const SIZE_6X8: Font = Font {
        width: 6,
        height: 8,
    };

    /// Parse a `WxH` font description
    pub fn parse(text: &str) -> Result<Font, ConfigError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConfigError::MissingFont);
        }
        let (w, h) = text.split_once('x').ok_or(ConfigError::MalformedFont)?;
        let width: u16 = w.trim().parse().map_err(|_| ConfigError::MalformedFont)?;
        let height: u16 = h.trim().parse().map_err(|_| ConfigError::MalformedFont)?;
        if width < 1 || height < 1 {
            return Err(ConfigError::MalformedFont);
        }
        let font = Font { width, height };
        if font != Font::SIZE_6X8 {
            return Err(ConfigError::UnsupportedFont { width, height });
        }
        Ok(font)
    }

    /// Text cells (rows, columns) that fit into `rows` x `cols` pixels
    pub const fn cells(self, rows: usize, cols: usize) -> (usize, usize) {
        (rows / self.height as usize, cols / self.width as usize)
    }
}

/// Control line per logical signal, as configuration strings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wiring<'a> {
    /// `RES`
    pub res: &'a str,
    /// `CS1`
    pub cs1: &'a str,
    /// `RW`
    pub rw: &'a str,
    /// `A0`
    pub a0: &'a str,
}

impl Default for Wiring<'_> {
    /// Wiring of the Pollin parallel port adapter
    fn default() -> Self {
        Wiring {
            res: "INIT",
            cs1: "STROBE",
            rw: "SLCTIN",
            a0: "AUTOFD",
        }
    }
}

impl<'a> Wiring<'a> {
    fn get(&self, signal: Signal) -> &'a str {
        match signal {
            Signal::Reset => self.res,
            Signal::ChipSelect => self.cs1,
            Signal::ReadWrite => self.rw,
            Signal::AddressSelect => self.a0,
        }
    }

    /// Resolve every signal to a control line, in [`Signal::ALL`] order
    pub fn lines(&self) -> Result<[(Signal, ControlLine); 4], ConfigError> {
        let mut lines = [(Signal::Reset, ControlLine::Init); 4];
        for (i, signal) in Signal::ALL.into_iter().enumerate() {
            let name = self.get(signal);
            let line = ControlLine::parse(name).ok_or_else(|| {
                error!("{}: unknown control line '{}' for signal {}", NAME, name, signal);
                ConfigError::UnknownLine { signal }
            })?;
            if let Some(&(other, _)) = lines[..i].iter().find(|(_, l)| *l == line) {
                error!(
                    "{}: signals {} and {} are both wired to {}",
                    NAME, other, signal, line
                );
                return Err(ConfigError::ConflictingWiring { signal, other });
            }
            lines[i] = (signal, line);
        }
        Ok(lines)
    }
}

/// Driver configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config<'a> {
    /// Where the values came from, for diagnostics
    pub source: &'a str,
    /// Text font as `WxH`
    pub font: &'a str,
    /// Contrast to apply after initialization, `0..=31`
    pub contrast: Option<i32>,
    /// Signal wiring
    pub wiring: Wiring<'a>,
}

impl Default for Config<'_> {
    fn default() -> Self {
        Config {
            source: "defaults",
            font: "6x8",
            contrast: None,
            wiring: Wiring::default(),
        }
    }
}

impl<'a> Config<'a> {
    /// The configured font, if the driver supports it
    pub fn font(&self) -> Result<Font, ConfigError> {
        Font::parse(self.font).inspect_err(|e| match e {
            ConfigError::MissingFont => {
                error!("{}: no 'Font' entry from {}", NAME, self.source)
            }
            _ => error!("{}: bad Font '{}' from {}: {}", NAME, self.font, self.source, e),
        })
    }

    /// The configured contrast, if present and in range
    pub fn contrast(&self) -> Option<u8> {
        let value = self.contrast?;
        match u8::try_from(value) {
            Ok(v) if v <= Flag::CONTRAST_MAX => Some(v),
            _ => {
                warn!(
                    "{}: Contrast {} from {} out of range 0..{}, ignored",
                    NAME,
                    value,
                    self.source,
                    Flag::CONTRAST_MAX
                );
                None
            }
        }
    }
}
