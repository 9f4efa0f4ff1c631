//! Pollin LPH7508 Graphic LCD Driver
//!
//! The LPH7508 is a 100x64 pixel monochrome panel with a SED1560 controller,
//! usually hooked up to a PC parallel port. This driver keeps two shadow
//! images of the controller RAM and only sends the bytes that changed since
//! the last update.
//!
//! ## Architecture
//!
//! - **Transport** ([`interface::SignalTransport`]) drives the physical lines.
//!   Bring your own (a parallel port) or use [`gpio::GpioTransport`] on plain
//!   `embedded-hal` pins.
//! - **Driver** ([`driver::Lph7508`]) runs the controller bring-up and turns
//!   changed regions of a pixel grid into page/column addressed writes.
//! - **Pixel grid** ([`framebuffer::PixelSource`]) is whatever the renderer
//!   draws into; [`framebuffer::Framebuffer`] is a ready-made one that also
//!   implements `embedded-graphics`' `DrawTarget` with the `graphics` feature.
//!
//! ## Usage
//!
//! ```rust, ignore
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X9, MonoTextStyle},
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     text::Text,
//! };
//! use lph7508::prelude::*;
//!
//! let transport = GpioTransport::new(data_pins, control_pins, Delay::new());
//! let mut lcd = Lph7508::new(transport, Delay::new(), &Config::default())?;
//! let mut fb = Framebuffer::new();
//!
//! Text::new("hello", Point::new(0, 8), MonoTextStyle::new(&FONT_6X9, BinaryColor::On))
//!     .draw(&mut fb)?;
//! lcd.flush(&mut fb)?;
//!
//! lcd.contrast(20)?;
//! ```
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![allow(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cmd;
pub mod config;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod gpio;
pub mod interface;
pub mod memory;
pub mod timing;

mod flag;

#[cfg(test)]
mod mock;

/// Driver name used in diagnostics and when opening the transport
pub const NAME: &str = "LPH7508";

/// Visible pixel rows
pub const DISPLAY_ROWS: usize = 64;

/// Visible pixel columns
pub const DISPLAY_COLS: usize = 100;

/// Pages of 8 rows the controller addresses
pub const PAGES: usize = 8;

/// Controller rows covered by [`PAGES`]
pub const SROWS: usize = PAGES * 8;

/// Controller columns per page
pub const SCOLS: usize = 166;

/// Size of one shadow image: every page plus the symbol page
pub const BUFFER_LEN: usize = (PAGES + 1) * SCOLS;

/// Useful exports
pub mod prelude {
    pub use crate::config::{Config, Font, Wiring};
    pub use crate::driver::Lph7508;
    pub use crate::error::{ConfigError, Error};
    pub use crate::framebuffer::{Framebuffer, PixelSource, Region};
    pub use crate::gpio::GpioTransport;
    pub use crate::interface::{ControlLine, Signal, SignalTransport, Signals};
}
