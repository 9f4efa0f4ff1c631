//! Timing contracts of the SED1560 parallel interface.
//!
//! These are minimums taken from the controller data sheet. They are not
//! tuning knobs: shortening any of them makes the controller miss bytes.

/// Address setup (10 ns) and data setup (20 ns) before the strobe.
pub const DATA_SETUP_NS: u32 = 20;

/// Low width of the chip-select strobe.
pub const STROBE_PULSE_NS: u32 = 22;

/// Address and data hold after the strobe rises again.
pub const HOLD_NS: u32 = 10;

/// Minimum low time of the reset line.
pub const RESET_PULSE_US: u32 = 1;

/// Settling time after releasing reset.
pub const RESET_SETTLE_US: u32 = 100;

/// Settling time after the software reset command.
pub const SOFTWARE_RESET_SETTLE_MS: u8 = 20;

/// Settling time of the internal power supply.
pub const POWER_SETTLE_MS: u8 = 100;
