//! T300-family vendor commands sent through the device send buffer.
//!
//! All builders are pure and allocation-free. The transport layer copies
//! the returned bytes to the start of a zero-filled interrupt OUT buffer.
//!
//! - **Range**: `08 11 lo hi`, value = `degrees * 0x3c` as LE16.
//! - **Gain**: `02 hi`, the high byte of the 16-bit host gain.
//! - **Autocenter**: `08 04 01 00` then `08 03 lo hi`.
//! - **Mode enter** (TMX): `01 04` then `01 05`.
//! - **Mode exit** (TMX): `01 05` then `01 00`.

#![deny(static_mut_refs)]

use serde::{Deserialize, Serialize};

pub mod commands {
    pub const MODE: u8 = 0x01;
    pub const GAIN: u8 = 0x02;
    pub const SETUP: u8 = 0x08;
}

pub mod setup_codes {
    pub const AUTOCENTER_LEVEL: u8 = 0x03;
    pub const AUTOCENTER_ENABLE: u8 = 0x04;
    pub const RANGE: u8 = 0x11;
}

/// Rotation-range units per degree.
pub const RANGE_UNITS_PER_DEGREE: u32 = 0x3C;

/// Two-byte mode-switch command.
pub type ModeCommand = [u8; 2];

/// Ordered two-step packet pair used to enter or leave active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePair {
    pub first: ModeCommand,
    pub second: ModeCommand,
}

impl ModePair {
    pub const fn new(first: ModeCommand, second: ModeCommand) -> Self {
        Self { first, second }
    }

    pub fn steps(&self) -> [ModeCommand; 2] {
        [self.first, self.second]
    }
}

/// Mode-enter and mode-exit packet pairs for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSwitch {
    pub enter: ModePair,
    pub exit: ModePair,
}

/// TMX active-mode switch.
pub const TMX_MODE_SWITCH: ModeSwitch = ModeSwitch {
    enter: ModePair::new([commands::MODE, 0x04], [commands::MODE, 0x05]),
    exit: ModePair::new([commands::MODE, 0x05], [commands::MODE, 0x00]),
};

/// Build the rotation range command for an already-clamped `degrees`.
///
/// The scaled value wraps at 16 bits the same way the firmware reads it;
/// callers clamp to the model bounds first.
pub fn build_range_command(degrees: u16) -> [u8; 4] {
    let scaled = u32::from(degrees).wrapping_mul(RANGE_UNITS_PER_DEGREE);
    let [lo, hi, ..] = scaled.to_le_bytes();
    [commands::SETUP, setup_codes::RANGE, lo, hi]
}

/// Build the device gain command from a 16-bit host gain.
pub fn build_gain_command(gain: u16) -> [u8; 2] {
    let [_, hi] = gain.to_le_bytes();
    [commands::GAIN, hi]
}

/// Build the two-step autocenter sequence.
pub fn build_autocenter_commands(level: u16) -> [[u8; 4]; 2] {
    let [lo, hi] = level.to_le_bytes();
    [
        [commands::SETUP, setup_codes::AUTOCENTER_ENABLE, 0x01, 0x00],
        [commands::SETUP, setup_codes::AUTOCENTER_LEVEL, lo, hi],
    ]
}
