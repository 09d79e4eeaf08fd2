//! Rod bank positions.
//!
//! The wire encoding is historical and load-bearing: code 0 is always UP and
//! the codes grow downward. Polarity differs per bank — safety rods suppress
//! fission when DOWN, fuel rods suppress fission when UP — so the meaning of
//! a position is defined by the bank it belongs to, not by this module.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Position of a two-position rod bank (safety and fuel rods).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RodPosition {
    Up = 0,
    Down = 1,
}

impl RodPosition {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code.
    ///
    /// Panics on out-of-range codes: rod state is produced exclusively by the
    /// closed action set, so a bad code here is a programmer error, not input.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => RodPosition::Up,
            1 => RodPosition::Down,
            _ => panic!("rod position code {code} out of range"),
        }
    }
}

/// Position of a three-position rod bank (sustain and regulatory rods).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BankPosition {
    Up = 0,
    Medium = 1,
    Down = 2,
}

impl BankPosition {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code. Panics on out-of-range codes, as
    /// [`RodPosition::from_code`] does.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => BankPosition::Up,
            1 => BankPosition::Medium,
            2 => BankPosition::Down,
            _ => panic!("bank position code {code} out of range"),
        }
    }
}

impl fmt::Display for RodPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RodPosition::Up => f.write_str("up"),
            RodPosition::Down => f.write_str("down"),
        }
    }
}

impl fmt::Display for BankPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankPosition::Up => f.write_str("up"),
            BankPosition::Medium => f.write_str("medium"),
            BankPosition::Down => f.write_str("down"),
        }
    }
}
