use core::fmt;

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

/// Number of control actions in the closed action set.
pub const ACTION_COUNT: usize = 12;

/// The closed set of control actions an agent can issue.
///
/// Discriminants are the wire codes consumed by external policies and the
/// network protocol. They are part of the contract and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActionCode {
    /// Do nothing this step.
    Skip = 0,
    SafetyRodsUp = 1,
    SafetyRodsDown = 2,
    SustainRodsUp = 3,
    SustainRodsMedium = 4,
    SustainRodsDown = 5,
    FuelRodsUp = 6,
    FuelRodsDown = 7,
    RegulatoryRodsUp = 8,
    RegulatoryRodsMedium = 9,
    RegulatoryRodsDown = 10,
    /// Top up the steam generator with 60 m³ of water.
    AddWater = 11,
}

impl ActionCode {
    /// Every action, in wire-code order.
    pub const ALL: [ActionCode; ACTION_COUNT] = [
        ActionCode::Skip,
        ActionCode::SafetyRodsUp,
        ActionCode::SafetyRodsDown,
        ActionCode::SustainRodsUp,
        ActionCode::SustainRodsMedium,
        ActionCode::SustainRodsDown,
        ActionCode::FuelRodsUp,
        ActionCode::FuelRodsDown,
        ActionCode::RegulatoryRodsUp,
        ActionCode::RegulatoryRodsMedium,
        ActionCode::RegulatoryRodsDown,
        ActionCode::AddWater,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code. Returns `None` for codes outside the action set.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionCode::Skip => "skip",
            ActionCode::SafetyRodsUp => "safety-up",
            ActionCode::SafetyRodsDown => "safety-down",
            ActionCode::SustainRodsUp => "sustain-up",
            ActionCode::SustainRodsMedium => "sustain-medium",
            ActionCode::SustainRodsDown => "sustain-down",
            ActionCode::FuelRodsUp => "fuel-up",
            ActionCode::FuelRodsDown => "fuel-down",
            ActionCode::RegulatoryRodsUp => "regulatory-up",
            ActionCode::RegulatoryRodsMedium => "regulatory-medium",
            ActionCode::RegulatoryRodsDown => "regulatory-down",
            ActionCode::AddWater => "add-water",
        }
    }

    /// Parse a CLI-style action name (as produced by [`ActionCode::name`]).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }
}

// `ALL` and the wire codes must stay in lockstep.
const_assert_eq!(ActionCode::ALL.len(), ACTION_COUNT);
const_assert_eq!(ActionCode::AddWater as usize, ACTION_COUNT - 1);

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for ActionCode {
    type Error = crate::error::PlantError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(crate::error::PlantError::InvalidAction { code })
    }
}
