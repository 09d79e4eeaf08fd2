//! Static operating boundaries for the physical plant variables.
//!
//! Constructed once at simulator creation and immutable afterwards. The upper
//! bounds are detection thresholds, not clamps: temperature, pressure, and
//! water level are allowed to exceed them, which is exactly how anomalies are
//! detected. The lower bounds double as the "functioning values" thresholds
//! for reactor power.

use serde::{Deserialize, Serialize};

/// Inclusive safe operating range of one physical variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Safe operating boundaries for every monitored plant variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingLimits {
    /// Core water temperature, °C.
    pub temperature: Bounds,
    /// Core pressure, ATM.
    pub pressure: Bounds,
    /// Steam generator water level, m³.
    pub level: Bounds,
    /// Reactor power, MW.
    pub power: Bounds,
}

impl OperatingLimits {
    /// The standard plant envelope.
    pub const fn standard() -> Self {
        Self {
            temperature: Bounds::new(40.0, 380.0),
            pressure: Bounds::new(1.0, 220.0),
            level: Bounds::new(20.0, 140.0),
            power: Bounds::new(0.0, 1000.0),
        }
    }
}

impl Default for OperatingLimits {
    fn default() -> Self {
        Self::standard()
    }
}
