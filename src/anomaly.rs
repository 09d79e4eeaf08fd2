//! Boundary-violation detection.
//!
//! Checks are evaluated independently and accumulated: a single step can
//! report temperature, pressure, and one water-level finding at once. The two
//! level findings are mutually exclusive by construction.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::limits::OperatingLimits;

const MAX_FINDINGS: usize = 4;

/// One way a step can leave the safe operating envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyKind {
    TemperatureHigh,
    PressureHigh,
    LevelHigh,
    LevelLow,
}

impl AnomalyKind {
    pub fn message(self) -> &'static str {
        match self {
            AnomalyKind::TemperatureHigh => {
                "Core water temperature above the maximum allowed."
            }
            AnomalyKind::PressureHigh => "Core pressure above the maximum allowed.",
            AnomalyKind::LevelHigh => {
                "Steam generator water level above the maximum allowed."
            }
            AnomalyKind::LevelLow => {
                "Steam generator water level below the minimum allowed."
            }
        }
    }
}

/// All findings detected in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnomalyReport {
    findings: Vec<AnomalyKind, MAX_FINDINGS>,
}

impl AnomalyReport {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn findings(&self) -> &[AnomalyKind] {
        &self.findings
    }

    /// Finding messages in detection order, one per line. Empty when the step
    /// stayed inside the envelope.
    pub fn messages(&self) -> String {
        let mut out = String::new();
        for (i, finding) in self.findings.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(finding.message());
        }
        out
    }

    fn record(&mut self, kind: AnomalyKind) {
        // Capacity covers every distinct finding; a push can never fail here.
        let _ = self.findings.push(kind);
    }
}

/// Evaluate a post-delta reading against the operating limits.
pub fn detect(
    temperature: f64,
    pressure: f64,
    level: f64,
    limits: &OperatingLimits,
) -> AnomalyReport {
    let mut report = AnomalyReport::none();

    if temperature > limits.temperature.max {
        report.record(AnomalyKind::TemperatureHigh);
    }

    if pressure > limits.pressure.max {
        report.record(AnomalyKind::PressureHigh);
    }

    if level > limits.level.max {
        report.record(AnomalyKind::LevelHigh);
    } else if level < limits.level.min {
        report.record(AnomalyKind::LevelLow);
    }

    report
}
