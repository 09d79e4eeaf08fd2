use thiserror::Error;

/// Errors the simulator can return to its caller.
///
/// Anomalies are deliberately absent: a boundary violation is an expected,
/// recoverable-by-reset step outcome, reported through the step result.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlantError {
    /// A raw action code outside the closed action set, rejected in strict
    /// mode. Permissive mode treats the same code as a no-op pass-through.
    #[error("unknown action code {code}")]
    InvalidAction { code: u8 },
}
