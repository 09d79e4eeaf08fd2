//! # Nuclear Power Plant Control-Environment Simulator
//!
//! A discrete-time simulation library modeling a nuclear power plant as a
//! control environment: an agent (human operator or automated policy) issues
//! one control action per step, and the environment updates the physical
//! state, detects unsafe conditions, and computes a reward/energy signal.
//!
//! ## Features
//!
//! - **Deterministic plant state machine**: temperature, pressure, water
//!   level, and reactor power driven by four rod banks
//! - **Anomaly detection**: boundary violations reported as first-class step
//!   results, never as errors
//! - **Reward shaping**: productive-streak bonuses, wasted-action discounts,
//!   and a flat anomaly penalty
//! - **Two-mode action contract**: permissive no-op pass-through for unknown
//!   codes, or strict rejection with a typed error
//! - **Agent seam**: `Policy` and `BehaviorModel` traits plus an episode
//!   runner for external learners
//! - **JSON line protocol**: size-bounded request/response framing for the
//!   TCP server and CLI binaries
//!
//! ## Quick Start
//!
//! ```rust
//! use nppsim::{ActionCode, PlantSimulator};
//!
//! let mut simulator = PlantSimulator::new();
//! let observation = simulator.reset();
//! assert_eq!(observation.power, 0.0);
//!
//! // Raise the safety rods: fission starts on this step.
//! let outcome = simulator.step(ActionCode::SafetyRodsUp);
//! assert!(outcome.info.had_effect);
//! assert!(!outcome.anomaly_detected);
//! assert!(outcome.reward > 0.0);
//! ```
//!
//! ## Architecture
//!
//! - [`plant`] - The plant state machine: `reset`, `step`, `observe`
//! - [`action`] - The closed 12-value control action set
//! - [`rods`] - Rod bank position enums with the historical wire polarity
//! - [`limits`] - Static operating boundaries
//! - [`anomaly`] - Boundary-violation detection and reporting
//! - [`policy`] - Collaborator traits for external decision-tree agents
//! - [`episode`] - Episode runner feeding observations and rewards to a policy
//! - [`protocol`] - JSON request/response framing for the network surface

pub mod action;
pub mod anomaly;
pub mod episode;
pub mod error;
pub mod limits;
pub mod plant;
pub mod policy;
pub mod protocol;
pub mod rods;

// Re-export main public types for convenience
pub use action::ActionCode;
pub use anomaly::{AnomalyKind, AnomalyReport};
pub use episode::{EpisodeRunner, EpisodeSummary};
pub use error::PlantError;
pub use limits::OperatingLimits;
pub use plant::{
    ActionMode, Observation, PlantSimulator, PlantState, SimulatorConfig, StepInfo, StepOutcome,
};
pub use policy::{BehaviorModel, Policy, ScriptedPolicy, SkipPolicy, Transition};
pub use rods::{BankPosition, RodPosition};
