//! Collaborator seams for external agents.
//!
//! The decision-tree learner and the partner-behavior predictor live outside
//! this crate; only the trait surfaces they are consumed through are defined
//! here, plus two trivial policies used by the CLI and the test suite.

use crate::action::ActionCode;
use crate::plant::Observation;

/// One agent-environment interaction, in the shape the external learner's
/// update call consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub previous: Observation,
    pub action: ActionCode,
    pub reward: f64,
    pub next: Observation,
    pub anomaly: bool,
}

/// A decision-making agent driving the plant.
pub trait Policy {
    fn select_action(&mut self, observation: &Observation) -> ActionCode;

    /// Feed one completed transition back into the agent.
    fn record_transition(&mut self, transition: &Transition);
}

/// A partner-behavior predictor consuming raw observations.
///
/// Prediction algorithms are out of scope; implementations live with the
/// collaborator that owns them.
pub trait BehaviorModel {
    fn add_observation(&mut self, observation: &Observation);

    fn predict(&self, observation: &Observation) -> Option<ActionCode>;
}

/// Does nothing, forever. Useful as a cold-shutdown baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipPolicy;

impl Policy for SkipPolicy {
    fn select_action(&mut self, _observation: &Observation) -> ActionCode {
        ActionCode::Skip
    }

    fn record_transition(&mut self, _transition: &Transition) {}
}

/// Plays a fixed action sequence once, then skips forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    sequence: Vec<ActionCode>,
    cursor: usize,
    recorded: usize,
}

impl ScriptedPolicy {
    pub fn new(sequence: Vec<ActionCode>) -> Self {
        Self {
            sequence,
            cursor: 0,
            recorded: 0,
        }
    }

    /// The standard startup sequence: raise the safety rods, then hold.
    pub fn startup() -> Self {
        Self::new(vec![ActionCode::SafetyRodsUp])
    }

    /// Number of transitions fed back so far.
    pub fn recorded(&self) -> usize {
        self.recorded
    }
}

impl Policy for ScriptedPolicy {
    fn select_action(&mut self, _observation: &Observation) -> ActionCode {
        match self.sequence.get(self.cursor) {
            Some(&action) => {
                self.cursor += 1;
                action
            }
            None => ActionCode::Skip,
        }
    }

    fn record_transition(&mut self, _transition: &Transition) {
        self.recorded += 1;
    }
}
