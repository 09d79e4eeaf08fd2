//! Episode runner: the loop that feeds observations to a [`Policy`] and
//! transitions back into it.
//!
//! The simulator itself never terminates an episode; the runner is the caller
//! that decides, stopping at a step budget or on the first anomaly.

use tracing::{debug, info};

use crate::plant::{Observation, PlantSimulator};
use crate::policy::{Policy, Transition};

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub steps: u32,
    pub total_reward: f64,
    pub total_energy: f64,
    pub anomaly_tripped: bool,
    pub final_observation: Observation,
}

/// Drives one episode: reset, then up to `max_steps` policy-selected steps.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeRunner {
    max_steps: u32,
    stop_on_anomaly: bool,
}

impl EpisodeRunner {
    pub fn new(max_steps: u32) -> Self {
        Self {
            max_steps,
            stop_on_anomaly: true,
        }
    }

    /// Keep stepping through anomalies instead of ending the episode.
    pub fn continue_on_anomaly(mut self) -> Self {
        self.stop_on_anomaly = false;
        self
    }

    pub fn run<P: Policy>(&self, simulator: &mut PlantSimulator, policy: &mut P) -> EpisodeSummary {
        let mut observation = simulator.reset();
        let mut steps = 0u32;
        let mut total_reward = 0.0;
        let mut total_energy = 0.0;
        let mut anomaly_tripped = false;

        while steps < self.max_steps {
            let action = policy.select_action(&observation);
            let outcome = simulator.step(action);

            policy.record_transition(&Transition {
                previous: observation,
                action,
                reward: outcome.reward,
                next: outcome.observation,
                anomaly: outcome.anomaly_detected,
            });

            steps += 1;
            total_reward += outcome.reward;
            total_energy += outcome.info.energy;
            observation = outcome.observation;

            debug!(
                step = steps,
                action = %action,
                reward = outcome.reward,
                energy = outcome.info.energy,
                "episode step"
            );

            if outcome.anomaly_detected {
                anomaly_tripped = true;
                if self.stop_on_anomaly {
                    break;
                }
            }
        }

        info!(
            steps,
            total_reward, total_energy, anomaly_tripped, "episode finished"
        );

        EpisodeSummary {
            steps,
            total_reward,
            total_energy,
            anomaly_tripped,
            final_observation: observation,
        }
    }
}
