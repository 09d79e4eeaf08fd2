use nppsim::episode::EpisodeRunner;
use nppsim::plant::{Observation, PlantSimulator};
use nppsim::policy::{Policy, ScriptedPolicy, SkipPolicy, Transition};
use nppsim::ActionCode;

/// Test double that keeps every transition it is fed.
#[derive(Default)]
struct RecordingPolicy {
    script: Vec<ActionCode>,
    cursor: usize,
    transitions: Vec<Transition>,
}

impl RecordingPolicy {
    fn new(script: Vec<ActionCode>) -> Self {
        Self {
            script,
            cursor: 0,
            transitions: Vec::new(),
        }
    }
}

impl Policy for RecordingPolicy {
    fn select_action(&mut self, _observation: &Observation) -> ActionCode {
        let action = self
            .script
            .get(self.cursor)
            .copied()
            .unwrap_or(ActionCode::Skip);
        self.cursor += 1;
        action
    }

    fn record_transition(&mut self, transition: &Transition) {
        self.transitions.push(transition.clone());
    }
}

#[cfg(test)]
mod runner_tests {
    use super::*;

    #[test]
    fn test_startup_policy_produces_energy() {
        let mut simulator = PlantSimulator::new();
        let mut policy = ScriptedPolicy::startup();
        let summary = EpisodeRunner::new(5).run(&mut simulator, &mut policy);

        assert_eq!(summary.steps, 5);
        assert!(!summary.anomaly_tripped);
        assert!(summary.total_reward > 0.0);
        assert_eq!(policy.recorded(), 5);

        // Energies: (1000 + 994.5 + 989 + 983.5 + 978) / 360.
        let expected_energy = 4945.0 / 360.0;
        assert!((summary.total_energy - expected_energy).abs() < 1e-9);
    }

    #[test]
    fn test_skip_policy_idles_to_the_step_budget() {
        let mut simulator = PlantSimulator::new();
        let mut policy = SkipPolicy;
        let summary = EpisodeRunner::new(10).run(&mut simulator, &mut policy);

        assert_eq!(summary.steps, 10);
        assert!(!summary.anomaly_tripped);
        assert_eq!(summary.total_reward, 0.0);
        assert_eq!(summary.total_energy, 0.0);
        assert!((summary.final_observation.level - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_episode_stops_on_first_anomaly() {
        let mut simulator = PlantSimulator::new();
        let mut policy = ScriptedPolicy::new(vec![ActionCode::AddWater]);
        let summary = EpisodeRunner::new(20).run(&mut simulator, &mut policy);

        assert_eq!(summary.steps, 1);
        assert!(summary.anomaly_tripped);
        assert_eq!(summary.total_reward, -100.0);
        assert!((summary.final_observation.level - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_continue_on_anomaly_runs_the_full_budget() {
        let mut simulator = PlantSimulator::new();
        let mut policy = ScriptedPolicy::new(vec![ActionCode::AddWater]);
        let summary = EpisodeRunner::new(3)
            .continue_on_anomaly()
            .run(&mut simulator, &mut policy);

        // The overflow never drains without fission, so every step penalizes.
        assert_eq!(summary.steps, 3);
        assert!(summary.anomaly_tripped);
        assert_eq!(summary.total_reward, -300.0);
    }

    #[test]
    fn test_runner_resets_before_starting() {
        let mut simulator = PlantSimulator::new();
        simulator.step(ActionCode::SafetyRodsUp);
        simulator.step(ActionCode::Skip);

        let mut policy = SkipPolicy;
        let summary = EpisodeRunner::new(1).run(&mut simulator, &mut policy);

        // A fresh episode starts from the initial state, so a single skip
        // leaves the plant exactly there.
        assert!((summary.final_observation.temperature - 80.0).abs() < 1e-9);
        assert!((summary.final_observation.level - 120.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod transition_tests {
    use super::*;

    #[test]
    fn test_transitions_chain_observations() {
        let mut simulator = PlantSimulator::new();
        let mut policy = RecordingPolicy::new(vec![
            ActionCode::SafetyRodsUp,
            ActionCode::Skip,
            ActionCode::SustainRodsMedium,
        ]);
        EpisodeRunner::new(3).run(&mut simulator, &mut policy);

        assert_eq!(policy.transitions.len(), 3);

        // The first transition starts from the reset observation...
        let first = &policy.transitions[0];
        assert!((first.previous.temperature - 80.0).abs() < 1e-9);
        assert_eq!(first.action, ActionCode::SafetyRodsUp);
        assert!(first.reward > 0.0);
        assert!(!first.anomaly);

        // ...and each next observation is the following step's previous.
        for pair in policy.transitions.windows(2) {
            assert_eq!(pair[0].next, pair[1].previous);
        }
    }

    #[test]
    fn test_anomaly_is_flagged_in_the_recorded_transition() {
        let mut simulator = PlantSimulator::new();
        let mut policy = RecordingPolicy::new(vec![ActionCode::AddWater]);
        EpisodeRunner::new(5).run(&mut simulator, &mut policy);

        assert_eq!(policy.transitions.len(), 1);
        let transition = policy.transitions.last().unwrap();
        assert!(transition.anomaly);
        assert_eq!(transition.reward, -100.0);
    }
}
