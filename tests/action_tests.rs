use nppsim::action::{ActionCode, ACTION_COUNT};
use nppsim::rods::{BankPosition, RodPosition};
use nppsim::{PlantError, PlantSimulator};

#[cfg(test)]
mod code_tests {
    use super::*;

    #[test]
    fn test_wire_codes_round_trip() {
        for action in ActionCode::ALL {
            assert_eq!(ActionCode::from_code(action.code()), Some(action));
        }
    }

    #[test]
    fn test_names_round_trip() {
        for action in ActionCode::ALL {
            assert_eq!(ActionCode::from_name(action.name()), Some(action));
        }
    }

    #[test]
    fn test_codes_are_dense_and_ordered() {
        for (index, action) in ActionCode::ALL.iter().enumerate() {
            assert_eq!(action.code() as usize, index);
        }
        assert_eq!(ActionCode::ALL.len(), ACTION_COUNT);
    }

    #[test]
    fn test_out_of_range_codes_are_rejected() {
        assert_eq!(ActionCode::from_code(12), None);
        assert_eq!(ActionCode::from_code(99), None);
        assert_eq!(ActionCode::from_code(255), None);

        let err = ActionCode::try_from(99u8).unwrap_err();
        assert_eq!(err, PlantError::InvalidAction { code: 99 });
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert_eq!(ActionCode::from_name("scram"), None);
        assert_eq!(ActionCode::from_name(""), None);
    }

    #[test]
    fn test_display_matches_cli_names() {
        assert_eq!(ActionCode::Skip.to_string(), "skip");
        assert_eq!(ActionCode::AddWater.to_string(), "add-water");
        assert_eq!(ActionCode::RegulatoryRodsMedium.to_string(), "regulatory-medium");
    }
}

#[cfg(test)]
mod rod_code_tests {
    use super::*;

    #[test]
    fn test_rod_positions_keep_the_wire_encoding() {
        assert_eq!(RodPosition::Up.code(), 0);
        assert_eq!(RodPosition::Down.code(), 1);
        assert_eq!(BankPosition::Up.code(), 0);
        assert_eq!(BankPosition::Medium.code(), 1);
        assert_eq!(BankPosition::Down.code(), 2);

        assert_eq!(RodPosition::from_code(1), RodPosition::Down);
        assert_eq!(BankPosition::from_code(2), BankPosition::Down);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_rod_position_rejects_corrupt_codes() {
        RodPosition::from_code(2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_bank_position_rejects_corrupt_codes() {
        BankPosition::from_code(3);
    }
}

#[cfg(test)]
mod effect_classification_tests {
    use super::*;

    #[test]
    fn test_skip_and_water_always_have_effect() {
        let mut simulator = PlantSimulator::new();
        simulator.reset();

        assert!(simulator.step(ActionCode::Skip).info.had_effect);
        assert!(simulator.step(ActionCode::Skip).info.had_effect);

        simulator.reset();
        assert!(simulator.step(ActionCode::AddWater).info.had_effect);
    }

    #[test]
    fn test_rod_action_has_effect_only_when_position_changes() {
        let mut simulator = PlantSimulator::new();
        simulator.reset();

        // Safety rods start down: lowering them again changes nothing.
        assert!(!simulator.step(ActionCode::SafetyRodsDown).info.had_effect);
        assert!(simulator.step(ActionCode::SafetyRodsUp).info.had_effect);
        assert!(!simulator.step(ActionCode::SafetyRodsUp).info.had_effect);
    }

    #[test]
    fn test_three_position_banks_classify_against_target() {
        let mut simulator = PlantSimulator::new();
        simulator.reset();

        // Sustain rods start up.
        assert!(!simulator.step(ActionCode::SustainRodsUp).info.had_effect);
        assert!(simulator.step(ActionCode::SustainRodsMedium).info.had_effect);
        assert!(!simulator.step(ActionCode::SustainRodsMedium).info.had_effect);
        assert!(simulator.step(ActionCode::SustainRodsDown).info.had_effect);
        assert!(simulator.step(ActionCode::SustainRodsUp).info.had_effect);
    }

    #[test]
    fn test_classification_uses_the_pre_mutation_state() {
        let mut simulator = PlantSimulator::new();
        simulator.reset();
        simulator.step(ActionCode::RegulatoryRodsMedium);

        // The step that moves the bank is the one that counts as effective;
        // the repeat right after it is not.
        assert!(simulator.step(ActionCode::RegulatoryRodsDown).info.had_effect);
        assert!(!simulator.step(ActionCode::RegulatoryRodsDown).info.had_effect);
    }
}
