//! The plant state machine.
//!
//! `PlantSimulator` is single-threaded, synchronous, and deterministic given
//! state and action. Each `step` runs a fixed pipeline: effect classification
//! against the pre-mutation state, discrete control mutation, physical delta
//! computation from the post-mutation rods, anomaly detection, reactor power
//! and energy derivation, and reward shaping. Callers embedding it in a
//! multi-threaded host must serialize access externally.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::ActionCode;
use crate::anomaly;
use crate::error::PlantError;
use crate::limits::OperatingLimits;
use crate::rods::{BankPosition, RodPosition};

/// Operational floor for core water temperature, °C. Post-delta values below
/// it are pulled back up; this is distinct from the 40 °C envelope minimum.
const TEMPERATURE_FLOOR_C: f64 = 80.0;
/// Operational floor for core pressure, ATM.
const PRESSURE_FLOOR_ATM: f64 = 1.0;
const INITIAL_LEVEL_M3: f64 = 120.0;
/// Water added to the steam generator by a single top-up action.
const WATER_TOP_UP_M3: f64 = 60.0;
/// Reactor power lost per elapsed step.
const POWER_DECAY_MW_PER_STEP: f64 = 5.5;
/// Power contribution of one sustain/regulatory notch.
const BANK_POWER_STEP_MW: f64 = 200.0;
/// Divisor converting reactor power to per-step energy output.
const ENERGY_DIVISOR: f64 = 360.0;
/// Reward multiplier for actions that changed nothing observable.
const NO_EFFECT_DISCOUNT: f64 = 0.33;
/// Flat reward for any step that trips an anomaly.
const ANOMALY_PENALTY: f64 = -100.0;

/// How `step_code` treats raw codes outside the closed action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionMode {
    /// Unknown codes are a no-op that still runs the physics pipeline.
    #[default]
    Permissive,
    /// Unknown codes are rejected with [`PlantError::InvalidAction`] without
    /// touching the state.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub action_mode: ActionMode,
    pub limits: OperatingLimits,
}

/// The full mutable plant state. Owned exclusively by [`PlantSimulator`];
/// read access goes through [`PlantSimulator::state`] or the observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantState {
    pub core_water_temperature: f64,
    pub core_pressure: f64,
    pub steam_generator_water_level: f64,
    /// Recomputed from the control positions every step, never accumulated.
    pub reactor_power: f64,
    /// DOWN suppresses fission.
    pub safety_rods: RodPosition,
    pub sustain_rods: BankPosition,
    /// UP suppresses fission; energy flows only when DOWN.
    pub fuel_rods: RodPosition,
    pub regulatory_rods: BankPosition,
    pub step_count: u32,
    /// Consecutive steps with positive energy and no anomaly.
    pub consecutive_productive_steps: u32,
    /// Raw code of the last step's action, unknown codes included.
    /// Informational only.
    pub previous_action: Option<u8>,
}

impl PlantState {
    pub fn initial() -> Self {
        Self {
            core_water_temperature: TEMPERATURE_FLOOR_C,
            core_pressure: PRESSURE_FLOOR_ATM,
            steam_generator_water_level: INITIAL_LEVEL_M3,
            reactor_power: 0.0,
            safety_rods: RodPosition::Down,
            sustain_rods: BankPosition::Up,
            fuel_rods: RodPosition::Down,
            regulatory_rods: BankPosition::Up,
            step_count: 0,
            consecutive_productive_steps: 0,
            previous_action: None,
        }
    }
}

/// Snapshot of the observable plant features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub temperature: f64,
    pub pressure: f64,
    pub level: f64,
    pub power: f64,
    pub safety_rods: RodPosition,
    pub sustain_rods: BankPosition,
    pub fuel_rods: RodPosition,
    pub regulatory_rods: BankPosition,
}

impl Observation {
    /// The canonical flat feature vector consumed by external learners:
    /// temperature, pressure, level, power, safety, sustain, fuel, regulatory.
    pub fn as_features(&self) -> [f64; 8] {
        [
            self.temperature,
            self.pressure,
            self.level,
            self.power,
            f64::from(self.safety_rods.code()),
            f64::from(self.sustain_rods.code()),
            f64::from(self.fuel_rods.code()),
            f64::from(self.regulatory_rods.code()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Whether the action changed an observable control, classified against
    /// the pre-mutation state.
    pub had_effect: bool,
    /// Energy produced this step.
    pub energy: f64,
    /// Finding messages, one per line; empty when no anomaly.
    pub anomaly_messages: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub anomaly_detected: bool,
    pub info: StepInfo,
}

/// The plant simulation state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantSimulator {
    state: PlantState,
    config: SimulatorConfig,
}

impl PlantSimulator {
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Self {
            state: PlantState::initial(),
            config,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn state(&self) -> &PlantState {
        &self.state
    }

    /// Replace the state with the initial values and return the observation.
    /// Never fails.
    pub fn reset(&mut self) -> Observation {
        self.state = PlantState::initial();
        debug!("plant reset to initial state");
        self.observe()
    }

    /// Current observation, without mutation.
    pub fn observe(&self) -> Observation {
        Observation {
            temperature: self.state.core_water_temperature,
            pressure: self.state.core_pressure,
            level: self.state.steam_generator_water_level,
            power: self.state.reactor_power,
            safety_rods: self.state.safety_rods,
            sustain_rods: self.state.sustain_rods,
            fuel_rods: self.state.fuel_rods,
            regulatory_rods: self.state.regulatory_rods,
        }
    }

    /// Advance one step with a known action. Cannot fail: anomalies are part
    /// of the outcome, not errors.
    pub fn step(&mut self, action: ActionCode) -> StepOutcome {
        self.advance(Some(action), action.code())
    }

    /// Advance one step from a raw wire code.
    ///
    /// Unknown codes are rejected in strict mode without touching the state;
    /// in permissive mode they run the pipeline as a mutation-free no-op.
    pub fn step_code(&mut self, code: u8) -> Result<StepOutcome, PlantError> {
        match ActionCode::from_code(code) {
            Some(action) => Ok(self.advance(Some(action), code)),
            None => match self.config.action_mode {
                ActionMode::Strict => Err(PlantError::InvalidAction { code }),
                ActionMode::Permissive => {
                    warn!(code, "ignoring unknown action code");
                    Ok(self.advance(None, code))
                }
            },
        }
    }

    /// The step pipeline. `action` is `None` only for permissive-mode unknown
    /// codes, which classify as no-effect and mutate nothing.
    fn advance(&mut self, action: Option<ActionCode>, raw_code: u8) -> StepOutcome {
        let had_effect = action.is_some_and(|a| self.classify_effect(a));

        if let Some(action) = action {
            self.apply_action(action);
        }

        let (d_temperature, d_pressure, d_level) = self.compute_deltas();
        self.apply_deltas(d_temperature, d_pressure, d_level);

        let report = anomaly::detect(
            self.state.core_water_temperature,
            self.state.core_pressure,
            self.state.steam_generator_water_level,
            &self.config.limits,
        );

        self.update_reactor_power();
        let energy = self.compute_energy();
        self.update_streak(energy, report.any());
        let reward = self.compute_reward(report.any(), energy, had_effect);

        self.state.step_count += 1;
        self.state.previous_action = Some(raw_code);

        if report.any() {
            warn!(
                step = self.state.step_count,
                findings = report.findings().len(),
                "anomaly detected"
            );
        } else {
            debug!(
                step = self.state.step_count,
                action = raw_code,
                had_effect,
                energy,
                reward,
                "step complete"
            );
        }

        StepOutcome {
            observation: self.observe(),
            reward,
            anomaly_detected: report.any(),
            info: StepInfo {
                had_effect,
                energy,
                anomaly_messages: report.messages(),
            },
        }
    }

    /// Whether the action would change an observable control, evaluated
    /// against the pre-mutation state. Skip and water top-up always count.
    fn classify_effect(&self, action: ActionCode) -> bool {
        let s = &self.state;
        match action {
            ActionCode::Skip | ActionCode::AddWater => true,
            ActionCode::SafetyRodsUp => s.safety_rods != RodPosition::Up,
            ActionCode::SafetyRodsDown => s.safety_rods != RodPosition::Down,
            ActionCode::SustainRodsUp => s.sustain_rods != BankPosition::Up,
            ActionCode::SustainRodsMedium => s.sustain_rods != BankPosition::Medium,
            ActionCode::SustainRodsDown => s.sustain_rods != BankPosition::Down,
            ActionCode::FuelRodsUp => s.fuel_rods != RodPosition::Up,
            ActionCode::FuelRodsDown => s.fuel_rods != RodPosition::Down,
            ActionCode::RegulatoryRodsUp => s.regulatory_rods != BankPosition::Up,
            ActionCode::RegulatoryRodsMedium => s.regulatory_rods != BankPosition::Medium,
            ActionCode::RegulatoryRodsDown => s.regulatory_rods != BankPosition::Down,
        }
    }

    /// Apply the action's discrete effect on exactly one control field.
    fn apply_action(&mut self, action: ActionCode) {
        let s = &mut self.state;
        match action {
            ActionCode::Skip => {}
            ActionCode::SafetyRodsUp => s.safety_rods = RodPosition::Up,
            ActionCode::SafetyRodsDown => s.safety_rods = RodPosition::Down,
            ActionCode::SustainRodsUp => s.sustain_rods = BankPosition::Up,
            ActionCode::SustainRodsMedium => s.sustain_rods = BankPosition::Medium,
            ActionCode::SustainRodsDown => s.sustain_rods = BankPosition::Down,
            ActionCode::FuelRodsUp => s.fuel_rods = RodPosition::Up,
            ActionCode::FuelRodsDown => s.fuel_rods = RodPosition::Down,
            ActionCode::RegulatoryRodsUp => s.regulatory_rods = BankPosition::Up,
            ActionCode::RegulatoryRodsMedium => s.regulatory_rods = BankPosition::Medium,
            ActionCode::RegulatoryRodsDown => s.regulatory_rods = BankPosition::Down,
            ActionCode::AddWater => s.steam_generator_water_level += WATER_TOP_UP_M3,
        }
    }

    /// Physical deltas from the post-mutation rod positions.
    ///
    /// Fission takes place only with safety rods UP and fuel rods DOWN;
    /// otherwise the plant cools down and the water level holds.
    fn compute_deltas(&self) -> (f64, f64, f64) {
        let s = &self.state;

        if s.safety_rods == RodPosition::Down || s.fuel_rods == RodPosition::Up {
            return (-20.0, -20.0, 0.0);
        }

        let mut d_temperature = 30.0;
        let mut d_pressure = 20.0;
        let mut d_level = -8.0;

        match s.sustain_rods {
            BankPosition::Up => {}
            BankPosition::Medium => {
                d_temperature += 10.0;
                d_pressure += 5.0;
                d_level -= 4.0;
            }
            BankPosition::Down => {
                d_temperature += 20.0;
                d_pressure += 10.0;
                d_level -= 8.0;
            }
        }

        match s.regulatory_rods {
            BankPosition::Up => {}
            BankPosition::Medium => {
                d_temperature -= 10.0;
                d_pressure -= 5.0;
                d_level += 2.0;
            }
            BankPosition::Down => {
                d_temperature -= 20.0;
                d_pressure -= 10.0;
                d_level += 4.0;
            }
        }

        (d_temperature, d_pressure, d_level)
    }

    /// Apply the deltas, then pull temperature and pressure back up to their
    /// operational floors. No high-side clamp: overshooting the envelope is
    /// how anomalies are detected. The level has no floor.
    fn apply_deltas(&mut self, d_temperature: f64, d_pressure: f64, d_level: f64) {
        let s = &mut self.state;
        s.core_water_temperature += d_temperature;
        s.core_pressure += d_pressure;
        s.steam_generator_water_level += d_level;

        if s.core_water_temperature < TEMPERATURE_FLOOR_C {
            s.core_water_temperature = TEMPERATURE_FLOOR_C;
        }
        if s.core_pressure < PRESSURE_FLOOR_ATM {
            s.core_pressure = PRESSURE_FLOOR_ATM;
        }

        debug_assert!(
            s.core_water_temperature >= TEMPERATURE_FLOOR_C,
            "temperature {} below operational floor",
            s.core_water_temperature
        );
        debug_assert!(
            s.core_pressure >= PRESSURE_FLOOR_ATM,
            "pressure {} below operational floor",
            s.core_pressure
        );
    }

    /// Recompute reactor power from the current control positions.
    ///
    /// Zero whenever the safety rods are down or the functioning values
    /// (envelope minima for temperature and level) are not met; otherwise the
    /// decayed base power shifted by the sustain and regulatory banks.
    fn update_reactor_power(&mut self) {
        let limits = &self.config.limits;
        let s = &mut self.state;

        if s.safety_rods == RodPosition::Down {
            s.reactor_power = limits.power.min;
            return;
        }

        let functioning = s.core_water_temperature >= limits.temperature.min
            && s.steam_generator_water_level >= limits.level.min;
        if !functioning {
            s.reactor_power = limits.power.min;
            return;
        }

        let mut power = limits.power.max - POWER_DECAY_MW_PER_STEP * f64::from(s.step_count);

        power += match s.sustain_rods {
            BankPosition::Up => 0.0,
            BankPosition::Medium => BANK_POWER_STEP_MW,
            BankPosition::Down => 2.0 * BANK_POWER_STEP_MW,
        };
        power -= match s.regulatory_rods {
            BankPosition::Up => 0.0,
            BankPosition::Medium => BANK_POWER_STEP_MW,
            BankPosition::Down => 2.0 * BANK_POWER_STEP_MW,
        };

        s.reactor_power = power.clamp(limits.power.min, limits.power.max);
    }

    /// Energy flows only while the fuel rods are engaged (DOWN).
    fn compute_energy(&self) -> f64 {
        if self.state.fuel_rods == RodPosition::Down {
            self.state.reactor_power / ENERGY_DIVISOR
        } else {
            0.0
        }
    }

    fn update_streak(&mut self, energy: f64, anomaly_detected: bool) {
        if energy > 0.0 {
            self.state.consecutive_productive_steps += 1;
        } else {
            self.state.consecutive_productive_steps = 0;
        }
        if anomaly_detected {
            self.state.consecutive_productive_steps = 0;
        }
    }

    /// Anomalies override everything with a flat penalty; effective actions
    /// earn the streak-scaled energy; ineffective ones a discounted share.
    fn compute_reward(&self, anomaly_detected: bool, energy: f64, had_effect: bool) -> f64 {
        if anomaly_detected {
            ANOMALY_PENALTY
        } else if had_effect {
            energy * f64::from(self.state.consecutive_productive_steps + 1)
        } else {
            energy * NO_EFFECT_DISCOUNT
        }
    }
}

impl Default for PlantSimulator {
    fn default() -> Self {
        Self::new()
    }
}
