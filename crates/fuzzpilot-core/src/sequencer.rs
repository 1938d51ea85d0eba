//! Per-tick decision sequencing.
//!
//! One call to [`FuzzyController::decide`] runs the whole pipeline:
//! sense, fuzzify every input, evaluate every rule, defuzzify each channel,
//! gate thrust and fire against their thresholds, and pick the turn from
//! the ladder. Nothing carries over from one tick to the next.

use std::sync::Arc;

use fuzzpilot_types::{ActuatorCommand, Channel, CrispSignal, SensorSnapshot, Turn};
use serde::Serialize;
use tracing::{debug, debug_span};

use crate::config::{CompiledConfig, ConfigError, ControllerConfig};
use crate::defuzzify::defuzzify;
use crate::fuzzify::{FuzzyInputs, fuzzify};
use crate::rules::RuleStrength;
use crate::sensors::SensorFrame;

/// Errors raised while deciding a tick.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// A reading was absent and its input has no no-signal fallback.
    #[error("input {input} needs signal {signal} but it is absent and no fallback is configured")]
    MissingSignal {
        /// The input binding.
        input: String,
        /// The absent signal.
        signal: CrispSignal,
    },

    /// The snapshot violates the sensor contract.
    #[error("malformed sensor snapshot: {reason}")]
    MalformedSnapshot {
        /// What is wrong with the snapshot.
        reason: String,
    },

    /// The configuration is inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything one tick decided, plus a trace for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision<'c> {
    /// Simulation tick of the snapshot.
    pub tick: u64,
    /// Actuator command to apply.
    pub command: ActuatorCommand,
    /// Defuzzified thrust output before gating.
    pub thrust_output: f64,
    /// Defuzzified shoot output before gating.
    pub shoot_output: f64,
    /// Strength of every rule, in declaration order.
    pub rule_strengths: Vec<RuleStrength<'c>>,
    /// Ladder rung that chose the turn, if any fired.
    pub turn_rung: Option<&'c str>,
}

impl Decision<'_> {
    /// Strength of the named rule this tick.
    pub fn strength_of(&self, rule: &str) -> Option<f64> {
        self.rule_strengths
            .iter()
            .find(|s| s.rule == rule)
            .map(|s| s.strength)
    }
}

/// Memoryless fuzzy controller.
///
/// Cloning is cheap: clones share one immutable configuration, so every
/// agent instance can own its controller.
#[derive(Debug, Clone)]
pub struct FuzzyController {
    config: Arc<CompiledConfig>,
}

impl FuzzyController {
    /// Validate `config` and build a controller around it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by validation.
    pub fn new(config: &ControllerConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_compiled(Arc::new(config.compile()?)))
    }

    /// Build a controller around an already compiled configuration.
    pub const fn from_compiled(config: Arc<CompiledConfig>) -> Self {
        Self { config }
    }

    /// The shared configuration.
    pub fn config(&self) -> &CompiledConfig {
        &self.config
    }

    /// Decide one tick.
    ///
    /// # Errors
    ///
    /// [`DecisionError::MalformedSnapshot`] when the snapshot breaks the
    /// sensor contract, [`DecisionError::MissingSignal`] when a reading is
    /// absent and its input has no fallback.
    pub fn decide(&self, snapshot: &SensorSnapshot) -> Result<Decision<'_>, DecisionError> {
        let _span = debug_span!("decide", tick = snapshot.tick).entered();
        let config = self.config();

        let frame = SensorFrame::derive(snapshot, config.sensing())?;
        let inputs = fuzzify_inputs(config, &frame)?;

        let rules = config.rules();
        let evaluation = rules.evaluate(&inputs);
        let thrust = rules.output(Channel::Thrust);
        let shoot = rules.output(Channel::Shoot);
        let thrust_output = defuzzify(&evaluation.pairs(Channel::Thrust), thrust.default_value);
        let shoot_output = defuzzify(&evaluation.pairs(Channel::Shoot), shoot.default_value);

        let rung = config.ladder().select(&frame, &inputs);
        let command = ActuatorCommand {
            thrust: thrust_output > thrust.threshold,
            turn: rung.map_or(Turn::None, |r| r.turn),
            fire: shoot_output > shoot.threshold,
        };

        debug!(
            thrust_output,
            shoot_output,
            thrust = command.thrust,
            fire = command.fire,
            turn = command.turn.as_str(),
            rung = rung.map_or("none", |r| r.name.as_str()),
            "tick decided"
        );

        Ok(Decision {
            tick: snapshot.tick,
            command,
            thrust_output,
            shoot_output,
            rule_strengths: evaluation.into_strengths(),
            turn_rung: rung.map(|r| r.name.as_str()),
        })
    }

    /// Decide one tick and keep only the actuator command.
    ///
    /// # Errors
    ///
    /// Same as [`FuzzyController::decide`].
    pub fn command(&self, snapshot: &SensorSnapshot) -> Result<ActuatorCommand, DecisionError> {
        self.decide(snapshot).map(|decision| decision.command)
    }
}

/// Fuzzify every bound input, substituting fallbacks for absent readings.
fn fuzzify_inputs<'c>(config: &'c CompiledConfig, frame: &SensorFrame) -> Result<FuzzyInputs<'c>, DecisionError> {
    let bindings = config.registry().inputs();
    let mut inputs = FuzzyInputs::with_capacity(bindings.len());
    for binding in bindings {
        let set = if let Some(value) = frame.get(binding.signal()) {
            fuzzify(value, binding.variable())?
        } else {
            let fallback = binding
                .fallback_set()
                .ok_or_else(|| DecisionError::MissingSignal {
                    input: binding.name().to_owned(),
                    signal: binding.signal(),
                })?;
            debug!(input = binding.name(), signal = %binding.signal(), "signal absent, using fallback set");
            fallback
        };
        inputs.insert(binding.name(), set);
    }
    Ok(inputs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use fuzzpilot_types::FEELER_COUNT;

    use super::*;
    use crate::config::InputConfig;

    fn controller() -> FuzzyController {
        FuzzyController::new(&ControllerConfig::default()).unwrap()
    }

    fn snapshot() -> SensorSnapshot {
        let mut feelers = vec![700.0; FEELER_COUNT];
        feelers[0] = 1200.0;
        SensorSnapshot {
            tick: 7,
            heading_deg: 45.0,
            tracking_deg: 45.0,
            speed: 2.0,
            aim_deg: None,
            shot_alert: None,
            enemy_distance: None,
            feelers,
        }
    }

    #[test]
    fn clear_path_thrusts_without_turning() {
        let controller = controller();
        let decision = controller.decide(&snapshot()).unwrap();
        assert_eq!(decision.tick, 7);
        assert_eq!(decision.strength_of("thrust_clear_path"), Some(1.0));
        assert_eq!(decision.thrust_output, 1.0);
        assert!(decision.command.thrust);
        assert!(!decision.command.fire);
        assert_eq!(decision.command.turn, Turn::None);
        assert_eq!(decision.turn_rung, None);
    }

    #[test]
    fn absent_optional_readings_use_fallbacks() {
        let controller = controller();
        let decision = controller.decide(&snapshot()).unwrap();
        assert_eq!(decision.strength_of("thrust_evade_shot"), Some(0.0));
        assert_eq!(decision.strength_of("shoot_aligned_target"), Some(0.0));
        assert_eq!(decision.shoot_output, 0.0);
    }

    #[test]
    fn every_rule_is_traced() {
        let controller = controller();
        let decision = controller.decide(&snapshot()).unwrap();
        let names: Vec<&str> = decision.rule_strengths.iter().map(|s| s.rule).collect();
        assert_eq!(
            names,
            vec![
                "thrust_clear_path",
                "thrust_escape_rear_danger",
                "thrust_evade_shot",
                "shoot_aligned_target",
            ]
        );
    }

    #[test]
    fn aligned_close_target_fires() {
        let mut snap = snapshot();
        snap.aim_deg = Some(47.0);
        snap.enemy_distance = Some(400.0);
        let controller = controller();
        let decision = controller.decide(&snap).unwrap();
        assert_eq!(decision.strength_of("shoot_aligned_target"), Some(1.0));
        assert!(decision.command.fire);
        assert_eq!(decision.command.turn, Turn::Left);
        assert_eq!(decision.turn_rung, Some("track_target_left"));
    }

    #[test]
    fn missing_signal_without_fallback_is_an_error() {
        let mut config = ControllerConfig::default();
        config.inputs.push(InputConfig {
            name: "target_distance".to_owned(),
            variable: "enemy_distance".to_owned(),
            signal: CrispSignal::EnemyDistance,
            fallback: None,
        });
        let controller = FuzzyController::new(&config).unwrap();
        let result = controller.decide(&snapshot());
        assert!(matches!(
            result,
            Err(DecisionError::MissingSignal { input, signal: CrispSignal::EnemyDistance })
                if input == "target_distance"
        ));
    }

    #[test]
    fn malformed_snapshot_is_rejected() {
        let mut snap = snapshot();
        snap.feelers.truncate(90);
        assert!(matches!(
            controller().decide(&snap),
            Err(DecisionError::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn raised_threshold_suppresses_thrust() {
        let mut config = ControllerConfig::default();
        config.outputs.thrust.threshold = 1.0;
        let controller = FuzzyController::new(&config).unwrap();
        let command = controller.command(&snapshot()).unwrap();
        assert!(!command.thrust);
    }

    #[test]
    fn clones_share_configuration() {
        let controller = controller();
        let clone = controller.clone();
        assert!(std::ptr::eq(controller.config(), clone.config()));
        assert_eq!(
            controller.command(&snapshot()).unwrap(),
            clone.command(&snapshot()).unwrap()
        );
    }
}
