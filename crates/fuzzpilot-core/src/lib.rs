//! Fuzzy inference decision engine for the fuzzpilot agent.
//!
//! Once per simulation tick the [`FuzzyController`] turns a raw
//! [`SensorSnapshot`] into an [`ActuatorCommand`]:
//!
//! 1. **Sense** -- derive crisp signals (angle differences, closest and
//!    furthest walls) from the snapshot.
//! 2. **Fuzzify** -- map every bound input through its linguistic variable.
//! 3. **Evaluate** -- score every rule antecedent with fuzzy AND/OR.
//! 4. **Defuzzify** -- weighted average per output channel.
//! 5. **Gate and emit** -- threshold thrust and fire; pick the turn from the
//!    crisp priority ladder.
//!
//! The controller is memoryless. Its only state is the validated, immutable
//! configuration, shared behind an `Arc` by every agent instance.
//!
//! # Modules
//!
//! - [`combinators`] -- Fuzzy AND (min) and OR (max)
//! - [`config`] -- YAML configuration, validation, [`ConfigError`]
//! - [`defuzzify`] -- Weighted-average defuzzification
//! - [`fuzzify`] -- Raw reading to fuzzy set
//! - [`ladder`] -- Priority-ordered crisp turning ladder
//! - [`membership`] -- Trapezoidal membership function
//! - [`preset`] -- Built-in variable, rule, and ladder tables
//! - [`registry`] -- Linguistic variables and input bindings
//! - [`rules`] -- Rule evaluation and per-channel aggregation
//! - [`sensors`] -- Crisp signal derivation from the snapshot
//! - [`sequencer`] -- Per-tick orchestration, [`DecisionError`]
//!
//! [`SensorSnapshot`]: fuzzpilot_types::SensorSnapshot
//! [`ActuatorCommand`]: fuzzpilot_types::ActuatorCommand
//! [`ConfigError`]: config::ConfigError
//! [`DecisionError`]: sequencer::DecisionError

pub mod combinators;
pub mod config;
pub mod defuzzify;
pub mod fuzzify;
pub mod ladder;
pub mod membership;
pub mod preset;
pub mod registry;
pub mod rules;
pub mod sensors;
pub mod sequencer;

pub use config::{CompiledConfig, ConfigError, ControllerConfig};
pub use sequencer::{Decision, DecisionError, FuzzyController};
