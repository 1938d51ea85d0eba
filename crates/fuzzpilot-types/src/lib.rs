//! Shared type definitions for the fuzzpilot decision engine.
//!
//! This crate is the single source of truth for the data that flows through
//! one controller tick: the sensor snapshot coming in, the fuzzy vocabulary
//! and rule tables loaded at startup, and the actuator command going out.
//! Everything here is plain data; the algorithms live in `fuzzpilot-core`.
//!
//! # Modules
//!
//! - [`enums`] -- Output channels, turn directions, crisp signals, comparisons
//! - [`structs`] -- Trapezoids, linguistic variables, fuzzy sets, weighted pairs
//! - [`rules`] -- Rule antecedents and turning-ladder rungs
//! - [`perception`] -- Raw sensor snapshot delivered once per tick
//! - [`actions`] -- Actuator command emitted once per tick

pub mod actions;
pub mod enums;
pub mod perception;
pub mod rules;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::ActuatorCommand;
pub use enums::{Channel, Comparison, CrispSignal, Turn};
pub use perception::{FEELER_COUNT, SensorSnapshot};
pub use rules::{Antecedent, Condition, LadderRung, Rule, SignalRef};
pub use structs::{FuzzySet, LinguisticVariable, Member, NormalizationRange, Trapezoid, WeightedPair};
