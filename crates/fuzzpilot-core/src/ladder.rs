//! Priority-ordered crisp turning ladder.
//!
//! Turning is not defuzzified. Rungs are checked top to bottom and the
//! first rung whose conditions all hold decides the turn direction; later
//! rungs are never looked at. When no rung fires the ship holds its
//! heading.

use std::collections::HashSet;

use fuzzpilot_types::{Condition, LadderRung, SignalRef, Turn};
use tracing::debug;

use crate::config::{ConfigError, require_finite};
use crate::fuzzify::FuzzyInputs;
use crate::registry::Registry;
use crate::sensors::SensorFrame;

/// Validated turning ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct TurningLadder {
    rungs: Vec<LadderRung>,
}

impl TurningLadder {
    /// Validate `rungs` against the registry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyLadder`] for an empty ladder,
    /// [`ConfigError::DuplicateName`] for repeated rung names,
    /// [`ConfigError::NonFiniteValue`] for a non-finite threshold, and
    /// [`ConfigError::UnknownInput`] / [`ConfigError::UnknownLabel`] for
    /// degree conditions that reference nothing.
    pub fn build(rungs: &[LadderRung], registry: &Registry) -> Result<Self, ConfigError> {
        if rungs.is_empty() {
            return Err(ConfigError::EmptyLadder);
        }

        let mut names = HashSet::with_capacity(rungs.len());
        for rung in rungs {
            if !names.insert(rung.name.as_str()) {
                return Err(ConfigError::DuplicateName {
                    kind: "rung",
                    name: rung.name.clone(),
                });
            }
            for condition in &rung.when {
                require_finite(&format!("rung {} threshold", rung.name), condition.value)?;
                if let SignalRef::Degree { input, label } = &condition.signal {
                    registry.check_term(&format!("rung {}", rung.name), input, label)?;
                }
            }
        }

        Ok(Self {
            rungs: rungs.to_vec(),
        })
    }

    /// Rungs in priority order.
    pub fn rungs(&self) -> &[LadderRung] {
        &self.rungs
    }

    /// The first rung whose conditions all hold, if any.
    pub fn select(&self, frame: &SensorFrame, inputs: &FuzzyInputs<'_>) -> Option<&LadderRung> {
        let rung = self
            .rungs
            .iter()
            .find(|rung| rung.when.iter().all(|c| holds(c, frame, inputs)));
        match rung {
            Some(rung) => debug!(
                rung = %rung.name,
                turn = rung.turn.as_str(),
                conditions = %describe(&rung.when),
                "turning ladder fired"
            ),
            None => debug!("turning ladder: no rung fired"),
        }
        rung
    }

    /// Turn direction for this tick; [`Turn::None`] when no rung fires.
    pub fn decide(&self, frame: &SensorFrame, inputs: &FuzzyInputs<'_>) -> Turn {
        self.select(frame, inputs).map_or(Turn::None, |rung| rung.turn)
    }
}

/// Render conditions as `lhs op value` clauses joined by `and`.
fn describe(conditions: &[Condition]) -> String {
    let clauses: Vec<String> = conditions
        .iter()
        .map(|c| {
            let lhs = match &c.signal {
                SignalRef::Crisp(signal) => signal.as_str().to_owned(),
                SignalRef::Degree { input, label } => format!("{input}.{label}"),
            };
            format!("{lhs} {} {}", c.op.symbol(), c.value)
        })
        .collect();
    if clauses.is_empty() {
        "always".to_owned()
    } else {
        clauses.join(" and ")
    }
}

/// Evaluate one condition. An absent reading never satisfies it.
fn holds(condition: &Condition, frame: &SensorFrame, inputs: &FuzzyInputs<'_>) -> bool {
    let lhs = match &condition.signal {
        SignalRef::Crisp(signal) => frame.get(*signal),
        SignalRef::Degree { input, label } => inputs.degree(input, label),
    };
    lhs.is_some_and(|lhs| condition.op.holds(lhs, condition.value))
}
