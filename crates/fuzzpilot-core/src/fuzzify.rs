//! Fuzzification: raw reading to label/degree mapping.

use fuzzpilot_types::{FuzzySet, LinguisticVariable};

use crate::config::ConfigError;
use crate::membership::membership;

/// Fuzzify a raw reading against every member of `variable`.
///
/// The reading is normalized with the variable's range (no clamping) and
/// evaluated once per member, in declaration order. Labels in the returned
/// set borrow from `variable`.
///
/// # Errors
///
/// Returns [`ConfigError::EmptyVariable`] if the variable has no members.
/// Validated configurations never contain such a variable.
pub fn fuzzify(raw_value: f64, variable: &LinguisticVariable) -> Result<FuzzySet<'_>, ConfigError> {
    if variable.members.is_empty() {
        return Err(ConfigError::EmptyVariable {
            variable: variable.name.clone(),
        });
    }

    let x = variable.range.normalize(raw_value);
    let mut set = FuzzySet::with_capacity(variable.members.len());
    for member in &variable.members {
        set.insert(&member.label, membership(x, &member.trapezoid));
    }
    Ok(set)
}

/// The fuzzified inputs of one tick, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuzzyInputs<'a> {
    sets: Vec<(&'a str, FuzzySet<'a>)>,
}

impl<'a> FuzzyInputs<'a> {
    /// Create an empty collection with room for `capacity` inputs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sets: Vec::with_capacity(capacity),
        }
    }

    /// Store the fuzzy set of `input`, replacing any earlier one.
    pub fn insert(&mut self, input: &'a str, set: FuzzySet<'a>) {
        if let Some(entry) = self.sets.iter_mut().find(|(name, _)| *name == input) {
            entry.1 = set;
        } else {
            self.sets.push((input, set));
        }
    }

    /// The fuzzy set of `input`.
    pub fn get(&self, input: &str) -> Option<&FuzzySet<'a>> {
        self.sets
            .iter()
            .find(|(name, _)| *name == input)
            .map(|(_, set)| set)
    }

    /// Degree of `label` in the set of `input`.
    pub fn degree(&self, input: &str, label: &str) -> Option<f64> {
        self.get(input).and_then(|set| set.degree(label))
    }

    /// Number of fuzzified inputs.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether no input has been fuzzified.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
