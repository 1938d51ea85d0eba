//! Linguistic variable registry and input bindings.
//!
//! Built once from the raw config tables. Trapezoids are validated in raw
//! units and stored normalized; every later lookup by name is infallible
//! for names that passed validation.

use std::collections::HashSet;
use std::sync::Arc;

use fuzzpilot_types::{CrispSignal, FuzzySet, LinguisticVariable, Member};

use crate::config::{ConfigError, InputConfig, VariableConfig};

/// A crisp signal bound to the variable that fuzzifies it.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBinding {
    name: String,
    signal: CrispSignal,
    variable: Arc<LinguisticVariable>,
    /// Degrees aligned with `variable.members`; `None` means an absent
    /// signal is an error.
    fallback: Option<Vec<f64>>,
}

impl InputBinding {
    /// Input name referenced by rules and ladder conditions.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Crisp signal feeding this input.
    pub const fn signal(&self) -> CrispSignal {
        self.signal
    }

    /// Variable used to fuzzify the signal.
    pub fn variable(&self) -> &LinguisticVariable {
        &self.variable
    }

    /// The no-signal fuzzy set, covering every label of the variable.
    pub fn fallback_set(&self) -> Option<FuzzySet<'_>> {
        let degrees = self.fallback.as_ref()?;
        Some(
            self.variable
                .labels()
                .zip(degrees.iter().copied())
                .collect(),
        )
    }
}

/// All linguistic variables and input bindings of a controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    variables: Vec<Arc<LinguisticVariable>>,
    inputs: Vec<InputBinding>,
}

impl Registry {
    /// Validate the variable and input tables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for duplicate names or labels, empty
    /// variables, invalid ranges, malformed trapezoids, inputs bound to
    /// unknown variables, or inconsistent fallbacks.
    pub fn build(variables: &[VariableConfig], inputs: &[InputConfig]) -> Result<Self, ConfigError> {
        let mut registry = Self {
            variables: Vec::with_capacity(variables.len()),
            inputs: Vec::with_capacity(inputs.len()),
        };

        for config in variables {
            if registry.variable(&config.name).is_some() {
                return Err(ConfigError::DuplicateName {
                    kind: "variable",
                    name: config.name.clone(),
                });
            }
            registry.variables.push(Arc::new(compile_variable(config)?));
        }

        for config in inputs {
            if registry.input(&config.name).is_some() {
                return Err(ConfigError::DuplicateName {
                    kind: "input",
                    name: config.name.clone(),
                });
            }
            let variable = registry
                .variables
                .iter()
                .find(|v| v.name == config.variable)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownVariable {
                    input: config.name.clone(),
                    variable: config.variable.clone(),
                })?;
            let fallback = config
                .fallback
                .as_ref()
                .map(|degrees| compile_fallback(&config.name, &variable, degrees))
                .transpose()?;
            registry.inputs.push(InputBinding {
                name: config.name.clone(),
                signal: config.signal,
                variable,
                fallback,
            });
        }

        Ok(registry)
    }

    /// Variables in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables.iter().map(AsRef::as_ref)
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.variables().find(|v| v.name == name)
    }

    /// Input bindings in declaration order.
    pub fn inputs(&self) -> &[InputBinding] {
        &self.inputs
    }

    /// Look up an input binding by name.
    pub fn input(&self, name: &str) -> Option<&InputBinding> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Check that `input.label` names a declared input and one of its labels.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownInput`] or [`ConfigError::UnknownLabel`], with
    /// `context` naming the referencing rule or rung.
    pub fn check_term(&self, context: &str, input: &str, label: &str) -> Result<(), ConfigError> {
        let binding = self.input(input).ok_or_else(|| ConfigError::UnknownInput {
            context: context.to_owned(),
            input: input.to_owned(),
        })?;
        if binding.variable.has_label(label) {
            Ok(())
        } else {
            Err(ConfigError::UnknownLabel {
                context: context.to_owned(),
                input: input.to_owned(),
                label: label.to_owned(),
            })
        }
    }
}

fn compile_variable(config: &VariableConfig) -> Result<LinguisticVariable, ConfigError> {
    let range = config.range;
    if !(range.min.is_finite() && range.max.is_finite() && range.max > range.min) {
        return Err(ConfigError::InvalidRange {
            variable: config.name.clone(),
            min: range.min,
            max: range.max,
        });
    }
    if config.members.is_empty() {
        return Err(ConfigError::EmptyVariable {
            variable: config.name.clone(),
        });
    }

    let mut seen = HashSet::with_capacity(config.members.len());
    let mut members = Vec::with_capacity(config.members.len());
    for member in &config.members {
        if !seen.insert(member.label.as_str()) {
            return Err(ConfigError::DuplicateLabel {
                variable: config.name.clone(),
                label: member.label.clone(),
            });
        }
        if !member.trapezoid.is_well_formed() {
            return Err(ConfigError::MalformedTrapezoid {
                variable: config.name.clone(),
                label: member.label.clone(),
                corners: member.trapezoid.corners(),
            });
        }
        members.push(Member {
            label: member.label.clone(),
            trapezoid: member.trapezoid.normalized(range),
        });
    }

    Ok(LinguisticVariable {
        name: config.name.clone(),
        range,
        members,
    })
}

fn compile_fallback(
    input: &str,
    variable: &LinguisticVariable,
    degrees: &std::collections::BTreeMap<String, f64>,
) -> Result<Vec<f64>, ConfigError> {
    for (label, &degree) in degrees {
        if !variable.has_label(label) {
            return Err(ConfigError::InvalidFallback {
                input: input.to_owned(),
                reason: format!("variable {} has no label {label}", variable.name),
            });
        }
        if !(0.0..=1.0).contains(&degree) {
            return Err(ConfigError::InvalidFallback {
                input: input.to_owned(),
                reason: format!("degree {degree} for {label} is outside [0, 1]"),
            });
        }
    }
    Ok(variable
        .labels()
        .map(|label| degrees.get(label).copied().unwrap_or(0.0))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::collections::BTreeMap;

    use fuzzpilot_types::{NormalizationRange, Trapezoid};

    use super::*;
    use crate::config::MemberConfig;

    fn shot_alert() -> VariableConfig {
        VariableConfig {
            name: "shot_alert".to_owned(),
            range: NormalizationRange::new(0.0, 100.0),
            members: vec![
                MemberConfig {
                    label: "none".to_owned(),
                    trapezoid: Trapezoid::new(-0.001, 0.0, 0.0, 1.0),
                },
                MemberConfig {
                    label: "low".to_owned(),
                    trapezoid: Trapezoid::new(1.0, 10.0, 30.0, 40.0),
                },
            ],
        }
    }

    fn input(fallback: Option<BTreeMap<String, f64>>) -> InputConfig {
        InputConfig {
            name: "shot_alert".to_owned(),
            variable: "shot_alert".to_owned(),
            signal: CrispSignal::ShotAlert,
            fallback,
        }
    }

    #[test]
    fn trapezoids_are_stored_normalized() {
        let registry = Registry::build(&[shot_alert()], &[]).unwrap();
        let var = registry.variable("shot_alert").unwrap();
        assert_eq!(var.member("low").unwrap().trapezoid.corners(), [0.01, 0.1, 0.3, 0.4]);
    }

    #[test]
    fn fallback_fills_missing_labels_with_zero() {
        let fallback = BTreeMap::from([("none".to_owned(), 1.0)]);
        let registry = Registry::build(&[shot_alert()], &[input(Some(fallback))]).unwrap();
        let binding = registry.input("shot_alert").unwrap();
        let set = binding.fallback_set().unwrap();
        assert_eq!(set.degree("none"), Some(1.0));
        assert_eq!(set.degree("low"), Some(0.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn input_without_fallback_has_none() {
        let registry = Registry::build(&[shot_alert()], &[input(None)]).unwrap();
        assert!(registry.input("shot_alert").unwrap().fallback_set().is_none());
    }

    #[test]
    fn fallback_with_unknown_label_is_rejected() {
        let fallback = BTreeMap::from([("critical".to_owned(), 1.0)]);
        let result = Registry::build(&[shot_alert()], &[input(Some(fallback))]);
        assert!(matches!(result, Err(ConfigError::InvalidFallback { .. })));
    }

    #[test]
    fn fallback_degree_out_of_range_is_rejected() {
        let fallback = BTreeMap::from([("none".to_owned(), 1.5)]);
        let result = Registry::build(&[shot_alert()], &[input(Some(fallback))]);
        assert!(matches!(result, Err(ConfigError::InvalidFallback { .. })));
    }

    #[test]
    fn malformed_trapezoid_is_rejected() {
        let mut var = shot_alert();
        var.members.push(MemberConfig {
            label: "high".to_owned(),
            trapezoid: Trapezoid::new(80.0, 60.0, 100.0, 100.0),
        });
        assert!(matches!(
            Registry::build(&[var], &[]),
            Err(ConfigError::MalformedTrapezoid { label, .. }) if label == "high"
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut var = shot_alert();
        var.range = NormalizationRange::new(100.0, 0.0);
        assert!(matches!(
            Registry::build(&[var], &[]),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn duplicate_labels_and_names_are_rejected() {
        let mut var = shot_alert();
        var.members.push(var.members.first().unwrap().clone());
        assert!(matches!(
            Registry::build(&[var], &[]),
            Err(ConfigError::DuplicateLabel { .. })
        ));

        assert!(matches!(
            Registry::build(&[shot_alert(), shot_alert()], &[]),
            Err(ConfigError::DuplicateName { kind: "variable", .. })
        ));
        assert!(matches!(
            Registry::build(&[shot_alert()], &[input(None), input(None)]),
            Err(ConfigError::DuplicateName { kind: "input", .. })
        ));
    }

    #[test]
    fn empty_variable_is_rejected() {
        let mut var = shot_alert();
        var.members.clear();
        assert!(matches!(
            Registry::build(&[var], &[]),
            Err(ConfigError::EmptyVariable { .. })
        ));
    }

    #[test]
    fn unknown_variable_is_rejected() {
        let mut binding = input(None);
        binding.variable = "threat".to_owned();
        assert!(matches!(
            Registry::build(&[shot_alert()], &[binding]),
            Err(ConfigError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn check_term_reports_dangling_references() {
        let registry = Registry::build(&[shot_alert()], &[input(None)]).unwrap();
        assert!(registry.check_term("rule r", "shot_alert", "low").is_ok());
        assert!(matches!(
            registry.check_term("rule r", "enemy", "low"),
            Err(ConfigError::UnknownInput { .. })
        ));
        assert!(matches!(
            registry.check_term("rule r", "shot_alert", "extreme"),
            Err(ConfigError::UnknownLabel { .. })
        ));
    }
}
