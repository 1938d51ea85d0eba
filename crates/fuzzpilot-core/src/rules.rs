//! Rule evaluation: antecedent strength and per-channel weighted pairs.
//!
//! Every rule is evaluated every tick, regardless of channel. A rule whose
//! antecedent references a label absent from this tick's inputs contributes
//! strength 0 (no evidence) rather than failing the tick.

use std::collections::HashSet;

use fuzzpilot_types::{Antecedent, Channel, Rule, WeightedPair};
use serde::Serialize;
use tracing::trace;

use crate::combinators::{fuzzy_and, fuzzy_or};
use crate::config::{ConfigError, OutputConfig, OutputsConfig, require_finite};
use crate::fuzzify::FuzzyInputs;
use crate::registry::Registry;

/// Firing strength of an antecedent against this tick's inputs.
pub fn strength(antecedent: &Antecedent, inputs: &FuzzyInputs<'_>) -> f64 {
    match antecedent {
        Antecedent::Term { input, label } => inputs.degree(input, label).unwrap_or(0.0),
        Antecedent::All { all } => fuzzy_and(all.iter().map(|child| strength(child, inputs))),
        Antecedent::Any { any } => fuzzy_or(any.iter().map(|child| strength(child, inputs))),
    }
}

/// One rule's result for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleStrength<'a> {
    /// Rule name.
    pub rule: &'a str,
    /// Channel the rule feeds.
    pub channel: Channel,
    /// Firing strength in `[0, 1]`.
    pub strength: f64,
    /// Crisp consequent value.
    pub value: f64,
}

/// All rule strengths of one tick, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleEvaluation<'a> {
    strengths: Vec<RuleStrength<'a>>,
}

impl<'a> RuleEvaluation<'a> {
    /// Weighted pairs feeding `channel`.
    pub fn pairs(&self, channel: Channel) -> Vec<WeightedPair> {
        self.strengths
            .iter()
            .filter(|s| s.channel == channel)
            .map(|s| WeightedPair::new(s.strength, s.value))
            .collect()
    }

    /// Strengths in declaration order.
    pub fn strengths(&self) -> &[RuleStrength<'a>] {
        &self.strengths
    }

    /// Consume into the strength list.
    pub fn into_strengths(self) -> Vec<RuleStrength<'a>> {
        self.strengths
    }
}

/// Validated rule base plus per-channel output settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    rules: Vec<Rule>,
    outputs: OutputsConfig,
}

impl RuleBase {
    /// Validate `rules` against the registry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyRuleSet`] when there are no rules,
    /// [`ConfigError::DuplicateName`] for repeated rule names,
    /// [`ConfigError::UnknownInput`] / [`ConfigError::UnknownLabel`] for
    /// dangling terms, [`ConfigError::NonFiniteValue`] for a non-finite
    /// consequent, and [`ConfigError::ChannelWithoutRules`] when a channel
    /// has nothing feeding it.
    pub fn build(rules: &[Rule], outputs: &OutputsConfig, registry: &Registry) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet);
        }

        let mut names = HashSet::with_capacity(rules.len());
        for rule in rules {
            if !names.insert(rule.name.as_str()) {
                return Err(ConfigError::DuplicateName {
                    kind: "rule",
                    name: rule.name.clone(),
                });
            }
            require_finite(&format!("rule {} value", rule.name), rule.value)?;

            let context = format!("rule {}", rule.name);
            let mut result = Ok(());
            rule.antecedent.for_each_term(&mut |input, label| {
                if result.is_ok() {
                    result = registry.check_term(&context, input, label);
                }
            });
            result?;
        }

        for channel in Channel::ALL {
            if !rules.iter().any(|r| r.channel == channel) {
                return Err(ConfigError::ChannelWithoutRules { channel });
            }
        }

        Ok(Self {
            rules: rules.to_vec(),
            outputs: outputs.clone(),
        })
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Output settings for `channel`.
    pub const fn output(&self, channel: Channel) -> &OutputConfig {
        self.outputs.channel(channel)
    }

    /// Evaluate every rule against this tick's inputs.
    pub fn evaluate<'s>(&'s self, inputs: &FuzzyInputs<'_>) -> RuleEvaluation<'s> {
        let strengths = self
            .rules
            .iter()
            .map(|rule| {
                let strength = strength(&rule.antecedent, inputs);
                trace!(rule = %rule.name, channel = %rule.channel, strength, "rule evaluated");
                RuleStrength {
                    rule: &rule.name,
                    channel: rule.channel,
                    strength,
                    value: rule.value,
                }
            })
            .collect();
        RuleEvaluation { strengths }
    }
}
