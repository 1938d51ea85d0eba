//! Rule tables: fuzzy rule antecedents and the crisp turning ladder.
//!
//! Both are declarative configuration, loaded once and never mutated. The
//! serialized forms are untagged so YAML reads naturally:
//!
//! ```yaml
//! antecedent:
//!   all:
//!     - { input: going_backwards, label: "yes" }
//!     - { input: back_distance, label: danger }
//! ```

use serde::{Deserialize, Serialize};

use crate::enums::{Channel, Comparison, CrispSignal, Turn};

/// Condition side of a fuzzy rule.
///
/// Terms read one degree from a fuzzified input; `All` and `Any` nest
/// arbitrarily and combine their children with fuzzy AND (min) and fuzzy
/// OR (max).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Antecedent {
    /// Degree of `label` in the fuzzy set of `input`.
    Term {
        /// Input binding name.
        input: String,
        /// Label of the input's linguistic variable.
        label: String,
    },
    /// Fuzzy AND over the children. Empty means no evidence (0.0).
    All {
        /// Conjuncts.
        all: Vec<Antecedent>,
    },
    /// Fuzzy OR over the children. Empty means no evidence (0.0).
    Any {
        /// Disjuncts.
        any: Vec<Antecedent>,
    },
}

impl Antecedent {
    /// Build a term.
    pub fn term(input: &str, label: &str) -> Self {
        Self::Term {
            input: input.to_owned(),
            label: label.to_owned(),
        }
    }

    /// Build a conjunction.
    pub const fn all(all: Vec<Self>) -> Self {
        Self::All { all }
    }

    /// Build a disjunction.
    pub const fn any(any: Vec<Self>) -> Self {
        Self::Any { any }
    }

    /// Visit every `(input, label)` term in the expression, depth first.
    pub fn for_each_term<'s, F>(&'s self, f: &mut F)
    where
        F: FnMut(&'s str, &'s str),
    {
        match self {
            Self::Term { input, label } => f(input, label),
            Self::All { all: children } | Self::Any { any: children } => {
                for child in children {
                    child.for_each_term(f);
                }
            }
        }
    }
}

/// A named fuzzy rule contributing `(strength, value)` to one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule name (used in diagnostics).
    pub name: String,
    /// Output channel this rule feeds.
    pub channel: Channel,
    /// Condition side.
    pub antecedent: Antecedent,
    /// Crisp consequent value.
    pub value: f64,
}

/// The value a ladder condition reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalRef {
    /// A crisp signal derived from the snapshot.
    Crisp(CrispSignal),
    /// A fuzzified degree of one input label.
    Degree {
        /// Input binding name.
        input: String,
        /// Label of the input's linguistic variable.
        label: String,
    },
}

/// One predicate of a turning-ladder rung: `signal op value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// What to read.
    pub signal: SignalRef,
    /// How to compare it.
    pub op: Comparison,
    /// Threshold to compare against.
    pub value: f64,
}

impl Condition {
    /// Build a condition over a crisp signal.
    pub const fn crisp(signal: CrispSignal, op: Comparison, value: f64) -> Self {
        Self {
            signal: SignalRef::Crisp(signal),
            op,
            value,
        }
    }
}

/// One entry of the priority-ordered turning ladder.
///
/// A rung fires when every condition in `when` holds; an empty list always
/// fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderRung {
    /// Unique rung name (used in diagnostics).
    pub name: String,
    /// Conjunction of crisp conditions.
    #[serde(default)]
    pub when: Vec<Condition>,
    /// Turn command emitted when the rung fires.
    pub turn: Turn,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn antecedent_untagged_json() {
        let json = r#"{"all":[{"input":"front_distance","label":"safe"},{"any":[]}]}"#;
        let parsed: Antecedent = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            Antecedent::all(vec![
                Antecedent::term("front_distance", "safe"),
                Antecedent::any(Vec::new()),
            ])
        );
    }

    #[test]
    fn for_each_term_visits_nested_terms() {
        let expr = Antecedent::all(vec![
            Antecedent::any(vec![
                Antecedent::term("speed", "stop"),
                Antecedent::term("speed", "slow"),
            ]),
            Antecedent::term("furthest_alignment", "aligned"),
        ]);
        let mut seen = Vec::new();
        expr.for_each_term(&mut |input, label| seen.push(format!("{input}.{label}")));
        assert_eq!(
            seen,
            vec!["speed.stop", "speed.slow", "furthest_alignment.aligned"]
        );
    }

    #[test]
    fn signal_ref_accepts_crisp_name_or_degree() {
        let crisp: SignalRef = serde_json::from_str(r#""enemy_distance""#).unwrap();
        assert_eq!(crisp, SignalRef::Crisp(CrispSignal::EnemyDistance));

        let degree: SignalRef =
            serde_json::from_str(r#"{"input":"going_backwards","label":"yes"}"#).unwrap();
        assert_eq!(
            degree,
            SignalRef::Degree {
                input: "going_backwards".to_owned(),
                label: "yes".to_owned(),
            }
        );
    }

    #[test]
    fn rung_without_conditions_parses() {
        let rung: LadderRung = serde_json::from_str(r#"{"name":"always","turn":"left"}"#).unwrap();
        assert!(rung.when.is_empty());
        assert_eq!(rung.turn, Turn::Left);
    }
}
