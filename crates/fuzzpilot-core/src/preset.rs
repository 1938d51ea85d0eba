//! Built-in controller tables.
//!
//! These are the tuned vocabularies, rules, and turning ladder the agent
//! ships with. `fuzzpilot-config.yaml` mirrors them one to one; a config
//! file that omits a section falls back to the table here.

use std::collections::BTreeMap;

use fuzzpilot_types::{
    Antecedent, Channel, Comparison, Condition, CrispSignal, LadderRung, NormalizationRange, Rule,
    Trapezoid, Turn,
};

use crate::config::{InputConfig, MemberConfig, VariableConfig};

/// Wall feeler and obstacle distances.
pub const DISTANCE_RANGE: NormalizationRange = NormalizationRange::new(0.0, 1500.0);
/// Ship speed.
pub const SPEED_RANGE: NormalizationRange = NormalizationRange::new(0.0, 20.0);
/// Absolute angle differences.
pub const ANGLE_RANGE: NormalizationRange = NormalizationRange::new(0.0, 180.0);
/// Shot alert intensity.
pub const SHOT_ALERT_RANGE: NormalizationRange = NormalizationRange::new(0.0, 100.0);

/// Shot alerts at or above this are left to the thrust rules.
pub const SHOT_ALERT_TURN_LIMIT: f64 = 60.0;

fn variable(name: &str, range: NormalizationRange, members: &[(&str, [f64; 4])]) -> VariableConfig {
    VariableConfig {
        name: name.to_owned(),
        range,
        members: members
            .iter()
            .map(|&(label, corners)| MemberConfig {
                label: label.to_owned(),
                trapezoid: Trapezoid::from(corners),
            })
            .collect(),
    }
}

/// Linguistic variables, trapezoids in raw units.
pub fn variables() -> Vec<VariableConfig> {
    vec![
        variable(
            "distance",
            DISTANCE_RANGE,
            &[
                ("danger", [-0.001, 0.0, 200.0, 250.0]),
                ("safe", [240.0, 400.0, 500.0, 600.0]),
                ("far", [550.0, 650.0, 1500.0, 1500.1]),
            ],
        ),
        variable(
            "speed",
            SPEED_RANGE,
            &[
                ("stop", [-0.001, 0.0, 0.7, 1.0]),
                ("slow", [0.8, 2.0, 2.5, 3.0]),
                ("medium", [2.8, 6.0, 8.0, 10.0]),
                ("fast", [8.0, 10.0, 20.0, 20.02]),
            ],
        ),
        variable(
            "enemy_distance",
            DISTANCE_RANGE,
            &[
                ("close", [-0.001, 0.0, 80.0, 120.0]),
                ("medium", [80.0, 150.0, 750.0, 800.0]),
                ("far", [775.0, 850.0, 1500.0, 1500.2]),
            ],
        ),
        variable(
            "aim_alignment",
            ANGLE_RANGE,
            &[
                ("aligned", [-0.001, 0.0, 5.0, 8.0]),
                ("slight_misaligned", [7.0, 15.0, 20.0, 25.0]),
                ("misaligned", [20.0, 25.0, 180.0, 180.0]),
            ],
        ),
        variable(
            "furthest_alignment",
            ANGLE_RANGE,
            &[
                ("aligned", [-0.001, 0.0, 10.0, 15.0]),
                ("slight_misaligned", [15.0, 30.0, 40.0, 50.0]),
                ("misaligned", [50.0, 80.0, 180.0, 180.0]),
            ],
        ),
        variable(
            "shot_alert",
            SHOT_ALERT_RANGE,
            &[
                ("none", [-0.001, 0.0, 0.0, 1.0]),
                ("low", [1.0, 10.0, 30.0, 40.0]),
                ("medium", [30.0, 50.0, 60.0, 70.0]),
                ("high", [60.0, 80.0, 100.0, 100.0]),
            ],
        ),
        variable(
            "going_backwards",
            ANGLE_RANGE,
            &[("no", [-0.001, 0.0, 60.0, 80.0]), ("yes", [80.0, 100.0, 180.0, 180.0])],
        ),
    ]
}

fn input(name: &str, variable: &str, signal: CrispSignal) -> InputConfig {
    InputConfig {
        name: name.to_owned(),
        variable: variable.to_owned(),
        signal,
        fallback: None,
    }
}

/// Attach a no-signal fuzzy set; labels left out get degree 0.
fn with_fallback(config: InputConfig, degrees: &[(&str, f64)]) -> InputConfig {
    let fallback: BTreeMap<String, f64> = degrees
        .iter()
        .map(|&(label, degree)| (label.to_owned(), degree))
        .collect();
    InputConfig {
        fallback: Some(fallback),
        ..config
    }
}

/// Input bindings. Target, enemy, and shot alert readings may be absent
/// and carry a no-signal fallback.
pub fn inputs() -> Vec<InputConfig> {
    vec![
        input("speed", "speed", CrispSignal::Speed),
        input("front_distance", "distance", CrispSignal::FrontDistance),
        input("back_distance", "distance", CrispSignal::BackDistance),
        input("back_left_distance", "distance", CrispSignal::BackLeftDistance),
        input("back_right_distance", "distance", CrispSignal::BackRightDistance),
        input("going_backwards", "going_backwards", CrispSignal::GoingBackwards),
        input("furthest_alignment", "furthest_alignment", CrispSignal::AbsFurthestDiff),
        with_fallback(input("aim", "aim_alignment", CrispSignal::AbsAimDiff), &[]),
        with_fallback(
            input("enemy_distance", "enemy_distance", CrispSignal::EnemyDistance),
            &[],
        ),
        with_fallback(
            input("shot_alert", "shot_alert", CrispSignal::ShotAlert),
            &[("none", 1.0)],
        ),
    ]
}

fn term(input: &str, label: &str) -> Antecedent {
    Antecedent::term(input, label)
}

/// Fuzzy rule base for thrust and shoot.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "thrust_clear_path".to_owned(),
            channel: Channel::Thrust,
            antecedent: Antecedent::all(vec![
                Antecedent::any(vec![term("front_distance", "safe"), term("front_distance", "far")]),
                Antecedent::any(vec![term("speed", "stop"), term("speed", "slow")]),
                term("furthest_alignment", "aligned"),
            ]),
            value: 1.0,
        },
        Rule {
            name: "thrust_escape_rear_danger".to_owned(),
            channel: Channel::Thrust,
            antecedent: Antecedent::all(vec![
                term("going_backwards", "yes"),
                Antecedent::all(vec![
                    term("back_distance", "danger"),
                    term("back_left_distance", "danger"),
                    term("back_right_distance", "danger"),
                ]),
            ]),
            value: 1.0,
        },
        Rule {
            name: "thrust_evade_shot".to_owned(),
            channel: Channel::Thrust,
            antecedent: Antecedent::any(vec![
                term("shot_alert", "low"),
                term("shot_alert", "medium"),
                term("shot_alert", "high"),
            ]),
            value: 0.5,
        },
        Rule {
            name: "shoot_aligned_target".to_owned(),
            channel: Channel::Shoot,
            antecedent: Antecedent::all(vec![
                term("aim", "aligned"),
                Antecedent::any(vec![term("enemy_distance", "close"), term("enemy_distance", "medium")]),
            ]),
            value: 1.0,
        },
    ]
}

/// Which way a rung pair steers relative to its angle difference.
#[derive(Clone, Copy)]
enum Steer {
    Toward,
    Away,
}

/// Two rungs split on the sign of `diff`: the first fires for `diff > 0`,
/// the second for `diff <= 0`. Directions follow [`Turn::toward`].
fn pair(name: &str, guard: &[Condition], diff: CrispSignal, steer: Steer) -> [LadderRung; 2] {
    let rung = |op: Comparison, sample: f64| {
        let side = match steer {
            Steer::Toward => Turn::toward(sample),
            Steer::Away => Turn::toward(sample).opposite(),
        };
        let mut when = guard.to_vec();
        when.push(Condition::crisp(diff, op, 0.0));
        LadderRung {
            name: format!("{name}_{}", side.as_str()),
            when,
            turn: side,
        }
    };
    [rung(Comparison::Gt, 1.0), rung(Comparison::Le, 0.0)]
}

/// Turning ladder, highest priority first.
pub fn turning() -> Vec<LadderRung> {
    use Comparison::{Gt, Lt, Ne};
    use CrispSignal::{
        AbsAimDiff, AbsFurthestDiff, AimDiff, ClosestDiff, ClosestDistance, EnemyDistance, FurthestDiff,
        ShotAlert, Speed,
    };

    let enemy_close = [
        Condition::crisp(EnemyDistance, Lt, 100.0),
        Condition::crisp(Speed, Lt, 2.5),
    ];
    let wall_close = [
        Condition::crisp(ClosestDistance, Lt, 70.0),
        Condition::crisp(Speed, Ne, 0.0),
    ];
    let wall_near = [Condition::crisp(ClosestDistance, Lt, 100.0)];
    let shot_incoming = [
        Condition::crisp(ShotAlert, Gt, 0.0),
        Condition::crisp(ShotAlert, Lt, SHOT_ALERT_TURN_LIMIT),
    ];
    let off_target = [Condition::crisp(AbsAimDiff, Gt, 1.0)];
    let off_open = [Condition::crisp(AbsFurthestDiff, Gt, 15.0)];

    [
        pair("enemy_close_aim", &enemy_close, AimDiff, Steer::Toward),
        pair("wall_close_veer", &wall_close, ClosestDiff, Steer::Away),
        pair("wall_near_open", &wall_near, FurthestDiff, Steer::Toward),
        pair("shot_evade", &shot_incoming, FurthestDiff, Steer::Toward),
        pair("track_target", &off_target, AimDiff, Steer::Toward),
        pair("realign_open", &off_open, FurthestDiff, Steer::Toward),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use fuzzpilot_types::SignalRef;

    use super::*;

    #[test]
    fn ladder_has_twelve_uniquely_named_rungs() {
        let ladder = turning();
        assert_eq!(ladder.len(), 12);
        let names: std::collections::HashSet<&str> = ladder.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn ladder_priority_order() {
        let names: Vec<String> = turning().into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "enemy_close_aim_left",
                "enemy_close_aim_right",
                "wall_close_veer_right",
                "wall_close_veer_left",
                "wall_near_open_left",
                "wall_near_open_right",
                "shot_evade_left",
                "shot_evade_right",
                "track_target_left",
                "track_target_right",
                "realign_open_left",
                "realign_open_right",
            ]
        );
    }

    #[test]
    fn rung_directions_follow_the_diff_sign() {
        for rung in turning() {
            let Some(split) = rung.when.last() else {
                panic!("{} has no conditions", rung.name);
            };
            let SignalRef::Crisp(diff) = split.signal else {
                panic!("{} does not split on a crisp signal", rung.name);
            };
            let sample = match split.op {
                Comparison::Gt => 1.0,
                Comparison::Le => -1.0,
                other => panic!("{} splits with {}", rung.name, other.symbol()),
            };
            let toward = Turn::toward(sample);
            let expected = if diff == CrispSignal::ClosestDiff {
                toward.opposite()
            } else {
                toward
            };
            assert_eq!(rung.turn, expected, "{}", rung.name);
        }
    }

    #[test]
    fn every_raw_trapezoid_is_well_formed() {
        for var in variables() {
            for member in &var.members {
                assert!(
                    member.trapezoid.is_well_formed(),
                    "{}.{} is malformed",
                    var.name,
                    member.label
                );
            }
        }
    }

    #[test]
    fn absent_readings_have_fallbacks() {
        let inputs = inputs();
        for name in ["aim", "enemy_distance", "shot_alert"] {
            let binding = inputs.iter().find(|i| i.name == name);
            assert!(binding.is_some_and(|b| b.fallback.is_some()), "{name} lacks a fallback");
        }
    }
}
