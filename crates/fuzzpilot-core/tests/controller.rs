//! End-to-end tests: full sensor snapshots through the default controller.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use fuzzpilot_core::defuzzify::defuzzify;
use fuzzpilot_core::{ControllerConfig, DecisionError, FuzzyController};
use fuzzpilot_types::{FEELER_COUNT, SensorSnapshot, Turn, WeightedPair};

fn controller() -> FuzzyController {
    FuzzyController::new(&ControllerConfig::default()).unwrap()
}

/// Heading north in open space, the most open direction straight ahead.
fn open_space() -> SensorSnapshot {
    let mut feelers = vec![900.0; FEELER_COUNT];
    feelers[0] = 1400.0;
    SensorSnapshot {
        tick: 1,
        heading_deg: 90.0,
        tracking_deg: 90.0,
        speed: 1.5,
        aim_deg: None,
        shot_alert: None,
        enemy_distance: None,
        feelers,
    }
}

#[test]
fn close_enemy_rung_wins_over_lower_priorities() {
    let mut snap = open_space();
    snap.enemy_distance = Some(80.0);
    snap.aim_deg = Some(95.0);
    snap.speed = 2.0;
    // A wall close enough to trigger the avoidance rungs.
    snap.feelers[30] = 50.0;

    let controller = controller();

    let decision = controller.decide(&snap).unwrap();
    assert_eq!(decision.command.turn, Turn::Left);
    assert_eq!(decision.turn_rung, Some("enemy_close_aim_left"));
}

#[test]
fn no_shot_alert_gives_no_evasion_thrust() {
    let controller = controller();

    let quiet = open_space();
    let decision = controller.decide(&quiet).unwrap();
    assert_eq!(decision.strength_of("thrust_evade_shot"), Some(0.0));

    let mut zero = open_space();
    zero.shot_alert = Some(0.0);
    let decision = controller.decide(&zero).unwrap();
    assert_eq!(decision.strength_of("thrust_evade_shot"), Some(0.0));
}

#[test]
fn shot_alert_blends_low_thrust_into_output() {
    let mut snap = open_space();
    snap.shot_alert = Some(50.0);
    snap.speed = 12.0;
    let controller = controller();
    let decision = controller.decide(&snap).unwrap();
    assert_eq!(decision.strength_of("thrust_clear_path"), Some(0.0));
    assert_eq!(decision.strength_of("thrust_evade_shot"), Some(1.0));
    assert_eq!(decision.thrust_output, 0.5);
    assert!(decision.command.thrust);
}

#[test]
fn weighted_average_scenario_engages_thrust() {
    let pairs = [
        WeightedPair::new(0.8, 1.0),
        WeightedPair::new(0.0, 1.0),
        WeightedPair::new(0.2, 0.5),
    ];
    let output = defuzzify(&pairs, 0.0);
    assert!((output - 0.9).abs() < 1e-12);
    assert!(output > ControllerConfig::default().outputs.thrust.threshold);
}

#[test]
fn fast_ship_in_open_space_coasts() {
    let mut snap = open_space();
    snap.speed = 15.0;
    let command = controller().command(&snap).unwrap();
    assert!(!command.thrust);
    assert!(!command.fire);
    assert_eq!(command.turn, Turn::None);
}

#[test]
fn reversing_into_a_wall_escapes_forward() {
    let mut snap = open_space();
    snap.speed = 12.0;
    snap.tracking_deg = 260.0;
    for sample in &mut snap.feelers[170..=190] {
        *sample = 150.0;
    }
    let controller = controller();
    let decision = controller.decide(&snap).unwrap();
    assert_eq!(decision.strength_of("thrust_escape_rear_danger"), Some(1.0));
    assert!(decision.command.thrust);
}

#[test]
fn enemy_beyond_detection_range_is_ignored() {
    let mut snap = open_space();
    snap.aim_deg = Some(90.0);
    snap.enemy_distance = Some(12_000.0);
    let controller = controller();
    let decision = controller.decide(&snap).unwrap();
    assert_eq!(decision.strength_of("shoot_aligned_target"), Some(0.0));
    assert!(!decision.command.fire);
}

#[test]
fn snapshot_from_json_line() {
    let feelers = vec!["600"; FEELER_COUNT].join(",");
    let line = format!(
        r#"{{"tick":3,"heading_deg":0,"tracking_deg":0,"speed":1,"aim_deg":358,"enemy_distance":300,"feelers":[{feelers}]}}"#
    );
    let snap: SensorSnapshot = serde_json::from_str(&line).unwrap();
    let controller = controller();
    let decision = controller.decide(&snap).unwrap();
    assert!(decision.command.fire);
    assert_eq!(decision.command.turn, Turn::Right);
}

#[test]
fn short_feeler_scan_is_a_contract_violation() {
    let mut snap = open_space();
    snap.feelers.pop();
    assert!(matches!(
        controller().decide(&snap),
        Err(DecisionError::MalformedSnapshot { .. })
    ));
}

#[test]
fn agents_share_one_configuration_across_threads() {
    let compiled = Arc::new(ControllerConfig::default().compile().unwrap());
    let expected = FuzzyController::from_compiled(Arc::clone(&compiled))
        .command(&open_space())
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let controller = FuzzyController::from_compiled(Arc::clone(&compiled));
            thread::spawn(move || controller.command(&open_space()).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn project_config_file_matches_builtin_preset() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fuzzpilot-config.yaml");
    let loaded = ControllerConfig::from_file(&path).unwrap();
    assert_eq!(loaded, ControllerConfig::default());
}
