//! Crisp signal derivation from a raw sensor snapshot.
//!
//! The feeler scan is relative to the heading: sample `i` looks `i` degrees
//! counter-clockwise of the nose, so sample 0 is straight ahead and sample
//! 180 straight behind.

use fuzzpilot_types::{CrispSignal, FEELER_COUNT, SensorSnapshot};
use serde::Serialize;

use crate::config::SensingConfig;
use crate::sequencer::DecisionError;

const FRONT: usize = 0;
const BACK_LEFT: usize = 175;
const BACK: usize = 180;
const BACK_RIGHT: usize = 185;

/// Signed difference `a - b` in degrees, wrapped into `[-180, 180)`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    (a - b + 180.0).rem_euclid(360.0) - 180.0
}

/// Every crisp signal derived for one tick.
///
/// Optional signals are `None` when the simulation reported no reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorFrame {
    heading: f64,
    tracking: f64,
    speed: f64,
    front_distance: f64,
    back_distance: f64,
    back_left_distance: f64,
    back_right_distance: f64,
    closest_distance: f64,
    furthest_distance: f64,
    closest_diff: f64,
    furthest_diff: f64,
    going_backwards: f64,
    aim_diff: Option<f64>,
    enemy_distance: Option<f64>,
    shot_alert: Option<f64>,
}

impl SensorFrame {
    /// Derive the crisp signals of `snapshot`.
    ///
    /// Negative enemy distances and shot alerts are the simulation's "no
    /// reading" sentinel and map to `None`, as do enemy distances beyond
    /// `sensing.enemy_detection_range`.
    ///
    /// # Errors
    ///
    /// [`DecisionError::MalformedSnapshot`] when the feeler scan does not
    /// hold exactly [`FEELER_COUNT`] finite samples or a reading is NaN or
    /// infinite.
    pub fn derive(snapshot: &SensorSnapshot, sensing: &SensingConfig) -> Result<Self, DecisionError> {
        require_finite("heading_deg", snapshot.heading_deg)?;
        require_finite("tracking_deg", snapshot.tracking_deg)?;
        require_finite("speed", snapshot.speed)?;
        for (field, reading) in [
            ("aim_deg", snapshot.aim_deg),
            ("shot_alert", snapshot.shot_alert),
            ("enemy_distance", snapshot.enemy_distance),
        ] {
            if let Some(value) = reading {
                require_finite(field, value)?;
            }
        }

        let feelers = &snapshot.feelers;
        if feelers.len() != FEELER_COUNT {
            return Err(DecisionError::MalformedSnapshot {
                reason: format!("expected {FEELER_COUNT} feeler samples, got {}", feelers.len()),
            });
        }
        if let Some(index) = feelers.iter().position(|d| !d.is_finite()) {
            return Err(DecisionError::MalformedSnapshot {
                reason: format!("feeler sample {index} is not finite"),
            });
        }

        let (closest_index, closest_distance) = extreme(feelers, |candidate, best| candidate < best)?;
        let (furthest_index, furthest_distance) = extreme(feelers, |candidate, best| candidate > best)?;

        Ok(Self {
            heading: snapshot.heading_deg,
            tracking: snapshot.tracking_deg,
            speed: snapshot.speed,
            front_distance: feeler(feelers, FRONT)?,
            back_distance: feeler(feelers, BACK)?,
            back_left_distance: feeler(feelers, BACK_LEFT)?,
            back_right_distance: feeler(feelers, BACK_RIGHT)?,
            closest_distance,
            furthest_distance,
            closest_diff: angle_diff(f64::from(closest_index), 0.0),
            furthest_diff: angle_diff(f64::from(furthest_index), 0.0),
            going_backwards: angle_diff(snapshot.tracking_deg, snapshot.heading_deg).abs(),
            aim_diff: snapshot.aim_deg.map(|aim| angle_diff(aim, snapshot.heading_deg)),
            // A negative distance means no enemy, so the enemy-close rungs
            // stay quiet. Older agents compared the raw -1 and fired them.
            enemy_distance: snapshot
                .enemy_distance
                .filter(|d| (0.0..=sensing.enemy_detection_range).contains(d)),
            shot_alert: snapshot.shot_alert.filter(|&alert| alert >= 0.0),
        })
    }

    /// Value of `signal`, or `None` when the reading is absent this tick.
    pub fn get(&self, signal: CrispSignal) -> Option<f64> {
        match signal {
            CrispSignal::Heading => Some(self.heading),
            CrispSignal::Tracking => Some(self.tracking),
            CrispSignal::Speed => Some(self.speed),
            CrispSignal::FrontDistance => Some(self.front_distance),
            CrispSignal::BackDistance => Some(self.back_distance),
            CrispSignal::BackLeftDistance => Some(self.back_left_distance),
            CrispSignal::BackRightDistance => Some(self.back_right_distance),
            CrispSignal::ClosestDistance => Some(self.closest_distance),
            CrispSignal::FurthestDistance => Some(self.furthest_distance),
            CrispSignal::ClosestDiff => Some(self.closest_diff),
            CrispSignal::FurthestDiff => Some(self.furthest_diff),
            CrispSignal::AbsFurthestDiff => Some(self.furthest_diff.abs()),
            CrispSignal::GoingBackwards => Some(self.going_backwards),
            CrispSignal::AimDiff => self.aim_diff,
            CrispSignal::AbsAimDiff => self.aim_diff.map(f64::abs),
            CrispSignal::EnemyDistance => self.enemy_distance,
            CrispSignal::ShotAlert => self.shot_alert,
        }
    }
}

fn require_finite(field: &str, value: f64) -> Result<(), DecisionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DecisionError::MalformedSnapshot {
            reason: format!("{field} is not finite ({value})"),
        })
    }
}

fn feeler(feelers: &[f64], index: usize) -> Result<f64, DecisionError> {
    feelers
        .get(index)
        .copied()
        .ok_or_else(|| DecisionError::MalformedSnapshot {
            reason: format!("feeler sample {index} missing"),
        })
}

/// First `(index, distance)` that no later sample beats under `better`.
fn extreme<F>(feelers: &[f64], better: F) -> Result<(u16, f64), DecisionError>
where
    F: Fn(f64, f64) -> bool,
{
    let mut samples = (0_u16..).zip(feelers.iter().copied());
    let first = samples.next().ok_or_else(|| DecisionError::MalformedSnapshot {
        reason: "feeler scan is empty".to_owned(),
    })?;
    Ok(samples.fold(first, |best, candidate| {
        if better(candidate.1, best.1) {
            candidate
        } else {
            best
        }
    }))
}
