//! Raw sensor snapshot delivered by the simulation once per tick.
//!
//! The snapshot is the only input to a controller tick. Optional readings
//! are `None` when the simulation reports no signal (no target acquired,
//! no enemy detected, no shot alert).

use serde::{Deserialize, Serialize};

/// Number of samples in a full radial wall-feeler scan (one per degree).
pub const FEELER_COUNT: usize = 360;

/// One tick's worth of sensor readings.
///
/// Readings are used as given, fractions included. Callers that want the
/// whole-degree, whole-unit behavior of agents which truncate their
/// readings (so a speed of 0.5 counts as stopped) must truncate `speed`,
/// `heading_deg`, `tracking_deg` and `aim_deg` before building the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Simulation tick the readings belong to.
    #[serde(default)]
    pub tick: u64,
    /// Ship heading in degrees.
    pub heading_deg: f64,
    /// Direction of travel in degrees.
    pub tracking_deg: f64,
    /// Ship speed.
    pub speed: f64,
    /// Aim direction to the nearest target in degrees, if one is acquired.
    #[serde(default)]
    pub aim_deg: Option<f64>,
    /// Incoming-shot alert intensity (0-100), if an alert is active.
    #[serde(default)]
    pub shot_alert: Option<f64>,
    /// Distance to the nearest enemy, if one is reported.
    #[serde(default)]
    pub enemy_distance: Option<f64>,
    /// Wall distances; sample `i` is measured at `heading_deg + i` degrees.
    pub feelers: Vec<f64>,
}
