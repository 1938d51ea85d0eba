//! Enumeration types for the fuzzpilot decision engine.
//!
//! All enums serialize as `snake_case` strings so configuration files and
//! JSON-lines command streams stay readable.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Output channels
// ---------------------------------------------------------------------------

/// An independent defuzzified output of the fuzzy rule base.
///
/// Each rule contributes one weighted pair to exactly one channel; channels
/// are accumulated and defuzzified independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Main engine thrust (on/off after gating).
    Thrust,
    /// Weapon fire (fire/hold after gating).
    Shoot,
}

impl Channel {
    /// Every channel, in evaluation order.
    pub const ALL: [Self; 2] = [Self::Thrust, Self::Shoot];

    /// Stable label for logging and diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thrust => "thrust",
            Self::Shoot => "shoot",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Turn direction
// ---------------------------------------------------------------------------

/// Turn command for one tick.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    /// Rotate counter-clockwise (positive angle difference).
    Left,
    /// Rotate clockwise (zero or negative angle difference).
    Right,
    /// Hold the current heading.
    #[default]
    None,
}

impl Turn {
    /// Pick a turn direction from the sign of an angle difference.
    ///
    /// A strictly positive difference turns left, anything else turns
    /// right. Flipping this convention mirrors the agent's behavior.
    pub fn toward(diff_deg: f64) -> Self {
        if diff_deg > 0.0 { Self::Left } else { Self::Right }
    }

    /// The mirrored direction; [`Turn::None`] stays put.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    /// Stable label for logging and diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::None => "none",
        }
    }
}

// ---------------------------------------------------------------------------
// Crisp signals
// ---------------------------------------------------------------------------

/// A crisp value derived from the raw sensor snapshot each tick.
///
/// Signals feed fuzzy inputs (through a linguistic variable) and the
/// conditions of the turning ladder. Angle differences are in degrees in
/// `[-180, 180)`, positive meaning counter-clockwise of the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrispSignal {
    /// Ship heading in degrees.
    Heading,
    /// Direction of travel in degrees.
    Tracking,
    /// Ship speed.
    Speed,
    /// Wall distance straight ahead.
    FrontDistance,
    /// Wall distance straight behind.
    BackDistance,
    /// Wall distance five degrees left of straight behind.
    BackLeftDistance,
    /// Wall distance five degrees right of straight behind.
    BackRightDistance,
    /// Shortest wall distance over the whole feeler scan.
    ClosestDistance,
    /// Longest wall distance over the whole feeler scan.
    FurthestDistance,
    /// Angle from the heading to the closest wall.
    ClosestDiff,
    /// Angle from the heading to the most open direction.
    FurthestDiff,
    /// Magnitude of [`CrispSignal::FurthestDiff`].
    AbsFurthestDiff,
    /// Angle between heading and direction of travel, `0..=180`.
    GoingBackwards,
    /// Angle from the heading to the aim direction. Absent with no target.
    AimDiff,
    /// Magnitude of [`CrispSignal::AimDiff`]. Absent with no target.
    AbsAimDiff,
    /// Distance to the nearest enemy. Absent when none is detected.
    EnemyDistance,
    /// Incoming-shot alert intensity, `0..=100`. Absent when no alert.
    ShotAlert,
}

impl CrispSignal {
    /// Every signal, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::Heading,
        Self::Tracking,
        Self::Speed,
        Self::FrontDistance,
        Self::BackDistance,
        Self::BackLeftDistance,
        Self::BackRightDistance,
        Self::ClosestDistance,
        Self::FurthestDistance,
        Self::ClosestDiff,
        Self::FurthestDiff,
        Self::AbsFurthestDiff,
        Self::GoingBackwards,
        Self::AimDiff,
        Self::AbsAimDiff,
        Self::EnemyDistance,
        Self::ShotAlert,
    ];

    /// Stable label matching the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Tracking => "tracking",
            Self::Speed => "speed",
            Self::FrontDistance => "front_distance",
            Self::BackDistance => "back_distance",
            Self::BackLeftDistance => "back_left_distance",
            Self::BackRightDistance => "back_right_distance",
            Self::ClosestDistance => "closest_distance",
            Self::FurthestDistance => "furthest_distance",
            Self::ClosestDiff => "closest_diff",
            Self::FurthestDiff => "furthest_diff",
            Self::AbsFurthestDiff => "abs_furthest_diff",
            Self::GoingBackwards => "going_backwards",
            Self::AimDiff => "aim_diff",
            Self::AbsAimDiff => "abs_aim_diff",
            Self::EnemyDistance => "enemy_distance",
            Self::ShotAlert => "shot_alert",
        }
    }
}

impl fmt::Display for CrispSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

/// Comparison operator used by turning-ladder conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `lhs < rhs`
    Lt,
    /// `lhs <= rhs`
    Le,
    /// `lhs > rhs`
    Gt,
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
    /// `lhs != rhs`
    Ne,
}

impl Comparison {
    /// Apply the operator. Any comparison involving NaN is false except `Ne`.
    #[allow(clippy::float_cmp)]
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
        }
    }

    /// Operator symbol for logging.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}
