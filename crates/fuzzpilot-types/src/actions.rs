//! Actuator command emitted by the controller once per tick.

use serde::{Deserialize, Serialize};

use crate::enums::Turn;

/// The crisp output of one controller tick.
///
/// Carries no memory of earlier ticks; any hysteresis belongs to the
/// caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActuatorCommand {
    /// Engage thrust this tick.
    pub thrust: bool,
    /// Turn direction this tick.
    pub turn: Turn,
    /// Fire a shot this tick.
    pub fire: bool,
}
