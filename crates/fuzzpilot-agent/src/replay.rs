//! Snapshot replay loop.
//!
//! Reads one [`SensorSnapshot`] per input line, runs it through the
//! controller, and writes one command per output line. Blank lines are
//! skipped. The first bad line ends the replay with its line number.

use std::io::{BufRead, Write};

use fuzzpilot_core::FuzzyController;
use fuzzpilot_types::{ActuatorCommand, SensorSnapshot, Turn};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AgentError;

/// One output line in compact mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    /// Simulation tick the command answers.
    pub tick: u64,
    /// The actuator command.
    #[serde(flatten)]
    pub command: ActuatorCommand,
}

/// Counters reported when a replay finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Snapshots decided.
    pub ticks: u64,
    /// Ticks with thrust engaged.
    pub thrust: u64,
    /// Ticks with a shot fired.
    pub fire: u64,
    /// Ticks turning left.
    pub left: u64,
    /// Ticks turning right.
    pub right: u64,
    /// Blank input lines skipped.
    pub skipped: u64,
}

impl ReplayStats {
    fn record(&mut self, command: ActuatorCommand) {
        self.ticks = self.ticks.saturating_add(1);
        if command.thrust {
            self.thrust = self.thrust.saturating_add(1);
        }
        if command.fire {
            self.fire = self.fire.saturating_add(1);
        }
        match command.turn {
            Turn::Left => self.left = self.left.saturating_add(1),
            Turn::Right => self.right = self.right.saturating_add(1),
            Turn::None => {}
        }
    }
}

/// Replay every snapshot from `input` through `controller` into `output`.
///
/// With `trace` set, each output line is the full decision (outputs, rule
/// strengths, and the rung that chose the turn) instead of the bare
/// command.
pub fn replay<R, W>(
    controller: &FuzzyController,
    input: R,
    mut output: W,
    trace: bool,
) -> Result<ReplayStats, AgentError>
where
    R: BufRead,
    W: Write,
{
    let mut stats = ReplayStats::default();

    for (index, line) in input.lines().enumerate() {
        let line_number = index.saturating_add(1);
        let line = line?;
        if line.trim().is_empty() {
            warn!(line = line_number, "skipping blank snapshot line");
            stats.skipped = stats.skipped.saturating_add(1);
            continue;
        }

        let snapshot: SensorSnapshot =
            serde_json::from_str(&line).map_err(|source| AgentError::Snapshot {
                line: line_number,
                source,
            })?;
        let decision = controller
            .decide(&snapshot)
            .map_err(|source| AgentError::Decision {
                line: line_number,
                source,
            })?;

        if trace {
            serde_json::to_writer(&mut output, &decision)?;
        } else {
            let compact = CommandLine {
                tick: decision.tick,
                command: decision.command,
            };
            serde_json::to_writer(&mut output, &compact)?;
        }
        output.write_all(b"\n")?;

        debug!(line = line_number, tick = decision.tick, "command written");
        stats.record(decision.command);
    }

    output.flush()?;
    Ok(stats)
}
