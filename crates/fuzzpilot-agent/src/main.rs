//! Replay agent for the fuzzpilot decision engine.
//!
//! Stands in for the game client: loads the controller configuration once,
//! then feeds it sensor snapshots (JSON lines) and writes the resulting
//! actuator commands (JSON lines).
//!
//! ```text
//! snapshots.jsonl --> FuzzyController --> commands.jsonl
//! ```
//!
//! Logs go to stderr so stdout stays a clean command stream.

mod config;
mod error;
mod replay;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use fuzzpilot_core::FuzzyController;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{AgentConfig, ConfigSource, STDIO, load_controller_config};
use crate::error::AgentError;

/// Application entry point.
///
/// Reads the environment, loads and validates the controller
/// configuration, initializes logging, and replays every snapshot.
///
/// # Errors
///
/// Returns an error if configuration is invalid, I/O fails, or a snapshot
/// is rejected.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let agent_config = AgentConfig::from_env()?;
    let (controller_config, source) = load_controller_config(&agent_config.config_path)?;

    init_logging(&controller_config.logging.level, agent_config.log_json);

    info!("fuzzpilot-agent starting");
    if source == ConfigSource::Preset {
        warn!(
            path = %agent_config.config_path.display(),
            "config file not found, using built-in preset"
        );
    }

    let controller = FuzzyController::new(&controller_config).map_err(AgentError::from)?;
    info!(
        config = %agent_config.config_path.display(),
        input = agent_config.input,
        output = agent_config.output,
        trace = agent_config.trace,
        "controller ready"
    );

    let input = open_input(&agent_config.input)?;
    let output = open_output(&agent_config.output)?;
    let stats = replay::replay(&controller, input, output, agent_config.trace)?;

    info!(
        ticks = stats.ticks,
        thrust = stats.thrust,
        fire = stats.fire,
        left = stats.left,
        right = stats.right,
        skipped = stats.skipped,
        "replay finished"
    );
    Ok(())
}

/// Initialize structured logging. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>, AgentError> {
    if path == STDIO {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

fn open_output(path: &str) -> Result<Box<dyn Write>, AgentError> {
    if path == STDIO {
        Ok(Box::new(BufWriter::new(io::stdout().lock())))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}
