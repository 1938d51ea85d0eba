//! Error types for the replay agent.
//!
//! Configuration problems abort before the first tick. A bad snapshot line
//! aborts the replay and names the line, since the controller never repairs
//! caller input.

use fuzzpilot_core::{ConfigError, DecisionError};

/// Errors that can occur while running the agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The controller configuration could not be loaded or validated.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An environment variable holds an unusable value.
    #[error("invalid value for {name}: {value}")]
    Env {
        /// The variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Reading snapshots or writing commands failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot line is not valid JSON for a sensor snapshot.
    #[error("line {line}: invalid snapshot: {source}")]
    Snapshot {
        /// One-based input line number.
        line: usize,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The controller rejected a snapshot.
    #[error("line {line}: {source}")]
    Decision {
        /// One-based input line number.
        line: usize,
        /// The underlying decision error.
        source: DecisionError,
    },

    /// A command could not be serialized.
    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}
