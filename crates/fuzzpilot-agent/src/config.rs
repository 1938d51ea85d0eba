//! Agent configuration loaded from environment variables.
//!
//! The controller tables themselves live in the YAML file named by
//! `FUZZPILOT_CONFIG`; this module only decides where things are read from
//! and written to.

use std::path::{Path, PathBuf};

use fuzzpilot_core::{ConfigError, ControllerConfig};

use crate::error::AgentError;

/// Default controller configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "fuzzpilot-config.yaml";

/// Path value meaning stdin or stdout.
pub const STDIO: &str = "-";

/// Complete agent configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Controller configuration file.
    pub config_path: PathBuf,
    /// Snapshot source, one JSON object per line. `-` is stdin.
    pub input: String,
    /// Command sink, one JSON object per line. `-` is stdout.
    pub output: String,
    /// Emit the full decision trace instead of the bare command.
    pub trace: bool,
    /// Log as JSON instead of human-readable text.
    pub log_json: bool,
}

impl AgentConfig {
    /// Load configuration from the process environment.
    ///
    /// Optional variables:
    /// - `FUZZPILOT_CONFIG` -- controller YAML (default `fuzzpilot-config.yaml`)
    /// - `FUZZPILOT_INPUT` -- snapshot path or `-` (default `-`)
    /// - `FUZZPILOT_OUTPUT` -- command path or `-` (default `-`)
    /// - `FUZZPILOT_TRACE` -- `true` to emit full decision traces
    /// - `FUZZPILOT_LOG_FORMAT` -- `text` (default) or `json`
    pub fn from_env() -> Result<Self, AgentError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AgentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let trace = match lookup("FUZZPILOT_TRACE") {
            None => false,
            Some(value) => parse_bool("FUZZPILOT_TRACE", &value)?,
        };
        let log_json = match lookup("FUZZPILOT_LOG_FORMAT").as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(AgentError::Env {
                    name: "FUZZPILOT_LOG_FORMAT",
                    value: other.to_owned(),
                });
            }
        };

        Ok(Self {
            config_path: lookup("FUZZPILOT_CONFIG")
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from),
            input: lookup("FUZZPILOT_INPUT").unwrap_or_else(|| STDIO.to_owned()),
            output: lookup("FUZZPILOT_OUTPUT").unwrap_or_else(|| STDIO.to_owned()),
            trace,
            log_json,
        })
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, AgentError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AgentError::Env {
            name,
            value: value.to_owned(),
        }),
    }
}

/// Where the controller configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from the configured file.
    File,
    /// The file does not exist; the built-in preset is in use.
    Preset,
}

/// Load the controller configuration, falling back to the built-in preset
/// when the file does not exist.
///
/// A file that exists but cannot be read or parsed is an error.
pub fn load_controller_config(path: &Path) -> Result<(ControllerConfig, ConfigSource), ConfigError> {
    if !path.exists() {
        return Ok((ControllerConfig::default(), ConfigSource::Preset));
    }
    Ok((ControllerConfig::from_file(path)?, ConfigSource::File))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_read_stdin_and_write_stdout() {
        let config = AgentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(config.input, STDIO);
        assert_eq!(config.output, STDIO);
        assert!(!config.trace);
        assert!(!config.log_json);
    }

    #[test]
    fn overrides_are_honored() {
        let config = AgentConfig::from_lookup(lookup(&[
            ("FUZZPILOT_CONFIG", "/etc/fuzzpilot.yaml"),
            ("FUZZPILOT_INPUT", "ticks.jsonl"),
            ("FUZZPILOT_OUTPUT", "commands.jsonl"),
            ("FUZZPILOT_TRACE", "TRUE"),
            ("FUZZPILOT_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.config_path, PathBuf::from("/etc/fuzzpilot.yaml"));
        assert_eq!(config.input, "ticks.jsonl");
        assert_eq!(config.output, "commands.jsonl");
        assert!(config.trace);
        assert!(config.log_json);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            AgentConfig::from_lookup(lookup(&[("FUZZPILOT_TRACE", "maybe")])),
            Err(AgentError::Env { name: "FUZZPILOT_TRACE", .. })
        ));
        assert!(matches!(
            AgentConfig::from_lookup(lookup(&[("FUZZPILOT_LOG_FORMAT", "xml")])),
            Err(AgentError::Env { name: "FUZZPILOT_LOG_FORMAT", .. })
        ));
    }

    #[test]
    fn missing_config_file_uses_preset() {
        let (config, source) =
            load_controller_config(Path::new("/definitely/not/fuzzpilot.yaml")).unwrap();
        assert_eq!(source, ConfigSource::Preset);
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn project_config_file_is_loaded() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(DEFAULT_CONFIG_PATH);
        let (_, source) = load_controller_config(&path).unwrap();
        assert_eq!(source, ConfigSource::File);
    }
}
