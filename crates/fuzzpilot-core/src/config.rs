//! Configuration loading, validation, and typed config structures.
//!
//! The canonical configuration lives in `fuzzpilot-config.yaml` at the
//! workspace root and mirrors the built-in [`preset`](crate::preset) tables.
//! Every section has a default, so a partial file only overrides what it
//! names.
//!
//! A [`ControllerConfig`] is raw, deserialized data. [`ControllerConfig::compile`]
//! validates it once at startup into an immutable [`CompiledConfig`]; any
//! inconsistency aborts startup with a [`ConfigError`] instead of surfacing
//! as wrong behavior mid-game.

use std::collections::BTreeMap;
use std::path::Path;

use fuzzpilot_types::{Channel, CrispSignal, LadderRung, NormalizationRange, Rule, Trapezoid};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ladder::TurningLadder;
use crate::preset;
use crate::registry::Registry;
use crate::rules::RuleBase;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A linguistic variable declares no labels.
    #[error("variable {variable} declares no labels")]
    EmptyVariable {
        /// The offending variable.
        variable: String,
    },

    /// A normalization range is empty, inverted, or not finite.
    #[error("variable {variable} has invalid normalization range [{min}, {max}]")]
    InvalidRange {
        /// The offending variable.
        variable: String,
        /// Declared minimum.
        min: f64,
        /// Declared maximum.
        max: f64,
    },

    /// A trapezoid violates `a <= b <= c <= d` or has a non-finite corner.
    #[error("trapezoid {variable}.{label} is malformed: {corners:?} (need a <= b <= c <= d)")]
    MalformedTrapezoid {
        /// The variable the trapezoid belongs to.
        variable: String,
        /// The member label.
        label: String,
        /// The declared corners.
        corners: [f64; 4],
    },

    /// A label appears twice within one variable.
    #[error("variable {variable} declares label {label} more than once")]
    DuplicateLabel {
        /// The offending variable.
        variable: String,
        /// The repeated label.
        label: String,
    },

    /// Two variables, inputs, rules, or ladder rungs share a name.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// What kind of entry was repeated.
        kind: &'static str,
        /// The repeated name.
        name: String,
    },

    /// An input is bound to a variable that does not exist.
    #[error("input {input} refers to unknown variable {variable}")]
    UnknownVariable {
        /// The input binding.
        input: String,
        /// The missing variable.
        variable: String,
    },

    /// A rule or rung refers to an input that does not exist.
    #[error("{context} refers to unknown input {input}")]
    UnknownInput {
        /// The rule or rung making the reference.
        context: String,
        /// The missing input.
        input: String,
    },

    /// A rule or rung refers to a label its input's variable does not have.
    #[error("{context} refers to unknown label {input}.{label}")]
    UnknownLabel {
        /// The rule or rung making the reference.
        context: String,
        /// The input binding.
        input: String,
        /// The missing label.
        label: String,
    },

    /// An input's no-signal fuzzy set is inconsistent with its variable.
    #[error("input {input} has invalid fallback: {reason}")]
    InvalidFallback {
        /// The input binding.
        input: String,
        /// What is wrong with the fallback.
        reason: String,
    },

    /// The rule base is empty.
    #[error("rule set is empty")]
    EmptyRuleSet,

    /// An output channel has no rule feeding it.
    #[error("no rule feeds output channel {channel}")]
    ChannelWithoutRules {
        /// The starved channel.
        channel: Channel,
    },

    /// The turning ladder has no rungs.
    #[error("turning ladder is empty")]
    EmptyLadder,

    /// A numeric setting is NaN or infinite.
    #[error("{context} must be finite, got {value}")]
    NonFiniteValue {
        /// Which setting.
        context: String,
        /// The offending value.
        value: f64,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level controller configuration.
///
/// Mirrors the structure of `fuzzpilot-config.yaml`. All sections default
/// to the built-in preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Sensor interpretation settings.
    #[serde(default)]
    pub sensing: SensingConfig,

    /// Fuzzy vocabularies, trapezoids in raw units.
    #[serde(default = "preset::variables")]
    pub variables: Vec<VariableConfig>,

    /// Bindings from crisp signals to variables.
    #[serde(default = "preset::inputs")]
    pub inputs: Vec<InputConfig>,

    /// Fuzzy rule base.
    #[serde(default = "preset::rules")]
    pub rules: Vec<Rule>,

    /// Defuzzification defaults and gate thresholds per channel.
    #[serde(default)]
    pub outputs: OutputsConfig,

    /// Priority-ordered crisp turning ladder.
    #[serde(default = "preset::turning")]
    pub turning: Vec<LadderRung>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            sensing: SensingConfig::default(),
            variables: preset::variables(),
            inputs: preset::inputs(),
            rules: preset::rules(),
            outputs: OutputsConfig::default(),
            turning: preset::turning(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Validate the configuration into its immutable runtime form.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: malformed trapezoids,
    /// invalid ranges, duplicate or dangling names, empty rule sets or
    /// ladder, or non-finite thresholds.
    pub fn compile(&self) -> Result<CompiledConfig, ConfigError> {
        self.sensing.validate()?;
        self.outputs.validate()?;

        let registry = Registry::build(&self.variables, &self.inputs)?;
        let rules = RuleBase::build(&self.rules, &self.outputs, &registry)?;
        let ladder = TurningLadder::build(&self.turning, &registry)?;

        info!(
            variables = registry.variables().count(),
            inputs = registry.inputs().len(),
            rules = rules.rules().len(),
            rungs = ladder.rungs().len(),
            "controller configuration compiled"
        );

        Ok(CompiledConfig {
            sensing: self.sensing.clone(),
            registry,
            rules,
            ladder,
        })
    }
}

/// Validated, immutable configuration shared by every tick.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    sensing: SensingConfig,
    registry: Registry,
    rules: RuleBase,
    ladder: TurningLadder,
}

impl CompiledConfig {
    /// Sensor interpretation settings.
    pub const fn sensing(&self) -> &SensingConfig {
        &self.sensing
    }

    /// Linguistic variables and input bindings.
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Rule base with per-channel output settings.
    pub const fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// Turning ladder.
    pub const fn ladder(&self) -> &TurningLadder {
        &self.ladder
    }
}

/// Sensor interpretation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensingConfig {
    /// Enemy readings farther than this are treated as "no enemy".
    #[serde(default = "default_enemy_detection_range")]
    pub enemy_detection_range: f64,
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            enemy_detection_range: default_enemy_detection_range(),
        }
    }
}

impl SensingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_finite("sensing.enemy_detection_range", self.enemy_detection_range)
    }
}

/// A linguistic variable as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    /// Variable name.
    pub name: String,
    /// Raw-unit range mapped onto `[0, 1]`, written `[min, max]`.
    pub range: NormalizationRange,
    /// Ordered members, trapezoids in raw units.
    pub members: Vec<MemberConfig>,
}

/// One labeled trapezoid as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberConfig {
    /// Label, unique within the variable.
    pub label: String,
    /// Trapezoid `[a, b, c, d]` in raw units.
    pub trapezoid: Trapezoid,
}

/// Binding of a crisp signal to a linguistic variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Input name referenced by rules and ladder conditions.
    pub name: String,
    /// Variable used to fuzzify the signal.
    pub variable: String,
    /// Crisp signal feeding this input.
    pub signal: CrispSignal,
    /// No-signal fuzzy set used when the signal is absent. Labels left out
    /// get degree 0. Without a fallback an absent signal is an error.
    #[serde(default)]
    pub fallback: Option<BTreeMap<String, f64>>,
}

/// Defuzzification settings for both output channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputsConfig {
    /// Thrust channel.
    #[serde(default)]
    pub thrust: OutputConfig,
    /// Shoot channel.
    #[serde(default)]
    pub shoot: OutputConfig,
}

impl OutputsConfig {
    /// Settings for `channel`.
    pub const fn channel(&self, channel: Channel) -> &OutputConfig {
        match channel {
            Channel::Thrust => &self.thrust,
            Channel::Shoot => &self.shoot,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for channel in Channel::ALL {
            let output = self.channel(channel);
            require_finite(&format!("outputs.{channel}.default_value"), output.default_value)?;
            require_finite(&format!("outputs.{channel}.threshold"), output.threshold)?;
        }
        Ok(())
    }
}

/// Defuzzification default and gate threshold for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Crisp output when no rule for the channel fires.
    #[serde(default)]
    pub default_value: f64,
    /// The actuator engages only when the output is strictly above this.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_value: 0.0,
            threshold: default_threshold(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Fail with [`ConfigError::NonFiniteValue`] unless `value` is finite.
pub(crate) fn require_finite(context: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteValue {
            context: context.to_owned(),
            value,
        })
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_enemy_detection_range() -> f64 {
    9000.0
}

const fn default_threshold() -> f64 {
    0.1
}

fn default_log_level() -> String {
    "info".to_owned()
}
