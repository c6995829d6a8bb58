// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading, validation, and merging for the relauncher.
//!
//! [`RelaunchConfig`] holds the runtime switch that decides whether
//! relaunching is permitted at all, plus the extra value-taking options. The
//! helpers here load it from TOML, apply environment overrides, parse
//! boolean/integer flag values, and produce advisory [`ConfigWarning`]s.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// A flag value could not be interpreted.
    #[error("illegal value for {key}: {value}")]
    InvalidValue {
        /// Name of the flag or variable.
        key: String,
        /// The raw value that was rejected.
        value: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation but deserve attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Relaunching has been switched off; every relaunch will be refused.
    RelaunchDisabled,
    /// An extra value option duplicates one of the built-in value options.
    RedundantValueOption {
        /// The duplicated option.
        option: String,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::RelaunchDisabled => {
                write!(f, "relaunching is disabled; relaunch requests will be refused")
            }
            ConfigWarning::RedundantValueOption { option } => {
                write!(f, "extra value option '{option}' is already built in")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Top-level runtime configuration for the relauncher.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct RelaunchConfig {
    /// Master switch. When `false`, relaunching is reported as unsupported
    /// even if the running process could be introspected.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level override (e.g. `"debug"`, `"info"`, `"warn"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Additional options that always consume the following token as their
    /// value, on top of the built-in set (`-cp`, `--module-path`, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_value_options: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for RelaunchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: Some("info".into()),
            extra_value_options: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Environment variable that force-enables or force-disables relaunching.
pub const ENV_ENABLED: &str = "RELAUNCH_ENABLED";

/// Environment variable that overrides the log level.
pub const ENV_LOG_LEVEL: &str = "RELAUNCH_LOG_LEVEL";

/// Recognised log levels.
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Options the parser already knows to take a value.
pub const BUILTIN_VALUE_OPTIONS: &[&str] = &[
    "-cp",
    "-classpath",
    "--class-path",
    "-p",
    "--module-path",
    "--upgrade-module-path",
    "--patch-module",
    "--add-reads",
    "--add-exports",
    "--add-opens",
    "--add-modules",
    "-d",
    "--describe-module",
    "--limit-modules",
    "-jar",
];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`RelaunchConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`RelaunchConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<RelaunchConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)?
        }
        None => RelaunchConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML string into a [`RelaunchConfig`].
pub fn parse_toml(content: &str) -> Result<RelaunchConfig, ConfigError> {
    toml::from_str::<RelaunchConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `RELAUNCH_ENABLED` (see [`parse_bool_flag`])
/// - `RELAUNCH_LOG_LEVEL`
pub fn apply_env_overrides(config: &mut RelaunchConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary key lookup instead of the process
/// environment.
pub fn apply_overrides_from<F>(config: &mut RelaunchConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_ENABLED) {
        config.enabled = parse_bool_flag(&val, config.enabled);
    }
    if let Some(val) = lookup(ENV_LOG_LEVEL)
        && !val.trim().is_empty()
    {
        config.log_level = Some(val);
    }
}

// ---------------------------------------------------------------------------
// Flag parsing
// ---------------------------------------------------------------------------

/// Interpret a boolean flag value.
///
/// Blank values yield `default`. `1`, `yes`, `y`, `on`, and `true` (any case)
/// are `true`; every other value, including a padded one such as `" true "`,
/// is `false`.
pub fn parse_bool_flag(raw: &str, default: bool) -> bool {
    if raw.trim().is_empty() {
        return default;
    }
    ["1", "yes", "y", "on", "true"]
        .iter()
        .any(|t| raw.eq_ignore_ascii_case(t))
}

/// Interpret an integer flag value.
///
/// Blank values yield `default`; `true`/`false` map to `1`/`0`. Non-blank
/// values are not trimmed.
pub fn parse_int_flag(key: &str, raw: &str, default: i64) -> Result<i64, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(default);
    }
    if raw.eq_ignore_ascii_case("true") {
        return Ok(1);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Ok(0);
    }
    raw.parse::<i64>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// Hard errors (unknown log level, malformed extra options) are returned as a
/// [`ConfigError::ValidationError`]; soft issues come back as warnings.
pub fn validate_config(config: &RelaunchConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if let Some(ref level) = config.log_level
        && !VALID_LOG_LEVELS.contains(&level.as_str())
    {
        errors.push(format!("invalid log_level '{level}'"));
    }

    for option in &config.extra_value_options {
        if option.trim().is_empty() {
            errors.push("extra value option must not be empty".into());
        } else if !option.starts_with('-') {
            errors.push(format!("extra value option '{option}' must start with '-'"));
        } else if BUILTIN_VALUE_OPTIONS.contains(&option.as_str()) {
            warnings.push(ConfigWarning::RedundantValueOption {
                option: option.clone(),
            });
        }
    }

    if !config.enabled {
        warnings.push(ConfigWarning::RelaunchDisabled);
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations. Values in `overlay` take precedence over `base`.
///
/// Relaunching stays enabled only if both sides enable it; extra value options
/// are combined without duplicates.
pub fn merge_configs(base: RelaunchConfig, overlay: RelaunchConfig) -> RelaunchConfig {
    let mut extra_value_options = base.extra_value_options;
    for option in overlay.extra_value_options {
        if !extra_value_options.contains(&option) {
            extra_value_options.push(option);
        }
    }
    RelaunchConfig {
        enabled: base.enabled && overlay.enabled,
        log_level: overlay.log_level.or(base.log_level),
        extra_value_options,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
