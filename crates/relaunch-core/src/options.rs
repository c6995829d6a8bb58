// SPDX-License-Identifier: MIT OR Apache-2.0
//! Token classification for VM launch arguments.

use relaunch_config::{BUILTIN_VALUE_OPTIONS, RelaunchConfig};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Prefix of options that attach an instrumentation agent.
pub const AGENT_PREFIX: &str = "-javaagent";

/// Prefixes of options that start a flight recording.
pub const FLIGHT_RECORDING_PREFIXES: [&str; 2] =
    ["-XX:StartFlightRecording=", "-XX:StartFlightRecording:"];

/// The option that runs a jar as the entry point.
pub const JAR_OPTION: &str = "-jar";

/// What a single (already unescaped) token means to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// An option that consumes the following token as its value.
    ValueOption,
    /// An `@file` reference.
    ArgumentFile,
    /// The first non-option token.
    EntryPoint,
    /// An instrumentation agent option.
    Agent,
    /// A flight recording option.
    FlightRecording,
    /// Any other option.
    Option,
}

/// The set of options known to take a separate value token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionTable {
    value_options: BTreeSet<String>,
}

impl Default for OptionTable {
    fn default() -> Self {
        Self {
            value_options: BUILTIN_VALUE_OPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl OptionTable {
    /// Built-in options plus the configured extras.
    pub fn from_config(config: &RelaunchConfig) -> Self {
        let mut table = Self::default();
        table
            .value_options
            .extend(config.extra_value_options.iter().cloned());
        table
    }

    /// Returns `true` if `option` consumes the next token.
    pub fn takes_value(&self, option: &str) -> bool {
        self.value_options.contains(option)
    }

    /// Classify an unescaped token.
    pub fn classify(&self, token: &str) -> TokenClass {
        if self.takes_value(token) {
            TokenClass::ValueOption
        } else if !token.starts_with('-') {
            if token.len() > 1 && token.starts_with('@') {
                TokenClass::ArgumentFile
            } else {
                TokenClass::EntryPoint
            }
        } else if token.starts_with(AGENT_PREFIX) {
            TokenClass::Agent
        } else if FLIGHT_RECORDING_PREFIXES
            .iter()
            .any(|p| token.starts_with(p))
        {
            TokenClass::FlightRecording
        } else {
            TokenClass::Option
        }
    }
}

/// Undo the quoting some launchers apply to arguments containing spaces.
///
/// `"a b"` becomes `a b`; `-Dkey="a b"` becomes `-Dkey=a b`.
pub fn unescape(arg: &str) -> Cow<'_, str> {
    if arg.len() > 1 && arg.ends_with('"') {
        if arg.starts_with('"') {
            return Cow::Owned(arg[1..arg.len() - 1].to_string());
        }
        if arg.contains("=\"") {
            let mut replaced = arg.replace("=\"", "=");
            replaced.pop();
            return Cow::Owned(replaced);
        }
    }
    Cow::Borrowed(arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_every_branch() {
        let table = OptionTable::default();
        assert_eq!(table.classify("-cp"), TokenClass::ValueOption);
        assert_eq!(table.classify("-jar"), TokenClass::ValueOption);
        assert_eq!(table.classify("@args.txt"), TokenClass::ArgumentFile);
        assert_eq!(table.classify("@"), TokenClass::EntryPoint);
        assert_eq!(table.classify("com.example.Main"), TokenClass::EntryPoint);
        assert_eq!(
            table.classify("-javaagent:jacoco.jar=destfile=a.exec"),
            TokenClass::Agent
        );
        assert_eq!(
            table.classify("-XX:StartFlightRecording=filename=a.jfr"),
            TokenClass::FlightRecording
        );
        assert_eq!(
            table.classify("-XX:StartFlightRecording:filename=a.jfr"),
            TokenClass::FlightRecording
        );
        assert_eq!(table.classify("-Xmx1g"), TokenClass::Option);
        assert_eq!(table.classify("--enable-preview"), TokenClass::Option);
    }

    #[test]
    fn extra_value_options_are_honoured() {
        let cfg = RelaunchConfig {
            extra_value_options: vec!["--source-path".into()],
            ..Default::default()
        };
        let table = OptionTable::from_config(&cfg);
        assert!(table.takes_value("--source-path"));
        assert!(table.takes_value("-cp"));
        assert!(!OptionTable::default().takes_value("--source-path"));
    }

    #[test]
    fn unescape_strips_surrounding_quotes() {
        assert_eq!(unescape("\"a b\""), "a b");
        assert_eq!(unescape("\"\""), "");
    }

    #[test]
    fn unescape_normalizes_quoted_values() {
        assert_eq!(unescape("-Dkey=\"a b\""), "-Dkey=a b");
    }

    #[test]
    fn unescape_leaves_other_tokens_alone() {
        assert!(matches!(unescape("plain"), Cow::Borrowed("plain")));
        assert_eq!(unescape("\""), "\"");
        assert_eq!(unescape("ends-with\""), "ends-with\"");
        assert_eq!(unescape("\"starts-only"), "\"starts-only");
    }
}
