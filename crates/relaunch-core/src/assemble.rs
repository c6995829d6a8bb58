// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reconstruction of a launch command from a [`LaunchDescriptor`].

use crate::descriptor::LaunchDescriptor;
use crate::error::RelaunchError;
use crate::hooks::{HookOutcome, RelaunchHooks};
use crate::options::{JAR_OPTION, OptionTable, TokenClass, unescape};
use crate::request::RelaunchRequest;
use crate::rewrite::{DestinationKey, rewrite_destination};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Advisory produced while assembling a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelaunchNote {
    /// An output file was moved to a fresh sibling for the child.
    DestinationRewritten {
        /// The option as it appeared in the parent.
        option: String,
        /// The parent's destination.
        original: PathBuf,
        /// The child's destination.
        replacement: PathBuf,
    },
    /// An agent or recording option had no recognisable destination file and
    /// was passed through unchanged; data from the child may be incomplete.
    DestinationUnmatched {
        /// The option, unchanged.
        option: String,
    },
}

impl fmt::Display for RelaunchNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelaunchNote::DestinationRewritten { replacement, .. } => {
                write!(f, "writing data for relaunched process to {}", replacement.display())
            }
            RelaunchNote::DestinationUnmatched { option } => write!(
                f,
                "data may be incomplete for code only run in the relaunched process ({option})"
            ),
        }
    }
}

/// The command vector for a relaunch, built once and consumed by the spawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssembledCommand {
    /// The executable token.
    pub executable: String,
    /// Runtime options, in original order.
    pub options: Vec<String>,
    /// The entry point, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    /// Arguments passed to the entry point.
    pub arguments: Vec<String>,
    /// Advisories collected while assembling.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<RelaunchNote>,
}

impl AssembledCommand {
    /// The full command vector: executable, options, entry point, arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(2 + self.options.len() + self.arguments.len());
        argv.push(self.executable.clone());
        argv.extend(self.options.iter().cloned());
        argv.extend(self.entry_point.iter().cloned());
        argv.extend(self.arguments.iter().cloned());
        argv
    }
}

/// Walks a descriptor's arguments and builds an [`AssembledCommand`].
pub struct CommandAssembler<'a> {
    options: &'a OptionTable,
    hooks: &'a dyn RelaunchHooks,
}

/// Entry point and trailing arguments found in the original launch.
#[derive(Debug, Default)]
struct Tail {
    entry_point: Option<String>,
    arguments: Vec<String>,
}

impl<'a> CommandAssembler<'a> {
    /// Create an assembler over an option table and a set of hooks.
    pub fn new(options: &'a OptionTable, hooks: &'a dyn RelaunchHooks) -> Self {
        Self { options, hooks }
    }

    /// Reconstruct the launch in `descriptor`, applying `request`'s overrides.
    pub fn assemble(
        &self,
        descriptor: &LaunchDescriptor,
        request: &RelaunchRequest,
    ) -> Result<AssembledCommand, RelaunchError> {
        let executable = descriptor
            .executable
            .as_deref()
            .ok_or_else(|| RelaunchError::Unsupported("could not determine executable".into()))?;
        let arguments = descriptor
            .arguments
            .as_ref()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| RelaunchError::Unsupported("could not determine arguments".into()))?;

        let mut cmd = AssembledCommand::default();
        if self.hooks.on_executable(executable, &mut cmd) == HookOutcome::NotHandled {
            cmd.executable = executable.to_string();
        }

        let mut queue: VecDeque<String> = arguments.iter().cloned().collect();
        let tail = self.parse_options(&mut queue, &mut cmd)?;

        let entry_point = request.entry_point.clone().or(tail.entry_point);
        if self.hooks.on_entry_point(entry_point.as_deref(), &mut cmd) == HookOutcome::NotHandled {
            cmd.entry_point = entry_point;
        }

        let arguments = request.arguments.clone().unwrap_or(tail.arguments);
        if self.hooks.on_arguments(&arguments, &mut cmd) == HookOutcome::NotHandled {
            cmd.arguments.extend(arguments);
        }

        debug!(target: "relaunch", argv = ?cmd.argv(), "assembled command");
        Ok(cmd)
    }

    /// Consume options until the entry point (or the end of the queue).
    fn parse_options(
        &self,
        queue: &mut VecDeque<String>,
        cmd: &mut AssembledCommand,
    ) -> Result<Tail, RelaunchError> {
        while let Some(raw) = queue.pop_front() {
            let arg = unescape(&raw).into_owned();
            match self.options.classify(&arg) {
                TokenClass::ValueOption => match queue.pop_front() {
                    Some(value) => self.emit_option_value(&arg, &unescape(&value), cmd),
                    None => self.emit_option(&arg, cmd),
                },
                TokenClass::ArgumentFile => splice_argument_file(Path::new(&arg[1..]), queue)?,
                TokenClass::EntryPoint => {
                    return Ok(Tail {
                        entry_point: Some(arg),
                        arguments: queue.drain(..).collect(),
                    });
                }
                TokenClass::Agent => {
                    if self.hooks.on_agent(&arg, cmd) == HookOutcome::NotHandled {
                        self.emit_rewritten(&arg, DestinationKey::DestFile, cmd);
                    }
                }
                TokenClass::FlightRecording => {
                    if self.hooks.on_flight_recording(&arg, cmd) == HookOutcome::NotHandled {
                        self.emit_rewritten(&arg, DestinationKey::FileName, cmd);
                    }
                }
                TokenClass::Option => self.emit_option(&arg, cmd),
            }
        }
        Ok(Tail::default())
    }

    fn emit_option(&self, option: &str, cmd: &mut AssembledCommand) {
        if self.hooks.on_option(option, cmd) == HookOutcome::NotHandled {
            cmd.options.push(option.to_string());
        }
    }

    fn emit_option_value(&self, option: &str, value: &str, cmd: &mut AssembledCommand) {
        if self.hooks.on_option_value(option, value, cmd) == HookOutcome::NotHandled {
            // The entry point is always passed explicitly, so a jar only
            // contributes its classpath.
            let option = if option == JAR_OPTION { "-cp" } else { option };
            cmd.options.push(option.to_string());
            cmd.options.push(value.to_string());
        }
    }

    fn emit_rewritten(&self, option: &str, key: DestinationKey, cmd: &mut AssembledCommand) {
        match rewrite_destination(option, key) {
            Some(rw) => {
                info!(
                    target: "relaunch",
                    destination = %rw.replacement.display(),
                    "writing {} data for relaunched process to a separate file",
                    key.as_str()
                );
                self.emit_option(&rw.option, cmd);
                cmd.notes.push(RelaunchNote::DestinationRewritten {
                    option: option.to_string(),
                    original: rw.original,
                    replacement: rw.replacement,
                });
            }
            None => {
                warn!(
                    target: "relaunch",
                    option,
                    "no {} in option; data may be incomplete for code only run in the relaunched process",
                    key.as_str()
                );
                self.emit_option(option, cmd);
                cmd.notes.push(RelaunchNote::DestinationUnmatched {
                    option: option.to_string(),
                });
            }
        }
    }
}

/// Read `path` and put its lines at the front of `queue`, in order.
fn splice_argument_file(path: &Path, queue: &mut VecDeque<String>) -> Result<(), RelaunchError> {
    let content = std::fs::read_to_string(path).map_err(|source| RelaunchError::ArgumentFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(target: "relaunch", path = %path.display(), "expanding argument file");
    for line in content.lines().rev() {
        queue.push_front(line.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::DefaultHooks;

    fn assemble(args: &[&str], request: &RelaunchRequest) -> AssembledCommand {
        let table = OptionTable::default();
        CommandAssembler::new(&table, &DefaultHooks)
            .assemble(&LaunchDescriptor::new("java", args.iter().copied()), request)
            .unwrap()
    }

    #[test]
    fn splits_options_entry_point_and_arguments() {
        let cmd = assemble(
            &["-Xmx1g", "-cp", "lib.jar", "com.example.Main", "--verbose", "x"],
            &RelaunchRequest::new(),
        );
        assert_eq!(cmd.executable, "java");
        assert_eq!(cmd.options, vec!["-Xmx1g", "-cp", "lib.jar"]);
        assert_eq!(cmd.entry_point.as_deref(), Some("com.example.Main"));
        assert_eq!(cmd.arguments, vec!["--verbose", "x"]);
        assert!(cmd.notes.is_empty());
    }

    #[test]
    fn jar_becomes_classpath() {
        let cmd = assemble(&["-jar", "app.jar", "arg"], &RelaunchRequest::new());
        assert_eq!(cmd.options, vec!["-cp", "app.jar"]);
        assert_eq!(cmd.entry_point.as_deref(), Some("arg"));
    }

    #[test]
    fn options_only_invocation_has_no_entry_point() {
        let cmd = assemble(&["-version"], &RelaunchRequest::new());
        assert_eq!(cmd.entry_point, None);
        assert!(cmd.arguments.is_empty());
        assert_eq!(cmd.argv(), vec!["java", "-version"]);
    }

    #[test]
    fn dangling_value_option_is_kept() {
        let cmd = assemble(&["-Xss1m", "-cp"], &RelaunchRequest::new());
        assert_eq!(cmd.options, vec!["-Xss1m", "-cp"]);
        assert_eq!(cmd.entry_point, None);
    }

    #[test]
    fn note_display_names_new_file() {
        let note = RelaunchNote::DestinationRewritten {
            option: "-javaagent:a.jar=destfile=a.exec".into(),
            original: "a.exec".into(),
            replacement: "a-forked-1.exec".into(),
        };
        assert!(note.to_string().ends_with("a-forked-1.exec"));
    }
}
