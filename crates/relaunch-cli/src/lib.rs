// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Shared command implementations for the `relaunch` CLI.
//!
//! These functions are library-level so they can be tested without
//! spawning the binary.

use anyhow::{Context, Result};
use relaunch_config::RelaunchConfig;
use relaunch_core::{
    AssembledCommand, CurrentProcess, ProcfsProcess, Redirect, RelaunchRequest, Relauncher,
    StaticLaunch,
};
use schemars::schema_for;
use std::path::PathBuf;

/// Parse a `--stdin/--stdout/--stderr` value.
///
/// Accepts `pipe`, `inherit`, `discard`, `file:PATH`, and `append:PATH`.
pub fn parse_redirect(raw: &str) -> Result<Redirect> {
    let value = raw.trim();
    match value {
        "pipe" => return Ok(Redirect::Pipe),
        "inherit" => return Ok(Redirect::Inherit),
        "discard" => return Ok(Redirect::Discard),
        _ => {}
    }

    let (kind, path) = value.split_once(':').with_context(|| {
        format!("expected pipe|inherit|discard|file:PATH|append:PATH, got '{raw}'")
    })?;
    if path.is_empty() {
        anyhow::bail!("redirect '{kind}' needs a path (got '{raw}')");
    }
    match kind {
        "file" => Ok(Redirect::File(PathBuf::from(path))),
        "append" => Ok(Redirect::Append(PathBuf::from(path))),
        other => anyhow::bail!("unknown redirect kind '{other}'"),
    }
}

/// Which process the command line is taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchSource {
    /// The `relaunch` process itself.
    Current,
    /// Another process, read through `/proc`.
    Pid(u32),
    /// An explicit executable and argument list.
    Argv {
        /// Executable path.
        executable: String,
        /// Arguments after the executable.
        arguments: Vec<String>,
    },
}

impl LaunchSource {
    /// Pick the source from the CLI inputs; `--pid` and `--exe` are exclusive.
    pub fn from_inputs(
        pid: Option<u32>,
        executable: Option<String>,
        arguments: Vec<String>,
    ) -> Result<Self> {
        match (pid, executable) {
            (Some(_), Some(_)) => anyhow::bail!("--pid and --exe cannot be combined"),
            (Some(pid), None) => {
                if !arguments.is_empty() {
                    anyhow::bail!("launch arguments are only accepted together with --exe");
                }
                Ok(LaunchSource::Pid(pid))
            }
            (None, Some(executable)) => Ok(LaunchSource::Argv {
                executable,
                arguments,
            }),
            (None, None) if arguments.is_empty() => Ok(LaunchSource::Current),
            (None, None) => anyhow::bail!("launch arguments require --exe"),
        }
    }

    /// Refuse to run the `relaunch` process itself unchanged.
    ///
    /// Reconstructing our own command line yields `relaunch run ...` again,
    /// which would spawn itself indefinitely; a replacement entry point breaks
    /// the cycle.
    pub fn ensure_runnable(&self, main: Option<&str>) -> Result<()> {
        if *self == LaunchSource::Current && main.is_none() {
            anyhow::bail!(
                "run needs --pid, --exe, or --main; relaunching this command unchanged would run it again"
            );
        }
        Ok(())
    }

    /// Build a relauncher inspecting this source.
    pub fn relauncher(self, config: &RelaunchConfig) -> Relauncher {
        match self {
            LaunchSource::Current => Relauncher::new(config, CurrentProcess),
            LaunchSource::Pid(pid) => Relauncher::new(config, ProcfsProcess::new(pid)),
            LaunchSource::Argv {
                executable,
                arguments,
            } => Relauncher::new(config, StaticLaunch::from_argv(executable, arguments)),
        }
    }
}

/// Turn `--main` / `--arg` into a request. Without `--arg` the original
/// arguments are kept.
pub fn build_request(main: Option<String>, args: Vec<String>) -> RelaunchRequest {
    let mut request = RelaunchRequest::new();
    if let Some(main) = main {
        request = request.with_entry_point(main);
    }
    if !args.is_empty() {
        request = request.with_arguments(args);
    }
    request
}

/// Render an assembled command: pretty JSON, or one argv token per line.
pub fn render_plan(command: &AssembledCommand, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(command).context("serialize plan");
    }
    let mut out = command.argv().join("\n");
    out.push('\n');
    Ok(out)
}

/// Return the JSON schema of the configuration file.
pub fn schema_json() -> Result<String> {
    let value = serde_json::to_value(schema_for!(RelaunchConfig))?;
    serde_json::to_string_pretty(&value).context("serialize schema")
}

/// Tracing filter directive for the given flags and configured level.
pub fn filter_directive(debug: bool, config: &RelaunchConfig) -> String {
    if debug {
        return "relaunch=debug".into();
    }
    format!(
        "relaunch={}",
        config.log_level.as_deref().unwrap_or("info")
    )
}
