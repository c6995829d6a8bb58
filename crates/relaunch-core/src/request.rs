// SPDX-License-Identifier: MIT OR Apache-2.0
//! What the caller wants the relaunched process to look like.

use crate::error::RelaunchError;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::process::Stdio;

/// Where one of the child's standard streams goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Redirect {
    /// A pipe readable/writable by the caller through the child handle.
    #[default]
    Pipe,
    /// Share the parent's stream.
    Inherit,
    /// Discard output / provide empty input.
    Discard,
    /// Read input from, or write (truncating) output to, a file.
    File(PathBuf),
    /// Read input from, or append output to, a file.
    Append(PathBuf),
}

/// Which standard stream a [`Redirect`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    /// Standard input.
    Stdin,
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl Redirect {
    /// Build the [`Stdio`] for `stream`, opening files as needed.
    pub fn to_stdio(&self, stream: StdStream) -> Result<Stdio, RelaunchError> {
        let open = |path: &PathBuf, append: bool| {
            let result = if stream == StdStream::Stdin {
                File::open(path)
            } else if append {
                OpenOptions::new().create(true).append(true).open(path)
            } else {
                File::create(path)
            };
            result.map(Stdio::from).map_err(|source| RelaunchError::Redirect {
                path: path.clone(),
                source,
            })
        };
        match self {
            Redirect::Pipe => Ok(Stdio::piped()),
            Redirect::Inherit => Ok(Stdio::inherit()),
            Redirect::Discard => Ok(Stdio::null()),
            Redirect::File(path) => open(path, false),
            Redirect::Append(path) => open(path, true),
        }
    }
}

/// Overrides and stream policy for one relaunch.
///
/// Unset overrides reuse what the running process was launched with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelaunchRequest {
    /// Replacement entry point.
    pub entry_point: Option<String>,
    /// Replacement trailing arguments.
    pub arguments: Option<Vec<String>>,
    /// Policy for the child's stdin.
    pub stdin: Redirect,
    /// Policy for the child's stdout.
    pub stdout: Redirect,
    /// Policy for the child's stderr.
    pub stderr: Redirect,
}

impl RelaunchRequest {
    /// A request that reuses everything and pipes all three streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `entry_point` instead of the original one.
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = Some(entry_point.into());
        self
    }

    /// Pass `arguments` instead of the original trailing arguments.
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = Some(arguments.into_iter().map(Into::into).collect());
        self
    }

    /// Set the stdin policy.
    pub fn with_stdin(mut self, redirect: Redirect) -> Self {
        self.stdin = redirect;
        self
    }

    /// Set the stdout policy.
    pub fn with_stdout(mut self, redirect: Redirect) -> Self {
        self.stdout = redirect;
        self
    }

    /// Set the stderr policy.
    pub fn with_stderr(mut self, redirect: Redirect) -> Self {
        self.stderr = redirect;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pipe_everything_and_override_nothing() {
        let req = RelaunchRequest::new();
        assert_eq!(req.entry_point, None);
        assert_eq!(req.arguments, None);
        assert_eq!(req.stdin, Redirect::Pipe);
        assert_eq!(req.stdout, Redirect::Pipe);
        assert_eq!(req.stderr, Redirect::Pipe);
    }

    #[test]
    fn builder_sets_overrides() {
        let req = RelaunchRequest::new()
            .with_entry_point("com.example.Child")
            .with_arguments(["a", "b"])
            .with_stderr(Redirect::Discard);
        assert_eq!(req.entry_point.as_deref(), Some("com.example.Child"));
        assert_eq!(req.arguments, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(req.stderr, Redirect::Discard);
    }

    #[test]
    fn empty_argument_override_is_distinct_from_none() {
        let req = RelaunchRequest::new().with_arguments(Vec::<String>::new());
        assert_eq!(req.arguments, Some(Vec::new()));
    }

    #[test]
    fn missing_input_file_is_a_redirect_error() {
        let err = Redirect::File("/nonexistent/input.txt".into())
            .to_stdio(StdStream::Stdin)
            .unwrap_err();
        assert!(matches!(err, RelaunchError::Redirect { .. }));
    }

    #[test]
    fn output_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        Redirect::Append(path.clone())
            .to_stdio(StdStream::Stdout)
            .unwrap();
        assert!(path.exists());
    }
}
