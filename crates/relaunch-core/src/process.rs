// SPDX-License-Identifier: MIT OR Apache-2.0
//! Spawning an assembled command and the handle to the resulting child.

use crate::assemble::AssembledCommand;
use crate::error::RelaunchError;
use crate::request::{RelaunchRequest, StdStream};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, ExitStatus};
use tracing::debug;

/// A relaunched child process.
///
/// The child runs independently; nothing here waits on it or reads its
/// output unless the caller asks.
#[derive(Debug)]
pub struct RelaunchedProcess {
    child: Child,
    command: AssembledCommand,
}

impl RelaunchedProcess {
    /// Spawn `command` with the stream policy of `request`.
    ///
    /// Redirect targets are opened before the child is started, stdin first
    /// so a missing input file fails before any output file is touched.
    /// Output files opened with [`Redirect::File`](crate::Redirect::File) are
    /// created or truncated at that point and stay that way if a later
    /// redirect or the spawn itself fails.
    pub fn spawn(
        command: AssembledCommand,
        request: &RelaunchRequest,
    ) -> Result<Self, RelaunchError> {
        let stdin = request.stdin.to_stdio(StdStream::Stdin)?;
        let stdout = request.stdout.to_stdio(StdStream::Stdout)?;
        let stderr = request.stderr.to_stdio(StdStream::Stderr)?;

        let argv = command.argv();
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]).stdin(stdin).stdout(stdout).stderr(stderr);

        let child = cmd.spawn().map_err(|source| RelaunchError::Spawn {
            program: command.executable.clone(),
            source,
        })?;
        debug!(target: "relaunch", pid = child.id(), "spawned relaunched process");

        Ok(Self { child, command })
    }

    /// OS process identifier.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// The command the child was started with.
    pub fn command(&self) -> &AssembledCommand {
        &self.command
    }

    /// Take the child's stdin, if it was piped.
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.child.stdin.take()
    }

    /// Take the child's stdout, if it was piped.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Take the child's stderr, if it was piped.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    /// Block until the child exits.
    pub fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait()
    }

    /// Return the exit status if the child has already exited.
    pub fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Block until the child exits and return its exit code (`None` if it
    /// was terminated by a signal).
    pub fn exit_code(&mut self) -> std::io::Result<Option<i32>> {
        Ok(self.wait()?.code())
    }

    /// Ask the OS to terminate the child.
    pub fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill()
    }

    /// Consume self and return the inner parts for manual management.
    pub fn into_parts(self) -> (Child, AssembledCommand) {
        (self.child, self.command)
    }
}
