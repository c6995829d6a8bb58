// SPDX-License-Identifier: MIT OR Apache-2.0
//! Launch descriptors and the introspection providers that produce them.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Snapshot of how a process was launched.
///
/// Either half may be unknown when the runtime does not expose it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchDescriptor {
    /// Path or name of the executable.
    pub executable: Option<String>,
    /// Raw arguments, without the executable itself.
    pub arguments: Option<Vec<String>>,
}

impl LaunchDescriptor {
    /// Create a fully known descriptor.
    pub fn new<I, S>(executable: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            executable: Some(executable.into()),
            arguments: Some(arguments.into_iter().map(Into::into).collect()),
        }
    }
}

/// Source of the running process's launch state.
pub trait Introspector {
    /// Path or name of the executable, if it can be determined.
    fn executable(&self) -> Option<String>;

    /// Launch arguments (excluding the executable), if they can be determined.
    fn arguments(&self) -> Option<Vec<String>>;

    /// Take a snapshot of both values.
    fn descriptor(&self) -> LaunchDescriptor {
        LaunchDescriptor {
            executable: self.executable(),
            arguments: self.arguments(),
        }
    }
}

/// Introspects the current process through `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentProcess;

impl Introspector for CurrentProcess {
    fn executable(&self) -> Option<String> {
        std::env::current_exe().ok()?.into_os_string().into_string().ok()
    }

    fn arguments(&self) -> Option<Vec<String>> {
        std::env::args_os()
            .skip(1)
            .map(|a| a.into_string().ok())
            .collect()
    }
}

/// Introspects any process through a procfs-style directory tree.
///
/// The executable comes from the `<root>/<pid>/exe` link and the arguments
/// from the NUL-separated `<root>/<pid>/cmdline`. Unreadable entries are
/// reported as unknown, never as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcfsProcess {
    pid: u32,
    proc_root: PathBuf,
}

impl ProcfsProcess {
    /// Inspect `pid` under `/proc`.
    pub fn new(pid: u32) -> Self {
        Self::with_root(pid, "/proc")
    }

    /// Inspect the calling process under `/proc`.
    pub fn current() -> Self {
        Self::new(std::process::id())
    }

    /// Inspect `pid` under an alternative procfs root.
    pub fn with_root(pid: u32, proc_root: impl Into<PathBuf>) -> Self {
        Self {
            pid,
            proc_root: proc_root.into(),
        }
    }

    /// The inspected process id.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    fn entry(&self, name: &str) -> PathBuf {
        self.proc_root.join(self.pid.to_string()).join(name)
    }

    /// Full `cmdline` contents including argv\[0\].
    fn cmdline(&self) -> Option<Vec<String>> {
        let raw = std::fs::read(self.entry("cmdline")).ok()?;
        parse_cmdline(&raw)
    }
}

impl Introspector for ProcfsProcess {
    fn executable(&self) -> Option<String> {
        let target = std::fs::read_link(self.entry("exe")).ok()?;
        target.into_os_string().into_string().ok()
    }

    fn arguments(&self) -> Option<Vec<String>> {
        let mut argv = self.cmdline()?;
        argv.remove(0);
        Some(argv)
    }
}

/// Split NUL-separated `cmdline` bytes; `None` for empty or non-UTF-8 content.
fn parse_cmdline(raw: &[u8]) -> Option<Vec<String>> {
    let trimmed = raw.strip_suffix(&[0u8]).unwrap_or(raw);
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .split(|b| *b == 0)
        .map(|part| String::from_utf8(part.to_vec()).ok())
        .collect()
}

/// A fixed descriptor, for embedding callers that already know the launch
/// state (and for tests).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLaunch {
    descriptor: LaunchDescriptor,
}

impl StaticLaunch {
    /// Wrap an existing descriptor.
    pub fn new(descriptor: LaunchDescriptor) -> Self {
        Self { descriptor }
    }

    /// Build from an executable and its arguments.
    pub fn from_argv<I, S>(executable: impl AsRef<Path>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(LaunchDescriptor::new(
            executable.as_ref().to_string_lossy(),
            arguments,
        ))
    }
}

impl Introspector for StaticLaunch {
    fn executable(&self) -> Option<String> {
        self.descriptor.executable.clone()
    }

    fn arguments(&self) -> Option<Vec<String>> {
        self.descriptor.arguments.clone()
    }

    fn descriptor(&self) -> LaunchDescriptor {
        self.descriptor.clone()
    }
}
