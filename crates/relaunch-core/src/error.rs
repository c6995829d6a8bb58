// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for relaunch operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reconstructing and spawning a relaunched process.
#[derive(Debug, Error)]
pub enum RelaunchError {
    /// The running process could not be introspected, or relaunching was
    /// switched off by configuration.
    #[error("relaunch unsupported: {0}")]
    Unsupported(String),

    /// An `@file` argument file could not be read.
    #[error("failed to read argument file {}: {source}", .path.display())]
    ArgumentFile {
        /// The referenced argument file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A file used for stream redirection could not be opened.
    #[error("failed to open redirect target {}: {source}", .path.display())]
    Redirect {
        /// The redirect target.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The OS refused to create the child process.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// The executable that was being started.
        program: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl RelaunchError {
    /// Returns `true` for capability failures the caller may recover from by
    /// not relaunching at all.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, RelaunchError::Unsupported(_))
    }
}
