// SPDX-License-Identifier: MIT OR Apache-2.0
//! Whether relaunching is possible in the current environment.

use crate::descriptor::Introspector;
use relaunch_config::RelaunchConfig;
use std::fmt;

/// Why relaunching is not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// Switched off by configuration.
    Disabled,
    /// The executable of the running process is unknown.
    MissingExecutable,
    /// The launch arguments of the running process are unknown or empty.
    MissingArguments,
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::Disabled => write!(f, "relaunching is disabled by configuration"),
            UnsupportedReason::MissingExecutable => write!(f, "could not determine executable"),
            UnsupportedReason::MissingArguments => write!(f, "could not determine arguments"),
        }
    }
}

/// Result of a one-time capability probe.
///
/// Computed once (typically at startup) and handed to whatever needs it, so
/// tests can construct an unsupported capability directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaunchCapability {
    unsupported: Option<UnsupportedReason>,
}

impl RelaunchCapability {
    /// Probe `introspector` under the given configuration.
    pub fn detect(config: &RelaunchConfig, introspector: &dyn Introspector) -> Self {
        if !config.enabled {
            return Self::unsupported(UnsupportedReason::Disabled);
        }
        if introspector.executable().is_none() {
            return Self::unsupported(UnsupportedReason::MissingExecutable);
        }
        match introspector.arguments() {
            Some(args) if !args.is_empty() => Self::supported(),
            _ => Self::unsupported(UnsupportedReason::MissingArguments),
        }
    }

    /// A capability that permits relaunching.
    pub fn supported() -> Self {
        Self { unsupported: None }
    }

    /// A capability that refuses relaunching for `reason`.
    pub fn unsupported(reason: UnsupportedReason) -> Self {
        Self {
            unsupported: Some(reason),
        }
    }

    /// Returns `true` if relaunching is possible.
    pub fn is_supported(&self) -> bool {
        self.unsupported.is_none()
    }

    /// The reason relaunching is refused, if it is.
    pub fn reason(&self) -> Option<UnsupportedReason> {
        self.unsupported
    }
}

impl fmt::Display for RelaunchCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unsupported {
            None => write!(f, "supported"),
            Some(reason) => write!(f, "unsupported: {reason}"),
        }
    }
}
