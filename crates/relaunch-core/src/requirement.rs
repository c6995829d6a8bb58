// SPDX-License-Identifier: MIT OR Apache-2.0
//! Test-gating conditions based on relaunch support.
//!
//! Test harnesses call these predicates to decide whether a test that needs
//! (or must not have) relaunch support should run.

use crate::capability::RelaunchCapability;
use crate::descriptor::Introspector;

/// Outcome of evaluating an execution condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionResult {
    /// Run the test.
    Enabled(String),
    /// Skip the test.
    Disabled(String),
}

impl ConditionResult {
    /// Returns `true` if the test should run.
    pub fn is_enabled(&self) -> bool {
        matches!(self, ConditionResult::Enabled(_))
    }

    /// Human-readable explanation.
    pub fn reason(&self) -> &str {
        match self {
            ConditionResult::Enabled(r) | ConditionResult::Disabled(r) => r,
        }
    }

    /// Combine several results: the first disabled one wins.
    pub fn all<I>(results: I) -> ConditionResult
    where
        I: IntoIterator<Item = ConditionResult>,
    {
        let mut last = None;
        for result in results {
            if !result.is_enabled() {
                return result;
            }
            last = Some(result);
        }
        last.unwrap_or_else(|| ConditionResult::Enabled("unconditional execution".into()))
    }
}

/// Requires relaunch support to be present (or absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkRequirement {
    /// Whether relaunch support is expected.
    pub fork_supported: bool,
    /// Message shown when the expectation does not hold.
    pub message: Option<String>,
}

impl ForkRequirement {
    /// Require relaunch support.
    pub fn supported() -> Self {
        Self {
            fork_supported: true,
            message: None,
        }
    }

    /// Require the absence of relaunch support.
    pub fn unsupported() -> Self {
        Self {
            fork_supported: false,
            message: None,
        }
    }

    /// Attach a message for the disabled case.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Evaluate against a probed capability.
    pub fn evaluate(&self, capability: &RelaunchCapability) -> ConditionResult {
        if self.fork_supported == capability.is_supported() {
            return ConditionResult::Enabled("relaunch support status as expected".into());
        }
        let reason = self.message.clone().unwrap_or_else(|| {
            if self.fork_supported {
                format!("relaunch support required but {capability}")
            } else {
                "relaunch support must be absent but is available".into()
            }
        });
        ConditionResult::Disabled(reason)
    }
}

/// Requires the launch arguments of the inspected process to be readable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgumentsRequirement;

impl ArgumentsRequirement {
    /// Evaluate against an introspection provider.
    pub fn evaluate(&self, introspector: &dyn Introspector) -> ConditionResult {
        match introspector.arguments() {
            Some(args) if !args.is_empty() => {
                ConditionResult::Enabled("command-line arguments available".into())
            }
            _ => ConditionResult::Disabled("cannot get command-line arguments".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::UnsupportedReason;

    #[test]
    fn empty_combination_is_unconditional() {
        let r = ConditionResult::all(Vec::new());
        assert!(r.is_enabled());
        assert_eq!(r.reason(), "unconditional execution");
    }

    #[test]
    fn first_disabled_wins() {
        let r = ConditionResult::all([
            ConditionResult::Enabled("a".into()),
            ConditionResult::Disabled("b".into()),
            ConditionResult::Disabled("c".into()),
        ]);
        assert_eq!(r, ConditionResult::Disabled("b".into()));
    }

    #[test]
    fn fork_requirement_uses_custom_message() {
        let cap = RelaunchCapability::unsupported(UnsupportedReason::MissingArguments);
        let r = ForkRequirement::supported()
            .with_message("needs a second VM")
            .evaluate(&cap);
        assert_eq!(r, ConditionResult::Disabled("needs a second VM".into()));
    }
}
