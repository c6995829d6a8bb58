// SPDX-License-Identifier: MIT OR Apache-2.0
//! Customization points for command assembly.

use crate::assemble::AssembledCommand;

/// Whether a hook took care of an emission step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The hook emitted (or deliberately dropped) the token(s); skip the default.
    Handled,
    /// Fall through to the default emission.
    NotHandled,
}

/// Strategy object consulted at every emission point of the assembler.
///
/// Every method defaults to [`HookOutcome::NotHandled`]. An implementation
/// that returns [`HookOutcome::Handled`] is responsible for writing whatever
/// it wants into `cmd`.
pub trait RelaunchHooks {
    /// The executable token.
    fn on_executable(&self, _executable: &str, _cmd: &mut AssembledCommand) -> HookOutcome {
        HookOutcome::NotHandled
    }

    /// A valueless option, including rewritten agent/recording options.
    fn on_option(&self, _option: &str, _cmd: &mut AssembledCommand) -> HookOutcome {
        HookOutcome::NotHandled
    }

    /// An option together with its value token.
    fn on_option_value(
        &self,
        _option: &str,
        _value: &str,
        _cmd: &mut AssembledCommand,
    ) -> HookOutcome {
        HookOutcome::NotHandled
    }

    /// An instrumentation agent option, before any destination rewrite.
    fn on_agent(&self, _option: &str, _cmd: &mut AssembledCommand) -> HookOutcome {
        HookOutcome::NotHandled
    }

    /// A flight recording option, before any destination rewrite.
    fn on_flight_recording(&self, _option: &str, _cmd: &mut AssembledCommand) -> HookOutcome {
        HookOutcome::NotHandled
    }

    /// The entry point, after overrides were applied.
    fn on_entry_point(
        &self,
        _entry_point: Option<&str>,
        _cmd: &mut AssembledCommand,
    ) -> HookOutcome {
        HookOutcome::NotHandled
    }

    /// The trailing arguments, after overrides were applied.
    fn on_arguments(&self, _arguments: &[String], _cmd: &mut AssembledCommand) -> HookOutcome {
        HookOutcome::NotHandled
    }
}

/// Hooks that never intervene.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl RelaunchHooks for DefaultHooks {}
