// SPDX-License-Identifier: MIT OR Apache-2.0
//! relaunch-core
//!
//! Reconstructs the command line of a running VM-style process and spawns an
//! equivalent child.
//!
//! The running process is described by an [`Introspector`]. A
//! [`RelaunchCapability`] is probed once; a [`Relauncher`] then walks the
//! original arguments (unquoting, honouring value-taking options, expanding
//! `@file` argument files), moves agent and flight-recording output files to
//! fresh siblings, applies the entry point / argument overrides of a
//! [`RelaunchRequest`], and spawns the result. Every emission step can be
//! intercepted through [`RelaunchHooks`].
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod assemble;
pub mod capability;
pub mod descriptor;
pub mod error;
pub mod hooks;
pub mod options;
pub mod process;
pub mod relauncher;
pub mod request;
pub mod requirement;
pub mod rewrite;

pub use assemble::{AssembledCommand, CommandAssembler, RelaunchNote};
pub use capability::{RelaunchCapability, UnsupportedReason};
pub use descriptor::{CurrentProcess, Introspector, LaunchDescriptor, ProcfsProcess, StaticLaunch};
pub use error::RelaunchError;
pub use hooks::{DefaultHooks, HookOutcome, RelaunchHooks};
pub use options::{OptionTable, TokenClass};
pub use process::RelaunchedProcess;
pub use relauncher::Relauncher;
pub use request::{Redirect, RelaunchRequest, StdStream};
pub use requirement::{ArgumentsRequirement, ConditionResult, ForkRequirement};
pub use rewrite::{DestinationKey, RewrittenOption};
