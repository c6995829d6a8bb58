// SPDX-License-Identifier: MIT OR Apache-2.0
//! The relaunch entry point tying introspection, assembly, and spawning together.

use crate::assemble::{AssembledCommand, CommandAssembler};
use crate::capability::RelaunchCapability;
use crate::descriptor::Introspector;
use crate::error::RelaunchError;
use crate::hooks::{DefaultHooks, RelaunchHooks};
use crate::options::OptionTable;
use crate::process::RelaunchedProcess;
use crate::request::RelaunchRequest;
use relaunch_config::RelaunchConfig;

/// Relaunches the process described by an [`Introspector`].
///
/// ```no_run
/// use relaunch_core::{CurrentProcess, RelaunchRequest, Relauncher};
/// use relaunch_config::RelaunchConfig;
///
/// let relauncher = Relauncher::new(&RelaunchConfig::default(), CurrentProcess);
/// if relauncher.is_supported() {
///     let mut child = relauncher
///         .relaunch(&RelaunchRequest::new().with_entry_point("com.example.Worker"))
///         .unwrap();
///     child.wait().unwrap();
/// }
/// ```
pub struct Relauncher {
    capability: RelaunchCapability,
    introspector: Box<dyn Introspector>,
    options: OptionTable,
    hooks: Box<dyn RelaunchHooks>,
}

impl std::fmt::Debug for Relauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relauncher")
            .field("capability", &self.capability)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Relauncher {
    /// Probe `introspector` once and build a relauncher for it.
    pub fn new(config: &RelaunchConfig, introspector: impl Introspector + 'static) -> Self {
        let capability = RelaunchCapability::detect(config, &introspector);
        Self {
            capability,
            introspector: Box::new(introspector),
            options: OptionTable::from_config(config),
            hooks: Box::new(DefaultHooks),
        }
    }

    /// Build a relauncher with an externally computed capability.
    pub fn with_capability(
        capability: RelaunchCapability,
        introspector: impl Introspector + 'static,
    ) -> Self {
        Self {
            capability,
            introspector: Box::new(introspector),
            options: OptionTable::default(),
            hooks: Box::new(DefaultHooks),
        }
    }

    /// Replace the option table.
    pub fn with_options(mut self, options: OptionTable) -> Self {
        self.options = options;
        self
    }

    /// Install customization hooks.
    pub fn with_hooks(mut self, hooks: impl RelaunchHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// The capability this relauncher was built with.
    pub fn capability(&self) -> RelaunchCapability {
        self.capability
    }

    /// Returns `true` if [`Relauncher::relaunch`] can be expected to work.
    pub fn is_supported(&self) -> bool {
        self.capability.is_supported()
    }

    /// Assemble the command a relaunch would run, without spawning it.
    pub fn plan(&self, request: &RelaunchRequest) -> Result<AssembledCommand, RelaunchError> {
        if let Some(reason) = self.capability.reason() {
            return Err(RelaunchError::Unsupported(reason.to_string()));
        }
        let descriptor = self.introspector.descriptor();
        CommandAssembler::new(&self.options, self.hooks.as_ref()).assemble(&descriptor, request)
    }

    /// Assemble and spawn the relaunched process.
    pub fn relaunch(&self, request: &RelaunchRequest) -> Result<RelaunchedProcess, RelaunchError> {
        let command = self.plan(request)?;
        RelaunchedProcess::spawn(command, request)
    }
}
