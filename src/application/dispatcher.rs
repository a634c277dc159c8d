//! Dispatcher: name + raw args → validated request → launch → exit status.
//!
//! Per invocation the flow is `Validating → Executing → Terminal`. Validation
//! errors never reach the launcher and nothing is retried once it ran.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::parser::{self, Parsed};
use crate::application::registry::CommandRegistry;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::ExecutionResult;
use crate::infrastructure::runtime::RuntimeTarget;
use crate::infrastructure::traits::{LaunchError, Launcher};

/// Successful dispatch outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// External process exited with status 0.
    Completed,
    /// Help was requested; nothing was launched.
    Help(String),
}

/// Routes invocations through the registry to the launcher.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    launcher: Arc<dyn Launcher>,
    runtime: RuntimeTarget,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        launcher: Arc<dyn Launcher>,
        settings: Arc<Settings>,
    ) -> Self {
        let runtime = RuntimeTarget::from_settings(&settings);
        Self {
            registry,
            launcher,
            runtime,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run one command to completion.
    ///
    /// # Errors
    /// - `Domain(UnknownCommand)` when `name` is not registered
    /// - `Usage` / `Domain(ArityMismatch)` on bad input, before any launch
    /// - `LaunchFailure` when the runtime could not be started
    /// - `WaitFailure` when it started but its status was lost
    /// - `NonZeroExit` / `SignalTermination` for a failed or interrupted run
    #[instrument(skip(self))]
    pub fn execute(&self, name: &str, raw_args: &[String]) -> ApplicationResult<Outcome> {
        let descriptor = self.registry.lookup(name)?;
        let request = match parser::parse(descriptor, raw_args)? {
            Parsed::Help(text) => return Ok(Outcome::Help(text)),
            Parsed::Request(request) => request,
        };
        let argv = request.argument_vector()?;
        debug!("execute: validated {} argv=[{}]", name, argv);

        let launch = self.runtime.launch_request(&request, &argv);
        info!(
            "execute: launching {} {}",
            launch.program.display(),
            launch.args.join(" ")
        );
        let result = self
            .launcher
            .launch(&launch)
            .map_err(|e| match e {
                LaunchError::Spawn(source) => ApplicationError::LaunchFailure {
                    program: launch.program.clone(),
                    source,
                },
                LaunchError::Wait { pid, source } => ApplicationError::WaitFailure {
                    command: name.to_string(),
                    pid,
                    source,
                },
            })?;
        debug!("execute: {} finished with {:?}", name, result);

        match result {
            ExecutionResult::Exited(0) => Ok(Outcome::Completed),
            ExecutionResult::Exited(code) => Err(ApplicationError::NonZeroExit {
                command: name.to_string(),
                code,
            }),
            ExecutionResult::Signaled(signal) => {
                warn!("execute: {} terminated by signal {}", name, signal);
                Err(ApplicationError::SignalTermination {
                    command: name.to_string(),
                    signal,
                })
            }
        }
    }
}
