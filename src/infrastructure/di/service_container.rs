//! Service container for dependency injection
//!
//! Wires the registry, launcher and settings into a dispatcher.

use std::sync::Arc;

use crate::application::catalog::fs_registry;
use crate::application::{ApplicationResult, CommandRegistry, Dispatcher};
use crate::config::Settings;
use crate::infrastructure::traits::{Launcher, ProcessLauncher};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Registered `fs` operations
    pub registry: Arc<CommandRegistry>,

    /// External process launcher
    pub launcher: Arc<dyn Launcher>,
}

impl ServiceContainer {
    /// Create a new service container with the `fs` catalog and a real launcher.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        let registry = fs_registry(&settings.runtime.shell_class)?;
        Ok(Self::with_deps(
            settings,
            registry,
            Arc::new(ProcessLauncher),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        registry: CommandRegistry,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            registry: Arc::new(registry),
            launcher,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.launcher),
            Arc::clone(&self.settings),
        )
    }
}
