//! I/O boundary traits for testability
//!
//! The external runtime sits behind `Launcher`, allowing the dispatcher
//! to be tested with mock implementations that never start a process.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::domain::ExecutionResult;
use crate::infrastructure::interrupt;

/// Everything needed to start one external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Added to the inherited environment
    pub env: BTreeMap<String, String>,
    /// `None` inherits the current directory
    pub working_dir: Option<PathBuf>,
}

/// Why a launch produced no execution result.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The process could not be started at all.
    #[error("{0}")]
    Spawn(#[source] io::Error),

    /// The process started, but waiting for it failed.
    #[error("waiting for pid {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: io::Error,
    },
}

/// External process launcher abstraction.
pub trait Launcher: Send + Sync {
    /// Start the process, wait for it, and report how it terminated.
    fn launch(&self, request: &LaunchRequest) -> Result<ExecutionResult, LaunchError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real launcher: inherits stdio, blocks until the child exits.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<ExecutionResult, LaunchError> {
        let mut command = Command::new(&request.program);
        command
            .args(&request.args)
            .envs(&request.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &request.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(LaunchError::Spawn)?;
        let pid = child.id();
        debug!("launch: spawned pid {}", pid);
        let _forwarding = interrupt::forward_to(pid);
        let status = child
            .wait()
            .map_err(|source| LaunchError::Wait { pid, source })?;

        Ok(execution_result(status))
    }
}

fn execution_result(status: ExitStatus) -> ExecutionResult {
    if let Some(code) = status.code() {
        return ExecutionResult::Exited(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExecutionResult::Signaled(signal);
        }
    }
    ExecutionResult::Exited(1)
}
