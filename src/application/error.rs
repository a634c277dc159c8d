//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add dispatch-level outcomes.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Flag parsing rejected the input; `message` carries the rendered usage.
    #[error("{message}")]
    Usage { command: String, message: String },

    #[error("failed to launch {}: {source}", program.display())]
    LaunchFailure {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The runtime started but its status could not be collected.
    #[error("lost track of {command} (pid {pid}): {source}")]
    WaitFailure {
        command: String,
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with status {code}")]
    NonZeroExit { command: String, code: i32 },

    #[error("{command} terminated by signal {signal}")]
    SignalTermination { command: String, signal: i32 },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
