//! CLI-level errors (wraps infrastructure errors)

use std::io::ErrorKind;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => application_exit_code(app),
            },
        }
    }

    /// The external process already reported its own failure.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            CliError::Infra(InfraError::Application(
                ApplicationError::NonZeroExit { .. }
            ))
        )
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Domain(domain) => match domain {
            DomainError::UnknownCommand(_) | DomainError::ArityMismatch { .. } => {
                crate::exitcode::USAGE
            }
            DomainError::DuplicateName(_)
            | DomainError::InvalidDescriptor { .. }
            | DomainError::InvariantViolation { .. } => crate::exitcode::SOFTWARE,
        },
        ApplicationError::Usage { .. } => crate::exitcode::USAGE,
        ApplicationError::LaunchFailure { source, .. } => match source.kind() {
            ErrorKind::NotFound => crate::exitcode::NOTFOUND,
            ErrorKind::PermissionDenied => crate::exitcode::NOEXEC,
            _ => crate::exitcode::OSERR,
        },
        ApplicationError::WaitFailure { .. } => crate::exitcode::IOERR,
        ApplicationError::NonZeroExit { code, .. } => *code,
        ApplicationError::SignalTermination { signal, .. } => crate::exitcode::signaled(*signal),
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
    }
}
