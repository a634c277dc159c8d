//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the command model.
/// These are independent of process and configuration concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("command already registered: {0}")]
    DuplicateName(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("{command}: expected {expected} argument(s), got {actual}\nusage: {usage}")]
    ArityMismatch {
        command: String,
        expected: String,
        actual: usize,
        usage: String,
    },

    /// Flag values disagree with the descriptor. Always a logic defect.
    #[error("internal invariant violated for '{command}': {message}")]
    InvariantViolation { command: String, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
