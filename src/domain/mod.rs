//! Domain layer: command model and argument construction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod entities;
pub mod error;
pub mod invocation;

pub use builder::{build_argv, ArgumentVector};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use invocation::{InvocationRequest, RuntimeOptions};
