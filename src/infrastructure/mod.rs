//! Infrastructure layer: process launching and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod interrupt;
pub mod runtime;
pub mod traits;

pub use error::{InfraError, InfraResult};
