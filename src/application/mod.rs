//! Application layer: registry, parsing and dispatch
//!
//! This layer orchestrates the command model and depends on I/O boundary traits.

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod parser;
pub mod registry;

pub use dispatcher::{Dispatcher, Outcome};
pub use error::{ApplicationError, ApplicationResult};
pub use registry::CommandRegistry;
