//! fsadmin: filesystem administration operations dispatched to an external runtime.
//!
//! Each operation is a plain [`domain::CommandDescriptor`] held by an
//! [`application::CommandRegistry`]. The [`application::Dispatcher`] parses raw
//! arguments against the descriptor, builds the argument vector, and runs the
//! external runtime through an [`infrastructure::traits::Launcher`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
