//! Command registry: the flat name → descriptor table.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{CommandDescriptor, DomainError, DomainResult};

/// Owns every registered descriptor for the lifetime of the process.
///
/// Read-only after startup; share it behind an `Arc` for concurrent lookup.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor. The registry is unchanged when this fails.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> DomainResult<()> {
        descriptor.validate()?;
        if self.commands.contains_key(&descriptor.name) {
            return Err(DomainError::DuplicateName(descriptor.name));
        }
        debug!("register: {}", descriptor.name);
        self.commands.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    /// Like `get`, failing with `UnknownCommand`.
    pub fn lookup(&self, name: &str) -> DomainResult<&CommandDescriptor> {
        self.get(name)
            .ok_or_else(|| DomainError::UnknownCommand(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Descriptors sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}
