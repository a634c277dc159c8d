//! A single, fully resolved command invocation.

use std::collections::BTreeMap;

use crate::domain::builder::{build_argv, ArgumentVector};
use crate::domain::entities::{CommandDescriptor, FlagValue};
use crate::domain::error::{DomainError, DomainResult};

/// Per-invocation options that shape the runtime command line.
/// They never appear in the argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Include the configured debugger attach options
    pub attach_debug: bool,
    /// `key=value` properties passed to the runtime as `-Dkey=value`
    pub properties: Vec<String>,
}

/// Descriptor plus the values resolved for one run. Immutable once built.
#[derive(Debug, Clone)]
pub struct InvocationRequest<'a> {
    descriptor: &'a CommandDescriptor,
    flags: BTreeMap<String, FlagValue>,
    positionals: Vec<String>,
    runtime: RuntimeOptions,
}

impl<'a> InvocationRequest<'a> {
    /// Build a request, rejecting positional counts the descriptor does not accept.
    pub fn new(
        descriptor: &'a CommandDescriptor,
        flags: BTreeMap<String, FlagValue>,
        positionals: Vec<String>,
        runtime: RuntimeOptions,
    ) -> DomainResult<Self> {
        if !descriptor.arity.accepts(positionals.len()) {
            return Err(DomainError::ArityMismatch {
                command: descriptor.name.clone(),
                expected: descriptor.arity.to_string(),
                actual: positionals.len(),
                usage: descriptor.usage_line(),
            });
        }
        Ok(Self {
            descriptor,
            flags,
            positionals,
            runtime,
        })
    }

    pub fn descriptor(&self) -> &CommandDescriptor {
        self.descriptor
    }

    pub fn flags(&self) -> &BTreeMap<String, FlagValue> {
        &self.flags
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn runtime(&self) -> &RuntimeOptions {
        &self.runtime
    }

    pub fn argument_vector(&self) -> DomainResult<ArgumentVector> {
        build_argv(self.descriptor, &self.flags, &self.positionals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Arity, FlagSpec};

    fn chgrp() -> CommandDescriptor {
        CommandDescriptor::new("chgrp", "<group> <path>", Arity::Exact(2))
            .flag(FlagSpec::switch("recursive", "-R").short('R'))
    }

    #[test]
    fn given_too_few_positionals_when_building_request_then_arity_mismatch() {
        let descriptor = chgrp();
        let err = InvocationRequest::new(
            &descriptor,
            BTreeMap::new(),
            vec!["developers".into()],
            RuntimeOptions::default(),
        )
        .unwrap_err();

        match err {
            DomainError::ArityMismatch {
                command,
                expected,
                actual,
                usage,
            } => {
                assert_eq!(command, "chgrp");
                assert_eq!(expected, "exactly 2");
                assert_eq!(actual, 1);
                assert_eq!(usage, "chgrp <group> <path>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn given_matching_positionals_when_building_request_then_argv_available() {
        let descriptor = chgrp();
        let mut flags = BTreeMap::new();
        flags.insert("recursive".to_string(), FlagValue::Switch(true));
        let request = InvocationRequest::new(
            &descriptor,
            flags,
            vec!["developers".into(), "/data".into()],
            RuntimeOptions::default(),
        )
        .unwrap();

        assert_eq!(request.positionals().len(), 2);
        assert_eq!(
            request.argument_vector().unwrap().into_vec(),
            vec!["-R", "developers", "/data"]
        );
    }
}
