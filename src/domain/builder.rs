//! Argument vector construction.
//!
//! Pure transformation from a descriptor, resolved flag values and positional
//! arguments to the exact argv handed to the external runtime. Flag-derived
//! tokens come first in descriptor-declared order, positionals follow in the
//! order the user gave them.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::entities::{CommandDescriptor, Contribution, FlagValue};
use crate::domain::error::{DomainError, DomainResult};

/// Ordered tokens passed to the external process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentVector(Vec<String>);

impl ArgumentVector {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl fmt::Display for ArgumentVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Build the argument vector for one invocation.
///
/// Only fails when `flags` disagrees with the descriptor (undeclared flag, or
/// a value whose kind does not match the flag's contribution rule). Callers
/// that resolve flags from the descriptor itself never hit that path.
pub fn build_argv(
    descriptor: &CommandDescriptor,
    flags: &BTreeMap<String, FlagValue>,
    positionals: &[String],
) -> DomainResult<ArgumentVector> {
    let violation = |message: String| DomainError::InvariantViolation {
        command: descriptor.name.clone(),
        message,
    };

    if let Some(undeclared) = flags.keys().find(|k| descriptor.flag_named(k).is_none()) {
        return Err(violation(format!("value supplied for undeclared flag --{undeclared}")));
    }

    let mut tokens = Vec::with_capacity(flags.len() * 2 + positionals.len());
    for flag in &descriptor.flags {
        match (flags.get(&flag.name), &flag.contribution) {
            (None, _) | (Some(FlagValue::Switch(false)), Contribution::Token(_)) => {}
            (Some(FlagValue::Switch(true)), Contribution::Token(token)) => {
                tokens.push(token.clone());
            }
            (Some(FlagValue::Text(value)), Contribution::Separate(token)) => {
                tokens.push(token.clone());
                tokens.push(value.clone());
            }
            (Some(FlagValue::Text(value)), Contribution::Joined(token)) => {
                tokens.push(format!("{token}={value}"));
            }
            (Some(value), rule) => {
                return Err(violation(format!(
                    "flag --{} holds {:?} but contributes via {:?}",
                    flag.name, value, rule
                )));
            }
        }
    }
    tokens.extend(positionals.iter().cloned());

    Ok(ArgumentVector(tokens))
}
