//! Domain entities: command descriptors and their parts

use std::collections::HashSet;
use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Argument id the parser collects positionals under.
pub const POSITIONALS_ID: &str = "__positionals";

/// Long option names every descriptor-derived command reserves for runtime options.
pub const RESERVED_LONG: &[&str] = &["help", "attach-debug", "property", POSITIONALS_ID];

/// Short aliases reserved for runtime options.
pub const RESERVED_SHORT: &[char] = &['h', 'D'];

/// Number of positional arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// `max: None` means no upper bound.
    Range { min: usize, max: Option<usize> },
}

impl Arity {
    pub fn at_least(min: usize) -> Self {
        Arity::Range { min, max: None }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Arity::Range {
            min,
            max: Some(max),
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range { min, max } => count >= min && max.map_or(true, |m| count <= m),
        }
    }

    fn is_well_formed(&self) -> bool {
        match *self {
            Arity::Exact(_) => true,
            Arity::Range { min, max } => max.map_or(true, |m| min <= m),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::Range { min, max: None } => write!(f, "at least {min}"),
            Arity::Range {
                min,
                max: Some(max),
            } if min == max => write!(f, "exactly {min}"),
            Arity::Range {
                min,
                max: Some(max),
            } => write!(f, "between {min} and {max}"),
        }
    }
}

/// Whether a flag is a switch or carries a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagKind {
    Boolean,
    Value { value_name: String },
}

/// How a set flag maps into the argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contribution {
    /// Boolean flag: emit the token when set.
    Token(String),
    /// Value flag: emit the token, then the value as its own element.
    Separate(String),
    /// Value flag: emit `token=value` as one element.
    Joined(String),
}

/// One flag accepted by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long form, without leading dashes
    pub name: String,
    pub short: Option<char>,
    pub kind: FlagKind,
    pub contribution: Contribution,
    pub help: String,
}

impl FlagSpec {
    /// Boolean flag contributing a fixed token.
    pub fn switch(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            kind: FlagKind::Boolean,
            contribution: Contribution::Token(token.into()),
            help: String::new(),
        }
    }

    /// Value flag contributing `token value`.
    pub fn separate(
        name: impl Into<String>,
        value_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short: None,
            kind: FlagKind::Value {
                value_name: value_name.into(),
            },
            contribution: Contribution::Separate(token.into()),
            help: String::new(),
        }
    }

    /// Value flag contributing `token=value`.
    pub fn joined(
        name: impl Into<String>,
        value_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short: None,
            kind: FlagKind::Value {
                value_name: value_name.into(),
            },
            contribution: Contribution::Joined(token.into()),
            help: String::new(),
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, FlagKind::Boolean)
    }

    /// Contribution rule agrees with the value kind.
    fn is_consistent(&self) -> bool {
        matches!(
            (&self.kind, &self.contribution),
            (FlagKind::Boolean, Contribution::Token(_))
                | (FlagKind::Value { .. }, Contribution::Separate(_))
                | (FlagKind::Value { .. }, Contribution::Joined(_))
        )
    }
}

/// Long names are written as `--name`: no leading dash, no `=`, no whitespace.
fn is_valid_long(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.contains('=')
        && !name.chars().any(char::is_whitespace)
}

/// Resolved value of one flag for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Switch(bool),
    Text(String),
}

/// Declarative definition of one subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Unique within a registry
    pub name: String,
    /// Positional placeholders, e.g. `<group> <path>`
    pub usage: String,
    /// One-line description shown in listings and help
    pub about: String,
    pub arity: Arity,
    /// Declaration order is the order tokens are emitted.
    pub flags: Vec<FlagSpec>,
    /// Runtime class implementing the operation
    pub class_name: String,
    /// Leading parameters passed to the class before the argument vector
    pub parameters: Vec<String>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, usage: impl Into<String>, arity: Arity) -> Self {
        Self {
            name: name.into(),
            usage: usage.into(),
            about: String::new(),
            arity,
            flags: Vec::new(),
            class_name: String::new(),
            parameters: Vec::new(),
        }
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    /// Set the runtime class and the parameters that precede the argument vector.
    pub fn target<I, S>(mut self, class_name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_name = class_name.into();
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn flag_named(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// `<name> <positional-placeholders>`
    pub fn usage_line(&self) -> String {
        if self.usage.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.usage)
        }
    }

    /// Check the descriptor's own invariants.
    pub fn validate(&self) -> DomainResult<()> {
        let invalid = |reason: String| DomainError::InvalidDescriptor {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".into()));
        }
        if !self.arity.is_well_formed() {
            return Err(invalid(format!("malformed arity {:?}", self.arity)));
        }

        let mut longs = HashSet::new();
        let mut shorts = HashSet::new();
        for flag in &self.flags {
            if !is_valid_long(&flag.name) {
                return Err(invalid(format!("invalid flag name '{}'", flag.name)));
            }
            if RESERVED_LONG.contains(&flag.name.as_str()) {
                return Err(invalid(format!("flag --{} is reserved", flag.name)));
            }
            if !longs.insert(flag.name.as_str()) {
                return Err(invalid(format!("duplicate flag --{}", flag.name)));
            }
            if let Some(short) = flag.short {
                if !short.is_ascii_alphanumeric() {
                    return Err(invalid(format!("invalid short alias '{short}'")));
                }
                if RESERVED_SHORT.contains(&short) {
                    return Err(invalid(format!("flag -{short} is reserved")));
                }
                if !shorts.insert(short) {
                    return Err(invalid(format!("duplicate short flag -{short}")));
                }
            }
            if !flag.is_consistent() {
                return Err(invalid(format!(
                    "flag --{} has contribution {:?} incompatible with {:?}",
                    flag.name, flag.contribution, flag.kind
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of one external launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Process ran to completion with this status code.
    Exited(i32),
    /// Process was terminated by this signal number.
    Signaled(i32),
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        matches!(self, ExecutionResult::Exited(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chgrp() -> CommandDescriptor {
        CommandDescriptor::new("chgrp", "<group> <path>", Arity::Exact(2))
            .flag(FlagSpec::switch("recursive", "-R").short('R'))
    }

    #[test]
    fn given_exact_arity_when_checking_counts_then_only_exact_accepted() {
        let arity = Arity::Exact(2);
        assert!(!arity.accepts(1));
        assert!(arity.accepts(2));
        assert!(!arity.accepts(3));
    }

    #[test]
    fn given_open_range_when_checking_counts_then_minimum_enforced() {
        let arity = Arity::at_least(1);
        assert!(!arity.accepts(0));
        assert!(arity.accepts(1));
        assert!(arity.accepts(100));
        assert_eq!(arity.to_string(), "at least 1");
    }

    #[test]
    fn given_bounded_range_when_displaying_then_shows_bounds() {
        assert_eq!(Arity::between(1, 3).to_string(), "between 1 and 3");
        assert_eq!(Arity::between(2, 2).to_string(), "exactly 2");
        assert_eq!(Arity::Exact(0).to_string(), "exactly 0");
    }

    #[test]
    fn given_valid_descriptor_when_validating_then_ok() {
        assert!(chgrp().validate().is_ok());
        assert_eq!(chgrp().usage_line(), "chgrp <group> <path>");
    }

    #[test]
    fn given_duplicate_flag_names_when_validating_then_rejected() {
        let descriptor = chgrp().flag(FlagSpec::switch("recursive", "-r"));
        assert!(matches!(
            descriptor.validate(),
            Err(DomainError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn given_duplicate_short_alias_when_validating_then_rejected() {
        let descriptor = chgrp().flag(FlagSpec::switch("really", "-X").short('R'));
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn given_reserved_flag_when_validating_then_rejected() {
        let long = chgrp().flag(FlagSpec::switch("help", "-h"));
        let short = chgrp().flag(FlagSpec::switch("define", "-D").short('D'));
        assert!(long.validate().is_err());
        assert!(short.validate().is_err());
    }

    #[test]
    fn given_malformed_long_names_when_validating_then_rejected() {
        for name in ["", "-x", "--x", "a=b", "two words"] {
            let descriptor = chgrp().flag(FlagSpec::switch(name, "-x"));
            assert!(descriptor.validate().is_err(), "accepted {name:?}");
        }
    }

    #[test]
    fn given_non_alphanumeric_short_when_validating_then_rejected() {
        for short in ['-', '=', ' ', '?'] {
            let descriptor = chgrp().flag(FlagSpec::switch("x", "-x").short(short));
            assert!(descriptor.validate().is_err(), "accepted {short:?}");
        }
    }

    #[test]
    fn given_value_flag_with_token_rule_when_validating_then_rejected() {
        let mut flag = FlagSpec::separate("sort", "FIELD", "--sort");
        flag.contribution = Contribution::Token("--sort".into());
        let descriptor = chgrp().flag(flag);
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn given_inverted_range_when_validating_then_rejected() {
        let descriptor = CommandDescriptor::new("x", "", Arity::Range { min: 3, max: Some(1) });
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn given_exit_zero_when_checking_success_then_true() {
        assert!(ExecutionResult::Exited(0).success());
        assert!(!ExecutionResult::Exited(2).success());
        assert!(!ExecutionResult::Signaled(2).success());
    }
}
