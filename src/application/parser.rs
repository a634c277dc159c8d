//! Descriptor-driven flag parsing.
//!
//! Each descriptor is turned into a `clap::Command` at dispatch time; clap does
//! the flag parsing, arity is checked afterwards against the descriptor.

use std::collections::BTreeMap;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    CommandDescriptor, FlagKind, FlagValue, InvocationRequest, RuntimeOptions, POSITIONALS_ID,
};

const ATTACH_DEBUG: &str = "attach-debug";
const PROPERTY: &str = "property";

/// Result of parsing raw arguments against a descriptor.
#[derive(Debug)]
pub enum Parsed<'a> {
    /// `--help` was requested; rendered help text.
    Help(String),
    Request(InvocationRequest<'a>),
}

/// Build the clap command for a descriptor: its own flags plus the runtime options.
pub fn clap_command(descriptor: &CommandDescriptor) -> Command {
    let mut cmd = Command::new(descriptor.name.clone())
        .about(descriptor.about.clone())
        .override_usage(descriptor.usage_line())
        .arg(
            Arg::new(ATTACH_DEBUG)
                .long(ATTACH_DEBUG)
                .action(ArgAction::SetTrue)
                .help("Attach the configured debugger options to the runtime"),
        )
        .arg(
            Arg::new(PROPERTY)
                .short('D')
                .long(PROPERTY)
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .value_parser(parse_property)
                .help("Runtime property, passed as -DKEY=VALUE (repeatable)"),
        );

    for flag in &descriptor.flags {
        let mut arg = Arg::new(flag.name.clone())
            .long(flag.name.clone())
            .help(flag.help.clone());
        if let Some(short) = flag.short {
            arg = arg.short(short);
        }
        arg = match &flag.kind {
            FlagKind::Boolean => arg.action(ArgAction::SetTrue),
            FlagKind::Value { value_name } => {
                arg.action(ArgAction::Set).value_name(value_name.clone())
            }
        };
        cmd = cmd.arg(arg);
    }

    cmd.arg(
        Arg::new(POSITIONALS_ID)
            .action(ArgAction::Append)
            .num_args(0..)
            .hide(true),
    )
}

/// Parse `raw_args` (without the command name) against `descriptor`.
pub fn parse<'a>(
    descriptor: &'a CommandDescriptor,
    raw_args: &[String],
) -> ApplicationResult<Parsed<'a>> {
    let argv = std::iter::once(descriptor.name.as_str()).chain(raw_args.iter().map(String::as_str));
    let matches = match clap_command(descriptor).try_get_matches_from(argv) {
        Ok(m) => m,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Ok(Parsed::Help(e.render().to_string()));
        }
        Err(e) => {
            return Err(ApplicationError::Usage {
                command: descriptor.name.clone(),
                message: usage_message(&e.render().to_string()),
            });
        }
    };

    let flags = resolve_flags(descriptor, &matches);
    let positionals = matches
        .get_many::<String>(POSITIONALS_ID)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let runtime = RuntimeOptions {
        attach_debug: matches.get_flag(ATTACH_DEBUG),
        properties: matches
            .get_many::<String>(PROPERTY)
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
    };

    let request = InvocationRequest::new(descriptor, flags, positionals, runtime)?;
    Ok(Parsed::Request(request))
}

fn resolve_flags(descriptor: &CommandDescriptor, matches: &ArgMatches) -> BTreeMap<String, FlagValue> {
    let mut values = BTreeMap::new();
    for flag in &descriptor.flags {
        match flag.kind {
            FlagKind::Boolean => {
                values.insert(flag.name.clone(), FlagValue::Switch(matches.get_flag(&flag.name)));
            }
            FlagKind::Value { .. } => {
                if let Some(value) = matches.get_one::<String>(&flag.name) {
                    values.insert(flag.name.clone(), FlagValue::Text(value.clone()));
                }
            }
        }
    }
    values
}

/// clap's rendering without its own `error:` prefix; the CLI adds one.
fn usage_message(rendered: &str) -> String {
    let trimmed = rendered.trim_end();
    trimmed
        .strip_prefix("error:")
        .map(str::trim_start)
        .unwrap_or(trimmed)
        .to_string()
}

fn parse_property(raw: &str) -> Result<String, String> {
    match raw.split_once('=') {
        Some((key, _)) if !key.trim().is_empty() => Ok(raw.to_string()),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
