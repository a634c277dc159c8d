//! Command handlers: route parsed CLI input to the services.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{CommandRegistry, Outcome};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Fs { args }) => _fs(cli, args),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Cli::command()
            .print_help()
            .map_err(|e| CliError::from(InfraError::io("print help", e))),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

#[instrument(skip(cli))]
fn _fs(cli: &Cli, args: &[String]) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?)?;
    let dispatcher = container.dispatcher();

    let (name, rest) = match args.split_first() {
        None => {
            print_operations(dispatcher.registry());
            return Ok(());
        }
        Some((first, rest)) if is_help(first) => match rest.first() {
            Some(op) => (op.as_str(), vec!["--help".to_string()]),
            None => {
                print_operations(dispatcher.registry());
                return Ok(());
            }
        },
        Some((first, rest)) => (first.as_str(), rest.to_vec()),
    };

    debug!("fs: dispatching {} {:?}", name, rest);
    match dispatcher.execute(name, &rest)? {
        Outcome::Completed => Ok(()),
        Outcome::Help(text) => {
            output::info(text.trim_end());
            Ok(())
        }
    }
}

fn is_help(arg: &str) -> bool {
    matches!(arg, "-h" | "--help" | "help")
}

fn print_operations(registry: &CommandRegistry) {
    output::header("Operations:");
    let width = registry
        .iter()
        .map(|d| d.usage_line().len())
        .max()
        .unwrap_or(0);
    for descriptor in registry.iter() {
        output::detail(&format!(
            "{:<width$}  {}",
            descriptor.usage_line(),
            descriptor.about
        ));
    }
    output::info("\nRun 'fsadmin fs <operation> --help' for the flags of an operation.");
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "exists" } else { "not found" };
                    output::action("global", &format!("{} ({state})", path.display()));
                }
                None => output::warning("cannot determine the global config directory"),
            }
            if let Some(extra) = &cli.config {
                let state = if extra.exists() { "exists" } else { "not found" };
                output::action("extra", &format!("{} ({state})", extra.display()));
            }
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::InvalidArgs("cannot determine the global config directory".into())
            })?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
        }
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
