//! Command-line interface for nicdecode.
//!
//! This module provides the CLI structure for the `nicdecode` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{CheckCommand, ConfigCommand};
pub use crate::render::OutputFormat;

use crate::logging::Verbosity;

/// nicdecode - Check Sri Lankan NIC details
///
/// Decodes a National Identity Card number, in the old 9-digit-plus-letter
/// form or the new 12-digit form, into the holder's date of birth and gender.
/// Without a subcommand, starts the interactive verification screen.
#[derive(Debug, Parser)]
#[command(name = "nicdecode")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive verification screen (default)
    Interactive,

    /// Decode NIC numbers given as arguments
    Check(CheckCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "nicdecode");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_no_subcommand() {
        let cli = Cli::try_parse_from(["nicdecode"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_parse_interactive() {
        let cli = Cli::try_parse_from(["nicdecode", "interactive"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Interactive)));
    }

    #[test]
    fn test_parse_check() {
        let cli =
            Cli::try_parse_from(["nicdecode", "check", "881002105V", "198810210597"]).unwrap();
        let Some(Command::Check(cmd)) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(cmd.nics, ["881002105V", "198810210597"]);
        assert!(cmd.format.is_none());
        assert!(!cmd.explain);
    }

    #[test]
    fn test_parse_check_with_format() {
        let cli = Cli::try_parse_from(["nicdecode", "check", "-f", "json", "-e", "881002105V"])
            .unwrap();
        let Some(Command::Check(cmd)) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(cmd.format, Some(OutputFormat::Json));
        assert!(cmd.explain);
    }

    #[test]
    fn test_parse_check_requires_nic() {
        assert!(Cli::try_parse_from(["nicdecode", "check"]).is_err());
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["nicdecode", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config(ConfigCommand::Show { json: true }))
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["nicdecode", "-c", "/custom/config.toml", "interactive"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["nicdecode", "-vv", "check", "881002105V"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["nicdecode", "-q"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }
}
