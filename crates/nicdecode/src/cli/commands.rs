//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::render::OutputFormat;

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// NIC numbers to decode (e.g. 881002105V or 198810210597)
    #[arg(required = true, value_name = "NIC")]
    pub nics: Vec<String>,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also show the encoded format, year and day of year
    #[arg(short, long)]
    pub explain: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
