//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Automaton Workbench CLI
#[derive(Parser, Debug)]
#[command(name = "automaton-workbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an automaton read from an .amdl or .json file
    Analyze {
        /// Automaton file
        file: PathBuf,

        /// Output format (defaults to the configured one)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,

        /// Remove isolated non-initial states before analyzing
        #[arg(long)]
        clean: bool,
    },

    /// Print the transition table of an automaton
    Table {
        /// Automaton file
        file: PathBuf,

        /// Output format (table or json)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Check that an automaton file loads
    Validate {
        /// Automaton file
        file: PathBuf,
    },
}

/// Output format types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text table
    #[default]
    Table,
    /// JSON output
    Json,
    /// DOT format (Graphviz)
    Dot,
}

/// Execute the CLI command
pub fn execute(args: Cli, config: Config) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match args.command {
        Commands::Analyze {
            file,
            output,
            clean,
        } => commands::analyze::execute(
            &mut stdout,
            &file,
            output.unwrap_or(config.output.format),
            clean,
            &config,
        ),
        Commands::Table { file, output } => commands::table::execute(
            &mut stdout,
            &file,
            output.unwrap_or(config.output.format),
            &config,
        ),
        Commands::Validate { file } => commands::validate::execute(&mut stdout, &file),
    }
}
