//! Command-line interface for godotgo.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Go Dot Go - point and line rule engine
#[derive(Parser, Debug)]
#[command(name = "godotgo")]
#[command(about = "Headless driver for the Go Dot Go rule engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay an action script and print the final snapshot as JSON
    Replay {
        /// Script file (.toml or .json)
        script: PathBuf,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the effective configuration as TOML
    Rules {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Command {
    /// Config file named on the command line, if any.
    pub fn config(&self) -> Option<&PathBuf> {
        match self {
            Command::Replay { config, .. } | Command::Rules { config } => config.as_ref(),
        }
    }
}
