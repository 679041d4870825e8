//! Go Dot Go - headless driver
//!
//! Replays action scripts against the rule engine and prints snapshots.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use godotgo::{GameConfig, GameSession, Script, replay};
use std::path::Path;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = GameConfig::load_or_default(cli.command.config().map(|p| p.as_path()))?;

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    // The subscriber depends on the config, so report the load once it is up.
    info!(
        config = ?cli.command.config(),
        max_connections = config.rules().max_connections,
        placement_path = %config.rules().placement_path,
        "Configuration loaded"
    );

    match cli.command {
        Command::Replay {
            script, compact, ..
        } => run_replay(&config, &script, compact),
        Command::Rules { .. } => print_rules(&config),
    }
}

/// Replay a script and print the final snapshot
#[instrument(skip(config, script), fields(script = %script.display()))]
fn run_replay(config: &GameConfig, script: &Path, compact: bool) -> Result<()> {
    let script = Script::from_file(script)?;
    let mut session = GameSession::new(config.rules().clone());

    let reports = replay(&mut session, &script.step);
    let rejected = reports.iter().filter(|r| r.is_rejected()).count();
    if rejected > 0 {
        warn!(rejected, "Some steps were rejected");
    }
    info!(
        steps = reports.len(),
        segments = session.segments().len(),
        phase = %session.phase(),
        "Replay finished"
    );

    let snapshot = session.snapshot();
    let json = if compact {
        serde_json::to_string(&snapshot)?
    } else {
        serde_json::to_string_pretty(&snapshot)?
    };
    println!("{}", json);
    Ok(())
}

/// Print the effective configuration
fn print_rules(config: &GameConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
