//! # pdbridge
//!
//! Maintenance CLI for the debugger console bridge: inspect and clear the
//! persisted command history, show effective settings and breakpoints.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdbridge_core::breakpoints::breakpoint_count;
use pdbridge_settings::PdbridgeSettings;
use pdbridge_store::{Database, HistoryRepo};
use pdbridge_telemetry::{init_telemetry, parse_level, TelemetryConfig};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "pdbridge", about = "Debugger console bridge utilities")]
struct Cli {
    /// Settings file (defaults to ~/.pdbridge/settings.json).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the recorded debugger command history, oldest first.
    History {
        /// Number of most recent commands to show.
        #[arg(long)]
        limit: Option<usize>,

        /// Delete every recorded command instead of printing.
        #[arg(long)]
        clear: bool,
    },
    /// Print the effective settings as JSON.
    Settings,
    /// List the configured breakpoints.
    Breakpoints,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => pdbridge_settings::load_settings_from_path(path),
        None => pdbridge_settings::load_settings(),
    }
    .context("Failed to load settings")?;

    let _telemetry = init_telemetry(telemetry_config(&settings));

    match cli.command {
        Command::History { limit, clear } => {
            let limit = limit.unwrap_or(settings.history.max_entries);
            run_history(&settings.history.db_path, limit, clear)
        }
        Command::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Command::Breakpoints => {
            for (file, breakpoints) in &settings.breakpoints {
                for bp in breakpoints {
                    match &bp.condition {
                        Some(cond) => println!("{file}:{} if {cond}", bp.line),
                        None => println!("{file}:{}", bp.line),
                    }
                }
            }
            tracing::debug!(
                count = breakpoint_count(&settings.breakpoints),
                "breakpoints listed"
            );
            Ok(())
        }
    }
}

fn run_history(db_path: &Path, limit: usize, clear: bool) -> Result<()> {
    let db = Database::open(db_path)
        .with_context(|| format!("Failed to open history database: {}", db_path.display()))?;
    let repo = HistoryRepo::reader(db);

    if clear {
        let removed = repo.clear().context("Failed to clear history")?;
        tracing::info!(removed, "history cleared");
        println!("removed {removed} commands");
        return Ok(());
    }

    for record in repo.tail(limit, true).context("Failed to read history")? {
        println!("{:>5}  {}", record.line, record.text);
    }
    Ok(())
}

fn telemetry_config(settings: &PdbridgeSettings) -> TelemetryConfig {
    let logging = &settings.logging;
    let log_level = parse_level(&logging.level).unwrap_or(Level::INFO);
    let module_levels = logging
        .modules
        .iter()
        .filter_map(|(module, level)| parse_level(level).map(|l| (module.clone(), l)))
        .collect();
    TelemetryConfig {
        log_level,
        module_levels,
        json: logging.json,
        metrics_db_path: logging.metrics_db_path.clone(),
    }
}
