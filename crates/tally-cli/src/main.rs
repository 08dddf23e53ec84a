//! Tally CLI - Transaction CSV explorer
//!
//! Usage:
//!   tally preview --file CSV          Detected columns and first rows
//!   tally summary --file CSV --chart  Monthly income/expense pivot
//!   tally subscriptions --file CSV    Recurring vendors
//!   tally ask --file CSV "question"   Keyword Q&A
//!   tally chat --file CSV             Q&A over stdin

mod cli;
mod commands;


use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tally_core::Settings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs on stderr keep table and JSON output clean
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(io::stderr))
        .init();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let session = commands::open_session(&settings, cli.command.input())?;

    match cli.command {
        Commands::Preview { rows, .. } => commands::cmd_preview(&session, rows, cli.json),
        Commands::Summary { chart, .. } => commands::cmd_summary(&session, chart, cli.json),
        Commands::Subscriptions { min, .. } => {
            commands::cmd_subscriptions(&session, min, cli.json)
        }
        Commands::Ask { question, .. } => commands::cmd_ask(&session, &question, cli.json),
        Commands::Chat { .. } => {
            commands::cmd_chat(&session, io::stdin().lock(), cli.json).map(|_| ())
        }
        Commands::Report { .. } => commands::cmd_report(&session, cli.json),
    }
}
