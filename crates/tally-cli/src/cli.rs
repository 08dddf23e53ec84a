//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tally - Explore a bank transaction export
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Monthly summaries, subscriptions and quick answers from a transaction CSV", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to ~/.config/tally/settings.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// The file to load, shared by every command
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Transaction CSV file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Field delimiter (single character, or "tab"); overrides settings
    #[arg(short, long)]
    pub delimiter: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show detected columns and the first rows of the normalized table
    Preview {
        #[command(flatten)]
        input: InputArgs,

        /// Number of rows to show (defaults to settings)
        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// Monthly income/expense summary
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Also draw a stacked bar chart
        #[arg(long)]
        chart: bool,
    },

    /// List vendors that recur often enough to look like subscriptions
    Subscriptions {
        #[command(flatten)]
        input: InputArgs,

        /// Minimum occurrences (defaults to settings)
        #[arg(short, long)]
        min: Option<usize>,
    },

    /// Ask a question about the transactions
    ///
    /// Understands questions about spending last month, total income, and the
    /// biggest expense.
    Ask {
        #[command(flatten)]
        input: InputArgs,

        /// The question, e.g. "How much did I spend last month?"
        question: String,
    },

    /// Answer questions read from stdin, one per line
    Chat {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Preview, summary, chart and subscriptions in one go
    Report {
        #[command(flatten)]
        input: InputArgs,
    },
}

impl Commands {
    pub fn input(&self) -> &InputArgs {
        match self {
            Self::Preview { input, .. }
            | Self::Summary { input, .. }
            | Self::Subscriptions { input, .. }
            | Self::Ask { input, .. }
            | Self::Chat { input }
            | Self::Report { input } => input,
        }
    }
}
