//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Make sense of a bank ledger export
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Spending reports from a personal-finance ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger CSV (defaults to the configured ledger path)
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Configuration file (defaults to ~/.local/share/tally/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Archive each result as <DIR>/<name>_report.json
    #[arg(long, global = true)]
    pub save_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Month-to-date card summary with currency rates and stock prices
    MainPage {
        /// Reference timestamp, YYYY-MM-DD HH:MM:SS (defaults to now)
        #[arg(short, long)]
        date: Option<String>,

        /// JSON file with user_currencies and user_stocks
        #[arg(long, default_value = "user_settings.json")]
        settings: PathBuf,
    },

    /// Transactions whose description contains a phone number
    Phones,

    /// Spending in one category over the 90 days before a date
    Report {
        /// Category name (exact, case-sensitive)
        #[arg(short, long)]
        category: String,

        /// Reference date, DD.MM.YYYY (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Menu-driven prompt
    Interactive {
        /// JSON file with user_currencies and user_stocks
        #[arg(long, default_value = "user_settings.json")]
        settings: PathBuf,
    },
}
