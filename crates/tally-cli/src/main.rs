//! Tally CLI - Spending reports from a bank ledger export
//!
//! Usage:
//!   tally main-page --date "2021-12-31 16:44:00"   Month-to-date card summary
//!   tally phones                                   Transactions mentioning a phone number
//!   tally report --category Супермаркеты           Category spending, last 90 days
//!   tally interactive                              Menu-driven prompt

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tally_core::{AppConfig, HttpMarketData, ReportSink};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
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

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(io::stderr),
        )
        .init();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let ledger_path = cli.ledger.clone().unwrap_or_else(|| config.ledger_path.clone());
    let save_dir = cli.save_dir.clone().or_else(|| config.report_dir.clone());
    let sink = commands::open_sink(save_dir.as_deref())?;
    let sink = sink.as_ref().map(|s| s as &dyn ReportSink);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::MainPage { date, settings } => {
            let ledger = commands::open_ledger(&ledger_path)?;
            let market = HttpMarketData::new(config.lookups.with_env_keys())?;
            commands::cmd_main_page(&ledger, date.as_deref(), &settings, &market, sink, &mut out)
                .await
        }
        Commands::Phones => {
            let ledger = commands::open_ledger(&ledger_path)?;
            commands::cmd_phones(&ledger, sink, &mut out)
        }
        Commands::Report { category, date } => {
            let ledger = commands::open_ledger(&ledger_path)?;
            commands::cmd_category_report(&ledger, &category, date.as_deref(), sink, &mut out)
        }
        Commands::Interactive { settings } => {
            let market = HttpMarketData::new(config.lookups.with_env_keys())?;
            let session = commands::Session {
                ledger_path: &ledger_path,
                settings_path: &settings,
                market: &market,
                sink,
            };
            commands::cmd_interactive(&session, io::stdin().lock(), &mut out).await
        }
    }
}
