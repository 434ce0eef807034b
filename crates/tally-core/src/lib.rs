//! Tally Core Library
//!
//! Analysis of a personal-finance ledger export:
//! - Ledger loading from CSV with strict date formats
//! - Category spending over the trailing 90 days
//! - Month-to-date spending, cashback and top transactions per card
//! - Phone number detection in transaction descriptions
//! - Currency rate and stock price lookups for the monthly report
//! - Report archiving through caller-supplied sinks

pub mod cards;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod import;
pub mod ledger;
pub mod market;
pub mod models;
pub mod phone;
pub mod report;
pub mod spending;

/// Test utilities including mock market-data server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cards::aggregate_card_spending;
pub use config::{AppConfig, LookupConfig};
pub use error::{Error, Result};
pub use export::{export_report, JsonFileSink, MemorySink, ReportSink};
pub use import::{load_ledger, parse_ledger};
pub use ledger::{Column, Ledger};
pub use market::{HttpMarketData, MarketData, MockMarketData, Quotes};
pub use models::{CardSpending, CardSummary, Greeting, TopTransaction, Transaction, UserSettings};
pub use phone::find_with_phone_numbers;
pub use report::{build_monthly_report, MonthlyReport};
pub use rust_decimal::Decimal;
pub use spending::spending_by_category;
