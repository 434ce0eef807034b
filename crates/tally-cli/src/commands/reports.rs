//! Report command implementations

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDateTime, Timelike};
use tally_core::dates::{parse_category_reference, parse_report_reference};
use tally_core::{
    build_monthly_report, spending_by_category, Greeting, Ledger, MarketData, ReportSink,
};
use tracing::info;

use super::{emit, read_settings};

/// Archive name for the monthly report
pub const MAIN_PAGE_REPORT: &str = "main_page";
/// Archive name for the category report
pub const CATEGORY_REPORT: &str = "spending_by_category";

/// Current local time, to the second
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Month-to-date card summary plus the user's currency rates and stock prices
pub async fn cmd_main_page(
    ledger: &Ledger,
    date: Option<&str>,
    settings_path: &Path,
    market: &dyn MarketData,
    sink: Option<&dyn ReportSink>,
    out: &mut dyn Write,
) -> Result<()> {
    let reference = match date {
        Some(d) => parse_report_reference(d)?,
        None => now(),
    };
    let settings = read_settings(settings_path)?;

    info!("Building monthly report for {}", reference);
    let report =
        build_monthly_report(ledger, reference, &settings, market, Greeting::now()).await?;

    emit(out, sink, MAIN_PAGE_REPORT, &report)
}

/// Category spending over the 90 days before `date` (DD.MM.YYYY, defaults to today)
pub fn cmd_category_report(
    ledger: &Ledger,
    category: &str,
    date: Option<&str>,
    sink: Option<&dyn ReportSink>,
    out: &mut dyn Write,
) -> Result<()> {
    let reference = match date {
        Some(d) => parse_category_reference(d)?,
        None => Local::now().date_naive().and_time(chrono::NaiveTime::MIN),
    };

    let result = spending_by_category(ledger, category, reference)?;
    emit(out, sink, CATEGORY_REPORT, &result)
}
