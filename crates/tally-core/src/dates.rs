//! Fixed-format date parsing and query windows
//!
//! Every date that enters the system is parsed against one exact format
//! string. Nothing is auto-detected, so `01.02.2023` can never be read as
//! January 2nd.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Ledger `operation_date` column: `31.12.2021 16:44:00`
pub const OPERATION_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Ledger `payment_date` column and category report dates: `31.12.2021`
pub const DAY_FORMAT: &str = "%d.%m.%Y";

/// Monthly report reference timestamp: `2021-12-31 16:44:00`
pub const REPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Length of the category spending lookback
pub const LOOKBACK_DAYS: i64 = 90;

/// Parse an operation timestamp from the ledger
pub fn parse_operation_date(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), OPERATION_DATE_FORMAT).map_err(|_| {
        Error::InvalidDateFormat {
            value: s.to_string(),
            expected: "DD.MM.YYYY HH:MM:SS",
        }
    })
}

/// Parse a calendar day (`DD.MM.YYYY`)
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DAY_FORMAT).map_err(|_| Error::InvalidDateFormat {
        value: s.to_string(),
        expected: "DD.MM.YYYY",
    })
}

/// Parse the reference date of a category report.
///
/// The reference is the start of the given day, so an operation at
/// `31.10.2023 00:00:00` is inside a `31.10.2023` window and one at
/// `31.10.2023 09:00:00` is not.
pub fn parse_category_reference(s: &str) -> Result<NaiveDateTime> {
    parse_day(s).map(|day| day.and_time(NaiveTime::MIN))
}

/// Parse the reference timestamp of a monthly report (`YYYY-MM-DD HH:MM:SS`)
pub fn parse_report_reference(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), REPORT_DATETIME_FORMAT).map_err(|_| {
        Error::InvalidDateFormat {
            value: s.to_string(),
            expected: "YYYY-MM-DD HH:MM:SS",
        }
    })
}

/// Start of the lookback window ending at `reference`
pub fn lookback_start(reference: NaiveDateTime) -> NaiveDateTime {
    reference - Duration::days(LOOKBACK_DAYS)
}

/// First day of the reference month at 00:00:00
pub fn month_start(reference: NaiveDateTime) -> NaiveDateTime {
    // with_day(1) cannot fail for a valid date
    reference
        .date()
        .with_day(1)
        .unwrap_or(reference.date())
        .and_time(NaiveTime::MIN)
}
