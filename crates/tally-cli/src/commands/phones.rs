//! Phone number search command

use std::io::Write;

use anyhow::Result;
use tally_core::{find_with_phone_numbers, Ledger, ReportSink};
use tracing::info;

use super::emit;

/// Archive name for the phone search
pub const PHONES_REPORT: &str = "filtered_by_phone";

/// Print every transaction whose description contains a phone number
pub fn cmd_phones(
    ledger: &Ledger,
    sink: Option<&dyn ReportSink>,
    out: &mut dyn Write,
) -> Result<()> {
    let result = find_with_phone_numbers(&ledger.transactions);
    info!("{} of {} transactions mention a phone number", result.len(), ledger.len());
    emit(out, sink, PHONES_REPORT, &result)
}
