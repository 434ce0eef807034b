//! Category spending over the trailing 90 days

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::dates::lookback_start;
use crate::error::Result;
use crate::ledger::{Column, Ledger};
use crate::models::Transaction;

/// Columns the category filter reads
const REQUIRED_COLUMNS: [Column; 2] = [Column::OperationDate, Column::Category];

/// Transactions in `category` dated within the 90 days up to `reference`.
///
/// Both window ends are inclusive. The category match is exact and
/// case-sensitive. The result is sorted by operation date; equal dates keep
/// their ledger order. Fails with `MalformedInput` when the ledger has no
/// `operation_date` or `category` column.
pub fn spending_by_category(
    ledger: &Ledger,
    category: &str,
    reference: NaiveDateTime,
) -> Result<Vec<Transaction>> {
    ledger.require(&REQUIRED_COLUMNS)?;

    let start = lookback_start(reference);
    debug!("Category window: {} to {}", start, reference);

    let mut matched: Vec<Transaction> = ledger
        .iter()
        .filter(|tx| tx.category.as_deref() == Some(category))
        .filter(|tx| {
            tx.operation_date
                .is_some_and(|date| date >= start && date <= reference)
        })
        .cloned()
        .collect();

    // sort_by_key is stable
    matched.sort_by_key(|tx| tx.operation_date);

    if matched.is_empty() {
        warn!(
            "No '{}' transactions between {} and {}",
            category, start, reference
        );
    } else {
        info!("Found {} '{}' transactions", matched.len(), category);
    }

    Ok(matched)
}
