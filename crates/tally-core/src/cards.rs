//! Month-to-date spending per card

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::debug;

use crate::dates::month_start;
use crate::error::Result;
use crate::ledger::{Column, Ledger};
use crate::models::{CardSpending, CardSummary, TopTransaction, Transaction};

/// Number of transactions kept in each card's top list
pub const TOP_TRANSACTIONS: usize = 5;

/// Cashback rate: one unit back per this many units spent
const CASHBACK_DIVISOR: Decimal = Decimal::ONE_HUNDRED;

/// Columns the aggregator reads
const REQUIRED_COLUMNS: [Column; 4] = [
    Column::OperationDate,
    Column::CardNumber,
    Column::Amount,
    Column::Category,
];

/// In-window row of one card
struct CardRow<'a> {
    operation_date: NaiveDateTime,
    amount: Decimal,
    tx: &'a Transaction,
}

/// Summarize spending per card from the first of `reference`'s month
/// (00:00:00) through `reference`, both inclusive.
///
/// Transactions without a card are left out. Cards appear in the order they
/// are first seen in the ledger. Fails with `MalformedInput` when the ledger
/// lacks the `operation_date`, `card_number`, `amount` or `category` column.
pub fn aggregate_card_spending(ledger: &Ledger, reference: NaiveDateTime) -> Result<CardSpending> {
    ledger.require(&REQUIRED_COLUMNS)?;

    let start = month_start(reference);
    debug!("Card window: {} to {}", start, reference);

    // Groups in first-seen order, indexed by card
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<CardRow<'_>>)> = Vec::new();

    for tx in ledger.iter() {
        let (Some(operation_date), Some(amount)) = (tx.operation_date, tx.amount) else {
            continue;
        };
        if operation_date < start || operation_date > reference {
            continue;
        }
        let Some(card) = tx.card_number.as_deref().map(str::trim) else {
            continue;
        };
        if card.is_empty() {
            continue;
        }

        let slot = *index.entry(card).or_insert_with(|| {
            groups.push((card, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(CardRow {
            operation_date,
            amount,
            tx,
        });
    }

    let cards = groups
        .into_iter()
        .map(|(card, rows)| summarize_card(card, rows))
        .collect::<Vec<_>>();

    debug!("Summarized {} cards", cards.len());
    Ok(CardSpending::new(cards))
}

fn summarize_card(card: &str, mut rows: Vec<CardRow<'_>>) -> CardSummary {
    let total_spent: Decimal = rows.iter().map(|row| row.amount).sum();

    // Stable: equal amounts keep ledger order
    rows.sort_by(|a, b| b.amount.cmp(&a.amount));

    CardSummary {
        card_number: card.to_string(),
        last_4_digits: last_4_digits(card),
        total_spent,
        cashback: cashback(total_spent),
        top_transactions: rows
            .into_iter()
            .take(TOP_TRANSACTIONS)
            .map(|row| TopTransaction {
                operation_date: row.operation_date,
                category: row.tx.category.clone().unwrap_or_default(),
                amount: row.amount,
            })
            .collect(),
    }
}

/// Floor of `total / 100`. Negative totals round down, so `-150` gives `-2`.
pub fn cashback(total: Decimal) -> Decimal {
    (total / CASHBACK_DIVISOR).floor()
}

/// Last four characters of a card identifier, or all of it when shorter
pub fn last_4_digits(card: &str) -> String {
    let count = card.chars().count();
    card.chars().skip(count.saturating_sub(4)).collect()
}
