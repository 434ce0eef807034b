//! Ledger loader for CSV exports of the transaction spreadsheet

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::dates::{parse_day, parse_operation_date};
use crate::error::{Error, Result};
use crate::ledger::{Column, Ledger};
use crate::models::Transaction;

/// Header positions of the known columns; the first matching header wins
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    positions: HashMap<Column, usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut positions = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(column) = Column::from_header(header) {
                positions.entry(column).or_insert(idx);
            }
        }
        Self { positions }
    }

    fn get(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).copied()
    }

    fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.positions.keys().copied()
    }
}

/// Load a ledger from a CSV file
pub fn load_ledger(path: &Path) -> Result<Ledger> {
    debug!("Reading ledger: {}", path.display());
    let file = File::open(path)?;
    parse_ledger(file)
}

/// Parse a ledger from CSV data.
///
/// Headers are required; which known columns are present is recorded on the
/// returned [`Ledger`] and checked by each operation. When the
/// `operation_date` or `amount` column is present, every row must hold a
/// valid value or the whole load fails. Empty optional cells become `None`.
pub fn parse_ledger<R: Read>(reader: R) -> Result<Ledger> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers);
    let mut transactions = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = idx + 2;

        let operation_date = match columns.get(Column::OperationDate) {
            Some(i) => {
                let date_str = required(&record, i, Column::OperationDate, line)?;
                Some(parse_operation_date(date_str).map_err(|_| {
                    Error::MalformedInput(format!(
                        "line {}: operation_date {:?} does not match DD.MM.YYYY HH:MM:SS",
                        line, date_str
                    ))
                })?)
            }
            None => None,
        };

        let amount = match columns.get(Column::Amount) {
            Some(i) => {
                let amount_str = required(&record, i, Column::Amount, line)?;
                Some(parse_amount(amount_str).ok_or_else(|| {
                    Error::MalformedInput(format!(
                        "line {}: unable to parse amount {:?}",
                        line, amount_str
                    ))
                })?)
            }
            None => None,
        };

        // Category text is kept verbatim for exact matching
        let category = columns
            .get(Column::Category)
            .map(|i| record.get(i).unwrap_or_default().to_string());

        let payment_date =
            optional(&record, columns.get(Column::PaymentDate)).and_then(|s| match parse_day(s) {
                Ok(day) => Some(day),
                Err(_) => {
                    warn!("line {}: ignoring malformed payment_date {:?}", line, s);
                    None
                }
            });

        let card_number = optional(&record, columns.get(Column::CardNumber)).map(str::to_string);
        let description = optional(&record, columns.get(Column::Description)).map(str::to_string);
        let extra = extra_columns(&headers, &record);

        transactions.push(Transaction {
            operation_date,
            payment_date,
            card_number,
            amount,
            category,
            description,
            extra,
        });
    }

    debug!("Parsed {} ledger rows", transactions.len());
    Ok(Ledger::with_columns(transactions, columns.columns()))
}

fn required<'r>(
    record: &'r StringRecord,
    idx: usize,
    column: Column,
    line: usize,
) -> Result<&'r str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MalformedInput(format!("line {}: missing {}", line, column)))
}

fn optional(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Unknown columns of a row; any header naming a known column is left out,
/// including a second alias of a column already read
fn extra_columns(headers: &StringRecord, record: &StringRecord) -> BTreeMap<String, String> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, header)| Column::from_header(header).is_none())
        .filter_map(|(i, header)| {
            record
                .get(i)
                .map(|value| (header.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Parse an amount as written in bank exports: `1500`, `-160.89`,
/// `-160,89`, `1 500,00` (plain or no-break space as thousands separator)
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    Decimal::from_str(&cleaned).ok()
}
