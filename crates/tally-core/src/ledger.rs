//! Loaded ledger and the columns its source provided
//!
//! The loader records which known columns a file had. Each operation checks
//! only the columns it reads, so a file without `amount` can still be
//! searched for phone numbers.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Ledger columns the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    OperationDate,
    PaymentDate,
    CardNumber,
    Amount,
    Category,
    Description,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::OperationDate,
        Column::PaymentDate,
        Column::CardNumber,
        Column::Amount,
        Column::Category,
        Column::Description,
    ];

    /// Header names accepted for this column: bank export name first,
    /// then the snake_case alias
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::OperationDate => &["Дата операции", "operation_date"],
            Self::PaymentDate => &["Дата платежа", "payment_date"],
            Self::CardNumber => &["Номер карты", "card_number"],
            Self::Amount => &["Сумма платежа", "amount"],
            Self::Category => &["Категория", "category"],
            Self::Description => &["Описание", "description"],
        }
    }

    /// Column for a header cell, ignoring a leading BOM and outer whitespace
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim_start_matches('\u{feff}').trim();
        Self::ALL
            .into_iter()
            .find(|column| column.aliases().contains(&header))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OperationDate => "operation_date",
            Self::PaymentDate => "payment_date",
            Self::CardNumber => "card_number",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Description => "description",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ledger rows plus the known columns present in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    columns: BTreeSet<Column>,
}

impl Ledger {
    /// Ledger built in memory; every column counts as present
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self::with_columns(transactions, Column::ALL)
    }

    /// Ledger whose source provided only `columns`
    pub fn with_columns(
        transactions: Vec<Transaction>,
        columns: impl IntoIterator<Item = Column>,
    ) -> Self {
        Self {
            transactions,
            columns: columns.into_iter().collect(),
        }
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Known columns present, in declaration order
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    /// Fail with `MalformedInput` naming the first of `columns` that is absent
    pub fn require(&self, columns: &[Column]) -> Result<()> {
        match columns.iter().find(|c| !self.has_column(**c)) {
            Some(missing) => Err(Error::MalformedInput(format!(
                "missing required column '{}' (expected one of: {})",
                missing,
                missing.aliases().join(", ")
            ))),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }
}

impl From<Vec<Transaction>> for Ledger {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self::new(transactions)
    }
}
