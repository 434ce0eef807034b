//! Domain models for Tally

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One row of the ledger.
///
/// `operation_date`, `amount` and `category` are `None` only when the source
/// had no such column; a present column always yields a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_date: Option<NaiveDateTime>,
    pub payment_date: Option<NaiveDate>,
    /// Opaque card identifier, never interpreted as a number
    pub card_number: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub description: Option<String>,
    /// Remaining columns of the source row, keyed by header
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Transaction {
    /// Create a transaction with only the required fields set
    pub fn new(operation_date: NaiveDateTime, amount: Decimal, category: &str) -> Self {
        Self {
            operation_date: Some(operation_date),
            payment_date: None,
            card_number: None,
            amount: Some(amount),
            category: Some(category.to_string()),
            description: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the card identifier
    pub fn with_card(mut self, card_number: &str) -> Self {
        self.card_number = Some(card_number.to_string());
        self
    }

    /// Set the free-text description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// A transaction as shown in a card's top list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTransaction {
    pub operation_date: NaiveDateTime,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Month-to-date summary for one card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    /// Full card identifier (the key of the serialized mapping)
    #[serde(skip)]
    pub card_number: String,
    pub last_4_digits: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    /// Floor of `total_spent / 100`
    #[serde(with = "rust_decimal::serde::float")]
    pub cashback: Decimal,
    pub top_transactions: Vec<TopTransaction>,
}

/// Per-card summaries in first-seen order.
///
/// Serializes as a JSON object keyed by the full card identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardSpending {
    cards: Vec<CardSummary>,
}

impl CardSpending {
    pub fn new(cards: Vec<CardSummary>) -> Self {
        Self { cards }
    }

    /// Look up a card by its full identifier
    pub fn get(&self, card_number: &str) -> Option<&CardSummary> {
        self.cards.iter().find(|c| c.card_number == card_number)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardSummary> {
        self.cards.iter()
    }

    /// Card identifiers in first-seen order
    pub fn card_numbers(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.card_number.as_str()).collect()
    }
}

impl Serialize for CardSpending {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cards.len()))?;
        for card in &self.cards {
            map.serialize_entry(&card.card_number, card)?;
        }
        map.end()
    }
}

/// Currency codes and stock symbols the user wants in the monthly report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub user_currencies: Vec<String>,
    #[serde(default)]
    pub user_stocks: Vec<String>,
}

/// Time-of-day greeting shown at the top of the monthly report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Greeting {
    /// Pick the greeting for an hour of the day (0-23)
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=22 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Greeting for the current local time
    pub fn now() -> Self {
        use chrono::Timelike;
        Self::for_hour(chrono::Local::now().hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "Good morning",
            Self::Afternoon => "Good afternoon",
            Self::Evening => "Good evening",
            Self::Night => "Good night",
        }
    }
}

impl std::fmt::Display for Greeting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
