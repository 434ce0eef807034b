//! Phone number detection in transaction descriptions

use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::models::Transaction;

/// Russian mobile number: `+7`, then 3-3-2-2 digits with optional separators
const PHONE_PATTERN: &str = r"\+7\s?\d{3}\s?\d{3}[\s-]?\d{2}[\s-]?\d{2}";

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("valid regex"))
}

/// Whether `text` contains a phone number anywhere
pub fn contains_phone_number(text: &str) -> bool {
    phone_regex().is_match(text)
}

/// Transactions whose description contains a phone number, in ledger order
pub fn find_with_phone_numbers(transactions: &[Transaction]) -> Vec<Transaction> {
    let matched: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| tx.description.as_deref().is_some_and(contains_phone_number))
        .cloned()
        .collect();

    if matched.is_empty() {
        warn!("No transactions with phone numbers found");
    } else {
        info!("Found {} transactions with phone numbers", matched.len());
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn described(description: Option<&str>) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2023, 10, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let tx = Transaction::new(date, dec!(-100), "Transfers");
        match description {
            Some(d) => tx.with_description(d),
            None => tx,
        }
    }

    #[test]
    fn test_contains_phone_number() {
        assert!(contains_phone_number("Transaction with phone number +7 123 456-78-90"));
        assert!(contains_phone_number("Another transaction with +71234567890"));
        assert!(contains_phone_number("+7 921 111 22 33"));
        assert!(contains_phone_number("МТС +7 981 333-44-55 top-up"));
        assert!(!contains_phone_number("No phone number here"));
        assert!(!contains_phone_number("Invalid phone number +1 123 456-78-90"));
        assert!(!contains_phone_number("8 921 111-22-33"));
        assert!(!contains_phone_number(""));
    }

    #[test]
    fn test_find_with_phone_numbers() {
        let ledger = vec![
            described(Some("Transaction with phone number +7 123 456-78-90")),
            described(Some("No phone number here")),
            described(Some("Another transaction with +71234567890")),
            described(None),
            described(Some("Invalid phone number +1 123 456-78-90")),
        ];

        let result = find_with_phone_numbers(&ledger);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], ledger[0]);
        assert_eq!(result[1], ledger[2]);
    }

    #[test]
    fn test_no_matches() {
        let ledger = vec![
            described(Some("No phone number here")),
            described(Some("Another without phone number")),
            described(None),
        ];
        assert!(find_with_phone_numbers(&ledger).is_empty());
    }

    #[test]
    fn test_empty_ledger() {
        assert!(find_with_phone_numbers(&[]).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let ledger = vec![
            described(Some("Перевод +7 921 111-22-33")),
            described(Some("Cafe")),
            described(Some("+7 900 000 00 00 refund")),
        ];
        let once = find_with_phone_numbers(&ledger);
        let twice = find_with_phone_numbers(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ledger_without_amount_column() {
        let csv = "operation_date,category,description
01.10.2023 10:00:00,Transfers,Перевод +7 921 111-22-33
02.10.2023 10:00:00,Cafe,Coffee
";
        let ledger = crate::import::parse_ledger(csv.as_bytes()).unwrap();
        let result = find_with_phone_numbers(&ledger.transactions);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category.as_deref(), Some("Transfers"));
    }

    #[test]
    fn test_ledger_without_description_column() {
        let csv = "operation_date,amount,category\n01.10.2023 10:00:00,-100,Transfers\n";
        let ledger = crate::import::parse_ledger(csv.as_bytes()).unwrap();
        assert!(find_with_phone_numbers(&ledger.transactions).is_empty());
    }
}
