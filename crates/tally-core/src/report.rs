//! Monthly report assembly
//!
//! Combines the per-card summary for the reference month with the user's
//! currency rates and stock prices. Lookups run one after the other; when a
//! service is unavailable the report is still produced with `null` values.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::cards::aggregate_card_spending;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::market::{unavailable, MarketData, Quotes};
use crate::models::{CardSpending, Greeting, UserSettings};

/// The "main page" report
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    /// Rendered greeting text
    pub greeting: String,
    pub spending_data: CardSpending,
    pub currency_rates: Quotes,
    pub stock_prices: Quotes,
}

/// Build the monthly report for `reference`.
///
/// Ledger column problems fail the report before any lookup is made.
pub async fn build_monthly_report(
    ledger: &Ledger,
    reference: NaiveDateTime,
    settings: &UserSettings,
    market: &dyn MarketData,
    greeting: Greeting,
) -> Result<MonthlyReport> {
    let spending_data = aggregate_card_spending(ledger, reference)?;

    let currency_rates = match market.currency_rates(&settings.user_currencies).await {
        Ok(rates) => rates,
        Err(e) => {
            warn!("Currency rates unavailable: {}", e);
            unavailable(&settings.user_currencies)
        }
    };

    let stock_prices = match market.stock_prices(&settings.user_stocks).await {
        Ok(prices) => prices,
        Err(e) => {
            warn!("Stock prices unavailable: {}", e);
            unavailable(&settings.user_stocks)
        }
    };

    info!(
        "Monthly report for {}: {} cards, {} currencies, {} stocks",
        reference,
        spending_data.len(),
        currency_rates.len(),
        stock_prices.len()
    );

    Ok(MonthlyReport {
        greeting: greeting.to_string(),
        spending_data,
        currency_rates,
        stock_prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ledger::Column;
    use crate::market::MockMarketData;
    use crate::models::Transaction;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn settings() -> UserSettings {
        UserSettings {
            user_currencies: vec!["USD".to_string(), "XYZ".to_string()],
            user_stocks: vec!["AAPL".to_string()],
        }
    }

    fn ledger() -> Ledger {
        Ledger::new(vec![
            Transaction::new(at(2022, 1, 1, 10), dec!(100), "Supermarkets")
                .with_card("1234567890123456"),
        ])
    }

    #[tokio::test]
    async fn test_report_with_lookups() {
        let market = MockMarketData::new();
        let report = build_monthly_report(
            &ledger(),
            at(2022, 1, 1, 10),
            &settings(),
            &market,
            Greeting::Morning,
        )
        .await
        .unwrap();

        assert_eq!(report.greeting, "Good morning");
        assert_eq!(report.spending_data.len(), 1);
        assert_eq!(report.currency_rates["USD"], Some(80.0));
        assert_eq!(report.currency_rates["XYZ"], None);
        assert_eq!(report.stock_prices["AAPL"], Some(150.12));
    }

    #[tokio::test]
    async fn test_report_survives_lookup_outage() {
        let market = MockMarketData::unavailable();
        let report = build_monthly_report(
            &ledger(),
            at(2022, 1, 31, 0),
            &settings(),
            &market,
            Greeting::Night,
        )
        .await
        .unwrap();

        assert_eq!(report.spending_data.len(), 1);
        assert_eq!(report.currency_rates.len(), 2);
        assert!(report.currency_rates.values().all(Option::is_none));
        assert_eq!(report.stock_prices["AAPL"], None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["currency_rates"]["USD"], serde_json::Value::Null);
        assert_eq!(
            json["spending_data"]["1234567890123456"]["last_4_digits"],
            "3456"
        );
    }

    #[tokio::test]
    async fn test_report_without_card_column() {
        let rows = ledger().transactions;
        let ledger = Ledger::with_columns(
            rows,
            [Column::OperationDate, Column::Amount, Column::Category],
        );

        let err = build_monthly_report(
            &ledger,
            at(2022, 1, 31, 0),
            &settings(),
            &MockMarketData::new(),
            Greeting::Night,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}
