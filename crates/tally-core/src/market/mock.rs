//! Mock market data for testing
//!
//! Returns values from fixed tables. Useful for unit tests and for running
//! reports without API keys.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{MarketData, Quotes};

/// Mock market data source
#[derive(Clone, Default)]
pub struct MockMarketData {
    pub rates: HashMap<String, f64>,
    pub prices: HashMap<String, f64>,
    /// Whether every lookup should fail with `LookupUnavailable`
    pub unavailable: bool,
}

impl MockMarketData {
    /// Create a mock with a few well-known currencies and stocks
    pub fn new() -> Self {
        let rates = [("USD", 80.0), ("EUR", 87.0), ("CNY", 11.1)];
        let prices = [("AAPL", 150.12), ("AMZN", 3173.18), ("GOOGL", 2742.39)];
        Self {
            rates: rates.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            prices: prices.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            unavailable: false,
        }
    }

    /// Create a mock whose lookups always fail
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn quotes(&self, table: &HashMap<String, f64>, keys: &[String]) -> Result<Quotes> {
        if self.unavailable {
            return Err(Error::LookupUnavailable("mock market data is offline".into()));
        }
        Ok(keys
            .iter()
            .map(|k| (k.clone(), table.get(k).copied()))
            .collect())
    }
}

#[async_trait]
impl MarketData for MockMarketData {
    async fn currency_rates(&self, currencies: &[String]) -> Result<Quotes> {
        self.quotes(&self.rates, currencies)
    }

    async fn stock_prices(&self, symbols: &[String]) -> Result<Quotes> {
        self.quotes(&self.prices, symbols)
    }
}
