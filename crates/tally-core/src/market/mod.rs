//! Currency rate and stock price lookups
//!
//! The monthly report shows the user's chosen currencies and stocks next to
//! the card summaries. Values come from external HTTP services behind the
//! `MarketData` trait.
//!
//! # Architecture
//!
//! - `MarketData` trait: the lookup interface used by report assembly
//! - `HttpMarketData`: exchangerate-api.com + financialmodelingprep.com
//! - `MockMarketData`: fixed tables for tests and offline runs
//!
//! Every requested code appears in the result. A code the service does not
//! know maps to `None` (JSON `null`) instead of being dropped.
//!
//! # Configuration
//!
//! Environment variables:
//! - `CURRENCY_API_KEY`: exchangerate-api.com key
//! - `SHARES_API_KEY`: financialmodelingprep.com key

mod http;
mod mock;

pub use http::HttpMarketData;
pub use mock::MockMarketData;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;

/// Code or symbol to value; `None` when the service has no value for it
pub type Quotes = BTreeMap<String, Option<f64>>;

/// Trait defining the interface for market data sources
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Value of one unit of each currency, in the configured base currency
    async fn currency_rates(&self, currencies: &[String]) -> Result<Quotes>;

    /// Latest price of each stock symbol
    async fn stock_prices(&self, symbols: &[String]) -> Result<Quotes>;
}

/// Every requested key mapped to `None`
pub fn unavailable(keys: &[String]) -> Quotes {
    keys.iter().map(|k| (k.clone(), None)).collect()
}
