//! HTTP market data backend
//!
//! Currency rates come from exchangerate-api.com (v6), stock prices from
//! financialmodelingprep.com (v3 search + quote-short).

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::LookupConfig;
use crate::error::{Error, Result};

use super::{MarketData, Quotes};

/// Market data over HTTP
#[derive(Clone)]
pub struct HttpMarketData {
    http_client: Client,
    config: LookupConfig,
}

impl HttpMarketData {
    /// Create a client; every request is bounded by `config.timeout`
    pub fn new(config: LookupConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::LookupUnavailable(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::LookupUnavailable(format!(
                "service returned {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::LookupUnavailable(format!("unexpected response: {}", e.without_url())))
    }

    /// Resolve a symbol through search, then fetch its latest price
    async fn stock_price(&self, symbol: &str, key: &str) -> Result<Option<f64>> {
        let search_url = format!("{}/api/v3/search", self.config.stocks_url);
        let hits: Vec<SearchHit> = self
            .get_json(&search_url, &[("query", symbol), ("apikey", key)])
            .await?;

        let Some(hit) = hits.into_iter().next() else {
            warn!("Stock {} not found", symbol);
            return Ok(None);
        };

        let quote_url = format!("{}/api/v3/quote-short/{}", self.config.stocks_url, hit.symbol);
        let quotes: Vec<QuoteShort> = self.get_json(&quote_url, &[("apikey", key)]).await?;

        Ok(quotes.into_iter().next().map(|q| q.price))
    }
}

/// Response from exchangerate-api `latest` endpoint
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

/// One hit of the stock search endpoint
#[derive(Debug, Deserialize)]
struct SearchHit {
    symbol: String,
}

/// Entry of the quote-short endpoint
#[derive(Debug, Deserialize)]
struct QuoteShort {
    price: f64,
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Invert "base → currency" rates into "one unit of currency in base"
fn invert_rates(currencies: &[String], rates: &HashMap<String, f64>) -> Quotes {
    currencies
        .iter()
        .map(|code| {
            let value = rates
                .get(&code.to_uppercase())
                .filter(|rate| **rate > 0.0)
                .map(|rate| round2(1.0 / rate));
            if value.is_none() {
                warn!("No rate for currency {}", code);
            }
            (code.clone(), value)
        })
        .collect()
}

#[async_trait]
impl MarketData for HttpMarketData {
    async fn currency_rates(&self, currencies: &[String]) -> Result<Quotes> {
        if currencies.is_empty() {
            return Ok(Quotes::new());
        }
        let key = self
            .config
            .currency_api_key
            .as_deref()
            .ok_or_else(|| Error::LookupUnavailable("CURRENCY_API_KEY is not set".into()))?;

        let url = format!(
            "{}/v6/{}/latest/{}",
            self.config.currency_url, key, self.config.base_currency
        );
        let response: LatestRatesResponse = self.get_json(&url, &[]).await?;

        if response.result.as_deref() == Some("error") {
            return Err(Error::LookupUnavailable(format!(
                "exchange rate service error: {}",
                response.error_type.as_deref().unwrap_or("unknown")
            )));
        }

        debug!("Received {} conversion rates", response.conversion_rates.len());
        Ok(invert_rates(currencies, &response.conversion_rates))
    }

    async fn stock_prices(&self, symbols: &[String]) -> Result<Quotes> {
        if symbols.is_empty() {
            return Ok(Quotes::new());
        }
        let key = self
            .config
            .stocks_api_key
            .as_deref()
            .ok_or_else(|| Error::LookupUnavailable("SHARES_API_KEY is not set".into()))?;

        // Sequential: the free tier rejects bursts
        let mut prices = Quotes::new();
        for symbol in symbols {
            let price = match self.stock_price(symbol, key).await {
                Ok(price) => price,
                Err(e) => {
                    warn!("Failed to fetch price for {}: {}", symbol, e);
                    None
                }
            };
            prices.insert(symbol.clone(), price);
        }

        info!("Fetched prices for {} stocks", prices.len());
        Ok(prices)
    }
}
