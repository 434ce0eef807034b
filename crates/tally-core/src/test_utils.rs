//! Test utilities for tally-core
//!
//! This module provides a mock market-data server that answers like
//! exchangerate-api.com and financialmodelingprep.com, so the HTTP lookup
//! client can be exercised without network access or API keys.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{Json, Path, Query},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Mock market-data server for testing
pub struct MockMarketServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockMarketServer {
    /// Currency API key the server rejects
    pub const INVALID_KEY: &'static str = "invalid-key";

    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/v6/:key/latest/:base", get(handle_latest_rates))
            .route("/api/v3/search", get(handle_search))
            .route("/api/v3/quote-short/:symbol", get(handle_quote_short));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockMarketServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Units of each currency per one unit of the base (RUB)
const RATES: &[(&str, f64)] = &[("RUB", 1.0), ("USD", 0.0125), ("EUR", 0.0115), ("CNY", 0.09)];

/// Known stock symbols and prices
const PRICES: &[(&str, &str, f64)] = &[
    ("AAPL", "Apple Inc.", 150.12),
    ("TSLA", "Tesla, Inc.", 250.5),
];

/// exchangerate-api `latest` endpoint
async fn handle_latest_rates(Path((key, base)): Path<(String, String)>) -> Json<Value> {
    if key == MockMarketServer::INVALID_KEY {
        return Json(json!({
            "result": "error",
            "error-type": "invalid-key",
        }));
    }

    let rates: serde_json::Map<String, Value> = RATES
        .iter()
        .map(|(code, rate)| (code.to_string(), json!(rate)))
        .collect();

    Json(json!({
        "result": "success",
        "base_code": base,
        "conversion_rates": rates,
    }))
}

/// financialmodelingprep search endpoint
async fn handle_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let query = params.get("query").map(|q| q.to_uppercase()).unwrap_or_default();
    let hits: Vec<Value> = PRICES
        .iter()
        .filter(|(symbol, _, _)| *symbol == query)
        .map(|(symbol, name, _)| json!({ "symbol": symbol, "name": name }))
        .collect();
    Json(Value::Array(hits))
}

/// financialmodelingprep quote-short endpoint
async fn handle_quote_short(Path(symbol): Path<String>) -> Json<Value> {
    let quotes: Vec<Value> = PRICES
        .iter()
        .filter(|(s, _, _)| *s == symbol)
        .map(|(s, _, price)| json!({ "symbol": s, "price": price, "volume": 1000 }))
        .collect();
    Json(Value::Array(quotes))
}
