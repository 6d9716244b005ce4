#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use foliotrack::domain::quote::{ApiError, SearchResult, StockQuote};
use foliotrack::domain::transaction::{Transaction, TransactionKind};
use foliotrack::ports::quote_port::QuotePort;

/// Scriptable quote source for pipeline tests: canned quotes, canned
/// failures and artificial per-symbol delays.
#[derive(Default)]
pub struct MockQuotePort {
    pub quotes: HashMap<String, StockQuote>,
    pub failures: HashMap<String, ApiError>,
    pub delays: HashMap<String, Duration>,
    pub search_results: Vec<SearchResult>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.quotes.insert(
            symbol.to_string(),
            StockQuote {
                symbol: symbol.to_string(),
                price,
                change: 0.0,
                change_percent: 0.0,
            },
        );
        self
    }

    pub fn with_failure(mut self, symbol: &str, err: ApiError) -> Self {
        self.failures.insert(symbol.to_string(), err);
        self
    }

    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }

    pub fn with_search_result(mut self, result: SearchResult) -> Self {
        self.search_results.push(result);
        self
    }
}

#[async_trait]
impl QuotePort for MockQuotePort {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, ApiError> {
        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(err) = self.failures.get(symbol) {
            return Err(err.clone());
        }
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| ApiError::invalid_response(json!({"symbol": symbol})))
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.search_results.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn buy(id: &str, symbol: &str, shares: f64, price: f64, d: DateTime<Utc>) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind: TransactionKind::Buy,
        symbol: symbol.to_string(),
        shares,
        price,
        date: d,
    }
}

pub fn sell(id: &str, symbol: &str, shares: f64, price: f64, d: DateTime<Utc>) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind: TransactionKind::Sell,
        symbol: symbol.to_string(),
        shares,
        price,
        date: d,
    }
}
