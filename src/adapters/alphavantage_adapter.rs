//! Alpha Vantage quote adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::error::FoliotrackError;
use crate::domain::quote::{ApiError, SearchResult, StockQuote};
use crate::ports::quote_port::QuotePort;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

pub struct AlphaVantageAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageAdapter {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, FoliotrackError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FoliotrackError::QuoteSource {
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Override the endpoint, e.g. to point at a stub server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(format!("{}/query", self.base_url))
            .query(params)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::network(json!({
                "status": status.as_u16(),
                "body": body,
            })));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::invalid_response(json!({"reason": e.to_string()})))
    }
}

fn transport_error(err: &reqwest::Error) -> ApiError {
    ApiError::network(json!({
        "status": err.status().map(|s| s.as_u16()),
        "reason": err.to_string(),
    }))
}

/// Parse a `GLOBAL_QUOTE` payload. Alpha Vantage delivers every numeric
/// field as a string; `change percent` carries a trailing `%`.
fn parse_quote_body(symbol: &str, body: &Value) -> Result<StockQuote, ApiError> {
    if let Some(note) = body.get("Note") {
        return Err(ApiError::rate_limited(note.clone()));
    }

    let quote = match body.get("Global Quote") {
        Some(q) if q.get("05. price").is_some() => q,
        _ => return Err(ApiError::invalid_response(body.clone())),
    };

    let number = |key: &str| -> Result<f64, ApiError> {
        quote
            .get(key)
            .and_then(Value::as_str)
            .and_then(|s| s.trim_end_matches('%').parse::<f64>().ok())
            .ok_or_else(|| ApiError::invalid_response(body.clone()))
    };

    Ok(StockQuote {
        symbol: quote
            .get("01. symbol")
            .and_then(Value::as_str)
            .unwrap_or(symbol)
            .to_string(),
        price: number("05. price")?,
        change: number("09. change")?,
        change_percent: number("10. change percent")?,
    })
}

fn parse_search_body(body: &Value) -> Result<Vec<SearchResult>, ApiError> {
    if let Some(note) = body.get("Note") {
        return Err(ApiError::rate_limited(note.clone()));
    }

    let matches = body
        .get("bestMatches")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::invalid_response(body.clone()))?;

    let text = |item: &Value, key: &str| -> String {
        item.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(matches
        .iter()
        .map(|item| SearchResult {
            symbol: text(item, "1. symbol"),
            name: text(item, "2. name"),
            kind: text(item, "3. type"),
            region: text(item, "4. region"),
            currency: text(item, "8. currency"),
        })
        .collect())
}

#[async_trait]
impl QuotePort for AlphaVantageAdapter {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, ApiError> {
        let body = self
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", &self.api_key),
            ])
            .await?;
        parse_quote_body(symbol, &body)
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let body = self
            .query(&[
                ("function", "SYMBOL_SEARCH"),
                ("keywords", query),
                ("apikey", &self.api_key),
            ])
            .await?;
        parse_search_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_body() -> Value {
        json!({
            "Global Quote": {
                "01. symbol": "AAPL",
                "05. price": "187.4400",
                "09. change": "-1.2300",
                "10. change percent": "-0.6518%"
            }
        })
    }

    #[test]
    fn parses_global_quote() {
        let quote = parse_quote_body("AAPL", &quote_body()).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert!((quote.price - 187.44).abs() < 1e-9);
        assert!((quote.change - (-1.23)).abs() < 1e-9);
        assert!((quote.change_percent - (-0.6518)).abs() < 1e-9);
    }

    #[test]
    fn note_means_rate_limited() {
        let body = json!({"Note": "Thank you for using Alpha Vantage!"});
        let err = parse_quote_body("AAPL", &body).unwrap_err();
        assert_eq!(err.message, "API Rate Limit Exceeded");
        assert_eq!(err.details, json!("Thank you for using Alpha Vantage!"));
    }

    #[test]
    fn missing_quote_block_is_invalid_response() {
        let body = json!({"unexpected": true});
        let err = parse_quote_body("AAPL", &body).unwrap_err();
        assert_eq!(err.message, "Invalid API Response");

        // Present block but no price field.
        let body = json!({"Global Quote": {"01. symbol": "AAPL"}});
        assert_eq!(
            parse_quote_body("AAPL", &body).unwrap_err().message,
            "Invalid API Response"
        );
    }

    #[test]
    fn malformed_number_is_invalid_response() {
        let mut body = quote_body();
        body["Global Quote"]["05. price"] = json!("not-a-number");
        assert_eq!(
            parse_quote_body("AAPL", &body).unwrap_err().message,
            "Invalid API Response"
        );
    }

    #[test]
    fn parses_search_matches() {
        let body = json!({
            "bestMatches": [{
                "1. symbol": "AAPL",
                "2. name": "Apple Inc",
                "3. type": "Equity",
                "4. region": "United States",
                "8. currency": "USD"
            }]
        });
        let results = parse_search_body(&body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "AAPL");
        assert_eq!(results[0].name, "Apple Inc");
        assert_eq!(results[0].kind, "Equity");
        assert_eq!(results[0].region, "United States");
        assert_eq!(results[0].currency, "USD");
    }

    #[test]
    fn search_without_matches_is_invalid_response() {
        let err = parse_search_body(&json!({"oops": 1})).unwrap_err();
        assert_eq!(err.message, "Invalid API Response");
    }
}
