//! Finnhub quote adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::error::FoliotrackError;
use crate::domain::quote::{ApiError, SearchResult, StockQuote};
use crate::ports::quote_port::QuotePort;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

pub struct FinnhubAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FinnhubAdapter {
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

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(params)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let details = json!({"status": status.as_u16(), "body": body});
            // Finnhub throttles with a plain 429.
            return Err(if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                ApiError::rate_limited(details)
            } else {
                ApiError::network(details)
            });
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

/// Parse a `/quote` payload: `c` current price (required), `d`/`dp` change
/// and change percent (absent or null for some instruments, defaulting to 0).
fn parse_quote_body(symbol: &str, body: &Value) -> Result<StockQuote, ApiError> {
    let price = body
        .get("c")
        .and_then(Value::as_f64)
        .ok_or_else(|| ApiError::invalid_response(body.clone()))?;

    Ok(StockQuote {
        symbol: symbol.to_string(),
        price,
        change: body.get("d").and_then(Value::as_f64).unwrap_or(0.0),
        change_percent: body.get("dp").and_then(Value::as_f64).unwrap_or(0.0),
    })
}

/// Parse a `/search` payload. Finnhub focuses on US markets, so region and
/// currency are fixed.
fn parse_search_body(body: &Value) -> Result<Vec<SearchResult>, ApiError> {
    let result = body
        .get("result")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::invalid_response(body.clone()))?;

    let text = |item: &Value, key: &str| -> String {
        item.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(result
        .iter()
        .map(|item| SearchResult {
            symbol: text(item, "symbol"),
            name: text(item, "description"),
            kind: text(item, "type"),
            region: "US".to_string(),
            currency: "USD".to_string(),
        })
        .collect())
}

#[async_trait]
impl QuotePort for FinnhubAdapter {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, ApiError> {
        let body = self
            .get("quote", &[("symbol", symbol), ("token", &self.api_key)])
            .await?;
        parse_quote_body(symbol, &body)
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let body = self
            .get("search", &[("q", query), ("token", &self.api_key)])
            .await?;
        parse_search_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quote() {
        let body = json!({"c": 187.44, "d": -1.23, "dp": -0.6518});
        let quote = parse_quote_body("AAPL", &body).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert!((quote.price - 187.44).abs() < 1e-9);
        assert!((quote.change - (-1.23)).abs() < 1e-9);
        assert!((quote.change_percent - (-0.6518)).abs() < 1e-9);
    }

    #[test]
    fn missing_change_fields_default_to_zero() {
        let body = json!({"c": 42.0, "d": null, "dp": null});
        let quote = parse_quote_body("XYZ", &body).unwrap();
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.change_percent, 0.0);
    }

    #[test]
    fn non_numeric_price_is_invalid_response() {
        let body = json!({"c": "187.44"});
        let err = parse_quote_body("AAPL", &body).unwrap_err();
        assert_eq!(err.message, "Invalid API Response");

        let err = parse_quote_body("AAPL", &json!({})).unwrap_err();
        assert_eq!(err.message, "Invalid API Response");
    }

    #[test]
    fn parses_search_results() {
        let body = json!({
            "count": 1,
            "result": [{
                "symbol": "AAPL",
                "description": "APPLE INC",
                "type": "Common Stock"
            }]
        });
        let results = parse_search_body(&body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "AAPL");
        assert_eq!(results[0].name, "APPLE INC");
        assert_eq!(results[0].kind, "Common Stock");
        assert_eq!(results[0].region, "US");
        assert_eq!(results[0].currency, "USD");
    }

    #[test]
    fn search_without_result_array_is_invalid_response() {
        let err = parse_search_body(&json!({"count": 0})).unwrap_err();
        assert_eq!(err.message, "Invalid API Response");
    }
}
