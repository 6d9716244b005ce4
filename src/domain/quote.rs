//! Quote and symbol-search result types shared by all vendor adapters.

use serde_json::Value;

/// A normalized live quote. Every vendor adapter maps its wire format into
/// this shape so the reconciler stays vendor-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// One hit from a free-text symbol search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    pub kind: String,
    pub region: String,
    pub currency: String,
}

/// A structured per-operation failure: captured data, never raised across
/// the reconciler boundary. `details` carries the vendor payload (or
/// transport diagnostics) verbatim for display and debugging.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub details: Value,
}

impl ApiError {
    /// Transport or HTTP-level failure.
    pub fn network(details: Value) -> Self {
        Self {
            message: "Network Error".into(),
            details,
        }
    }

    /// Vendor throttling signal.
    pub fn rate_limited(details: Value) -> Self {
        Self {
            message: "API Rate Limit Exceeded".into(),
            details,
        }
    }

    /// Payload did not match the vendor's documented shape.
    pub fn invalid_response(details: Value) -> Self {
        Self {
            message: "Invalid API Response".into(),
            details,
        }
    }

    /// Anything uncategorized.
    pub fn unknown(details: Value) -> Self {
        Self {
            message: "Unknown Error".into(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_classes_carry_details() {
        let err = ApiError::rate_limited(json!("please slow down"));
        assert_eq!(err.message, "API Rate Limit Exceeded");
        assert_eq!(err.details, json!("please slow down"));

        let err = ApiError::network(json!({"status": 502}));
        assert_eq!(err.to_string(), "Network Error");
        assert_eq!(err.details["status"], 502);
    }

    #[test]
    fn invalid_response_and_unknown() {
        assert_eq!(
            ApiError::invalid_response(Value::Null).message,
            "Invalid API Response"
        );
        assert_eq!(ApiError::unknown(Value::Null).message, "Unknown Error");
    }
}
