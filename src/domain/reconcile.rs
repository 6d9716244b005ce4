//! Price reconciliation: concurrent quote fan-out merged against the
//! previous known-price cache.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde_json::json;
use tracing::{debug, warn};

use super::quote::ApiError;
use crate::ports::quote_port::QuotePort;

/// Advisory surfaced when at least one symbol failed to update.
pub const PARTIAL_UPDATE_ADVISORY: &str = "some stock quotes failed to update";

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    /// New price per symbol: fresh quotes, or the previous price where the
    /// lookup failed and a previous price existed.
    pub prices: HashMap<String, f64>,
    /// Per-symbol failures of this pass. Cleared per symbol on success.
    pub errors: HashMap<String, ApiError>,
    /// Coarse-grained status for display; the per-symbol detail lives in
    /// `errors`. Never fatal: successful updates are always committed.
    pub advisory: Option<String>,
    /// Set when the batch actually ran, failures included. `None` for the
    /// empty-set no-op.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fetch a fresh quote for every symbol, concurrently and independently.
///
/// One symbol's failure or slowness never aborts or delays another symbol's
/// entry; the call returns once every lookup has settled. Each lookup is
/// additionally bounded by `timeout`, after which it counts as a failure.
/// A failed symbol falls back to its `previous` price when one exists, so a
/// transient failure does not erase the last known price.
pub async fn reconcile_prices(
    symbols: &[String],
    previous: &HashMap<String, f64>,
    source: &dyn QuotePort,
    timeout: Duration,
) -> ReconcileOutcome {
    let unique: BTreeSet<&str> = symbols.iter().map(String::as_str).collect();

    if unique.is_empty() {
        return ReconcileOutcome {
            prices: previous.clone(),
            errors: HashMap::new(),
            advisory: None,
            completed_at: None,
        };
    }

    let lookups = unique.into_iter().map(|symbol| async move {
        let result = match tokio::time::timeout(timeout, source.get_quote(symbol)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::network(json!({
                "reason": "lookup timed out",
                "timeout_ms": timeout.as_millis() as u64,
            }))),
        };
        (symbol.to_string(), result)
    });

    let settled = join_all(lookups).await;

    let mut prices = HashMap::new();
    let mut errors = HashMap::new();

    for (symbol, result) in settled {
        match result {
            Ok(quote) => {
                debug!(symbol = %symbol, price = quote.price, "quote updated");
                prices.insert(symbol, quote.price);
            }
            Err(err) => {
                warn!(symbol = %symbol, error = %err, "quote lookup failed");
                if let Some(&stale) = previous.get(&symbol) {
                    prices.insert(symbol.clone(), stale);
                }
                errors.insert(symbol, err);
            }
        }
    }

    let advisory = (!errors.is_empty()).then(|| PARTIAL_UPDATE_ADVISORY.to_string());

    ReconcileOutcome {
        prices,
        errors,
        advisory,
        completed_at: Some(Utc::now()),
    }
}
