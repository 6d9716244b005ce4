//! Last-known price cache shared between reconciliation passes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::quote::ApiError;
use super::reconcile::ReconcileOutcome;

/// Last-known price per symbol plus the error set of the most recent
/// reconciliation pass. Empty at start; entries are overwritten by each pass
/// and survive transient lookup failures (stale-but-present).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceCache {
    pub prices: HashMap<String, f64>,
    pub errors: HashMap<String, ApiError>,
    /// Completion time of the last reconciliation batch that actually ran;
    /// consumers use this to judge staleness.
    pub last_updated: Option<DateTime<Utc>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied()
    }

    pub fn error(&self, symbol: &str) -> Option<&ApiError> {
        self.errors.get(symbol)
    }

    /// Commit a reconciliation outcome. A no-op outcome (batch never ran)
    /// leaves the staleness stamp untouched.
    pub fn apply(&mut self, outcome: ReconcileOutcome) {
        self.prices = outcome.prices;
        self.errors = outcome.errors;
        if let Some(completed_at) = outcome.completed_at {
            self.last_updated = Some(completed_at);
        }
    }
}
