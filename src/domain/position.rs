//! Derived position snapshots.

use chrono::{DateTime, Utc};

/// Holdings snapshot for one symbol. Recomputed from scratch on every
/// aggregation pass: a pure view over the transaction log, never mutated
/// independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub shares: f64,
    /// Weighted-average purchase price per share; updated on buys only.
    pub average_cost: f64,
    pub earliest_purchase: DateTime<Utc>,
    pub current_price: f64,
    pub market_value: f64,
    pub unrealized_return: f64,
    pub unrealized_return_pct: f64,
}

impl Position {
    /// Build a snapshot from the running fold state, valuing it at `price`.
    ///
    /// The percentage is guarded to exactly 0 when total cost is 0, never
    /// NaN or infinity.
    pub fn valued(
        symbol: String,
        shares: f64,
        average_cost: f64,
        earliest_purchase: DateTime<Utc>,
        price: f64,
    ) -> Self {
        let market_value = shares * price;
        let total_cost = shares * average_cost;
        let unrealized_return = market_value - total_cost;
        let unrealized_return_pct = if total_cost > 0.0 {
            unrealized_return / total_cost * 100.0
        } else {
            0.0
        };
        Self {
            symbol,
            shares,
            average_cost,
            earliest_purchase,
            current_price: price,
            market_value,
            unrealized_return,
            unrealized_return_pct,
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.shares * self.average_cost
    }
}
