//! Buy/sell transaction events.

use chrono::{DateTime, Utc};
use std::fmt;

use super::error::FoliotrackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Buy,
    Sell,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Buy => "buy",
            TransactionKind::Sell => "sell",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "buy" => Some(TransactionKind::Buy),
            "sell" => Some(TransactionKind::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable trade event: created, persisted, and at most deleted by id,
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub symbol: String,
    pub shares: f64,
    pub price: f64,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Field invariants, enforced at the creation boundary (CLI add, CSV
    /// import). The aggregation fold itself stays permissive.
    pub fn validate(&self) -> Result<(), FoliotrackError> {
        if self.symbol.trim().is_empty() {
            return Err(FoliotrackError::InvalidTransaction {
                reason: "symbol must not be empty".into(),
            });
        }
        if !(self.shares.is_finite() && self.shares > 0.0) {
            return Err(FoliotrackError::InvalidTransaction {
                reason: format!("shares must be positive, got {}", self.shares),
            });
        }
        if !(self.price.is_finite() && self.price >= 0.0) {
            return Err(FoliotrackError::InvalidTransaction {
                reason: format!("price must be non-negative, got {}", self.price),
            });
        }
        Ok(())
    }
}
