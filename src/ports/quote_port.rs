//! Market-data quote source port trait.

use async_trait::async_trait;

use crate::domain::quote::{ApiError, SearchResult, StockQuote};

/// A market-data vendor. Implementations normalize their wire formats to
/// the shared result shapes, so callers never see vendor quirks.
///
/// Failures are structured [`ApiError`] values rather than panics, which
/// lets the reconciler contain them per symbol.
#[async_trait]
pub trait QuotePort: Send + Sync {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, ApiError>;

    /// Free-text symbol search. An empty or blank query yields an empty
    /// result list, not an error.
    async fn search_symbols(&self, query: &str) -> Result<Vec<SearchResult>, ApiError>;
}
