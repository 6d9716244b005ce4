//! Transaction log store port trait.

use crate::domain::error::FoliotrackError;
use crate::domain::transaction::Transaction;

/// Durable storage for the transaction log.
///
/// `list` carries no ordering guarantee; the aggregator sorts.
pub trait TransactionStore {
    fn list(&self) -> Result<Vec<Transaction>, FoliotrackError>;

    fn save(&self, transaction: &Transaction) -> Result<(), FoliotrackError>;

    /// Delete by id. Deleting an unknown id is an error.
    fn delete(&self, id: &str) -> Result<(), FoliotrackError>;
}
