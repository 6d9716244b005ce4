//! SQLite transaction log adapter.

use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::domain::error::FoliotrackError;
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::ports::config_port::ConfigPort;
use crate::ports::transaction_store::TransactionStore;

pub struct SqliteStoreAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStoreAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FoliotrackError> {
        let db_path = config.require_string("sqlite", "path")?;
        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| FoliotrackError::Database {
                    reason: e.to_string(),
                })?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, FoliotrackError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| FoliotrackError::Database {
                reason: e.to_string(),
            })?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn initialize_schema(&self) -> Result<(), FoliotrackError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| FoliotrackError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL CHECK (kind IN ('buy', 'sell')),
                symbol TEXT NOT NULL,
                shares REAL NOT NULL,
                price REAL NOT NULL,
                date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_transactions_symbol ON transactions(symbol);",
        )
        .map_err(|e: rusqlite::Error| FoliotrackError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

impl TransactionStore for SqliteStoreAdapter {
    fn list(&self) -> Result<Vec<Transaction>, FoliotrackError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| FoliotrackError::Database {
                reason: e.to_string(),
            })?;

        // No ORDER BY: the store makes no ordering promise, the aggregator
        // sorts by date itself.
        let mut stmt = conn
            .prepare("SELECT id, kind, symbol, shares, price, date FROM transactions")
            .map_err(|e: rusqlite::Error| FoliotrackError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map([], |row| {
                let kind_str: String = row.get(1)?;
                let kind = TransactionKind::parse(&kind_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        1,
                        rusqlite::types::Type::Text,
                        format!("unknown transaction kind: {kind_str}").into(),
                    )
                })?;
                let date_str: String = row.get(5)?;
                let date = DateTime::parse_from_rfc3339(&date_str)
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            5,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?
                    .with_timezone(&Utc);
                Ok(Transaction {
                    id: row.get(0)?,
                    kind,
                    symbol: row.get(2)?,
                    shares: row.get(3)?,
                    price: row.get(4)?,
                    date,
                })
            })
            .map_err(|e: rusqlite::Error| FoliotrackError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut transactions = Vec::new();
        for row in rows {
            transactions.push(row.map_err(|e: rusqlite::Error| {
                FoliotrackError::DatabaseQuery {
                    reason: e.to_string(),
                }
            })?);
        }

        Ok(transactions)
    }

    fn save(&self, transaction: &Transaction) -> Result<(), FoliotrackError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| FoliotrackError::Database {
                reason: e.to_string(),
            })?;

        conn.execute(
            "INSERT INTO transactions (id, kind, symbol, shares, price, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                transaction.id,
                transaction.kind.as_str(),
                transaction.symbol,
                transaction.shares,
                transaction.price,
                transaction.date.to_rfc3339(),
            ],
        )
        .map_err(|e: rusqlite::Error| FoliotrackError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), FoliotrackError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| FoliotrackError::Database {
                reason: e.to_string(),
            })?;

        let affected = conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])
            .map_err(|e: rusqlite::Error| FoliotrackError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        if affected == 0 {
            return Err(FoliotrackError::DatabaseQuery {
                reason: format!("no transaction with id {id}"),
            });
        }

        Ok(())
    }
}
