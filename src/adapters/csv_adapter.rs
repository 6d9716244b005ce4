//! CSV bulk transaction import.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::domain::error::FoliotrackError;
use crate::domain::transaction::{Transaction, TransactionKind};

/// Read transactions from a CSV file with columns
/// `kind,symbol,shares,price,date` (header row required). Dates accept
/// RFC 3339 or plain `YYYY-MM-DD` (midnight UTC). Each row is validated; a
/// malformed row aborts the whole import rather than importing a partial file.
///
/// Ids are generated on import, matching the create-then-persist lifecycle
/// of transactions entered one at a time.
pub fn read_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>, FoliotrackError> {
    let content = fs::read_to_string(path.as_ref())?;

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut transactions = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record_no = index + 1;
        let record = result.map_err(|e| FoliotrackError::Import {
            record: record_no,
            reason: e.to_string(),
        })?;

        let field = |idx: usize, name: &str| -> Result<String, FoliotrackError> {
            record
                .get(idx)
                .map(|s| s.trim().to_string())
                .ok_or_else(|| FoliotrackError::Import {
                    record: record_no,
                    reason: format!("missing {name} column"),
                })
        };

        let kind_str = field(0, "kind")?;
        let kind = TransactionKind::parse(&kind_str).ok_or_else(|| FoliotrackError::Import {
            record: record_no,
            reason: format!("unknown transaction kind: {kind_str}"),
        })?;

        let symbol = field(1, "symbol")?.to_uppercase();

        let shares: f64 = field(2, "shares")?
            .parse()
            .map_err(|e| FoliotrackError::Import {
                record: record_no,
                reason: format!("invalid shares: {e}"),
            })?;

        let price: f64 = field(3, "price")?
            .parse()
            .map_err(|e| FoliotrackError::Import {
                record: record_no,
                reason: format!("invalid price: {e}"),
            })?;

        let date = parse_date(&field(4, "date")?).ok_or_else(|| FoliotrackError::Import {
            record: record_no,
            reason: "invalid date (expected RFC 3339 or YYYY-MM-DD)".into(),
        })?;

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            kind,
            symbol,
            shares,
            price,
            date,
        };

        transaction
            .validate()
            .map_err(|e| FoliotrackError::Import {
                record: record_no,
                reason: e.to_string(),
            })?;

        transactions.push(transaction);
    }

    Ok(transactions)
}

/// RFC 3339 first, then bare date at midnight UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}
