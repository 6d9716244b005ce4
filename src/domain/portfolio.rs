//! Position aggregation: transaction log → current holdings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::position::Position;
use super::transaction::{Transaction, TransactionKind};

/// Per-symbol running state for the aggregation fold.
struct Running {
    shares: f64,
    average_cost: f64,
    earliest_purchase: DateTime<Utc>,
    /// Price of the most recently folded transaction; the fallback when the
    /// price map has no entry for the symbol.
    last_price: f64,
}

/// Replay `transactions` into current positions, valuing each at the cached
/// price or, absent one, at the symbol's last transaction price.
///
/// Pure and deterministic: identical inputs always yield identical output,
/// sorted by symbol. Transactions are folded in ascending date order; equal
/// dates keep the input-slice order (stable sort).
///
/// Average cost is recomputed on buys only; a sell leaves the cost basis of
/// the remaining shares unchanged. A symbol whose running balance reaches
/// zero or below is dropped from the running state at that point, so closed
/// positions never appear in the output and a later buy reopens the symbol
/// with a fresh basis.
pub fn compute_positions(
    transactions: &[Transaction],
    prices: &HashMap<String, f64>,
) -> Vec<Position> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|tx| tx.date);

    let mut state: HashMap<String, Running> = HashMap::new();

    for tx in sorted {
        let entry = state.entry(tx.symbol.clone()).or_insert(Running {
            shares: 0.0,
            average_cost: 0.0,
            earliest_purchase: tx.date,
            last_price: tx.price,
        });

        match tx.kind {
            TransactionKind::Buy => {
                let new_shares = entry.shares + tx.shares;
                let new_cost = entry.shares * entry.average_cost + tx.shares * tx.price;
                entry.average_cost = new_cost / new_shares;
                entry.shares = new_shares;
                if tx.date < entry.earliest_purchase {
                    entry.earliest_purchase = tx.date;
                }
            }
            TransactionKind::Sell => {
                entry.shares -= tx.shares;
            }
        }
        entry.last_price = tx.price;

        if entry.shares <= 0.0 {
            state.remove(&tx.symbol);
        }
    }

    let mut positions: Vec<Position> = state
        .into_iter()
        .map(|(symbol, running)| {
            let price = prices
                .get(&symbol)
                .copied()
                .unwrap_or(running.last_price);
            Position::valued(
                symbol,
                running.shares,
                running.average_cost,
                running.earliest_purchase,
                price,
            )
        })
        .collect();

    positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    positions
}


#[cfg(test)]
mod permutation_properties {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn leg(symbol: &str, seed: u64) -> Vec<Transaction> {
        // Deterministic per-symbol history: two buys and one partial sell,
        // shaped by the seed, all on the same date.
        let d = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let base = 10.0 + (seed % 90) as f64;
        vec![
            Transaction {
                id: format!("{symbol}-1"),
                kind: TransactionKind::Buy,
                symbol: symbol.into(),
                shares: base,
                price: base / 2.0,
                date: d,
            },
            Transaction {
                id: format!("{symbol}-2"),
                kind: TransactionKind::Buy,
                symbol: symbol.into(),
                shares: base / 2.0,
                price: base,
                date: d,
            },
            Transaction {
                id: format!("{symbol}-3"),
                kind: TransactionKind::Sell,
                symbol: symbol.into(),
                shares: base / 4.0,
                price: base * 1.5,
                date: d,
            },
        ]
    }

    proptest! {
        // Interleaving equal-date histories of different symbols must never
        // change the result, as long as each symbol's relative order holds.
        #[test]
        fn interleaving_is_irrelevant(seed_a in 0u64..1000, seed_b in 0u64..1000) {
            let a = leg("AAA", seed_a);
            let b = leg("BBB", seed_b);

            let blocked: Vec<Transaction> = a.iter().chain(b.iter()).cloned().collect();
            let round_robin = vec![
                a[0].clone(), b[0].clone(),
                a[1].clone(), b[1].clone(),
                a[2].clone(), b[2].clone(),
            ];

            let prices = std::collections::HashMap::new();
            prop_assert_eq!(
                compute_positions(&blocked, &prices),
                compute_positions(&round_robin, &prices)
            );
        }
    }
}
