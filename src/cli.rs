//! CLI definition and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::adapters::csv_adapter::{parse_date, read_transactions};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::quote_port_from_config;
use crate::adapters::sqlite_store_adapter::SqliteStoreAdapter;
use crate::domain::error::FoliotrackError;
use crate::domain::portfolio::compute_positions;
use crate::domain::price_cache::PriceCache;
use crate::domain::quote::ApiError;
use crate::domain::reconcile::reconcile_prices;
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::ports::config_port::ConfigPort;
use crate::ports::transaction_store::TransactionStore;

#[derive(Parser, Debug)]
#[command(name = "foliotrack", about = "Equity portfolio tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show current positions with live prices
    Positions {
        #[arg(short, long)]
        config: PathBuf,
        /// Skip the quote refresh and value positions at transaction prices
        #[arg(long)]
        offline: bool,
    },
    /// Record a transaction
    Add {
        #[arg(short, long)]
        config: PathBuf,
        /// buy or sell
        #[arg(long)]
        kind: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        shares: f64,
        /// Per-share price at the time of the transaction
        #[arg(long)]
        price: f64,
        /// RFC 3339 or YYYY-MM-DD; defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// List recorded transactions
    List {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Delete a transaction by id
    Delete {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        id: String,
    },
    /// Bulk-import transactions from a CSV file
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Search the vendor for symbols matching a query
    Search {
        #[arg(short, long)]
        config: PathBuf,
        query: String,
    },
    /// Fetch a single live quote
    Quote {
        #[arg(short, long)]
        config: PathBuf,
        symbol: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Positions { config, offline } => run_positions(&config, offline),
        Command::Add {
            config,
            kind,
            symbol,
            shares,
            price,
            date,
        } => run_add(&config, &kind, &symbol, shares, price, date.as_deref()),
        Command::List { config } => run_list(&config),
        Command::Delete { config, id } => run_delete(&config, &id),
        Command::Import { config, file } => run_import(&config, &file),
        Command::Search { config, query } => run_search(&config, &query),
        Command::Quote { config, symbol } => run_quote(&config, &symbol),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FoliotrackError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn open_store(config: &dyn ConfigPort) -> Result<SqliteStoreAdapter, ExitCode> {
    SqliteStoreAdapter::from_config(config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn build_runtime() -> Result<tokio::runtime::Runtime, ExitCode> {
    tokio::runtime::Runtime::new().map_err(|e| {
        let err = FoliotrackError::from(e);
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn lookup_timeout(config: &dyn ConfigPort) -> Duration {
    Duration::from_secs(config.get_int("market_data", "timeout_secs", 5).max(1) as u64)
}

fn print_api_error(err: &ApiError) -> ExitCode {
    eprintln!("error: {}", err.message);
    eprintln!("  details: {}", err.details);
    ExitCode::from(5)
}

fn run_positions(config_path: &PathBuf, offline: bool) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let transactions = match store.list() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if transactions.is_empty() {
        eprintln!("No transactions recorded");
        return ExitCode::SUCCESS;
    }

    let mut cache = PriceCache::new();

    if !offline {
        let quote_port = match quote_port_from_config(&config) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let held = compute_positions(&transactions, &cache.prices);
        let symbols: Vec<String> = held.into_iter().map(|p| p.symbol).collect();

        eprintln!("Refreshing quotes for {} symbol(s)...", symbols.len());

        let runtime = match build_runtime() {
            Ok(rt) => rt,
            Err(code) => return code,
        };
        let outcome = runtime.block_on(reconcile_prices(
            &symbols,
            &cache.prices,
            quote_port.as_ref(),
            lookup_timeout(&config),
        ));

        if let Some(advisory) = &outcome.advisory {
            eprintln!("warning: {advisory}");
            let mut failed: Vec<_> = outcome.errors.iter().collect();
            failed.sort_by_key(|(symbol, _)| symbol.to_string());
            for (symbol, err) in failed {
                eprintln!("  {symbol}: {}", err.message);
            }
        }

        cache.apply(outcome);
    }

    let positions = compute_positions(&transactions, &cache.prices);

    println!(
        "{:<8} {:>12} {:>10} {:>10} {:>14} {:>12} {:>9}",
        "SYMBOL", "SHARES", "AVG COST", "PRICE", "VALUE", "RETURN", "RETURN%"
    );
    let mut total_value = 0.0;
    let mut total_cost = 0.0;
    for pos in &positions {
        total_value += pos.market_value;
        total_cost += pos.total_cost();
        println!(
            "{:<8} {:>12.4} {:>10.2} {:>10.2} {:>14.2} {:>+12.2} {:>+8.2}%",
            pos.symbol,
            pos.shares,
            pos.average_cost,
            pos.current_price,
            pos.market_value,
            pos.unrealized_return,
            pos.unrealized_return_pct,
        );
    }

    let total_return = total_value - total_cost;
    let total_return_pct = if total_cost > 0.0 {
        total_return / total_cost * 100.0
    } else {
        0.0
    };
    println!(
        "{:<8} {:>12} {:>10} {:>10} {:>14.2} {:>+12.2} {:>+8.2}%",
        "TOTAL", "", "", "", total_value, total_return, total_return_pct,
    );

    if let Some(updated) = cache.last_updated {
        eprintln!("Prices as of {}", updated.to_rfc3339());
    } else if !offline {
        eprintln!("No quotes were fetched");
    }

    ExitCode::SUCCESS
}

fn run_add(
    config_path: &PathBuf,
    kind: &str,
    symbol: &str,
    shares: f64,
    price: f64,
    date: Option<&str>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let kind = match TransactionKind::parse(kind) {
        Some(k) => k,
        None => {
            eprintln!("error: kind must be 'buy' or 'sell', got '{kind}'");
            return ExitCode::from(4);
        }
    };

    let date = match date {
        Some(value) => match parse_date(value) {
            Some(d) => d,
            None => {
                eprintln!("error: invalid date '{value}' (expected RFC 3339 or YYYY-MM-DD)");
                return ExitCode::from(4);
            }
        },
        None => Utc::now(),
    };

    let transaction = Transaction {
        id: Uuid::new_v4().to_string(),
        kind,
        symbol: symbol.trim().to_uppercase(),
        shares,
        price,
        date,
    };

    if let Err(e) = transaction.validate() {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if let Err(e) = store.save(&transaction) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!(
        "Recorded {} {} {} @ {:.2}",
        transaction.kind, transaction.shares, transaction.symbol, transaction.price
    );
    println!("{}", transaction.id);
    ExitCode::SUCCESS
}

fn run_list(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let mut transactions = match store.list() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    transactions.sort_by_key(|tx| tx.date);

    for tx in &transactions {
        println!(
            "{}  {:<4} {:<8} {:>12.4} @ {:>10.2}  [{}]",
            tx.date.format("%Y-%m-%d"),
            tx.kind,
            tx.symbol,
            tx.shares,
            tx.price,
            tx.id,
        );
    }
    eprintln!("{} transaction(s)", transactions.len());
    ExitCode::SUCCESS
}

fn run_delete(config_path: &PathBuf, id: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match store.delete(id) {
        Ok(()) => {
            eprintln!("Deleted transaction {id}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_import(config_path: &PathBuf, file: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let store = match open_store(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    eprintln!("Importing transactions from {}", file.display());
    let transactions = match read_transactions(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for tx in &transactions {
        if let Err(e) = store.save(tx) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("Imported {} transaction(s)", transactions.len());
    ExitCode::SUCCESS
}

fn run_search(config_path: &PathBuf, query: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let quote_port = match quote_port_from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let runtime = match build_runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    match runtime.block_on(quote_port.search_symbols(query)) {
        Ok(results) => {
            for r in &results {
                println!(
                    "{:<10} {} ({}, {}, {})",
                    r.symbol, r.name, r.kind, r.region, r.currency
                );
            }
            eprintln!("{} match(es)", results.len());
            ExitCode::SUCCESS
        }
        Err(e) => print_api_error(&e),
    }
}

fn run_quote(config_path: &PathBuf, symbol: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let quote_port = match quote_port_from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let runtime = match build_runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let symbol = symbol.trim().to_uppercase();
    match runtime.block_on(quote_port.get_quote(&symbol)) {
        Ok(q) => {
            println!(
                "{}: {:.2} ({:+.2}, {:+.2}%)",
                q.symbol, q.price, q.change, q.change_percent
            );
            ExitCode::SUCCESS
        }
        Err(e) => print_api_error(&e),
    }
}
