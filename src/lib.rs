//! foliotrack — equity portfolio tracker.
//!
//! Replays a buy/sell transaction log into current positions and reconciles
//! them with live quotes from a pluggable market-data vendor.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
