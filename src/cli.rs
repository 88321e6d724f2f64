//! CLI argument parsing
//!
//! Uses clap derive; invalid currency selections fall back to USD instead of
//! aborting (see [`crate::currency::CurrencyList`]).

use crate::constants::{DEFAULT_DB_PATH, DEFAULT_TOP_N};
use crate::render::SortSpec;
use clap::Parser;
use std::path::PathBuf;

/// Displays cryptocurrency market data in the terminal and records a
/// change-detected snapshot history in SQLite.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Currency used for prices and volumes; comma-separate for more than
    /// one (e.g. USD,BTC). Invalid selections fall back to USD.
    #[arg(long = "curr", default_value = "USD")]
    pub curr: String,

    /// Symbols of the cryptocurrencies to display (comma-separated);
    /// defaults to the top 10 by market cap
    #[arg(long = "crypto")]
    pub crypto: Option<String>,

    /// Sort key: rank, price, change_24h, change_7d or volume, with a
    /// trailing '-' for ascending order
    #[arg(long = "sort", default_value = "rank-")]
    pub sort: SortSpec,

    /// Autorefresh delay in seconds (0 = run once and exit)
    #[arg(short = 'd', long = "delay", default_value = "10")]
    pub delay: u64,

    /// SQLite database file for snapshot history
    #[arg(long = "db", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,
}

impl Args {
    /// Symbols cleaned up for resolution: uppercased, spaces stripped
    pub fn symbol_spec(&self) -> Option<String> {
        self.crypto
            .as_ref()
            .map(|s| s.to_uppercase().replace(' ', ""))
    }

    /// Number of assets shown when no symbols were requested
    pub fn top_n(&self) -> usize {
        DEFAULT_TOP_N
    }
}
