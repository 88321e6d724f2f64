//! # coinwatch
//!
//! Terminal cryptocurrency tracker: polls the CoinGecko market-data API,
//! merges results across one or more currencies, keeps a change-detected
//! snapshot history in SQLite, and renders sorted, colorized tables.
//!
//! The refresh core fans out one task per tracked asset and funnels results
//! through a channel into a single collector owning the asset map; the
//! persister then appends a row per (symbol, currency) only when a tracked
//! field changed beyond a small tolerance.
//!
//! ```no_run
//! use coinwatch::currency::CurrencyList;
//! use coinwatch::providers::CoinGeckoClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = CoinGeckoClient::new()?;
//! let currencies = CurrencyList::from_spec("USD,EUR");
//! let assets = client.fetch_top(10, &currencies).await?;
//! for asset in assets.values() {
//!     println!("{}: {:?}", asset.symbol, asset.metrics.get("USD"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod constants;
pub mod currency;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod providers;
pub mod refresh;
pub mod render;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use currency::CurrencyList;
pub use error::{FetchError, StoreError};
pub use provider::TickerSource;
pub use refresh::{refresh_tickers, RefreshReport};
pub use store::SnapshotStore;
pub use types::{Asset, CurrencyMetrics, Supply, Ticker};
