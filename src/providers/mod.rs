//! Upstream market-data API clients

pub mod coingecko;
pub mod supply;

pub use coingecko::CoinGeckoClient;
pub use supply::SupplyFeed;
