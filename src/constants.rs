//! Constants for coinwatch
//!
//! All configuration is centralized here. No runtime config file is used -
//! the tracker operates with these compile-time constants plus CLI flags.

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint listing every known coin (id, symbol, name)
pub const COINGECKO_LIST_ENDPOINT: &str = "/coins/list";

/// CoinGecko endpoint for coin detail payloads and the top-N listing
pub const COINGECKO_DETAIL_ENDPOINT: &str = "/coins";

/// Query string for single-coin detail requests; strips everything but market data
pub const COINGECKO_DETAIL_QUERY: &str =
    "localization=false&tickers=false&community_data=false&developer_data=false&sparkline=false";

/// Supply side-channel URL (base64-encoded supply records keyed by symbol)
pub const SUPPLY_FEED_URL: &str = "https://coin-cheap.com/api/v3/supply";

/// HTTP request timeout for market-data calls (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP request timeout for the supply side-channel (in seconds)
pub const SUPPLY_TIMEOUT_SECS: u64 = 30;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coinwatch/0.1.0";

/// How many assets the default top-N view tracks
pub const DEFAULT_TOP_N: usize = 10;

/// Absolute difference below which a numeric snapshot field counts as unchanged
pub const CHANGE_TOLERANCE: f64 = 1e-6;

/// Default SQLite database file
pub const DEFAULT_DB_PATH: &str = "crypto_data.db";

/// Currency codes accepted by the upstream API
pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "AED", "ARS", "AUD", "BCH", "BDT", "BHD", "BMD", "BNB", "BRL", "BTC", "CAD", "CHF", "CLP",
    "CNY", "CZK", "DKK", "EOS", "ETH", "EUR", "GBP", "HKD", "HUF", "IDR", "ILS", "INR", "JPY",
    "KRW", "KWD", "LKR", "LTC", "MMK", "MXN", "MYR", "NOK", "NZD", "PHP", "PKR", "PLN", "RUB",
    "SAR", "SEK", "SGD", "THB", "TRY", "TWD", "USD", "VEF", "XAG", "XAU", "XDR", "XLM", "XRP",
    "ZAR",
];
