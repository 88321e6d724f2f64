//! Source abstraction for fetching per-asset tickers
//!
//! The refresh orchestrator fans out over this trait so tests can swap the
//! live CoinGecko client for a mock.

use crate::{error::FetchError, types::Ticker};
use async_trait::async_trait;

/// Trait for anything that can fetch a single asset's market snapshot
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Fetches the current ticker for one asset by upstream id
    ///
    /// # Arguments
    /// * `asset_id` - The upstream coin id (e.g. "bitcoin")
    ///
    /// # Returns
    /// The fetched ticker or an error; network errors are expected to be
    /// swallowed per-asset by the caller.
    async fn fetch_ticker(&self, asset_id: &str) -> Result<Ticker, FetchError>;

    /// Returns the name of this source
    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::types::NativeTicker;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock ticker source for testing
    ///
    /// Serves canned responses per asset id; unknown ids fail with a
    /// synthetic remote error.
    pub struct MockSource {
        responses: Mutex<HashMap<String, Result<Ticker, FetchError>>>,
        call_count: Mutex<usize>,
    }

    impl Default for MockSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockSource {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                call_count: Mutex::new(0),
            }
        }

        /// Registers a native-shape ticker with the given USD metrics
        pub fn set_usd_ticker(&self, asset_id: &str, rank: i64, price: f64) {
            let one = |v: f64| {
                let mut m = HashMap::new();
                m.insert("usd".to_string(), Some(v));
                m
            };
            let ticker = NativeTicker {
                market_cap_rank: Some(rank),
                current_price: one(price),
                total_volume: one(price * 1000.0),
                percent_change_24h: one(1.0),
                percent_change_7d: one(-2.0),
            };
            self.responses
                .lock()
                .unwrap()
                .insert(asset_id.to_string(), Ok(Ticker::Native(ticker)));
        }

        /// Registers a failure for the given asset id
        pub fn set_error(&self, asset_id: &str, error: FetchError) {
            self.responses
                .lock()
                .unwrap()
                .insert(asset_id.to_string(), Err(error));
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl TickerSource for MockSource {
        async fn fetch_ticker(&self, asset_id: &str) -> Result<Ticker, FetchError> {
            *self.call_count.lock().unwrap() += 1;
            let responses = self.responses.lock().unwrap();
            match responses.get(asset_id) {
                Some(Ok(ticker)) => Ok(ticker.clone()),
                Some(Err(FetchError::Remote { url, status })) => Err(FetchError::Remote {
                    url: url.clone(),
                    status: *status,
                }),
                Some(Err(FetchError::InvalidResponse(s))) => {
                    Err(FetchError::InvalidResponse(s.clone()))
                }
                // reqwest::Error is not constructible here; stand in with a
                // remote error when a test registered a network failure
                Some(Err(FetchError::Network(_))) => Err(FetchError::remote(asset_id, 0)),
                None => Err(FetchError::remote(asset_id, 404)),
            }
        }

        fn source_name(&self) -> &'static str {
            "mock"
        }
    }
}
