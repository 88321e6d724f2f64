//! Supply side-channel client
//!
//! An auxiliary feed serving base64-encoded supply records keyed by symbol.
//! The feed is best-effort: any failure (transport, status, decode) yields
//! empty supply data rather than an error.

use crate::{
    constants::{SUPPLY_FEED_URL, SUPPLY_TIMEOUT_SECS, USER_AGENT},
    error::FetchError,
    types::Supply,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Client for the supply side-channel
pub struct SupplyFeed {
    client: Client,
}

impl SupplyFeed {
    /// Creates a new feed client; the feed is slower than the market API so
    /// it gets its own timeout
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SUPPLY_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self { client })
    }

    /// Fetches supply records for the requested symbols
    ///
    /// Returns only the symbols the feed knows and that decode cleanly;
    /// on any feed failure the map is empty.
    pub async fn fetch_supplies<'a, I>(&self, symbols: I) -> HashMap<String, Supply>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let encoded = match self.fetch_raw().await {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::debug!(error = %e, "supply feed unavailable, continuing without");
                return HashMap::new();
            }
        };

        let mut supplies = HashMap::new();
        for symbol in symbols {
            if let Some(raw) = encoded.get(symbol) {
                match decode_supply(raw) {
                    Some(supply) => {
                        supplies.insert(symbol.clone(), supply);
                    }
                    None => {
                        tracing::debug!(symbol = %symbol, "undecodable supply record, skipping");
                    }
                }
            }
        }

        supplies
    }

    async fn fetch_raw(&self) -> Result<HashMap<String, String>, FetchError> {
        let response = self.client.get(SUPPLY_FEED_URL).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::remote(
                SUPPLY_FEED_URL,
                response.status().as_u16(),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| FetchError::InvalidResponse(format!("failed to parse supply feed: {e}")))
    }
}

/// Decodes one base64-wrapped JSON supply record
fn decode_supply(encoded: &str) -> Option<Supply> {
    let bytes = BASE64.decode(encoded.as_bytes()).ok()?;
    serde_json::from_slice(&bytes).ok()
}
