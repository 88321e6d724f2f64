//! CoinGecko API client
//!
//! Consumes three endpoint shapes: the full coin directory, per-coin detail
//! payloads, and the paginated top-N listing. Supply data comes from a
//! separate side-channel (see [`crate::providers::supply`]).

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_DETAIL_ENDPOINT, COINGECKO_DETAIL_QUERY,
        COINGECKO_LIST_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT,
    },
    currency::CurrencyList,
    error::FetchError,
    metrics::{MetricsCollector, RequestMetrics},
    provider::TickerSource,
    providers::SupplyFeed,
    types::{Asset, NativeTicker, Ticker},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One entry of the coin directory listing
#[derive(Debug, Clone, Deserialize)]
pub struct CoinListEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// A coin entry carrying its market data (detail and top-N payloads)
#[derive(Debug, Deserialize)]
struct CoinDetail {
    id: String,
    symbol: String,
    name: String,
    market_data: NativeTicker,
}

/// CoinGecko API client
pub struct CoinGeckoClient {
    client: Client,
    supply: SupplyFeed,
    metrics: Arc<MetricsCollector>,
}

impl CoinGeckoClient {
    /// Creates a new client with the standard request timeout
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            client,
            supply: SupplyFeed::new()?,
            metrics: Arc::new(MetricsCollector::new("coingecko")),
        })
    }

    /// Issues a GET request and parses the JSON body
    ///
    /// Non-success statuses become [`FetchError::Remote`] carrying the URL
    /// and status code; every request is recorded in the client metrics.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let start = Instant::now();
        tracing::debug!(url = url, "fetching from CoinGecko");

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                self.metrics.record_request(start.elapsed(), false).await;
                return Err(FetchError::Network(e));
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            self.metrics.record_request(start.elapsed(), false).await;
            return Err(FetchError::remote(url, status));
        }

        let body = response.text().await.map_err(FetchError::Network)?;
        self.metrics.record_request(start.elapsed(), true).await;

        serde_json::from_str(&body).map_err(|e| {
            FetchError::InvalidResponse(format!("failed to parse CoinGecko response: {e}"))
        })
    }

    /// Fetches the full coin directory (id, symbol, name per coin)
    pub async fn list_coins(&self) -> Result<Vec<CoinListEntry>, FetchError> {
        let url = format!("{COINGECKO_API_URL}{COINGECKO_LIST_ENDPOINT}");
        self.get_json(&url).await
    }

    /// Resolves requested symbols against the coin directory
    ///
    /// Unmatched symbols produce a warning string each rather than a hard
    /// failure; a directory fetch failure propagates.
    pub async fn resolve_symbols(
        &self,
        symbols: &str,
    ) -> Result<(HashMap<String, Asset>, Vec<String>), FetchError> {
        let directory = self.list_coins().await?;
        Ok(match_symbols(&directory, symbols))
    }

    /// Fetches the top N coins by market cap and assembles one asset per
    /// entry, with a per-currency bulk ticker applied for each requested
    /// currency
    ///
    /// The supply side-channel is queried once for the whole batch; its
    /// failure is non-fatal and simply leaves supply data empty.
    pub async fn fetch_top(
        &self,
        n: usize,
        currencies: &CurrencyList,
    ) -> Result<HashMap<String, Asset>, FetchError> {
        let url = format!("{COINGECKO_API_URL}{COINGECKO_DETAIL_ENDPOINT}?per_page={n}");
        let entries: Vec<CoinDetail> = self.get_json(&url).await?;

        let mut assets: HashMap<String, Asset> = entries
            .iter()
            .map(|e| {
                let asset = Asset::new(e.id.clone(), &e.symbol, e.name.clone());
                (asset.symbol.clone(), asset)
            })
            .collect();

        let supplies = self.supply.fetch_supplies(assets.keys()).await;

        for currency in currencies.iter() {
            for entry in &entries {
                let symbol = entry.symbol.to_uppercase();
                let ticker = Ticker::Bulk {
                    currency: currency.clone(),
                    rank: entry.market_data.market_cap_rank,
                    metrics: entry.market_data.metrics_for(currency),
                    supply: supplies.get(&symbol).cloned(),
                };
                if let Some(asset) = assets.get_mut(&symbol) {
                    asset.apply_ticker(ticker, currencies);
                }
            }
        }

        Ok(assets)
    }

    /// Success rate and mean latency over the recent request window
    pub async fn request_metrics(&self) -> RequestMetrics {
        self.metrics.get_metrics().await
    }
}

/// Matches requested symbols against a fetched coin directory
///
/// Returns the resolved asset map keyed by uppercase symbol plus one warning
/// per symbol the directory does not know.
pub fn match_symbols(
    directory: &[CoinListEntry],
    requested: &str,
) -> (HashMap<String, Asset>, Vec<String>) {
    let mut assets = HashMap::new();
    let mut warnings = Vec::new();

    for symbol in requested.split(',').filter(|s| !s.is_empty()) {
        match directory
            .iter()
            .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
        {
            Some(entry) => {
                let asset = Asset::new(entry.id.clone(), symbol, entry.name.clone());
                assets.insert(asset.symbol.clone(), asset);
            }
            None => warnings.push(format!(
                "couldn't find '{}' on CoinGecko.com",
                symbol.to_uppercase()
            )),
        }
    }

    (assets, warnings)
}

#[async_trait]
impl TickerSource for CoinGeckoClient {
    async fn fetch_ticker(&self, asset_id: &str) -> Result<Ticker, FetchError> {
        let url = format!(
            "{COINGECKO_API_URL}{COINGECKO_DETAIL_ENDPOINT}/{asset_id}?{COINGECKO_DETAIL_QUERY}"
        );
        let detail: CoinDetail = self.get_json(&url).await?;
        tracing::debug!(id = %detail.id, symbol = %detail.symbol, "fetched ticker");
        Ok(Ticker::Native(detail.market_data))
    }

    fn source_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Vec<CoinListEntry> {
        vec![
            CoinListEntry {
                id: "bitcoin".to_string(),
                symbol: "btc".to_string(),
                name: "Bitcoin".to_string(),
            },
            CoinListEntry {
                id: "ethereum".to_string(),
                symbol: "eth".to_string(),
                name: "Ethereum".to_string(),
            },
        ]
    }

    #[test]
    fn matches_known_symbols_and_warns_on_unknown() {
        let (assets, warnings) = match_symbols(&directory(), "BTC,NOTACOIN");

        assert_eq!(assets.len(), 1);
        assert_eq!(assets["BTC"].id, "bitcoin");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("NOTACOIN"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let (assets, warnings) = match_symbols(&directory(), "btc,Eth");
        assert_eq!(assets.len(), 2);
        assert!(warnings.is_empty());
        assert_eq!(assets["ETH"].name, "Ethereum");
    }
}
