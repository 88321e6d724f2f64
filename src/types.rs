//! Types for tracked assets and their fetched market metrics

use crate::currency::CurrencyList;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supply figures for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    pub total: Option<f64>,
    pub max: Option<f64>,
    pub circulating: Option<f64>,
}

/// Market metrics for one asset in one currency
///
/// The record always carries all four fields; individual values are `None`
/// when the upstream payload omits them for that asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyMetrics {
    pub price: Option<f64>,
    pub volume_24h: Option<f64>,
    pub percent_change_24h: Option<f64>,
    pub percent_change_7d: Option<f64>,
}

/// The `market_data` sub-object of a single-coin detail payload
///
/// Metric fields are keyed by lowercase currency code; values may be null
/// for assets the upstream has no data for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NativeTicker {
    #[serde(default)]
    pub market_cap_rank: Option<i64>,
    #[serde(default)]
    pub current_price: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub total_volume: HashMap<String, Option<f64>>,
    #[serde(default, rename = "price_change_percentage_24h_in_currency")]
    pub percent_change_24h: HashMap<String, Option<f64>>,
    #[serde(default, rename = "price_change_percentage_7d_in_currency")]
    pub percent_change_7d: HashMap<String, Option<f64>>,
}

impl NativeTicker {
    /// Extracts the four metric fields for one currency
    pub fn metrics_for(&self, currency: &str) -> CurrencyMetrics {
        let key = currency.to_lowercase();
        CurrencyMetrics {
            price: self.current_price.get(&key).copied().flatten(),
            volume_24h: self.total_volume.get(&key).copied().flatten(),
            percent_change_24h: self.percent_change_24h.get(&key).copied().flatten(),
            percent_change_7d: self.percent_change_7d.get(&key).copied().flatten(),
        }
    }
}

/// A fetched market snapshot for one asset
///
/// The variant is chosen at the fetch boundary: the single-asset detail path
/// yields `Native` (currency-nested maps covering every requested currency in
/// one pass), the top-N path yields `Bulk` (one pre-resolved single-currency
/// record per call).
#[derive(Debug, Clone)]
pub enum Ticker {
    /// Currency-nested detail payload
    Native(NativeTicker),
    /// Flat record for one currency, assembled by the top-N fetch
    Bulk {
        currency: String,
        rank: Option<i64>,
        metrics: CurrencyMetrics,
        supply: Option<Supply>,
    },
}

/// One tracked cryptocurrency and its per-currency metrics
///
/// Assets are built fresh at the start of each refresh cycle and discarded
/// after render/persist; history lives only in the snapshot store.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Upstream coin id (e.g. "bitcoin")
    pub id: String,
    pub name: String,
    /// Uppercased symbol, unique key within a refresh cycle
    pub symbol: String,
    pub rank: Option<i64>,
    pub supply: Option<Supply>,
    /// Metrics keyed by uppercase currency code; grows within a cycle
    pub metrics: HashMap<String, CurrencyMetrics>,
}

impl Asset {
    /// Creates an asset with identity fields only; metrics arrive via
    /// [`Asset::apply_ticker`].
    pub fn new(id: impl Into<String>, symbol: &str, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.to_uppercase(),
            rank: None,
            supply: None,
            metrics: HashMap::new(),
        }
    }

    /// Merges a fetched ticker into this asset
    ///
    /// The Native arm extracts metrics for every currency in `currencies`;
    /// the Bulk arm stores its single pre-resolved record directly. Existing
    /// currency entries are only replaced when the ticker carries that
    /// currency again.
    pub fn apply_ticker(&mut self, ticker: Ticker, currencies: &CurrencyList) {
        match ticker {
            Ticker::Native(native) => {
                self.rank = native.market_cap_rank;
                for currency in currencies.codes() {
                    self.metrics
                        .insert(currency.clone(), native.metrics_for(currency));
                }
            }
            Ticker::Bulk {
                currency,
                rank,
                metrics,
                supply,
            } => {
                self.rank = rank;
                self.metrics.insert(currency.to_uppercase(), metrics);
                if supply.is_some() {
                    self.supply = supply;
                }
            }
        }
    }

    /// Circulating supply if the side-channel provided one
    pub fn circulating_supply(&self) -> Option<f64> {
        self.supply.as_ref().and_then(|s| s.circulating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native_payload() -> NativeTicker {
        serde_json::from_value(serde_json::json!({
            "market_cap_rank": 1,
            "current_price": { "usd": 50000.0, "eur": 46000.0 },
            "total_volume": { "usd": 30e9, "eur": 27e9 },
            "price_change_percentage_24h_in_currency": { "usd": 2.5, "eur": 2.4 },
            "price_change_percentage_7d_in_currency": { "usd": -1.2, "eur": null }
        }))
        .unwrap()
    }

    #[test]
    fn native_ticker_extracts_nested_currencies() {
        let currencies = CurrencyList::from_spec("USD,EUR");
        let mut asset = Asset::new("bitcoin", "btc", "Bitcoin");
        asset.apply_ticker(Ticker::Native(native_payload()), &currencies);

        assert_eq!(asset.rank, Some(1));
        assert_eq!(asset.symbol, "BTC");
        let usd = &asset.metrics["USD"];
        assert_eq!(usd.price, Some(50000.0));
        assert_eq!(usd.volume_24h, Some(30e9));
        assert_eq!(usd.percent_change_24h, Some(2.5));
        assert_eq!(usd.percent_change_7d, Some(-1.2));
        // null upstream value stays representable as an absent field
        assert_eq!(asset.metrics["EUR"].percent_change_7d, None);
    }

    #[test]
    fn bulk_ticker_stores_record_directly() {
        let currencies = CurrencyList::from_spec("USD");
        let mut asset = Asset::new("ethereum", "eth", "Ethereum");
        asset.apply_ticker(
            Ticker::Bulk {
                currency: "usd".to_string(),
                rank: Some(2),
                metrics: CurrencyMetrics {
                    price: Some(3000.0),
                    volume_24h: Some(12e9),
                    percent_change_24h: Some(0.7),
                    percent_change_7d: Some(4.1),
                },
                supply: Some(Supply {
                    total: Some(120_000_000.0),
                    max: None,
                    circulating: Some(119_000_000.0),
                }),
            },
            &currencies,
        );

        assert_eq!(asset.rank, Some(2));
        assert_eq!(asset.metrics["USD"].price, Some(3000.0));
        assert_eq!(asset.circulating_supply(), Some(119_000_000.0));
    }

    #[test]
    fn metrics_map_grows_across_applications() {
        let mut asset = Asset::new("bitcoin", "btc", "Bitcoin");
        asset.apply_ticker(
            Ticker::Bulk {
                currency: "usd".to_string(),
                rank: Some(1),
                metrics: CurrencyMetrics::default(),
                supply: None,
            },
            &CurrencyList::from_spec("USD"),
        );
        asset.apply_ticker(
            Ticker::Bulk {
                currency: "eur".to_string(),
                rank: Some(1),
                metrics: CurrencyMetrics::default(),
                supply: None,
            },
            &CurrencyList::from_spec("EUR"),
        );

        assert_eq!(asset.metrics.len(), 2);
        assert!(asset.metrics.contains_key("USD"));
        assert!(asset.metrics.contains_key("EUR"));
    }

    #[test]
    fn bulk_without_supply_keeps_previous_supply() {
        let mut asset = Asset::new("bitcoin", "btc", "Bitcoin");
        asset.supply = Some(Supply {
            total: None,
            max: Some(21_000_000.0),
            circulating: Some(19_000_000.0),
        });
        asset.apply_ticker(
            Ticker::Bulk {
                currency: "usd".to_string(),
                rank: Some(1),
                metrics: CurrencyMetrics::default(),
                supply: None,
            },
            &CurrencyList::from_spec("USD"),
        );
        assert_eq!(asset.circulating_supply(), Some(19_000_000.0));
    }
}
