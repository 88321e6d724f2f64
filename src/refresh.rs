//! Concurrent ticker refresh
//!
//! Fans out one task per tracked asset and funnels every result through an
//! mpsc channel into a single collector that owns the asset map exclusively.
//! Workers never touch shared state, so no lock exists anywhere in the
//! refresh path.

use crate::{currency::CurrencyList, error::FetchError, provider::TickerSource, types::Asset};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome of one refresh cycle
///
/// A failed fetch leaves the asset's metrics absent for the cycle; the
/// failure itself is still representable here rather than being an implicit
/// missing map entry.
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Symbols whose tickers were fetched and applied
    pub updated: Vec<String>,
    /// Per-symbol fetch failures, swallowed for the cycle
    pub failures: Vec<(String, FetchError)>,
}

impl RefreshReport {
    /// True when every asset refreshed cleanly
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Refreshes every asset's metrics in parallel
///
/// One task per asset calls the source and sends its result to the
/// collector; the collector applies tickers as they arrive and the function
/// returns only once every spawned task has finished. There is no retry,
/// backoff, or cancellation - a single pass per cycle, with per-asset
/// failures reported in the [`RefreshReport`].
pub async fn refresh_tickers(
    source: Arc<dyn TickerSource>,
    assets: &mut HashMap<String, Asset>,
    currencies: &CurrencyList,
) -> RefreshReport {
    let targets: Vec<(String, String)> = assets
        .iter()
        .map(|(symbol, asset)| (symbol.clone(), asset.id.clone()))
        .collect();

    let (tx, mut rx) = mpsc::channel(targets.len().max(1));

    let handles: Vec<_> = targets
        .into_iter()
        .map(|(symbol, id)| {
            let source = source.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = source.fetch_ticker(&id).await;
                // receiver outlives every worker; a failed send means shutdown
                let _ = tx.send((symbol, result)).await;
            })
        })
        .collect();
    drop(tx);

    let mut report = RefreshReport::default();
    while let Some((symbol, result)) = rx.recv().await {
        match result {
            Ok(ticker) => {
                if let Some(asset) = assets.get_mut(&symbol) {
                    asset.apply_ticker(ticker, currencies);
                    report.updated.push(symbol);
                }
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "ticker fetch failed for this cycle");
                report.failures.push((symbol, e));
            }
        }
    }

    // channel closure already implies completion; join to surface panics
    for result in futures::future::join_all(handles).await {
        if let Err(e) = result {
            tracing::error!(error = %e, "refresh worker panicked");
        }
    }

    report
}
