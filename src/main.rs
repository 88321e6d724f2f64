//! coinwatch binary: resolve symbols once, then poll / persist / render

use anyhow::Context;
use clap::Parser;
use coinwatch::{
    cli::Args,
    currency::CurrencyList,
    provider::TickerSource,
    providers::CoinGeckoClient,
    refresh::refresh_tickers,
    render::{render_tables, warning_line, CLEAR_SCREEN},
    store::SnapshotStore,
    types::Asset,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args = Args::parse();
    let currencies = CurrencyList::from_spec(&args.curr);

    let client = Arc::new(CoinGeckoClient::new().context("failed to build the API client")?);
    let store = SnapshotStore::open(&args.db)
        .await
        .context("failed to open the snapshot store")?;

    // Requested symbols resolve against the coin directory exactly once;
    // the resolved identities seed a fresh asset map every cycle.
    let resolved: Option<HashMap<String, Asset>> = match args.symbol_spec() {
        Some(spec) => {
            let (assets, warnings) = client
                .resolve_symbols(&spec)
                .await
                .context("failed to load the coin directory")?;
            for warning in &warnings {
                eprintln!("{}", warning_line(warning));
            }
            selection(assets)
        }
        None => None,
    };

    loop {
        match run_cycle(&client, &store, resolved.as_ref(), &currencies, &args).await {
            Ok(output) => {
                if args.delay > 0 {
                    print!("{CLEAR_SCREEN}");
                }
                print!("{output}");
            }
            Err(e) => {
                tracing::error!(error = %e, "refresh cycle failed");
                if args.delay == 0 {
                    return Err(e);
                }
            }
        }

        let metrics = client.request_metrics().await;
        tracing::debug!(
            source = %metrics.source_name,
            success_rate = metrics.success_rate,
            mean_latency_ms = metrics.mean_latency_ms,
            total_requests = metrics.total_requests,
            "request health"
        );

        if args.delay == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_secs(args.delay)).await;
    }

    Ok(())
}

/// One full cycle: refresh (or fetch the top-N set), persist changed
/// snapshots, and render the tables
async fn run_cycle(
    client: &Arc<CoinGeckoClient>,
    store: &SnapshotStore,
    resolved: Option<&HashMap<String, Asset>>,
    currencies: &CurrencyList,
    args: &Args,
) -> anyhow::Result<String> {
    let assets = match resolved {
        Some(template) => {
            // fresh Asset instances per cycle; the template carries identity only
            let mut assets = template.clone();
            let source: Arc<dyn TickerSource> = client.clone();
            let report = refresh_tickers(source, &mut assets, currencies).await;
            if !report.is_complete() {
                tracing::warn!(
                    failed = report.failures.len(),
                    updated = report.updated.len(),
                    "some assets did not refresh this cycle"
                );
            }
            assets
        }
        None => client
            .fetch_top(args.top_n(), currencies)
            .await
            .context("failed to fetch the top coins")?,
    };

    store
        .persist(&assets, currencies)
        .await
        .context("failed to persist snapshots")?;

    Ok(render_tables(&assets, currencies, &args.sort))
}

/// Keeps a resolution result only when it actually matched something; an
/// empty resolution falls back to the default top-N view
fn selection(assets: HashMap<String, Asset>) -> Option<HashMap<String, Asset>> {
    if assets.is_empty() {
        None
    } else {
        Some(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinwatch::providers::coingecko::{match_symbols, CoinListEntry};

    fn directory() -> Vec<CoinListEntry> {
        vec![CoinListEntry {
            id: "bitcoin".to_string(),
            symbol: "btc".to_string(),
            name: "Bitcoin".to_string(),
        }]
    }

    #[test]
    fn fully_unresolved_symbols_fall_back_to_top_n() {
        let (assets, warnings) = match_symbols(&directory(), "NOTACOIN");
        assert_eq!(warnings.len(), 1);
        // nothing matched, so the cycle should take the top-N path
        assert!(selection(assets).is_none());
    }

    #[test]
    fn partially_resolved_symbols_keep_the_selection() {
        let (assets, warnings) = match_symbols(&directory(), "BTC,NOTACOIN");
        assert_eq!(warnings.len(), 1);
        let selected = selection(assets).unwrap();
        assert!(selected.contains_key("BTC"));
    }
}
