//! Terminal presentation: ANSI color helpers, sorting, per-currency tables
//!
//! No terminal crate is used; output is plain ANSI-escaped text, one table
//! per requested currency. Colors are disabled wholesale on Windows.

use crate::{currency::CurrencyList, types::Asset};
use std::collections::HashMap;
use std::str::FromStr;

pub const BOLD: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const MAGENTA: &str = "\x1b[35m";
pub const YELLOW: &str = "\x1b[93m";
pub const WHITE: &str = "\x1b[97m";

/// Clear screen + cursor home
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[J";

fn colors_enabled() -> bool {
    !cfg!(windows)
}

/// Wraps text in an ANSI color code when the terminal supports it
pub fn paint(text: &str, color: &str) -> String {
    if colors_enabled() {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

pub fn bold(text: &str) -> String {
    paint(text, BOLD)
}

/// Formats a percentage cell: green when positive, red when negative,
/// red "N/A" when the value is absent
pub fn color_percent(value: Option<f64>) -> (String, String) {
    match value {
        None => ("N/A".to_string(), paint("N/A", RED)),
        Some(v) => {
            let plain = format!("{v:.2}%");
            let painted = paint(&plain, if v < 0.0 { RED } else { GREEN });
            (plain, painted)
        }
    }
}

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Rank,
    Price,
    Change24h,
    Change7d,
    Volume,
}

/// Sort key plus direction, parsed from specs like `rank-` or `volume`
///
/// A trailing `-` selects ascending order; the bare key sorts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub ascending: bool,
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let (name, ascending) = match lower.strip_suffix('-') {
            Some(name) => (name, true),
            None => (lower.as_str(), false),
        };

        let key = match name {
            "rank" => SortKey::Rank,
            "price" => SortKey::Price,
            "change_24h" => SortKey::Change24h,
            "change_7d" => SortKey::Change7d,
            "volume" => SortKey::Volume,
            _ => {
                return Err(format!(
                    "unknown sort key '{s}' (expected rank, price, change_24h, change_7d \
                     or volume, with an optional trailing '-' for ascending)"
                ))
            }
        };

        Ok(Self { key, ascending })
    }
}

fn sort_value(asset: &Asset, key: SortKey, currency: &str) -> Option<f64> {
    let metrics = asset.metrics.get(currency);
    match key {
        SortKey::Rank => asset.rank.map(|r| r as f64),
        SortKey::Price => metrics.and_then(|m| m.price),
        SortKey::Change24h => metrics.and_then(|m| m.percent_change_24h),
        SortKey::Change7d => metrics.and_then(|m| m.percent_change_7d),
        SortKey::Volume => metrics.and_then(|m| m.volume_24h),
    }
}

/// Sorts assets by the chosen key; assets missing the value sort last
pub fn sort_assets<'a>(assets: &mut Vec<&'a Asset>, spec: &SortSpec, currency: &str) {
    assets.sort_by(|a, b| {
        match (
            sort_value(a, spec.key, currency),
            sort_value(b, spec.key, currency),
        ) {
            (Some(x), Some(y)) => {
                let ord = x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal);
                if spec.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

/// Groups an integer amount with thousands separators
fn group_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn fmt_price(value: Option<f64>, currency: &str) -> String {
    match value {
        None => "N/A".to_string(),
        // BTC-denominated prices need more precision
        Some(v) if currency == "BTC" => format!("{v:.8}"),
        Some(v) => format!("{v:.4}"),
    }
}

fn fmt_volume(value: Option<f64>, currency: &str) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) if currency == "BTC" => format!("{v:.4}"),
        Some(v) => group_thousands(v),
    }
}

/// A table cell: the plain text drives column widths, the painted variant
/// is what gets printed
struct Cell {
    plain: String,
    painted: String,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        let plain = text.into();
        Self {
            painted: plain.clone(),
            plain,
        }
    }

    fn painted(plain: String, painted: String) -> Self {
        Self { plain, painted }
    }
}

const COLUMN_GAP: usize = 2;

fn layout(rows: &[Vec<Cell>]) -> String {
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.plain.chars().count());
        }
    }

    let mut out = String::new();
    for row in rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(&cell.painted);
            if i + 1 < row.len() {
                let pad = widths[i] - cell.plain.chars().count() + COLUMN_GAP;
                line.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Renders one sorted, colorized table per requested currency, with a
/// source/timestamp footer
pub fn render_tables(
    assets: &HashMap<String, Asset>,
    currencies: &CurrencyList,
    sort: &SortSpec,
) -> String {
    let mut out = String::new();

    for currency in currencies.iter() {
        let mut selection: Vec<&Asset> = assets.values().collect();
        sort_assets(&mut selection, sort, currency);

        let headers = [
            "Rank".to_string(),
            "Symbol".to_string(),
            "Name".to_string(),
            format!("Price ({currency})"),
            format!("24h-Change ({currency})"),
            format!("7d-Change ({currency})"),
            format!("24h-Volume ({currency})"),
            "Circulating Supply".to_string(),
        ];

        let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(selection.len() + 1);
        rows.push(
            headers
                .iter()
                .map(|h| Cell::painted(h.clone(), bold(h)))
                .collect(),
        );

        for asset in &selection {
            let metrics = asset.metrics.get(currency).cloned().unwrap_or_default();
            let rank = asset
                .rank
                .map(|r| r.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let (pc24_plain, pc24_painted) = color_percent(metrics.percent_change_24h);
            let (pc7_plain, pc7_painted) = color_percent(metrics.percent_change_7d);

            rows.push(vec![
                Cell::painted(rank.clone(), bold(&rank)),
                Cell::plain(asset.symbol.as_str()),
                Cell::plain(asset.name.as_str()),
                Cell::plain(fmt_price(metrics.price, currency)),
                Cell::painted(pc24_plain, pc24_painted),
                Cell::painted(pc7_plain, pc7_painted),
                Cell::plain(fmt_volume(metrics.volume_24h, currency)),
                Cell::plain(
                    asset
                        .circulating_supply()
                        .map(group_thousands)
                        .unwrap_or_else(|| "0".to_string()),
                ),
            ]);
        }

        out.push('\n');
        out.push_str(&paint(&bold(&format!("> {currency}")), YELLOW));
        out.push('\n');
        out.push_str(&layout(&rows));
    }

    out.push_str(&format!(
        "\nSource: {} - {}\n",
        paint("https://www.coingecko.com", WHITE),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out
}

/// One warning line, magenta like the original resolution warnings
pub fn warning_line(text: &str) -> String {
    paint(text, MAGENTA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CurrencyMetrics;

    fn asset(symbol: &str, rank: i64, price: f64) -> Asset {
        let mut a = Asset::new(symbol.to_lowercase(), symbol, symbol);
        a.rank = Some(rank);
        a.metrics.insert(
            "USD".to_string(),
            CurrencyMetrics {
                price: Some(price),
                volume_24h: Some(1000.0),
                percent_change_24h: Some(1.5),
                percent_change_7d: Some(-0.5),
            },
        );
        a
    }

    #[test]
    fn parses_sort_specs() {
        let spec: SortSpec = "rank-".parse().unwrap();
        assert_eq!(spec.key, SortKey::Rank);
        assert!(spec.ascending);

        let spec: SortSpec = "volume".parse().unwrap();
        assert_eq!(spec.key, SortKey::Volume);
        assert!(!spec.ascending);

        assert!("sideways".parse::<SortSpec>().is_err());
    }

    #[test]
    fn sorts_by_price_descending_with_missing_last() {
        let cheap = asset("AAA", 3, 1.0);
        let dear = asset("BBB", 1, 100.0);
        let mut bare = Asset::new("ccc", "CCC", "CCC");
        bare.rank = Some(2);

        let mut selection = vec![&cheap, &bare, &dear];
        let spec: SortSpec = "price".parse().unwrap();
        sort_assets(&mut selection, &spec, "USD");

        let symbols: Vec<&str> = selection.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BBB", "AAA", "CCC"]);
    }

    #[test]
    fn sorts_by_rank_ascending() {
        let second = asset("BBB", 2, 1.0);
        let first = asset("AAA", 1, 1.0);
        let mut selection = vec![&second, &first];
        sort_assets(&mut selection, &"rank-".parse().unwrap(), "USD");
        assert_eq!(selection[0].symbol, "AAA");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(1234567.0), "1,234,567");
    }

    #[test]
    fn btc_prices_render_with_eight_decimals() {
        assert_eq!(fmt_price(Some(0.05), "BTC"), "0.05000000");
        assert_eq!(fmt_price(Some(0.05), "USD"), "0.0500");
        assert_eq!(fmt_price(None, "USD"), "N/A");
    }

    #[test]
    fn table_contains_headers_and_rows() {
        let mut assets = HashMap::new();
        let a = asset("BTC", 1, 50000.0);
        assets.insert(a.symbol.clone(), a);

        let out = render_tables(
            &assets,
            &CurrencyList::from_spec("USD"),
            &"rank-".parse().unwrap(),
        );
        assert!(out.contains("Price (USD)"));
        assert!(out.contains("BTC"));
        assert!(out.contains("50000.0000"));
        assert!(out.contains("coingecko.com"));
    }
}
